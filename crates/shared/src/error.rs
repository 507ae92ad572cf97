use std::error::Error as StdError;

use thiserror::Error;

use crate::domain::QueryKind;

pub type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("cannot use both --asc and --desc sort options")]
    InvalidOptionCombination,
    #[error("unknown sort field '{}' (accepted: {})", .name, .accepted.join(", "))]
    UnknownSortKey {
        name: String,
        accepted: &'static [&'static str],
    },
    #[error(
        "malformed token locator '{raw}': expected <contract address>:<token id> or <contract address>-<token id>"
    )]
    MalformedTokenLocator { raw: String },
    #[error("failed to fetch {kind} page at offset {offset}: {source}")]
    RemoteFetch {
        kind: QueryKind,
        offset: usize,
        source: BoxError,
    },
    #[error("failed to format results: {0}")]
    Format(String),
}

impl QueryError {
    pub fn remote(kind: QueryKind, offset: usize, source: impl Into<BoxError>) -> Self {
        Self::RemoteFetch {
            kind,
            offset,
            source: source.into(),
        }
    }

    /// True for errors raised while validating options, before any request went out.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            QueryError::InvalidOptionCombination
                | QueryError::UnknownSortKey { .. }
                | QueryError::MalformedTokenLocator { .. }
        )
    }
}
