use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Largest page the query service will return for a single request.
pub const MAX_PAGE_SIZE: usize = 200;
/// Hard ceiling on the number of records a single command may ask for.
pub const MAX_RESULT_LIMIT: usize = 10_000;
pub const DEFAULT_RESULT_LIMIT: usize = 100;

pub fn clamp_result_limit(requested: usize) -> usize {
    requested.clamp(1, MAX_RESULT_LIMIT)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    Mints,
    Sales,
}

impl QueryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryKind::Mints => "mints",
            QueryKind::Sales => "sales",
        }
    }

    pub fn sort_key_names(self) -> &'static [&'static str] {
        match self {
            QueryKind::Mints => MintSortKey::NAMES,
            QueryKind::Sales => SaleSortKey::NAMES,
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Closed set of sortable fields for one query type.
///
/// Each implementor maps the lowercase names accepted on the command line to
/// the identifiers the query service expects, so a lookup is an exhaustive
/// match rather than a probe into an untyped table.
pub trait SortKey: Copy + fmt::Debug + PartialEq + Serialize + Send + Sync + 'static {
    const KIND: QueryKind;
    /// Accepted names, in the order shown in help text.
    const NAMES: &'static [&'static str];
    /// Sentinel used when no sort field was requested.
    const NONE: Self;

    fn from_name(name: &str) -> Option<Self>;
    fn name(self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MintSortKey {
    Time,
    TokenId,
    Price,
    None,
}

impl SortKey for MintSortKey {
    const KIND: QueryKind = QueryKind::Mints;
    const NAMES: &'static [&'static str] = &["time", "id", "price", "none"];
    const NONE: Self = MintSortKey::None;

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "time" => Some(MintSortKey::Time),
            "id" => Some(MintSortKey::TokenId),
            "price" => Some(MintSortKey::Price),
            "none" => Some(MintSortKey::None),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            MintSortKey::Time => "time",
            MintSortKey::TokenId => "id",
            MintSortKey::Price => "price",
            MintSortKey::None => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleSortKey {
    EthPrice,
    NativePrice,
    Time,
    None,
}

impl SortKey for SaleSortKey {
    const KIND: QueryKind = QueryKind::Sales;
    const NAMES: &'static [&'static str] = &["eth", "price", "time", "none"];
    const NONE: Self = SaleSortKey::None;

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "eth" => Some(SaleSortKey::EthPrice),
            "price" => Some(SaleSortKey::NativePrice),
            "time" => Some(SaleSortKey::Time),
            "none" => Some(SaleSortKey::None),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            SaleSortKey::EthPrice => "eth",
            SaleSortKey::NativePrice => "price",
            SaleSortKey::Time => "time",
            SaleSortKey::None => "none",
        }
    }
}

/// Sort input as sent to the query service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec<K> {
    pub sort_key: K,
    pub sort_direction: SortDirection,
}

impl<K: SortKey> Default for SortSpec<K> {
    fn default() -> Self {
        Self {
            sort_key: K::NONE,
            sort_direction: SortDirection::default(),
        }
    }
}

/// One specific token: a contract address plus the token id inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenLocator {
    pub address: String,
    pub token_id: String,
}

impl TokenLocator {
    pub fn new(address: impl Into<String>, token_id: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            token_id: token_id.into(),
        }
    }

    /// Parses a comma separated list of `address:tokenId` / `address-tokenId` pairs.
    pub fn parse_list(raw: &str) -> Result<Vec<Self>, QueryError> {
        raw.split(',').map(str::parse).collect()
    }
}

impl FromStr for TokenLocator {
    type Err = QueryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = raw.trim().split([':', '-']).map(str::trim).collect();
        match parts.as_slice() {
            [address, token_id] if !address.is_empty() && !token_id.is_empty() => {
                Ok(Self::new(*address, *token_id))
            }
            _ => Err(QueryError::MalformedTokenLocator {
                raw: raw.to_string(),
            }),
        }
    }
}

impl fmt::Display for TokenLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.token_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
