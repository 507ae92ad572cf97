use serde::Serialize;
use shared::{
    domain::{SortDirection, SortKey, SortSpec, TokenLocator},
    error::QueryError,
    protocol::{MintsWhere, SalesWhere},
};

/// Builds the sort input for one query type from the raw `--sort`, `--asc`
/// and `--desc` options. Runs before any request is issued.
pub fn resolve_sort<K: SortKey>(
    requested: Option<&str>,
    want_ascending: bool,
    want_descending: bool,
) -> Result<SortSpec<K>, QueryError> {
    if want_ascending && want_descending {
        return Err(QueryError::InvalidOptionCombination);
    }

    let sort_key = match requested {
        Some(name) => K::from_name(name).ok_or_else(|| QueryError::UnknownSortKey {
            name: name.to_string(),
            accepted: K::NAMES,
        })?,
        None => K::NONE,
    };
    let sort_direction = if want_ascending {
        SortDirection::Asc
    } else {
        SortDirection::Desc
    };

    Ok(SortSpec {
        sort_key,
        sort_direction,
    })
}

/// Raw filter options for one command, already split on commas.
pub trait ResolveFilter {
    type Where: Serialize + Send + Sync;

    fn resolve_filter(&self) -> Result<Self::Where, QueryError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MintFilterOptions {
    pub collection: Option<Vec<String>>,
    pub minter: Option<Vec<String>>,
}

impl ResolveFilter for MintFilterOptions {
    type Where = MintsWhere;

    fn resolve_filter(&self) -> Result<MintsWhere, QueryError> {
        Ok(MintsWhere {
            collection_addresses: self.collection.clone(),
            minter_addresses: self.minter.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaleFilterOptions {
    pub collection: Option<Vec<String>>,
    pub seller: Option<Vec<String>>,
    pub token: Option<Vec<String>>,
}

impl ResolveFilter for SaleFilterOptions {
    type Where = SalesWhere;

    fn resolve_filter(&self) -> Result<SalesWhere, QueryError> {
        let tokens = self
            .token
            .as_deref()
            .map(parse_token_locators)
            .transpose()?;

        Ok(SalesWhere {
            collection_addresses: self.collection.clone(),
            seller_addresses: self.seller.clone(),
            tokens,
        })
    }
}

// Entries may still hold unsplit `a:1,b:2` lists when they did not come
// through the CLI delimiter handling.
fn parse_token_locators(raw: &[String]) -> Result<Vec<TokenLocator>, QueryError> {
    let mut locators = Vec::with_capacity(raw.len());
    for entry in raw {
        locators.extend(TokenLocator::parse_list(entry)?);
    }
    Ok(locators)
}

#[cfg(test)]
#[path = "tests/resolve_tests.rs"]
mod tests;
