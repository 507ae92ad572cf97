use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{PageRequest, SortSpec, TokenLocator};

/// `where` input for the mints query. Unset dimensions are left out of the
/// payload because the service treats an omitted list differently from an
/// empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintsWhere {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_addresses: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minter_addresses: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesWhere {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_addresses: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_addresses: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<TokenLocator>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInput {
    pub limit: usize,
    pub offset: usize,
}

impl From<PageRequest> for PaginationInput {
    fn from(page: PageRequest) -> Self {
        Self {
            limit: page.limit,
            offset: page.offset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInput {
    pub network: String,
    pub chain: String,
}

/// Always serialized as `{}`; no result filters are exposed on the command line.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct EmptyFilter {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventQueryVariables<'a, W, K> {
    #[serde(rename = "where")]
    pub where_: &'a W,
    pub filter: EmptyFilter,
    pub sort: SortSpec<K>,
    pub pagination: PaginationInput,
    pub networks: &'a [NetworkInput],
    pub include_full_details: bool,
}

#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a, V> {
    pub query: &'a str,
    pub variables: V,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
}

/// Connection object wrapping one page of opaque event records.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventConnection {
    #[serde(default)]
    pub nodes: Vec<Value>,
}
