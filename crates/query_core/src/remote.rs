use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use shared::{
    domain::{MintSortKey, PageRequest, QueryKind, SaleSortKey, SortKey, SortSpec, MAX_PAGE_SIZE},
    error::QueryError,
    protocol::{
        EmptyFilter, EventConnection, EventQueryVariables, GraphQlRequest, GraphQlResponse,
        MintsWhere, NetworkInput, SalesWhere,
    },
};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::query::EventSource;

pub const DEFAULT_API_URL: &str = "https://api.zora.co/graphql";
const API_KEY_HEADER: &str = "X-API-KEY";

const MINTS_DOCUMENT: &str = r#"query Mints($where: MintsQueryInput, $filter: MintsQueryFilter, $sort: MintSortKeySortInput!, $pagination: PaginationInput!, $networks: [NetworkInput!], $includeFullDetails: Boolean!) {
  mints(where: $where, filter: $filter, sort: $sort, pagination: $pagination, networks: $networks) {
    nodes {
      mint {
        collectionAddress
        tokenId
        originatorAddress
        toAddress
        price {
          chainTokenPrice { decimal currency { address name decimals } }
          nativePrice { decimal }
          usdcPrice { decimal }
        }
        transactionInfo { blockNumber blockTimestamp transactionHash }
      }
      token @include(if: $includeFullDetails) { name tokenUrl }
    }
  }
}"#;

const SALES_DOCUMENT: &str = r#"query Sales($where: SalesQueryInput, $filter: SalesQueryFilter, $sort: SaleSortKeySortInput!, $pagination: PaginationInput!, $networks: [NetworkInput!], $includeFullDetails: Boolean!) {
  sales(where: $where, filter: $filter, sort: $sort, pagination: $pagination, networks: $networks) {
    nodes {
      sale {
        saleType
        collectionAddress
        tokenId
        sellerAddress
        buyerAddress
        price {
          chainTokenPrice { decimal currency { address name decimals } }
          nativePrice { decimal }
          usdcPrice { decimal }
        }
        transactionInfo { blockNumber blockTimestamp transactionHash }
      }
      token @include(if: $includeFullDetails) { name tokenUrl }
    }
  }
}"#;

fn document_for(kind: QueryKind) -> &'static str {
    match kind {
        QueryKind::Mints => MINTS_DOCUMENT,
        QueryKind::Sales => SALES_DOCUMENT,
    }
}

#[derive(Debug, Error)]
pub enum RemoteResponseError {
    #[error("query service returned errors: {0}")]
    GraphQl(String),
    #[error("response is missing `data.{0}`")]
    MissingData(QueryKind),
    #[error("could not decode `data.{kind}`: {source}")]
    Decode {
        kind: QueryKind,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct EventsClientConfig {
    pub api_url: Url,
    pub api_key: Option<String>,
    pub networks: Vec<NetworkInput>,
    pub request_timeout: Duration,
}

pub struct EventsClient {
    http: Client,
    endpoint: Url,
    api_key: Option<String>,
    networks: Vec<NetworkInput>,
}

impl EventsClient {
    pub fn new(config: EventsClientConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            http,
            endpoint: config.api_url,
            api_key: config.api_key,
            networks: config.networks,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetches one page of the query selected by `K`. The page limit is
    /// capped at the service maximum.
    pub async fn fetch_page<W, K>(
        &self,
        where_: &W,
        sort: SortSpec<K>,
        page: PageRequest,
    ) -> Result<Vec<Value>, QueryError>
    where
        W: Serialize + Sync,
        K: SortKey,
    {
        let kind = K::KIND;
        let offset = page.offset;
        let page = PageRequest {
            offset,
            limit: page.limit.min(MAX_PAGE_SIZE),
        };
        debug!(%kind, offset, limit = page.limit, "requesting page");

        let request = GraphQlRequest {
            query: document_for(kind),
            variables: EventQueryVariables {
                where_,
                filter: EmptyFilter::default(),
                sort,
                pagination: page.into(),
                networks: &self.networks,
                include_full_details: false,
            },
        };

        let mut builder = self.http.post(self.endpoint.clone()).json(&request);
        if let Some(api_key) = &self.api_key {
            builder = builder.header(API_KEY_HEADER, api_key);
        }

        let response: GraphQlResponse = builder
            .send()
            .await
            .map_err(|err| QueryError::remote(kind, offset, err))?
            .error_for_status()
            .map_err(|err| QueryError::remote(kind, offset, err))?
            .json()
            .await
            .map_err(|err| QueryError::remote(kind, offset, err))?;

        nodes_from_response(kind, response).map_err(|err| QueryError::remote(kind, offset, err))
    }
}

fn nodes_from_response(
    kind: QueryKind,
    response: GraphQlResponse,
) -> Result<Vec<Value>, RemoteResponseError> {
    if !response.errors.is_empty() {
        let messages = response
            .errors
            .iter()
            .map(|error| error.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(RemoteResponseError::GraphQl(messages));
    }

    let connection = response
        .data
        .and_then(|mut data| data.remove(kind.as_str()))
        .filter(|value| !value.is_null())
        .ok_or(RemoteResponseError::MissingData(kind))?;
    let connection: EventConnection = serde_json::from_value(connection)
        .map_err(|source| RemoteResponseError::Decode { kind, source })?;
    Ok(connection.nodes)
}

#[async_trait]
impl EventSource for EventsClient {
    async fn fetch_mints(
        &self,
        where_: &MintsWhere,
        sort: SortSpec<MintSortKey>,
        page: PageRequest,
    ) -> Result<Vec<Value>, QueryError> {
        self.fetch_page(where_, sort, page).await
    }

    async fn fetch_sales(
        &self,
        where_: &SalesWhere,
        sort: SortSpec<SaleSortKey>,
        page: PageRequest,
    ) -> Result<Vec<Value>, QueryError> {
        self.fetch_page(where_, sort, page).await
    }
}

#[cfg(test)]
#[path = "tests/remote_tests.rs"]
mod tests;
