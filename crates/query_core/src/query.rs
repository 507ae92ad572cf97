use async_trait::async_trait;
use serde_json::Value;
use shared::{
    domain::{clamp_result_limit, MintSortKey, PageRequest, SaleSortKey, SortSpec},
    error::QueryError,
    protocol::{MintsWhere, SalesWhere},
};

use crate::pagination::aggregate;

/// One page of mint or sale events from the query service.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch_mints(
        &self,
        where_: &MintsWhere,
        sort: SortSpec<MintSortKey>,
        page: PageRequest,
    ) -> Result<Vec<Value>, QueryError>;

    async fn fetch_sales(
        &self,
        where_: &SalesWhere,
        sort: SortSpec<SaleSortKey>,
        page: PageRequest,
    ) -> Result<Vec<Value>, QueryError>;
}

#[derive(Debug, Clone)]
pub struct EventQuery<W, K> {
    pub where_: W,
    pub sort: SortSpec<K>,
    pub limit: usize,
}

pub type MintsQuery = EventQuery<MintsWhere, MintSortKey>;
pub type SalesQuery = EventQuery<SalesWhere, SaleSortKey>;

impl<W, K> EventQuery<W, K> {
    /// `requested_limit` is clamped to `1..=MAX_RESULT_LIMIT`.
    pub fn new(where_: W, sort: SortSpec<K>, requested_limit: usize) -> Self {
        Self {
            where_,
            sort,
            limit: clamp_result_limit(requested_limit),
        }
    }
}

impl MintsQuery {
    pub async fn run(&self, source: &dyn EventSource) -> Result<Vec<Value>, QueryError> {
        let where_ = &self.where_;
        let sort = self.sort;
        aggregate(
            move |page| source.fetch_mints(where_, sort, page),
            self.limit,
        )
        .await
    }
}

impl SalesQuery {
    pub async fn run(&self, source: &dyn EventSource) -> Result<Vec<Value>, QueryError> {
        let where_ = &self.where_;
        let sort = self.sort;
        aggregate(
            move |page| source.fetch_sales(where_, sort, page),
            self.limit,
        )
        .await
    }
}

#[cfg(test)]
#[path = "tests/query_tests.rs"]
mod tests;
