use std::sync::Mutex;

use super::*;
use serde_json::json;
use shared::domain::SortDirection;

struct TestEventSource {
    total: usize,
    fail_at_offset: Option<usize>,
    mint_calls: Mutex<Vec<(MintsWhere, SortSpec<MintSortKey>, PageRequest)>>,
    sale_calls: Mutex<Vec<(SalesWhere, SortSpec<SaleSortKey>, PageRequest)>>,
}

impl TestEventSource {
    fn with_total(total: usize) -> Self {
        Self {
            total,
            fail_at_offset: None,
            mint_calls: Mutex::new(Vec::new()),
            sale_calls: Mutex::new(Vec::new()),
        }
    }

    fn failing_at(mut self, offset: usize) -> Self {
        self.fail_at_offset = Some(offset);
        self
    }

    fn page(&self, kind: &str, page: PageRequest) -> Result<Vec<Value>, QueryError> {
        if self.fail_at_offset == Some(page.offset) {
            return Err(QueryError::remote(
                shared::domain::QueryKind::Sales,
                page.offset,
                "upstream unavailable",
            ));
        }
        let end = (page.offset + page.limit).min(self.total);
        let start = page.offset.min(end);
        Ok((start..end).map(|index| json!({ kind: { "index": index } })).collect())
    }
}

#[async_trait]
impl EventSource for TestEventSource {
    async fn fetch_mints(
        &self,
        where_: &MintsWhere,
        sort: SortSpec<MintSortKey>,
        page: PageRequest,
    ) -> Result<Vec<Value>, QueryError> {
        self.mint_calls
            .lock()
            .expect("lock")
            .push((where_.clone(), sort, page));
        self.page("mint", page)
    }

    async fn fetch_sales(
        &self,
        where_: &SalesWhere,
        sort: SortSpec<SaleSortKey>,
        page: PageRequest,
    ) -> Result<Vec<Value>, QueryError> {
        self.sale_calls
            .lock()
            .expect("lock")
            .push((where_.clone(), sort, page));
        self.page("sale", page)
    }
}

#[test]
fn requested_limit_is_clamped() {
    let query = MintsQuery::new(MintsWhere::default(), SortSpec::default(), 50_000);
    assert_eq!(query.limit, 10_000);

    let query = SalesQuery::new(SalesWhere::default(), SortSpec::default(), 0);
    assert_eq!(query.limit, 1);
}

#[tokio::test]
async fn mints_query_passes_filter_and_sort_to_every_page() {
    let source = TestEventSource::with_total(350);
    let where_ = MintsWhere {
        collection_addresses: Some(vec!["0xc1".into()]),
        minter_addresses: None,
    };
    let sort = SortSpec {
        sort_key: MintSortKey::Price,
        sort_direction: SortDirection::Asc,
    };
    let query = MintsQuery::new(where_.clone(), sort, 1_000);

    let records = query.run(&source).await.expect("run");
    assert_eq!(records.len(), 350);
    assert_eq!(records[0]["mint"]["index"], 0);
    assert_eq!(records[349]["mint"]["index"], 349);

    let calls = source.mint_calls.lock().expect("lock");
    let offsets: Vec<usize> = calls.iter().map(|(_, _, page)| page.offset).collect();
    assert_eq!(offsets, vec![0, 200, 350]);
    for (call_where, call_sort, page) in calls.iter() {
        assert_eq!(call_where, &where_);
        assert_eq!(call_sort, &sort);
        assert_eq!(page.limit, 200);
    }
    assert!(source.sale_calls.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn sales_query_keeps_page_overshoot() {
    let source = TestEventSource::with_total(10_000);
    let query = SalesQuery::new(SalesWhere::default(), SortSpec::default(), 100);

    let records = query.run(&source).await.expect("run");
    assert_eq!(records.len(), 200);

    let calls = source.sale_calls.lock().expect("lock");
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|(_, _, page)| page.limit == 100));
}

#[tokio::test]
async fn remote_failure_aborts_the_query() {
    let source = TestEventSource::with_total(10_000).failing_at(400);
    let query = SalesQuery::new(SalesWhere::default(), SortSpec::default(), 1_000);

    let err = query.run(&source).await.expect_err("should fail");
    assert!(matches!(err, QueryError::RemoteFetch { offset: 400, .. }));
    assert!(!err.is_usage_error());
    assert_eq!(source.sale_calls.lock().expect("lock").len(), 3);
}
