use std::sync::Mutex;

use super::*;
use async_trait::async_trait;
use clap::Parser;
use serde_json::json;
use shared::{
    domain::{PageRequest, SortDirection, SortSpec, TokenLocator},
    protocol::{MintsWhere, SalesWhere},
};

use crate::cli::Cli;

struct RecordingSource {
    total: usize,
    mint_calls: Mutex<Vec<(MintsWhere, SortSpec<MintSortKey>, PageRequest)>>,
    sale_calls: Mutex<Vec<(SalesWhere, SortSpec<SaleSortKey>, PageRequest)>>,
}

impl RecordingSource {
    fn with_total(total: usize) -> Self {
        Self {
            total,
            mint_calls: Mutex::new(Vec::new()),
            sale_calls: Mutex::new(Vec::new()),
        }
    }

    fn page(&self, kind: &str, page: PageRequest) -> Vec<Value> {
        let end = (page.offset + page.limit).min(self.total);
        let start = page.offset.min(end);
        (start..end)
            .map(|index| json!({ kind: { "tokenId": index.to_string(), "blockNumber": index } }))
            .collect()
    }

    fn request_count(&self) -> usize {
        self.mint_calls.lock().expect("lock").len() + self.sale_calls.lock().expect("lock").len()
    }
}

#[async_trait]
impl EventSource for RecordingSource {
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
        Ok(self.page("mint", page))
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
        Ok(self.page("sale", page))
    }
}

fn command(args: &[&str]) -> Command {
    let argv = std::iter::once("nft-events").chain(args.iter().copied());
    Cli::try_parse_from(argv).expect("parse").command
}

#[tokio::test]
async fn conflicting_directions_fail_before_any_request() {
    let source = RecordingSource::with_total(10);
    let err = run(&command(&["mints", "--asc", "--desc"]), &source)
        .await
        .expect_err("should fail");
    assert!(matches!(err, QueryError::InvalidOptionCombination));
    assert_eq!(source.request_count(), 0);
}

#[tokio::test]
async fn unknown_sort_field_fails_before_any_request() {
    let source = RecordingSource::with_total(10);
    let err = run(&command(&["mints", "--sort", "eth"]), &source)
        .await
        .expect_err("should fail");
    assert!(err.to_string().contains("'eth'"), "{err}");
    assert_eq!(source.request_count(), 0);
}

#[tokio::test]
async fn malformed_token_fails_before_any_request() {
    let source = RecordingSource::with_total(10);
    let err = run(&command(&["sales", "--token", "0xABC:5,0xDEF"]), &source)
        .await
        .expect_err("should fail");
    assert!(matches!(err, QueryError::MalformedTokenLocator { ref raw } if raw == "0xDEF"));
    assert_eq!(source.request_count(), 0);
}

#[tokio::test]
async fn mints_command_uses_resolved_filter_and_sort() {
    let source = RecordingSource::with_total(10);
    let output = run(
        &command(&[
            "mints",
            "--collection",
            "0xc1,0xc2",
            "--sort",
            "id",
            "--asc",
            "--count",
        ]),
        &source,
    )
    .await
    .expect("run");
    assert_eq!(output, CommandOutput::Count(10));

    let calls = source.mint_calls.lock().expect("lock");
    let (where_, sort, page) = &calls[0];
    assert_eq!(
        where_,
        &MintsWhere {
            collection_addresses: Some(vec!["0xc1".into(), "0xc2".into()]),
            minter_addresses: None,
        }
    );
    assert_eq!(sort.sort_key, MintSortKey::TokenId);
    assert_eq!(sort.sort_direction, SortDirection::Asc);
    assert_eq!(*page, PageRequest { offset: 0, limit: 100 });
}

#[tokio::test]
async fn sales_command_sends_token_locators() {
    let source = RecordingSource::with_total(3);
    run(
        &command(&["sales", "--token", "0xABC:5,0xDEF-7", "--sort", "eth", "--count"]),
        &source,
    )
    .await
    .expect("run");

    let calls = source.sale_calls.lock().expect("lock");
    let (where_, sort, _) = &calls[0];
    assert_eq!(
        where_.tokens,
        Some(vec![
            TokenLocator::new("0xABC", "5"),
            TokenLocator::new("0xDEF", "7")
        ])
    );
    assert_eq!(sort.sort_key, SaleSortKey::EthPrice);
    assert_eq!(sort.sort_direction, SortDirection::Desc);
}

#[tokio::test]
async fn count_reports_untruncated_aggregate() {
    let source = RecordingSource::with_total(10_000);
    let output = run(&command(&["sales", "-l", "250", "--count"]), &source)
        .await
        .expect("run");
    assert_eq!(output, CommandOutput::Count(400));
}

#[tokio::test]
async fn limit_above_ceiling_is_clamped() {
    let source = RecordingSource::with_total(20_000);
    let output = run(&command(&["mints", "--limit", "50000", "--count"]), &source)
        .await
        .expect("run");
    assert_eq!(output, CommandOutput::Count(10_200));
}

#[tokio::test]
async fn csv_output_honors_fields_and_header_flag() {
    let source = RecordingSource::with_total(2);
    let output = run(
        &command(&["mints", "--csv", "-F", "mint.tokenId,mint.blockNumber", "--no-header"]),
        &source,
    )
    .await
    .expect("run");
    assert_eq!(output, CommandOutput::Rendered("0,0\n1,1\n".into()));
}

#[tokio::test]
async fn json_is_the_default_output() {
    let source = RecordingSource::with_total(1);
    let output = run(&command(&["sales", "-F", "sale.tokenId"]), &source)
        .await
        .expect("run");
    let CommandOutput::Rendered(text) = output else {
        panic!("expected rendered output");
    };
    let parsed: Value = serde_json::from_str(&text).expect("json");
    assert_eq!(parsed, json!([{ "sale.tokenId": "0" }]));
}

#[test]
fn output_is_written_with_a_trailing_newline() {
    let mut buffer = Vec::new();
    CommandOutput::Count(42).write_to(&mut buffer).expect("write");
    CommandOutput::Rendered("[]".into())
        .write_to(&mut buffer)
        .expect("write");
    CommandOutput::Rendered("a\n".into())
        .write_to(&mut buffer)
        .expect("write");
    CommandOutput::Rendered(String::new())
        .write_to(&mut buffer)
        .expect("write");
    assert_eq!(String::from_utf8(buffer).expect("utf8"), "42\n[]\na\n");
}
