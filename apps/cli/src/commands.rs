use std::io::{self, Write};

use query_core::{
    format_records, resolve_sort, EventSource, MintFilterOptions, MintsQuery, OutputMode,
    ResolveFilter, SaleFilterOptions, SalesQuery,
};
use serde_json::Value;
use shared::{
    domain::{MintSortKey, SaleSortKey},
    error::QueryError,
};

use crate::cli::{Command, MintsArgs, OutputArgs, SalesArgs};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    Count(usize),
    Rendered(String),
}

impl CommandOutput {
    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        match self {
            CommandOutput::Count(count) => writeln!(out, "{count}"),
            CommandOutput::Rendered(text) if text.is_empty() || text.ends_with('\n') => {
                out.write_all(text.as_bytes())
            }
            CommandOutput::Rendered(text) => writeln!(out, "{text}"),
        }
    }
}

pub async fn run(command: &Command, source: &dyn EventSource) -> Result<CommandOutput, QueryError> {
    match command {
        Command::Mints(args) => run_mints(args, source).await,
        Command::Sales(args) => run_sales(args, source).await,
    }
}

pub async fn run_mints(
    args: &MintsArgs,
    source: &dyn EventSource,
) -> Result<CommandOutput, QueryError> {
    let sort = resolve_sort::<MintSortKey>(args.sort.as_deref(), args.asc, args.desc)?;
    let where_ = MintFilterOptions {
        collection: args.collection.clone(),
        minter: args.address.clone(),
    }
    .resolve_filter()?;

    let records = MintsQuery::new(where_, sort, args.output.limit)
        .run(source)
        .await?;
    render(&records, &args.output)
}

pub async fn run_sales(
    args: &SalesArgs,
    source: &dyn EventSource,
) -> Result<CommandOutput, QueryError> {
    let sort = resolve_sort::<SaleSortKey>(args.sort.as_deref(), args.asc, args.desc)?;
    let where_ = SaleFilterOptions {
        collection: args.collection.clone(),
        seller: args.seller.clone(),
        token: args.token.clone(),
    }
    .resolve_filter()?;

    let records = SalesQuery::new(where_, sort, args.output.limit)
        .run(source)
        .await?;
    render(&records, &args.output)
}

fn render(records: &[Value], output: &OutputArgs) -> Result<CommandOutput, QueryError> {
    if output.count {
        return Ok(CommandOutput::Count(records.len()));
    }

    let mode = if output.csv {
        OutputMode::Csv
    } else {
        OutputMode::Json
    };
    let rendered = format_records(records, output.fields.as_deref(), !output.no_header, mode)?;
    Ok(CommandOutput::Rendered(rendered))
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
