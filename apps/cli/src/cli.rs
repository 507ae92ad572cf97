use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use shared::domain::DEFAULT_RESULT_LIMIT;

#[derive(Parser, Debug)]
#[command(name = "nft-events", version, about = "Query NFT mint and sale events")]
pub struct Cli {
    /// Path to a TOML config file (defaults to ./nft-events.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// GraphQL endpoint of the query service
    #[arg(long, global = true)]
    pub api_url: Option<String>,
    /// API key sent with every request
    #[arg(long, global = true)]
    pub api_key: Option<String>,
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Gets a list of mints and associated information
    Mints(MintsArgs),
    /// Gets a list of sales for given tokens
    Sales(SalesArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Mints(_) => "mints",
            Command::Sales(_) => "sales",
        }
    }
}

#[derive(Args, Debug)]
pub struct MintsArgs {
    /// Mints for the given minter addresses (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub address: Option<Vec<String>>,
    /// Mints for the given collections (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub collection: Option<Vec<String>>,
    /// Sort field (accepted: time, id, price, none)
    #[arg(long)]
    pub sort: Option<String>,
    /// Sort descending (default)
    #[arg(long)]
    pub desc: bool,
    /// Sort ascending (cannot be specified with --desc)
    #[arg(long)]
    pub asc: bool,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct SalesArgs {
    /// Seller addresses (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub seller: Option<Vec<String>>,
    /// Collection addresses (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub collection: Option<Vec<String>>,
    /// Tokens as <contract>:<token id> or <contract>-<token id> (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub token: Option<Vec<String>>,
    /// Sort field (accepted: eth, price, time, none)
    #[arg(long)]
    pub sort: Option<String>,
    /// Sort descending (default)
    #[arg(long)]
    pub desc: bool,
    /// Sort ascending (cannot be specified with --desc)
    #[arg(long)]
    pub asc: bool,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Limit number of results (at most 10000)
    #[arg(short, long, default_value_t = DEFAULT_RESULT_LIMIT)]
    pub limit: usize,
    /// Fields to show, as dot separated paths (comma separated)
    #[arg(short = 'F', long, value_delimiter = ',')]
    pub fields: Option<Vec<String>>,
    /// Print results as csv
    #[arg(long)]
    pub csv: bool,
    /// Print only the result count
    #[arg(long)]
    pub count: bool,
    /// No header when using csv export
    #[arg(long)]
    pub no_header: bool,
}
