use std::{io::Write, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use nft_events::{cli::Cli, commands, config::load_settings, logging};
use query_core::EventsClient;
use shared::error::QueryError;
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            let usage_error = err
                .downcast_ref::<QueryError>()
                .is_some_and(QueryError::is_usage_error);
            if usage_error {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut settings = load_settings(cli.config.as_deref())?;
    settings.apply_overrides(cli.api_url.as_deref(), cli.api_key.as_deref());

    let client =
        EventsClient::new(settings.client_config()?).context("failed to build HTTP client")?;
    info!(endpoint = %client.endpoint(), command = cli.command.name(), "running query");

    let output = commands::run(&cli.command, &client).await?;

    let mut stdout = std::io::stdout().lock();
    output
        .write_to(&mut stdout)
        .and_then(|()| stdout.flush())
        .context("failed to write output")?;
    Ok(())
}
