//! `ofauth` entry point: run one batch against the OFAuth access API.

use clap::Parser;
use ofauth_client::cli::{dry_run_report, parse_batch, BatchInput, CliArgs};
use ofauth_client::config::ClientConfig;
use ofauth_client::error::CliError;
use ofauth_client::rest::RestClient;
use ofauth_client::telemetry::init_tracing;
use ofauth_core::{Dispatcher, StaticCredentials};
use tokio::io::AsyncReadExt;

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let args = CliArgs::parse();
    let config = ClientConfig::load(args.config.clone())?;
    init_tracing(config.log_format)?;

    let batch = parse_batch(&read_batch(&args.batch).await?)?;
    let credentials = config.credentials()?;

    if args.dry_run {
        let report = dry_run_report(&batch, &credentials);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let dispatcher = Dispatcher::new(RestClient::new(&config)?);
    let output = dispatcher
        .execute(
            &batch,
            &StaticCredentials::new(credentials),
            &config.failure_mode(),
        )
        .await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn read_batch(input: &BatchInput) -> Result<String, CliError> {
    match input {
        BatchInput::Stdin => {
            let mut contents = String::new();
            tokio::io::stdin().read_to_string(&mut contents).await?;
            Ok(contents)
        }
        BatchInput::File(path) => Ok(tokio::fs::read_to_string(path).await?),
    }
}
