//! Command-line argument handling and dry-run reporting.

use crate::error::CliError;
use clap::Parser;
use ofauth_core::{plan, Batch, Credentials};
use serde_json::{json, Value};
use std::path::PathBuf;

/// Where the batch document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchInput {
    Stdin,
    File(PathBuf),
}

fn parse_batch_input(value: &str) -> Result<BatchInput, String> {
    match value {
        "" => Err("batch path must not be empty".to_string()),
        "-" => Ok(BatchInput::Stdin),
        path => Ok(BatchInput::File(PathBuf::from(path))),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "ofauth", version, about = "Run a batch against the OFAuth access API")]
pub struct CliArgs {
    /// Path to the TOML configuration file
    #[arg(long, env = "OFAUTH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Batch JSON document (or - for stdin)
    #[arg(long, value_parser = parse_batch_input)]
    pub batch: BatchInput,

    /// Print the planned requests instead of sending them
    #[arg(long)]
    pub dry_run: bool,
}

pub fn parse_batch(contents: &str) -> Result<Batch, CliError> {
    Ok(serde_json::from_str(contents)?)
}

/// Planned requests with the API key masked, one entry per record.
pub fn dry_run_report(batch: &Batch, credentials: &Credentials) -> Vec<Value> {
    plan(batch, credentials)
        .into_iter()
        .enumerate()
        .map(|(index, planned)| match planned {
            Ok(request) => json!({ "index": index, "request": request.redacted() }),
            Err(err) => json!({ "index": index, "error": err.to_string() }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(list: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("ofauth").chain(list.iter().copied()))
    }

    #[test]
    fn test_parse_full_arguments() {
        let parsed = parse(&["--config", "ofauth.toml", "--batch", "-", "--dry-run"]).unwrap();
        assert_eq!(parsed.config, Some(PathBuf::from("ofauth.toml")));
        assert_eq!(parsed.batch, BatchInput::Stdin);
        assert!(parsed.dry_run);
    }

    #[test]
    fn test_parse_batch_file() {
        let parsed = parse(&["--config", "a.toml", "--batch", "batch.json"]).unwrap();
        assert_eq!(parsed.batch, BatchInput::File(PathBuf::from("batch.json")));
        assert!(!parsed.dry_run);
    }

    #[test]
    fn test_parse_requires_batch() {
        let err = parse(&["--config", "a.toml"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
        assert!(parse(&["--batch"]).is_err());
        assert!(parse(&["--batch", ""]).is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_flag() {
        let err = parse(&["--batch", "b.json", "--retry"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_dry_run_report_masks_key() {
        let batch = parse_batch(
            r#"{
                "selectors": { "resource": "posts", "operation": "get" },
                "parameters": { "overrides": { "0": { "itemId": "p1" } } },
                "records": [{}, {}]
            }"#,
        )
        .unwrap();
        let creds = Credentials::new("very-secret", None).unwrap();
        let report = dry_run_report(&batch, &creds);
        assert_eq!(report.len(), 2);
        assert_eq!(report[0]["request"]["url"], "/v2/access/posts/p1");
        assert_eq!(report[0]["request"]["method"], "GET");
        assert_eq!(report[1]["request"]["headers"]["apiKey"], "***");
        assert!(!serde_json::to_string(&report).unwrap().contains("very-secret"));
    }

    #[test]
    fn test_dry_run_report_lists_record_errors() {
        let batch = parse_batch(
            r#"{ "selectors": { "resource": "posts", "operation": "archive" }, "records": [{}] }"#,
        )
        .unwrap();
        let creds = Credentials::new("k", None).unwrap();
        let report = dry_run_report(&batch, &creds);
        assert!(report[0]["error"]
            .as_str()
            .unwrap()
            .contains("archive"));
    }
}
