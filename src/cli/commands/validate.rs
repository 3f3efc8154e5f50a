//! Validate command implementation

use crate::cli::utils;
use crate::ValidationOutcome;
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};
use tracing::info;

pub fn command() -> Command {
    Command::new("validate")
        .about("Check that a document is structurally sound")
        .arg(
            clap::Arg::new("input")
                .help("OpenAPI or Swagger document (JSON or YAML)")
                .value_name("FILE")
                .required(true),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    info!("Validating document");

    let content = utils::read_input(matches)?;

    match ValidationOutcome::check_text(&content) {
        ValidationOutcome::Valid(summary) => {
            println!("Document is valid!");
            println!("Version: {}", summary.spec_version);
            println!("Title: {} ({})", summary.title, summary.api_version);
            println!("Paths: {}", summary.path_count);
            println!("Operations: {}", summary.operation_count);
            println!("Schemas: {}", summary.schema_count);
            Ok(())
        }
        ValidationOutcome::Invalid { warning } => Err(anyhow!("Document is invalid: {}", warning)),
    }
}
