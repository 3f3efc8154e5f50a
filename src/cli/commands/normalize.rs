//! Normalize command implementation

use crate::cli::utils;
use anyhow::{Context, Result};
use apidocs_mock::{MockConfig, MockPipeline, OutputFormat};
use clap::{ArgMatches, Command};
use tracing::info;

pub fn command() -> Command {
    Command::new("normalize")
        .about("Upgrade a Swagger 2.0 document to OpenAPI 3.x without adding examples")
        .arg(
            clap::Arg::new("input")
                .help("OpenAPI or Swagger document (JSON or YAML)")
                .value_name("FILE")
                .required(true),
        )
        .arg(utils::output_arg())
        .arg(utils::format_arg())
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let content = utils::read_input(matches)?;
    let output_format = match matches.get_one::<String>("format") {
        Some(format) => utils::parse_format(format)?,
        None => OutputFormat::Json,
    };

    let document =
        apidocs_document::normalize_str(&content).context("Failed to normalize document")?;
    info!(
        "Normalized document to OpenAPI {}",
        document["openapi"].as_str().unwrap_or("?")
    );

    let encoder = MockPipeline::new(MockConfig {
        output_format,
        ..Default::default()
    });
    utils::write_output(matches, &encoder.encode(&document)?)
}
