//! Mock command implementation

use crate::cli::utils;
use anyhow::{Context, Result};
use apidocs_mock::MockPipeline;
use clap::{ArgMatches, Command};
use tracing::info;

pub fn command() -> Command {
    Command::new("mock")
        .about("Normalize a document and attach synthesized response examples")
        .arg(
            clap::Arg::new("input")
                .help("OpenAPI or Swagger document (JSON or YAML)")
                .value_name("FILE")
                .required(true),
        )
        .arg(utils::config_arg())
        .arg(utils::output_arg())
        .arg(utils::format_arg())
        .arg(utils::seed_arg())
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let config = utils::load_config(matches)?;
    let content = utils::read_input(matches)?;

    info!("Mocking document with seed {}", config.mock.seed);
    let pipeline = MockPipeline::new(config.mock);
    let output = pipeline.run(&content).context("Failed to mock document")?;

    utils::write_output(matches, &output)
}
