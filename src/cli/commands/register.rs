//! Register command implementation

use crate::cli::utils;
use crate::{OpenApiSpecResource, SpecRegistry, SpecStatus};
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info};

pub fn command() -> Command {
    Command::new("register")
        .about("Acquire, mock and persist the documents described by resource files")
        .arg(
            clap::Arg::new("resources")
                .help("Resource files (YAML or JSON) naming the documents to publish")
                .value_name("FILE")
                .num_args(1..)
                .required(true),
        )
        .arg(utils::config_arg())
        .arg(
            clap::Arg::new("spec-directory")
                .long("spec-directory")
                .help("Directory persisted documents are written to")
                .value_name("DIR"),
        )
        .arg(
            clap::Arg::new("external-url")
                .long("external-url")
                .help("Public base URL for published documents")
                .value_name("URL"),
        )
        .arg(
            clap::Arg::new("port")
                .long("port")
                .help("Port used in cluster-local URLs")
                .value_parser(clap::value_parser!(u16))
                .value_name("PORT"),
        )
        .arg(utils::seed_arg())
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let config = utils::load_config(matches)?;
    let registry = Arc::new(SpecRegistry::new(config)?);

    let paths: Vec<PathBuf> = matches
        .get_many::<String>("resources")
        .ok_or_else(|| anyhow!("No resource files given"))?
        .map(PathBuf::from)
        .collect();

    info!("Registering {} resource(s)", paths.len());

    let mut tasks = JoinSet::new();
    for path in paths {
        let registry = Arc::clone(&registry);
        tasks.spawn(async move {
            let outcome = match OpenApiSpecResource::from_file(&path).await {
                Ok(resource) => registry.register(&resource).await,
                Err(e) => Err(e),
            };
            (path, outcome)
        });
    }

    let mut failed = 0;
    while let Some(joined) = tasks.join_next().await {
        let (path, outcome) = joined?;
        let status = SpecStatus::from_outcome(outcome.as_deref());

        if let Err(e) = &outcome {
            failed += 1;
            error!("Failed to register {:?}: {}", path, e);
        }

        println!("{}: {}", path.display(), serde_json::to_string(&status)?);
        if let Ok(record) = &outcome {
            println!("  spec: {}", record.spec_url);
            println!("  file: {}", record.file_path.display());
            if let Some(warning) = record.validation.warning() {
                println!("  warning: {warning}");
            }
        }
    }

    if failed > 0 {
        return Err(anyhow!("{} registration(s) failed", failed));
    }

    println!("Published {} spec(s)", registry.len().await);
    Ok(())
}
