//! CLI command implementations

use anyhow::Result;
use clap::{ArgMatches, Command};

pub mod commands;

/// Main CLI application
pub struct CliApp;

impl CliApp {
    /// Create the CLI application
    pub fn app() -> Command {
        Command::new("apidocs")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Normalize OpenAPI/Swagger documents, attach examples, and publish them")
            .subcommand_negates_reqs(true)
            .subcommand(commands::init::command())
            .subcommand(commands::register::command())
            .subcommand(commands::normalize::command())
            .subcommand(commands::mock::command())
            .subcommand(commands::validate::command())
            .subcommand(commands::info::command())
    }

    /// Run the CLI application
    pub async fn run(matches: &ArgMatches) -> Result<()> {
        match matches.subcommand() {
            Some(("init", sub_matches)) => commands::init::run(sub_matches).await,
            Some(("register", sub_matches)) => commands::register::run(sub_matches).await,
            Some(("normalize", sub_matches)) => commands::normalize::run(sub_matches).await,
            Some(("mock", sub_matches)) => commands::mock::run(sub_matches).await,
            Some(("validate", sub_matches)) => commands::validate::run(sub_matches).await,
            Some(("info", sub_matches)) => commands::info::run(sub_matches).await,
            _ => {
                // No subcommand provided, show help
                let _ = Self::app().print_help();
                Ok(())
            }
        }
    }
}

/// Common CLI utilities
pub mod utils {
    use anyhow::{anyhow, Context, Result};
    use clap::{Arg, ArgMatches};
    use std::path::{Path, PathBuf};

    use crate::config::OutputFormat;
    use crate::Config;

    pub fn config_arg() -> Arg {
        Arg::new("config")
            .short('c')
            .long("config")
            .help("Configuration file path")
            .value_name("FILE")
    }

    pub fn output_arg() -> Arg {
        Arg::new("output")
            .short('o')
            .long("output")
            .help("Write the result to FILE instead of stdout")
            .value_name("FILE")
    }

    pub fn format_arg() -> Arg {
        Arg::new("format")
            .short('f')
            .long("format")
            .help("Output format")
            .value_parser(["json", "yaml"])
            .value_name("FORMAT")
    }

    pub fn seed_arg() -> Arg {
        Arg::new("seed")
            .long("seed")
            .help("Seed for example synthesis")
            .value_parser(clap::value_parser!(u64))
            .value_name("SEED")
    }

    /// Load configuration from `--config`, the default locations, or defaults,
    /// then apply any overriding flags present on `matches`.
    pub fn load_config(matches: &ArgMatches) -> Result<Config> {
        let explicit = try_get::<String>(matches, "config").map(PathBuf::from);
        let mut config = Config::discover(explicit.as_deref())?;

        if let Some(dir) = try_get::<String>(matches, "spec-directory") {
            config.spec_directory = PathBuf::from(dir);
        }
        if let Some(url) = try_get::<String>(matches, "external-url") {
            config.external_url = Some(url);
        }
        if let Some(port) = try_get::<u16>(matches, "port") {
            config.port = port;
        }
        if let Some(seed) = try_get::<u64>(matches, "seed") {
            config.mock.seed = seed;
        }
        if let Some(format) = try_get::<String>(matches, "format") {
            config.mock.output_format = parse_format(&format)?;
        }

        config.validate()?;
        Ok(config)
    }

    fn try_get<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, id: &str) -> Option<T> {
        matches.try_get_one::<T>(id).ok().flatten().cloned()
    }

    pub fn parse_format(format: &str) -> Result<OutputFormat> {
        match format {
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            other => Err(anyhow!("Unsupported output format: {}", other)),
        }
    }

    /// Read the input document named by the `input` argument
    pub fn read_input(matches: &ArgMatches) -> Result<String> {
        let path = matches
            .get_one::<String>("input")
            .ok_or_else(|| anyhow!("No input file given"))?;
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))
    }

    /// Write `content` to `--output`, or stdout when absent
    pub fn write_output(matches: &ArgMatches, content: &str) -> Result<()> {
        match matches.get_one::<String>("output") {
            Some(path) => {
                let path = Path::new(path);
                std::fs::write(path, content)
                    .with_context(|| format!("Failed to write {path:?}"))?;
                tracing::info!("Wrote {:?}", path);
            }
            None => println!("{content}"),
        }
        Ok(())
    }
}
