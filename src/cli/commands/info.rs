//! Info command implementation

use anyhow::Result;
use clap::{ArgMatches, Command};

use crate::config::Config;

pub fn command() -> Command {
    Command::new("info").about("Show tool information").arg(
        clap::Arg::new("detailed")
            .short('d')
            .long("detailed")
            .help("Show detailed information")
            .action(clap::ArgAction::SetTrue),
    )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let detailed = matches.get_flag("detailed");

    println!("apidocs - OpenAPI normalization, mocking and publishing");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "Remote sources: {}",
        if cfg!(feature = "http") { "enabled" } else { "disabled" }
    );

    if detailed {
        println!("\nDetailed Information:");
        println!(
            "  - Swagger 2.0 documents are upgraded to OpenAPI {}",
            apidocs_document::NORMALIZED_VERSION
        );
        println!("  - 200/201 responses get synthesized `auto_example` payloads");
        println!("  - Other responses get an error example");
        println!("  - Documents are persisted as <spec_directory>/<namespace>-<name>.json");
        println!("\nConfiguration files searched:");
        for path in Config::search_paths() {
            println!("  - {}", path.display());
        }
    }

    Ok(())
}
