use anyhow::{Context, Result};
use chrono::Utc;
use clap::{App, Arg};
use quill::build::build_site;
use quill::config::Config;
use std::path::PathBuf;
use tracing::{error, warn};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let matches = App::new("quill")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Builds a static site from a web novel manuscript")
        .arg(
            Arg::with_name("project")
                .short("p")
                .long("project")
                .value_name("DIR")
                .help("Directory containing quill.yaml (searched upwards; defaults to the current directory)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("DIR")
                .help("Overrides the configured output directory")
                .takes_value(true),
        )
        .get_matches();

    let project_directory = match matches.value_of("project") {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir().context("Getting the current directory")?,
    };
    let mut config = Config::from_directory(&project_directory)?;
    if let Some(output) = matches.value_of("output") {
        config = config.with_output_directory(PathBuf::from(output));
    }

    let summary = build_site(&config, Utc::now())?;
    if summary.skipped_chapters > 0 {
        warn!("{} chapters were skipped", summary.skipped_chapters);
    }
    Ok(())
}
