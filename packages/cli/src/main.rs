#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the suburb crime rate map.
//!
//! Loads the configured datasets, runs the aggregation engine, and either
//! prints the rankings, exports the annotated boundaries as `GeoJSON`, or
//! drops into an interactive menu where offence categories can be toggled
//! and suburbs looked up.
//!
//! Uses `indicatif-log-bridge` (via [`crime_rate_cli_utils::init_logger`])
//! so log lines and the dataset progress bar share the terminal cleanly.

mod interactive;
mod report;
mod session;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use crime_rate_analytics::OffenceFilterState;
use crime_rate_crime_models::Offence;
use crime_rate_search::SearchDebouncer;
use crime_rate_source::MapConfig;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::session::Session;

#[derive(Parser)]
#[command(name = "crime_rate_cli", about = "Suburb crime rate map")]
struct Cli {
    /// Map configuration TOML (defaults to the embedded Perth config)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the highest and lowest crime rate suburbs
    Rank {
        /// Comma-separated offence labels to count (e.g. "Graffiti,Arson")
        #[arg(long, conflicts_with = "exclude")]
        only: Option<String>,
        /// Comma-separated offence labels to leave out
        #[arg(long)]
        exclude: Option<String>,
        /// Print the ranked view as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the in-bounds boundaries with a `crime-rate` property
    Export {
        /// Output `GeoJSON` file
        output: PathBuf,
        /// Comma-separated offence labels to count
        #[arg(long, conflicts_with = "exclude")]
        only: Option<String>,
        /// Comma-separated offence labels to leave out
        #[arg(long)]
        exclude: Option<String>,
    },
    /// Show rank and crime rate for one suburb
    Lookup {
        /// Suburb name (case-insensitive)
        name: String,
    },
    /// List suburbs whose name starts with a prefix
    Search {
        /// Name prefix
        prefix: Option<String>,
        /// Read search input line by line from stdin, debounced
        #[arg(long)]
        follow: bool,
    },
    /// List the offence categories
    Offences,
    /// Toggle offence categories and look up suburbs interactively
    Interactive,
}

fn parse_filter(
    only: Option<&str>,
    exclude: Option<&str>,
) -> Result<OffenceFilterState, Box<dyn std::error::Error>> {
    let split = |s: &str| -> Vec<String> {
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    };

    Ok(match (only, exclude) {
        (Some(only), _) => OffenceFilterState::from_labels(&split(only), false)?,
        (None, Some(exclude)) => OffenceFilterState::from_labels(&split(exclude), true)?,
        (None, None) => OffenceFilterState::all(),
    })
}

fn load_config(path: Option<&Path>) -> Result<MapConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => MapConfig::from_path(path)?,
        None => MapConfig::embedded()?,
    };
    log::info!("Using map configuration: {}", config.name);
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = crime_rate_cli_utils::init_logger();
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Interactive);

    if matches!(command, Commands::Offences) {
        for offence in Offence::all() {
            println!("{offence}");
        }
        return Ok(());
    }

    let config = load_config(cli.config.as_deref())?;
    let mut session = Session::load(config, &multi).await?;

    match command {
        Commands::Rank {
            only,
            exclude,
            json,
        } => {
            let filter = parse_filter(only.as_deref(), exclude.as_deref())?;
            let view = session.set_filter(filter);
            if json {
                println!("{}", serde_json::to_string_pretty(view)?);
            } else {
                print!("{}", report::rankings(view));
            }
        }
        Commands::Export {
            output,
            only,
            exclude,
        } => {
            let filter = parse_filter(only.as_deref(), exclude.as_deref())?;
            session.set_filter(filter);

            let collection = session.feature_collection();
            let count = collection.features.len();
            tokio::fs::write(&output, serde_json::to_string(&collection)?).await?;
            log::info!("Wrote {count} boundaries to {}", output.display());
        }
        Commands::Lookup { name } => print!("{}", report::lookup(&session, &name)),
        Commands::Search { prefix, follow } => {
            if let Some(prefix) = prefix {
                for locality in
                    crime_rate_search::filter_localities(session.engine.localities(), &prefix)
                {
                    println!("{}", locality.name);
                }
            }
            if follow {
                follow_search(&session).await?;
            }
        }
        Commands::Interactive => {
            // dialoguer prompts block, so the menu runs off the async runtime.
            tokio::task::block_in_place(|| interactive::run(&mut session))?;
        }
        Commands::Offences => {}
    }

    Ok(())
}

/// Feeds stdin lines through the debouncer and prints each settled result.
async fn follow_search(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let localities = session.engine.localities().to_vec();
    let search = session.config.search;

    let (debouncer, mut outcomes) = SearchDebouncer::spawn(
        Duration::from_millis(search.debounce_ms),
        search.min_length,
        move |text| crime_rate_search::filter_localities(&localities, text),
    );

    let printer = tokio::spawn(async move {
        while let Some(outcome) = outcomes.recv().await {
            let names: Vec<&str> = outcome.results.iter().map(|l| l.name.as_str()).collect();
            println!("{}: {}", outcome.query, names.join(", "));
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if !debouncer.input(line.trim()) {
            break;
        }
    }

    debouncer.close().await;
    printer.await?;
    Ok(())
}
