//! webconf command line front end.
//!
//! Drives the demo device parameters against a file-backed storage image:
//! render the configuration form, submit values the way the web form would,
//! inspect what is stored, or reset to defaults.

mod file_storage;
mod params;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use webconf_core::{ConfigStore, LoadOutcome, ParameterSet, Submission};

use crate::file_storage::FileStorage;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "webconf")]
#[command(about = "Render, submit and persist device configuration parameters")]
struct Args {
    /// Storage image path
    #[arg(short, long, value_name = "PATH", default_value = "webconf.bin")]
    store: PathBuf,

    /// Storage version marker; a different marker discards stored values
    #[arg(long, default_value = params::CONFIG_VERSION)]
    config_version: String,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the form fields, optionally echoing a submission
    Render {
        /// Submitted values as id=value
        #[arg(value_parser = parse_pair)]
        values: Vec<(String, String)>,
    },
    /// Validate, apply and save submitted values
    Submit {
        /// Submitted values as id=value
        #[arg(required = true, value_parser = parse_pair)]
        values: Vec<(String, String)>,
    },
    /// Print stored values (passwords redacted)
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Restore defaults and save
    Reset,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let default_filter = if args.verbose {
        "debug"
    } else {
        "info,webconf_core=warn"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut set = params::device_parameters().context("Invalid parameter layout")?;
    let size = args.config_version.len() + set.storage_size();
    let storage = FileStorage::open(&args.store, size)
        .with_context(|| format!("Failed to open {}", args.store.display()))?;
    let mut store = ConfigStore::new(storage, args.config_version.clone());

    if store.load(&mut set)? == LoadOutcome::VersionMismatch {
        tracing::info!("No stored configuration in {}, using defaults", args.store.display());
    }

    match args.command {
        Command::Render { values } => {
            let submission = (!values.is_empty()).then(|| Submission::from_pairs(values));
            if let Some(submission) = &submission {
                set.validate(submission, params::validate);
            }
            println!("{}", set.render_fields(submission.as_ref()));
        }
        Command::Submit { values } => submit(&mut set, &mut store, values)?,
        Command::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&set.infos())?);
            } else {
                for param in set.iter().filter(|p| !p.is_separator()) {
                    println!("{}", param.debug_summary());
                }
            }
        }
        Command::Reset => {
            set.reset_to_defaults();
            store.save(&set)?;
            tracing::info!("Configuration reset to defaults");
        }
    }

    Ok(())
}

fn submit(
    set: &mut ParameterSet,
    store: &mut ConfigStore<FileStorage>,
    values: Vec<(String, String)>,
) -> anyhow::Result<()> {
    let submission = Submission::from_pairs(values);

    for id in unknown_ids(&submission, set) {
        tracing::warn!("Ignoring unknown parameter '{}'", id);
    }

    if !set.validate(&submission, params::validate) {
        for param in set.iter() {
            if let (Some(id), Some(message)) = (param.id(), param.error_message()) {
                eprintln!("{}: {}", id, message);
            }
        }
        bail!("Submission rejected");
    }

    set.apply(&submission);
    set.debug_to_log();
    store.save(set)?;
    tracing::info!(path = %store.storage().path().display(), "Configuration saved");
    Ok(())
}

/// Submitted ids that match no parameter, sorted.
fn unknown_ids<'a>(submission: &'a Submission, set: &ParameterSet) -> Vec<&'a str> {
    let mut ids: Vec<_> = submission
        .ids()
        .filter(|id| set.get(id).is_none())
        .collect();
    ids.sort_unstable();
    ids
}

/// Parse a single `id=value` argument. The value may be empty.
fn parse_pair(s: &str) -> Result<(String, String), String> {
    let (id, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected id=value, got '{}'", s))?;
    if id.is_empty() {
        return Err(format!("missing id in '{}'", s));
    }
    Ok((id.to_string(), value.to_string()))
}
