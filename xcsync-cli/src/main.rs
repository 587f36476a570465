//! xcsync CLI
//!
//! Keeps groups of an Xcode project in sync with directories on disk.

mod args;
mod watch;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use xcsync_core::{SyncOptions, SyncReport};

#[derive(Parser)]
#[command(name = "xcsync")]
#[command(about = "Sync Xcode project groups with directories on disk")]
#[command(version)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct PathArgs {
    /// Directory that configuration file paths are relative to
    #[arg(short, long, default_value = ".")]
    src_root: PathBuf,

    /// The .xcodeproj bundle (or its project.pbxproj)
    #[arg(short, long)]
    project: PathBuf,

    /// Configuration file (.json, .yaml or .toml)
    #[arg(short, long, default_value = "xcsync.json")]
    config: PathBuf,
}

impl PathArgs {
    fn into_options(self, dry_run: bool) -> SyncOptions {
        SyncOptions {
            src_root: self.src_root,
            project_path: self.project,
            configuration_path: self.config,
            dry_run,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Sync every configured group once
    Sync {
        #[command(flatten)]
        paths: PathArgs,

        /// Sync without writing the project file
        #[arg(long)]
        dry_run: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sync again whenever a configured directory changes
    Watch {
        #[command(flatten)]
        paths: PathArgs,

        /// Quiet period in milliseconds before a change triggers a sync
        #[arg(long, default_value_t = watch::DEFAULT_DEBOUNCE_MS)]
        debounce_ms: u64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().skip(1).collect();

    let result = if args::is_legacy_invocation(&raw_args) {
        init_logging(false);
        match args::parse_legacy(&raw_args) {
            Ok(options) => cmd_sync(options, false).await,
            Err(e) => Err(e.into()),
        }
    } else {
        let cli = Cli::parse();
        init_logging(cli.verbose);
        match cli.command {
            Commands::Sync {
                paths,
                dry_run,
                json,
            } => cmd_sync(paths.into_options(dry_run), json).await,
            Commands::Watch { paths, debounce_ms } => {
                watch::watch(watch::WatchOptions {
                    sync: paths.into_options(false),
                    debounce: Duration::from_millis(debounce_ms),
                })
                .await
            }
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("<xcsync> ERROR: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins; otherwise info (debug with `-v`) for xcsync crates
fn init_logging(verbose: bool) {
    let default_directive = if verbose { "xcsync=debug" } else { "xcsync=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run one sync pass
async fn cmd_sync(options: SyncOptions, json: bool) -> Result<()> {
    let report = tokio::task::spawn_blocking(move || xcsync_core::run(&options))
        .await
        .context("Sync task failed")??;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

pub(crate) fn print_report(report: &SyncReport) {
    for configuration in &report.configurations {
        let stats = &configuration.stats;
        println!(
            "<xcsync> Synced: {} ({} groups, {} sources, {} resources, {} localized)",
            configuration.group_path,
            stats.groups,
            stats.source_files,
            stats.resource_files,
            stats.variant_groups
        );
        if stats.unregistered_files > 0 {
            println!(
                "  {} files not added to target '{}'",
                stats.unregistered_files, configuration.target
            );
        }
    }
    if !report.persisted {
        println!("Dry run, project file not written.");
    }
}
