//! CLI for the VDM download manager.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vdm_core::config;

use commands::{run_check, run_download};

/// Top-level CLI for the VDM download manager.
#[derive(Debug, Parser)]
#[command(name = "vdm")]
#[command(about = "VDM: manifest-driven bulk video download manager", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Process a manifest: download every row and write back statuses.
    Run {
        /// Path to the manifest workbook (JSON).
        manifest: PathBuf,

        /// Root destination directory (default: current directory).
        #[arg(long)]
        root: Option<PathBuf>,

        /// Output workbook path (default: manifest base name + "_processed").
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate a manifest and report its sheets and rows, downloading nothing.
    Check {
        /// Path to the manifest workbook (JSON).
        manifest: PathBuf,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run {
                manifest,
                root,
                output,
            } => {
                let root = match root {
                    Some(dir) => dir,
                    None => std::env::current_dir()?,
                };
                run_download(&cfg, &manifest, &root, output).await?;
            }
            CliCommand::Check { manifest } => run_check(&cfg, &manifest)?,
        }

        Ok(())
    }
}
