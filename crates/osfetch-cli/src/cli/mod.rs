//! CLI for osfetch.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use osfetch_core::config;
use osfetch_core::pipeline::Pipeline;
use std::path::PathBuf;

use commands::{run_compare, run_download, run_extract, run_files, run_get, run_updated};

/// Top-level CLI for osfetch.
#[derive(Debug, Parser)]
#[command(name = "osfetch")]
#[command(about = "Download, unpack and freshness-check data files hosted on the OSF", long_about = None)]
pub struct Cli {
    /// Use this config file instead of ~/.config/osfetch/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download, extract, and compare the remote date with the local copy.
    Get {
        /// Filename from the configured table, or a raw resource key.
        target: String,
        /// Destination path (default: ./<filename or key>).
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Keep the downloaded tarball as is.
        #[arg(long)]
        no_extract: bool,
    },

    /// Download only, verifying the byte count.
    Download {
        /// Filename from the configured table, or a raw resource key.
        target: String,
        /// Destination path (default: ./<filename or key>).
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Unpack a tarball next to itself and delete it.
    Extract {
        /// Path to the .tar.gz / .tgz / .tar file.
        archive: PathBuf,
    },

    /// Print the remote "Updated" date.
    Updated {
        /// Filename from the configured table, or a raw resource key.
        target: String,
    },

    /// Compare the remote "Updated" date with the newest file under a local path.
    Compare {
        /// Filename from the configured table, or a raw resource key.
        target: String,
        /// Local directory (direct entries only) or file.
        path: PathBuf,
    },

    /// List the configured filename -> key table.
    Files,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);
        let pipeline = Pipeline::new(cfg);

        match cli.command {
            CliCommand::Get {
                target,
                output,
                no_extract,
            } => run_get(&pipeline, &target, output, !no_extract)?,
            CliCommand::Download { target, output } => run_download(&pipeline, &target, output)?,
            CliCommand::Extract { archive } => run_extract(&archive)?,
            CliCommand::Updated { target } => run_updated(&pipeline, &target)?,
            CliCommand::Compare { target, path } => run_compare(&pipeline, &target, &path)?,
            CliCommand::Files => run_files(&pipeline),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
