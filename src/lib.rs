#![doc = "notebook-sync: merge-synchronise notebooks into a Jupyter workspace."]

//! Populates a Jupyter contents workspace from two sources without ever
//! clobbering what is already there: a bundled asset tree living inside the
//! same store, and a flat directory of notebooks in a remote GitHub
//! repository. Entries already present at the destination are skipped, so
//! user edits survive re-runs.

pub mod contents;
pub mod copy;
pub mod ensure;
pub mod github;
pub mod ingest;
pub mod jupyter;
pub mod load_config;
pub mod path;
pub mod synchronise;

#[cfg(any(test, feature = "test-export-mocks"))]
pub mod memory;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::github::GitHubClient;
use crate::jupyter::JupyterClient;
use crate::load_config::load_config;
use crate::synchronise::synchronise;

/// CLI for notebook-sync: seed a Jupyter workspace with bundled and remote
/// notebooks.
#[derive(Parser)]
#[clap(
    name = "notebook-sync",
    version,
    about = "Merge bundled assets and remote GitHub notebooks into a Jupyter workspace"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the two-phase sync against the configured Jupyter server
    Sync {
        /// Path to an optional YAML config file; defaults apply without one
        #[clap(long)]
        config: Option<PathBuf>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Sync { config } => {
            let config = load_config(config)?;
            let store = JupyterClient::new(&config.jupyter_base_url, config.jupyter_token.clone());
            let remote = GitHubClient::new();

            println!("Synchronise starting...");
            // The contents service is reachable over HTTP or it is not;
            // there is no separate readiness signal to wait on here.
            match synchronise(std::future::ready(()), &store, &remote, &config.sync).await {
                Ok(report) => {
                    println!("Synchronise complete.\nReport:");
                    println!("{report:#?}");
                    Ok(())
                }
                Err(e) => {
                    eprintln!("[ERROR] Synchronisation failed: {e}");
                    Err(e.into())
                }
            }
        }
    }
}
