//! Export, import, and reset commands for the full content bundle.

use clap::Args;
use std::path::PathBuf;

use crate::sync::{ContentBundle, ImportReport, SyncEngine};

use super::content::report_outcome;

/// Export every document to a bundle file
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Output path (defaults to stdout)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl ExportCommand {
    pub fn run(&self, engine: &SyncEngine) -> Result<(), Box<dyn std::error::Error>> {
        let bundle = engine.export();
        let json = serde_json::to_string_pretty(&bundle)?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, json)?;
                println!("Exported content bundle to {}", path.display());
            }
            None => println!("{}", json),
        }
        Ok(())
    }
}

/// Apply a content bundle, field by field
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// Path to the bundle file
    pub file: PathBuf,
}

impl ImportCommand {
    pub async fn run(&self, engine: &mut SyncEngine) -> Result<(), Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(&self.file)?;
        let bundle: ContentBundle = serde_json::from_str(&contents)?;

        println!("Importing content bundle...");
        println!();

        let report = engine.import(&bundle).await;
        print_report(&report);
        Ok(())
    }
}

/// Restore every document to its default
#[derive(Debug, Args)]
pub struct ResetCommand {
    /// Skip the confirmation check
    #[arg(long)]
    pub force: bool,
}

impl ResetCommand {
    pub async fn run(&self, engine: &mut SyncEngine) -> Result<(), Box<dyn std::error::Error>> {
        if !self.force {
            return Err("reset replaces every document; re-run with --force to confirm".into());
        }

        println!("Resetting all content to defaults...");
        println!();

        let report = engine.reset().await;
        print_report(&report);
        Ok(())
    }
}

fn print_report(report: &ImportReport) {
    for outcome in &report.outcomes {
        report_outcome(outcome);
    }

    println!();
    if report.all_remote_ok() {
        println!("{} document(s) applied and pushed.", report.attempted());
    } else {
        println!(
            "{} document(s) applied locally; {} failed to push.",
            report.attempted(),
            report.remote_failures().len()
        );
    }
}
