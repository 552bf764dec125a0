//! Pull command: sync every document from the public mirror.

use clap::Args;

use crate::sync::SyncEngine;

/// Pull all content from the public mirror into the local store
#[derive(Debug, Args)]
pub struct PullCommand {}

impl PullCommand {
    pub async fn run(&self, engine: &mut SyncEngine) -> Result<(), Box<dyn std::error::Error>> {
        println!("Pulling content from the public mirror...");
        println!();

        let report = engine.sync_from_remote().await;

        for key in &report.synced {
            println!("  ✓ {}", key);
        }
        for key in &report.missing {
            println!("  - {} (not published)", key);
        }
        for failure in &report.failures {
            println!("  ✗ {}: {}", failure.key, failure.error);
        }

        println!();
        println!(
            "Synced {} document(s), {} not published, {} failed.",
            report.synced.len(),
            report.missing.len(),
            report.failures.len()
        );

        if !report.failures.is_empty() {
            return Err("some documents failed to sync".into());
        }
        Ok(())
    }
}
