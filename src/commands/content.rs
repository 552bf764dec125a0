//! Content CLI commands: show and save individual documents.

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::documents::{
    Banner, CarouselSlide, Collaborator, Event, Footer, FooterSite, Poster, PosterPage,
};
use crate::sync::{SaveOutcome, SyncEngine};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// The document kinds addressable from the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ContentKind {
    Banners,
    PostersIndex,
    PostersCn,
    PostersEvents,
    Events,
    Collaborators,
    FooterGlobal,
    FooterCn,
    Carousel,
}

#[derive(Args)]
pub struct ContentCommand {
    #[command(subcommand)]
    pub command: ContentSubcommand,
}

#[derive(Subcommand)]
pub enum ContentSubcommand {
    /// Show a document from the local cache
    Show {
        /// Document kind
        #[arg(value_enum)]
        kind: ContentKind,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Replace a document from a JSON file
    Save {
        /// Document kind
        #[arg(value_enum)]
        kind: ContentKind,

        /// Path to the JSON file holding the new document
        #[arg(long, short)]
        file: PathBuf,
    },
}

impl ContentCommand {
    pub async fn run(&self, engine: &mut SyncEngine) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ContentSubcommand::Show { kind, format } => show(engine, *kind, format),
            ContentSubcommand::Save { kind, file } => save(engine, *kind, file).await,
        }
    }
}

fn show(
    engine: &SyncEngine,
    kind: ContentKind,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let value = match kind {
        ContentKind::Banners => serde_json::to_value(engine.get_banners())?,
        ContentKind::PostersIndex => serde_json::to_value(engine.get_posters(PosterPage::Index))?,
        ContentKind::PostersCn => serde_json::to_value(engine.get_posters(PosterPage::Cn))?,
        ContentKind::PostersEvents => serde_json::to_value(engine.get_posters(PosterPage::Events))?,
        ContentKind::Events => serde_json::to_value(engine.get_events())?,
        ContentKind::Collaborators => serde_json::to_value(engine.get_collaborators())?,
        ContentKind::FooterGlobal => serde_json::to_value(engine.get_footer(FooterSite::Global))?,
        ContentKind::FooterCn => serde_json::to_value(engine.get_footer(FooterSite::Cn))?,
        ContentKind::Carousel => serde_json::to_value(engine.get_carousel())?,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&value)?),
        OutputFormat::Text => {
            match &value {
                serde_json::Value::Array(items) => {
                    println!("{} item(s)", items.len());
                    println!();
                }
                _ => {}
            }
            println!("{}", serde_json::to_string_pretty(&value)?);
            if let Some(version) = engine.get_data_version() {
                println!();
                println!("Data version: {}", version);
            }
        }
    }
    Ok(())
}

async fn save(
    engine: &mut SyncEngine,
    kind: ContentKind,
    file: &PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(file)?;

    let outcome = match kind {
        ContentKind::Banners => {
            let banners: Vec<Banner> = serde_json::from_str(&contents)?;
            engine.save_banners(&banners).await
        }
        ContentKind::PostersIndex => {
            let posters: Vec<Poster> = serde_json::from_str(&contents)?;
            engine.save_posters(PosterPage::Index, &posters).await
        }
        ContentKind::PostersCn => {
            let posters: Vec<Poster> = serde_json::from_str(&contents)?;
            engine.save_posters(PosterPage::Cn, &posters).await
        }
        ContentKind::PostersEvents => {
            let posters: Vec<Poster> = serde_json::from_str(&contents)?;
            engine.save_posters(PosterPage::Events, &posters).await
        }
        ContentKind::Events => {
            let events: Vec<Event> = serde_json::from_str(&contents)?;
            engine.save_events(&events).await
        }
        ContentKind::Collaborators => {
            let collaborators: Vec<Collaborator> = serde_json::from_str(&contents)?;
            engine.save_collaborators(&collaborators).await
        }
        ContentKind::FooterGlobal => {
            let footer: Footer = serde_json::from_str(&contents)?;
            engine.save_footer(FooterSite::Global, &footer).await
        }
        ContentKind::FooterCn => {
            let footer: Footer = serde_json::from_str(&contents)?;
            engine.save_footer(FooterSite::Cn, &footer).await
        }
        ContentKind::Carousel => {
            let slides: Vec<CarouselSlide> = serde_json::from_str(&contents)?;
            engine.save_carousel(&slides).await
        }
    };

    report_outcome(&outcome);
    Ok(())
}

/// Prints a save outcome. The local write always succeeded by this
/// point; only the remote half varies.
pub fn report_outcome(outcome: &SaveOutcome) {
    println!("  ✓ {} saved locally", outcome.key);
    match &outcome.remote {
        Ok(write) => {
            println!("  ✓ pushed to remote (revision {})", write.sha);
            println!("  ✓ data version {}", write.data_version);
        }
        Err(e) => {
            println!("  ✗ remote push failed: {}", e);
            println!("    Local changes are kept; run the save again to retry.");
        }
    }
}
