use clap::{Args, Subcommand, ValueEnum};

use crate::config::Config;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Write a starter config file with the current values
    Init,
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!("data_dir: {}", config.data_dir.value.display());
                        println!("  source: {}", config.data_dir.source);
                        println!();

                        println!("remote:");
                        println!("  owner: {}", config.remote.owner);
                        println!("  repo: {}", config.remote.repo);
                        println!("  branch: {}", config.remote.branch);
                        println!("  content_dir: {}", config.remote.content_dir);
                        println!("  api_base: {}", config.remote.api_base);
                        println!("  public_base: {}", config.remote.public_base());
                        println!(
                            "  token: {}",
                            if config.remote.token.is_some() {
                                "configured"
                            } else {
                                "not configured"
                            }
                        );
                    }
                }
                Ok(())
            }
            ConfigSubcommand::Init => {
                let path = Config::default_config_path();
                if path.exists() {
                    return Err(format!("config file already exists: {}", path.display()).into());
                }
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }

                let starter = format!(
                    "data_dir: {}\nremote:\n  owner: {}\n  repo: {}\n  branch: {}\n  content_dir: {}\n  api_base: {}\n",
                    config.data_dir.value.display(),
                    config.remote.owner,
                    config.remote.repo,
                    config.remote.branch,
                    config.remote.content_dir,
                    config.remote.api_base,
                );
                std::fs::write(&path, starter)?;
                println!("✓ Wrote {}", path.display());
                Ok(())
            }
        }
    }
}
