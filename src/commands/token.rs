//! Token command: manage the bearer credential for the authenticated
//! API, stored in the local content store.

use clap::{Args, Subcommand};
use serde_json::json;

use crate::store::{ContentStore, TOKEN_KEY};

/// Manage the remote repository access token
#[derive(Debug, Args)]
pub struct TokenCommand {
    #[command(subcommand)]
    command: TokenSubcommand,
}

#[derive(Debug, Subcommand)]
enum TokenSubcommand {
    /// Store an access token
    Set {
        /// The token value
        token: String,
    },

    /// Remove the stored token
    Clear,

    /// Show whether a token is configured
    Status,
}

impl TokenCommand {
    pub fn run(&self, store: &ContentStore) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            TokenSubcommand::Set { token } => {
                if token.is_empty() {
                    return Err("token must not be empty".into());
                }
                store.set(TOKEN_KEY, &json!(token))?;
                println!("✓ Token stored");
                Ok(())
            }
            TokenSubcommand::Clear => {
                store.remove(TOKEN_KEY)?;
                println!("✓ Token cleared");
                Ok(())
            }
            TokenSubcommand::Status => {
                match resolved_token(store) {
                    Some((token, source)) => {
                        println!("Token: {} ({})", masked(&token), source);
                    }
                    None => {
                        println!("Token: not configured");
                        println!();
                        println!("Remote writes will fail until a token is set.");
                        println!("Run 'gigsync token set <token>' or set GIGSYNC_TOKEN.");
                    }
                }
                Ok(())
            }
        }
    }
}

fn resolved_token(store: &ContentStore) -> Option<(String, &'static str)> {
    if let Ok(token) = std::env::var("GIGSYNC_TOKEN") {
        if !token.is_empty() {
            return Some((token, "environment"));
        }
    }
    store.token().map(|t| (t, "stored"))
}

fn masked(token: &str) -> String {
    // Truncate by characters, not bytes; a stored token isn't
    // guaranteed to be ASCII.
    format!("{}...", token.chars().take(8).collect::<String>())
}
