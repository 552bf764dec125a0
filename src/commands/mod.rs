pub mod bundle_cmd;
pub mod config_cmd;
pub mod content;
pub mod pull;
pub mod token;

pub use bundle_cmd::{ExportCommand, ImportCommand, ResetCommand};
pub use config_cmd::ConfigCommand;
pub use content::ContentCommand;
pub use pull::PullCommand;
pub use token::TokenCommand;
