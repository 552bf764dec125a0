use serde::{Deserialize, Serialize};

/// One partner/collaborator logo entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Collaborator {
    pub name: String,
    pub logo: String,
    pub link: String,
}
