use serde::{Deserialize, Serialize};

/// One event card on the events page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Event {
    pub title: String,
    pub date: String,
    pub venue: String,
    pub image: String,
    pub link: String,
}
