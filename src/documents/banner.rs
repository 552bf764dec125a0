use serde::{Deserialize, Serialize};

/// One slide of the home-page banner slider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Banner {
    pub image: String,
    pub title: String,
    pub subtitle: String,
    pub link: String,
}
