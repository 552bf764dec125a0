use serde::{Deserialize, Serialize};

/// One tile in a poster grid page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Poster {
    pub image: String,
    pub title: String,
    pub link: String,
}

impl Poster {
    /// The three-placeholder set a poster page shows before any content
    /// has been published for it.
    pub fn placeholder_set() -> Vec<Poster> {
        (1..=3)
            .map(|n| Poster {
                image: format!("./image/poster-placeholder-{}.png", n),
                title: "Coming soon".to_string(),
                link: String::new(),
            })
            .collect()
    }
}
