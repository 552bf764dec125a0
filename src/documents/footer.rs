use serde::{Deserialize, Serialize};

/// A social media icon link in the footer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

/// The footer document for one site (global or cn).
///
/// `Footer::default()` is the store bridge's generic skeleton (all
/// fields empty); `Footer::site_default()` is the richer document the
/// engine substitutes when no footer has been stored at all. The two
/// layers are distinct on purpose.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Footer {
    pub copyright: String,
    pub social: Vec<SocialLink>,
    pub producer: String,
}

impl Footer {
    /// The site's stock footer, used when no footer document exists.
    pub fn site_default() -> Footer {
        Footer {
            copyright: "© 2026 LIVEGIGS".to_string(),
            social: Vec::new(),
            producer: "./image/emanonent-logo.png".to_string(),
        }
    }
}
