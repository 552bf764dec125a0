use serde::{Deserialize, Serialize};

/// One slide of the shared photo carousel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct CarouselSlide {
    pub image: String,
    pub caption: String,
    pub link: String,
}
