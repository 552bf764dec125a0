//! Typed content documents and their keys.

mod banner;
mod carousel;
mod collaborator;
mod doc_key;
mod event;
mod footer;
mod poster;

pub use banner::Banner;
pub use carousel::CarouselSlide;
pub use collaborator::Collaborator;
pub use doc_key::{DocKey, FooterSite, PosterPage};
pub use event::Event;
pub use footer::{Footer, SocialLink};
pub use poster::Poster;
