//! Document key enumeration for the site content documents.

/// The named content documents the engine manages.
///
/// A key owns both its local storage name and its remote file name; no
/// other component maps between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocKey {
    Banners,
    PostersIndex,
    PostersCn,
    PostersEvents,
    Events,
    Collaborators,
    FooterGlobal,
    FooterCn,
    Carousel,
}

impl DocKey {
    /// Every known document key, in sync order.
    pub const ALL: [DocKey; 9] = [
        DocKey::Banners,
        DocKey::PostersIndex,
        DocKey::PostersCn,
        DocKey::PostersEvents,
        DocKey::Events,
        DocKey::Collaborators,
        DocKey::FooterGlobal,
        DocKey::FooterCn,
        DocKey::Carousel,
    ];

    /// Remote file stem: `{slug}.json` on both the API and the mirror.
    pub fn slug(&self) -> &'static str {
        match self {
            DocKey::Banners => "banners",
            DocKey::PostersIndex => "posters_index",
            DocKey::PostersCn => "posters_cn",
            DocKey::PostersEvents => "posters_events",
            DocKey::Events => "events",
            DocKey::Collaborators => "collaborators",
            DocKey::FooterGlobal => "footer_global",
            DocKey::FooterCn => "footer_cn",
            DocKey::Carousel => "carousel",
        }
    }

    /// Local store key (file stem in the data directory).
    pub fn storage_key(&self) -> &'static str {
        match self {
            DocKey::Banners => "livegigs_banners",
            DocKey::PostersIndex => "livegigs_posters_index",
            DocKey::PostersCn => "livegigs_posters_cn",
            DocKey::PostersEvents => "livegigs_posters_events",
            DocKey::Events => "livegigs_events",
            DocKey::Collaborators => "livegigs_collaborators",
            DocKey::FooterGlobal => "livegigs_footer_global",
            DocKey::FooterCn => "livegigs_footer_cn",
            DocKey::Carousel => "livegigs_carousel",
        }
    }
}

impl std::fmt::Display for DocKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// Which poster page a poster set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosterPage {
    Index,
    Cn,
    Events,
}

impl PosterPage {
    pub fn doc_key(&self) -> DocKey {
        match self {
            PosterPage::Index => DocKey::PostersIndex,
            PosterPage::Cn => DocKey::PostersCn,
            PosterPage::Events => DocKey::PostersEvents,
        }
    }
}

/// Which site a footer document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterSite {
    Global,
    Cn,
}

impl FooterSite {
    pub fn doc_key(&self) -> DocKey {
        match self {
            FooterSite::Global => DocKey::FooterGlobal,
            FooterSite::Cn => DocKey::FooterCn,
        }
    }
}
