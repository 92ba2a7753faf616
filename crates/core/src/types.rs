use serde::{Deserialize, Serialize};

/// Discriminator between the two media shapes the provider serves.
///
/// The provider's own path segment for shows is `tv`; everywhere inside this
/// system the tag is `show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Movie,
    Show,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Show => "show",
        }
    }

    /// Path segment used when talking to the metadata provider.
    pub fn provider_segment(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Show => "tv",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(Self::Movie),
            "show" => Some(Self::Show),
            _ => None,
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog category. `Upcoming` exists only for movies, `OnTheAir` only for
/// shows; `parse_for` rejects the invalid pairings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Popular,
    TopRated,
    Upcoming,
    OnTheAir,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::TopRated => "top_rated",
            Self::Upcoming => "upcoming",
            Self::OnTheAir => "on_the_air",
        }
    }

    /// Parse a category name in the context of a media kind.
    pub fn parse_for(kind: MediaKind, s: &str) -> Option<Self> {
        let category = match s {
            "popular" => Self::Popular,
            "top_rated" => Self::TopRated,
            "upcoming" => Self::Upcoming,
            "on_the_air" => Self::OnTheAir,
            _ => return None,
        };
        if category.supports(kind) {
            Some(category)
        } else {
            None
        }
    }

    pub fn supports(self, kind: MediaKind) -> bool {
        match self {
            Self::Popular | Self::TopRated => true,
            Self::Upcoming => kind == MediaKind::Movie,
            Self::OnTheAir => kind == MediaKind::Show,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
