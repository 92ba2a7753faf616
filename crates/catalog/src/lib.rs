pub mod tmdb;

use serde::{Deserialize, Serialize};
use streamdex_core::types::MediaKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("provider error: {0}")]
    Remote(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("not found")]
    NotFound,
}

pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// Build a full image URL from a provider-relative path (e.g. `/abc.jpg`).
pub fn image_url(size: &str, path: &str) -> String {
    format!("{IMAGE_BASE}/{size}{path}")
}

/// Normalized listing/search entry. Movies and shows surface the same shape;
/// the field-name differences (`title`/`name`, `release_date`/`first_air_date`)
/// are resolved before this struct is built, never downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaSummary {
    pub id: i64,
    pub title: String,
    pub kind: MediaKind,
    pub image_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub overview: Option<String>,
    pub vote_average: Option<f64>,
    pub release_date: Option<String>,
}

/// Full detail record assembled from the base detail, credits and videos
/// calls. `kind` is the resolved kind: a show lookup that fell back to the
/// movie endpoint reports `movie` here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaDetail {
    pub id: i64,
    pub title: String,
    pub kind: MediaKind,
    pub image_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub vote_average: Option<f64>,
    pub release_date: Option<String>,
    pub genres: Vec<String>,
    pub runtime_minutes: Option<i64>,
    pub season_count: Option<i64>,
    pub episode_count: Option<i64>,
    pub cast: Vec<CastMember>,
    pub production_companies: Vec<ProductionCompany>,
    pub trailers: Vec<Trailer>,
}

impl MediaDetail {
    /// The playable trailer, if any: first YouTube video of type "Trailer".
    pub fn trailer(&self) -> Option<&Trailer> {
        self.trailers
            .iter()
            .find(|t| t.site == "YouTube" && t.video_type == "Trailer")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: i64,
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionCompany {
    pub name: String,
    pub logo_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trailer {
    pub key: String,
    pub site: String,
    pub video_type: String,
}

/// Season record for a show: episode list with per-episode runtime/overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonDetail {
    pub season_number: i64,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub air_date: Option<String>,
    pub episodes: Vec<EpisodeDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeDetail {
    pub episode_number: i64,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub air_date: Option<String>,
    pub runtime_minutes: Option<i64>,
    pub still_path: Option<String>,
}
