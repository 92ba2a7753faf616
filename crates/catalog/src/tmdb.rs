//! TMDB (The Movie Database) catalog client.
//!
//! Uses TMDB API v3: https://developer.themoviedb.org/docs

use tracing::debug;

use streamdex_core::types::{Category, MediaKind};

use crate::{
    CastMember, CatalogError, EpisodeDetail, MediaDetail, MediaSummary, ProductionCompany,
    SeasonDetail, Trailer,
};

const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

pub struct CatalogClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl CatalogClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Point the client at a different provider base URL (tests, proxies).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            client: reqwest::Client::new(),
        }
    }

    async fn get_json(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, CatalogError> {
        let mut all_params = vec![("api_key", self.api_key.as_str()), ("language", "en-US")];
        all_params.extend_from_slice(params);

        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "provider request");

        let resp = self
            .client
            .get(&url)
            .query(&all_params)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound);
        }

        if !resp.status().is_success() {
            return Err(CatalogError::Remote(format!(
                "provider returned {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| CatalogError::Remote(format!("parse JSON: {e}")))
    }

    /// GET that retries the same id against the movie endpoint when a show
    /// lookup 404s. Mis-typed ids are silently reclassified instead of
    /// surfacing the 404; the returned kind is the one the payload actually
    /// belongs to. Movie lookups never fall back.
    async fn get_json_with_show_fallback(
        &self,
        kind: MediaKind,
        path: impl Fn(MediaKind) -> String,
        params: &[(&str, &str)],
    ) -> Result<(MediaKind, serde_json::Value), CatalogError> {
        match self.get_json(&path(kind), params).await {
            Err(CatalogError::NotFound) if kind == MediaKind::Show => {
                debug!("show lookup 404, retrying id as movie");
                let data = self.get_json(&path(MediaKind::Movie), params).await?;
                Ok((MediaKind::Movie, data))
            }
            other => other.map(|data| (kind, data)),
        }
    }

    /// First provider page of a fixed category listing. Every returned record
    /// is tagged with the requested kind.
    pub async fn list_by_category(
        &self,
        kind: MediaKind,
        category: Category,
    ) -> Result<Vec<MediaSummary>, CatalogError> {
        let data = self
            .get_json(
                &format!("/{}/{}", kind.provider_segment(), category.as_str()),
                &[("page", "1")],
            )
            .await?;

        let results = data["results"].as_array().cloned().unwrap_or_default();
        Ok(results.iter().map(|r| parse_summary(r, kind)).collect())
    }

    /// Full detail record from three concurrent provider calls (base detail,
    /// credits, videos), joined all-or-fail.
    pub async fn get_detail(&self, id: i64, kind: MediaKind) -> Result<MediaDetail, CatalogError> {
        let ((resolved, detail), (_, credits), (_, videos)) = tokio::try_join!(
            self.get_json_with_show_fallback(
                kind,
                |k| format!("/{}/{id}", k.provider_segment()),
                &[],
            ),
            self.get_json_with_show_fallback(
                kind,
                |k| format!("/{}/{id}/credits", k.provider_segment()),
                &[],
            ),
            self.get_json_with_show_fallback(
                kind,
                |k| format!("/{}/{id}/videos", k.provider_segment()),
                &[],
            ),
        )?;

        Ok(parse_detail(&detail, &credits, &videos, resolved))
    }

    /// Season record for a show. 404 stays a 404 here; the movie fallback is
    /// meaningless for seasons.
    pub async fn get_season(
        &self,
        show_id: i64,
        season_number: i64,
    ) -> Result<SeasonDetail, CatalogError> {
        let data = self
            .get_json(&format!("/tv/{show_id}/season/{season_number}"), &[])
            .await?;
        Ok(parse_season(&data))
    }

    /// Multi search across movies and shows. Other provider result kinds
    /// (person, …) are dropped; output is sorted by descending popularity.
    pub async fn search(&self, query: &str) -> Result<Vec<MediaSummary>, CatalogError> {
        let data = self
            .get_json(
                "/search/multi",
                &[("query", query), ("page", "1"), ("include_adult", "false")],
            )
            .await?;

        let results = data["results"].as_array().cloned().unwrap_or_default();
        Ok(normalize_search_results(&results))
    }
}

fn normalize_search_results(results: &[serde_json::Value]) -> Vec<MediaSummary> {
    let mut hits: Vec<(f64, MediaSummary)> = results
        .iter()
        .filter_map(|r| {
            let kind = match r["media_type"].as_str() {
                Some("movie") => MediaKind::Movie,
                Some("tv") => MediaKind::Show,
                _ => return None,
            };
            let popularity = r["popularity"].as_f64().unwrap_or(0.0);
            Some((popularity, parse_summary(r, kind)))
        })
        .collect();

    hits.sort_by(|a, b| b.0.total_cmp(&a.0));
    hits.into_iter().map(|(_, summary)| summary).collect()
}

fn parse_summary(r: &serde_json::Value, kind: MediaKind) -> MediaSummary {
    let (title_field, date_field) = match kind {
        MediaKind::Movie => ("title", "release_date"),
        MediaKind::Show => ("name", "first_air_date"),
    };

    MediaSummary {
        id: r["id"].as_i64().unwrap_or(0),
        title: r[title_field].as_str().unwrap_or("Unknown").to_string(),
        kind,
        image_path: r["poster_path"].as_str().map(|s| s.to_string()),
        backdrop_path: r["backdrop_path"].as_str().map(|s| s.to_string()),
        overview: r["overview"].as_str().map(|s| s.to_string()),
        vote_average: r["vote_average"].as_f64(),
        release_date: r[date_field].as_str().map(|s| s.to_string()),
    }
}

fn parse_detail(
    detail: &serde_json::Value,
    credits: &serde_json::Value,
    videos: &serde_json::Value,
    kind: MediaKind,
) -> MediaDetail {
    let (title_field, date_field) = match kind {
        MediaKind::Movie => ("title", "release_date"),
        MediaKind::Show => ("name", "first_air_date"),
    };

    let runtime_minutes = match kind {
        MediaKind::Movie => detail["runtime"].as_i64(),
        // Shows report a list of typical episode runtimes; take the first.
        MediaKind::Show => detail["episode_run_time"]
            .as_array()
            .and_then(|a| a.first())
            .and_then(|v| v.as_i64()),
    };

    MediaDetail {
        id: detail["id"].as_i64().unwrap_or(0),
        title: detail[title_field].as_str().unwrap_or("Unknown").to_string(),
        kind,
        image_path: detail["poster_path"].as_str().map(|s| s.to_string()),
        backdrop_path: detail["backdrop_path"].as_str().map(|s| s.to_string()),
        overview: detail["overview"].as_str().map(|s| s.to_string()),
        tagline: detail["tagline"]
            .as_str()
            .filter(|t| !t.is_empty())
            .map(|s| s.to_string()),
        vote_average: detail["vote_average"].as_f64(),
        release_date: detail[date_field].as_str().map(|s| s.to_string()),
        genres: detail["genres"]
            .as_array()
            .map(|gs| {
                gs.iter()
                    .filter_map(|g| g["name"].as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default(),
        runtime_minutes,
        season_count: detail["number_of_seasons"].as_i64(),
        episode_count: detail["number_of_episodes"].as_i64(),
        cast: extract_cast(credits),
        production_companies: detail["production_companies"]
            .as_array()
            .map(|cs| {
                cs.iter()
                    .filter_map(|c| {
                        c["name"].as_str().map(|name| ProductionCompany {
                            name: name.to_string(),
                            logo_path: c["logo_path"].as_str().map(|s| s.to_string()),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default(),
        trailers: extract_videos(videos),
    }
}

fn extract_cast(credits: &serde_json::Value) -> Vec<CastMember> {
    let Some(cast) = credits["cast"].as_array() else {
        return Vec::new();
    };

    cast.iter()
        .take(20)
        .map(|person| CastMember {
            id: person["id"].as_i64().unwrap_or(0),
            name: person["name"].as_str().unwrap_or("").to_string(),
            character: person["character"].as_str().map(|s| s.to_string()),
            profile_path: person["profile_path"].as_str().map(|s| s.to_string()),
        })
        .collect()
}

fn extract_videos(videos: &serde_json::Value) -> Vec<Trailer> {
    let Some(results) = videos["results"].as_array() else {
        return Vec::new();
    };

    results
        .iter()
        .filter_map(|v| {
            Some(Trailer {
                key: v["key"].as_str()?.to_string(),
                site: v["site"].as_str().unwrap_or("").to_string(),
                video_type: v["type"].as_str().unwrap_or("").to_string(),
            })
        })
        .collect()
}

fn parse_season(data: &serde_json::Value) -> SeasonDetail {
    let episodes = data["episodes"].as_array().cloned().unwrap_or_default();

    SeasonDetail {
        season_number: data["season_number"].as_i64().unwrap_or(0),
        name: data["name"].as_str().map(|s| s.to_string()),
        overview: data["overview"].as_str().map(|s| s.to_string()),
        air_date: data["air_date"].as_str().map(|s| s.to_string()),
        episodes: episodes
            .iter()
            .map(|ep| EpisodeDetail {
                episode_number: ep["episode_number"].as_i64().unwrap_or(0),
                name: ep["name"].as_str().map(|s| s.to_string()),
                overview: ep["overview"].as_str().map(|s| s.to_string()),
                air_date: ep["air_date"].as_str().map(|s| s.to_string()),
                runtime_minutes: ep["runtime"].as_i64(),
                still_path: ep["still_path"].as_str().map(|s| s.to_string()),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_movie_detail_from_json() {
        let detail = serde_json::json!({
            "id": 27205,
            "title": "Inception",
            "overview": "A thief who steals corporate secrets...",
            "tagline": "Your mind is the scene of the crime.",
            "release_date": "2010-07-16",
            "runtime": 148,
            "vote_average": 8.4,
            "poster_path": "/poster.jpg",
            "backdrop_path": "/backdrop.jpg",
            "genres": [
                { "id": 28, "name": "Action" },
                { "id": 878, "name": "Science Fiction" }
            ],
            "production_companies": [
                { "name": "Warner Bros.", "logo_path": "/wb.png" }
            ]
        });
        let credits = serde_json::json!({
            "cast": [
                { "id": 6193, "name": "Leonardo DiCaprio", "character": "Cobb", "profile_path": "/leo.jpg" }
            ]
        });
        let videos = serde_json::json!({
            "results": [
                { "key": "teaser1", "site": "YouTube", "type": "Teaser" },
                { "key": "trailer1", "site": "YouTube", "type": "Trailer" }
            ]
        });

        let media = parse_detail(&detail, &credits, &videos, MediaKind::Movie);
        assert_eq!(media.title, "Inception");
        assert_eq!(media.kind, MediaKind::Movie);
        assert_eq!(media.release_date.as_deref(), Some("2010-07-16"));
        assert_eq!(media.runtime_minutes, Some(148));
        assert_eq!(media.season_count, None);
        assert_eq!(media.genres, vec!["Action", "Science Fiction"]);
        assert_eq!(media.cast.len(), 1);
        assert_eq!(media.cast[0].character.as_deref(), Some("Cobb"));
        assert_eq!(media.production_companies[0].name, "Warner Bros.");
        assert_eq!(media.trailer().unwrap().key, "trailer1");
    }

    #[test]
    fn parse_show_detail_reads_show_fields() {
        let detail = serde_json::json!({
            "id": 1396,
            "name": "Breaking Bad",
            "first_air_date": "2008-01-20",
            "episode_run_time": [47, 60],
            "number_of_seasons": 5,
            "number_of_episodes": 62,
            "vote_average": 9.5,
            "tagline": ""
        });
        let credits = serde_json::json!({});
        let videos = serde_json::json!({});

        let media = parse_detail(&detail, &credits, &videos, MediaKind::Show);
        assert_eq!(media.title, "Breaking Bad");
        assert_eq!(media.kind, MediaKind::Show);
        assert_eq!(media.release_date.as_deref(), Some("2008-01-20"));
        assert_eq!(media.runtime_minutes, Some(47));
        assert_eq!(media.season_count, Some(5));
        assert_eq!(media.episode_count, Some(62));
        // Empty tagline normalizes to absent.
        assert_eq!(media.tagline, None);
        assert!(media.cast.is_empty());
        assert!(media.trailer().is_none());
    }

    #[test]
    fn summary_normalizes_title_per_kind() {
        let movie = serde_json::json!({
            "id": 1, "title": "Heat", "release_date": "1995-12-15", "poster_path": "/h.jpg"
        });
        let show = serde_json::json!({
            "id": 2, "name": "The Wire", "first_air_date": "2002-06-02"
        });

        let m = parse_summary(&movie, MediaKind::Movie);
        assert_eq!(m.title, "Heat");
        assert_eq!(m.kind, MediaKind::Movie);
        assert_eq!(m.image_path.as_deref(), Some("/h.jpg"));

        let s = parse_summary(&show, MediaKind::Show);
        assert_eq!(s.title, "The Wire");
        assert_eq!(s.kind, MediaKind::Show);
        assert_eq!(s.release_date.as_deref(), Some("2002-06-02"));
    }

    #[test]
    fn search_results_drop_people_and_sort_by_popularity() {
        let results = vec![
            serde_json::json!({
                "id": 10, "media_type": "movie", "title": "Batman", "popularity": 55.0
            }),
            serde_json::json!({
                "id": 11, "media_type": "person", "name": "Christian Bale", "popularity": 99.0
            }),
            serde_json::json!({
                "id": 12, "media_type": "tv", "name": "Batman: The Animated Series", "popularity": 80.5
            }),
        ];

        let normalized = normalize_search_results(&results);
        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized[0].id, 12);
        assert_eq!(normalized[0].kind, MediaKind::Show);
        assert_eq!(normalized[0].title, "Batman: The Animated Series");
        assert_eq!(normalized[1].id, 10);
        assert_eq!(normalized[1].kind, MediaKind::Movie);
    }

    #[test]
    fn parse_season_with_episodes() {
        let data = serde_json::json!({
            "season_number": 1,
            "name": "Season 1",
            "air_date": "2008-01-20",
            "episodes": [
                {
                    "episode_number": 1,
                    "name": "Pilot",
                    "overview": "A chemistry teacher...",
                    "air_date": "2008-01-20",
                    "runtime": 58,
                    "still_path": "/e1.jpg"
                },
                {
                    "episode_number": 2,
                    "name": "Cat's in the Bag...",
                    "runtime": 48
                }
            ]
        });

        let season = parse_season(&data);
        assert_eq!(season.season_number, 1);
        assert_eq!(season.episodes.len(), 2);
        assert_eq!(season.episodes[0].name.as_deref(), Some("Pilot"));
        assert_eq!(season.episodes[0].runtime_minutes, Some(58));
        assert_eq!(season.episodes[1].episode_number, 2);
        assert_eq!(season.episodes[1].still_path, None);
    }
}
