use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use streamdex_catalog::{MediaDetail, MediaSummary, SeasonDetail, image_url};
use streamdex_core::error::ApiError;
use streamdex_core::types::{Category, MediaKind};
use streamdex_db::favorites::FavoriteRecord;
use streamdex_player::embed::{PROVIDERS, PlaybackTarget};

use crate::error::AppError;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_router())
        .layer(TraceLayer::new_for_http())
        // The browser UI is served from a different origin.
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_router() -> Router<AppState> {
    Router::new()
        // Catalog browsing
        .route("/catalog/{kind}/{category}", get(list_catalog))
        .route("/media/{kind}/{id}", get(get_media_detail))
        .route("/shows/{id}/seasons/{season}", get(get_season))
        .route("/search", get(search))
        // Favorites
        .route("/favorites", get(list_favorites))
        .route("/favorites/toggle", post(toggle_favorite))
        .route(
            "/favorites/{id}",
            get(favorite_state).delete(remove_favorite),
        )
        // Playback
        .route("/playback/providers", get(list_providers))
        .route("/playback/sessions", post(create_playback_session))
        .route("/playback/sessions/{sid}/provider", post(choose_provider))
        .route("/playback/sessions/{sid}/dismiss", post(dismiss_session))
        .route("/playback/sessions/{sid}/reopen", post(reopen_session))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

fn parse_kind(raw: &str) -> Result<MediaKind, AppError> {
    MediaKind::parse(raw).ok_or_else(|| {
        ApiError::BadRequest(format!("kind must be 'movie' or 'show', got '{raw}'")).into()
    })
}

async fn list_catalog(
    State(state): State<AppState>,
    Path((kind, category)): Path<(String, String)>,
) -> Result<Json<Vec<MediaSummary>>, AppError> {
    let kind = parse_kind(&kind)?;
    let category = Category::parse_for(kind, &category).ok_or_else(|| {
        ApiError::BadRequest(format!("unknown category '{category}' for kind '{kind}'"))
    })?;

    let listing = state.catalog.list_by_category(kind, category).await?;
    Ok(Json(listing))
}

#[derive(Serialize)]
struct DetailResponse {
    #[serde(flatten)]
    detail: MediaDetail,
    poster_url: Option<String>,
    backdrop_url: Option<String>,
}

async fn get_media_detail(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i64)>,
) -> Result<Json<DetailResponse>, AppError> {
    let kind = parse_kind(&kind)?;
    // The client may reclassify a mis-typed show id as a movie; the response's
    // `kind` field reports the resolved kind.
    let detail = state.catalog.get_detail(id, kind).await?;

    let poster_url = detail.image_path.as_deref().map(|p| image_url("w500", p));
    let backdrop_url = detail
        .backdrop_path
        .as_deref()
        .map(|p| image_url("original", p));

    Ok(Json(DetailResponse {
        detail,
        poster_url,
        backdrop_url,
    }))
}

async fn get_season(
    State(state): State<AppState>,
    Path((id, season)): Path<(i64, i64)>,
) -> Result<Json<SeasonDetail>, AppError> {
    let season = state.catalog.get_season(id, season).await?;
    Ok(Json(season))
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<MediaSummary>>, AppError> {
    let query = params.q.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("search query must not be empty".into()).into());
    }

    let results = state.catalog.search(query).await?;
    Ok(Json(results))
}

// ---------------------------------------------------------------------------
// Favorites
// ---------------------------------------------------------------------------

async fn list_favorites(State(state): State<AppState>) -> Json<Vec<FavoriteRecord>> {
    Json(state.favorites.load().await)
}

#[derive(Serialize)]
struct FavoriteStateResponse {
    id: i64,
    favorite: bool,
}

async fn favorite_state(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Json<FavoriteStateResponse> {
    Json(FavoriteStateResponse {
        id,
        favorite: state.favorites.is_favorite(id).await,
    })
}

#[derive(Serialize)]
struct ToggleResponse {
    favorited: bool,
    favorites: Vec<FavoriteRecord>,
}

async fn toggle_favorite(
    State(state): State<AppState>,
    Json(record): Json<FavoriteRecord>,
) -> Json<ToggleResponse> {
    let favorited = state.favorites.toggle(record).await;
    Json(ToggleResponse {
        favorited,
        favorites: state.favorites.load().await,
    })
}

async fn remove_favorite(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !state.favorites.remove(id).await {
        return Err(ApiError::NotFound("favorite not found".into()).into());
    }
    Ok(Json(serde_json::json!({ "removed": true })))
}

// ---------------------------------------------------------------------------
// Playback
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ProviderInfo {
    name: &'static str,
}

async fn list_providers() -> Json<Vec<ProviderInfo>> {
    Json(
        PROVIDERS
            .iter()
            .map(|p| ProviderInfo { name: p.name })
            .collect(),
    )
}

#[derive(Deserialize)]
struct CreateSessionRequest {
    media_id: i64,
    kind: MediaKind,
    #[serde(default)]
    season: Option<i64>,
    #[serde(default)]
    episode: Option<i64>,
}

#[derive(Serialize)]
struct CreateSessionResponse {
    session_id: String,
    providers: Vec<&'static str>,
}

async fn create_playback_session(
    State(state): State<AppState>,
    Json(body): Json<CreateSessionRequest>,
) -> Json<CreateSessionResponse> {
    let target = PlaybackTarget {
        media_id: body.media_id,
        kind: body.kind,
        season: body.season,
        episode: body.episode,
    };
    let session_id = state.player.create(target).await;

    Json(CreateSessionResponse {
        session_id,
        providers: PROVIDERS.iter().map(|p| p.name).collect(),
    })
}

#[derive(Deserialize)]
struct ChooseProviderRequest {
    provider: String,
}

#[derive(Serialize)]
struct ChooseProviderResponse {
    provider: String,
    embed_url: String,
}

async fn choose_provider(
    State(state): State<AppState>,
    Path(sid): Path<String>,
    Json(body): Json<ChooseProviderRequest>,
) -> Result<Json<ChooseProviderResponse>, AppError> {
    let embed_url = state.player.choose(&sid, &body.provider).await?;
    Ok(Json(ChooseProviderResponse {
        provider: body.provider,
        embed_url,
    }))
}

async fn dismiss_session(
    State(state): State<AppState>,
    Path(sid): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.player.dismiss(&sid).await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

async fn reopen_session(
    State(state): State<AppState>,
    Path(sid): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.player.reopen(&sid).await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}
