use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use streamdex_catalog::CatalogError;
use streamdex_core::error::{ApiError, ErrorEnvelope};
use streamdex_player::PlayerError;

/// Newtype wrapper so we can implement `IntoResponse` in this crate.
pub struct AppError(pub ApiError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let envelope = ErrorEnvelope::from(&self.0);
        (status, Json(envelope)).into_response()
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        Self(e)
    }
}

/// Every remote-fetch failure is terminal for that one request: no retry, no
/// backoff. A post-fallback 404 renders as not-found, everything else as an
/// upstream error the caller may re-trigger.
impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        let api = match e {
            CatalogError::NotFound => ApiError::NotFound("title not found".into()),
            CatalogError::Remote(msg) => ApiError::Upstream(msg),
            CatalogError::Network(msg) => ApiError::Upstream(format!("network: {msg}")),
        };
        Self(api)
    }
}

impl From<PlayerError> for AppError {
    fn from(e: PlayerError) -> Self {
        let api = match e {
            PlayerError::SessionNotFound(_) => ApiError::NotFound(e.to_string()),
            PlayerError::UnknownProvider(_)
            | PlayerError::MissingEpisode
            | PlayerError::NotChoosing => ApiError::BadRequest(e.to_string()),
        };
        Self(api)
    }
}
