use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let api_key = std::env::var("STREAMDEX_TMDB_KEY")
        .context("STREAMDEX_TMDB_KEY must be set (TMDB API v3 key)")?;

    let catalog = match std::env::var("STREAMDEX_TMDB_BASE_URL") {
        Ok(base_url) => streamdex_catalog::tmdb::CatalogClient::with_base_url(api_key, base_url),
        Err(_) => streamdex_catalog::tmdb::CatalogClient::new(api_key),
    };

    // Favorites storage: use STREAMDEX_DB env or default. An unusable
    // database is not fatal; favorites fall back to in-memory for this run.
    let db_path = std::env::var("STREAMDEX_DB").unwrap_or_else(|_| "streamdex.db".to_string());
    let pool = match streamdex_db::connect(&db_path).await {
        Ok(pool) => match streamdex_db::migrate::run(&pool).await {
            Ok(()) => {
                info!(db_path = %db_path, "favorites storage ready");
                Some(pool)
            }
            Err(e) => {
                warn!(error = %e, "migrations failed, favorites are in-memory only");
                None
            }
        },
        Err(e) => {
            warn!(error = %e, db_path = %db_path, "database unavailable, favorites are in-memory only");
            None
        }
    };

    let favorites = streamdex_db::favorites::FavoritesStore::open(pool).await;

    let app_state = streamdex_server::state::AppState {
        catalog: std::sync::Arc::new(catalog),
        favorites: std::sync::Arc::new(favorites),
        player: std::sync::Arc::new(streamdex_player::session::SessionManager::new()),
    };

    let app = streamdex_server::routes::build_router(app_state);

    let bind_addr = std::env::var("STREAMDEX_BIND").unwrap_or_else(|_| "0.0.0.0:8970".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .context("failed to bind")?;
    info!(addr = %bind_addr, "server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
