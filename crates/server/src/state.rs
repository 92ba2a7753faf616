use std::sync::Arc;

use streamdex_catalog::tmdb::CatalogClient;
use streamdex_db::favorites::FavoritesStore;
use streamdex_player::session::SessionManager;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogClient>,
    pub favorites: Arc<FavoritesStore>,
    pub player: Arc<SessionManager>,
}
