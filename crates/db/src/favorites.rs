use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use streamdex_core::types::MediaKind;
use tokio::sync::Mutex;
use tracing::warn;

use crate::kv;

/// Durable key the favorites sequence is persisted under.
pub const FAVORITES_KEY: &str = "favorites";

/// Minimal persisted record for a favorited title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub id: i64,
    pub title: String,
    pub backdrop_path: String,
    pub kind: MediaKind,
}

/// The favorites sequence: one ordered list, canonical in memory, written
/// through to a single kv row as a JSON blob on every mutation.
///
/// This is the single source of truth for "is this title favorited":
/// membership is decided by id equality, never by title. Ids are unique
/// within the sequence, enforced by filter-then-append in [`toggle`].
///
/// Storage failures degrade to memory-only for the rest of the session and
/// are never surfaced to callers.
///
/// [`toggle`]: FavoritesStore::toggle
pub struct FavoritesStore {
    pool: Option<SqlitePool>,
    records: Mutex<Vec<FavoriteRecord>>,
}

impl FavoritesStore {
    /// Open the store, loading whatever is persisted. A missing key, corrupt
    /// JSON or unavailable storage all start the session empty.
    pub async fn open(pool: Option<SqlitePool>) -> Self {
        let records = match &pool {
            Some(pool) => match kv::get(pool, FAVORITES_KEY).await {
                Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                    warn!(error = %e, "persisted favorites are corrupt, starting empty");
                    Vec::new()
                }),
                Ok(None) => Vec::new(),
                Err(e) => {
                    warn!(error = %e, "favorites storage unavailable, starting empty");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Self {
            pool,
            records: Mutex::new(records),
        }
    }

    /// Current sequence, in insertion order.
    pub async fn load(&self) -> Vec<FavoriteRecord> {
        self.records.lock().await.clone()
    }

    /// Replace the sequence in full. No merge semantics; last writer wins.
    pub async fn save(&self, records: Vec<FavoriteRecord>) {
        let mut guard = self.records.lock().await;
        *guard = records;
        self.persist(&guard).await;
    }

    pub async fn is_favorite(&self, id: i64) -> bool {
        self.records.lock().await.iter().any(|r| r.id == id)
    }

    /// Remove the record with this id if present, append otherwise; a single
    /// read-modify-write under the lock. Returns whether the title is
    /// favorited after the call.
    pub async fn toggle(&self, record: FavoriteRecord) -> bool {
        let mut guard = self.records.lock().await;
        let before = guard.len();
        guard.retain(|r| r.id != record.id);
        let favorited = guard.len() == before;
        if favorited {
            guard.push(record);
        }
        self.persist(&guard).await;
        favorited
    }

    /// Remove by id, preserving the relative order of remaining entries.
    /// Returns whether anything was removed.
    pub async fn remove(&self, id: i64) -> bool {
        let mut guard = self.records.lock().await;
        let before = guard.len();
        guard.retain(|r| r.id != id);
        let removed = guard.len() != before;
        if removed {
            self.persist(&guard).await;
        }
        removed
    }

    async fn persist(&self, records: &[FavoriteRecord]) {
        let Some(pool) = &self.pool else {
            return;
        };

        let encoded = match serde_json::to_string(records) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(error = %e, "failed to encode favorites");
                return;
            }
        };

        if let Err(e) = kv::set(pool, FAVORITES_KEY, &encoded).await {
            warn!(error = %e, "failed to persist favorites, keeping in-memory state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: i64) -> FavoriteRecord {
        FavoriteRecord {
            id,
            title: format!("Title {id}"),
            backdrop_path: format!("/backdrop_{id}.jpg"),
            kind: MediaKind::Movie,
        }
    }

    async fn test_pool() -> SqlitePool {
        let pool = crate::connect(":memory:").await.unwrap();
        crate::migrate::run(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn toggle_is_its_own_inverse() {
        let store = FavoritesStore::open(None).await;

        assert!(store.toggle(rec(1)).await);
        assert_eq!(store.load().await, vec![rec(1)]);

        assert!(!store.toggle(rec(1)).await);
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn repeated_toggles_alternate_strictly() {
        let store = FavoritesStore::open(None).await;

        for round in 0..6 {
            let favorited = store.toggle(rec(7)).await;
            assert_eq!(favorited, round % 2 == 0);
            assert_eq!(store.is_favorite(7).await, favorited);
        }
    }

    #[tokio::test]
    async fn remove_preserves_relative_order() {
        let store = FavoritesStore::open(None).await;
        store.save(vec![rec(1), rec(2), rec(3)]).await;

        assert!(store.remove(2).await);
        assert_eq!(store.load().await, vec![rec(1), rec(3)]);

        assert!(store.remove(1).await);
        assert_eq!(store.load().await, vec![rec(3)]);

        // Removing an absent id is a no-op.
        assert!(!store.remove(99).await);
        assert_eq!(store.load().await, vec![rec(3)]);
    }

    #[tokio::test]
    async fn membership_is_by_id_not_title() {
        let store = FavoritesStore::open(None).await;
        let mut same_title = rec(2);
        same_title.title = "Title 1".to_string();
        store.save(vec![rec(1), same_title]).await;

        assert!(store.is_favorite(2).await);
        assert!(store.remove(1).await);
        assert!(store.is_favorite(2).await);
    }

    #[tokio::test]
    async fn save_overwrites_in_full() {
        let store = FavoritesStore::open(None).await;
        store.save(vec![rec(1), rec(2)]).await;
        store.save(vec![rec(3)]).await;

        assert_eq!(store.load().await, vec![rec(3)]);
    }

    #[tokio::test]
    async fn favorites_survive_reopen() {
        let pool = test_pool().await;

        let store = FavoritesStore::open(Some(pool.clone())).await;
        store.toggle(rec(42)).await;
        drop(store);

        let reopened = FavoritesStore::open(Some(pool)).await;
        assert_eq!(reopened.load().await, vec![rec(42)]);
    }

    #[tokio::test]
    async fn corrupt_persisted_value_degrades_to_empty() {
        let pool = test_pool().await;
        kv::set(&pool, FAVORITES_KEY, "{not json").await.unwrap();

        let store = FavoritesStore::open(Some(pool.clone())).await;
        assert!(store.load().await.is_empty());

        // The store still works (and repairs the key) after degrading.
        store.toggle(rec(5)).await;
        let raw = kv::get(&pool, FAVORITES_KEY).await.unwrap().unwrap();
        let decoded: Vec<FavoriteRecord> = serde_json::from_str(&raw).unwrap();
        assert_eq!(decoded, vec![rec(5)]);
    }
}
