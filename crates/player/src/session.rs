use std::collections::HashMap;

use tokio::sync::Mutex;
use tracing::info;

use crate::PlayerError;
use crate::embed::{self, PlaybackTarget};

/// Where a playback session is in the provider-selection flow.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Dismissed; nothing on screen.
    Idle,
    /// The provider picker is open.
    ChoosingProvider,
    /// A provider was picked and the embed frame is up.
    ProviderChosen { provider: String, url: String },
}

pub struct PlaybackSession {
    pub id: String,
    pub target: PlaybackTarget,
    pub state: SessionState,
}

/// Tracks open playback sessions. A session advances
/// `ChoosingProvider → ProviderChosen`, drops back to `Idle` on dismiss and
/// restarts at `ChoosingProvider` on reopen. No retries, no timeouts.
pub struct SessionManager {
    sessions: Mutex<HashMap<String, PlaybackSession>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Open a new session; the provider picker starts open.
    pub async fn create(&self, target: PlaybackTarget) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let session = PlaybackSession {
            id: id.clone(),
            target,
            state: SessionState::ChoosingProvider,
        };
        self.sessions.lock().await.insert(id.clone(), session);
        info!(session_id = %id, "playback session created");
        id
    }

    /// Pick a provider for a session whose picker is open; returns the embed
    /// URL. A failed URL build (show target without episode coordinates)
    /// leaves the picker open.
    pub async fn choose(
        &self,
        session_id: &str,
        provider_name: &str,
    ) -> Result<String, PlayerError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| PlayerError::SessionNotFound(session_id.into()))?;

        if session.state != SessionState::ChoosingProvider {
            return Err(PlayerError::NotChoosing);
        }

        let provider = embed::find_provider(provider_name)
            .ok_or_else(|| PlayerError::UnknownProvider(provider_name.into()))?;
        let url = provider.embed_url(&session.target)?;

        session.state = SessionState::ProviderChosen {
            provider: provider.name.to_string(),
            url: url.clone(),
        };
        info!(session_id, provider = provider.name, "embed provider chosen");
        Ok(url)
    }

    /// Close the picker or the frame; the session stays around for reopen.
    pub async fn dismiss(&self, session_id: &str) -> Result<(), PlayerError> {
        self.with_session(session_id, |s| s.state = SessionState::Idle)
            .await
    }

    /// Start the picker over, whatever the previous state was.
    pub async fn reopen(&self, session_id: &str) -> Result<(), PlayerError> {
        self.with_session(session_id, |s| s.state = SessionState::ChoosingProvider)
            .await
    }

    pub async fn state(&self, session_id: &str) -> Result<SessionState, PlayerError> {
        let sessions = self.sessions.lock().await;
        sessions
            .get(session_id)
            .map(|s| s.state.clone())
            .ok_or_else(|| PlayerError::SessionNotFound(session_id.into()))
    }

    async fn with_session(
        &self,
        session_id: &str,
        apply: impl FnOnce(&mut PlaybackSession),
    ) -> Result<(), PlayerError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| PlayerError::SessionNotFound(session_id.into()))?;
        apply(session);
        Ok(())
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamdex_core::types::MediaKind;

    fn movie_target() -> PlaybackTarget {
        PlaybackTarget {
            media_id: 27205,
            kind: MediaKind::Movie,
            season: None,
            episode: None,
        }
    }

    #[tokio::test]
    async fn create_choose_dismiss_reopen_cycle() {
        let mgr = SessionManager::new();
        let sid = mgr.create(movie_target()).await;
        assert_eq!(mgr.state(&sid).await.unwrap(), SessionState::ChoosingProvider);

        let url = mgr.choose(&sid, "Server 1").await.unwrap();
        assert_eq!(url, "https://embed.su/embed/movie/27205");
        assert!(matches!(
            mgr.state(&sid).await.unwrap(),
            SessionState::ProviderChosen { .. }
        ));

        mgr.dismiss(&sid).await.unwrap();
        assert_eq!(mgr.state(&sid).await.unwrap(), SessionState::Idle);

        mgr.reopen(&sid).await.unwrap();
        assert_eq!(mgr.state(&sid).await.unwrap(), SessionState::ChoosingProvider);

        let url = mgr.choose(&sid, "Server 4").await.unwrap();
        assert_eq!(url, "https://player.autoembed.cc/embed/movie/27205");
    }

    #[tokio::test]
    async fn choose_requires_an_open_picker() {
        let mgr = SessionManager::new();
        let sid = mgr.create(movie_target()).await;

        mgr.choose(&sid, "Server 1").await.unwrap();
        let err = mgr.choose(&sid, "Server 2").await.unwrap_err();
        assert!(matches!(err, PlayerError::NotChoosing));

        mgr.dismiss(&sid).await.unwrap();
        let err = mgr.choose(&sid, "Server 2").await.unwrap_err();
        assert!(matches!(err, PlayerError::NotChoosing));
    }

    #[tokio::test]
    async fn unknown_provider_and_session_are_rejected() {
        let mgr = SessionManager::new();
        let sid = mgr.create(movie_target()).await;

        let err = mgr.choose(&sid, "Server 9").await.unwrap_err();
        assert!(matches!(err, PlayerError::UnknownProvider(_)));

        let err = mgr.choose("nope", "Server 1").await.unwrap_err();
        assert!(matches!(err, PlayerError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn failed_url_build_leaves_picker_open() {
        let mgr = SessionManager::new();
        let sid = mgr
            .create(PlaybackTarget {
                media_id: 1396,
                kind: MediaKind::Show,
                season: None,
                episode: None,
            })
            .await;

        let err = mgr.choose(&sid, "Server 1").await.unwrap_err();
        assert!(matches!(err, PlayerError::MissingEpisode));
        assert_eq!(mgr.state(&sid).await.unwrap(), SessionState::ChoosingProvider);
    }
}
