pub mod embed;
pub mod session;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("unknown embed provider: {0}")]
    UnknownProvider(String),
    #[error("season and episode are required for show playback")]
    MissingEpisode,
    #[error("playback session not found: {0}")]
    SessionNotFound(String),
    #[error("no provider choice is open for this session")]
    NotChoosing,
}
