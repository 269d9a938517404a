use crate::settings::ValidationError;
use thiserror::Error;

/// Everything that can go wrong between the arena and the outside world.
#[derive(Debug, Error)]
pub enum ArenaError {
    /// No credential was loaded, or the API rejected the one we sent.
    #[error("authentication with the completion API failed: {0}")]
    Authentication(String),

    #[error("completion API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion API returned no content")]
    EmptyCompletion,

    #[error("the battle is already over")]
    BattleOver,

    #[error("a battle is already in progress")]
    BattleInProgress,

    #[error("invalid configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("invalid settings: {0}")]
    InvalidSettings(#[from] ValidationError),

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ArenaError {
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }
}

pub type Result<T, E = ArenaError> = std::result::Result<T, E>;
