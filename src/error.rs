//! Error types for the duel engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DuelError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid character: {0}")]
    InvalidCharacter(String),

    #[error("Invalid card index {index} (hand holds {hand_size} cards)")]
    InvalidCardIndex { index: usize, hand_size: usize },

    #[error("Effect of {card} failed: {reason}")]
    EffectFailure { card: String, reason: String },

    #[error("Resource missing: {0}")]
    ResourceMissing(String),

    #[error("Invalid game action: {0}")]
    InvalidAction(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for DuelError {
    fn from(err: serde_json::Error) -> Self {
        DuelError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DuelError>;
