use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the dice battle engine.
///
/// State transitions themselves never fail; errors only come from loading
/// content and configuration, from the dice port, and from the worker channels.
#[derive(Debug, Error)]
pub enum BattleEngineError {
    /// Error related to move catalog lookup or loading
    #[error("move data error: {0}")]
    MoveData(#[from] MoveDataError),
    /// A dice roll was rejected or could not be produced
    #[error("roll error: {0}")]
    Roll(#[from] RollError),
    /// Error loading or parsing configuration
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// The battle worker is no longer receiving commands
    #[error("battle worker command channel closed")]
    CommandChannelClosed,
    /// The battle worker dropped a reply
    #[error("battle worker reply channel closed")]
    ReplyChannelClosed,
    /// The battle worker or one of its turn tasks panicked or was aborted
    #[error("battle task did not complete: {0}")]
    WorkerJoin(#[source] tokio::task::JoinError),
    /// The host supplied something the battle cannot be built from
    #[error("battle setup failed: {0}")]
    Setup(String),
    /// The battle outcome could not be encoded for the host
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors related to the move catalog
#[derive(Debug, Error)]
pub enum MoveDataError {
    /// The specified move was not found in the catalog
    #[error("move not found: {0}")]
    MoveNotFound(String),
    /// The same move name appears twice in a catalog source
    #[error("duplicate move definition: {0}")]
    DuplicateMove(String),
    /// Catalog source could not be read
    #[error("failed to read move catalog {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Catalog source is not valid RON
    #[error("malformed move catalog: {0}")]
    Malformed(#[from] ron::error::SpannedError),
}

/// Errors surfaced by a dice implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RollError {
    /// The requested range is empty
    #[error("invalid roll range {min}..={max}")]
    InvalidRange { min: u8, max: u8 },
    /// A scripted dice source ran out of outcomes
    #[error("dice exhausted while rolling for: {0}")]
    Exhausted(String),
    /// The roll was rejected by whoever throws the dice
    #[error("roll rejected: {0}")]
    Rejected(String),
}

/// Errors related to loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Malformed(#[from] ron::error::SpannedError),
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using MoveDataError
pub type MoveDataResult<T> = Result<T, MoveDataError>;
