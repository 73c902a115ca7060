//! Crate-wide error type for game orchestration.
//!
//! Turn-level failures are folded into a structured `TurnResult` at the
//! `play_turn` boundary; this type is what flows through `?` below it.

use uuid::Uuid;

/// Comprehensive error type for orchestration operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("provider request failed: {0}")]
    Provider(String),

    #[error("provider request timed out")]
    ProviderTimeout,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no valid move generated")]
    NoMoveGenerated,

    #[error("invalid move format: {0}")]
    InvalidMoveFormat(#[from] shakmaty::uci::ParseUciMoveError),

    #[error("move {0} is not legal in current position")]
    IllegalMove(String),

    #[error("illegal UCI move: {0}")]
    IllegalUciMove(#[from] shakmaty::uci::IllegalUciMoveError),

    #[error("FEN parsing error: {0}")]
    FenParsing(#[from] shakmaty::fen::ParseFenError),

    #[error("position setup error: {0}")]
    PositionSetup(#[from] shakmaty::PositionError<shakmaty::Chess>),

    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("missing API key: {0} is not set")]
    MissingApiKey(String),
}

pub type Result<T> = std::result::Result<T, Error>;
