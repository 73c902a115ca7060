//! Core types for game sessions and turn results.

use serde::{Deserialize, Serialize};
use shakmaty::Color;

/// Configuration for one side's agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Provider family identifier, resolved through the registry.
    pub provider: String,
    /// Concrete model id passed to the provider factory.
    pub model: String,
    /// Free-text personality the agent plays as.
    pub personality: String,
}

/// Reason a game has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameOverReason {
    #[serde(rename = "checkmate")]
    Checkmate,
    #[serde(rename = "stalemate")]
    Stalemate,
    #[serde(rename = "insufficient material")]
    InsufficientMaterial,
    #[serde(rename = "fifty-move rule")]
    FiftyMoveRule,
    #[serde(rename = "threefold repetition")]
    ThreefoldRepetition,
}

impl GameOverReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameOverReason::Checkmate => "checkmate",
            GameOverReason::Stalemate => "stalemate",
            GameOverReason::InsufficientMaterial => "insufficient material",
            GameOverReason::FiftyMoveRule => "fifty-move rule",
            GameOverReason::ThreefoldRepetition => "threefold repetition",
        }
    }
}

impl std::fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side's recorded text for a single ply (reasoning or dialogue).
#[derive(Debug, Clone, Serialize)]
pub struct SideEntry {
    pub player: String,
    pub text: String,
}

/// Outcome of one `play_turn` invocation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TurnResult {
    /// A move was validated and applied.
    Success {
        #[serde(rename = "move")]
        mv: String,
        thoughts: String,
        dialogue: String,
        fen: String,
        is_check: bool,
        is_checkmate: bool,
        is_stalemate: bool,
        is_repetition: bool,
        is_fifty_moves: bool,
        is_game_over: bool,
        result: Option<String>,
    },
    /// The game was already over before the turn started.
    GameOver {
        result: String,
        reason: GameOverReason,
        fen: String,
    },
    /// The turn failed; board and history are untouched and the session
    /// remains valid for a retry.
    Error { error: String, fen: String },
}

/// Lowercase side name as recorded in history entries.
pub fn side_name(color: Color) -> &'static str {
    match color {
        Color::White => "white",
        Color::Black => "black",
    }
}
