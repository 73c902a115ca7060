//! Turn orchestration engine for LLM-vs-LLM chess games.
//!
//! Two language-model-driven agents alternate turns on a single authoritative
//! board. Each turn asks the acting agent's provider for free-form reasoning,
//! then for a structured move decision, interprets the untrusted response into
//! a legal move, applies it exactly once, and classifies the outcome
//! (check, checkmate, stalemate, fifty-move rule, threefold repetition).
//!
//! The crate deliberately owns nothing beyond orchestration: chess rules come
//! from `shakmaty`, move quality comes from the providers, and durability is
//! left to the caller via the [`game::SessionStore`] interface.

pub mod error;
pub mod game;
pub mod provider;

pub use error::{Error, Result};
pub use game::{
    AgentConfig, ChessAgent, GameOverReason, GameSession, InMemorySessionStore, PositionContext,
    SessionManager, SessionStore, TurnResult,
};
pub use provider::{LlmProvider, OpenAiCompatProvider, ProviderConfig, ProviderRegistry};
