//! Game orchestration: formatting, interpretation, agents, sessions, storage.
//!
//! This module contains the whole turn pipeline. `format` renders the
//! position context, `agent` issues the two provider requests, `interpret`
//! recovers a legal move from the untrusted response, `session` owns the
//! board and applies exactly one validated move per turn, and `store` holds
//! active sessions behind per-session locks.

pub mod agent;
pub mod format;
pub mod interpret;
pub mod session;
pub mod store;
pub mod types;

pub use agent::ChessAgent;
pub use format::PositionContext;
pub use interpret::interpret_decision;
pub use session::GameSession;
pub use store::{InMemorySessionStore, SessionHandle, SessionManager, SessionStore};
pub use types::{AgentConfig, GameOverReason, SideEntry, TurnResult};
