//! Game session and the turn engine.
//!
//! A session owns the authoritative board, both agents, and the append-only
//! histories. `play_turn` is its sole mutating operation and is atomic: a
//! turn either applies fully (board plus all four history lists advance
//! together) or leaves everything untouched.

use chrono::{DateTime, Utc};
use log::{info, warn};
use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{Chess, Color, EnPassantMode, Position};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::provider::ProviderRegistry;

use super::agent::ChessAgent;
use super::format::PositionContext;
use super::types::{side_name, AgentConfig, GameOverReason, SideEntry, TurnResult};

/// A chess game between two LLM agents.
#[derive(Debug)]
pub struct GameSession {
    id: Uuid,
    board: Chess,
    white: ChessAgent,
    black: ChessAgent,
    move_history: Vec<String>,
    position_history: Vec<String>,
    thought_history: Vec<SideEntry>,
    dialogue_history: Vec<SideEntry>,
    created_at: DateTime<Utc>,
}

impl GameSession {
    /// Create a session from agent configurations, resolving each side's
    /// provider through the registry exactly once.
    pub fn new(
        id: Uuid,
        white: &AgentConfig,
        black: &AgentConfig,
        registry: &ProviderRegistry,
    ) -> Result<Self> {
        let white_provider = registry.resolve(&white.provider, &white.model)?;
        let black_provider = registry.resolve(&black.provider, &black.model)?;
        Ok(Self::with_agents(
            id,
            ChessAgent::new(Color::White, white.personality.clone(), white_provider),
            ChessAgent::new(Color::Black, black.personality.clone(), black_provider),
        ))
    }

    /// Create a session from already-built agents.
    pub fn with_agents(id: Uuid, white: ChessAgent, black: ChessAgent) -> Self {
        let board = Chess::default();
        let start_fen = fen_of(&board);
        Self {
            id,
            board,
            white,
            black,
            move_history: Vec::new(),
            position_history: vec![start_fen],
            thought_history: Vec::new(),
            dialogue_history: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Reconstruct a session by replaying stored move tokens through the
    /// same validated apply path the turn engine uses. A token that fails
    /// validation aborts the resume.
    pub fn resume(
        id: Uuid,
        white: &AgentConfig,
        black: &AgentConfig,
        moves: &[String],
        registry: &ProviderRegistry,
    ) -> Result<Self> {
        let mut session = Self::new(id, white, black, registry)?;
        for token in moves {
            session.apply_token(token)?;
        }
        info!("session {} resumed at ply {}", id, moves.len());
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// FEN of the current position.
    pub fn current_fen(&self) -> String {
        fen_of(&self.board)
    }

    pub fn move_history(&self) -> &[String] {
        &self.move_history
    }

    pub fn position_history(&self) -> &[String] {
        &self.position_history
    }

    pub fn thought_history(&self) -> &[SideEntry] {
        &self.thought_history
    }

    pub fn dialogue_history(&self) -> &[SideEntry] {
        &self.dialogue_history
    }

    /// Play a single turn: reasoning request, decision request, validation,
    /// apply, outcome classification. Failures are folded into
    /// `TurnResult::Error`; nothing escapes this boundary.
    pub async fn play_turn(&mut self) -> TurnResult {
        if let Some(reason) = self.game_over_reason() {
            return TurnResult::GameOver {
                result: self.result_string(reason),
                reason,
                fen: self.current_fen(),
            };
        }

        match self.run_turn().await {
            Ok(result) => result,
            Err(err) => {
                warn!("session {}: turn failed: {}", self.id, err);
                TurnResult::Error {
                    error: err.to_string(),
                    fen: self.current_fen(),
                }
            }
        }
    }

    async fn run_turn(&mut self) -> Result<TurnResult> {
        let side = self.board.turn();
        let (agent, opponent) = match side {
            Color::White => (&self.white, &self.black),
            Color::Black => (&self.black, &self.white),
        };
        let opponent_dialogue = self.dialogue_history.last().map(|e| e.text.clone());

        let context = PositionContext::new(&self.board, &self.move_history);

        let thoughts = agent
            .generate_thoughts(&context, opponent_dialogue.as_deref())
            .await?;

        let (token, dialogue) = agent
            .generate_decision(
                &context,
                &thoughts,
                opponent_dialogue.as_deref(),
                opponent.personality(),
            )
            .await?;

        if token.is_empty() {
            return Err(Error::NoMoveGenerated);
        }

        // Defensive re-check against the current legal set; the interpreter
        // already guarantees membership while the session is single-turn-exclusive.
        let uci = UciMove::from_ascii(token.as_bytes())?;
        let mv = uci.to_move(&self.board)?;
        if !self.board.legal_moves().contains(&mv) {
            return Err(Error::IllegalMove(token));
        }

        let player = side_name(side).to_string();
        self.board.play_unchecked(&mv);
        self.move_history.push(token.clone());
        self.position_history.push(self.current_fen());
        self.thought_history.push(SideEntry {
            player: player.clone(),
            text: thoughts.clone(),
        });
        self.dialogue_history.push(SideEntry {
            player,
            text: dialogue.clone(),
        });

        info!(
            "session {}: {} played {} (ply {})",
            self.id,
            side_name(side),
            token,
            self.move_history.len()
        );

        let reason = self.game_over_reason();
        Ok(TurnResult::Success {
            mv: token,
            thoughts,
            dialogue,
            fen: self.current_fen(),
            is_check: self.board.is_check(),
            is_checkmate: self.board.is_checkmate(),
            is_stalemate: self.board.is_stalemate(),
            is_repetition: self.is_threefold_repetition(),
            is_fifty_moves: self.board.halfmoves() >= 100,
            is_game_over: reason.is_some(),
            result: reason.map(|r| self.result_string(r)),
        })
    }

    /// Apply a single validated move token (used by turn replay on resume).
    fn apply_token(&mut self, token: &str) -> Result<()> {
        let uci = UciMove::from_ascii(token.as_bytes())?;
        let mv = uci.to_move(&self.board)?;
        if !self.board.legal_moves().contains(&mv) {
            return Err(Error::IllegalMove(token.to_string()));
        }
        self.board.play_unchecked(&mv);
        self.move_history.push(token.to_string());
        self.position_history.push(self.current_fen());
        Ok(())
    }

    /// Why the game is over, if it is.
    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        if self.board.is_checkmate() {
            Some(GameOverReason::Checkmate)
        } else if self.board.is_stalemate() {
            Some(GameOverReason::Stalemate)
        } else if self.board.is_insufficient_material() {
            Some(GameOverReason::InsufficientMaterial)
        } else if self.board.halfmoves() >= 100 {
            Some(GameOverReason::FiftyMoveRule)
        } else if self.is_threefold_repetition() {
            Some(GameOverReason::ThreefoldRepetition)
        } else {
            None
        }
    }

    /// True when the current piece placement appears in at least three
    /// recorded position snapshots (the current one included).
    pub fn is_threefold_repetition(&self) -> bool {
        let current = placement(&self.current_fen()).to_string();
        let count = self
            .position_history
            .iter()
            .filter(|fen| placement(fen) == current)
            .count();
        count >= 3
    }

    fn result_string(&self, reason: GameOverReason) -> String {
        match reason {
            GameOverReason::Checkmate => match self.board.turn() {
                // The side to move is the one mated.
                Color::White => "0-1".to_string(),
                Color::Black => "1-0".to_string(),
            },
            _ => "1/2-1/2".to_string(),
        }
    }
}

fn fen_of(board: &Chess) -> String {
    Fen::from_position(board.clone(), EnPassantMode::Legal).to_string()
}

/// Piece-placement component of a FEN string.
fn placement(fen: &str) -> &str {
    fen.split_whitespace().next().unwrap_or(fen)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::game::test_support::{FailingProvider, ScriptedProvider};
    use crate::game::types::AgentConfig;
    use crate::provider::{LlmProvider, ProviderRegistry};
    use std::sync::Arc;

    fn session(white: Arc<dyn LlmProvider>, black: Arc<dyn LlmProvider>) -> GameSession {
        GameSession::with_agents(
            Uuid::new_v4(),
            ChessAgent::new(Color::White, "Romantic attacker".to_string(), white),
            ChessAgent::new(Color::Black, "Cold defender".to_string(), black),
        )
    }

    fn scripted_registry(responses: &'static [&'static str]) -> ProviderRegistry {
        let registry = ProviderRegistry::new();
        registry.register(
            "scripted",
            Arc::new(move |_model: &str| {
                Ok(ScriptedProvider::new(responses) as Arc<dyn LlmProvider>)
            }),
        );
        registry
    }

    fn config(personality: &str) -> AgentConfig {
        AgentConfig {
            provider: "scripted".to_string(),
            model: "scripted-1".to_string(),
            personality: personality.to_string(),
        }
    }

    #[tokio::test]
    async fn two_successful_turns_advance_all_histories() {
        let _ = env_logger::builder().is_test(true).try_init();
        let white = ScriptedProvider::new(&[
            "I should fight for the center.",
            r#"```json
{"move": "e2e4", "dialogue": "The center is mine."}
```"#,
        ]);
        let black = ScriptedProvider::new(&[
            "Symmetry keeps things calm.",
            r#"{"move": "e7e5", "dialogue": "We shall see."}"#,
        ]);
        let mut session = session(white, black);

        let first = session.play_turn().await;
        match first {
            TurnResult::Success {
                ref mv,
                ref dialogue,
                is_check,
                is_game_over,
                ..
            } => {
                assert_eq!(mv, "e2e4");
                assert_eq!(dialogue, "The center is mine.");
                assert!(!is_check);
                assert!(!is_game_over);
            }
            other => panic!("expected success, got {other:?}"),
        }

        let second = session.play_turn().await;
        assert!(matches!(second, TurnResult::Success { ref mv, .. } if mv == "e7e5"));

        assert_eq!(session.move_history(), ["e2e4", "e7e5"]);
        assert_eq!(session.position_history().len(), 3);
        assert_eq!(session.thought_history().len(), 2);
        assert_eq!(session.dialogue_history().len(), 2);
        assert_eq!(session.dialogue_history()[0].player, "white");
        assert_eq!(session.dialogue_history()[1].player, "black");
    }

    #[tokio::test]
    async fn failed_turn_leaves_session_untouched() {
        let mut session = session(Arc::new(FailingProvider), Arc::new(FailingProvider));
        let fen_before = session.current_fen();

        let result = session.play_turn().await;
        assert!(matches!(result, TurnResult::Error { .. }));

        assert_eq!(session.current_fen(), fen_before);
        assert!(session.move_history().is_empty());
        assert_eq!(session.position_history().len(), 1);
        assert!(session.thought_history().is_empty());
        assert!(session.dialogue_history().is_empty());
    }

    #[tokio::test]
    async fn entry_guard_reports_checkmate_without_mutation() {
        let registry = scripted_registry(&[]);
        // Fool's mate: black mates on move two.
        let moves: Vec<String> = ["f2f3", "e7e5", "g2g4", "d8h4"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut session = GameSession::resume(
            Uuid::new_v4(),
            &config("Reckless"),
            &config("Punisher"),
            &moves,
            &registry,
        )
        .unwrap();

        let fen_before = session.current_fen();
        let result = session.play_turn().await;
        match result {
            TurnResult::GameOver {
                result, reason, fen, ..
            } => {
                assert_eq!(reason, GameOverReason::Checkmate);
                assert_eq!(result, "0-1");
                assert_eq!(fen, fen_before);
            }
            other => panic!("expected game over, got {other:?}"),
        }
        assert_eq!(session.current_fen(), fen_before);
        assert_eq!(session.move_history().len(), 4);
    }

    #[tokio::test]
    async fn threefold_repetition_is_detected_from_snapshots() {
        let registry = scripted_registry(&[]);
        // Both sides shuffle knights back and forth twice; the starting
        // placement then occurs three times.
        let moves: Vec<String> = ["g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1", "f6g8"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut session = GameSession::resume(
            Uuid::new_v4(),
            &config("Shuffler"),
            &config("Mirror"),
            &moves,
            &registry,
        )
        .unwrap();

        assert!(session.is_threefold_repetition());
        assert_eq!(
            session.game_over_reason(),
            Some(GameOverReason::ThreefoldRepetition)
        );

        let result = session.play_turn().await;
        match result {
            TurnResult::GameOver { result, reason, .. } => {
                assert_eq!(reason, GameOverReason::ThreefoldRepetition);
                assert_eq!(result, "1/2-1/2");
            }
            other => panic!("expected game over, got {other:?}"),
        }
    }

    #[test]
    fn resume_rejects_illegal_tokens() {
        let registry = scripted_registry(&[]);
        let moves = vec!["e2e5".to_string()];
        let err = GameSession::resume(
            Uuid::new_v4(),
            &config("A"),
            &config("B"),
            &moves,
            &registry,
        )
        .unwrap_err();
        assert!(matches!(err, Error::IllegalUciMove(_) | Error::IllegalMove(_)));
    }

    #[test]
    fn resume_replays_snapshots_alongside_moves() {
        let registry = scripted_registry(&[]);
        let moves = vec!["e2e4".to_string(), "c7c5".to_string()];
        let session = GameSession::resume(
            Uuid::new_v4(),
            &config("A"),
            &config("B"),
            &moves,
            &registry,
        )
        .unwrap();

        assert_eq!(session.move_history(), ["e2e4", "c7c5"]);
        assert_eq!(session.position_history().len(), 3);
        assert!(session
            .current_fen()
            .starts_with("rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w"));
    }

    #[tokio::test]
    async fn prose_decision_is_recovered_and_applied() {
        let white = ScriptedProvider::new(&[
            "Knights before bishops.",
            "Hmm, I think I'll play g1f3 and develop quietly.",
        ]);
        let black = ScriptedProvider::new(&[]);
        let mut session = session(white, black);

        let result = session.play_turn().await;
        match result {
            TurnResult::Success { mv, dialogue, .. } => {
                assert_eq!(mv, "g1f3");
                assert_eq!(dialogue, "I make this move.");
            }
            other => panic!("expected success, got {other:?}"),
        }
    }
}
