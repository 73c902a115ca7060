//! Agent identity and its two provider requests per turn.
//!
//! An agent is a color, a personality, and a provider handle resolved once
//! at creation. Each turn it is asked twice: first for free-form reasoning
//! about the position, then for a structured move decision biased toward a
//! parseable shape by an embedded example JSON object.

use std::sync::Arc;

use rand::seq::SliceRandom;
use shakmaty::Color;

use crate::error::Result;
use crate::provider::LlmProvider;

use super::format::PositionContext;
use super::interpret::interpret_decision;
use super::types::side_name;

/// One side's agent: fixed color, personality, and provider.
#[derive(Debug)]
pub struct ChessAgent {
    color: Color,
    personality: String,
    provider: Arc<dyn LlmProvider>,
}

impl ChessAgent {
    pub fn new(color: Color, personality: String, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            color,
            personality,
            provider,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn personality(&self) -> &str {
        &self.personality
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Reasoning request: free-form analysis, stored verbatim as the turn's
    /// thoughts. No move is requested here.
    pub async fn generate_thoughts(
        &self,
        context: &PositionContext,
        opponent_dialogue: Option<&str>,
    ) -> Result<String> {
        let prompt = self.thoughts_prompt(context, opponent_dialogue);
        self.provider.generate_response(&prompt).await
    }

    /// Decision request: returns a legal move token and dialogue, recovered
    /// from the raw response by the interpreter. Only transport failures
    /// surface as errors.
    pub async fn generate_decision(
        &self,
        context: &PositionContext,
        thoughts: &str,
        opponent_dialogue: Option<&str>,
        opponent_name: &str,
    ) -> Result<(String, String)> {
        let prompt = self.decision_prompt(context, thoughts, opponent_dialogue, opponent_name);
        let response = self.provider.generate_response(&prompt).await?;
        Ok(interpret_decision(&response, &context.legal_tokens))
    }

    fn thoughts_prompt(
        &self,
        context: &PositionContext,
        opponent_dialogue: Option<&str>,
    ) -> String {
        format!(
            "You are playing chess as {personality} with the {color} pieces.\n\n\
             Current board position:\n{board}\n\n\
             Legal moves available (in UCI format): {uci_moves}\n\
             Legal moves with algebraic notation: {annotated}\n\n\
             Game history:\n{history}\n\n\
             {opponent}\
             Think through your strategy carefully. Consider:\n\
             1. The current board position\n\
             2. Possible threats from your opponent\n\
             3. Your attacking opportunities\n\
             4. Long-term strategic goals\n\
             5. Several moves ahead\n\n\
             Provide your detailed thought process as you analyze the position.\n\
             Don't decide on a move yet, just think through the possibilities.",
            personality = self.personality,
            color = side_name(self.color),
            board = context.board_visual,
            uci_moves = context.legal_tokens.join(", "),
            annotated = context.annotated_moves,
            history = context.history,
            opponent = opponent_line(opponent_dialogue),
        )
    }

    fn decision_prompt(
        &self,
        context: &PositionContext,
        thoughts: &str,
        opponent_dialogue: Option<&str>,
        opponent_name: &str,
    ) -> String {
        let uci_moves = context.legal_tokens.join(", ");
        format!(
            "You are playing chess as {personality} with the {color} pieces against {opponent_name}.\n\n\
             Current board position:\n{board}\n\n\
             Legal moves available (in UCI format): {uci_moves}\n\
             Legal moves with algebraic notation: {annotated}\n\n\
             Game history:\n{history}\n\n\
             {opponent}\
             You've already analyzed the position with these thoughts:\n{thoughts}\n\n\
             Now, choose your next move from the LEGAL MOVES LIST ONLY and respond with a JSON object exactly as follows:\n\
             ```json\n{example}\n```\n\n\
             IMPORTANT: Your \"move\" MUST be one of these exact legal UCI format moves: {uci_moves}\n\
             DO NOT invent moves or use moves not in this list, as they will be rejected.\n\
             Your dialogue should reflect your personality as {personality}.",
            personality = self.personality,
            color = side_name(self.color),
            opponent_name = opponent_name,
            board = context.board_visual,
            uci_moves = uci_moves,
            annotated = context.annotated_moves,
            history = context.history,
            opponent = opponent_line(opponent_dialogue),
            thoughts = thoughts,
            example = example_output(&context.legal_tokens),
        )
    }
}

fn opponent_line(opponent_dialogue: Option<&str>) -> String {
    match opponent_dialogue {
        Some(dialogue) => format!("Your opponent just said: {dialogue}\n\n"),
        None => String::new(),
    }
}

/// Pretty-printed example JSON using a randomly chosen legal move, embedded
/// in the decision prompt to bias the provider toward a parseable shape.
fn example_output(legal_tokens: &[String]) -> String {
    let example_move = legal_tokens
        .choose(&mut rand::thread_rng())
        .map(String::as_str)
        .unwrap_or("e2e4");
    let example = serde_json::json!({
        "move": example_move,
        "dialogue": "This is where your dialogue goes."
    });
    serde_json::to_string_pretty(&example).unwrap_or_default()
}
