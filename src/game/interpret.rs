//! Interpretation of untrusted decision responses.
//!
//! Providers are asked for a fenced JSON object with a `move` and a
//! `dialogue` field, but nothing forces them to comply. The interpreter
//! recovers a legal move token from whatever came back, in strictly ordered
//! fallback steps; the legal-move set is the non-negotiable final gate.

use log::{debug, warn};
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use regex::Regex;
use serde::Deserialize;

/// Commentary used when the response carried none, or when a fallback move
/// was substituted for an illegal or unrecoverable proposal.
pub const DEFAULT_DIALOGUE: &str = "I make my move.";

/// Commentary used when the move was recovered from unstructured text.
pub const RECOVERED_DIALOGUE: &str = "I make this move.";

static JSON_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").unwrap());

#[derive(Deserialize)]
struct MoveProposal {
    #[serde(rename = "move")]
    mv: String,
    dialogue: Option<String>,
}

/// Extract a `(move token, dialogue)` pair from a raw decision response.
///
/// Always returns a member of `legal_tokens` when that set is non-empty;
/// returns an empty token only when it is empty (game already over).
pub fn interpret_decision(raw: &str, legal_tokens: &[String]) -> (String, String) {
    let content = JSON_BLOCK_RE
        .captures(raw)
        .and_then(|c| c.get(1))
        .map_or(raw, |m| m.as_str());

    match serde_json::from_str::<MoveProposal>(content) {
        Ok(proposal) => {
            if legal_tokens.contains(&proposal.mv) {
                let dialogue = proposal
                    .dialogue
                    .unwrap_or_else(|| DEFAULT_DIALOGUE.to_string());
                return (proposal.mv, dialogue);
            }
            warn!(
                "proposed move {:?} is not legal, substituting a random legal move",
                proposal.mv
            );
            (random_legal(legal_tokens), DEFAULT_DIALOGUE.to_string())
        }
        Err(err) => {
            debug!("decision response did not decode as JSON: {err}");
            // The provider may have answered in prose that still names a
            // legal move; take the first one that appears verbatim.
            for token in legal_tokens {
                if raw.contains(token.as_str()) {
                    return (token.clone(), RECOVERED_DIALOGUE.to_string());
                }
            }
            (random_legal(legal_tokens), DEFAULT_DIALOGUE.to_string())
        }
    }
}

fn random_legal(legal_tokens: &[String]) -> String {
    legal_tokens
        .choose(&mut rand::thread_rng())
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legal() -> Vec<String> {
        vec!["e2e4".to_string(), "d2d4".to_string(), "g1f3".to_string()]
    }

    #[test]
    fn structured_legal_proposal_is_returned_verbatim() {
        let raw = r#"{"move": "e2e4", "dialogue": "Center control, obviously."}"#;
        let (mv, dialogue) = interpret_decision(raw, &legal());
        assert_eq!(mv, "e2e4");
        assert_eq!(dialogue, "Center control, obviously.");
    }

    #[test]
    fn fenced_json_block_is_extracted() {
        let raw = "Here is my answer:\n```json\n{\"move\": \"d2d4\", \"dialogue\": \"Queen's pawn.\"}\n```\nGood luck!";
        let (mv, dialogue) = interpret_decision(raw, &legal());
        assert_eq!(mv, "d2d4");
        assert_eq!(dialogue, "Queen's pawn.");
    }

    #[test]
    fn missing_dialogue_falls_back_to_default() {
        let raw = r#"{"move": "g1f3"}"#;
        let (mv, dialogue) = interpret_decision(raw, &legal());
        assert_eq!(mv, "g1f3");
        assert_eq!(dialogue, DEFAULT_DIALOGUE);
    }

    #[test]
    fn illegal_proposal_is_replaced_by_a_legal_move() {
        let raw = r#"{"move": "z9z9", "dialogue": "Trust me."}"#;
        let (mv, dialogue) = interpret_decision(raw, &legal());
        assert!(legal().contains(&mv));
        assert_eq!(dialogue, DEFAULT_DIALOGUE);
    }

    #[test]
    fn prose_containing_a_legal_token_is_recovered() {
        let raw = "I think I'll play e2e4 to open the center";
        let (mv, dialogue) = interpret_decision(raw, &legal());
        assert_eq!(mv, "e2e4");
        assert_eq!(dialogue, RECOVERED_DIALOGUE);
    }

    #[test]
    fn unrecoverable_text_still_yields_a_legal_move() {
        let (mv, dialogue) = interpret_decision("castling is for cowards", &legal());
        assert!(legal().contains(&mv));
        assert_eq!(dialogue, DEFAULT_DIALOGUE);
    }

    #[test]
    fn empty_legal_set_yields_empty_token() {
        let (mv, _) = interpret_decision("anything", &[]);
        assert!(mv.is_empty());
    }
}
