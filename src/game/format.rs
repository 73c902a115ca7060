//! Position formatting for provider prompts.
//!
//! Pure rendering of the authoritative board and move history into the
//! textual context handed to providers: an ascii board, the legal moves in
//! UCI form, the same moves annotated with SAN and piece name, and a
//! numbered transcript of the game so far.

use shakmaty::san::SanPlus;
use shakmaty::{CastlingMode, Chess, File, Position, Rank, Role, Square};

/// Textual context for one position, shared by the reasoning and decision
/// prompts of a single turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionContext {
    /// Ascii rendering of the board, white's perspective, rank 8 first.
    pub board_visual: String,
    /// Every currently legal move as a UCI token, in generation order.
    pub legal_tokens: Vec<String>,
    /// Legal moves annotated with SAN and the moving piece's name.
    pub annotated_moves: String,
    /// Numbered transcript pairing white/black plies by move number.
    pub history: String,
}

impl PositionContext {
    pub fn new(position: &Chess, move_history: &[String]) -> Self {
        Self {
            board_visual: render_board(position),
            legal_tokens: legal_move_tokens(position),
            annotated_moves: annotate_legal_moves(position),
            history: format_move_history(move_history),
        }
    }
}

/// Render the board as eight space-separated ranks, rank 8 first,
/// FEN piece characters with `.` for empty squares.
pub fn render_board(position: &Chess) -> String {
    let board = position.board();
    let mut lines = Vec::with_capacity(8);
    for rank in Rank::ALL.iter().rev() {
        let row: Vec<String> = File::ALL
            .iter()
            .map(|file| {
                let square = Square::from_coords(*file, *rank);
                board
                    .piece_at(square)
                    .map_or(".".to_string(), |piece| piece.char().to_string())
            })
            .collect();
        lines.push(row.join(" "));
    }
    lines.join("\n")
}

/// All currently legal moves as UCI tokens.
pub fn legal_move_tokens(position: &Chess) -> Vec<String> {
    position
        .legal_moves()
        .iter()
        .map(|m| m.to_uci(CastlingMode::Standard).to_string())
        .collect()
}

/// Legal moves annotated as `uci (san, Piece)`, comma separated.
fn annotate_legal_moves(position: &Chess) -> String {
    position
        .legal_moves()
        .iter()
        .map(|m| {
            let uci = m.to_uci(CastlingMode::Standard);
            let san = SanPlus::from_move(position.clone(), m);
            format!("{} ({}, {})", uci, san, role_name(m.role()))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Numbered move transcript, tolerating a trailing unmatched white ply.
pub fn format_move_history(moves: &[String]) -> String {
    if moves.is_empty() {
        return "No moves played yet.".to_string();
    }

    moves
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| match pair {
            [white, black] => format!("{}. {} {}", i + 1, white, black),
            [white] => format!("{}. {}", i + 1, white),
            _ => unreachable!(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::Pawn => "Pawn",
        Role::Knight => "Knight",
        Role::Bishop => "Bishop",
        Role::Rook => "Rook",
        Role::Queen => "Queen",
        Role::King => "King",
    }
}
