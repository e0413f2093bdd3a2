//! Move representation.

use crate::board::{Board, PieceId};
use chess_core::{Color, PieceKind, Square};
use serde::{Deserialize, Serialize};

/// A proposed or applied board transition.
///
/// Short-lived value object: constructed per query or submission, applied
/// by [`Board::apply_move`], and recorded in game history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    /// The piece being moved.
    pub piece: PieceId,
    /// The piece captured by this move, if any. For en passant this is a
    /// pawn that does not sit on `to`; see [`crate::rules::correct_en_passant`].
    pub captured: Option<PieceId>,
    /// What the mover becomes when a pawn reaches its promotion row.
    pub promotion: Option<PieceKind>,
}

impl Move {
    /// Builds a move from coordinates, reading the captured piece off the
    /// destination cell. Returns `None` if `from` is empty.
    ///
    /// The result does not yet account for en passant; run it through
    /// [`crate::rules::correct_en_passant`] before checking legality or
    /// applying it.
    pub fn derive(
        board: &Board,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Option<Self> {
        let piece = board.get(from)?;
        Some(Move {
            from,
            to,
            piece,
            captured: board.get(to),
            promotion,
        })
    }

    /// Display notation for this move against the position it is made in
    /// (the board state from *before* application).
    ///
    /// Casual style, as the engine's clients render it: piece letter plus
    /// destination, "x" on captures, "O-O"/"O-O-O" for castling, no
    /// disambiguation between identical pieces. Check and mate suffixes are
    /// appended by [`crate::Game`] once the resulting position is known.
    pub fn notation(&self, board: &Board) -> String {
        let mover = board.piece(self.piece);
        let capture = if self.captured.is_some() { "x" } else { "" };
        let dest = self.to.to_algebraic();

        match mover.kind {
            PieceKind::Pawn => {
                if self.captured.is_some() {
                    let file = (b'a' + self.from.col()) as char;
                    format!("{}x{}", file, dest)
                } else {
                    dest
                }
            }
            PieceKind::King => {
                let dcol = self.to.col() as i8 - self.from.col() as i8;
                match dcol {
                    2 => "O-O".to_string(),
                    -2 => "O-O-O".to_string(),
                    _ => format!("K{}{}", capture, dest),
                }
            }
            kind => format!("{}{}{}", kind.to_char(Color::White), capture, dest),
        }
    }
}
