//! Game orchestration: turn sequencing, move history, and the public
//! move-submission API.

use crate::board::Board;
use crate::mov::Move;
use crate::rules::{self, KingExposure, Outcome};
use chess_core::{Color, PieceKind, Square};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a submitted move is rejected.
///
/// Rejection never mutates game state; the caller re-prompts and submits
/// again.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("no piece on {0}")]
    EmptySquare(Square),

    #[error("it is {0}'s turn")]
    WrongTurn(Color),

    #[error("illegal move: {0}")]
    IllegalMove(String),
}

/// A move that has been applied, with its display notation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayedMove {
    pub mov: Move,
    pub notation: String,
}

/// A full chess game: board state, side to move, and move history.
///
/// One instance per game session; the engine keeps no process-wide state
/// and every operation is a synchronous in-memory computation. Whatever
/// drives it (CLI loop, GUI event loop, network room handler) differs only
/// in how it obtains the coordinates and renders the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    turn: Color,
    history: Vec<PlayedMove>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a game from the standard starting position, White to move.
    pub fn new() -> Self {
        Game {
            board: Board::new(),
            turn: Color::White,
            history: Vec::new(),
        }
    }

    /// Creates a game from a custom position with the given side to move.
    /// The board must contain both kings.
    pub fn from_board(board: Board, turn: Color) -> Self {
        Game {
            board,
            turn,
            history: Vec::new(),
        }
    }

    /// Returns the current board state, for rendering and queries.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the side to move.
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Returns the applied moves in order.
    pub fn move_history(&self) -> &[PlayedMove] {
        &self.history
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        rules::is_in_check(&self.board, self.turn)
    }

    /// Returns the terminal state for the side to move.
    pub fn outcome(&self) -> Outcome {
        rules::game_outcome(&self.board, self.turn)
    }

    /// Legal destination squares for the piece on `from`, for move-hint
    /// highlighting. Empty when the square is empty.
    pub fn legal_destinations(&self, from: Square) -> Vec<Square> {
        match self.board.get(from) {
            Some(id) => rules::legal_targets(&self.board, id),
            None => Vec::new(),
        }
    }

    /// Submits a move for the side to move. The single mutating entry
    /// point: validates, applies, records history, and flips the turn.
    ///
    /// The promotion kind is consulted only when a pawn reaches its
    /// promotion row; Queen is assumed when none is supplied.
    pub fn submit_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<(), GameError> {
        let mover = *self
            .board
            .piece_at(from)
            .ok_or(GameError::EmptySquare(from))?;
        if mover.color != self.turn {
            return Err(GameError::WrongTurn(self.turn));
        }

        let promotion = if mover.kind == PieceKind::Pawn && to.row() == self.turn.promotion_row() {
            promotion.or(Some(PieceKind::Queen))
        } else {
            None
        };

        let raw = match Move::derive(&self.board, from, to, promotion) {
            Some(mv) => mv,
            None => return Err(GameError::EmptySquare(from)),
        };
        let mv = rules::correct_en_passant(&self.board, raw);
        if !rules::is_move_legal(&self.board, &mv, KingExposure::Check) {
            return Err(GameError::IllegalMove(format!("{}{}", from, to)));
        }

        let mut notation = mv.notation(&self.board);
        self.board.apply_move(&mv);
        self.turn = self.turn.opposite();

        // The check/mate suffix reflects the position the opponent now faces.
        if rules::is_in_check(&self.board, self.turn) {
            notation.push(match rules::game_outcome(&self.board, self.turn) {
                Outcome::Checkmate => '#',
                _ => '+',
            });
        }
        self.history.push(PlayedMove { mov: mv, notation });
        Ok(())
    }

    /// Serializes the full game state as an opaque JSON blob, for
    /// transmission between a server and its clients.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Restores a game from a blob produced by [`Game::to_json`].
    pub fn from_json(blob: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(blob)
    }
}
