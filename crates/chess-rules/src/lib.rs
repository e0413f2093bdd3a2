//! Chess rules engine.
//!
//! This crate provides:
//! - [`Board`] - piece registry, placement grid, castling rights, and
//!   en passant state
//! - [`Move`] - a proposed or applied transition
//! - [`rules`] - legality checking, attack detection, move generation, and
//!   checkmate/stalemate detection
//! - [`Game`] - turn sequencing, move history, and the move-submission API
//!
//! # Architecture
//!
//! The board owns every piece in an index-based registry; the 8x8 grid
//! stores `Option<PieceId>` references into it. Pieces are mutated in
//! place as they move and flagged when captured, never removed, so move
//! history stays valid for the life of a game. The rules module is a set
//! of pure functions over a board snapshot; checking whether a move would
//! expose the mover's own king works on a throwaway clone of the board, so
//! a rejected candidate never touches real state.
//!
//! The engine is synchronous and single-threaded per [`Game`] instance.
//! Callers (a CLI loop, a GUI, a network room handler) submit moves one at
//! a time and read back board state and outcome.
//!
//! # Example
//!
//! ```
//! use chess_core::Square;
//! use chess_rules::{Game, Outcome};
//!
//! let mut game = Game::new();
//! let e2 = Square::from_algebraic("e2").unwrap();
//! let e4 = Square::from_algebraic("e4").unwrap();
//! game.submit_move(e2, e4, None).unwrap();
//! assert_eq!(game.outcome(), Outcome::InPlay);
//! ```

mod board;
mod game;
mod mov;
pub mod rules;

pub use board::{Board, CastleSide, CastlingRights, EnPassant, Piece, PieceId};
pub use game::{Game, GameError, PlayedMove};
pub use mov::Move;
pub use rules::{KingExposure, Outcome};
