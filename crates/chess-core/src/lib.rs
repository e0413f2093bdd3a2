//! Core types for chess.
//!
//! This crate provides the fundamental value types used across the rules
//! engine:
//! - [`Color`] for the two players
//! - [`PieceKind`] for the six piece types
//! - [`Square`] for board coordinates and algebraic notation
//!
//! All types here are small, immutable values with no knowledge of board
//! state; the engine lives in the `chess-rules` crate.

mod color;
mod piece;
mod square;

pub use color::Color;
pub use piece::PieceKind;
pub use square::{ParseSquareError, Square};
