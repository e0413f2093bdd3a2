//! Board square representation.
//!
//! Squares are addressed as (row, col) pairs with row 0 at the top of the
//! board from White's perspective: row 0 is rank 8, row 7 is rank 1. This
//! matches the orientation a renderer draws the board in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error produced when parsing a square from algebraic notation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseSquareError {
    #[error("expected 2 characters, got {0}")]
    InvalidLength(usize),

    #[error("invalid file: expected 'a'-'h', got '{0}'")]
    InvalidFile(char),

    #[error("invalid rank: expected '1'-'8', got '{0}'")]
    InvalidRank(char),
}

/// A square on the chess board.
///
/// Always within bounds: both constructors reject out-of-range coordinates,
/// so holding a `Square` is proof the coordinates are valid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Creates a square from row and column, both in `[0, 8)`.
    #[inline]
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < 8 && col < 8 {
            Some(Square { row, col })
        } else {
            None
        }
    }

    /// Returns the row (0 = rank 8, 7 = rank 1).
    #[inline]
    pub const fn row(self) -> u8 {
        self.row
    }

    /// Returns the column (0 = file a, 7 = file h).
    #[inline]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Translates this square by the given deltas, if the result stays
    /// on the board.
    #[inline]
    pub const fn offset(self, drow: i8, dcol: i8) -> Option<Self> {
        let row = self.row as i8 + drow;
        let col = self.col as i8 + dcol;
        if row >= 0 && row < 8 && col >= 0 && col < 8 {
            Some(Square {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Parses a square from algebraic notation (e.g., "e4").
    pub fn from_algebraic(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    /// Returns the algebraic notation for this square.
    ///
    /// Files 'a'-'h' map to columns 0-7; ranks '8'-'1' map to rows 0-7.
    pub fn to_algebraic(self) -> String {
        let file = (b'a' + self.col) as char;
        let rank = (b'8' - self.row) as char;
        format!("{}{}", file, rank)
    }
}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (file, rank) = match (chars.next(), chars.next(), chars.next()) {
            (Some(f), Some(r), None) => (f, r),
            _ => return Err(ParseSquareError::InvalidLength(s.chars().count())),
        };

        let col = match file.to_ascii_lowercase() {
            c @ 'a'..='h' => c as u8 - b'a',
            _ => return Err(ParseSquareError::InvalidFile(file)),
        };
        let row = match rank {
            r @ '1'..='8' => b'8' - r as u8,
            _ => return Err(ParseSquareError::InvalidRank(rank)),
        };

        Ok(Square { row, col })
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.to_algebraic())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}
