//! Board state: the piece registry, the placement grid, and board-wide
//! flags (castling rights, en passant).
//!
//! The board is pure state. It applies pre-validated moves and maintains
//! its own consistency, but makes no legality judgments; those live in
//! [`crate::rules`].

use crate::mov::Move;
use chess_core::{Color, PieceKind, Square};
use serde::{Deserialize, Serialize};

/// Index of a piece in the board's registry.
///
/// Stable for the life of a game and across [`Board::clone`], so a move
/// built against one board applies verbatim to a clone of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceId(usize);

/// A piece on the board.
///
/// Identity is stable: a piece is mutated in place as it moves or
/// promotes, never recreated. Captured pieces stay in the registry with
/// the flag set so move history keeps valid references; every movement and
/// attack query skips them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub square: Square,
    pub captured: bool,
}

/// The two castling directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CastleSide {
    King,
    Queen,
}

impl CastleSide {
    /// The column the castling rook starts on (h-file or a-file).
    #[inline]
    pub const fn rook_home_col(self) -> u8 {
        match self {
            CastleSide::King => 7,
            CastleSide::Queen => 0,
        }
    }
}

/// Castling availability for both players.
///
/// Rights are monotonic: they start true and are only ever revoked. A king
/// or rook returning to its home square does not restore them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastlingRights {
    white_king_side: bool,
    white_queen_side: bool,
    black_king_side: bool,
    black_queen_side: bool,
}

impl CastlingRights {
    const fn initial() -> Self {
        CastlingRights {
            white_king_side: true,
            white_queen_side: true,
            black_king_side: true,
            black_queen_side: true,
        }
    }

    /// Returns whether `color` may still castle on `side`.
    pub const fn allows(self, color: Color, side: CastleSide) -> bool {
        match (color, side) {
            (Color::White, CastleSide::King) => self.white_king_side,
            (Color::White, CastleSide::Queen) => self.white_queen_side,
            (Color::Black, CastleSide::King) => self.black_king_side,
            (Color::Black, CastleSide::Queen) => self.black_queen_side,
        }
    }

    fn revoke(&mut self, color: Color, side: CastleSide) {
        match (color, side) {
            (Color::White, CastleSide::King) => self.white_king_side = false,
            (Color::White, CastleSide::Queen) => self.white_queen_side = false,
            (Color::Black, CastleSide::King) => self.black_king_side = false,
            (Color::Black, CastleSide::Queen) => self.black_queen_side = false,
        }
    }

    fn revoke_both(&mut self, color: Color) {
        self.revoke(color, CastleSide::King);
        self.revoke(color, CastleSide::Queen);
    }
}

/// A pawn that just advanced two squares and may be captured in passing.
///
/// Valid for exactly one ply: [`Board::apply_move`] clears it before
/// recording any new double-step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnPassant {
    /// The square the pawn skipped over, where the capture lands.
    pub target: Square,
    /// The pawn that double-stepped (the capture victim).
    pub pawn: PieceId,
}

/// Infallible square construction for coordinates known to be in range.
pub(crate) fn sq(row: u8, col: u8) -> Square {
    match Square::new(row, col) {
        Some(s) => s,
        None => unreachable!(),
    }
}

/// Physical state of a chess position.
///
/// The registry (`pieces`) owns every piece; the grid stores indices into
/// it. Invariant: every occupied cell holds a piece whose own `square`
/// field names that cell, and no captured piece appears on the grid.
/// Violating this is a programming error, checked by a `debug_assert!`
/// after every application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    grid: [[Option<PieceId>; 8]; 8],
    pieces: Vec<Piece>,
    castling: CastlingRights,
    en_passant: Option<EnPassant>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates a board with the standard starting arrangement.
    pub fn new() -> Self {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut board = Board::empty();
        for (col, &kind) in BACK_RANK.iter().enumerate() {
            let col = col as u8;
            board.place(kind, Color::Black, sq(0, col));
            board.place(PieceKind::Pawn, Color::Black, sq(1, col));
            board.place(PieceKind::Pawn, Color::White, sq(6, col));
            board.place(kind, Color::White, sq(7, col));
        }
        board
    }

    /// Creates a board with no pieces, for setting up custom positions
    /// with [`Board::place`]. Castling rights start available and are
    /// revoked by moves as usual.
    pub fn empty() -> Self {
        Board {
            grid: [[None; 8]; 8],
            pieces: Vec::new(),
            castling: CastlingRights::initial(),
            en_passant: None,
        }
    }

    /// Adds a piece to the registry and grid.
    ///
    /// # Panics
    ///
    /// Panics if the square is already occupied.
    pub fn place(&mut self, kind: PieceKind, color: Color, square: Square) -> PieceId {
        assert!(
            self.get(square).is_none(),
            "square {} is already occupied",
            square
        );
        let id = PieceId(self.pieces.len());
        self.pieces.push(Piece {
            kind,
            color,
            square,
            captured: false,
        });
        *self.cell_mut(square) = Some(id);
        id
    }

    /// Returns the id of the piece on `square`, if any.
    #[inline]
    pub fn get(&self, square: Square) -> Option<PieceId> {
        self.grid[square.row() as usize][square.col() as usize]
    }

    /// Returns the piece with the given id.
    #[inline]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.0]
    }

    /// Returns the piece on `square`, if any.
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.get(square).map(|id| self.piece(id))
    }

    /// Iterates over the non-captured pieces of one color.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (PieceId, &Piece)> {
        self.pieces
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.color == color && !p.captured)
            .map(|(i, p)| (PieceId(i), p))
    }

    /// Returns the square of the given color's king.
    ///
    /// # Panics
    ///
    /// Panics if the board holds no king of that color (a custom position
    /// handed to the rules engine must always include both kings).
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces
            .iter()
            .find(|p| p.kind == PieceKind::King && p.color == color && !p.captured)
            .map(|p| p.square)
            .expect("board has no king of the required color")
    }

    /// Returns the current castling rights.
    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// Returns the en passant state from the previous ply, if any.
    #[inline]
    pub fn en_passant(&self) -> Option<EnPassant> {
        self.en_passant
    }

    /// Applies a pre-validated move unconditionally.
    ///
    /// No legality judgment happens here: callers must run the move through
    /// [`crate::rules::is_move_legal`] first. Beyond relocating the mover
    /// this handles every board-wide side effect: marking the captured
    /// piece (whose square differs from the destination for en passant),
    /// relocating the rook on castling, mutating the pawn's kind on
    /// promotion, revoking castling rights, and recomputing en passant.
    pub fn apply_move(&mut self, mv: &Move) {
        let mover = self.pieces[mv.piece.0];

        *self.cell_mut(mv.from) = None;

        if let Some(cap) = mv.captured {
            let victim_square = self.pieces[cap.0].square;
            *self.cell_mut(victim_square) = None;
            self.pieces[cap.0].captured = true;
        }

        *self.cell_mut(mv.to) = Some(mv.piece);
        self.pieces[mv.piece.0].square = mv.to;

        // Castling is the only move that relocates a second piece: a king
        // shifting more than one file drags its rook to the adjacent square.
        let dcol = mv.to.col() as i8 - mv.from.col() as i8;
        if mover.kind == PieceKind::King && dcol.abs() > 1 {
            let row = mv.to.row();
            let (rook_from, rook_to) = if dcol > 0 {
                (sq(row, 7), sq(row, 5))
            } else {
                (sq(row, 0), sq(row, 3))
            };
            if let Some(rook) = self.get(rook_from) {
                *self.cell_mut(rook_from) = None;
                *self.cell_mut(rook_to) = Some(rook);
                self.pieces[rook.0].square = rook_to;
            }
        }

        // Promotion changes only the kind; the piece keeps its identity.
        if let Some(promoted) = mv.promotion {
            if mover.kind == PieceKind::Pawn {
                self.pieces[mv.piece.0].kind = promoted;
            }
        }

        match mover.kind {
            PieceKind::King => self.castling.revoke_both(mover.color),
            PieceKind::Rook if mv.from.row() == mover.color.back_row() => {
                if mv.from.col() == CastleSide::King.rook_home_col() {
                    self.castling.revoke(mover.color, CastleSide::King);
                } else if mv.from.col() == CastleSide::Queen.rook_home_col() {
                    self.castling.revoke(mover.color, CastleSide::Queen);
                }
            }
            _ => {}
        }

        // En passant lasts exactly one ply.
        self.en_passant = None;
        let drow = mv.to.row() as i8 - mv.from.row() as i8;
        if mover.kind == PieceKind::Pawn && drow.abs() == 2 {
            if let Some(target) = mv.from.offset(drow / 2, 0) {
                self.en_passant = Some(EnPassant {
                    target,
                    pawn: mv.piece,
                });
            }
        }

        debug_assert!(self.is_consistent());
    }

    /// Verifies grid/registry consistency: each occupied cell names a live
    /// piece recording that cell as its square, and each live piece sits on
    /// its recorded cell.
    pub fn is_consistent(&self) -> bool {
        for row in 0..8u8 {
            for col in 0..8u8 {
                if let Some(id) = self.grid[row as usize][col as usize] {
                    let piece = &self.pieces[id.0];
                    if piece.captured || piece.square != sq(row, col) {
                        return false;
                    }
                }
            }
        }
        self.pieces
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.captured)
            .all(|(i, p)| self.get(p.square) == Some(PieceId(i)))
    }

    #[inline]
    fn cell_mut(&mut self, square: Square) -> &mut Option<PieceId> {
        &mut self.grid[square.row() as usize][square.col() as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn plain_move(board: &Board, from: &str, to: &str) -> Move {
        Move::derive(board, at(from), at(to), None).unwrap()
    }

    #[test]
    fn standard_setup() {
        let board = Board::new();
        assert!(board.is_consistent());

        let e1 = board.piece_at(at("e1")).unwrap();
        assert_eq!(e1.kind, PieceKind::King);
        assert_eq!(e1.color, Color::White);

        let d8 = board.piece_at(at("d8")).unwrap();
        assert_eq!(d8.kind, PieceKind::Queen);
        assert_eq!(d8.color, Color::Black);

        assert_eq!(board.pieces_of(Color::White).count(), 16);
        assert_eq!(board.pieces_of(Color::Black).count(), 16);
        assert!(board.get(at("e4")).is_none());
    }

    #[test]
    fn king_squares() {
        let board = Board::new();
        assert_eq!(board.king_square(Color::White), at("e1"));
        assert_eq!(board.king_square(Color::Black), at("e8"));
    }

    #[test]
    fn apply_relocates_piece() {
        let mut board = Board::new();
        let id = board.get(at("e2")).unwrap();
        board.apply_move(&plain_move(&board, "e2", "e4"));

        assert!(board.get(at("e2")).is_none());
        assert_eq!(board.get(at("e4")), Some(id));
        assert_eq!(board.piece(id).square, at("e4"));
        assert!(board.is_consistent());
    }

    #[test]
    fn apply_marks_capture() {
        let mut board = Board::empty();
        board.place(PieceKind::King, Color::White, at("e1"));
        board.place(PieceKind::King, Color::Black, at("e8"));
        let rook = board.place(PieceKind::Rook, Color::White, at("a1"));
        let victim = board.place(PieceKind::Knight, Color::Black, at("a5"));

        board.apply_move(&plain_move(&board, "a1", "a5"));

        assert!(board.piece(victim).captured);
        assert_eq!(board.get(at("a5")), Some(rook));
        assert_eq!(board.pieces_of(Color::Black).count(), 1);
        assert!(board.is_consistent());
    }

    #[test]
    fn double_step_records_en_passant() {
        let mut board = Board::new();
        let pawn = board.get(at("e2")).unwrap();
        board.apply_move(&plain_move(&board, "e2", "e4"));

        let ep = board.en_passant().unwrap();
        assert_eq!(ep.target, at("e3"));
        assert_eq!(ep.pawn, pawn);

        // Any following move clears it.
        board.apply_move(&plain_move(&board, "g8", "f6"));
        assert!(board.en_passant().is_none());
    }

    #[test]
    fn single_step_sets_no_en_passant() {
        let mut board = Board::new();
        board.apply_move(&plain_move(&board, "e2", "e3"));
        assert!(board.en_passant().is_none());
    }

    #[test]
    fn castling_relocates_rook() {
        let mut board = Board::empty();
        board.place(PieceKind::King, Color::White, at("e1"));
        let rook = board.place(PieceKind::Rook, Color::White, at("h1"));
        board.place(PieceKind::King, Color::Black, at("e8"));

        board.apply_move(&plain_move(&board, "e1", "g1"));

        assert_eq!(board.get(at("g1")).map(|id| board.piece(id).kind), Some(PieceKind::King));
        assert_eq!(board.get(at("f1")), Some(rook));
        assert!(board.get(at("h1")).is_none());
        assert!(board.is_consistent());
    }

    #[test]
    fn queen_side_castling_relocates_rook() {
        let mut board = Board::empty();
        board.place(PieceKind::King, Color::Black, at("e8"));
        let rook = board.place(PieceKind::Rook, Color::Black, at("a8"));
        board.place(PieceKind::King, Color::White, at("e1"));

        board.apply_move(&plain_move(&board, "e8", "c8"));

        assert_eq!(board.get(at("c8")).map(|id| board.piece(id).kind), Some(PieceKind::King));
        assert_eq!(board.get(at("d8")), Some(rook));
        assert!(board.get(at("a8")).is_none());
    }

    #[test]
    fn promotion_mutates_kind_in_place() {
        let mut board = Board::empty();
        board.place(PieceKind::King, Color::White, at("e1"));
        board.place(PieceKind::King, Color::Black, at("h5"));
        let pawn = board.place(PieceKind::Pawn, Color::White, at("a7"));

        let mv = Move::derive(&board, at("a7"), at("a8"), Some(PieceKind::Queen)).unwrap();
        board.apply_move(&mv);

        // Same identity, new kind.
        assert_eq!(board.get(at("a8")), Some(pawn));
        assert_eq!(board.piece(pawn).kind, PieceKind::Queen);
        assert_eq!(board.piece(pawn).color, Color::White);
    }

    #[test]
    fn promotion_ignored_for_non_pawn() {
        let mut board = Board::empty();
        board.place(PieceKind::King, Color::White, at("e1"));
        board.place(PieceKind::King, Color::Black, at("h5"));
        let rook = board.place(PieceKind::Rook, Color::White, at("a7"));

        let mv = Move::derive(&board, at("a7"), at("a8"), Some(PieceKind::Queen)).unwrap();
        board.apply_move(&mv);
        assert_eq!(board.piece(rook).kind, PieceKind::Rook);
    }

    #[test]
    fn king_move_revokes_both_rights() {
        let mut board = Board::new();
        board.apply_move(&plain_move(&board, "e2", "e4"));
        board.apply_move(&plain_move(&board, "e1", "e2"));

        assert!(!board.castling().allows(Color::White, CastleSide::King));
        assert!(!board.castling().allows(Color::White, CastleSide::Queen));
        assert!(board.castling().allows(Color::Black, CastleSide::King));
        assert!(board.castling().allows(Color::Black, CastleSide::Queen));
    }

    #[test]
    fn rook_move_revokes_only_its_side() {
        let mut board = Board::new();
        board.apply_move(&plain_move(&board, "a2", "a4"));
        board.apply_move(&plain_move(&board, "a1", "a3"));

        assert!(board.castling().allows(Color::White, CastleSide::King));
        assert!(!board.castling().allows(Color::White, CastleSide::Queen));
    }

    #[test]
    fn rights_never_restored() {
        let mut board = Board::new();
        board.apply_move(&plain_move(&board, "h2", "h4"));
        board.apply_move(&plain_move(&board, "h1", "h3"));
        assert!(!board.castling().allows(Color::White, CastleSide::King));

        // Returning home does not bring the right back.
        board.apply_move(&plain_move(&board, "h3", "h1"));
        assert!(!board.castling().allows(Color::White, CastleSide::King));
    }

    #[test]
    #[should_panic(expected = "already occupied")]
    fn place_rejects_occupied_square() {
        let mut board = Board::new();
        board.place(PieceKind::Queen, Color::White, at("e2"));
    }
}
