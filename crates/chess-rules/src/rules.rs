//! Move legality, attack detection, and terminal-state detection.
//!
//! Everything here is a pure function of a board snapshot; the module
//! keeps no state of its own. The king-exposure half of legality checking
//! clones the board, applies the candidate on the clone, and discards it,
//! so a rejected candidate never touches the real position.
//!
//! Boards handed to these functions must contain a king of each color that
//! still has pieces in play; [`Board::new`] and any sensible custom setup
//! satisfy this.

use crate::board::{sq, Board, CastleSide, Piece, PieceId};
use crate::mov::Move;
use chess_core::{Color, PieceKind, Square};
use serde::{Deserialize, Serialize};

/// Whether a legality check should also verify that the mover's own king
/// is not left attacked.
///
/// Attack scans pass [`KingExposure::Ignore`]: attacks are evaluated
/// statically (a pinned piece still covers squares), and this is also what
/// cuts the recursion between [`is_move_legal`] and [`is_targeted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KingExposure {
    Check,
    Ignore,
}

/// Terminal state of a game, from the perspective of the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    InPlay,
    Checkmate,
    Stalemate,
}

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const ORTHOGONAL_DIRS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL_DIRS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Returns true if the move is legal on the given board.
///
/// The move should already be corrected for en passant (see
/// [`correct_en_passant`]); its `captured` field is trusted as the capture
/// target. With [`KingExposure::Check`] a geometrically valid move is still
/// rejected when it would leave the mover's own king attacked.
pub fn is_move_legal(board: &Board, mv: &Move, exposure: KingExposure) -> bool {
    let mover = board.piece(mv.piece);
    let drow = mv.to.row() as i8 - mv.from.row() as i8;
    let dcol = mv.to.col() as i8 - mv.from.col() as i8;

    if drow == 0 && dcol == 0 {
        return false;
    }

    if let Some(cap) = mv.captured {
        if board.piece(cap).color == mover.color {
            return false;
        }
    }

    let geometric = match mover.kind {
        PieceKind::Pawn => pawn_move_legal(board, mv, mover.color, drow, dcol),
        PieceKind::Knight => {
            (dcol.abs() == 2 && drow.abs() == 1) || (dcol.abs() == 1 && drow.abs() == 2)
        }
        PieceKind::Bishop => drow.abs() == dcol.abs() && path_is_clear(board, mv.from, mv.to),
        PieceKind::Rook => (drow == 0 || dcol == 0) && path_is_clear(board, mv.from, mv.to),
        PieceKind::Queen => {
            (drow.abs() == dcol.abs() || drow == 0 || dcol == 0)
                && path_is_clear(board, mv.from, mv.to)
        }
        PieceKind::King => king_move_legal(board, mv, mover.color, drow, dcol),
    };
    if !geometric {
        return false;
    }

    if exposure == KingExposure::Check && exposes_own_king(board, mv, mover.color) {
        return false;
    }

    true
}

fn pawn_move_legal(board: &Board, mv: &Move, color: Color, drow: i8, dcol: i8) -> bool {
    let forward = color.forward();

    // Straight pushes never capture and need an empty destination.
    if dcol == 0 && mv.captured.is_none() && board.get(mv.to).is_none() {
        if drow == forward {
            return true;
        }
        if drow == 2 * forward && mv.from.row() == color.pawn_home_row() {
            // The square stepped over must also be empty.
            return matches!(mv.from.offset(forward, 0), Some(mid) if board.get(mid).is_none());
        }
        return false;
    }

    // Diagonal steps are captures only. Same-color victims were already
    // rejected, so a present victim settles it.
    if dcol.abs() == 1 && drow == forward {
        if mv.captured.is_some() {
            return true;
        }
        // A raw move not yet corrected for en passant.
        if let Some(ep) = board.en_passant() {
            return mv.to == ep.target && board.piece(ep.pawn).color != color;
        }
    }

    false
}

fn king_move_legal(board: &Board, mv: &Move, color: Color, drow: i8, dcol: i8) -> bool {
    if drow.abs() <= 1 && dcol.abs() <= 1 {
        return !is_targeted(board, color.opposite(), mv.to);
    }

    // Castling: the king shifts exactly two files along its back row.
    if drow != 0 || dcol.abs() != 2 {
        return false;
    }
    let side = if dcol > 0 {
        CastleSide::King
    } else {
        CastleSide::Queen
    };
    castle_legal(board, color, side, mv.from)
}

fn castle_legal(board: &Board, color: Color, side: CastleSide, from: Square) -> bool {
    if !board.castling().allows(color, side) {
        return false;
    }

    let row = color.back_row();
    if from != sq(row, 4) {
        return false;
    }

    // The rook must still be standing on its home square; a right can
    // outlive its rook when the rook is captured without ever moving.
    let rook_home = sq(row, side.rook_home_col());
    match board.piece_at(rook_home) {
        Some(p) if p.kind == PieceKind::Rook && p.color == color && !p.captured => {}
        _ => return false,
    }

    let (between, king_path): (&[u8], [u8; 3]) = match side {
        CastleSide::King => (&[5, 6], [4, 5, 6]),
        CastleSide::Queen => (&[1, 2, 3], [4, 3, 2]),
    };

    if between.iter().any(|&col| board.get(sq(row, col)).is_some()) {
        return false;
    }

    // The king may not castle out of, through, or into check.
    let enemy = color.opposite();
    !king_path
        .iter()
        .any(|&col| is_targeted(board, enemy, sq(row, col)))
}

/// Simulates the move on a throwaway clone and reports whether the mover's
/// own king ends up attacked. Piece ids are stable across the clone, so the
/// move applies verbatim; the real board is never touched.
fn exposes_own_king(board: &Board, mv: &Move, color: Color) -> bool {
    let mut probe = board.clone();
    probe.apply_move(mv);
    is_targeted(&probe, color.opposite(), probe.king_square(color))
}

/// Returns true if any non-captured piece of `attacker` can reach `square`.
///
/// Pawns use their diagonal capture pattern, which differs from how they
/// move; kings use adjacency; knights and sliders delegate to
/// [`is_move_legal`] with exposure checking disabled. The square itself may
/// be empty or hold a piece of either color: a defended friendly piece
/// counts as an attacked square, which is exactly what king-move legality
/// needs.
pub fn is_targeted(board: &Board, attacker: Color, square: Square) -> bool {
    for (id, piece) in board.pieces_of(attacker) {
        let drow = square.row() as i8 - piece.square.row() as i8;
        let dcol = square.col() as i8 - piece.square.col() as i8;

        let hits = match piece.kind {
            PieceKind::Pawn => dcol.abs() == 1 && drow == attacker.forward(),
            PieceKind::King => drow.abs() <= 1 && dcol.abs() <= 1 && (drow != 0 || dcol != 0),
            _ => {
                let probe = Move {
                    from: piece.square,
                    to: square,
                    piece: id,
                    captured: None,
                    promotion: None,
                };
                is_move_legal(board, &probe, KingExposure::Ignore)
            }
        };
        if hits {
            return true;
        }
    }
    false
}

/// Returns true if `color`'s king is currently attacked.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    is_targeted(board, color.opposite(), board.king_square(color))
}

/// Rewrites a raw move into an en passant capture when the board state
/// calls for it.
///
/// A move built from user or network input only knows its coordinates; a
/// pawn stepping diagonally into an empty square that is the recorded en
/// passant target is actually capturing the pawn that just double-stepped.
/// Must run before both legality checking and application.
pub fn correct_en_passant(board: &Board, mv: Move) -> Move {
    let mover = board.piece(mv.piece);
    if mover.kind != PieceKind::Pawn || mv.captured.is_some() {
        return mv;
    }

    if let Some(ep) = board.en_passant() {
        let drow = mv.to.row() as i8 - mv.from.row() as i8;
        let dcol = mv.to.col() as i8 - mv.from.col() as i8;
        if dcol.abs() == 1
            && drow == mover.color.forward()
            && mv.to == ep.target
            && board.piece(ep.pawn).color != mover.color
        {
            return Move {
                captured: Some(ep.pawn),
                ..mv
            };
        }
    }

    mv
}

/// Every geometrically reachable destination for a piece, before legality
/// filtering. Blocked squares are included; `is_move_legal` rejects them.
fn candidate_targets(piece: &Piece) -> Vec<Square> {
    let from = piece.square;
    let mut targets = Vec::new();

    match piece.kind {
        PieceKind::Pawn => {
            let f = piece.color.forward();
            for (drow, dcol) in [(f, 0), (2 * f, 0), (f, -1), (f, 1)] {
                if let Some(to) = from.offset(drow, dcol) {
                    targets.push(to);
                }
            }
        }
        PieceKind::Knight => {
            for &(drow, dcol) in &KNIGHT_OFFSETS {
                if let Some(to) = from.offset(drow, dcol) {
                    targets.push(to);
                }
            }
        }
        PieceKind::Bishop => push_rays(&mut targets, from, &DIAGONAL_DIRS),
        PieceKind::Rook => push_rays(&mut targets, from, &ORTHOGONAL_DIRS),
        PieceKind::Queen => {
            push_rays(&mut targets, from, &DIAGONAL_DIRS);
            push_rays(&mut targets, from, &ORTHOGONAL_DIRS);
        }
        PieceKind::King => {
            for &(drow, dcol) in &KING_OFFSETS {
                if let Some(to) = from.offset(drow, dcol) {
                    targets.push(to);
                }
            }
            // Castle targets two files away on either side.
            for dcol in [2, -2] {
                if let Some(to) = from.offset(0, dcol) {
                    targets.push(to);
                }
            }
        }
    }

    targets
}

fn push_rays(targets: &mut Vec<Square>, from: Square, dirs: &[(i8, i8)]) {
    for &(drow, dcol) in dirs {
        for step in 1..8 {
            match from.offset(drow * step, dcol * step) {
                Some(to) => targets.push(to),
                None => break,
            }
        }
    }
}

/// Generates every legal move for `color`.
///
/// This is both the move list a UI highlights from and the sole mechanism
/// for terminal-state detection: checkmate is defined operationally as "no
/// legal moves while in check". Pure query; calling it twice on an
/// unmutated board yields an identical list.
pub fn legal_moves_for(board: &Board, color: Color) -> Vec<Move> {
    let mut moves = Vec::new();
    for (id, piece) in board.pieces_of(color) {
        for to in candidate_targets(piece) {
            let raw = Move {
                from: piece.square,
                to,
                piece: id,
                captured: board.get(to),
                promotion: None,
            };
            let mv = correct_en_passant(board, raw);
            if is_move_legal(board, &mv, KingExposure::Check) {
                moves.push(mv);
            }
        }
    }
    moves
}

/// Legal destination squares for a single piece, for move-hint
/// highlighting. Empty for a captured piece.
pub fn legal_targets(board: &Board, id: PieceId) -> Vec<Square> {
    let piece = board.piece(id);
    if piece.captured {
        return Vec::new();
    }

    candidate_targets(piece)
        .into_iter()
        .filter(|&to| {
            let raw = Move {
                from: piece.square,
                to,
                piece: id,
                captured: board.get(to),
                promotion: None,
            };
            let mv = correct_en_passant(board, raw);
            is_move_legal(board, &mv, KingExposure::Check)
        })
        .collect()
}

/// Terminal-state check for the side to move: no legal moves means
/// checkmate when the king is attacked, stalemate otherwise.
pub fn game_outcome(board: &Board, to_move: Color) -> Outcome {
    if !legal_moves_for(board, to_move).is_empty() {
        return Outcome::InPlay;
    }
    if is_in_check(board, to_move) {
        Outcome::Checkmate
    } else {
        Outcome::Stalemate
    }
}

fn path_is_clear(board: &Board, from: Square, to: Square) -> bool {
    let drow = to.row() as i8 - from.row() as i8;
    let dcol = to.col() as i8 - from.col() as i8;
    let steps = drow.abs().max(dcol.abs());
    let (step_row, step_col) = (drow.signum(), dcol.signum());

    // Every square strictly between origin and destination must be empty.
    (1..steps).all(|i| match from.offset(step_row * i, step_col * i) {
        Some(between) => board.get(between).is_none(),
        None => false,
    })
}
