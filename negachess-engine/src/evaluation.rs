//! Evaluation functions that return a centipawn.
//!
//! A position is scored as the sum of each piece's material value and a bonus
//! looked up from that piece's piece-square table. White pieces add to the score
//! and Black pieces subtract from it.

use crate::coretypes::{Color, Cp, CpKind, Piece, PieceKind, Square, NUM_FILES, NUM_RANKS};
use crate::coretypes::{Color::*, PieceKind::*};
use crate::movegen::GameStatus;
use crate::position::BoardState;

type Table = [[CpKind; NUM_FILES]; NUM_RANKS];

// Each table point is worth a tenth of a pawn.
const TABLE_SCALE: CpKind = 10;

impl PieceKind {
    /// Default, color independent value per piece.
    pub const fn centipawns(&self) -> Cp {
        Cp(match self {
            Pawn => 100,
            Knight => 300,
            Bishop => 300,
            Rook => 500,
            Queen => 1000,
            King => 0,
        })
    }
}

// Relative Evaluation Functions

/// Given a terminal node, return a score representing a checkmate or a draw.
/// The return score is relative to the player to move.
pub fn terminal(status: GameStatus) -> Cp {
    // Checkmate position is strictly bad for player to move.
    match status {
        GameStatus::Checkmate => -Cp::CHECKMATE,
        _ => Cp::STALEMATE,
    }
}

/// Primary evaluate function for engine, with return relative to player to move.
pub fn evaluate(state: &BoardState, status: GameStatus) -> Cp {
    evaluate_abs(state, status) * state.side_to_move().sign()
}

// Absolute Evaluation Functions

/// Given a terminal node (no moves can be made), return a score representing
/// a checkmate for white/black, or a draw.
pub fn terminal_abs(status: GameStatus, player: Color) -> Cp {
    match (status, player) {
        (GameStatus::Checkmate, White) => -Cp::CHECKMATE,
        (GameStatus::Checkmate, Black) => Cp::CHECKMATE,
        _ => Cp::STALEMATE,
    }
}

/// Primary evaluate function for engine.
/// Terminal positions are scored by `terminal_abs`. Any other position is scored
/// by material and piece placement.
pub fn evaluate_abs(state: &BoardState, status: GameStatus) -> Cp {
    match status {
        GameStatus::Ongoing => state
            .grid()
            .pieces()
            .fold(Cp::default(), |acc, (square, piece)| {
                acc + piece_value(piece, square) * piece.color.sign()
            }),
        _ => terminal_abs(status, state.side_to_move()),
    }
}

/// Returns relative strength difference of pieces in position.
/// Is equivalent of piece_centipawn(White) - pieces_centipawn(Black).
/// A positive value is an advantage for white, 0 is even, negative is advantage for black.
pub fn material(state: &BoardState) -> Cp {
    state
        .grid()
        .pieces()
        .fold(Cp::default(), |acc, (_, piece)| {
            acc + piece.piece_kind.centipawns() * piece.color.sign()
        })
}

/// Material plus positional value of a single piece, always non-negative.
pub fn piece_value(piece: Piece, square: Square) -> Cp {
    piece.piece_kind.centipawns() + piece_square(piece, square)
}

/// Returns the positional bonus of a piece standing on a square.
/// Pawns use a table per color. Other tables are shared by both colors and indexed
/// directly by board coordinates. Kings have no table.
pub fn piece_square(piece: Piece, square: Square) -> Cp {
    let table = match (piece.piece_kind, piece.color) {
        (Pawn, White) => &WHITE_PAWN_TABLE,
        (Pawn, Black) => &BLACK_PAWN_TABLE,
        (Knight, _) => &KNIGHT_TABLE,
        (Bishop, _) => &BISHOP_TABLE,
        (Rook, _) => &ROOK_TABLE,
        (Queen, _) => &QUEEN_TABLE,
        (King, _) => return Cp(0),
    };
    Cp(table[square.row() as usize][square.col() as usize] * TABLE_SCALE)
}

// Piece-square tables, row 0 is rank 8.

#[rustfmt::skip]
const KNIGHT_TABLE: Table = [
    [1, 1, 1, 1, 1, 1, 1, 1],
    [1, 2, 2, 2, 2, 2, 2, 1],
    [1, 2, 3, 3, 3, 3, 2, 1],
    [1, 2, 3, 4, 4, 3, 2, 1],
    [1, 2, 3, 4, 4, 3, 2, 1],
    [1, 2, 3, 3, 3, 3, 2, 1],
    [1, 2, 2, 2, 2, 2, 2, 1],
    [1, 1, 1, 1, 1, 1, 1, 1],
];

#[rustfmt::skip]
const BISHOP_TABLE: Table = [
    [4, 3, 2, 1, 1, 2, 3, 4],
    [3, 4, 3, 2, 2, 3, 4, 3],
    [2, 3, 4, 3, 3, 4, 3, 2],
    [1, 2, 3, 4, 4, 3, 2, 1],
    [1, 2, 3, 4, 4, 3, 2, 1],
    [2, 3, 4, 3, 3, 4, 3, 2],
    [3, 4, 3, 2, 2, 3, 4, 3],
    [1, 1, 1, 1, 1, 1, 1, 1],
];

#[rustfmt::skip]
const QUEEN_TABLE: Table = [
    [1, 1, 1, 3, 1, 1, 1, 1],
    [1, 2, 3, 3, 3, 1, 1, 1],
    [1, 4, 3, 3, 3, 4, 2, 1],
    [1, 2, 3, 3, 3, 2, 2, 1],
    [1, 2, 3, 3, 3, 2, 2, 1],
    [1, 4, 3, 3, 3, 4, 2, 1],
    [1, 2, 3, 3, 3, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1],
];

#[rustfmt::skip]
const ROOK_TABLE: Table = [
    [4, 3, 4, 4, 4, 4, 3, 4],
    [4, 4, 4, 4, 4, 4, 4, 4],
    [1, 1, 2, 3, 3, 2, 1, 1],
    [1, 2, 3, 4, 4, 3, 2, 1],
    [1, 2, 3, 4, 4, 3, 2, 1],
    [1, 1, 2, 3, 3, 2, 1, 1],
    [4, 4, 4, 4, 4, 4, 4, 4],
    [4, 3, 4, 4, 4, 4, 3, 4],
];

#[rustfmt::skip]
const WHITE_PAWN_TABLE: Table = [
    [8, 8, 8, 8, 8, 8, 8, 8],
    [8, 8, 8, 8, 8, 8, 8, 8],
    [5, 6, 6, 7, 7, 6, 6, 5],
    [2, 3, 3, 5, 5, 3, 3, 2],
    [1, 2, 3, 4, 4, 3, 2, 1],
    [1, 1, 2, 3, 3, 2, 1, 1],
    [1, 1, 1, 0, 0, 1, 1, 1],
    [0, 0, 0, 0, 0, 0, 0, 0],
];

#[rustfmt::skip]
const BLACK_PAWN_TABLE: Table = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [1, 1, 1, 0, 0, 1, 1, 1],
    [1, 1, 2, 3, 3, 2, 1, 1],
    [1, 2, 3, 4, 4, 3, 2, 1],
    [2, 3, 3, 5, 5, 3, 3, 2],
    [5, 6, 6, 7, 7, 6, 6, 5],
    [8, 8, 8, 8, 8, 8, 8, 8],
    [8, 8, 8, 8, 8, 8, 8, 8],
];
