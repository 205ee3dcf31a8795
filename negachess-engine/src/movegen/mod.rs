//! Legal move generation for the side to move.
//!
//! Moves are first generated pseudo-legally while respecting pins, then filtered
//! by the number of checks against the king:
//! * no check: every pin-respecting move plus castling.
//! * single check: king moves, and moves that capture the checker or block its ray.
//! * double check: king moves only.

mod attacks;

pub use attacks::{
    analyze, analyze_from, is_attacked, AttackInfo, Check, Pin, DIAGONALS, KNIGHT_JUMPS,
    ORTHOGONALS,
};

use arrayvec::ArrayVec;
use std::fmt::{self, Display};

use attacks::along_axis;

use crate::boardrepr::Mailbox;
use crate::coretypes::{Castling, Color, Direction, Move, Piece, PieceKind, Square};
use crate::movelist::MoveList;
use crate::position::BoardState;

/// Whether a position still has moves to play, and if not, how it ended.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GameStatus {
    Ongoing,
    Checkmate,
    Stalemate,
}

impl GameStatus {
    /// A side with no legal moves is checkmated when in check, and stalemated otherwise.
    pub const fn classify(has_moves: bool, in_check: bool) -> Self {
        match (has_moves, in_check) {
            (true, _) => GameStatus::Ongoing,
            (false, true) => GameStatus::Checkmate,
            (false, false) => GameStatus::Stalemate,
        }
    }

    pub const fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }
}

impl Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            GameStatus::Ongoing => "ongoing",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
        })
    }
}

/// Every legal move of the side to move, and the game status they imply.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LegalMoves {
    pub moves: MoveList,
    pub status: GameStatus,
    pub in_check: bool,
}

impl LegalMoves {
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Move> {
        self.moves.iter()
    }

    /// Returns the legal move between two squares, if one exists.
    pub fn find(&self, start: Square, end: Square) -> Option<Move> {
        self.moves
            .iter()
            .find(|move_| move_.start == start && move_.end == end)
            .copied()
    }

    pub fn contains(&self, start: Square, end: Square) -> bool {
        self.find(start, end).is_some()
    }
}

/// Returns all legal moves for the side to move in `state`.
pub fn legal_moves(state: &BoardState) -> LegalMoves {
    let color = state.side_to_move;
    let king = state.king_location(color);
    let info = analyze(state);
    let mut moves = MoveList::new();

    match info.checks.as_slice() {
        [] => {
            pseudo_moves(state, &info, &mut moves);
            castling_moves(state, &mut moves);
        }
        [check] => {
            let resolving = resolving_squares(king, check);
            let mut candidates = MoveList::new();
            pseudo_moves(state, &info, &mut candidates);
            moves.extend(candidates.into_iter().filter(|move_| {
                move_.piece_moved.piece_kind == PieceKind::King
                    || move_.is_en_passant
                    || resolving.contains(&move_.end)
            }));
        }
        _ => king_moves(&state.grid, king, color, &mut moves),
    }

    let status = GameStatus::classify(!moves.is_empty(), info.in_check);
    LegalMoves {
        moves,
        status,
        in_check: info.in_check,
    }
}

/// Squares a non-king piece may move to in order to answer a single check.
/// Walks from the king toward the checker, inclusive. A knight can only be captured.
fn resolving_squares(king: Square, check: &Check) -> ArrayVec<Square, 8> {
    let mut squares = ArrayVec::new();
    if check.capture_only {
        squares.push(check.attacker);
        return squares;
    }

    let mut distance = 1;
    while let Some(square) = king.offset(check.axis, distance) {
        squares.push(square);
        if square == check.attacker {
            break;
        }
        distance += 1;
    }
    squares
}

/// Generate all pseudo-legal moves of the side to move that respect pins, and append
/// to move list. King moves are fully legal. Castling is not generated here.
fn pseudo_moves(state: &BoardState, info: &AttackInfo, moves: &mut MoveList) {
    let color = state.side_to_move;
    let grid = &state.grid;

    for (square, piece) in grid.pieces().filter(|(_, piece)| piece.color == color) {
        let pin = info.pin_axis(square);
        match piece.piece_kind {
            PieceKind::Pawn => pawn_moves(state, square, piece, pin, moves),
            PieceKind::Knight => knight_moves(grid, square, piece, pin, moves),
            PieceKind::Bishop => slider_moves(grid, square, piece, &DIAGONALS, pin, moves),
            PieceKind::Rook => slider_moves(grid, square, piece, &ORTHOGONALS, pin, moves),
            PieceKind::Queen => {
                slider_moves(grid, square, piece, &ORTHOGONALS, pin, moves);
                slider_moves(grid, square, piece, &DIAGONALS, pin, moves);
            }
            PieceKind::King => king_moves(grid, square, color, moves),
        }
    }
}

/// Returns true if a piece pinned along `pin`, if any, may step in direction `dir`.
fn respects_pin(dir: Direction, pin: Option<Direction>) -> bool {
    pin.map_or(true, |axis| along_axis(dir, axis))
}

/// Generate pseudo-legal pawn pushes and captures from a square, and append to move list.
/// params:
/// state - position to generate in, for its board and en passant target.
/// from - square of the pawn.
/// pawn - the pawn piece.
/// pin - axis the pawn is pinned along, if any.
/// moves - move list to add new moves to.
fn pawn_moves(
    state: &BoardState,
    from: Square,
    pawn: Piece,
    pin: Option<Direction>,
    moves: &mut MoveList,
) {
    let grid = &state.grid;
    let forward = pawn.color.forward();
    let push: Direction = (forward, 0);

    if respects_pin(push, pin) {
        if let Some(single) = from.offset(push, 1) {
            if grid[single].is_none() {
                moves.push(Move::new(from, single, pawn, None));

                if from.row() == pawn.color.pawn_row() {
                    if let Some(double) = from.offset(push, 2) {
                        if grid[double].is_none() {
                            moves.push(Move::new(from, double, pawn, None));
                        }
                    }
                }
            }
        }
    }

    for side in [-1, 1] {
        let capture: Direction = (forward, side);
        let target = match from.offset(capture, 1) {
            Some(target) => target,
            None => continue,
        };

        match grid[target] {
            Some(enemy) if enemy.color != pawn.color => {
                if respects_pin(capture, pin) {
                    moves.push(Move::new(from, target, pawn, Some(enemy)));
                }
            }
            None if state.en_passant == Some(target) => {
                let move_ = Move::en_passant(from, target, pawn);
                if en_passant_is_safe(state, &move_) {
                    moves.push(move_);
                }
            }
            _ => (),
        }
    }
}

/// En passant removes two pawns from a row at once, which can expose the king in ways
/// pin detection does not see. The capture is tried on a copy of the board and kept only
/// if the mover's king is safe afterward.
fn en_passant_is_safe(state: &BoardState, move_: &Move) -> bool {
    let color = move_.piece_moved.color;
    let victim = Square::at(move_.start.row(), move_.end.col());
    if state.grid[victim] != Some(Piece::new(!color, PieceKind::Pawn)) {
        return false;
    }

    let mut grid = state.grid.clone();
    grid[move_.start] = None;
    grid[victim] = None;
    grid[move_.end] = Some(move_.piece_moved);
    !is_attacked(&grid, state.king_location(color), color)
}

/// Generate pseudo-legal knight moves from a square. A pinned knight cannot move.
fn knight_moves(
    grid: &Mailbox,
    from: Square,
    knight: Piece,
    pin: Option<Direction>,
    moves: &mut MoveList,
) {
    if pin.is_some() {
        return;
    }
    for jump in KNIGHT_JUMPS {
        if let Some(to) = from.offset(jump, 1) {
            match grid[to] {
                Some(piece) if piece.color == knight.color => (),
                target => moves.push(Move::new(from, to, knight, target)),
            }
        }
    }
}

/// Generate pseudo-legal sliding moves from a square along each of `directions`.
/// Each ray stops on the first piece, including it when it is an enemy.
fn slider_moves(
    grid: &Mailbox,
    from: Square,
    slider: Piece,
    directions: &[Direction],
    pin: Option<Direction>,
    moves: &mut MoveList,
) {
    for &dir in directions.iter().filter(|&&dir| respects_pin(dir, pin)) {
        let mut distance = 1;
        while let Some(to) = from.offset(dir, distance) {
            match grid[to] {
                None => moves.push(Move::new(from, to, slider, None)),
                Some(piece) => {
                    if piece.color != slider.color {
                        moves.push(Move::new(from, to, slider, Some(piece)));
                    }
                    break;
                }
            }
            distance += 1;
        }
    }
}

/// Generate legal king steps. Each destination is checked for attacks as though
/// the king already stood there.
fn king_moves(grid: &Mailbox, from: Square, color: Color, moves: &mut MoveList) {
    let king = Piece::new(color, PieceKind::King);
    for dir in ORTHOGONALS.into_iter().chain(DIAGONALS) {
        if let Some(to) = from.offset(dir, 1) {
            match grid[to] {
                Some(piece) if piece.color == color => (),
                target => {
                    if !is_attacked(grid, to, color) {
                        moves.push(Move::new(from, to, king, target));
                    }
                }
            }
        }
    }
}

/// Generate castling moves and append to move list.
/// Castling is legal if the right is held, the squares between king and rook are empty,
/// and the king does not pass through or land on an attacked square.
/// Only called when the king is not in check.
fn castling_moves(state: &BoardState, moves: &mut MoveList) {
    let color = state.side_to_move;
    let row = color.back_row();
    let king_square = Square::at(row, 4);
    let king = Piece::new(color, PieceKind::King);
    let grid = &state.grid;

    let empty = |cols: &[u8]| cols.iter().all(|&col| grid[Square::at(row, col)].is_none());
    let safe = |cols: &[u8]| {
        cols.iter()
            .all(|&col| !is_attacked(grid, Square::at(row, col), color))
    };

    if state.castling.has(Castling::kingside(color)) && empty(&[5, 6]) && safe(&[5, 6]) {
        moves.push(Move::castle(king_square, Square::at(row, 6), king));
    }
    if state.castling.has(Castling::queenside(color)) && empty(&[3, 2, 1]) && safe(&[3, 2]) {
        moves.push(Move::castle(king_square, Square::at(row, 2), king));
    }
}
