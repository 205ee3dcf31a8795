//! Attack analysis centered on a single square.
//!
//! Rays are cast outward from a king (or a square a king might step to) to find
//! every enemy piece giving check and every friendly piece pinned against it.

use arrayvec::ArrayVec;

use crate::boardrepr::Mailbox;
use crate::coretypes::{Color, Direction, Piece, PieceKind, Square};
use crate::position::BoardState;

pub const ORTHOGONALS: [Direction; 4] = [(-1, 0), (0, -1), (1, 0), (0, 1)];
pub const DIAGONALS: [Direction; 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
#[rustfmt::skip]
pub const KNIGHT_JUMPS: [Direction; 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];

/// A friendly piece that shields the king from an enemy slider.
/// `axis` points from the king toward the pinned piece.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Pin {
    pub square: Square,
    pub axis: Direction,
}

/// An enemy piece attacking the analyzed square.
/// `axis` points from the analyzed square toward the attacker.
/// Knight checks cannot be blocked, so only capturing the knight resolves them.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Check {
    pub attacker: Square,
    pub axis: Direction,
    pub capture_only: bool,
}

#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct AttackInfo {
    pub in_check: bool,
    pub pins: ArrayVec<Pin, 8>,
    pub checks: ArrayVec<Check, 16>,
}

impl AttackInfo {
    /// Returns the axis a piece on `square` is pinned along, if it is pinned.
    pub fn pin_axis(&self, square: Square) -> Option<Direction> {
        self.pins
            .iter()
            .find(|pin| pin.square == square)
            .map(|pin| pin.axis)
    }
}

/// Returns true if `dir` moves along `axis` in either direction.
pub(crate) fn along_axis(dir: Direction, axis: Direction) -> bool {
    dir == axis || dir == (-axis.0, -axis.1)
}

/// Returns true if `piece`, found `distance` squares away along `axis`, attacks back
/// toward the origin of the ray.
fn attacks_along(piece: Piece, axis: Direction, distance: i8) -> bool {
    let orthogonal = axis.0 == 0 || axis.1 == 0;
    match piece.piece_kind {
        PieceKind::Rook => orthogonal,
        PieceKind::Bishop => !orthogonal,
        PieceKind::Queen => true,
        PieceKind::King => distance == 1,
        // Pawns attack forward diagonally, so they are found behind the origin.
        PieceKind::Pawn => distance == 1 && !orthogonal && axis.0 == -piece.color.forward(),
        PieceKind::Knight => false,
    }
}

/// Analyzes checks and pins against the side to move's king.
///
/// # Panics
/// Panics if the side to move's king is not on its recorded square.
pub fn analyze(state: &BoardState) -> AttackInfo {
    let color = state.side_to_move;
    let king = state.king_location(color);
    assert_eq!(
        state.grid[king],
        Some(Piece::new(color, PieceKind::King)),
        "{color} king is not on {king}"
    );
    analyze_from(&state.grid, king, color)
}

/// Analyzes checks and pins against a king of `color` standing on `origin`.
///
/// The king of `color` is transparent to rays, wherever it currently stands,
/// so that `origin` may be a square the king is considering stepping to.
/// The board is never mutated.
pub fn analyze_from(grid: &Mailbox, origin: Square, color: Color) -> AttackInfo {
    let mut info = AttackInfo::default();

    for axis in ORTHOGONALS.into_iter().chain(DIAGONALS) {
        let mut shield: Option<Square> = None;
        let mut distance = 1;

        while let Some(square) = origin.offset(axis, distance) {
            match grid[square] {
                None => (),
                Some(piece) if piece.color == color => {
                    if piece.piece_kind == PieceKind::King {
                        // Transparent.
                    } else if shield.is_none() {
                        shield = Some(square);
                    } else {
                        break;
                    }
                }
                Some(piece) => {
                    if attacks_along(piece, axis, distance) {
                        match shield {
                            None => {
                                info.in_check = true;
                                info.checks.push(Check {
                                    attacker: square,
                                    axis,
                                    capture_only: false,
                                });
                            }
                            Some(pinned) => info.pins.push(Pin {
                                square: pinned,
                                axis,
                            }),
                        }
                    }
                    break;
                }
            }
            distance += 1;
        }
    }

    let enemy_knight = Some(Piece::new(!color, PieceKind::Knight));
    for jump in KNIGHT_JUMPS {
        if let Some(square) = origin.offset(jump, 1) {
            if grid[square] == enemy_knight {
                info.in_check = true;
                info.checks.push(Check {
                    attacker: square,
                    axis: jump,
                    capture_only: true,
                });
            }
        }
    }

    info
}

/// Returns true if any enemy of `color` attacks `square`.
pub fn is_attacked(grid: &Mailbox, square: Square, color: Color) -> bool {
    analyze_from(grid, square, color).in_check
}
