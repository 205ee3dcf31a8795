//! Negamax with Alpha-Beta pruning implementation.

use crate::coretypes::{Cp, Move, PlyKind};
use crate::evaluation::{evaluate, terminal};
use crate::movegen::LegalMoves;
use crate::position::BoardState;

/// Base alpha_beta call. Searches with a full window, so the score and move
/// returned are the same as an unpruned `negamax` search of the same depth.
/// The returned score is relative to the side to move of `state`.
pub fn alpha_beta(state: &mut BoardState, ply: PlyKind) -> (Cp, Option<Move>) {
    let legal_moves = state.legal_moves();
    let mut nodes = 0;
    alpha_beta_impl(state, &legal_moves, ply, Cp::MIN, Cp::MAX, &mut nodes)
}

/// Properties of Alpha-Beta pruning.
/// * Alpha is the best score the current player is already guaranteed.
/// * Beta is the best score the opposite player is already guaranteed, seen from the current player.
/// * Once alpha reaches beta, no remaining sibling can change the parent's choice and the
///   node is cut off.
///
/// The returned score may fall outside of the window (fail-soft). Scores are only
/// replaced on strict improvement, so the first of equally scored moves is kept.
pub(crate) fn alpha_beta_impl(
    state: &mut BoardState,
    legal_moves: &LegalMoves,
    ply: PlyKind,
    mut alpha: Cp,
    beta: Cp,
    nodes: &mut u64,
) -> (Cp, Option<Move>) {
    *nodes += 1;

    if ply == 0 {
        return (evaluate(state, legal_moves.status), None);
    }
    if legal_moves.is_empty() {
        return (terminal(legal_moves.status), None);
    }

    let mut best_score = Cp::MIN;
    let mut best_move = None;

    for &legal_move in legal_moves.iter() {
        state.make(legal_move, None);
        let child_moves = state.legal_moves();
        let (child_score, _) = alpha_beta_impl(state, &child_moves, ply - 1, -beta, -alpha, nodes);
        state.undo();

        let move_score = -child_score;
        if move_score > best_score {
            best_score = move_score;
            best_move = Some(legal_move);
        }
        if best_score > alpha {
            alpha = best_score;
        }
        // Cut-off has occurred, no further children of this position need to be searched.
        if alpha >= beta {
            break;
        }
    }

    (best_score, best_move)
}
