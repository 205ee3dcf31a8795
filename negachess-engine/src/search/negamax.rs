//! Negamax implementation of Minimax.

use crate::coretypes::{Cp, Move, PlyKind};
use crate::evaluation::{evaluate, terminal};
use crate::movegen::LegalMoves;
use crate::position::BoardState;

/// Negamax searches to a given depth and returns the best move found.
/// The player whose turn it is to move is always treated as the maxing player,
/// so the returned score is relative to the side to move of `state`.
pub fn negamax(state: &mut BoardState, ply: PlyKind) -> (Cp, Option<Move>) {
    let legal_moves = state.legal_moves();
    let mut nodes = 0;
    negamax_impl(state, &legal_moves, ply, &mut nodes)
}

/// negamax_impl returns the max possible score of the current maxing player,
/// and the first move that reaches it. A child's score is negated to be seen from
/// the current player's side.
///
/// Parameters:
///
/// state: current position to search.
/// legal_moves: legal moves of `state`, generated by the caller.
/// ply: remaining depth to search to.
/// nodes: Counter for number of nodes visited in search.
pub(crate) fn negamax_impl(
    state: &mut BoardState,
    legal_moves: &LegalMoves,
    ply: PlyKind,
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
        let (child_score, _) = negamax_impl(state, &child_moves, ply - 1, nodes);
        state.undo();

        let move_score = -child_score;
        if move_score > best_score {
            best_score = move_score;
            best_move = Some(legal_move);
        }
    }

    (best_score, best_move)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coretypes::{Color, Square::*};
    use crate::fen::Fen;

    #[test]
    fn finds_back_rank_mate() {
        let mut state = BoardState::parse_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let (score, best_move) = negamax(&mut state, 1);
        let best_move = best_move.unwrap();

        assert_eq!(score, Cp::CHECKMATE);
        assert_eq!((best_move.start(), best_move.end()), (A1, A8));
    }

    #[test]
    fn mated_side_scores_negative_checkmate() {
        let mut state = BoardState::parse_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert_eq!(negamax(&mut state, 3), (-Cp::CHECKMATE, None));
    }

    #[test]
    fn color_sign() {
        let cp = Cp(40);
        let w_signed = cp * Color::White.sign();
        let b_signed = cp * Color::Black.sign();
        assert_eq!(w_signed, Cp(40));
        assert_eq!(b_signed, Cp(-40));
    }
}
