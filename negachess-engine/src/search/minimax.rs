//! Minimax implementation.

use crate::coretypes::Color::*;
use crate::coretypes::{Cp, Move, PlyKind};
use crate::evaluation::evaluate_abs;
use crate::movegen::LegalMoves;
use crate::position::BoardState;

const WHITE: u8 = White as u8;
const BLACK: u8 = Black as u8;

/// Base minimax call. White is the maxing player and Black is the minning player,
/// so the returned score is absolute.
/// It returns the best move and score for the position in the search tree.
pub fn minimax(state: &mut BoardState, ply: PlyKind) -> (Cp, Option<Move>) {
    let legal_moves = state.legal_moves();
    let mut nodes = 0;
    minimax_impl(state, &legal_moves, ply, &mut nodes)
}

/// Dispatches to the maxing or minning walk for the side to move of `state`.
pub(crate) fn minimax_impl(
    state: &mut BoardState,
    legal_moves: &LegalMoves,
    ply: PlyKind,
    nodes: &mut u64,
) -> (Cp, Option<Move>) {
    match state.side_to_move() {
        White => minimax_color::<WHITE>(state, legal_moves, ply, nodes),
        Black => minimax_color::<BLACK>(state, legal_moves, ply, nodes),
    }
}

/// COLOR is the side to move of `state`. White keeps the first strictly greater
/// score and Black keeps the first strictly lower score.
fn minimax_color<const COLOR: u8>(
    state: &mut BoardState,
    legal_moves: &LegalMoves,
    ply: PlyKind,
    nodes: &mut u64,
) -> (Cp, Option<Move>) {
    *nodes += 1;

    // Stop at terminal node: Checkmate/Stalemate/last depth.
    if ply == 0 || legal_moves.is_empty() {
        return (evaluate_abs(state, legal_moves.status), None);
    }

    let mut best_cp = match COLOR {
        WHITE => Cp::MIN,
        _ => Cp::MAX,
    };
    let mut best_move = None;

    for &legal_move in legal_moves.iter() {
        state.make(legal_move, None);
        let child_moves = state.legal_moves();
        let (move_cp, _) = match COLOR {
            WHITE => minimax_color::<BLACK>(state, &child_moves, ply - 1, nodes),
            _ => minimax_color::<WHITE>(state, &child_moves, ply - 1, nodes),
        };
        state.undo();

        let improves = match COLOR {
            WHITE => move_cp > best_cp,
            _ => move_cp < best_cp,
        };
        if improves {
            best_cp = move_cp;
            best_move = Some(legal_move);
        }
    }

    (best_cp, best_move)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::Fen;
    use crate::search::negamax;

    #[test]
    fn black_minimizes() {
        // Black to move can win the white queen.
        let mut state = BoardState::parse_fen("4k3/8/8/3q4/8/8/3Q4/4K3 b - - 0 1").unwrap();
        let (score, best_move) = minimax(&mut state, 1);
        let best_move = best_move.unwrap();

        assert_eq!(best_move.to_string(), "d5d2");
        assert!(score < Cp(0));
    }

    #[test]
    fn matches_negamax_absolute() {
        let fens = [
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 2 3",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        ];
        for fen in fens {
            let mut state = BoardState::parse_fen(fen).unwrap();
            let sign = state.side_to_move().sign();
            for ply in 0..=2 {
                let (nega_score, nega_move) = negamax(&mut state, ply);
                assert_eq!(minimax(&mut state, ply), (nega_score * sign, nega_move), "{fen} {ply}");
            }
        }
    }
}
