//! Performance Test
//!
//! [Perft](https://www.chessprogramming.org/Perft)
//!
//! A simple debugging and testing function used to count
//! the number of nodes at a specific depth.
//!
//! A promotion is a single move whose piece is chosen when it is made,
//! so each promoting pawn step counts once rather than four times.

use std::ops::{Add, AddAssign};
use std::sync::{Arc, Mutex};
use std::thread;

use crate::coretypes::PlyKind;
use crate::movelist::MoveList;
use crate::position::BoardState;

/// Debugging information about results of perft test.
/// nodes: Number of nodes at lowest depth of perft.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PerftInfo {
    pub nodes: u64,
}

impl PerftInfo {
    fn new(nodes: u64) -> Self {
        PerftInfo { nodes }
    }
}

impl Add for PerftInfo {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        PerftInfo {
            nodes: self.nodes + rhs.nodes,
        }
    }
}

impl AddAssign for PerftInfo {
    fn add_assign(&mut self, rhs: Self) {
        self.nodes += rhs.nodes;
    }
}

// Count the number of nodes at a certain depth.
// This ignores higher terminal nodes.
// In other words, it counts the number of paths to the given depth.
pub fn perft(mut state: BoardState, ply: PlyKind, threads: usize) -> PerftInfo {
    // Guard easy to calculate inputs.
    if ply == 0 {
        // Ever only 1 position at 0 ply.
        return PerftInfo::new(1);
    } else if ply <= 2 || threads <= 1 {
        // Simple enough to not require threads, or single threaded.
        return perft_recurse(&mut state, ply);
    }
    debug_assert!(ply > 2);
    debug_assert!(threads > 1);

    let legal_moves = state.legal_moves().moves;
    // Guard no moves to search.
    if legal_moves.is_empty() {
        return PerftInfo::new(0);
    }

    let legal_moves = Arc::new(Mutex::new(legal_moves));
    let total_perft_info = Arc::new(Mutex::new(PerftInfo::new(0)));
    let mut handles = Vec::new();

    // Create threads to process partitioned moves.
    for _ in 0..threads {
        let state = state.clone();
        let legal_moves = Arc::clone(&legal_moves);
        let total_perft_info = Arc::clone(&total_perft_info);

        let handle = thread::spawn(move || {
            perft_executor(state, ply, legal_moves, total_perft_info);
        });

        handles.push(handle);
    }

    // Wait for all handles to finish.
    for handle in handles {
        handle.join().expect("perft worker panicked");
    }

    let total = *total_perft_info.lock().expect("perft total poisoned");
    total
}

/// perft_executor works by stealing one move at a time from given moves list and running perft on that move.
/// When there are no moves left to steal, this function stores the data it has collected so far and returns.
/// params:
/// state - position to evaluate moves on, owned by this worker.
/// ply - ply of provided position. Must be greater than 1.
/// moves - synchronous access to list of moves to steal from. Moves must be valid for given position.
/// perft_info - place to store information post execution.
fn perft_executor(
    mut state: BoardState,
    ply: PlyKind,
    moves: Arc<Mutex<MoveList>>,
    total_perft_info: Arc<Mutex<PerftInfo>>,
) {
    debug_assert!(ply > 1);
    let steal = || moves.lock().expect("perft moves poisoned").pop();
    let mut perft_info = PerftInfo::new(0);

    while let Some(move_) = steal() {
        state.make(move_, None);
        perft_info += perft_recurse(&mut state, ply - 1);
        state.undo();
    }

    *total_perft_info.lock().expect("perft total poisoned") += perft_info;
}

/// Ply must be non-zero.
fn perft_recurse(state: &mut BoardState, ply: PlyKind) -> PerftInfo {
    debug_assert_ne!(ply, 0);
    let legal_moves = state.legal_moves();
    if ply == 1 {
        // If we reach the depth before the end,
        // return the count of legal moves.
        PerftInfo::new(legal_moves.len() as u64)
    } else {
        let mut perft_info = PerftInfo::new(0);
        for &legal_move in legal_moves.iter() {
            state.make(legal_move, None);
            perft_info += perft_recurse(state, ply - 1);
            state.undo();
        }
        perft_info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::Fen;

    #[test]
    fn perft_start_position_shallow() {
        let start = BoardState::start_position();
        assert_eq!(perft(start.clone(), 0, 1).nodes, 1);
        assert_eq!(perft(start.clone(), 1, 1).nodes, 20);
        assert_eq!(perft(start.clone(), 2, 1).nodes, 400);
        assert_eq!(perft(start, 3, 2).nodes, 8902);
    }

    #[test]
    fn perft_terminal_root_is_zero() {
        let stalemate = BoardState::parse_fen("k7/8/1Q6/8/8/8/8/7K b - - 0 1").unwrap();
        assert_eq!(perft(stalemate.clone(), 1, 1).nodes, 0);
        assert_eq!(perft(stalemate, 3, 4).nodes, 0);
    }
}
