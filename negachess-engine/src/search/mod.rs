//! Search functions.

mod alpha_beta;
mod minimax;
mod negamax;

pub use alpha_beta::*;
pub use minimax::*;
pub use negamax::*;

use std::fmt::{self, Display};
use std::str::FromStr;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::coretypes::{Color, Cp, Move, PlyKind};
use crate::error::{self, ErrorKind};
use crate::movegen::LegalMoves;
use crate::position::BoardState;

/// Tree walk used to pick a move. All three find the same score for a position.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Algorithm {
    /// Two-sided minimax over absolute scores.
    Minimax,
    /// Negamax over scores relative to the side to move.
    Negamax,
    /// Negamax with alpha-beta pruning.
    #[default]
    AlphaBeta,
}

impl Algorithm {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Minimax => "minimax",
            Algorithm::Negamax => "negamax",
            Algorithm::AlphaBeta => "alphabeta",
        }
    }
}

impl FromStr for Algorithm {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimax" => Ok(Algorithm::Minimax),
            "negamax" => Ok(Algorithm::Negamax),
            "alphabeta" | "alpha-beta" | "alpha_beta" | "ab" => Ok(Algorithm::AlphaBeta),
            _ => Err((ErrorKind::ParseAlgorithmMalformed, s.trim()).into()),
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The results found from running a search on some root position.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The best move to make for a position discovered from search.
    /// None only when the root position has no legal moves.
    pub best_move: Option<Move>,
    /// The centipawn score of making the best move, with absolute Cp (+White, -Black).
    pub score: Cp,
    /// The player to move for the root position that was searched.
    pub player: Color,
    /// Depth (aka ply, half move) in plies that was searched.
    pub depth: PlyKind,
    /// Tree walk that produced this result.
    pub algorithm: Algorithm,
    /// Total number of nodes visited in a search, including the root.
    pub nodes: u64,
    /// Total time elapsed from the start to the end of a search.
    pub elapsed: Duration,
}

impl SearchResult {
    /// Get average nodes per second of search.
    pub fn nps(&self) -> f64 {
        (self.nodes as f64 / self.elapsed.as_secs_f64()).round()
    }

    /// Converts the score of the search into one that is relative to search's root player.
    pub fn relative_score(&self) -> Cp {
        self.score * self.player.sign()
    }

    /// Converts the score of the search into one that is absolute, with White as + and Black as -.
    pub fn absolute_score(&self) -> Cp {
        self.score
    }

    /// Returns the color who is leading in the search of the root position, or None if drawn.
    pub fn leading(&self) -> Option<Color> {
        match self.absolute_score().signum() {
            1 => Some(Color::White),
            -1 => Some(Color::Black),
            _ => None,
        }
    }
}

impl Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let best_move = match self.best_move {
            Some(move_) => move_.to_string(),
            None => String::from("none"),
        };

        let mut displayed = String::new();
        displayed.push_str("SearchResult {\n");
        displayed.push_str(&format!("    best_move: {}\n", best_move));
        displayed.push_str(&format!("    abs_score: {}\n", self.absolute_score()));
        displayed.push_str(&format!("    player   : {}\n", self.player));
        displayed.push_str(&format!("    depth    : {}\n", self.depth));
        displayed.push_str(&format!("    algorithm: {}\n", self.algorithm));
        displayed.push_str(&format!("    nodes    : {}\n", self.nodes));
        displayed.push_str(&format!("    nps      : {}\n", self.nps()));
        displayed.push_str(&format!(
            "    elapsed  : {}.{:03}s\n",
            self.elapsed.as_secs(),
            self.elapsed.subsec_millis()
        ));
        displayed.push_str("}\n");

        write!(f, "{displayed}")
    }
}

/// Negachess Engine primary position search function.
/// Searches `state` to `depth` plies and returns the best move found with its score.
/// The state is walked with make/undo and is returned to its original value.
pub fn search(state: &mut BoardState, depth: PlyKind, algorithm: Algorithm) -> SearchResult {
    let legal_moves = state.legal_moves();
    search_legal(state, &legal_moves, depth, algorithm)
}

/// Search with the root's legal moves already generated by the caller.
pub fn search_legal(
    state: &mut BoardState,
    legal_moves: &LegalMoves,
    depth: PlyKind,
    algorithm: Algorithm,
) -> SearchResult {
    let player = state.side_to_move();
    let instant = Instant::now();
    let mut nodes = 0;

    let (score, best_move) = match algorithm {
        Algorithm::Minimax => minimax::minimax_impl(state, legal_moves, depth, &mut nodes),
        Algorithm::Negamax => {
            let (score, best_move) = negamax::negamax_impl(state, legal_moves, depth, &mut nodes);
            (score * player.sign(), best_move)
        }
        Algorithm::AlphaBeta => {
            let (score, best_move) =
                alpha_beta::alpha_beta_impl(state, legal_moves, depth, Cp::MIN, Cp::MAX, &mut nodes);
            (score * player.sign(), best_move)
        }
    };

    let result = SearchResult {
        best_move,
        score,
        player,
        depth,
        algorithm,
        nodes,
        elapsed: instant.elapsed(),
    };
    debug!(
        "{} depth {} chose {:?} score {} after {} nodes in {:?}",
        algorithm, depth, result.best_move.map(|m| m.to_string()), score, nodes, result.elapsed
    );
    result
}

/// Returns the move a search of `depth` plies chooses from `legal_moves`.
/// Falls back to a uniformly random legal move if search yields none.
/// Returns None only when there are no legal moves.
pub fn find_best_move<R: Rng + ?Sized>(
    state: &mut BoardState,
    legal_moves: &LegalMoves,
    depth: PlyKind,
    algorithm: Algorithm,
    rng: &mut R,
) -> Option<Move> {
    search_legal(state, legal_moves, depth, algorithm)
        .best_move
        .or_else(|| random_move(legal_moves, rng))
}

/// Uniformly random choice among legal moves.
pub fn random_move<R: Rng + ?Sized>(legal_moves: &LegalMoves, rng: &mut R) -> Option<Move> {
    let chosen = legal_moves.moves.choose(rng).copied();
    if let Some(move_) = chosen {
        warn!("search found no move, playing random move {move_}");
    }
    chosen
}

/// Negachess Engine non-blocking search function. This runs the search on a separate thread.
/// When the search has been completed, it returns the value by sending it over the given Sender.
///
/// # Arguments
///
/// * `state`: Position to search, moved into the search thread
/// * `depth`: Number of plies to search
/// * `algorithm`: Tree walk to search with
/// * `sender`: Channel to send search result over
pub fn search_nonblocking<T>(
    mut state: BoardState,
    depth: PlyKind,
    algorithm: Algorithm,
    sender: mpsc::Sender<T>,
) -> thread::JoinHandle<()>
where
    T: 'static + Send + From<SearchResult>,
{
    thread::spawn(move || {
        let search_result = search(&mut state, depth, algorithm);
        if sender.send(search_result.into()).is_err() {
            warn!("search result receiver dropped before search completed");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coretypes::Square::*;
    use crate::evaluation::evaluate_abs;
    use crate::fen::Fen;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn parse_algorithm() {
        assert_eq!("minimax".parse::<Algorithm>().unwrap(), Algorithm::Minimax);
        assert_eq!("Negamax".parse::<Algorithm>().unwrap(), Algorithm::Negamax);
        assert_eq!("alphabeta".parse::<Algorithm>().unwrap(), Algorithm::AlphaBeta);
        assert_eq!("ab".parse::<Algorithm>().unwrap(), Algorithm::AlphaBeta);
        assert!("mtdf".parse::<Algorithm>().is_err());
        assert_eq!(Algorithm::default(), Algorithm::AlphaBeta);
    }

    #[test]
    fn depth_zero_is_static_eval() {
        let mut state =
            BoardState::parse_fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3")
                .unwrap();
        let legal = state.legal_moves();
        let expected = evaluate_abs(&state, legal.status);

        for algorithm in [Algorithm::Minimax, Algorithm::Negamax, Algorithm::AlphaBeta] {
            let result = search(&mut state, 0, algorithm);
            assert_eq!(result.score, expected);
            assert_eq!(result.best_move, None);
        }
    }

    #[test]
    fn search_restores_state() {
        let mut state = BoardState::start_position();
        let before = state.clone();
        for algorithm in [Algorithm::Minimax, Algorithm::Negamax, Algorithm::AlphaBeta] {
            let result = search(&mut state, 2, algorithm);
            assert!(result.best_move.is_some());
            assert_eq!(state, before);
        }
    }

    #[test]
    fn no_moves_no_best_move() {
        let mut state = BoardState::parse_fen("k7/8/1Q6/8/8/8/8/7K b - - 0 1").unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let legal = state.legal_moves();
        assert_eq!(find_best_move(&mut state, &legal, 3, Algorithm::AlphaBeta, &mut rng), None);
        assert_eq!(random_move(&legal, &mut rng), None);

        let result = search(&mut state, 3, Algorithm::AlphaBeta);
        assert_eq!(result.score, Cp::STALEMATE);
        assert_eq!(result.leading(), None);
    }

    #[test]
    fn random_move_is_legal() {
        let state = BoardState::start_position();
        let legal = state.legal_moves();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let move_ = random_move(&legal, &mut rng).unwrap();
            assert!(legal.contains(move_.start(), move_.end()));
        }
    }

    #[test]
    fn nonblocking_search_sends_result() {
        let state = BoardState::parse_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let (sender, receiver) = mpsc::channel::<SearchResult>();
        let handle = search_nonblocking(state, 2, Algorithm::AlphaBeta, sender);

        let result = receiver.recv().unwrap();
        handle.join().unwrap();
        let best_move = result.best_move.unwrap();
        assert_eq!((best_move.start(), best_move.end()), (A1, A8));
        assert_eq!(result.score, Cp::CHECKMATE);
        assert_eq!(result.leading(), Some(Color::White));
    }
}
