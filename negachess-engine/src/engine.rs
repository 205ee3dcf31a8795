//! Engine struct acts as a simplified API for the various parts of the Negachess engine.

use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::coretypes::{Move, PieceKind, PlyKind, Square, DEFAULT_DEPTH};
use crate::error::{self, ErrorKind};
use crate::movegen::{GameStatus, LegalMoves};
use crate::position::BoardState;
use crate::search::{self, Algorithm, SearchResult};

/// EngineBuilder allows for parameters of an Engine to be set and built once.
///
/// Default values:
///
/// * `state`: Starting chess position
/// * `depth`: 3 plies
/// * `algorithm`: Alpha-beta
/// * `seed`: None, seeding the random fallback from entropy
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EngineBuilder {
    state: BoardState,
    depth: PlyKind,
    algorithm: Algorithm,
    seed: Option<u64>,
}

impl EngineBuilder {
    /// Create a new default EngineBuilder.
    pub fn new() -> Self {
        Self {
            state: BoardState::start_position(),
            depth: DEFAULT_DEPTH,
            algorithm: Algorithm::default(),
            seed: None,
        }
    }

    /// Create and return a new Engine.
    pub fn build(&self) -> Engine {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Engine {
            legal_moves: self.state.legal_moves(),
            state: self.state.clone(),
            depth: self.depth,
            algorithm: self.algorithm,
            rng,
            search_handle: None,
        }
    }

    /// Set the Engine's initial position.
    pub fn state(mut self, state: BoardState) -> Self {
        self.state = state;
        self
    }

    /// Set the engine's search depth in plies.
    pub fn depth(mut self, depth: PlyKind) -> Self {
        self.depth = depth;
        self
    }

    /// Set the engine's search algorithm.
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Seed the engine's random fallback for reproducible games.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Engine owns the game being played: the position, its legal moves, and the
/// search configuration used to pick moves for the side to move.
///
/// While a background search runs, the engine refuses every call that would
/// change its position.
pub struct Engine {
    state: BoardState,
    legal_moves: LegalMoves,
    depth: PlyKind,
    algorithm: Algorithm,
    rng: StdRng,

    // Meta fields
    search_handle: Option<JoinHandle<()>>,
}

impl Engine {
    pub fn new() -> Self {
        EngineBuilder::new().build()
    }

    /// Returns reference to current position of engine.
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// Returns the legal moves of the current position.
    pub fn legal_moves(&self) -> &LegalMoves {
        &self.legal_moves
    }

    /// Returns whether the current position is ongoing, checkmate, or stalemate.
    pub fn status(&self) -> GameStatus {
        self.legal_moves.status
    }

    pub fn depth(&self) -> PlyKind {
        self.depth
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Update the depth used by following searches.
    pub fn set_depth(&mut self, depth: PlyKind) {
        self.depth = depth;
    }

    /// Update the algorithm used by following searches.
    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
    }

    /// Returns Err if a background search still owns a copy of the game.
    fn ensure_ready(&self, action: &str) -> error::Result<()> {
        match self.ready() {
            true => Ok(()),
            false => {
                warn!("cannot {action} while a search is running");
                Err((ErrorKind::EngineAlreadySearching, action).into())
            }
        }
    }

    /// Regenerate legal moves after the position changed.
    fn refresh(&mut self) {
        self.legal_moves = self.state.legal_moves();
        match self.legal_moves.status {
            GameStatus::Ongoing => (),
            status => info!("{} to move: {}", self.state.side_to_move(), status),
        }
    }

    /// Set the position to play from. Move history of the new position is kept.
    pub fn set_state(&mut self, state: BoardState) -> error::Result<()> {
        self.ensure_ready("set position")?;
        self.state = state;
        self.refresh();
        Ok(())
    }

    /// Informs engine that play restarts from the standard start position.
    /// Returns Ok if engine succeeded in changing state for a new game, Err otherwise.
    pub fn new_game(&mut self) -> error::Result<()> {
        self.set_state(BoardState::start_position())?;
        info!("new game");
        Ok(())
    }

    /// Apply the legal move from `start` to `end`, if there is one.
    /// `promotion` picks the promoted piece and defaults to a queen.
    /// Returns the applied move, or None if no legal move matches or a search is running.
    pub fn try_move(
        &mut self,
        start: Square,
        end: Square,
        promotion: Option<PieceKind>,
    ) -> Option<Move> {
        self.ensure_ready("move").ok()?;

        let move_ = self.legal_moves.find(start, end)?;
        self.state.make(move_, promotion);
        debug!("made {move_}");
        self.refresh();
        Some(move_)
    }

    /// Take back the last move. Returns the move taken back, or None when there is
    /// no history or a search is running.
    pub fn undo(&mut self) -> Option<Move> {
        self.ensure_ready("undo").ok()?;
        if !self.state.can_undo() {
            return None;
        }

        let move_ = self.state.undo();
        debug!("undid {move_}");
        self.refresh();
        Some(move_)
    }

    /// Run a blocking search of the current position and return the chosen move
    /// without applying it. Falls back to a random legal move if search finds none.
    /// Returns None when there are no legal moves or a search is running.
    pub fn search_sync(&mut self) -> Option<Move> {
        self.ensure_ready("search").ok()?;
        search::find_best_move(
            &mut self.state,
            &self.legal_moves,
            self.depth,
            self.algorithm,
            &mut self.rng,
        )
    }

    /// Search the current position and apply the chosen move.
    pub fn play_engine_move(&mut self) -> Option<Move> {
        let move_ = self.search_sync()?;
        self.try_move(move_.start(), move_.end(), None)
    }

    /// Apply the move of a finished background search, or a random legal move if it
    /// found none. The search must have been of the current position.
    pub fn play_search_result(&mut self, result: &SearchResult) -> Option<Move> {
        let move_ = match result.best_move {
            Some(move_) => move_,
            None => search::random_move(&self.legal_moves, &mut self.rng)?,
        };
        self.try_move(move_.start(), move_.end(), None)
    }

    /// Run a non-blocking search.
    /// The engine only runs one search at a time, so if it is not ready, it fails to begin.
    /// The search works on its own copy of the position and sends its result over `sender`.
    pub fn search<T>(&mut self, sender: Sender<T>) -> error::Result<()>
    where
        T: From<SearchResult> + Send + 'static,
    {
        if self.search_handle.is_some() {
            return Err((ErrorKind::EngineAlreadySearching, "failed to begin search").into());
        }
        if self.legal_moves.is_empty() {
            return Err((ErrorKind::EngineNoLegalMoves, self.legal_moves.status).into());
        }

        let handle =
            search::search_nonblocking(self.state.clone(), self.depth, self.algorithm, sender);
        self.search_handle = Some(handle);
        Ok(())
    }

    /// Engine blocks thread until search is completed.
    pub fn wait(&mut self) {
        if let Some(handle) = self.search_handle.take() {
            if handle.join().is_err() {
                warn!("search thread panicked");
            }
        }
    }

    /// Returns true if the engine is ready to start a search.
    /// Only one search may run at a time, so if a search is in progress, engine is not ready.
    pub fn ready(&self) -> bool {
        self.search_handle.is_none()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coretypes::Square::*;
    use crate::fen::Fen;
    use std::sync::mpsc;

    #[test]
    fn builder_defaults() {
        let engine = EngineBuilder::new().build();
        assert_eq!(engine.depth(), 3);
        assert_eq!(engine.algorithm(), Algorithm::AlphaBeta);
        assert_eq!(engine.state(), &BoardState::start_position());
        assert_eq!(engine.legal_moves().len(), 20);
        assert!(engine.ready());
    }

    #[test]
    fn try_move_rejects_unmatched_pairs() {
        let mut engine = Engine::new();
        assert_eq!(engine.try_move(E2, E5, None), None);
        assert_eq!(engine.try_move(E7, E5, None), None);
        assert_eq!(engine.state(), &BoardState::start_position());

        let applied = engine.try_move(E2, E4, None).unwrap();
        assert_eq!((applied.start(), applied.end()), (E2, E4));
        assert_eq!(engine.legal_moves().len(), 20);

        assert_eq!(engine.undo().map(|m| m.to_string()), Some(String::from("e2e4")));
        assert_eq!(engine.undo(), None);
    }

    #[test]
    fn play_engine_move_takes_mate() {
        let state = BoardState::parse_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let mut engine = EngineBuilder::new().state(state).depth(2).seed(1).build();

        let move_ = engine.play_engine_move().unwrap();
        assert_eq!(move_.to_string(), "a1a8");
        assert_eq!(engine.status(), GameStatus::Checkmate);
        assert_eq!(engine.search_sync(), None);
    }

    #[test]
    fn background_search_blocks_mutation() {
        let mut engine = EngineBuilder::new().depth(2).build();
        let (sender, receiver) = mpsc::channel::<SearchResult>();

        engine.search(sender.clone()).unwrap();
        let second = engine.search(sender).unwrap_err();
        assert_eq!(second.kind(), ErrorKind::EngineAlreadySearching);
        assert_eq!(engine.try_move(E2, E4, None), None);
        assert!(engine.new_game().is_err());

        let result = receiver.recv().unwrap();
        engine.wait();
        assert!(engine.ready());
        let played = engine.play_search_result(&result).unwrap();
        assert_eq!(Some(played), result.best_move);
        assert_eq!(engine.state().history().len(), 1);
    }

    #[test]
    fn search_rejects_finished_game() {
        let state = BoardState::parse_fen("k7/8/1Q6/8/8/8/8/7K b - - 0 1").unwrap();
        let mut engine = EngineBuilder::new().state(state).build();
        let (sender, _receiver) = mpsc::channel::<SearchResult>();

        assert_eq!(engine.status(), GameStatus::Stalemate);
        let err = engine.search(sender).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EngineNoLegalMoves);
    }
}
