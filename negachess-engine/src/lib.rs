pub mod boardrepr;
pub mod coretypes;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod fen;
pub mod movegen;
pub mod movelist;
pub mod perft;
pub mod position;
pub mod search;

pub use boardrepr::Mailbox;
pub use coretypes::{Candidate, Color, Cp, Move, Piece, PieceKind, Square};
pub use engine::{Engine, EngineBuilder};
pub use error::{Error, ErrorKind};
pub use fen::Fen;
pub use movegen::{GameStatus, LegalMoves};
pub use position::BoardState;
pub use search::{Algorithm, SearchResult};
