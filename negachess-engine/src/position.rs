//! Holds BoardState, the most important data structure for the engine.
//! BoardState represents a chess position along with the history needed to
//! take back every move applied to it.

use std::fmt::{self, Display};

use crate::boardrepr::Mailbox;
use crate::coretypes::{Castling, Color, Move, Piece, PieceKind, Square};
use crate::coretypes::{Color::*, PieceKind::*};
use crate::fen::Fen;
use crate::movegen::{self as mg, LegalMoves};

/// Everything `make` overwrites that cannot be recomputed from the move itself.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct HistoryEntry {
    pub(crate) move_: Move,
    pub(crate) castling: Castling,
    pub(crate) en_passant: Option<Square>,
}

/// struct BoardState
/// A complete data set that can represent any chess position reached in a game.
/// # Members:
/// * grid - a square-centric mailbox of all pieces.
/// * side_to_move - Color of player whose turn it is.
/// * king_location - Square of each color's king, indexed by `Color::idx`.
/// * castling - Castling rights for both players.
/// * en_passant - Square a pawn skipped over on the previous ply's double push, if any.
/// * history - Every move applied so far, with the state it overwrote.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BoardState {
    pub(crate) grid: Mailbox,
    pub(crate) side_to_move: Color,
    pub(crate) king_location: [Square; 2],
    pub(crate) castling: Castling,
    pub(crate) en_passant: Option<Square>,
    pub(crate) history: Vec<HistoryEntry>,
}

impl BoardState {
    /// Standard chess start position.
    pub fn start_position() -> Self {
        Self {
            grid: Mailbox::start_position(),
            side_to_move: White,
            king_location: [Square::E1, Square::E8],
            castling: Castling::start_position(),
            en_passant: None,
            history: Vec::new(),
        }
    }

    /// Builds a position from a placed grid. Returns None unless each color has
    /// exactly one king.
    pub(crate) fn from_parts(
        grid: Mailbox,
        side_to_move: Color,
        castling: Castling,
        en_passant: Option<Square>,
    ) -> Option<Self> {
        let mut king_location = [None, None];
        for (square, piece) in grid.pieces().filter(|(_, piece)| piece.piece_kind == King) {
            let slot = &mut king_location[piece.color.idx()];
            if slot.is_some() {
                return None;
            }
            *slot = Some(square);
        }

        Some(Self {
            grid,
            side_to_move,
            king_location: [king_location[0]?, king_location[1]?],
            castling,
            en_passant,
            history: Vec::new(),
        })
    }

    /// Const getters.
    pub fn grid(&self) -> &Mailbox {
        &self.grid
    }
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }
    pub fn king_location(&self, color: Color) -> Square {
        self.king_location[color.idx()]
    }
    pub fn castling(&self) -> Castling {
        self.castling
    }
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Returns the most recently applied move, if any.
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|entry| entry.move_)
    }

    /// Returns the piece on a square, if any.
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.grid[square]
    }

    /// Returns a list of all legal moves for active player, with the game status
    /// those moves imply.
    pub fn legal_moves(&self) -> LegalMoves {
        mg::legal_moves(self)
    }

    /// Returns true if active player's king is in any check.
    pub fn is_in_check(&self) -> bool {
        mg::analyze(self).in_check
    }

    /// Square of the rook that travels with a castling king, before and after castling.
    fn castle_rook_squares(king_end: Square) -> (Square, Square) {
        let row = king_end.row();
        match king_end.col() {
            6 => (Square::at(row, 7), Square::at(row, 5)),
            _ => (Square::at(row, 0), Square::at(row, 3)),
        }
    }

    /// Square holding the pawn taken by an en passant capture.
    fn en_passant_victim(move_: &Move) -> Square {
        Square::at(move_.start.row(), move_.end.col())
    }

    /// En Passant square is set to the skipped square after any double pawn push.
    /// Any other kind of move sets it to None.
    fn update_en_passant(&mut self, move_: &Move) {
        let is_double_push = move_.piece_moved.piece_kind == Pawn
            && move_.start.row().abs_diff(move_.end.row()) == 2;

        self.en_passant = match is_double_push {
            true => Some(Square::at(
                (move_.start.row() + move_.end.row()) / 2,
                move_.start.col(),
            )),
            false => None,
        };
    }

    /// A king move loses both rights of its color. A rook leaving its corner, or
    /// being captured on it, loses the right tied to that corner.
    fn update_castling(&mut self, move_: &Move) {
        let mover = move_.piece_moved;
        match mover.piece_kind {
            King => self.castling.clear_color(mover.color),
            Rook => {
                if let Some(right) = Castling::for_rook_corner(move_.start, mover.color) {
                    self.castling.clear(right);
                }
            }
            _ => (),
        }

        if let Some(captured) = move_.piece_captured {
            if captured.piece_kind == Rook {
                if let Some(right) = Castling::for_rook_corner(move_.end, captured.color) {
                    self.castling.clear(right);
                }
            }
        }
    }

    /// Apply a move to self, in place.
    /// `make` does not check if the move is legal or not,
    /// it simply executes it while assuming legality.
    ///
    /// `promotion` selects the piece a promoting pawn becomes. Anything other than a
    /// knight, bishop, rook, or queen is promoted to a queen. It is ignored for
    /// moves that do not promote.
    pub fn make(&mut self, move_: Move, promotion: Option<PieceKind>) {
        let mover = move_.piece_moved;
        debug_assert_eq!(self.grid[move_.start], Some(mover));
        debug_assert_eq!(mover.color, self.side_to_move);

        self.history.push(HistoryEntry {
            move_,
            castling: self.castling,
            en_passant: self.en_passant,
        });

        self.grid[move_.start] = None;
        self.grid[move_.end] = Some(mover);

        if move_.is_promotion {
            let piece_kind = promotion
                .filter(PieceKind::is_promotable)
                .unwrap_or(Queen);
            self.grid[move_.end] = Some(Piece::new(mover.color, piece_kind));
        }
        if move_.is_en_passant {
            self.grid[Self::en_passant_victim(&move_)] = None;
        }
        if move_.is_castle {
            let (rook_start, rook_end) = Self::castle_rook_squares(move_.end);
            self.grid[rook_end] = self.grid[rook_start].take();
        }
        if mover.piece_kind == King {
            self.king_location[mover.color.idx()] = move_.end;
        }

        self.update_en_passant(&move_);
        self.update_castling(&move_);
        self.side_to_move = !self.side_to_move;
    }

    /// Undo the most recently applied move, in place, and return it.
    /// After undo, the position is equal to the one before the matching `make`.
    ///
    /// # Panics
    /// Panics if no move has been applied.
    pub fn undo(&mut self) -> Move {
        let entry = self
            .history
            .pop()
            .expect("undo called on a position with no move history");
        let move_ = entry.move_;
        let mover = move_.piece_moved;

        // A promoted piece is replaced by the original pawn here.
        self.grid[move_.start] = Some(mover);
        if move_.is_en_passant {
            self.grid[move_.end] = None;
            self.grid[Self::en_passant_victim(&move_)] = move_.piece_captured;
        } else {
            self.grid[move_.end] = move_.piece_captured;
        }
        if move_.is_castle {
            let (rook_start, rook_end) = Self::castle_rook_squares(move_.end);
            self.grid[rook_start] = self.grid[rook_end].take();
        }
        if mover.piece_kind == King {
            self.king_location[mover.color.idx()] = move_.start;
        }

        self.castling = entry.castling;
        self.en_passant = entry.en_passant;
        self.side_to_move = mover.color;
        move_
    }

    /// Returns true if undo has a move to take back.
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }
}

/// Defaults to standard chess start position.
impl Default for BoardState {
    fn default() -> Self {
        Self::start_position()
    }
}

/// Displays pretty-printed chess board and Fen string representing BoardState.
impl Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\n Fen: {}\n", self.grid, self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Square::*;

    fn play(state: &mut BoardState, moves: &[(Square, Square)]) {
        for &(start, end) in moves {
            let move_ = state
                .legal_moves()
                .find(start, end)
                .unwrap_or_else(|| panic!("{start}{end} not legal in\n{state}"));
            state.make(move_, None);
        }
    }

    #[test]
    fn pretty_print_position() {
        let start_pos = BoardState::start_position();
        println!("{}", start_pos);
    }

    #[test]
    fn make_and_undo_pawn_push() {
        let mut state = BoardState::start_position();
        let before = state.clone();
        play(&mut state, &[(E2, E4)]);

        assert_eq!(state.piece_at(E4), Some(Piece::new(White, Pawn)));
        assert_eq!(state.piece_at(E2), None);
        assert_eq!(state.side_to_move(), Black);
        assert_eq!(state.en_passant(), Some(E3));
        assert_eq!(state.last_move().map(|m| (m.start(), m.end())), Some((E2, E4)));

        let undone = state.undo();
        assert_eq!((undone.start(), undone.end()), (E2, E4));
        assert_eq!(state, before);
    }

    #[test]
    fn en_passant_target_replaced_each_ply() {
        let mut state = BoardState::start_position();
        play(&mut state, &[(E2, E4), (E7, E5)]);
        assert_eq!(state.en_passant(), Some(E6));
        play(&mut state, &[(G1, F3)]);
        assert_eq!(state.en_passant(), None);
    }

    #[test]
    fn en_passant_capture_removes_pawn_and_restores() {
        let mut state = BoardState::parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let before = state.clone();
        let move_ = state.legal_moves().find(E5, D6).unwrap();
        assert!(move_.is_en_passant());

        state.make(move_, None);
        assert_eq!(state.piece_at(D6), Some(Piece::new(White, Pawn)));
        assert_eq!(state.piece_at(D5), None);
        assert_eq!(state.piece_at(E5), None);

        state.undo();
        assert_eq!(state, before);
    }

    #[test]
    fn castling_moves_rook_and_restores() {
        let mut state = BoardState::parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let before = state.clone();

        play(&mut state, &[(E1, G1)]);
        assert_eq!(state.piece_at(F1), Some(Piece::new(White, Rook)));
        assert_eq!(state.piece_at(H1), None);
        assert_eq!(state.king_location(White), G1);
        assert!(!state.castling().has(Castling::W_KING));
        assert!(!state.castling().has(Castling::W_QUEEN));
        assert!(state.castling().has(Castling::B_SIDE));

        play(&mut state, &[(E8, C8)]);
        assert_eq!(state.piece_at(D8), Some(Piece::new(Black, Rook)));
        assert_eq!(state.piece_at(A8), None);
        assert!(state.castling().is_none());

        state.undo();
        state.undo();
        assert_eq!(state, before);
    }

    #[test]
    fn promotion_choice_and_fallback() {
        let fen = "8/1P2k3/8/8/8/8/8/4K3 w - - 0 1";
        let mut state = BoardState::parse_fen(fen).unwrap();
        let before = state.clone();
        let move_ = state.legal_moves().find(B7, B8).unwrap();
        assert!(move_.is_promotion());

        state.make(move_, Some(Knight));
        assert_eq!(state.piece_at(B8), Some(Piece::new(White, Knight)));
        state.undo();
        assert_eq!(state, before);

        state.make(move_, None);
        assert_eq!(state.piece_at(B8), Some(Piece::new(White, Queen)));
        state.undo();

        state.make(move_, Some(King));
        assert_eq!(state.piece_at(B8), Some(Piece::new(White, Queen)));
        state.undo();
        assert_eq!(state, before);
    }

    #[test]
    fn rook_moves_clear_own_right_only() {
        let mut state = BoardState::parse_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1").unwrap();
        play(&mut state, &[(A8, B8)]);
        assert!(!state.castling().has(Castling::B_QUEEN));
        assert!(state.castling().has(Castling::B_KING));
        assert!(state.castling().has(Castling::W_SIDE));

        play(&mut state, &[(H1, H2)]);
        assert!(!state.castling().has(Castling::W_KING));
        assert!(state.castling().has(Castling::W_QUEEN));
    }

    #[test]
    fn capturing_rook_on_corner_clears_right() {
        let mut state = BoardState::parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        play(&mut state, &[(A1, A8)]);
        assert!(!state.castling().has(Castling::B_QUEEN));
        assert!(!state.castling().has(Castling::W_QUEEN));
        assert!(state.castling().has(Castling::B_KING));
        assert!(state.castling().has(Castling::W_KING));
    }

    #[test]
    fn king_checks() {
        let check1_1 = BoardState::parse_fen("8/8/8/8/3K3r/8/8/8 w - - 0 1");
        // A lone king is not a legal position; give black one.
        assert!(check1_1.is_err());

        let check1_1 = BoardState::parse_fen("k7/8/8/8/3K3r/8/8/8 w - - 0 1").unwrap();
        let check1_2 =
            BoardState::parse_fen("rnb1kbnr/ppp1pppp/8/3p4/1qPPP3/8/PP3PPP/RNBQKBNR w KQkq - 1 4")
                .unwrap();
        let check2_1 = BoardState::parse_fen("3q4/8/4b3/3k4/4P1n1/8/3Q4/2R1K3 b - - 0 1").unwrap();
        let check5_1 = BoardState::parse_fen("4r3/8/2b2n2/5p2/4K3/5q2/8/k7 w - - 0 1").unwrap();

        assert_eq!(mg::analyze(&check1_1).checks.len(), 1);
        assert_eq!(mg::analyze(&check1_2).checks.len(), 1);
        assert_eq!(mg::analyze(&check2_1).checks.len(), 2);
        assert_eq!(mg::analyze(&check5_1).checks.len(), 5);
        assert!(check1_1.is_in_check());
        assert!(!BoardState::start_position().is_in_check());
    }

    #[test]
    #[should_panic]
    fn undo_without_history_panics() {
        BoardState::start_position().undo();
    }
}
