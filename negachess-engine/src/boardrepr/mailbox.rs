//! A [mailbox](https://www.chessprogramming.org/Mailbox) is a square-centric
//! representation of a chess board.
//!
//! A Mailbox is an array of size Files x Ranks where each index may contain a
//! chess piece or be empty.

use std::fmt::{self, Display};
use std::ops::{Index, IndexMut};

use crate::coretypes::{
    Color, Piece, PieceKind, Square, EMPTY_CODE, NUM_FILES, NUM_RANKS, NUM_SQUARES,
};

/// Classic 8x8 square board representation of Chess board.
/// Mailbox is Square-Centric, meaning it indexes by square to get a piece.
/// Index starts at A8 and walks each row toward H1.
/// A8 = idx 0
/// H8 = idx 7
/// A7 = idx 8
/// H1 = idx 63
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Mailbox {
    board: [Option<Piece>; Self::SIZE],
}

impl Mailbox {
    pub const FILES: usize = NUM_FILES;
    pub const RANKS: usize = NUM_RANKS;
    pub const SIZE: usize = NUM_SQUARES;

    /// Creates an empty Mailbox, where all squares are None.
    pub fn new() -> Self {
        Mailbox {
            board: [None; Mailbox::SIZE],
        }
    }

    /// Create Mailbox with pieces arranged in starting chess position.
    pub fn start_position() -> Self {
        use Color::*;
        use PieceKind::*;
        let mut mb = Self::new();
        let back_rank = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        for color in Color::iter() {
            for (col, piece_kind) in (0u8..).zip(back_rank) {
                mb[Square::at(color.back_row(), col)] = Some(Piece::new(color, piece_kind));
                mb[Square::at(color.pawn_row(), col)] = Some(Piece::new(color, Pawn));
            }
        }
        debug_assert_eq!(mb[Square::E1], Some(Piece::new(White, King)));
        debug_assert_eq!(mb[Square::D8], Some(Piece::new(Black, Queen)));

        mb
    }

    /// Iterator over every occupied square and the piece on it.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| self[square].map(|piece| (square, piece)))
    }

    /// Returns the board as rows of two character codes, row 0 being rank 8.
    /// Empty squares are `--`.
    pub fn codes(&self) -> [[&'static str; NUM_FILES]; NUM_RANKS] {
        let mut codes = [[EMPTY_CODE; NUM_FILES]; NUM_RANKS];
        for (square, piece) in self.pieces() {
            codes[square.row() as usize][square.col() as usize] = piece.code();
        }
        codes
    }

    /// Returns pretty-printed chess board representation of Self.
    /// The chess board has borders and file/rank indicators.
    pub fn pretty(&self) -> String {
        const RANK_SEP: &str = "+----+----+----+----+----+----+----+----+\n";
        let mut pretty = String::with_capacity(780);

        pretty.push_str(RANK_SEP);
        for (row, codes) in self.codes().iter().enumerate() {
            pretty.push_str("| ");
            for code in codes {
                pretty.push_str(match *code {
                    EMPTY_CODE => "  ",
                    code => code,
                });
                pretty.push_str(" | ");
            }
            pretty.push_str(&(NUM_RANKS - row).to_string());
            pretty.push('\n');
            pretty.push_str(RANK_SEP);
        }
        pretty.push_str("   a    b    c    d    e    f    g    h\n");

        pretty
    }
}

impl Index<Square> for Mailbox {
    type Output = Option<Piece>;
    fn index(&self, square: Square) -> &Self::Output {
        &self.board[square as usize]
    }
}

impl IndexMut<Square> for Mailbox {
    fn index_mut(&mut self, square: Square) -> &mut Self::Output {
        &mut self.board[square as usize]
    }
}

/// Default value is that of a standard starting chess position.
impl Default for Mailbox {
    fn default() -> Self {
        Mailbox::start_position()
    }
}

impl Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.pretty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_codes() {
        let codes = Mailbox::start_position().codes();

        assert_eq!(codes[0], ["bR", "bN", "bB", "bQ", "bK", "bB", "bN", "bR"]);
        assert_eq!(codes[1], ["bp"; 8]);
        for row in 2..6 {
            assert_eq!(codes[row], [EMPTY_CODE; 8]);
        }
        assert_eq!(codes[6], ["wp"; 8]);
        assert_eq!(codes[7], ["wR", "wN", "wB", "wQ", "wK", "wB", "wN", "wR"]);
    }

    #[test]
    fn pieces_counts_occupied_squares() {
        assert_eq!(Mailbox::start_position().pieces().count(), 32);
        assert_eq!(Mailbox::new().pieces().count(), 0);
    }

    #[test]
    fn display_start_position_mailbox() {
        let mb = Mailbox::start_position();
        let pretty = mb.pretty();

        assert!(pretty.lines().nth(1).unwrap().starts_with("| bR | bN"));
        assert!(pretty.lines().nth(1).unwrap().ends_with('8'));
        println!("{mb}");
    }
}
