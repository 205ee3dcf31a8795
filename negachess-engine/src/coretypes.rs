//! The fundamental and simple types of `negachess_engine`.

use std::convert::TryFrom;
use std::fmt::{self, Display, Write};
use std::ops::{Add, AddAssign, BitOr, Mul, Neg, Not, Sub};
use std::str::FromStr;

use crate::error::{self, ErrorKind};

///////////////
// Constants //
///////////////
pub const NUM_FILES: usize = 8; // a, b, c, d, e, f, g, h
pub const NUM_RANKS: usize = 8; // 8, 7, 6, 5, 4, 3, 2, 1 (row order)
pub const NUM_SQUARES: usize = NUM_FILES * NUM_RANKS;

// The max possible measured number of moves for any chess position.
pub const MAX_MOVES: usize = 218;

/// Depth searched when the engine is not configured otherwise.
pub const DEFAULT_DEPTH: PlyKind = 3;

/// Two character boundary encoding of an empty square.
pub const EMPTY_CODE: &str = "--";

/////////////////////////
// Data and Structures //
/////////////////////////

/// Type alias for max ply/depth.
pub type PlyKind = u8;

// Type alias to make changing Cp inner type easy if needed.
pub type CpKind = i32;

/// Centipawn, a common unit of measurement in chess, where 100 Centipawn == 1 Pawn.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Cp(pub CpKind);

/// Color can represent the color of a piece, or a player.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Color {
    White,
    Black,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Piece {
    pub(crate) color: Color,
    pub(crate) piece_kind: PieceKind,
}

/// Castling rights for a position. Each of the four rights is an independent flag.
/// Rights are only ever cleared during a game, never granted again.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Castling(u8);

/// Castling Enum constants.
impl Castling {
    pub const W_KING: Castling = Castling(0b00000001);
    pub const W_QUEEN: Castling = Castling(0b00000010);
    pub const B_KING: Castling = Castling(0b00000100);
    pub const B_QUEEN: Castling = Castling(0b00001000);
    pub const W_SIDE: Castling = Castling(Self::W_KING.0 | Self::W_QUEEN.0);
    pub const B_SIDE: Castling = Castling(Self::B_KING.0 | Self::B_QUEEN.0);
    pub const ALL: Castling = Castling(Self::W_SIDE.0 | Self::B_SIDE.0);
    pub const NONE: Castling = Castling(0u8);
}

/// Square
/// Every square of the board, in row order starting from the top-left corner
/// as seen by White: row 0 is rank 8 and column 0 is file a.
/// The discriminant of a square is `row * 8 + col`.
/// WARNING: Changing the discriminant of any variant is breaking.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[rustfmt::skip]
#[repr(u8)]
pub enum Square {
    A8, B8, C8, D8, E8, F8, G8, H8,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A1, B1, C1, D1, E1, F1, G1, H1 = 63u8,
}

/// Lookup from discriminant to Square.
#[rustfmt::skip]
const SQUARES: [Square; NUM_SQUARES] = {
    use Square::*;
    [
        A8, B8, C8, D8, E8, F8, G8, H8,
        A7, B7, C7, D7, E7, F7, G7, H7,
        A6, B6, C6, D6, E6, F6, G6, H6,
        A5, B5, C5, D5, E5, F5, G5, H5,
        A4, B4, C4, D4, E4, F4, G4, H4,
        A3, B3, C3, D3, E3, F3, G3, H3,
        A2, B2, C2, D2, E2, F2, G2, H2,
        A1, B1, C1, D1, E1, F1, G1, H1,
    ]
};

/// A (row, col) step across the board.
pub type Direction = (i8, i8);

/// Move
/// A single ply, with the context needed to apply and revert it.
///
/// Two moves are equal when their start and end squares are equal.
/// The promotion, castle, and en passant flags are derived from the position
/// the move was generated in, and are not part of a move's identity.
#[derive(Debug, Copy, Clone, Eq)]
pub struct Move {
    pub(crate) start: Square,
    pub(crate) end: Square,
    pub(crate) piece_moved: Piece,
    pub(crate) piece_captured: Option<Piece>,
    pub(crate) is_promotion: bool,
    pub(crate) is_en_passant: bool,
    pub(crate) is_castle: bool,
}

/// A move as submitted from outside of the engine: a coordinate pair with an
/// optional promotion choice. Candidates are matched against generated legal moves.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Candidate {
    pub start: Square,
    pub end: Square,
    pub promotion: Option<PieceKind>,
}

//////////////////////
/// Implementations //
//////////////////////

impl Cp {
    pub const MIN: Cp = Self(CpKind::MIN + 1); // + 1 to avoid overflow error on negate.
    pub const MAX: Cp = Self(CpKind::MAX);
    /// Score of a side that has been checkmated, 1000 pawns.
    pub const CHECKMATE: Cp = Self(100_000);
    pub const STALEMATE: Cp = Self(0);

    /// Returns the sign of Centipawn value, either 1, -1, or 0.
    pub const fn signum(&self) -> CpKind {
        self.0.signum()
    }

    /// Returns true if the score is a checkmate for either side.
    pub const fn is_mate(&self) -> bool {
        self.0 == Self::CHECKMATE.0 || self.0 == -Self::CHECKMATE.0
    }
}

impl Add for Cp {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}
impl AddAssign for Cp {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0
    }
}
impl Sub for Cp {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}
impl Mul for Cp {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}
impl Neg for Cp {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}
impl Display for Cp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:+}", self.0)
    }
}

impl Color {
    /// Boundary and FEN compliant conversion.
    pub const fn to_char(&self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    /// Returns the absolute sign of a Color in Cp.
    /// A positive value is good for white and a negative value is good for Black.
    pub const fn sign(&self) -> Cp {
        match self {
            Color::White => Cp(1),
            Color::Black => Cp(-1),
        }
    }

    /// Index of a color into per-color arrays.
    pub const fn idx(&self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// Row step of a pawn of this color moving forward.
    pub const fn forward(&self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row that a color's pawns start on.
    pub const fn pawn_row(&self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// Row that a color's king and rooks start on.
    pub const fn back_row(&self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Row where a color's pawns promote.
    pub const fn promotion_row(&self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    pub fn iter() -> impl Iterator<Item = Color> {
        [Color::White, Color::Black].into_iter()
    }
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl Not for &Color {
    type Output = Color;
    fn not(self) -> Self::Output {
        Color::not(*self)
    }
}

impl From<Color> for char {
    fn from(color: Color) -> Self {
        color.to_char()
    }
}

impl TryFrom<char> for Color {
    type Error = error::Error;
    fn try_from(ch: char) -> error::Result<Self> {
        match ch {
            'w' => Ok(Color::White),
            'b' => Ok(Color::Black),
            _ => Err((ErrorKind::ParseColorMalformed, "char is not w|b").into()),
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::White => f.write_str("White"),
            Color::Black => f.write_str("Black"),
        }
    }
}

impl PieceKind {
    /// Boundary encoding letter: K, Q, R, B, N, and a lowercase p for pawns.
    pub const fn to_char(&self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    /// FEN letter of a white piece of this kind.
    pub const fn to_fen_char(&self) -> char {
        self.to_char().to_ascii_uppercase()
    }

    /// Returns true if a pawn may promote to this kind.
    pub const fn is_promotable(&self) -> bool {
        matches!(
            self,
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
        )
    }

    /// Parses a promotion letter, either case of q, r, b, n.
    pub fn from_promotion_char(ch: char) -> error::Result<Self> {
        match ch.to_ascii_lowercase() {
            'q' => Ok(PieceKind::Queen),
            'r' => Ok(PieceKind::Rook),
            'b' => Ok(PieceKind::Bishop),
            'n' => Ok(PieceKind::Knight),
            _ => Err((ErrorKind::ParsePieceMalformed, "promotion char not of qrbn").into()),
        }
    }
}

impl Piece {
    pub const fn new(color: Color, piece_kind: PieceKind) -> Self {
        Piece { color, piece_kind }
    }
    /// Immutable Getters.
    pub const fn color(&self) -> &Color {
        &self.color
    }
    pub const fn piece_kind(&self) -> &PieceKind {
        &self.piece_kind
    }

    /// Two character boundary encoding, color then kind, such as `wK` or `bp`.
    pub const fn code(&self) -> &'static str {
        use Color::*;
        use PieceKind::*;
        match (self.color, self.piece_kind) {
            (White, Pawn) => "wp",
            (White, Knight) => "wN",
            (White, Bishop) => "wB",
            (White, Rook) => "wR",
            (White, Queen) => "wQ",
            (White, King) => "wK",
            (Black, Pawn) => "bp",
            (Black, Knight) => "bN",
            (Black, Bishop) => "bB",
            (Black, Rook) => "bR",
            (Black, Queen) => "bQ",
            (Black, King) => "bK",
        }
    }

    /// FEN compliant conversion, uppercase for White and lowercase for Black.
    pub const fn to_fen_char(&self) -> char {
        match self.color {
            Color::White => self.piece_kind.to_fen_char(),
            Color::Black => self.piece_kind.to_fen_char().to_ascii_lowercase(),
        }
    }
}

/// Parses a FEN piece letter.
impl TryFrom<char> for Piece {
    type Error = error::Error;
    fn try_from(value: char) -> error::Result<Self> {
        let color = match value.is_ascii_uppercase() {
            true => Color::White,
            false => Color::Black,
        };
        let piece_kind = match value.to_ascii_uppercase() {
            'P' => PieceKind::Pawn,
            'R' => PieceKind::Rook,
            'N' => PieceKind::Knight,
            'B' => PieceKind::Bishop,
            'Q' => PieceKind::Queen,
            'K' => PieceKind::King,
            _ => {
                return Err((
                    ErrorKind::ParsePieceMalformed,
                    "char is not in PRNBQKprnbqk",
                )
                    .into())
            }
        };
        Ok(Piece { color, piece_kind })
    }
}

/// Parses the two character boundary encoding, `wK`, `bp`, etc.
impl FromStr for Piece {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        let mut chars = s.chars();
        let color = Color::try_from(chars.next().ok_or(ErrorKind::ParsePieceMalformed)?)?;
        let piece_kind = match chars.next() {
            Some('p') => PieceKind::Pawn,
            Some('N') => PieceKind::Knight,
            Some('B') => PieceKind::Bishop,
            Some('R') => PieceKind::Rook,
            Some('Q') => PieceKind::Queen,
            Some('K') => PieceKind::King,
            _ => return Err((ErrorKind::ParsePieceMalformed, "kind not of KQRBNp").into()),
        };
        if chars.next().is_some() {
            return Err((ErrorKind::ParsePieceMalformed, "piece code longer than 2").into());
        }
        Ok(Piece::new(color, piece_kind))
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Castling {
    /// Make new Castling with all rights of initial chess position.
    pub const fn start_position() -> Self {
        Self::ALL
    }

    /// Returns true if there are no castling rights.
    pub const fn is_none(&self) -> bool {
        self.0 == 0u8
    }

    /// Returns true if Castling mask has all of provided bits.
    pub fn has(&self, rights: Castling) -> bool {
        debug_assert!(rights.is_mask_valid());
        self.0 & rights.0 == rights.0
    }

    /// Set given bits to '1' on Castling mask.
    pub fn set(&mut self, rights: Castling) {
        debug_assert!(rights.is_mask_valid());
        self.0 |= rights.0;
    }

    /// Set given bits to '0' on Castling mask.
    pub fn clear(&mut self, rights: Castling) {
        debug_assert!(rights.is_mask_valid());
        self.0 &= !rights.0;
    }

    /// Removes all castling rights for a color.
    pub fn clear_color(&mut self, color: Color) {
        match color {
            Color::White => self.clear(Self::W_SIDE),
            Color::Black => self.clear(Self::B_SIDE),
        }
    }

    /// Kingside right of a color.
    pub const fn kingside(color: Color) -> Self {
        match color {
            Color::White => Self::W_KING,
            Color::Black => Self::B_KING,
        }
    }

    /// Queenside right of a color.
    pub const fn queenside(color: Color) -> Self {
        match color {
            Color::White => Self::W_QUEEN,
            Color::Black => Self::B_QUEEN,
        }
    }

    /// Returns the right tied to a rook of `color` standing on its original corner,
    /// or None if `square` is not one of that color's corners.
    pub fn for_rook_corner(square: Square, color: Color) -> Option<Self> {
        match (color, square) {
            (Color::White, Square::H1) => Some(Self::W_KING),
            (Color::White, Square::A1) => Some(Self::W_QUEEN),
            (Color::Black, Square::H8) => Some(Self::B_KING),
            (Color::Black, Square::A8) => Some(Self::B_QUEEN),
            _ => None,
        }
    }

    /// Returns true if all bits set in Castling are valid, and false otherwise.
    pub const fn is_mask_valid(&self) -> bool {
        self.0 <= Self::ALL.0
    }
}

/// Defaults to Castling rights for starting chess position, ALL.
impl Default for Castling {
    fn default() -> Self {
        Self::start_position()
    }
}

impl BitOr for Castling {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

/// Displays in FEN-component format.
impl Display for Castling {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut castling_str = String::with_capacity(4);

        if self.is_none() {
            castling_str.push('-');
        } else {
            if self.has(Self::W_KING) {
                castling_str.push('K');
            }
            if self.has(Self::W_QUEEN) {
                castling_str.push('Q');
            }
            if self.has(Self::B_KING) {
                castling_str.push('k');
            }
            if self.has(Self::B_QUEEN) {
                castling_str.push('q');
            }
        }
        f.write_str(&castling_str)
    }
}

/// Castling ::= '-' | ['K'] ['Q'] ['k'] ['q']
impl FromStr for Castling {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        let mut chars = s.chars();
        let mut castling_rights = Castling::NONE;

        // First character is either '-' or in KQkq.
        match chars
            .next()
            .ok_or((ErrorKind::ParseCastlingMalformed, "No characters"))?
        {
            '-' if s.len() == 1 => return Ok(castling_rights),
            'K' => castling_rights.set(Self::W_KING),
            'Q' => castling_rights.set(Self::W_QUEEN),
            'k' => castling_rights.set(Self::B_KING),
            'q' => castling_rights.set(Self::B_QUEEN),
            _ => return Err((ErrorKind::ParseCastlingMalformed, "First char not of -KQkq").into()),
        };

        for ch in chars {
            match ch {
                'K' => castling_rights.set(Self::W_KING),
                'Q' => castling_rights.set(Self::W_QUEEN),
                'k' => castling_rights.set(Self::B_KING),
                'q' => castling_rights.set(Self::B_QUEEN),
                _ => return Err((ErrorKind::ParseCastlingMalformed, "char not of KQkq").into()),
            };
        }
        Ok(castling_rights)
    }
}

impl Square {
    /// Returns the square at row and col, both of which must be less than 8.
    pub const fn at(row: u8, col: u8) -> Self {
        SQUARES[row as usize * NUM_FILES + col as usize]
    }

    /// Returns the square at row and col, or None if either is off the board.
    pub const fn from_coords(row: i8, col: i8) -> Option<Self> {
        if row >= 0 && row < NUM_RANKS as i8 && col >= 0 && col < NUM_FILES as i8 {
            Some(Self::at(row as u8, col as u8))
        } else {
            None
        }
    }

    pub fn iter() -> impl Iterator<Item = Square> {
        SQUARES.into_iter()
    }

    /// Row of the square, where 0 is rank 8.
    pub const fn row(&self) -> u8 {
        *self as u8 / NUM_FILES as u8
    }

    /// Column of the square, where 0 is file a.
    pub const fn col(&self) -> u8 {
        *self as u8 % NUM_FILES as u8
    }

    /// Returns the square `distance` steps away in `direction`, if it is on the board.
    pub const fn offset(&self, direction: Direction, distance: i8) -> Option<Self> {
        Self::from_coords(
            self.row() as i8 + direction.0 * distance,
            self.col() as i8 + direction.1 * distance,
        )
    }

    /// Lowercase file letter, a-h.
    pub const fn file_char(&self) -> char {
        (b'a' + self.col()) as char
    }

    /// Rank digit, 1-8, where rank = 8 - row.
    pub const fn rank_char(&self) -> char {
        (b'8' - self.row()) as char
    }
}

/// Square::= <fileLetter><rankNumber>
impl FromStr for Square {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        let mut chars = s.chars();
        let file = chars.next().ok_or(ErrorKind::ParseSquareMalformed)?;
        let rank = chars.next().ok_or(ErrorKind::ParseSquareMalformed)?;

        let col = match file {
            'a'..='h' => file as u8 - b'a',
            _ => return Err((ErrorKind::ParseFileMalformed, "file char not of abcdefgh").into()),
        };
        let row = match rank {
            '1'..='8' => b'8' - rank as u8,
            _ => return Err((ErrorKind::ParseRankMalformed, "rank char not of 12345678").into()),
        };
        Ok(Square::at(row, col))
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(self.file_char())?;
        f.write_char(self.rank_char())
    }
}

impl Move {
    /// Creates a regular move or capture. The promotion flag is set when a pawn
    /// reaches its far row.
    pub(crate) fn new(
        start: Square,
        end: Square,
        piece_moved: Piece,
        piece_captured: Option<Piece>,
    ) -> Self {
        let is_promotion = piece_moved.piece_kind == PieceKind::Pawn
            && end.row() == piece_moved.color.promotion_row();
        Self {
            start,
            end,
            piece_moved,
            piece_captured,
            is_promotion,
            is_en_passant: false,
            is_castle: false,
        }
    }

    /// Creates an en passant capture. The captured pawn stands beside the start square.
    pub(crate) fn en_passant(start: Square, end: Square, pawn: Piece) -> Self {
        Self {
            start,
            end,
            piece_moved: pawn,
            piece_captured: Some(Piece::new(!pawn.color, PieceKind::Pawn)),
            is_promotion: false,
            is_en_passant: true,
            is_castle: false,
        }
    }

    /// Creates a castling move, described by the king's start and end squares.
    pub(crate) fn castle(start: Square, end: Square, king: Piece) -> Self {
        Self {
            start,
            end,
            piece_moved: king,
            piece_captured: None,
            is_promotion: false,
            is_en_passant: false,
            is_castle: true,
        }
    }

    // Immutable Getters
    pub const fn start(&self) -> Square {
        self.start
    }
    pub const fn end(&self) -> Square {
        self.end
    }
    pub const fn piece_moved(&self) -> Piece {
        self.piece_moved
    }
    pub const fn piece_captured(&self) -> Option<Piece> {
        self.piece_captured
    }
    pub const fn is_promotion(&self) -> bool {
        self.is_promotion
    }
    pub const fn is_en_passant(&self) -> bool {
        self.is_en_passant
    }
    pub const fn is_castle(&self) -> bool {
        self.is_castle
    }

    /// Returns true if this move removes an enemy piece.
    pub const fn is_capture(&self) -> bool {
        self.piece_captured.is_some()
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl PartialEq<Candidate> for Move {
    fn eq(&self, other: &Candidate) -> bool {
        self.start == other.start && self.end == other.end
    }
}

/// # Example
/// Move { start: E2, end: E4, .. } -> `e2e4`.
impl Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.start, self.end)
    }
}

impl Candidate {
    pub const fn new(start: Square, end: Square, promotion: Option<PieceKind>) -> Self {
        Self {
            start,
            end,
            promotion,
        }
    }
}

/// Parses coordinate notation, with an optional trailing promotion letter.
/// `e2e4` and `a7a8n` are valid.
impl FromStr for Candidate {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        let s = s.trim();
        let num_chars = s.chars().count();
        if num_chars != 4 && num_chars != 5 {
            return Err((ErrorKind::ParseMoveMalformed, "move must be 4 or 5 chars").into());
        }

        let start_str: String = s.chars().take(2).collect();
        let start: Square = start_str.parse()?;

        let end_str: String = s.chars().skip(2).take(2).collect();
        let end: Square = end_str.parse()?;

        let promotion = match s.chars().nth(4) {
            Some(ch) => Some(PieceKind::from_promotion_char(ch)?),
            None => None,
        };

        Ok(Self::new(start, end, promotion))
    }
}

impl Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.start, self.end)?;
        match self.promotion {
            Some(piece_kind) => f.write_char(piece_kind.to_fen_char().to_ascii_lowercase()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PieceKind::*;
    use Square::*;

    #[test]
    fn logical_not_color() {
        assert_eq!(!Color::White, Color::Black);
        assert_eq!(!Color::Black, Color::White);
    }

    #[test]
    fn castling_logical_ops() {
        let mut cr = Castling::default();
        assert!(cr.has(Castling::ALL));
        assert!(cr.has(Castling::W_SIDE));
        assert!(cr.has(Castling::B_SIDE));

        cr.clear(Castling::W_KING);
        assert!(!cr.has(Castling::ALL));
        assert!(!cr.has(Castling::W_KING));
        assert!(cr.has(Castling::W_QUEEN));
        assert!(!cr.has(Castling::W_SIDE));
        assert!(cr.has(Castling::B_SIDE));

        cr.clear_color(Color::Black);
        assert!(!cr.has(Castling::B_KING));
        assert!(!cr.has(Castling::B_QUEEN));
        assert!(cr.has(Castling::W_QUEEN));
        assert!(!cr.is_none());

        cr.clear(Castling::W_QUEEN);
        assert!(cr.is_none());
    }

    #[test]
    fn castling_rook_corners_match_rook_color() {
        assert_eq!(Castling::for_rook_corner(H1, Color::White), Some(Castling::W_KING));
        assert_eq!(Castling::for_rook_corner(A1, Color::White), Some(Castling::W_QUEEN));
        assert_eq!(Castling::for_rook_corner(H8, Color::Black), Some(Castling::B_KING));
        assert_eq!(Castling::for_rook_corner(A8, Color::Black), Some(Castling::B_QUEEN));
        assert_eq!(Castling::for_rook_corner(A8, Color::White), None);
        assert_eq!(Castling::for_rook_corner(A1, Color::Black), None);
        assert_eq!(Castling::for_rook_corner(E1, Color::White), None);
    }

    #[test]
    fn castling_to_from_string() {
        assert_eq!(Castling::from_str("-").unwrap(), Castling::NONE);
        assert_eq!(Castling::from_str("K").unwrap(), Castling::W_KING);
        assert_eq!(
            Castling::from_str("Kk").unwrap(),
            Castling::W_KING | Castling::B_KING
        );
        assert_eq!(Castling::from_str("KQkq").unwrap(), Castling::ALL);
        assert!(Castling::from_str("").is_err());
        assert!(Castling::from_str("x").is_err());
        assert!(Castling::from_str("Kx").is_err());
        assert_eq!(Castling::ALL.to_string(), "KQkq");
        assert_eq!(Castling::NONE.to_string(), "-");
    }

    #[test]
    fn square_coordinates() {
        assert_eq!((A8.row(), A8.col()), (0, 0));
        assert_eq!((H8.row(), H8.col()), (0, 7));
        assert_eq!((A1.row(), A1.col()), (7, 0));
        assert_eq!((E2.row(), E2.col()), (6, 4));
        assert_eq!(Square::at(4, 4), E4);
        assert_eq!(Square::from_coords(-1, 0), None);
        assert_eq!(Square::from_coords(0, 8), None);
        assert_eq!(E2.offset((-1, 0), 2), Some(E4));
        assert_eq!(A1.offset((1, 0), 1), None);
        assert_eq!(Square::iter().count(), NUM_SQUARES);
        assert!(Square::iter().enumerate().all(|(i, sq)| sq as usize == i));
    }

    #[test]
    fn square_to_from_string() {
        assert_eq!(Square::from_str("a1").unwrap(), A1);
        assert_eq!(Square::from_str("a8").unwrap(), A8);
        assert_eq!(Square::from_str("e4").unwrap(), E4);
        assert_eq!(Square::from_str("h8").unwrap(), H8);
        assert!(Square::from_str("A1").is_err());
        assert!(Square::from_str("X3").is_err());
        assert!(Square::from_str("a$").is_err());
        assert!(Square::from_str("g").is_err());
        assert_eq!(A1.to_string(), "a1");
        assert_eq!(B7.to_string(), "b7");
        assert_eq!(H8.to_string(), "h8");
    }

    #[test]
    fn piece_codes() {
        let wk = Piece::new(Color::White, King);
        let bp = Piece::new(Color::Black, Pawn);
        assert_eq!(wk.code(), "wK");
        assert_eq!(bp.code(), "bp");
        assert_eq!(Piece::from_str("wK").unwrap(), wk);
        assert_eq!(Piece::from_str("bp").unwrap(), bp);
        assert!(Piece::from_str("bP").is_err());
        assert!(Piece::from_str("--").is_err());
        assert!(Piece::from_str("wKx").is_err());
        assert_eq!(Piece::try_from('n').unwrap(), Piece::new(Color::Black, Knight));
        assert_eq!(Piece::new(Color::White, Pawn).to_fen_char(), 'P');
    }

    #[test]
    fn move_equality_ignores_flags() {
        let pawn = Piece::new(Color::White, Pawn);
        let quiet = Move::new(E5, D6, pawn, None);
        let en_passant = Move::en_passant(E5, D6, pawn);
        assert_eq!(quiet, en_passant);
        assert!(en_passant.is_en_passant());
        assert!(!quiet.is_en_passant());
        assert_ne!(quiet, Move::new(E5, E6, pawn, None));
        assert_eq!(quiet.to_string(), "e5d6");
    }

    #[test]
    fn promotion_flag_on_far_row() {
        let white_pawn = Piece::new(Color::White, Pawn);
        let black_pawn = Piece::new(Color::Black, Pawn);
        assert!(Move::new(B7, B8, white_pawn, None).is_promotion());
        assert!(!Move::new(B6, B7, white_pawn, None).is_promotion());
        assert!(Move::new(G2, H1, black_pawn, None).is_promotion());
        let rook = Piece::new(Color::White, Rook);
        assert!(!Move::new(B7, B8, rook, None).is_promotion());
    }

    #[test]
    fn parse_candidate_from_str() {
        let candidate: Candidate = "a1b2".parse().unwrap();
        assert_eq!(candidate, Candidate::new(A1, B2, None));

        let candidate: Candidate = "h7h8q".parse().unwrap();
        assert_eq!(candidate, Candidate::new(H7, H8, Some(Queen)));
        assert_eq!(candidate.to_string(), "h7h8q");

        let candidate: Candidate = " e7e8N \n".parse().unwrap();
        assert_eq!(candidate.promotion, Some(Knight));

        assert!("e2".parse::<Candidate>().is_err());
        assert!("e2e9".parse::<Candidate>().is_err());
        assert!("e7e8k".parse::<Candidate>().is_err());
        assert!("e2e4e5".parse::<Candidate>().is_err());
    }
}
