//! Forsyth-Edwards Notation, a standard notation for describing a chess position.
//! <https://en.wikipedia.org/wiki/Forsyth%E2%80%93Edwards_Notation>
//!
//! Fen ::= <Placement> ' ' <Side to move> ' ' <Castling> ' ' <En Passant> [' ' <Halfmoves> ' ' <Fullmoves>]
//!
//! Move counters are accepted but not tracked. They are written back as `0 1`.

use std::convert::TryFrom;
use std::str::FromStr;

use crate::boardrepr::Mailbox;
use crate::coretypes::{Castling, Color, Piece, PieceKind, Square, NUM_FILES, NUM_RANKS};
use crate::error::{self, ErrorKind};
use crate::movegen::is_attacked;
use crate::position::BoardState;

/// Types that can be built from and written as a FEN string.
pub trait Fen: Sized {
    /// Attempt to parse a Fen string into implementing type.
    fn parse_fen(input: &str) -> error::Result<Self>;

    /// Returns the Fen string representation of implementing type.
    fn to_fen(&self) -> String;
}

fn fen_error(message: &str) -> error::Error {
    (ErrorKind::Fen, message).into()
}

/// Placement ::= <Row 8> '/' <Row 7> '/' ... '/' <Row 1>
/// Row ::= ( <piece char> | <empty count 1-8> )+, summing to 8 squares.
fn parse_placement(placement: &str) -> error::Result<Mailbox> {
    let mut mailbox = Mailbox::new();
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != NUM_RANKS {
        return Err(fen_error("placement must have 8 rows"));
    }

    for (row, row_str) in (0u8..).zip(rows) {
        let mut col: u8 = 0;
        for ch in row_str.chars() {
            match ch {
                '1'..='8' => col += ch as u8 - b'0',
                _ => {
                    let piece = Piece::try_from(ch)?;
                    if col as usize >= NUM_FILES {
                        return Err(fen_error("placement row has more than 8 squares"));
                    }
                    mailbox[Square::at(row, col)] = Some(piece);
                    col += 1;
                }
            }
            if col as usize > NUM_FILES {
                return Err(fen_error("placement row has more than 8 squares"));
            }
        }
        if col as usize != NUM_FILES {
            return Err(fen_error("placement row has fewer than 8 squares"));
        }
    }

    Ok(mailbox)
}

fn parse_side_to_move(side_to_move: &str) -> error::Result<Color> {
    match side_to_move {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err((ErrorKind::ParseColorMalformed, "side to move not w|b").into()),
    }
}

/// The target square lies behind a pawn that just double pushed, so it is on
/// rank 6 when White is to move and rank 3 when Black is to move.
fn parse_en_passant(en_passant: &str, side_to_move: Color) -> error::Result<Option<Square>> {
    match en_passant {
        "-" => Ok(None),
        square_str if square_str.len() == 2 => {
            let square = Square::from_str(square_str)?;
            let pusher = !side_to_move;
            let target_row = pusher.pawn_row() as i8 + pusher.forward();
            match square.row() as i8 == target_row {
                true => Ok(Some(square)),
                false => Err(fen_error("en passant square is not behind a double pushed pawn")),
            }
        }
        _ => Err(fen_error("en passant must be - or a square")),
    }
}

/// Rights whose king or rook is missing from its home square are dropped,
/// so that castling never moves a piece that is not there.
fn sanitize_castling(mailbox: &Mailbox, mut castling: Castling) -> Castling {
    for color in Color::iter() {
        let row = color.back_row();
        let king = Some(Piece::new(color, PieceKind::King));
        let rook = Some(Piece::new(color, PieceKind::Rook));

        if mailbox[Square::at(row, 4)] != king {
            castling.clear_color(color);
        }
        if mailbox[Square::at(row, 7)] != rook {
            castling.clear(Castling::kingside(color));
        }
        if mailbox[Square::at(row, 0)] != rook {
            castling.clear(Castling::queenside(color));
        }
    }
    castling
}

impl Fen for BoardState {
    fn parse_fen(input: &str) -> error::Result<Self> {
        let mut fields = input.split_whitespace();
        let mut next_field = |name: &str| {
            fields
                .next()
                .ok_or_else(|| fen_error(&format!("missing {name} field")))
        };

        let mailbox = parse_placement(next_field("placement")?)?;
        let side_to_move = parse_side_to_move(next_field("side to move")?)?;
        let castling = Castling::from_str(next_field("castling")?)?;
        let en_passant = parse_en_passant(next_field("en passant")?, side_to_move)?;

        for counter in fields {
            counter
                .parse::<u32>()
                .map_err(|err| error::Error::new(ErrorKind::Fen, err))?;
        }

        let castling = sanitize_castling(&mailbox, castling);
        let state = BoardState::from_parts(mailbox, side_to_move, castling, en_passant)
            .ok_or_else(|| fen_error("each side needs exactly one king"))?;

        // The side that just moved cannot have left its king attacked.
        let waiting = !side_to_move;
        if is_attacked(state.grid(), state.king_location(waiting), waiting) {
            return Err(fen_error("side not to move is in check"));
        }
        Ok(state)
    }

    fn to_fen(&self) -> String {
        let mut placement = String::with_capacity(72);
        for row in 0..NUM_RANKS as u8 {
            let mut empty = 0;
            for col in 0..NUM_FILES as u8 {
                match self.grid()[Square::at(row, col)] {
                    Some(piece) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placement.push(piece.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if (row as usize) + 1 < NUM_RANKS {
                placement.push('/');
            }
        }

        let en_passant = match self.en_passant() {
            Some(square) => square.to_string(),
            None => String::from("-"),
        };

        format!(
            "{} {} {} {} 0 1",
            placement,
            self.side_to_move().to_char(),
            self.castling(),
            en_passant
        )
    }
}
