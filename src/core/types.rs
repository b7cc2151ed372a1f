// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{convert::TryFrom, fmt, str::FromStr};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SquareParseError {
    #[error("square coordinates out of range: ({0}, {1})")]
    OutOfRange(u8, u8),
    #[error("invalid square notation: {0:?}")]
    InvalidNotation(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PieceParseError {
    #[error("invalid char: {0}")]
    InvalidChar(char),
}

/// A square on the chessboard, addressed by row and column. Row 0 is the top of the board (Black's back rank at the
/// start of the game) and row 7 is White's back rank; column 0 is the a-file.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Creates a new square from a row and column, rejecting coordinates that fall off of the board.
    pub fn new(row: u8, col: u8) -> Result<Square, SquareParseError> {
        if row >= 8 || col >= 8 {
            return Err(SquareParseError::OutOfRange(row, col));
        }

        Ok(Square { row, col })
    }

    pub(crate) const fn at(row: u8, col: u8) -> Square {
        Square { row, col }
    }

    pub const fn row(self) -> u8 {
        self.row
    }

    pub const fn col(self) -> u8 {
        self.col
    }

    /// Returns a dense index for this square in the range [0, 64), counting from the top-left corner.
    pub const fn index(self) -> u8 {
        self.row * 8 + self.col
    }

    /// Returns the square offset from this one by the given number of rows and columns, or None if that square is
    /// not on the board.
    pub fn offset(self, rows: i8, cols: i8) -> Option<Square> {
        let row = self.row as i8 + rows;
        let col = self.col as i8 + cols;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Square::at(row as u8, col as u8))
        } else {
            None
        }
    }

    /// Returns the adjacent square in the given direction, or None if the direction leads off of the board.
    pub fn towards(self, dir: Direction) -> Option<Square> {
        let (rows, cols) = dir.as_vector();
        self.offset(rows, cols)
    }

    pub fn file_char(self) -> char {
        (b'a' + self.col) as char
    }

    pub fn rank_char(self) -> char {
        (b'8' - self.row) as char
    }
}

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SquareParseError::InvalidNotation(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }

        let (file, rank) = (bytes[0], bytes[1]);
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(invalid());
        }

        Ok(Square::at(b'8' - rank, file - b'a'))
    }
}

impl TryFrom<String> for Square {
    type Error = SquareParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Square> for String {
    fn from(square: Square) -> String {
        square.to_string()
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

pub const A8: Square = Square::at(0, 0);
pub const B8: Square = Square::at(0, 1);
pub const C8: Square = Square::at(0, 2);
pub const D8: Square = Square::at(0, 3);
pub const E8: Square = Square::at(0, 4);
pub const F8: Square = Square::at(0, 5);
pub const G8: Square = Square::at(0, 6);
pub const H8: Square = Square::at(0, 7);
pub const A7: Square = Square::at(1, 0);
pub const B7: Square = Square::at(1, 1);
pub const C7: Square = Square::at(1, 2);
pub const D7: Square = Square::at(1, 3);
pub const E7: Square = Square::at(1, 4);
pub const F7: Square = Square::at(1, 5);
pub const G7: Square = Square::at(1, 6);
pub const H7: Square = Square::at(1, 7);
pub const A6: Square = Square::at(2, 0);
pub const B6: Square = Square::at(2, 1);
pub const C6: Square = Square::at(2, 2);
pub const D6: Square = Square::at(2, 3);
pub const E6: Square = Square::at(2, 4);
pub const F6: Square = Square::at(2, 5);
pub const G6: Square = Square::at(2, 6);
pub const H6: Square = Square::at(2, 7);
pub const A5: Square = Square::at(3, 0);
pub const B5: Square = Square::at(3, 1);
pub const C5: Square = Square::at(3, 2);
pub const D5: Square = Square::at(3, 3);
pub const E5: Square = Square::at(3, 4);
pub const F5: Square = Square::at(3, 5);
pub const G5: Square = Square::at(3, 6);
pub const H5: Square = Square::at(3, 7);
pub const A4: Square = Square::at(4, 0);
pub const B4: Square = Square::at(4, 1);
pub const C4: Square = Square::at(4, 2);
pub const D4: Square = Square::at(4, 3);
pub const E4: Square = Square::at(4, 4);
pub const F4: Square = Square::at(4, 5);
pub const G4: Square = Square::at(4, 6);
pub const H4: Square = Square::at(4, 7);
pub const A3: Square = Square::at(5, 0);
pub const B3: Square = Square::at(5, 1);
pub const C3: Square = Square::at(5, 2);
pub const D3: Square = Square::at(5, 3);
pub const E3: Square = Square::at(5, 4);
pub const F3: Square = Square::at(5, 5);
pub const G3: Square = Square::at(5, 6);
pub const H3: Square = Square::at(5, 7);
pub const A2: Square = Square::at(6, 0);
pub const B2: Square = Square::at(6, 1);
pub const C2: Square = Square::at(6, 2);
pub const D2: Square = Square::at(6, 3);
pub const E2: Square = Square::at(6, 4);
pub const F2: Square = Square::at(6, 5);
pub const G2: Square = Square::at(6, 6);
pub const H2: Square = Square::at(6, 7);
pub const A1: Square = Square::at(7, 0);
pub const B1: Square = Square::at(7, 1);
pub const C1: Square = Square::at(7, 2);
pub const D1: Square = Square::at(7, 3);
pub const E1: Square = Square::at(7, 4);
pub const F1: Square = Square::at(7, 5);
pub const G1: Square = Square::at(7, 6);
pub const H1: Square = Square::at(7, 7);

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn toggle(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// The row delta of a single pawn push for this color.
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// The row holding this color's king and rooks at the start of the game.
    pub const fn home_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    pub const fn pawn_row(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    pub const fn promotion_row(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// The kinds a pawn may promote to, strongest first.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    pub fn is_promotion_choice(self) -> bool {
        PieceKind::PROMOTIONS.contains(&self)
    }

    pub fn from_promotion_char(c: char) -> Option<PieceKind> {
        match c {
            'q' => Some(PieceKind::Queen),
            'r' => Some(PieceKind::Rook),
            'b' => Some(PieceKind::Bishop),
            'n' => Some(PieceKind::Knight),
            _ => None,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };

        write!(f, "{}", c)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind) -> Piece {
        Piece { color, kind }
    }
}

impl TryFrom<char> for Piece {
    type Error = PieceParseError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        let kind = match value.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return Err(PieceParseError::InvalidChar(value)),
        };

        let color = if value.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };

        Ok(Piece { color, kind })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.kind.to_string();
        match self.color {
            Color::White => write!(f, "{}", c.to_ascii_uppercase()),
            Color::Black => write!(f, "{}", c),
        }
    }
}

/// One of the eight lines radiating out of a square. North points towards row 0.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
    NorthEast,
    SouthEast,
    SouthWest,
    NorthWest,
}

impl Direction {
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub const DIAGONAL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    /// Returns this direction as a (row, column) step.
    pub const fn as_vector(self) -> (i8, i8) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
            Direction::NorthEast => (-1, 1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (1, -1),
            Direction::NorthWest => (-1, -1),
        }
    }

    pub const fn reverse(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::NorthEast => Direction::SouthWest,
            Direction::SouthEast => Direction::NorthWest,
            Direction::SouthWest => Direction::NorthEast,
            Direction::NorthWest => Direction::SouthEast,
        }
    }

    pub const fn is_orthogonal(self) -> bool {
        matches!(
            self,
            Direction::North | Direction::East | Direction::South | Direction::West
        )
    }

    /// Whether a single step of (rows, cols) stays on the line defined by this direction, in either sense.
    pub fn is_along(self, rows: i8, cols: i8) -> bool {
        let (dr, dc) = self.as_vector();
        (rows, cols) == (dr, dc) || (rows, cols) == (-dr, -dc)
    }
}

/// The eight (row, column) jumps available to a knight.
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (2, -1),
    (2, 1),
    (1, -2),
    (1, 2),
    (-1, -2),
    (-1, 2),
];

bitflags! {
    pub struct CastleRights: u8 {
        const NONE = 0;
        const WHITE_KINGSIDE = 0b0000_0001;
        const WHITE_QUEENSIDE = 0b0000_0010;
        const WHITE = Self::WHITE_KINGSIDE.bits | Self::WHITE_QUEENSIDE.bits;
        const BLACK_KINGSIDE = 0b0000_0100;
        const BLACK_QUEENSIDE = 0b0000_1000;
        const BLACK = Self::BLACK_KINGSIDE.bits | Self::BLACK_QUEENSIDE.bits;
    }
}

impl CastleRights {
    pub fn kingside(color: Color) -> CastleRights {
        match color {
            Color::White => CastleRights::WHITE_KINGSIDE,
            Color::Black => CastleRights::BLACK_KINGSIDE,
        }
    }

    pub fn queenside(color: Color) -> CastleRights {
        match color {
            Color::White => CastleRights::WHITE_QUEENSIDE,
            Color::Black => CastleRights::BLACK_QUEENSIDE,
        }
    }

    pub fn both(color: Color) -> CastleRights {
        match color {
            Color::White => CastleRights::WHITE,
            Color::Black => CastleRights::BLACK,
        }
    }

    pub fn can_castle_kingside(self, color: Color) -> bool {
        self.contains(CastleRights::kingside(color))
    }

    pub fn can_castle_queenside(self, color: Color) -> bool {
        self.contains(CastleRights::queenside(color))
    }
}
