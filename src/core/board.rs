// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{fmt, ops::Index};

use crate::core::{Color, Piece, PieceKind, Square};

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// An 8x8 grid of squares, each either empty or holding a single piece. The board knows nothing about the rules of
/// chess; see `GameState` for that.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Board {
    cells: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// Creates a board with no pieces on it.
    pub fn empty() -> Board {
        Board {
            cells: [[None; 8]; 8],
        }
    }

    /// Creates a board set up with the standard initial position.
    pub fn starting() -> Board {
        let mut board = Board::empty();
        for color in [Color::White, Color::Black] {
            for (col, &kind) in BACK_RANK.iter().enumerate() {
                board.cells[color.home_row() as usize][col] = Some(Piece::new(color, kind));
                board.cells[color.pawn_row() as usize][col] =
                    Some(Piece::new(color, PieceKind::Pawn));
            }
        }

        board
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.cells[square.row() as usize][square.col() as usize]
    }

    pub fn is_vacant(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    /// Places a piece on a square, returning whatever was there before.
    pub fn put(&mut self, square: Square, piece: Piece) -> Option<Piece> {
        self.set(square, Some(piece))
    }

    /// Removes and returns the piece on a square.
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.set(square, None)
    }

    pub fn set(&mut self, square: Square, piece: Option<Piece>) -> Option<Piece> {
        let cell = &mut self.cells[square.row() as usize][square.col() as usize];
        std::mem::replace(cell, piece)
    }

    /// Iterates over every occupied square, top row first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells.iter().enumerate().filter_map(move |(col, cell)| {
                cell.map(|piece| (Square::at(row as u8, col as u8), piece))
            })
        })
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    /// Builds a board from eight rows of eight characters, top row first. `.` marks an empty square and letters
    /// follow the usual convention of uppercase for White.
    #[cfg(test)]
    pub(crate) fn from_rows(rows: [&str; 8]) -> Board {
        use std::convert::TryFrom;

        let mut board = Board::empty();
        for (row, line) in rows.iter().enumerate() {
            assert_eq!(8, line.len(), "row {} is not eight squares wide", row);
            for (col, c) in line.chars().enumerate() {
                if c != '.' {
                    let piece = Piece::try_from(c).expect("bad piece char in test board");
                    board.cells[row][col] = Some(piece);
                }
            }
        }

        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::starting()
    }
}

impl Index<Square> for Board {
    type Output = Option<Piece>;

    fn index(&self, square: Square) -> &Self::Output {
        &self.cells[square.row() as usize][square.col() as usize]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (row, cells) in self.cells.iter().enumerate() {
            for cell in cells {
                match cell {
                    Some(piece) => write!(f, " {} ", piece)?,
                    None => write!(f, " . ")?,
                }
            }

            writeln!(f, "| {}", 8 - row)?;
        }

        for _ in 0..8 {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for file in 'a'..='h' {
            write!(f, " {} ", file)?;
        }

        writeln!(f)?;
        Ok(())
    }
}
