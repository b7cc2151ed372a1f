// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use serde::Serialize;
use thiserror::Error;

use crate::core::{Board, Color, Piece, PieceKind, Square};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("no piece on source square {0}")]
    EmptySource(Square),
    #[error("move from {0} to itself")]
    Stationary(Square),
    #[error("cannot promote to {0:?}")]
    InvalidPromotion(PieceKind),
}

/// The special-move category of a move. Exactly one applies to any given move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum MoveKind {
    Normal,
    Promotion(PieceKind),
    EnPassant,
    Castle,
}

/// A single ply, recognized by the rules engine.
///
/// A move carries a snapshot of the piece that moved and the piece that was captured, taken from the board at the
/// time the move was constructed. `GameState::undo_move` relies on that snapshot to restore the board, which is why
/// moves should always be drawn from `GameState::legal_moves` for the position they are applied to.
///
/// ## Identity
/// Two moves are equal when they share the same source square, destination square, and promotion choice. The
/// snapshot and the en-passant/castle flags do not participate; they are implied by the position.
#[derive(Copy, Clone, Debug, Serialize)]
pub struct Move {
    start: Square,
    end: Square,
    piece_moved: Piece,
    piece_captured: Option<Piece>,
    kind: MoveKind,
}

impl Move {
    /// Constructs a move from `start` to `end`, snapshotting the moving and captured pieces from `board`.
    ///
    /// For en-passant moves the captured piece is the opposing pawn, since the destination square itself is empty.
    pub fn new(start: Square, end: Square, board: &Board, kind: MoveKind) -> Result<Move, MoveError> {
        if start == end {
            return Err(MoveError::Stationary(start));
        }

        if let MoveKind::Promotion(promoted) = kind {
            if !promoted.is_promotion_choice() {
                return Err(MoveError::InvalidPromotion(promoted));
            }
        }

        let piece_moved = board.piece_at(start).ok_or(MoveError::EmptySource(start))?;
        Ok(Move::snapshot(board, start, end, piece_moved, kind))
    }

    /// Infallible constructor for the move generator, which already knows what is standing on `start`.
    pub(crate) fn snapshot(
        board: &Board,
        start: Square,
        end: Square,
        piece_moved: Piece,
        kind: MoveKind,
    ) -> Move {
        let piece_captured = match kind {
            MoveKind::EnPassant => Some(Piece::new(piece_moved.color.toggle(), PieceKind::Pawn)),
            _ => board.piece_at(end),
        };

        Move {
            start,
            end,
            piece_moved,
            piece_captured,
            kind,
        }
    }

    pub fn start(self) -> Square {
        self.start
    }

    pub fn end(self) -> Square {
        self.end
    }

    pub fn piece_moved(self) -> Piece {
        self.piece_moved
    }

    pub fn piece_captured(self) -> Option<Piece> {
        self.piece_captured
    }

    pub fn kind(self) -> MoveKind {
        self.kind
    }

    pub fn mover(self) -> Color {
        self.piece_moved.color
    }

    /// If this move is a promotion, returns the piece kind that the pawn becomes.
    pub fn promotion(self) -> Option<PieceKind> {
        match self.kind {
            MoveKind::Promotion(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn is_promotion(self) -> bool {
        self.promotion().is_some()
    }

    pub fn is_en_passant(self) -> bool {
        self.kind == MoveKind::EnPassant
    }

    pub fn is_castle(self) -> bool {
        self.kind == MoveKind::Castle
    }

    pub fn is_capture(self) -> bool {
        self.piece_captured.is_some()
    }

    pub fn is_king_move(self) -> bool {
        self.piece_moved.kind == PieceKind::King
    }

    /// The square of the piece this move captures. Differs from the destination only for en passant, where the
    /// captured pawn sits beside the moving pawn.
    pub fn capture_square(self) -> Square {
        if self.is_en_passant() {
            Square::at(self.start.row(), self.end.col())
        } else {
            self.end
        }
    }

    /// If this move is a two-square pawn advance, returns the square that was skipped over.
    pub fn skipped_square(self) -> Option<Square> {
        if self.piece_moved.kind != PieceKind::Pawn {
            return None;
        }

        let (from, to) = (self.start.row(), self.end.row());
        if from.abs_diff(to) == 2 {
            Some(Square::at((from + to) / 2, self.start.col()))
        } else {
            None
        }
    }

    /// For castles, returns the (from, to) squares of the rook that accompanies the king.
    pub fn castle_rook_squares(self) -> Option<(Square, Square)> {
        if !self.is_castle() {
            return None;
        }

        let row = self.end.row();
        if self.end.col() > self.start.col() {
            Some((Square::at(row, 7), Square::at(row, self.end.col() - 1)))
        } else {
            Some((Square::at(row, 0), Square::at(row, self.end.col() + 1)))
        }
    }

    /// Returns the canonical identifier of this move: source, destination and promotion choice packed into 15 bits.
    pub fn id(self) -> u16 {
        let promo = match self.kind {
            MoveKind::Promotion(PieceKind::Knight) => 1,
            MoveKind::Promotion(PieceKind::Bishop) => 2,
            MoveKind::Promotion(PieceKind::Rook) => 3,
            MoveKind::Promotion(PieceKind::Queen) => 4,
            _ => 0,
        };

        (self.start.index() as u16) << 9 | (self.end.index() as u16) << 3 | promo
    }

    /// Renders the move as a pair of squares in algebraic notation, e.g. "e2e4".
    pub fn notation(self) -> String {
        format!("{}{}", self.start, self.end)
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Move) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u16(self.id());
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self.promotion() {
            Some(kind) => write!(f, "{}{}", self.notation(), kind),
            None => write!(f, "{}", self.notation()),
        }
    }
}
