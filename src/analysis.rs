// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Check and pin detection for the side to move.
//!
//! Everything here is a pure function of a board, a color, and a king square. The king square does not have to be
//! where the king actually stands: the move generator asks "would the king be attacked over there?" by passing a
//! hypothetical square, and the king's real square is treated as empty while the rays are cast.

use crate::core::{Board, Color, Direction, Piece, PieceKind, Square, KNIGHT_OFFSETS};

/// A friendly piece that shields the king from an enemy slider along `direction`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pin {
    pub square: Square,
    /// Direction from the king towards the pinned piece.
    pub direction: Direction,
}

/// An enemy piece giving check.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Check {
    pub attacker: Square,
    /// Direction from the king towards the attacker, or None for knight checks, which do not travel along a line.
    pub direction: Option<Direction>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Analysis {
    pub pins: Vec<Pin>,
    pub checks: Vec<Check>,
}

impl Analysis {
    pub fn in_check(&self) -> bool {
        !self.checks.is_empty()
    }

    pub fn is_double_check(&self) -> bool {
        self.checks.len() > 1
    }

    /// If the piece on `square` is pinned, returns the direction of the pin.
    pub fn pin_on(&self, square: Square) -> Option<Direction> {
        self.pins
            .iter()
            .find(|pin| pin.square == square)
            .map(|pin| pin.direction)
    }
}

/// Computes the checks against, and pins on, `us` if its king were standing on `king`.
pub fn analyze(board: &Board, us: Color, king: Square) -> Analysis {
    let mut analysis = Analysis::default();
    for dir in Direction::ALL {
        let mut shield: Option<Square> = None;
        let mut cursor = king;
        let mut distance = 0;
        while let Some(next) = cursor.towards(dir) {
            cursor = next;
            distance += 1;
            let piece = match board.piece_at(cursor) {
                Some(piece) => piece,
                None => continue,
            };

            if piece.color == us {
                if piece.kind == PieceKind::King {
                    continue;
                }

                if shield.is_some() {
                    // Two friendly pieces in a row; nothing further down this ray matters.
                    break;
                }

                shield = Some(cursor);
                continue;
            }

            if attacks_along(piece, dir, distance) {
                match shield {
                    None => analysis.checks.push(Check {
                        attacker: cursor,
                        direction: Some(dir),
                    }),
                    Some(square) => analysis.pins.push(Pin {
                        square,
                        direction: dir,
                    }),
                }
            }

            break;
        }
    }

    let enemy_knight = Piece::new(us.toggle(), PieceKind::Knight);
    for (rows, cols) in KNIGHT_OFFSETS {
        if let Some(square) = king.offset(rows, cols) {
            if board.piece_at(square) == Some(enemy_knight) {
                analysis.checks.push(Check {
                    attacker: square,
                    direction: None,
                });
            }
        }
    }

    analysis
}

/// Returns whether a piece of color `us` standing on `square` would be attacked by the opponent.
pub fn is_attacked(board: &Board, us: Color, square: Square) -> bool {
    analyze(board, us, square).in_check()
}

/// Whether an enemy `piece`, found `distance` squares from the king along `dir`, attacks the king down that line.
fn attacks_along(piece: Piece, dir: Direction, distance: u32) -> bool {
    match piece.kind {
        PieceKind::Rook => dir.is_orthogonal(),
        PieceKind::Bishop => !dir.is_orthogonal(),
        PieceKind::Queen => true,
        PieceKind::King => distance == 1,
        PieceKind::Pawn => {
            // The pawn captures back towards the king, one row forward from its own point of view.
            let (rows, _) = dir.reverse().as_vector();
            distance == 1 && !dir.is_orthogonal() && rows == piece.color.forward()
        }
        PieceKind::Knight => false,
    }
}
