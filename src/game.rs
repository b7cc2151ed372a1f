// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;

use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    analysis::{self, Analysis, Check},
    core::*,
    movegen,
};

/// Errors that can arise when building or driving a `GameState`. None of them leave the state modified.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("illegal move: {0}")]
    IllegalMove(Move),
    #[error("invalid move notation: {0:?}")]
    InvalidNotation(String),
    #[error("no {0} king on the board")]
    MissingKing(Color),
    #[error("more than one {0} king on the board")]
    ExtraKing(Color),
    #[error("the side not to move is in check")]
    OpponentInCheck,
}

/// A game in progress: the board plus everything needed to generate legal moves and to take moves back.
///
/// `GameState` is a plain value with no interior mutability. It is not meant to be shared between threads while it
/// is being mutated; clone it to analyze several lines at once.
#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,
    side_to_move: Color,
    /// King squares, indexed by color. Kept in lockstep with every king move and undo.
    kings: [Square; 2],
    castle_rights: CastleRights,
    /// One entry per applied move, plus the rights the game started with.
    castle_rights_log: Vec<CastleRights>,
    /// The square a pawn may capture into en passant this ply, if the previous move was a double pawn push.
    en_passant: Option<Square>,
    move_log: Vec<Move>,
    check_mate: bool,
    stale_mate: bool,
}

impl GameState {
    /// Creates a game set up in the standard initial position with full castling rights.
    pub fn new() -> GameState {
        let rights = CastleRights::WHITE | CastleRights::BLACK;
        GameState {
            board: Board::starting(),
            side_to_move: Color::White,
            kings: [E1, E8],
            castle_rights: rights,
            castle_rights_log: vec![rights],
            en_passant: None,
            move_log: Vec::new(),
            check_mate: false,
            stale_mate: false,
        }
    }

    /// Creates a game from an arbitrary board. The board must hold exactly one king of each color, and the side that
    /// just moved must not be left in check.
    pub fn from_board(
        board: Board,
        side_to_move: Color,
        castle_rights: CastleRights,
    ) -> Result<GameState, GameError> {
        let mut kings: [Option<Square>; 2] = [None, None];
        for (square, piece) in board.pieces() {
            if piece.kind != PieceKind::King {
                continue;
            }

            let slot = &mut kings[piece.color as usize];
            if slot.is_some() {
                return Err(GameError::ExtraKing(piece.color));
            }

            *slot = Some(square);
        }

        let white = kings[Color::White as usize].ok_or(GameError::MissingKing(Color::White))?;
        let black = kings[Color::Black as usize].ok_or(GameError::MissingKing(Color::Black))?;
        let state = GameState {
            board,
            side_to_move,
            kings: [white, black],
            castle_rights,
            castle_rights_log: vec![castle_rights],
            en_passant: None,
            move_log: Vec::new(),
            check_mate: false,
            stale_mate: false,
        };

        let them = side_to_move.toggle();
        if analysis::is_attacked(&state.board, them, state.king_square(them)) {
            return Err(GameError::OpponentInCheck);
        }

        Ok(state)
    }

    /// Throws away the current game and starts a new one.
    pub fn reset(&mut self) {
        debug!("resetting game");
        *self = GameState::new();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn king_square(&self, color: Color) -> Square {
        self.kings[color as usize]
    }

    pub fn castle_rights(&self) -> CastleRights {
        self.castle_rights
    }

    pub fn castle_rights_log(&self) -> &[CastleRights] {
        &self.castle_rights_log
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn move_log(&self) -> &[Move] {
        &self.move_log
    }

    /// True if the most recent call to `legal_moves` found the side to move checkmated.
    pub fn check_mate(&self) -> bool {
        self.check_mate
    }

    /// True if the most recent call to `legal_moves` found the side to move stalemated.
    pub fn stale_mate(&self) -> bool {
        self.stale_mate
    }

    pub fn in_check(&self) -> bool {
        let us = self.side_to_move;
        analysis::is_attacked(&self.board, us, self.king_square(us))
    }
}

//
// Legal move generation.
//

impl GameState {
    /// Returns every legal move for the side to move, and records whether the position is checkmate or stalemate.
    pub fn legal_moves(&mut self) -> Vec<Move> {
        let (moves, analysis) = self.generate_legal_moves();
        let stuck = moves.is_empty();
        self.check_mate = stuck && analysis.in_check();
        self.stale_mate = stuck && !analysis.in_check();
        trace!(
            side = %self.side_to_move,
            count = moves.len(),
            check = analysis.in_check(),
            "generated legal moves"
        );
        moves
    }

    /// Looks up a legal move by its identity: endpoints plus promotion choice.
    pub fn find_move(
        &self,
        start: Square,
        end: Square,
        promotion: Option<PieceKind>,
    ) -> Option<Move> {
        self.generate_legal_moves()
            .0
            .into_iter()
            .find(|mov| mov.start() == start && mov.end() == end && mov.promotion() == promotion)
    }

    /// Resolves a move written as a pair of squares, like "e2e4", against the legal moves of this position. A
    /// trailing promotion letter picks the promotion piece ("e7e8n"); without one, pawns promote to queens.
    pub fn move_from_notation(&self, text: &str) -> Result<Move, GameError> {
        let invalid = || GameError::InvalidNotation(text.to_string());
        if !text.is_ascii() || !(4..=5).contains(&text.len()) {
            return Err(invalid());
        }

        let start: Square = text[0..2].parse().map_err(|_| invalid())?;
        let end: Square = text[2..4].parse().map_err(|_| invalid())?;
        let promotion = match text[4..].chars().next() {
            Some(c) => Some(PieceKind::from_promotion_char(c).ok_or_else(invalid)?),
            None => None,
        };

        let (moves, _) = self.generate_legal_moves();
        let candidates = moves
            .into_iter()
            .filter(|mov| mov.start() == start && mov.end() == end);
        let mut fallback = None;
        for mov in candidates {
            match (mov.promotion(), promotion) {
                (found, wanted) if found == wanted => return Ok(mov),
                (Some(PieceKind::Queen), None) => fallback = Some(mov),
                _ => {}
            }
        }

        fallback.ok_or_else(invalid)
    }

    pub(crate) fn generate_legal_moves(&self) -> (Vec<Move>, Analysis) {
        let us = self.side_to_move;
        let king = self.king_square(us);
        let analysis = analysis::analyze(&self.board, us, king);
        let mut moves = Vec::new();
        match analysis.checks.as_slice() {
            [] => {
                movegen::generate_moves(self, &analysis, &mut moves);
                movegen::generate_castle_moves(self, &mut moves);
            }
            [check] => {
                movegen::generate_moves(self, &analysis, &mut moves);
                let resolving = resolving_squares(king, check);
                // King moves and en-passant captures were already played out against the board when generated.
                moves.retain(|mov| {
                    mov.is_king_move() || mov.is_en_passant() || resolving.contains(&mov.end())
                });
            }
            _ => movegen::generate_king_moves(self, king, &mut moves),
        }

        (moves, analysis)
    }
}

/// The squares a non-king piece can move to in order to answer a single check: the checking piece's own square
/// for knights, otherwise the line from the king out to and including the checker.
fn resolving_squares(king: Square, check: &Check) -> Vec<Square> {
    let dir = match check.direction {
        Some(dir) => dir,
        None => return vec![check.attacker],
    };

    let mut squares = Vec::new();
    let mut cursor = king;
    while let Some(next) = cursor.towards(dir) {
        cursor = next;
        squares.push(cursor);
        if cursor == check.attacker {
            break;
        }
    }

    squares
}

//
// Apply and undo.
//

impl GameState {
    /// Applies a move to the game. The move must be one of the moves returned by `legal_moves` for the current
    /// position; anything else is rejected and the state is left untouched.
    pub fn apply_move(&mut self, mov: Move) -> Result<(), GameError> {
        let (moves, _) = self.generate_legal_moves();
        let legal = match moves.into_iter().find(|candidate| *candidate == mov) {
            Some(legal) => legal,
            None => {
                debug!(mov = %mov, "rejected illegal move");
                return Err(GameError::IllegalMove(mov));
            }
        };

        debug!(mov = %legal, side = %self.side_to_move, "applying move");
        self.make_move(legal);
        Ok(())
    }

    /// Applies a move already known to be legal in this position.
    pub(crate) fn make_move(&mut self, mov: Move) {
        let us = mov.mover();
        self.board.take(mov.start());
        self.board.put(mov.end(), mov.piece_moved());
        match mov.kind() {
            MoveKind::Normal => {}
            MoveKind::Promotion(kind) => {
                self.board.put(mov.end(), Piece::new(us, kind));
            }
            MoveKind::EnPassant => {
                self.board.take(mov.capture_square());
            }
            MoveKind::Castle => {
                if let Some((rook_from, rook_to)) = mov.castle_rook_squares() {
                    let rook = self.board.take(rook_from);
                    self.board.set(rook_to, rook);
                }
            }
        }

        if mov.is_king_move() {
            self.kings[us as usize] = mov.end();
        }

        self.en_passant = mov.skipped_square();
        self.update_castle_rights(mov);
        self.castle_rights_log.push(self.castle_rights);
        self.move_log.push(mov);
        self.side_to_move = us.toggle();
        self.check_mate = false;
        self.stale_mate = false;
    }

    /// Takes back the most recently applied move, returning it. Does nothing if no moves have been made.
    pub fn undo_move(&mut self) -> Option<Move> {
        let mov = self.move_log.pop()?;
        let us = mov.mover();
        self.board.put(mov.start(), mov.piece_moved());
        match mov.kind() {
            MoveKind::EnPassant => {
                self.board.take(mov.end());
                self.board.set(mov.capture_square(), mov.piece_captured());
            }
            MoveKind::Castle => {
                self.board.take(mov.end());
                if let Some((rook_from, rook_to)) = mov.castle_rook_squares() {
                    let rook = self.board.take(rook_to);
                    self.board.set(rook_from, rook);
                }
            }
            MoveKind::Normal | MoveKind::Promotion(_) => {
                self.board.set(mov.end(), mov.piece_captured());
            }
        }

        if mov.is_king_move() {
            self.kings[us as usize] = mov.start();
        }

        self.side_to_move = us;
        self.castle_rights_log.pop();
        if let Some(&rights) = self.castle_rights_log.last() {
            self.castle_rights = rights;
        }

        self.en_passant = self.move_log.last().and_then(|prev| prev.skipped_square());
        self.check_mate = false;
        self.stale_mate = false;
        debug!(mov = %mov, "undid move");
        Some(mov)
    }

    /// Removes the castling rights that `mov` forfeits. Rights only ever shrink going forward.
    fn update_castle_rights(&mut self, mov: Move) {
        let us = mov.mover();
        match mov.piece_moved().kind {
            PieceKind::King => self.castle_rights.remove(CastleRights::both(us)),
            PieceKind::Rook => {
                self.castle_rights.remove(corner_rights(us, mov.start()));
            }
            _ => {}
        }

        // Capturing a rook in its corner takes away the owner's castle on that side.
        if let Some(captured) = mov.piece_captured() {
            if captured.kind == PieceKind::Rook {
                self.castle_rights
                    .remove(corner_rights(captured.color, mov.capture_square()));
            }
        }
    }
}

/// The castling right tied to a rook starting on `square`, if `square` is one of `color`'s home corners.
fn corner_rights(color: Color, square: Square) -> CastleRights {
    if square.row() != color.home_row() {
        return CastleRights::NONE;
    }

    match square.col() {
        0 => CastleRights::queenside(color),
        7 => CastleRights::kingside(color),
        _ => CastleRights::NONE,
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.board)?;
        writeln!(f, "{} to move", self.side_to_move)
    }
}
