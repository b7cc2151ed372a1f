// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `ply` is a chess rules engine.
//!
//! `ply` tracks a game from the standard initial position (or any legal setup), produces the exact set of legal
//! moves for the side to move, detects checkmate and stalemate, and applies and takes back moves, castling, en
//! passant, and promotion included. It does not search or evaluate; it only knows the rules.
//!
//! ```
//! use ply::GameState;
//!
//! let mut game = GameState::new();
//! let mov = game.move_from_notation("e2e4").unwrap();
//! game.apply_move(mov).unwrap();
//! assert_eq!(20, game.legal_moves().len());
//! ```

pub mod analysis;
pub mod core;
pub mod game;
pub mod movegen;
pub mod perft;

pub use game::{GameError, GameState};
