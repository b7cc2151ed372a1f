// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Move path enumeration, for checking the move generator against published node counts.

use tracing::debug;

use crate::{core::Move, GameState};

/// Counts the leaf nodes of the legal move tree rooted at `state`, `depth` plies deep. The state is restored before
/// returning.
pub fn perft(state: &mut GameState, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let (moves, _) = state.generate_legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .into_iter()
        .map(|mov| {
            state.make_move(mov);
            let count = perft(state, depth - 1);
            state.undo_move();
            count
        })
        .sum()
}

/// Like `perft`, but broken down by root move, in the order the moves were generated.
pub fn divide(state: &mut GameState, depth: u32) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    let (moves, _) = state.generate_legal_moves();
    let mut results = Vec::with_capacity(moves.len());
    for mov in moves {
        state.make_move(mov);
        let count = perft(state, depth - 1);
        state.undo_move();
        debug!(mov = %mov, count, "divide");
        results.push((mov, count));
    }

    results
}
