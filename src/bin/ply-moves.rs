// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::Context;
use structopt::StructOpt;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use ply::GameState;

/// Lists the legal moves of the position reached by playing MOVES from the initial position.
#[derive(Debug, StructOpt)]
struct Options {
    /// Print the moves as a JSON array instead of one per line.
    #[structopt(long)]
    json: bool,

    /// Moves to play first, in coordinate notation (e.g. e2e4 e7e5 g1f3).
    #[structopt(name = "MOVES")]
    moves: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let ops = Options::from_args();
    let mut game = GameState::new();
    for text in &ops.moves {
        let mov = game
            .move_from_notation(text)
            .with_context(|| format!("after {} moves", game.move_log().len()))?;
        game.apply_move(mov)?;
    }

    let moves = game.legal_moves();
    if ops.json {
        println!("{}", serde_json::to_string_pretty(&moves)?);
        return Ok(());
    }

    print!("{}", game);
    for mov in &moves {
        println!("{}", mov);
    }

    if game.check_mate() {
        println!("checkmate");
    } else if game.stale_mate() {
        println!("stalemate");
    }

    Ok(())
}
