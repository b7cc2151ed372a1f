// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::time::Instant;

use structopt::StructOpt;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use ply::{perft, GameState};

#[derive(Debug, StructOpt)]
struct Options {
    /// The depth to search to.
    #[structopt(short, long)]
    depth: u32,

    /// If set, print the node count below each root move.
    #[structopt(long)]
    divide: bool,

    /// Moves to play from the initial position before counting, in coordinate notation.
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
        let mov = game.move_from_notation(text)?;
        game.apply_move(mov)?;
    }

    let start = Instant::now();
    let count = if ops.divide {
        let split = perft::divide(&mut game, ops.depth);
        for (mov, nodes) in &split {
            println!("{}: {}", mov, nodes);
        }
        split.iter().map(|(_, nodes)| nodes).sum()
    } else {
        perft::perft(&mut game, ops.depth)
    };

    println!("{}", count);
    tracing::info!(elapsed = ?start.elapsed(), "perft finished");
    Ok(())
}
