extern crate draughts_mcts;

use draughts_mcts::game::{Game, GameOutcome, Player};
use draughts_mcts::games::draughts::EnglishDraughts;
use draughts_mcts::mcts::MonteCarloTreeSearch;
use draughts_mcts::random::StandardRandomGenerator;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    // Set RUST_LOG=draughts_mcts=debug to see per-search statistics
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut game = EnglishDraughts::default();
    println!("{game}");

    while game.get_outcome() == GameOutcome::InProgress {
        // White thinks for longer than Black
        let budget = match game.get_current_player() {
            Player::One => Duration::from_millis(400),
            Player::Two => Duration::from_millis(100),
        };

        let mut mcts = MonteCarloTreeSearch::<_, StandardRandomGenerator>::builder(game.clone())
            .with_time_limit(budget)
            .build();
        let best_move = match mcts.search() {
            Ok(best_move) => best_move,
            Err(err) => {
                eprintln!("Search failed: {err}");
                return;
            }
        };

        print!("{}", mcts.stats());
        println!(
            "{} plays {}",
            EnglishDraughts::player_name(game.get_current_player()),
            game.describe_move(&best_move)
        );
        if let Err(err) = game.perform_move(&best_move) {
            eprintln!("Engine produced an illegal move: {err}");
            return;
        }
        println!("{game}");
    }

    match game.get_outcome() {
        GameOutcome::Win(player) => println!("{} wins!", EnglishDraughts::player_name(player)),
        GameOutcome::Draw => println!("Draw."),
        GameOutcome::InProgress => println!("Game interrupted."),
    }
}
