//! Monte Carlo tree search for two-player, perfect-information board games.
//!
//! This library provides a generic implementation of the Monte Carlo Tree Search (MCTS) algorithm
//! driven by a wall-clock budget, together with an English draughts rules engine whose move
//! generator enumerates forced multi-capture chains. Any turn-based game implementing the
//! [`game::Game`] trait can be searched.
//!
//! # Example
//!
//! ```rust
//! use draughts_mcts::game::Game;
//! use draughts_mcts::games::draughts::EnglishDraughts;
//! use draughts_mcts::mcts::MonteCarloTreeSearch;
//! use draughts_mcts::random::SeededRandomGenerator;
//! use std::time::Duration;
//!
//! // Start a game on the standard 8x8 board
//! let game = EnglishDraughts::default();
//!
//! // Create and configure a new MCTS search instance using the builder
//! let mut mcts = MonteCarloTreeSearch::builder(game.clone())
//!     .with_random_generator(SeededRandomGenerator::new(7))
//!     .with_time_limit(Duration::from_millis(20))
//!     .build();
//!
//! // Search until the time budget runs out and pick the most promising move
//! let best_move = mcts.search().unwrap();
//!
//! println!("The best move is: {}", game.describe_move(&best_move));
//! ```

/// Configuration of the search engine.
pub mod config;
/// Contains the `Game` trait and related types that define the interface for a game.
pub mod game;
/// Contains implementations of the `Game` trait.
pub mod games;
/// The core module of the library, containing the `MonteCarloTreeSearch` implementation.
pub mod mcts;
/// Contains the `MctsNode` struct, which represents a node in the search tree.
pub mod mcts_node;
/// Contains traits and implementations for random number generation.
pub mod random;
/// Random playouts used to score new nodes.
pub mod rollout;

pub use mcts::{SearchError, search};
