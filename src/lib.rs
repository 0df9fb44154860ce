//! An AI opponent for a square-grid connection game
//!
//! Two players take turns claiming cells of an N×N grid; the first to link
//! one pair of opposite edges with an unbroken chain of their own pieces
//! wins. The AI picks its moves with a depth-limited minimax search over
//! cloned game states, pruned with alpha-beta bounds and guided by a
//! shortest-path heuristic.
//!
//! # Basic Usage
//!
//! ```
//! use crossway_ai::game::Game;
//! use crossway_ai::heuristic::MinPiecesHeuristic;
//! use crossway_ai::solver::{Engine, Minimax};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let mut game = Game::new(3)?;
//! let mut ai = Minimax::with_seed(2, MinPiecesHeuristic, 7)?;
//!
//! let best = ai.choose_move(&game)?;
//! game.play(best)?;
//!# Ok(())
//!# }
//! ```

pub use anyhow;

pub mod board;

pub mod connection;

pub mod game;

pub mod heuristic;

pub mod solver;
