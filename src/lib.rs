//! # Checkers Engine Library
//!
//! This library provides the rule engine for ten-by-ten checkers, a legal
//! move generator, and a computer opponent built on top of them.
//!
//! It is used by three binaries:
//! - `human_player`: Play against the computer on the command line.
//! - `ai_solver`: Takes a JSON game state and prints the move the computer
//!   would play.
//! - `strategy_evaluator`: Plays seeded computer-vs-computer games between the
//!   search strategies and reports the results.
//!
//! ## Modules
//! - `engine`: The board (`Board`, `Cell`, `Piece`), the game state
//!   (`GameState`), move sequences, and the rule engine on `Rules`
//!   (validation, application, win detection).
//! - `movegen`: Enumerates every legal move sequence for the side to move.
//! - `solver`: Bounded-depth lookahead search and the `ComputerPlayer`.
//! - `heuristics`: The single-ply greedy strategy.
//! - `wire`: The JSON payload format for game states and move sequences.
//! - `config`: Rule variants and search settings, loadable from TOML.
//! - `error`: Error types for every fallible operation.
//! - `utils`: Board diagrams and typed-in move parsing.

pub mod config;
pub mod engine;
pub mod error;
pub mod heuristics;
pub mod movegen;
pub mod solver;
pub mod utils;
pub mod wire;
