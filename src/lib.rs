//! # Flow Solver Heuristics
//!
//! This library provides the decision support a backtracking search needs to solve
//! flow puzzles: a grid of colored endpoint pairs that must all be connected by
//! non-crossing paths filling the board.
//!
//! It is used by the `branch_order` binary, which loads a puzzle file, reports the
//! order in which a search would try the colors, and checks the starting position
//! for dead ends.
//!
//! ## Modules
//! - `engine`: Positions, directions, cells, the fixed puzzle description (`PuzzleInfo`)
//!   and the mutable search state (`GameState`).
//! - `heuristics`: The branch-order ranking (`order_colors`) and the local dead-end
//!   check (`check_deadends`).
//! - `options`: `SearchOptions`, the configuration passed to the heuristics.
//! - `utils`: Loading puzzles from strings or files.

pub mod engine;
pub mod heuristics;
pub mod options;
pub mod utils;
