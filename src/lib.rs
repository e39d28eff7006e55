//! # queens-bdd: interactive N-Queens with Binary Decision Diagrams
//!
//! Given an N×N board, **`queens-bdd`** tracks which cells can still hold a
//! queen as queens are placed one at a time. Instead of backtracking, the whole
//! puzzle is compiled once into a single BDD; each placement restricts it, and a
//! cell is *dead* when restricting by a queen on it leaves the constant false.
//!
//! ## Usage
//!
//! ```rust
//! use queens_bdd::board::Cell;
//! use queens_bdd::game::{Placement, QueensGame};
//!
//! let mut game = QueensGame::new();
//! game.initialize_game(8).unwrap();
//!
//! assert_eq!(game.insert_queen(0, 0).unwrap(), Placement::Placed);
//! let board = game.game_board().unwrap();
//! assert_eq!(board.get(0, 0), Cell::Queen);
//! assert_eq!(board.get(7, 7), Cell::Dead); // same diagonal
//! assert_eq!(board.get(1, 4), Cell::Empty);
//!
//! // Dead cells silently refuse queens.
//! assert_eq!(game.insert_queen(7, 7).unwrap(), Placement::Ignored(Cell::Dead));
//! ```
//!
//! ## Components
//!
//! - **[`bdd`]**: the [`Bdd`][crate::bdd::Bdd] manager: variables, ITE/AND/OR,
//!   restriction, garbage collection. [`sat`] adds model counting.
//! - **[`rules`]**: the N-Queens rule as one BDD.
//! - **[`game`]**: the board evaluator, [`QueensGame`][crate::game::QueensGame].
//!
//! The manager uses interior mutability and is not `Sync`. Hosts that share a
//! game between threads must serialize access through one owner.

pub mod bdd;
pub mod board;
pub mod cache;
pub mod error;
pub mod game;
pub mod node;
pub mod reference;
pub mod rules;
pub mod sat;
pub mod subtable;
pub mod table;
pub mod types;
pub mod utils;
