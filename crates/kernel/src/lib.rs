//! Maze kernel: the tile graph and the navigation state machine over it.
//!
//! # Invariants
//! - The passability table is immutable after construction.
//! - `NavigationState::apply_move` is the only mutation; blocked moves are no-ops.
//! - The visited set only grows.

pub mod maze;
pub mod navigation;

pub use maze::{Maze, MazeError};
pub use navigation::NavigationState;
