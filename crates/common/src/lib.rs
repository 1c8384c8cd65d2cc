//! Shared types for the tilemaze workspace.
//!
//! Everything here is plain data: tile coordinates, move directions, the six
//! texture slots the scene draws with, and the compiled-in window config.

mod config;
mod types;

pub use config::AppConfig;
pub use types::{Direction, ParseDirectionError, TextureSlot, TileCoord};
