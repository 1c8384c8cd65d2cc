//! wgpu sprite backend.
//!
//! Implements [`tilemaze_render::DrawBackend`] on top of a single textured
//! triangle-strip pipeline with alpha blending.
//!
//! # Invariants
//! - Every fallible GPU object is created at startup; a frame has no error path.
//! - The streaming vertex buffer is shared by all groups and overwritten per group.
//! - Textures are sampled nearest-neighbour with clamp-to-edge addressing.

mod error;
mod gpu;
mod shaders;
mod texture;

pub use error::GpuError;
pub use gpu::{SpriteFrame, SpriteRenderer};
pub use shaders::SPRITE_SHADER;
