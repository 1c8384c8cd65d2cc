//! Sprite batching, independent of any GPU API.
//!
//! # Invariants
//! - The renderer never mutates navigation state.
//! - Draw lists are rebuilt from scratch every frame by [`SceneComposer`].
//! - One upload and one draw per non-empty texture group, in [`TextureSlot`]
//!   order; empty groups issue nothing.
//!
//! GPU backends implement [`DrawBackend`]; [`RecordingBackend`] stands in for
//! one in tests and headless tools.
//!
//! [`TextureSlot`]: tilemaze_common::TextureSlot

mod batch;
mod camera;
mod group;
mod quad;
mod scene;

pub use batch::{BatchRenderer, DrawBackend, DrawCommand, FrameStats, RecordingBackend};
pub use camera::Camera2D;
pub use group::TextureGroups;
pub use quad::{Quad, Tint, VERTICES_PER_QUAD, Vertex, WHITE, strip_vertices};
pub use scene::{Banner, BannerTable, SceneComposer, SceneLayout, TileLayout};
