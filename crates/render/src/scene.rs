use crate::camera::Camera2D;
use crate::group::TextureGroups;
use crate::quad::Quad;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tilemaze_common::{TextureSlot, TileCoord};
use tilemaze_kernel::NavigationState;

/// Which message banner a tile shows. Exactly one applies to any tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Banner {
    Find,
    Mine,
    Found,
}

impl Banner {
    pub fn slot(self) -> TextureSlot {
        match self {
            Self::Find => TextureSlot::FindBanner,
            Self::Mine => TextureSlot::MineBanner,
            Self::Found => TextureSlot::FoundBanner,
        }
    }
}

/// Fixed tile classification driving the banner. `found` wins over `mine`;
/// everything else is `Find`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerTable {
    pub found: TileCoord,
    pub mines: Vec<TileCoord>,
}

impl BannerTable {
    pub fn reference() -> Self {
        Self {
            found: TileCoord::new(0, 4),
            mines: vec![
                TileCoord::new(1, 0),
                TileCoord::new(3, 0),
                TileCoord::new(4, 2),
                TileCoord::new(5, 4),
            ],
        }
    }

    pub fn classify(&self, tile: TileCoord) -> Banner {
        if tile == self.found {
            Banner::Found
        } else if self.mines.contains(&tile) {
            Banner::Mine
        } else {
            Banner::Find
        }
    }
}

/// Affine map from tile coordinates to world space:
/// `x = origin.x + col * stride.x`, `y = origin.y - row * stride.y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileLayout {
    pub origin: Vec2,
    pub stride: Vec2,
}

impl TileLayout {
    pub fn world_position(&self, tile: TileCoord) -> Vec2 {
        Vec2::new(
            self.origin.x + tile.col as f32 * self.stride.x,
            self.origin.y - tile.row as f32 * self.stride.y,
        )
    }
}

/// World-space placement constants for every scene element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneLayout {
    pub background_center: Vec2,
    pub background_half_extent: Vec2,
    pub player: TileLayout,
    pub player_half_extent: Vec2,
    pub banner_center: Vec2,
    pub banner_half_extent: Vec2,
    /// Covers sit on a slightly different lattice than the player marker so
    /// they line up with the artwork's room cells.
    pub cover: TileLayout,
    pub cover_half_extent: Vec2,
}

impl SceneLayout {
    /// Placement for the reference artwork, with the background filling
    /// `camera`'s view.
    pub fn reference(camera: &Camera2D) -> Self {
        Self {
            background_center: camera.center,
            background_half_extent: camera.half_extent,
            player: TileLayout {
                origin: Vec2::new(-8.0, 8.0),
                stride: Vec2::new(4.0, 2.5),
            },
            player_half_extent: Vec2::splat(0.8),
            banner_center: Vec2::new(0.0, -8.5),
            banner_half_extent: Vec2::new(10.0, 1.6),
            cover: TileLayout {
                origin: Vec2::new(-8.0, 8.5),
                stride: Vec2::new(4.0, 3.0),
            },
            cover_half_extent: Vec2::new(2.0, 1.5),
        }
    }
}

/// Turns navigation state into per-texture quad lists. Holds only immutable
/// layout and classification data.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneComposer {
    layout: SceneLayout,
    banners: BannerTable,
}

impl SceneComposer {
    pub fn new(layout: SceneLayout, banners: BannerTable) -> Self {
        Self { layout, banners }
    }

    pub fn reference(camera: &Camera2D) -> Self {
        Self::new(SceneLayout::reference(camera), BannerTable::reference())
    }

    pub fn layout(&self) -> &SceneLayout {
        &self.layout
    }

    pub fn banner_for(&self, tile: TileCoord) -> Banner {
        self.banners.classify(tile)
    }

    /// Build this frame's groups: background, player, one banner, and a
    /// cover over every unvisited tile.
    pub fn compose(&self, nav: &NavigationState) -> TextureGroups {
        let layout = &self.layout;
        let mut groups = TextureGroups::new();

        groups.push(
            TextureSlot::Background,
            Quad::new(layout.background_center, layout.background_half_extent),
        );

        let position = nav.current_position();
        groups.push(
            TextureSlot::Player,
            Quad::new(
                layout.player.world_position(position),
                layout.player_half_extent,
            ),
        );

        groups.push(
            self.banner_for(position).slot(),
            Quad::new(layout.banner_center, layout.banner_half_extent),
        );

        for tile in nav.maze().tiles().filter(|t| !nav.is_visited(*t)) {
            groups.push(
                TextureSlot::Cover,
                Quad::new(layout.cover.world_position(tile), layout.cover_half_extent),
            );
        }

        groups
    }
}
