use crate::quad::{Quad, Vertex, strip_vertices};
use tilemaze_common::TextureSlot;

/// Per-texture quad lists for one frame, indexed by [`TextureSlot`].
///
/// Rebuilt from scratch every frame; nothing is diffed or retained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextureGroups {
    groups: [Vec<Quad>; TextureSlot::COUNT],
}

impl TextureGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, slot: TextureSlot, quad: Quad) {
        self.groups[slot.index()].push(quad);
    }

    pub fn quads(&self, slot: TextureSlot) -> &[Quad] {
        &self.groups[slot.index()]
    }

    pub fn is_empty(&self, slot: TextureSlot) -> bool {
        self.groups[slot.index()].is_empty()
    }

    /// Strip vertices for one group.
    pub fn vertices(&self, slot: TextureSlot) -> Vec<Vertex> {
        strip_vertices(self.quads(slot))
    }

    /// Groups in draw order, empty ones included.
    pub fn iter(&self) -> impl Iterator<Item = (TextureSlot, &[Quad])> {
        TextureSlot::ALL
            .into_iter()
            .map(|slot| (slot, self.quads(slot)))
    }

    pub fn total_quads(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn starts_empty() {
        let groups = TextureGroups::new();
        assert_eq!(groups.total_quads(), 0);
        assert!(TextureSlot::ALL.iter().all(|s| groups.is_empty(*s)));
    }

    #[test]
    fn push_lands_in_slot() {
        let mut groups = TextureGroups::new();
        groups.push(TextureSlot::Cover, Quad::new(Vec2::ZERO, Vec2::ONE));
        groups.push(TextureSlot::Cover, Quad::new(Vec2::X, Vec2::ONE));
        assert_eq!(groups.quads(TextureSlot::Cover).len(), 2);
        assert!(groups.is_empty(TextureSlot::Player));
        assert_eq!(groups.vertices(TextureSlot::Cover).len(), 12);
    }

    #[test]
    fn iterates_in_draw_order() {
        let groups = TextureGroups::new();
        let order: Vec<TextureSlot> = groups.iter().map(|(s, _)| s).collect();
        assert_eq!(order, TextureSlot::ALL.to_vec());
    }
}
