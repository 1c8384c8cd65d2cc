use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// RGBA8 tint multiplied into the sampled texel.
pub type Tint = [u8; 4];

/// Opaque white: draw the texture unmodified.
pub const WHITE: Tint = [0xff, 0xff, 0xff, 0xff];

/// Vertices emitted per quad: a four-vertex strip bracketed by two
/// duplicates so consecutive quads join through degenerate triangles.
pub const VERTICES_PER_QUAD: usize = 6;

/// One vertex as uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub tex_coord: [f32; 2],
    pub color: Tint,
}

const _: () = assert!(std::mem::size_of::<Vertex>() == 20);

impl Vertex {
    pub fn new(position: Vec2, tex_coord: Vec2, color: Tint) -> Self {
        Self {
            position: position.to_array(),
            tex_coord: tex_coord.to_array(),
            color,
        }
    }
}

/// Axis-aligned textured rectangle in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub center: Vec2,
    pub half_extent: Vec2,
    pub min_uv: Vec2,
    pub max_uv: Vec2,
    pub tint: Tint,
}

impl Quad {
    /// Quad sampling the whole texture with a white tint.
    pub fn new(center: Vec2, half_extent: Vec2) -> Self {
        Self {
            center,
            half_extent,
            min_uv: Vec2::ZERO,
            max_uv: Vec2::ONE,
            tint: WHITE,
        }
    }

    pub fn with_tint(mut self, tint: Tint) -> Self {
        self.tint = tint;
        self
    }

    pub fn with_uv_rect(mut self, min_uv: Vec2, max_uv: Vec2) -> Self {
        self.min_uv = min_uv;
        self.max_uv = max_uv;
        self
    }

    /// Strip order: bottom-left, bottom-left, top-left, bottom-right,
    /// top-right, top-right.
    pub fn vertices(&self) -> [Vertex; VERTICES_PER_QUAD] {
        let min = self.center - self.half_extent;
        let max = self.center + self.half_extent;
        let bottom_left = Vertex::new(min, self.min_uv, self.tint);
        let top_left = Vertex::new(
            Vec2::new(min.x, max.y),
            Vec2::new(self.min_uv.x, self.max_uv.y),
            self.tint,
        );
        let bottom_right = Vertex::new(
            Vec2::new(max.x, min.y),
            Vec2::new(self.max_uv.x, self.min_uv.y),
            self.tint,
        );
        let top_right = Vertex::new(max, self.max_uv, self.tint);
        [
            bottom_left,
            bottom_left,
            top_left,
            bottom_right,
            top_right,
            top_right,
        ]
    }
}

/// Flatten quads into one strip.
pub fn strip_vertices(quads: &[Quad]) -> Vec<Vertex> {
    quads.iter().flat_map(|q| q.vertices()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 20);
        assert_eq!(std::mem::align_of::<Vertex>(), 4);
    }

    #[test]
    fn quad_winding_and_degenerates() {
        let v = Quad::new(Vec2::new(1.0, 2.0), Vec2::new(0.5, 1.0)).vertices();
        assert_eq!(v[0], v[1]);
        assert_eq!(v[4], v[5]);
        assert_eq!(v[0].position, [0.5, 1.0]);
        assert_eq!(v[2].position, [0.5, 3.0]);
        assert_eq!(v[3].position, [1.5, 1.0]);
        assert_eq!(v[4].position, [1.5, 3.0]);
    }

    #[test]
    fn full_texture_uvs_and_white_tint() {
        let v = Quad::new(Vec2::ZERO, Vec2::ONE).vertices();
        let uvs: Vec<[f32; 2]> = v.iter().map(|v| v.tex_coord).collect();
        assert_eq!(
            uvs,
            vec![
                [0.0, 0.0],
                [0.0, 0.0],
                [0.0, 1.0],
                [1.0, 0.0],
                [1.0, 1.0],
                [1.0, 1.0]
            ]
        );
        assert!(v.iter().all(|v| v.color == WHITE));
    }

    #[test]
    fn tint_and_uv_rect_flow_through() {
        let q = Quad::new(Vec2::ZERO, Vec2::ONE)
            .with_tint([1, 2, 3, 4])
            .with_uv_rect(Vec2::new(0.25, 0.5), Vec2::new(0.75, 1.0));
        let v = q.vertices();
        assert_eq!(v[0].tex_coord, [0.25, 0.5]);
        assert_eq!(v[2].tex_coord, [0.25, 1.0]);
        assert_eq!(v[3].tex_coord, [0.75, 0.5]);
        assert!(v.iter().all(|v| v.color == [1, 2, 3, 4]));
    }

    #[test]
    fn strip_concatenates_quads() {
        let quads = [Quad::new(Vec2::ZERO, Vec2::ONE), Quad::new(Vec2::X, Vec2::ONE)];
        let strip = strip_vertices(&quads);
        assert_eq!(strip.len(), 2 * VERTICES_PER_QUAD);
        assert_eq!(&strip[6..], &quads[1].vertices());
        assert!(bytemuck::cast_slice::<Vertex, u8>(&strip).len() == 240);
    }
}
