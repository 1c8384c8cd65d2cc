use glam::{Mat4, Vec2, Vec4};

/// Axis-aligned 2D camera: the world rectangle `center ± half_extent` maps
/// onto clip space [-1,1]².
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    pub center: Vec2,
    pub half_extent: Vec2,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            half_extent: Vec2::splat(10.0),
        }
    }
}

impl Camera2D {
    pub fn new(center: Vec2, half_extent: Vec2) -> Self {
        Self {
            center,
            half_extent,
        }
    }

    /// Widen or narrow the horizontal extent so world units stay square on a
    /// `width` x `height` surface. Applied once at startup.
    pub fn with_aspect(mut self, width: u32, height: u32) -> Self {
        self.half_extent.x = self.half_extent.y * (width as f32 / height.max(1) as f32);
        self
    }

    /// Scale-and-translate world→clip transform, no rotation:
    /// `scale = 1 / half_extent`, `offset = -scale * center`.
    pub fn view_projection(&self) -> Mat4 {
        let scale = self.half_extent.recip();
        let offset = scale * -self.center;
        Mat4::from_cols(
            Vec4::new(scale.x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, scale.y, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::new(offset.x, offset.y, 0.0, 1.0),
        )
    }

    /// Project a world point to clip space.
    pub fn world_to_clip(&self, p: Vec2) -> Vec2 {
        self.view_projection().transform_point3(p.extend(0.0)).truncate()
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half_extent
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_extent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_maps_extent_to_unit_square() {
        let cam = Camera2D::default();
        assert!(cam.world_to_clip(Vec2::new(10.0, 10.0)).abs_diff_eq(Vec2::ONE, 1e-6));
        assert!(cam.world_to_clip(Vec2::new(-10.0, -10.0)).abs_diff_eq(-Vec2::ONE, 1e-6));
        assert!(cam.world_to_clip(Vec2::ZERO).abs_diff_eq(Vec2::ZERO, 1e-6));
    }

    #[test]
    fn off_center_camera_translates() {
        let cam = Camera2D::new(Vec2::new(4.0, -2.0), Vec2::new(2.0, 1.0));
        assert!(cam.world_to_clip(cam.center).abs_diff_eq(Vec2::ZERO, 1e-6));
        assert!(cam.world_to_clip(cam.max()).abs_diff_eq(Vec2::ONE, 1e-6));
        assert!(cam.world_to_clip(cam.min()).abs_diff_eq(-Vec2::ONE, 1e-6));

        let m = cam.view_projection();
        assert_eq!(m.col(3), Vec4::new(-2.0, 2.0, 0.0, 1.0));
    }

    #[test]
    fn matrix_has_no_rotation() {
        let m = Camera2D::default().view_projection();
        assert_eq!(m.col(0), Vec4::new(0.1, 0.0, 0.0, 0.0));
        assert_eq!(m.col(1), Vec4::new(0.0, 0.1, 0.0, 0.0));
        assert_eq!(m.col(2), Vec4::Z);
    }

    #[test]
    fn aspect_correction_scales_x() {
        let cam = Camera2D::default().with_aspect(960, 480);
        assert_eq!(cam.half_extent, Vec2::new(20.0, 10.0));
        let square = Camera2D::default().with_aspect(480, 480);
        assert_eq!(square.half_extent, Vec2::splat(10.0));
    }
}
