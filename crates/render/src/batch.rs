use crate::camera::Camera2D;
use crate::group::TextureGroups;
use crate::quad::Vertex;
use glam::Mat4;
use serde::Serialize;
use std::fmt::Write as _;
use tilemaze_common::TextureSlot;

/// GPU-side operations the batch renderer drives. A backend owns the
/// streaming vertex buffer, the pipeline and one texture per slot.
///
/// Calls arrive in a fixed order per frame: one `set_view_projection`, then
/// `upload`/`draw` pairs for each non-empty group in draw order.
pub trait DrawBackend {
    /// Upload the camera transform; called once before any draw.
    fn set_view_projection(&mut self, view_proj: Mat4);

    /// Replace the streaming vertex buffer's contents.
    fn upload(&mut self, vertices: &[Vertex]);

    /// Draw the first `vertex_count` uploaded vertices as a triangle strip
    /// with `slot`'s texture bound.
    fn draw(&mut self, slot: TextureSlot, vertex_count: u32);
}

/// What one frame submitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    pub draw_calls: u32,
    pub quads: u32,
    pub vertices: u32,
}

/// Issues one upload and one draw per non-empty texture group.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchRenderer;

impl BatchRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Submit `groups` as seen through `camera`. Empty groups are skipped
    /// entirely; nothing here can fail once the backend exists.
    pub fn render<B: DrawBackend + ?Sized>(
        &self,
        backend: &mut B,
        groups: &TextureGroups,
        camera: &Camera2D,
    ) -> FrameStats {
        backend.set_view_projection(camera.view_projection());

        let mut stats = FrameStats::default();
        for (slot, quads) in groups.iter() {
            if quads.is_empty() {
                continue;
            }
            let vertices = groups.vertices(slot);
            let count = vertices.len() as u32;
            backend.upload(&vertices);
            backend.draw(slot, count);

            stats.draw_calls += 1;
            stats.quads += quads.len() as u32;
            stats.vertices += count;
        }
        tracing::trace!(
            draw_calls = stats.draw_calls,
            quads = stats.quads,
            "frame submitted"
        );
        stats
    }
}

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    SetViewProjection(Mat4),
    Upload(Vec<Vertex>),
    Draw { slot: TextureSlot, vertex_count: u32 },
}

/// Backend that records calls instead of touching a GPU.
///
/// Used for tests and the headless CLI. [`RecordingBackend::describe`]
/// gives a human-readable dump of the frame.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    commands: Vec<DrawCommand>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Slots drawn, in submission order.
    pub fn drawn_slots(&self) -> Vec<TextureSlot> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Draw { slot, .. } => Some(*slot),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn describe(&self) -> String {
        let mut out = String::new();
        for command in &self.commands {
            // Writing to a String cannot fail.
            let _ = match command {
                DrawCommand::SetViewProjection(m) => {
                    let s = m.col(0);
                    let t = m.col(3);
                    writeln!(
                        out,
                        "view_proj scale=({:.3}, {:.3}) offset=({:.3}, {:.3})",
                        s.x,
                        m.col(1).y,
                        t.x,
                        t.y
                    )
                }
                DrawCommand::Upload(vertices) => {
                    writeln!(out, "upload {} vertices", vertices.len())
                }
                DrawCommand::Draw { slot, vertex_count } => {
                    writeln!(out, "draw {slot} ({vertex_count} vertices)")
                }
            };
        }
        out
    }
}

impl DrawBackend for RecordingBackend {
    fn set_view_projection(&mut self, view_proj: Mat4) {
        self.commands.push(DrawCommand::SetViewProjection(view_proj));
    }

    fn upload(&mut self, vertices: &[Vertex]) {
        self.commands.push(DrawCommand::Upload(vertices.to_vec()));
    }

    fn draw(&mut self, slot: TextureSlot, vertex_count: u32) {
        self.commands.push(DrawCommand::Draw { slot, vertex_count });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quad::Quad;
    use crate::scene::SceneComposer;
    use glam::Vec2;
    use tilemaze_kernel::NavigationState;

    #[test]
    fn empty_frame_sets_camera_only() {
        let mut backend = RecordingBackend::new();
        let stats = BatchRenderer::new().render(
            &mut backend,
            &TextureGroups::new(),
            &Camera2D::default(),
        );
        assert_eq!(stats, FrameStats::default());
        assert_eq!(backend.commands().len(), 1);
        assert!(matches!(
            backend.commands()[0],
            DrawCommand::SetViewProjection(_)
        ));
    }

    #[test]
    fn empty_groups_are_skipped() {
        let mut groups = TextureGroups::new();
        groups.push(TextureSlot::Background, Quad::new(Vec2::ZERO, Vec2::ONE));
        groups.push(TextureSlot::Cover, Quad::new(Vec2::ZERO, Vec2::ONE));

        let mut backend = RecordingBackend::new();
        let stats = BatchRenderer::new().render(&mut backend, &groups, &Camera2D::default());
        assert_eq!(stats.draw_calls, 2);
        assert_eq!(
            backend.drawn_slots(),
            vec![TextureSlot::Background, TextureSlot::Cover]
        );
    }

    #[test]
    fn camera_uploaded_once_before_draws() {
        let groups =
            SceneComposer::reference(&Camera2D::default()).compose(&NavigationState::default());
        let camera = Camera2D::default();
        let mut backend = RecordingBackend::new();
        BatchRenderer::new().render(&mut backend, &groups, &camera);

        let cmds = backend.commands();
        assert_eq!(cmds[0], DrawCommand::SetViewProjection(camera.view_projection()));
        let camera_uploads = cmds
            .iter()
            .filter(|c| matches!(c, DrawCommand::SetViewProjection(_)))
            .count();
        assert_eq!(camera_uploads, 1);
    }

    #[test]
    fn each_draw_follows_its_own_upload() {
        let groups =
            SceneComposer::reference(&Camera2D::default()).compose(&NavigationState::default());
        let mut backend = RecordingBackend::new();
        let stats = BatchRenderer::new().render(&mut backend, &groups, &Camera2D::default());

        // background, player, find banner, cover
        assert_eq!(stats.draw_calls, 4);
        assert_eq!(stats.quads, 1 + 1 + 1 + 29);
        assert_eq!(stats.vertices, stats.quads * 6);

        for pair in backend.commands()[1..].chunks(2) {
            match pair {
                [DrawCommand::Upload(v), DrawCommand::Draw { slot, vertex_count }] => {
                    assert_eq!(v.len() as u32, *vertex_count);
                    assert_eq!(*v, groups.vertices(*slot));
                }
                other => panic!("unexpected command pair {other:?}"),
            }
        }
        assert_eq!(
            backend.drawn_slots(),
            vec![
                TextureSlot::Background,
                TextureSlot::Player,
                TextureSlot::FindBanner,
                TextureSlot::Cover
            ]
        );
    }

    #[test]
    fn describe_lists_frame() {
        let groups =
            SceneComposer::reference(&Camera2D::default()).compose(&NavigationState::default());
        let mut backend = RecordingBackend::new();
        BatchRenderer::new().render(&mut backend, &groups, &Camera2D::default());
        let text = backend.describe();
        assert!(text.starts_with("view_proj scale=(0.100, 0.100)"));
        assert!(text.contains("draw cover (174 vertices)"));
        assert!(!text.contains("mine_banner"));

        backend.clear();
        assert!(backend.describe().is_empty());
    }
}
