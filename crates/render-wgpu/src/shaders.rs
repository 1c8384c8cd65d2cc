/// WGSL shader for textured, tinted sprite strips.
///
/// Vertex inputs: position (location 0), tex_coord (1), color (2).
/// Bindings: group 0 holds the mvp uniform, group 1 the texture and sampler
/// of the slot being drawn.
pub const SPRITE_SHADER: &str = r#"
struct Uniforms {
    mvp: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(1) @binding(0)
var sprite_texture: texture_2d<f32>;

@group(1) @binding(1)
var sprite_sampler: sampler;

struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) tex_coord: vec2<f32>,
    @location(2) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) tex_coord: vec2<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = uniforms.mvp * vec4<f32>(vertex.position, 0.0, 1.0);
    out.tex_coord = vertex.tex_coord;
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(sprite_texture, sprite_sampler, in.tex_coord) * in.color;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_points_match_pipeline() {
        assert!(SPRITE_SHADER.contains("fn vs_main("));
        assert!(SPRITE_SHADER.contains("fn fs_main("));
    }

    #[test]
    fn bindings_match_layouts() {
        assert!(SPRITE_SHADER.contains("@group(0) @binding(0)\nvar<uniform>"));
        assert!(SPRITE_SHADER.contains("@group(1) @binding(0)\nvar sprite_texture"));
        assert!(SPRITE_SHADER.contains("@group(1) @binding(1)\nvar sprite_sampler"));
        for loc in 0..3 {
            assert!(SPRITE_SHADER.contains(&format!("@location({loc})")));
        }
    }
}
