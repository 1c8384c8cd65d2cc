use tilemaze_common::TextureSlot;

/// Fatal errors while building GPU resources. None of these can occur once a
/// [`crate::SpriteRenderer`] exists.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("shader compilation failed: {0}")]
    Shader(String),
    #[error("render pipeline creation failed (attribute or uniform mismatch?): {0}")]
    Pipeline(String),
    #[error("texture {slot} ({width}x{height}) could not be created: {message}")]
    Texture {
        slot: TextureSlot,
        width: u32,
        height: u32,
        message: String,
    },
}

/// Run `f` inside a validation error scope and turn any captured error into
/// `Err(message)`.
pub(crate) fn validated<T>(
    device: &wgpu::Device,
    f: impl FnOnce() -> T,
) -> Result<T, String> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = f();
    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(err.to_string()),
        None => Ok(value),
    }
}
