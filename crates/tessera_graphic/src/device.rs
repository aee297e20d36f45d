use serde::Deserialize;
use thiserror::Error;

use crate::{Color, ShaderDescriptor, UniformValue};

/// Identifier of a linked shader program owned by a [GraphicsDevice]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProgramId(pub usize);

/// Identifier of a sampleable texture owned by a [GraphicsDevice]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

/// Identifier of an off-screen render target owned by a [GraphicsDevice]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TargetId(pub usize);

/// How incoming fragments are combined with the target
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum BlendMode {
    #[default]
    Normal,
    Add,
    Multiply,
    Screen,
}

#[derive(Error, Debug)]
pub enum GraphicsError {
    #[error("no compatible graphics adapter found")]
    NoAdapter,
    #[error("cannot create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("cannot request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface is no longer valid: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("uniform block of shader `{shader}` needs {size} bytes, at most {max} are supported")]
    UniformBlockTooLarge {
        shader: String,
        size: usize,
        max: usize,
    },
    #[error("texture data has {actual} bytes, {expected} expected")]
    TextureSize { expected: usize, actual: usize },
}

/// The GPU seam of the batch renderer
///
/// [Graphics](crate::Graphics) decides *when* state changes and draw calls
/// happen, a device only executes them. Positions and texcoords are packed
/// as two floats per vertex, colors as four.
pub trait GraphicsDevice {
    fn create_program(&mut self, descriptor: &ShaderDescriptor)
        -> Result<ProgramId, GraphicsError>;

    /// Uploads an RGBA8 image and returns a sampleable handle
    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<TextureId, GraphicsError>;

    /// Creates an off-screen target, its content can be sampled through the
    /// returned texture
    fn create_render_target(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<(TargetId, TextureId), GraphicsError>;

    /// Releases a target and its texture, neither id is used afterwards
    fn destroy_render_target(&mut self, target: TargetId, texture: TextureId);

    /// Makes `program` current, binding its vertex attributes
    fn use_program(&mut self, program: ProgramId);

    /// Uploads the value of the uniform at `index` in the program descriptor
    fn set_uniform(&mut self, program: ProgramId, index: usize, value: &UniformValue);

    fn set_blend_mode(&mut self, mode: BlendMode);

    /// Binds an off-screen target, or the visible surface when `None`
    fn bind_target(&mut self, target: Option<TargetId>, viewport: (u32, u32));

    fn clear(&mut self, color: Color);

    /// Draws the given vertices as a triangle list with the current state
    fn draw_triangles(&mut self, positions: &[f32], texcoords: &[f32], colors: &[f32]);

    /// Size in pixels of the visible surface
    fn surface_size(&self) -> (u32, u32);

    fn present(&mut self) -> Result<(), GraphicsError>;
}
