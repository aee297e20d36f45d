mod camera;
mod color;
mod device;
mod graphics;
mod resolution;
mod shader;
mod texture;
mod wgpu_device;

pub mod testing;

pub use camera::*;
pub use color::*;
pub use device::*;
pub use graphics::*;
pub use resolution::*;
pub use shader::*;
pub use texture::*;
pub use wgpu_device::*;
