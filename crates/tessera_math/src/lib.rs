mod matrix;
mod rect;
mod vector;

pub use matrix::*;
pub use rect::*;
pub use vector::*;

pub use glam::Vec2;
