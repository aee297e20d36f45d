mod collider;
mod component;
mod entity;
mod graphic;
mod object_list;
mod renderer;
mod scene;

pub use collider::*;
pub use component::*;
pub use entity::*;
pub use graphic::*;
pub use object_list::*;
pub use renderer::*;
pub use scene::*;
