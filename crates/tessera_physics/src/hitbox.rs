use glam::Vec2;
use tessera_graphic::{Camera, Color, Graphics};
use tessera_math::Rect;
use tessera_scene::{Collider, Component, Entity};

/// Axis aligned rectangle collider
///
/// `left` and `top` are relative to the entity position.
#[derive(Debug, Clone)]
pub struct Hitbox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    tags: Vec<String>,
    pub active: bool,
    pub debug_color: Color,
}

impl Hitbox {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
            tags: Vec::new(),
            active: true,
            debug_color: Color::new(1.0, 0.0, 0.0, 0.5),
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|tag| tag.to_string()).collect();
        self
    }

    /// Bounds in scene space for an entity placed at `position`
    pub fn bounds(&self, position: Vec2) -> Rect {
        Rect::new(
            position.x + self.left,
            position.y + self.top,
            self.width,
            self.height,
        )
    }
}

impl Component for Hitbox {
    fn active(&self) -> bool {
        self.active
    }

    fn debug_render(&self, entity: &Entity, gfx: &mut Graphics, _camera: &Camera) {
        gfx.hollow_rect(self.bounds(entity.position), 1.0, &self.debug_color);
    }

    fn as_collider(&self) -> Option<&dyn Collider> {
        Some(self)
    }

    fn as_collider_mut(&mut self) -> Option<&mut dyn Collider> {
        Some(self)
    }
}

impl Collider for Hitbox {
    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn tags_mut(&mut self) -> &mut Vec<String> {
        &mut self.tags
    }

    fn offset(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    fn collider_name(&self) -> &'static str {
        "Hitbox"
    }
}
