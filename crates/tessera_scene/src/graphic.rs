use glam::Vec2;
use tessera_graphic::{Camera, Color, Graphics, Texture, TextureParams};
use tessera_math::{Rect, VectorExt};

use crate::{Component, Entity};

/// Draws a texture at the entity position
#[derive(Debug, Clone)]
pub struct Graphic {
    pub texture: Texture,
    /// Local offset from the entity position
    pub position: Vec2,
    pub crop: Option<Rect>,
    pub origin: Vec2,
    pub scale: Vec2,
    pub rotation: f32,
    pub flip_x: bool,
    pub flip_y: bool,
    pub color: Color,
    pub alpha: f32,
    pub visible: bool,
}

impl Graphic {
    pub fn new(texture: Texture) -> Self {
        Self {
            texture,
            position: Vec2::ZERO,
            crop: None,
            origin: Vec2::ZERO,
            scale: Vec2::ONE,
            rotation: 0.0,
            flip_x: false,
            flip_y: false,
            color: Color::WHITE,
            alpha: 1.0,
            visible: true,
        }
    }

    /// Size of the drawn region before scaling
    pub fn size(&self) -> Vec2 {
        match self.crop {
            Some(crop) => crop.size(),
            None => Vec2::new(self.texture.width(), self.texture.height()),
        }
    }

    pub fn center_origin(&mut self) {
        self.origin = self.size() / 2.0;
    }
}

impl Component for Graphic {
    fn visible(&self) -> bool {
        self.visible
    }

    fn render(&self, entity: &Entity, gfx: &mut Graphics, _camera: &Camera) {
        gfx.texture(
            &self.texture,
            entity.position + self.position,
            &TextureParams {
                crop: self.crop,
                color: self.color.mult(self.alpha),
                origin: self.origin,
                scale: self.scale,
                rotation: self.rotation,
                flip_x: self.flip_x,
                flip_y: self.flip_y,
            },
        );
    }
}

/// Draws a solid rectangle at the entity position
#[derive(Debug, Clone)]
pub struct Rectsprite {
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    pub origin: Vec2,
    pub scale: Vec2,
    pub rotation: f32,
    pub color: Color,
    pub alpha: f32,
    pub visible: bool,
}

impl Rectsprite {
    pub fn new(width: f32, height: f32, color: Color) -> Self {
        Self {
            position: Vec2::ZERO,
            width,
            height,
            origin: Vec2::ZERO,
            scale: Vec2::ONE,
            rotation: 0.0,
            color,
            alpha: 1.0,
            visible: true,
        }
    }

    pub fn center_origin(&mut self) {
        self.origin = Vec2::new(self.width, self.height) / 2.0;
    }
}

impl Component for Rectsprite {
    fn visible(&self) -> bool {
        self.visible
    }

    fn render(&self, entity: &Entity, gfx: &mut Graphics, _camera: &Camera) {
        let position = entity.position + self.position;
        let [a, b, c, d] = [
            Vec2::ZERO,
            Vec2::new(self.width, 0.0),
            Vec2::new(self.width, self.height),
            Vec2::new(0.0, self.height),
        ]
        .map(|corner| ((corner - self.origin) * self.scale).rotated(self.rotation) + position);

        gfx.quad(a, b, c, d, &self.color.mult(self.alpha));
    }
}
