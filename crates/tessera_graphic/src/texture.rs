use tessera_math::Rect;

use crate::{TargetId, TextureId};

/// A drawable region of a device texture
///
/// `bounds` is the region inside the source image, `frame` places that
/// region inside the logical image: trimmed atlas entries have a negative
/// `frame.x`/`frame.y` and a frame bigger than their bounds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Texture {
    pub id: TextureId,
    pub source_width: u32,
    pub source_height: u32,
    pub bounds: Rect,
    pub frame: Rect,
}

impl Texture {
    pub fn new(id: TextureId, width: u32, height: u32) -> Self {
        let full = Rect::new(0.0, 0.0, width as f32, height as f32);
        Self {
            id,
            source_width: width,
            source_height: height,
            bounds: full,
            frame: full,
        }
    }

    /// Logical width, including trimmed space
    pub fn width(&self) -> f32 {
        self.frame.width
    }

    /// Logical height, including trimmed space
    pub fn height(&self) -> f32 {
        self.frame.height
    }

    /// Extracts the `clip` region, expressed in logical coordinates of this
    /// texture
    pub fn subtexture(&self, clip: Rect) -> Texture {
        let bounds_x = self.bounds.x
            + (clip.x + self.frame.x).min(self.bounds.width).max(0.0);
        let bounds_y = self.bounds.y
            + (clip.y + self.frame.y).min(self.bounds.height).max(0.0);
        let bounds_right = self.bounds.x
            + (clip.x + self.frame.x + clip.width).min(self.bounds.width);
        let bounds_bottom = self.bounds.y
            + (clip.y + self.frame.y + clip.height).min(self.bounds.height);

        Texture {
            id: self.id,
            source_width: self.source_width,
            source_height: self.source_height,
            bounds: Rect::new(
                bounds_x,
                bounds_y,
                (bounds_right - bounds_x).max(0.0),
                (bounds_bottom - bounds_y).max(0.0),
            ),
            frame: Rect::new(
                (self.frame.x + clip.x).min(0.0),
                (self.frame.y + clip.y).min(0.0),
                clip.width,
                clip.height,
            ),
        }
    }

    /// Texture coordinates of the bounds as `(u0, v0, u1, v1)`
    pub fn uv(&self) -> (f32, f32, f32, f32) {
        let w = self.source_width as f32;
        let h = self.source_height as f32;
        (
            self.bounds.left() / w,
            self.bounds.top() / h,
            self.bounds.right() / w,
            self.bounds.bottom() / h,
        )
    }
}

/// An off-screen surface that can be drawn into and then sampled
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderTarget {
    pub id: TargetId,
    pub texture: Texture,
}

impl RenderTarget {
    pub fn new(id: TargetId, texture: TextureId, width: u32, height: u32) -> Self {
        Self {
            id,
            texture: Texture::new(texture, width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.texture.source_width
    }

    pub fn height(&self) -> u32 {
        self.texture.source_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtexture_of_full_texture() {
        let texture = Texture::new(TextureId(0), 64, 32);
        let sub = texture.subtexture(Rect::new(16.0, 8.0, 16.0, 16.0));

        assert_eq!(sub.bounds, Rect::new(16.0, 8.0, 16.0, 16.0));
        assert_eq!(sub.frame, Rect::new(0.0, 0.0, 16.0, 16.0));
        assert_eq!(sub.uv(), (0.25, 0.25, 0.5, 0.75));
    }

    #[test]
    fn subtexture_keeps_trim_offset() {
        let mut texture = Texture::new(TextureId(0), 64, 64);
        texture.bounds = Rect::new(10.0, 10.0, 20.0, 20.0);
        texture.frame = Rect::new(-2.0, -4.0, 24.0, 28.0);

        let sub = texture.subtexture(Rect::new(0.0, 0.0, 12.0, 12.0));

        assert_eq!(sub.bounds, Rect::new(10.0, 10.0, 10.0, 8.0));
        assert_eq!(sub.frame, Rect::new(-2.0, -4.0, 12.0, 12.0));
    }

    #[test]
    fn subtexture_outside_bounds_is_empty() {
        let texture = Texture::new(TextureId(0), 16, 16);
        let sub = texture.subtexture(Rect::new(32.0, 0.0, 8.0, 8.0));

        assert_eq!(sub.bounds.width, 0.0);
        assert_eq!(sub.width(), 8.0);
    }
}
