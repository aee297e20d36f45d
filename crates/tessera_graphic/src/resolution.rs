use glam::Vec2;
use serde::Deserialize;
use tessera_math::Rect;

/// How the off-screen buffer is placed on the visible surface
///
/// Only the final blit is affected, the scene is always rendered at the
/// buffer resolution.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum ResolutionStyle {
    /// Unscaled and centered
    None,
    /// Stretched to cover the surface exactly, ignoring aspect ratio
    Exact,
    /// Uniformly scaled to fit, letterboxed
    #[default]
    Contain,
    /// Like `Contain` with the scale floored to an integer, never below 1
    ContainInteger,
    /// Uniformly scaled to cover, overflow is cropped
    Fill,
    /// Like `Fill` with the scale ceiled to an integer
    FillInteger,
}

impl ResolutionStyle {
    /// Rectangle of the surface the buffer is drawn into
    pub fn fit(&self, buffer: Vec2, surface: Vec2) -> Rect {
        let contain = (surface.x / buffer.x).min(surface.y / buffer.y);
        let fill = (surface.x / buffer.x).max(surface.y / buffer.y);

        let size = match self {
            ResolutionStyle::Exact => return Rect::new(0.0, 0.0, surface.x, surface.y),
            ResolutionStyle::None => buffer,
            ResolutionStyle::Contain => buffer * contain,
            ResolutionStyle::ContainInteger => buffer * contain.floor().max(1.0),
            ResolutionStyle::Fill => buffer * fill,
            ResolutionStyle::FillInteger => buffer * fill.ceil(),
        };

        Rect::new(
            (surface.x - size.x) / 2.0,
            (surface.y - size.y) / 2.0,
            size.x,
            size.y,
        )
    }
}
