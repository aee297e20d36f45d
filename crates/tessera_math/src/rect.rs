use glam::Vec2;
use serde::Deserialize;

/// An axis aligned rectangle, `x`/`y` is the top-left corner
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn translated(&self, offset: Vec2) -> Rect {
        Rect::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Open interval test: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.right() > other.left()
            && self.bottom() > other.top()
            && self.left() < other.right()
            && self.top() < other.bottom()
    }

    /// Clips `rect` so it lies within `self`.
    ///
    /// Overflow on any side is clamped away and negative extents collapse to
    /// zero, so cropping an already cropped rectangle changes nothing.
    pub fn crop_rect(&self, rect: Rect) -> Rect {
        let mut r = rect;

        if r.x < self.x {
            r.width += r.x - self.x;
            r.x = self.x;
        }
        if r.y < self.y {
            r.height += r.y - self.y;
            r.y = self.y;
        }
        if r.x > self.right() {
            r.x = self.right();
            r.width = 0.0;
        }
        if r.y > self.bottom() {
            r.y = self.bottom();
            r.height = 0.0;
        }
        if r.right() > self.right() {
            r.width = self.right() - r.x;
        }
        if r.bottom() > self.bottom() {
            r.height = self.bottom() - r.y;
        }
        if r.width < 0.0 {
            r.width = 0.0;
        }
        if r.height < 0.0 {
            r.height = 0.0;
        }

        r
    }
}
