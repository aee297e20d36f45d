use serde::Deserialize;

/// Describe an RGBA color, every channel is kept in `[0, 1]`
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "[f32; 4]")]
pub struct Color {
    r: f32,
    g: f32,
    b: f32,
    a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl From<[f32; 4]> for Color {
    fn from(rgba: [f32; 4]) -> Self {
        Color::new(rgba[0], rgba[1], rgba[2], rgba[3])
    }
}

impl Color {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Builds a color from 8 bit sRGB channels, converting them to linear space
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: Self::to_linear_rgb(r),
            g: Self::to_linear_rgb(g),
            b: Self::to_linear_rgb(b),
            a: a as f32 / 255.0,
        }
    }

    pub fn r(&self) -> f32 {
        self.r
    }

    pub fn g(&self) -> f32 {
        self.g
    }

    pub fn b(&self) -> f32 {
        self.b
    }

    pub fn a(&self) -> f32 {
        self.a
    }

    pub fn set_r(&mut self, r: f32) {
        self.r = r.clamp(0.0, 1.0);
    }

    pub fn set_g(&mut self, g: f32) {
        self.g = g.clamp(0.0, 1.0);
    }

    pub fn set_b(&mut self, b: f32) {
        self.b = b.clamp(0.0, 1.0);
    }

    pub fn set_a(&mut self, a: f32) {
        self.a = a.clamp(0.0, 1.0);
    }

    /// Returns a copy with the alpha scaled by `alpha`, rgb is left untouched
    pub fn mult(&self, alpha: f32) -> Color {
        Color::new(self.r, self.g, self.b, self.a * alpha)
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub const WHITE: Self = Self {
        r: 1.,
        g: 1.,
        b: 1.,
        a: 1.,
    };

    pub const BLACK: Self = Self {
        r: 0.,
        g: 0.,
        b: 0.,
        a: 1.,
    };

    pub const RED: Self = Self {
        r: 1.,
        g: 0.,
        b: 0.,
        a: 1.,
    };

    pub const GREEN: Self = Self {
        r: 0.,
        g: 1.,
        b: 0.,
        a: 1.,
    };

    pub const BLUE: Self = Self {
        r: 0.,
        g: 0.,
        b: 1.,
        a: 1.,
    };

    pub const TRANSPARENT: Self = Self {
        r: 0.,
        g: 0.,
        b: 0.,
        a: 0.,
    };

    fn to_linear_rgb(xu: u8) -> f32 {
        let x = xu as f32 / 255.0;
        if x > 0.04045 {
            ((x + 0.055) / 1.055).powf(2.4)
        } else {
            x / 12.92
        }
    }
}
