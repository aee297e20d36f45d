use glam::Vec2;

use crate::Matrix;

/// Helpers glam does not provide for 2D vectors.
///
/// Everything is by value, intermediate results never alias each other.
pub trait VectorExt {
    /// Angle of the vector in radians, measured from the positive x axis.
    fn angle(self) -> f32;

    fn rotated(self, radians: f32) -> Vec2;

    fn transformed(self, matrix: &Matrix) -> Vec2;

    /// Shortens the vector to `max` if it is longer, keeping its direction.
    fn clamped_length(self, max: f32) -> Vec2;
}

impl VectorExt for Vec2 {
    fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    fn rotated(self, radians: f32) -> Vec2 {
        let (sin, cos) = radians.sin_cos();
        Vec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    fn transformed(self, matrix: &Matrix) -> Vec2 {
        matrix.transform_point(self)
    }

    fn clamped_length(self, max: f32) -> Vec2 {
        let length = self.length();
        if length > max && length > 0.0 {
            self * (max / length)
        } else {
            self
        }
    }
}

/// Moves `value` toward `target` by at most `step` without overshooting.
pub fn approach(value: f32, target: f32, step: f32) -> f32 {
    if value < target {
        (value + step).min(target)
    } else {
        (value - step).max(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn rotate_quarter_turn() {
        let v = Vec2::new(1.0, 0.0).rotated(FRAC_PI_2);

        assert_relative_eq!(v.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(v.y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(v.angle(), FRAC_PI_2, epsilon = 1e-6);
    }

    #[test]
    fn clamp_length_keeps_direction() {
        let v = Vec2::new(30.0, 40.0).clamped_length(5.0);

        assert_relative_eq!(v.x, 3.0, epsilon = 1e-5);
        assert_relative_eq!(v.y, 4.0, epsilon = 1e-5);

        let short = Vec2::new(1.0, 1.0).clamped_length(5.0);
        assert_eq!(short, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn approach_never_overshoots() {
        assert_eq!(approach(3.0, 0.0, 5.0), 0.0);
        assert_eq!(approach(-3.0, 0.0, 1.0), -2.0);
        assert_eq!(approach(0.0, 0.0, 1.0), 0.0);
    }
}
