use glam::Vec2;
use tessera_math::{Matrix, Rect};

/// 2D view into a scene
///
/// `width` and `height` are the size of the surface the camera renders to,
/// usually the off-screen buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec2,
    pub origin: Vec2,
    pub scale: Vec2,
    pub rotation: f32,
    pub width: f32,
    pub height: f32,
}

impl Camera {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            origin: Vec2::ZERO,
            scale: Vec2::ONE,
            rotation: 0.0,
            width,
            height,
        }
    }

    /// World to screen transform
    pub fn matrix(&self) -> Matrix {
        let mut matrix = Matrix::IDENTITY;
        matrix
            .translate(self.origin.x, self.origin.y)
            .rotate(self.rotation)
            .scale(self.scale.x, self.scale.y)
            .translate(-self.position.x, -self.position.y);
        matrix
    }

    pub fn inverse_matrix(&self) -> Matrix {
        let mut matrix = self.matrix();
        matrix.invert();
        matrix
    }

    pub fn screen_to_camera(&self, point: Vec2) -> Vec2 {
        self.inverse_matrix().transform_point(point)
    }

    pub fn camera_to_screen(&self, point: Vec2) -> Vec2 {
        self.matrix().transform_point(point)
    }

    /// Axis aligned world rectangle covering everything the camera sees
    pub fn extents(&self) -> Rect {
        let inverse = self.inverse_matrix();
        let corners = [
            Vec2::ZERO,
            Vec2::new(self.width, 0.0),
            Vec2::new(self.width, self.height),
            Vec2::new(0.0, self.height),
        ]
        .map(|corner| inverse.transform_point(corner));

        let min = corners.iter().fold(Vec2::splat(f32::MAX), |acc, c| acc.min(*c));
        let max = corners.iter().fold(Vec2::splat(f32::MIN), |acc, c| acc.max(*c));

        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn extents_follow_position() {
        let mut camera = Camera::new(320.0, 180.0);
        camera.position = Vec2::new(100.0, 50.0);

        assert_eq!(camera.extents(), Rect::new(100.0, 50.0, 320.0, 180.0));
    }

    #[test]
    fn extents_grow_when_zoomed_out() {
        let mut camera = Camera::new(320.0, 180.0);
        camera.scale = Vec2::splat(0.5);

        let extents = camera.extents();
        assert_relative_eq!(extents.width, 640.0);
        assert_relative_eq!(extents.height, 360.0);
    }

    #[test]
    fn screen_and_camera_space_round_trip() {
        let mut camera = Camera::new(320.0, 180.0);
        camera.position = Vec2::new(40.0, -20.0);
        camera.origin = Vec2::new(160.0, 90.0);
        camera.rotation = 0.3;
        camera.scale = Vec2::new(2.0, 2.0);

        let world = camera.screen_to_camera(Vec2::new(10.0, 20.0));
        let screen = camera.camera_to_screen(world);

        assert_relative_eq!(screen.x, 10.0, epsilon = 1e-3);
        assert_relative_eq!(screen.y, 20.0, epsilon = 1e-3);
    }
}
