use glam::{Mat3, Vec2};
use std::ops::Mul;

/// A 2D affine transform stored as a column-major 3x3 matrix
///
/// The builder methods post-multiply, so a camera matrix is composed as
/// `identity -> translate(origin) -> rotate -> scale -> translate(-position)`
/// and reads in the same order it is applied to a point, right to left.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix(Mat3);

impl Default for Matrix {
    fn default() -> Self {
        Matrix::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Self = Matrix(Mat3::IDENTITY);
    pub const ZERO: Self = Matrix(Mat3::ZERO);

    pub fn from_cols_array(data: &[f32; 9]) -> Self {
        Matrix(Mat3::from_cols_array(data))
    }

    /// Maps pixel coordinates of a `width` x `height` surface, origin on the
    /// top-left and y pointing down, into clip space.
    pub fn orthographic(width: f32, height: f32) -> Self {
        Matrix::from_cols_array(&[
            2.0 / width,
            0.0,
            0.0,
            0.0,
            -2.0 / height,
            0.0,
            -1.0,
            1.0,
            1.0,
        ])
    }

    pub fn identity(&mut self) -> &mut Self {
        self.0 = Mat3::IDENTITY;
        self
    }

    pub fn translate(&mut self, x: f32, y: f32) -> &mut Self {
        self.0 = self.0 * Mat3::from_translation(Vec2::new(x, y));
        self
    }

    /// Rotates by `radians`, counter-clockwise in a y-up frame.
    pub fn rotate(&mut self, radians: f32) -> &mut Self {
        self.0 = self.0 * Mat3::from_angle(radians);
        self
    }

    pub fn scale(&mut self, x: f32, y: f32) -> &mut Self {
        self.0 = self.0 * Mat3::from_scale(Vec2::new(x, y));
        self
    }

    pub fn multiply(&mut self, other: &Matrix) -> &mut Self {
        self.0 = self.0 * other.0;
        self
    }

    pub fn determinant(&self) -> f32 {
        self.0.determinant()
    }

    /// Inverts the matrix in place.
    ///
    /// A singular matrix is left untouched: no error is raised and no NaN
    /// leaks into the data, callers that need to know must check
    /// [`Matrix::determinant`] themselves.
    pub fn invert(&mut self) -> &mut Self {
        if self.determinant() != 0.0 {
            self.0 = self.0.inverse();
        }
        self
    }

    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        self.0.transform_point2(point)
    }

    pub fn to_cols_array(&self) -> [f32; 9] {
        self.0.to_cols_array()
    }

    pub fn as_mat3(&self) -> &Mat3 {
        &self.0
    }
}

impl From<Mat3> for Matrix {
    fn from(mat: Mat3) -> Self {
        Matrix(mat)
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Matrix) -> Self::Output {
        Matrix(self.0 * rhs.0)
    }
}
