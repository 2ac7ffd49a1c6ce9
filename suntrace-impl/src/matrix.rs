use std::ops::Mul;

use crate::types::V3;

/// Row-vector affine transform. Points are multiplied on the left:
/// `p * matrix` applies the leftmost factor of the matrix product first.
#[derive(Copy, Clone)]
pub struct Matrix([[f64; 4]; 4]);

impl Default for Matrix {
    fn default() -> Self {
        // Identity matrix
        Matrix([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }
}

impl Matrix {

    pub fn translate(x: f64, y: f64, z: f64) -> Matrix {
        Matrix([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [x, y, z, 1.0],
        ])
    }

    pub fn scale(x: f64, y: f64, z: f64) -> Matrix {
        Matrix([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotate_x(theta_rads: f64) -> Matrix {
        let sin = theta_rads.sin();
        let cos = theta_rads.cos();
        Matrix([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, cos, sin, 0.0],
            [0.0, -sin, cos, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotate_y(theta_rads: f64) -> Matrix {
        let sin = theta_rads.sin();
        let cos = theta_rads.cos();
        Matrix([
            [cos, 0.0, -sin, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [sin, 0.0, cos, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotate_z(theta_rads: f64) -> Matrix {
        let sin = theta_rads.sin();
        let cos = theta_rads.cos();
        Matrix([
            [cos, -sin, 0.0, 0.0],
            [sin, cos, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn multiply(Matrix(m1): &Matrix, Matrix(m2): &Matrix) -> Matrix {
        let mut result = [[0.0; 4]; 4];
        for i in 0..4 {
            for j in 0..4 {
                for k in 0..4 {
                    result[i][j] += m1[i][k] * m2[k][j];
                }
            }
        }
        Matrix(result)
    }

    /// The mesh model transform: scale, then rotate about Z, Y and
    /// finally X, then translate.
    pub fn model(position: V3, scale: V3, rotation: V3) -> Matrix {
        MatrixBuilder::new()
            .scale(scale.0, scale.1, scale.2)
            .rotate_z(rotation.2)
            .rotate_y(rotation.1)
            .rotate_x(rotation.0)
            .translate(position.0, position.1, position.2)
            .done()
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        Matrix::multiply(&self, &rhs)
    }
}

// V3 * Matrix
impl Mul<Matrix> for V3 {
    type Output = V3;

    fn mul(self, Matrix(m): Matrix) -> Self::Output {
        V3(
            m[0][0]*self.0 + m[1][0]*self.1 + m[2][0]*self.2 + m[3][0],
            m[0][1]*self.0 + m[1][1]*self.1 + m[2][1]*self.2 + m[3][1],
            m[0][2]*self.0 + m[1][2]*self.1 + m[2][2]*self.2 + m[3][2],
        )
    }
}

// Transformation composition

pub struct MatrixBuilder {
    matrix: Matrix,
}

impl MatrixBuilder {
    pub fn new() -> Self {
        Self { matrix: Matrix::default() }
    }

    pub fn translate(mut self, x: f64, y: f64, z: f64) -> Self {
        self.matrix = self.matrix * Matrix::translate(x, y, z);
        self
    }

    pub fn scale(mut self, x: f64, y: f64, z: f64) -> Self {
        self.matrix = self.matrix * Matrix::scale(x, y, z);
        self
    }

    pub fn rotate_x(mut self, theta_rads: f64) -> Self {
        self.matrix = self.matrix * Matrix::rotate_x(theta_rads);
        self
    }

    pub fn rotate_y(mut self, theta_rads: f64) -> Self {
        self.matrix = self.matrix * Matrix::rotate_y(theta_rads);
        self
    }

    pub fn rotate_z(mut self, theta_rads: f64) -> Self {
        self.matrix = self.matrix * Matrix::rotate_z(theta_rads);
        self
    }

    /// Return the completed transformation matrix
    pub fn done(self) -> Matrix {
        self.matrix
    }
}
