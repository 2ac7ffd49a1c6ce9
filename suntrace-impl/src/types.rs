use std::ops::{ Add, Sub, Mul, Div, Neg };

//
// Vec3
//

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct V3(pub f64, pub f64, pub f64); // x, y, z

/// Semantic alias: an RGB triple in linear space.
pub type Color = V3;

impl V3 {
    pub const POS_X: V3 = V3(1.0, 0.0, 0.0);
    pub const POS_Y: V3 = V3(0.0, 1.0, 0.0);
    pub const POS_Z: V3 = V3(0.0, 0.0, 1.0);
    pub const ZERO: V3  = V3(0.0, 0.0, 0.0);
    pub const ONE: V3   = V3(1.0, 1.0, 1.0);

    pub fn x(&self) -> f64 {
        self.0
    }

    pub fn y(&self) -> f64 {
        self.1
    }

    pub fn z(&self) -> f64 {
        self.2
    }

    pub fn xyz(&self) -> [f64; 3] {
        [self.0, self.1, self.2]
    }

    pub fn unit(self) -> V3 {
        let len = self.length();
        if len == 0.0 { self } else { self / len }
    }

    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn length_squared(self) -> f64 {
        (self.0 * self.0) + (self.1 * self.1) + (self.2 * self.2)
    }

    /// True when every component is vanishingly small.
    /// Used to reject degenerate scatter directions.
    pub fn near_zero(self) -> bool {
        const E: f64 = 1.0e-8;
        self.0.abs() < E && self.1.abs() < E && self.2.abs() < E
    }

    pub fn dot(a: V3, b: V3) -> f64 {
        a.0 * b.0 + a.1 * b.1 + a.2 * b.2
    }

    pub fn cross(a: V3, b: V3) -> V3 {
        V3( a.1 * b.2 - a.2 * b.1,
          -(a.0 * b.2 - a.2 * b.0),
            a.0 * b.1 - a.1 * b.0)
    }
}

impl Add for V3 {
    type Output = V3;
    fn add(self, other: V3) -> V3 {
        V3(self.0 + other.0,
           self.1 + other.1,
           self.2 + other.2)
    }
}

impl Add<f64> for V3 {
    type Output = V3;
    fn add(self, f: f64) -> V3 {
        V3(self.0 + f,
           self.1 + f,
           self.2 + f)
    }
}

impl Sub for V3 {
    type Output = V3;
    fn sub(self, other: V3) -> V3 {
        V3(self.0 - other.0,
           self.1 - other.1,
           self.2 - other.2)
    }
}

impl Sub<f64> for V3 {
    type Output = V3;
    fn sub(self, f: f64) -> V3 {
        V3(self.0 - f,
           self.1 - f,
           self.2 - f)
    }
}

impl Mul for V3 {
    type Output = V3;
    fn mul(self, other: V3) -> V3 {
        V3(self.0 * other.0,
           self.1 * other.1,
           self.2 * other.2)
    }
}

impl Mul<f64> for V3 {
    type Output = V3;
    fn mul(self, f: f64) -> V3 {
        V3(self.0 * f,
           self.1 * f,
           self.2 * f)
    }
}

impl Div<f64> for V3 {
    type Output = V3;
    fn div(self, f: f64) -> V3 {
        V3(self.0 / f,
           self.1 / f,
           self.2 / f)
    }
}

impl Neg for V3 {
    type Output = V3;
    fn neg(self) -> V3 {
        V3(-self.0,
           -self.1,
           -self.2)
    }
}

impl Default for V3 {
    fn default() -> V3 {
        V3::ZERO
    }
}

//
// Vec2
//

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct V2(pub f64, pub f64); // u, v

impl V2 {
    pub const ZERO: V2 = V2(0.0, 0.0);

    pub fn x(&self) -> f64 {
        self.0
    }

    pub fn y(&self) -> f64 {
        self.1
    }
}

impl Add for V2 {
    type Output = V2;
    fn add(self, other: V2) -> V2 {
        V2(self.0 + other.0,
           self.1 + other.1)
    }
}

impl Mul<f64> for V2 {
    type Output = V2;
    fn mul(self, f: f64) -> V2 {
        V2(self.0 * f,
           self.1 * f)
    }
}

impl Default for V2 {
    fn default() -> V2 {
        V2::ZERO
    }
}

//
// Ray
//

#[derive(Debug, Copy, Clone)]
pub struct Ray {
    pub origin: V3,
    pub direction: V3,
}

impl Ray {
    pub fn new(origin: V3, direction: V3) -> Ray {
        Ray { origin, direction }
    }

    pub fn point_at_parameter(&self, t: f64) -> V3 {
        self.origin + (self.direction * t)
    }
}

#[cfg(test)]
mod v3_tests {
    use super::V3;

    #[test]
    fn unit_of_zero_vector_is_zero() {
        assert_eq!(V3::ZERO.unit(), V3::ZERO);
    }

    #[test]
    fn cross_of_axes() {
        assert_eq!(V3::cross(V3::POS_X, V3::POS_Y), V3::POS_Z);
        assert_eq!(V3::cross(V3::POS_Y, V3::POS_Z), V3::POS_X);
    }

    #[test]
    fn dot_of_perpendicular_vectors_is_zero() {
        assert_eq!(V3::dot(V3::POS_X, V3::POS_Y), 0.0);
    }
}
