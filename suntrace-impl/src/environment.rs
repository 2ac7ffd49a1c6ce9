use crate::types::{ Color, V3 };

/// The procedural sky for rays that escape the scene: a vertical blend
/// from white at the horizon to light blue overhead.
pub fn sky_gradient(unit_direction: V3) -> Color {
    let t = 0.5 * (unit_direction.y() + 1.0);
    let white = V3(1.0, 1.0, 1.0);
    let sky_blue = V3(0.5, 0.7, 1.0);
    white * (1.0 - t) + (sky_blue * t)
}

/// Equirectangular environment map in linear RGB.
pub struct EnvironmentMap {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
    pub intensity: f64,
    /// Rotation about the Y axis, radians.
    pub rotation: f64,
}

impl EnvironmentMap {
    /// The pixel buffer is row-major, top row first, and must already be
    /// decoded to linear RGB.
    pub fn new(width: usize, height: usize, pixels: Vec<Color>) -> EnvironmentMap {
        assert_eq!(width * height, pixels.len(), "environment buffer size mismatch");
        EnvironmentMap { width, height, pixels, intensity: 1.0, rotation: 0.0 }
    }

    pub fn with_intensity(mut self, intensity: f64) -> EnvironmentMap {
        self.intensity = intensity;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> EnvironmentMap {
        self.rotation = rotation;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Samples the map in the given unit direction using the
    /// latitude/longitude mapping.
    pub fn sample(&self, direction: V3) -> Color {
        let dir = if self.rotation != 0.0 {
            let cos_r = self.rotation.cos();
            let sin_r = self.rotation.sin();
            V3(direction.x() * cos_r - direction.z() * sin_r,
               direction.y(),
               direction.x() * sin_r + direction.z() * cos_r)
        } else {
            direction
        };

        let theta = dir.y().clamp(-1.0, 1.0).acos();        // 0..π
        let phi = dir.z().atan2(dir.x());                   // -π..π

        let u = (phi + std::f64::consts::PI) / (2.0 * std::f64::consts::PI);
        let v = theta / std::f64::consts::PI;

        let i = ((u * self.width as f64) as isize).rem_euclid(self.width as isize) as usize;
        let j = ((v * self.height as f64) as isize).rem_euclid(self.height as isize) as usize;

        self.pixels[j * self.width + i] * self.intensity
    }
}

#[cfg(test)]
mod environment_tests {
    use crate::types::{ Color, V3 };
    use super::{ sky_gradient, EnvironmentMap };

    #[test]
    fn sky_gradient_blends_with_height() {
        assert_eq!(sky_gradient(V3(0.0, 1.0, 0.0)), V3(0.5, 0.7, 1.0));
        assert_eq!(sky_gradient(V3(0.0, -1.0, 0.0)), V3(1.0, 1.0, 1.0));
        let horizon = sky_gradient(V3(1.0, 0.0, 0.0));
        assert_eq!(horizon, V3(0.75, 0.85, 1.0));
    }

    // 2x2 map: left column red, right column green on top, blue/white below
    fn test_map() -> EnvironmentMap {
        EnvironmentMap::new(2, 2, vec![
            V3(1.0, 0.0, 0.0), V3(0.0, 1.0, 0.0),
            V3(0.0, 0.0, 1.0), V3(1.0, 1.0, 1.0),
        ])
    }

    #[test]
    fn up_maps_to_the_top_row() {
        // θ = 0 at the zenith
        let c = test_map().sample(V3(0.0, 1.0, 0.0));
        assert!(c == V3(1.0, 0.0, 0.0) || c == V3(0.0, 1.0, 0.0));
    }

    #[test]
    fn below_the_horizon_maps_to_the_bottom_row() {
        let c = test_map().sample(V3(1.0, -0.9, 0.0).unit());
        assert_eq!(c, V3(1.0, 1.0, 1.0));
    }

    #[test]
    fn texel_indices_wrap() {
        // v = 1 exactly lands on the (wrapped) top row, as ⌊v·H⌋ mod H
        let c = test_map().sample(V3(0.0, -1.0, 0.0));
        assert!(c == V3(1.0, 0.0, 0.0) || c == V3(0.0, 1.0, 0.0));
    }

    #[test]
    fn azimuth_selects_the_column() {
        // φ = atan2(z, x): -X maps to |φ| = π, u = 0 or 1 → column 0
        let c = test_map().sample(V3(-1.0, 0.9, 0.0).unit());
        assert_eq!(c, V3(1.0, 0.0, 0.0));
        // +X maps to φ = 0, u = 0.5 → column 1
        let c = test_map().sample(V3(1.0, 0.9, 0.0).unit());
        assert_eq!(c, V3(0.0, 1.0, 0.0));
    }

    #[test]
    fn intensity_scales_the_texel() {
        let map = test_map().with_intensity(2.0);
        let c = map.sample(V3(1.0, 0.9, 0.0).unit());
        assert_eq!(c, V3(0.0, 2.0, 0.0));
    }

    #[test]
    fn rotation_shifts_the_azimuth() {
        // Half a turn swaps the +X and -X columns
        let map = test_map().with_rotation(std::f64::consts::PI);
        let c = map.sample(V3(1.0, 0.9, 0.0).unit());
        assert_eq!(c, V3(1.0, 0.0, 0.0));
    }
}
