use crate::types::V3;

use rand::{ Rng, RngCore };

pub fn deg_to_rad(deg: f64) -> f64 {
    deg * std::f64::consts::PI / 180.0
}

/// Uniform point inside the unit sphere, by rejection.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> V3 {
    loop {
        let p = V3(rng.gen::<f64>() * 2.0 - 1.0,
                   rng.gen::<f64>() * 2.0 - 1.0,
                   rng.gen::<f64>() * 2.0 - 1.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Uniform direction on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> V3 {
    random_in_unit_sphere(rng).unit()
}

/// Uniform point inside the unit disk on the XY plane.
/// Drives the thin-lens origin offset.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> V3 {
    loop {
        let p = V3(rng.gen::<f64>() * 2.0 - 1.0,
                   rng.gen::<f64>() * 2.0 - 1.0,
                   0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

#[cfg(test)]
mod sampling_tests {
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;
    use super::*;

    #[test]
    fn unit_sphere_samples_are_inside_the_sphere() {
        let mut rng = XorShiftRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(random_in_unit_sphere(&mut rng).length_squared() < 1.0);
        }
    }

    #[test]
    fn unit_vectors_have_unit_length() {
        let mut rng = XorShiftRng::seed_from_u64(7);
        for _ in 0..1000 {
            let len = random_unit_vector(&mut rng).length();
            assert!((len - 1.0).abs() < 1.0e-12);
        }
    }

    #[test]
    fn unit_disk_samples_are_planar() {
        let mut rng = XorShiftRng::seed_from_u64(7);
        for _ in 0..1000 {
            let p = random_in_unit_disk(&mut rng);
            assert_eq!(p.z(), 0.0);
            assert!(p.length_squared() < 1.0);
        }
    }
}
