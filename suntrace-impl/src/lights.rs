use crate::types::{ Color, V3 };

/// Directional day light. `direction` points *toward* the sun and is
/// normalised on construction.
#[derive(Clone, Debug)]
pub struct Sun {
    pub direction: V3,
    pub color: Color,
}

impl Sun {
    pub fn new(direction: V3, color: Color) -> Sun {
        Sun { direction: direction.unit(), color }
    }

    /// The default for scenes without a `<sun>` element: a white sun
    /// leaves unoccluded light untinted.
    pub fn neutral() -> Sun {
        Sun { direction: V3::POS_Y, color: Color::ONE }
    }
}

/// Artificial light with inverse-square falloff.
#[derive(Clone, Debug)]
pub struct PointLight {
    pub position: V3,
    pub color: Color,
    pub intensity: f64,
    /// Reserved for a soft-shadow extension; unused by the integrator.
    pub radius: f64,
}

impl PointLight {
    pub fn new(position: V3, color: Color, intensity: f64, radius: f64) -> PointLight {
        PointLight { position, color, intensity, radius }
    }

    pub fn direction_from(&self, p: V3) -> V3 {
        (self.position - p).unit()
    }

    pub fn distance_from(&self, p: V3) -> f64 {
        (self.position - p).length()
    }
}
