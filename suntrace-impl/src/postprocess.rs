use crate::types::Color;

/// Operator applied when resolving sample sums to display values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToneMapping {
    /// `√x`, a fixed γ=2 approximation. The reference pipeline.
    #[default]
    Gamma2,
    /// ACES filmic curve followed by γ=2.2 correction.
    AcesFilmic,
    /// Reinhard `x / (1 + x)` followed by γ=2.2 correction.
    Reinhard,
}

fn scrub_nan(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x }
}

// ACES approximation by Krzysztof Narkowicz
fn aces_channel(x: f64) -> f64 {
    const A: f64 = 2.51;
    const B: f64 = 0.03;
    const C: f64 = 2.43;
    const D: f64 = 0.59;
    const E: f64 = 0.14;
    let x = f64::max(0.0, x);
    ((x * (A * x + B)) / (x * (C * x + D) + E)).clamp(0.0, 1.0)
}

fn reinhard_channel(x: f64) -> f64 {
    let x = f64::max(0.0, x);
    x / (1.0 + x)
}

fn gamma_2_2(x: f64) -> f64 {
    x.powf(1.0 / 2.2)
}

fn resolve_channel(x: f64, scale: f64, tone_mapping: ToneMapping) -> u8 {
    let x = scrub_nan(x) * scale;
    let display = match tone_mapping {
        ToneMapping::Gamma2 => x.max(0.0).sqrt(),
        ToneMapping::AcesFilmic => gamma_2_2(aces_channel(x)),
        ToneMapping::Reinhard => gamma_2_2(reinhard_channel(x)),
    };
    (256.0 * display.clamp(0.0, 0.999)) as u8
}

/// Resolves one accumulated pixel to 8-bit RGB: NaN components become
/// zero, the sum is averaged over the sample count, tone-mapped, clamped
/// to `[0, 0.999]` and quantised.
pub fn resolve_pixel(pixel: Color, samples_per_pixel: u32, tone_mapping: ToneMapping) -> [u8; 3] {
    let scale = 1.0 / f64::max(samples_per_pixel as f64, 1.0);
    [
        resolve_channel(pixel.0, scale, tone_mapping),
        resolve_channel(pixel.1, scale, tone_mapping),
        resolve_channel(pixel.2, scale, tone_mapping),
    ]
}

/// Packs a whole bitmap of sample sums into tightly packed 8-bit RGB,
/// preserving the row order of the input.
pub fn to_rgb8(bitmap: &[Color], samples_per_pixel: u32, tone_mapping: ToneMapping) -> Vec<u8> {
    let mut out = Vec::with_capacity(bitmap.len() * 3);
    for &pixel in bitmap.iter() {
        out.extend_from_slice(&resolve_pixel(pixel, samples_per_pixel, tone_mapping));
    }
    out
}
