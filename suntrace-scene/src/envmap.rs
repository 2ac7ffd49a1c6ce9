use std::path::Path;

use suntrace_impl::environment::EnvironmentMap;
use suntrace_impl::types::V3;

/// Decodes an 8-bit sRGB image into a linear-RGB environment map,
/// using the `x ↦ (x/255)^2.2` approximation.
pub fn load_environment(path: &Path) -> Result<EnvironmentMap, image::ImageError> {
    let image = image::open(path)?.to_rgb8();
    let (width, height) = image.dimensions();

    let to_linear = |byte: u8| (byte as f64 / 255.0).powf(2.2);
    let pixels = image.pixels()
        .map(|p| V3(to_linear(p[0]), to_linear(p[1]), to_linear(p[2])))
        .collect();

    log::info!("Loaded environment: {} ({width}x{height})", path.display());
    Ok(EnvironmentMap::new(width as usize, height as usize, pixels))
}
