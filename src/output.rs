use std::io::Write;
use std::path::Path;

/// Writes tightly packed 8-bit RGB to disk. A `.png` extension selects
/// PNG; everything else is written as binary PPM.
pub fn save_image(path: &Path, width: usize, height: usize, rgb: &[u8]) -> std::io::Result<()> {
    let is_png = path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false);

    if is_png {
        image::save_buffer(path, rgb, width as u32, height as u32, image::ColorType::Rgb8)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        log::info!("Saved PNG to {}", path.display());
    } else {
        let mut file = std::fs::File::create(path)?;
        write!(file, "P6\n{width} {height}\n255\n")?;
        file.write_all(rgb)?;
        log::info!("Saved PPM to {}", path.display());
    }
    Ok(())
}
