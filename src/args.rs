use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "suntrace", about = "Offline Monte-Carlo path tracer", version)]
pub struct Args {
    /// Scene description file
    #[arg(long, default_value = "objects.xml")]
    pub scene: PathBuf,

    /// Output image; a .png extension selects PNG, anything else PPM
    #[arg(long, default_value = "image.png")]
    pub out: PathBuf,

    /// Worker thread count; 0 selects hardware concurrency
    #[arg(long, default_value_t = 0)]
    pub threads: usize,

    /// Tile edge in pixels, clamped to [1, image width]
    #[arg(long = "tile-size", default_value_t = 64)]
    pub tile_size: usize,

    /// Print per-tile timing diagnostics after the render
    #[arg(long = "tile-debug")]
    pub tile_debug: bool,

    /// Override the image width; height is recomputed from the aspect ratio
    #[arg(long)]
    pub width: Option<usize>,

    /// Override samples per pixel
    #[arg(long)]
    pub samples: Option<u32>,

    /// Deterministic per-tile seed; the same seed reproduces the same
    /// image for any thread count
    #[arg(long)]
    pub seed: Option<u64>,

    /// Only report errors
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Report debug detail
    #[arg(long)]
    pub verbose: bool,
}
