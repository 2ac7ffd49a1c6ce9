mod args;
mod format;
mod logger;
mod output;

use std::process::ExitCode;

use clap::Parser;

use suntrace_impl::postprocess::{ to_rgb8, ToneMapping };
use suntrace_impl::runner::{ render, resolve_thread_count, RenderOptions, RenderOutcome, SeedMode, TileProgress };
use suntrace_impl::types::Color;

use crate::args::Args;
use crate::format::FormattedDuration;

const EXIT_SCENE_MISSING: u8 = 2;
const EXIT_SCENE_INVALID: u8 = 3;

fn main() -> ExitCode {
    let args = Args::parse();
    logger::init(args.quiet, args.verbose).expect("logger installed twice");

    if !args.scene.is_file() {
        log::error!(
            "Could not find scene file: {}\nProvide --scene <path> or place objects.xml in the working directory.",
            args.scene.display());
        return ExitCode::from(EXIT_SCENE_MISSING);
    }

    let mut world = match suntrace_scene::load_scene(&args.scene) {
        Ok(world) => world,
        Err(err) => {
            log::error!("Failed to load scene file {}: {err}", args.scene.display());
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                log::error!("  caused by: {cause}");
                source = cause.source();
            }
            return ExitCode::from(EXIT_SCENE_INVALID);
        }
    };

    // CLI overrides
    if let Some(width) = args.width {
        world.config.width = width;
        world.config.height = usize::max(1, (width as f64 / world.config.aspect_ratio) as usize);
    }
    if let Some(samples) = args.samples {
        world.config.samples_per_pixel = samples;
    }

    let threads = resolve_thread_count(args.threads);
    log::info!("Scene: {}", args.scene.display());
    log::info!("Output: {}", args.out.display());
    log::info!("Threads: {threads}");
    log::info!("Image size: {}x{}", world.config.width, world.config.height);
    log::info!("Samples: {}", world.config.samples_per_pixel);

    let options = RenderOptions {
        threads: args.threads,
        tile_size: args.tile_size,
        seed: match args.seed {
            Some(seed) => SeedMode::PerTile(seed),
            None => SeedMode::WallClock,
        },
    };

    let quiet = args.quiet;
    let progress = move |_bitmap: &[Color], progress: &TileProgress| {
        if !quiet {
            let remaining = progress.total_tiles - progress.tiles_done;
            eprint!("\rTiles remaining: {remaining} | ETA: {}   ",
                FormattedDuration(progress.est_remaining));
        }
    };

    let result = render(&mut world, &options, Some(&progress), None);

    if !quiet {
        eprint!("\r{:60}\r", "");
    }
    match result.outcome {
        RenderOutcome::Completed =>
            log::info!("Render time: {}", FormattedDuration(result.total_duration)),
        RenderOutcome::Cancelled =>
            log::info!("Render cancelled after {}", FormattedDuration(result.total_duration)),
    }

    if (args.verbose || args.tile_debug) && !result.tile_stats.is_empty() {
        let durations = result.tile_stats.iter().map(|s| s.duration).collect::<Vec<_>>();
        let sum: std::time::Duration = durations.iter().sum();
        let min = durations.iter().min().expect("nonempty");
        let max = durations.iter().max().expect("nonempty");
        log::info!(
            "Tile stats: count={}, avg={:.3}ms, min={:.3}ms, max={:.3}ms",
            durations.len(),
            sum.as_secs_f64() * 1000.0 / durations.len() as f64,
            min.as_secs_f64() * 1000.0,
            max.as_secs_f64() * 1000.0);
        if args.tile_debug {
            for stat in result.tile_stats.iter() {
                log::info!(
                    "  tile({},{}) {}x{}: {:.3}ms",
                    stat.tile.x0, stat.tile.y0, stat.tile.width, stat.tile.height,
                    stat.duration.as_secs_f64() * 1000.0);
            }
        }
    }

    let rgb = to_rgb8(&result.bitmap, world.config.samples_per_pixel, ToneMapping::default());
    if let Err(err) = output::save_image(&args.out, world.config.width, world.config.height, &rgb) {
        log::error!("Failed to write {}: {err}", args.out.display());
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
