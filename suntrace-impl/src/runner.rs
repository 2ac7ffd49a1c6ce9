use std::collections::hash_map::DefaultHasher;
use std::hash::{ Hash, Hasher };
use std::sync::Mutex;
use std::sync::atomic::{ AtomicBool, AtomicU64, AtomicUsize, Ordering };
use std::time::{ Duration, Instant };

use cancellation::CancellationToken;
use rand::{ Rng, SeedableRng };
use rand_xorshift::XorShiftRng;

use crate::integrator::trace;
use crate::tiles::{ tile_grid, Tile };
use crate::types::Color;
use crate::world::World;

/// How worker RNGs are seeded.
#[derive(Clone, Copy, Debug)]
pub enum SeedMode {
    /// Each worker seeds itself from its thread identity and the clock.
    /// Fast and uncorrelated, but two runs never produce the same noise.
    WallClock,
    /// Each tile's RNG is derived from the base seed and the tile index,
    /// making the output identical for any thread count or schedule.
    PerTile(u64),
}

#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    /// Worker count; 0 selects one worker per logical core.
    pub threads: usize,
    /// Tile edge in pixels; clamped to `[1, width]`.
    pub tile_size: usize,
    pub seed: SeedMode,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            threads: 0,
            tile_size: 64,
            seed: SeedMode::WallClock,
        }
    }
}

/// Timing record for one finished tile.
#[derive(Clone, Copy, Debug)]
pub struct TileStat {
    pub tile: Tile,
    pub duration: Duration,
}

/// Snapshot handed to the progress callback after each tile.
#[derive(Clone, Copy, Debug)]
pub struct TileProgress {
    pub tile: Tile,
    pub tiles_done: usize,
    pub total_tiles: usize,
    pub tile_duration: Duration,
    pub avg_tile: Duration,
    pub est_remaining: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    Completed,
    /// The cancel token was observed; pixels rendered so far are kept.
    Cancelled,
}

pub struct RenderResult {
    /// Unnormalised per-pixel sample sums, row-major, top row first.
    pub bitmap: Vec<Color>,
    pub outcome: RenderOutcome,
    pub total_duration: Duration,
    pub tile_stats: Vec<TileStat>,
}

/// Invoked after every completed tile while an internal lock is held, so
/// at most one invocation observes the bitmap at a time.
pub type TileCallback<'a> = dyn Fn(&[Color], &TileProgress) + Sync + 'a;

/// `max(1, min(requested, hardware_concurrency))`; 0 requests the full
/// hardware concurrency.
pub fn resolve_thread_count(requested: usize) -> usize {
    let hardware = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    if requested == 0 {
        hardware
    } else {
        usize::max(1, usize::min(requested, hardware))
    }
}

fn wall_clock_seed(worker_index: usize) -> u64 {
    let mut hasher = DefaultHasher::new();
    std::thread::current().id().hash(&mut hasher);
    worker_index.hash(&mut hasher);
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64)
        .unwrap_or(0);
    hasher.finish() ^ nanos
}

/// splitmix64 finalizer; spreads consecutive tile indices across the
/// whole seed space.
fn per_tile_seed(base: u64, tile_index: usize) -> u64 {
    let mut z = base.wrapping_add((tile_index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Renders the world into a fresh bitmap of sample sums.
///
/// The image is split into tiles which workers claim from a shared atomic
/// counter. Workers observe the cancel token between tiles and between
/// rows; on cancellation the current tile's remaining rows are abandoned
/// and every worker is joined before this function returns.
pub fn render(
    world: &mut World,
    options: &RenderOptions,
    on_tile: Option<&TileCallback>,
    cancel: Option<&CancellationToken>,
) -> RenderResult {
    world.prepare();

    let world = &*world;
    let width = world.config.width;
    let height = world.config.height;
    let samples = world.config.samples_per_pixel;
    let max_depth = world.config.max_depth;

    let tiles = tile_grid(width, height, options.tile_size);
    let total_tiles = tiles.len();
    let thread_count = resolve_thread_count(options.threads);
    let seed_mode = options.seed;

    log::debug!("Rendering {width}x{height} ({total_tiles} tiles) on {thread_count} threads");

    let bitmap = Mutex::new(vec![Color::ZERO; width * height]);
    let tile_stats = Mutex::new(Vec::with_capacity(total_tiles));
    let next_tile = AtomicUsize::new(0);
    let tiles_done = AtomicUsize::new(0);
    let total_tile_micros = AtomicU64::new(0);
    let cancelled = AtomicBool::new(false);

    let is_cancelled = || {
        if cancel.map_or(false, |token| token.is_canceled()) {
            cancelled.store(true, Ordering::Relaxed);
            true
        } else {
            false
        }
    };

    let start = Instant::now();

    std::thread::scope(|scope| {
        for worker_index in 0..thread_count {
            let tiles = &tiles;
            let bitmap = &bitmap;
            let tile_stats = &tile_stats;
            let next_tile = &next_tile;
            let tiles_done = &tiles_done;
            let total_tile_micros = &total_tile_micros;
            let is_cancelled = &is_cancelled;

            let worker = move || {
                let mut worker_rng = XorShiftRng::seed_from_u64(wall_clock_seed(worker_index));
                // Sample positions stay defined for single-pixel axes
                let u_denom = usize::max(width.saturating_sub(1), 1) as f64;
                let v_denom = usize::max(height.saturating_sub(1), 1) as f64;

                'tiles: loop {
                    if is_cancelled() {
                        break;
                    }
                    let tile_index = next_tile.fetch_add(1, Ordering::Relaxed);
                    if tile_index >= total_tiles {
                        break;
                    }
                    let tile = tiles[tile_index];

                    let mut tile_rng = match seed_mode {
                        SeedMode::PerTile(base) =>
                            Some(XorShiftRng::seed_from_u64(per_tile_seed(base, tile_index))),
                        SeedMode::WallClock => None,
                    };
                    let rng = tile_rng.as_mut().unwrap_or(&mut worker_rng);

                    let tile_start = Instant::now();
                    let mut row = vec![Color::ZERO; tile.width];

                    for y in tile.y0..tile.y0 + tile.height {
                        if is_cancelled() {
                            // Abandon the remaining rows of this tile
                            break 'tiles;
                        }
                        for x in tile.x0..tile.x0 + tile.width {
                            let mut pixel = Color::ZERO;
                            for _ in 0..samples {
                                let u = (x as f64 + rng.gen::<f64>()) / u_denom;
                                let v = (y as f64 + rng.gen::<f64>()) / v_denom;
                                let ray = world.camera.get_ray(u, v, rng);
                                pixel = pixel + trace(&ray, max_depth, world, rng);
                            }
                            row[x - tile.x0] = pixel;
                        }
                        // Rendering counts rows bottom-up; the bitmap is
                        // stored top row first
                        let row_start = (height - 1 - y) * width + tile.x0;
                        let mut shared = bitmap.lock().unwrap();
                        shared[row_start..row_start + tile.width].copy_from_slice(&row);
                    }

                    let tile_duration = tile_start.elapsed();
                    total_tile_micros.fetch_add(tile_duration.as_micros() as u64, Ordering::Relaxed);
                    let done = tiles_done.fetch_add(1, Ordering::Relaxed) + 1;

                    // The stats lock doubles as the progress-callback lock:
                    // at most one reader sees the bitmap at a time
                    let mut stats = tile_stats.lock().unwrap();
                    stats.push(TileStat { tile, duration: tile_duration });
                    if let Some(callback) = on_tile {
                        let avg_micros = total_tile_micros.load(Ordering::Relaxed) / done as u64;
                        let remaining = total_tiles - usize::min(done, total_tiles);
                        let progress = TileProgress {
                            tile,
                            tiles_done: done,
                            total_tiles,
                            tile_duration,
                            avg_tile: Duration::from_micros(avg_micros),
                            est_remaining: Duration::from_micros(avg_micros * remaining as u64),
                        };
                        let shared = bitmap.lock().unwrap();
                        callback(&shared, &progress);
                    }
                }
            };

            std::thread::Builder::new()
                .name(format!("render-thread-{worker_index}"))
                .spawn_scoped(scope, worker)
                .expect("failed to spawn render thread");
        }
    });

    let total_duration = start.elapsed();
    let outcome = if cancelled.load(Ordering::Relaxed) {
        RenderOutcome::Cancelled
    } else {
        RenderOutcome::Completed
    };

    RenderResult {
        bitmap: bitmap.into_inner().unwrap(),
        outcome,
        total_duration,
        tile_stats: tile_stats.into_inner().unwrap(),
    }
}
