/// A rectangular slice of the output image, in render coordinates
/// (y counts up from the bottom of the image).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    pub id: usize,
    pub x0: usize,
    pub y0: usize,
    pub width: usize,
    pub height: usize,
}

/// Partitions a `width × height` image into row-major tiles of at most
/// `tile_size × tile_size` pixels. Tiles at the right and top edges are
/// clipped to the image. The tiles are disjoint and cover every pixel.
pub fn tile_grid(width: usize, height: usize, tile_size: usize) -> Vec<Tile> {
    let tile_size = tile_size.clamp(1, width.max(1));
    let mut tiles = vec![];
    let mut id = 0;
    for y0 in (0..height).step_by(tile_size) {
        for x0 in (0..width).step_by(tile_size) {
            tiles.push(Tile {
                id,
                x0,
                y0,
                width: usize::min(tile_size, width - x0),
                height: usize::min(tile_size, height - y0),
            });
            id += 1;
        }
    }
    tiles
}
