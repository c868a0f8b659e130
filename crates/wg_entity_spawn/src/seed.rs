use wg_core::TileCoord;
use xxhash_rust::xxh64::xxh64;

/// Deterministic random draws keyed by a pair of seed coordinates.
///
/// Each draw is identified by a small integer offset; asking for the same
/// offset twice returns the same value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedRng {
    seed_x: i64,
    seed_y: i64,
    salt: u64,
}

impl SeedRng {
    pub const fn new(seed_x: i64, seed_y: i64) -> Self {
        Self::with_salt(seed_x, seed_y, 0)
    }

    /// Separate draw streams for different generators sharing coordinates.
    pub const fn with_salt(seed_x: i64, seed_y: i64, salt: u64) -> Self {
        Self {
            seed_x,
            seed_y,
            salt,
        }
    }

    /// Uniform value in `[0, 1)`.
    pub fn draw(&self, offset: u32) -> f64 {
        let mut bytes = [0u8; 20];
        bytes[..8].copy_from_slice(&self.seed_x.to_le_bytes());
        bytes[8..16].copy_from_slice(&self.seed_y.to_le_bytes());
        bytes[16..].copy_from_slice(&offset.to_le_bytes());
        let h = xxh64(&bytes, self.salt);
        // 53 high bits fill an f64 mantissa exactly.
        (h >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform value in `[min, max)`.
    pub fn range(&self, offset: u32, min: f64, max: f64) -> f64 {
        min + self.draw(offset) * (max - min)
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn index(&self, offset: u32, len: usize) -> usize {
        ((self.draw(offset) * len as f64) as usize).min(len.saturating_sub(1))
    }

    pub fn pick<'a, T>(&self, offset: u32, items: &'a [T]) -> &'a T {
        &items[self.index(offset, items.len())]
    }
}

/// 64-bit seed for per-tile generators, mixing in the world seed.
pub fn tile_seed(world_seed: u32, tile: TileCoord) -> u64 {
    let mut bytes = [0u8; 16];
    bytes[..8].copy_from_slice(&tile.x.to_le_bytes());
    bytes[8..].copy_from_slice(&tile.y.to_le_bytes());
    xxh64(&bytes, u64::from(world_seed))
}
