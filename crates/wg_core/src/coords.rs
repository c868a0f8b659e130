use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Side length of a tile in world units.
pub const TILE_SIZE: f64 = 100.0;

/// Number of tiles along each side of a chunk.
pub const CHUNK_SIZE: usize = 16;

/// Side length of a chunk in world units.
pub const CHUNK_WORLD_SIZE: f64 = CHUNK_SIZE as f64 * TILE_SIZE;

/// Grid position of a chunk in chunk-space coordinates.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug, Component, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// World-space position of the chunk's top-left corner.
    pub fn origin(&self) -> WorldPos {
        WorldPos::new(
            f64::from(self.x) * CHUNK_WORLD_SIZE,
            f64::from(self.y) * CHUNK_WORLD_SIZE,
        )
    }

    /// Global tile coordinate of a local tile inside this chunk.
    pub fn tile(&self, local: LocalTile) -> TileCoord {
        TileCoord::new(
            i64::from(self.x) * CHUNK_SIZE as i64 + local.x as i64,
            i64::from(self.y) * CHUNK_SIZE as i64 + local.y as i64,
        )
    }

    /// Local tile containing `pos`, clamped into this chunk.
    ///
    /// Points outside the chunk resolve to the nearest edge tile.
    pub fn local_tile_of(&self, pos: WorldPos) -> LocalTile {
        let origin = self.origin();
        let lx = ((pos.x - origin.x) / TILE_SIZE).floor();
        let ly = ((pos.y - origin.y) / TILE_SIZE).floor();
        LocalTile::clamped(lx as i64, ly as i64)
    }

    /// Chebyshev distance in chunks.
    pub fn chebyshev(&self, other: ChunkCoord) -> u32 {
        let dx = (i64::from(self.x) - i64::from(other.x)).unsigned_abs();
        let dy = (i64::from(self.y) - i64::from(other.y)).unsigned_abs();
        dx.max(dy).min(u64::from(u32::MAX)) as u32
    }

    /// The 3×3 block of chunks centred on this one, self first.
    pub fn with_neighbors(&self) -> [ChunkCoord; 9] {
        let mut out = [*self; 9];
        let mut i = 1;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                out[i] = ChunkCoord::new(self.x.saturating_add(dx), self.y.saturating_add(dy));
                i += 1;
            }
        }
        out
    }
}

/// Global tile position in tile-space coordinates.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug, Component, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i64,
    pub y: i64,
}

impl TileCoord {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Split into the owning chunk and the index inside it.
    pub fn to_chunk_local(&self) -> (ChunkCoord, LocalTile) {
        let size = CHUNK_SIZE as i64;
        let cx = self.x.div_euclid(size).clamp(i64::from(i32::MIN), i64::from(i32::MAX));
        let cy = self.y.div_euclid(size).clamp(i64::from(i32::MIN), i64::from(i32::MAX));
        (
            ChunkCoord::new(cx as i32, cy as i32),
            LocalTile::clamped(self.x.rem_euclid(size), self.y.rem_euclid(size)),
        )
    }

    /// World-space position of the tile's top-left corner.
    pub fn origin(&self) -> WorldPos {
        WorldPos::new(self.x as f64 * TILE_SIZE, self.y as f64 * TILE_SIZE)
    }
}

/// Tile index inside a chunk. Always within `0..CHUNK_SIZE` on both axes.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct LocalTile {
    pub x: usize,
    pub y: usize,
}

impl LocalTile {
    /// Build a local index, clamping each axis into the valid tile range.
    pub fn clamped(x: i64, y: i64) -> Self {
        let max = CHUNK_SIZE as i64 - 1;
        Self {
            x: x.clamp(0, max) as usize,
            y: y.clamp(0, max) as usize,
        }
    }

    /// Row-major index into a chunk's tile grid.
    pub const fn index(&self) -> usize {
        self.y * CHUNK_SIZE + self.x
    }
}

/// Continuous world-space position using f64 for precision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f64,
    pub y: f64,
}

impl WorldPos {
    pub const ORIGIN: WorldPos = WorldPos::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Chunk that owns this point.
    pub fn chunk(&self) -> ChunkCoord {
        // `as` saturates, so non-finite input lands on a deterministic chunk.
        ChunkCoord::new(
            (self.x / CHUNK_WORLD_SIZE).floor() as i32,
            (self.y / CHUNK_WORLD_SIZE).floor() as i32,
        )
    }

    /// Global tile that contains this point.
    pub fn tile(&self) -> TileCoord {
        TileCoord::new(
            (self.x / TILE_SIZE).floor() as i64,
            (self.y / TILE_SIZE).floor() as i64,
        )
    }

    pub fn distance(&self, other: WorldPos) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<Vec2> for WorldPos {
    fn from(v: Vec2) -> Self {
        Self::new(f64::from(v.x), f64::from(v.y))
    }
}

impl From<WorldPos> for Vec2 {
    fn from(p: WorldPos) -> Self {
        Vec2::new(p.x as f32, p.y as f32)
    }
}
