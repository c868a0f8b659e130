use bevy::prelude::*;
use wg_core::{TerrainSample, TileCoord};

use crate::field::{NoiseField, SeededNoise};

/// Frequency of the elevation and moisture fields, per tile.
const BIOME_SCALE: f64 = 0.012;
const RIVER_SCALE: f64 = 0.008;
const DETAIL_SCALE: f64 = 0.05;
const TEXTURE_SCALE: f64 = 0.15;
const WARP_SCALE: f64 = 0.02;
/// Maximum domain-warp displacement, in tiles.
const WARP_STRENGTH: f64 = 15.0;
/// Offset between the two warp samples so x and y warps are uncorrelated.
const WARP_Y_OFFSET: f64 = 1000.0;

/// Purpose of a noise field. Each channel offsets the world seed by its own
/// constant so channels built from one seed are uncorrelated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoiseChannel {
    Elevation,
    Moisture,
    River,
    Detail,
    Warp,
    Texture,
}

impl NoiseChannel {
    pub fn all() -> &'static [NoiseChannel] {
        &[
            Self::Elevation,
            Self::Moisture,
            Self::River,
            Self::Detail,
            Self::Warp,
            Self::Texture,
        ]
    }

    pub fn seed_offset(&self) -> u32 {
        match self {
            Self::Elevation => 0,
            Self::Moisture => 123,
            Self::River => 456,
            Self::Texture => 555,
            Self::Detail => 789,
            Self::Warp => 999,
        }
    }

    pub fn seed_for(&self, world_seed: u32) -> u32 {
        world_seed.wrapping_add(self.seed_offset())
    }
}

/// Every noise sample taken for one tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileNoise {
    pub terrain: TerrainSample,
    /// Low-amplitude variation used to shade the tile.
    pub texture: f64,
}

/// The full set of noise channels for a world seed.
#[derive(Resource, Clone, Debug)]
pub struct WorldNoise {
    seed: u32,
    elevation: SeededNoise,
    moisture: SeededNoise,
    river: SeededNoise,
    detail: SeededNoise,
    warp: SeededNoise,
    texture: SeededNoise,
}

impl WorldNoise {
    pub fn new(seed: u32) -> Self {
        let field = |channel: NoiseChannel| SeededNoise::new(channel.seed_for(seed));
        Self {
            seed,
            elevation: field(NoiseChannel::Elevation),
            moisture: field(NoiseChannel::Moisture),
            river: field(NoiseChannel::River),
            detail: field(NoiseChannel::Detail),
            warp: field(NoiseChannel::Warp),
            texture: field(NoiseChannel::Texture),
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn channel(&self, channel: NoiseChannel) -> &SeededNoise {
        match channel {
            NoiseChannel::Elevation => &self.elevation,
            NoiseChannel::Moisture => &self.moisture,
            NoiseChannel::River => &self.river,
            NoiseChannel::Detail => &self.detail,
            NoiseChannel::Warp => &self.warp,
            NoiseChannel::Texture => &self.texture,
        }
    }

    /// Domain-warp displacement at a global tile position, in tiles.
    pub fn warp_offset(&self, gx: f64, gy: f64) -> (f64, f64) {
        let wx = self.warp.sample(gx * WARP_SCALE, gy * WARP_SCALE) * WARP_STRENGTH;
        let wy = self.warp.sample(
            (gx + WARP_Y_OFFSET) * WARP_SCALE,
            (gy + WARP_Y_OFFSET) * WARP_SCALE,
        ) * WARP_STRENGTH;
        (wx, wy)
    }

    /// Sample every channel for a tile.
    ///
    /// Elevation and moisture are read at warped coordinates; moisture uses the
    /// warp rotated a quarter turn so the two fields bend differently.
    pub fn sample_tile(&self, tile: TileCoord) -> TileNoise {
        let gx = tile.x as f64;
        let gy = tile.y as f64;
        let (wx, wy) = self.warp_offset(gx, gy);

        let elevation = self
            .elevation
            .sample((gx + wx) * BIOME_SCALE, (gy + wy) * BIOME_SCALE);
        let moisture = self
            .moisture
            .sample((gx - wy) * BIOME_SCALE, (gy + wx) * BIOME_SCALE);
        let river = self.river.sample(gx * RIVER_SCALE, gy * RIVER_SCALE);
        let detail = self.detail.sample(gx * DETAIL_SCALE, gy * DETAIL_SCALE);
        let texture = self.texture.sample(gx * TEXTURE_SCALE, gy * TEXTURE_SCALE);

        TileNoise {
            terrain: TerrainSample {
                elevation,
                moisture,
                river,
                detail,
            },
            texture,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_offsets_are_unique() {
        let offsets: Vec<_> = NoiseChannel::all().iter().map(|c| c.seed_offset()).collect();
        let unique: std::collections::HashSet<_> = offsets.iter().collect();
        assert_eq!(offsets.len(), unique.len());
    }

    #[test]
    fn seed_offset_wraps() {
        assert_eq!(NoiseChannel::Warp.seed_for(u32::MAX), 998);
    }

    #[test]
    fn sample_tile_is_deterministic() {
        let a = WorldNoise::new(12345);
        let b = WorldNoise::new(12345);
        for i in -20..20 {
            let tile = TileCoord::new(i * 7, 3 - i * 11);
            assert_eq!(a.sample_tile(tile), b.sample_tile(tile));
        }
    }

    #[test]
    fn channels_are_uncorrelated() {
        let noise = WorldNoise::new(12345);
        let elevation = noise.channel(NoiseChannel::Elevation);
        let moisture = noise.channel(NoiseChannel::Moisture);
        let same = (0..100)
            .filter(|i| {
                let x = *i as f64 * 0.29 + 0.11;
                elevation.sample(x, 0.5) == moisture.sample(x, 0.5)
            })
            .count();
        assert!(same < 5);
    }

    #[test]
    fn warp_is_bounded() {
        let noise = WorldNoise::new(3);
        for i in 0..200 {
            let (wx, wy) = noise.warp_offset(i as f64 * 13.0, i as f64 * -7.0);
            assert!(wx.abs() <= WARP_STRENGTH && wy.abs() <= WARP_STRENGTH);
        }
    }
}
