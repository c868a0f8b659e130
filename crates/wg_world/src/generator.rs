//! Chunk generation from noise fields and content generators.

use bevy::log::debug;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use wg_core::{ChunkCoord, LocalTile, TerrainKind, TileCoord};
use wg_entity_spawn::{
    tile_seed, DecorationGenerator, DecorationKind, GrassGenerator, RockGenerator, RockSize,
    TreeGenerator, TreeSpecies,
};
use wg_noise::WorldNoise;
use wg_tilemap::{Chunk, LocalPos, ObjectKind, Tile};

/// Amplitude of the per-tile threshold dither.
const DITHER: f64 = 0.15;
/// Chance that a rocky tile is drawn grey instead of its biome colour.
const ROCKY_COLOR_CHANCE: f64 = 0.3;
/// Maximum placement offset from the tile centre, in world units.
const LARGE_OBJECT_JITTER: f64 = 30.0;
const DECORATION_JITTER: f64 = 40.0;

/// Produces the contents of a chunk from its coordinate.
///
/// Implementations must be total and deterministic: the same coordinate
/// always yields the same chunk.
pub trait ChunkGenerator: Send + Sync {
    fn generate(&self, coord: ChunkCoord) -> Chunk;

    /// Returns the name of this generator for debugging.
    fn name(&self) -> &'static str {
        "ChunkGenerator"
    }
}

/// Per-purpose placement probabilities.
#[derive(Clone, Copy, Debug)]
struct PlacementTable;

impl PlacementTable {
    fn tree_chance(terrain: TerrainKind, rocky: bool) -> f64 {
        let base = match terrain {
            TerrainKind::Forest => 0.35,
            TerrainKind::Plains => 0.05,
            _ => 0.0,
        };
        if rocky {
            base * 0.2
        } else {
            base
        }
    }

    fn tree_species(terrain: TerrainKind, rng: &mut ChaCha8Rng) -> TreeSpecies {
        match terrain {
            TerrainKind::Forest if rng.gen_bool(0.6) => TreeSpecies::Pine,
            TerrainKind::Plains if rng.gen_bool(0.5) => TreeSpecies::Birch,
            _ => TreeSpecies::Oak,
        }
    }

    fn pebble_chance(terrain: TerrainKind, rocky: bool) -> f64 {
        match terrain {
            TerrainKind::Desert => 0.3,
            _ if rocky => 0.3,
            TerrainKind::ShallowWater => 0.2,
            _ => 0.05,
        }
    }

    const BOULDER_CHANCE: f64 = 0.08;
    const STONE_CHANCE: f64 = 0.01;
    const FLOWER_CHANCE: f64 = 0.15;
    const BUSH_CHANCE: f64 = 0.08;
    const WEED_CHANCE: f64 = 0.2;
    /// Trees only grow where the detail noise is above this.
    const TREE_DETAIL_MIN: f64 = 0.1;
}

/// Generator that synthesizes terrain from the world's noise channels.
pub struct NoiseChunkGenerator {
    seed: u32,
    noise: WorldNoise,
}

impl NoiseChunkGenerator {
    pub fn new(seed: u32) -> Self {
        Self::from_noise(WorldNoise::new(seed))
    }

    /// Generate from already-built noise channels, seeded as they were.
    pub fn from_noise(noise: WorldNoise) -> Self {
        Self {
            seed: noise.seed(),
            noise,
        }
    }

    /// Build a tile and return it with its detail sample for object placement.
    fn build_tile(&self, tile: TileCoord, rng: &mut ChaCha8Rng) -> (Tile, f64) {
        let samples = self.noise.sample_tile(tile);
        let dither = (rng.gen::<f64>() - 0.5) * DITHER;
        let class = TerrainKind::classify(samples.terrain, dither);

        let base_color = if class.rocky && rng.gen_bool(ROCKY_COLOR_CHANCE) {
            TerrainKind::ROCKY_RGB
        } else {
            class.terrain.rgb()
        };

        let moisture = (samples.terrain.moisture + 1.0) * 0.5;
        let soil_quality =
            ((samples.terrain.elevation + 1.0) * 0.5 + (samples.terrain.detail + 1.0) * 0.5) * 0.5;
        let grass = if class.terrain.is_grassland() {
            GrassGenerator::generate(soil_quality, moisture, samples.terrain.detail)
        } else {
            None
        };

        let tile = Tile {
            terrain: class.terrain,
            rocky: class.rocky,
            base_color,
            color_variation: samples.texture,
            moisture,
            soil_quality,
            grass,
        };
        (tile, samples.terrain.detail)
    }

    fn place_objects(
        &self,
        chunk: &mut Chunk,
        local: LocalTile,
        detail: f64,
        rng: &mut ChaCha8Rng,
    ) {
        let tile = chunk.tile(local);
        let (terrain, rocky) = (tile.terrain, tile.rocky);
        if !terrain.allows_objects() {
            return;
        }

        let global = chunk.coord.tile(local);
        let grassland = terrain.is_grassland();
        let roll = rng.gen::<f64>();

        if grassland
            && detail > PlacementTable::TREE_DETAIL_MIN
            && roll < PlacementTable::tree_chance(terrain, rocky)
        {
            let species = PlacementTable::tree_species(terrain, rng);
            let pos = jittered(local, LARGE_OBJECT_JITTER, rng);
            let tree = TreeGenerator::generate(species, global.x, global.y);
            chunk.add_object(pos, ObjectKind::Tree(tree));
        }

        let rock = if rocky && roll < PlacementTable::BOULDER_CHANCE {
            Some(RockSize::Boulder)
        } else if roll < PlacementTable::STONE_CHANCE {
            Some(RockSize::Small)
        } else {
            None
        };
        if let Some(size) = rock {
            let pos = jittered(local, LARGE_OBJECT_JITTER, rng);
            let rock = RockGenerator::generate(size, global.x, global.y);
            chunk.add_object(pos, ObjectKind::Rock(rock));
        }

        let mut decorate = |kind: DecorationKind, chance: f64, rng: &mut ChaCha8Rng| {
            if rng.gen::<f64>() < chance {
                let pos = jittered(local, DECORATION_JITTER, rng);
                let decoration = DecorationGenerator::generate(kind, global.x, global.y);
                chunk.add_object(pos, ObjectKind::Decoration(decoration));
            }
        };

        decorate(
            DecorationKind::Pebble,
            PlacementTable::pebble_chance(terrain, rocky),
            rng,
        );
        if grassland {
            if terrain == TerrainKind::Plains {
                decorate(DecorationKind::Flower, PlacementTable::FLOWER_CHANCE, rng);
            }
            decorate(DecorationKind::Bush, PlacementTable::BUSH_CHANCE, rng);
            decorate(DecorationKind::Weed, PlacementTable::WEED_CHANCE, rng);
        }
    }
}

/// Tile centre plus a uniform offset of up to `jitter` world units per axis.
fn jittered(local: LocalTile, jitter: f64, rng: &mut ChaCha8Rng) -> LocalPos {
    let scale = wg_core::TILE_SIZE;
    let dx = rng.gen_range(-jitter..jitter) / scale;
    let dy = rng.gen_range(-jitter..jitter) / scale;
    LocalPos::new(local.x as f64 + 0.5 + dx, local.y as f64 + 0.5 + dy)
}

impl ChunkGenerator for NoiseChunkGenerator {
    fn generate(&self, coord: ChunkCoord) -> Chunk {
        let mut rngs = Vec::with_capacity(wg_core::CHUNK_SIZE * wg_core::CHUNK_SIZE);
        let mut details = Vec::with_capacity(rngs.capacity());

        let mut chunk = Chunk::from_fn(coord, |local| {
            let global = coord.tile(local);
            let mut rng = ChaCha8Rng::seed_from_u64(tile_seed(self.seed, global));
            let (tile, detail) = self.build_tile(global, &mut rng);
            details.push(detail);
            rngs.push(rng);
            tile
        });

        for (i, rng) in rngs.iter_mut().enumerate() {
            let local = LocalTile {
                x: i % wg_core::CHUNK_SIZE,
                y: i / wg_core::CHUNK_SIZE,
            };
            self.place_objects(&mut chunk, local, details[i], rng);
        }
        chunk.sort_objects_by_depth();

        debug!(
            "Generated chunk ({}, {}) with {} objects",
            coord.x,
            coord.y,
            chunk.objects().len()
        );
        chunk
    }

    fn name(&self) -> &'static str {
        "NoiseChunkGenerator"
    }
}

/// Generator producing uniform terrain and no objects.
pub struct FlatChunkGenerator {
    terrain: TerrainKind,
}

impl FlatChunkGenerator {
    pub fn new(terrain: TerrainKind) -> Self {
        Self { terrain }
    }
}

impl ChunkGenerator for FlatChunkGenerator {
    fn generate(&self, coord: ChunkCoord) -> Chunk {
        Chunk::from_fn(coord, |_| Tile::plain(self.terrain))
    }

    fn name(&self) -> &'static str {
        "FlatChunkGenerator"
    }
}
