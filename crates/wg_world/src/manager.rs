use bevy::prelude::*;
use wg_core::{
    ChunkCoord, MovementInfo, Traversability, WorldConfig, WorldPos, CHUNK_WORLD_SIZE,
};
use wg_tilemap::{Chunk, CollisionFlags, LocalPos, ObjectCategory, ObjectId, ObjectKind, WorldObject};

use crate::generator::{ChunkGenerator, NoiseChunkGenerator};
use crate::store::{CacheStats, ChunkStore};

/// Largest blocking radius any generator produces (a boulder).
pub const MAX_BLOCKING_RADIUS: f64 = 70.0;
/// Largest pick radius of any object.
const MAX_PICK_RADIUS: f64 = MAX_BLOCKING_RADIUS + 10.0;

/// Largest radius, in chunks, generated around a centre.
pub const MAX_VIEW_RADIUS: u32 = 16;
/// Largest view rectangle side, in chunks.
pub const MAX_VIEW_SPAN: i32 = 2 * MAX_VIEW_RADIUS as i32 + 1;

/// Owns the chunk cache and answers spatial queries about the world.
#[derive(Resource)]
pub struct WorldManager {
    config: WorldConfig,
    generator: Box<dyn ChunkGenerator>,
    store: ChunkStore,
}

impl WorldManager {
    /// World built from noise seeded by `config.seed`.
    pub fn new(config: WorldConfig) -> Self {
        let generator = NoiseChunkGenerator::new(config.seed);
        Self::with_generator(config, generator)
    }

    pub fn with_generator(config: WorldConfig, generator: impl ChunkGenerator + 'static) -> Self {
        info!(
            "World initialized with seed {} using {}",
            config.seed,
            generator.name()
        );
        Self {
            store: ChunkStore::new(config.cache),
            generator: Box::new(generator),
            config,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn seed(&self) -> u32 {
        self.config.seed
    }

    /// Chunk at `coord`, generated on first use.
    pub fn chunk(&mut self, coord: ChunkCoord) -> &Chunk {
        self.store.get_or_generate(coord, self.generator.as_ref())
    }

    pub fn chunk_mut(&mut self, coord: ChunkCoord) -> &mut Chunk {
        self.store.get_or_generate(coord, self.generator.as_ref())
    }

    /// Chunk containing `pos`.
    pub fn chunk_at(&mut self, pos: WorldPos) -> &Chunk {
        self.chunk(pos.chunk())
    }

    /// Ensure every chunk overlapping the rectangle exists and return their coordinates.
    ///
    /// Missing chunks are generated in parallel. The rectangle centre becomes
    /// the cache focus. A side wider than [`MAX_VIEW_SPAN`] chunks is cut down
    /// to that many chunks around the centre.
    pub fn chunks_in_view(&mut self, min: WorldPos, max: WorldPos) -> Vec<ChunkCoord> {
        let (lo, hi) = (min.chunk(), max.chunk());
        let centre = WorldPos::new((min.x + max.x) * 0.5, (min.y + max.y) * 0.5).chunk();
        let (x0, x1) = clamp_span(lo.x.min(hi.x), lo.x.max(hi.x), centre.x);
        let (y0, y1) = clamp_span(lo.y.min(hi.y), lo.y.max(hi.y), centre.y);
        if (x0, x1, y0, y1) != (lo.x.min(hi.x), lo.x.max(hi.x), lo.y.min(hi.y), lo.y.max(hi.y)) {
            warn!(
                "View rectangle clamped to chunks ({}, {})..=({}, {})",
                x0, y0, x1, y1
            );
        }

        let mut coords = Vec::new();
        for y in y0..=y1 {
            for x in x0..=x1 {
                coords.push(ChunkCoord::new(x, y));
            }
        }

        self.store.set_focus(centre);
        self.store.pregenerate(&coords, self.generator.as_ref());
        coords
    }

    /// Generate the square of chunks within `radius` of `center` in parallel.
    ///
    /// The radius is capped at [`MAX_VIEW_RADIUS`].
    pub fn pregenerate_around(&mut self, center: ChunkCoord, radius: u32) -> usize {
        if radius > MAX_VIEW_RADIUS {
            warn!("Pre-generation radius {} capped at {}", radius, MAX_VIEW_RADIUS);
        }
        let r = radius.min(MAX_VIEW_RADIUS) as i32;
        let mut coords = Vec::new();
        for dy in -r..=r {
            for dx in -r..=r {
                coords.push(ChunkCoord::new(
                    center.x.saturating_add(dx),
                    center.y.saturating_add(dy),
                ));
            }
        }
        self.store.set_focus(center);
        self.store.pregenerate(&coords, self.generator.as_ref())
    }

    pub fn clear_cache(&mut self) {
        self.store.clear();
        info!("World chunk cache cleared");
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.store.stats()
    }

    /// Can the actor stand at `pos`, and at what speed.
    ///
    /// Impassable terrain or overlap with a solid object disallows movement.
    /// Shallow water allows it at reduced speed.
    pub fn query_movement(&mut self, pos: WorldPos) -> MovementInfo {
        if !(pos.x.is_finite() && pos.y.is_finite()) {
            return MovementInfo::BLOCKED;
        }

        let flags = self.chunk_at(pos).tile_at(pos).collision();
        if flags.contains(CollisionFlags::BLOCKED) {
            return MovementInfo::BLOCKED;
        }

        let actor_radius = self.config.actor_radius;
        for coord in chunks_within(pos, MAX_BLOCKING_RADIUS + actor_radius) {
            if self
                .chunk(coord)
                .solid_objects()
                .any(|obj| obj.blocks(pos, actor_radius))
            {
                return MovementInfo::BLOCKED;
            }
        }

        if flags.contains(CollisionFlags::SLOW) {
            MovementInfo::slowed(self.config.shallow_water_speed)
        } else {
            MovementInfo::FREE
        }
    }

    /// True when the actor cannot stand at `pos`.
    pub fn check_collision(&mut self, pos: WorldPos) -> bool {
        !self.query_movement(pos).allowed
    }

    /// First object whose pick radius contains `pos`.
    pub fn object_at(&mut self, pos: WorldPos) -> Option<WorldObject> {
        if !(pos.x.is_finite() && pos.y.is_finite()) {
            return None;
        }
        chunks_within(pos, MAX_PICK_RADIUS).into_iter().find_map(|coord| {
            self.chunk(coord)
                .objects()
                .iter()
                .find(|obj| obj.world.distance(pos) < obj.kind.pick_radius())
                .cloned()
        })
    }

    /// Remove a previously returned object.
    ///
    /// Matches by id first, then by category at the same position, so a copy
    /// taken before its chunk was regenerated still resolves. Returns false
    /// when nothing matched.
    pub fn remove_object(&mut self, object: &WorldObject) -> bool {
        let removed = self.remove_object_by_id(object.id).is_some()
            || self
                .chunk_mut(object.world.chunk())
                .remove_object_near(object.world, object.category())
                .is_some();
        if removed {
            debug!("Removed {:?} at ({:.1}, {:.1})", object.category(), object.world.x, object.world.y);
        }
        removed
    }

    pub fn remove_object_by_id(&mut self, id: ObjectId) -> Option<WorldObject> {
        self.chunk_mut(id.chunk).remove_object(id)
    }

    /// Remove the first object of `category` near `pos`.
    pub fn remove_object_at(&mut self, pos: WorldPos, category: ObjectCategory) -> Option<WorldObject> {
        self.chunk_mut(pos.chunk()).remove_object_near(pos, category)
    }

    /// Place an object at a world position inside its owning chunk.
    pub fn spawn_object(&mut self, pos: WorldPos, kind: ObjectKind) -> ObjectId {
        let coord = pos.chunk();
        let chunk = self.chunk_mut(coord);
        let id = chunk.add_object(LocalPos::from_world(coord, pos), kind);
        chunk.sort_objects_by_depth();
        id
    }

    /// Walk an outward spiral from the origin to the first dry, unobstructed point.
    pub fn search_spawn_position(&mut self) -> Option<WorldPos> {
        let (mut angle, mut radius) = (0.0_f64, 0.0_f64);
        for _ in 0..self.config.spawn_max_iterations {
            let pos = WorldPos::new(angle.cos() * radius, angle.sin() * radius);
            let dry = !self.chunk_at(pos).tile_at(pos).terrain.is_water();
            if dry && !self.check_collision(pos) {
                return Some(pos);
            }
            angle += self.config.spawn_angle_step;
            radius += self.config.spawn_radius_step;
        }
        None
    }

    /// Like [`Self::search_spawn_position`], falling back to the origin.
    pub fn find_safe_spawn_position(&mut self) -> WorldPos {
        match self.search_spawn_position() {
            Some(pos) => {
                info!("Safe spawn found at ({:.1}, {:.1})", pos.x, pos.y);
                pos
            }
            None => {
                warn!(
                    "No safe spawn within {} steps, falling back to origin",
                    self.config.spawn_max_iterations
                );
                WorldPos::ORIGIN
            }
        }
    }
}

impl Traversability for WorldManager {
    fn movement_at(&mut self, pos: WorldPos) -> MovementInfo {
        self.query_movement(pos)
    }
}

/// The owning chunk of `pos` plus any neighbour whose bounds lie within `reach`.
fn chunks_within(pos: WorldPos, reach: f64) -> Vec<ChunkCoord> {
    let owner = pos.chunk();
    let mut coords: Vec<ChunkCoord> = owner
        .with_neighbors()
        .into_iter()
        .filter(|coord| *coord == owner || distance_to_chunk(*coord, pos) < reach)
        .collect();
    coords.dedup();
    coords
}

fn distance_to_chunk(coord: ChunkCoord, pos: WorldPos) -> f64 {
    let origin = coord.origin();
    let dx = (origin.x - pos.x).max(pos.x - (origin.x + CHUNK_WORLD_SIZE)).max(0.0);
    let dy = (origin.y - pos.y).max(pos.y - (origin.y + CHUNK_WORLD_SIZE)).max(0.0);
    dx.hypot(dy)
}

/// Cut `lo..=hi` down to at most [`MAX_VIEW_SPAN`] values, centred on `centre`.
fn clamp_span(lo: i32, hi: i32, centre: i32) -> (i32, i32) {
    let span = i64::from(MAX_VIEW_SPAN);
    let (lo, hi) = (i64::from(lo), i64::from(hi));
    if hi - lo < span {
        return (lo as i32, hi as i32);
    }
    let start = (i64::from(centre) - span / 2).clamp(lo, hi - span + 1);
    (start as i32, (start + span - 1) as i32)
}
