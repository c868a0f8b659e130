use std::collections::{HashMap, HashSet};

use bevy::log::debug;
use rayon::prelude::*;
use wg_core::{CachePolicy, ChunkCoord};
use wg_tilemap::Chunk;

use crate::generator::ChunkGenerator;

/// A generated chunk with its last access tick.
struct CachedChunk {
    chunk: Chunk,
    last_accessed: u64,
}

/// Cache of generated chunks keyed by coordinate.
///
/// A chunk that was evicted is regenerated on the next request. Generation
/// is deterministic, so callers never observe the difference except for
/// objects they removed, which come back.
///
/// Capacity is a soft bound while [`ChunkStore::pregenerate`] runs: chunks of
/// the requested set are never evicted to make room for each other, so a set
/// larger than the capacity is kept whole and trimmed on later inserts.
pub struct ChunkStore {
    chunks: HashMap<ChunkCoord, CachedChunk>,
    /// Chunks of the set being pre-generated, exempt from eviction.
    pinned: HashSet<ChunkCoord>,
    policy: CachePolicy,
    focus: ChunkCoord,
    clock: u64,
    generated: u64,
    evicted: u64,
}

impl ChunkStore {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            chunks: HashMap::new(),
            pinned: HashSet::new(),
            policy,
            focus: ChunkCoord::new(0, 0),
            clock: 0,
            generated: 0,
            evicted: 0,
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Centre used by [`CachePolicy::FarthestFromFocus`].
    pub fn set_focus(&mut self, focus: ChunkCoord) {
        self.focus = focus;
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Cached chunk, without generating or touching it.
    pub fn peek(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord).map(|cached| &cached.chunk)
    }

    /// Return the chunk at `coord`, generating it on a miss.
    pub fn get_or_generate(
        &mut self,
        coord: ChunkCoord,
        generator: &dyn ChunkGenerator,
    ) -> &mut Chunk {
        if !self.chunks.contains_key(&coord) {
            self.evict_if_needed();
        }

        let tick = self.tick();
        let generated = &mut self.generated;
        let cached = self.chunks.entry(coord).or_insert_with(|| {
            *generated += 1;
            CachedChunk {
                chunk: generator.generate(coord),
                last_accessed: tick,
            }
        });
        cached.last_accessed = tick;
        &mut cached.chunk
    }

    /// Insert a chunk unless one is already cached for its coordinate.
    ///
    /// Returns true when the chunk was inserted. An existing entry always
    /// wins so that edits made to it survive.
    pub fn insert_if_absent(&mut self, chunk: Chunk) -> bool {
        if self.chunks.contains_key(&chunk.coord) {
            return false;
        }
        self.evict_if_needed();
        let tick = self.tick();
        self.generated += 1;
        self.chunks.insert(
            chunk.coord,
            CachedChunk {
                chunk,
                last_accessed: tick,
            },
        );
        true
    }

    /// Generate every missing chunk in `coords` in parallel and cache the results.
    ///
    /// Every chunk of `coords` is cached afterwards, even past capacity.
    pub fn pregenerate(&mut self, coords: &[ChunkCoord], generator: &dyn ChunkGenerator) -> usize {
        let tick = self.tick();
        for coord in coords {
            if let Some(cached) = self.chunks.get_mut(coord) {
                cached.last_accessed = tick;
            }
        }

        let mut missing: Vec<ChunkCoord> = coords
            .iter()
            .copied()
            .filter(|coord| !self.contains(*coord))
            .collect();
        missing.sort_by_key(|c| (c.y, c.x));
        missing.dedup();

        let chunks: Vec<Chunk> = missing
            .par_iter()
            .map(|coord| generator.generate(*coord))
            .collect();

        self.pinned.extend(coords.iter().copied());
        let mut inserted = 0;
        for chunk in chunks {
            if self.insert_if_absent(chunk) {
                inserted += 1;
            }
        }
        self.pinned.clear();
        if inserted > 0 {
            debug!("Pre-generated {} chunks with {}", inserted, generator.name());
        }
        inserted
    }

    pub fn remove(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        self.chunks.remove(&coord).map(|cached| cached.chunk)
    }

    /// Drop every cached chunk.
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.pinned.clear();
    }

    /// Get cache statistics for debugging.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            cached: self.chunks.len(),
            generated: self.generated,
            evicted: self.evicted,
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_if_needed(&mut self) {
        let capacity = match self.policy {
            CachePolicy::Unbounded => return,
            CachePolicy::LeastRecentlyUsed { capacity }
            | CachePolicy::FarthestFromFocus { capacity } => capacity.max(1),
        };

        while self.chunks.len() >= capacity {
            let pinned = &self.pinned;
            let candidates = self
                .chunks
                .iter()
                .filter(|(coord, _)| !pinned.contains(*coord));
            let victim = match self.policy {
                CachePolicy::FarthestFromFocus { .. } => {
                    let focus = self.focus;
                    candidates
                        .max_by_key(|(coord, cached)| {
                            (coord.chebyshev(focus), u64::MAX - cached.last_accessed)
                        })
                        .map(|(coord, _)| *coord)
                }
                _ => candidates
                    .min_by_key(|(_, cached)| cached.last_accessed)
                    .map(|(coord, _)| *coord),
            };
            let Some(victim) = victim else { break };
            self.chunks.remove(&victim);
            self.evicted += 1;
            debug!("Evicted chunk ({}, {})", victim.x, victim.y);
        }
    }
}

impl Default for ChunkStore {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}

/// Statistics about cache usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub cached: usize,
    /// Chunks generated over the store's lifetime, including regenerations.
    pub generated: u64,
    pub evicted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{FlatChunkGenerator, NoiseChunkGenerator};
    use wg_core::TerrainKind;
    use wg_entity_spawn::{RockGenerator, RockSize};
    use wg_tilemap::{LocalPos, ObjectKind};

    fn flat() -> FlatChunkGenerator {
        FlatChunkGenerator::new(TerrainKind::Plains)
    }

    #[test]
    fn unbounded_keeps_everything() {
        let mut store = ChunkStore::default();
        for x in 0..20 {
            store.get_or_generate(ChunkCoord::new(x, 0), &flat());
        }
        assert_eq!(store.len(), 20);
        assert_eq!(store.stats().evicted, 0);
    }

    #[test]
    fn repeated_access_is_cached() {
        let mut store = ChunkStore::default();
        store.get_or_generate(ChunkCoord::new(1, 1), &flat());
        store.get_or_generate(ChunkCoord::new(1, 1), &flat());
        assert_eq!(store.stats().generated, 1);
    }

    #[test]
    fn lru_evicts_oldest() {
        let mut store = ChunkStore::new(CachePolicy::LeastRecentlyUsed { capacity: 2 });
        let (a, b, c) = (ChunkCoord::new(0, 0), ChunkCoord::new(1, 0), ChunkCoord::new(2, 0));
        store.get_or_generate(a, &flat());
        store.get_or_generate(b, &flat());
        store.get_or_generate(a, &flat());
        store.get_or_generate(c, &flat());

        assert!(store.contains(a));
        assert!(!store.contains(b), "least recently used chunk should be evicted");
        assert!(store.contains(c));
        assert_eq!(store.stats().evicted, 1);
    }

    #[test]
    fn farthest_from_focus_evicts_distant_chunk() {
        let mut store = ChunkStore::new(CachePolicy::FarthestFromFocus { capacity: 3 });
        let far = ChunkCoord::new(10, 10);
        store.get_or_generate(far, &flat());
        store.get_or_generate(ChunkCoord::new(0, 0), &flat());
        store.get_or_generate(ChunkCoord::new(1, 0), &flat());

        store.set_focus(ChunkCoord::new(0, 0));
        store.get_or_generate(ChunkCoord::new(0, 1), &flat());

        assert!(!store.contains(far));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn evicted_chunk_regenerates_identically() {
        let generator = NoiseChunkGenerator::new(12345);
        let mut store = ChunkStore::new(CachePolicy::LeastRecentlyUsed { capacity: 1 });
        let coord = ChunkCoord::new(0, 0);
        let first = store.get_or_generate(coord, &generator).clone();
        store.get_or_generate(ChunkCoord::new(5, 5), &generator);
        assert!(!store.contains(coord));

        let second = store.get_or_generate(coord, &generator).clone();
        assert_eq!(first, second);
    }

    #[test]
    fn insert_if_absent_keeps_existing_edits() {
        let mut store = ChunkStore::default();
        let coord = ChunkCoord::new(0, 0);
        let rock = RockGenerator::generate(RockSize::Small, 0, 0);
        store
            .get_or_generate(coord, &flat())
            .add_object(LocalPos::new(1.0, 1.0), ObjectKind::Rock(rock));

        assert!(!store.insert_if_absent(flat().generate(coord)));
        assert_eq!(store.peek(coord).map(|c| c.objects().len()), Some(1));
    }

    #[test]
    fn pregenerate_fills_missing_chunks() {
        let mut store = ChunkStore::default();
        store.get_or_generate(ChunkCoord::new(0, 0), &flat());
        let coords = ChunkCoord::new(0, 0).with_neighbors();

        let inserted = store.pregenerate(&coords, &flat());

        assert_eq!(inserted, 8);
        assert_eq!(store.len(), 9);
    }

    #[test]
    fn pregenerate_keeps_whole_set_past_capacity() {
        let mut store = ChunkStore::new(CachePolicy::LeastRecentlyUsed { capacity: 4 });
        let coords = ChunkCoord::new(0, 0).with_neighbors();

        store.pregenerate(&coords, &flat());

        assert!(coords.iter().all(|c| store.contains(*c)));
        assert_eq!(store.len(), 9);

        store.get_or_generate(ChunkCoord::new(40, 40), &flat());
        assert_eq!(store.len(), 4);
        assert!(store.contains(ChunkCoord::new(40, 40)));
    }

    #[test]
    fn pregenerate_evicts_only_outside_the_set() {
        let mut store = ChunkStore::new(CachePolicy::FarthestFromFocus { capacity: 9 });
        let stale = ChunkCoord::new(-20, 3);
        store.get_or_generate(stale, &flat());
        let coords = ChunkCoord::new(0, 0).with_neighbors();

        store.pregenerate(&coords, &flat());

        assert!(!store.contains(stale));
        assert!(coords.iter().all(|c| store.contains(*c)));
        assert_eq!(store.len(), 9);
    }

    #[test]
    fn clear_empties_store() {
        let mut store = ChunkStore::default();
        store.get_or_generate(ChunkCoord::new(0, 0), &flat());
        store.clear();
        assert!(store.is_empty());
    }
}
