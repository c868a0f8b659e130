use wg_core::{ChunkCoord, LocalTile, WorldPos, CHUNK_SIZE};

use crate::object::{LocalPos, ObjectCategory, ObjectId, ObjectKind, WorldObject};
use crate::tile::Tile;

/// Distance on each axis within which a position-based removal matches.
const REMOVAL_MATCH_DISTANCE: f64 = 1.0;

/// A square block of tiles plus the objects placed on them.
///
/// Tiles never change after construction. Objects can only be appended or
/// removed.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    pub coord: ChunkCoord,
    tiles: Vec<Tile>,
    objects: Vec<WorldObject>,
    next_serial: u32,
}

impl Chunk {
    /// Build a chunk by evaluating `tile_at` for every local index in row-major order.
    pub fn from_fn(coord: ChunkCoord, mut tile_at: impl FnMut(LocalTile) -> Tile) -> Self {
        let mut tiles = Vec::with_capacity(CHUNK_SIZE * CHUNK_SIZE);
        for y in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                tiles.push(tile_at(LocalTile { x, y }));
            }
        }
        Self {
            coord,
            tiles,
            objects: Vec::new(),
            next_serial: 0,
        }
    }

    pub fn tile(&self, local: LocalTile) -> &Tile {
        &self.tiles[local.index()]
    }

    /// Tile under a world position, clamped into this chunk.
    pub fn tile_at(&self, pos: WorldPos) -> &Tile {
        self.tile(self.coord.local_tile_of(pos))
    }

    /// All tiles in row-major order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn objects(&self) -> &[WorldObject] {
        &self.objects
    }

    pub fn solid_objects(&self) -> impl Iterator<Item = &WorldObject> {
        self.objects.iter().filter(|o| o.kind.is_solid())
    }

    pub fn object(&self, id: ObjectId) -> Option<&WorldObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Place a new object and return its id.
    pub fn add_object(&mut self, local: LocalPos, kind: ObjectKind) -> ObjectId {
        let id = ObjectId {
            chunk: self.coord,
            serial: self.next_serial,
        };
        self.next_serial = self.next_serial.wrapping_add(1);
        self.objects.push(WorldObject {
            id,
            local,
            world: local.to_world(self.coord),
            kind,
        });
        id
    }

    /// Order objects back to front for top-down drawing.
    pub fn sort_objects_by_depth(&mut self) {
        self.objects
            .sort_by(|a, b| a.local.y.total_cmp(&b.local.y));
    }

    pub fn remove_object(&mut self, id: ObjectId) -> Option<WorldObject> {
        let index = self.objects.iter().position(|o| o.id == id)?;
        Some(self.objects.remove(index))
    }

    /// Remove the first object of `category` within a unit of `pos` on both axes.
    pub fn remove_object_near(
        &mut self,
        pos: WorldPos,
        category: ObjectCategory,
    ) -> Option<WorldObject> {
        let index = self.objects.iter().position(|o| {
            o.category() == category
                && (o.world.x - pos.x).abs() < REMOVAL_MATCH_DISTANCE
                && (o.world.y - pos.y).abs() < REMOVAL_MATCH_DISTANCE
        })?;
        Some(self.objects.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wg_core::TerrainKind;
    use wg_entity_spawn::{DecorationGenerator, DecorationKind, RockGenerator, RockSize};

    fn flat_chunk() -> Chunk {
        Chunk::from_fn(ChunkCoord::new(1, 1), |_| Tile::plain(TerrainKind::Plains))
    }

    fn pebble() -> ObjectKind {
        ObjectKind::Decoration(DecorationGenerator::generate(DecorationKind::Pebble, 0, 0))
    }

    #[test]
    fn from_fn_fills_grid_row_major() {
        let chunk = Chunk::from_fn(ChunkCoord::new(0, 0), |local| {
            Tile::plain(if local.x == 3 && local.y == 1 {
                TerrainKind::Water
            } else {
                TerrainKind::Sand
            })
        });
        assert_eq!(chunk.tiles().len(), CHUNK_SIZE * CHUNK_SIZE);
        assert_eq!(chunk.tiles()[CHUNK_SIZE + 3].terrain, TerrainKind::Water);
        assert_eq!(chunk.tile_at(WorldPos::new(350.0, 150.0)).terrain, TerrainKind::Water);
    }

    #[test]
    fn ids_are_unique_after_removal() {
        let mut chunk = flat_chunk();
        let a = chunk.add_object(LocalPos::new(1.0, 1.0), pebble());
        assert!(chunk.remove_object(a).is_some());
        let b = chunk.add_object(LocalPos::new(1.0, 1.0), pebble());
        assert_ne!(a, b);
        assert!(chunk.remove_object(a).is_none());
    }

    #[test]
    fn remove_near_matches_category() {
        let mut chunk = flat_chunk();
        let id = chunk.add_object(LocalPos::new(2.0, 3.0), pebble());
        let world = chunk.object(id).unwrap().world;
        let probe = WorldPos::new(world.x + 0.5, world.y - 0.5);

        assert!(chunk.remove_object_near(probe, ObjectCategory::Rock).is_none());
        assert!(chunk.remove_object_near(probe, ObjectCategory::Decoration).is_some());
        assert!(chunk.objects().is_empty());
    }

    #[test]
    fn depth_sort_orders_by_local_y() {
        let mut chunk = flat_chunk();
        let rock = ObjectKind::Rock(RockGenerator::generate(RockSize::Small, 0, 0));
        chunk.add_object(LocalPos::new(0.0, 9.0), rock.clone());
        chunk.add_object(LocalPos::new(0.0, 2.0), rock.clone());
        chunk.add_object(LocalPos::new(0.0, 5.0), rock);
        chunk.sort_objects_by_depth();
        let ys: Vec<f64> = chunk.objects().iter().map(|o| o.local.y).collect();
        assert_eq!(ys, vec![2.0, 5.0, 9.0]);
    }
}
