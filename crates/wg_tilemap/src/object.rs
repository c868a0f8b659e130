use serde::{Deserialize, Serialize};
use wg_core::{ChunkCoord, WorldPos, TILE_SIZE};
use wg_entity_spawn::{DecorationDescriptor, RockDescriptor, RockSize, TreeDescriptor};

/// Stable identity of an object inside its owning chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId {
    pub chunk: ChunkCoord,
    pub serial: u32,
}

/// Position inside a chunk in tile units, not snapped to the tile grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalPos {
    pub x: f64,
    pub y: f64,
}

impl LocalPos {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_world(&self, chunk: ChunkCoord) -> WorldPos {
        let origin = chunk.origin();
        WorldPos::new(origin.x + self.x * TILE_SIZE, origin.y + self.y * TILE_SIZE)
    }

    pub fn from_world(chunk: ChunkCoord, pos: WorldPos) -> Self {
        let origin = chunk.origin();
        Self::new((pos.x - origin.x) / TILE_SIZE, (pos.y - origin.y) / TILE_SIZE)
    }
}

/// Coarse object type, used when matching objects by position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectCategory {
    Tree,
    Rock,
    Decoration,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ObjectKind {
    Tree(TreeDescriptor),
    Rock(RockDescriptor),
    Decoration(DecorationDescriptor),
}

impl ObjectKind {
    pub fn category(&self) -> ObjectCategory {
        match self {
            Self::Tree(_) => ObjectCategory::Tree,
            Self::Rock(_) => ObjectCategory::Rock,
            Self::Decoration(_) => ObjectCategory::Decoration,
        }
    }

    /// Solid objects block movement.
    pub fn is_solid(&self) -> bool {
        match self {
            Self::Tree(_) => true,
            Self::Rock(rock) => rock.size == RockSize::Boulder,
            Self::Decoration(_) => false,
        }
    }

    pub fn is_collectible(&self) -> bool {
        match self {
            Self::Tree(_) => false,
            Self::Rock(rock) => rock.size == RockSize::Small,
            Self::Decoration(_) => true,
        }
    }

    /// Radius of the blocking circle, for solid objects only.
    pub fn collision_radius(&self) -> Option<f64> {
        match self {
            Self::Tree(tree) => Some(tree.trunk_radius),
            Self::Rock(rock) if rock.size == RockSize::Boulder => Some(rock.radius),
            Self::Rock(_) | Self::Decoration(_) => None,
        }
    }

    /// Distance within which a point counts as touching this object.
    pub fn pick_radius(&self) -> f64 {
        match self {
            Self::Tree(_) => 60.0,
            Self::Rock(rock) => rock.radius + 10.0,
            Self::Decoration(_) => 15.0,
        }
    }

    /// Carry weight in kilograms, for collectible objects.
    pub fn weight(&self) -> Option<f64> {
        match self {
            Self::Tree(_) => None,
            Self::Rock(rock) => Some(rock.size.weight()),
            Self::Decoration(decoration) => Some(decoration.kind().weight()),
        }
    }
}

/// An entity placed on top of terrain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldObject {
    pub id: ObjectId,
    /// Position within the owning chunk.
    pub local: LocalPos,
    /// Same position in world space.
    pub world: WorldPos,
    pub kind: ObjectKind,
}

impl WorldObject {
    pub fn category(&self) -> ObjectCategory {
        self.kind.category()
    }

    /// True when `pos` falls inside this object's blocking circle grown by `actor_radius`.
    pub fn blocks(&self, pos: WorldPos, actor_radius: f64) -> bool {
        self.kind
            .collision_radius()
            .is_some_and(|r| self.world.distance(pos) < r + actor_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wg_entity_spawn::{
        DecorationGenerator, DecorationKind, RockGenerator, TreeGenerator, TreeSpecies,
    };

    fn object(kind: ObjectKind) -> WorldObject {
        let chunk = ChunkCoord::new(0, 0);
        let local = LocalPos::new(5.0, 5.0);
        WorldObject {
            id: ObjectId { chunk, serial: 0 },
            local,
            world: local.to_world(chunk),
            kind,
        }
    }

    #[test]
    fn local_and_world_agree() {
        let chunk = ChunkCoord::new(-1, 2);
        let local = LocalPos::new(3.25, 15.5);
        let world = local.to_world(chunk);
        assert_eq!(world, WorldPos::new(-1600.0 + 325.0, 3200.0 + 1550.0));
        assert_eq!(LocalPos::from_world(chunk, world), local);
    }

    #[test]
    fn solidity_by_variant() {
        let tree = ObjectKind::Tree(TreeGenerator::generate(TreeSpecies::Oak, 0, 0));
        let boulder = ObjectKind::Rock(RockGenerator::generate(RockSize::Boulder, 0, 0));
        let stone = ObjectKind::Rock(RockGenerator::generate(RockSize::Small, 0, 0));
        let flower =
            ObjectKind::Decoration(DecorationGenerator::generate(DecorationKind::Flower, 0, 0));

        assert!(tree.is_solid() && !tree.is_collectible());
        assert!(boulder.is_solid() && !boulder.is_collectible());
        assert!(!stone.is_solid() && stone.is_collectible());
        assert!(!flower.is_solid() && flower.is_collectible());
        assert!(stone.collision_radius().is_none());
        assert_eq!(flower.weight(), Some(0.1));
    }

    #[test]
    fn blocking_circle_boundary() {
        let tree = TreeGenerator::generate(TreeSpecies::Pine, 1, 1);
        let trunk = tree.trunk_radius;
        let obj = object(ObjectKind::Tree(tree));
        let inside = WorldPos::new(obj.world.x + trunk + 14.9, obj.world.y);
        let outside = WorldPos::new(obj.world.x + trunk + 15.1, obj.world.y);
        assert!(obj.blocks(inside, 15.0));
        assert!(!obj.blocks(outside, 15.0));
    }
}
