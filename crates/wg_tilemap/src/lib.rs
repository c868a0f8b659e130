use bitflags::bitflags;
use wg_core::TerrainKind;

pub mod chunk;
pub mod object;
pub mod tile;

pub use chunk::Chunk;
pub use object::{LocalPos, ObjectCategory, ObjectId, ObjectKind, WorldObject};
pub use tile::Tile;

bitflags! {
    /// Collision flags for tiles.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CollisionFlags: u8 {
        const PASSABLE = 0b0000_0001;
        const BLOCKED = 0b0000_0010;
        const WATER = 0b0000_0100;
        /// Passable, but at reduced speed.
        const SLOW = 0b0000_1000;
    }
}

impl CollisionFlags {
    pub fn for_terrain(terrain: TerrainKind) -> Self {
        match terrain {
            TerrainKind::DeepWater | TerrainKind::Water | TerrainKind::River => {
                Self::BLOCKED | Self::WATER
            }
            TerrainKind::ShallowWater => Self::PASSABLE | Self::WATER | Self::SLOW,
            TerrainKind::Sand | TerrainKind::Desert | TerrainKind::Plains | TerrainKind::Forest => {
                Self::PASSABLE
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_agree_with_terrain() {
        for terrain in TerrainKind::all() {
            let flags = CollisionFlags::for_terrain(*terrain);
            assert_eq!(flags.contains(CollisionFlags::BLOCKED), terrain.is_impassable());
            assert_eq!(flags.contains(CollisionFlags::WATER), terrain.is_water());
            assert_ne!(
                flags.contains(CollisionFlags::PASSABLE),
                flags.contains(CollisionFlags::BLOCKED)
            );
        }
    }
}
