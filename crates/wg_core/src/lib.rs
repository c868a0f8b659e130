use bevy::prelude::*;

pub mod config;
pub mod coords;
pub mod movement;
pub mod terrain;

pub use config::{CachePolicy, ConfigError, WorldConfig};
pub use coords::{ChunkCoord, LocalTile, TileCoord, WorldPos, CHUNK_SIZE, CHUNK_WORLD_SIZE, TILE_SIZE};
pub use movement::{MovementInfo, Traversability};
pub use terrain::{Classification, TerrainKind, TerrainSample};

/// Core plugin providing foundational types for Wildgrove.
///
/// Makes the active [`WorldConfig`] available to every other plugin.
pub struct WgCorePlugin {
    pub config: WorldConfig,
}

impl Default for WgCorePlugin {
    fn default() -> Self {
        Self {
            config: WorldConfig::default(),
        }
    }
}

impl Plugin for WgCorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone());
    }
}
