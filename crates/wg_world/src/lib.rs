use bevy::prelude::*;
use wg_core::{WorldConfig, WorldPos, CHUNK_WORLD_SIZE};
use wg_noise::WorldNoise;

pub mod generator;
pub mod manager;
pub mod pathfinder;
pub mod store;

pub use generator::{ChunkGenerator, FlatChunkGenerator, NoiseChunkGenerator};
pub use manager::{WorldManager, MAX_BLOCKING_RADIUS, MAX_VIEW_RADIUS, MAX_VIEW_SPAN};
pub use pathfinder::{GridCell, Pathfinder};
pub use store::{CacheStats, ChunkStore};

/// Point around which chunks are kept generated, usually the player.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewFocus {
    pub center: WorldPos,
}

/// World plugin for Wildgrove.
/// Owns chunk generation, collision queries and pathfinding.
///
/// Reads the [`WorldConfig`] inserted by the core plugin, or the default.
/// Chunks are generated from the [`WorldNoise`] resource when the noise
/// plugin was added first with the same seed.
pub struct WgWorldPlugin;

impl Plugin for WgWorldPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<WorldConfig>()
            .cloned()
            .unwrap_or_default();

        let noise = match app.world().get_resource::<WorldNoise>() {
            Some(noise) if noise.seed() == config.seed => noise.clone(),
            Some(noise) => {
                warn!(
                    "Noise seed {} differs from world seed {}, rebuilding channels",
                    noise.seed(),
                    config.seed
                );
                WorldNoise::new(config.seed)
            }
            None => WorldNoise::new(config.seed),
        };
        let generator = NoiseChunkGenerator::from_noise(noise);

        app.insert_resource(Pathfinder::from_config(&config))
            .insert_resource(WorldManager::with_generator(config, generator))
            .init_resource::<ViewFocus>()
            .add_systems(Update, stream_chunks.run_if(resource_changed::<ViewFocus>));
    }
}

/// Keep the chunks within the view radius of the focus generated.
fn stream_chunks(focus: Res<ViewFocus>, mut world: ResMut<WorldManager>) {
    let reach = f64::from(world.config().view_radius) * CHUNK_WORLD_SIZE;
    let min = WorldPos::new(focus.center.x - reach, focus.center.y - reach);
    let max = WorldPos::new(focus.center.x + reach, focus.center.y + reach);
    world.chunks_in_view(min, max);
}

#[cfg(test)]
mod tests {
    use super::*;
    use wg_core::WgCorePlugin;

    #[test]
    fn plugin_streams_chunks_around_focus() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, WgCorePlugin::default(), WgWorldPlugin));
        app.update();

        let cached = app.world().resource::<WorldManager>().cache_stats().cached;
        assert_eq!(cached, 9, "view radius 1 keeps a 3x3 block");

        app.world_mut().resource_mut::<ViewFocus>().center = WorldPos::new(3.0 * CHUNK_WORLD_SIZE, 0.0);
        app.update();
        let cached = app.world().resource::<WorldManager>().cache_stats().cached;
        assert_eq!(cached, 18);
    }

    #[test]
    fn plugin_generates_from_shared_noise() {
        use wg_core::ChunkCoord;
        use wg_noise::WgNoisePlugin;

        let mut app = App::new();
        app.add_plugins((
            WgCorePlugin {
                config: WorldConfig::with_seed(7),
            },
            WgNoisePlugin { seed: 7 },
            WgWorldPlugin,
        ));

        let coord = ChunkCoord::new(2, -1);
        let expected = NoiseChunkGenerator::new(7).generate(coord);
        let mut world = app.world_mut().resource_mut::<WorldManager>();
        assert_eq!(world.chunk(coord), &expected);
    }

    #[test]
    fn mismatched_noise_seed_falls_back_to_world_seed() {
        use wg_core::ChunkCoord;
        use wg_noise::WgNoisePlugin;

        let mut app = App::new();
        app.add_plugins((
            WgCorePlugin {
                config: WorldConfig::with_seed(7),
            },
            WgNoisePlugin { seed: 8 },
            WgWorldPlugin,
        ));

        let coord = ChunkCoord::new(0, 0);
        let expected = NoiseChunkGenerator::new(7).generate(coord);
        let mut world = app.world_mut().resource_mut::<WorldManager>();
        assert_eq!(world.seed(), 7);
        assert_eq!(world.chunk(coord), &expected);
    }

    #[test]
    fn plugin_uses_configured_seed() {
        let mut app = App::new();
        app.add_plugins(WgCorePlugin {
            config: WorldConfig::with_seed(99),
        })
        .add_plugins(WgWorldPlugin);
        assert_eq!(app.world().resource::<WorldManager>().seed(), 99);
    }
}
