use bevy::prelude::*;

pub mod channels;
pub mod field;

pub use channels::{NoiseChannel, TileNoise, WorldNoise};
pub use field::{NoiseField, SeededNoise};

/// Noise plugin for Wildgrove.
/// Shares the world's noise channels as a resource; the world plugin
/// generates chunks from it when added afterwards.
pub struct WgNoisePlugin {
    pub seed: u32,
}

impl Plugin for WgNoisePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(WorldNoise::new(self.seed));
    }
}
