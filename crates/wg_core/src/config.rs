use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for loading a world configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How the chunk cache bounds its memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CachePolicy {
    /// Keep every generated chunk for the process lifetime.
    #[default]
    Unbounded,
    /// Evict the chunk touched longest ago once `capacity` is reached.
    LeastRecentlyUsed { capacity: usize },
    /// Evict the chunk farthest from the current focus once `capacity` is reached.
    FarthestFromFocus { capacity: usize },
}

/// Tunables for world generation, collision and navigation.
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World seed for procedural generation.
    pub seed: u32,
    /// Radius of the moving actor in world units.
    pub actor_radius: f64,
    /// Speed multiplier while wading through shallow water.
    pub shallow_water_speed: f64,
    /// Side of a pathfinding grid cell in world units.
    pub path_grid_size: f64,
    /// Node expansions allowed per path request.
    pub path_max_iterations: usize,
    /// Cost multiplier for cells that slow the actor down.
    pub slow_terrain_cost: u32,
    /// Steps walked by the spawn-point spiral before giving up.
    pub spawn_max_iterations: usize,
    /// Radians added to the spiral angle per step.
    pub spawn_angle_step: f64,
    /// World units added to the spiral radius per step.
    pub spawn_radius_step: f64,
    /// Chunk cache bound.
    pub cache: CachePolicy,
    /// Distance at which a waypoint counts as reached.
    pub waypoint_reach: f64,
    /// Walking speed in world units per second.
    pub walk_speed: f64,
    /// Radius, in chunks, kept generated around the player.
    pub view_radius: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            actor_radius: 15.0,
            shallow_water_speed: 0.4,
            path_grid_size: 50.0,
            path_max_iterations: 2000,
            slow_terrain_cost: 5,
            spawn_max_iterations: 10_000,
            spawn_angle_step: 0.5,
            spawn_radius_step: 10.0,
            cache: CachePolicy::Unbounded,
            waypoint_reach: 20.0,
            walk_speed: 140.0,
            view_radius: 1,
        }
    }
}

impl WorldConfig {
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parse a config from RON text and validate it.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a RON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("actor_radius", self.actor_radius),
            ("path_grid_size", self.path_grid_size),
            ("spawn_radius_step", self.spawn_radius_step),
            ("waypoint_reach", self.waypoint_reach),
            ("walk_speed", self.walk_speed),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        if !(self.shallow_water_speed > 0.0 && self.shallow_water_speed <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "shallow_water_speed must be in (0, 1], got {}",
                self.shallow_water_speed
            )));
        }
        if self.slow_terrain_cost == 0 {
            return Err(ConfigError::Invalid("slow_terrain_cost must be at least 1".into()));
        }
        match self.cache {
            CachePolicy::LeastRecentlyUsed { capacity } | CachePolicy::FarthestFromFocus { capacity }
                if capacity == 0 =>
            {
                Err(ConfigError::Invalid("cache capacity must be at least 1".into()))
            }
            _ => Ok(()),
        }
    }
}
