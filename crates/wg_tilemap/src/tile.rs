use bevy::color::{Color, Mix, Srgba};
use serde::{Deserialize, Serialize};
use wg_core::TerrainKind;
use wg_entity_spawn::{GrassCover, Rgb};

use crate::CollisionFlags;

/// Brightness swing applied by the texture noise.
const SHADE_AMOUNT: f32 = 0.08;

/// One terrain cell of a chunk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: TerrainKind,
    pub rocky: bool,
    pub base_color: Rgb,
    /// Texture noise in `[-1, 1]` used to shade the base colour.
    pub color_variation: f64,
    /// Normalized to `[0, 1]`.
    pub moisture: f64,
    /// Normalized to `[0, 1]`.
    pub soil_quality: f64,
    pub grass: Option<GrassCover>,
}

impl Tile {
    /// A bare tile of the given terrain with neutral attributes.
    pub fn plain(terrain: TerrainKind) -> Self {
        Self {
            terrain,
            rocky: false,
            base_color: terrain.rgb(),
            color_variation: 0.0,
            moisture: 0.5,
            soil_quality: 0.5,
            grass: None,
        }
    }

    pub fn collision(&self) -> CollisionFlags {
        CollisionFlags::for_terrain(self.terrain)
    }

    /// Colour to draw the tile with: the base colour shaded by texture noise,
    /// blended toward its grass cover.
    pub fn display_color(&self) -> Color {
        let [r, g, b] = self.base_color;
        let mut color = Srgba::rgb_u8(r, g, b);
        if let Some(grass) = self.grass {
            let [gr, gg, gb] = grass.rgb();
            color = color.mix(&Srgba::rgb_u8(gr, gg, gb), grass.intensity.clamp(0.0, 1.0));
        }
        let shade = 1.0 + self.color_variation as f32 * SHADE_AMOUNT;
        Color::Srgba(Srgba::new(
            (color.red * shade).clamp(0.0, 1.0),
            (color.green * shade).clamp(0.0, 1.0),
            (color.blue * shade).clamp(0.0, 1.0),
            1.0,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wg_entity_spawn::GrassGenerator;

    #[test]
    fn plain_tile_draws_terrain_colour() {
        let tile = Tile::plain(TerrainKind::Desert);
        let [r, g, b] = TerrainKind::Desert.rgb();
        assert_eq!(tile.display_color().to_srgba(), Srgba::rgb_u8(r, g, b));
    }

    #[test]
    fn texture_noise_shades_colour() {
        let mut light = Tile::plain(TerrainKind::Plains);
        light.color_variation = 1.0;
        let mut dark = light.clone();
        dark.color_variation = -1.0;
        assert!(light.display_color().to_srgba().green > dark.display_color().to_srgba().green);
    }

    #[test]
    fn grass_changes_colour() {
        let mut tile = Tile::plain(TerrainKind::Sand);
        let bare = tile.display_color();
        tile.grass = GrassGenerator::generate(0.9, 0.9, 0.5);
        assert!(tile.grass.is_some());
        assert_ne!(tile.display_color(), bare);
    }

    #[test]
    fn impassable_terrain_is_blocked() {
        assert!(Tile::plain(TerrainKind::River).collision().contains(CollisionFlags::BLOCKED));
        assert!(Tile::plain(TerrainKind::Forest).collision().contains(CollisionFlags::PASSABLE));
    }
}
