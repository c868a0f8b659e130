use serde::{Deserialize, Serialize};

/// Terrain classification for a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TerrainKind {
    DeepWater,
    Water,
    ShallowWater,
    River,
    Sand,
    Desert,
    #[default]
    Plains,
    Forest,
}

/// Noise samples that drive classification of one tile.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TerrainSample {
    pub elevation: f64,
    pub moisture: f64,
    pub river: f64,
    pub detail: f64,
}

/// Result of classifying a tile: its terrain and whether the ground is rocky.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    pub terrain: TerrainKind,
    pub rocky: bool,
}

impl TerrainKind {
    /// Grey used for some rocky tiles instead of the biome colour.
    pub const ROCKY_RGB: [u8; 3] = [0x6d, 0x75, 0x68];

    pub fn all() -> &'static [TerrainKind] {
        &[
            Self::DeepWater,
            Self::Water,
            Self::ShallowWater,
            Self::River,
            Self::Sand,
            Self::Desert,
            Self::Plains,
            Self::Forest,
        ]
    }

    /// Base display colour.
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            Self::DeepWater => [0x1e, 0x3b, 0x70],
            Self::Water => [0x41, 0x69, 0xe1],
            Self::ShallowWater => [0x87, 0xce, 0xfa],
            Self::River => [0x5d, 0xad, 0xe2],
            Self::Sand => [0xe6, 0xc2, 0x88],
            Self::Desert => [0xed, 0xc9, 0xaf],
            Self::Plains => [0x77, 0x9e, 0x5a],
            Self::Forest => [0x2d, 0x5a, 0x27],
        }
    }

    pub fn color(&self) -> [u8; 4] {
        let [r, g, b] = self.rgb();
        [r, g, b, 255]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::DeepWater => "Deep Water",
            Self::Water => "Water",
            Self::ShallowWater => "Shallow Water",
            Self::River => "River",
            Self::Sand => "Sand",
            Self::Desert => "Desert",
            Self::Plains => "Plains",
            Self::Forest => "Forest",
        }
    }

    /// Any water-type classification, passable or not.
    pub fn is_water(&self) -> bool {
        matches!(
            self,
            Self::DeepWater | Self::Water | Self::ShallowWater | Self::River
        )
    }

    /// Terrain the actor can never stand on.
    pub fn is_impassable(&self) -> bool {
        matches!(self, Self::DeepWater | Self::Water | Self::River)
    }

    /// Whether world objects may be placed on this terrain.
    pub fn allows_objects(&self) -> bool {
        !matches!(self, Self::DeepWater | Self::Water | Self::River | Self::Sand)
    }

    /// Biomes whose ground is grass-covered.
    pub fn is_grassland(&self) -> bool {
        matches!(self, Self::Plains | Self::Forest)
    }

    /// Classify a tile from its noise samples.
    ///
    /// Bands are tested from the deepest water upward; `dither` jitters every
    /// threshold so biome borders are not perfectly smooth contours.
    pub fn classify(sample: TerrainSample, dither: f64) -> Classification {
        let TerrainSample {
            elevation,
            moisture,
            river,
            detail,
        } = sample;

        let water = if elevation < -0.4 + dither * 0.5 {
            Some(Self::DeepWater)
        } else if elevation < -0.1 + dither {
            Some(Self::Water)
        } else if elevation < -0.05 + dither {
            Some(Self::ShallowWater)
        } else if river.abs() < 0.022 + dither * 0.01 {
            Some(Self::River)
        } else if elevation < 0.08 + dither {
            Some(Self::Sand)
        } else {
            None
        };

        if let Some(terrain) = water {
            return Classification {
                terrain,
                rocky: false,
            };
        }

        let terrain = if moisture < -0.5 + dither {
            Self::Desert
        } else if moisture < 0.2 + dither {
            Self::Plains
        } else {
            Self::Forest
        };

        Classification {
            terrain,
            rocky: elevation > 0.6 || (detail > 0.5 && moisture < 0.0),
        }
    }
}
