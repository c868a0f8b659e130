use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::seed::SeedRng;
use crate::{hex, Rgb};

/// Tree species placed by the chunk generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreeSpecies {
    /// Conifer; crown drawn as stacked star-shaped layers.
    Pine,
    /// Broadleaf with a dense, wide crown.
    Oak,
    /// Broadleaf with pale bark and a lighter crown.
    Birch,
}

impl TreeSpecies {
    pub fn all() -> &'static [TreeSpecies] {
        &[Self::Pine, Self::Oak, Self::Birch]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pine => "Pine",
            Self::Oak => "Oak",
            Self::Birch => "Birch",
        }
    }

    pub fn is_conifer(&self) -> bool {
        matches!(self, Self::Pine)
    }

    fn config(&self) -> &'static SpeciesConfig {
        match self {
            Self::Pine => &PINE,
            Self::Oak => &OAK,
            Self::Birch => &BIRCH,
        }
    }
}

enum CrownConfig {
    Conifer {
        layers_min: u32,
        layers_max: u32,
        base_radius: f64,
        layer_height: f64,
    },
    Broadleaf {
        blob_count: u32,
        crown_min: f64,
        crown_max: f64,
    },
}

struct SpeciesConfig {
    bark: Rgb,
    wood: Rgb,
    trunk_min: f64,
    trunk_max: f64,
    palettes: &'static [[Rgb; 3]],
    crown: CrownConfig,
}

static PINE: SpeciesConfig = SpeciesConfig {
    bark: hex(0x3E2723),
    wood: hex(0xD7CCC8),
    trunk_min: 15.0,
    trunk_max: 35.0,
    palettes: &[
        [hex(0x2d6a4f), hex(0x1b4332), hex(0x40916c)],
        [hex(0x1b4332), hex(0x0f261c), hex(0x20402e)],
        [hex(0x2d6a4f), hex(0x3c8c69), hex(0x1f4a37)],
    ],
    crown: CrownConfig::Conifer {
        layers_min: 3,
        layers_max: 5,
        base_radius: 180.0,
        layer_height: 60.0,
    },
};

static OAK: SpeciesConfig = SpeciesConfig {
    bark: hex(0x4E342E),
    wood: hex(0xA1887F),
    trunk_min: 25.0,
    trunk_max: 50.0,
    palettes: &[
        [hex(0x3a5a40), hex(0x2a402d), hex(0x4a6b51)],
        [hex(0x588157), hex(0x4c704b), hex(0x658f64)],
        [hex(0xa3b18a), hex(0x8a9a5b), hex(0x7a8b6e)],
    ],
    crown: CrownConfig::Broadleaf {
        blob_count: 6,
        crown_min: 200.0,
        crown_max: 350.0,
    },
};

static BIRCH: SpeciesConfig = SpeciesConfig {
    bark: hex(0xCFD8DC),
    wood: hex(0xF5F5F5),
    trunk_min: 15.0,
    trunk_max: 30.0,
    palettes: &[
        [hex(0xdad7cd), hex(0xc4c1b4), hex(0xb0ad9f)],
        [hex(0x8f9e83), hex(0x76856a), hex(0xaebd9d)],
        [hex(0xa3b18a), hex(0x8f9e83), hex(0xb5c99a)],
    ],
    crown: CrownConfig::Broadleaf {
        blob_count: 5,
        crown_min: 180.0,
        crown_max: 300.0,
    },
};

// Draw offsets. Per-layer and per-blob draws add their index to a base.
const DRAW_PALETTE: u32 = 999;
const DRAW_TRUNK: u32 = 1;
const DRAW_LAYER_COUNT: u32 = 2;
const DRAW_CROWN: u32 = 3;
const DRAW_LAYER_RADIUS: u32 = 10;
const DRAW_LAYER_COLOR: u32 = 50;
const DRAW_LAYER_ANGLE: u32 = 99;
const DRAW_LAYER_POINTS: u32 = 400;
const DRAW_CENTER_COLOR: u32 = 100;
const DRAW_BLOB_COLOR: u32 = 150;
const DRAW_BLOB_JITTER: u32 = 200;
const DRAW_BLOB_RADIUS: u32 = 300;

/// One star-shaped layer of a conifer crown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConeLayer {
    pub radius: f64,
    /// Vertical draw offset from the trunk, negative is higher.
    pub offset_y: f64,
    pub points: u32,
    pub angle_offset: f64,
    pub color: Rgb,
}

/// One foliage blob of a broadleaf crown, relative to the trunk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoliageBlob {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: Rgb,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Crown {
    Conifer { layers: Vec<ConeLayer> },
    /// A central blob followed by a ring of surrounding blobs.
    Broadleaf { radius: f64, blobs: Vec<FoliageBlob> },
}

/// Everything the renderer needs to draw a tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeDescriptor {
    pub species: TreeSpecies,
    pub bark_color: Rgb,
    pub wood_color: Rgb,
    pub trunk_radius: f64,
    /// The single palette every crown colour is drawn from.
    pub palette: [Rgb; 3],
    pub crown: Crown,
}

/// Generates tree appearance from a species and seed coordinates.
pub struct TreeGenerator;

impl TreeGenerator {
    pub fn generate(species: TreeSpecies, seed_x: i64, seed_y: i64) -> TreeDescriptor {
        let config = species.config();
        let rng = SeedRng::new(seed_x, seed_y);

        // One palette per tree keeps the whole crown tonally consistent.
        let palette = *rng.pick(DRAW_PALETTE, config.palettes);
        let trunk_radius = rng.range(DRAW_TRUNK, config.trunk_min, config.trunk_max);

        let crown = match config.crown {
            CrownConfig::Conifer {
                layers_min,
                layers_max,
                base_radius,
                layer_height,
            } => {
                let span = (layers_max - layers_min + 1) as usize;
                let count = layers_min + rng.index(DRAW_LAYER_COUNT, span) as u32;
                let layers = (0..count)
                    .map(|i| {
                        let progress = f64::from(i) / f64::from(count);
                        ConeLayer {
                            radius: base_radius * (1.0 - progress * 0.8)
                                + rng.draw(DRAW_LAYER_RADIUS + i) * 30.0,
                            offset_y: -f64::from(i) * layer_height,
                            points: 7 + rng.index(DRAW_LAYER_POINTS + i, 3) as u32,
                            angle_offset: rng.draw(DRAW_LAYER_ANGLE + i) * PI,
                            color: *rng.pick(DRAW_LAYER_COLOR + i, &palette),
                        }
                    })
                    .collect();
                Crown::Conifer { layers }
            }
            CrownConfig::Broadleaf {
                blob_count,
                crown_min,
                crown_max,
            } => {
                let radius = rng.range(DRAW_CROWN, crown_min, crown_max);
                let mut blobs = Vec::with_capacity(blob_count as usize + 1);
                blobs.push(FoliageBlob {
                    x: 0.0,
                    y: 0.0,
                    radius: radius * 0.75,
                    color: *rng.pick(DRAW_CENTER_COLOR, &palette),
                });
                for i in 0..blob_count {
                    let angle = f64::from(i) / f64::from(blob_count) * TAU
                        + rng.draw(DRAW_BLOB_JITTER + i) * 0.5;
                    let dist = radius * 0.5;
                    blobs.push(FoliageBlob {
                        x: angle.cos() * dist,
                        y: angle.sin() * dist,
                        radius: radius * (0.4 + rng.draw(DRAW_BLOB_RADIUS + i) * 0.2),
                        color: *rng.pick(DRAW_BLOB_COLOR + i, &palette),
                    });
                }
                Crown::Broadleaf { radius, blobs }
            }
        };

        TreeDescriptor {
            species,
            bark_color: config.bark,
            wood_color: config.wood,
            trunk_radius,
            palette,
            crown,
        }
    }
}

impl TreeDescriptor {
    /// Every colour used by the crown.
    pub fn crown_colors(&self) -> Vec<Rgb> {
        match &self.crown {
            Crown::Conifer { layers } => layers.iter().map(|l| l.color).collect(),
            Crown::Broadleaf { blobs, .. } => blobs.iter().map(|b| b.color).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_seeds_identical_trees() {
        for species in TreeSpecies::all() {
            let a = TreeGenerator::generate(*species, 120, -33);
            let b = TreeGenerator::generate(*species, 120, -33);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn pine_is_layered_cone() {
        let tree = TreeGenerator::generate(TreeSpecies::Pine, 4, 8);
        let Crown::Conifer { layers } = &tree.crown else {
            panic!("pine should have a conifer crown");
        };
        assert!((3..=5).contains(&layers.len()));
        for layer in layers {
            assert!((7..=9).contains(&layer.points));
            assert!(layer.angle_offset >= 0.0 && layer.angle_offset < PI);
        }
        assert!((15.0..35.0).contains(&tree.trunk_radius));
    }

    #[test]
    fn conifer_layers_shrink_upward() {
        for seed in 0..20 {
            let tree = TreeGenerator::generate(TreeSpecies::Pine, seed, seed * 3);
            let Crown::Conifer { layers } = &tree.crown else {
                unreachable!();
            };
            let first = layers.first().unwrap();
            let last = layers.last().unwrap();
            assert!(last.offset_y < first.offset_y);
            assert!(last.radius < first.radius + 30.0);
        }
    }

    #[test]
    fn broadleaf_has_center_and_ring() {
        let oak = TreeGenerator::generate(TreeSpecies::Oak, 1, 2);
        let Crown::Broadleaf { radius, blobs } = &oak.crown else {
            panic!("oak should have a broadleaf crown");
        };
        assert_eq!(blobs.len(), 7);
        assert_eq!((blobs[0].x, blobs[0].y), (0.0, 0.0));
        assert!((200.0..350.0).contains(radius));

        let birch = TreeGenerator::generate(TreeSpecies::Birch, 1, 2);
        let Crown::Broadleaf { blobs, .. } = &birch.crown else {
            panic!("birch should have a broadleaf crown");
        };
        assert_eq!(blobs.len(), 6);
    }

    #[test]
    fn crown_uses_one_palette() {
        for seed in -15..15 {
            for species in TreeSpecies::all() {
                let tree = TreeGenerator::generate(*species, seed, 7 - seed);
                assert!(species.config().palettes.contains(&tree.palette));
                for color in tree.crown_colors() {
                    assert!(tree.palette.contains(&color));
                }
            }
        }
    }

    #[test]
    fn palettes_vary_across_trees() {
        let distinct: std::collections::HashSet<_> = (0..60)
            .map(|i| TreeGenerator::generate(TreeSpecies::Oak, i, i * 5).palette)
            .collect();
        assert!(distinct.len() > 1);
    }
}
