use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::seed::SeedRng;
use crate::{hex, Rgb};

const ROCK_SALT: u64 = 0x524f_434b;

static ROCK_PALETTES: [&[Rgb]; 5] = [
    &[hex(0x7f8c8d), hex(0x95a5a6), hex(0xbdc3c7), hex(0x636e72)],
    &[hex(0x2d3436), hex(0x4b4b4b), hex(0x596275), hex(0x303952)],
    &[hex(0xa0937d), hex(0xb08d74), hex(0xcdbba7), hex(0x8e7c68), hex(0xd6a889)],
    &[hex(0xbcaaa4), hex(0xa1887f), hex(0xd7ccc8), hex(0x8d6e63)],
    &[hex(0x7e8a76), hex(0x6b7d6a), hex(0x556b2f), hex(0x778a68)],
];

const DRAW_RADIUS: u32 = 0;
const DRAW_SEGMENTS: u32 = 1;
const DRAW_CRACKS: u32 = 2;
const DRAW_PALETTE: u32 = 3;
const DRAW_COLOR: u32 = 4;
const DRAW_OUTLINE: u32 = 100;
const DRAW_CRACK_ANGLE: u32 = 200;
const DRAW_CRACK_LEN: u32 = 300;

/// Boulders block movement; small stones can be picked up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RockSize {
    Small,
    Boulder,
}

impl RockSize {
    fn radius_range(&self) -> (f64, f64) {
        match self {
            Self::Small => (15.0, 30.0),
            Self::Boulder => (40.0, 70.0),
        }
    }

    /// Carry weight in kilograms.
    pub fn weight(&self) -> f64 {
        match self {
            Self::Small => 5.0,
            Self::Boulder => 100.0,
        }
    }
}

/// A surface crack, drawn as a segment from `a` to `b`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Crack {
    pub a: [f64; 2],
    pub b: [f64; 2],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RockDescriptor {
    pub size: RockSize,
    pub radius: f64,
    /// Polygon vertices relative to the rock centre.
    pub outline: Vec<[f64; 2]>,
    pub cracks: Vec<Crack>,
    pub color: Rgb,
}

pub struct RockGenerator;

impl RockGenerator {
    pub fn generate(size: RockSize, seed_x: i64, seed_y: i64) -> RockDescriptor {
        let rng = SeedRng::with_salt(seed_x, seed_y, ROCK_SALT);
        let (min, max) = size.radius_range();
        let radius = rng.range(DRAW_RADIUS, min, max);

        let segments = 7 + rng.index(DRAW_SEGMENTS, 5) as u32;
        let outline = (0..segments)
            .map(|i| {
                let angle = f64::from(i) / f64::from(segments) * TAU;
                let r = radius * rng.range(DRAW_OUTLINE + i, 0.8, 1.2);
                [angle.cos() * r, angle.sin() * r]
            })
            .collect();

        let crack_count = rng.index(DRAW_CRACKS, 3) as u32;
        let cracks = (0..crack_count)
            .map(|i| {
                let angle = rng.draw(DRAW_CRACK_ANGLE + i) * TAU;
                let len = radius * rng.range(DRAW_CRACK_LEN + i, 0.3, 0.9);
                Crack {
                    a: [angle.cos() * radius * 0.9, angle.sin() * radius * 0.9],
                    b: [(angle + PI).cos() * len * 0.2, (angle + PI).sin() * len * 0.2],
                }
            })
            .collect();

        let palette = rng.pick(DRAW_PALETTE, &ROCK_PALETTES);
        let color = *rng.pick(DRAW_COLOR, palette);

        RockDescriptor {
            size,
            radius,
            outline,
            cracks,
            color,
        }
    }
}
