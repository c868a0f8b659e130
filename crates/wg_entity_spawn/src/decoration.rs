use serde::{Deserialize, Serialize};

use crate::seed::SeedRng;
use crate::{hex, Rgb};

const DECORATION_SALT: u64 = 0x4445_434f;

const FLOWER_COLORS: [Rgb; 6] = [
    hex(0xff4757),
    hex(0xffa502),
    hex(0x3742fa),
    hex(0xe84393),
    hex(0xf1c40f),
    hex(0xffffff),
];
const PEBBLE_COLORS: [Rgb; 4] = [hex(0x7f8c8d), hex(0x95a5a6), hex(0xa0937d), hex(0x556b2f)];
const BUSH_COLORS: [Rgb; 2] = [hex(0x2d6a4f), hex(0x1b4332)];

/// Small ground clutter. Never blocks movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecorationKind {
    Flower,
    Pebble,
    Bush,
    Weed,
}

impl DecorationKind {
    pub fn all() -> &'static [DecorationKind] {
        &[Self::Flower, Self::Pebble, Self::Bush, Self::Weed]
    }

    /// Carry weight in kilograms.
    pub fn weight(&self) -> f64 {
        match self {
            Self::Flower => 0.1,
            Self::Pebble => 2.0,
            Self::Bush => 1.0,
            Self::Weed => 0.2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Flower => "Flower",
            Self::Pebble => "Pebble",
            Self::Bush => "Bush",
            Self::Weed => "Weed",
        }
    }

    fn salt(&self) -> u64 {
        DECORATION_SALT + *self as u64
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DecorationDescriptor {
    Flower { color: Rgb, petals: u32 },
    Pebble { radius: f64, color: Rgb },
    Bush { size: f64, color: Rgb },
    Weed,
}

impl DecorationDescriptor {
    pub fn kind(&self) -> DecorationKind {
        match self {
            Self::Flower { .. } => DecorationKind::Flower,
            Self::Pebble { .. } => DecorationKind::Pebble,
            Self::Bush { .. } => DecorationKind::Bush,
            Self::Weed => DecorationKind::Weed,
        }
    }
}

pub struct DecorationGenerator;

impl DecorationGenerator {
    pub fn generate(kind: DecorationKind, seed_x: i64, seed_y: i64) -> DecorationDescriptor {
        let rng = SeedRng::with_salt(seed_x, seed_y, kind.salt());
        match kind {
            DecorationKind::Flower => DecorationDescriptor::Flower {
                color: *rng.pick(0, &FLOWER_COLORS),
                petals: 4 + rng.index(1, 3) as u32,
            },
            DecorationKind::Pebble => DecorationDescriptor::Pebble {
                radius: rng.range(0, 3.0, 7.0),
                color: *rng.pick(1, &PEBBLE_COLORS),
            },
            DecorationKind::Bush => DecorationDescriptor::Bush {
                size: rng.range(0, 15.0, 25.0),
                color: *rng.pick(1, &BUSH_COLORS),
            },
            DecorationKind::Weed => DecorationDescriptor::Weed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_matches_kind() {
        for kind in DecorationKind::all() {
            let d = DecorationGenerator::generate(*kind, 10, 20);
            assert_eq!(d.kind(), *kind);
            assert_eq!(d, DecorationGenerator::generate(*kind, 10, 20));
        }
    }

    #[test]
    fn flower_petals_in_range() {
        for seed in 0..40 {
            let DecorationDescriptor::Flower { petals, color } =
                DecorationGenerator::generate(DecorationKind::Flower, seed, 1)
            else {
                unreachable!();
            };
            assert!((4..=6).contains(&petals));
            assert!(FLOWER_COLORS.contains(&color));
        }
    }
}
