use bevy::color::{Hsla, Srgba};
use serde::{Deserialize, Serialize};

use crate::Rgb;

/// Ground cover styling for a grassy tile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrassCover {
    /// Hue in degrees, from dry yellow (~80) to lush green (~130).
    pub hue: f32,
    /// Saturation in `[0, 1]`.
    pub saturation: f32,
    /// Lightness in `[0, 1]`.
    pub lightness: f32,
    /// How strongly the renderer overlays the grass texture.
    pub intensity: f32,
}

impl GrassCover {
    pub fn rgb(&self) -> Rgb {
        let c = Srgba::from(Hsla::hsl(self.hue, self.saturation, self.lightness));
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [channel(c.red), channel(c.green), channel(c.blue)]
    }
}

/// Decides whether a tile is grass-covered and how it looks.
pub struct GrassGenerator;

impl GrassGenerator {
    const MIN_SOIL: f64 = 0.35;
    const MIN_MOISTURE: f64 = 0.25;

    /// `soil` and `moisture` are in `[0, 1]`; `detail` is a noise sample in `[-1, 1]`.
    pub fn generate(soil: f64, moisture: f64, detail: f64) -> Option<GrassCover> {
        if soil <= Self::MIN_SOIL || moisture <= Self::MIN_MOISTURE {
            return None;
        }

        let hue = 80.0 + moisture * 40.0 + detail * 10.0;
        let saturation = (30.0 + moisture * 40.0) / 100.0;
        let lightness = (60.0 - moisture * 20.0 - detail * 10.0) / 100.0;

        Some(GrassCover {
            hue: hue.rem_euclid(360.0) as f32,
            saturation: saturation.clamp(0.0, 1.0) as f32,
            lightness: lightness.clamp(0.0, 1.0) as f32,
            intensity: (0.1 + detail * 0.2) as f32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_or_poor_soil_has_no_grass() {
        assert!(GrassGenerator::generate(0.2, 0.9, 0.0).is_none());
        assert!(GrassGenerator::generate(0.9, 0.1, 0.0).is_none());
    }

    #[test]
    fn wetter_grass_is_greener() {
        let dry = GrassGenerator::generate(0.8, 0.3, 0.0).unwrap();
        let wet = GrassGenerator::generate(0.8, 0.9, 0.0).unwrap();
        assert!(wet.hue > dry.hue);
        assert!(wet.saturation > dry.saturation);
        assert!(wet.lightness < dry.lightness);
    }

    #[test]
    fn rgb_is_greenish() {
        let cover = GrassGenerator::generate(0.8, 0.8, 0.0).unwrap();
        let [r, g, b] = cover.rgb();
        assert!(g > r && g > b);
    }
}
