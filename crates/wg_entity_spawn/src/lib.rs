//! Content generators for flora, rocks and ground clutter.
//!
//! Every generator is a pure function of its inputs. Randomness comes from
//! [`SeedRng`], a hash of the entity's seed coordinates, never from an ambient
//! random source.

pub mod decoration;
pub mod grass;
pub mod rock;
pub mod seed;
pub mod tree;

pub use decoration::{DecorationDescriptor, DecorationGenerator, DecorationKind};
pub use grass::{GrassCover, GrassGenerator};
pub use rock::{Crack, RockDescriptor, RockGenerator, RockSize};
pub use seed::{tile_seed, SeedRng};
pub use tree::{ConeLayer, Crown, FoliageBlob, TreeDescriptor, TreeGenerator, TreeSpecies};

/// An sRGB colour as stored in descriptors.
pub type Rgb = [u8; 3];

/// Unpack a `0xRRGGBB` literal.
pub const fn hex(rgb: u32) -> Rgb {
    [(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8]
}
