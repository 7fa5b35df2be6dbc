//! Display colors carried by tiles and entities.
//!
//! The simulation never reads these; they travel with the data so a renderer
//! can paint a snapshot without its own lookup tables.

use std::fmt;
use serde::{Serialize, Deserialize};

/// 24-bit RGB color (0xRRGGBB).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Self = Self(0xFFFFFF);
    pub const YELLOW: Self = Self(0xECD078);
    pub const BRICK: Self = Self(0xD95B43);
    pub const PINK: Self = Self(0xC02942);
    pub const PURPLE: Self = Self(0x542437);
    pub const GREY: Self = Self(0x333333);
    pub const SLATE: Self = Self(0x53777A);

    /// Red, green and blue channels.
    pub const fn rgb(self) -> (u8, u8, u8) {
        ((self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8)
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}
