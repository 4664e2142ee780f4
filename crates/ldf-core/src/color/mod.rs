//! LDraw colors
//!
//! - `ColorCode`: the numeric color field of an LDraw statement
//! - `Rgba`: an 8-bit-per-channel color value
//! - `ColorRegistry`: code -> face/edge color table loaded from a palette file

mod palette;
mod registry;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DIRECT_COLOR_THRESHOLD, DIRECT_TRANSLUCENT_THRESHOLD, EDGE_COLOR, MAIN_COLOR,
};

pub use registry::{ColorRegistry, PaletteError};

/// Numeric LDraw color code.
///
/// Codes below [`DIRECT_COLOR_THRESHOLD`] name palette entries, codes at or above it
/// encode an RGB value in their low 24 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorCode(pub u32);

impl ColorCode {
    /// Inherit the main color of the referencing context
    pub const MAIN: ColorCode = ColorCode(MAIN_COLOR);
    /// Inherit the edge color of the referencing context
    pub const EDGE: ColorCode = ColorCode(EDGE_COLOR);

    /// Raw code value
    pub fn index(self) -> u32 {
        self.0
    }

    /// Whether the code encodes RGB directly instead of naming a palette entry
    pub fn is_direct(self) -> bool {
        self.0 >= DIRECT_COLOR_THRESHOLD
    }

    /// Whether a direct color is drawn half transparent
    pub fn is_translucent_direct(self) -> bool {
        self.0 >= DIRECT_TRANSLUCENT_THRESHOLD
    }

    /// Build a direct color code from RGB components
    pub fn direct(red: u8, green: u8, blue: u8, translucent: bool) -> Self {
        let base = if translucent {
            DIRECT_TRANSLUCENT_THRESHOLD
        } else {
            DIRECT_COLOR_THRESHOLD
        };
        Self(base | (u32::from(red) << 16) | (u32::from(green) << 8) | u32::from(blue))
    }

    /// Parse a color token: decimal (`16`) or hexadecimal (`0x2FF0000`)
    pub fn parse(token: &str) -> Option<Self> {
        let value = match token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
        {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None if token.bytes().all(|b| b.is_ascii_digit()) => token.parse().ok()?,
            None => return None,
        };
        Some(Self(value))
    }
}

impl Default for ColorCode {
    fn default() -> Self {
        Self::MAIN
    }
}

impl From<u32> for ColorCode {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// LDraw form: decimal for palette colors, `0x` upper-case hex for direct colors
impl fmt::Display for ColorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_direct() {
            write!(f, "0x{:X}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// An RGBA color value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);

    /// Create a fully opaque color
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RRGGBB`
    pub fn from_hex(text: &str) -> Option<Self> {
        let hex = text.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Self::opaque(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// `#RRGGBB` form (alpha omitted)
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Perceived brightness (Rec. 709 weights), 0..=255
    pub fn luma(&self) -> f32 {
        0.2126 * f32::from(self.r) + 0.7152 * f32::from(self.g) + 0.0722 * f32::from(self.b)
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// A resolved color: display name plus face and edge values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorInfo {
    pub name: String,
    pub face: Rgba,
    pub edge: Rgba,
}
