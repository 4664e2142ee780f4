//! Color table

use std::path::Path;

use super::palette::parse_colour_line;
use super::{ColorCode, ColorInfo, Rgba};
use crate::constants::{
    DARK_LUMA_THRESHOLD, DIRECT_TRANSLUCENT_ALPHA, EDGE_COLOR, MAIN_COLOR, PALETTE_ENTRY_COUNT,
};

/// Errors that can occur while loading a palette file
#[derive(Debug, Clone, thiserror::Error)]
pub enum PaletteError {
    #[error("Unable to read palette '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("Palette '{path}' contains no color definitions")]
    NoEntries { path: String },
}

/// Maps color codes to face/edge colors.
///
/// The reserved main (16) and edge (24) entries are always present, even when no
/// palette could be loaded. Every other code is invalid until a palette defines it.
/// Build one at start-up and share it (e.g. behind an `Arc`) with whatever needs
/// color lookups.
#[derive(Debug, Clone)]
pub struct ColorRegistry {
    entries: Vec<Option<ColorInfo>>,
}

impl Default for ColorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorRegistry {
    /// Create a registry holding only the reserved entries
    pub fn new() -> Self {
        let mut entries = vec![None; PALETTE_ENTRY_COUNT];
        entries[MAIN_COLOR as usize] = Some(ColorInfo {
            name: "Main color".to_string(),
            face: Rgba::opaque(0xAA, 0xAA, 0xAA),
            edge: Rgba::BLACK,
        });
        entries[EDGE_COLOR as usize] = Some(ColorInfo {
            name: "Edge color".to_string(),
            face: Rgba::BLACK,
            edge: Rgba::BLACK,
        });
        Self { entries }
    }

    /// Create a registry and load the palette at `path`.
    ///
    /// A missing or unusable palette is logged and leaves the registry with only
    /// the reserved entries.
    pub fn initialize(path: impl AsRef<Path>) -> Self {
        let mut registry = Self::new();
        match registry.load_palette_file(path.as_ref()) {
            Ok(count) => tracing::debug!("Loaded {} palette colors", count),
            Err(e) => tracing::warn!("{}; continuing without a palette", e),
        }
        registry
    }

    /// Load color definitions from a palette file, returning the number loaded
    pub fn load_palette_file(&mut self, path: impl AsRef<Path>) -> Result<usize, PaletteError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| PaletteError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        match self.load_palette_str(&text) {
            0 => Err(PaletteError::NoEntries {
                path: path.display().to_string(),
            }),
            count => Ok(count),
        }
    }

    /// Load color definitions from palette text, returning the number loaded.
    ///
    /// Lines that are not complete `!COLOUR` definitions, or whose code lies
    /// outside the table, are skipped.
    pub fn load_palette_str(&mut self, text: &str) -> usize {
        let mut count = 0;
        for line in text.lines() {
            let Some((code, info)) = parse_colour_line(line) else {
                continue;
            };
            match self.entries.get_mut(code) {
                Some(slot) => {
                    *slot = Some(info);
                    count += 1;
                }
                None => tracing::trace!("Palette code {} is outside the color table", code),
            }
        }
        count
    }

    /// Whether the code encodes RGB directly
    pub fn is_direct(&self, code: ColorCode) -> bool {
        code.is_direct()
    }

    /// Whether the code resolves to a color
    pub fn is_valid(&self, code: ColorCode) -> bool {
        code.is_direct() || self.table_entry(code).is_some()
    }

    /// Resolve a color code. `None` means the code is invalid (not black).
    pub fn lookup(&self, code: ColorCode) -> Option<ColorInfo> {
        if code.is_direct() {
            return Some(direct_color_info(code));
        }
        self.table_entry(code).cloned()
    }

    /// Face color of a code, if valid
    pub fn face_color(&self, code: ColorCode) -> Option<Rgba> {
        self.lookup(code).map(|info| info.face)
    }

    /// Edge color of a code, if valid
    pub fn edge_color(&self, code: ColorCode) -> Option<Rgba> {
        self.lookup(code).map(|info| info.edge)
    }

    /// Number of defined table entries (reserved ones included)
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// Check if the table has no entries at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over defined table entries in code order
    pub fn entries(&self) -> impl Iterator<Item = (ColorCode, &ColorInfo)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(code, entry)| entry.as_ref().map(|info| (ColorCode(code as u32), info)))
    }

    fn table_entry(&self, code: ColorCode) -> Option<&ColorInfo> {
        self.entries.get(code.index() as usize)?.as_ref()
    }
}

fn direct_color_info(code: ColorCode) -> ColorInfo {
    let rgb = code.index();
    let mut face = Rgba::opaque((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8);
    if code.is_translucent_direct() {
        face = face.with_alpha(DIRECT_TRANSLUCENT_ALPHA);
    }
    let edge = if face.luma() < DARK_LUMA_THRESHOLD {
        Rgba::WHITE
    } else {
        Rgba::BLACK
    };
    ColorInfo {
        name: code.to_string(),
        face,
        edge,
    }
}
