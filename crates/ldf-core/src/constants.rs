//! Global constants for ldf-core

/// Absolute tolerance for vertex and matrix comparisons
pub const VERTEX_EPSILON: f64 = 1e-6;

/// Number of entries in the color table (codes 0..PALETTE_ENTRY_COUNT)
pub const PALETTE_ENTRY_COUNT: usize = 512;

/// Color code meaning "draw in the inherited main color"
pub const MAIN_COLOR: u32 = 16;

/// Color code meaning "draw in the inherited edge color"
pub const EDGE_COLOR: u32 = 24;

/// First color code that encodes an RGB value directly
pub const DIRECT_COLOR_THRESHOLD: u32 = 0x0200_0000;

/// First direct color code that is drawn half transparent
pub const DIRECT_TRANSLUCENT_THRESHOLD: u32 = 0x0300_0000;

/// Alpha used for translucent direct colors
pub const DIRECT_TRANSLUCENT_ALPHA: u8 = 128;

/// Luma below which a direct color gets a white edge
pub const DARK_LUMA_THRESHOLD: f32 = 48.0;

/// Default number of lines parsed per loader step
pub const LOAD_CHUNK_SIZE: usize = 300;

/// Maximum nesting when inlining subfile references
pub const MAX_INLINE_DEPTH: usize = 64;

/// Line terminator used when writing LDraw files
pub const LINE_ENDING: &str = "\r\n";
