//! Palette (`LDConfig.ldr`) line parsing
//!
//! A palette line looks like
//! `0 !COLOUR Black CODE 0 VALUE #1B2A34 EDGE #2B4354 [ALPHA 128]`.
//! Tags may appear in any order after the name, so they are located by scanning.

use super::{ColorInfo, Rgba};

/// Whitespace-separated tokens of one palette line
struct TagScanner<'a> {
    tokens: Vec<&'a str>,
}

impl<'a> TagScanner<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            tokens: line.split_whitespace().collect(),
        }
    }

    fn token(&self, position: usize) -> Option<&'a str> {
        self.tokens.get(position).copied()
    }

    /// Value following the first occurrence of `tag`
    fn tag(&self, tag: &str) -> Option<&'a str> {
        let position = self.tokens.iter().position(|t| *t == tag)?;
        self.token(position + 1)
    }
}

/// Parse one `!COLOUR` line into `(code, info)`.
///
/// Returns `None` for anything that is not a complete color definition; callers
/// skip such lines.
pub(crate) fn parse_colour_line(line: &str) -> Option<(usize, ColorInfo)> {
    let scanner = TagScanner::new(line);

    if scanner.token(0)? != "0" || scanner.token(1)? != "!COLOUR" {
        return None;
    }

    let name = scanner.token(2)?.replace('_', " ");
    let code: usize = scanner.tag("CODE")?.parse().ok()?;
    let mut face = Rgba::from_hex(scanner.tag("VALUE")?)?;
    let edge = Rgba::from_hex(scanner.tag("EDGE")?)?;

    if let Some(alpha) = scanner.tag("ALPHA").and_then(|a| a.parse::<i64>().ok()) {
        face = face.with_alpha(alpha.clamp(0, 255) as u8);
    }

    Some((code, ColorInfo { name, face, edge }))
}
