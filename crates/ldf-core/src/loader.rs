//! Loading and saving LDraw files
//!
//! [`DocumentLoader`] parses a file a chunk of lines at a time so a host can
//! report progress or stop early; [`load_str`] and [`load_file`] simply run it to
//! completion.

use std::path::Path;

use crate::constants::LOAD_CHUNK_SIZE;
use crate::document::Document;
use crate::object::LdObject;
use crate::parser::{ParseOptions, parse_line};

/// File errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error("Unable to read '{path}': {reason}")]
    Read { path: String, reason: String },

    #[error("Unable to write '{path}': {reason}")]
    Write { path: String, reason: String },
}

/// How far a [`DocumentLoader`] has come
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    /// Lines parsed so far
    pub lines_done: usize,
    /// Lines in the whole text
    pub total_lines: usize,
    /// Lines that failed to parse so far
    pub errors: usize,
}

impl LoadProgress {
    pub fn is_complete(&self) -> bool {
        self.lines_done >= self.total_lines
    }

    /// Fraction done, 0.0..=1.0
    pub fn fraction(&self) -> f64 {
        if self.total_lines == 0 {
            1.0
        } else {
            self.lines_done as f64 / self.total_lines as f64
        }
    }
}

/// Incremental parser for one document's text
#[derive(Debug)]
pub struct DocumentLoader<'a> {
    name: String,
    lines: Vec<&'a str>,
    options: ParseOptions,
    objects: Vec<LdObject>,
    errors: usize,
}

impl<'a> DocumentLoader<'a> {
    pub fn new(name: impl Into<String>, text: &'a str, options: ParseOptions) -> Self {
        let lines: Vec<&str> = text.lines().collect();
        Self {
            name: name.into(),
            objects: Vec::with_capacity(lines.len()),
            lines,
            options,
            errors: 0,
        }
    }

    /// Parse up to `max_lines` more lines
    pub fn step(&mut self, max_lines: usize) -> LoadProgress {
        let start = self.objects.len();
        let end = (start + max_lines).min(self.lines.len());

        for (offset, raw) in self.lines[start..end].iter().enumerate() {
            let object = parse_line(raw.trim(), &self.options);
            if let LdObject::Error { text, reason } = &object {
                self.errors += 1;
                tracing::warn!(
                    "{}:{}: {} (`{}`)",
                    self.name,
                    start + offset + 1,
                    reason,
                    text
                );
            }
            self.objects.push(object);
        }

        self.progress()
    }

    pub fn is_done(&self) -> bool {
        self.objects.len() >= self.lines.len()
    }

    pub fn progress(&self) -> LoadProgress {
        LoadProgress {
            lines_done: self.objects.len(),
            total_lines: self.lines.len(),
            errors: self.errors,
        }
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    /// The document built so far. Stopping before [`is_done`](Self::is_done)
    /// gives a valid, partial document.
    pub fn finish(self) -> Document {
        tracing::debug!(
            "Loaded '{}': {} objects, {} errors",
            self.name,
            self.objects.len(),
            self.errors
        );
        Document::with_objects(self.name, self.objects)
    }
}

/// Parse a whole document from text
pub fn load_str(name: impl Into<String>, text: &str, options: ParseOptions) -> Document {
    load_chunked(name, text, options, LOAD_CHUNK_SIZE)
}

/// Parse a whole document, `chunk_size` lines per step
pub fn load_chunked(
    name: impl Into<String>,
    text: &str,
    options: ParseOptions,
    chunk_size: usize,
) -> Document {
    let mut loader = DocumentLoader::new(name, text, options);
    while !loader.is_done() {
        loader.step(chunk_size.max(1));
    }
    loader.finish()
}

/// Read the text of an LDraw file.
///
/// Bytes that are not valid UTF-8 (Latin-1 author names, say) are replaced
/// rather than rejected.
pub fn read_text(path: impl AsRef<Path>) -> Result<String, LoadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| LoadError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read and parse an LDraw file. The document is named after the file.
pub fn load_file(path: impl AsRef<Path>, options: ParseOptions) -> Result<Document, LoadError> {
    let path = path.as_ref();
    let text = read_text(path)?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(load_str(name, &text, options))
}

/// Write `document` as LDraw text with CRLF line endings
pub fn save_file(document: &Document, path: impl AsRef<Path>) -> Result<(), LoadError> {
    let path = path.as_ref();
    std::fs::write(path, document.to_ldraw_string()).map_err(|e| LoadError::Write {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    tracing::debug!("Saved '{}' to {}", document.name, path.display());
    Ok(())
}
