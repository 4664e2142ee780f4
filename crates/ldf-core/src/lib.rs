//! LDraw Document Model for LDForge
//!
//! This crate provides:
//! - Vertex, matrix and bounding box primitives with tolerant comparison
//! - Color codes and the palette-backed color registry
//! - The LDraw statement types and a line parser that never fails
//! - Documents with change events, and an undo/redo history of value snapshots
//! - Editor sessions grouping edits into undoable transactions
//! - Subfile inlining through a document library
//! - Chunked loading, saving and RON configuration

pub mod color;
pub mod config;
pub mod constants;
pub mod document;
pub mod history;
pub mod library;
pub mod loader;
pub mod math;
pub mod object;
pub mod parser;
pub mod session;

// Re-exports for convenience
pub use color::{ColorCode, ColorInfo, ColorRegistry, PaletteError, Rgba};
pub use config::{ConfigError, CoreConfig};
pub use document::{Document, DocumentError, DocumentEvent};
pub use history::{Change, EditHistory, HistoryEntry};
pub use library::{DocumentResolver, InlineError, Library, inline_reference};
pub use loader::{
    DocumentLoader, LoadError, LoadProgress, load_chunked, load_file, load_str, read_text,
    save_file,
};
pub use math::{BoundingBox, Matrix, Vertex};
pub use object::{BfcStatement, LdObject, ObjectKind, describe_objects, format_number};
pub use parser::{NumberSyntax, ParseError, ParseOptions, parse_line};
pub use session::{
    EditError, EditorSession, SharedSession, Transaction, create_shared_session,
};
