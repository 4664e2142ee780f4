//! Undo/redo history
//!
//! Each [`HistoryEntry`] is one user action, made of [`Change`]s that carry value
//! snapshots of the objects involved. Replaying an entry only needs the entry and
//! the document it was recorded against.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::document::{Document, DocumentError};
use crate::object::LdObject;

/// One reversible document mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Change {
    Insert {
        index: usize,
        object: LdObject,
    },
    Remove {
        index: usize,
        object: LdObject,
    },
    Modify {
        index: usize,
        before: LdObject,
        after: LdObject,
    },
    Swap {
        first: usize,
        second: usize,
    },
    ReplaceRange {
        index: usize,
        removed: Vec<LdObject>,
        inserted: Vec<LdObject>,
    },
    SetContents {
        before: Vec<LdObject>,
        after: Vec<LdObject>,
    },
}

impl Change {
    /// Apply the change to `document`
    pub fn apply(&self, document: &mut Document) -> Result<(), DocumentError> {
        match self {
            Change::Insert { index, object } => document.insert(*index, object.clone()),
            Change::Remove { index, .. } => {
                document.remove_at(*index);
            }
            Change::Modify { index, after, .. } => {
                document.set_object(*index, after.clone());
            }
            Change::Swap { first, second } => document.swap(*first, *second),
            Change::ReplaceRange {
                index,
                removed,
                inserted,
            } => {
                document.replace_range(span(*index, removed), inserted.clone())?;
            }
            Change::SetContents { after, .. } => {
                document.set_contents(after.clone());
            }
        }
        Ok(())
    }

    /// Undo the change on `document`
    pub fn revert(&self, document: &mut Document) -> Result<(), DocumentError> {
        match self {
            Change::Insert { index, .. } => {
                document.remove_at(*index);
            }
            Change::Remove { index, object } => document.insert(*index, object.clone()),
            Change::Modify { index, before, .. } => {
                document.set_object(*index, before.clone());
            }
            Change::Swap { first, second } => document.swap(*first, *second),
            Change::ReplaceRange {
                index,
                removed,
                inserted,
            } => {
                document.replace_range(span(*index, inserted), removed.clone())?;
            }
            Change::SetContents { before, .. } => {
                document.set_contents(before.clone());
            }
        }
        Ok(())
    }
}

fn span(index: usize, objects: &[LdObject]) -> Range<usize> {
    index..index + objects.len()
}

/// One undoable user action
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Shown in undo/redo menus, e.g. "Move 2 triangles"
    pub description: String,
    /// Changes in the order they were made
    pub changes: Vec<Change>,
}

impl HistoryEntry {
    /// Create an empty entry
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            changes: Vec::new(),
        }
    }

    /// Add a change
    pub fn push(&mut self, change: Change) {
        self.changes.push(change);
    }

    /// Check if the entry has no changes
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Re-apply every change in order. On failure the document is left as it
    /// was before the call.
    pub fn apply(&self, document: &mut Document) -> Result<(), DocumentError> {
        replay_all(self.changes.iter(), document, Change::apply, Change::revert)
    }

    /// Revert every change in reverse order. On failure the document is left
    /// as it was before the call.
    pub fn revert(&self, document: &mut Document) -> Result<(), DocumentError> {
        replay_all(
            self.changes.iter().rev(),
            document,
            Change::revert,
            Change::apply,
        )
    }
}

type Step = fn(&Change, &mut Document) -> Result<(), DocumentError>;

/// Run `forward` on each change; if one fails, run `backward` on those already
/// done, newest first
fn replay_all<'c>(
    changes: impl Iterator<Item = &'c Change>,
    document: &mut Document,
    forward: Step,
    backward: Step,
) -> Result<(), DocumentError> {
    let mut done = Vec::new();
    for change in changes {
        tracing::trace!("Replaying {:?}", change);
        if let Err(e) = forward(change, document) {
            for change in done.into_iter().rev() {
                if let Err(inner) = backward(change, document) {
                    tracing::error!("Could not restore {:?}: {}", change, inner);
                }
            }
            return Err(e);
        }
        done.push(change);
    }
    Ok(())
}

/// Linear undo log with a cursor.
///
/// `position` is the number of applied entries. Recording while undone drops the
/// entries after the cursor; there is no branching.
#[derive(Debug, Clone)]
pub struct EditHistory {
    entries: Vec<HistoryEntry>,
    position: usize,
    /// Cursor position at the last save; `None` once that state was discarded
    saved_position: Option<usize>,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl EditHistory {
    /// Create an empty history whose start is the saved state
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            position: 0,
            saved_position: Some(0),
        }
    }

    /// Record an entry that has already been applied to the document.
    /// Entries without changes are ignored.
    pub fn record(&mut self, entry: HistoryEntry) {
        if entry.is_empty() {
            return;
        }

        // If we're undone, remove entries after the cursor
        if self.position < self.entries.len() {
            self.entries.truncate(self.position);
            if self.saved_position.is_some_and(|saved| saved > self.position) {
                self.saved_position = None;
            }
        }

        tracing::debug!("Recorded '{}' ({} changes)", entry.description, entry.changes.len());
        self.entries.push(entry);
        self.position += 1;
    }

    /// Undo the entry before the cursor. Returns `false` if there is nothing to undo.
    pub fn undo(&mut self, document: &mut Document) -> bool {
        if !self.can_undo() {
            return false;
        }

        let entry = &self.entries[self.position - 1];
        if let Err(e) = entry.revert(document) {
            tracing::error!("Undo of '{}' failed: {}", entry.description, e);
            return false;
        }

        tracing::debug!("Undo '{}'", entry.description);
        self.position -= 1;
        true
    }

    /// Redo the entry after the cursor. Returns `false` if there is nothing to redo.
    pub fn redo(&mut self, document: &mut Document) -> bool {
        if !self.can_redo() {
            return false;
        }

        let entry = &self.entries[self.position];
        if let Err(e) = entry.apply(document) {
            tracing::error!("Redo of '{}' failed: {}", entry.description, e);
            return false;
        }

        tracing::debug!("Redo '{}'", entry.description);
        self.position += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.position > 0
    }

    pub fn can_redo(&self) -> bool {
        self.position < self.entries.len()
    }

    /// Description of the entry `undo` would revert
    pub fn undo_description(&self) -> Option<&str> {
        self.position
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(|e| e.description.as_str())
    }

    /// Description of the entry `redo` would apply
    pub fn redo_description(&self) -> Option<&str> {
        self.entries
            .get(self.position)
            .map(|e| e.description.as_str())
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of applied entries
    pub fn position(&self) -> usize {
        self.position
    }

    /// All recorded entries, applied ones first
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Drop every entry; the current state becomes the start of history
    pub fn clear(&mut self) {
        let at_saved = self.is_at_saved_position();
        self.entries.clear();
        self.position = 0;
        self.saved_position = at_saved.then_some(0);
    }

    /// Remember the current cursor as the saved state
    pub fn mark_saved(&mut self) {
        self.saved_position = Some(self.position);
    }

    /// Whether the cursor is where the document was last saved
    pub fn is_at_saved_position(&self) -> bool {
        self.saved_position == Some(self.position)
    }
}
