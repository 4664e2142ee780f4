//! Editing context
//!
//! An [`EditorSession`] pairs a [`Document`] with its [`EditHistory`] and is the
//! only way user edits reach the document, so every edit is undoable. Edits are
//! made inside a [`Transaction`], which collects the changes of one user action
//! and records them as a single history entry when it is dropped.

use std::ops::Range;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::document::{Document, DocumentError, DocumentEvent, bounding_box_of};
use crate::history::{Change, EditHistory, HistoryEntry};
use crate::library::{DocumentResolver, InlineError, inline_reference};
use crate::loader::{LoadError, save_file};
use crate::math::{Matrix, Vertex};
use crate::object::{BfcStatement, LdObject, describe_objects};

/// Shared session for hosts that edit from several threads
pub type SharedSession = Arc<Mutex<EditorSession>>;

/// Create a new shared session around `document`
pub fn create_shared_session(document: Document) -> SharedSession {
    Arc::new(Mutex::new(EditorSession::new(document)))
}

/// Errors from compound edits
#[derive(Debug, Clone, thiserror::Error)]
pub enum EditError {
    #[error("Inline error: {0}")]
    Inline(#[from] InlineError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
}

/// A document being edited, with its undo history
#[derive(Debug, Default)]
pub struct EditorSession {
    document: Document,
    history: EditHistory,
}

impl EditorSession {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            history: EditHistory::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    /// Give up the session, keeping the document
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Start a group of edits recorded as one history entry
    pub fn transaction(&mut self, description: impl Into<String>) -> Transaction<'_> {
        Transaction {
            session: self,
            entry: HistoryEntry::new(description),
        }
    }

    // ============== Single-step edits ==============

    pub fn append(&mut self, object: LdObject) -> usize {
        let description = format!("Add {}", object.kind());
        self.transaction(description).append(object)
    }

    pub fn insert(&mut self, index: usize, object: LdObject) {
        let description = format!("Add {}", object.kind());
        self.transaction(description).insert(index, object);
    }

    pub fn remove(&mut self, index: usize) -> LdObject {
        self.transaction("Delete").remove(index)
    }

    pub fn set_object(&mut self, index: usize, object: LdObject) -> LdObject {
        let description = format!("Edit {}", object.kind());
        self.transaction(description).set_object(index, object)
    }

    pub fn swap(&mut self, first: usize, second: usize) {
        self.transaction("Reorder").swap(first, second);
    }

    pub fn replace_range(
        &mut self,
        range: Range<usize>,
        objects: Vec<LdObject>,
    ) -> Result<Vec<LdObject>, DocumentError> {
        self.transaction("Replace").replace_range(range, objects)
    }

    pub fn set_contents(&mut self, objects: Vec<LdObject>) -> Vec<LdObject> {
        self.transaction("Replace contents").set_contents(objects)
    }

    pub fn move_objects(&mut self, indices: &[usize], vector: Vertex) {
        let description = format!("Move {}", self.describe(indices));
        self.transaction(description).move_objects(indices, vector);
    }

    pub fn invert_objects(&mut self, indices: &[usize]) {
        let description = format!("Invert {}", self.describe(indices));
        self.transaction(description).invert_objects(indices);
    }

    pub fn rotate_objects(
        &mut self,
        indices: &[usize],
        axis: Vertex,
        angle: f64,
        pivot: Option<Vertex>,
    ) {
        let description = format!("Rotate {}", self.describe(indices));
        self.transaction(description)
            .rotate_objects(indices, axis, angle, pivot);
    }

    pub fn split_quads(&mut self, indices: &[usize]) -> Result<usize, DocumentError> {
        self.transaction("Split quadrilaterals").split_quads(indices)
    }

    pub fn flatten_reference(
        &mut self,
        index: usize,
        resolver: &dyn DocumentResolver,
        deep: bool,
    ) -> Result<usize, EditError> {
        self.transaction("Inline subfile")
            .flatten_reference(index, resolver, deep)
    }

    fn describe(&self, indices: &[usize]) -> String {
        describe_objects(indices.iter().filter_map(|&i| self.document.get(i)))
    }

    // ============== History ==============

    /// Undo the last action. Returns `false` if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo(&mut self.document);
        self.sync_saved_state();
        undone
    }

    /// Redo the next action. Returns `false` if there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let redone = self.history.redo(&mut self.document);
        self.sync_saved_state();
        redone
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn sync_saved_state(&mut self) {
        if self.history.is_at_saved_position() {
            self.document.mark_saved();
        }
    }

    // ============== Saving ==============

    /// Whether the document differs from its last saved state
    pub fn is_modified(&self) -> bool {
        self.document.is_modified()
    }

    /// Mark the current state as saved
    pub fn mark_saved(&mut self) {
        self.document.mark_saved();
        self.history.mark_saved();
    }

    /// Write the document to `path` and mark it saved
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        save_file(&self.document, path)?;
        self.mark_saved();
        Ok(())
    }

    /// Take pending document change events
    pub fn take_events(&mut self) -> Vec<DocumentEvent> {
        self.document.take_events()
    }
}

/// A group of edits that undo and redo together.
///
/// Recorded into the session's history when dropped; a transaction that made no
/// changes leaves no entry.
pub struct Transaction<'a> {
    session: &'a mut EditorSession,
    entry: HistoryEntry,
}

impl Transaction<'_> {
    pub fn document(&self) -> &Document {
        &self.session.document
    }

    /// Undo everything done so far in this transaction and record nothing
    pub fn rollback(mut self) {
        let entry = std::mem::take(&mut self.entry);
        if let Err(e) = entry.revert(&mut self.session.document) {
            tracing::error!("Rollback of '{}' failed: {}", entry.description, e);
        }
    }

    fn document_mut(&mut self) -> &mut Document {
        &mut self.session.document
    }

    pub fn append(&mut self, object: LdObject) -> usize {
        let index = self.document().len();
        self.insert(index, object);
        index
    }

    pub fn insert(&mut self, index: usize, object: LdObject) {
        self.document_mut().insert(index, object.clone());
        self.entry.push(Change::Insert { index, object });
    }

    pub fn remove(&mut self, index: usize) -> LdObject {
        let object = self.document_mut().remove_at(index);
        self.entry.push(Change::Remove {
            index,
            object: object.clone(),
        });
        object
    }

    pub fn set_object(&mut self, index: usize, object: LdObject) -> LdObject {
        let before = self.document_mut().set_object(index, object.clone());
        self.entry.push(Change::Modify {
            index,
            before: before.clone(),
            after: object,
        });
        before
    }

    pub fn swap(&mut self, first: usize, second: usize) {
        self.document_mut().swap(first, second);
        self.entry.push(Change::Swap { first, second });
    }

    pub fn replace_range(
        &mut self,
        range: Range<usize>,
        objects: Vec<LdObject>,
    ) -> Result<Vec<LdObject>, DocumentError> {
        let index = range.start;
        let removed = self
            .document_mut()
            .replace_range(range, objects.clone())?;
        self.entry.push(Change::ReplaceRange {
            index,
            removed: removed.clone(),
            inserted: objects,
        });
        Ok(removed)
    }

    pub fn set_contents(&mut self, objects: Vec<LdObject>) -> Vec<LdObject> {
        let before = self.document_mut().set_contents(objects.clone());
        self.entry.push(Change::SetContents {
            before: before.clone(),
            after: objects,
        });
        before
    }

    /// Apply `edit` to a copy of each selected object and store the result
    fn modify_each(&mut self, indices: &[usize], mut edit: impl FnMut(&mut LdObject)) {
        for &index in indices {
            let mut object = self.document().objects()[index].clone();
            edit(&mut object);
            if object != self.document().objects()[index] {
                self.set_object(index, object);
            }
        }
    }

    /// Translate the selected objects
    pub fn move_objects(&mut self, indices: &[usize], vector: Vertex) {
        self.modify_each(indices, |object| object.move_by(vector));
    }

    /// Reverse the winding of the selected objects.
    ///
    /// A subfile reference is inverted by adding a `0 BFC INVERTNEXT` before it,
    /// or removing the one already there.
    pub fn invert_objects(&mut self, indices: &[usize]) {
        // Back to front, so the statements added or removed before a reference
        // do not shift the selection still to be processed
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut pending = sorted.into_iter().rev().peekable();
        while let Some(index) = pending.next() {
            let objects = self.document().objects();
            if !matches!(objects[index], LdObject::SubfileReference { .. }) {
                self.modify_each(&[index], LdObject::invert);
                continue;
            }

            let preceded =
                index > 0 && objects[index - 1] == LdObject::Bfc(BfcStatement::InvertNext);
            if preceded {
                self.remove(index - 1);
                // The reference now sits at `index - 1`; a selected INVERTNEXT
                // there has already been dealt with
                pending.next_if_eq(&(index - 1));
            } else {
                self.insert(index, LdObject::Bfc(BfcStatement::InvertNext));
            }
        }
    }

    /// Rotate the selected objects by `angle` radians around `axis` through
    /// `pivot`, or through the center of the selection's bounding box
    pub fn rotate_objects(
        &mut self,
        indices: &[usize],
        axis: Vertex,
        angle: f64,
        pivot: Option<Vertex>,
    ) {
        let pivot = pivot.unwrap_or_else(|| {
            let objects = self.document().objects();
            bounding_box_of(indices.iter().map(|&i| &objects[i])).center()
        });
        let rotation = Matrix::rotation(axis, angle);

        self.modify_each(indices, |object| {
            object.move_by(-pivot);
            object.transform(&rotation, &pivot);
        });
    }

    /// Replace each selected quadrilateral with two triangles. Returns the
    /// number of quadrilaterals split.
    pub fn split_quads(&mut self, indices: &[usize]) -> Result<usize, DocumentError> {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut count = 0;
        for &index in sorted.iter().rev() {
            if let Some(triangles) = self.document().objects()[index].split_quad() {
                self.replace_range(index..index + 1, triangles.into())?;
                count += 1;
            }
        }
        Ok(count)
    }

    /// Replace the subfile reference at `index` with the objects it stands for.
    /// Returns the number of objects inserted.
    pub fn flatten_reference(
        &mut self,
        index: usize,
        resolver: &dyn DocumentResolver,
        deep: bool,
    ) -> Result<usize, EditError> {
        let objects = inline_reference(&self.document().objects()[index], resolver, deep)?;
        let count = objects.len();
        self.replace_range(index..index + 1, objects)?;
        Ok(count)
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        let entry = std::mem::take(&mut self.entry);
        self.session.history.record(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorCode;
    use crate::library::Library;
    use std::f64::consts::FRAC_PI_2;

    fn v(x: f64, y: f64, z: f64) -> Vertex {
        Vertex::new(x, y, z)
    }

    fn triangle() -> LdObject {
        LdObject::triangle(
            ColorCode::MAIN,
            [v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(0.0, 1.0, 0.0)],
        )
    }

    fn quad() -> LdObject {
        LdObject::quadrilateral(
            ColorCode(4),
            [v(0.0, 0.0, 0.0), v(2.0, 0.0, 0.0), v(2.0, 2.0, 0.0), v(0.0, 2.0, 0.0)],
        )
    }

    fn stud_reference() -> LdObject {
        LdObject::subfile_reference(ColorCode::MAIN, Vertex::ORIGIN, Matrix::IDENTITY, "stud.dat")
    }

    #[test]
    fn test_append_undo_redo() {
        let mut session = EditorSession::new(Document::new("test.ldr"));
        session.append(triangle());
        assert_eq!(session.history().undo_description(), Some("Add triangle"));

        assert!(session.undo());
        assert!(session.document().is_empty());
        assert!(!session.is_modified());

        assert!(session.redo());
        assert_eq!(session.document().objects(), &[triangle()]);
        assert!(session.is_modified());
    }

    #[test]
    fn test_transaction_records_one_entry() {
        let mut session = EditorSession::new(Document::new("test.ldr"));
        {
            let mut tx = session.transaction("Add two");
            tx.append(triangle());
            tx.append(quad());
        }
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.document().len(), 2);

        assert!(session.undo());
        assert!(session.document().is_empty());
    }

    #[test]
    fn test_transaction_rollback() {
        let mut session = EditorSession::new(Document::with_objects("test.ldr", vec![quad()]));
        let mut tx = session.transaction("Abandoned");
        tx.remove(0);
        tx.append(triangle());
        tx.rollback();

        assert_eq!(session.document().objects(), &[quad()]);
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_move_objects() {
        let mut session =
            EditorSession::new(Document::with_objects("test.ldr", vec![triangle(), quad()]));
        session.move_objects(&[0], v(0.0, 0.0, 5.0));
        assert_eq!(session.document().objects()[0].vertices()[1], v(1.0, 0.0, 5.0));
        assert_eq!(session.document().objects()[1], quad());
        assert_eq!(session.history().undo_description(), Some("Move 1 triangle"));

        session.undo();
        assert_eq!(session.document().objects()[0], triangle());
    }

    #[test]
    fn test_invert_toggles_invertnext_for_references() {
        let mut session = EditorSession::new(Document::with_objects(
            "test.ldr",
            vec![stud_reference(), triangle()],
        ));

        session.invert_objects(&[0, 1]);
        let objects = session.document().objects();
        assert_eq!(objects.len(), 3);
        assert_eq!(objects[0], LdObject::Bfc(BfcStatement::InvertNext));
        assert_eq!(objects[1], stud_reference());
        assert_eq!(objects[2].vertices(), &[v(0.0, 0.0, 0.0), v(0.0, 1.0, 0.0), v(1.0, 0.0, 0.0)]);

        session.invert_objects(&[1]);
        assert_eq!(session.document().len(), 2);
        assert_eq!(session.document().objects()[0], stud_reference());

        assert!(session.undo());
        assert!(session.undo());
        assert_eq!(session.document().objects(), &[stud_reference(), triangle()]);
    }

    #[test]
    fn test_invert_with_invertnext_also_selected() {
        let mut session = EditorSession::new(Document::with_objects(
            "test.ldr",
            vec![
                LdObject::Bfc(BfcStatement::InvertNext),
                stud_reference(),
                triangle(),
            ],
        ));

        session.invert_objects(&[0, 1]);
        assert_eq!(session.document().objects(), &[stud_reference(), triangle()]);
        assert_eq!(session.history().entries()[0].changes.len(), 1);

        assert!(session.undo());
        assert_eq!(session.document().len(), 3);
        assert_eq!(
            session.document().objects()[0],
            LdObject::Bfc(BfcStatement::InvertNext)
        );
    }

    #[test]
    fn test_rotate_about_selection_center() {
        let mut session = EditorSession::new(Document::with_objects("test.ldr", vec![quad()]));
        session.rotate_objects(&[0], v(0.0, 0.0, 1.0), FRAC_PI_2, None);

        // Rotating a square about its own center maps it onto itself
        let rotated = session.document().objects()[0].vertices().to_vec();
        assert_eq!(rotated[0], v(2.0, 0.0, 0.0));
        assert_eq!(rotated[1], v(2.0, 2.0, 0.0));

        session.rotate_objects(&[0], v(0.0, 0.0, 1.0), -FRAC_PI_2, Some(v(1.0, 1.0, 0.0)));
        assert_eq!(session.document().objects()[0], quad());
    }

    #[test]
    fn test_split_quads() {
        let mut session = EditorSession::new(Document::with_objects(
            "test.ldr",
            vec![quad(), triangle(), quad()],
        ));
        assert_eq!(session.split_quads(&[0, 1, 2]).unwrap(), 2);
        assert_eq!(session.document().len(), 5);
        assert_eq!(session.history().len(), 1);

        session.undo();
        assert_eq!(session.document().objects(), &[quad(), triangle(), quad()]);
    }

    #[test]
    fn test_flatten_reference() {
        let mut library = Library::new();
        library.insert(Document::with_objects(
            "stud.dat",
            vec![LdObject::comment("Stud"), triangle()],
        ));

        let placed = LdObject::subfile_reference(
            ColorCode(4),
            v(0.0, -4.0, 0.0),
            Matrix::IDENTITY,
            "stud.dat",
        );
        let mut session = EditorSession::new(Document::with_objects("test.ldr", vec![placed.clone()]));
        assert_eq!(session.flatten_reference(0, &library, false).unwrap(), 1);

        let flattened = &session.document().objects()[0];
        assert_eq!(flattened.color(), Some(ColorCode(4)));
        assert_eq!(flattened.vertices()[0], v(0.0, -4.0, 0.0));

        session.undo();
        assert_eq!(session.document().objects(), &[placed]);

        assert!(matches!(
            session.flatten_reference(0, &Library::new(), false),
            Err(EditError::Inline(InlineError::UnresolvedReference(_)))
        ));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_saved_state_tracking() {
        let mut session = EditorSession::new(Document::new("test.ldr"));
        session.append(triangle());
        session.mark_saved();
        assert!(!session.is_modified());

        session.append(quad());
        assert!(session.is_modified());
        session.undo();
        assert!(!session.is_modified());
    }

    #[test]
    fn test_shared_session() {
        let shared = create_shared_session(Document::new("test.ldr"));
        let worker = {
            let shared = Arc::clone(&shared);
            std::thread::spawn(move || {
                shared.lock().append(triangle());
            })
        };
        worker.join().unwrap();
        assert_eq!(shared.lock().document().len(), 1);
    }
}
