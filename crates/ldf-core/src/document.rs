//! LDraw documents
//!
//! A [`Document`] owns its objects in file order. Every structural mutation
//! marks the document modified and queues a [`DocumentEvent`], which viewers
//! drain with [`Document::take_events`] to know what to rebuild.

use std::collections::BTreeSet;
use std::ops::Range;

use uuid::Uuid;

use crate::constants::LINE_ENDING;
use crate::math::{BoundingBox, Vertex};
use crate::object::LdObject;

/// Structural change to a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    Inserted { index: usize },
    Removed { index: usize },
    Changed { index: usize },
    Swapped { first: usize, second: usize },
    RangeReplaced {
        start: usize,
        removed: usize,
        inserted: usize,
    },
    ContentsReplaced,
}

/// Document-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum DocumentError {
    #[error("Unable to allocate room for {0} objects")]
    Allocation(usize),
}

/// An ordered list of LDraw objects
#[derive(Debug, Clone)]
pub struct Document {
    /// Unique identifier
    pub id: Uuid,
    /// File name, e.g. `3001.dat`
    pub name: String,
    objects: Vec<LdObject>,
    modified: bool,
    pending_events: Vec<DocumentEvent>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new("untitled.ldr")
    }
}

impl Document {
    /// Create an empty document
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_objects(name, Vec::new())
    }

    /// Create an unmodified document holding `objects`
    pub fn with_objects(name: impl Into<String>, objects: Vec<LdObject>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            objects,
            modified: false,
            pending_events: Vec::new(),
        }
    }

    // ============== Read access ==============

    /// Objects in file order
    pub fn objects(&self) -> &[LdObject] {
        &self.objects
    }

    pub fn get(&self, index: usize) -> Option<&LdObject> {
        self.objects.get(index)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LdObject> {
        self.objects.iter()
    }

    // ============== Mutation ==============

    /// Add an object at the end
    pub fn append(&mut self, object: LdObject) -> usize {
        let index = self.objects.len();
        self.insert(index, object);
        index
    }

    /// Insert an object at `index`.
    ///
    /// # Panics
    /// If `index > len`.
    pub fn insert(&mut self, index: usize, object: LdObject) {
        assert!(
            index <= self.objects.len(),
            "insert index {} out of range for document of {} objects",
            index,
            self.objects.len()
        );
        self.objects.insert(index, object);
        self.changed(DocumentEvent::Inserted { index });
    }

    /// Remove and return the object at `index`; later objects shift down.
    ///
    /// # Panics
    /// If `index >= len`.
    pub fn remove_at(&mut self, index: usize) -> LdObject {
        assert!(
            index < self.objects.len(),
            "remove index {} out of range for document of {} objects",
            index,
            self.objects.len()
        );
        let object = self.objects.remove(index);
        self.changed(DocumentEvent::Removed { index });
        object
    }

    /// Replace the object at `index`, returning the previous one.
    ///
    /// # Panics
    /// If `index >= len`.
    pub fn set_object(&mut self, index: usize, object: LdObject) -> LdObject {
        assert!(
            index < self.objects.len(),
            "set index {} out of range for document of {} objects",
            index,
            self.objects.len()
        );
        let previous = std::mem::replace(&mut self.objects[index], object);
        self.changed(DocumentEvent::Changed { index });
        previous
    }

    /// Exchange two objects.
    ///
    /// # Panics
    /// If either index is out of range.
    pub fn swap(&mut self, first: usize, second: usize) {
        self.objects.swap(first, second);
        self.changed(DocumentEvent::Swapped { first, second });
    }

    /// Replace `range` with `objects`, returning the removed objects.
    ///
    /// Memory is reserved before anything is touched: on allocation failure the
    /// document is left as it was.
    ///
    /// # Panics
    /// If `range` does not lie within the document.
    pub fn replace_range(
        &mut self,
        range: Range<usize>,
        objects: Vec<LdObject>,
    ) -> Result<Vec<LdObject>, DocumentError> {
        assert!(
            range.start <= range.end && range.end <= self.objects.len(),
            "replace range {:?} out of range for document of {} objects",
            range,
            self.objects.len()
        );

        let inserted = objects.len();
        let growth = inserted.saturating_sub(range.len());
        self.objects
            .try_reserve(growth)
            .map_err(|_| DocumentError::Allocation(inserted))?;
        let mut removed = Vec::new();
        removed
            .try_reserve_exact(range.len())
            .map_err(|_| DocumentError::Allocation(range.len()))?;

        let start = range.start;
        removed.extend(self.objects.splice(range, objects));
        self.changed(DocumentEvent::RangeReplaced {
            start,
            removed: removed.len(),
            inserted,
        });
        Ok(removed)
    }

    /// Swap in a whole new object list, returning the old one
    pub fn set_contents(&mut self, objects: Vec<LdObject>) -> Vec<LdObject> {
        let previous = std::mem::replace(&mut self.objects, objects);
        self.changed(DocumentEvent::ContentsReplaced);
        previous
    }

    fn changed(&mut self, event: DocumentEvent) {
        self.modified = true;
        self.pending_events.push(event);
    }

    // ============== Modification state ==============

    /// Whether the document changed since it was loaded or last saved
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Clear the modified flag
    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    /// Take all pending change events
    pub fn take_events(&mut self) -> Vec<DocumentEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ============== Queries ==============

    /// Every distinct vertex used by the document's geometry
    pub fn known_vertices(&self) -> BTreeSet<Vertex> {
        self.objects
            .iter()
            .flat_map(|object| object.vertices().iter().copied())
            .collect()
    }

    /// Whether some object already has a vertex at `vertex` (within tolerance)
    pub fn has_vertex(&self, vertex: &Vertex) -> bool {
        self.objects
            .iter()
            .any(|object| object.vertices().contains(vertex))
    }

    /// Bounds of all vertices and subfile reference positions
    pub fn bounding_box(&self) -> BoundingBox {
        bounding_box_of(self.objects.iter())
    }

    /// Number of lines that failed to parse
    pub fn error_count(&self) -> usize {
        self.objects.iter().filter(|o| o.is_error()).count()
    }

    /// The document as LDraw text, every line terminated by CRLF
    pub fn to_ldraw_string(&self) -> String {
        let mut text = String::new();
        for object in &self.objects {
            text.push_str(&object.to_ldraw());
            text.push_str(LINE_ENDING);
        }
        text
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a LdObject;
    type IntoIter = std::slice::Iter<'a, LdObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}

/// Bounds of the given objects' vertices and subfile reference positions
pub fn bounding_box_of<'a>(objects: impl IntoIterator<Item = &'a LdObject>) -> BoundingBox {
    let mut bbox = BoundingBox::new();
    for object in objects {
        match object {
            LdObject::SubfileReference { position, .. } => bbox.add(*position),
            other => bbox.extend(other.vertices().iter().copied()),
        }
    }
    bbox
}
