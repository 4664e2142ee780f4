//! Referenced documents and subfile inlining
//!
//! A subfile reference only names another document. [`DocumentResolver`] maps
//! that name to a loaded [`Document`]; [`inline_reference`] uses it to expand a
//! reference into the objects it stands for.

use std::collections::HashMap;

use crate::color::ColorCode;
use crate::constants::MAX_INLINE_DEPTH;
use crate::document::Document;
use crate::math::{Matrix, Vertex};
use crate::object::LdObject;

/// Looks up documents by the name used in subfile references
pub trait DocumentResolver {
    fn resolve(&self, name: &str) -> Option<&Document>;
}

/// Errors that can occur while inlining a subfile reference
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InlineError {
    #[error("Object is not a subfile reference")]
    NotAReference,

    #[error("Unable to resolve subfile '{0}'")]
    UnresolvedReference(String),

    #[error("Subfile '{0}' is nested too deeply (circular reference?)")]
    TooDeep(String),
}

/// A set of documents addressable by name.
///
/// Names are matched case-insensitively, and `\` and `/` are interchangeable.
#[derive(Debug, Clone, Default)]
pub struct Library {
    documents: HashMap<String, Document>,
}

fn library_key(name: &str) -> String {
    name.trim().replace('\\', "/").to_lowercase()
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document under its own name, returning any document it replaces
    pub fn insert(&mut self, document: Document) -> Option<Document> {
        self.documents.insert(library_key(&document.name), document)
    }

    pub fn get(&self, name: &str) -> Option<&Document> {
        self.documents.get(&library_key(name))
    }

    pub fn remove(&mut self, name: &str) -> Option<Document> {
        self.documents.remove(&library_key(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.documents.contains_key(&library_key(name))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentResolver for Library {
    fn resolve(&self, name: &str) -> Option<&Document> {
        self.get(name)
    }
}

/// Expand a subfile reference into the objects of the document it names.
///
/// Children are placed with the reference's pose and main-colored children take
/// the reference's color. Comments, BFC statements, errors and blank lines are
/// dropped. With `deep`, nested references are expanded as well.
pub fn inline_reference(
    object: &LdObject,
    resolver: &dyn DocumentResolver,
    deep: bool,
) -> Result<Vec<LdObject>, InlineError> {
    let LdObject::SubfileReference {
        color,
        position,
        transform,
        name,
    } = object
    else {
        return Err(InlineError::NotAReference);
    };

    let mut objects = Vec::new();
    let pose = Pose {
        color: *color,
        position: *position,
        transform: *transform,
    };
    inline_into(&mut objects, name, &pose, resolver, deep, 0)?;
    Ok(objects)
}

/// Placement of a referenced document in its parent
struct Pose {
    color: ColorCode,
    position: Vertex,
    transform: Matrix,
}

fn inline_into(
    out: &mut Vec<LdObject>,
    name: &str,
    pose: &Pose,
    resolver: &dyn DocumentResolver,
    deep: bool,
    depth: usize,
) -> Result<(), InlineError> {
    if depth >= MAX_INLINE_DEPTH {
        return Err(InlineError::TooDeep(name.to_string()));
    }
    let document = resolver
        .resolve(name)
        .ok_or_else(|| InlineError::UnresolvedReference(name.to_string()))?;

    for child in document.iter().filter(|o| o.is_semantic()) {
        let mut placed = child.clone();
        placed.transform(&pose.transform, &pose.position);
        if placed.color() == Some(ColorCode::MAIN) {
            placed.set_color(pose.color);
        }

        match placed {
            LdObject::SubfileReference {
                color,
                position,
                transform,
                name: ref child_name,
            } if deep => {
                let child_pose = Pose {
                    color,
                    position,
                    transform,
                };
                inline_into(out, child_name, &child_pose, resolver, deep, depth + 1)?;
            }
            other => out.push(other),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::BfcStatement;

    fn stud() -> Document {
        Document::with_objects(
            "stud.dat",
            vec![
                LdObject::comment("Stud"),
                LdObject::Bfc(BfcStatement::CertifyCcw),
                LdObject::line(
                    ColorCode::EDGE,
                    [Vertex::new(0.0, 0.0, 0.0), Vertex::new(1.0, 0.0, 0.0)],
                ),
                LdObject::triangle(
                    ColorCode::MAIN,
                    [
                        Vertex::new(0.0, 0.0, 0.0),
                        Vertex::new(1.0, 0.0, 0.0),
                        Vertex::new(0.0, 1.0, 0.0),
                    ],
                ),
            ],
        )
    }

    fn reference(name: &str, color: ColorCode, position: Vertex) -> LdObject {
        LdObject::subfile_reference(color, position, Matrix::IDENTITY, name)
    }

    #[test]
    fn test_library_names_are_case_insensitive() {
        let mut library = Library::new();
        library.insert(Document::new("S\\Brick.dat"));
        assert!(library.contains("s/brick.DAT"));
        assert!(library.resolve("s\\brick.dat").is_some());
        assert!(library.remove("S/BRICK.DAT").is_some());
        assert!(library.is_empty());
    }

    #[test]
    fn test_inline_places_and_colors_children() {
        let mut library = Library::new();
        library.insert(stud());

        let objects = inline_reference(
            &reference("STUD.DAT", ColorCode(4), Vertex::new(10.0, 0.0, 0.0)),
            &library,
            false,
        )
        .unwrap();

        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].color(), Some(ColorCode::EDGE));
        assert_eq!(objects[0].vertices()[1], Vertex::new(11.0, 0.0, 0.0));
        assert_eq!(objects[1].color(), Some(ColorCode(4)));
        assert_eq!(objects[1].vertices()[2], Vertex::new(10.0, 1.0, 0.0));

        let stretched = LdObject::subfile_reference(
            ColorCode::MAIN,
            Vertex::ORIGIN,
            Matrix::scale(Vertex::new(2.0, 3.0, 1.0)),
            "stud.dat",
        );
        let objects = inline_reference(&stretched, &library, false).unwrap();
        assert_eq!(objects[1].vertices()[1], Vertex::new(2.0, 0.0, 0.0));
        assert_eq!(objects[1].vertices()[2], Vertex::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn test_shallow_and_deep_inlining() {
        let mut library = Library::new();
        library.insert(stud());
        library.insert(Document::with_objects(
            "plate.dat",
            vec![
                reference("stud.dat", ColorCode::MAIN, Vertex::new(0.0, -4.0, 0.0)),
                reference("stud.dat", ColorCode::MAIN, Vertex::new(20.0, -4.0, 0.0)),
            ],
        ));
        let plate = reference("plate.dat", ColorCode(1), Vertex::ORIGIN);

        let shallow = inline_reference(&plate, &library, false).unwrap();
        assert_eq!(shallow.len(), 2);
        assert_eq!(shallow[0].kind(), crate::object::ObjectKind::SubfileReference);
        assert_eq!(shallow[1].color(), Some(ColorCode(1)));

        let deep = inline_reference(&plate, &library, true).unwrap();
        assert_eq!(deep.len(), 4);
        assert_eq!(deep[3].color(), Some(ColorCode(1)));
        assert_eq!(deep[3].vertices()[0], Vertex::new(20.0, -4.0, 0.0));
    }

    #[test]
    fn test_inline_errors() {
        let mut library = Library::new();
        assert_eq!(
            inline_reference(&LdObject::Empty, &library, false),
            Err(InlineError::NotAReference)
        );
        assert_eq!(
            inline_reference(&reference("missing.dat", ColorCode::MAIN, Vertex::ORIGIN), &library, false),
            Err(InlineError::UnresolvedReference("missing.dat".to_string()))
        );

        library.insert(Document::with_objects(
            "loop.dat",
            vec![reference("loop.dat", ColorCode::MAIN, Vertex::ORIGIN)],
        ));
        assert!(matches!(
            inline_reference(&reference("loop.dat", ColorCode::MAIN, Vertex::ORIGIN), &library, true),
            Err(InlineError::TooDeep(_))
        ));
    }
}
