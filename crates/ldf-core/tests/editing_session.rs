//! Load a model, edit it through a session, undo/redo, and save it back

use ldf_core::{
    ColorCode, Document, EditorSession, LdObject, Library, Matrix, ObjectKind, ParseOptions,
    Vertex, load_file, load_str,
};

const MODEL: &str = "0 Test model\r\n\
0 Name: model.ldr\r\n\
0 BFC CERTIFY CCW\r\n\
1 4 0 -24 0 1 0 0 0 1 0 0 0 1 plate.dat\r\n\
4 16 0 0 0 20 0 0 20 0 20 0 0 20\r\n\
3 16 bad bad bad bad bad bad bad bad bad\r\n\
2 24 0 0 0 10 0 0\r\n";

const PLATE: &str = "0 Plate\n\
0 BFC CERTIFY CCW\n\
3 16 0 0 0 10 0 0 0 0 10\n\
1 16 5 -4 5 1 0 0 0 1 0 0 0 1 stud.dat\n";

const STUD: &str = "0 Stud\n2 24 0 0 0 0 -4 0\n";

fn library() -> Library {
    let mut library = Library::new();
    library.insert(load_str("plate.dat", PLATE, ParseOptions::default()));
    library.insert(load_str("stud.dat", STUD, ParseOptions::default()));
    library
}

#[test]
fn test_load_edit_undo_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.ldr");
    std::fs::write(&path, MODEL).unwrap();

    let document = load_file(&path, ParseOptions::default()).unwrap();
    assert_eq!(document.len(), 7);
    assert_eq!(document.error_count(), 1);
    let original: Vec<LdObject> = document.objects().to_vec();

    let mut session = EditorSession::new(document);
    assert!(!session.is_modified());

    // Fix the corrupt line
    let fixed = LdObject::triangle(
        ColorCode::MAIN,
        [
            Vertex::new(0.0, 0.0, 0.0),
            Vertex::new(10.0, 0.0, 0.0),
            Vertex::new(0.0, 0.0, 10.0),
        ],
    );
    session.set_object(5, fixed.clone());
    assert_eq!(session.document().error_count(), 0);

    session.split_quads(&[4]).unwrap();
    assert_eq!(session.document().len(), 8);
    assert_eq!(session.document().objects()[4].kind(), ObjectKind::Triangle);

    session.move_objects(&[3], Vertex::new(0.0, -8.0, 0.0));
    assert_eq!(session.history().len(), 3);
    assert!(session.is_modified());

    // Walk all the way back and forward again
    while session.undo() {}
    assert_eq!(session.document().objects(), original.as_slice());
    assert!(!session.is_modified());
    while session.redo() {}
    assert_eq!(session.document().objects()[6], fixed);

    session.save(&path).unwrap();
    assert!(!session.is_modified());

    let reloaded = load_file(&path, ParseOptions::default()).unwrap();
    assert_eq!(reloaded.objects(), session.document().objects());
    assert_eq!(
        reloaded.objects()[3],
        LdObject::subfile_reference(
            ColorCode(4),
            Vertex::new(0.0, -32.0, 0.0),
            Matrix::IDENTITY,
            "plate.dat"
        )
    );
}

#[test]
fn test_flatten_and_undo() {
    let library = library();
    let document = load_str("model.ldr", MODEL, ParseOptions::default());
    let mut session = EditorSession::new(document);

    let inserted = session.flatten_reference(3, &library, true).unwrap();
    assert_eq!(inserted, 2);

    let objects = session.document().objects();
    // Plate triangle, now red and raised with the plate
    assert_eq!(objects[3].color(), Some(ColorCode(4)));
    assert_eq!(objects[3].vertices()[1], Vertex::new(10.0, -24.0, 0.0));
    // Stud edge line, placed by both poses
    assert_eq!(objects[4].color(), Some(ColorCode::EDGE));
    assert_eq!(objects[4].vertices()[1], Vertex::new(5.0, -32.0, 5.0));

    assert!(session.undo());
    assert_eq!(session.document().objects()[3].kind(), ObjectKind::SubfileReference);
    assert!(!session.can_undo());
}

#[test]
fn test_new_edit_after_undo_discards_redo() {
    let mut session = EditorSession::new(Document::new("scratch.ldr"));
    session.append(LdObject::comment("one"));
    session.append(LdObject::comment("two"));
    assert!(session.undo());
    assert!(session.can_redo());

    session.append(LdObject::comment("three"));
    assert!(!session.can_redo());
    assert!(!session.redo());
    assert_eq!(
        session.document().objects(),
        &[LdObject::comment("one"), LdObject::comment("three")]
    );
}
