//! LDraw statements
//!
//! Every line of an LDraw file becomes one [`LdObject`]. The variant fixes the
//! number of vertices, so geometry can never end up with the wrong arity.

mod bfc;
mod format;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::ColorCode;
use crate::math::{Matrix, Vertex};
use crate::parser::ParseError;

pub use bfc::BfcStatement;
pub use format::format_number;
pub(crate) use format::join_fields;

/// One statement of an LDraw document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LdObject {
    /// `0 <text>`
    Comment { text: String },
    /// `1 <color> <x y z> <a b c d e f g h i> <name>`
    SubfileReference {
        color: ColorCode,
        position: Vertex,
        transform: Matrix,
        name: String,
    },
    /// `2 <color> <v0> <v1>`
    Line { color: ColorCode, vertices: [Vertex; 2] },
    /// `3 <color> <v0> <v1> <v2>`
    Triangle { color: ColorCode, vertices: [Vertex; 3] },
    /// `4 <color> <v0> <v1> <v2> <v3>`
    Quadrilateral { color: ColorCode, vertices: [Vertex; 4] },
    /// `5 <color> <v0> <v1> <c0> <c1>`, drawn between v0 and v1
    ConditionalLine { color: ColorCode, vertices: [Vertex; 4] },
    /// `0 !LDFORGE VERTEX <color> <x y z>`
    VertexStatement { color: ColorCode, position: Vertex },
    /// `0 !LDFORGE BEZIER_CURVE <color> <v0> <v1> <c0> <c1>`
    BezierCurve { color: ColorCode, vertices: [Vertex; 4] },
    /// `0 BFC <statement>`
    Bfc(BfcStatement),
    /// A line that could not be parsed, kept verbatim
    Error { text: String, reason: ParseError },
    /// A blank line
    Empty,
}

/// Discriminant of an [`LdObject`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectKind {
    Comment,
    SubfileReference,
    Line,
    Triangle,
    Quadrilateral,
    ConditionalLine,
    VertexStatement,
    BezierCurve,
    Bfc,
    Error,
    Empty,
}

impl ObjectKind {
    /// Every kind, in display order
    pub const ALL: [ObjectKind; 11] = [
        ObjectKind::Comment,
        ObjectKind::SubfileReference,
        ObjectKind::Line,
        ObjectKind::Triangle,
        ObjectKind::Quadrilateral,
        ObjectKind::ConditionalLine,
        ObjectKind::VertexStatement,
        ObjectKind::BezierCurve,
        ObjectKind::Bfc,
        ObjectKind::Error,
        ObjectKind::Empty,
    ];

    /// Human-readable name
    pub fn type_name(self) -> &'static str {
        match self {
            ObjectKind::Comment => "comment",
            ObjectKind::SubfileReference => "subfile reference",
            ObjectKind::Line => "line",
            ObjectKind::Triangle => "triangle",
            ObjectKind::Quadrilateral => "quadrilateral",
            ObjectKind::ConditionalLine => "conditional line",
            ObjectKind::VertexStatement => "vertex",
            ObjectKind::BezierCurve => "Bézier curve",
            ObjectKind::Bfc => "BFC statement",
            ObjectKind::Error => "error",
            ObjectKind::Empty => "empty line",
        }
    }

    /// Plural form of [`type_name`](Self::type_name)
    pub fn plural_name(self) -> &'static str {
        match self {
            ObjectKind::Comment => "comments",
            ObjectKind::SubfileReference => "subfile references",
            ObjectKind::Line => "lines",
            ObjectKind::Triangle => "triangles",
            ObjectKind::Quadrilateral => "quadrilaterals",
            ObjectKind::ConditionalLine => "conditional lines",
            ObjectKind::VertexStatement => "vertices",
            ObjectKind::BezierCurve => "Bézier curves",
            ObjectKind::Bfc => "BFC statements",
            ObjectKind::Error => "errors",
            ObjectKind::Empty => "empty lines",
        }
    }

    /// Number of vertices an object of this kind carries
    pub fn vertex_count(self) -> usize {
        match self {
            ObjectKind::Line => 2,
            ObjectKind::Triangle => 3,
            ObjectKind::Quadrilateral | ObjectKind::ConditionalLine | ObjectKind::BezierCurve => 4,
            ObjectKind::VertexStatement => 1,
            ObjectKind::Comment
            | ObjectKind::SubfileReference
            | ObjectKind::Bfc
            | ObjectKind::Error
            | ObjectKind::Empty => 0,
        }
    }

    /// Whether objects of this kind carry a color code
    pub fn has_color(self) -> bool {
        matches!(
            self,
            ObjectKind::SubfileReference
                | ObjectKind::Line
                | ObjectKind::Triangle
                | ObjectKind::Quadrilateral
                | ObjectKind::ConditionalLine
                | ObjectKind::VertexStatement
                | ObjectKind::BezierCurve
        )
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl LdObject {
    pub fn comment(text: impl Into<String>) -> Self {
        LdObject::Comment { text: text.into() }
    }

    pub fn subfile_reference(
        color: ColorCode,
        position: Vertex,
        transform: Matrix,
        name: impl Into<String>,
    ) -> Self {
        LdObject::SubfileReference {
            color,
            position,
            transform,
            name: name.into(),
        }
    }

    pub fn line(color: ColorCode, vertices: [Vertex; 2]) -> Self {
        LdObject::Line { color, vertices }
    }

    pub fn triangle(color: ColorCode, vertices: [Vertex; 3]) -> Self {
        LdObject::Triangle { color, vertices }
    }

    pub fn quadrilateral(color: ColorCode, vertices: [Vertex; 4]) -> Self {
        LdObject::Quadrilateral { color, vertices }
    }

    pub fn conditional_line(color: ColorCode, vertices: [Vertex; 4]) -> Self {
        LdObject::ConditionalLine { color, vertices }
    }

    /// Kind of this object
    pub fn kind(&self) -> ObjectKind {
        match self {
            LdObject::Comment { .. } => ObjectKind::Comment,
            LdObject::SubfileReference { .. } => ObjectKind::SubfileReference,
            LdObject::Line { .. } => ObjectKind::Line,
            LdObject::Triangle { .. } => ObjectKind::Triangle,
            LdObject::Quadrilateral { .. } => ObjectKind::Quadrilateral,
            LdObject::ConditionalLine { .. } => ObjectKind::ConditionalLine,
            LdObject::VertexStatement { .. } => ObjectKind::VertexStatement,
            LdObject::BezierCurve { .. } => ObjectKind::BezierCurve,
            LdObject::Bfc(_) => ObjectKind::Bfc,
            LdObject::Error { .. } => ObjectKind::Error,
            LdObject::Empty => ObjectKind::Empty,
        }
    }

    /// Check if this is a parse error
    pub fn is_error(&self) -> bool {
        matches!(self, LdObject::Error { .. })
    }

    /// Whether the object contributes to the model (geometry or a reference).
    /// Comments, BFC statements, errors and blank lines do not.
    pub fn is_semantic(&self) -> bool {
        !matches!(
            self,
            LdObject::Comment { .. } | LdObject::Bfc(_) | LdObject::Error { .. } | LdObject::Empty
        )
    }

    /// Color code, for the variants that have one
    pub fn color(&self) -> Option<ColorCode> {
        match self {
            LdObject::SubfileReference { color, .. }
            | LdObject::Line { color, .. }
            | LdObject::Triangle { color, .. }
            | LdObject::Quadrilateral { color, .. }
            | LdObject::ConditionalLine { color, .. }
            | LdObject::VertexStatement { color, .. }
            | LdObject::BezierCurve { color, .. } => Some(*color),
            _ => None,
        }
    }

    /// Set the color code. Returns `false` if this variant has no color.
    pub fn set_color(&mut self, code: ColorCode) -> bool {
        match self {
            LdObject::SubfileReference { color, .. }
            | LdObject::Line { color, .. }
            | LdObject::Triangle { color, .. }
            | LdObject::Quadrilateral { color, .. }
            | LdObject::ConditionalLine { color, .. }
            | LdObject::VertexStatement { color, .. }
            | LdObject::BezierCurve { color, .. } => {
                *color = code;
                true
            }
            _ => false,
        }
    }

    /// Vertices of the object; empty for variants without geometry
    pub fn vertices(&self) -> &[Vertex] {
        match self {
            LdObject::Line { vertices, .. } => vertices,
            LdObject::Triangle { vertices, .. } => vertices,
            LdObject::Quadrilateral { vertices, .. }
            | LdObject::ConditionalLine { vertices, .. }
            | LdObject::BezierCurve { vertices, .. } => vertices,
            LdObject::VertexStatement { position, .. } => std::slice::from_ref(position),
            _ => &[],
        }
    }

    /// Mutable vertices. The slice length is fixed by the variant.
    pub fn vertices_mut(&mut self) -> &mut [Vertex] {
        match self {
            LdObject::Line { vertices, .. } => vertices,
            LdObject::Triangle { vertices, .. } => vertices,
            LdObject::Quadrilateral { vertices, .. }
            | LdObject::ConditionalLine { vertices, .. }
            | LdObject::BezierCurve { vertices, .. } => vertices,
            LdObject::VertexStatement { position, .. } => std::slice::from_mut(position),
            _ => &mut [],
        }
    }

    /// Translate the object by `vector`
    pub fn move_by(&mut self, vector: Vertex) {
        if let LdObject::SubfileReference { position, .. } = self {
            *position += vector;
            return;
        }
        for vertex in self.vertices_mut() {
            *vertex += vector;
        }
    }

    /// Reverse the winding of the object. Applying it twice restores the original.
    ///
    /// Subfile references are left alone: they are inverted by toggling a
    /// preceding `0 BFC INVERTNEXT` in the document.
    pub fn invert(&mut self) {
        match self {
            LdObject::Triangle { vertices, .. } => vertices.swap(1, 2),
            LdObject::Quadrilateral { vertices, .. } => vertices.swap(1, 3),
            LdObject::ConditionalLine { vertices, .. } => vertices.swap(0, 1),
            LdObject::BezierCurve { vertices, .. } => {
                vertices.swap(0, 1);
                vertices.swap(2, 3);
            }
            LdObject::Bfc(statement) => *statement = statement.inverted(),
            _ => {}
        }
    }

    /// Apply `matrix`, then translate by `position`.
    ///
    /// For a subfile reference the pose is composed instead: the new transform is
    /// `matrix * transform`.
    pub fn transform(&mut self, matrix: &Matrix, position: &Vertex) {
        if let LdObject::SubfileReference {
            position: ref_position,
            transform,
            ..
        } = self
        {
            *ref_position = ref_position.transformed(matrix, position);
            *transform = *matrix * *transform;
            return;
        }
        for vertex in self.vertices_mut() {
            *vertex = vertex.transformed(matrix, position);
        }
    }

    /// Split a quadrilateral into the triangles `(0, 1, 3)` and `(1, 2, 3)`
    pub fn split_quad(&self) -> Option<[LdObject; 2]> {
        let LdObject::Quadrilateral { color, vertices: v } = self else {
            return None;
        };
        Some([
            LdObject::triangle(*color, [v[0], v[1], v[3]]),
            LdObject::triangle(*color, [v[1], v[2], v[3]]),
        ])
    }

    /// Turn a conditional line into a plain line between its drawn vertices
    pub fn to_edge_line(&self) -> Option<LdObject> {
        let LdObject::ConditionalLine { color, vertices } = self else {
            return None;
        };
        Some(LdObject::line(*color, [vertices[0], vertices[1]]))
    }

    /// Serialize to one LDraw line (no line terminator)
    pub fn to_ldraw(&self) -> String {
        match self {
            LdObject::Comment { text } if text.is_empty() => "0".to_string(),
            LdObject::Comment { text } => format!("0 {}", text),
            LdObject::SubfileReference {
                color,
                position,
                transform,
                name,
            } => format!("1 {} {} {} {}", color, position, transform, name),
            LdObject::Line { color, vertices } => geometry_line(2, *color, vertices),
            LdObject::Triangle { color, vertices } => geometry_line(3, *color, vertices),
            LdObject::Quadrilateral { color, vertices } => geometry_line(4, *color, vertices),
            LdObject::ConditionalLine { color, vertices } => geometry_line(5, *color, vertices),
            LdObject::VertexStatement { color, position } => {
                format!("0 !LDFORGE VERTEX {} {}", color, position)
            }
            LdObject::BezierCurve { color, vertices } => {
                format!("0 !LDFORGE BEZIER_CURVE {} {}", color, join_fields(vertices))
            }
            LdObject::Bfc(statement) => format!("0 BFC {}", statement),
            LdObject::Error { text, .. } => text.clone(),
            LdObject::Empty => String::new(),
        }
    }
}

fn geometry_line(code: u8, color: ColorCode, vertices: &[Vertex]) -> String {
    format!("{} {} {}", code, color, join_fields(vertices))
}

impl fmt::Display for LdObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ldraw())
    }
}

/// Summarize a selection, e.g. `"2 triangles, 1 comment"`.
/// Kinds are listed in [`ObjectKind::ALL`] order; an empty selection gives `"nothing"`.
pub fn describe_objects<'a>(objects: impl IntoIterator<Item = &'a LdObject>) -> String {
    let mut counts = [0usize; ObjectKind::ALL.len()];
    for object in objects {
        counts[object.kind() as usize] += 1;
    }

    let parts: Vec<String> = ObjectKind::ALL
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(kind, count)| {
            let name = if count == 1 {
                kind.type_name()
            } else {
                kind.plural_name()
            };
            format!("{} {}", count, name)
        })
        .collect();

    if parts.is_empty() {
        "nothing".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParseOptions, parse_line};

    fn v(x: f64, y: f64, z: f64) -> Vertex {
        Vertex::new(x, y, z)
    }

    fn sample_objects() -> Vec<LdObject> {
        vec![
            LdObject::comment("Name: sample.dat"),
            LdObject::subfile_reference(
                ColorCode(4),
                v(10.0, -8.0, 0.5),
                Matrix::new([0.0, 0.0, 1.0, 0.0, 1.0, 0.0, -1.0, 0.0, 0.0]),
                "3001.dat",
            ),
            LdObject::line(ColorCode::EDGE, [v(0.0, 0.0, 0.0), v(10.0, 0.0, 0.0)]),
            LdObject::triangle(
                ColorCode::MAIN,
                [v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(0.0, 1.0, 0.0)],
            ),
            LdObject::quadrilateral(
                ColorCode(0x2FF_0000),
                [v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(1.0, 1.0, 0.0), v(0.0, 1.0, 0.0)],
            ),
            LdObject::conditional_line(
                ColorCode::EDGE,
                [v(0.0, 0.0, 0.0), v(0.0, 5.0, 0.0), v(1.0, 0.0, 0.0), v(-1.0, 0.0, 0.0)],
            ),
            LdObject::VertexStatement {
                color: ColorCode::MAIN,
                position: v(1.25, 2.0, -3.0),
            },
            LdObject::BezierCurve {
                color: ColorCode(1),
                vertices: [v(0.0, 0.0, 0.0), v(4.0, 0.0, 0.0), v(1.0, 1.0, 0.0), v(3.0, 1.0, 0.0)],
            },
            LdObject::Bfc(BfcStatement::CertifyCcw),
            LdObject::Empty,
        ]
    }

    #[test]
    fn test_round_trip_through_parser() {
        let options = ParseOptions::default();
        for object in sample_objects() {
            let text = object.to_ldraw();
            assert_eq!(parse_line(&text, &options), object, "line: {}", text);
        }
    }

    #[test]
    fn test_to_ldraw() {
        let line = LdObject::line(ColorCode::EDGE, [v(0.0, 0.0, 0.0), v(10.0, 0.0, 0.0)]);
        assert_eq!(line.to_ldraw(), "2 24 0 0 0 10 0 0");
        assert_eq!(LdObject::Bfc(BfcStatement::ClipCw).to_ldraw(), "0 BFC CLIP CW");
        assert_eq!(LdObject::comment("").to_ldraw(), "0");
        assert_eq!(LdObject::Empty.to_ldraw(), "");

        let reference = LdObject::subfile_reference(
            ColorCode::MAIN,
            Vertex::ORIGIN,
            Matrix::IDENTITY,
            "s\\brick.dat",
        );
        assert_eq!(reference.to_ldraw(), "1 16 0 0 0 1 0 0 0 1 0 0 0 1 s\\brick.dat");
    }

    #[test]
    fn test_vertex_arity_matches_kind() {
        let mut objects = sample_objects();
        for object in &mut objects {
            let expected = object.kind().vertex_count();
            assert_eq!(object.vertices().len(), expected);
            object.move_by(v(1.0, 2.0, 3.0));
            object.invert();
            assert_eq!(object.vertices().len(), expected);
            assert_eq!(object.vertices_mut().len(), expected);
        }
    }

    #[test]
    fn test_invert_twice_is_identity() {
        for object in sample_objects() {
            let mut inverted = object.clone();
            inverted.invert();
            inverted.invert();
            assert_eq!(inverted, object);
        }
    }

    #[test]
    fn test_invert_vertex_order() {
        let a = v(0.0, 0.0, 0.0);
        let b = v(1.0, 0.0, 0.0);
        let c = v(1.0, 1.0, 0.0);
        let d = v(0.0, 1.0, 0.0);

        let mut triangle = LdObject::triangle(ColorCode::MAIN, [a, b, c]);
        triangle.invert();
        assert_eq!(triangle.vertices(), &[a, c, b]);

        let mut quad = LdObject::quadrilateral(ColorCode::MAIN, [a, b, c, d]);
        quad.invert();
        assert_eq!(quad.vertices(), &[a, d, c, b]);

        let mut cond = LdObject::conditional_line(ColorCode::EDGE, [a, b, c, d]);
        cond.invert();
        assert_eq!(cond.vertices(), &[b, a, c, d]);

        let mut line = LdObject::line(ColorCode::EDGE, [a, b]);
        line.invert();
        assert_eq!(line.vertices(), &[a, b]);

        let mut bfc = LdObject::Bfc(BfcStatement::CertifyCw);
        bfc.invert();
        assert_eq!(bfc, LdObject::Bfc(BfcStatement::CertifyCcw));
    }

    #[test]
    fn test_move_by() {
        let mut reference = LdObject::subfile_reference(
            ColorCode::MAIN,
            v(1.0, 1.0, 1.0),
            Matrix::IDENTITY,
            "stud.dat",
        );
        reference.move_by(v(0.0, -24.0, 0.0));
        match &reference {
            LdObject::SubfileReference { position, .. } => {
                assert_eq!(*position, v(1.0, -23.0, 1.0))
            }
            other => panic!("unexpected object {:?}", other),
        }

        let mut triangle =
            LdObject::triangle(ColorCode::MAIN, [v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(0.0, 1.0, 0.0)]);
        triangle.move_by(v(10.0, 0.0, 0.0));
        assert_eq!(triangle.vertices()[2], v(10.0, 1.0, 0.0));
    }

    #[test]
    fn test_transform_composes_reference_pose() {
        let rotation = Matrix::new([0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        let mut reference = LdObject::subfile_reference(
            ColorCode::MAIN,
            v(1.0, 0.0, 0.0),
            Matrix::IDENTITY,
            "stud.dat",
        );
        reference.transform(&rotation, &v(0.0, 0.0, 5.0));

        let LdObject::SubfileReference {
            position,
            transform,
            ..
        } = reference
        else {
            panic!("reference changed kind");
        };
        assert_eq!(position, v(0.0, 1.0, 5.0));
        assert_eq!(transform, rotation);
    }

    #[test]
    fn test_color_accessors() {
        let mut comment = LdObject::comment("hello");
        assert_eq!(comment.color(), None);
        assert!(!comment.set_color(ColorCode(4)));

        let mut line = LdObject::line(ColorCode::EDGE, [Vertex::ORIGIN, v(1.0, 0.0, 0.0)]);
        assert!(line.set_color(ColorCode(4)));
        assert_eq!(line.color(), Some(ColorCode(4)));
        assert!(line.kind().has_color());
    }

    #[test]
    fn test_split_quad() {
        let quad = LdObject::quadrilateral(
            ColorCode(2),
            [v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(1.0, 1.0, 0.0), v(0.0, 1.0, 0.0)],
        );
        let [first, second] = quad.split_quad().unwrap();
        assert_eq!(
            first,
            LdObject::triangle(ColorCode(2), [v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(0.0, 1.0, 0.0)])
        );
        assert_eq!(
            second,
            LdObject::triangle(ColorCode(2), [v(1.0, 0.0, 0.0), v(1.0, 1.0, 0.0), v(0.0, 1.0, 0.0)])
        );
        assert!(LdObject::Empty.split_quad().is_none());
    }

    #[test]
    fn test_to_edge_line() {
        let cond = LdObject::conditional_line(
            ColorCode::EDGE,
            [v(0.0, 0.0, 0.0), v(0.0, 5.0, 0.0), v(1.0, 0.0, 0.0), v(-1.0, 0.0, 0.0)],
        );
        assert_eq!(
            cond.to_edge_line(),
            Some(LdObject::line(ColorCode::EDGE, [v(0.0, 0.0, 0.0), v(0.0, 5.0, 0.0)]))
        );
    }

    #[test]
    fn test_describe_objects() {
        let objects = sample_objects();
        assert_eq!(describe_objects(&objects[..0]), "nothing");
        assert_eq!(describe_objects(&objects[2..4]), "1 line, 1 triangle");

        let comments = vec![LdObject::comment("a"), LdObject::comment("b")];
        assert_eq!(describe_objects(&comments), "2 comments");
    }
}
