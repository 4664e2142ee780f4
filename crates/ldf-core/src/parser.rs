//! LDraw line parser
//!
//! [`parse_line`] turns one line of text into an [`LdObject`]. It never fails:
//! a line that cannot be understood becomes [`LdObject::Error`], keeping the
//! original text and the reason, so a document always loads completely.

use serde::{Deserialize, Serialize};

use crate::color::ColorCode;
use crate::math::{Matrix, Vertex};
use crate::object::{BfcStatement, LdObject};

/// Why a line could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ParseError {
    #[error("Illogical line code")]
    IllogicalLineCode,

    #[error("Unknown line code number")]
    UnknownLineCode,

    #[error("Bad amount of tokens, expected {expected}, got {found}")]
    TokenCount { expected: usize, found: usize },

    /// `position` is 1-based
    #[error("Token #{position} was `{token}`, expected a number")]
    InvalidNumber { position: usize, token: String },
}

/// Which spellings of numbers are accepted for coordinates and matrix values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NumberSyntax {
    /// Plain decimals plus an exponent, e.g. `7.99361e-15`
    #[default]
    Scientific,
    /// Plain decimals only
    Decimal,
}

/// Parser settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub number_syntax: NumberSyntax,
}

impl ParseOptions {
    /// Options that reject exponent notation
    pub fn decimal_only() -> Self {
        Self {
            number_syntax: NumberSyntax::Decimal,
        }
    }
}

/// Parse one line of an LDraw file
pub fn parse_line(line: &str, options: &ParseOptions) -> LdObject {
    match parse_statement(line, options) {
        Ok(object) => object,
        Err(reason) => LdObject::Error {
            text: line.to_string(),
            reason,
        },
    }
}

fn parse_statement(line: &str, options: &ParseOptions) -> Result<LdObject, ParseError> {
    let tokens = Tokens::new(line, options);
    let Some(code) = tokens.first() else {
        return Ok(LdObject::Empty);
    };

    match code {
        0 => parse_meta(line, &tokens),
        1 => {
            tokens.expect_count(15)?;
            Ok(LdObject::SubfileReference {
                color: tokens.color(1)?,
                position: tokens.vertex(2)?,
                transform: tokens.matrix(5)?,
                name: tokens.get(14).to_string(),
            })
        }
        2 => {
            tokens.expect_count(8)?;
            Ok(LdObject::Line {
                color: tokens.color(1)?,
                vertices: tokens.vertices(2)?,
            })
        }
        3 => {
            tokens.expect_count(11)?;
            Ok(LdObject::Triangle {
                color: tokens.color(1)?,
                vertices: tokens.vertices(2)?,
            })
        }
        4 => {
            tokens.expect_count(14)?;
            Ok(LdObject::Quadrilateral {
                color: tokens.color(1)?,
                vertices: tokens.vertices(2)?,
            })
        }
        5 => {
            tokens.expect_count(14)?;
            Ok(LdObject::ConditionalLine {
                color: tokens.color(1)?,
                vertices: tokens.vertices(2)?,
            })
        }
        6..=9 => Err(ParseError::UnknownLineCode),
        _ => Err(ParseError::IllogicalLineCode),
    }
}

/// Line code 0: BFC statements, LDForge extensions and plain comments
fn parse_meta(line: &str, tokens: &Tokens<'_>) -> Result<LdObject, ParseError> {
    if tokens.len() > 2 {
        match tokens.get(1) {
            "BFC" => {
                if let Some(statement) = BfcStatement::from_text(&tokens.join_from(2)) {
                    return Ok(LdObject::Bfc(statement));
                }
            }
            "!LDFORGE" => match tokens.get(2) {
                "VERTEX" => {
                    tokens.expect_count(7)?;
                    return Ok(LdObject::VertexStatement {
                        color: tokens.color(3)?,
                        position: tokens.vertex(4)?,
                    });
                }
                "BEZIER_CURVE" => {
                    tokens.expect_count(16)?;
                    return Ok(LdObject::BezierCurve {
                        color: tokens.color(3)?,
                        vertices: tokens.vertices(4)?,
                    });
                }
                _ => {}
            },
            _ => {}
        }
    }

    Ok(LdObject::Comment {
        text: comment_text(line),
    })
}

/// Everything after the leading `0` and one separator, verbatim
fn comment_text(line: &str) -> String {
    let Some(start) = line.find('0') else {
        return String::new();
    };
    let rest = &line[start + 1..];
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_whitespace() => chars.as_str().to_string(),
        _ => rest.to_string(),
    }
}

/// Whitespace-separated tokens of one line, with typed accessors
struct Tokens<'a> {
    tokens: Vec<&'a str>,
    options: &'a ParseOptions,
}

impl<'a> Tokens<'a> {
    fn new(line: &'a str, options: &'a ParseOptions) -> Self {
        Self {
            tokens: line.split_whitespace().collect(),
            options,
        }
    }

    fn len(&self) -> usize {
        self.tokens.len()
    }

    fn get(&self, index: usize) -> &'a str {
        self.tokens[index]
    }

    fn join_from(&self, index: usize) -> String {
        self.tokens[index..].join(" ")
    }

    /// Line code, `None` for a blank line, `Some(10)` for anything that is
    /// not a single digit
    fn first(&self) -> Option<u32> {
        let token = self.tokens.first()?;
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c.to_digit(10).unwrap_or(10)),
            _ => Some(10),
        }
    }

    fn expect_count(&self, expected: usize) -> Result<(), ParseError> {
        if self.tokens.len() != expected {
            return Err(ParseError::TokenCount {
                expected,
                found: self.tokens.len(),
            });
        }
        Ok(())
    }

    fn invalid(&self, index: usize) -> ParseError {
        ParseError::InvalidNumber {
            position: index + 1,
            token: self.tokens[index].to_string(),
        }
    }

    fn color(&self, index: usize) -> Result<ColorCode, ParseError> {
        ColorCode::parse(self.tokens[index]).ok_or_else(|| self.invalid(index))
    }

    fn number(&self, index: usize) -> Result<f64, ParseError> {
        let token = self.tokens[index];
        if !is_number(token, self.options.number_syntax) {
            return Err(self.invalid(index));
        }
        // `1e400` passes the syntax check but overflows to infinity
        match token.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(self.invalid(index)),
        }
    }

    fn vertex(&self, index: usize) -> Result<Vertex, ParseError> {
        Ok(Vertex::new(
            self.number(index)?,
            self.number(index + 1)?,
            self.number(index + 2)?,
        ))
    }

    fn vertices<const N: usize>(&self, index: usize) -> Result<[Vertex; N], ParseError> {
        let mut vertices = [Vertex::ORIGIN; N];
        for (i, vertex) in vertices.iter_mut().enumerate() {
            *vertex = self.vertex(index + i * 3)?;
        }
        Ok(vertices)
    }

    fn matrix(&self, index: usize) -> Result<Matrix, ParseError> {
        let mut values = [0.0; 9];
        for (i, value) in values.iter_mut().enumerate() {
            *value = self.number(index + i)?;
        }
        Ok(Matrix::new(values))
    }
}

/// `[+-]digits[.digits][e[+-]digits]`, with at least one mantissa digit.
/// The exponent is only accepted with [`NumberSyntax::Scientific`].
fn is_number(token: &str, syntax: NumberSyntax) -> bool {
    let unsigned = token.strip_prefix(['+', '-']).unwrap_or(token);
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(at) => (&unsigned[..at], Some(&unsigned[at + 1..])),
        None => (unsigned, None),
    };

    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if whole.len() + fraction.len() == 0 || !all_digits(whole) || !all_digits(fraction) {
        return false;
    }

    match (exponent, syntax) {
        (None, _) => true,
        (Some(_), NumberSyntax::Decimal) => false,
        (Some(exp), NumberSyntax::Scientific) => {
            let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !digits.is_empty() && all_digits(digits)
        }
    }
}
