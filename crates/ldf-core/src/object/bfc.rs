//! Back-face culling statements

use std::fmt;

use serde::{Deserialize, Serialize};

/// A `0 BFC ...` statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BfcStatement {
    CertifyCcw,
    Ccw,
    CertifyCw,
    Cw,
    NoCertify,
    InvertNext,
    Clip,
    ClipCcw,
    ClipCw,
    NoClip,
}

impl BfcStatement {
    /// Every statement, in canonical order
    pub const ALL: [BfcStatement; 10] = [
        BfcStatement::CertifyCcw,
        BfcStatement::Ccw,
        BfcStatement::CertifyCw,
        BfcStatement::Cw,
        BfcStatement::NoCertify,
        BfcStatement::InvertNext,
        BfcStatement::Clip,
        BfcStatement::ClipCcw,
        BfcStatement::ClipCw,
        BfcStatement::NoClip,
    ];

    /// Text following `0 BFC `
    pub fn as_str(self) -> &'static str {
        match self {
            BfcStatement::CertifyCcw => "CERTIFY CCW",
            BfcStatement::Ccw => "CCW",
            BfcStatement::CertifyCw => "CERTIFY CW",
            BfcStatement::Cw => "CW",
            BfcStatement::NoCertify => "NOCERTIFY",
            BfcStatement::InvertNext => "INVERTNEXT",
            BfcStatement::Clip => "CLIP",
            BfcStatement::ClipCcw => "CLIP CCW",
            BfcStatement::ClipCw => "CLIP CW",
            BfcStatement::NoClip => "NOCLIP",
        }
    }

    /// Parse the text following `0 BFC `.
    ///
    /// Also accepts the MLCad spellings `CERTIFY CLIP`, `CERTIFY NOCLIP` and
    /// `CERTIFY INVERTNEXT`.
    pub fn from_text(text: &str) -> Option<Self> {
        if let Some(statement) = Self::ALL.into_iter().find(|s| s.as_str() == text) {
            return Some(statement);
        }
        match text {
            "CERTIFY CLIP" => Some(BfcStatement::Clip),
            "CERTIFY NOCLIP" => Some(BfcStatement::NoClip),
            "CERTIFY INVERTNEXT" => Some(BfcStatement::InvertNext),
            _ => None,
        }
    }

    /// Opposite winding within the same family; statements without a winding
    /// are returned unchanged
    pub fn inverted(self) -> Self {
        match self {
            BfcStatement::Cw => BfcStatement::Ccw,
            BfcStatement::Ccw => BfcStatement::Cw,
            BfcStatement::CertifyCw => BfcStatement::CertifyCcw,
            BfcStatement::CertifyCcw => BfcStatement::CertifyCw,
            BfcStatement::ClipCw => BfcStatement::ClipCcw,
            BfcStatement::ClipCcw => BfcStatement::ClipCw,
            other => other,
        }
    }
}

impl fmt::Display for BfcStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
