//! Output types: the outline record and batch reports.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Hierarchy depth of a heading; `H1` is the highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Level for a structural number with `segments` dot-separated parts.
    ///
    /// `1.` → H1, `1.2` → H2, `1.2.3` → H3, anything deeper → `None`.
    pub fn from_depth(segments: usize) -> Option<Self> {
        match segments {
            1 => Some(Self::H1),
            2 => Some(Self::H2),
            3 => Some(Self::H3),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::H1 => "H1",
            Self::H2 => "H2",
            Self::H3 => "H3",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finalized outline record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub level: HeadingLevel,
    /// Whitespace-normalised heading text.
    pub text: String,
    /// 1-based page number, corrected for a detected cover page.
    pub page: u32,
}

/// The complete result for one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentOutline {
    pub title: String,
    pub outline: Vec<OutlineEntry>,
}

impl DocumentOutline {
    /// The value written for a document that could not be processed.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Pretty-printed JSON, non-ASCII kept verbatim.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Info-dictionary metadata of a PDF, read without walking its text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub page_count: usize,
}

/// Outcome for one document of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub headings: usize,
    pub title_found: bool,
    /// Set when the document degraded to an empty outline.
    pub error: Option<String>,
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub documents: Vec<DocumentReport>,
    pub succeeded: usize,
    pub failed: usize,
    pub total_duration_ms: u64,
}
