//! Geometry and line types shared by the pipeline stages.
//!
//! Coordinates follow the top-left origin convention: `y` grows downwards,
//! so a smaller `y0` means higher on the page.

use crate::output::HeadingLevel;
use serde::{Deserialize, Serialize};

/// Font-flags bit that marks a bold span in common PDF toolkits' span flags.
pub const BOLD_FLAG: u32 = 1 << 4;

/// An axis-aligned rectangle in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).abs()
    }
}

/// A styled run of text as produced by the extraction collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    pub font_size: f32,
    pub font_name: String,
    pub is_bold: bool,
    pub bbox: BBox,
    /// Zero-based page index.
    pub page: usize,
}

impl TextFragment {
    /// Build a fragment whose boldness comes from a font-flags bitmask and the font name.
    pub fn with_flags(
        text: impl Into<String>,
        font_size: f32,
        font_name: impl Into<String>,
        flags: u32,
        bbox: BBox,
        page: usize,
    ) -> Self {
        let font_name = font_name.into();
        let is_bold = flags & BOLD_FLAG != 0 || font_name_is_bold(&font_name);
        Self {
            text: text.into(),
            font_size,
            font_name,
            is_bold,
            bbox,
            page,
        }
    }
}

/// Whether a PostScript font name advertises a bold face ("Arial-BoldMT", "Foo,Bold").
pub fn font_name_is_bold(font_name: &str) -> bool {
    let lower = font_name.to_lowercase();
    lower.contains("bold") || lower.contains("black") || lower.contains("heavy")
}

/// One visually coherent line of text on a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalLine {
    /// Non-empty, whitespace-normalised text.
    pub text: String,
    pub font_size: f32,
    pub font_name: String,
    pub is_bold: bool,
    /// Zero-based page index.
    pub page: usize,
    pub bbox: BBox,
}

/// Per-document statistics that parametrise the heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DocumentProfile {
    /// Mode font size of body-length lines.
    pub baseline_font_size: f32,
    /// Mode rounded left x of body-length lines.
    pub left_margin: f32,
    /// 1 when the first page is a sparse cover page, else 0.
    pub page_offset: u32,
}

/// A line tagged with an inferred heading level.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub level: HeadingLevel,
    pub text: String,
    pub page: usize,
    pub bbox: BBox,
    pub font_size: f32,
}

impl Heading {
    pub fn from_line(line: &LogicalLine, level: HeadingLevel) -> Self {
        Self {
            level,
            text: line.text.clone(),
            page: line.page,
            bbox: line.bbox,
            font_size: line.font_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_from_flags_or_name() {
        let bbox = BBox::default();
        assert!(TextFragment::with_flags("a", 10.0, "Times", BOLD_FLAG, bbox, 0).is_bold);
        assert!(TextFragment::with_flags("a", 10.0, "Arial-BoldMT", 0, bbox, 0).is_bold);
        assert!(!TextFragment::with_flags("a", 10.0, "Arial", 2, bbox, 0).is_bold);
    }

    #[test]
    fn union_covers_both() {
        let a = BBox::new(10.0, 20.0, 30.0, 32.0);
        let b = BBox::new(40.0, 19.5, 80.0, 31.0);
        assert_eq!(a.union(&b), BBox::new(10.0, 19.5, 80.0, 32.0));
    }
}
