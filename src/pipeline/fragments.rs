//! Styled text extraction via pdfium.
//!
//! pdfium exposes the text layer one character at a time, each with its font,
//! size, weight and bounding box. [`FragmentAssembler`] folds consecutive
//! characters that share a style and sit on the same baseline into
//! [`TextFragment`]s, the unit the rest of the pipeline works with.
//!
//! All pdfium calls run inside `spawn_blocking`: the library is synchronous
//! and CPU-bound, and with the `thread_safe` feature every call is serialised
//! behind a global lock anyway.

use crate::error::OutlineError;
use crate::model::{BBox, TextFragment, BOLD_FLAG};
use crate::output::DocumentMetadata;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming the pdfium shared library (file or directory).
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Styled fragments of a whole document.
#[derive(Debug, Clone, Default)]
pub struct ExtractedDocument {
    pub fragments: Vec<TextFragment>,
    pub page_count: usize,
}

/// Bind to pdfium: `$PDFIUM_LIB_PATH`, then the working directory, then the
/// system library path.
pub fn bind_pdfium() -> Result<Pdfium, OutlineError> {
    let bindings = match std::env::var_os(PDFIUM_LIB_PATH_ENV) {
        Some(configured) => {
            let configured = PathBuf::from(configured);
            let library = if configured.is_dir() {
                Pdfium::pdfium_platform_library_name_at_path(&configured)
            } else {
                configured
            };
            Pdfium::bind_to_library(&library)
        }
        None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(|e| OutlineError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

/// Extract styled fragments from every page of a PDF.
pub async fn extract_fragments(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<ExtractedDocument, OutlineError> {
    let path = pdf_path.to_path_buf();
    let password = password.map(str::to_string);

    tokio::task::spawn_blocking(move || extract_fragments_blocking(&path, password.as_deref()))
        .await
        .map_err(|e| OutlineError::Internal(format!("Extraction task panicked: {}", e)))?
}

/// Blocking implementation of [`extract_fragments`].
pub fn extract_fragments_blocking(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<ExtractedDocument, OutlineError> {
    let pdfium = bind_pdfium()?;
    let document = load_document(&pdfium, pdf_path, password)?;

    let pages = document.pages();
    let page_count = pages.len() as usize;
    let mut fragments = Vec::new();

    for (index, page) in pages.iter().enumerate() {
        let page_height = page.height().value;
        let text = page
            .text()
            .map_err(|e| OutlineError::TextExtractionFailed {
                page: index + 1,
                detail: format!("{:?}", e),
            })?;

        let mut assembler = FragmentAssembler::new(index);
        for ch in text.chars().iter() {
            assembler.push(glyph_from_char(&ch, page_height));
        }
        let page_fragments = assembler.finish();
        debug!("Page {}: {} fragments", index + 1, page_fragments.len());
        fragments.extend(page_fragments);
    }

    info!(
        "Extracted {} fragments from {} pages of {}",
        fragments.len(),
        page_count,
        pdf_path.display()
    );
    Ok(ExtractedDocument {
        fragments,
        page_count,
    })
}

/// Info-dictionary metadata without walking the text layer.
pub async fn extract_metadata(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<DocumentMetadata, OutlineError> {
    let path = pdf_path.to_path_buf();
    let password = password.map(str::to_string);

    tokio::task::spawn_blocking(move || extract_metadata_blocking(&path, password.as_deref()))
        .await
        .map_err(|e| OutlineError::Internal(format!("Metadata task panicked: {}", e)))?
}

fn extract_metadata_blocking(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<DocumentMetadata, OutlineError> {
    let pdfium = bind_pdfium()?;
    let document = load_document(&pdfium, pdf_path, password)?;
    let metadata = document.metadata();

    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata
            .get(tag)
            .map(|t| t.value().trim().to_string())
            .filter(|v| !v.is_empty())
    };

    Ok(DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        page_count: document.pages().len() as usize,
    })
}

fn load_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, OutlineError> {
    pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let detail = format!("{:?}", e);
        if detail.to_lowercase().contains("password") {
            if password.is_some() {
                OutlineError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                OutlineError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            OutlineError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail,
            }
        }
    })
}

// ── Character assembly ───────────────────────────────────────────────────────

/// One character of the text layer, in top-left page coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub font_size: f32,
    pub font_name: String,
    pub is_bold: bool,
    /// `None` for characters pdfium synthesised (generated spaces, line breaks).
    pub bbox: Option<BBox>,
}

#[allow(deprecated)] // PdfRect field access deprecated in 0.8.28, removed in 0.9.0
fn glyph_from_char(ch: &PdfPageTextChar<'_>, page_height: f32) -> Glyph {
    let font_size = ch.scaled_font_size().value;
    let baseline = ch.origin_y().ok().map(|y| page_height - y.value);
    let bbox = ch
        .loose_bounds()
        .or_else(|_| ch.tight_bounds())
        .ok()
        .map(|rect| {
            glyph_box(
                rect.left.value,
                rect.right.value,
                page_height - rect.top.value,
                page_height - rect.bottom.value,
                baseline,
                font_size,
            )
        })
        .filter(|b| b.x1 > b.x0 || b.y1 > b.y0);

    Glyph {
        ch: ch.unicode_char().unwrap_or('\u{FFFD}'),
        font_size,
        font_name: ch.font_name(),
        is_bold: ch.font_weight().is_some_and(is_bold_weight),
        bbox,
    }
}

/// Box of a glyph in top-left coordinates.
///
/// The top edge is measured up from the baseline by one font size, so faces
/// with different ascents on the same baseline share a top edge and land on
/// one line. Without a baseline the pdfium bounds are used as they are.
fn glyph_box(
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
    baseline: Option<f32>,
    font_size: f32,
) -> BBox {
    match baseline {
        Some(base) if font_size > 0.0 => BBox::new(left, base - font_size, right, bottom.max(base)),
        _ => BBox::new(left, top, right, bottom),
    }
}

fn is_bold_weight(weight: PdfFontWeight) -> bool {
    match weight {
        PdfFontWeight::Weight600
        | PdfFontWeight::Weight700Bold
        | PdfFontWeight::Weight800
        | PdfFontWeight::Weight900 => true,
        PdfFontWeight::Custom(w) => w >= 600,
        _ => false,
    }
}

/// Folds the characters of one page into style-homogeneous fragments.
///
/// A new fragment starts when the font or size changes, when the pen jumps
/// vertically by more than half the font size, or when it moves backwards.
/// A horizontal gap wider than [`FragmentAssembler::SPACE_GAP`] em becomes a
/// space, since many PDFs position words without emitting space characters.
pub struct FragmentAssembler {
    page: usize,
    current: Option<Open>,
    done: Vec<TextFragment>,
}

struct Open {
    text: String,
    font_size: f32,
    font_name: String,
    is_bold: bool,
    bbox: BBox,
    last: BBox,
}

impl FragmentAssembler {
    pub const SPACE_GAP: f32 = 0.3;

    pub fn new(page: usize) -> Self {
        Self {
            page,
            current: None,
            done: Vec::new(),
        }
    }

    pub fn push(&mut self, glyph: Glyph) {
        if glyph.ch == '\n' || glyph.ch == '\r' {
            self.flush();
            return;
        }
        if glyph.ch.is_whitespace() || glyph.ch.is_control() {
            if let Some(open) = self.current.as_mut() {
                if !open.text.ends_with(' ') {
                    open.text.push(' ');
                }
            }
            return;
        }
        let Some(bbox) = glyph.bbox else {
            return;
        };

        if let Some(open) = self.current.as_mut() {
            if continues(open, &glyph, &bbox) {
                let gap = bbox.x0 - open.last.x1;
                if gap > Self::SPACE_GAP * glyph.font_size && !open.text.ends_with(' ') {
                    open.text.push(' ');
                }
                open.text.push(glyph.ch);
                open.bbox = open.bbox.union(&bbox);
                open.last = bbox;
                return;
            }
        }

        self.flush();
        self.current = Some(Open {
            text: glyph.ch.to_string(),
            font_size: glyph.font_size,
            font_name: glyph.font_name,
            is_bold: glyph.is_bold,
            bbox,
            last: bbox,
        });
    }

    pub fn finish(mut self) -> Vec<TextFragment> {
        self.flush();
        self.done
    }

    fn flush(&mut self) {
        let Some(open) = self.current.take() else {
            return;
        };
        let text = open.text.trim_end();
        if text.is_empty() {
            return;
        }
        let flags = if open.is_bold { BOLD_FLAG } else { 0 };
        self.done.push(TextFragment::with_flags(
            text,
            open.font_size,
            open.font_name,
            flags,
            open.bbox,
            self.page,
        ));
    }
}

fn continues(open: &Open, glyph: &Glyph, bbox: &BBox) -> bool {
    let size = glyph.font_size.max(1.0);
    open.font_name == glyph.font_name
        && (open.font_size - glyph.font_size).abs() < 0.01
        && open.is_bold == glyph.is_bold
        && (bbox.y0 - open.last.y0).abs() <= 0.5 * size
        && bbox.x0 >= open.last.x0 - 0.5 * size
}
