//! Single-document entry points.
//!
//! The inference core ([`outline_from_lines`], [`outline_from_fragments`]) is
//! synchronous and infallible; it works on fragments from any source. The
//! async wrappers add path validation and pdfium extraction in front of it.

use crate::config::OutlineConfig;
use crate::error::OutlineError;
use crate::model::{LogicalLine, TextFragment};
use crate::output::{DocumentMetadata, DocumentOutline};
use crate::pipeline::{classify, finalize, fragments, input, lines, title};
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Infer the outline of a document from its logical lines.
pub fn outline_from_lines(
    lines: &[LogicalLine],
    page_count: usize,
    config: &OutlineConfig,
) -> DocumentOutline {
    let profile = lines::build_profile(lines, page_count, config);
    let mut title = title::extract_title(lines, config);
    let headings = classify::classify_lines(lines, &profile, config);
    let outline = finalize::finalize_outline(headings, &profile, config);

    if config.trailing_space && !title.is_empty() {
        title.push(' ');
    }
    DocumentOutline { title, outline }
}

/// Infer the outline of a document from styled text fragments.
///
/// # Example
/// ```rust
/// use pdf_outline::{outline_from_fragments, BBox, OutlineConfig, TextFragment};
///
/// let fragment = |text: &str, size: f32, bold: bool, y0: f32| TextFragment {
///     text: text.into(),
///     font_size: size,
///     font_name: "Helvetica".into(),
///     is_bold: bold,
///     bbox: BBox::new(72.0, y0, 300.0, y0 + size),
///     page: 0,
/// };
/// let fragments = [
///     fragment("1. Introduction", 16.0, true, 100.0),
///     fragment("This is body text.", 10.0, false, 130.0),
/// ];
///
/// let outline = outline_from_fragments(&fragments, 1, &OutlineConfig::default());
/// assert_eq!(outline.outline.len(), 1);
/// assert_eq!(outline.outline[0].text, "1. Introduction ");
/// assert_eq!(outline.outline[0].page, 1);
/// ```
pub fn outline_from_fragments(
    fragments: &[TextFragment],
    page_count: usize,
    config: &OutlineConfig,
) -> DocumentOutline {
    let lines = lines::aggregate_lines(fragments, config);
    outline_from_lines(&lines, page_count, config)
}

/// Extract the outline of a PDF file.
///
/// # Errors
/// Returns `Err(OutlineError)` when the file cannot be read, is not a PDF,
/// is encrypted without a (correct) password, or pdfium is unavailable.
/// A readable PDF with no detectable structure is not an error: it yields
/// an empty title and outline.
pub async fn extract_outline(
    pdf_path: impl AsRef<Path>,
    config: &OutlineConfig,
) -> Result<DocumentOutline, OutlineError> {
    let start = Instant::now();
    let path = input::resolve_input(pdf_path)?;

    let document = fragments::extract_fragments(&path, config.password.as_deref()).await?;
    let outline = outline_from_fragments(&document.fragments, document.page_count, config);

    info!(
        "{}: {} headings, title {:?} ({}ms)",
        path.display(),
        outline.outline.len(),
        outline.title.trim_end(),
        start.elapsed().as_millis()
    );
    Ok(outline)
}

/// Synchronous wrapper around [`extract_outline`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_outline_sync(
    pdf_path: impl AsRef<Path>,
    config: &OutlineConfig,
) -> Result<DocumentOutline, OutlineError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| OutlineError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(extract_outline(pdf_path, config))
}

/// Extract the outline of an in-memory PDF.
///
/// pdfium opens documents by path, so `bytes` go through a managed
/// [`tempfile`] that is removed on return.
pub async fn extract_outline_from_bytes(
    bytes: &[u8],
    config: &OutlineConfig,
) -> Result<DocumentOutline, OutlineError> {
    let mut tmp = tempfile::Builder::new()
        .suffix(".pdf")
        .tempfile()
        .map_err(|e| OutlineError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| OutlineError::Internal(format!("tempfile write: {e}")))?;
    extract_outline(tmp.path(), config).await
}

/// Extract the outline and write it as pretty JSON to `output_path`.
///
/// Uses atomic write (temp file + rename) so readers never see a partial file.
pub async fn extract_to_file(
    pdf_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &OutlineConfig,
) -> Result<DocumentOutline, OutlineError> {
    let outline = extract_outline(pdf_path, config).await?;
    write_outline(&outline, output_path.as_ref()).await?;
    Ok(outline)
}

/// Serialise `outline` to `path` atomically, creating parent directories.
pub async fn write_outline(outline: &DocumentOutline, path: &Path) -> Result<(), OutlineError> {
    let json = outline.to_json_pretty()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| OutlineError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, json.as_bytes())
        .await
        .map_err(|e| OutlineError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| OutlineError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    debug!("Wrote {}", path.display());
    Ok(())
}

/// Read PDF metadata without walking the text layer.
pub async fn inspect(
    pdf_path: impl AsRef<Path>,
    password: Option<&str>,
) -> Result<DocumentMetadata, OutlineError> {
    let path = input::resolve_input(pdf_path)?;
    fragments::extract_metadata(&path, password).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;
    use crate::output::{HeadingLevel, OutlineEntry};

    fn line(text: &str, y0: f32, size: f32, bold: bool, page: usize) -> LogicalLine {
        LogicalLine {
            text: text.into(),
            font_size: size,
            font_name: "Helvetica".into(),
            is_bold: bold,
            page,
            bbox: BBox::new(72.0, y0, 400.0, y0 + size),
        }
    }

    #[test]
    fn no_lines_gives_empty_document() {
        let outline = outline_from_lines(&[], 0, &OutlineConfig::default());
        assert_eq!(outline, DocumentOutline::empty());
    }

    #[test]
    fn numbered_bold_heading_over_body_text() {
        let lines = [
            line("1. Introduction", 100.0, 16.0, true, 0),
            line("This is body text.", 130.0, 10.0, false, 0),
        ];
        let outline = outline_from_lines(&lines, 1, &OutlineConfig::default());
        assert_eq!(
            outline.outline,
            [OutlineEntry {
                level: HeadingLevel::H1,
                text: "1. Introduction ".into(),
                page: 1,
            }]
        );
        // Nothing sits in the top part of the page.
        assert_eq!(outline.title, "");
    }

    #[test]
    fn title_trailing_space_follows_config() {
        let lines = [
            line("Annual Report", 60.0, 24.0, false, 0),
            line("Body text further down the page", 700.0, 10.0, false, 0),
        ];
        let config = OutlineConfig::builder().trailing_space(false).build().unwrap();
        assert_eq!(outline_from_lines(&lines, 1, &config).title, "Annual Report");
        let spaced = outline_from_lines(&lines, 1, &OutlineConfig::default());
        assert_eq!(spaced.title, "Annual Report ");
    }

    #[tokio::test]
    async fn write_outline_is_atomic_and_pretty() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("doc.json");
        let outline = DocumentOutline {
            title: "目次 ".into(),
            outline: Vec::new(),
        };
        write_outline(&outline, &path).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("目次"));
        assert!(written.contains('\n'));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn non_pdf_input_is_rejected_before_pdfium() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.pdf");
        std::fs::write(&path, b"plain text").unwrap();
        let err = extract_outline(&path, &OutlineConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, OutlineError::NotAPdf { .. }));
    }
}
