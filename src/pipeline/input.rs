//! Input resolution: validate a document path and discover batch inputs.
//!
//! pdfium reports an unreadable or non-PDF file as a generic load failure,
//! so the magic bytes (`%PDF`) and read permission are checked up front and
//! reported as [`OutlineError::NotAPdf`] / [`OutlineError::PermissionDenied`].

use crate::error::OutlineError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate that `path` is a readable file starting with the PDF magic bytes.
pub fn resolve_input(path: impl AsRef<Path>) -> Result<PathBuf, OutlineError> {
    let path = path.as_ref().to_path_buf();

    if !path.is_file() {
        return Err(OutlineError::FileNotFound { path });
    }

    let mut file = match std::fs::File::open(&path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(OutlineError::PermissionDenied { path });
        }
        Err(_) => return Err(OutlineError::FileNotFound { path }),
    };

    // Files shorter than four bytes keep the zero padding in the report.
    let mut magic = [0u8; 4];
    let mut filled = 0;
    while filled < magic.len() {
        match file.read(&mut magic[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(_) => break,
        }
    }
    if &magic != b"%PDF" {
        return Err(OutlineError::NotAPdf { path, magic });
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}

/// Files in `dir` with a `.pdf` extension (any case), sorted by file name.
///
/// Sub-directories are not descended into.
pub fn discover_pdfs(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, OutlineError> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => OutlineError::PermissionDenied {
            path: dir.to_path_buf(),
        },
        _ => OutlineError::FileNotFound {
            path: dir.to_path_buf(),
        },
    })?;

    let mut pdfs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && has_pdf_extension(p))
        .collect();
    pdfs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    debug!("Found {} PDF files in {}", pdfs.len(), dir.display());
    Ok(pdfs)
}

pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
