//! # pdf-outline
//!
//! Infer a structured outline (title plus H1/H2/H3 headings with page
//! numbers) from the text geometry of a PDF.
//!
//! Many PDFs carry no bookmarks and no tagged structure. Their headings are
//! still visible to a reader: numbered section prefixes, canonical section
//! names, bold text larger than the body. This crate reads the styled text
//! layer through pdfium and applies deterministic, explainable heuristics to
//! recover that outline, across Latin, CJK and Devanagari scripts.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input      validate path and %PDF magic
//!  ├─ 2. Fragments  styled text runs via pdfium (spawn_blocking)
//!  ├─ 3. Lines      group runs into lines; profile body font and margin
//!  ├─ 4. Title      largest text near the top of page one
//!  ├─ 5. Classify   ordered heading rules (numbering, keywords, style)
//!  └─ 6. Finalize   order, merge wrapped headings, dedup, page numbers
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_outline::{extract_outline, OutlineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OutlineConfig::default();
//!     let outline = extract_outline("document.pdf", &config).await?;
//!     println!("{}", outline.to_json_pretty()?);
//!     Ok(())
//! }
//! ```
//!
//! Fragments from another extractor can be fed straight into
//! [`outline_from_fragments`]; nothing after extraction needs pdfium.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf-outline` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf-outline = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod script;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::process_directory;
pub use config::{ContinuationMerge, JoinPolicy, KeywordGate, OutlineConfig, OutlineConfigBuilder};
pub use error::OutlineError;
pub use extract::{
    extract_outline, extract_outline_from_bytes, extract_outline_sync, extract_to_file, inspect,
    outline_from_fragments, outline_from_lines,
};
pub use model::{BBox, DocumentProfile, Heading, LogicalLine, TextFragment};
pub use output::{
    BatchReport, DocumentMetadata, DocumentOutline, DocumentReport, HeadingLevel, OutlineEntry,
};
pub use pipeline::fragments::ExtractedDocument;
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
