//! Directory batch processing.
//!
//! Every `*.pdf` in the input directory gets a `<stem>.json` in the output
//! directory. Documents are independent: up to `concurrency` of them run at
//! once, and a document that fails is logged, reported, and written as an
//! empty outline so downstream consumers always find one file per input.
//! A panic while processing one document is caught and handled the same way.

use crate::config::OutlineConfig;
use crate::error::OutlineError;
use crate::extract::{extract_outline, write_outline};
use crate::output::{BatchReport, DocumentOutline, DocumentReport};
use crate::pipeline::input;
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

/// Process every PDF in `input_dir`, writing JSON outlines to `output_dir`.
///
/// # Errors
/// Only fails when the input directory cannot be listed or the output
/// directory cannot be created. Per-document failures are recorded in the
/// returned [`BatchReport`] instead.
pub async fn process_directory(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &OutlineConfig,
) -> Result<BatchReport, OutlineError> {
    let start = Instant::now();
    let input_dir = input_dir.as_ref();
    let output_dir = output_dir.as_ref();

    let pdfs = input::discover_pdfs(input_dir)?;
    if pdfs.is_empty() {
        warn!("{}", OutlineError::NoInputs { dir: input_dir.to_path_buf() });
        return Ok(BatchReport::default());
    }

    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| OutlineError::OutputWriteFailed {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

    info!(
        "Processing {} PDFs from {} into {}",
        pdfs.len(),
        input_dir.display(),
        output_dir.display()
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(pdfs.len());
    }

    let mut documents: Vec<DocumentReport> = stream::iter(pdfs)
        .map(|pdf| process_guarded(pdf, output_dir, config))
        .buffer_unordered(config.concurrency)
        .collect()
        .await;
    documents.sort_by(|a, b| a.input.cmp(&b.input));

    let failed = documents.iter().filter(|d| d.error.is_some()).count();
    let report = BatchReport {
        succeeded: documents.len() - failed,
        failed,
        documents,
        total_duration_ms: start.elapsed().as_millis() as u64,
    };

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(report.documents.len(), report.succeeded);
    }
    info!(
        "Batch done: {} succeeded, {} failed in {}ms",
        report.succeeded, report.failed, report.total_duration_ms
    );
    Ok(report)
}

/// Output path for `pdf` inside `output_dir`: same stem, `.json` extension.
pub fn output_path_for(pdf: &Path, output_dir: &Path) -> PathBuf {
    let mut name = pdf.file_stem().unwrap_or(pdf.as_os_str()).to_os_string();
    name.push(".json");
    output_dir.join(name)
}

/// Run [`process_one`], turning a panic inside it into a failed document.
async fn process_guarded(pdf: PathBuf, output_dir: &Path, config: &OutlineConfig) -> DocumentReport {
    let attempt = AssertUnwindSafe(process_one(pdf.clone(), output_dir, config))
        .catch_unwind()
        .await;
    match attempt {
        Ok(report) => report,
        Err(payload) => {
            let message = OutlineError::Internal(format!(
                "panicked: {}",
                panic_message(payload.as_ref())
            ))
            .to_string();
            error!("Failed to process {}: {}", pdf.display(), message);
            if let Some(ref cb) = config.progress_callback {
                let name = pdf
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let _ = std::panic::catch_unwind(AssertUnwindSafe(|| {
                    cb.on_document_error(&name, &message)
                }));
            }
            degraded(pdf, output_dir, message).await
        }
    }
}

/// Write an empty outline for `pdf` and report `message` as its failure.
async fn degraded(pdf: PathBuf, output_dir: &Path, message: String) -> DocumentReport {
    let output = output_path_for(&pdf, output_dir);
    if let Err(e) = write_outline(&DocumentOutline::empty(), &output).await {
        error!("{}", e);
    }
    DocumentReport {
        input: pdf,
        output,
        headings: 0,
        title_found: false,
        error: Some(message),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

async fn process_one(pdf: PathBuf, output_dir: &Path, config: &OutlineConfig) -> DocumentReport {
    let name = pdf
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let output = output_path_for(&pdf, output_dir);
    if let Some(ref cb) = config.progress_callback {
        cb.on_document_start(&name);
    }

    let (outline, mut failure) = match extract_outline(&pdf, config).await {
        Ok(outline) => (outline, None),
        Err(e) => {
            error!("Failed to process {}: {}", pdf.display(), e);
            (DocumentOutline::empty(), Some(e.to_string()))
        }
    };

    if let Err(e) = write_outline(&outline, &output).await {
        error!("{}", e);
        if failure.is_none() {
            failure = Some(e.to_string());
        }
    }

    if let Some(ref cb) = config.progress_callback {
        match &failure {
            None => cb.on_document_complete(&name, outline.outline.len()),
            Some(msg) => cb.on_document_error(&name, msg),
        }
    }

    DocumentReport {
        input: pdf,
        output,
        headings: outline.outline.len(),
        title_found: !outline.title.is_empty(),
        error: failure,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::BatchProgressCallback;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Counter {
        started: AtomicUsize,
        errors: AtomicUsize,
        finished: AtomicUsize,
    }

    impl BatchProgressCallback for Counter {
        fn on_document_start(&self, _name: &str) {
            self.started.fetch_add(1, Ordering::SeqCst);
        }
        fn on_document_error(&self, _name: &str, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
        fn on_batch_complete(&self, _total: usize, _success: usize) {
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Panics while starting the document named `poison`.
    struct Faulty {
        poison: &'static str,
    }

    impl BatchProgressCallback for Faulty {
        fn on_document_start(&self, name: &str) {
            if name == self.poison {
                panic!("callback failed on {name}");
            }
        }
    }

    #[test]
    fn output_keeps_the_stem() {
        assert_eq!(
            output_path_for(Path::new("/in/file01.PDF"), Path::new("/out")),
            PathBuf::from("/out/file01.json")
        );
        assert_eq!(
            output_path_for(Path::new("/in/report.v2.pdf"), Path::new("/out")),
            PathBuf::from("/out/report.v2.json")
        );
    }

    #[tokio::test]
    async fn empty_directory_yields_empty_report() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let report = process_directory(input.path(), output.path(), &OutlineConfig::default())
            .await
            .unwrap();
        assert!(report.documents.is_empty());
        assert_eq!(report.failed, 0);
    }

    #[tokio::test]
    async fn missing_input_directory_is_fatal() {
        let output = TempDir::new().unwrap();
        let result = process_directory(
            output.path().join("absent"),
            output.path(),
            &OutlineConfig::default(),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn failing_documents_degrade_to_empty_outlines() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        std::fs::write(input.path().join("broken.pdf"), b"not a pdf at all").unwrap();
        std::fs::write(input.path().join("empty.PDF"), b"").unwrap();
        std::fs::write(input.path().join("ignored.txt"), b"text").unwrap();

        let counter = Arc::new(Counter::default());
        let config = OutlineConfig::builder()
            .concurrency(2)
            .progress_callback(counter.clone())
            .build()
            .unwrap();
        let report = process_directory(input.path(), output.path().join("json"), &config)
            .await
            .unwrap();

        assert_eq!(report.documents.len(), 2);
        assert_eq!(report.failed, 2);
        assert_eq!(report.succeeded, 0);
        for doc in &report.documents {
            assert!(doc.error.as_deref().unwrap().contains("not a valid PDF"));
            let json = std::fs::read_to_string(&doc.output).unwrap();
            let outline: DocumentOutline = serde_json::from_str(&json).unwrap();
            assert_eq!(outline, DocumentOutline::empty());
        }
        assert!(output.path().join("json/broken.json").exists());
        assert!(output.path().join("json/empty.json").exists());
        assert!(!output.path().join("json/ignored.json").exists());

        assert_eq!(counter.started.load(Ordering::SeqCst), 2);
        assert_eq!(counter.errors.load(Ordering::SeqCst), 2);
        assert_eq!(counter.finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn panic_in_one_document_does_not_abort_the_batch() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        std::fs::write(input.path().join("a.pdf"), b"plain").unwrap();
        std::fs::write(input.path().join("boom.pdf"), b"plain").unwrap();
        std::fs::write(input.path().join("c.pdf"), b"plain").unwrap();

        let config = OutlineConfig::builder()
            .concurrency(1)
            .progress_callback(Arc::new(Faulty { poison: "boom.pdf" }))
            .build()
            .unwrap();
        let report = process_directory(input.path(), output.path(), &config)
            .await
            .unwrap();

        assert_eq!(report.documents.len(), 3);
        assert_eq!(report.failed, 3);
        let boom = &report.documents[1];
        assert!(boom.input.ends_with("boom.pdf"));
        assert!(boom.error.as_deref().unwrap().contains("callback failed on boom.pdf"));

        for stem in ["a", "boom", "c"] {
            let json = std::fs::read_to_string(output.path().join(format!("{stem}.json"))).unwrap();
            let outline: DocumentOutline = serde_json::from_str(&json).unwrap();
            assert_eq!(outline, DocumentOutline::empty());
        }
    }

    #[test]
    fn panic_payloads_are_readable() {
        let text: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(text.as_ref()), "static message");
        let owned: Box<dyn Any + Send> = Box::new(String::from("formatted 42"));
        assert_eq!(panic_message(owned.as_ref()), "formatted 42");
        let other: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }
}
