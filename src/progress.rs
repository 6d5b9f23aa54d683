//! Progress-callback trait for per-document batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::OutlineConfigBuilder::progress_callback`] to receive
//! events while [`crate::batch::process_directory`] works through a folder.
//! The CLI forwards them to an `indicatif` progress bar; a library user can
//! forward them to a channel, a log, or nothing at all.
//!
//! # Example
//!
//! ```rust
//! use pdf_outline::{BatchProgressCallback, OutlineConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: Arc<AtomicUsize>,
//! }
//!
//! impl BatchProgressCallback for CountingCallback {
//!     fn on_document_complete(&self, name: &str, headings: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{name}: {headings} headings");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     completed: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = OutlineConfig::builder()
//!     .progress_callback(counter as Arc<dyn BatchProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the batch runner as it processes each document.
///
/// Documents are processed concurrently, so every method may be called from
/// different threads at once. All methods default to no-ops.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once before any document is opened.
    fn on_batch_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Called just before a document is opened.
    fn on_document_start(&self, name: &str) {
        let _ = name;
    }

    /// Called when a document's outline has been written.
    fn on_document_complete(&self, name: &str, headings: usize) {
        let _ = (name, headings);
    }

    /// Called when a document failed and an empty outline was written instead.
    fn on_document_error(&self, name: &str, error: &str) {
        let _ = (name, error);
    }

    /// Called once after every document has been attempted.
    fn on_batch_complete(&self, total_documents: usize, success_count: usize) {
        let _ = (total_documents, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::OutlineConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;
