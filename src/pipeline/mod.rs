//! Pipeline stages for outline inference.
//!
//! Each submodule implements exactly one transformation step. Only the first
//! two touch the file system or pdfium; everything after `fragments` is a
//! pure function of its input and the [`crate::config::OutlineConfig`].
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ fragments ──▶ lines ──▶ title ───────────────┐
//! (path)    (pdfium)      (rows +    (page 1, top)        ├──▶ DocumentOutline
//!                          profile) ──▶ classify ──▶ finalize
//!                                       (rule cascade)  (merge, dedup, pages)
//! ```
//!
//! 1. [`input`]: validate the path and PDF magic bytes; list batch inputs
//! 2. [`fragments`]: walk pdfium's text layer and fold characters into styled
//!    [`crate::model::TextFragment`]s; runs in `spawn_blocking`
//! 3. [`lines`]: group fragments into logical lines and derive the
//!    document profile (baseline size, left margin, cover-page offset)
//! 4. [`title`]: pick the largest text near the top of the first page
//! 5. [`classify`]: run each line through the heading rules, built on the
//!    regexes and predicates in [`patterns`]
//! 6. [`finalize`]: order, repair wrapped headings, deduplicate and number
//!    pages

pub mod classify;
pub mod finalize;
pub mod fragments;
pub mod input;
pub mod lines;
pub mod patterns;
pub mod title;
