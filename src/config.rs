//! Configuration types for outline inference.
//!
//! Every threshold the heuristics use lives in [`OutlineConfig`], built via
//! its [`OutlineConfigBuilder`]. The engine never reads ambient state: the
//! config is passed explicitly to the profiler, the title extractor, the
//! classifier and the finaliser, so a test can drive any rule with a
//! synthetic profile and a hand-picked threshold.

use crate::error::OutlineError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for outline inference.
///
/// Built via [`OutlineConfig::builder()`] or using [`OutlineConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf_outline::{KeywordGate, OutlineConfig};
///
/// let config = OutlineConfig::builder()
///     .keyword_gate(KeywordGate::Always)
///     .numbered_margin_tolerance(None)
///     .concurrency(8)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct OutlineConfig {
    // ── Profile ──────────────────────────────────────────────────────────
    /// A line counts as body text when it has strictly more characters than
    /// this. Body lines feed the baseline font size and left margin. Default: 15.
    pub body_text_min_chars: usize,

    /// Baseline font size used when no body-length line exists. Default: 10.0.
    pub default_baseline_font_size: f32,

    /// Left margin used when no body-length line exists. Default: 72.0 (one inch).
    pub default_left_margin: f32,

    /// A multi-page document whose first page has fewer lines than this is
    /// treated as having a cover page (`page_offset = 1`). Default: 10.
    pub cover_page_max_lines: usize,

    /// Script-aware policy for joining fragments and title lines. Default: [`JoinPolicy::Auto`].
    pub join: JoinPolicy,

    // ── Title ────────────────────────────────────────────────────────────
    /// Fraction of the first page's text extent searched for the title. Default: 0.4.
    pub title_top_fraction: f32,

    /// Lines within this many points of the largest top-region size are
    /// title fragments. Default: 0.5.
    pub title_size_tolerance: f32,

    /// A title with fewer alphabetic characters is discarded. Default: 3.
    pub title_min_alphabetic: usize,

    // ── Classifier ───────────────────────────────────────────────────────
    /// Lines shorter than this are never headings. CJK and full-width
    /// characters count as two. Default: 3.
    pub min_heading_chars: usize,

    /// Lines with more words than this are never headings. Default: 20.
    pub max_heading_words: usize,

    /// Numbered headings must start within this many points of the profile's
    /// left margin. `None` disables the check. Default: `Some(15.0)`.
    pub numbered_margin_tolerance: Option<f32>,

    /// Numbered headings must be at least `baseline × ratio` in size. Default: 0.98.
    pub numbered_min_size_ratio: f32,

    /// Styling required for a known section keyword. Default: [`KeywordGate::Emphasized`].
    pub keyword_gate: KeywordGate,

    /// Bold lines larger than `baseline × ratio` fall back to H2. Default: 1.2.
    pub emphasis_size_ratio: f32,

    /// Emphasis fallback applies to lines with fewer words than this. Default: 15.
    pub emphasis_max_words: usize,

    /// Uppercase lines larger than `baseline × ratio` fall back to H1. Default: 1.8.
    pub poster_size_ratio: f32,

    /// Poster fallback applies to lines with fewer words than this. Default: 10.
    pub poster_max_words: usize,

    // ── Finaliser ────────────────────────────────────────────────────────
    /// Trigger conditions for merging a wrapped numbered heading.
    pub continuation: ContinuationMerge,

    /// Append a single trailing space to every entry and to a non-empty title. Default: true.
    pub trailing_space: bool,

    // ── I/O shell ────────────────────────────────────────────────────────
    /// Documents processed concurrently by the batch runner. Default: 4.
    pub concurrency: usize,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Optional batch progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            body_text_min_chars: 15,
            default_baseline_font_size: 10.0,
            default_left_margin: 72.0,
            cover_page_max_lines: 10,
            join: JoinPolicy::default(),
            title_top_fraction: 0.4,
            title_size_tolerance: 0.5,
            title_min_alphabetic: 3,
            min_heading_chars: 3,
            max_heading_words: 20,
            numbered_margin_tolerance: Some(15.0),
            numbered_min_size_ratio: 0.98,
            keyword_gate: KeywordGate::default(),
            emphasis_size_ratio: 1.2,
            emphasis_max_words: 15,
            poster_size_ratio: 1.8,
            poster_max_words: 10,
            continuation: ContinuationMerge::default(),
            trailing_space: true,
            concurrency: 4,
            password: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for OutlineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutlineConfig")
            .field("body_text_min_chars", &self.body_text_min_chars)
            .field("default_baseline_font_size", &self.default_baseline_font_size)
            .field("default_left_margin", &self.default_left_margin)
            .field("cover_page_max_lines", &self.cover_page_max_lines)
            .field("join", &self.join)
            .field("title_top_fraction", &self.title_top_fraction)
            .field("title_size_tolerance", &self.title_size_tolerance)
            .field("numbered_margin_tolerance", &self.numbered_margin_tolerance)
            .field("keyword_gate", &self.keyword_gate)
            .field("emphasis_size_ratio", &self.emphasis_size_ratio)
            .field("poster_size_ratio", &self.poster_size_ratio)
            .field("continuation", &self.continuation)
            .field("trailing_space", &self.trailing_space)
            .field("concurrency", &self.concurrency)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl OutlineConfig {
    /// Create a new builder for `OutlineConfig`.
    pub fn builder() -> OutlineConfigBuilder {
        OutlineConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`OutlineConfig`].
#[derive(Debug)]
pub struct OutlineConfigBuilder {
    config: OutlineConfig,
}

impl OutlineConfigBuilder {
    pub fn body_text_min_chars(mut self, n: usize) -> Self {
        self.config.body_text_min_chars = n;
        self
    }

    pub fn default_baseline_font_size(mut self, size: f32) -> Self {
        self.config.default_baseline_font_size = size;
        self
    }

    pub fn default_left_margin(mut self, x: f32) -> Self {
        self.config.default_left_margin = x;
        self
    }

    pub fn cover_page_max_lines(mut self, n: usize) -> Self {
        self.config.cover_page_max_lines = n;
        self
    }

    pub fn join(mut self, policy: JoinPolicy) -> Self {
        self.config.join = policy;
        self
    }

    pub fn title_top_fraction(mut self, fraction: f32) -> Self {
        self.config.title_top_fraction = fraction;
        self
    }

    pub fn title_size_tolerance(mut self, pt: f32) -> Self {
        self.config.title_size_tolerance = pt.max(0.0);
        self
    }

    pub fn title_min_alphabetic(mut self, n: usize) -> Self {
        self.config.title_min_alphabetic = n;
        self
    }

    pub fn min_heading_chars(mut self, n: usize) -> Self {
        self.config.min_heading_chars = n;
        self
    }

    pub fn max_heading_words(mut self, n: usize) -> Self {
        self.config.max_heading_words = n.max(1);
        self
    }

    pub fn numbered_margin_tolerance(mut self, tolerance: Option<f32>) -> Self {
        self.config.numbered_margin_tolerance = tolerance;
        self
    }

    pub fn numbered_min_size_ratio(mut self, ratio: f32) -> Self {
        self.config.numbered_min_size_ratio = ratio;
        self
    }

    pub fn keyword_gate(mut self, gate: KeywordGate) -> Self {
        self.config.keyword_gate = gate;
        self
    }

    pub fn emphasis_size_ratio(mut self, ratio: f32) -> Self {
        self.config.emphasis_size_ratio = ratio;
        self
    }

    pub fn emphasis_max_words(mut self, n: usize) -> Self {
        self.config.emphasis_max_words = n;
        self
    }

    pub fn poster_size_ratio(mut self, ratio: f32) -> Self {
        self.config.poster_size_ratio = ratio;
        self
    }

    pub fn poster_max_words(mut self, n: usize) -> Self {
        self.config.poster_max_words = n;
        self
    }

    pub fn continuation(mut self, merge: ContinuationMerge) -> Self {
        self.config.continuation = merge;
        self
    }

    pub fn trailing_space(mut self, v: bool) -> Self {
        self.config.trailing_space = v;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<OutlineConfig, OutlineError> {
        let c = &self.config;
        if !(c.title_top_fraction > 0.0 && c.title_top_fraction <= 1.0) {
            return Err(OutlineError::InvalidConfig(format!(
                "title_top_fraction must be in (0, 1], got {}",
                c.title_top_fraction
            )));
        }
        if !(c.default_baseline_font_size > 0.0) {
            return Err(OutlineError::InvalidConfig(format!(
                "default_baseline_font_size must be positive, got {}",
                c.default_baseline_font_size
            )));
        }
        for (name, ratio) in [
            ("numbered_min_size_ratio", c.numbered_min_size_ratio),
            ("emphasis_size_ratio", c.emphasis_size_ratio),
            ("poster_size_ratio", c.poster_size_ratio),
        ] {
            if !(ratio > 0.0) {
                return Err(OutlineError::InvalidConfig(format!(
                    "{name} must be positive, got {ratio}"
                )));
            }
        }
        if let Some(tol) = c.numbered_margin_tolerance {
            if tol < 0.0 {
                return Err(OutlineError::InvalidConfig(format!(
                    "numbered_margin_tolerance must be ≥ 0, got {tol}"
                )));
            }
        }
        if let Some(gap) = c.continuation.max_vertical_gap {
            if gap < 0.0 {
                return Err(OutlineError::InvalidConfig(format!(
                    "continuation.max_vertical_gap must be ≥ 0, got {gap}"
                )));
            }
        }
        if c.concurrency == 0 {
            return Err(OutlineError::InvalidConfig("Concurrency must be ≥ 1".into()));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How text pieces are concatenated when building lines and titles.
///
/// Space-delimited scripts need a separator between fragments; CJK and
/// similar scripts must not get one, or "目次" becomes "目 次".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinPolicy {
    /// Insert a space unless a boundary character is whitespace or belongs
    /// to a script written without spaces. (default)
    #[default]
    Auto,
    /// Always insert one space.
    Space,
    /// Never insert anything.
    Concat,
}

/// Styling a known section keyword ("References", "目次", …) needs before it
/// is accepted as an H1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordGate {
    /// Bold, or larger than the baseline font size. (default)
    #[default]
    Emphasized,
    /// Any style; an exact match is enough.
    Always,
}

/// Trigger conditions for folding a continuation line into a numbered stub.
///
/// A heading like "3. Overview" followed on the same page by "Syllabus" is
/// one heading wrapped over two lines. How eagerly to repair this depends on
/// the layout, so every condition is tunable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContinuationMerge {
    /// Master switch. Default: true.
    pub enabled: bool,
    /// The stub may carry at most this many words after its number. Default: 3.
    pub max_stub_words: usize,
    /// Maximum gap between the stub's bottom and the continuation's top, in
    /// multiples of the stub's font size. `None` ignores the gap. Default: `None`.
    pub max_vertical_gap: Option<f32>,
}

impl Default for ContinuationMerge {
    fn default() -> Self {
        Self {
            enabled: true,
            max_stub_words: 3,
            max_vertical_gap: None,
        }
    }
}

impl ContinuationMerge {
    /// Never merge.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}
