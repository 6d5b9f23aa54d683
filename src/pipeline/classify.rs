//! Heading classification.
//!
//! Each line runs through an ordered cascade of rules. A rule either rejects
//! the line, assigns a level, or passes it on to the next rule; the first
//! decisive verdict wins and a line no rule claims is body text.
//!
//! ```text
//! noise filters ─► structural numbering ─► section keyword
//!               ─► section prefix ─► poster fallback ─► emphasis fallback
//! ```

use crate::config::{KeywordGate, OutlineConfig};
use crate::model::{DocumentProfile, Heading, LogicalLine};
use crate::output::HeadingLevel;
use crate::pipeline::patterns;
use crate::script::{display_width, word_count};
use tracing::{debug, trace};

/// Outcome of a single rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Definitely not a heading; stop.
    Reject,
    /// A heading at this level; stop.
    Level(HeadingLevel),
    /// No opinion; try the next rule.
    Pass,
}

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct LineContext<'a> {
    pub line: &'a LogicalLine,
    pub profile: &'a DocumentProfile,
    pub config: &'a OutlineConfig,
}

impl LineContext<'_> {
    fn text(&self) -> &str {
        self.line.text.trim()
    }

    fn larger_than_baseline(&self, ratio: f32) -> bool {
        self.line.font_size > self.profile.baseline_font_size * ratio
    }
}

pub type Rule = fn(&LineContext<'_>) -> Verdict;

/// The cascade, in priority order.
pub const RULES: &[(&str, Rule)] = &[
    ("noise", reject_noise),
    ("numbering", structural_numbering),
    ("keyword", section_keyword),
    ("prefix", section_prefix),
    ("poster", poster_fallback),
    ("emphasis", emphasis_fallback),
];

/// Level of `line`, or `None` for body text.
pub fn classify_line(
    line: &LogicalLine,
    profile: &DocumentProfile,
    config: &OutlineConfig,
) -> Option<HeadingLevel> {
    let ctx = LineContext {
        line,
        profile,
        config,
    };
    for (name, rule) in RULES {
        match rule(&ctx) {
            Verdict::Pass => continue,
            Verdict::Reject => {
                trace!(rule = name, text = %line.text, "rejected");
                return None;
            }
            Verdict::Level(level) => {
                trace!(rule = name, text = %line.text, %level, "heading");
                return Some(level);
            }
        }
    }
    None
}

/// Classify every line, keeping the headings in input order.
pub fn classify_lines(
    lines: &[LogicalLine],
    profile: &DocumentProfile,
    config: &OutlineConfig,
) -> Vec<Heading> {
    let headings: Vec<Heading> = lines
        .iter()
        .filter_map(|line| {
            classify_line(line, profile, config).map(|level| Heading::from_line(line, level))
        })
        .collect();
    debug!("Classified {} of {} lines as headings", headings.len(), lines.len());
    headings
}

// ── Rules ────────────────────────────────────────────────────────────────────

fn reject_noise(ctx: &LineContext<'_>) -> Verdict {
    let text = ctx.text();
    // A wrapped heading's number stays a candidate; the finaliser merges or drops it.
    if patterns::is_bare_number(text) {
        return Verdict::Pass;
    }
    if display_width(text) < ctx.config.min_heading_chars
        || word_count(text) > ctx.config.max_heading_words
        || patterns::is_date_like(text)
        || patterns::is_page_footer(text)
        || patterns::has_leader_dots(text)
    {
        return Verdict::Reject;
    }
    Verdict::Pass
}

fn structural_numbering(ctx: &LineContext<'_>) -> Verdict {
    let text = ctx.text();
    let depth = patterns::numbered_depth(text)
        .or_else(|| patterns::is_bare_number(text).then_some(1));
    let Some(level) = depth.and_then(HeadingLevel::from_depth) else {
        return Verdict::Pass;
    };
    if let Some(tolerance) = ctx.config.numbered_margin_tolerance {
        if (ctx.line.bbox.x0 - ctx.profile.left_margin).abs() >= tolerance {
            return Verdict::Pass;
        }
    }
    if ctx.line.font_size < ctx.profile.baseline_font_size * ctx.config.numbered_min_size_ratio {
        return Verdict::Pass;
    }
    Verdict::Level(level)
}

fn section_keyword(ctx: &LineContext<'_>) -> Verdict {
    if !patterns::is_section_keyword(ctx.text()) {
        return Verdict::Pass;
    }
    let gate_open = match ctx.config.keyword_gate {
        KeywordGate::Always => true,
        KeywordGate::Emphasized => ctx.line.is_bold || ctx.larger_than_baseline(1.0),
    };
    if gate_open {
        Verdict::Level(HeadingLevel::H1)
    } else {
        Verdict::Pass
    }
}

fn section_prefix(ctx: &LineContext<'_>) -> Verdict {
    if patterns::has_section_prefix(ctx.text()) {
        Verdict::Level(HeadingLevel::H1)
    } else {
        Verdict::Pass
    }
}

fn poster_fallback(ctx: &LineContext<'_>) -> Verdict {
    let text = ctx.text();
    if ctx.larger_than_baseline(ctx.config.poster_size_ratio)
        && patterns::is_all_uppercase(text)
        && word_count(text) < ctx.config.poster_max_words
    {
        Verdict::Level(HeadingLevel::H1)
    } else {
        Verdict::Pass
    }
}

fn emphasis_fallback(ctx: &LineContext<'_>) -> Verdict {
    let text = ctx.text();
    if ctx.line.is_bold
        && ctx.larger_than_baseline(ctx.config.emphasis_size_ratio)
        && word_count(text) < ctx.config.emphasis_max_words
        && !patterns::ends_sentence(text)
    {
        Verdict::Level(HeadingLevel::H2)
    } else {
        Verdict::Pass
    }
}
