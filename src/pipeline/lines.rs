//! Line aggregation and document profiling.
//!
//! Fragments whose top edge rounds to the same integer on the same page form
//! one [`LogicalLine`]; rounding absorbs the sub-point jitter between glyph
//! runs of one visual line while keeping neighbouring lines apart. The
//! leftmost fragment decides the line's style, since headings are assumed to
//! be styled uniformly across a line.
//!
//! The [`DocumentProfile`] is computed from "body-length" lines only: body
//! text dominates any real document by line count, so the mode of its font
//! size and left edge is the document's baseline.

use crate::config::OutlineConfig;
use crate::model::{DocumentProfile, LogicalLine, TextFragment};
use crate::script::{char_count, join_pieces};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use tracing::debug;

/// Group fragments into lines ordered by page, then top edge.
pub fn aggregate_lines(fragments: &[TextFragment], config: &OutlineConfig) -> Vec<LogicalLine> {
    let mut rows: BTreeMap<(usize, i64), Vec<&TextFragment>> = BTreeMap::new();
    for fragment in fragments {
        let key = (fragment.page, fragment.bbox.y0.round() as i64);
        rows.entry(key).or_default().push(fragment);
    }

    let mut lines = Vec::with_capacity(rows.len());
    for (_, mut row) in rows {
        row.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));

        let text = join_pieces(row.iter().map(|f| f.text.as_str()), config.join);
        if text.is_empty() {
            continue;
        }

        // Whitespace-only runs carry no meaningful style.
        let lead = row
            .iter()
            .find(|f| !f.text.trim().is_empty())
            .copied()
            .unwrap_or(row[0]);
        let bbox = row
            .iter()
            .skip(1)
            .fold(row[0].bbox, |acc, f| acc.union(&f.bbox));

        lines.push(LogicalLine {
            text,
            font_size: lead.font_size,
            font_name: lead.font_name.clone(),
            is_bold: lead.is_bold,
            page: lead.page,
            bbox,
        });
    }

    debug!(
        "Aggregated {} fragments into {} lines",
        fragments.len(),
        lines.len()
    );
    lines
}

/// Derive the baseline font size, left margin and cover-page offset.
pub fn build_profile(
    lines: &[LogicalLine],
    page_count: usize,
    config: &OutlineConfig,
) -> DocumentProfile {
    let body: Vec<&LogicalLine> = lines
        .iter()
        .filter(|l| char_count(&l.text) > config.body_text_min_chars)
        .collect();

    let baseline_font_size = mode_by(
        body.iter()
            .map(|l| ((l.font_size * 100.0).round() as i64, l.font_size)),
    )
    .filter(|size| *size > 0.0)
    .unwrap_or(config.default_baseline_font_size);

    let left_margin = mode_by(body.iter().map(|l| {
        let x = l.bbox.x0.round();
        (x as i64, x)
    }))
    .unwrap_or(config.default_left_margin);

    let first_page_lines = lines.iter().filter(|l| l.page == 0).count();
    let page_offset = u32::from(first_page_lines < config.cover_page_max_lines && page_count > 1);

    let profile = DocumentProfile {
        baseline_font_size,
        left_margin,
        page_offset,
    };
    debug!(
        "Profile: baseline={}pt margin={} offset={} ({} body lines, {} on first page)",
        profile.baseline_font_size,
        profile.left_margin,
        profile.page_offset,
        body.len(),
        first_page_lines
    );
    profile
}

/// Most frequent value by key; ties go to the key seen first.
fn mode_by<K, V>(items: impl IntoIterator<Item = (K, V)>) -> Option<V>
where
    K: Eq + Hash,
{
    let mut counts: HashMap<K, (usize, usize, V)> = HashMap::new();
    for (idx, (key, value)) in items.into_iter().enumerate() {
        counts
            .entry(key)
            .and_modify(|e| e.0 += 1)
            .or_insert((1, idx, value));
    }
    counts
        .into_values()
        .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
        .map(|(_, _, value)| value)
}
