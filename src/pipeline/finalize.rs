//! Outline finalisation: ordering, continuation repair, dedup, page numbers.

use crate::config::{ContinuationMerge, OutlineConfig};
use crate::model::{DocumentProfile, Heading};
use crate::output::OutlineEntry;
use crate::pipeline::patterns;
use crate::script::{join_pieces, normalize_whitespace};
use std::collections::HashSet;
use tracing::debug;

/// Turn classified headings into the ordered, deduplicated outline.
pub fn finalize_outline(
    mut headings: Vec<Heading>,
    profile: &DocumentProfile,
    config: &OutlineConfig,
) -> Vec<OutlineEntry> {
    headings.sort_by(|a, b| a.page.cmp(&b.page).then(a.bbox.y0.total_cmp(&b.bbox.y0)));

    let before = headings.len();
    let merged = merge_continuations(headings, config);
    let merges = before - merged.len();

    let mut seen = HashSet::new();
    let mut outline = Vec::with_capacity(merged.len());
    for heading in merged {
        let text = normalize_whitespace(&heading.text);
        // A number left without a title is not an outline entry.
        if text.is_empty() || patterns::is_bare_number(&text) {
            continue;
        }
        let page = (heading.page as u32 + 1).saturating_sub(profile.page_offset);
        if !seen.insert((text.to_lowercase(), page)) {
            continue;
        }
        let text = if config.trailing_space {
            format!("{text} ")
        } else {
            text
        };
        outline.push(OutlineEntry {
            level: heading.level,
            text,
            page,
        });
    }

    debug!(
        "Finalized {} headings into {} entries ({} continuation merges)",
        before,
        outline.len(),
        merges
    );
    outline
}

/// Fold each wrapped numbered stub together with the line that continues it.
fn merge_continuations(headings: Vec<Heading>, config: &OutlineConfig) -> Vec<Heading> {
    let merge = &config.continuation;
    if !merge.enabled {
        return headings;
    }

    let mut out = Vec::with_capacity(headings.len());
    let mut iter = headings.into_iter().peekable();
    while let Some(mut current) = iter.next() {
        if let Some(next) = iter.next_if(|next| continues(&current, next, merge)) {
            current.text = join_pieces([current.text.as_str(), next.text.as_str()], config.join);
            current.bbox = current.bbox.union(&next.bbox);
        }
        out.push(current);
    }
    out
}

fn continues(stub: &Heading, next: &Heading, merge: &ContinuationMerge) -> bool {
    stub.page == next.page
        && patterns::numbered_stub_words(stub.text.trim())
            .is_some_and(|words| words <= merge.max_stub_words)
        && !patterns::has_number_prefix(next.text.trim())
        && merge
            .max_vertical_gap
            .is_none_or(|gap| next.bbox.y0 - stub.bbox.y1 <= gap * stub.font_size)
}
