//! Title extraction from the first page.
//!
//! The title is the largest text in the upper part of page one. Titles often
//! wrap, so every top-region line within a small tolerance of the largest
//! size is taken and the pieces are joined in reading order.

use crate::config::OutlineConfig;
use crate::model::LogicalLine;
use crate::script::join_pieces;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static RE_RULE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-_=*.~·]{5,}").unwrap());

/// Best-guess document title, or an empty string.
pub fn extract_title(lines: &[LogicalLine], config: &OutlineConfig) -> String {
    let first_page: Vec<&LogicalLine> = lines.iter().filter(|l| l.page == 0).collect();
    if first_page.is_empty() {
        return String::new();
    }

    let extent = first_page
        .iter()
        .map(|l| l.bbox.y1)
        .fold(f32::NEG_INFINITY, f32::max);
    let cutoff = config.title_top_fraction * extent;
    let top: Vec<&LogicalLine> = first_page
        .into_iter()
        .filter(|l| l.bbox.y0 < cutoff)
        .collect();
    if top.is_empty() {
        return String::new();
    }

    let max_size = top
        .iter()
        .map(|l| l.font_size)
        .fold(f32::NEG_INFINITY, f32::max);
    let mut candidates: Vec<&LogicalLine> = top
        .into_iter()
        .filter(|l| (l.font_size - max_size).abs() <= config.title_size_tolerance)
        .collect();
    candidates.sort_by(|a, b| {
        a.bbox
            .y0
            .total_cmp(&b.bbox.y0)
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });

    let title = join_pieces(candidates.iter().map(|l| l.text.as_str()), config.join);
    if is_degenerate(&title, config) {
        debug!("Rejected degenerate title candidate: {:?}", title);
        return String::new();
    }
    title
}

/// Rule lines, dot leaders and symbol soup are not titles.
fn is_degenerate(title: &str, config: &OutlineConfig) -> bool {
    if title.is_empty() || RE_RULE_RUN.is_match(title) {
        return true;
    }
    let alphabetic = title.chars().filter(|c| c.is_alphabetic()).count();
    if alphabetic < config.title_min_alphabetic {
        return true;
    }
    let visible = title.chars().filter(|c| !c.is_whitespace()).count();
    let alphanumeric = title.chars().filter(|c| c.is_alphanumeric()).count();
    alphanumeric * 2 < visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn line(text: &str, x0: f32, y0: f32, size: f32, page: usize) -> LogicalLine {
        LogicalLine {
            text: text.into(),
            font_size: size,
            font_name: "Helvetica".into(),
            is_bold: false,
            page,
            bbox: BBox::new(x0, y0, x0 + 300.0, y0 + size),
        }
    }

    fn page_one_with(top: Vec<LogicalLine>) -> Vec<LogicalLine> {
        let mut lines = top;
        lines.push(line("Body text somewhere down the page", 72.0, 700.0, 10.0, 0));
        lines
    }

    #[test]
    fn wrapped_title_is_joined_in_reading_order() {
        let config = OutlineConfig::default();
        let lines = page_one_with(vec![
            line("Proposal for Ontario", 72.0, 120.0, 24.0, 0),
            line("Overview of the", 72.0, 90.0, 24.2, 0),
            line("Subtitle text", 72.0, 150.0, 14.0, 0),
        ]);
        assert_eq!(extract_title(&lines, &config), "Overview of the Proposal for Ontario");
    }

    #[test]
    fn ignores_large_text_below_top_region() {
        let config = OutlineConfig::default();
        let lines = page_one_with(vec![
            line("Real Title", 72.0, 80.0, 18.0, 0),
            line("HUGE FOOTER", 72.0, 600.0, 40.0, 0),
        ]);
        assert_eq!(extract_title(&lines, &config), "Real Title");
    }

    #[test]
    fn only_first_page_counts() {
        let config = OutlineConfig::default();
        let lines = vec![line("Second Page Title", 72.0, 50.0, 30.0, 1)];
        assert_eq!(extract_title(&lines, &config), "");
    }

    #[test]
    fn empty_input_gives_empty_title() {
        assert_eq!(extract_title(&[], &OutlineConfig::default()), "");
    }

    #[test]
    fn rule_lines_are_rejected() {
        let config = OutlineConfig::default();
        let lines = page_one_with(vec![line("----------------", 72.0, 40.0, 20.0, 0)]);
        assert_eq!(extract_title(&lines, &config), "");
    }

    #[test]
    fn punctuation_soup_is_rejected() {
        let config = OutlineConfig::default();
        let lines = page_one_with(vec![line("ab: // ## !! ??", 72.0, 40.0, 20.0, 0)]);
        assert_eq!(extract_title(&lines, &config), "");
    }

    #[test]
    fn cjk_title_survives_the_filter() {
        let config = OutlineConfig::default();
        let lines = page_one_with(vec![
            line("ソフトウェア", 72.0, 40.0, 22.0, 0),
            line("テスト計画", 72.0, 70.0, 22.0, 0),
        ]);
        assert_eq!(extract_title(&lines, &config), "ソフトウェアテスト計画");
    }
}
