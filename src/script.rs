//! Script-aware text joining and whitespace normalisation.
//!
//! Fragments of a Latin line are separate words and need a space between
//! them; fragments of a Chinese or Japanese line are pieces of one unbroken
//! run and must be glued together. [`push_joined`] decides per boundary.

use crate::config::JoinPolicy;

/// Whether `c` belongs to a script written without spaces between words.
///
/// Covers Han, Hiragana, Katakana, Bopomofo, CJK punctuation, full-width
/// forms, Thai, Lao, Khmer and Myanmar. Hangul is space-delimited and is
/// deliberately absent.
pub fn is_unspaced_script(c: char) -> bool {
    matches!(c as u32,
        0x0E00..=0x0EFF      // Thai, Lao
        | 0x1000..=0x109F    // Myanmar
        | 0x1780..=0x17FF    // Khmer
        | 0x2E80..=0x2FDF    // CJK radicals, Kangxi radicals
        | 0x3000..=0x303F    // CJK symbols and punctuation
        | 0x3040..=0x30FF    // Hiragana, Katakana
        | 0x3100..=0x312F    // Bopomofo
        | 0x31F0..=0x31FF    // Katakana phonetic extensions
        | 0x3400..=0x4DBF    // CJK extension A
        | 0x4E00..=0x9FFF    // CJK unified ideographs
        | 0xF900..=0xFAFF    // CJK compatibility ideographs
        | 0xFF00..=0xFFEF    // Half-width and full-width forms
        | 0x20000..=0x2FA1F  // CJK extensions B–F, compatibility supplement
    )
}

/// Append `piece` to `buf`, inserting a separator when `policy` asks for one.
pub fn push_joined(buf: &mut String, piece: &str, policy: JoinPolicy) {
    if piece.is_empty() {
        return;
    }
    if !buf.is_empty() && needs_separator(buf, piece, policy) {
        buf.push(' ');
    }
    buf.push_str(piece);
}

fn needs_separator(left: &str, right: &str, policy: JoinPolicy) -> bool {
    match policy {
        JoinPolicy::Space => true,
        JoinPolicy::Concat => false,
        JoinPolicy::Auto => {
            let (Some(l), Some(r)) = (left.chars().next_back(), right.chars().next()) else {
                return false;
            };
            !(l.is_whitespace()
                || r.is_whitespace()
                || is_unspaced_script(l)
                || is_unspaced_script(r))
        }
    }
}

/// Join `pieces` under `policy` and normalise the result's whitespace.
pub fn join_pieces<'a>(pieces: impl IntoIterator<Item = &'a str>, policy: JoinPolicy) -> String {
    let mut buf = String::new();
    for piece in pieces {
        push_joined(&mut buf, piece, policy);
    }
    normalize_whitespace(&buf)
}

/// Collapse every whitespace run to one space and trim both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Character count with unspaced-script characters counted twice, so that
/// "目次" measures like a four-letter Latin word.
pub fn display_width(text: &str) -> usize {
    text.chars()
        .map(|c| if is_unspaced_script(c) { 2 } else { 1 })
        .sum()
}
