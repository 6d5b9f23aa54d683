//! Textual patterns used by the heading rules and the outline finaliser.
//!
//! Every numbering pattern is built from the single [`NUMERAL`] character
//! class, so adding a numeral script is a one-line change that reaches the
//! structural rule, the chapter prefixes and the continuation merge alike.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Decimal digits accepted in section numbers: ASCII, full-width,
/// Arabic-Indic, Extended Arabic-Indic, Devanagari and Bengali.
pub const NUMERAL: &str = "0-9０-９٠-٩۰-۹०-९০-৯";

/// Characters that separate a section number from its text.
const NUMBER_SEPARATOR: &str = ".．、";

pub fn is_numeral(c: char) -> bool {
    c.is_ascii_digit()
        || matches!(c, '０'..='９' | '٠'..='٩' | '۰'..='۹' | '०'..='९' | '০'..='৯')
}

// ── Structural numbering ─────────────────────────────────────────────────────

static RE_NUMBERED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?P<num>[{NUMERAL}]+(?:[.．][{NUMERAL}]+)*)(?P<sep>[{NUMBER_SEPARATOR}])?(?P<gap>\s*)(?P<rest>\S.*)$"
    ))
    .unwrap()
});

static RE_NUMBER_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^[{NUMERAL}]+[{NUMBER_SEPARATOR}]")).unwrap());

static RE_BARE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^[{NUMERAL}]+[{NUMBER_SEPARATOR}]$")).unwrap());

/// Number of dot-separated segments of a structural section number.
///
/// `"1. Introduction"` → 1, `"2.1 Audience"` → 2, `"3.2.1 Scope"` → 3,
/// `"1.2.3.4 Detail"` → 4. A lone number needs a separator (`"2024 Report"`
/// is not numbered) and the text must not start with another numeral.
pub fn numbered_depth(text: &str) -> Option<usize> {
    let caps = RE_NUMBERED.captures(text)?;
    let segments = caps["num"].split(['.', '．']).count();
    let has_sep = caps.name("sep").is_some();
    if !has_sep && (segments == 1 || caps["gap"].is_empty()) {
        return None;
    }
    let first = caps["rest"].chars().next()?;
    if is_numeral(first) {
        return None;
    }
    Some(segments)
}

/// A section number whose title wrapped onto the next line: `"4."`, `"３．"`, `"2、"`.
pub fn is_bare_number(text: &str) -> bool {
    RE_BARE_NUMBER.is_match(text.trim())
}

/// Whether `text` opens with a number and a separator (`"3."`, `"２．"`, `"4、"`).
pub fn has_number_prefix(text: &str) -> bool {
    RE_NUMBER_PREFIX.is_match(text)
}

/// Word count after the number of a single-segment numbered line, or `None`
/// when `text` is not one (`"3. Overview"` → 1, `"3."` → 0, `"3.1 Scope"` → `None`).
pub fn numbered_stub_words(text: &str) -> Option<usize> {
    let m = RE_NUMBER_PREFIX.find(text)?;
    let content = text[m.end()..].trim_start();
    if content.chars().next().is_some_and(is_numeral) {
        return None;
    }
    Some(content.split_whitespace().count())
}

// ── Noise ────────────────────────────────────────────────────────────────────

static RE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        ^
        (?:\d+(?:\.\d+)*\s+)?             # optional version column, e.g. 0.2
        (?:
            \d{1,2}(?:st|nd|rd|th)?[\s\-/]+
            (?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?
              |aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)
            \b
        |
            \d{1,2}[./\-]\d{1,2}[./\-]\d{4}\b
        )
        ",
    )
    .unwrap()
});

static RE_PAGE_FOOTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^page\s+\d+\s+of\s+\d+").unwrap());

static RE_LEADER_DOTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:\.\s?){4,}|…{2,}").unwrap());

/// Dates such as "18 JUN 2013", "0.2 21st June" or "03/04/2021".
pub fn is_date_like(text: &str) -> bool {
    RE_DATE.is_match(text)
}

/// Running footers such as "Page 3 of 10".
pub fn is_page_footer(text: &str) -> bool {
    RE_PAGE_FOOTER.is_match(text)
}

/// Table-of-contents leaders ("Introduction .......... 4").
pub fn has_leader_dots(text: &str) -> bool {
    RE_LEADER_DOTS.is_match(text)
}

// ── Section keywords and prefixes ────────────────────────────────────────────

static SECTION_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // English
        "Revision History",
        "Table of Contents",
        "Contents",
        "Acknowledgements",
        "Acknowledgments",
        "References",
        "Bibliography",
        "Abstract",
        "Appendix",
        "Glossary",
        // Japanese
        "改訂履歴",
        "目次",
        "謝辞",
        "参考文献",
        "付録",
        // Chinese
        "修订历史",
        "目录",
        "致谢",
        "摘要",
        "附录",
        // Hindi
        "संशोधन इतिहास",
        "विषय-सूची",
        "विषय सूची",
        "आभार",
        "संदर्भ",
        // Spanish
        "Índice",
        "Agradecimientos",
        "Referencias",
        "Historial de revisiones",
        // French
        "Table des matières",
        "Remerciements",
        "Références",
        // German
        "Inhaltsverzeichnis",
        "Danksagung",
        "Literaturverzeichnis",
    ]
    .into_iter()
    .collect()
});

static RE_SECTION_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:(?:chapter|section|cap[ií]tulo|chapitre|kapitel|abschnitt|secci[oó]n|अध्याय|प्रकरण)\s+(?:[{NUMERAL}]+|(?-i:[IVXLCDM]+)(?:\s*$|[.:)\-–]|\s+(?-i:\p{{Lu}})))|第[{NUMERAL}一二三四五六七八九十百千〇零]+[章节節])"
    ))
    .unwrap()
});

/// Exact match against the canonical section headings.
pub fn is_section_keyword(text: &str) -> bool {
    SECTION_KEYWORDS.contains(text.trim())
}

/// "Chapter 3", "Capítulo 2", "अध्याय ५", "第3章", …
pub fn has_section_prefix(text: &str) -> bool {
    RE_SECTION_PREFIX.is_match(text)
}

// ── Shape ────────────────────────────────────────────────────────────────────

/// At least one cased character and no lowercase ones.
pub fn is_all_uppercase(text: &str) -> bool {
    let mut has_upper = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        has_upper |= c.is_uppercase();
    }
    has_upper
}

pub fn ends_sentence(text: &str) -> bool {
    text.trim_end()
        .ends_with(['.', '!', '?', '。', '！', '？'])
}
