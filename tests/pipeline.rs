//! Integration tests for the inference pipeline on synthetic fragments.
//!
//! Nothing here needs pdfium: fragments are built by hand with realistic
//! geometry and fed through the public API, exactly as an alternative text
//! extractor would.
//!
//! Run with:
//!   cargo test --test pipeline

use pdf_outline::{
    outline_from_fragments, outline_from_lines, process_directory, BBox, ContinuationMerge,
    DocumentOutline, HeadingLevel, OutlineConfig, OutlineEntry, OutlineError, TextFragment,
};
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn frag(text: &str, x0: f32, y0: f32, size: f32, bold: bool, page: usize) -> TextFragment {
    let width = 0.55 * size * text.chars().count() as f32;
    TextFragment {
        text: text.into(),
        font_size: size,
        font_name: if bold { "Helvetica-Bold" } else { "Helvetica" }.into(),
        is_bold: bold,
        bbox: BBox::new(x0, y0, x0 + width, y0 + size),
        page,
    }
}

/// Twelve lines of 10pt body text at the left margin, starting at `top`.
fn body(page: usize, top: f32) -> Vec<TextFragment> {
    (0..12)
        .map(|i| {
            frag(
                "This paragraph is ordinary body text.",
                72.0,
                top + 15.0 * i as f32,
                10.0,
                false,
                page,
            )
        })
        .collect()
}

fn entry(level: HeadingLevel, text: &str, page: u32) -> OutlineEntry {
    OutlineEntry {
        level,
        text: text.into(),
        page,
    }
}

/// A three-page report exercising every heading rule and the common noise.
fn report() -> Vec<TextFragment> {
    let mut f = vec![
        // Page 1: split title, a numbered heading, a date line.
        frag("Understanding", 72.0, 50.0, 24.0, false, 0),
        frag("Outline Inference", 250.0, 50.0, 24.0, false, 0),
        frag("1. Introduction", 72.0, 120.0, 14.0, true, 0),
        frag("12 March 2024", 72.0, 160.0, 14.0, true, 0),
    ];
    f.extend(body(0, 300.0));

    // Page 2: numbered H2, a wrapped numbered heading, a bold sentence, a footer.
    f.extend([
        frag("2.1 Background", 72.0, 60.0, 12.0, true, 1),
        frag("3. Overview", 72.0, 200.0, 14.0, true, 1),
        frag("Syllabus", 72.0, 218.0, 14.0, true, 1),
        frag("Results are summarised below.", 72.0, 250.0, 14.0, true, 1),
        frag("Page 2 of 3", 72.0, 780.0, 10.0, false, 1),
    ]);
    f.extend(body(1, 300.0));

    // Page 3: keyword, poster text, an indented numbered list item.
    f.extend([
        frag("References", 72.0, 60.0, 10.0, true, 2),
        frag("SUMMARY OF FINDINGS", 72.0, 120.0, 20.0, false, 2),
        frag("4. Indented list item", 200.0, 160.0, 10.0, false, 2),
    ]);
    f.extend(body(2, 300.0));
    f
}

// ── Scenarios ────────────────────────────────────────────────────────────────

#[test]
fn numbered_heading_over_body_text() {
    let fragments = [
        frag("1. Introduction", 72.0, 100.0, 16.0, true, 0),
        frag("This is body text.", 72.0, 130.0, 10.0, false, 0),
    ];
    let outline = outline_from_fragments(&fragments, 1, &OutlineConfig::default());
    assert_eq!(
        outline.outline,
        [entry(HeadingLevel::H1, "1. Introduction ", 1)]
    );
}

#[test]
fn wrapped_numbered_heading_is_merged() {
    let fragments = [
        frag("3. Overview", 72.0, 100.0, 14.0, true, 0),
        frag("Syllabus", 72.0, 118.0, 14.0, true, 0),
        frag("The course runs for twelve weeks in total.", 72.0, 150.0, 10.0, false, 0),
    ];
    let outline = outline_from_fragments(&fragments, 1, &OutlineConfig::default());
    assert_eq!(
        outline.outline,
        [entry(HeadingLevel::H1, "3. Overview Syllabus ", 1)]
    );
}

#[test]
fn bare_number_merges_with_wrapped_title() {
    let mut fragments = body(0, 100.0);
    fragments.extend([
        frag("4.", 72.0, 400.0, 14.0, true, 0),
        frag("Business Outcomes", 72.0, 418.0, 14.0, true, 0),
    ]);
    let outline = outline_from_fragments(&fragments, 1, &OutlineConfig::default());
    assert_eq!(
        outline.outline,
        [entry(HeadingLevel::H1, "4. Business Outcomes ", 1)]
    );

    // Nothing to absorb: the lone number does not become an entry.
    let mut lone = body(0, 100.0);
    lone.push(frag("4.", 72.0, 400.0, 14.0, true, 0));
    let outline = outline_from_fragments(&lone, 1, &OutlineConfig::default());
    assert!(outline.outline.is_empty());
}

#[test]
fn empty_input_gives_empty_document() {
    let outline = outline_from_fragments(&[], 0, &OutlineConfig::default());
    assert_eq!(outline, DocumentOutline::empty());
    assert_eq!(outline_from_lines(&[], 0, &OutlineConfig::default()), outline);
    assert_eq!(
        outline.to_json_pretty().unwrap(),
        "{\n  \"title\": \"\",\n  \"outline\": []\n}"
    );
}

// ── Whole documents ──────────────────────────────────────────────────────────

#[test]
fn multi_page_report() {
    let outline = outline_from_fragments(&report(), 3, &OutlineConfig::default());

    assert_eq!(outline.title, "Understanding Outline Inference ");
    assert_eq!(
        outline.outline,
        [
            entry(HeadingLevel::H1, "1. Introduction ", 1),
            entry(HeadingLevel::H2, "2.1 Background ", 2),
            entry(HeadingLevel::H1, "3. Overview Syllabus ", 2),
            entry(HeadingLevel::H1, "References ", 3),
            entry(HeadingLevel::H1, "SUMMARY OF FINDINGS ", 3),
        ]
    );
}

#[test]
fn output_is_deterministic() {
    let config = OutlineConfig::default();
    let fragments = report();
    let first = outline_from_fragments(&fragments, 3, &config)
        .to_json_pretty()
        .unwrap();
    let again = outline_from_fragments(&fragments, 3, &config)
        .to_json_pretty()
        .unwrap();
    assert_eq!(first, again);

    // Extraction order of fragments must not matter.
    let mut reversed = fragments;
    reversed.reverse();
    let shuffled = outline_from_fragments(&reversed, 3, &config)
        .to_json_pretty()
        .unwrap();
    assert_eq!(first, shuffled);
}

#[test]
fn every_entry_is_well_formed() {
    let outline = outline_from_fragments(&report(), 3, &OutlineConfig::default());
    for e in &outline.outline {
        assert!(e.page >= 1);
        assert!(e.text.ends_with(' '));
        assert!(!e.text.trim().is_empty());
        assert!(matches!(
            e.level.as_str(),
            "H1" | "H2" | "H3"
        ));
    }
}

#[test]
fn cjk_document() {
    let mut fragments = vec![
        frag("技术", 72.0, 40.0, 24.0, false, 0),
        frag("报告", 98.0, 40.0, 24.0, false, 0),
        frag("修订", 72.0, 100.0, 12.0, true, 0),
        frag("历史", 86.0, 100.0, 12.0, true, 0),
        frag("1、", 72.0, 140.0, 14.0, true, 0),
        frag("引言", 88.0, 140.0, 14.0, true, 0),
    ];
    fragments.extend((0..8).map(|i| {
        frag(
            "这是一个用于测试的正文段落内容示例文字",
            72.0,
            300.0 + 15.0 * i as f32,
            10.0,
            false,
            0,
        )
    }));

    let outline = outline_from_fragments(&fragments, 1, &OutlineConfig::default());
    assert_eq!(outline.title, "技术报告 ");
    assert_eq!(
        outline.outline,
        [
            entry(HeadingLevel::H1, "修订历史 ", 1),
            entry(HeadingLevel::H1, "1、引言 ", 1),
        ]
    );
}

#[test]
fn sparse_cover_page_shifts_page_numbers() {
    let mut fragments = vec![
        frag("Annual Report", 72.0, 100.0, 24.0, false, 0),
        frag("Prepared for the board of directors", 72.0, 700.0, 10.0, false, 0),
        frag("1. Scope", 72.0, 60.0, 14.0, true, 1),
    ];
    fragments.extend(body(1, 100.0));

    let outline = outline_from_fragments(&fragments, 2, &OutlineConfig::default());
    assert_eq!(outline.title, "Annual Report ");
    assert_eq!(outline.outline, [entry(HeadingLevel::H1, "1. Scope ", 1)]);

    // A single-page document never has a cover offset.
    let single = [frag("1. Scope", 72.0, 60.0, 14.0, true, 0)];
    let outline = outline_from_fragments(&single, 1, &OutlineConfig::default());
    assert_eq!(outline.outline[0].page, 1);
}

// ── Tunable continuation merge ───────────────────────────────────────────────

fn distant_continuation() -> Vec<TextFragment> {
    let mut f = vec![
        frag("3. Overview", 72.0, 100.0, 14.0, true, 0),
        frag("Syllabus", 72.0, 180.0, 14.0, true, 0),
    ];
    f.extend(body(0, 300.0));
    f
}

#[test]
fn merge_by_default_regardless_of_distance() {
    let outline = outline_from_fragments(&distant_continuation(), 1, &OutlineConfig::default());
    assert_eq!(
        outline.outline,
        [entry(HeadingLevel::H1, "3. Overview Syllabus ", 1)]
    );
}

#[test]
fn vertical_gap_limit_prevents_merge() {
    let config = OutlineConfig::builder()
        .continuation(ContinuationMerge {
            max_vertical_gap: Some(1.5),
            ..ContinuationMerge::default()
        })
        .build()
        .unwrap();
    let outline = outline_from_fragments(&distant_continuation(), 1, &config);
    assert_eq!(
        outline.outline,
        [
            entry(HeadingLevel::H1, "3. Overview ", 1),
            entry(HeadingLevel::H2, "Syllabus ", 1),
        ]
    );
}

#[test]
fn disabled_merge_and_no_trailing_space() {
    let config = OutlineConfig::builder()
        .continuation(ContinuationMerge::disabled())
        .trailing_space(false)
        .build()
        .unwrap();
    let outline = outline_from_fragments(&distant_continuation(), 1, &config);
    assert_eq!(
        outline.outline,
        [
            entry(HeadingLevel::H1, "3. Overview", 1),
            entry(HeadingLevel::H2, "Syllabus", 1),
        ]
    );
}

// ── Batch ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn batch_writes_one_json_per_pdf() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    std::fs::write(input.path().join("b.pdf"), b"GIF89a").unwrap();
    std::fs::write(input.path().join("a.pdf"), b"%PD").unwrap();
    std::fs::write(input.path().join("notes.md"), b"# not a pdf").unwrap();
    std::fs::create_dir(input.path().join("nested.pdf")).unwrap();

    let report = process_directory(input.path(), output.path(), &OutlineConfig::default())
        .await
        .unwrap();

    let names: Vec<_> = report
        .documents
        .iter()
        .map(|d| d.input.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["a.pdf", "b.pdf"]);
    assert_eq!(report.failed, 2);

    let mut written: Vec<_> = std::fs::read_dir(output.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    written.sort();
    assert_eq!(written, ["a.json", "b.json"]);
}

#[test]
fn batch_over_empty_directory_writes_nothing() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let out_dir = output.path().join("never-created");

    let report = tokio_test::block_on(process_directory(
        input.path(),
        &out_dir,
        &OutlineConfig::default(),
    ))
    .unwrap();
    assert!(report.documents.is_empty());
    assert!(!out_dir.exists());
}

#[tokio::test]
async fn bytes_that_are_not_a_pdf_are_rejected() {
    let err = pdf_outline::extract_outline_from_bytes(b"hello", &OutlineConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, OutlineError::NotAPdf { .. }));
}
