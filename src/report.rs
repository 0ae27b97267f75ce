//! XLSX report rendering.
//!
//! Builds the workbook entirely in memory and hands the bytes back to the
//! caller; nothing is persisted here. Three to four sheets:
//!
//! 1. **SEO Audit**: one row per metric per URL with actual, ideal, and
//!    verdict columns; failing actual cells get a red fill.
//! 2. **Score Logic**: per-rule points available vs. awarded, mirroring
//!    the scorer's breakdown, with the final score and grade per URL.
//! 3. **Headlines**: ranked suggestion candidates (only when present).
//! 4. **Guidelines**: a static reference sheet explaining each ideal
//!    range and why it matters, using the active policy's bands.

use crate::models::{AuditRecord, Verdict};
use crate::policy::ScoringPolicy;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use tracing::{info, instrument};

const HEADER_BG: u32 = 0x1F4E79;
const FAIL_BG: u32 = 0xF8CBAD;
const MAX_COLUMN_WIDTH: f64 = 60.0;

struct SheetFormats {
    header: Format,
    cell: Format,
    fail_cell: Format,
}

impl SheetFormats {
    fn new() -> Self {
        let header = Format::new()
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(HEADER_BG))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap()
            .set_border(FormatBorder::Thin);
        let cell = Format::new()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap()
            .set_border(FormatBorder::Thin);
        let fail_cell = cell.clone().set_background_color(Color::RGB(FAIL_BG));
        SheetFormats {
            header,
            cell,
            fail_cell,
        }
    }
}

/// Render all audit records into an in-memory `.xlsx` byte buffer.
#[instrument(level = "info", skip_all, fields(records = records.len()))]
pub fn render(
    records: &[AuditRecord],
    policy: &ScoringPolicy,
    generated_at: &str,
) -> Result<Vec<u8>, XlsxError> {
    let formats = SheetFormats::new();
    let mut workbook = Workbook::new();

    write_audit_sheet(workbook.add_worksheet(), records, &formats)?;
    write_score_logic_sheet(workbook.add_worksheet(), records, &formats)?;
    if records.iter().any(|r| !r.headline_suggestions.is_empty()) {
        write_headlines_sheet(workbook.add_worksheet(), records, &formats)?;
    }
    write_guidelines_sheet(workbook.add_worksheet(), policy, generated_at, &formats)?;

    let buffer = workbook.save_to_buffer()?;
    info!(bytes = buffer.len(), "Rendered XLSX report");
    Ok(buffer)
}

fn sheet_header(
    sheet: &mut Worksheet,
    name: &str,
    columns: &[(&str, f64)],
    formats: &SheetFormats,
) -> Result<(), XlsxError> {
    sheet.set_name(name)?;
    sheet.set_screen_gridlines(false);
    sheet.set_freeze_panes(1, 0)?;
    for (col, (title, width)) in columns.iter().enumerate() {
        let col = col as u16;
        sheet.set_column_width(col, width.min(MAX_COLUMN_WIDTH))?;
        sheet.write_string_with_format(0, col, *title, &formats.header)?;
    }
    Ok(())
}

fn write_audit_sheet(
    sheet: &mut Worksheet,
    records: &[AuditRecord],
    formats: &SheetFormats,
) -> Result<(), XlsxError> {
    sheet_header(
        sheet,
        "SEO Audit",
        &[
            ("URL", 45.0),
            ("Metric", 24.0),
            ("Actual", 40.0),
            ("Ideal", 24.0),
            ("Verdict", 10.0),
        ],
        formats,
    )?;

    let mut row = 1u32;
    for record in records {
        for line in &record.rows {
            // Re-flag the failing actual value in red, same predicate the
            // scorer used for the verdict.
            let actual_format = if line.verdict == Verdict::Good {
                &formats.cell
            } else {
                &formats.fail_cell
            };
            sheet.write_string_with_format(row, 0, &record.url, &formats.cell)?;
            sheet.write_string_with_format(row, 1, line.metric, &formats.cell)?;
            sheet.write_string_with_format(row, 2, &line.actual, actual_format)?;
            sheet.write_string_with_format(row, 3, &line.ideal, &formats.cell)?;
            sheet.write_string_with_format(row, 4, line.verdict.symbol(), &formats.cell)?;
            row += 1;
        }

        let score_format = if record.score >= 80 {
            &formats.cell
        } else {
            &formats.fail_cell
        };
        sheet.write_string_with_format(row, 0, &record.url, &formats.cell)?;
        sheet.write_string_with_format(row, 1, "Final SEO Score", &formats.cell)?;
        sheet.write_string_with_format(
            row,
            2,
            &format!("{}/100 ({})", record.score, record.grade),
            score_format,
        )?;
        sheet.write_string_with_format(row, 3, "≥ 80", &formats.cell)?;
        let verdict = if record.score >= 80 {
            Verdict::Good
        } else {
            Verdict::NeedsFix
        };
        sheet.write_string_with_format(row, 4, verdict.symbol(), &formats.cell)?;
        row += 1;
    }
    Ok(())
}

fn write_score_logic_sheet(
    sheet: &mut Worksheet,
    records: &[AuditRecord],
    formats: &SheetFormats,
) -> Result<(), XlsxError> {
    sheet_header(
        sheet,
        "Score Logic",
        &[
            ("URL", 45.0),
            ("Scoring Rule", 32.0),
            ("Points Available", 16.0),
            ("Points Awarded", 16.0),
        ],
        formats,
    )?;

    let mut row = 1u32;
    for record in records {
        for point in &record.breakdown {
            sheet.write_string_with_format(row, 0, &record.url, &formats.cell)?;
            sheet.write_string_with_format(row, 1, point.rule, &formats.cell)?;
            sheet.write_number_with_format(row, 2, point.available as f64, &formats.cell)?;
            sheet.write_number_with_format(row, 3, point.awarded as f64, &formats.cell)?;
            row += 1;
        }
        sheet.write_string_with_format(row, 0, &record.url, &formats.cell)?;
        sheet.write_string_with_format(
            row,
            1,
            &format!("Final Score (grade {})", record.grade),
            &formats.cell,
        )?;
        sheet.write_number_with_format(row, 2, 100.0, &formats.cell)?;
        sheet.write_number_with_format(row, 3, record.score as f64, &formats.cell)?;
        row += 1;
    }
    Ok(())
}

fn write_headlines_sheet(
    sheet: &mut Worksheet,
    records: &[AuditRecord],
    formats: &SheetFormats,
) -> Result<(), XlsxError> {
    sheet_header(
        sheet,
        "Headlines",
        &[
            ("URL", 45.0),
            ("Suggested Headline", 60.0),
            ("CTR Score", 10.0),
        ],
        formats,
    )?;

    let mut row = 1u32;
    for record in records {
        for suggestion in &record.headline_suggestions {
            sheet.write_string_with_format(row, 0, &record.url, &formats.cell)?;
            sheet.write_string_with_format(row, 1, &suggestion.text, &formats.cell)?;
            sheet.write_number_with_format(row, 2, suggestion.ctr_score as f64, &formats.cell)?;
            row += 1;
        }
    }
    Ok(())
}

fn write_guidelines_sheet(
    sheet: &mut Worksheet,
    policy: &ScoringPolicy,
    generated_at: &str,
    formats: &SheetFormats,
) -> Result<(), XlsxError> {
    sheet_header(
        sheet,
        "Guidelines",
        &[("Metric", 24.0), ("Ideal", 24.0), ("Why It Matters", 70.0)],
        formats,
    )?;

    let rows: [(&str, String, &str); 14] = [
        (
            "Title Length",
            policy.title_length.ideal_text("chars"),
            "Titles in this range display fully in search results without truncation.",
        ),
        (
            "Meta Description Length",
            policy.meta_length.ideal_text("chars"),
            "A full-width snippet improves click-through from the results page.",
        ),
        (
            "H1 Count",
            policy.h1_count.ideal_text(""),
            "One H1 gives crawlers a single unambiguous topic signal.",
        ),
        (
            "H2 Count",
            policy.h2_count.ideal_text(""),
            "Section headings make long articles scannable for readers and crawlers.",
        ),
        (
            "Word Count",
            policy.word_count.ideal_text("words"),
            "Thin pages struggle to rank; the floor reflects the profile's content depth.",
        ),
        (
            "Paragraph Count",
            policy.paragraph_count.ideal_text(""),
            "Several real paragraphs indicate genuine article content, not a stub.",
        ),
        (
            "Image Count",
            policy.image_count.ideal_text(""),
            "A content image earns image-search traffic and lifts engagement.",
        ),
        (
            "Alt Tag Coverage",
            "all images".to_string(),
            "Alt text is required for accessibility and for image indexing.",
        ),
        (
            "Internal Links",
            policy.internal_links.ideal_text(""),
            "Internal links create crawl paths and keep readers on the site.",
        ),
        (
            "External Links",
            policy.external_links.ideal_text(""),
            "A few authoritative citations are fine; link farms are not.",
        ),
        (
            "Readability",
            policy.readability.ideal_text("words/sentence"),
            "News prose reads best around 10-20 words per sentence.",
        ),
        (
            "Structured Data",
            "NewsArticle JSON-LD".to_string(),
            "Schema.org NewsArticle markup is a Google News eligibility signal.",
        ),
        (
            "AMP Version",
            "present (optional)".to_string(),
            "An amphtml alternate can improve mobile load times; informational only.",
        ),
        (
            "Title Stop Words",
            "none".to_string(),
            "Clickbait terms (breaking, exclusive, shocking...) erode reader trust.",
        ),
    ];

    let mut row = 1u32;
    for (metric, ideal, why) in &rows {
        sheet.write_string_with_format(row, 0, *metric, &formats.cell)?;
        sheet.write_string_with_format(row, 1, ideal, &formats.cell)?;
        sheet.write_string_with_format(row, 2, *why, &formats.cell)?;
        row += 1;
    }

    row += 1;
    sheet.write_string_with_format(
        row,
        0,
        &format!("Generated {generated_at}"),
        &formats.cell,
    )?;
    Ok(())
}
