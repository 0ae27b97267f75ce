//! Data models for audited pages and their scored representations.
//!
//! This module defines the core data structures used throughout the application:
//! - [`ArticleFeatures`]: Normalized facts extracted from one page's HTML
//! - [`MetricVerdictRow`]: One reportable (metric, actual, ideal, verdict) line
//! - [`AuditRecord`]: The complete scored result for one URL
//! - [`Verdict`] and [`Grade`]: Pass/fail judgments and letter grades
//!
//! `ArticleFeatures` is constructed once per URL by the extractor, immutable
//! thereafter, and consumed by the scorer. `AuditRecord`s are immutable once
//! built; the only downstream mutation is appending them to the report.

use serde::Serialize;
use std::fmt;

/// Heading tag counts for one page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HeadingCounts {
    /// Number of `<h1>` elements in the document.
    pub h1: usize,
    /// Number of qualifying `<h2>` elements (short/promo headings excluded).
    pub h2: usize,
    /// Number of `<h3>` elements in the main container.
    pub h3: usize,
}

/// The extracted, normalized facts about one page.
///
/// Every field has a safe zero/empty default so a parse failure can degrade
/// to `ArticleFeatures::default()` instead of propagating an error.
///
/// # Invariants
///
/// - `images_with_alt <= image_count`
/// - `paragraph_count == paragraphs.len()`
/// - `word_count` equals the whitespace token count across `paragraphs`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArticleFeatures {
    /// Article title: first `<h1>` in the container, else the document `<title>`.
    pub title: String,
    /// `meta[name=description]`, falling back to `og:description`, else empty.
    pub meta_description: String,
    /// H1/H2/H3 counts after heading filters.
    pub heading_counts: HeadingCounts,
    /// Filtered "real" content paragraphs, in document order.
    pub paragraphs: Vec<String>,
    /// Whitespace-delimited tokens across all kept paragraphs.
    pub word_count: usize,
    /// Number of kept paragraphs.
    pub paragraph_count: usize,
    /// `word_count / max(1, sentence_count)` over the kept paragraphs.
    pub avg_words_per_sentence: f64,
    /// Qualifying content images (junk-filtered, optionally hero-capped).
    pub image_count: usize,
    /// Qualifying images carrying a non-empty `alt` attribute.
    pub images_with_alt: usize,
    /// Links whose host matches the page's own host (or relative paths).
    pub internal_link_count: usize,
    /// Links pointing at a different host.
    pub external_link_count: usize,
    /// A JSON-LD block with `@type` `NewsArticle` is present.
    pub has_structured_data: bool,
    /// `link[rel=amphtml]` is present.
    pub is_amp: bool,
    /// First one or two sentences of the lead paragraph, truncated.
    pub summary: String,
}

/// Per-metric judgment shown alongside actual vs. ideal values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    /// Actual value falls inside the ideal band.
    Good,
    /// Actual value is below the band, or the signal is missing entirely.
    NeedsFix,
    /// Actual value is above the band's upper bound.
    Excessive,
}

impl Verdict {
    /// Spreadsheet cell symbol for this verdict.
    pub fn symbol(&self) -> &'static str {
        match self {
            Verdict::Good => "✅",
            Verdict::NeedsFix => "❌",
            Verdict::Excessive => "⚠️",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Letter grade derived from the final 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    APlus,
    A,
    B,
    C,
    D,
}

impl Grade {
    /// Map a clamped score to its letter grade.
    ///
    /// Boundaries: `A+` >= 90, `A` >= 80, `B` >= 65, `C` >= 50, else `D`.
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => Grade::APlus,
            80..=89 => Grade::A,
            65..=79 => Grade::B,
            50..=64 => Grade::C,
            _ => Grade::D,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        };
        f.write_str(s)
    }
}

/// One reportable line: metric name, actual value, ideal range, verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricVerdictRow {
    /// Plain-English metric name, e.g. "Title Length".
    pub metric: &'static str,
    /// Observed value rendered for display.
    pub actual: String,
    /// Human description of the ideal range, e.g. "50-70 chars".
    pub ideal: String,
    /// Pass/fail/excessive judgment.
    pub verdict: Verdict,
}

/// One scoring-rule contribution: points available vs. points awarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScorePoint {
    /// Name of the scoring rule.
    pub rule: &'static str,
    /// Maximum points the rule can contribute (negative rules list the penalty).
    pub available: i16,
    /// Points actually awarded (or deducted) for this page.
    pub awarded: i16,
}

/// A ranked headline candidate from the optional suggestion collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadlineSuggestion {
    /// Candidate headline text.
    pub text: String,
    /// Heuristic click-through score in 0-100.
    pub ctr_score: u8,
}

/// The complete scored result for one URL.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    /// The audited URL as supplied by the user (scheme-normalized).
    pub url: String,
    /// Final score, clamped to 0-100.
    pub score: u8,
    /// Letter grade for `score`.
    pub grade: Grade,
    /// Per-metric verdict rows in report order.
    pub rows: Vec<MetricVerdictRow>,
    /// Per-rule points breakdown behind `score`.
    pub breakdown: Vec<ScorePoint>,
    /// Ranked headline candidates; empty when suggestion is disabled.
    pub headline_suggestions: Vec<HeadlineSuggestion>,
}

impl AuditRecord {
    /// Build the degraded record for a URL that could not be fetched.
    ///
    /// Failed URLs still get a row in the report: a single "Error" line
    /// carrying the failure reason, a score of 0, and grade D.
    pub fn fetch_failure(url: String, reason: String) -> Self {
        AuditRecord {
            url,
            score: 0,
            grade: Grade::from_score(0),
            rows: vec![MetricVerdictRow {
                metric: "Error",
                actual: reason,
                ideal: "—".to_string(),
                verdict: Verdict::NeedsFix,
            }],
            breakdown: Vec::new(),
            headline_suggestions: Vec::new(),
        }
    }
}
