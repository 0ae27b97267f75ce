//! Tunable scoring policy: ideal bands, weights, and stop words.
//!
//! Historically every audit variant carried its own module-level literals
//! for thresholds and weights, drifting apart over time. Here the whole
//! rule set is one [`ScoringPolicy`] value passed explicitly into the
//! scorer, so the news and blog variants are data, not code forks.

use crate::models::Verdict;

/// An ideal range plus the points it is worth.
///
/// `min`/`max` are inclusive; either side may be open. A value inside the
/// band earns `weight` points; above a defined `max` the verdict is
/// [`Verdict::Excessive`], otherwise [`Verdict::NeedsFix`].
#[derive(Debug, Clone, Copy)]
pub struct Band {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub weight: u8,
}

impl Band {
    pub const fn new(min: Option<f64>, max: Option<f64>, weight: u8) -> Self {
        Band { min, max, weight }
    }

    /// True when `value` falls inside the band.
    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }

    /// Judge a value against the band.
    pub fn verdict(&self, value: f64) -> Verdict {
        if self.contains(value) {
            Verdict::Good
        } else if self.max.is_some_and(|max| value > max) {
            Verdict::Excessive
        } else {
            Verdict::NeedsFix
        }
    }

    /// Human description of the band for report cells, with `unit` appended
    /// when given.
    pub fn ideal_text(&self, unit: &str) -> String {
        let suffix = if unit.is_empty() {
            String::new()
        } else {
            format!(" {unit}")
        };
        match (self.min, self.max) {
            (Some(min), Some(max)) if min == max => format!("exactly {min:.0}{suffix}"),
            (Some(min), Some(max)) => format!("{min:.0}–{max:.0}{suffix}"),
            (Some(min), None) => format!("≥ {min:.0}{suffix}"),
            (None, Some(max)) => format!("≤ {max:.0}{suffix}"),
            (None, None) => "any".to_string(),
        }
    }
}

/// Clickbait terms that cost points when they appear in a title.
pub const TITLE_STOP_WORDS: [&str; 5] = ["breaking", "exclusive", "viral", "shocking", "alert"];

/// The complete, versionable rule set for one audit profile.
///
/// Weights across all positive rules sum to 100; the stop-word penalty is
/// subtracted afterwards and the total is clamped to `[0, 100]`.
#[derive(Debug, Clone)]
pub struct ScoringPolicy {
    /// Visible title length in characters.
    pub title_length: Band,
    /// Meta description length in characters.
    pub meta_length: Band,
    /// `<h1>` count; exactly one is ideal.
    pub h1_count: Band,
    /// Qualifying `<h2>` count.
    pub h2_count: Band,
    /// Word count over kept paragraphs.
    pub word_count: Band,
    /// Kept paragraph count.
    pub paragraph_count: Band,
    /// Qualifying content image count.
    pub image_count: Band,
    /// Points for full alt-text coverage on qualifying images.
    pub alt_weight: u8,
    /// Internal link count.
    pub internal_links: Band,
    /// External link count.
    pub external_links: Band,
    /// Average words per sentence.
    pub readability: Band,
    /// Points for a NewsArticle JSON-LD block.
    pub structured_data_weight: u8,
    /// Points for an amphtml link (informational).
    pub amp_weight: u8,
    /// Points deducted when the title contains a stop word.
    pub stop_word_penalty: u8,
    /// Deny-list of clickbait title terms.
    pub stop_words: &'static [&'static str],
}

impl ScoringPolicy {
    /// Profile for news articles: lower word-count floor, shorter pieces.
    pub fn news() -> Self {
        ScoringPolicy {
            title_length: Band::new(Some(50.0), Some(70.0), 12),
            meta_length: Band::new(Some(140.0), Some(160.0), 10),
            h1_count: Band::new(Some(1.0), Some(1.0), 9),
            h2_count: Band::new(Some(2.0), Some(5.0), 6),
            word_count: Band::new(Some(250.0), None, 12),
            paragraph_count: Band::new(Some(4.0), None, 6),
            image_count: Band::new(Some(1.0), None, 9),
            alt_weight: 6,
            internal_links: Band::new(Some(2.0), Some(10.0), 5),
            external_links: Band::new(None, Some(2.0), 5),
            readability: Band::new(Some(10.0), Some(20.0), 8),
            structured_data_weight: 9,
            amp_weight: 3,
            stop_word_penalty: 6,
            stop_words: &TITLE_STOP_WORDS,
        }
    }

    /// Profile for blog posts: long-form floor, more sections expected.
    pub fn blog() -> Self {
        ScoringPolicy {
            word_count: Band::new(Some(600.0), None, 12),
            paragraph_count: Band::new(Some(6.0), None, 6),
            h2_count: Band::new(Some(2.0), Some(8.0), 6),
            external_links: Band::new(None, Some(4.0), 5),
            ..ScoringPolicy::news()
        }
    }

    /// Stop words found in `title`, matched case-insensitively on word
    /// boundaries.
    pub fn stop_words_in(&self, title: &str) -> Vec<&'static str> {
        let words: Vec<String> = title
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();
        self.stop_words
            .iter()
            .copied()
            .filter(|stop| words.iter().any(|w| w == stop))
            .collect()
    }

    /// Sum of all positive weights; 100 for the shipped profiles.
    pub fn max_points(&self) -> u16 {
        [
            self.title_length.weight,
            self.meta_length.weight,
            self.h1_count.weight,
            self.h2_count.weight,
            self.word_count.weight,
            self.paragraph_count.weight,
            self.image_count.weight,
            self.alt_weight,
            self.internal_links.weight,
            self.external_links.weight,
            self.readability.weight,
            self.structured_data_weight,
            self.amp_weight,
        ]
        .iter()
        .map(|w| *w as u16)
        .sum()
    }
}

/// Named audit profile selectable from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum AuditProfile {
    News,
    Blog,
}

impl AuditProfile {
    pub fn policy(&self) -> ScoringPolicy {
        match self {
            AuditProfile::News => ScoringPolicy::news(),
            AuditProfile::Blog => ScoringPolicy::blog(),
        }
    }
}
