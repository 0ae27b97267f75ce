//! Turn extracted features into a scored, reportable audit record.
//!
//! Each metric is an independently weighted band check against the injected
//! [`ScoringPolicy`]. Checks never panic on missing data: an empty or
//! default feature simply lands outside its band and fails. The total is
//! clamped to `[0, 100]` and mapped to a letter grade.

use crate::models::{ArticleFeatures, AuditRecord, Grade, MetricVerdictRow, ScorePoint, Verdict};
use crate::policy::{Band, ScoringPolicy};
use crate::utils::visible_len;
use tracing::{debug, instrument};

/// Accumulates verdict rows, the points breakdown, and the running total.
#[derive(Debug, Default)]
struct Tally {
    rows: Vec<MetricVerdictRow>,
    breakdown: Vec<ScorePoint>,
    total: i32,
}

impl Tally {
    /// Judge `value` against `band`, award its weight on a pass.
    fn band_check(
        &mut self,
        metric: &'static str,
        rule: &'static str,
        value: f64,
        actual: String,
        band: &Band,
        unit: &str,
    ) {
        let verdict = band.verdict(value);
        let awarded = if verdict == Verdict::Good {
            band.weight as i16
        } else {
            0
        };
        self.total += awarded as i32;
        self.rows.push(MetricVerdictRow {
            metric,
            actual,
            ideal: band.ideal_text(unit),
            verdict,
        });
        self.breakdown.push(ScorePoint {
            rule,
            available: band.weight as i16,
            awarded,
        });
    }

    /// Award `weight` when a boolean signal is present.
    fn presence_check(
        &mut self,
        metric: &'static str,
        rule: &'static str,
        present: bool,
        ideal: &str,
        weight: u8,
    ) {
        let awarded = if present { weight as i16 } else { 0 };
        self.total += awarded as i32;
        self.rows.push(MetricVerdictRow {
            metric,
            actual: if present { "yes" } else { "no" }.to_string(),
            ideal: ideal.to_string(),
            verdict: if present { Verdict::Good } else { Verdict::NeedsFix },
        });
        self.breakdown.push(ScorePoint {
            rule,
            available: weight as i16,
            awarded,
        });
    }
}

/// Score one page's features against a policy.
#[instrument(level = "debug", skip_all, fields(%url))]
pub fn score(url: &str, features: &ArticleFeatures, policy: &ScoringPolicy) -> AuditRecord {
    let mut tally = Tally::default();

    let title_len = visible_len(&features.title);
    tally.band_check(
        "Title Length",
        "Title length in band",
        title_len as f64,
        format!("{title_len}"),
        &policy.title_length,
        "chars",
    );

    let meta_len = visible_len(&features.meta_description);
    tally.band_check(
        "Meta Description Length",
        "Meta description length in band",
        meta_len as f64,
        format!("{meta_len}"),
        &policy.meta_length,
        "chars",
    );

    tally.band_check(
        "H1 Count",
        "Single H1",
        features.heading_counts.h1 as f64,
        format!("{}", features.heading_counts.h1),
        &policy.h1_count,
        "",
    );

    tally.band_check(
        "H2 Count",
        "Section headings in band",
        features.heading_counts.h2 as f64,
        format!("{}", features.heading_counts.h2),
        &policy.h2_count,
        "",
    );

    tally.band_check(
        "Word Count",
        "Word count above floor",
        features.word_count as f64,
        format!("{}", features.word_count),
        &policy.word_count,
        "words",
    );

    tally.band_check(
        "Paragraph Count",
        "Enough real paragraphs",
        features.paragraph_count as f64,
        format!("{}", features.paragraph_count),
        &policy.paragraph_count,
        "",
    );

    tally.band_check(
        "Image Count",
        "Content image present",
        features.image_count as f64,
        format!("{}", features.image_count),
        &policy.image_count,
        "",
    );

    // Alt coverage: all qualifying images must carry alt text. With zero
    // qualifying images the requirement is vacuously met, which keeps the
    // image metric monotonic (adding an image can never lower the total).
    let alt_ok = features.images_with_alt == features.image_count;
    let alt_awarded = if alt_ok { policy.alt_weight as i16 } else { 0 };
    tally.total += alt_awarded as i32;
    tally.rows.push(MetricVerdictRow {
        metric: "Alt Tag Coverage",
        actual: format!("{}/{}", features.images_with_alt, features.image_count),
        ideal: "all images have alt text".to_string(),
        verdict: if alt_ok { Verdict::Good } else { Verdict::NeedsFix },
    });
    tally.breakdown.push(ScorePoint {
        rule: "Alt text on every image",
        available: policy.alt_weight as i16,
        awarded: alt_awarded,
    });

    tally.band_check(
        "Internal Links",
        "Internal links in band",
        features.internal_link_count as f64,
        format!("{}", features.internal_link_count),
        &policy.internal_links,
        "",
    );

    tally.band_check(
        "External Links",
        "External links limited",
        features.external_link_count as f64,
        format!("{}", features.external_link_count),
        &policy.external_links,
        "",
    );

    tally.band_check(
        "Readability",
        "Avg words per sentence in band",
        features.avg_words_per_sentence,
        format!("{:.1}", features.avg_words_per_sentence),
        &policy.readability,
        "words/sentence",
    );

    tally.presence_check(
        "Structured Data",
        "NewsArticle JSON-LD present",
        features.has_structured_data,
        "NewsArticle JSON-LD block",
        policy.structured_data_weight,
    );
    tally.presence_check(
        "AMP Version",
        "amphtml link present",
        features.is_amp,
        "amphtml link (optional)",
        policy.amp_weight,
    );

    let found_stop_words = policy.stop_words_in(&features.title);
    let penalty = if found_stop_words.is_empty() {
        0i16
    } else {
        policy.stop_word_penalty as i16
    };
    tally.total -= penalty as i32;
    tally.rows.push(MetricVerdictRow {
        metric: "Title Stop Words",
        actual: if found_stop_words.is_empty() {
            "none".to_string()
        } else {
            found_stop_words.join(", ")
        },
        ideal: "no clickbait terms".to_string(),
        verdict: if found_stop_words.is_empty() {
            Verdict::Good
        } else {
            Verdict::Excessive
        },
    });
    tally.breakdown.push(ScorePoint {
        rule: "Clickbait stop-word penalty",
        available: -(policy.stop_word_penalty as i16),
        awarded: -penalty,
    });

    let score = tally.total.clamp(0, 100) as u8;
    let grade = Grade::from_score(score);
    debug!(score, %grade, "Scored page");

    AuditRecord {
        url: url.to_string(),
        score,
        grade,
        rows: tally.rows,
        breakdown: tally.breakdown,
        headline_suggestions: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{ExtractOptions, extract};
    use crate::policy::ScoringPolicy;

    const PAGE_URL: &str = "https://news.example.com/story/1";

    fn paragraph(n: usize) -> String {
        (1..=n)
            .map(|i| {
                if i % 15 == 0 {
                    "world.".to_string()
                } else {
                    "hello".to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn row<'a>(record: &'a AuditRecord, metric: &str) -> &'a MetricVerdictRow {
        record
            .rows
            .iter()
            .find(|r| r.metric == metric)
            .unwrap_or_else(|| panic!("missing metric row {metric}"))
    }

    /// A well-formed news page: every metric inside its band.
    fn strong_page_html() -> String {
        // 58 visible characters.
        let title = "City Council Approves New Transit Plan for Downtown Region";
        let meta = "m".repeat(150);
        let body: String = (0..5)
            .map(|_| format!("<p>{}</p>", paragraph(60)))
            .collect();
        format!(
            r#"<html><head>
                <title>{title}</title>
                <meta name="description" content="{meta}">
                <link rel="amphtml" href="https://news.example.com/amp/1">
                <script type="application/ld+json">{{"@type": "NewsArticle"}}</script>
            </head><body><article>
                <h1>{title}</h1>
                <h2>What the approved plan changes</h2>
                <h2>How the vote broke down in council</h2>
                <h2>What happens next for commuters</h2>
                {body}
                <figure><img src="/img/transit-hero.jpg" alt="A new tram downtown"></figure>
                <p><a href="/transit">A</a> <a href="/council">B</a> <a href="https://news.example.com/votes">C</a></p>
            </article></body></html>"#
        )
    }

    #[test]
    fn test_strong_news_page_scores_a_grade() {
        let features = extract(&strong_page_html(), PAGE_URL, &ExtractOptions::default());
        assert_eq!(visible_len(&features.title), 58);
        assert_eq!(features.word_count, 300);

        let record = score(PAGE_URL, &features, &ScoringPolicy::news());
        assert_eq!(row(&record, "Title Length").verdict, Verdict::Good);
        assert_eq!(row(&record, "Word Count").verdict, Verdict::Good);
        assert_eq!(row(&record, "Image Count").verdict, Verdict::Good);
        assert!(record.score >= 80, "score was {}", record.score);
        assert!(matches!(record.grade, Grade::A | Grade::APlus));
    }

    #[test]
    fn test_thin_page_scores_low() {
        let html = "<html><body><div><p>short</p></div></body></html>";
        let features = extract(html, PAGE_URL, &ExtractOptions::default());
        let record = score(PAGE_URL, &features, &ScoringPolicy::news());

        for metric in [
            "Title Length",
            "Word Count",
            "Paragraph Count",
            "Image Count",
            "H1 Count",
        ] {
            assert_eq!(row(&record, metric).actual, "0", "{metric}");
            assert_eq!(row(&record, metric).verdict, Verdict::NeedsFix, "{metric}");
        }
        assert!(record.score < 50, "score was {}", record.score);
        assert!(matches!(record.grade, Grade::C | Grade::D));
    }

    #[test]
    fn test_image_metric_is_monotonic() {
        let policy = ScoringPolicy::news();
        let mut features = ArticleFeatures::default();
        let without_image = score(PAGE_URL, &features, &policy).score;

        features.image_count = 1;
        let with_image = score(PAGE_URL, &features, &policy).score;
        assert!(with_image >= without_image);

        features.images_with_alt = 1;
        let with_alt = score(PAGE_URL, &features, &policy).score;
        assert!(with_alt >= with_image);
    }

    #[test]
    fn test_excessive_verdicts_above_upper_bound() {
        let features = ArticleFeatures {
            title: "t".repeat(95),
            external_link_count: 12,
            avg_words_per_sentence: 34.0,
            ..ArticleFeatures::default()
        };

        let record = score(PAGE_URL, &features, &ScoringPolicy::news());
        assert_eq!(row(&record, "Title Length").verdict, Verdict::Excessive);
        assert_eq!(row(&record, "External Links").verdict, Verdict::Excessive);
        assert_eq!(row(&record, "Readability").verdict, Verdict::Excessive);
    }

    #[test]
    fn test_stop_word_penalty_applies() {
        let policy = ScoringPolicy::news();
        let mut features = ArticleFeatures {
            title: "A calm report on municipal budgets for the coming year".to_string(),
            ..ArticleFeatures::default()
        };
        let clean = score(PAGE_URL, &features, &policy);
        assert_eq!(row(&clean, "Title Stop Words").actual, "none");

        features.title = "BREAKING: shocking municipal budget report for coming year".to_string();
        let flagged = score(PAGE_URL, &features, &policy);
        assert_eq!(
            row(&flagged, "Title Stop Words").actual,
            "breaking, shocking"
        );
        assert_eq!(
            row(&flagged, "Title Stop Words").verdict,
            Verdict::Excessive
        );
        assert!(flagged.score <= clean.score);
    }

    #[test]
    fn test_score_stays_in_range() {
        let features = ArticleFeatures {
            title: "breaking shocking exclusive".to_string(),
            ..ArticleFeatures::default()
        };
        let record = score(PAGE_URL, &features, &ScoringPolicy::news());
        assert!(record.score <= 100);
    }

    #[test]
    fn test_breakdown_matches_score() {
        let features = extract(&strong_page_html(), PAGE_URL, &ExtractOptions::default());
        let record = score(PAGE_URL, &features, &ScoringPolicy::news());
        let sum: i32 = record.breakdown.iter().map(|p| p.awarded as i32).sum();
        assert_eq!(sum.clamp(0, 100) as u8, record.score);
    }
}
