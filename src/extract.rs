//! Heuristic article extraction from parsed HTML.
//!
//! Given a page's markup, this module locates the best-guess main content
//! container, then pulls out the facts the scorer needs: title, meta
//! description, filtered "real" paragraphs and images, heading counts,
//! internal/external link counts, word and sentence statistics, and the
//! NewsArticle JSON-LD / AMP signals.
//!
//! Everything here is a rule-based lexical filter, not a content-extraction
//! model. Extraction never fails: any page, however malformed, produces a
//! structurally valid [`ArticleFeatures`] (worst case: all zeros and empty
//! strings).

use crate::models::{ArticleFeatures, HeadingCounts};
use crate::utils::{leading_sentences, sentence_count, truncate_chars};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

/// Class/id substrings that mark a `div`/`section` as the likely article body.
const CONTENT_HINTS: [&str; 6] = [
    "content",
    "story",
    "article",
    "post-body",
    "post-content",
    "entry",
];

/// Phrases that mark a paragraph as boilerplate rather than article text:
/// ad injects, "also read" blurbs, photo captions, and attribution lines.
static BOILERPLATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(advertisements?|also read|read more|read also|file (photo|image)|agency|inputs|click here|subscribe|sign up|download (the )?app)\b",
    )
    .unwrap()
});

/// `src` substrings that mark an image as chrome rather than content.
static JUNK_IMAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)logo|icon|sprite|advert|banner|pixel|spacer|placeholder|avatar").unwrap()
});

/// Class hints for the fallback hero-image lookup outside `<figure>`.
static HERO_CLASS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)featured|hero|post|lead").unwrap());

/// `<h2>` text that is site furniture rather than a section heading.
static PROMO_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)promo|advert|sponsor|subscribe|newsletter|sign up|related|trending|follow us")
        .unwrap()
});

/// Lexical content-vs-boilerplate classifier for text spans.
///
/// A span counts as content when it is long enough *and* does not match the
/// deny-list regex. Injected into the extractor so rule variants are data,
/// not code forks.
#[derive(Debug, Clone)]
pub struct BoilerplatePattern {
    min_chars: usize,
    deny: Regex,
}

impl BoilerplatePattern {
    pub fn new(min_chars: usize, deny: Regex) -> Self {
        BoilerplatePattern { min_chars, deny }
    }

    /// Standard deny list with a custom paragraph length threshold.
    pub fn with_min_chars(min_chars: usize) -> Self {
        BoilerplatePattern::new(min_chars, BOILERPLATE_RE.clone())
    }

    /// True when `text` looks like a real article paragraph.
    pub fn is_content(&self, text: &str) -> bool {
        text.chars().count() >= self.min_chars && !self.deny.is_match(text)
    }
}

impl Default for BoilerplatePattern {
    /// 80-character minimum with the standard deny list.
    fn default() -> Self {
        BoilerplatePattern::new(80, BOILERPLATE_RE.clone())
    }
}

/// Where link classification looks for `<a href>` elements.
///
/// Observed variants disagree: some count every anchor in the container,
/// stricter ones only anchors inside `<p>` tags to avoid nav/footer noise.
/// Both behaviors are supported; the choice is the caller's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LinkScope {
    /// Every `a[href]` inside the main container.
    Container,
    /// Only `a[href]` nested in `<p>` tags inside the container.
    Paragraphs,
}

/// Tunable extraction knobs.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Paragraph content filter.
    pub boilerplate: BoilerplatePattern,
    /// Anchor scope for internal/external link counting.
    pub link_scope: LinkScope,
    /// Cap on qualifying images; `Some(1)` means "hero only", `None` counts all.
    pub image_cap: Option<usize>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            boilerplate: BoilerplatePattern::default(),
            link_scope: LinkScope::Container,
            image_cap: None,
        }
    }
}

/// Extract normalized article features from raw markup.
///
/// `page_url` is the URL the markup was served from; it anchors relative
/// hrefs and the internal/external host comparison.
#[instrument(level = "debug", skip(html, options), fields(%page_url))]
pub fn extract(html: &str, page_url: &str, options: &ExtractOptions) -> ArticleFeatures {
    let document = Html::parse_document(html);
    let container = select_container(&document);

    let title = extract_title(&document, container);
    let meta_description = extract_meta_description(&document);

    let paragraphs = collect_paragraphs(container, &options.boilerplate);
    let word_count: usize = paragraphs.iter().map(|p| p.split_whitespace().count()).sum();
    let sentences: usize = paragraphs.iter().map(|p| sentence_count(p)).sum();
    let avg_words_per_sentence = word_count as f64 / sentences.max(1) as f64;

    let (image_count, images_with_alt) = collect_images(container, options.image_cap);
    let heading_counts = count_headings(&document, container);
    let (internal_link_count, external_link_count) =
        classify_links(container, page_url, options.link_scope);

    let summary = paragraphs
        .first()
        .map(|lead| truncate_chars(&leading_sentences(lead, 2), 220))
        .unwrap_or_default();

    let features = ArticleFeatures {
        title,
        meta_description,
        heading_counts,
        paragraph_count: paragraphs.len(),
        word_count,
        avg_words_per_sentence,
        image_count,
        images_with_alt,
        internal_link_count,
        external_link_count,
        has_structured_data: has_news_article_ld(&document),
        is_amp: is_amp(&document),
        summary,
        paragraphs,
    };
    debug!(
        words = features.word_count,
        paragraphs = features.paragraph_count,
        images = features.image_count,
        "Extracted article features"
    );
    features
}

/// Pick the best-guess main-content node: `<article>` first, then the first
/// `div`/`section` with a content-indicating class or id, else the whole
/// document. First matching selector wins.
fn select_container(document: &Html) -> ElementRef<'_> {
    let article_sel = Selector::parse("article").unwrap();
    if let Some(el) = document.select(&article_sel).next() {
        return el;
    }

    let candidate_sel = Selector::parse("div, section").unwrap();
    for el in document.select(&candidate_sel) {
        let class = el.value().attr("class").unwrap_or("").to_ascii_lowercase();
        let id = el.value().attr("id").unwrap_or("").to_ascii_lowercase();
        if CONTENT_HINTS
            .iter()
            .any(|hint| class.contains(hint) || id.contains(hint))
        {
            return el;
        }
    }

    document.root_element()
}

/// Collapse an element's text nodes to single-spaced visible text.
fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn extract_title(document: &Html, container: ElementRef<'_>) -> String {
    let h1_sel = Selector::parse("h1").unwrap();
    for el in container.select(&h1_sel) {
        let text = element_text(el);
        if !text.is_empty() {
            return text;
        }
    }
    let title_sel = Selector::parse("title").unwrap();
    document
        .select(&title_sel)
        .map(element_text)
        .find(|t| !t.is_empty())
        .unwrap_or_default()
}

fn extract_meta_description(document: &Html) -> String {
    for selector in [
        "meta[name=\"description\"]",
        "meta[property=\"og:description\"]",
    ] {
        let sel = Selector::parse(selector).unwrap();
        if let Some(content) = document
            .select(&sel)
            .find_map(|el| el.value().attr("content"))
        {
            let content = content.split_whitespace().collect::<Vec<_>>().join(" ");
            if !content.is_empty() {
                return content;
            }
        }
    }
    String::new()
}

/// Keep `<p>` elements that pass the boilerplate filter, in document order.
fn collect_paragraphs(container: ElementRef<'_>, pattern: &BoilerplatePattern) -> Vec<String> {
    let p_sel = Selector::parse("p").unwrap();
    container
        .select(&p_sel)
        .map(element_text)
        .filter(|text| pattern.is_content(text))
        .collect()
}

/// Count qualifying content images and how many carry alt text.
///
/// Preference order: images inside `<figure>` whose `src` is not junk, then
/// bare `<img>` tags whose class hints featured/hero/post. The optional cap
/// implements the "hero only" variant.
fn collect_images(container: ElementRef<'_>, cap: Option<usize>) -> (usize, usize) {
    let figure_sel = Selector::parse("figure img[src]").unwrap();
    let mut qualifying: Vec<ElementRef<'_>> = container
        .select(&figure_sel)
        .filter(|el| {
            el.value()
                .attr("src")
                .is_some_and(|src| !JUNK_IMAGE_RE.is_match(src))
        })
        .collect();

    if qualifying.is_empty() {
        let img_sel = Selector::parse("img[src]").unwrap();
        qualifying = container
            .select(&img_sel)
            .filter(|el| {
                let src_ok = el
                    .value()
                    .attr("src")
                    .is_some_and(|src| !JUNK_IMAGE_RE.is_match(src));
                let class_hint = el
                    .value()
                    .attr("class")
                    .is_some_and(|class| HERO_CLASS_RE.is_match(class));
                src_ok && class_hint
            })
            .collect();
    }

    if let Some(cap) = cap {
        qualifying.truncate(cap);
    }

    let with_alt = qualifying
        .iter()
        .filter(|el| {
            el.value()
                .attr("alt")
                .is_some_and(|alt| !alt.trim().is_empty())
        })
        .count();
    (qualifying.len(), with_alt)
}

/// Count headings with the H2 quality filters applied.
///
/// H2s under 20 visible characters and promo/subscribe headings are
/// skipped, as is an abnormally long first H2 (usually a mis-tagged title).
fn count_headings(document: &Html, container: ElementRef<'_>) -> HeadingCounts {
    let h1_sel = Selector::parse("h1").unwrap();
    let h2_sel = Selector::parse("h2").unwrap();
    let h3_sel = Selector::parse("h3").unwrap();

    let h1 = document.select(&h1_sel).count();

    let mut h2 = 0usize;
    let mut first = true;
    for el in document.select(&h2_sel) {
        let text = element_text(el);
        let is_first = std::mem::take(&mut first);
        if is_first && text.chars().count() > 120 {
            continue;
        }
        if text.chars().count() < 20 {
            continue;
        }
        if PROMO_HEADING_RE.is_match(&text) {
            continue;
        }
        h2 += 1;
    }

    let h3 = container.select(&h3_sel).count();
    HeadingCounts { h1, h2, h3 }
}

/// Classify anchors as internal (same host or relative) vs external.
///
/// Anchors (`#`), `mailto:`, `javascript:` and `tel:` links are skipped.
fn classify_links(
    container: ElementRef<'_>,
    page_url: &str,
    scope: LinkScope,
) -> (usize, usize) {
    let selector = match scope {
        LinkScope::Container => Selector::parse("a[href]").unwrap(),
        LinkScope::Paragraphs => Selector::parse("p a[href]").unwrap(),
    };
    let page_host = Url::parse(page_url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()));

    let mut internal = 0usize;
    let mut external = 0usize;
    for el in container.select(&selector) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if href.is_empty()
            || href.starts_with('#')
            || href.starts_with("mailto:")
            || href.starts_with("javascript:")
            || href.starts_with("tel:")
        {
            continue;
        }

        match link_host(href) {
            Some(host) => {
                if page_host.as_deref() == Some(host.as_str()) {
                    internal += 1;
                } else {
                    external += 1;
                }
            }
            // Relative path: stays on the page's own host.
            None => internal += 1,
        }
    }
    (internal, external)
}

/// Host of an absolute (or protocol-relative) href; `None` for relative paths.
fn link_host(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        return None;
    };
    Url::parse(&absolute)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
}

/// True when any `ld+json` block advertises a NewsArticle.
///
/// `@type` may be a scalar or a list, at the top level, inside a top-level
/// array, or nested in `@graph`.
fn has_news_article_ld(document: &Html) -> bool {
    let sel = Selector::parse("script[type=\"application/ld+json\"]").unwrap();
    for script in document.select(&sel) {
        let raw = script.text().collect::<String>();
        if let Ok(value) = serde_json::from_str::<Value>(&raw)
            && value_has_news_type(&value)
        {
            return true;
        }
    }
    false
}

fn value_has_news_type(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.iter().any(value_has_news_type),
        Value::Object(map) => {
            if map.get("@type").is_some_and(type_is_news_article) {
                return true;
            }
            map.get("@graph").is_some_and(value_has_news_type)
        }
        _ => false,
    }
}

fn type_is_news_article(type_value: &Value) -> bool {
    match type_value {
        Value::String(s) => s == "NewsArticle",
        Value::Array(items) => items.iter().any(|v| v.as_str() == Some("NewsArticle")),
        _ => false,
    }
}

fn is_amp(document: &Html) -> bool {
    let sel = Selector::parse("link[rel=\"amphtml\"]").unwrap();
    document.select(&sel).next().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://news.example.com/story/1";

    fn extract_default(html: &str) -> ArticleFeatures {
        extract(html, PAGE_URL, &ExtractOptions::default())
    }

    /// A paragraph of `n` words, each word 5 chars, sentence break every 15 words.
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

    #[test]
    fn test_container_prefers_article_tag() {
        let html = r#"<html><body>
            <div class="sidebar"><p>This sidebar paragraph is long enough to pass the minimum character filter easily.</p></div>
            <article><p>The body paragraph lives in the real container and is also comfortably over the threshold.</p></article>
        </body></html>"#;
        let features = extract_default(html);
        assert_eq!(features.paragraph_count, 1);
        assert!(features.paragraphs[0].starts_with("The body paragraph"));
    }

    #[test]
    fn test_container_falls_back_to_content_hint_div() {
        let html = r#"<html><body>
            <div class="nav"><p>Navigation text that is long enough to pass the minimum length filter but should not count.</p></div>
            <div class="post-body"><p>Actual article text sits inside a div whose class carries a content hint for the picker.</p></div>
        </body></html>"#;
        let features = extract_default(html);
        assert_eq!(features.paragraph_count, 1);
        assert!(features.paragraphs[0].starts_with("Actual article"));
    }

    #[test]
    fn test_container_falls_back_to_whole_document() {
        let html = r#"<html><body>
            <p>Without any recognizable container this paragraph must still be found via the whole document.</p>
        </body></html>"#;
        let features = extract_default(html);
        assert_eq!(features.paragraph_count, 1);
    }

    #[test]
    fn test_title_prefers_h1_over_title_tag() {
        let html = r#"<html><head><title>Doc Title</title></head>
            <body><article><h1>Headline From H1</h1></article></body></html>"#;
        let features = extract_default(html);
        assert_eq!(features.title, "Headline From H1");
    }

    #[test]
    fn test_title_falls_back_to_title_tag() {
        let html = "<html><head><title>Doc Title</title></head><body><article></article></body></html>";
        let features = extract_default(html);
        assert_eq!(features.title, "Doc Title");
    }

    #[test]
    fn test_meta_description_fallback_chain() {
        let html = r#"<html><head>
            <meta property="og:description" content="OG description text">
        </head><body></body></html>"#;
        let features = extract_default(html);
        assert_eq!(features.meta_description, "OG description text");

        let html = r#"<html><head>
            <meta name="description" content="Primary description">
            <meta property="og:description" content="OG description text">
        </head><body></body></html>"#;
        let features = extract_default(html);
        assert_eq!(features.meta_description, "Primary description");

        assert_eq!(extract_default("<html></html>").meta_description, "");
    }

    #[test]
    fn test_paragraph_filter_drops_short_and_boilerplate() {
        let html = format!(
            r#"<article>
                <p>Too short.</p>
                <p>Also Read: this promotional blurb is certainly longer than eighty characters but it must be dropped anyway.</p>
                <p>{}</p>
            </article>"#,
            paragraph(60)
        );
        let features = extract_default(&html);
        assert_eq!(features.paragraph_count, 1);
        assert_eq!(features.word_count, 60);
    }

    #[test]
    fn test_word_count_is_sum_over_paragraphs() {
        let html = format!(
            "<article><p>{}</p><p>{}</p></article>",
            paragraph(45),
            paragraph(30)
        );
        let features = extract_default(&html);
        let expected: usize = features
            .paragraphs
            .iter()
            .map(|p| p.split_whitespace().count())
            .sum();
        assert_eq!(features.word_count, expected);
        assert_eq!(features.word_count, 75);
    }

    #[test]
    fn test_readability_uses_sentence_splits() {
        // 30 words with a period every 15 words: 2 sentences, 15 words each.
        let html = format!("<article><p>{}</p></article>", paragraph(30));
        let features = extract_default(&html);
        assert!((features.avg_words_per_sentence - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_images_prefer_figures_and_skip_junk() {
        let html = r#"<article>
            <figure><img src="/img/site-logo.png" alt="logo"></figure>
            <figure><img src="/img/hero-shot.jpg" alt="A scene"></figure>
            <img src="/img/inline.jpg" class="featured-image">
        </article>"#;
        let features = extract_default(html);
        // Figures win; the junk logo and the non-figure fallback are ignored.
        assert_eq!(features.image_count, 1);
        assert_eq!(features.images_with_alt, 1);
    }

    #[test]
    fn test_images_fall_back_to_class_hints() {
        let html = r#"<article>
            <img src="/img/one.jpg" class="post-hero" alt="described">
            <img src="/img/two.jpg" class="post-thumb">
            <img src="/img/plain.jpg">
        </article>"#;
        let features = extract_default(html);
        assert_eq!(features.image_count, 2);
        assert_eq!(features.images_with_alt, 1);
        assert!(features.images_with_alt <= features.image_count);
    }

    #[test]
    fn test_image_cap_keeps_hero_only() {
        let html = r#"<article>
            <figure><img src="/a.jpg" alt="a"></figure>
            <figure><img src="/b.jpg" alt="b"></figure>
        </article>"#;
        let options = ExtractOptions {
            image_cap: Some(1),
            ..ExtractOptions::default()
        };
        let features = extract(html, PAGE_URL, &options);
        assert_eq!(features.image_count, 1);
        assert_eq!(features.images_with_alt, 1);
    }

    #[test]
    fn test_h2_filter_skips_short_promo_and_long_first() {
        let long_first = "x".repeat(130);
        let html = format!(
            r#"<article>
                <h2>{long_first}</h2>
                <h2>Short</h2>
                <h2>Subscribe to our newsletter today</h2>
                <h2>A perfectly ordinary section heading</h2>
                <h2>Another reasonable section heading</h2>
            </article>"#
        );
        let features = extract_default(&html);
        assert_eq!(features.heading_counts.h2, 2);
    }

    #[test]
    fn test_link_classification() {
        let html = r##"<article>
            <p><a href="/local/path">in</a>
               <a href="https://news.example.com/other">in</a>
               <a href="https://other.example.org/x">out</a>
               <a href="//news.example.com/proto">in</a>
               <a href="#section">skip</a>
               <a href="mailto:x@example.com">skip</a>
               <a href="javascript:void(0)">skip</a>
               <a href="tel:+15551234">skip</a></p>
        </article>"##;
        let features = extract_default(html);
        assert_eq!(features.internal_link_count, 3);
        assert_eq!(features.external_link_count, 1);
    }

    #[test]
    fn test_link_scope_paragraphs_ignores_nav_anchors() {
        let html = r#"<article>
            <a href="/nav-one">nav</a>
            <a href="https://other.example.org/ad">nav</a>
            <p><a href="/in-paragraph">body link</a></p>
        </article>"#;
        let options = ExtractOptions {
            link_scope: LinkScope::Paragraphs,
            ..ExtractOptions::default()
        };
        let features = extract(html, PAGE_URL, &options);
        assert_eq!(features.internal_link_count, 1);
        assert_eq!(features.external_link_count, 0);
    }

    #[test]
    fn test_structured_data_scalar_type() {
        let html = r#"<html><head>
            <script type="application/ld+json">{"@type": "NewsArticle", "headline": "x"}</script>
        </head><body></body></html>"#;
        assert!(extract_default(html).has_structured_data);
    }

    #[test]
    fn test_structured_data_list_type() {
        let html = r#"<html><head>
            <script type="application/ld+json">{"@type": ["NewsArticle", "Article"]}</script>
        </head><body></body></html>"#;
        assert!(extract_default(html).has_structured_data);
    }

    #[test]
    fn test_structured_data_graph_and_negative() {
        let html = r#"<html><head>
            <script type="application/ld+json">{"@graph": [{"@type": "WebPage"}, {"@type": "NewsArticle"}]}</script>
        </head><body></body></html>"#;
        assert!(extract_default(html).has_structured_data);

        let html = r#"<html><head>
            <script type="application/ld+json">{"@type": "BlogPosting"}</script>
            <script type="application/ld+json">not json at all</script>
        </head><body></body></html>"#;
        assert!(!extract_default(html).has_structured_data);
    }

    #[test]
    fn test_amp_detection() {
        let html = r#"<html><head><link rel="amphtml" href="https://news.example.com/amp/1"></head></html>"#;
        assert!(extract_default(html).is_amp);
        assert!(!extract_default("<html></html>").is_amp);
    }

    #[test]
    fn test_summary_is_leading_sentences() {
        let html = r#"<article><p>The first sentence sets the scene for this article rather well. The second sentence adds detail to it. The third should not appear.</p></article>"#;
        let features = extract_default(html);
        assert_eq!(
            features.summary,
            "The first sentence sets the scene for this article rather well. The second sentence adds detail to it."
        );
    }

    #[test]
    fn test_empty_page_yields_defaults() {
        let features = extract_default("<html><body><p>tiny</p></body></html>");
        assert_eq!(features.paragraph_count, 0);
        assert_eq!(features.word_count, 0);
        assert_eq!(features.image_count, 0);
        assert_eq!(features.internal_link_count, 0);
        assert_eq!(features.summary, "");
    }

    #[test]
    fn test_extract_is_idempotent() {
        let html = format!(
            r#"<article><h1>Stable Headline</h1><p>{}</p>
            <figure><img src="/hero.jpg" alt="h"></figure></article>"#,
            paragraph(40)
        );
        let first = extract_default(&html);
        let second = extract_default(&html);
        assert_eq!(first, second);
    }
}
