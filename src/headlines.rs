//! Optional AI headline suggestions via a generative-language API.
//!
//! This is a best-effort enrichment that must never block the audit: on any
//! failure (network, auth, malformed response) the caller gets a one-element
//! list holding the original title. The collaborator sits behind a narrow
//! trait so the pipeline does not depend on a concrete backend, and tests
//! can substitute a stub.
//!
//! Candidates are ranked by a lexical click-through heuristic before they
//! reach the report.

use crate::models::HeadlineSuggestion;
use crate::utils::{truncate_for_log, visible_len};
use reqwest::Client;
use serde::Deserialize;
use std::error::Error;
use tracing::{info, instrument, warn};

/// Maximum number of candidates surfaced per title.
const MAX_CANDIDATES: usize = 5;

/// Minimum visible length for a line to count as a headline candidate.
const MIN_CANDIDATE_CHARS: usize = 15;

/// Lexical signals that historically lift click-through on news headlines.
const POWER_WORDS: [&str; 7] = ["how", "why", "what", "top", "big", "revealed", "exclusive"];

/// Narrow interface for the external headline collaborator.
#[allow(async_fn_in_trait)]
pub trait SuggestHeadlines {
    /// Propose alternative headlines for `title`.
    async fn suggest(&self, title: &str) -> Result<Vec<String>, Box<dyn Error>>;
}

/// Gemini-style `generateContent` backend.
#[derive(Debug, Clone)]
pub struct GeminiSuggester {
    client: Client,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GeminiSuggester {
    pub fn new(client: Client, api_key: String, model: String) -> Self {
        GeminiSuggester {
            client,
            api_key,
            model,
        }
    }

    fn prompt(title: &str) -> String {
        format!(
            "Generate 5 SEO friendly Google News headlines.\n\
             Rules:\n\
             - 55 to 65 characters\n\
             - No clickbait\n\
             - Professional news tone\n\
             Title:\n{title}"
        )
    }
}

impl SuggestHeadlines for GeminiSuggester {
    #[instrument(level = "info", skip_all)]
    async fn suggest(&self, title: &str) -> Result<Vec<String>, Box<dyn Error>> {
        let endpoint = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let payload = serde_json::json!({
            "contents": [{ "parts": [{ "text": Self::prompt(title) }] }]
        });

        let response = self
            .client
            .post(&endpoint)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(
                error = %e,
                response_preview = %truncate_for_log(&body, 300),
                "Suggestion API returned non-conforming JSON"
            );
            e
        })?;

        let text = parsed
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .map(|p| p.text.clone())
            .unwrap_or_default();

        let candidates = parse_candidates(&text);
        info!(count = candidates.len(), "Parsed headline candidates");
        Ok(candidates)
    }
}

/// Split a free-text model response into discrete headline candidates.
///
/// Lines are trimmed of bullet markers and numbering; lines shorter than
/// [`MIN_CANDIDATE_CHARS`] visible characters are dropped. At most
/// [`MAX_CANDIDATES`] survive.
pub fn parse_candidates(text: &str) -> Vec<String> {
    text.lines()
        .map(strip_bullet)
        .filter(|line| visible_len(line) >= MIN_CANDIDATE_CHARS)
        .take(MAX_CANDIDATES)
        .collect()
}

/// Remove leading bullet markers ("-", "*", "•") and "1." style numbering.
fn strip_bullet(line: &str) -> String {
    let trimmed = line.trim();
    let trimmed = trimmed.trim_start_matches(['-', '*', '•']).trim_start();
    let without_number = trimmed
        .split_once('.')
        .filter(|(head, _)| !head.is_empty() && head.chars().all(|c| c.is_ascii_digit()))
        .map(|(_, rest)| rest)
        .unwrap_or(trimmed);
    without_number.trim().trim_matches('"').to_string()
}

/// Heuristic click-through score for a headline, 0-100.
///
/// Base 50; +20 for a 55-65 visible-character length, +10 for a power
/// word, +10 for a digit, +5 for a question mark; capped at 100.
pub fn ctr_score(title: &str) -> u8 {
    let mut score: u32 = 50;
    let len = visible_len(title);
    if (55..=65).contains(&len) {
        score += 20;
    }
    let words: Vec<String> = title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    if POWER_WORDS.iter().any(|p| words.iter().any(|w| w == p)) {
        score += 10;
    }
    if title.chars().any(|c| c.is_ascii_digit()) {
        score += 10;
    }
    if title.contains('?') {
        score += 5;
    }
    score.min(100) as u8
}

/// Ask the collaborator for headlines, falling back to the original title.
///
/// The returned list is never empty and is sorted by CTR score descending.
pub async fn suggest_with_fallback(
    suggester: &impl SuggestHeadlines,
    title: &str,
) -> Vec<HeadlineSuggestion> {
    let candidates = match suggester.suggest(title).await {
        Ok(candidates) if !candidates.is_empty() => candidates,
        Ok(_) => {
            warn!("Suggestion API returned no usable candidates; keeping original title");
            vec![title.to_string()]
        }
        Err(e) => {
            warn!(error = %e, "Headline suggestion failed; keeping original title");
            vec![title.to_string()]
        }
    };

    let mut ranked: Vec<HeadlineSuggestion> = candidates
        .into_iter()
        .map(|text| HeadlineSuggestion {
            ctr_score: ctr_score(&text),
            text,
        })
        .collect();
    ranked.sort_by(|a, b| b.ctr_score.cmp(&a.ctr_score));
    ranked
}
