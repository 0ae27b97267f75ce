//! # SEO Audit
//!
//! A command-line SEO auditor for news articles and blog posts. It fetches
//! each URL, heuristically extracts article features from the HTML, scores
//! them against a tunable policy, and writes a styled multi-sheet XLSX
//! report.
//!
//! ## Features
//!
//! - Fetches pages with a browser-like User-Agent and a fixed timeout
//! - Separates real article paragraphs and images from boilerplate
//!   (ads, "also read" blurbs, captions, logos) with lexical filters
//! - Scores 14 on-page metrics against news or blog ideal ranges,
//!   producing a 0-100 score and an A+..D grade per URL
//! - Optional AI headline suggestions ranked by a CTR heuristic
//! - Exports a styled XLSX report with audit, score-logic, and guideline
//!   sheets
//!
//! ## Usage
//!
//! ```sh
//! seo_audit -o audit.xlsx https://news.example.com/story-1 example.com/story-2
//! ```
//!
//! ## Architecture
//!
//! Data flows one-directional per URL, with no shared state between URLs:
//! 1. **Fetch**: HTTP GET (no retries; failures degrade to an error row)
//! 2. **Extract**: container selection + feature extraction from the HTML
//! 3. **Score**: weighted band checks against the selected policy
//! 4. **Report**: all records rendered into one in-memory workbook

use chrono::Local;
use clap::Parser;
use itertools::Itertools;
use std::error::Error;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod audit;
mod cli;
mod extract;
mod fetch;
mod headlines;
mod models;
mod policy;
mod report;
mod score;
mod utils;

use audit::HttpFetcher;
use cli::Cli;
use extract::{BoilerplatePattern, ExtractOptions};
use headlines::GeminiSuggester;
use models::AuditRecord;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("seo_audit starting up");

    let args = Cli::parse();
    debug!(?args.profile, ?args.link_scope, output = %args.output, "Parsed CLI arguments");

    let suggester = if args.suggest_headlines {
        let Some(api_key) = args.gemini_api_key.clone() else {
            return Err("--suggest-headlines requires --gemini-api-key or GEMINI_API_KEY".into());
        };
        Some((api_key, args.gemini_model.clone()))
    } else {
        None
    };

    let client = fetch::build_client(args.timeout_secs)?;
    let suggester = suggester
        .map(|(key, model)| GeminiSuggester::new(client.clone(), key, model));

    let options = ExtractOptions {
        boilerplate: BoilerplatePattern::with_min_chars(args.min_paragraph_chars),
        link_scope: args.link_scope,
        image_cap: if args.hero_only { Some(1) } else { None },
    };
    let policy = args.profile.policy();

    // Dedupe while keeping the order URLs were given in.
    let urls: Vec<String> = args
        .urls
        .iter()
        .map(|u| fetch::normalize_url(u))
        .unique()
        .collect();
    let total = urls.len();
    info!(total, "Starting audit batch");

    // URLs are processed one at a time; a long list just takes longer, and
    // one bad URL never aborts the batch.
    let fetcher = HttpFetcher::new(client);
    let records: Vec<AuditRecord> =
        audit::run_batch(&fetcher, &options, &policy, suggester.as_ref(), &urls).await;

    let failed = records.iter().filter(|r| r.breakdown.is_empty()).count();
    info!(
        total,
        audited = total - failed,
        failed,
        "Completed audit batch"
    );

    let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let bytes = report::render(&records, &policy, &generated_at)?;
    tokio::fs::write(&args.output, &bytes).await?;
    info!(path = %args.output, bytes = bytes.len(), "Wrote XLSX report");

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
