//! Command-line interface definitions for the SEO auditor.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! API keys can be provided via command-line flags or environment variables.

use crate::extract::LinkScope;
use crate::policy::AuditProfile;
use clap::Parser;

/// Command-line arguments for the SEO audit pipeline.
///
/// # Examples
///
/// ```sh
/// # Audit two articles with the news profile
/// seo_audit -o audit.xlsx https://news.example.com/a https://news.example.com/b
///
/// # Blog profile, hero image only, links counted inside paragraphs
/// seo_audit --profile blog --hero-only --link-scope paragraphs -o audit.xlsx example.com/post
///
/// # With AI headline suggestions
/// seo_audit -o audit.xlsx --suggest-headlines --gemini-api-key KEY example.com/story
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// URLs to audit, processed in order; bare hosts get an https:// prefix
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Output path for the XLSX report
    #[arg(short, long, default_value = "seo_audit.xlsx")]
    pub output: String,

    /// Scoring profile: news uses a lower word-count floor than blog
    #[arg(short, long, value_enum, default_value = "news")]
    pub profile: AuditProfile,

    /// Where to look for links: the whole container, or only inside <p> tags
    #[arg(long, value_enum, default_value = "container")]
    pub link_scope: LinkScope,

    /// Count at most one qualifying image (the presumed hero)
    #[arg(long)]
    pub hero_only: bool,

    /// Minimum visible characters for a paragraph to count as content
    #[arg(long, default_value_t = 80)]
    pub min_paragraph_chars: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = crate::fetch::DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Ask the generative API for alternative headlines per page
    #[arg(long)]
    pub suggest_headlines: bool,

    /// Generative-language API key (required with --suggest-headlines)
    #[arg(long, env = "GEMINI_API_KEY")]
    pub gemini_api_key: Option<String>,

    /// Generative model name used for headline suggestions
    #[arg(long, default_value = "gemini-pro")]
    pub gemini_model: String,
}
