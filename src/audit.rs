//! Per-URL audit orchestration.
//!
//! The batch loop lives here, behind a narrow fetch trait, so the
//! "one bad URL never aborts the batch" behavior can be exercised without
//! a network. Pages are audited strictly in input order.

use crate::extract::{self, ExtractOptions};
use crate::fetch::{FetchError, FetchedPage, fetch_page};
use crate::headlines::{SuggestHeadlines, suggest_with_fallback};
use crate::models::AuditRecord;
use crate::policy::ScoringPolicy;
use crate::score;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use tracing::{info, warn};

/// Narrow interface for retrieving one page's markup.
#[allow(async_fn_in_trait)]
pub trait FetchPage {
    /// Retrieve the markup served at `url`.
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// Production fetcher backed by the shared HTTP client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        HttpFetcher { client }
    }
}

impl FetchPage for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        fetch_page(&self.client, url).await
    }
}

/// Audit every URL in order and return one record per URL.
///
/// A URL that fails to fetch yields its error record and the batch moves
/// on to the next URL.
pub async fn run_batch<F: FetchPage, S: SuggestHeadlines>(
    fetcher: &F,
    options: &ExtractOptions,
    policy: &ScoringPolicy,
    suggester: Option<&S>,
    urls: &[String],
) -> Vec<AuditRecord> {
    let total = urls.len();
    stream::iter(urls.iter().enumerate())
        .then(|(i, url)| audit_one(fetcher, options, policy, suggester, url, i + 1, total))
        .collect()
        .await
}

/// Audit one URL end to end; failures degrade to an error record.
async fn audit_one<F: FetchPage, S: SuggestHeadlines>(
    fetcher: &F,
    options: &ExtractOptions,
    policy: &ScoringPolicy,
    suggester: Option<&S>,
    url: &str,
    index: usize,
    total: usize,
) -> AuditRecord {
    match fetcher.fetch(url).await {
        Ok(page) => {
            let features = extract::extract(&page.body, &page.final_url, options);
            let mut record = score::score(url, &features, policy);
            if let Some(suggester) = suggester
                && !features.title.is_empty()
            {
                record.headline_suggestions =
                    suggest_with_fallback(suggester, &features.title).await;
            }
            info!(
                index,
                total,
                score = record.score,
                grade = %record.grade,
                %url,
                "Audited URL"
            );
            record
        }
        Err(e) => {
            warn!(index, total, error = %e, %url, "Fetch failed; recording error row");
            AuditRecord::fetch_failure(url.to_string(), e.to_string())
        }
    }
}
