//! Best-effort retrieval of pull requests, one page at a time.

use std::future::Future;

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::config::{FetchConfig, RepositoryConfig};
use crate::pr::PullRequest;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(StatusCode),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can hand out one page of pull requests.
pub trait PageSource {
    /// `page` starts at 1.
    fn fetch_page(
        &self,
        page: u32,
        per_page: u32,
    ) -> impl Future<Output = Result<Vec<PullRequest>, FetchError>>;
}

/// GitHub REST API for a single repository.
#[derive(Debug, Clone)]
pub struct GithubApi {
    client: Client,
    pulls_url: String,
}

impl GithubApi {
    pub fn new(repo: &RepositoryConfig, fetch: &FetchConfig) -> reqwest::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = fetch.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            pulls_url: format!("{}/pulls", repo.repo_url()),
        })
    }
}

impl PageSource for GithubApi {
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<Vec<PullRequest>, FetchError> {
        let response = self
            .client
            .get(&self.pulls_url)
            .query(&[
                ("state", "all".to_string()),
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
            ])
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, concat!("xpboard/", env!("CARGO_PKG_VERSION")))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Why pagination ended.
#[derive(Debug)]
pub enum FetchStop {
    /// A page came back with no records.
    Exhausted,
    /// `max_pages` pages were read.
    PageCap,
    Failed(FetchError),
}

/// Whatever was retrieved before pagination stopped.
#[derive(Debug)]
pub struct FetchOutcome {
    pub pulls: Vec<PullRequest>,
    pub pages: u32,
    pub stop: FetchStop,
}

impl FetchOutcome {
    /// The failure that cut pagination short, if any.
    pub fn failure(&self) -> Option<&FetchError> {
        match &self.stop {
            FetchStop::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Read pages 1..=max_pages in order, stopping at the first empty or failed
/// page. Never fails; a failure only ends pagination early.
pub async fn fetch_all_pulls<S: PageSource>(source: &S, config: &FetchConfig) -> FetchOutcome {
    let mut pulls = Vec::new();
    let mut pages = 0;

    let stop = loop {
        if pages >= config.max_pages {
            break FetchStop::PageCap;
        }
        let page = pages + 1;

        match source.fetch_page(page, config.per_page).await {
            Ok(batch) if batch.is_empty() => {
                tracing::debug!(page, "empty page, pagination done");
                break FetchStop::Exhausted;
            }
            Ok(batch) => {
                tracing::debug!(page, records = batch.len(), "fetched page");
                pulls.extend(batch);
                pages = page;
            }
            Err(e) => {
                tracing::warn!(page, error = %e, "stopping pagination");
                break FetchStop::Failed(e);
            }
        }
    };

    FetchOutcome { pulls, pages, stop }
}
