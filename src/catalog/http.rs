//! reqwest-backed catalog client.

use crate::catalog::api::CatalogApi;
use crate::catalog::wire::{self, AuthorResponse, SearchResponse, SubjectResponse, WorkResponse};
use crate::domain::{
    normalize_author_key, BookDetail, BookExplorerError, BookSummary, ResolvedAuthor, Result,
    WORK_KEY_PREFIX,
};
use crate::Config;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::Instrument;

/// HTTP implementation of [`CatalogApi`].
///
/// Owns a single `reqwest::Client` (and therefore one connection pool). The
/// composition root constructs one instance and shares it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    http: reqwest::Client,
    base_url: String,
    subject: String,
}

impl HttpCatalogClient {
    /// Builds a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BookExplorerError::Config`] if the TLS backend or client
    /// settings cannot be initialized.
    pub fn new(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let http = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| BookExplorerError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(http, &config.api_base_url, &config.subject))
    }

    /// Wraps an already-configured `reqwest::Client`.
    #[must_use]
    pub fn with_client(http: reqwest::Client, base_url: &str, subject: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            subject: subject.to_string(),
        }
    }

    /// URL of a key-addressed record, e.g. `/works/OL1W` → `{base}/works/OL1W.json`.
    fn record_url(&self, key: &str) -> String {
        format!("{}{key}.json", self.base_url)
    }

    /// Issues a GET and returns the body text of a successful response.
    async fn get_text(&self, endpoint: &str, url: &str, query: &[(&str, String)]) -> Result<String> {
        let span = tracing::debug_span!("catalog_request", endpoint = endpoint, url = %url);

        async {
            let started = Instant::now();
            let response = self.http.get(url).query(query).send().await?;
            let status = response.status();

            tracing::debug!(
                status = status.as_u16(),
                elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                "catalog response received"
            );

            let body = response.error_for_status()?.text().await?;
            Ok::<_, BookExplorerError>(body)
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogClient {
    async fn list_fiction(&self, limit: u32, offset: u32) -> Result<Vec<BookSummary>> {
        let url = format!("{}/subjects/{}.json", self.base_url, self.subject);
        let body = self
            .get_text(
                "subject",
                &url,
                &[("limit", limit.to_string()), ("offset", offset.to_string())],
            )
            .await?;
        let response: SubjectResponse = wire::decode("subject listing", &body)?;
        Ok(wire::summaries_from_subject(response))
    }

    async fn search(&self, query: &str, limit: u32, offset: u32) -> Result<Vec<BookSummary>> {
        let url = format!("{}/search.json", self.base_url);
        let body = self
            .get_text(
                "search",
                &url,
                &[
                    ("q", query.to_string()),
                    ("limit", limit.to_string()),
                    ("offset", offset.to_string()),
                ],
            )
            .await?;
        let response: SearchResponse = wire::decode("search", &body)?;
        Ok(wire::summaries_from_search(response))
    }

    async fn get_book_detail(&self, work_key: &str) -> Result<BookDetail> {
        if !work_key.starts_with(WORK_KEY_PREFIX) {
            tracing::debug!(work_key = %work_key, "work key is missing its namespace prefix");
        }
        let body = self.get_text("work", &self.record_url(work_key), &[]).await?;
        let response: WorkResponse = wire::decode("work", &body)?;
        Ok(wire::detail_from_work(response))
    }

    async fn get_author(&self, author_key: &str) -> Result<ResolvedAuthor> {
        let key = normalize_author_key(author_key);
        let body = self.get_text("author", &self.record_url(&key), &[]).await?;
        let response: AuthorResponse = wire::decode("author", &body)?;
        Ok(wire::author_from_record(response))
    }
}
