//! Scripted in-process catalog used by the controller tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bookexplorer::domain::{
    normalize_author_key, normalize_work_key, AuthorCredit, BookDetail, BookSummary,
    ResolvedAuthor, AUTHOR_ROLE,
};
use bookexplorer::{BookExplorerError, CatalogApi, Result};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One recorded catalog call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListFiction { limit: u32, offset: u32 },
    Search { query: String, limit: u32, offset: u32 },
    Detail(String),
    Author(String),
}

/// Which endpoint a delay or failure applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Fiction,
    Search,
    Detail,
    Author,
}

#[derive(Default)]
struct Script {
    fiction: Vec<BookSummary>,
    searches: HashMap<String, Vec<BookSummary>>,
    details: HashMap<String, BookDetail>,
    authors: HashMap<String, String>,
    failing_keys: HashSet<String>,
    failures_left: HashMap<Endpoint, u32>,
    delays: HashMap<Endpoint, Duration>,
    search_delays: HashMap<String, Duration>,
}

/// Catalog double serving scripted data and recording every call.
///
/// Listing and search results are served as one list sliced by
/// `offset..offset + limit`, like the real paginated endpoints.
#[derive(Default)]
pub struct MockCatalog {
    script: Mutex<Script>,
    calls: Mutex<Vec<Call>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn with_fiction(self, books: Vec<BookSummary>) -> Self {
        self.script.lock().unwrap().fiction = books;
        self
    }

    pub fn with_search(self, query: &str, books: Vec<BookSummary>) -> Self {
        self.script.lock().unwrap().searches.insert(query.to_string(), books);
        self
    }

    pub fn with_detail(self, detail: BookDetail) -> Self {
        self.script.lock().unwrap().details.insert(detail.key.clone(), detail);
        self
    }

    pub fn with_author(self, key: &str, name: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .authors
            .insert(normalize_author_key(key), name.to_string());
        self
    }

    /// Detail or author lookups for `key` fail with a network error.
    pub fn failing(self, key: &str) -> Self {
        self.script.lock().unwrap().failing_keys.insert(key.to_string());
        self
    }

    /// The next `times` calls to `endpoint` fail with a network error.
    pub fn failing_times(self, endpoint: Endpoint, times: u32) -> Self {
        self.script.lock().unwrap().failures_left.insert(endpoint, times);
        self
    }

    /// Like [`MockCatalog::failing_times`], on an already shared catalog.
    pub fn fail_next(&self, endpoint: Endpoint, times: u32) {
        self.script.lock().unwrap().failures_left.insert(endpoint, times);
    }

    pub fn with_delay(self, endpoint: Endpoint, delay: Duration) -> Self {
        self.script.lock().unwrap().delays.insert(endpoint, delay);
        self
    }

    /// Overrides the search delay for one query.
    pub fn with_search_delay(self, query: &str, delay: Duration) -> Self {
        self.script.lock().unwrap().search_delays.insert(query.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, endpoint: Endpoint) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| {
                matches!(
                    (endpoint, call),
                    (Endpoint::Fiction, Call::ListFiction { .. })
                        | (Endpoint::Search, Call::Search { .. })
                        | (Endpoint::Detail, Call::Detail(_))
                        | (Endpoint::Author, Call::Author(_))
                )
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    /// Sleeps for the scripted delay, then consumes a scripted failure.
    async fn enter(&self, endpoint: Endpoint, delay_override: Option<Duration>) -> Result<()> {
        let delay = delay_override.or_else(|| self.script.lock().unwrap().delays.get(&endpoint).copied());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut script = self.script.lock().unwrap();
        if let Some(left) = script.failures_left.get_mut(&endpoint) {
            if *left > 0 {
                *left -= 1;
                return Err(BookExplorerError::Network("connection reset".to_string()));
            }
        }
        Ok(())
    }

    fn check_key(&self, key: &str) -> Result<()> {
        if self.script.lock().unwrap().failing_keys.contains(key) {
            return Err(BookExplorerError::Network(format!("timed out fetching {key}")));
        }
        Ok(())
    }
}

fn page(all: &[BookSummary], limit: u32, offset: u32) -> Vec<BookSummary> {
    all.iter()
        .skip(offset as usize)
        .take(limit as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl CatalogApi for MockCatalog {
    async fn list_fiction(&self, limit: u32, offset: u32) -> Result<Vec<BookSummary>> {
        self.record(Call::ListFiction { limit, offset });
        self.enter(Endpoint::Fiction, None).await?;
        Ok(page(&self.script.lock().unwrap().fiction, limit, offset))
    }

    async fn search(&self, query: &str, limit: u32, offset: u32) -> Result<Vec<BookSummary>> {
        self.record(Call::Search {
            query: query.to_string(),
            limit,
            offset,
        });
        let delay = self.script.lock().unwrap().search_delays.get(query).copied();
        self.enter(Endpoint::Search, delay).await?;

        let script = self.script.lock().unwrap();
        Ok(script
            .searches
            .get(query)
            .map(|all| page(all, limit, offset))
            .unwrap_or_default())
    }

    async fn get_book_detail(&self, work_key: &str) -> Result<BookDetail> {
        self.record(Call::Detail(work_key.to_string()));
        self.enter(Endpoint::Detail, None).await?;
        self.check_key(work_key)?;

        self.script
            .lock()
            .unwrap()
            .details
            .get(work_key)
            .cloned()
            .ok_or_else(|| BookExplorerError::NotFound(work_key.to_string()))
    }

    async fn get_author(&self, author_key: &str) -> Result<ResolvedAuthor> {
        self.record(Call::Author(author_key.to_string()));
        self.enter(Endpoint::Author, None).await?;
        self.check_key(author_key)?;

        self.script
            .lock()
            .unwrap()
            .authors
            .get(author_key)
            .map(|name| ResolvedAuthor { name: name.clone() })
            .ok_or_else(|| BookExplorerError::NotFound(author_key.to_string()))
    }
}

pub fn summary(key: &str, title: &str) -> BookSummary {
    BookSummary {
        key: normalize_work_key(key),
        title: title.to_string(),
        authors: vec!["Test Author".to_string()],
        cover_id: Some(1),
    }
}

/// `count` summaries keyed `OL{start}W`, `OL{start+1}W`, ...
pub fn summaries(start: usize, count: usize) -> Vec<BookSummary> {
    (start..start + count)
        .map(|i| summary(&format!("OL{i}W"), &format!("Book {i}")))
        .collect()
}

pub fn author_credit(author: &str) -> AuthorCredit {
    AuthorCredit {
        author_key: normalize_author_key(author),
        role: Some(AUTHOR_ROLE.to_string()),
    }
}

pub fn credit_with_role(author: &str, role: &str) -> AuthorCredit {
    AuthorCredit {
        author_key: normalize_author_key(author),
        role: Some(role.to_string()),
    }
}

pub fn detail(key: &str, title: &str, covers: Vec<i64>, credits: Vec<AuthorCredit>) -> BookDetail {
    BookDetail {
        key: normalize_work_key(key),
        title: title.to_string(),
        covers,
        publish_date: None,
        description: None,
        credits,
    }
}
