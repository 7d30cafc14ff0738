//! JSON wire shapes returned by the catalog API.
//!
//! The subject listing and the full-text search describe the same books in
//! two different shapes. Each shape keeps its own struct and its own
//! normalization function into [`BookSummary`]; they are never merged at the
//! wire level. Optional descriptive fields decode to `None` instead of
//! failing, so only structural mismatches surface as decode errors.

use crate::domain::{
    AuthorCredit, BookDetail, BookExplorerError, BookSummary, ResolvedAuthor, Result,
    UNKNOWN_AUTHOR, UNTITLED,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Response of `GET /subjects/{subject}.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubjectResponse {
    #[serde(default)]
    pub works: Vec<SubjectWork>,
}

/// One work inside a subject listing. Authors arrive as nested objects.
#[derive(Debug, Clone, Deserialize)]
pub struct SubjectWork {
    pub key: String,
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<SubjectAuthor>,
    pub cover_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubjectAuthor {
    pub key: Option<String>,
    pub name: Option<String>,
}

/// Response of `GET /search.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "numFound")]
    pub num_found: Option<u64>,
    #[serde(default)]
    pub docs: Vec<SearchDoc>,
}

/// One search hit. Author names and keys are parallel flat arrays.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchDoc {
    pub key: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub author_name: Vec<String>,
    #[serde(default)]
    pub author_key: Vec<String>,
    pub cover_i: Option<i64>,
}

/// Response of `GET /works/{id}.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkResponse {
    pub key: String,
    pub title: Option<String>,
    #[serde(default)]
    pub covers: Vec<i64>,
    pub first_publish_date: Option<String>,
    pub description: Option<TextValue>,
    #[serde(default)]
    pub authors: Vec<WorkAuthorEntry>,
}

/// A free-text field that is either a bare string or a typed `{type, value}` object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    Plain(String),
    Typed { value: String },
}

impl TextValue {
    fn into_string(self) -> String {
        match self {
            Self::Plain(text) | Self::Typed { value: text } => text,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkAuthorEntry {
    pub author: KeyRef,
    #[serde(rename = "type")]
    pub role: Option<KeyRef>,
}

/// A `{ "key": "..." }` reference object.
#[derive(Debug, Clone, Deserialize)]
pub struct KeyRef {
    pub key: String,
}

/// Response of `GET /authors/{id}.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorResponse {
    pub name: Option<String>,
    pub personal_name: Option<String>,
}

/// Decodes a response body, tagging failures with the endpoint that produced it.
///
/// # Errors
///
/// Returns [`BookExplorerError::Decode`] if `body` does not match `T`.
pub fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| BookExplorerError::Decode(format!("{endpoint}: {e}")))
}

/// Normalizes a subject listing into summaries, preserving order.
#[must_use]
pub fn summaries_from_subject(response: SubjectResponse) -> Vec<BookSummary> {
    response
        .works
        .into_iter()
        .map(|work| BookSummary {
            key: work.key,
            title: work.title.unwrap_or_else(|| UNTITLED.to_string()),
            authors: work.authors.into_iter().filter_map(|a| a.name).collect(),
            cover_id: work.cover_id,
        })
        .collect()
}

/// Normalizes search hits into summaries, preserving order.
///
/// Missing titles become [`UNTITLED`]; missing keys become an empty string.
#[must_use]
pub fn summaries_from_search(response: SearchResponse) -> Vec<BookSummary> {
    response
        .docs
        .into_iter()
        .map(|doc| BookSummary {
            key: doc.key.unwrap_or_default(),
            title: doc.title.unwrap_or_else(|| UNTITLED.to_string()),
            authors: doc.author_name,
            cover_id: doc.cover_i,
        })
        .collect()
}

/// Converts a work record into a [`BookDetail`].
#[must_use]
pub fn detail_from_work(work: WorkResponse) -> BookDetail {
    BookDetail {
        key: work.key,
        title: work.title.unwrap_or_else(|| UNTITLED.to_string()),
        covers: work.covers,
        publish_date: work.first_publish_date,
        description: work.description.map(TextValue::into_string),
        credits: work
            .authors
            .into_iter()
            .map(|entry| AuthorCredit {
                author_key: entry.author.key,
                role: entry.role.map(|r| r.key),
            })
            .collect(),
    }
}

/// Picks the display name of an author record.
#[must_use]
pub fn author_from_record(record: AuthorResponse) -> ResolvedAuthor {
    ResolvedAuthor {
        name: record
            .name
            .or(record.personal_name)
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorKind, AUTHOR_ROLE};

    #[test]
    fn subject_listing_keeps_order_and_nested_names() {
        let body = r#"{
            "name": "fiction",
            "works": [
                {"key": "/works/OL1W", "title": "First", "authors": [{"key": "/authors/OL1A", "name": "Ann"}], "cover_id": 11},
                {"key": "/works/OL2W", "authors": [], "cover_id": null}
            ]
        }"#;
        let books = summaries_from_subject(decode("subject", body).unwrap());
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].title, "First");
        assert_eq!(books[0].authors, vec!["Ann"]);
        assert_eq!(books[0].cover_id, Some(11));
        assert_eq!(books[1].title, UNTITLED);
        assert!(books[1].authors.is_empty());
    }

    #[test]
    fn search_docs_default_missing_fields() {
        let body = r#"{
            "numFound": 2,
            "docs": [
                {"key": "/works/OL3W", "title": "Dune", "author_name": ["Frank Herbert"], "author_key": ["OL79034A"], "cover_i": 42},
                {"author_name": []}
            ]
        }"#;
        let response: SearchResponse = decode("search", body).unwrap();
        assert_eq!(response.num_found, Some(2));
        let books = summaries_from_search(response);
        assert_eq!(books[0].authors, vec!["Frank Herbert"]);
        assert_eq!(books[0].cover_id, Some(42));
        assert_eq!(books[1].key, "");
        assert_eq!(books[1].title, UNTITLED);
    }

    #[test]
    fn work_accepts_typed_description_and_missing_fields() {
        let body = r#"{
            "key": "/works/OL45804W",
            "title": "Fantastic Mr Fox",
            "covers": [6498519, 8904777],
            "description": {"type": "/type/text", "value": "A fox outwits three farmers."},
            "authors": [
                {"author": {"key": "/authors/OL34184A"}, "type": {"key": "/type/author_role"}},
                {"author": {"key": "/authors/OL2A"}}
            ]
        }"#;
        let detail = detail_from_work(decode("work", body).unwrap());
        assert_eq!(detail.primary_cover(), Some(6_498_519));
        assert_eq!(detail.description.as_deref(), Some("A fox outwits three farmers."));
        assert_eq!(detail.publish_date, None);
        assert_eq!(detail.credits.len(), 2);
        assert_eq!(detail.credits[0].role.as_deref(), Some(AUTHOR_ROLE));
        assert_eq!(detail.credits[1].role, None);
    }

    #[test]
    fn work_accepts_plain_description() {
        let body = r#"{"key": "/works/OL1W", "description": "Plain text."}"#;
        let detail = detail_from_work(decode("work", body).unwrap());
        assert_eq!(detail.description.as_deref(), Some("Plain text."));
        assert!(detail.covers.is_empty());
        assert!(detail.credits.is_empty());
    }

    #[test]
    fn author_name_falls_back_to_personal_name() {
        let named: AuthorResponse = decode("author", r#"{"name": "Roald Dahl"}"#).unwrap();
        assert_eq!(author_from_record(named).name, "Roald Dahl");

        let personal: AuthorResponse = decode("author", r#"{"personal_name": "R. Dahl"}"#).unwrap();
        assert_eq!(author_from_record(personal).name, "R. Dahl");

        let empty: AuthorResponse = decode("author", "{}").unwrap();
        assert_eq!(author_from_record(empty).name, UNKNOWN_AUTHOR);
    }

    #[test]
    fn shape_mismatch_is_a_decode_error() {
        let err = decode::<SubjectResponse>("subject", r#"{"works": "nope"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.to_string().contains("subject"));
    }
}
