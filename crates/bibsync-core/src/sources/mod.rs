//! Scholarly-metadata search source: capability trait and wire model

pub mod openalex;

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use thiserror::Error;

pub use openalex::{pseudo_id, record_from_work, records_from_works};

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(String),
    #[error("rate limited by the metadata API")]
    RateLimited,
    #[error("invalid response: {0}")]
    Parse(String),
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

/// A works search: full-text `search` terms plus exact-match `filters`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkQuery {
    /// Searched fields, e.g. `("title_and_abstract", "...")`.
    pub search: Vec<(String, String)>,
    /// Exact filters, e.g. `("publication_year", "2023-2025")`.
    pub filters: Vec<(String, String)>,
}

impl WorkQuery {
    pub fn searching(field: impl Into<String>, terms: impl Into<String>) -> Self {
        Self {
            search: vec![(field.into(), terms.into())],
            filters: Vec::new(),
        }
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.filters.is_empty()
    }
}

impl fmt::Display for WorkQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self
            .search
            .iter()
            .map(|(field, terms)| format!("{field}: {terms}"))
            .collect();
        parts.extend(
            self.filters
                .iter()
                .map(|(key, value)| format!("{key}={value}")),
        );
        write!(f, "{}", parts.join(", "))
    }
}

/// Capability interface of the search API. Implementations block the caller.
pub trait MetadataSource {
    /// Collect works matching the query, up to `limit` when given.
    fn search_works(&self, query: &WorkQuery, limit: Option<usize>)
        -> Result<Vec<Work>, SourceError>;

    /// Number of works matching the query, without fetching them.
    fn count_works(&self, query: &WorkQuery) -> Result<u64, SourceError>;

    /// Look up a single work by DOI. Unknown DOIs are `Ok(None)`.
    fn work_by_doi(&self, doi: &str) -> Result<Option<Work>, SourceError>;
}

/// One work as returned by the search API.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Work {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub publication_date: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
    #[serde(default)]
    pub first_page: Option<String>,
    #[serde(default)]
    pub last_page: Option<String>,
    #[serde(default)]
    pub cited_by_count: Option<u64>,
    #[serde(default)]
    pub host_venue: Option<HostVenue>,
    #[serde(default)]
    pub authorships: Vec<Authorship>,
    /// Explicit abstract text; present on some records instead of the index.
    #[serde(default, rename = "abstractNote")]
    pub abstract_note: Option<String>,
    #[serde(default)]
    pub abstract_inverted_index: Option<BTreeMap<String, Vec<usize>>>,
    #[serde(default)]
    pub fulltext: Option<String>,
}

/// Venue block of a work.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct HostVenue {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, rename = "type")]
    pub venue_type: Option<String>,
    #[serde(default)]
    pub issue: Option<String>,
}

/// Authorship block of a work.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Authorship {
    #[serde(default)]
    pub author: Option<WorkAuthor>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct WorkAuthor {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_display_lists_search_and_filters() {
        let query = WorkQuery::searching("title_and_abstract", "generative AI")
            .with_filter("publication_year", "2023-2025");
        assert_eq!(
            query.to_string(),
            "title_and_abstract: generative AI, publication_year=2023-2025"
        );
    }

    #[test]
    fn work_deserializes_with_missing_fields() {
        let work: Work = serde_json::from_str(r#"{"title": "Only a Title"}"#).unwrap();
        assert_eq!(work.title.as_deref(), Some("Only a Title"));
        assert!(work.id.is_none());
        assert!(work.authorships.is_empty());
    }
}
