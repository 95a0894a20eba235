//! Works API client

use std::env;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::warn;
use url::Url;

use bibsync_core::{MetadataSource, SourceError, Work, WorkQuery};

const DEFAULT_BASE_URL: &str = "https://api.openalex.org";
/// Maximum page size the API allows.
const PER_PAGE: usize = 200;
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);
const MAX_BACKOFF: Duration = Duration::from_secs(8);
/// Rate-limit retries per page before giving up.
const MAX_RETRIES: u32 = 5;

/// Client configuration. `mailto` joins the API's polite pool.
#[derive(Clone, Debug)]
pub struct OpenAlexConfig {
    pub base_url: String,
    pub mailto: Option<String>,
}

impl Default for OpenAlexConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            mailto: None,
        }
    }
}

impl OpenAlexConfig {
    /// Read configuration from `OPENALEX_MAILTO`.
    pub fn from_env() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            mailto: env::var("OPENALEX_MAILTO").ok().filter(|v| !v.is_empty()),
        }
    }
}

pub struct OpenAlexClient {
    http: Client,
    config: OpenAlexConfig,
}

impl OpenAlexClient {
    pub fn new(config: OpenAlexConfig) -> Result<Self, SourceError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|error| SourceError::Http(error.to_string()))?;
        Ok(Self { http, config })
    }

    fn works_url(&self, query: &WorkQuery, extra: &[(&str, String)]) -> Result<Url, SourceError> {
        let mut params: Vec<(String, String)> = Vec::new();
        let filter = filter_expression(query);
        if !filter.is_empty() {
            params.push(("filter".to_string(), filter));
        }
        for (key, value) in extra {
            params.push((key.to_string(), value.clone()));
        }
        if let Some(mailto) = &self.config.mailto {
            params.push(("mailto".to_string(), mailto.clone()));
        }

        Url::parse_with_params(&format!("{}/works", self.config.base_url), &params)
            .map_err(|error| SourceError::InvalidQuery(error.to_string()))
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, SourceError> {
        let response = self
            .http
            .get(url)
            .send()
            .map_err(|error| SourceError::Http(error.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimited);
        }
        if !status.is_success() {
            return Err(SourceError::Http(format!("unexpected status {status}")));
        }
        response
            .json()
            .map_err(|error| SourceError::Parse(error.to_string()))
    }
}

/// The API's combined filter expression: searched fields with a `.search`
/// suffix, exact filters as-is.
fn filter_expression(query: &WorkQuery) -> String {
    query
        .search
        .iter()
        .map(|(field, terms)| format!("{field}.search:{terms}"))
        .chain(
            query
                .filters
                .iter()
                .map(|(key, value)| format!("{key}:{value}")),
        )
        .collect::<Vec<_>>()
        .join(",")
}

/// Backoff delay following `current`, doubled and capped.
fn next_backoff(current: Duration) -> Duration {
    (current * 2).min(MAX_BACKOFF)
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    meta: Option<Meta>,
    #[serde(default)]
    results: Vec<Work>,
}

#[derive(Debug, Default, Deserialize)]
struct Meta {
    #[serde(default)]
    count: u64,
}

impl MetadataSource for OpenAlexClient {
    fn search_works(
        &self,
        query: &WorkQuery,
        limit: Option<usize>,
    ) -> Result<Vec<Work>, SourceError> {
        let mut collected = Vec::new();
        let mut page: u32 = 1;
        let mut backoff = INITIAL_BACKOFF;
        let mut retries = 0;

        loop {
            let url = self.works_url(
                query,
                &[
                    ("page", page.to_string()),
                    ("per-page", PER_PAGE.to_string()),
                ],
            )?;

            let response: ListResponse = match self.get_json(url) {
                Ok(response) => {
                    backoff = INITIAL_BACKOFF;
                    retries = 0;
                    response
                }
                Err(SourceError::RateLimited) => {
                    if retries >= MAX_RETRIES {
                        return Err(SourceError::RateLimited);
                    }
                    warn!(page, delay_ms = backoff.as_millis() as u64, "rate limited, backing off");
                    thread::sleep(backoff);
                    backoff = next_backoff(backoff);
                    retries += 1;
                    continue;
                }
                Err(error) => return Err(error),
            };

            let page_size = response.results.len();
            collected.extend(response.results);

            if let Some(limit) = limit {
                if collected.len() >= limit {
                    collected.truncate(limit);
                    break;
                }
            }
            if page_size < PER_PAGE {
                break;
            }
            page += 1;
        }

        Ok(collected)
    }

    fn count_works(&self, query: &WorkQuery) -> Result<u64, SourceError> {
        let url = self.works_url(query, &[("per-page", "1".to_string())])?;
        let response: ListResponse = self.get_json(url)?;
        Ok(response.meta.map(|meta| meta.count).unwrap_or(0))
    }

    fn work_by_doi(&self, doi: &str) -> Result<Option<Work>, SourceError> {
        let mut url = Url::parse(&format!(
            "{}/works/https://doi.org/{doi}",
            self.config.base_url
        ))
        .map_err(|error| SourceError::InvalidQuery(error.to_string()))?;
        if let Some(mailto) = &self.config.mailto {
            url.query_pairs_mut().append_pair("mailto", mailto);
        }

        let response = self
            .http
            .get(url)
            .send()
            .map_err(|error| SourceError::Http(error.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimited);
        }
        if !status.is_success() {
            return Err(SourceError::Http(format!("unexpected status {status}")));
        }
        response
            .json()
            .map(Some)
            .map_err(|error| SourceError::Parse(error.to_string()))
    }
}
