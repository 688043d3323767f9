//! Jackett search backend implementation.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use async_trait::async_trait;

use crate::config::JackettConfig;
use crate::metrics::{SEARCHES_TOTAL, SEARCH_ERRORS_TOTAL};

use super::{SearchError, SearchQuery, Searcher, TorrentResult};

/// Jackett search backend implementation.
///
/// Queries the aggregate "all" endpoint, which fans out to every indexer
/// configured inside Jackett and merges the results server-side.
pub struct JackettSearcher {
    client: Client,
    config: JackettConfig,
}

impl JackettSearcher {
    /// Create a new JackettSearcher with the given configuration.
    pub fn new(config: JackettConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Build the Jackett API URL for a search.
    fn build_search_url(&self, query: &SearchQuery) -> String {
        let mut url = format!(
            "{}/api/v2.0/indexers/all/results?apikey={}&Query={}",
            self.config.url.trim_end_matches('/'),
            urlencoding::encode(&self.config.api_key),
            urlencoding::encode(&query.query)
        );

        if let Some(category) = &query.category {
            url.push_str(&format!("&Category={}", urlencoding::encode(category)));
        }

        url
    }
}

#[async_trait]
impl Searcher for JackettSearcher {
    fn name(&self) -> &str {
        "jackett"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<TorrentResult>, SearchError> {
        if query.query.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let url = self.build_search_url(query);
        debug!(query = %query.query, "Searching Jackett");
        SEARCHES_TOTAL.inc();

        let response = self.client.get(&url).send().await.map_err(|e| {
            SEARCH_ERRORS_TOTAL.with_label_values(&["network"]).inc();
            if e.is_timeout() {
                SearchError::Timeout
            } else {
                SearchError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            SEARCH_ERRORS_TOTAL.with_label_values(&["http"]).inc();
            return Err(SearchError::Request {
                status: status.as_u16(),
                message: extract_error_message(status.as_u16(), &body),
            });
        }

        let body = response.text().await.map_err(|e| {
            SEARCH_ERRORS_TOTAL.with_label_values(&["network"]).inc();
            SearchError::ConnectionFailed(e.to_string())
        })?;

        let jackett_response: JackettResponse = serde_json::from_str(&body).map_err(|e| {
            SEARCH_ERRORS_TOTAL.with_label_values(&["parse"]).inc();
            SearchError::Parse(e.to_string())
        })?;

        debug!(
            results = jackett_response.Results.len(),
            "Jackett search complete"
        );

        Ok(jackett_response
            .Results
            .into_iter()
            .map(raw_to_result)
            .collect())
    }
}

/// Pull the server-supplied `error` field out of a failure body.
///
/// Callers surface this string verbatim, so the unwrapping order matters:
/// the JSON `error` field wins, then a truncated body excerpt, then a
/// generic status line.
fn extract_error_message(status: u16, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<String>,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(error) = parsed.error {
            if !error.is_empty() {
                return error;
            }
        }
    }

    let excerpt: String = body.chars().take(200).collect();
    if excerpt.trim().is_empty() {
        format!("Jackett error: {}", status)
    } else {
        excerpt
    }
}

/// Convert one raw Jackett record into a `TorrentResult`.
fn raw_to_result(r: JackettResult) -> TorrentResult {
    // Guid is the stable per-result identifier; some indexers omit it.
    let id = r
        .Guid
        .or_else(|| r.Details.clone())
        .unwrap_or_else(|| r.Title.clone());

    TorrentResult {
        id,
        title: r.Title,
        size_bytes: r.Size.unwrap_or(0).max(0) as u64,
        seeders: r.Seeders.unwrap_or(0).max(0) as u32,
        peers: r.Peers.unwrap_or(0).max(0) as u32,
        publish_date: r.PublishDate.and_then(|d| parse_jackett_date(&d)),
        category: r.CategoryDesc,
        indexer: r.Tracker.unwrap_or_else(|| "unknown".to_string()),
        magnet_uri: r.MagnetUri,
        details_url: r.Details,
    }
}

/// Parse Jackett's date format.
fn parse_jackett_date(date_str: &str) -> Option<DateTime<Utc>> {
    // Jackett returns dates in ISO 8601 format
    DateTime::parse_from_rfc3339(date_str)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            // Try parsing without timezone
            chrono::NaiveDateTime::parse_from_str(date_str, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|ndt| ndt.and_utc())
        })
}

// Jackett API response types
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct JackettResponse {
    Results: Vec<JackettResult>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct JackettResult {
    Title: String,
    Guid: Option<String>,
    Tracker: Option<String>,
    MagnetUri: Option<String>,
    Size: Option<i64>,
    Seeders: Option<i32>,
    Peers: Option<i32>,
    CategoryDesc: Option<String>,
    PublishDate: Option<String>,
    Details: Option<String>,
}
