// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Client for the external search service, and the fallback onto in-page results.
//!
//! The service is optional. Every failure degrades to the occurrences the page itself found.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::protocol::WireSearchResult;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpstreamError {
    #[error("search service unavailable: {reason}")]
    Unavailable { reason: String },
    #[error("search service answered with status {status}")]
    Status { status: u16 },
    #[error("invalid search service URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl UpstreamError {
    fn unavailable(err: impl ToString) -> Self {
        Self::Unavailable { reason: err.to_string() }
    }
}

/// Crawl parameters forwarded to the search service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchOptions {
    pub crawl: bool,
    pub max_depth: u32,
    pub max_links: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { crawl: false, max_depth: 1, max_links: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchQuery {
    pub url: String,
    pub searchword: String,
    #[serde(flatten)]
    pub options: SearchOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ApiOccurrence {
    #[serde(default)]
    pub word_before: String,
    #[serde(default)]
    pub word_after: String,
    pub content: String,
    pub position: usize,
    #[serde(default)]
    pub source_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchReply {
    #[serde(default)]
    occurrences: Vec<ApiOccurrence>,
}

pub const SEARCH_PATH: &str = "api/search";
pub const HEALTH_PATH: &str = "health";

#[async_trait]
pub trait SearchApi: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ApiOccurrence>, UpstreamError>;

    async fn check_health(&self) -> Result<(), UpstreamError> {
        Ok(())
    }
}

/// Searches only after the service reports healthy; an unhealthy service is never queried.
pub async fn search_if_healthy(
    api: &dyn SearchApi,
    query: &SearchQuery,
) -> Result<Vec<ApiOccurrence>, UpstreamError> {
    if let Err(err) = api.check_health().await {
        warn!(%err, "search service failed its health check");
        return Err(err);
    }
    api.search(query).await
}

#[derive(Debug, Clone)]
pub struct HttpSearchApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSearchApi {
    pub fn new(base_url: &str) -> Result<Self, UpstreamError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, UpstreamError> {
        let mut parsed = Url::parse(base_url).map_err(|err| UpstreamError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: err.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(UpstreamError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: "not a base URL".to_owned(),
            });
        }
        if !parsed.path().ends_with('/') {
            let path = format!("{}/", parsed.path());
            parsed.set_path(&path);
        }
        Ok(Self { client, base_url: parsed })
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, UpstreamError> {
        self.base_url.join(path).map_err(|err| UpstreamError::InvalidBaseUrl {
            url: self.base_url.to_string(),
            reason: err.to_string(),
        })
    }
}

#[async_trait]
impl SearchApi for HttpSearchApi {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ApiOccurrence>, UpstreamError> {
        let response = self
            .client
            .post(self.endpoint(SEARCH_PATH)?)
            .json(query)
            .send()
            .await
            .map_err(UpstreamError::unavailable)?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status { status: status.as_u16() });
        }
        let reply: SearchReply = response.json().await.map_err(UpstreamError::unavailable)?;
        debug!(term = %query.searchword, found = reply.occurrences.len(), "search service answered");
        Ok(reply.occurrences)
    }

    async fn check_health(&self) -> Result<(), UpstreamError> {
        let response = self
            .client
            .get(self.endpoint(HEALTH_PATH)?)
            .send()
            .await
            .map_err(UpstreamError::unavailable)?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status { status: status.as_u16() });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccurrenceSource {
    Upstream,
    InPage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOccurrences {
    pub source: OccurrenceSource,
    pub occurrences: Vec<ApiOccurrence>,
}

/// Picks the search service's answer when it has hits, else remaps the in-page result.
pub fn resolve_occurrences(
    upstream: Result<Vec<ApiOccurrence>, UpstreamError>,
    in_page: &WireSearchResult,
    page_url: &str,
) -> ResolvedOccurrences {
    match upstream {
        Ok(occurrences) if !occurrences.is_empty() => {
            return ResolvedOccurrences { source: OccurrenceSource::Upstream, occurrences };
        }
        Ok(_) => debug!(term = %in_page.searchword, "search service found nothing"),
        Err(err) => warn!(%err, term = %in_page.searchword, "falling back to in-page results"),
    }

    let occurrences = in_page
        .occurrences
        .iter()
        .map(|occurrence| ApiOccurrence {
            word_before: String::new(),
            word_after: String::new(),
            content: occurrence.text.clone(),
            position: occurrence.position,
            source_url: page_url.to_owned(),
        })
        .collect();
    ResolvedOccurrences { source: OccurrenceSource::InPage, occurrences }
}
