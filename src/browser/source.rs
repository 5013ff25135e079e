// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Where tab documents come from.

use std::collections::HashMap;

use async_trait::async_trait;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to fetch {url}: {reason}")]
pub struct FetchError {
    pub url: String,
    pub reason: String,
}

impl FetchError {
    fn new(url: &Url, reason: impl ToString) -> Self {
        Self { url: url.to_string(), reason: reason.to_string() }
    }
}

#[async_trait]
pub trait PageSource: Send + Sync {
    /// Returns the HTML served at `url`.
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// Fixed set of pages kept in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticPages {
    pages: HashMap<Url, String>,
}

impl StaticPages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: Url, html: impl Into<String>) -> Self {
        self.insert(url, html);
        self
    }

    pub fn insert(&mut self, url: Url, html: impl Into<String>) {
        self.pages.insert(url, html.into());
    }
}

#[async_trait]
impl PageSource for StaticPages {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        self.pages.get(url).cloned().ok_or_else(|| FetchError::new(url, "no such page"))
    }
}

/// Fetches pages over HTTP(S).
#[derive(Debug, Clone, Default)]
pub struct HttpPageSource {
    client: reqwest::Client,
}

impl HttpPageSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::new(url, format!("unsupported scheme {}", url.scheme())));
        }
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| FetchError::new(url, err))?;
        response.text().await.map_err(|err| FetchError::new(url, err))
    }
}
