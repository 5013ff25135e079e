// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The popup side of the message contract.
//!
//! Every request goes through [`send_with_injection`]: when the tab has no document context yet,
//! one is injected and the request retried once after a short delay.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::browser::{BrowserError, TabHost};
use crate::model::TabId;
use crate::protocol::{BackgroundRequest, PageRequest, PageResponse, WireSearchResult};
use crate::upstream::{
    resolve_occurrences, search_if_healthy, ResolvedOccurrences, SearchApi, SearchOptions,
    SearchQuery,
};

pub const CONNECT_ERROR_MESSAGE: &str = "Error: Could not connect to page";

/// Sends `request`; on [`BrowserError::PeerUnavailable`] injects a context, waits `retry_delay`
/// and tries exactly once more.
pub async fn send_with_injection<H>(
    host: &H,
    tab: TabId,
    request: PageRequest,
    retry_delay: Duration,
) -> Result<PageResponse, BrowserError>
where
    H: TabHost + ?Sized,
{
    match host.send(tab, request.clone()).await {
        Err(BrowserError::PeerUnavailable { .. }) => {}
        other => return other,
    }

    debug!(%tab, action = request.action(), "no document context, injecting");
    if let Err(err) = host.inject(tab).await {
        warn!(%tab, %err, "injection failed");
        return Err(BrowserError::PeerUnavailable { tab });
    }
    tokio::time::sleep(retry_delay).await;
    host.send(tab, request).await.map_err(|err| {
        if !matches!(err, BrowserError::PeerUnavailable { .. }) {
            warn!(%tab, %err, "retry failed");
        }
        BrowserError::PeerUnavailable { tab }
    })
}

/// What the popup shows in place of results when a request fails.
pub fn inline_error(err: &BrowserError) -> String {
    match err {
        BrowserError::PeerUnavailable { .. } => CONNECT_ERROR_MESSAGE.to_owned(),
        other => format!("Error: {other}"),
    }
}

/// A popup bound to one tab.
#[derive(Debug)]
pub struct Popup<H: ?Sized> {
    host: Arc<H>,
    tab: TabId,
    retry_delay: Duration,
}

impl<H: TabHost + ?Sized> Popup<H> {
    pub fn new(host: Arc<H>, tab: TabId, retry_delay: Duration) -> Self {
        Self { host, tab, retry_delay }
    }

    pub fn tab(&self) -> TabId {
        self.tab
    }

    async fn send(&self, request: PageRequest) -> Result<PageResponse, BrowserError> {
        send_with_injection(self.host.as_ref(), self.tab, request, self.retry_delay).await
    }

    fn unexpected(&self, action: &'static str) -> BrowserError {
        BrowserError::UnexpectedResponse { tab: self.tab, action }
    }

    pub async fn links(&self) -> Result<Vec<String>, BrowserError> {
        match self.send(PageRequest::Scrape).await? {
            PageResponse::Links(links) => Ok(links.links),
            _ => Err(self.unexpected("scrape")),
        }
    }

    pub async fn search(&self, term: &str) -> Result<WireSearchResult, BrowserError> {
        match self.send(PageRequest::SearchWords { searchword: term.to_owned() }).await? {
            PageResponse::Results(results) => Ok(results.results),
            _ => Err(self.unexpected("searchWords")),
        }
    }

    /// Searches the page, then asks the search service; its answer wins when it has hits.
    pub async fn search_everywhere(
        &self,
        api: &dyn SearchApi,
        term: &str,
        page_url: &str,
        options: SearchOptions,
    ) -> Result<ResolvedOccurrences, BrowserError> {
        let in_page = self.search(term).await?;
        let query =
            SearchQuery { url: page_url.to_owned(), searchword: term.to_owned(), options };
        let upstream = search_if_healthy(api, &query).await;
        Ok(resolve_occurrences(upstream, &in_page, page_url))
    }

    pub async fn highlight(&self, index: usize, term: &str) -> Result<bool, BrowserError> {
        let request = PageRequest::HighlightWord { index, searchword: term.to_owned() };
        match self.send(request).await? {
            PageResponse::Success(reply) => Ok(reply.success),
            _ => Err(self.unexpected("highlightWord")),
        }
    }

    pub async fn set_shortcut(&self, enabled: bool) -> Result<bool, BrowserError> {
        match self.send(PageRequest::ToggleShortcut { enabled }).await? {
            PageResponse::Success(reply) => Ok(reply.success),
            _ => Err(self.unexpected("toggleShortcut")),
        }
    }

    pub async fn show_overlay(&self, visible: bool) -> Result<bool, BrowserError> {
        let request = if visible {
            PageRequest::CreateSearchOverlay
        } else {
            PageRequest::HideSearchOverlay
        };
        match self.send(request).await? {
            PageResponse::Success(reply) => Ok(reply.success),
            _ => Err(self.unexpected("overlay")),
        }
    }

    /// The request the popup posts to the background when a result from another page is picked.
    pub fn follow(&self, url: &str, term: &str) -> BackgroundRequest {
        BackgroundRequest::OpenLinkedPage { url: url.to_owned(), searchword: term.to_owned() }
    }
}

#[cfg(test)]
mod tests;
