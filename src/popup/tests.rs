// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rstest::{fixture, rstest};
use tokio::sync::oneshot;

use super::{inline_error, send_with_injection, Popup, CONNECT_ERROR_MESSAGE};
use crate::browser::{BrowserError, SimulatedBrowser, StaticPages, TabHost, TabInfo};
use crate::model::{TabId, WindowId};
use crate::protocol::{BackgroundRequest, PageRequest, PageResponse};
use crate::upstream::{
    ApiOccurrence, OccurrenceSource, SearchApi, SearchOptions, SearchQuery, UpstreamError,
};

const ARTICLE: &str = "https://site.test/article";
const RETRY: Duration = Duration::from_millis(100);

#[fixture]
fn browser() -> Arc<SimulatedBrowser> {
    let pages = StaticPages::new().with_page(
        ARTICLE.parse().expect("url"),
        "<body><p>The cat sat on the mat.</p><a href=\"/next\">next</a></body>",
    );
    Arc::new(SimulatedBrowser::new(pages))
}

async fn loaded_tab(browser: &SimulatedBrowser, url: &str) -> TabId {
    let tab = browser.create_tab(url, true).await.expect("tab");
    browser.on_load_complete(tab.tab_id).await.expect("subscribe").await.expect("load");
    tab.tab_id
}

/// Never has a listening context; counts what the bridge tries.
#[derive(Default)]
struct DeafHost {
    sends: AtomicUsize,
    injects: AtomicUsize,
}

#[async_trait]
impl TabHost for DeafHost {
    async fn create_tab(&self, _url: &str, _active: bool) -> Result<TabInfo, BrowserError> {
        Ok(TabInfo { tab_id: TabId::new(1), window_id: WindowId::new(1) })
    }

    async fn on_load_complete(&self, _tab: TabId) -> Result<oneshot::Receiver<()>, BrowserError> {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(());
        Ok(rx)
    }

    async fn inject(&self, _tab: TabId) -> Result<(), BrowserError> {
        self.injects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn send(&self, tab: TabId, _request: PageRequest) -> Result<PageResponse, BrowserError> {
        self.sends.fetch_add(1, Ordering::SeqCst);
        Err(BrowserError::PeerUnavailable { tab })
    }

    async fn activate_tab(&self, _tab: TabId) -> Result<(), BrowserError> {
        Ok(())
    }

    async fn focus_window(&self, _window: WindowId) -> Result<(), BrowserError> {
        Ok(())
    }
}

struct FixedApi(Result<Vec<ApiOccurrence>, UpstreamError>);

#[async_trait]
impl SearchApi for FixedApi {
    async fn search(&self, _query: &SearchQuery) -> Result<Vec<ApiOccurrence>, UpstreamError> {
        self.0.clone()
    }
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn first_contact_injects_then_retries(browser: Arc<SimulatedBrowser>) {
    let tab = loaded_tab(&browser, ARTICLE).await;
    let popup = Popup::new(Arc::clone(&browser), tab, RETRY);

    let links = popup.links().await.expect("links");
    assert_eq!(links, vec!["https://site.test/next".to_owned()]);
}

#[tokio::test(start_paused = true)]
async fn retries_exactly_once() {
    let host = DeafHost::default();
    let started = tokio::time::Instant::now();

    let err = send_with_injection(&host, TabId::new(1), PageRequest::Scrape, RETRY)
        .await
        .unwrap_err();

    assert_eq!(err, BrowserError::PeerUnavailable { tab: TabId::new(1) });
    assert_eq!(host.sends.load(Ordering::SeqCst), 2);
    assert_eq!(host.injects.load(Ordering::SeqCst), 1);
    assert!(started.elapsed() >= RETRY);
    assert_eq!(inline_error(&err), CONNECT_ERROR_MESSAGE);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn unscriptable_tab_reports_connection_error(browser: Arc<SimulatedBrowser>) {
    let tab = loaded_tab(&browser, "chrome://settings").await;
    let popup = Popup::new(Arc::clone(&browser), tab, RETRY);

    let err = popup.links().await.unwrap_err();
    assert_eq!(inline_error(&err), CONNECT_ERROR_MESSAGE);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn search_then_highlight(browser: Arc<SimulatedBrowser>) {
    let tab = loaded_tab(&browser, ARTICLE).await;
    let popup = Popup::new(Arc::clone(&browser), tab, RETRY);

    let results = popup.search("at").await.expect("search");
    assert_eq!(results.total_occurrences, 3);
    assert!(popup.highlight(2, "at").await.expect("highlight"));
    assert!(!popup.highlight(0, "xyz123").await.expect("highlight"));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn service_failure_keeps_in_page_results(browser: Arc<SimulatedBrowser>) {
    let tab = loaded_tab(&browser, ARTICLE).await;
    let popup = Popup::new(Arc::clone(&browser), tab, RETRY);
    let api = FixedApi(Err(UpstreamError::Status { status: 503 }));

    let resolved = popup
        .search_everywhere(&api, "cat", ARTICLE, SearchOptions::default())
        .await
        .expect("search");
    assert_eq!(resolved.source, OccurrenceSource::InPage);
    assert_eq!(resolved.occurrences.len(), 1);
    assert_eq!(resolved.occurrences[0].content, "cat");
    assert_eq!(resolved.occurrences[0].source_url, ARTICLE);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn service_hits_replace_in_page_results(browser: Arc<SimulatedBrowser>) {
    let tab = loaded_tab(&browser, ARTICLE).await;
    let popup = Popup::new(Arc::clone(&browser), tab, RETRY);
    let hit = ApiOccurrence {
        word_before: "a".to_owned(),
        word_after: "b".to_owned(),
        content: "cat".to_owned(),
        position: 4,
        source_url: "https://site.test/other".to_owned(),
    };
    let api = FixedApi(Ok(vec![hit.clone()]));

    let resolved = popup
        .search_everywhere(&api, "cat", ARTICLE, SearchOptions::default())
        .await
        .expect("search");
    assert_eq!(resolved.source, OccurrenceSource::Upstream);
    assert_eq!(resolved.occurrences, vec![hit]);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn shortcut_and_overlay_round_trip(browser: Arc<SimulatedBrowser>) {
    let tab = loaded_tab(&browser, ARTICLE).await;
    let popup = Popup::new(Arc::clone(&browser), tab, RETRY);

    assert!(popup.set_shortcut(true).await.expect("toggle"));
    assert!(!popup.show_overlay(false).await.expect("hide without overlay"));
    assert!(popup.show_overlay(true).await.expect("show"));
    assert!(popup.show_overlay(false).await.expect("hide"));
}

#[rstest]
fn follow_builds_background_request(browser: Arc<SimulatedBrowser>) {
    let popup = Popup::new(browser, TabId::new(1), RETRY);
    assert_eq!(
        popup.follow("https://site.test/other", "cat"),
        BackgroundRequest::OpenLinkedPage {
            url: "https://site.test/other".to_owned(),
            searchword: "cat".to_owned(),
        }
    );
}
