// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};

use super::SimulatedBrowser;
use crate::browser::{BrowserError, StaticPages, TabHost};
use crate::protocol::{PageRequest, PageResponse};

const ARTICLE: &str = "https://site.test/article";

#[fixture]
fn browser() -> SimulatedBrowser {
    let pages = StaticPages::new().with_page(
        ARTICLE.parse().expect("url"),
        "<body><p>The cat sat on the mat.</p><a href=\"/more\">more</a></body>",
    );
    SimulatedBrowser::new(pages)
}

fn total(response: PageResponse) -> usize {
    match response {
        PageResponse::Results(results) => results.results.total_occurrences,
        other => panic!("expected results, got {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn load_complete_fires_once_even_for_late_subscribers(browser: SimulatedBrowser) {
    let tab = browser.create_tab(ARTICLE, false).await.expect("tab");
    let early = browser.on_load_complete(tab.tab_id).await.expect("subscribe");
    early.await.expect("load complete");

    let late = browser.on_load_complete(tab.tab_id).await.expect("subscribe");
    late.await.expect("already complete");
}

#[rstest]
#[tokio::test]
async fn requests_need_an_injected_context(browser: SimulatedBrowser) {
    let tab = browser.create_tab(ARTICLE, false).await.expect("tab");
    browser.on_load_complete(tab.tab_id).await.expect("subscribe").await.expect("load");

    let err = browser.send(tab.tab_id, PageRequest::Scrape).await.unwrap_err();
    assert_eq!(err, BrowserError::PeerUnavailable { tab: tab.tab_id });

    browser.inject(tab.tab_id).await.expect("inject");
    browser.inject(tab.tab_id).await.expect("second inject is harmless");
    let response = browser.send(tab.tab_id, PageRequest::Scrape).await.expect("scrape");
    assert_eq!(
        response,
        PageResponse::Links(crate::protocol::LinksResponse {
            links: vec!["https://site.test/more".to_owned()],
        })
    );
    let response = browser
        .send(tab.tab_id, PageRequest::SearchWords { searchword: "at".to_owned() })
        .await
        .expect("search");
    assert_eq!(total(response), 3);
}

#[rstest]
#[tokio::test]
async fn browser_internal_pages_refuse_injection(browser: SimulatedBrowser) {
    let tab = browser.create_tab("chrome://newtab", true).await.expect("tab");
    browser.on_load_complete(tab.tab_id).await.expect("subscribe").await.expect("load");

    let err = browser.inject(tab.tab_id).await.unwrap_err();
    assert!(matches!(err, BrowserError::Injection { .. }));
    assert_eq!(browser.active_tab().await, Some(tab.tab_id));
}

#[rstest]
#[tokio::test]
async fn failed_load_completes_with_an_empty_page(browser: SimulatedBrowser) {
    let tab = browser.create_tab("https://site.test/missing", false).await.expect("tab");
    browser.on_load_complete(tab.tab_id).await.expect("subscribe").await.expect("load");
    browser.inject(tab.tab_id).await.expect("inject");

    let response = browser
        .send(tab.tab_id, PageRequest::SearchWords { searchword: "cat".to_owned() })
        .await
        .expect("search");
    assert_eq!(total(response), 0);
}

#[rstest]
#[tokio::test]
async fn invalid_urls_do_not_open_tabs(browser: SimulatedBrowser) {
    let err = browser.create_tab("not a url", true).await.unwrap_err();
    assert!(matches!(err, BrowserError::Load { .. }));
    assert_eq!(browser.active_tab().await, None);
}

#[rstest]
#[tokio::test]
async fn activation_and_focus_are_tracked(browser: SimulatedBrowser) {
    let tab = browser.create_tab(ARTICLE, false).await.expect("tab");
    assert_eq!(browser.active_tab().await, None);

    browser.activate_tab(tab.tab_id).await.expect("activate");
    browser.focus_window(tab.window_id).await.expect("focus");
    assert_eq!(browser.active_tab().await, Some(tab.tab_id));
    assert_eq!(browser.focused_window().await, Some(browser.window().await));
}

#[rstest]
#[tokio::test]
async fn discarded_context_is_unavailable_until_reinjected(browser: SimulatedBrowser) {
    let tab = browser.create_tab(ARTICLE, false).await.expect("tab");
    browser.on_load_complete(tab.tab_id).await.expect("subscribe").await.expect("load");
    browser.inject(tab.tab_id).await.expect("inject");
    browser.discard_context(tab.tab_id).await.expect("discard");

    let err = browser.snapshot(tab.tab_id).await.unwrap_err();
    assert_eq!(err, BrowserError::PeerUnavailable { tab: tab.tab_id });

    browser.inject(tab.tab_id).await.expect("inject");
    let document = browser.snapshot(tab.tab_id).await.expect("snapshot");
    assert_eq!(document.url().map(|url| url.as_str()), Some(ARTICLE));
}
