// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, info, warn};
use url::Url;

use super::{BrowserError, PageSource, TabHost, TabInfo};
use crate::format::parse_html;
use crate::highlight::{FlashTiming, HighlightManager, MarkerPalette};
use crate::model::{Document, TabId, WindowId};
use crate::page::{spawn_page, PageContext, PageHandle};
use crate::protocol::{PageRequest, PageResponse};

const INTERNAL_SCHEMES: [&str; 3] = ["chrome", "chrome-extension", "about"];

#[derive(Debug)]
struct TabState {
    window: WindowId,
    url: Url,
    document: Option<Document>,
    listeners: Vec<oneshot::Sender<()>>,
    page: Option<PageHandle>,
}

impl TabState {
    fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    fn finish_loading(&mut self, document: Document) {
        self.document = Some(document);
        for listener in self.listeners.drain(..) {
            let _ = listener.send(());
        }
    }
}

#[derive(Debug)]
struct BrowserState {
    next_tab: u64,
    window: WindowId,
    tabs: HashMap<TabId, TabState>,
    active_tab: Option<TabId>,
    focused_window: Option<WindowId>,
}

/// An in-process browser with a single window.
///
/// Tabs load from a [`PageSource`] in the background. A page that fails to load still completes,
/// with an empty document, the way a browser shows an error page.
#[derive(Clone)]
pub struct SimulatedBrowser {
    state: Arc<Mutex<BrowserState>>,
    source: Arc<dyn PageSource>,
    timing: FlashTiming,
}

impl std::fmt::Debug for SimulatedBrowser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedBrowser").field("timing", &self.timing).finish_non_exhaustive()
    }
}

impl SimulatedBrowser {
    pub fn new(source: impl PageSource + 'static) -> Self {
        let state = BrowserState {
            next_tab: 1,
            window: WindowId::new(1),
            tabs: HashMap::new(),
            active_tab: None,
            focused_window: None,
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            source: Arc::new(source),
            timing: FlashTiming::default(),
        }
    }

    pub fn with_flash_timing(mut self, timing: FlashTiming) -> Self {
        self.timing = timing;
        self
    }

    pub async fn window(&self) -> WindowId {
        self.state.lock().await.window
    }

    pub async fn active_tab(&self) -> Option<TabId> {
        self.state.lock().await.active_tab
    }

    pub async fn focused_window(&self) -> Option<WindowId> {
        self.state.lock().await.focused_window
    }

    pub async fn tab_url(&self, tab: TabId) -> Option<Url> {
        self.state.lock().await.tabs.get(&tab).map(|state| state.url.clone())
    }

    /// The current document of the context running in `tab`.
    pub async fn snapshot(&self, tab: TabId) -> Result<Document, BrowserError> {
        let page = self.page(tab).await?;
        page.snapshot().await.map_err(|_| BrowserError::PeerUnavailable { tab })
    }

    /// Drops the document context of `tab`, as if the page had been reloaded without it.
    pub async fn discard_context(&self, tab: TabId) -> Result<(), BrowserError> {
        let mut state = self.state.lock().await;
        let tab_state = state.tabs.get_mut(&tab).ok_or(BrowserError::TabNotFound { tab })?;
        tab_state.page = None;
        Ok(())
    }

    async fn page(&self, tab: TabId) -> Result<PageHandle, BrowserError> {
        let state = self.state.lock().await;
        let tab_state = state.tabs.get(&tab).ok_or(BrowserError::TabNotFound { tab })?;
        tab_state.page.clone().ok_or(BrowserError::PeerUnavailable { tab })
    }

    fn load(&self, tab: TabId, url: Url) {
        let state = Arc::clone(&self.state);
        let source = Arc::clone(&self.source);
        tokio::spawn(async move {
            let document = match source.fetch(&url).await {
                Ok(html) => parse_html(&html, Some(url.clone())),
                Err(err) => {
                    warn!(%tab, %err, "page failed to load");
                    let mut document = Document::new();
                    document.set_url(Some(url.clone()));
                    document
                }
            };
            let mut state = state.lock().await;
            match state.tabs.get_mut(&tab) {
                Some(tab_state) => {
                    debug!(%tab, %url, "load complete");
                    tab_state.finish_loading(document);
                }
                None => debug!(%tab, "tab vanished while loading"),
            }
        });
    }
}

#[async_trait]
impl TabHost for SimulatedBrowser {
    async fn create_tab(&self, url: &str, active: bool) -> Result<TabInfo, BrowserError> {
        let url = Url::parse(url)
            .map_err(|err| BrowserError::Load { url: url.to_owned(), reason: err.to_string() })?;

        let info = {
            let mut state = self.state.lock().await;
            let tab_id = TabId::new(state.next_tab);
            state.next_tab += 1;
            let window_id = state.window;
            state.tabs.insert(
                tab_id,
                TabState {
                    window: window_id,
                    url: url.clone(),
                    document: None,
                    listeners: Vec::new(),
                    page: None,
                },
            );
            if active {
                state.active_tab = Some(tab_id);
            }
            TabInfo { tab_id, window_id }
        };
        info!(tab = %info.tab_id, %url, active, "tab created");
        self.load(info.tab_id, url);
        Ok(info)
    }

    async fn on_load_complete(&self, tab: TabId) -> Result<oneshot::Receiver<()>, BrowserError> {
        let mut state = self.state.lock().await;
        let tab_state = state.tabs.get_mut(&tab).ok_or(BrowserError::TabNotFound { tab })?;
        let (listener, complete) = oneshot::channel();
        if tab_state.is_loaded() {
            let _ = listener.send(());
        } else {
            tab_state.listeners.push(listener);
        }
        Ok(complete)
    }

    async fn inject(&self, tab: TabId) -> Result<(), BrowserError> {
        let mut state = self.state.lock().await;
        let tab_state = state.tabs.get_mut(&tab).ok_or(BrowserError::TabNotFound { tab })?;
        if INTERNAL_SCHEMES.contains(&tab_state.url.scheme()) {
            return Err(BrowserError::Injection {
                tab,
                reason: format!("cannot script {} pages", tab_state.url.scheme()),
            });
        }
        if tab_state.page.as_ref().is_some_and(|page| !page.is_closed()) {
            return Ok(());
        }
        let document = tab_state.document.clone().ok_or_else(|| BrowserError::Injection {
            tab,
            reason: "document is still loading".to_owned(),
        })?;

        let highlights = HighlightManager::new(MarkerPalette::default(), self.timing);
        let (page, _task) = spawn_page(PageContext::with_highlights(document, highlights));
        tab_state.page = Some(page);
        debug!(%tab, window = %tab_state.window, "document context injected");
        Ok(())
    }

    async fn send(&self, tab: TabId, request: PageRequest) -> Result<PageResponse, BrowserError> {
        let page = self.page(tab).await?;
        page.send(request).await.map_err(|_| BrowserError::PeerUnavailable { tab })
    }

    async fn activate_tab(&self, tab: TabId) -> Result<(), BrowserError> {
        let mut state = self.state.lock().await;
        if !state.tabs.contains_key(&tab) {
            return Err(BrowserError::TabNotFound { tab });
        }
        state.active_tab = Some(tab);
        Ok(())
    }

    async fn focus_window(&self, window: WindowId) -> Result<(), BrowserError> {
        self.state.lock().await.focused_window = Some(window);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
