// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Opens a linked page in a new tab and repeats the search there.
//!
//! Each request walks `Opening → AwaitingLoad → Injecting → Searching → Highlighting → Done`.
//! Search or highlight failures skip ahead to `Done`; a tab that cannot be opened, loaded or
//! injected ends the run early and leaves the tab as it is.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::browser::{BrowserError, TabHost, TabInfo};
use crate::model::TabId;
use crate::protocol::{BackgroundRequest, PageRequest, PageResponse, SuccessResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Opening,
    AwaitingLoad,
    Injecting,
    Searching,
    Highlighting,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Opening => "opening",
            Self::AwaitingLoad => "awaiting-load",
            Self::Injecting => "injecting",
            Self::Searching => "searching",
            Self::Highlighting => "highlighting",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestrationReport {
    pub tab: TabInfo,
    pub stages: Vec<Stage>,
    pub occurrences: usize,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrchestrationError {
    #[error(transparent)]
    Browser(#[from] BrowserError),
    #[error("tab {tab} closed before it finished loading")]
    LoadAborted { tab: TabId },
}

#[derive(Debug)]
pub struct Orchestrator<H: ?Sized> {
    host: Arc<H>,
    settle_delay: Duration,
}

impl<H: ?Sized> Clone for Orchestrator<H> {
    fn clone(&self) -> Self {
        Self { host: Arc::clone(&self.host), settle_delay: self.settle_delay }
    }
}

impl<H: TabHost + ?Sized + 'static> Orchestrator<H> {
    pub fn new(host: Arc<H>, settle_delay: Duration) -> Self {
        Self { host, settle_delay }
    }

    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    /// Answers immediately; the linked page is handled in the background.
    pub fn handle(&self, request: BackgroundRequest) -> SuccessResponse {
        match request {
            BackgroundRequest::OpenLinkedPage { url, searchword } => {
                info!(%url, term = %searchword, "opening linked page");
                drop(self.spawn_open_linked_page(url, searchword));
            }
        }
        SuccessResponse { success: true }
    }

    pub fn spawn_open_linked_page(
        &self,
        url: String,
        term: String,
    ) -> JoinHandle<Result<OrchestrationReport, OrchestrationError>> {
        let orchestrator = self.clone();
        tokio::spawn(async move {
            let outcome = orchestrator.open_linked_page(&url, &term).await;
            if let Err(err) = &outcome {
                warn!(%url, %err, "linked page orchestration aborted");
            }
            outcome
        })
    }

    pub async fn open_linked_page(
        &self,
        url: &str,
        term: &str,
    ) -> Result<OrchestrationReport, OrchestrationError> {
        let mut stages = Vec::with_capacity(6);
        let mut enter = |stage: Stage| {
            info!(%stage, url, "orchestration stage");
            stages.push(stage);
        };

        enter(Stage::Opening);
        let tab = self.host.create_tab(url, false).await?;

        enter(Stage::AwaitingLoad);
        let loaded = self.host.on_load_complete(tab.tab_id).await?;
        loaded.await.map_err(|_| OrchestrationError::LoadAborted { tab: tab.tab_id })?;

        enter(Stage::Injecting);
        self.host.inject(tab.tab_id).await?;
        tokio::time::sleep(self.settle_delay).await;

        enter(Stage::Searching);
        let occurrences = self.search(tab.tab_id, term).await;

        let mut highlighted = false;
        if occurrences > 0 {
            enter(Stage::Highlighting);
            highlighted = self.highlight_first(tab.tab_id, term).await;
        }

        enter(Stage::Done);
        if let Err(err) = self.host.activate_tab(tab.tab_id).await {
            warn!(tab = %tab.tab_id, %err, "could not activate tab");
        }
        if let Err(err) = self.host.focus_window(tab.window_id).await {
            warn!(window = %tab.window_id, %err, "could not focus window");
        }

        Ok(OrchestrationReport { tab, stages, occurrences, highlighted })
    }

    async fn search(&self, tab: TabId, term: &str) -> usize {
        let request = PageRequest::SearchWords { searchword: term.to_owned() };
        match self.host.send(tab, request).await {
            Ok(PageResponse::Results(results)) => {
                info!(%tab, term, total = results.results.total_occurrences, "linked page searched");
                results.results.occurrences.len()
            }
            Ok(other) => {
                warn!(%tab, ?other, "unexpected search response");
                0
            }
            Err(err) => {
                warn!(%tab, %err, "linked page search failed");
                0
            }
        }
    }

    async fn highlight_first(&self, tab: TabId, term: &str) -> bool {
        let request = PageRequest::HighlightWord { index: 0, searchword: term.to_owned() };
        match self.host.send(tab, request).await {
            Ok(PageResponse::Success(reply)) => reply.success,
            Ok(other) => {
                warn!(%tab, ?other, "unexpected highlight response");
                false
            }
            Err(err) => {
                warn!(%tab, %err, "linked page highlight failed");
                false
            }
        }
    }
}
