// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tabs, windows and the channel between them and their document contexts.
//!
//! [`TabHost`] is the seam the orchestrator and the popup bridge talk through. The in-process
//! [`SimulatedBrowser`] implements it on top of page actors.

pub mod simulated;
pub mod source;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::model::{TabId, WindowId};
use crate::protocol::{PageRequest, PageResponse};

pub use simulated::SimulatedBrowser;
pub use source::{FetchError, HttpPageSource, PageSource, StaticPages};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabInfo {
    pub tab_id: TabId,
    pub window_id: WindowId,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrowserError {
    #[error("no document context is listening in tab {tab}")]
    PeerUnavailable { tab: TabId },
    #[error("tab {tab} does not exist")]
    TabNotFound { tab: TabId },
    #[error("cannot inject into tab {tab}: {reason}")]
    Injection { tab: TabId, reason: String },
    #[error("cannot open {url}: {reason}")]
    Load { url: String, reason: String },
    #[error("tab {tab} answered {action} with an unexpected response")]
    UnexpectedResponse { tab: TabId, action: &'static str },
}

#[async_trait]
pub trait TabHost: Send + Sync {
    async fn create_tab(&self, url: &str, active: bool) -> Result<TabInfo, BrowserError>;

    /// Resolves once `tab` finished loading. Fires at most once; a tab that already finished
    /// resolves immediately.
    async fn on_load_complete(&self, tab: TabId) -> Result<oneshot::Receiver<()>, BrowserError>;

    /// Installs a document context in `tab`. Installing into a tab that already has a live
    /// context is a no-op.
    async fn inject(&self, tab: TabId) -> Result<(), BrowserError>;

    async fn send(&self, tab: TabId, request: PageRequest) -> Result<PageResponse, BrowserError>;

    async fn activate_tab(&self, tab: TabId) -> Result<(), BrowserError>;

    async fn focus_window(&self, window: WindowId) -> Result<(), BrowserError>;
}
