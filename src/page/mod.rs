// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! One document context: the page, its search session and its UI affordances.
//!
//! [`PageContext::handle`] is the single entry point for [`PageRequest`]s. Every request runs to
//! completion and produces exactly one [`PageResponse`]; failures degrade to a negative response
//! rather than escaping the handler.

pub mod actor;

use tracing::{debug, info, warn};

use crate::highlight::{FlashPlan, FlashStage, HighlightManager};
use crate::model::{Document, NodeId};
use crate::protocol::{LinksResponse, PageRequest, PageResponse, SearchWordsResponse};
use crate::session::{HighlightOutcome, SearchSession};

pub use actor::{spawn_page, PageHandle};

pub const OVERLAY_ID: &str = "betterFind-overlay";

/// A handled request: the response plus any flash stages the caller should schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handled {
    pub response: PageResponse,
    pub flash: Option<FlashPlan>,
}

impl From<PageResponse> for Handled {
    fn from(response: PageResponse) -> Self {
        Self { response, flash: None }
    }
}

#[derive(Debug)]
pub struct PageContext {
    document: Document,
    session: SearchSession,
    shortcut_enabled: bool,
    overlay: Option<NodeId>,
    generation: u64,
}

impl PageContext {
    pub fn new(document: Document) -> Self {
        Self::with_highlights(document, HighlightManager::default())
    }

    pub fn with_highlights(document: Document, highlights: HighlightManager) -> Self {
        Self {
            document,
            session: SearchSession::new(highlights),
            shortcut_enabled: false,
            overlay: None,
            generation: 0,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn shortcut_enabled(&self) -> bool {
        self.shortcut_enabled
    }

    /// Bumped on every navigation; node ids are only meaningful within one generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn handle(&mut self, request: PageRequest) -> Handled {
        debug!(action = request.action(), "page request");
        match request {
            PageRequest::Scrape => self.scrape().into(),
            PageRequest::SearchWords { searchword } => self.search_words(&searchword).into(),
            PageRequest::HighlightWord { index, searchword } => {
                self.highlight_word(index, &searchword)
            }
            PageRequest::ToggleShortcut { enabled } => self.toggle_shortcut(enabled).into(),
            PageRequest::CreateSearchOverlay => self.create_search_overlay().into(),
            PageRequest::HideSearchOverlay => self.hide_search_overlay().into(),
        }
    }

    /// Runs one delayed flash stage; stale markers are ignored.
    pub fn apply_flash(&mut self, marker: NodeId, stage: FlashStage) -> bool {
        self.session.apply_flash(&mut self.document, marker, stage)
    }

    /// Swaps in a freshly loaded document and resets all per-document state.
    pub fn navigate(&mut self, document: Document) {
        self.document = document;
        self.session.reset();
        self.overlay = None;
        self.generation += 1;
    }

    fn scrape(&self) -> PageResponse {
        PageResponse::Links(LinksResponse { links: self.document.links() })
    }

    fn search_words(&mut self, term: &str) -> PageResponse {
        let result = self.session.search(&mut self.document, term);
        PageResponse::Results(SearchWordsResponse { results: result.into() })
    }

    fn highlight_word(&mut self, index: usize, term: &str) -> Handled {
        let outcome = self.session.highlight_by_position(&mut self.document, index, term);
        match &outcome {
            HighlightOutcome::Precise { refreshed, .. } => {
                debug!(index, term, refreshed, "highlighted occurrence");
            }
            HighlightOutcome::Degraded(fallback) => {
                info!(index, term, ?fallback, "highlight degraded to fallback");
            }
            HighlightOutcome::Missed => info!(index, term, "nothing to highlight"),
        }
        Handled { response: PageResponse::success(outcome.is_highlighted()), flash: outcome.flash() }
    }

    fn toggle_shortcut(&mut self, enabled: bool) -> PageResponse {
        self.shortcut_enabled = enabled;
        PageResponse::success(true)
    }

    fn create_search_overlay(&mut self) -> PageResponse {
        if let Some(overlay) = self.overlay.filter(|id| self.document.is_connected(*id)) {
            if let Some(element) = self.document.element_mut(overlay) {
                element.style_mut().remove("display");
            }
            return PageResponse::success(true);
        }

        let body = self.document.body();
        let overlay = match self.document.append_element(body, "div") {
            Ok(overlay) => overlay,
            Err(err) => {
                warn!(%err, "failed to create search overlay");
                return PageResponse::success(false);
            }
        };
        if let Some(element) = self.document.element_mut(overlay) {
            element.set_attr("id", OVERLAY_ID);
            let style = element.style_mut();
            style.set("position", "fixed");
            style.set("top", "10px");
            style.set("right", "10px");
            style.set("z-index", "2147483647");
        }
        if let Ok(input) = self.document.append_element(overlay, "input") {
            if let Some(element) = self.document.element_mut(input) {
                element.set_attr("type", "search");
                element.set_attr("placeholder", "Find on page");
            }
        }
        self.overlay = Some(overlay);
        PageResponse::success(true)
    }

    fn hide_search_overlay(&mut self) -> PageResponse {
        let Some(overlay) = self.overlay.filter(|id| self.document.is_connected(*id)) else {
            return PageResponse::success(false);
        };
        match self.document.element_mut(overlay) {
            Some(element) => {
                element.style_mut().set("display", "none");
                PageResponse::success(true)
            }
            None => PageResponse::success(false),
        }
    }
}
