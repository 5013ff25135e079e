// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Per-document search state.
//!
//! A [`SearchSession`] keeps the latest [`SearchResult`] and the active highlights for one
//! document context. It is reset wholesale when the context navigates.

use tracing::{debug, info, warn};

use crate::highlight::{FlashPlan, FlashStage, HighlightError, HighlightManager, Highlighted};
use crate::locate::{highlight_at, locate, FallbackHighlight};
use crate::model::{Document, NodeId, SearchResult};

/// How a highlight request was satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightOutcome {
    /// The exact occurrence was marked, possibly after one refresh of the search.
    Precise { position: usize, highlighted: Highlighted, refreshed: bool },
    /// Cached and refreshed results both failed; the fallback locator marked a whole node.
    Degraded(FallbackHighlight),
    /// Nothing on the page contains the term.
    Missed,
}

impl HighlightOutcome {
    pub fn is_highlighted(&self) -> bool {
        !matches!(self, Self::Missed)
    }

    pub fn flash(&self) -> Option<FlashPlan> {
        match self {
            Self::Precise { highlighted, .. } => Some(highlighted.flash),
            Self::Degraded(fallback) => Some(fallback.highlighted().flash),
            Self::Missed => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct SearchSession {
    result: Option<SearchResult>,
    highlights: HighlightManager,
}

impl SearchSession {
    pub fn new(highlights: HighlightManager) -> Self {
        Self { result: None, highlights }
    }

    pub fn result(&self) -> Option<&SearchResult> {
        self.result.as_ref()
    }

    pub fn highlights(&self) -> &HighlightManager {
        &self.highlights
    }

    /// Runs a fresh search and replaces the stored result.
    ///
    /// Active highlights are reverted first so a marker never splits the text being searched.
    pub fn search(&mut self, document: &mut Document, term: &str) -> &SearchResult {
        self.highlights.clear(document);
        let result = locate(document, term);
        info!(term, total = result.total(), "search finished");
        self.result.insert(result)
    }

    /// Highlights occurrence `position` of `term`.
    ///
    /// A missing, mismatched or unusable cached result triggers one re-search; if that still
    /// fails the fallback locator marks a whole node.
    pub fn highlight_by_position(
        &mut self,
        document: &mut Document,
        position: usize,
        term: &str,
    ) -> HighlightOutcome {
        if let Some(result) = self.result.as_ref().filter(|result| result.term() == term) {
            match self.highlights.highlight(document, result, position) {
                Ok(highlighted) => {
                    return HighlightOutcome::Precise { position, highlighted, refreshed: false };
                }
                Err(err) => log_highlight_failure(&err, "cached result"),
            }
        }

        // The stale result may point at nodes the failed attempt just restored; clear first so
        // the refresh sees the page as it really is.
        self.highlights.clear(document);
        let refreshed = locate(document, term);
        debug!(term, total = refreshed.total(), "refreshed search for highlight");
        let result = self.result.insert(refreshed);
        match self.highlights.highlight(document, result, position) {
            Ok(highlighted) => {
                return HighlightOutcome::Precise { position, highlighted, refreshed: true };
            }
            Err(err) => log_highlight_failure(&err, "refreshed result"),
        }

        match highlight_at(document, &mut self.highlights, term, position) {
            Some(fallback) => HighlightOutcome::Degraded(fallback),
            None => HighlightOutcome::Missed,
        }
    }

    pub fn apply_flash(&self, document: &mut Document, marker: NodeId, stage: FlashStage) -> bool {
        self.highlights.apply_flash(document, marker, stage)
    }

    pub fn clear_highlights(&mut self, document: &mut Document) {
        self.highlights.clear(document);
    }

    /// Forgets everything; used when the document context navigates away.
    pub fn reset(&mut self) {
        self.result = None;
        self.highlights.forget();
    }
}

fn log_highlight_failure(err: &HighlightError, source: &str) {
    match err {
        HighlightError::NotFound { .. } | HighlightError::StaleReference { .. } => {
            debug!(%err, source, "highlight attempt failed");
        }
        HighlightError::DomMutation(_) => {
            warn!(%err, source, "highlight attempt failed");
        }
    }
}
