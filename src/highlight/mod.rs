// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Reversible highlight decorations.
//!
//! Applying a highlight replaces one text node with `[before] <marker>match</marker> [after]`
//! and returns a [`Decoration`] that remembers the original node. Reverting puts the original
//! node back, so a clear is an exact inverse of the highlight that preceded it.

pub mod style;

use tracing::{debug, warn};

use crate::model::{
    Document, DomError, NodeId, OffsetBasis, Occurrence, ScrollOptions, SearchResult,
};

pub use style::{
    FlashPlan, FlashStage, FlashStep, FlashTiming, MarkerKind, MarkerPalette, FALLBACK_MARKER_ID,
    FOUND_COUNT_ATTR, MARKER_ID, REQUESTED_INDEX_ATTR,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HighlightError {
    #[error("no occurrence at position {position} ({total} found)")]
    NotFound { position: usize, total: usize },
    #[error("node {node} is no longer part of the document")]
    StaleReference { node: NodeId },
    #[error("highlight could not be applied: {0}")]
    DomMutation(#[from] DomError),
}

/// One applied highlight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    marker: NodeId,
    pieces: Vec<NodeId>,
    original: NodeId,
    kind: MarkerKind,
}

impl Decoration {
    pub fn marker(&self) -> NodeId {
        self.marker
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlighted {
    pub marker: NodeId,
    pub kind: MarkerKind,
    pub flash: FlashPlan,
}

#[derive(Debug, Default)]
pub struct HighlightManager {
    active: Vec<Decoration>,
    palette: MarkerPalette,
    timing: FlashTiming,
}

impl HighlightManager {
    pub fn new(palette: MarkerPalette, timing: FlashTiming) -> Self {
        Self { active: Vec::new(), palette, timing }
    }

    pub fn active(&self) -> &[Decoration] {
        &self.active
    }

    /// Reverts every active decoration.
    pub fn clear(&mut self, document: &mut Document) {
        for decoration in self.active.drain(..) {
            if let Err(err) = revert(document, &decoration) {
                warn!(marker = %decoration.marker, %err, "failed to revert highlight");
            }
        }
    }

    /// Drops the active set without touching any document (the document it referred to is gone).
    pub fn forget(&mut self) {
        self.active.clear();
    }

    /// Clears all highlights, then marks the occurrence at `position`.
    pub fn highlight(
        &mut self,
        document: &mut Document,
        result: &SearchResult,
        position: usize,
    ) -> Result<Highlighted, HighlightError> {
        self.clear(document);

        let occurrence = result
            .get(position)
            .ok_or(HighlightError::NotFound { position, total: result.total() })?;
        let node = occurrence.node();
        if !document.is_connected(node) {
            return Err(HighlightError::StaleReference { node });
        }
        let text = document.text(node).ok_or(HighlightError::StaleReference { node })?.to_owned();
        let (start, end) = resolve_range(&text, occurrence).ok_or(DomError::InvalidRange {
            node,
            start: occurrence.start_offset(),
            end: occurrence.end_offset(),
            len: text.len(),
        })?;
        if text[start..end] != *occurrence.matched_text() {
            return Err(HighlightError::StaleReference { node });
        }

        let mut pieces = Vec::with_capacity(3);
        if start > 0 {
            pieces.push(document.create_text(&text[..start]));
        }
        let marker = self.create_marker(document, MarkerKind::Precise);
        let matched = document.create_text(&text[start..end]);
        document.append_child(marker, matched)?;
        pieces.push(marker);
        if end < text.len() {
            pieces.push(document.create_text(&text[end..]));
        }
        document.replace_with(node, &pieces)?;

        debug!(position, %node, start, end, "highlighted occurrence");
        Ok(self.activate(
            document,
            Decoration { marker, pieces, original: node, kind: MarkerKind::Precise },
        ))
    }

    /// Clears all highlights, then wraps the entire text node `node` in a marker.
    pub fn mark_whole_node(
        &mut self,
        document: &mut Document,
        node: NodeId,
        kind: MarkerKind,
    ) -> Result<Highlighted, HighlightError> {
        self.clear(document);

        if !document.is_connected(node) || !document.is_text(node) {
            return Err(HighlightError::StaleReference { node });
        }
        let marker = self.create_marker(document, kind);
        document.replace_with(node, &[marker])?;
        if let Err(err) = document.append_child(marker, node) {
            if let Err(rollback) = document.replace_with(marker, &[node]) {
                warn!(%node, %rollback, "failed to roll back whole-node highlight");
            }
            return Err(err.into());
        }

        debug!(%node, ?kind, "highlighted whole node");
        Ok(self.activate(document, Decoration { marker, pieces: vec![marker], original: node, kind }))
    }

    /// Applies one flash stage. Returns `false` when `marker` is not an active highlight.
    pub fn apply_flash(&self, document: &mut Document, marker: NodeId, stage: FlashStage) -> bool {
        let Some(decoration) = self.active.iter().find(|decoration| decoration.marker == marker)
        else {
            return false;
        };
        let Some(element) = document.element_mut(marker) else {
            return false;
        };
        let style = element.style_mut();
        match stage {
            FlashStage::Emphasis => {
                style.set("background-color", self.palette.flash_background.as_str());
                style.set("box-shadow", self.palette.flash_shadow.as_str());
            }
            FlashStage::Steady => {
                style.set("background-color", self.palette.steady_background(decoration.kind));
                style.set("box-shadow", self.palette.shadow.as_str());
            }
        }
        true
    }

    fn activate(&mut self, document: &mut Document, decoration: Decoration) -> Highlighted {
        let marker = decoration.marker;
        let kind = decoration.kind;
        self.active.push(decoration);
        if let Err(err) = document.scroll_into_view(marker, ScrollOptions::SMOOTH_CENTER) {
            warn!(%marker, %err, "failed to scroll highlight into view");
        }
        Highlighted { marker, kind, flash: FlashPlan::new(marker, self.timing) }
    }

    fn create_marker(&self, document: &mut Document, kind: MarkerKind) -> NodeId {
        let marker = document.create_element("span");
        if let Some(element) = document.element_mut(marker) {
            let id = match kind {
                MarkerKind::Precise => MARKER_ID,
                MarkerKind::Degraded | MarkerKind::Substitute { .. } => FALLBACK_MARKER_ID,
            };
            element.set_attr("id", id);
            if let MarkerKind::Substitute { requested, found } = kind {
                element.set_attr(REQUESTED_INDEX_ATTR, requested.to_string());
                element.set_attr(FOUND_COUNT_ATTR, found.to_string());
            }
            let style = element.style_mut();
            style.set("background-color", self.palette.steady_background(kind));
            style.set("color", self.palette.color.as_str());
            style.set("padding", "2px");
            style.set("border-radius", "3px");
            style.set("box-shadow", self.palette.shadow.as_str());
            style.set("position", "relative");
            style.set("z-index", "1000");
        }
        marker
    }
}

/// Maps an occurrence onto byte offsets of the node's current full text.
fn resolve_range(text: &str, occurrence: &Occurrence) -> Option<(usize, usize)> {
    let shift = match occurrence.basis() {
        OffsetBasis::Trimmed => text.len() - text.trim_start().len(),
        OffsetBasis::Full => 0,
    };
    let start = shift + occurrence.start_offset();
    let end = shift + occurrence.end_offset();
    let valid = start < end
        && end <= text.len()
        && text.is_char_boundary(start)
        && text.is_char_boundary(end);
    valid.then_some((start, end))
}

fn revert(document: &mut Document, decoration: &Decoration) -> Result<(), DomError> {
    let Some((first, rest)) = decoration.pieces.split_first() else {
        return Ok(());
    };
    let parent = document.parent(*first);
    let intact = parent.is_some()
        && rest.iter().all(|piece| document.parent(*piece) == parent)
        && document.parent(decoration.original).map_or(true, |holder| holder == decoration.marker);

    if intact {
        document.remove(decoration.original)?;
        document.replace_with(*first, &[decoration.original])?;
        for piece in rest {
            document.remove(*piece)?;
        }
        return Ok(());
    }

    // The page rearranged the pieces; put the marker's text back where the marker is.
    if document.parent(decoration.marker).is_some() {
        let text = document.text_content(decoration.marker);
        let restored = document.create_text(text);
        document.replace_with(decoration.marker, &[restored])?;
    }
    Ok(())
}
