// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Degraded-precision location.
//!
//! Matches the term literally (case-insensitive) against the full text of every text node under
//! `<body>`, hidden or not. Highlighting here wraps the whole containing node rather than just
//! the matched substring.

use regex::{Regex, RegexBuilder};
use tracing::{debug, info, warn};

use crate::highlight::{HighlightManager, Highlighted, MarkerKind};
use crate::model::{Document, NodeId, OffsetBasis, SearchResult, SearchResultBuilder};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackHighlight {
    /// The node at the requested index was marked.
    Node { index: usize, highlighted: Highlighted },
    /// The requested index was out of range; the first containing node was marked instead.
    Substitute { requested: usize, found: usize, highlighted: Highlighted },
}

impl FallbackHighlight {
    pub fn highlighted(&self) -> &Highlighted {
        match self {
            Self::Node { highlighted, .. } | Self::Substitute { highlighted, .. } => highlighted,
        }
    }
}

fn literal_pattern(term: &str) -> Option<Regex> {
    if term.is_empty() {
        return None;
    }
    RegexBuilder::new(&regex::escape(term)).case_insensitive(true).build().ok()
}

/// Text nodes under `<body>` whose full text contains `term`, in document order.
pub fn find_nodes_containing(document: &Document, term: &str) -> Vec<NodeId> {
    let Some(pattern) = literal_pattern(term) else {
        return Vec::new();
    };
    document
        .text_nodes(document.body())
        .into_iter()
        .filter(|node| document.text(*node).is_some_and(|text| pattern.is_match(text)))
        .collect()
}

/// One occurrence per literal match in every containing node, with full-text offsets.
pub fn locate_fallback(document: &Document, term: &str) -> SearchResult {
    let mut builder = SearchResultBuilder::new(term);
    let Some(pattern) = literal_pattern(term) else {
        return builder.finish();
    };
    for node in document.text_nodes(document.body()) {
        let Some(text) = document.text(node) else {
            continue;
        };
        for found in pattern.find_iter(text) {
            builder.push(node, found.start(), found.end(), found.as_str(), OffsetBasis::Full);
        }
    }
    let result = builder.finish();
    debug!(term, total = result.total(), "fallback locate finished");
    result
}

/// Marks the `index`-th node containing `term`.
///
/// An out-of-range index marks node 0 with the substitute style and records the requested index
/// and the count found on the marker. Returns `None` when no node contains the term at all.
pub fn highlight_at(
    document: &mut Document,
    highlights: &mut HighlightManager,
    term: &str,
    index: usize,
) -> Option<FallbackHighlight> {
    highlights.clear(document);
    let nodes = find_nodes_containing(document, term);
    let Some(first) = nodes.first().copied() else {
        info!(term, index, "fallback found no node containing the term");
        return None;
    };

    if let Some(node) = nodes.get(index).copied() {
        return match highlights.mark_whole_node(document, node, MarkerKind::Degraded) {
            Ok(highlighted) => Some(FallbackHighlight::Node { index, highlighted }),
            Err(err) => {
                warn!(term, index, %err, "fallback highlight failed");
                None
            }
        };
    }

    let found = nodes.len();
    let kind = MarkerKind::Substitute { requested: index, found };
    match highlights.mark_whole_node(document, first, kind) {
        Ok(highlighted) => {
            info!(term, requested = index, found, "fallback index out of range; marked first node");
            Some(FallbackHighlight::Substitute { requested: index, found, highlighted })
        }
        Err(err) => {
            warn!(term, index, %err, "fallback substitute highlight failed");
            None
        }
    }
}
