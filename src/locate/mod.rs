// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Text location over rendered document text.
//!
//! [`locate`] is the primary locator: it walks visible text nodes under `<body>` and matches the
//! search term as a case-insensitive regular expression against each node's trimmed text. The
//! term is used verbatim as a pattern, so metacharacters keep their regex meaning (`c.t` matches
//! `cat`). When nothing is found the cruder [`fallback`] locator answers instead.

pub mod fallback;

use regex::RegexBuilder;
use tracing::{debug, warn};

use crate::model::{Document, NodeId, OffsetBasis, SearchResult, SearchResultBuilder};

pub use fallback::{find_nodes_containing, highlight_at, locate_fallback, FallbackHighlight};

/// Elements whose text is never rendered.
const NON_RENDERING: &[&str] = &["script", "style"];

/// Finds every occurrence of `term`, falling back to literal containment when the primary
/// pass finds nothing.
pub fn locate(document: &Document, term: &str) -> SearchResult {
    let primary = locate_primary(document, term);
    if !primary.is_empty() || term.is_empty() {
        return primary;
    }
    debug!(term, "no visible matches; using fallback locator");
    locate_fallback(document, term)
}

/// The primary pass on its own.
pub fn locate_primary(document: &Document, term: &str) -> SearchResult {
    let mut builder = SearchResultBuilder::new(term);
    if term.is_empty() {
        return builder.finish();
    }
    let pattern = match RegexBuilder::new(term).case_insensitive(true).build() {
        Ok(pattern) => pattern,
        Err(err) => {
            warn!(term, %err, "search term is not a valid pattern");
            return builder.finish();
        }
    };

    for node in document.text_nodes(document.body()) {
        let Some(text) = visible_text(document, node) else {
            continue;
        };
        for found in pattern.find_iter(text) {
            if found.is_empty() {
                continue;
            }
            builder.push(node, found.start(), found.end(), found.as_str(), OffsetBasis::Trimmed);
        }
    }

    let result = builder.finish();
    debug!(term, total = result.total(), "primary locate finished");
    result
}

/// The trimmed text of `node`, or `None` when the node is not rendered or holds only whitespace.
fn visible_text(document: &Document, node: NodeId) -> Option<&str> {
    if let Some(element) = document.nearest_element(node).and_then(|id| document.element(id)) {
        if NON_RENDERING.contains(&element.tag()) || element.is_hidden() {
            return None;
        }
    }
    let text = document.text(node)?.trim();
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests;
