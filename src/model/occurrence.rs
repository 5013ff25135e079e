// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::NodeId;

/// What an occurrence's offsets are measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OffsetBasis {
    /// Offsets into the node text with leading/trailing whitespace trimmed.
    Trimmed,
    /// Offsets into the full node text.
    Full,
}

/// One match of a search term inside one text node.
///
/// `node` is a non-owning reference into the document the search ran against; it is only
/// meaningful until the next mutation of that document. Offsets are UTF-8 byte offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    node: NodeId,
    start_offset: usize,
    end_offset: usize,
    position: usize,
    matched_text: String,
    basis: OffsetBasis,
}

impl Occurrence {
    pub fn new(
        node: NodeId,
        start_offset: usize,
        end_offset: usize,
        position: usize,
        matched_text: impl Into<String>,
        basis: OffsetBasis,
    ) -> Self {
        debug_assert!(start_offset < end_offset);
        Self { node, start_offset, end_offset, position, matched_text: matched_text.into(), basis }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn start_offset(&self) -> usize {
        self.start_offset
    }

    pub fn end_offset(&self) -> usize {
        self.end_offset
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn matched_text(&self) -> &str {
        &self.matched_text
    }

    pub fn basis(&self) -> OffsetBasis {
        self.basis
    }
}

/// The ordered output of one search. Occurrences are in document order and
/// `occurrences()[i].position() == i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    term: String,
    occurrences: Vec<Occurrence>,
}

impl SearchResult {
    pub fn empty(term: impl Into<String>) -> Self {
        Self { term: term.into(), occurrences: Vec::new() }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn occurrences(&self) -> &[Occurrence] {
        &self.occurrences
    }

    pub fn get(&self, position: usize) -> Option<&Occurrence> {
        self.occurrences.get(position)
    }

    pub fn total(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }
}

/// Accumulates occurrences while assigning positions from a running counter.
#[derive(Debug)]
pub struct SearchResultBuilder {
    result: SearchResult,
}

impl SearchResultBuilder {
    pub fn new(term: impl Into<String>) -> Self {
        Self { result: SearchResult::empty(term) }
    }

    pub fn push(
        &mut self,
        node: NodeId,
        start_offset: usize,
        end_offset: usize,
        matched_text: impl Into<String>,
        basis: OffsetBasis,
    ) {
        let position = self.result.occurrences.len();
        self.result.occurrences.push(Occurrence::new(
            node,
            start_offset,
            end_offset,
            position,
            matched_text,
            basis,
        ));
    }

    pub fn finish(self) -> SearchResult {
        self.result
    }
}
