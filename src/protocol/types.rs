// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{OffsetBasis, Occurrence, SearchResult};

/// Requests a popup or the orchestrator sends to a document context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PageRequest {
    Scrape,
    SearchWords { searchword: String },
    HighlightWord { index: usize, searchword: String },
    ToggleShortcut { enabled: bool },
    CreateSearchOverlay,
    HideSearchOverlay,
}

impl PageRequest {
    pub fn action(&self) -> &'static str {
        match self {
            Self::Scrape => "scrape",
            Self::SearchWords { .. } => "searchWords",
            Self::HighlightWord { .. } => "highlightWord",
            Self::ToggleShortcut { .. } => "toggleShortcut",
            Self::CreateSearchOverlay => "createSearchOverlay",
            Self::HideSearchOverlay => "hideSearchOverlay",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum PageResponse {
    Links(LinksResponse),
    Results(SearchWordsResponse),
    Success(SuccessResponse),
}

impl PageResponse {
    pub fn success(success: bool) -> Self {
        Self::Success(SuccessResponse { success })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LinksResponse {
    pub links: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchWordsResponse {
    pub results: WireSearchResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WireSearchResult {
    pub searchword: String,
    pub occurrences: Vec<WireOccurrence>,
    pub total_occurrences: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WireOccurrence {
    pub node: u64,
    pub start_offset: usize,
    pub end_offset: usize,
    pub position: usize,
    pub text: String,
    pub trimmed: bool,
}

impl From<&Occurrence> for WireOccurrence {
    fn from(occurrence: &Occurrence) -> Self {
        Self {
            node: occurrence.node().get(),
            start_offset: occurrence.start_offset(),
            end_offset: occurrence.end_offset(),
            position: occurrence.position(),
            text: occurrence.matched_text().to_owned(),
            trimmed: occurrence.basis() == OffsetBasis::Trimmed,
        }
    }
}

impl From<&SearchResult> for WireSearchResult {
    fn from(result: &SearchResult) -> Self {
        Self {
            searchword: result.term().to_owned(),
            occurrences: result.occurrences().iter().map(WireOccurrence::from).collect(),
            total_occurrences: result.total(),
        }
    }
}

/// Requests handled by the background orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum BackgroundRequest {
    OpenLinkedPage { url: String, searchword: String },
}
