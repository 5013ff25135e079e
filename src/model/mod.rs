// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! An owned document tree plus the occurrence/search-result types produced by the locators.

pub mod document;
pub mod ids;
pub mod occurrence;
pub mod style;

pub use document::{
    Document, DomError, Element, NodeData, ScrollAlignment, ScrollBehavior, ScrollOptions,
    ScrollRequest,
};
pub use ids::{Id, IdError, NodeId, TabId, WindowId};
pub use occurrence::{OffsetBasis, Occurrence, SearchResult, SearchResultBuilder};
pub use style::InlineStyle;
