// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Betterfind: find-on-page search and highlighting over an in-memory document model.
//!
//! A [`page::PageContext`] owns one document and answers the [`protocol::PageRequest`] message
//! contract. The [`orchestrator`] repeats a search in a freshly opened tab of a
//! [`browser::TabHost`], and [`popup`] is the requesting side with its inject-and-retry bridge.

pub mod browser;
pub mod config;
pub mod format;
pub mod highlight;
pub mod locate;
pub mod model;
pub mod orchestrator;
pub mod page;
pub mod popup;
pub mod protocol;
pub mod session;
pub mod upstream;
