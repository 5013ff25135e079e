// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Message contract between the popup, the background orchestrator and document contexts.
//!
//! Every message is a closed enum tagged by its `action` field; every request gets exactly one
//! typed response.

mod types;

pub use types::*;

/// JSON schema of the page and background request/response types.
pub fn message_schema() -> serde_json::Value {
    serde_json::json!({
        "pageRequest": schemars::schema_for!(PageRequest),
        "pageResponse": schemars::schema_for!(PageResponse),
        "backgroundRequest": schemars::schema_for!(BackgroundRequest),
    })
}
