// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use crate::model::NodeId;

pub const MARKER_ID: &str = "betterFind-highlight";
pub const FALLBACK_MARKER_ID: &str = "betterFind-highlight-temp";
pub const REQUESTED_INDEX_ATTR: &str = "data-betterfind-requested-index";
pub const FOUND_COUNT_ATTR: &str = "data-betterfind-found-count";

/// How a marker relates to what was asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// Wraps exactly the matched text.
    Precise,
    /// Wraps the whole text node that contains the term.
    Degraded,
    /// The requested node did not exist; wraps the first containing node instead.
    Substitute { requested: usize, found: usize },
}

/// Colors applied to markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerPalette {
    pub background: String,
    pub flash_background: String,
    pub fallback_background: String,
    pub color: String,
    pub shadow: String,
    pub flash_shadow: String,
}

impl Default for MarkerPalette {
    fn default() -> Self {
        Self {
            background: "#ffff00".to_owned(),
            flash_background: "#ffeb3b".to_owned(),
            fallback_background: "#ffa94d".to_owned(),
            color: "#000000".to_owned(),
            shadow: "0 0 5px rgba(255, 255, 0, 0.5)".to_owned(),
            flash_shadow: "0 0 10px rgba(255, 235, 59, 0.8)".to_owned(),
        }
    }
}

impl MarkerPalette {
    pub fn steady_background(&self, kind: MarkerKind) -> &str {
        match kind {
            MarkerKind::Substitute { .. } => &self.fallback_background,
            MarkerKind::Precise | MarkerKind::Degraded => &self.background,
        }
    }
}

/// Delays of the two flash stages, both measured from the moment the marker was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashTiming {
    pub emphasis: Duration,
    pub steady: Duration,
}

impl Default for FlashTiming {
    fn default() -> Self {
        Self { emphasis: Duration::from_millis(100), steady: Duration::from_millis(300) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashStage {
    Emphasis,
    Steady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashStep {
    pub delay: Duration,
    pub stage: FlashStage,
}

/// Cosmetic follow-up for a freshly applied marker. Whoever owns the document runs the steps
/// once their delay elapses; a step for a marker that has since been cleared does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashPlan {
    pub marker: NodeId,
    pub steps: [FlashStep; 2],
}

impl FlashPlan {
    pub fn new(marker: NodeId, timing: FlashTiming) -> Self {
        Self {
            marker,
            steps: [
                FlashStep { delay: timing.emphasis, stage: FlashStage::Emphasis },
                FlashStep { delay: timing.steady, stage: FlashStage::Steady },
            ],
        }
    }
}
