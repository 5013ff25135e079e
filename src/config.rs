// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Runtime configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all) is a valid config.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::highlight::FlashTiming;
use crate::upstream::SearchOptions;

pub const DEFAULT_API_BASE_URL: &str = "https://munneth52.pythonanywhere.com";
pub const API_URL_ENV: &str = "BETTERFIND_API_URL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid config {path:?}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api_base_url: String,
    pub settle_delay_ms: u64,
    pub injection_retry_delay_ms: u64,
    pub flash_first_ms: u64,
    pub flash_second_ms: u64,
    pub crawl: bool,
    pub max_depth: u32,
    pub max_links: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            settle_delay_ms: 1500,
            injection_retry_delay_ms: 100,
            flash_first_ms: 100,
            flash_second_ms: 300,
            crawl: false,
            max_depth: 1,
            max_links: 10,
        }
    }
}

impl Config {
    pub fn from_json(path: &Path, source: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(source)
            .map_err(|source| ConfigError::Parse { path: path.to_owned(), source })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_owned(), source })?;
        Self::from_json(path, &source)
    }

    /// Applies environment overrides (currently only the API base URL).
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(std::env::var(API_URL_ENV).ok())
    }

    fn with_overrides(mut self, api_base_url: Option<String>) -> Self {
        if let Some(url) = api_base_url.filter(|url| !url.trim().is_empty()) {
            self.api_base_url = url.trim().to_owned();
        }
        self
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn injection_retry_delay(&self) -> Duration {
        Duration::from_millis(self.injection_retry_delay_ms)
    }

    pub fn flash_timing(&self) -> FlashTiming {
        FlashTiming {
            emphasis: Duration::from_millis(self.flash_first_ms),
            steady: Duration::from_millis(self.flash_second_ms),
        }
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions { crawl: self.crawl, max_depth: self.max_depth, max_links: self.max_links }
    }
}
