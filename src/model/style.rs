// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

/// The parsed `style="..."` attribute of an element.
///
/// Property names are stored lowercased; declaration order is preserved so serialization is
/// stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    properties: Vec<(String, String)>,
}

impl InlineStyle {
    pub fn parse(css_text: &str) -> Self {
        let mut style = Self::default();
        for declaration in css_text.split(';') {
            let Some((name, value)) = declaration.split_once(':') else {
                continue;
            };
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                continue;
            }
            style.set(name, value);
        }
        style
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.properties.iter().find(|(key, _)| *key == name).map(|(_, value)| value.as_str())
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        match self.properties.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.properties.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let name = name.to_ascii_lowercase();
        let index = self.properties.iter().position(|(key, _)| *key == name)?;
        Some(self.properties.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn is_display_none(&self) -> bool {
        self.keyword("display").is_some_and(|value| value == "none")
    }

    pub fn is_visibility_hidden(&self) -> bool {
        self.keyword("visibility").is_some_and(|value| value == "hidden")
    }

    fn keyword(&self, name: &str) -> Option<String> {
        let value = self.get(name)?;
        let value = value.trim_end_matches("!important").trim();
        Some(value.to_ascii_lowercase())
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (name, value)) in self.properties.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{name}: {value};")?;
        }
        Ok(())
    }
}
