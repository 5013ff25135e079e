// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// A typed numeric identifier.
///
/// Node ids index into a [`Document`](super::Document) arena; tab and window ids are handed out
/// by a browser host. The tag type only exists to keep the different id spaces apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub const fn new(value: u64) -> Self {
        Self { value, _marker: PhantomData }
    }

    pub fn get(self) -> u64 {
        self.value
    }

    pub(crate) fn index(self) -> usize {
        self.value as usize
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Self::new(index as u64)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(IdError::Empty);
        }
        s.parse::<u64>().map(Self::new).map_err(|_| IdError::NotNumeric(s.to_owned()))
    }
}

impl<T> From<Id<T>> for u64 {
    fn from(id: Id<T>) -> Self {
        id.value
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("id must not be empty")]
    Empty,
    #[error("id must be a non-negative integer (got '{0}')")]
    NotNumeric(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeIdTag {}
pub type NodeId = Id<NodeIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TabIdTag {}
pub type TabId = Id<TabIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WindowIdTag {}
pub type WindowId = Id<WindowIdTag>;
