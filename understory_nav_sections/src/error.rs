// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use crate::SectionId;

/// Configuration errors raised by section registry operations.
///
/// Everything else that can go wrong during navigation (nothing to move to, an element
/// that cannot be measured, a vetoed transition) is a routine outcome reported as `false`
/// or `None`, never as an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SectionError {
    /// A section with this id is already registered.
    Duplicate(SectionId),
    /// No section with this id is registered.
    Unknown(SectionId),
}

impl fmt::Display for SectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate(id) => write!(f, "section \"{id}\" already exists"),
            Self::Unknown(id) => write!(f, "section \"{id}\" does not exist"),
        }
    }
}

impl core::error::Error for SectionError {}
