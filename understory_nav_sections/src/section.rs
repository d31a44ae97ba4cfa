// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use understory_spatial_nav::Previous;

use crate::SectionId;
use crate::config::Settings;

/// A named group of focusable elements with its own navigation policy.
///
/// Sections may overlap; an element belongs to the first enabled section, in registration
/// order, whose selector matches it.
#[derive(Clone, Debug)]
pub struct Section<K> {
    pub(crate) id: SectionId,
    pub(crate) selector: Option<String>,
    pub(crate) disabled: bool,
    pub(crate) settings: Settings<K>,
    pub(crate) last_focused: Option<K>,
    pub(crate) previous: Option<Previous<K>>,
}

impl<K> Section<K> {
    pub(crate) fn new(id: SectionId) -> Self {
        Self {
            id,
            selector: None,
            disabled: false,
            settings: Settings::default(),
            last_focused: None,
            previous: None,
        }
    }

    /// Section id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Selector naming the section's elements, if one is set.
    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }

    /// Whether the section is hidden from navigation.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Settings this section overrides. Unset fields inherit the global config.
    pub fn settings(&self) -> &Settings<K> {
        &self.settings
    }

    /// The element that last had focus in this section.
    ///
    /// This is a hint only: the element may since have been removed, hidden, or moved out of
    /// the section. The navigator checks it again before every use.
    pub fn last_focused(&self) -> Option<K>
    where
        K: Copy,
    {
        self.last_focused
    }

    /// The last directional move made from this section.
    pub fn previous(&self) -> Option<&Previous<K>> {
        self.previous.as_ref()
    }
}
