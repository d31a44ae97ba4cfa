// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Section registry: id generation, section storage, and the global config.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use understory_spatial_nav::Previous;

use crate::SectionId;
use crate::config::{ConfigPatch, EffectiveConfig, GlobalConfig};
use crate::error::SectionError;
use crate::section::Section;

/// All registered sections plus the process-wide fallback config.
///
/// Sections are kept in registration order; that order decides which section an element
/// belongs to when several selectors match it, and which section the fallback scan in
/// [`Navigator::focus_section`](crate::Navigator::focus_section) tries first.
pub struct Registry<K> {
    sections: HashMap<SectionId, Section<K>>,
    order: Vec<SectionId>,
    global: GlobalConfig<K>,
    default_section: Option<SectionId>,
    last_section: Option<SectionId>,
    id_pool: u64,
}

impl<K> Default for Registry<K> {
    fn default() -> Self {
        Self {
            sections: HashMap::new(),
            order: Vec::new(),
            global: GlobalConfig::default(),
            default_section: None,
            last_section: None,
            id_pool: 0,
        }
    }
}

impl<K: core::fmt::Debug> core::fmt::Debug for Registry<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("order", &self.order)
            .field("default_section", &self.default_section)
            .field("last_section", &self.last_section)
            .field("global", &self.global)
            .finish_non_exhaustive()
    }
}

fn non_empty(id: Option<&str>) -> Option<&str> {
    id.filter(|id| !id.is_empty())
}

impl<K> Registry<K> {
    /// Create an empty registry with the default global config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a section and apply `patch` to it.
    ///
    /// Without an id (or with an empty one) a fresh id is generated from the configured
    /// prefix, skipping ids already in use.
    pub fn register(
        &mut self,
        id: Option<&str>,
        patch: ConfigPatch<K>,
    ) -> Result<SectionId, SectionError> {
        let id = match non_empty(id) {
            Some(id) if self.sections.contains_key(id) => {
                return Err(SectionError::Duplicate(id.into()));
            }
            Some(id) => String::from(id),
            None => self.generate_id(),
        };
        self.sections.insert(id.clone(), Section::new(id.clone()));
        self.order.push(id.clone());
        #[cfg(feature = "tracing")]
        tracing::debug!(section = %id, "registered section");
        self.update(Some(&id), patch)?;
        Ok(id)
    }

    fn generate_id(&mut self) -> SectionId {
        loop {
            self.id_pool += 1;
            let id = format!("{}{}", self.global.id_prefix, self.id_pool);
            if !self.sections.contains_key(&id) {
                return id;
            }
        }
    }

    /// Apply `patch` to section `id`, or to the global config when `id` is absent.
    pub fn update(
        &mut self,
        id: Option<&str>,
        mut patch: ConfigPatch<K>,
    ) -> Result<(), SectionError> {
        let Some(id) = non_empty(id) else {
            patch.apply_to_global(&mut self.global);
            #[cfg(feature = "tracing")]
            tracing::debug!("updated global config");
            return Ok(());
        };
        let section = self
            .sections
            .get_mut(id)
            .ok_or_else(|| SectionError::Unknown(id.into()))?;
        core::mem::take(&mut patch.selector).apply(&mut section.selector);
        if let Some(disabled) = patch.disabled {
            section.disabled = disabled;
        }
        patch.apply_to_section(&mut section.settings);
        #[cfg(feature = "tracing")]
        tracing::debug!(section = %id, "updated section");
        Ok(())
    }

    /// Remove section `id`. Returns `false` if it was not registered.
    pub fn unregister(&mut self, id: &str) -> bool {
        if self.sections.remove(id).is_none() {
            return false;
        }
        self.order.retain(|s| s != id);
        if self.last_section.as_deref() == Some(id) {
            self.last_section = None;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(section = %id, "unregistered section");
        true
    }

    /// Make section `id` visible to navigation again. Returns `false` if it is unknown.
    pub fn enable(&mut self, id: &str) -> bool {
        self.set_disabled(id, false)
    }

    /// Hide section `id` from every candidate query and focus scan. Returns `false` if it is
    /// unknown.
    pub fn disable(&mut self, id: &str) -> bool {
        self.set_disabled(id, true)
    }

    fn set_disabled(&mut self, id: &str, disabled: bool) -> bool {
        match self.sections.get_mut(id) {
            Some(section) => {
                section.disabled = disabled;
                #[cfg(feature = "tracing")]
                tracing::debug!(section = %id, disabled, "changed section state");
                true
            }
            None => false,
        }
    }

    /// Set or clear the section tried first by the fallback focus scan.
    pub fn set_default_section(&mut self, id: Option<&str>) -> Result<(), SectionError> {
        match non_empty(id) {
            None => self.default_section = None,
            Some(id) if self.sections.contains_key(id) => {
                self.default_section = Some(id.into());
            }
            Some(id) => return Err(SectionError::Unknown(id.into())),
        }
        Ok(())
    }

    /// Section `id`, if registered.
    pub fn section(&self, id: &str) -> Option<&Section<K>> {
        self.sections.get(id)
    }

    /// Whether section `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.sections.contains_key(id)
    }

    /// Registered sections in registration order.
    pub fn sections(&self) -> impl Iterator<Item = &Section<K>> + '_ {
        self.order.iter().filter_map(|id| self.sections.get(id))
    }

    /// Section ids in registration order.
    pub fn ids(&self) -> &[SectionId] {
        &self.order
    }

    /// Number of registered sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether no section is registered.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// The process-wide fallback config.
    pub fn global(&self) -> &GlobalConfig<K> {
        &self.global
    }

    /// Replace the global config with its built-in defaults.
    pub fn reset_global(&mut self) {
        self.global = GlobalConfig::default();
    }

    /// The section configured to be tried first.
    pub fn default_section(&self) -> Option<&str> {
        self.default_section.as_deref()
    }

    /// The section that most recently held focus.
    pub fn last_section(&self) -> Option<&str> {
        self.last_section.as_deref()
    }

    /// Settings in force for section `id`.
    pub fn effective(&self, id: &str) -> Option<EffectiveConfig<'_, K>> {
        let section = self.sections.get(id)?;
        Some(EffectiveConfig::coalesce(&section.settings, &self.global))
    }

    pub(crate) fn record_focus(&mut self, id: &str, element: K) {
        if let Some(section) = self.sections.get_mut(id) {
            section.last_focused = Some(element);
            self.last_section = Some(section.id.clone());
        }
    }

    pub(crate) fn set_previous(&mut self, id: &str, previous: Previous<K>) {
        if let Some(section) = self.sections.get_mut(id) {
            section.previous = Some(previous);
        }
    }

    /// Remove every section. The global config and id counter are kept.
    pub fn clear(&mut self) {
        self.sections.clear();
        self.order.clear();
        self.default_section = None;
        self.last_section = None;
    }

    /// Restart generated ids from the beginning.
    pub fn reset_ids(&mut self) {
        self.id_pool = 0;
    }
}
