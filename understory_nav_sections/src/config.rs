// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Section configuration: per-section settings, the global fallback, and partial updates.
//!
//! Sections store only the settings they override. Everything else inherits from
//! [`GlobalConfig`], field by field, at the moment the setting is read (see
//! [`EffectiveConfig`]). Nothing inherited is ever copied into a section.

use alloc::rc::Rc;
use alloc::string::String;
use core::fmt;

use understory_spatial_nav::{Direction, NavOptions, Previous};

use crate::SectionId;

/// Predicate deciding whether an element may be navigated to within a section.
///
/// Called with the element and the id of the section being queried.
pub type NavigableFilter<K> = Rc<dyn Fn(K, &str) -> bool>;

/// Which element receives focus when navigation enters a section from outside.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum EnterTo {
    /// Keep whatever element geometry selected.
    #[default]
    Geometric,
    /// The element that last had focus in the section, else its default element.
    LastFocused,
    /// The section's default element.
    DefaultElement,
}

/// Whether directional navigation may leave the current section.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Restrict {
    /// Search the current section first and fall back to all other sections.
    #[default]
    SelfFirst,
    /// Never leave the current section through geometry.
    SelfOnly,
    /// Search every section at once.
    None,
}

/// An extended selector: something that resolves to an element or a section.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Target<K> {
    /// A concrete element.
    Element(K),
    /// An opaque selector handed to the host; the first match is used.
    Selector(String),
    /// A section by id (`"@id"`).
    Section(SectionId),
    /// Whichever section the default scan finds first (`"@"`).
    AnySection,
}

impl<K> Target<K> {
    /// Parse an extended selector string.
    ///
    /// `"@"` names any section, `"@id"` names section `id`, and anything else is an opaque
    /// selector for the host.
    pub fn parse(s: &str) -> Self {
        match s.strip_prefix('@') {
            Some("") => Self::AnySection,
            Some(id) => Self::Section(id.into()),
            None => Self::Selector(s.into()),
        }
    }
}

/// Where navigation goes when it would leave an element or section in some direction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Exit<K> {
    /// Navigation in this direction is not allowed.
    Block,
    /// Navigate to this target instead.
    To(Target<K>),
}

impl<K> Exit<K> {
    /// Parse an exit string: the empty string blocks, anything else is a [`Target`].
    pub fn parse(s: &str) -> Self {
        if s.is_empty() {
            Self::Block
        } else {
            Self::To(Target::parse(s))
        }
    }
}

/// Per-direction exits for a section.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LeaveFor<K> {
    /// Exit used when moving left.
    pub left: Option<Exit<K>>,
    /// Exit used when moving up.
    pub up: Option<Exit<K>>,
    /// Exit used when moving right.
    pub right: Option<Exit<K>>,
    /// Exit used when moving down.
    pub down: Option<Exit<K>>,
}

impl<K> Default for LeaveFor<K> {
    fn default() -> Self {
        Self {
            left: None,
            up: None,
            right: None,
            down: None,
        }
    }
}

impl<K> LeaveFor<K> {
    /// The exit for `direction`, if one is configured.
    pub fn get(&self, direction: Direction) -> Option<&Exit<K>> {
        match direction {
            Direction::Left => self.left.as_ref(),
            Direction::Up => self.up.as_ref(),
            Direction::Right => self.right.as_ref(),
            Direction::Down => self.down.as_ref(),
        }
    }

    /// Set the exit for `direction`.
    #[must_use]
    pub fn with(mut self, direction: Direction, exit: Exit<K>) -> Self {
        let slot = match direction {
            Direction::Left => &mut self.left,
            Direction::Up => &mut self.up,
            Direction::Right => &mut self.right,
            Direction::Down => &mut self.down,
        };
        *slot = Some(exit);
        self
    }
}

/// One field of a [`ConfigPatch`].
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Field<T> {
    /// Leave the current value untouched.
    #[default]
    Keep,
    /// Remove the value. A section then inherits the global setting; a global setting returns
    /// to its built-in default.
    Clear,
    /// Replace the value.
    Set(T),
}

impl<T> Field<T> {
    pub(crate) fn apply(self, slot: &mut Option<T>) {
        match self {
            Self::Keep => {}
            Self::Clear => *slot = None,
            Self::Set(value) => *slot = Some(value),
        }
    }

    pub(crate) fn apply_or(self, slot: &mut T, default: impl FnOnce() -> T) {
        match self {
            Self::Keep => {}
            Self::Clear => *slot = default(),
            Self::Set(value) => *slot = value,
        }
    }
}

/// Settings a section may override. `None` means "inherit from [`GlobalConfig`]".
#[derive(Clone)]
pub struct Settings<K> {
    /// See [`GlobalConfig::straight_only`].
    pub straight_only: Option<bool>,
    /// See [`GlobalConfig::straight_overlap_threshold`].
    pub straight_overlap_threshold: Option<f64>,
    /// See [`GlobalConfig::remember_source`].
    pub remember_source: Option<bool>,
    /// See [`GlobalConfig::default_element`].
    pub default_element: Option<Target<K>>,
    /// See [`GlobalConfig::enter_to`].
    pub enter_to: Option<EnterTo>,
    /// See [`GlobalConfig::leave_for`].
    pub leave_for: Option<LeaveFor<K>>,
    /// See [`GlobalConfig::restrict`].
    pub restrict: Option<Restrict>,
    /// See [`GlobalConfig::tab_index_ignore`].
    pub tab_index_ignore: Option<String>,
    /// See [`GlobalConfig::navigable_filter`].
    pub navigable_filter: Option<NavigableFilter<K>>,
}

impl<K> Default for Settings<K> {
    fn default() -> Self {
        Self {
            straight_only: None,
            straight_overlap_threshold: None,
            remember_source: None,
            default_element: None,
            enter_to: None,
            leave_for: None,
            restrict: None,
            tab_index_ignore: None,
            navigable_filter: None,
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for Settings<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("straight_only", &self.straight_only)
            .field("straight_overlap_threshold", &self.straight_overlap_threshold)
            .field("remember_source", &self.remember_source)
            .field("default_element", &self.default_element)
            .field("enter_to", &self.enter_to)
            .field("leave_for", &self.leave_for)
            .field("restrict", &self.restrict)
            .field("tab_index_ignore", &self.tab_index_ignore)
            .field("navigable_filter", &self.navigable_filter.is_some())
            .finish()
    }
}

/// Default selector for elements that are natively focusable and need no help from
/// [`Navigator::make_focusable`](crate::Navigator::make_focusable).
pub const DEFAULT_TAB_INDEX_IGNORE: &str =
    "a, input, select, textarea, button, iframe, [contentEditable=true]";

/// Default prefix for generated section ids.
pub const DEFAULT_ID_PREFIX: &str = "section-";

/// Default prefix for event names.
pub const DEFAULT_EVENT_PREFIX: &str = "sn:";

/// Process-wide fallback for every section setting, plus naming prefixes.
#[derive(Clone)]
pub struct GlobalConfig<K> {
    /// Ignore diagonal candidates.
    pub straight_only: bool,
    /// Fraction of the target's span a corner candidate must cover to count as adjacent.
    pub straight_overlap_threshold: f64,
    /// Restore the previously left element when the user reverses direction.
    pub remember_source: bool,
    /// Element focused when a section is entered and no better choice exists.
    pub default_element: Option<Target<K>>,
    /// Entry policy when navigation crosses into a section.
    pub enter_to: EnterTo,
    /// Exits used when navigation would leave a section.
    pub leave_for: Option<LeaveFor<K>>,
    /// Whether geometry may carry focus out of a section.
    pub restrict: Restrict,
    /// Selector for elements [`Navigator::make_focusable`](crate::Navigator::make_focusable)
    /// leaves alone.
    pub tab_index_ignore: String,
    /// Extra navigability check applied when a section has no filter of its own.
    pub navigable_filter: Option<NavigableFilter<K>>,
    /// Prefix for generated section ids.
    pub id_prefix: String,
    /// Prefix for event names.
    pub event_prefix: String,
}

impl<K> Default for GlobalConfig<K> {
    fn default() -> Self {
        Self {
            straight_only: false,
            straight_overlap_threshold: 0.5,
            remember_source: false,
            default_element: None,
            enter_to: EnterTo::Geometric,
            leave_for: None,
            restrict: Restrict::SelfFirst,
            tab_index_ignore: DEFAULT_TAB_INDEX_IGNORE.into(),
            navigable_filter: None,
            id_prefix: DEFAULT_ID_PREFIX.into(),
            event_prefix: DEFAULT_EVENT_PREFIX.into(),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for GlobalConfig<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalConfig")
            .field("straight_only", &self.straight_only)
            .field("straight_overlap_threshold", &self.straight_overlap_threshold)
            .field("remember_source", &self.remember_source)
            .field("default_element", &self.default_element)
            .field("enter_to", &self.enter_to)
            .field("leave_for", &self.leave_for)
            .field("restrict", &self.restrict)
            .field("tab_index_ignore", &self.tab_index_ignore)
            .field("navigable_filter", &self.navigable_filter.is_some())
            .field("id_prefix", &self.id_prefix)
            .field("event_prefix", &self.event_prefix)
            .finish()
    }
}

/// A partial update for a section or for the [`GlobalConfig`].
///
/// Build one with struct-update syntax; every field defaults to [`Field::Keep`]:
///
/// ```rust
/// use understory_nav_sections::{ConfigPatch, Field, Restrict};
///
/// let patch: ConfigPatch<u32> = ConfigPatch {
///     selector: Field::Set(".menu-item".into()),
///     restrict: Field::Set(Restrict::SelfOnly),
///     ..ConfigPatch::default()
/// };
/// # let _ = patch;
/// ```
///
/// `selector` and `disabled` only apply to sections. `id_prefix` and `event_prefix` only
/// apply to the global config.
pub struct ConfigPatch<K> {
    /// Selector naming the section's elements.
    pub selector: Field<String>,
    /// Enable or disable the section.
    pub disabled: Option<bool>,
    /// See [`GlobalConfig::straight_only`].
    pub straight_only: Field<bool>,
    /// See [`GlobalConfig::straight_overlap_threshold`].
    pub straight_overlap_threshold: Field<f64>,
    /// See [`GlobalConfig::remember_source`].
    pub remember_source: Field<bool>,
    /// See [`GlobalConfig::default_element`].
    pub default_element: Field<Target<K>>,
    /// See [`GlobalConfig::enter_to`].
    pub enter_to: Field<EnterTo>,
    /// See [`GlobalConfig::leave_for`].
    pub leave_for: Field<LeaveFor<K>>,
    /// See [`GlobalConfig::restrict`].
    pub restrict: Field<Restrict>,
    /// See [`GlobalConfig::tab_index_ignore`].
    pub tab_index_ignore: Field<String>,
    /// See [`GlobalConfig::navigable_filter`].
    pub navigable_filter: Field<NavigableFilter<K>>,
    /// See [`GlobalConfig::id_prefix`].
    pub id_prefix: Field<String>,
    /// See [`GlobalConfig::event_prefix`].
    pub event_prefix: Field<String>,
}

impl<K> Default for ConfigPatch<K> {
    fn default() -> Self {
        Self {
            selector: Field::Keep,
            disabled: None,
            straight_only: Field::Keep,
            straight_overlap_threshold: Field::Keep,
            remember_source: Field::Keep,
            default_element: Field::Keep,
            enter_to: Field::Keep,
            leave_for: Field::Keep,
            restrict: Field::Keep,
            tab_index_ignore: Field::Keep,
            navigable_filter: Field::Keep,
            id_prefix: Field::Keep,
            event_prefix: Field::Keep,
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for ConfigPatch<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigPatch")
            .field("selector", &self.selector)
            .field("disabled", &self.disabled)
            .field("straight_only", &self.straight_only)
            .field("straight_overlap_threshold", &self.straight_overlap_threshold)
            .field("remember_source", &self.remember_source)
            .field("default_element", &self.default_element)
            .field("enter_to", &self.enter_to)
            .field("leave_for", &self.leave_for)
            .field("restrict", &self.restrict)
            .field("tab_index_ignore", &self.tab_index_ignore)
            .field("id_prefix", &self.id_prefix)
            .field("event_prefix", &self.event_prefix)
            .finish_non_exhaustive()
    }
}

impl<K> ConfigPatch<K> {
    pub(crate) fn apply_to_section(self, settings: &mut Settings<K>) {
        self.straight_only.apply(&mut settings.straight_only);
        self.straight_overlap_threshold
            .apply(&mut settings.straight_overlap_threshold);
        self.remember_source.apply(&mut settings.remember_source);
        self.default_element.apply(&mut settings.default_element);
        self.enter_to.apply(&mut settings.enter_to);
        self.leave_for.apply(&mut settings.leave_for);
        self.restrict.apply(&mut settings.restrict);
        self.tab_index_ignore.apply(&mut settings.tab_index_ignore);
        self.navigable_filter.apply(&mut settings.navigable_filter);
    }

    pub(crate) fn apply_to_global(self, global: &mut GlobalConfig<K>) {
        self.straight_only
            .apply_or(&mut global.straight_only, || false);
        self.straight_overlap_threshold
            .apply_or(&mut global.straight_overlap_threshold, || 0.5);
        self.remember_source
            .apply_or(&mut global.remember_source, || false);
        self.default_element.apply(&mut global.default_element);
        self.enter_to.apply_or(&mut global.enter_to, EnterTo::default);
        self.leave_for.apply(&mut global.leave_for);
        self.restrict.apply_or(&mut global.restrict, Restrict::default);
        self.tab_index_ignore
            .apply_or(&mut global.tab_index_ignore, || DEFAULT_TAB_INDEX_IGNORE.into());
        self.navigable_filter.apply(&mut global.navigable_filter);
        self.id_prefix
            .apply_or(&mut global.id_prefix, || DEFAULT_ID_PREFIX.into());
        self.event_prefix
            .apply_or(&mut global.event_prefix, || DEFAULT_EVENT_PREFIX.into());
    }
}

/// Settings in force for one section: its own overrides coalesced with the global config.
pub struct EffectiveConfig<'a, K> {
    /// Resolved [`GlobalConfig::straight_only`].
    pub straight_only: bool,
    /// Resolved [`GlobalConfig::straight_overlap_threshold`], clamped to `[0, 1]`.
    pub straight_overlap_threshold: f64,
    /// Resolved [`GlobalConfig::remember_source`].
    pub remember_source: bool,
    /// Resolved [`GlobalConfig::default_element`].
    pub default_element: Option<&'a Target<K>>,
    /// Resolved [`GlobalConfig::enter_to`].
    pub enter_to: EnterTo,
    /// Resolved [`GlobalConfig::leave_for`].
    pub leave_for: Option<&'a LeaveFor<K>>,
    /// Resolved [`GlobalConfig::restrict`].
    pub restrict: Restrict,
    /// Resolved [`GlobalConfig::tab_index_ignore`].
    pub tab_index_ignore: &'a str,
    /// Resolved [`GlobalConfig::navigable_filter`].
    pub navigable_filter: Option<&'a NavigableFilter<K>>,
}

impl<K: fmt::Debug> fmt::Debug for EffectiveConfig<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectiveConfig")
            .field("straight_only", &self.straight_only)
            .field("straight_overlap_threshold", &self.straight_overlap_threshold)
            .field("remember_source", &self.remember_source)
            .field("enter_to", &self.enter_to)
            .field("restrict", &self.restrict)
            .finish_non_exhaustive()
    }
}

impl<'a, K> EffectiveConfig<'a, K> {
    pub(crate) fn coalesce(settings: &'a Settings<K>, global: &'a GlobalConfig<K>) -> Self {
        let threshold = settings
            .straight_overlap_threshold
            .unwrap_or(global.straight_overlap_threshold);
        Self {
            straight_only: settings.straight_only.unwrap_or(global.straight_only),
            straight_overlap_threshold: if threshold.is_nan() {
                0.5
            } else {
                threshold.clamp(0.0, 1.0)
            },
            remember_source: settings.remember_source.unwrap_or(global.remember_source),
            default_element: settings
                .default_element
                .as_ref()
                .or(global.default_element.as_ref()),
            enter_to: settings.enter_to.unwrap_or(global.enter_to),
            leave_for: settings.leave_for.as_ref().or(global.leave_for.as_ref()),
            restrict: settings.restrict.unwrap_or(global.restrict),
            tab_index_ignore: settings
                .tab_index_ignore
                .as_deref()
                .unwrap_or(global.tab_index_ignore.as_str()),
            navigable_filter: settings
                .navigable_filter
                .as_ref()
                .or(global.navigable_filter.as_ref()),
        }
    }

    /// Resolver options for this config, carrying the section's remembered move.
    pub fn nav_options(&self, previous: Option<Previous<K>>) -> NavOptions<K> {
        NavOptions {
            straight_only: self.straight_only,
            straight_overlap_threshold: self.straight_overlap_threshold,
            remember_source: self.remember_source,
            previous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_selectors_parse() {
        assert_eq!(Target::<u32>::parse("@"), Target::AnySection);
        assert_eq!(Target::<u32>::parse("@menu"), Target::Section("menu".into()));
        assert_eq!(Target::<u32>::parse(".item"), Target::Selector(".item".into()));
        assert_eq!(Exit::<u32>::parse(""), Exit::Block);
        assert_eq!(Exit::<u32>::parse("@"), Exit::To(Target::AnySection));
    }

    #[test]
    fn leave_for_is_per_direction() {
        let lf = LeaveFor::<u32>::default()
            .with(Direction::Right, Exit::parse("@b"))
            .with(Direction::Up, Exit::Block);
        assert_eq!(lf.get(Direction::Right), Some(&Exit::To(Target::Section("b".into()))));
        assert_eq!(lf.get(Direction::Up), Some(&Exit::Block));
        assert_eq!(lf.get(Direction::Left), None);
    }

    #[test]
    fn section_settings_fall_back_field_by_field() {
        let global = GlobalConfig::<u32> {
            straight_only: true,
            restrict: Restrict::None,
            ..GlobalConfig::default()
        };
        let settings = Settings {
            restrict: Some(Restrict::SelfOnly),
            straight_overlap_threshold: Some(3.0),
            ..Settings::default()
        };
        let eff = EffectiveConfig::coalesce(&settings, &global);
        assert!(eff.straight_only);
        assert_eq!(eff.restrict, Restrict::SelfOnly);
        assert_eq!(eff.straight_overlap_threshold, 1.0);
        assert_eq!(eff.tab_index_ignore, DEFAULT_TAB_INDEX_IGNORE);
    }

    #[test]
    fn clearing_a_global_field_restores_its_default() {
        let mut global = GlobalConfig::<u32>::default();
        ConfigPatch {
            restrict: Field::Set(Restrict::SelfOnly),
            id_prefix: Field::Set("pane-".into()),
            tab_index_ignore: Field::Clear,
            ..ConfigPatch::default()
        }
        .apply_to_global(&mut global);
        assert_eq!(global.restrict, Restrict::SelfOnly);
        assert_eq!(global.id_prefix, "pane-");
        assert_eq!(global.tab_index_ignore, DEFAULT_TAB_INDEX_IGNORE);

        ConfigPatch {
            restrict: Field::Clear,
            ..ConfigPatch::default()
        }
        .apply_to_global(&mut global);
        assert_eq!(global.restrict, Restrict::SelfFirst);
        assert_eq!(global.id_prefix, "pane-");
    }

    #[test]
    fn fields_default_to_keep() {
        struct Opaque;
        assert!(matches!(Field::<Opaque>::default(), Field::Keep));
        assert_eq!(Field::<EnterTo>::default(), Field::Keep);
        assert!(matches!(ConfigPatch::<u32>::default().restrict, Field::Keep));
    }

    #[test]
    fn clearing_a_section_field_inherits_again() {
        let mut settings = Settings::<u32>::default();
        ConfigPatch {
            enter_to: Field::Set(EnterTo::LastFocused),
            remember_source: Field::Set(true),
            ..ConfigPatch::default()
        }
        .apply_to_section(&mut settings);
        assert_eq!(settings.enter_to, Some(EnterTo::LastFocused));

        ConfigPatch {
            enter_to: Field::Clear,
            ..ConfigPatch::default()
        }
        .apply_to_section(&mut settings);
        assert_eq!(settings.enter_to, None);
        assert_eq!(settings.remember_source, Some(true));
    }
}
