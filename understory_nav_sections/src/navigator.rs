// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The focus state machine.

use alloc::vec::Vec;
use core::fmt;

use understory_spatial_nav::{Direction, Previous, navigate};

use crate::SectionId;
use crate::config::{ConfigPatch, EnterTo, Exit, Restrict, Target};
use crate::error::SectionError;
use crate::event::{Approval, Cause, EventKind, NavEvent};
use crate::host::{ElementFlags, FocusHost};
use crate::input::{Key, KeyOutcome, Modifiers};
use crate::registry::Registry;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Transition {
    Moved,
    Vetoed,
    Blocked,
    Unresolved,
}

impl Transition {
    fn moved(self) -> bool {
        self == Self::Moved
    }
}

/// A navigation context: a section registry bound to the host it drives.
///
/// The navigator starts uninitialized. [`Navigator::init`] activates the input bindings
/// ([`Navigator::on_key_down`] and friends); the programmatic API works in either state.
///
/// Two flags are orthogonal to the lifecycle:
/// - **paused** skips the approval protocol. Focus changes still happen and are still
///   recorded, but no `will*`/`*ed` events are sent and key input is ignored.
/// - **changing focus** is set while a transition is in flight. Focus requests that arrive
///   during that window take the silent path, and reported focus/blur echoes are ignored.
pub struct Navigator<K, H> {
    registry: Registry<K>,
    host: H,
    ready: bool,
    paused: bool,
    during_focus_change: bool,
}

impl<K: fmt::Debug, H> fmt::Debug for Navigator<K, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("registry", &self.registry)
            .field("ready", &self.ready)
            .field("paused", &self.paused)
            .field("during_focus_change", &self.during_focus_change)
            .finish_non_exhaustive()
    }
}

impl<K, H> Navigator<K, H>
where
    K: Copy + Eq,
    H: FocusHost<K>,
{
    /// Create an uninitialized navigator with an empty registry.
    pub fn new(host: H) -> Self {
        Self {
            registry: Registry::new(),
            host,
            ready: false,
            paused: false,
            during_focus_change: false,
        }
    }

    /// Activate input bindings.
    pub fn init(&mut self) {
        self.ready = true;
    }

    /// Deactivate input bindings, remove every section, and restart generated ids.
    pub fn uninit(&mut self) {
        self.ready = false;
        self.clear();
        self.registry.reset_ids();
    }

    /// Remove every section. Bindings and the global config are kept.
    pub fn clear(&mut self) {
        self.registry.clear();
        self.during_focus_change = false;
    }

    /// Whether input bindings are active.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Suspend the approval protocol.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume the approval protocol.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Whether the approval protocol is suspended.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether a focus transition is in flight.
    pub fn is_changing_focus(&self) -> bool {
        self.during_focus_change
    }

    /// The section registry.
    pub fn registry(&self) -> &Registry<K> {
        &self.registry
    }

    /// Mutable access to the section registry.
    pub fn registry_mut(&mut self) -> &mut Registry<K> {
        &mut self.registry
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Consume the navigator and return its host.
    pub fn into_host(self) -> H {
        self.host
    }

    /// See [`Registry::register`].
    pub fn register(
        &mut self,
        id: Option<&str>,
        patch: ConfigPatch<K>,
    ) -> Result<SectionId, SectionError> {
        self.registry.register(id, patch)
    }

    /// See [`Registry::update`].
    pub fn update(&mut self, id: Option<&str>, patch: ConfigPatch<K>) -> Result<(), SectionError> {
        self.registry.update(id, patch)
    }

    /// See [`Registry::unregister`].
    pub fn unregister(&mut self, id: &str) -> bool {
        self.registry.unregister(id)
    }

    /// See [`Registry::enable`].
    pub fn enable(&mut self, id: &str) -> bool {
        self.registry.enable(id)
    }

    /// See [`Registry::disable`].
    pub fn disable(&mut self, id: &str) -> bool {
        self.registry.disable(id)
    }

    /// See [`Registry::set_default_section`].
    pub fn set_default_section(&mut self, id: Option<&str>) -> Result<(), SectionError> {
        self.registry.set_default_section(id)
    }

    /// Ask the host to make the elements of section `id` (or of every section) focusable.
    ///
    /// Elements matching the effective `tab_index_ignore` selector, and elements the host
    /// already reports as [`ElementFlags::FOCUSABLE`], are skipped.
    pub fn make_focusable(&mut self, id: Option<&str>) -> Result<(), SectionError> {
        let ids: Vec<SectionId> = match id.filter(|id| !id.is_empty()) {
            Some(id) if self.registry.contains(id) => alloc::vec![id.into()],
            Some(id) => return Err(SectionError::Unknown(id.into())),
            None => self.registry.ids().to_vec(),
        };
        for id in &ids {
            for element in self.unfocusable_elements(id) {
                self.host.make_focusable(element);
            }
        }
        Ok(())
    }

    fn unfocusable_elements(&self, id: &str) -> Vec<K> {
        let Some(selector) = self.registry.section(id).and_then(|s| s.selector()) else {
            return Vec::new();
        };
        let Some(ignore) = self.registry.effective(id).map(|c| c.tab_index_ignore) else {
            return Vec::new();
        };
        self.host
            .query(selector)
            .into_iter()
            .filter(|&el| !self.host.matches(el, ignore))
            .filter(|&el| !self.host.flags(el).contains(ElementFlags::FOCUSABLE))
            .collect()
    }

    /// Focus a target, or run the fallback section scan when `target` is `None`.
    ///
    /// A [`Target::Selector`] that names a registered section focuses that section. With
    /// `silent` set, the approval protocol is skipped for this call only.
    ///
    /// Returns whether focus changed.
    pub fn focus(&mut self, target: Option<&Target<K>>, silent: bool) -> bool {
        let auto_pause = silent && !self.paused;
        if auto_pause {
            self.paused = true;
        }
        let result = match target {
            None => self.focus_section_in(None, None, Cause::Api),
            Some(Target::Selector(sel)) if self.registry.contains(sel) => {
                self.focus_section_in(Some(sel.as_str()), None, Cause::Api)
            }
            Some(target) => self.focus_target(target, None, Cause::Api),
        };
        if auto_pause {
            self.paused = false;
        }
        result.moved()
    }

    /// Focus the entry element of section `id`.
    ///
    /// With no id, sections are tried in this order until one yields an element: the default
    /// section, the last focused section, then every section in registration order.
    /// Disabled sections are skipped.
    pub fn focus_section(&mut self, id: Option<&str>) -> bool {
        self.focus_section_in(id, None, Cause::Api).moved()
    }

    /// Move focus from `origin` (or the focused element) in `direction`.
    ///
    /// The origin must belong to a section. [`Target::Section`] and [`Target::AnySection`]
    /// do not name a single element and are rejected.
    pub fn move_focus(&mut self, direction: Direction, origin: Option<&Target<K>>) -> bool {
        let element = match origin {
            None => self.host.focused(),
            Some(Target::Element(el)) => Some(*el),
            Some(Target::Selector(sel)) => self.host.query(sel).into_iter().next(),
            Some(Target::Section(_) | Target::AnySection) => None,
        };
        let Some(element) = element else {
            return false;
        };
        let Some(section_id) = self.section_of(element) else {
            return false;
        };
        if !self.will_move(element, &section_id, direction, Cause::Api) {
            return false;
        }
        self.focus_next(direction, element, &section_id, Cause::Api)
    }

    /// Handle a key press.
    ///
    /// Only active after [`Navigator::init`], while not paused, with at least one section,
    /// and with no modifier held.
    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> KeyOutcome {
        if !self.ready || self.paused || self.registry.is_empty() || !modifiers.is_empty() {
            return KeyOutcome::Ignored;
        }
        let direction = match key {
            Key::Arrow(direction) => direction,
            Key::Enter => return self.enter(EventKind::EnterDown),
            Key::Other => return KeyOutcome::Ignored,
        };
        let current = self.host.focused().or_else(|| {
            self.registry
                .last_section()
                .and_then(|id| self.last_focused(id))
        });
        let Some(current) = current else {
            self.focus_section_in(None, None, Cause::Device);
            return KeyOutcome::Consumed;
        };
        let Some(section_id) = self.section_of(current) else {
            return KeyOutcome::Ignored;
        };
        if self.will_move(current, &section_id, direction, Cause::Device) {
            self.focus_next(direction, current, &section_id, Cause::Device);
        }
        KeyOutcome::Consumed
    }

    /// Handle a key release. Only Enter is of interest.
    pub fn on_key_up(&mut self, key: Key, modifiers: Modifiers) -> KeyOutcome {
        if !self.ready || self.paused || self.registry.is_empty() || !modifiers.is_empty() {
            return KeyOutcome::Ignored;
        }
        match key {
            Key::Enter => self.enter(EventKind::EnterUp),
            _ => KeyOutcome::Ignored,
        }
    }

    fn enter(&mut self, kind: EventKind) -> KeyOutcome {
        let Some(current) = self.host.focused() else {
            return KeyOutcome::Ignored;
        };
        let Some(section_id) = self.section_of(current) else {
            return KeyOutcome::Ignored;
        };
        let event = NavEvent {
            section_id: Some(section_id),
            ..self.event(kind, current, Cause::Device)
        };
        match self.notify(&event) {
            Approval::Vetoed => KeyOutcome::Consumed,
            Approval::Granted => KeyOutcome::Ignored,
        }
    }

    /// Reconcile with focus that moved outside the navigator, for example by a pointer click.
    pub fn on_focus(&mut self, element: K) {
        if !self.ready || self.registry.is_empty() || self.during_focus_change {
            return;
        }
        let Some(section_id) = self.section_of(element) else {
            return;
        };
        if self.paused {
            self.registry.record_focus(&section_id, element);
            return;
        }
        let mut event = NavEvent {
            section_id: Some(section_id.clone()),
            ..self.event(EventKind::WillFocus, element, Cause::Native)
        };
        if self.notify(&event) == Approval::Vetoed {
            self.during_focus_change = true;
            self.host.blur(element);
            self.during_focus_change = false;
            return;
        }
        self.retarget(&mut event, EventKind::Focused);
        self.notify(&event);
        self.registry.record_focus(&section_id, element);
    }

    /// Reconcile with an element losing focus outside the navigator.
    pub fn on_blur(&mut self, element: K) {
        if !self.ready || self.paused || self.registry.is_empty() || self.during_focus_change {
            return;
        }
        let Some(section_id) = self.section_of(element) else {
            return;
        };
        let mut event = NavEvent {
            section_id: Some(section_id),
            ..self.event(EventKind::WillUnfocus, element, Cause::Native)
        };
        if self.notify(&event) == Approval::Vetoed {
            self.during_focus_change = true;
            self.host.apply_focus(element);
            self.during_focus_change = false;
            return;
        }
        self.retarget(&mut event, EventKind::Unfocused);
        self.notify(&event);
    }

    // Element and section lookup

    /// First enabled section, in registration order, whose selector matches `element`.
    fn section_of(&self, element: K) -> Option<SectionId> {
        self.registry
            .sections()
            .find(|s| {
                !s.is_disabled() && s.selector().is_some_and(|sel| self.host.matches(element, sel))
            })
            .map(|s| s.id().into())
    }

    fn is_navigable(&self, element: K, section_id: &str, verify_selector: bool) -> bool {
        let Some(section) = self.registry.section(section_id) else {
            return false;
        };
        if section.is_disabled() || !self.host.flags(element).contains(ElementFlags::NAVIGABLE) {
            return false;
        }
        if verify_selector
            && !section
                .selector()
                .is_some_and(|sel| self.host.matches(element, sel))
        {
            return false;
        }
        let filter = section
            .settings()
            .navigable_filter
            .as_ref()
            .or(self.registry.global().navigable_filter.as_ref());
        filter.is_none_or(|f| f(element, section_id))
    }

    fn navigable_elements(&self, section_id: &str) -> Vec<K> {
        let Some(selector) = self.registry.section(section_id).and_then(|s| s.selector()) else {
            return Vec::new();
        };
        self.host
            .query(selector)
            .into_iter()
            .filter(|&el| self.is_navigable(el, section_id, false))
            .collect()
    }

    fn default_element(&self, section_id: &str) -> Option<K> {
        let element = match self.registry.effective(section_id)?.default_element? {
            Target::Element(el) => *el,
            Target::Selector(sel) => self.host.query(sel).into_iter().next()?,
            Target::Section(_) | Target::AnySection => return None,
        };
        self.is_navigable(element, section_id, true)
            .then_some(element)
    }

    fn last_focused(&self, section_id: &str) -> Option<K> {
        let element = self.registry.section(section_id)?.last_focused()?;
        self.is_navigable(element, section_id, true)
            .then_some(element)
    }

    fn entry_element(&self, section_id: &str) -> Option<K> {
        let enter_to = self.registry.effective(section_id)?.enter_to;
        let preferred = if enter_to == EnterTo::LastFocused {
            self.last_focused(section_id)
                .or_else(|| self.default_element(section_id))
        } else {
            self.default_element(section_id)
                .or_else(|| self.last_focused(section_id))
        };
        preferred.or_else(|| self.navigable_elements(section_id).into_iter().next())
    }

    fn scan_order(&self, id: Option<&str>) -> Vec<SectionId> {
        let mut range: Vec<SectionId> = Vec::new();
        let mut add = |id: &str| {
            let enabled = self.registry.section(id).is_some_and(|s| !s.is_disabled());
            if enabled && !range.iter().any(|r| r == id) {
                range.push(id.into());
            }
        };
        match id.filter(|id| !id.is_empty()) {
            Some(id) => add(id),
            None => {
                if let Some(id) = self.registry.default_section() {
                    add(id);
                }
                if let Some(id) = self.registry.last_section() {
                    add(id);
                }
                for id in self.registry.ids() {
                    add(id);
                }
            }
        }
        range
    }

    // Transitions

    fn focus_section_in(
        &mut self,
        id: Option<&str>,
        direction: Option<Direction>,
        cause: Cause,
    ) -> Transition {
        for section_id in self.scan_order(id) {
            if let Some(next) = self.entry_element(&section_id) {
                return self.focus_element(next, &section_id, direction, cause);
            }
        }
        Transition::Unresolved
    }

    fn focus_target(
        &mut self,
        target: &Target<K>,
        direction: Option<Direction>,
        cause: Cause,
    ) -> Transition {
        let element = match target {
            Target::AnySection => return self.focus_section_in(None, direction, cause),
            Target::Section(id) => {
                return self.focus_section_in(Some(id.as_str()), direction, cause);
            }
            Target::Selector(sel) => self.host.query(sel).into_iter().next(),
            Target::Element(el) => Some(*el),
        };
        let Some(element) = element else {
            return Transition::Unresolved;
        };
        match self.section_of(element) {
            Some(section_id) if self.is_navigable(element, &section_id, false) => {
                self.focus_element(element, &section_id, direction, cause)
            }
            _ => Transition::Unresolved,
        }
    }

    /// Move focus to `element`, running the approval chain unless paused or nested.
    fn focus_element(
        &mut self,
        element: K,
        section_id: &str,
        direction: Option<Direction>,
        cause: Cause,
    ) -> Transition {
        let current = self.host.focused();
        if self.during_focus_change {
            self.apply(current, element, section_id);
            return Transition::Moved;
        }
        self.during_focus_change = true;
        let result = if self.paused {
            self.apply(current, element, section_id);
            Transition::Moved
        } else {
            self.approve_and_apply(current, element, section_id, direction, cause)
        };
        self.during_focus_change = false;
        #[cfg(feature = "tracing")]
        {
            if result.moved() {
                tracing::trace!(section = section_id, direction = ?direction, "focus moved");
            }
        }
        result
    }

    fn apply(&mut self, current: Option<K>, element: K, section_id: &str) {
        if let Some(current) = current.filter(|&c| c != element) {
            self.host.blur(current);
        }
        self.host.apply_focus(element);
        self.registry.record_focus(section_id, element);
    }

    fn approve_and_apply(
        &mut self,
        current: Option<K>,
        element: K,
        section_id: &str,
        direction: Option<Direction>,
        cause: Cause,
    ) -> Transition {
        let current_section = current.and_then(|c| self.section_of(c));
        if let Some(current) = current {
            let mut event = NavEvent {
                direction,
                section_id: current_section.clone(),
                related_element: Some(element),
                related_section_id: Some(section_id.into()),
                ..self.event(EventKind::WillUnfocus, current, cause)
            };
            if self.notify(&event) == Approval::Vetoed {
                return Transition::Vetoed;
            }
            // Nothing has moved yet; focus only leaves `current` once `element` is applied.
            self.retarget(&mut event, EventKind::Unfocused);
            self.notify(&event);
        }
        let mut event = NavEvent {
            direction,
            section_id: Some(section_id.into()),
            related_element: current,
            related_section_id: current_section,
            ..self.event(EventKind::WillFocus, element, cause)
        };
        if self.notify(&event) == Approval::Vetoed {
            return Transition::Vetoed;
        }
        self.apply(current, element, section_id);
        self.retarget(&mut event, EventKind::Focused);
        self.notify(&event);
        Transition::Moved
    }

    fn will_move(
        &mut self,
        element: K,
        section_id: &str,
        direction: Direction,
        cause: Cause,
    ) -> bool {
        if self.paused {
            return true;
        }
        let event = NavEvent {
            direction: Some(direction),
            section_id: Some(section_id.into()),
            ..self.event(EventKind::WillMove, element, cause)
        };
        self.notify(&event) == Approval::Granted
    }

    /// Run one directional move from `current` and report failures.
    fn focus_next(
        &mut self,
        direction: Direction,
        current: K,
        section_id: &str,
        cause: Cause,
    ) -> bool {
        let result = self.next_transition(direction, current, section_id, cause);
        if !result.moved() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                section = section_id,
                direction = ?direction,
                outcome = ?result,
                "navigation failed"
            );
            let event = NavEvent {
                direction: Some(direction),
                section_id: Some(section_id.into()),
                ..self.event(EventKind::NavigateFailed, current, cause)
            };
            self.notify(&event);
        }
        result.moved()
    }

    fn next_transition(
        &mut self,
        direction: Direction,
        current: K,
        section_id: &str,
        cause: Cause,
    ) -> Transition {
        if let Some(exit) = self.host.element_override(current, direction) {
            return match exit {
                Exit::Block => Transition::Blocked,
                Exit::To(target) => self.focus_target(&target, Some(direction), cause),
            };
        }

        let Some(mut next) = self.resolve(direction, current, section_id) else {
            return self.leave(section_id, direction, cause);
        };
        self.registry.set_previous(
            section_id,
            Previous {
                source: current,
                destination: next,
                reverse: direction.reverse(),
            },
        );
        let Some(next_section) = self.section_of(next) else {
            return Transition::Unresolved;
        };
        if next_section != section_id {
            match self.leave(section_id, direction, cause) {
                Transition::Unresolved => {}
                other => return other,
            }
            let enter_to = self
                .registry
                .effective(&next_section)
                .map(|c| c.enter_to)
                .unwrap_or_default();
            let entry = match enter_to {
                EnterTo::Geometric => None,
                EnterTo::LastFocused => self
                    .last_focused(&next_section)
                    .or_else(|| self.default_element(&next_section)),
                EnterTo::DefaultElement => self.default_element(&next_section),
            };
            if let Some(entry) = entry {
                next = entry;
            }
        }
        self.focus_element(next, &next_section, Some(direction), cause)
    }

    /// Candidate search for a directional move, honoring the section's restrict mode.
    fn resolve(&self, direction: Direction, current: K, section_id: &str) -> Option<K> {
        let config = self.registry.effective(section_id)?;
        let restrict = config.restrict;
        let previous = self
            .registry
            .section(section_id)
            .and_then(|s| s.previous().copied());
        let options = config.nav_options(previous);

        let mut own = Vec::new();
        let mut all = Vec::new();
        for id in self.registry.ids() {
            let elements = self.navigable_elements(id);
            if id == section_id {
                own.clone_from(&elements);
            }
            all.extend(elements);
        }

        let geometry = |el: K| self.host.bounds(el);
        let except_current = |els: &[K]| -> Vec<K> {
            els.iter().copied().filter(|&el| el != current).collect()
        };
        match restrict {
            Restrict::SelfOnly | Restrict::SelfFirst => {
                let own_rest = except_current(&own);
                let found = navigate(current, direction, &own_rest, &geometry, &options);
                if found.is_some() || restrict == Restrict::SelfOnly {
                    return found;
                }
                let outside: Vec<K> = all.into_iter().filter(|el| !own.contains(el)).collect();
                navigate(current, direction, &outside, &geometry, &options)
            }
            Restrict::None => {
                let rest = except_current(&all);
                navigate(current, direction, &rest, &geometry, &options)
            }
        }
    }

    /// Apply the section's exit for `direction`, if one is configured.
    fn leave(&mut self, section_id: &str, direction: Direction, cause: Cause) -> Transition {
        let exit = self
            .registry
            .effective(section_id)
            .and_then(|c| c.leave_for)
            .and_then(|lf| lf.get(direction))
            .cloned();
        match exit {
            None => Transition::Unresolved,
            Some(Exit::Block) => Transition::Blocked,
            Some(Exit::To(target)) => self.focus_target(&target, Some(direction), cause),
        }
    }

    // Notifications

    fn event(&self, kind: EventKind, element: K, cause: Cause) -> NavEvent<K> {
        NavEvent::new(&self.registry.global().event_prefix, kind, element, cause)
    }

    fn retarget(&self, event: &mut NavEvent<K>, kind: EventKind) {
        let fresh = self.event(kind, event.element, event.cause);
        event.kind = fresh.kind;
        event.name = fresh.name;
        event.cancelable = fresh.cancelable;
    }

    fn notify(&mut self, event: &NavEvent<K>) -> Approval {
        let approval = self.host.notify(event);
        if !event.cancelable {
            return Approval::Granted;
        }
        #[cfg(feature = "tracing")]
        {
            if approval == Approval::Vetoed {
                tracing::debug!(kind = event.kind.as_str(), "transition vetoed");
            }
        }
        approval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Field, LeaveFor};
    use crate::testing::TestHost;
    use alloc::rc::Rc;
    use alloc::vec;

    fn section(selector: &str) -> ConfigPatch<u32> {
        ConfigPatch {
            selector: Field::Set(selector.into()),
            ..ConfigPatch::default()
        }
    }

    fn grid() -> Navigator<u32, TestHost> {
        let host = TestHost::new()
            .with(1, 0.0, 0.0, 50.0, 50.0, &["item"])
            .with(2, 100.0, 0.0, 50.0, 50.0, &["item"])
            .with(3, 0.0, 100.0, 50.0, 50.0, &["item"]);
        let mut nav = Navigator::new(host);
        nav.register(Some("grid"), section(".item")).unwrap();
        nav
    }

    fn start_at(nav: &mut Navigator<u32, TestHost>, el: u32) {
        assert!(nav.focus(Some(&Target::Element(el)), true));
        nav.host_mut().events.clear();
    }

    #[test]
    fn grid_moves_and_soft_failures() {
        let mut nav = grid();
        start_at(&mut nav, 1);
        assert!(nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().focused, Some(2));

        start_at(&mut nav, 1);
        assert!(nav.move_focus(Direction::Down, None));
        assert_eq!(nav.host().focused, Some(3));

        for d in [Direction::Left, Direction::Up] {
            start_at(&mut nav, 1);
            assert!(!nav.move_focus(d, None));
            assert_eq!(nav.host().focused, Some(1));
            assert_eq!(
                nav.host().kinds(),
                vec![EventKind::WillMove, EventKind::NavigateFailed]
            );
        }
    }

    #[test]
    fn events_follow_the_approval_order() {
        let mut nav = grid();
        start_at(&mut nav, 1);
        assert!(nav.move_focus(Direction::Right, None));
        assert_eq!(
            nav.host().kinds(),
            vec![
                EventKind::WillMove,
                EventKind::WillUnfocus,
                EventKind::Unfocused,
                EventKind::WillFocus,
                EventKind::Focused,
            ]
        );
        let events = &nav.host().events;
        assert_eq!(events[0].name, "sn:willmove");
        assert_eq!(events[0].cause, Cause::Api);
        assert_eq!(events[1].element, 1);
        assert_eq!(events[1].related_element, Some(2));
        assert_eq!(events[3].element, 2);
        assert_eq!(events[3].related_element, Some(1));
        assert_eq!(events[4].direction, Some(Direction::Right));
        assert_eq!(events[4].section_id.as_deref(), Some("grid"));
        assert!(!events[4].cancelable);
    }

    #[test]
    fn first_focus_skips_unfocus_events() {
        let mut nav = grid();
        assert!(nav.focus(Some(&Target::Element(2)), false));
        assert_eq!(
            nav.host().kinds(),
            vec![EventKind::WillFocus, EventKind::Focused]
        );
        assert_eq!(nav.registry().last_section(), Some("grid"));
        assert_eq!(nav.registry().section("grid").unwrap().last_focused(), Some(2));
    }

    #[test]
    fn vetoes_leave_focus_untouched() {
        for kind in [EventKind::WillUnfocus, EventKind::WillFocus] {
            let mut nav = grid();
            start_at(&mut nav, 1);
            nav.host_mut().vetoes.push(kind);
            assert!(!nav.move_focus(Direction::Right, None));
            assert_eq!(nav.host().focused, Some(1));
            assert!(nav.host().blurred.is_empty());
            assert_eq!(nav.host().kinds().last(), Some(&EventKind::NavigateFailed));
            assert!(!nav.is_changing_focus());
            assert!(!nav.focus(Some(&Target::Element(3)), false));
            assert_eq!(nav.host().focused, Some(1));
        }

        let mut nav = grid();
        start_at(&mut nav, 1);
        nav.host_mut().vetoes.push(EventKind::WillMove);
        assert!(!nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().kinds(), vec![EventKind::WillMove]);
    }

    #[test]
    fn silent_and_paused_focus_send_no_events() {
        let mut nav = grid();
        assert!(nav.focus(Some(&Target::Element(1)), true));
        assert!(nav.host().events.is_empty());
        assert!(!nav.is_paused());

        nav.pause();
        nav.host_mut().vetoes.push(EventKind::WillFocus);
        assert!(nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().focused, Some(2));
        assert!(nav.host().events.is_empty());
        assert!(nav.is_paused());
        nav.resume();
        assert!(!nav.focus(Some(&Target::Element(1)), false));
    }

    #[test]
    fn remembered_source_survives_only_without_intervening_moves() {
        let host = TestHost::new()
            .with(1, 0.0, 0.0, 50.0, 50.0, &["item"])
            .with(2, 200.0, 0.0, 50.0, 100.0, &["item"])
            .with(3, 100.0, 60.0, 50.0, 40.0, &["item"])
            .with(4, 200.0, 150.0, 50.0, 50.0, &["item"]);
        let mut nav = Navigator::new(host);
        nav.register(
            Some("s"),
            ConfigPatch {
                remember_source: Field::Set(true),
                ..section(".item")
            },
        )
        .unwrap();

        start_at(&mut nav, 1);
        assert!(nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().focused, Some(2));
        assert!(nav.move_focus(Direction::Left, None));
        assert_eq!(nav.host().focused, Some(1));

        start_at(&mut nav, 1);
        assert!(nav.move_focus(Direction::Right, None));
        assert!(nav.move_focus(Direction::Down, None));
        assert_eq!(nav.host().focused, Some(4));
        assert!(nav.move_focus(Direction::Up, None));
        assert_eq!(nav.host().focused, Some(2));
        // The last recorded move is now 4 -> 2, so "left" is plain geometry.
        assert!(nav.move_focus(Direction::Left, None));
        assert_eq!(nav.host().focused, Some(3));
    }

    fn two_sections(restrict: Restrict) -> Navigator<u32, TestHost> {
        let host = TestHost::new()
            .with(1, 0.0, 0.0, 50.0, 50.0, &["l"])
            .with(2, 100.0, 0.0, 50.0, 50.0, &["r"])
            .with(3, 100.0, 200.0, 50.0, 50.0, &["r"]);
        let mut nav = Navigator::new(host);
        nav.register(
            Some("left"),
            ConfigPatch {
                restrict: Field::Set(restrict),
                ..section(".l")
            },
        )
        .unwrap();
        nav.register(Some("right"), section(".r")).unwrap();
        nav
    }

    #[test]
    fn self_only_stays_and_self_first_falls_through() {
        let mut nav = two_sections(Restrict::SelfOnly);
        start_at(&mut nav, 1);
        assert!(!nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().focused, Some(1));

        nav.update(
            Some("left"),
            ConfigPatch {
                restrict: Field::Set(Restrict::SelfFirst),
                ..ConfigPatch::default()
            },
        )
        .unwrap();
        assert!(nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().focused, Some(2));
        assert_eq!(nav.registry().last_section(), Some("right"));
    }

    #[test]
    fn restrict_none_searches_everything() {
        let mut nav = two_sections(Restrict::None);
        start_at(&mut nav, 1);
        assert!(nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().focused, Some(2));
    }

    /// Moving right from 1: sibling 4 is far but in "left", neighbor 2 is near but in "right".
    fn far_sibling(restrict: Restrict) -> Navigator<u32, TestHost> {
        let host = TestHost::new()
            .with(1, 0.0, 0.0, 50.0, 50.0, &["l"])
            .with(4, 400.0, 0.0, 50.0, 50.0, &["l"])
            .with(2, 100.0, 0.0, 50.0, 50.0, &["r"]);
        let mut nav = Navigator::new(host);
        nav.register(
            Some("left"),
            ConfigPatch {
                restrict: Field::Set(restrict),
                ..section(".l")
            },
        )
        .unwrap();
        nav.register(Some("right"), section(".r")).unwrap();
        nav
    }

    #[test]
    fn restrict_modes_choose_between_sibling_and_neighbor() {
        for (restrict, expected) in [
            (Restrict::SelfFirst, 4),
            (Restrict::SelfOnly, 4),
            (Restrict::None, 2),
        ] {
            let mut nav = far_sibling(restrict);
            start_at(&mut nav, 1);
            assert!(nav.move_focus(Direction::Right, None), "{restrict:?}");
            assert_eq!(nav.host().focused, Some(expected), "{restrict:?}");
        }
    }

    #[test]
    fn disabled_sections_are_invisible() {
        let mut nav = two_sections(Restrict::SelfFirst);
        start_at(&mut nav, 1);
        assert!(nav.disable("right"));
        assert!(!nav.move_focus(Direction::Right, None));
        assert!(!nav.focus(Some(&Target::Section("right".into())), false));
        assert!(nav.enable("right"));
        assert!(nav.move_focus(Direction::Right, None));
    }

    #[test]
    fn leave_for_beats_geometry() {
        let mut nav = two_sections(Restrict::SelfFirst);
        nav.update(
            Some("left"),
            ConfigPatch {
                leave_for: Field::Set(
                    LeaveFor::default().with(Direction::Right, Exit::To(Target::Element(3))),
                ),
                ..ConfigPatch::default()
            },
        )
        .unwrap();
        start_at(&mut nav, 1);
        assert!(nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().focused, Some(3));

        nav.update(
            Some("left"),
            ConfigPatch {
                leave_for: Field::Set(LeaveFor::default().with(Direction::Right, Exit::Block)),
                ..ConfigPatch::default()
            },
        )
        .unwrap();
        start_at(&mut nav, 1);
        assert!(!nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().focused, Some(1));
        assert_eq!(nav.host().kinds().last(), Some(&EventKind::NavigateFailed));
    }

    #[test]
    fn leave_for_rescues_a_move_with_no_winner() {
        let mut nav = two_sections(Restrict::SelfOnly);
        nav.update(
            Some("left"),
            ConfigPatch {
                leave_for: Field::Set(
                    LeaveFor::default().with(Direction::Up, Exit::parse("@right")),
                ),
                ..ConfigPatch::default()
            },
        )
        .unwrap();
        start_at(&mut nav, 1);
        assert!(nav.move_focus(Direction::Up, None));
        assert_eq!(nav.host().focused, Some(2));
        assert!(!nav.host().kinds().contains(&EventKind::NavigateFailed));
    }

    #[test]
    fn vetoed_leave_for_fails_without_geometry() {
        let mut nav = two_sections(Restrict::SelfFirst);
        nav.update(
            Some("left"),
            ConfigPatch {
                leave_for: Field::Set(
                    LeaveFor::default().with(Direction::Right, Exit::To(Target::Element(3))),
                ),
                ..ConfigPatch::default()
            },
        )
        .unwrap();
        start_at(&mut nav, 1);
        nav.host_mut().vetoes.push(EventKind::WillFocus);
        assert!(!nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().focused, Some(1));
        let asked: Vec<u32> = nav
            .host()
            .events
            .iter()
            .filter(|e| e.kind == EventKind::WillFocus)
            .map(|e| e.element)
            .collect();
        assert_eq!(asked, vec![3]);
        assert_eq!(nav.host().kinds().last(), Some(&EventKind::NavigateFailed));
    }

    #[test]
    fn unresolvable_leave_for_falls_back_to_geometry() {
        let mut nav = two_sections(Restrict::SelfFirst);
        nav.update(
            Some("left"),
            ConfigPatch {
                leave_for: Field::Set(
                    LeaveFor::default().with(Direction::Right, Exit::parse(".nothing")),
                ),
                ..ConfigPatch::default()
            },
        )
        .unwrap();
        start_at(&mut nav, 1);
        assert!(nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().focused, Some(2));
        assert!(!nav.host().kinds().contains(&EventKind::NavigateFailed));
    }

    #[test]
    fn element_overrides_skip_geometry() {
        let mut nav = two_sections(Restrict::None);
        nav.host_mut()
            .overrides
            .push((1, Direction::Right, Exit::To(Target::parse("#3"))));
        nav.host_mut().overrides.push((1, Direction::Down, Exit::Block));
        nav.host_mut()
            .overrides
            .push((1, Direction::Left, Exit::To(Target::parse(".nothing"))));
        start_at(&mut nav, 1);
        assert!(nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().focused, Some(3));

        for d in [Direction::Down, Direction::Left] {
            start_at(&mut nav, 1);
            assert!(!nav.move_focus(d, None));
            assert_eq!(nav.host().focused, Some(1));
        }
    }

    fn sections_a_b(enter_to: EnterTo, with_leave_for: bool) -> Navigator<u32, TestHost> {
        let host = TestHost::new()
            .with(1, 0.0, 0.0, 50.0, 50.0, &["a"])
            .with(21, 100.0, 0.0, 50.0, 50.0, &["b"])
            .with(22, 100.0, 100.0, 50.0, 50.0, &["b"]);
        let mut nav = Navigator::new(host);
        let leave_for = if with_leave_for {
            Field::Set(LeaveFor::default().with(Direction::Right, Exit::parse("@b")))
        } else {
            Field::Keep
        };
        nav.register(
            Some("a"),
            ConfigPatch {
                restrict: Field::Set(Restrict::SelfFirst),
                leave_for,
                ..section(".a")
            },
        )
        .unwrap();
        nav.register(
            Some("b"),
            ConfigPatch {
                enter_to: Field::Set(enter_to),
                default_element: Field::Set(Target::Element(22)),
                ..section(".b")
            },
        )
        .unwrap();
        nav
    }

    #[test]
    fn crossing_into_a_section_uses_its_entry_policy() {
        let mut nav = sections_a_b(EnterTo::DefaultElement, true);
        start_at(&mut nav, 1);
        assert!(nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().focused, Some(22));

        let mut nav = sections_a_b(EnterTo::DefaultElement, false);
        start_at(&mut nav, 1);
        assert!(nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().focused, Some(22));

        let mut nav = sections_a_b(EnterTo::Geometric, false);
        start_at(&mut nav, 1);
        assert!(nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().focused, Some(21));
    }

    #[test]
    fn last_focused_is_checked_before_use() {
        let mut nav = sections_a_b(EnterTo::LastFocused, false);
        start_at(&mut nav, 21);
        start_at(&mut nav, 1);
        assert!(nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().focused, Some(21));

        // 21 goes away; entry falls back to the default element.
        start_at(&mut nav, 1);
        nav.host_mut().set_flags(21, ElementFlags::ENABLED);
        assert!(nav.focus(Some(&Target::Section("b".into())), false));
        assert_eq!(nav.host().focused, Some(22));
    }

    #[test]
    fn focus_section_scans_default_then_last_then_registration_order() {
        let mut nav = sections_a_b(EnterTo::Geometric, false);
        assert!(nav.focus(None, false));
        assert_eq!(nav.host().focused, Some(1));

        nav.set_default_section(Some("b")).unwrap();
        assert!(nav.focus_section(None));
        assert_eq!(nav.host().focused, Some(22));

        nav.set_default_section(None).unwrap();
        assert!(nav.focus(Some(&Target::parse("@")), false));
        // "b" is now the last focused section.
        assert_eq!(nav.host().focused, Some(22));

        assert!(nav.focus(Some(&Target::parse("a")), false));
        assert_eq!(nav.host().focused, Some(1));
        assert!(!nav.focus_section(Some("missing")));
    }

    #[test]
    fn navigable_filter_falls_back_to_global() {
        let mut nav = grid();
        nav.update(
            None,
            ConfigPatch {
                navigable_filter: Field::Set(Rc::new(|el: u32, _: &str| el != 2)),
                ..ConfigPatch::default()
            },
        )
        .unwrap();
        start_at(&mut nav, 1);
        assert!(!nav.move_focus(Direction::Right, None));

        nav.update(
            Some("grid"),
            ConfigPatch {
                navigable_filter: Field::Set(Rc::new(|_: u32, _: &str| true)),
                ..ConfigPatch::default()
            },
        )
        .unwrap();
        assert!(nav.move_focus(Direction::Right, None));
    }

    #[test]
    fn make_focusable_skips_ignored_and_focusable_elements() {
        let host = TestHost::new()
            .with(1, 0.0, 0.0, 10.0, 10.0, &["item"])
            .with(2, 20.0, 0.0, 10.0, 10.0, &["item", "button"])
            .with(3, 40.0, 0.0, 10.0, 10.0, &["item"]);
        let mut nav = Navigator::new(host);
        nav.register(Some("s"), section(".item")).unwrap();
        nav.host_mut()
            .set_flags(3, ElementFlags::NAVIGABLE | ElementFlags::FOCUSABLE);
        nav.make_focusable(Some("s")).unwrap();
        assert_eq!(nav.host().made_focusable, vec![1]);
        assert_eq!(
            nav.make_focusable(Some("nope")),
            Err(SectionError::Unknown("nope".into()))
        );

        nav.update(
            Some("s"),
            ConfigPatch {
                tab_index_ignore: Field::Set("#1".into()),
                ..ConfigPatch::default()
            },
        )
        .unwrap();
        nav.host_mut().made_focusable.clear();
        nav.make_focusable(None).unwrap();
        assert_eq!(nav.host().made_focusable, vec![2]);
    }

    #[test]
    fn keys_need_init_and_no_modifiers() {
        let mut nav = grid();
        let right = Key::Arrow(Direction::Right);
        assert_eq!(nav.on_key_down(right, Modifiers::empty()), KeyOutcome::Ignored);
        nav.init();
        assert_eq!(nav.on_key_down(right, Modifiers::SHIFT), KeyOutcome::Ignored);
        assert_eq!(nav.on_key_down(Key::Other, Modifiers::empty()), KeyOutcome::Ignored);

        // Nothing focused: the first arrow only places focus.
        assert_eq!(nav.on_key_down(right, Modifiers::empty()), KeyOutcome::Consumed);
        assert_eq!(nav.host().focused, Some(1));
        assert_eq!(nav.on_key_down(right, Modifiers::empty()), KeyOutcome::Consumed);
        assert_eq!(nav.host().focused, Some(2));
        assert_eq!(nav.host().events[0].cause, Cause::Device);

        // Focus was lost; the last focused element of the last section is the origin.
        nav.host_mut().focused = None;
        let down = Key::Arrow(Direction::Down);
        assert_eq!(nav.on_key_down(down, Modifiers::empty()), KeyOutcome::Consumed);
        assert_eq!(nav.host().focused, Some(3));

        nav.pause();
        assert_eq!(nav.on_key_down(right, Modifiers::empty()), KeyOutcome::Ignored);
        nav.resume();
        nav.uninit();
        assert_eq!(nav.on_key_down(right, Modifiers::empty()), KeyOutcome::Ignored);
        assert!(nav.registry().is_empty());
    }

    #[test]
    fn enter_is_consumed_only_when_vetoed() {
        let mut nav = grid();
        nav.init();
        start_at(&mut nav, 1);
        assert_eq!(nav.on_key_down(Key::Enter, Modifiers::empty()), KeyOutcome::Ignored);
        assert_eq!(nav.on_key_up(Key::from_code(13), Modifiers::empty()), KeyOutcome::Ignored);
        assert_eq!(
            nav.host().kinds(),
            vec![EventKind::EnterDown, EventKind::EnterUp]
        );
        nav.host_mut().vetoes.push(EventKind::EnterDown);
        assert_eq!(nav.on_key_down(Key::Enter, Modifiers::empty()), KeyOutcome::Consumed);
        assert_eq!(nav.on_key_up(Key::Enter, Modifiers::empty()), KeyOutcome::Ignored);
    }

    #[test]
    fn native_focus_and_blur_are_reconciled() {
        let mut nav = grid();
        nav.init();
        nav.host_mut().focused = Some(3);
        nav.on_focus(3);
        assert_eq!(
            nav.host().kinds(),
            vec![EventKind::WillFocus, EventKind::Focused]
        );
        assert_eq!(nav.host().events[0].cause, Cause::Native);
        assert_eq!(nav.registry().section("grid").unwrap().last_focused(), Some(3));

        nav.host_mut().events.clear();
        nav.host_mut().vetoes.push(EventKind::WillFocus);
        nav.host_mut().focused = Some(2);
        nav.on_focus(2);
        assert_eq!(nav.host().blurred, vec![2]);
        assert_eq!(nav.registry().section("grid").unwrap().last_focused(), Some(3));

        nav.host_mut().vetoes = vec![EventKind::WillUnfocus];
        nav.host_mut().focused = None;
        nav.on_blur(3);
        assert_eq!(nav.host().focused, Some(3));

        nav.host_mut().vetoes.clear();
        nav.host_mut().events.clear();
        nav.on_blur(3);
        assert_eq!(
            nav.host().kinds(),
            vec![EventKind::WillUnfocus, EventKind::Unfocused]
        );

        nav.pause();
        nav.host_mut().events.clear();
        nav.on_focus(1);
        assert!(nav.host().events.is_empty());
        assert_eq!(nav.registry().section("grid").unwrap().last_focused(), Some(1));
    }

    #[test]
    fn event_prefix_is_configurable() {
        let mut nav = grid();
        nav.update(
            None,
            ConfigPatch {
                event_prefix: Field::Set("nav.".into()),
                ..ConfigPatch::default()
            },
        )
        .unwrap();
        assert!(nav.focus(Some(&Target::Element(1)), false));
        assert_eq!(nav.host().events[0].name, "nav.willfocus");
    }
}
