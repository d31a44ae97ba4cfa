// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scripted host for state machine tests.

use alloc::vec::Vec;

use kurbo::Rect;
use understory_spatial_nav::Direction;

use crate::config::Exit;
use crate::event::{Approval, EventKind, NavEvent};
use crate::host::{ElementFlags, FocusHost};

struct Element {
    id: u32,
    rect: Rect,
    classes: Vec<&'static str>,
    flags: ElementFlags,
}

/// Elements are matched by `.class`, bare `class`, or `#id`; comma-separated lists match
/// any entry.
#[derive(Default)]
pub(crate) struct TestHost {
    elements: Vec<Element>,
    pub(crate) focused: Option<u32>,
    pub(crate) events: Vec<NavEvent<u32>>,
    pub(crate) vetoes: Vec<EventKind>,
    pub(crate) overrides: Vec<(u32, Direction, Exit<u32>)>,
    pub(crate) blurred: Vec<u32>,
    pub(crate) made_focusable: Vec<u32>,
}

impl TestHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(
        mut self,
        id: u32,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        classes: &[&'static str],
    ) -> Self {
        self.elements.push(Element {
            id,
            rect: Rect::new(x, y, x + w, y + h),
            classes: classes.to_vec(),
            flags: ElementFlags::NAVIGABLE,
        });
        self
    }

    pub(crate) fn set_flags(&mut self, id: u32, flags: ElementFlags) {
        if let Some(el) = self.elements.iter_mut().find(|e| e.id == id) {
            el.flags = flags;
        }
    }

    pub(crate) fn kinds(&self) -> Vec<EventKind> {
        self.events.iter().map(|e| e.kind).collect()
    }

    fn element(&self, id: u32) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    fn matches_one(el: &Element, selector: &str) -> bool {
        if let Some(id) = selector.strip_prefix('#') {
            return id.parse::<u32>().ok() == Some(el.id);
        }
        let class = selector.strip_prefix('.').unwrap_or(selector);
        el.classes.iter().any(|c| *c == class)
    }
}

impl FocusHost<u32> for TestHost {
    fn query(&self, selector: &str) -> Vec<u32> {
        self.elements
            .iter()
            .filter(|el| {
                selector
                    .split(',')
                    .any(|part| Self::matches_one(el, part.trim()))
            })
            .map(|el| el.id)
            .collect()
    }

    fn bounds(&self, element: u32) -> Option<Rect> {
        self.element(element).map(|e| e.rect)
    }

    fn flags(&self, element: u32) -> ElementFlags {
        self.element(element)
            .map_or(ElementFlags::empty(), |e| e.flags)
    }

    fn focused(&self) -> Option<u32> {
        self.focused
    }

    fn apply_focus(&mut self, element: u32) {
        self.focused = Some(element);
    }

    fn blur(&mut self, element: u32) {
        self.blurred.push(element);
        if self.focused == Some(element) {
            self.focused = None;
        }
    }

    fn make_focusable(&mut self, element: u32) {
        self.made_focusable.push(element);
    }

    fn element_override(&self, element: u32, direction: Direction) -> Option<Exit<u32>> {
        self.overrides
            .iter()
            .find(|(el, d, _)| *el == element && *d == direction)
            .map(|(_, _, exit)| exit.clone())
    }

    fn notify(&mut self, event: &NavEvent<u32>) -> Approval {
        self.events.push(event.clone());
        if self.vetoes.contains(&event.kind) {
            Approval::Vetoed
        } else {
            Approval::Granted
        }
    }
}
