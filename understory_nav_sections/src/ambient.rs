// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A thread-local default navigator, for hosts that cannot pass a context around.
//!
//! Each thread holds at most one navigator per `(K, H)` pair. Everything here is a thin
//! convenience over an explicit [`Navigator`] value; separate contexts should stay separate
//! values.
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_nav_sections::{ElementFlags, FocusHost, Navigator, ambient};
//!
//! struct Empty;
//! impl FocusHost<u32> for Empty {
//!     fn query(&self, _: &str) -> Vec<u32> { Vec::new() }
//!     fn bounds(&self, _: u32) -> Option<Rect> { None }
//!     fn flags(&self, _: u32) -> ElementFlags { ElementFlags::empty() }
//!     fn focused(&self) -> Option<u32> { None }
//!     fn apply_focus(&mut self, _: u32) {}
//! }
//!
//! assert!(ambient::install(Navigator::new(Empty)).is_ok());
//! let ready = ambient::with(|nav: &mut Navigator<u32, Empty>| {
//!     nav.init();
//!     nav.is_ready()
//! });
//! assert_eq!(ready, Some(true));
//! assert!(ambient::remove::<u32, Empty>().is_some());
//! ```

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::cell::RefCell;

use hashbrown::HashMap;

use crate::Navigator;

std::thread_local! {
    static NAVIGATORS: RefCell<HashMap<TypeId, Box<dyn Any>>> = RefCell::new(HashMap::new());
}

fn unbox<K: 'static, H: 'static>(navigator: Box<dyn Any>) -> Option<Navigator<K, H>> {
    navigator.downcast::<Navigator<K, H>>().ok().map(|n| *n)
}

/// Make `navigator` this thread's default for its `(K, H)` pair.
///
/// Returns the navigator it replaced. If called from inside [`with`], the table is busy
/// and `navigator` is handed back as the error.
pub fn install<K: 'static, H: 'static>(
    navigator: Navigator<K, H>,
) -> Result<Option<Navigator<K, H>>, Navigator<K, H>> {
    NAVIGATORS.with(|table| match table.try_borrow_mut() {
        Ok(mut table) => Ok(table
            .insert(TypeId::of::<Navigator<K, H>>(), Box::new(navigator))
            .and_then(unbox)),
        Err(_) => Err(navigator),
    })
}

/// Run `f` on this thread's default navigator.
///
/// Returns `None` when none is installed, or when called reentrantly from inside another
/// `with`.
pub fn with<K: 'static, H: 'static, R>(f: impl FnOnce(&mut Navigator<K, H>) -> R) -> Option<R> {
    NAVIGATORS.with(|table| {
        let mut table = table.try_borrow_mut().ok()?;
        let navigator = table
            .get_mut(&TypeId::of::<Navigator<K, H>>())?
            .downcast_mut::<Navigator<K, H>>()?;
        Some(f(navigator))
    })
}

/// Take this thread's default navigator for `(K, H)` out of the table.
pub fn remove<K: 'static, H: 'static>() -> Option<Navigator<K, H>> {
    NAVIGATORS.with(|table| {
        let removed = table
            .try_borrow_mut()
            .ok()?
            .remove(&TypeId::of::<Navigator<K, H>>());
        removed.and_then(unbox)
    })
}
