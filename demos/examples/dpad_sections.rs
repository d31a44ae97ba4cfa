// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! D-pad navigation across two sections: a sidebar menu and a content grid.
//!
//! This example shows how to:
//! - rank candidates directly with `understory_spatial_nav::navigate`,
//! - implement `FocusHost` for a toy scene,
//! - register sections with entry and exit policies,
//! - feed key codes through `Navigator::on_key_down` and watch the notifications.
//!
//! Run:
//! - `cargo run -p understory_nav_demos --example dpad_sections`

use kurbo::Rect;
use tracing_subscriber::filter::LevelFilter;
use understory_nav_sections::{
    Approval, ConfigPatch, Direction, ElementFlags, EnterTo, EventKind, Exit, Field, FocusHost,
    Key, KeyOutcome, LeaveFor, Modifiers, NavEvent, Navigator, Restrict, Target,
};
use understory_spatial_nav::{NavOptions, navigate};

#[derive(Debug)]
struct Widget {
    name: &'static str,
    class: &'static str,
    rect: Rect,
    enabled: bool,
}

/// A scene of widgets addressed by index. Selectors are `.class` names.
#[derive(Debug)]
struct Scene {
    widgets: Vec<Widget>,
    focused: Option<usize>,
}

impl Scene {
    fn name(&self, id: usize) -> &'static str {
        self.widgets.get(id).map_or("?", |w| w.name)
    }
}

impl FocusHost<usize> for Scene {
    fn query(&self, selector: &str) -> Vec<usize> {
        let class = selector.strip_prefix('.').unwrap_or(selector);
        self.widgets
            .iter()
            .enumerate()
            .filter(|(_, w)| w.class == class)
            .map(|(i, _)| i)
            .collect()
    }

    fn bounds(&self, element: usize) -> Option<Rect> {
        self.widgets.get(element).map(|w| w.rect)
    }

    fn flags(&self, element: usize) -> ElementFlags {
        match self.widgets.get(element) {
            Some(w) if w.enabled => ElementFlags::NAVIGABLE | ElementFlags::FOCUSABLE,
            Some(_) => ElementFlags::VISIBLE,
            None => ElementFlags::empty(),
        }
    }

    fn focused(&self) -> Option<usize> {
        self.focused
    }

    fn apply_focus(&mut self, element: usize) {
        self.focused = Some(element);
    }

    fn notify(&mut self, event: &NavEvent<usize>) -> Approval {
        let direction = event.direction.map_or("", |d| d.as_str());
        println!(
            "  {:<18} {:<10} {:<6} section={}",
            event.name,
            self.name(event.element),
            direction,
            event.section_id.as_deref().unwrap_or("-"),
        );
        // The "Help" item refuses focus.
        if event.kind == EventKind::WillFocus && self.name(event.element) == "Help" {
            return Approval::Vetoed;
        }
        Approval::Granted
    }
}

fn scene() -> Scene {
    let mut widgets = Vec::new();
    for (i, name) in ["Home", "Movies", "Shows", "Help"].into_iter().enumerate() {
        let y = 20.0 + 60.0 * i as f64;
        widgets.push(Widget {
            name,
            class: "menu",
            rect: Rect::new(10.0, y, 110.0, y + 40.0),
            enabled: true,
        });
    }
    for row in 0..2 {
        for col in 0..3 {
            let x = 160.0 + 130.0 * f64::from(col);
            let y = 20.0 + 130.0 * f64::from(row);
            widgets.push(Widget {
                name: ["A1", "A2", "A3", "B1", "B2", "B3"][(row * 3 + col) as usize],
                class: "tile",
                rect: Rect::new(x, y, x + 110.0, y + 110.0),
                // B3 is greyed out.
                enabled: !(row == 1 && col == 2),
            });
        }
    }
    Scene {
        widgets,
        focused: None,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .init();

    let scene = scene();

    // The ranking step on its own: from "Home", which tile is to the right?
    let geometry = |id: usize| scene.bounds(id);
    let tiles = scene.query(".tile");
    let pick = navigate(0, Direction::Right, &tiles, &geometry, &NavOptions::default());
    println!("pure ranking: Home -> right -> {}", pick.map_or("none", |id| scene.name(id)));

    let mut nav = Navigator::new(scene);
    nav.register(
        Some("menu"),
        ConfigPatch {
            selector: Field::Set(".menu".into()),
            enter_to: Field::Set(EnterTo::LastFocused),
            ..ConfigPatch::default()
        },
    )
    .expect("fresh registry");
    nav.register(
        Some("tiles"),
        ConfigPatch {
            selector: Field::Set(".tile".into()),
            restrict: Field::Set(Restrict::SelfFirst),
            enter_to: Field::Set(EnterTo::DefaultElement),
            default_element: Field::Set(Target::parse(".tile")),
            leave_for: Field::Set(
                LeaveFor::default()
                    .with(Direction::Left, Exit::parse("@menu"))
                    .with(Direction::Up, Exit::Block),
            ),
            ..ConfigPatch::default()
        },
    )
    .expect("fresh registry");
    nav.set_default_section(Some("menu"))
        .expect("menu is registered");
    nav.init();

    // Arrow key codes: 37 left, 38 up, 39 right, 40 down.
    let script = [40, 40, 39, 39, 39, 40, 38, 37, 37, 40, 40, 13];
    for code in script {
        let key = Key::from_code(code);
        println!("key {code} ({key:?})");
        let outcome = nav.on_key_down(key, Modifiers::empty());
        nav.on_key_up(key, Modifiers::empty());
        let focused = nav.host().focused.map_or("none", |id| nav.host().name(id));
        let consumed = if outcome == KeyOutcome::Consumed {
            "consumed"
        } else {
            "ignored"
        };
        println!("  -> {focused} ({consumed})");
    }
}
