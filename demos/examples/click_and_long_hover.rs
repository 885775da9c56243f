// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Long-hover debouncing driven by a manual clock.
//!
//! A long-hover fires once the pointer rests on a feature for the configured delay,
//! longer right after the camera moved, and never on the feature that is currently
//! clicked.
//!
//! Run:
//! - `cargo run -p waymark_demos --example click_and_long_hover`

use std::time::Duration;

use kurbo::{Point, Rect};
use tracing_subscriber::EnvFilter;
use waymark_canvas::HeadlessMap;
use waymark_events::time::ManualClock;
use waymark_events::{
    Dispatcher, DispatcherConfig, EventType, Feature, InteractiveGroup, LngLat, MapEvent,
    PointerInput,
};

fn pointer(x: f64) -> MapEvent {
    MapEvent::MouseMove(PointerInput::new(Point::new(x, 5.0), LngLat::default()))
}

fn wait(
    dispatcher: &mut Dispatcher<HeadlessMap, ManualClock>,
    clock: &ManualClock,
    label: &str,
    ms: u64,
) {
    let deadline = dispatcher.next_deadline();
    clock.advance(Duration::from_millis(ms));
    let fired = dispatcher.poll();
    println!("{label}: deadline={deadline:?} fired={fired}");
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut map = HeadlessMap::new(10.0);
    map.add_layer("stops", "transit");
    for (id, x) in [(1, 0.0), (2, 50.0)] {
        map.place(
            "stops",
            Rect::new(x, 0.0, x + 10.0, 10.0),
            Feature::new("transit", "stops", LngLat::default()).with_id(id),
        );
    }

    let clock = ManualClock::new();
    let mut dispatcher =
        Dispatcher::with_clock(map, clock.clone(), DispatcherConfig::default());
    let stops = dispatcher.events(InteractiveGroup::vector_tile("transit", ["stops"]));
    for event_type in [EventType::Click, EventType::LongHover] {
        stops.on(event_type, |e| {
            println!(
                "{} on {:?}",
                e.event_type,
                e.feature.and_then(Feature::declared_id)
            );
            Ok(())
        });
    }

    dispatcher.handle(&MapEvent::MoveStart);
    dispatcher.handle(&pointer(5.0));
    wait(&mut dispatcher, &clock, "after pan, 500ms", 500);
    wait(&mut dispatcher, &clock, "after pan, 800ms", 300);

    dispatcher.handle(&MapEvent::Click(PointerInput::new(
        Point::new(55.0, 5.0),
        LngLat::default(),
    )));
    dispatcher.handle(&pointer(55.0));
    wait(&mut dispatcher, &clock, "resting on the clicked stop", 300);

    dispatcher.handle(&pointer(5.0));
    wait(&mut dispatcher, &clock, "resting on the other stop", 300);
}
