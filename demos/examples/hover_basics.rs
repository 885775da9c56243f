// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover and cursor changes from a pointer path across two layers.
//!
//! The pointer sweeps left to right over a point of interest and a place pin. Each
//! hover change is printed once; moves inside the same feature are silent.
//!
//! Run:
//! - `RUST_LOG=waymark_events=debug cargo run -p waymark_demos --example hover_basics`

use kurbo::{Point, Rect};
use tracing_subscriber::EnvFilter;
use waymark_canvas::HeadlessMap;
use waymark_events::{
    Dispatcher, DispatcherConfig, EventType, Feature, InteractiveGroup, LngLat, MapEvent,
    MapSurface, PointerInput,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut map = HeadlessMap::new(12.0);
    map.add_layer("poi-icons", "poi");
    map.add_layer("places-pins", "places");
    map.place(
        "poi-icons",
        Rect::new(20.0, 20.0, 40.0, 40.0),
        Feature::new("poi", "poi-icons", LngLat::new(2.35, 48.85))
            .with_id(1)
            .with_property("name", "Museum"),
    );
    map.place(
        "places-pins",
        Rect::new(80.0, 20.0, 100.0, 40.0),
        Feature::new("places", "places-pins", LngLat::new(2.36, 48.85))
            .with_id("home")
            .with_property("name", "Home"),
    );

    tracing::info!(layers = map.layers().len(), "map ready");
    let mut dispatcher = Dispatcher::new(map, DispatcherConfig::default());
    for group in [
        InteractiveGroup::vector_tile("poi", ["poi-icons"]),
        InteractiveGroup::application_managed("places", ["places-pins"]),
    ] {
        let source = group.source_id.clone();
        dispatcher.events(group).on(EventType::Hover, move |e| {
            match e.feature {
                Some(f) => println!(
                    "[{source}] hover {} ({:?})",
                    f.properties["name"],
                    f.event_state()
                ),
                None => println!("[{source}] hover ended"),
            }
            Ok(())
        });
    }

    for x in (0..=120).step_by(10) {
        let point = Point::new(f64::from(x), 30.0);
        dispatcher.handle(&MapEvent::MouseMove(PointerInput::new(
            point,
            LngLat::default(),
        )));
        println!("  x={x:>3} cursor={:?}", dispatcher.surface().cursor());
    }
}
