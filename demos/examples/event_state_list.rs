// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keeping a side list in sync with map selection through event states.
//!
//! Application-managed features carry `hover` and `click` pseudo-states. A list
//! outside the map can force a selection with `put_event_state` and clear it with
//! `clean_event_states`; pointer interaction on the map updates the same states.
//!
//! Run:
//! - `cargo run -p waymark_demos --example event_state_list`

use kurbo::{Point, Rect};
use tracing_subscriber::EnvFilter;
use waymark_canvas::HeadlessMap;
use waymark_events::event_state::{CleanEventStates, PutEventState, PutMode};
use waymark_events::facade::AdaptWith;
use waymark_events::{
    Dispatcher, DispatcherConfig, EventStates, EventType, EventsResult, Feature,
    InteractiveGroup, LngLat, MapEvent, PointerInput,
};

#[derive(Debug)]
struct Shop {
    name: String,
    open: bool,
}

fn print_states(dispatcher: &Dispatcher<HeadlessMap>) {
    let states: Vec<_> = dispatcher
        .surface()
        .event_states()
        .map(|(k, s)| format!("{}={:?}", k.id, s.label()))
        .collect();
    println!("  states: [{}]", states.join(", "));
}

fn main() -> EventsResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let shops = InteractiveGroup::application_managed("shops", ["shops-pins"]);
    let mut map = HeadlessMap::new(14.0);
    map.add_layer("shops-pins", "shops");
    for (i, name) in ["Bakery", "Books", "Bikes"].into_iter().enumerate() {
        let x = 30.0 * i as f64;
        map.place(
            "shops-pins",
            Rect::new(x, 0.0, x + 12.0, 12.0),
            Feature::new("shops", "shops-pins", LngLat::default())
                .with_id(name)
                .with_property("name", name)
                .with_property("details", serde_json::json!({ "open": i != 1 })),
        );
    }
    // Some engines hand nested properties back as strings.
    map.set_stringify_properties(true);

    let mut dispatcher = Dispatcher::new(map, DispatcherConfig::default());
    dispatcher
        .events_with(
            shops.clone(),
            AdaptWith(|f: &Feature| {
                Some(Shop {
                    name: f.properties.get("name")?.as_str()?.into(),
                    open: f.properties.get("details")?.get("open")?.as_bool()?,
                })
            }),
        )
        .on(EventType::Click, |e| {
            match &e.item {
                Some(shop) => println!("selected {} (open: {})", shop.name, shop.open),
                None => println!("selection cleared"),
            }
            Ok(())
        });

    println!("list selects Books");
    dispatcher.put_event_state(&PutEventState {
        group: shops.clone(),
        id: "Books".into(),
        state: EventStates::CLICK,
        mode: PutMode::Put,
    })?;
    print_states(&dispatcher);

    println!("map click on Bikes");
    dispatcher.handle(&MapEvent::Click(PointerInput::new(
        Point::new(66.0, 6.0),
        LngLat::default(),
    )));
    print_states(&dispatcher);

    println!("list clears everything");
    let cleared = dispatcher.clean_event_states(&CleanEventStates::default());
    println!("  cleared {cleared}");
    print_states(&dispatcher);
    Ok(())
}
