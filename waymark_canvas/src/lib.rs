// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=waymark_canvas --heading-base-level=0

//! Waymark Canvas: a headless map surface for driving event dispatch without a renderer.
//!
//! [`HeadlessMap`] implements [`MapSurface`](waymark_events::MapSurface) over a stack of
//! layers holding pixel-space rectangles. Hit tests walk the stack from the top, so the
//! first feature returned is the one drawn last, as a real renderer reports it.
//!
//! It also stores the pseudo-state the dispatcher pushes onto features and reports it back
//! in the `eventState` property, and can flatten nested properties into JSON strings the way
//! some engines do, which exercises the dispatcher's property deserialization.
//!
//! ## Example
//!
//! ```
//! use kurbo::{Point, Rect};
//! use waymark_canvas::HeadlessMap;
//! use waymark_events::{Dispatcher, DispatcherConfig, EventType, Feature, InteractiveGroup};
//! use waymark_events::{LngLat, MapEvent, PointerInput};
//!
//! let mut map = HeadlessMap::new(10.0);
//! map.add_layer("poi-icons", "poi");
//! map.place(
//!     "poi-icons",
//!     Rect::new(0.0, 0.0, 10.0, 10.0),
//!     Feature::new("poi", "poi-icons", LngLat::default()).with_id(1),
//! );
//!
//! let mut dispatcher = Dispatcher::new(map, DispatcherConfig::default());
//! dispatcher
//!     .events(InteractiveGroup::vector_tile("poi", ["poi-icons"]))
//!     .on(EventType::Hover, |_| Ok(()));
//! dispatcher.handle(&MapEvent::MouseMove(PointerInput::new(
//!     Point::new(5.0, 5.0),
//!     LngLat::default(),
//! )));
//! assert!(dispatcher.hovered().is_some());
//! assert_eq!(dispatcher.surface().query_count(), 1);
//! ```

mod map;

pub use map::{HeadlessMap, PlacedFeature, QueryRecord, RenderedLayer};
