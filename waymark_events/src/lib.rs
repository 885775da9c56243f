// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=waymark_events --heading-base-level=0

//! Waymark Events: interactive event dispatch for canvas-rendered maps.
//!
//! ## Overview
//!
//! A vector map draws many overlapping layers, grouped by the data source they come
//! from. This crate turns the raw pointer stream over that canvas into semantic
//! `hover`, `long-hover`, `click` and `contextmenu` notifications delivered to the
//! handlers registered for the right source.
//!
//! It does not render or hit-test by itself. The host implements
//! [`MapSurface`](crate::surface::MapSurface) over its rendering engine and forwards
//! native events as [`MapEvent`](crate::types::MapEvent)s.
//!
//! ## Pieces
//!
//! - [`Registry`](crate::registry::Registry): interactive groups, their layers, and
//!   handler lists per event type.
//! - [`Padding`](crate::padding::Padding): hit-test tolerance that follows the zoom.
//! - [`event_state`](crate::event_state): hovered/clicked pseudo-state on
//!   application-managed features.
//! - [`hover`](crate::hover): hover and click sessions and the transition rules.
//! - [`Dispatcher`](crate::dispatcher::Dispatcher): hit tests, runs the state machine,
//!   debounces long-hover and calls handlers.
//! - [`EventsProxy`](crate::facade::EventsProxy): the typed `on`/`off` handle modules use.
//!
//! ## Data flow
//!
//! ```text
//! MapEvent → Dispatcher → MapSurface::query_rendered_features → transition
//!          → EventStateTracker → Registry::handlers → handler(&DispatchEvent)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use waymark_events::config::DispatcherConfig;
//! use waymark_events::dispatcher::Dispatcher;
//! use waymark_events::surface::MapSurface;
//! use waymark_events::types::{EventType, InteractiveGroup, MapEvent};
//!
//! fn wire<S: MapSurface>(surface: S, events: impl Iterator<Item = MapEvent>) {
//!     let mut dispatcher = Dispatcher::new(surface, DispatcherConfig::default());
//!     let poi = dispatcher.events(InteractiveGroup::vector_tile("poi", ["poi-icons"]));
//!     poi.on(EventType::Hover, |event| {
//!         println!("hovering {:?}", event.feature.map(|f| f.declared_id()));
//!         Ok(())
//!     });
//!     for event in events {
//!         dispatcher.handle(&event);
//!         dispatcher.poll();
//!     }
//! }
//! ```
//!
//! ## Threading
//!
//! Everything runs on the host's event loop. The only deferred work is the long-hover,
//! a single-slot deadline fired from [`Dispatcher::poll`](crate::dispatcher::Dispatcher::poll).

extern crate alloc;

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod event_state;
pub mod facade;
pub mod feature;
pub mod hover;
pub mod padding;
pub mod registry;
pub mod surface;
pub mod time;
pub mod types;

pub use config::DispatcherConfig;
pub use dispatcher::Dispatcher;
pub use error::{EventsError, EventsResult, HandlerError, HandlerResult};
pub use event_state::EventStates;
pub use facade::EventsProxy;
pub use feature::{Feature, FeatureId, FeatureKey};
pub use registry::Registry;
pub use surface::MapSurface;
pub use types::{EventType, InteractiveGroup, LngLat, MapEvent, PointerInput, SourceKind};
