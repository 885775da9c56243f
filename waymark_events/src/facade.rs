// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-group facade handed to module code.
//!
//! ## Overview
//!
//! An [`EventsProxy`] binds one [`InteractiveGroup`] to the shared registry and offers
//! typed `on`/`off`. For application-managed groups, the topmost feature is mapped
//! back to the domain object it was built from through a [`FeatureAdapter`] before the
//! consumer's handler runs; vector-tile features pass through unchanged in
//! [`GroupEvent::feature`].
//!
//! ```
//! use waymark_events::facade::{AdaptWith, EventsProxy};
//! use waymark_events::registry::Registry;
//! use waymark_events::types::{EventType, InteractiveGroup};
//!
//! #[derive(Debug)]
//! struct Place { name: String }
//!
//! let registry = Registry::shared();
//! let places = EventsProxy::new(
//!     registry.clone(),
//!     Some(InteractiveGroup::application_managed("places", ["places-pins"])),
//!     AdaptWith(|f: &waymark_events::feature::Feature| {
//!         f.properties.get("name")?.as_str().map(|n| Place { name: n.into() })
//!     }),
//! );
//! places.on(EventType::Click, |event| {
//!     if let Some(place) = &event.item {
//!         println!("clicked {}", place.name);
//!     }
//!     Ok(())
//! });
//! assert!(registry.borrow().has_handlers("places", EventType::Click));
//! ```

use alloc::rc::Rc;
use core::fmt;

use tracing::error;

use crate::error::{EventsError, EventsResult, HandlerResult};
use crate::feature::Feature;
use crate::registry::{Handler, SharedRegistry};
use crate::types::{DispatchEvent, EventType, InteractiveGroup, PointerInput, SourceKind};

/// Maps a raw feature back to the domain object it was derived from.
pub trait FeatureAdapter {
    /// Domain object type.
    type Item;
    /// Map `feature`, or `None` if it does not correspond to a known object.
    fn adapt(&self, feature: &Feature) -> Option<Self::Item>;
}

/// Adapter that hands the deserialized feature itself to handlers.
#[derive(Copy, Clone, Debug, Default)]
pub struct RawFeature;

impl FeatureAdapter for RawFeature {
    type Item = Feature;

    fn adapt(&self, feature: &Feature) -> Option<Feature> {
        Some(feature.clone())
    }
}

/// Adapter built from a closure.
#[derive(Clone, Copy)]
pub struct AdaptWith<F>(pub F);

impl<F> fmt::Debug for AdaptWith<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdaptWith").finish_non_exhaustive()
    }
}

impl<T, F> FeatureAdapter for AdaptWith<F>
where
    F: Fn(&Feature) -> Option<T>,
{
    type Item = T;

    fn adapt(&self, feature: &Feature) -> Option<T> {
        (self.0)(feature)
    }
}

/// What a facade handler receives.
#[derive(Debug)]
pub struct GroupEvent<'a, T> {
    /// Event type being delivered.
    pub event_type: EventType,
    /// Pointer position that produced the event.
    pub pointer: PointerInput,
    /// Topmost feature, deserialized. `None` for an empty notification.
    pub feature: Option<&'a Feature>,
    /// Domain object for application-managed groups, when the adapter recognises the feature.
    pub item: Option<T>,
    /// Full hit-test result, topmost first.
    pub features: &'a [Feature],
    /// The group this facade is bound to.
    pub group: &'a InteractiveGroup,
}

/// Typed `on`/`off` handle for one interactive group.
pub struct EventsProxy<A = RawFeature> {
    registry: SharedRegistry,
    group: Option<InteractiveGroup>,
    adapter: Rc<A>,
}

impl<A> Clone for EventsProxy<A> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
            group: self.group.clone(),
            adapter: Rc::clone(&self.adapter),
        }
    }
}

impl<A> fmt::Debug for EventsProxy<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventsProxy")
            .field("group", &self.group)
            .finish_non_exhaustive()
    }
}

impl<A: FeatureAdapter + 'static> EventsProxy<A> {
    /// Create a proxy. A `None` group yields a detached proxy whose calls are logged and ignored.
    pub fn new(registry: SharedRegistry, group: Option<InteractiveGroup>, adapter: A) -> Self {
        Self {
            registry,
            group,
            adapter: Rc::new(adapter),
        }
    }

    /// The bound group.
    pub fn group(&self) -> Option<&InteractiveGroup> {
        self.group.as_ref()
    }

    fn bound_group(&self) -> EventsResult<&InteractiveGroup> {
        self.group.as_ref().ok_or(EventsError::DetachedProxy)
    }

    /// Whether the bound group is currently registered.
    pub fn is_interactive(&self) -> bool {
        self.group
            .as_ref()
            .is_some_and(|g| self.registry.borrow().has(g))
    }

    /// Register `handler` for `event_type`.
    ///
    /// Returns the registered [`Handler`], or `None` (after logging) on a detached proxy
    /// or when the source is already registered with a different kind.
    pub fn on<F>(&self, event_type: EventType, handler: F) -> Option<Handler>
    where
        F: Fn(&GroupEvent<'_, A::Item>) -> HandlerResult + 'static,
    {
        let group = match self.bound_group() {
            Ok(group) => group,
            Err(err) => {
                error!(event = %event_type, %err, "handler ignored");
                return None;
            }
        };
        let adapter = Rc::clone(&self.adapter);
        let wrapped: Handler = Rc::new(move |event: &DispatchEvent<'_>| {
            let item = match event.group.kind {
                SourceKind::ApplicationManaged => event.feature.and_then(|f| adapter.adapt(f)),
                SourceKind::VectorTile => None,
            };
            handler(&GroupEvent {
                event_type: event.event_type,
                pointer: event.pointer,
                feature: event.feature,
                item,
                features: event.features,
                group: event.group,
            })
        });
        let added = self
            .registry
            .borrow_mut()
            .add_event_handler(group, Rc::clone(&wrapped), event_type);
        added.then_some(wrapped)
    }

    /// Remove every handler of `event_type` for the bound group.
    pub fn off(&self, event_type: EventType) {
        let group = match self.bound_group() {
            Ok(group) => group,
            Err(err) => {
                error!(event = %event_type, %err, "off ignored");
                return;
            }
        };
        self.registry.borrow_mut().remove(event_type, group);
    }
}
