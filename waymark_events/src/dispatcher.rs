// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The event dispatcher: native pointer events in, semantic notifications out.
//!
//! ## Pointer move
//!
//! 1. Ignored while disabled or while the camera moves (avoids hover flicker).
//! 2. Hit-test a region around the pointer, grown by the current [`Padding`], restricted
//!    to the registry's interactive layers. Results arrive topmost first.
//! 3. Deserialize stringified properties.
//! 4. Compare the topmost feature with the hovered one ([`hover_transition`]).
//! 5. On change: flip the hover pseudo-state, swap the cursor, and call the `hover`
//!    handlers of the new feature's group. When the hover ends, the group that held it
//!    gets one empty notification if it has `hover` handlers.
//! 6. Restart the long-hover debounce on a change or on motion over the same feature.
//!
//! ## Long-hover
//!
//! Fired from [`Dispatcher::poll`] once the debounce elapses, unless the hovered feature
//! is the current click selection.
//!
//! ## Click and context menu
//!
//! Synchronous and subject to the same camera guard: hit-test, flip the click
//! pseudo-state, and call the handlers of the clicked feature's group. A click on
//! empty space sends one empty notification to the group that held the previous
//! click, if it has handlers for that event type.
//!
//! ## Handler failures
//!
//! A handler returning `Err` is logged; its siblings still run.
//!
//! ## Reentrancy
//!
//! Handlers are snapshotted before they are called, so handlers registered or removed
//! from inside a handler take effect from the next event.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;
use core::time::Duration;

use kurbo::Point;
use tracing::{debug, trace, warn};

use crate::config::DispatcherConfig;
use crate::error::EventsResult;
use crate::event_state::{
    CleanEventState, CleanEventStates, EventStateTracker, PutEventState, update_event_state,
};
use crate::facade::{EventsProxy, FeatureAdapter, RawFeature};
use crate::feature::{Feature, deserialize_features};
use crate::hover::{ClickSession, HoverSession, HoverTransition, hover_transition};
use crate::padding::Padding;
use crate::registry::{Registry, SharedRegistry};
use crate::surface::MapSurface;
use crate::time::{Clock, SystemClock};
use crate::types::{DispatchEvent, EventType, InteractiveGroup, MapEvent, PointerInput};

/// Routes native map events to registered handlers.
///
/// One dispatcher is owned per map, created with it and dropped with it.
///
/// ## Usage
///
/// - Construct with [`Dispatcher::new`] (wall clock) or [`Dispatcher::with_clock`].
/// - Hand [`EventsProxy`] handles from [`Dispatcher::events`] to module code.
/// - Forward every native event to [`Dispatcher::handle`].
/// - Call [`Dispatcher::poll`] from the event loop; [`Dispatcher::next_deadline`]
///   says when the next long-hover is due.
pub struct Dispatcher<S, C = SystemClock> {
    surface: S,
    clock: C,
    config: DispatcherConfig,
    registry: SharedRegistry,
    padding: Padding,
    hover: HoverSession,
    click: ClickSession,
    states: EventStateTracker,
    enabled: bool,
    button_down: bool,
}

impl<S, C> fmt::Debug for Dispatcher<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("enabled", &self.enabled)
            .field("padding", &self.padding.current())
            .field("hovered", &self.hover.hovered().map(Feature::key))
            .field("clicked", &self.click.clicked().map(Feature::key))
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl<S: MapSurface> Dispatcher<S, SystemClock> {
    /// Create a dispatcher driven by the wall clock.
    pub fn new(surface: S, config: DispatcherConfig) -> Self {
        Self::with_clock(surface, SystemClock::new(), config)
    }
}

impl<S: MapSurface, C: Clock> Dispatcher<S, C> {
    /// Create a dispatcher with an explicit clock.
    ///
    /// The surface's current zoom becomes the baseline for adaptive padding.
    pub fn with_clock(surface: S, clock: C, config: DispatcherConfig) -> Self {
        let padding = Padding::new(
            config.hit_padding,
            surface.zoom(),
            config.zoom_adaptive_padding,
        );
        Self {
            surface,
            clock,
            config,
            registry: Registry::shared(),
            padding,
            hover: HoverSession::new(),
            click: ClickSession::new(),
            states: EventStateTracker::new(),
            enabled: true,
            button_down: false,
        }
    }

    /// The registry shared with facades.
    pub fn registry(&self) -> SharedRegistry {
        Rc::clone(&self.registry)
    }

    /// A facade for `group` that hands raw features to handlers.
    pub fn events(&self, group: InteractiveGroup) -> EventsProxy<RawFeature> {
        EventsProxy::new(self.registry(), Some(group), RawFeature)
    }

    /// A facade for `group` that maps features through `adapter`.
    pub fn events_with<A: FeatureAdapter + 'static>(
        &self,
        group: InteractiveGroup,
        adapter: A,
    ) -> EventsProxy<A> {
        EventsProxy::new(self.registry(), Some(group), adapter)
    }

    /// Enable or disable dispatch.
    ///
    /// Disabling cancels a pending long-hover and stops hit-testing. Hover and click
    /// sessions are kept, so re-enabling resumes without transition events.
    pub fn enable(&mut self, enabled: bool) {
        if !enabled {
            self.hover.cancel_long_hover();
        }
        if self.enabled != enabled {
            debug!(enabled, "dispatcher toggled");
        }
        self.enabled = enabled;
    }

    /// Whether dispatch is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The rendering surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The rendering surface, mutably.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The active configuration.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Current hit-test tolerance in pixels.
    pub fn padding(&self) -> f64 {
        self.padding.current()
    }

    /// Currently hovered feature.
    pub fn hovered(&self) -> Option<&Feature> {
        self.hover.hovered()
    }

    /// Last clicked feature.
    pub fn clicked(&self) -> Option<&Feature> {
        self.click.clicked()
    }

    /// Pseudo-state bookkeeping.
    pub fn event_states(&self) -> &EventStateTracker {
        &self.states
    }

    /// When the pending long-hover is due, on the dispatcher's clock.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.hover.long_hover_deadline()
    }

    /// Process one native event.
    pub fn handle(&mut self, event: &MapEvent) {
        match *event {
            MapEvent::MouseMove(pointer) | MapEvent::MouseOver(pointer) => {
                self.pointer_moved(pointer);
            }
            MapEvent::MouseOut(pointer) => {
                if self.enabled {
                    self.update_hover(pointer, Vec::new());
                }
            }
            MapEvent::MouseDown(_) => {
                self.button_down = true;
                self.surface.set_cursor(&self.config.cursors.drag);
            }
            MapEvent::MouseUp(_) => {
                self.button_down = false;
                let cursor = if self.hover.hovered().is_some() {
                    &self.config.cursors.hover
                } else {
                    &self.config.cursors.idle
                };
                self.surface.set_cursor(cursor);
            }
            MapEvent::Click(pointer) => self.pointer_clicked(EventType::Click, pointer),
            MapEvent::ContextMenu(pointer) => {
                self.pointer_clicked(EventType::ContextMenu, pointer);
            }
            MapEvent::MoveStart => {
                self.hover.mark_camera_moved();
                self.hover.cancel_long_hover();
            }
            MapEvent::Zoom => {
                if self.config.zoom_adaptive_padding {
                    let padding = self.padding.update(self.surface.zoom());
                    debug!(padding, "hit padding updated");
                }
            }
        }
    }

    /// Fire the long-hover if it is due. Returns `true` if handlers were notified.
    pub fn poll(&mut self) -> bool {
        if !self.enabled || !self.hover.take_due_long_hover(self.clock.now()) {
            return false;
        }
        let (Some(feature), Some(group)) = (self.hover.hovered(), self.hover.group()) else {
            return false;
        };
        if self.click.is_clicked(feature) {
            debug!(source = %group.source_id, "long hover skipped on clicked feature");
            return false;
        }
        debug!(source = %group.source_id, id = ?feature.declared_id(), "long hover");
        let pointer = self.hover.pointer().unwrap_or_default();
        notify(
            &self.registry,
            EventType::LongHover,
            group,
            pointer,
            Some(feature),
            self.hover.features(),
        );
        true
    }

    /// Force a feature into a pseudo-state from outside the pointer path.
    pub fn put_event_state(&mut self, options: &PutEventState) -> EventsResult<()> {
        self.states.put(&mut self.surface, options)
    }

    /// Remove pseudo-state from one feature.
    pub fn clean_event_state(&mut self, options: &CleanEventState) -> EventsResult<()> {
        self.states.clean(&mut self.surface, options)
    }

    /// Remove pseudo-state from many features. Returns how many changed.
    pub fn clean_event_states(&mut self, options: &CleanEventStates) -> usize {
        self.states.clean_many(&mut self.surface, options)
    }

    fn pointer_moved(&mut self, pointer: PointerInput) {
        if !self.enabled || self.surface.is_moving() {
            return;
        }
        let features = self.hit_test(pointer.point);
        self.update_hover(pointer, features);
    }

    fn update_hover(&mut self, pointer: PointerInput, features: Vec<Feature>) {
        let (next, next_group) = self.resolve_top(&features);
        let transition = hover_transition(self.hover.hovered(), next.as_ref());
        if !transition.is_change() {
            self.hover.track(pointer, features);
            if self.hover.hovered().is_some() {
                self.restart_long_hover();
            }
            return;
        }

        let change = update_event_state(
            EventType::Hover,
            next.as_ref(),
            self.hover.hovered(),
            next_group.as_ref(),
            self.hover.group(),
        );
        let handed = self.states.apply(&change, &mut self.surface);
        let (_, prev_group) = self.hover.replace(handed.clone(), next_group.clone());
        self.hover.track(pointer, features);

        if !self.button_down {
            match transition {
                HoverTransition::Started => self.surface.set_cursor(&self.config.cursors.hover),
                HoverTransition::Ended => self.surface.set_cursor(&self.config.cursors.idle),
                HoverTransition::Changed | HoverTransition::Unchanged => {}
            }
        }
        debug!(
            ?transition,
            source = next_group.as_ref().map(|g| g.source_id.as_str()),
            "hover changed"
        );

        match (&handed, &next_group) {
            (Some(feature), Some(group)) => {
                notify(
                    &self.registry,
                    EventType::Hover,
                    group,
                    pointer,
                    Some(feature),
                    self.hover.features(),
                );
            }
            _ => {
                if let Some(group) = &prev_group {
                    notify(
                        &self.registry,
                        EventType::Hover,
                        group,
                        pointer,
                        None,
                        self.hover.features(),
                    );
                }
            }
        }

        if self.hover.hovered().is_some() {
            self.restart_long_hover();
        } else {
            self.hover.cancel_long_hover();
        }
    }

    fn pointer_clicked(&mut self, event_type: EventType, pointer: PointerInput) {
        if !self.enabled || self.surface.is_moving() {
            return;
        }
        let features = self.hit_test(pointer.point);
        let (next, next_group) = self.resolve_top(&features);

        let change = update_event_state(
            event_type,
            next.as_ref(),
            self.click.clicked(),
            next_group.as_ref(),
            self.click.group(),
        );
        let handed = self.states.apply(&change, &mut self.surface);
        let (_, prev_group) = self.click.replace(handed.clone(), next_group.clone());
        debug!(
            event = %event_type,
            source = next_group.as_ref().map(|g| g.source_id.as_str()),
            "pointer clicked"
        );

        match (&handed, &next_group) {
            (Some(feature), Some(group)) => {
                notify(
                    &self.registry,
                    event_type,
                    group,
                    pointer,
                    Some(feature),
                    &features,
                );
            }
            _ => {
                if let Some(group) = &prev_group {
                    notify(&self.registry, event_type, group, pointer, None, &features);
                }
            }
        }
    }

    fn restart_long_hover(&mut self) {
        let delay = self.hover.long_hover_delay(
            self.config.long_hover_delay_after_move(),
            self.config.long_hover_delay(),
        );
        self.hover.schedule_long_hover(self.clock.now(), delay);
    }

    fn hit_test(&self, point: Point) -> Vec<Feature> {
        let registry = self.registry.borrow();
        let layers = registry.interactive_layer_ids();
        if layers.is_empty() {
            return Vec::new();
        }
        let region = self.padding.hit_region(point);
        let mut features = self.surface.query_rendered_features(region, layers);
        deserialize_features(&mut features);
        trace!(hits = features.len(), padding = self.padding.current(), "hit test");
        features
    }

    // Topmost feature and its owning group; both present or both absent.
    fn resolve_top(&self, features: &[Feature]) -> (Option<Feature>, Option<InteractiveGroup>) {
        let registry = self.registry.borrow();
        let top = features.first().and_then(|f| {
            registry
                .group_for_feature(f)
                .map(|g| (f.clone(), g.clone()))
        });
        top.unzip()
    }
}

fn notify(
    registry: &SharedRegistry,
    event_type: EventType,
    group: &InteractiveGroup,
    pointer: PointerInput,
    feature: Option<&Feature>,
    features: &[Feature],
) -> usize {
    let handlers = registry.borrow().handlers(&group.source_id, event_type);
    let event = DispatchEvent {
        event_type,
        pointer,
        feature,
        features,
        group,
    };
    for handler in &handlers {
        if let Err(err) = handler(&event) {
            warn!(
                source = %group.source_id,
                event = %event_type,
                error = %err,
                "event handler failed"
            );
        }
    }
    handlers.len()
}
