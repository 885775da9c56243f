// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event state: transient hovered/clicked pseudo-state on features.
//!
//! ## Overview
//!
//! Application-managed sources can carry extra display state, which styles use to
//! highlight the hovered or selected feature. Vector-tile features are opaque, so for
//! them every operation here is a passthrough.
//!
//! - [`update_event_state`] is pure. Given the previous and the new feature of a
//!   transition it returns an [`EventStateChange`] describing which feature loses the
//!   flag and which gains it.
//! - [`EventStateTracker`] applies changes to a [`MapSurface`] and keeps a ledger of
//!   marked features, so both halves of a change land in one synchronous call and
//!   observers never see both or neither feature marked. It returns the feature to hand
//!   to handlers, labelled from the feature's combined state.
//! - The imperative helpers ([`EventStateTracker::put`], [`EventStateTracker::clean`],
//!   [`EventStateTracker::clean_many`]) let consumers drive the same visual state from
//!   outside the pointer path, e.g. highlighting a map pin while a list row is hovered.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use bitflags::bitflags;

use crate::error::{EventsError, EventsResult};
use crate::feature::{Feature, FeatureId, FeatureKey};
use crate::surface::MapSurface;
use crate::types::{EventType, InteractiveGroup};

bitflags! {
    /// Pseudo-states a feature can hold. A feature may be hovered and clicked at once.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EventStates: u8 {
        /// The pointer is over the feature.
        const HOVER = 1 << 0;
        /// The feature is the current click selection.
        const CLICK = 1 << 1;
    }
}

impl EventStates {
    /// The state an event type toggles.
    pub const fn for_event(event_type: EventType) -> Self {
        match event_type {
            EventType::Hover | EventType::LongHover => Self::HOVER,
            EventType::Click | EventType::ContextMenu => Self::CLICK,
        }
    }

    /// Label written into the feature's `eventState` property. Click wins over hover.
    pub fn label(self) -> Option<&'static str> {
        if self.contains(Self::CLICK) {
            Some("click")
        } else if self.contains(Self::HOVER) {
            Some("hover")
        } else {
            None
        }
    }
}

/// Result of [`update_event_state`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventStateChange {
    /// State being toggled.
    pub kind: EventStates,
    /// Feature losing the state, keyed by the source id of the group it was resolved to.
    pub cleared: Option<FeatureKey>,
    /// Feature gaining the state, keyed by the source id of its owning group.
    pub marked: Option<FeatureKey>,
    /// The new feature, unlabelled. [`EventStateTracker::apply`] returns the copy
    /// handed to handlers.
    pub feature: Option<Feature>,
}

impl EventStateChange {
    /// Whether applying this change touches any feature.
    pub fn is_noop(&self) -> bool {
        self.cleared.is_none() && self.marked.is_none()
    }
}

// Pseudo-state lives under the owning group's source id, which may differ from the
// feature's own source when the group was matched by layer.
fn state_key(feature: &Feature, group: &InteractiveGroup) -> Option<FeatureKey> {
    if !group.is_application_managed() {
        return None;
    }
    feature
        .declared_id()
        .map(|id| FeatureKey::new(group.source_id.clone(), id))
}

/// Compute the pseudo-state transition from `prev_feature` to `new_feature`.
///
/// Only features of application-managed groups take part; vector-tile features pass
/// through unchanged. Re-selecting the same feature does not clear it.
pub fn update_event_state(
    event_type: EventType,
    new_feature: Option<&Feature>,
    prev_feature: Option<&Feature>,
    new_group: Option<&InteractiveGroup>,
    prev_group: Option<&InteractiveGroup>,
) -> EventStateChange {
    let kind = EventStates::for_event(event_type);

    let marked = match (new_feature, new_group) {
        (Some(f), Some(g)) => state_key(f, g),
        _ => None,
    };
    let cleared = match (prev_feature, prev_group) {
        (Some(p), Some(g)) => state_key(p, g).filter(|key| marked.as_ref() != Some(key)),
        _ => None,
    };

    EventStateChange {
        kind,
        cleared,
        marked,
        feature: new_feature.cloned(),
    }
}

/// How [`EventStateTracker::put`] treats other features of the same source.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum PutMode {
    /// The target becomes the only feature of its source holding the state.
    #[default]
    Put,
    /// The target gains the state; others keep theirs.
    Add,
}

/// Options for [`EventStateTracker::put`].
#[derive(Clone, Debug)]
pub struct PutEventState {
    /// Group the feature belongs to; must be application-managed.
    pub group: InteractiveGroup,
    /// Declared id of the feature.
    pub id: FeatureId,
    /// State to set.
    pub state: EventStates,
    /// Exclusive or additive.
    pub mode: PutMode,
}

/// Options for [`EventStateTracker::clean`].
#[derive(Clone, Debug)]
pub struct CleanEventState {
    /// Group the feature belongs to; must be application-managed.
    pub group: InteractiveGroup,
    /// Declared id of the feature.
    pub id: FeatureId,
    /// States to remove. [`EventStates::all`] cleans the feature entirely.
    pub states: EventStates,
}

/// Options for [`EventStateTracker::clean_many`]. The default cleans everything.
#[derive(Clone, Debug)]
pub struct CleanEventStates {
    /// Restrict to one source.
    pub source_id: Option<alloc::string::String>,
    /// States to remove.
    pub states: EventStates,
}

impl Default for CleanEventStates {
    fn default() -> Self {
        Self {
            source_id: None,
            states: EventStates::all(),
        }
    }
}

/// Applies event-state changes to a surface and remembers what is marked.
#[derive(Clone, Debug, Default)]
pub struct EventStateTracker {
    ledger: BTreeMap<FeatureKey, EventStates>,
}

impl EventStateTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// States currently held by `key`.
    pub fn states_of(&self, key: &FeatureKey) -> EventStates {
        self.ledger.get(key).copied().unwrap_or_default()
    }

    /// Every marked feature and its states.
    pub fn marked(&self) -> impl Iterator<Item = (&FeatureKey, EventStates)> + '_ {
        self.ledger.iter().map(|(k, s)| (k, *s))
    }

    /// Apply a change computed by [`update_event_state`].
    ///
    /// Returns the feature to hand to handlers. A marked feature is labelled from its
    /// combined state, so a clicked feature that gains the hover still reads `"click"`,
    /// matching what the surface reports.
    pub fn apply<S: MapSurface + ?Sized>(
        &mut self,
        change: &EventStateChange,
        surface: &mut S,
    ) -> Option<Feature> {
        if let Some(key) = &change.cleared {
            let states = self.states_of(key) - change.kind;
            self.set(surface, key, states);
        }
        let mut feature = change.feature.clone();
        if let Some(key) = &change.marked {
            let states = self.states_of(key) | change.kind;
            self.set(surface, key, states);
            if let Some(f) = &mut feature {
                f.set_event_state(states.label());
            }
        }
        feature
    }

    /// Force a feature into a state from outside the pointer path.
    pub fn put<S: MapSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        options: &PutEventState,
    ) -> EventsResult<()> {
        require_application_managed(&options.group)?;
        let target = FeatureKey::new(options.group.source_id.clone(), options.id.clone());
        if options.mode == PutMode::Put {
            let others: Vec<FeatureKey> = self
                .ledger
                .iter()
                .filter(|(k, s)| {
                    k.source == target.source && **k != target && s.intersects(options.state)
                })
                .map(|(k, _)| k.clone())
                .collect();
            for key in others {
                let states = self.states_of(&key) - options.state;
                self.set(surface, &key, states);
            }
        }
        let states = self.states_of(&target) | options.state;
        self.set(surface, &target, states);
        Ok(())
    }

    /// Remove states from one feature.
    pub fn clean<S: MapSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        options: &CleanEventState,
    ) -> EventsResult<()> {
        require_application_managed(&options.group)?;
        let key = FeatureKey::new(options.group.source_id.clone(), options.id.clone());
        let states = self.states_of(&key) - options.states;
        self.set(surface, &key, states);
        Ok(())
    }

    /// Remove states from every matching feature. Returns how many features changed.
    pub fn clean_many<S: MapSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        options: &CleanEventStates,
    ) -> usize {
        let targets: Vec<FeatureKey> = self
            .ledger
            .iter()
            .filter(|(k, s)| {
                options
                    .source_id
                    .as_deref()
                    .is_none_or(|src| k.source == src)
                    && s.intersects(options.states)
            })
            .map(|(k, _)| k.clone())
            .collect();
        for key in &targets {
            let states = self.states_of(key) - options.states;
            self.set(surface, key, states);
        }
        targets.len()
    }

    fn set<S: MapSurface + ?Sized>(&mut self, surface: &mut S, key: &FeatureKey, states: EventStates) {
        if self.states_of(key) == states {
            return;
        }
        if states.is_empty() {
            self.ledger.remove(key);
        } else {
            self.ledger.insert(key.clone(), states);
        }
        surface.set_event_state(key, states);
    }
}

fn require_application_managed(group: &InteractiveGroup) -> EventsResult<()> {
    if group.is_application_managed() {
        Ok(())
    } else {
        Err(EventsError::NotApplicationManaged(group.source_id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LngLat;
    use alloc::string::String;
    use kurbo::Rect;

    #[derive(Default)]
    struct Recorder {
        writes: Vec<(FeatureKey, EventStates)>,
    }

    impl MapSurface for Recorder {
        fn query_rendered_features(&self, _: Rect, _: &[String]) -> Vec<Feature> {
            Vec::new()
        }
        fn zoom(&self) -> f64 {
            10.0
        }
        fn is_moving(&self) -> bool {
            false
        }
        fn cursor(&self) -> String {
            String::new()
        }
        fn set_cursor(&mut self, _: &str) {}
        fn set_event_state(&mut self, key: &FeatureKey, states: EventStates) {
            self.writes.push((key.clone(), states));
        }
    }

    fn places() -> InteractiveGroup {
        InteractiveGroup::application_managed("places", ["places-pins"])
    }

    fn tiles() -> InteractiveGroup {
        InteractiveGroup::vector_tile("poi", ["poi-icons"])
    }

    fn place(id: i64) -> Feature {
        Feature::new("places", "places-pins", LngLat::new(0.0, 0.0)).with_property("id", id)
    }

    #[test]
    fn toggles_between_application_features() {
        let (a, b) = (place(1), place(2));
        let g = places();
        let change = update_event_state(EventType::Hover, Some(&b), Some(&a), Some(&g), Some(&g));
        assert_eq!(change.cleared, Some(FeatureKey::new("places", 1)));
        assert_eq!(change.marked, Some(FeatureKey::new("places", 2)));
        assert_eq!(change.feature.as_ref().unwrap().event_state(), None);

        let labelled = EventStateTracker::new().apply(&change, &mut Recorder::default());
        assert_eq!(labelled.unwrap().event_state(), Some("hover"));
    }

    #[test]
    fn keys_follow_the_owning_group() {
        let by_layer = Feature::new("places-v2", "places-pins", LngLat::new(0.0, 0.0)).with_id(4);
        let g = places();
        let change = update_event_state(EventType::Click, Some(&by_layer), None, Some(&g), None);
        assert_eq!(change.marked, Some(FeatureKey::new("places", 4)));

        let unclick = update_event_state(EventType::Click, None, Some(&by_layer), None, Some(&g));
        assert_eq!(unclick.cleared, Some(FeatureKey::new("places", 4)));
    }

    #[test]
    fn vector_tiles_pass_through() {
        let f = Feature::new("poi", "poi-icons", LngLat::new(0.0, 0.0)).with_id(9);
        let g = tiles();
        let change = update_event_state(EventType::Click, Some(&f), None, Some(&g), None);
        assert!(change.is_noop());
        assert_eq!(change.feature.as_ref(), Some(&f));
    }

    #[test]
    fn reselecting_same_feature_keeps_it_marked() {
        let a = place(1);
        let g = places();
        let change = update_event_state(EventType::Click, Some(&a), Some(&a), Some(&g), Some(&g));
        assert_eq!(change.cleared, None);
        assert_eq!(change.marked, Some(FeatureKey::new("places", 1)));
    }

    #[test]
    fn apply_writes_both_halves() {
        let mut surface = Recorder::default();
        let mut tracker = EventStateTracker::new();
        let g = places();
        let c1 = update_event_state(EventType::Hover, Some(&place(1)), None, Some(&g), None);
        tracker.apply(&c1, &mut surface);
        let c2 = update_event_state(
            EventType::Hover,
            Some(&place(2)),
            Some(&place(1)),
            Some(&g),
            Some(&g),
        );
        tracker.apply(&c2, &mut surface);
        assert_eq!(tracker.states_of(&FeatureKey::new("places", 1)), EventStates::empty());
        assert_eq!(tracker.states_of(&FeatureKey::new("places", 2)), EventStates::HOVER);
        assert_eq!(
            surface.writes,
            [
                (FeatureKey::new("places", 1), EventStates::HOVER),
                (FeatureKey::new("places", 1), EventStates::empty()),
                (FeatureKey::new("places", 2), EventStates::HOVER),
            ]
        );
    }

    #[test]
    fn hover_and_click_coexist() {
        let mut surface = Recorder::default();
        let mut tracker = EventStateTracker::new();
        let g = places();
        let click = update_event_state(EventType::Click, Some(&place(1)), None, Some(&g), None);
        tracker.apply(&click, &mut surface);
        let hover = update_event_state(EventType::Hover, Some(&place(1)), None, Some(&g), None);
        let handed = tracker.apply(&hover, &mut surface);
        let key = FeatureKey::new("places", 1);
        assert_eq!(tracker.states_of(&key), EventStates::HOVER | EventStates::CLICK);
        assert_eq!(handed.unwrap().event_state(), Some("click"));

        let unhover = update_event_state(EventType::Hover, None, Some(&place(1)), None, Some(&g));
        assert!(tracker.apply(&unhover, &mut surface).is_none());
        assert_eq!(tracker.states_of(&key), EventStates::CLICK);
    }

    #[test]
    fn put_is_exclusive_per_source_and_add_is_not() {
        let mut surface = Recorder::default();
        let mut tracker = EventStateTracker::new();
        let put = |id: i64, mode| PutEventState {
            group: places(),
            id: FeatureId::Int(id),
            state: EventStates::HOVER,
            mode,
        };
        tracker.put(&mut surface, &put(1, PutMode::Put)).unwrap();
        tracker.put(&mut surface, &put(2, PutMode::Add)).unwrap();
        assert_eq!(tracker.marked().count(), 2);
        tracker.put(&mut surface, &put(3, PutMode::Put)).unwrap();
        let marked: Vec<_> = tracker.marked().map(|(k, _)| k.id.clone()).collect();
        assert_eq!(marked, [FeatureId::Int(3)]);
    }

    #[test]
    fn imperative_helpers_reject_vector_tiles() {
        let mut surface = Recorder::default();
        let mut tracker = EventStateTracker::new();
        let err = tracker
            .put(
                &mut surface,
                &PutEventState {
                    group: tiles(),
                    id: FeatureId::Int(1),
                    state: EventStates::CLICK,
                    mode: PutMode::Put,
                },
            )
            .unwrap_err();
        assert!(matches!(err, EventsError::NotApplicationManaged(ref s) if s == "poi"));
        assert!(surface.writes.is_empty());
    }

    #[test]
    fn clean_and_clean_many() {
        let mut surface = Recorder::default();
        let mut tracker = EventStateTracker::new();
        for id in 1..=3 {
            tracker
                .put(
                    &mut surface,
                    &PutEventState {
                        group: places(),
                        id: FeatureId::Int(id),
                        state: EventStates::CLICK,
                        mode: PutMode::Add,
                    },
                )
                .unwrap();
        }
        tracker
            .clean(
                &mut surface,
                &CleanEventState {
                    group: places(),
                    id: FeatureId::Int(2),
                    states: EventStates::all(),
                },
            )
            .unwrap();
        assert_eq!(tracker.marked().count(), 2);

        let other = CleanEventStates {
            source_id: Some("elsewhere".into()),
            states: EventStates::all(),
        };
        assert_eq!(tracker.clean_many(&mut surface, &other), 0);
        assert_eq!(tracker.clean_many(&mut surface, &CleanEventStates::default()), 2);
        assert_eq!(tracker.marked().count(), 0);
    }
}
