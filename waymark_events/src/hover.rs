// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover and click sessions: the transient state behind the dispatcher's state machine.
//!
//! ## Hover transitions
//!
//! Only the topmost feature under the pointer counts. Comparing it with the previously
//! hovered feature yields one [`HoverTransition`]:
//!
//! | previous | next | transition |
//! |----------|------|------------|
//! | none | none | [`Unchanged`](HoverTransition::Unchanged) |
//! | none | some | [`Started`](HoverTransition::Started) |
//! | some | none | [`Ended`](HoverTransition::Ended) |
//! | A | A (same identity) | [`Unchanged`](HoverTransition::Unchanged) |
//! | A | B | [`Changed`](HoverTransition::Changed) |
//!
//! `Changed` is atomic: there is no separate leave for A before B is entered.
//!
//! ```
//! use waymark_events::feature::Feature;
//! use waymark_events::hover::{hover_transition, HoverTransition};
//! use waymark_events::types::LngLat;
//!
//! let a = Feature::new("poi", "poi-icons", LngLat::default()).with_id(1);
//! let b = Feature::new("poi", "poi-icons", LngLat::default()).with_id(2);
//! assert_eq!(hover_transition(None, Some(&a)), HoverTransition::Started);
//! assert_eq!(hover_transition(Some(&a), Some(&a)), HoverTransition::Unchanged);
//! assert_eq!(hover_transition(Some(&a), Some(&b)), HoverTransition::Changed);
//! assert_eq!(hover_transition(Some(&b), None), HoverTransition::Ended);
//! ```
//!
//! ## Long-hover
//!
//! [`HoverSession`] owns the long-hover [`DebounceSlot`]. The delay depends on whether
//! this is the first long-hover since the camera last moved: the first one waits longer
//! to let the view settle.

use alloc::vec::Vec;
use core::time::Duration;

use crate::feature::Feature;
use crate::time::DebounceSlot;
use crate::types::{InteractiveGroup, PointerInput};

/// Outcome of comparing the previous and next topmost feature.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum HoverTransition {
    /// Nothing hovered before or after, or the same feature still.
    Unchanged,
    /// A feature became hovered where there was none.
    Started,
    /// The hovered feature went away.
    Ended,
    /// A different feature replaced the hovered one.
    Changed,
}

impl HoverTransition {
    /// Whether handlers should hear about this transition.
    pub fn is_change(self) -> bool {
        self != Self::Unchanged
    }
}

/// Classify the move from `prev` to `next`.
pub fn hover_transition(prev: Option<&Feature>, next: Option<&Feature>) -> HoverTransition {
    match (prev, next) {
        (None, None) => HoverTransition::Unchanged,
        (None, Some(_)) => HoverTransition::Started,
        (Some(_), None) => HoverTransition::Ended,
        (Some(p), Some(n)) if p.is_same(n) => HoverTransition::Unchanged,
        (Some(_), Some(_)) => HoverTransition::Changed,
    }
}

/// Hover state for one dispatcher.
#[derive(Clone, Debug, Default)]
pub struct HoverSession {
    hovered: Option<Feature>,
    group: Option<InteractiveGroup>,
    pointer: Option<PointerInput>,
    features: Vec<Feature>,
    long_hover: DebounceSlot,
    camera_moved: bool,
}

impl HoverSession {
    /// Create an empty session. The camera counts as still.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently hovered feature.
    pub fn hovered(&self) -> Option<&Feature> {
        self.hovered.as_ref()
    }

    /// Group owning the hovered feature.
    pub fn group(&self) -> Option<&InteractiveGroup> {
        self.group.as_ref()
    }

    /// Last pointer position seen.
    pub fn pointer(&self) -> Option<PointerInput> {
        self.pointer
    }

    /// Last hit-test result, topmost first.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Record the latest pointer position and hit-test result.
    pub fn track(&mut self, pointer: PointerInput, features: Vec<Feature>) {
        self.pointer = Some(pointer);
        self.features = features;
    }

    /// Replace the hovered feature and its group, returning the previous pair.
    pub fn replace(
        &mut self,
        feature: Option<Feature>,
        group: Option<InteractiveGroup>,
    ) -> (Option<Feature>, Option<InteractiveGroup>) {
        let prev = (self.hovered.take(), self.group.take());
        self.hovered = feature;
        self.group = group;
        prev
    }

    /// Note that the camera started moving; the next long-hover uses the longer delay.
    pub fn mark_camera_moved(&mut self) {
        self.camera_moved = true;
    }

    /// Whether the camera moved since the last long-hover fired.
    pub fn camera_moved(&self) -> bool {
        self.camera_moved
    }

    /// Pick the long-hover delay for the current camera situation.
    pub fn long_hover_delay(&self, after_move: Duration, still: Duration) -> Duration {
        if self.camera_moved { after_move } else { still }
    }

    /// Arm the long-hover timer, replacing any pending one.
    pub fn schedule_long_hover(&mut self, now: Duration, delay: Duration) {
        self.long_hover.schedule(now, delay);
    }

    /// Disarm the long-hover timer.
    pub fn cancel_long_hover(&mut self) {
        self.long_hover.cancel();
    }

    /// Pending long-hover deadline.
    pub fn long_hover_deadline(&self) -> Option<Duration> {
        self.long_hover.deadline()
    }

    /// If the long-hover deadline passed, disarm it, settle the camera flag and return `true`.
    pub fn take_due_long_hover(&mut self, now: Duration) -> bool {
        if self.long_hover.take_due(now) {
            self.camera_moved = false;
            true
        } else {
            false
        }
    }
}

/// Click state for one dispatcher.
#[derive(Clone, Debug, Default)]
pub struct ClickSession {
    clicked: Option<Feature>,
    group: Option<InteractiveGroup>,
}

impl ClickSession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last clicked feature.
    pub fn clicked(&self) -> Option<&Feature> {
        self.clicked.as_ref()
    }

    /// Group owning the last clicked feature.
    pub fn group(&self) -> Option<&InteractiveGroup> {
        self.group.as_ref()
    }

    /// Replace the clicked feature and its group, returning the previous pair.
    pub fn replace(
        &mut self,
        feature: Option<Feature>,
        group: Option<InteractiveGroup>,
    ) -> (Option<Feature>, Option<InteractiveGroup>) {
        let prev = (self.clicked.take(), self.group.take());
        self.clicked = feature;
        self.group = group;
        prev
    }

    /// Whether `feature` is the current click selection.
    pub fn is_clicked(&self, feature: &Feature) -> bool {
        self.clicked.as_ref().is_some_and(|c| c.is_same(feature))
    }
}
