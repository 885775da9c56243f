// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The rendering-engine boundary.
//!
//! The event core does not draw, load tiles or project coordinates. It only needs a
//! handful of synchronous calls into whatever renders the map, collected in
//! [`MapSurface`]. Hosts implement it over their engine binding; `waymark_canvas`
//! provides a headless implementation for tests and tools.
//!
//! Readiness is the implementor's concern: the dispatcher assumes the surface is
//! interactive whenever it is called and never retries.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;

use crate::event_state::EventStates;
use crate::feature::{Feature, FeatureKey};

/// Synchronous operations the dispatcher performs on the rendering engine.
pub trait MapSurface {
    /// Features drawn in `layers` that intersect `region` (canvas pixels), topmost first.
    ///
    /// Property values may come back JSON-stringified; the dispatcher deserializes them.
    fn query_rendered_features(&self, region: Rect, layers: &[String]) -> Vec<Feature>;

    /// Current zoom level.
    fn zoom(&self) -> f64;

    /// Whether the camera is animating or being panned.
    fn is_moving(&self) -> bool;

    /// Current canvas cursor style.
    fn cursor(&self) -> String;

    /// Set the canvas cursor style.
    fn set_cursor(&mut self, cursor: &str);

    /// Persist the full pseudo-state of an application-managed feature.
    ///
    /// An empty set removes it.
    fn set_event_state(&mut self, key: &FeatureKey, states: EventStates);
}
