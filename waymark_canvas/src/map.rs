// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The headless map surface.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use kurbo::Rect;
use serde_json::Value;
use tracing::trace;
use waymark_events::event_state::EventStates;
use waymark_events::feature::{Feature, FeatureKey};
use waymark_events::surface::MapSurface;

/// One feature as drawn: its pixel bounds and the feature reported on hit.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedFeature {
    /// Canvas-space bounds.
    pub bounds: Rect,
    /// Feature returned by hit tests. Its `source` and `layer` follow the owning layer.
    pub feature: Feature,
}

/// A rendered layer: features drawn in order, later ones on top.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedLayer {
    /// Layer identifier.
    pub id: String,
    /// Source the layer draws from.
    pub source: String,
    /// Hidden layers are not hit-tested.
    pub visible: bool,
    /// Features in draw order.
    pub features: Vec<PlacedFeature>,
}

/// The hit-test request most recently served, for inspection in tests.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryRecord {
    /// Region queried.
    pub region: Rect,
    /// Layers the query was restricted to.
    pub layers: Vec<String>,
}

/// An in-memory map surface.
///
/// Layers stack in insertion order; hit tests walk them top-down, so results come back
/// topmost first the way a renderer reports them.
#[derive(Clone, Debug)]
pub struct HeadlessMap {
    layers: Vec<RenderedLayer>,
    zoom: f64,
    moving: bool,
    cursor: String,
    event_states: BTreeMap<FeatureKey, EventStates>,
    stringify_properties: bool,
    last_query: RefCell<Option<QueryRecord>>,
    query_count: Cell<usize>,
}

impl HeadlessMap {
    /// Create an empty map at `zoom`.
    pub fn new(zoom: f64) -> Self {
        Self {
            layers: Vec::new(),
            zoom,
            moving: false,
            cursor: String::new(),
            event_states: BTreeMap::new(),
            stringify_properties: false,
            last_query: RefCell::new(None),
            query_count: Cell::new(0),
        }
    }

    /// Append a layer on top of the existing ones.
    pub fn add_layer(&mut self, id: impl Into<String>, source: impl Into<String>) {
        self.layers.push(RenderedLayer {
            id: id.into(),
            source: source.into(),
            visible: true,
            features: Vec::new(),
        });
    }

    /// Draw `feature` in `layer` with the given bounds, on top of that layer's earlier features.
    ///
    /// Returns `false` if the layer does not exist.
    pub fn place(&mut self, layer: &str, bounds: Rect, mut feature: Feature) -> bool {
        let Some(l) = self.layers.iter_mut().find(|l| l.id == layer) else {
            return false;
        };
        feature.layer = l.id.clone();
        feature.source = l.source.clone();
        l.features.push(PlacedFeature { bounds, feature });
        true
    }

    /// Remove every feature with the given source-qualified identity.
    pub fn remove(&mut self, key: &FeatureKey) -> usize {
        let mut removed = 0;
        for layer in &mut self.layers {
            let before = layer.features.len();
            layer
                .features
                .retain(|p| p.feature.key().as_ref() != Some(key));
            removed += before - layer.features.len();
        }
        removed
    }

    /// Show or hide a layer.
    pub fn set_layer_visible(&mut self, layer: &str, visible: bool) {
        if let Some(l) = self.layers.iter_mut().find(|l| l.id == layer) {
            l.visible = visible;
        }
    }

    /// Layers in draw order.
    pub fn layers(&self) -> &[RenderedLayer] {
        &self.layers
    }

    /// Set the zoom level. Call [`MapEvent::Zoom`](waymark_events::MapEvent::Zoom) on the
    /// dispatcher afterwards, as a renderer would.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    /// Mark the camera as moving or still.
    pub fn set_moving(&mut self, moving: bool) {
        self.moving = moving;
    }

    /// Return object and array properties as JSON strings, mimicking engines that flatten
    /// nested values in hit-test results.
    pub fn set_stringify_properties(&mut self, stringify: bool) {
        self.stringify_properties = stringify;
    }

    /// Pseudo-state stored for a feature.
    pub fn event_state(&self, key: &FeatureKey) -> EventStates {
        self.event_states.get(key).copied().unwrap_or_default()
    }

    /// Every feature currently holding pseudo-state.
    pub fn event_states(&self) -> impl Iterator<Item = (&FeatureKey, EventStates)> + '_ {
        self.event_states.iter().map(|(k, s)| (k, *s))
    }

    /// The most recent hit-test request.
    pub fn last_query(&self) -> Option<QueryRecord> {
        self.last_query.borrow().clone()
    }

    /// Number of hit tests served.
    pub fn query_count(&self) -> usize {
        self.query_count.get()
    }

    fn reported(&self, feature: &Feature) -> Feature {
        let mut out = feature.clone();
        if let Some(key) = out.key() {
            out.set_event_state(self.event_state(&key).label());
        }
        if self.stringify_properties {
            for value in out.properties.values_mut() {
                if value.is_object() || value.is_array() {
                    *value = Value::String(value.to_string());
                }
            }
        }
        out
    }
}

impl Default for HeadlessMap {
    fn default() -> Self {
        Self::new(0.0)
    }
}

// Closed-interval overlap, so degenerate regions (a bare point) still hit.
fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

impl MapSurface for HeadlessMap {
    fn query_rendered_features(&self, region: Rect, layers: &[String]) -> Vec<Feature> {
        self.query_count.set(self.query_count.get() + 1);
        *self.last_query.borrow_mut() = Some(QueryRecord {
            region,
            layers: layers.to_vec(),
        });
        let mut out = Vec::new();
        for layer in self.layers.iter().rev() {
            if !layer.visible || !layers.contains(&layer.id) {
                continue;
            }
            for placed in layer.features.iter().rev() {
                if overlaps(placed.bounds, region) {
                    out.push(self.reported(&placed.feature));
                }
            }
        }
        trace!(hits = out.len(), "headless query");
        out
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn is_moving(&self) -> bool {
        self.moving
    }

    fn cursor(&self) -> String {
        self.cursor.clone()
    }

    fn set_cursor(&mut self, cursor: &str) {
        self.cursor = cursor.into();
    }

    fn set_event_state(&mut self, key: &FeatureKey, states: EventStates) {
        if states.is_empty() {
            self.event_states.remove(key);
        } else {
            self.event_states.insert(key.clone(), states);
        }
    }
}
