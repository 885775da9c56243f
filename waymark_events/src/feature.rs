// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit-tested features, their identity, and property deserialization.
//!
//! ## Identity
//!
//! A feature's *declared* identity is its `id` property when present (number or
//! string), falling back to the engine-assigned [`Feature::id`]. Two features are
//! the same when their sources and declared identities match. Features without any
//! identity compare structurally.
//!
//! ## Stringified properties
//!
//! Rendering engines flatten nested property values into JSON strings when they
//! hand features back from a hit test. [`deserialize_properties`] undoes that on a
//! best-effort basis: only strings that look like JSON objects or arrays are parsed,
//! and a failed parse keeps the original string.

use alloc::string::{String, ToString};
use core::fmt;

use serde_json::{Map, Value};

use crate::types::LngLat;

/// Property carrying the pseudo-state label on application-managed features.
pub const EVENT_STATE_PROPERTY: &str = "eventState";

/// Property holding a feature's declared id.
pub const ID_PROPERTY: &str = "id";

/// Feature identifier, as assigned by the engine or declared in properties.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum FeatureId {
    /// Numeric id.
    Int(i64),
    /// String id.
    Str(String),
}

impl FeatureId {
    /// Read an id from a JSON value. Integral numbers and strings qualify.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Int),
            Value::String(s) => Some(Self::Str(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for FeatureId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for FeatureId {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<&str> for FeatureId {
    fn from(s: &str) -> Self {
        Self::Str(s.into())
    }
}

impl From<String> for FeatureId {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

/// Source-qualified feature identity, used to address pseudo-state.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FeatureKey {
    /// Source the feature belongs to.
    pub source: String,
    /// Declared identity within the source.
    pub id: FeatureId,
}

impl FeatureKey {
    /// Create a key.
    pub fn new(source: impl Into<String>, id: impl Into<FeatureId>) -> Self {
        Self {
            source: source.into(),
            id: id.into(),
        }
    }
}

/// A feature returned by a hit test.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    /// Engine-assigned id, if the source provides one.
    pub id: Option<FeatureId>,
    /// Source the feature was drawn from.
    pub source: String,
    /// Rendered layer the feature was drawn in.
    pub layer: String,
    /// Representative geographic point.
    pub geometry: LngLat,
    /// Property bag.
    pub properties: Map<String, Value>,
}

impl Feature {
    /// Create a feature with no id and no properties.
    pub fn new(source: impl Into<String>, layer: impl Into<String>, geometry: LngLat) -> Self {
        Self {
            id: None,
            source: source.into(),
            layer: layer.into(),
            geometry,
            properties: Map::new(),
        }
    }

    /// Set the engine-assigned id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<FeatureId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set a property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Declared identity: the `id` property if usable, else the engine id.
    pub fn declared_id(&self) -> Option<FeatureId> {
        self.properties
            .get(ID_PROPERTY)
            .and_then(FeatureId::from_json)
            .or_else(|| self.id.clone())
    }

    /// Source-qualified identity, if the feature has one.
    pub fn key(&self) -> Option<FeatureKey> {
        self.declared_id().map(|id| FeatureKey {
            source: self.source.clone(),
            id,
        })
    }

    /// Whether `self` and `other` denote the same feature.
    pub fn is_same(&self, other: &Self) -> bool {
        match (self.declared_id(), other.declared_id()) {
            (Some(a), Some(b)) => a == b && self.source == other.source,
            (None, None) => self == other,
            _ => false,
        }
    }

    /// The pseudo-state label, if one is set.
    pub fn event_state(&self) -> Option<&str> {
        self.properties
            .get(EVENT_STATE_PROPERTY)
            .and_then(Value::as_str)
    }

    /// Set or clear the pseudo-state label.
    pub fn set_event_state(&mut self, label: Option<&str>) {
        match label {
            Some(l) => {
                self.properties
                    .insert(EVENT_STATE_PROPERTY.into(), Value::String(l.to_string()));
            }
            None => {
                self.properties.remove(EVENT_STATE_PROPERTY);
            }
        }
    }
}

/// Parse JSON-stringified property values in place.
///
/// Strings whose trimmed form starts with `{` or `[` are parsed; anything that
/// fails to parse is left untouched. Scalars are never reinterpreted, so a
/// postcode like `"01234"` stays a string.
pub fn deserialize_properties(properties: &mut Map<String, Value>) {
    for value in properties.values_mut() {
        let Value::String(raw) = value else {
            continue;
        };
        let trimmed = raw.trim_start();
        if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
            continue;
        }
        if let Ok(parsed) = serde_json::from_str::<Value>(raw) {
            *value = parsed;
        }
    }
}

/// Deserialize the properties of every feature in a hit-test result.
pub fn deserialize_features(features: &mut [Feature]) {
    for f in features {
        deserialize_properties(&mut f.properties);
    }
}
