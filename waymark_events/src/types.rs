// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the event engine: event kinds, source kinds, groups, pointer input, and native events.
//!
//! ## Overview
//!
//! These types describe the protocol between the host's rendering engine, the
//! [`Dispatcher`](crate::dispatcher::Dispatcher), and consumer handlers.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use kurbo::Point;

use crate::error::EventsError;
use crate::feature::Feature;

/// Semantic event types a consumer can subscribe to.
///
/// Each type has a stable wire name used in configuration and logs; see
/// [`EventType::as_str`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum EventType {
    /// Primary button click.
    Click,
    /// Secondary button click (context menu request).
    ContextMenu,
    /// The topmost interactive feature under the pointer changed.
    Hover,
    /// The pointer rested over a feature for the configured idle period.
    LongHover,
}

impl EventType {
    /// All event types, in declaration order.
    pub const ALL: [Self; 4] = [Self::Click, Self::ContextMenu, Self::Hover, Self::LongHover];

    /// Wire name of this event type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::ContextMenu => "contextmenu",
            Self::Hover => "hover",
            Self::LongHover => "long-hover",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = EventsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| EventsError::UnknownEventType(s.into()))
    }
}

/// Where a group's features live, which decides whether pseudo-state can be persisted.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum SourceKind {
    /// Features decoded from vector tiles. Opaque to the application; nothing can be stored on them.
    #[default]
    VectorTile,
    /// Features whose data the application supplies (for example GeoJSON), so extra
    /// display state can be written back.
    ApplicationManaged,
}

/// A bundle of rendered layers sharing one data source, for which dispatch is active.
///
/// The `source_id` is the group's key; two groups with the same source id are the
/// same group, and their layer ids are merged by the
/// [`Registry`](crate::registry::Registry).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InteractiveGroup {
    /// Data source identifier; unique across groups.
    pub source_id: String,
    /// Rendered layer identifiers belonging to this group.
    pub layer_ids: Vec<String>,
    /// Source kind tag.
    pub kind: SourceKind,
}

impl InteractiveGroup {
    /// Create a group.
    pub fn new<I, L>(source_id: impl Into<String>, layer_ids: I, kind: SourceKind) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self {
            source_id: source_id.into(),
            layer_ids: layer_ids.into_iter().map(Into::into).collect(),
            kind,
        }
    }

    /// Create a group backed by vector tiles.
    pub fn vector_tile<I, L>(source_id: impl Into<String>, layer_ids: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self::new(source_id, layer_ids, SourceKind::VectorTile)
    }

    /// Create a group backed by application-managed data.
    pub fn application_managed<I, L>(source_id: impl Into<String>, layer_ids: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self::new(source_id, layer_ids, SourceKind::ApplicationManaged)
    }

    /// Whether pseudo-state can be persisted on this group's features.
    pub fn is_application_managed(&self) -> bool {
        self.kind == SourceKind::ApplicationManaged
    }
}

/// Geographic coordinate in degrees.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LngLat {
    /// Longitude.
    pub lng: f64,
    /// Latitude.
    pub lat: f64,
}

impl LngLat {
    /// Create a coordinate.
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

/// Pointer position as delivered by a native event.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointerInput {
    /// Position in canvas pixels.
    pub point: Point,
    /// Geographic position under the pointer.
    pub lng_lat: LngLat,
}

impl PointerInput {
    /// Create a pointer input.
    pub const fn new(point: Point, lng_lat: LngLat) -> Self {
        Self { point, lng_lat }
    }
}

/// Native events forwarded by the host from the rendering engine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MapEvent {
    /// Pointer moved over the canvas.
    MouseMove(PointerInput),
    /// Pointer entered the canvas.
    MouseOver(PointerInput),
    /// Pointer left the canvas.
    MouseOut(PointerInput),
    /// A button was pressed.
    MouseDown(PointerInput),
    /// A button was released.
    MouseUp(PointerInput),
    /// Primary click.
    Click(PointerInput),
    /// Secondary click.
    ContextMenu(PointerInput),
    /// The camera started moving (pan, zoom, rotate, fly-to).
    MoveStart,
    /// The zoom level changed.
    Zoom,
}

/// What a handler receives when it is invoked.
///
/// `feature` is `None` for the empty notification sent to a group that lost
/// its hovered or clicked feature.
#[derive(Copy, Clone, Debug)]
pub struct DispatchEvent<'a> {
    /// Event type being delivered.
    pub event_type: EventType,
    /// Pointer position that produced the event.
    pub pointer: PointerInput,
    /// Topmost feature of the owning group, if any.
    pub feature: Option<&'a Feature>,
    /// Full hit-test result, topmost first.
    pub features: &'a [Feature],
    /// Group the handler was registered for.
    pub group: &'a InteractiveGroup,
}
