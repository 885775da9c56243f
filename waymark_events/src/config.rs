// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher configuration.
//!
//! Every field is optional when deserializing; missing fields take the defaults below.
//!
//! | field | default |
//! |-------|---------|
//! | `hit_padding` | `5.0` px |
//! | `zoom_adaptive_padding` | `true` |
//! | `cursors.hover` / `.drag` / `.idle` | `"pointer"` / `"grabbing"` / `""` |
//! | `long_hover_delay_after_move_ms` | `800` |
//! | `long_hover_delay_ms` | `300` |

use alloc::string::String;
use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::EventsResult;

/// Cursor styles set on the canvas. An empty string restores the engine default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorStyles {
    /// While an interactive feature is under the pointer.
    pub hover: String,
    /// While a mouse button is held.
    pub drag: String,
    /// Otherwise.
    pub idle: String,
}

impl Default for CursorStyles {
    fn default() -> Self {
        Self {
            hover: "pointer".into(),
            drag: "grabbing".into(),
            idle: String::new(),
        }
    }
}

/// Tunables for a [`Dispatcher`](crate::dispatcher::Dispatcher).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Hit-test tolerance around the pointer, in pixels, at the baseline zoom.
    pub hit_padding: f64,
    /// Scale the tolerance with zoom.
    pub zoom_adaptive_padding: bool,
    /// Cursor styles.
    pub cursors: CursorStyles,
    /// Long-hover delay for the first hover after the camera moved.
    pub long_hover_delay_after_move_ms: u64,
    /// Long-hover delay while the camera is still.
    pub long_hover_delay_ms: u64,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            hit_padding: 5.0,
            zoom_adaptive_padding: true,
            cursors: CursorStyles::default(),
            long_hover_delay_after_move_ms: 800,
            long_hover_delay_ms: 300,
        }
    }
}

impl DispatcherConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> EventsResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Long-hover delay after a camera move.
    pub fn long_hover_delay_after_move(&self) -> Duration {
        Duration::from_millis(self.long_hover_delay_after_move_ms)
    }

    /// Long-hover delay on a still camera.
    pub fn long_hover_delay(&self) -> Duration {
        Duration::from_millis(self.long_hover_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EventsError;

    #[test]
    fn defaults() {
        let c = DispatcherConfig::default();
        assert_eq!(c.hit_padding, 5.0);
        assert!(c.zoom_adaptive_padding);
        assert_eq!(c.cursors.hover, "pointer");
        assert_eq!(c.long_hover_delay_after_move(), Duration::from_millis(800));
        assert_eq!(c.long_hover_delay(), Duration::from_millis(300));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c = DispatcherConfig::from_json(
            r#"{ "hit_padding": 8, "cursors": { "hover": "crosshair" } }"#,
        )
        .unwrap();
        assert_eq!(c.hit_padding, 8.0);
        assert_eq!(c.cursors.hover, "crosshair");
        assert_eq!(c.cursors.drag, "grabbing");
        assert_eq!(c.long_hover_delay_ms, 300);
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        let err = DispatcherConfig::from_json(r#"{ "hit_padding": "wide" }"#).unwrap_err();
        assert!(matches!(err, EventsError::Config(_)));
    }
}
