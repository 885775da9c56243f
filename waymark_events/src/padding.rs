// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zoom-adaptive hit-test tolerance.
//!
//! Features are easier to hit when zoomed in (they are drawn larger) and harder to
//! tell apart when zoomed out, so the pixel tolerance around the pointer follows the
//! zoom level relative to a baseline captured when the dispatcher was created:
//!
//! ```text
//! padding = max(0, base * (1 + ln(zoom / baseline)))
//! ```
//!
//! where `baseline` is the construction-time zoom rounded to an integer (at least 1).
//! At the baseline the tolerance equals the configured base; it grows smoothly above
//! and shrinks below, and never goes negative.

use kurbo::{Point, Rect};

/// Compute the adaptive padding for `zoom` given a `base` tolerance and a `baseline` zoom.
pub fn adaptive_padding(base: f64, baseline: f64, zoom: f64) -> f64 {
    if !zoom.is_finite() || zoom <= 0.0 {
        return 0.0;
    }
    (base * (1.0 + (zoom / baseline).ln())).max(0.0)
}

/// Current hit-test tolerance and the baseline it is derived from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Padding {
    base: f64,
    baseline: f64,
    adaptive: bool,
    current: f64,
}

impl Padding {
    /// Create a padding state with `base` pixels at `baseline_zoom`.
    pub fn new(base: f64, baseline_zoom: f64, adaptive: bool) -> Self {
        let base = base.max(0.0);
        let baseline = if baseline_zoom.is_finite() {
            baseline_zoom.round().max(1.0)
        } else {
            1.0
        };
        Self {
            base,
            baseline,
            adaptive,
            current: base,
        }
    }

    /// Current tolerance in pixels.
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Integer-rounded baseline zoom.
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Whether zoom changes affect the tolerance.
    pub fn is_adaptive(&self) -> bool {
        self.adaptive
    }

    /// Recompute the tolerance for a new zoom level and return it.
    ///
    /// A no-op when adaptivity is disabled.
    pub fn update(&mut self, zoom: f64) -> f64 {
        if self.adaptive {
            self.current = adaptive_padding(self.base, self.baseline, zoom);
        }
        self.current
    }

    /// The region to hit-test around `point`: the point grown by the tolerance on each axis.
    pub fn hit_region(&self, point: Point) -> Rect {
        Rect::from_points(point, point).inflate(self.current, self.current)
    }
}
