// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clocks and the single-slot debounce used for long-hover.
//!
//! ## Model
//!
//! The dispatcher never spawns timers. It records a deadline in a [`DebounceSlot`]
//! and the host event loop calls [`Dispatcher::poll`](crate::dispatcher::Dispatcher::poll)
//! (waking at [`Dispatcher::next_deadline`](crate::dispatcher::Dispatcher::next_deadline)
//! if it wants to be precise). Scheduling always replaces the pending deadline, so at
//! most one long-hover is ever in flight.
//!
//! Time is read through [`Clock`]. Production code uses [`SystemClock`]; tests drive a
//! [`ManualClock`] to advance virtual time deterministically.

use alloc::rc::Rc;
use core::cell::Cell;
use core::time::Duration;
use std::time::Instant;

/// A monotonic time source, measured from an arbitrary origin.
pub trait Clock {
    /// Elapsed time since the clock's origin.
    fn now(&self) -> Duration;
}

/// Wall-clock time from [`Instant`], with the origin at construction.
#[derive(Copy, Clone, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Virtual time advanced by hand. Clones share the same timeline.
///
/// ```
/// use core::time::Duration;
/// use waymark_events::time::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let view = clock.clone();
/// clock.advance(Duration::from_millis(300));
/// assert_eq!(view.now(), Duration::from_millis(300));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// Create a clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Jump to an absolute time.
    pub fn set(&self, to: Duration) {
        self.now.set(to);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// A cancellable single-slot deadline.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DebounceSlot {
    deadline: Option<Duration>,
}

impl DebounceSlot {
    /// Create an idle slot.
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm the slot to fire `delay` after `now`, replacing any pending deadline.
    pub fn schedule(&mut self, now: Duration, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    /// Disarm the slot.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Pending deadline, if armed.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Whether a deadline is pending.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// If the deadline has passed, disarm and return `true`.
    pub fn take_due(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(d) if d <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
