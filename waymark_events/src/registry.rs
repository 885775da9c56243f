// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interactive registry: which groups are interactive, their layers, and their handlers.
//!
//! ## Overview
//!
//! The registry is keyed by source id. Each entry holds the group's merged layer ids
//! and one ordered handler list per [`EventType`]. Hit tests are restricted to
//! [`Registry::interactive_layer_ids`], the union of the layers of every registered
//! group.
//!
//! ## Lifetime of a group
//!
//! - A group is created on first handler registration.
//! - [`Registry::add`] is the one way to hold a group without handlers: its layers are
//!   hit-tested (so hover cursor feedback and pseudo-state work) until the next
//!   removal on that group prunes it or [`Registry::remove_all`] runs.
//! - Removing an event type drops that handler list. The group, and with it its
//!   layers, leaves the registry once it has no handler lists left.
//! - [`Registry::remove_all`] clears everything.
//! - A source keeps the [`SourceKind`](crate::types::SourceKind) it was first
//!   registered with. Registering the same source under the other kind is logged and
//!   refused.
//!
//! The registry is owned per map and shared with facade handles through
//! [`SharedRegistry`].

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use tracing::warn;

use crate::error::HandlerResult;
use crate::feature::Feature;
use crate::types::{DispatchEvent, EventType, InteractiveGroup};

/// A registered handler. Identity is reference identity of the `Rc`.
pub type Handler = Rc<dyn Fn(&DispatchEvent<'_>) -> HandlerResult>;

/// Registry shared between a dispatcher and the facades handed to module code.
pub type SharedRegistry = Rc<RefCell<Registry>>;

struct Entry {
    group: InteractiveGroup,
    handlers: BTreeMap<EventType, Vec<Handler>>,
}

/// Interactive groups, their layer ids and handler lists.
#[derive(Default)]
pub struct Registry {
    groups: BTreeMap<String, Entry>,
    // Union of all member layer ids, sorted and deduplicated.
    layer_ids: Vec<String>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (source, entry) in &self.groups {
            let counts: Vec<(EventType, usize)> =
                entry.handlers.iter().map(|(t, h)| (*t, h.len())).collect();
            map.entry(source, &counts);
        }
        map.finish()
    }
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry behind a [`SharedRegistry`] handle.
    pub fn shared() -> SharedRegistry {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Register `group`, merging its layer ids into an existing entry.
    ///
    /// Idempotent: adding the same group twice leaves no duplicate layer ids. A group
    /// added here without handlers stays registered until a removal on it prunes it.
    ///
    /// Returns `false`, after logging, if the source is already registered with a
    /// different [`SourceKind`](crate::types::SourceKind); nothing is merged in that case.
    pub fn add(&mut self, group: &InteractiveGroup) -> bool {
        if let Some(existing) = self.groups.get(&group.source_id)
            && existing.group.kind != group.kind
        {
            warn!(
                source = %group.source_id,
                registered = ?existing.group.kind,
                requested = ?group.kind,
                "source already registered with another kind; registration ignored"
            );
            return false;
        }
        let entry = self
            .groups
            .entry(group.source_id.clone())
            .or_insert_with(|| Entry {
                group: InteractiveGroup {
                    source_id: group.source_id.clone(),
                    layer_ids: Vec::new(),
                    kind: group.kind,
                },
                handlers: BTreeMap::new(),
            });
        for layer in &group.layer_ids {
            if !entry.group.layer_ids.contains(layer) {
                entry.group.layer_ids.push(layer.clone());
            }
        }
        self.rebuild_layer_ids();
        true
    }

    /// Register `handler` for `(group, event_type)`, creating the group if needed.
    ///
    /// Returns `false` if the very same handler (by reference) was already registered,
    /// or if the source is registered with a different kind.
    pub fn add_event_handler(
        &mut self,
        group: &InteractiveGroup,
        handler: Handler,
        event_type: EventType,
    ) -> bool {
        if !self.add(group) {
            return false;
        }
        let Some(entry) = self.groups.get_mut(&group.source_id) else {
            return false;
        };
        let list = entry.handlers.entry(event_type).or_default();
        if list.iter().any(|h| Rc::ptr_eq(h, &handler)) {
            return false;
        }
        list.push(handler);
        true
    }

    /// Remove one specific handler. Returns `true` if it was registered.
    pub fn remove_event_handler(
        &mut self,
        group: &InteractiveGroup,
        handler: &Handler,
        event_type: EventType,
    ) -> bool {
        let Some(entry) = self.groups.get_mut(&group.source_id) else {
            return false;
        };
        let Some(list) = entry.handlers.get_mut(&event_type) else {
            return false;
        };
        let before = list.len();
        list.retain(|h| !Rc::ptr_eq(h, handler));
        let removed = list.len() != before;
        if list.is_empty() {
            entry.handlers.remove(&event_type);
        }
        self.prune(&group.source_id);
        removed
    }

    /// Drop every handler of `event_type` for `group`.
    ///
    /// The group's layers stop being hit-tested only once it has no handlers of any type.
    pub fn remove(&mut self, event_type: EventType, group: &InteractiveGroup) {
        if let Some(entry) = self.groups.get_mut(&group.source_id) {
            entry.handlers.remove(&event_type);
        }
        self.prune(&group.source_id);
    }

    /// Remove all groups, handlers and layer ids.
    pub fn remove_all(&mut self) {
        self.groups.clear();
        self.layer_ids.clear();
    }

    /// Whether `group` is registered.
    pub fn has(&self, group: &InteractiveGroup) -> bool {
        self.groups.contains_key(&group.source_id)
    }

    /// The registered group for a source id, with merged layer ids.
    pub fn group(&self, source_id: &str) -> Option<&InteractiveGroup> {
        self.groups.get(source_id).map(|e| &e.group)
    }

    /// The group owning a hit-tested feature: by source, else by member layer.
    pub fn group_for_feature(&self, feature: &Feature) -> Option<&InteractiveGroup> {
        self.group(&feature.source).or_else(|| {
            self.groups
                .values()
                .map(|e| &e.group)
                .find(|g| g.layer_ids.contains(&feature.layer))
        })
    }

    /// Whether any handler is registered for `(source_id, event_type)`.
    pub fn has_handlers(&self, source_id: &str, event_type: EventType) -> bool {
        self.groups
            .get(source_id)
            .and_then(|e| e.handlers.get(&event_type))
            .is_some_and(|l| !l.is_empty())
    }

    /// Snapshot of the handlers for `(source_id, event_type)`, in registration order.
    ///
    /// Dispatch iterates this snapshot, so handlers added or removed while an
    /// event is being delivered take effect from the next event.
    pub fn handlers(&self, source_id: &str, event_type: EventType) -> Vec<Handler> {
        self.groups
            .get(source_id)
            .and_then(|e| e.handlers.get(&event_type))
            .cloned()
            .unwrap_or_default()
    }

    /// Union of the layer ids of every registered group, sorted.
    pub fn interactive_layer_ids(&self) -> &[String] {
        &self.layer_ids
    }

    /// Number of registered groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no group is registered.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn prune(&mut self, source_id: &str) {
        if self
            .groups
            .get(source_id)
            .is_some_and(|e| e.handlers.is_empty())
        {
            self.groups.remove(source_id);
            self.rebuild_layer_ids();
        }
    }

    fn rebuild_layer_ids(&mut self) {
        let union: BTreeSet<&String> = self
            .groups
            .values()
            .flat_map(|e| e.group.layer_ids.iter())
            .collect();
        self.layer_ids = union.into_iter().cloned().collect();
    }
}
