//! Host document abstraction.
//!
//! The reconciler never touches a concrete document. It drives the
//! [`HostDom`] trait - the injected host primitives this core consumes:
//! create element/text nodes, attach/detach children, get/set named
//! properties, add/remove event listeners. Fibers store the backend's
//! opaque `Node` handle.
//!
//! [`memory::MemoryDom`] is the in-tree reference backend, used by the test
//! suite and by headless embedders.

pub mod memory;

use std::fmt;

use crate::types::{EventCallback, PropValue, Props, event_name, is_event};

// =============================================================================
// HostDom
// =============================================================================

/// The host primitives the committer consumes.
///
/// Implementations are expected to be lenient: operating on a handle the
/// backend no longer knows is a silent no-op, not a fault. The core never
/// classifies backend failures - an unknown tag name surfaces however the
/// backend chooses to surface it.
pub trait HostDom {
    /// Opaque node handle stored in fibers.
    type Node: Copy + Eq + fmt::Debug;

    /// Create an element node for the given tag identifier.
    fn create_element(&mut self, tag: &str) -> Self::Node;

    /// Create a text node with the given content.
    fn create_text(&mut self, text: &str) -> Self::Node;

    /// Attach `child` as the last child of `parent`.
    fn append_child(&mut self, parent: Self::Node, child: Self::Node);

    /// Detach `child` from `parent`.
    fn remove_child(&mut self, parent: Self::Node, child: Self::Node);

    /// Assign a named property on a node.
    fn set_property(&mut self, node: Self::Node, name: &str, value: &PropValue);

    /// Reset a named property to its default (the property was removed).
    fn clear_property(&mut self, node: Self::Node, name: &str);

    /// Attach an event listener by host event name.
    fn add_event_listener(&mut self, node: Self::Node, event: &str, handler: EventCallback);

    /// Detach the event listener registered under the host event name.
    fn remove_event_listener(&mut self, node: Self::Node, event: &str);
}

// =============================================================================
// Property / listener sync
// =============================================================================

/// Reconcile a live node's properties and listeners from `prev` to `next`.
///
/// Runs in four phases, in this exact order, so that a changed listener is
/// never briefly double-attached:
///
/// 1. detach listeners whose key is gone from `next` or whose handler changed
/// 2. clear non-event properties absent from `next`
/// 3. assign non-event properties that are new or changed
/// 4. attach listeners that are new or changed
///
/// Handler "changed" means pointer inequality (see
/// [`PropValue`](crate::PropValue)). Children never pass through here; they
/// are tree structure, not properties.
pub fn sync_props<H: HostDom>(host: &mut H, node: H::Node, prev: &Props, next: &Props) {
    // Phase 1: stale or changed listeners.
    for (name, value) in prev.iter() {
        if !is_event(name) {
            continue;
        }
        let gone_or_changed = next.get(name) != Some(value);
        if gone_or_changed {
            host.remove_event_listener(node, &event_name(name));
        }
    }

    // Phase 2: removed properties.
    for (name, _) in prev.iter() {
        if is_event(name) {
            continue;
        }
        if next.get(name).is_none() {
            host.clear_property(node, name);
        }
    }

    // Phase 3: new or changed properties.
    for (name, value) in next.iter() {
        if is_event(name) {
            continue;
        }
        if prev.get(name) != Some(value) {
            host.set_property(node, name, value);
        }
    }

    // Phase 4: new or changed listeners.
    for (name, value) in next.iter() {
        if !is_event(name) {
            continue;
        }
        if prev.get(name) != Some(value) {
            if let PropValue::Handler(handler) = value {
                host.add_event_listener(node, &event_name(name), handler.clone());
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
