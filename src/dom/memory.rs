//! In-memory host document.
//!
//! [`MemoryDom`] is the crate's reference [`HostDom`] backend: a slotmap of
//! element/text nodes with ordered properties, named listeners, and child
//! lists. It exists so the reconciler can be exercised end-to-end without a
//! real document - dispatch simulated events, snapshot subtrees as markup,
//! and count mutations to prove what a commit did (and did not) touch.

use std::fmt::Write as _;

use indexmap::IndexMap;
use slotmap::{SlotMap, new_key_type};

use super::HostDom;
use crate::element::NODE_VALUE;
use crate::types::{Event, EventCallback, PropValue};

new_key_type! {
    /// Handle to one node in a [`MemoryDom`].
    pub struct NodeId;
}

struct MemoryNode {
    /// Tag name; `None` marks a text node.
    tag: Option<String>,
    props: IndexMap<String, PropValue>,
    listeners: IndexMap<String, EventCallback>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl MemoryNode {
    fn element(tag: &str) -> Self {
        Self {
            tag: Some(tag.to_string()),
            props: IndexMap::new(),
            listeners: IndexMap::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    fn text(content: &str) -> Self {
        let mut props = IndexMap::new();
        props.insert(NODE_VALUE.to_string(), PropValue::Str(content.to_string()));
        Self {
            tag: None,
            props,
            listeners: IndexMap::new(),
            children: Vec::new(),
            parent: None,
        }
    }
}

// =============================================================================
// Mutation counters
// =============================================================================

/// Counts of the mutations a [`MemoryDom`] has performed.
///
/// Only operations that actually took effect are counted; calls on stale
/// handles are silent no-ops. Reset with [`MemoryDom::reset_ops`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DomOps {
    /// Children attached (including moves).
    pub appends: usize,
    /// Children detached.
    pub removes: usize,
    /// Property assignments.
    pub property_writes: usize,
    /// Property resets.
    pub property_clears: usize,
    /// Listeners attached.
    pub listener_adds: usize,
    /// Listeners detached.
    pub listener_removes: usize,
}

impl DomOps {
    /// Whether nothing was mutated.
    pub fn is_quiet(&self) -> bool {
        *self == Self::default()
    }
}

// =============================================================================
// MemoryDom
// =============================================================================

/// In-memory document tree implementing [`HostDom`].
#[derive(Default)]
pub struct MemoryDom {
    nodes: SlotMap<NodeId, MemoryNode>,
    ops: DomOps,
}

impl MemoryDom {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached container element to render into.
    pub fn create_container(&mut self) -> NodeId {
        self.nodes.insert(MemoryNode::element("root"))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Tag name of an element node.
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node)?.tag.as_deref()
    }

    /// Whether the node is a text node.
    pub fn is_text(&self, node: NodeId) -> bool {
        self.nodes.get(node).is_some_and(|n| n.tag.is_none())
    }

    /// Content of a text node.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        let n = self.nodes.get(node)?;
        if n.tag.is_some() {
            return None;
        }
        n.props.get(NODE_VALUE).and_then(PropValue::as_str)
    }

    /// Current value of a named property.
    pub fn property(&self, node: NodeId, name: &str) -> Option<&PropValue> {
        self.nodes.get(node)?.props.get(name)
    }

    /// Number of properties set on a node.
    pub fn property_count(&self, node: NodeId) -> usize {
        self.nodes.get(node).map_or(0, |n| n.props.len())
    }

    /// Whether a listener is registered for the host event name.
    pub fn has_listener(&self, node: NodeId, event: &str) -> bool {
        self.nodes
            .get(node)
            .is_some_and(|n| n.listeners.contains_key(event))
    }

    /// Number of listeners registered on a node.
    pub fn listener_count(&self, node: NodeId) -> usize {
        self.nodes.get(node).map_or(0, |n| n.listeners.len())
    }

    /// Children of a node, in document order. Empty for stale handles.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(node).map_or(&[], |n| n.children.as_slice())
    }

    /// Child at the given index.
    pub fn child(&self, node: NodeId, index: usize) -> Option<NodeId> {
        self.children(node).get(index).copied()
    }

    /// Parent of an attached node.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node)?.parent
    }

    /// Total number of nodes, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Deliver an event to the node's listener, if one is registered.
    ///
    /// Returns whether a listener ran.
    pub fn dispatch(&self, node: NodeId, event: &str) -> bool {
        let handler = self
            .nodes
            .get(node)
            .and_then(|n| n.listeners.get(event).cloned());
        match handler {
            Some(handler) => {
                handler(&Event::new(event));
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Render a subtree as markup, for snapshot-style assertions.
    ///
    /// Element nodes print their properties as attributes in insertion
    /// order; text nodes print their content. Listeners are not printed.
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(node, &mut out);
        out
    }

    fn write_markup(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        match &node.tag {
            None => {
                if let Some(PropValue::Str(s)) = node.props.get(NODE_VALUE) {
                    out.push_str(s);
                }
            }
            Some(tag) => {
                let _ = write!(out, "<{tag}");
                for (name, value) in &node.props {
                    let _ = write!(out, " {name}=\"{value}\"");
                }
                out.push('>');
                for child in &node.children {
                    self.write_markup(*child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }

    // =========================================================================
    // Mutation counters
    // =========================================================================

    /// Snapshot of the mutation counters.
    pub fn ops(&self) -> DomOps {
        self.ops.clone()
    }

    /// Zero the mutation counters.
    pub fn reset_ops(&mut self) {
        self.ops = DomOps::default();
    }

    /// Detach `child` from its current parent, if any.
    fn unlink(&mut self, child: NodeId) {
        let Some(old_parent) = self.nodes.get(child).and_then(|n| n.parent) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(old_parent) {
            parent.children.retain(|c| *c != child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
        }
    }
}

impl HostDom for MemoryDom {
    type Node = NodeId;

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.insert(MemoryNode::element(tag))
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        self.nodes.insert(MemoryNode::text(text))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            return;
        }
        // Appending an attached node moves it.
        self.unlink(child);
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
        self.ops.appends += 1;
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        let attached_here = self.nodes.get(child).and_then(|n| n.parent) == Some(parent);
        if !attached_here {
            return;
        }
        self.unlink(child);
        self.ops.removes += 1;
    }

    fn set_property(&mut self, node: NodeId, name: &str, value: &PropValue) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.props.insert(name.to_string(), value.clone());
            self.ops.property_writes += 1;
        }
    }

    fn clear_property(&mut self, node: NodeId, name: &str) {
        if let Some(n) = self.nodes.get_mut(node) {
            if n.props.shift_remove(name).is_some() {
                self.ops.property_clears += 1;
            }
        }
    }

    fn add_event_listener(&mut self, node: NodeId, event: &str, handler: EventCallback) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.listeners.insert(event.to_string(), handler);
            self.ops.listener_adds += 1;
        }
    }

    fn remove_event_listener(&mut self, node: NodeId, event: &str) {
        if let Some(n) = self.nodes.get_mut(node) {
            if n.listeners.shift_remove(event).is_some() {
                self.ops.listener_removes += 1;
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_create_and_append() {
        let mut dom = MemoryDom::new();
        let root = dom.create_container();
        let div = dom.create_element("div");
        let txt = dom.create_text("hi");

        dom.append_child(root, div);
        dom.append_child(div, txt);

        assert_eq!(dom.children(root), &[div]);
        assert_eq!(dom.children(div), &[txt]);
        assert_eq!(dom.parent(txt), Some(div));
        assert_eq!(dom.tag(div), Some("div"));
        assert_eq!(dom.text(txt), Some("hi"));
    }

    #[test]
    fn test_append_moves_attached_node() {
        let mut dom = MemoryDom::new();
        let a = dom.create_element("a");
        let b = dom.create_element("b");
        let child = dom.create_element("span");

        dom.append_child(a, child);
        dom.append_child(b, child);

        assert!(dom.children(a).is_empty());
        assert_eq!(dom.children(b), &[child]);
        assert_eq!(dom.parent(child), Some(b));
    }

    #[test]
    fn test_remove_child_detaches() {
        let mut dom = MemoryDom::new();
        let root = dom.create_container();
        let div = dom.create_element("div");
        dom.append_child(root, div);

        dom.remove_child(root, div);
        assert!(dom.children(root).is_empty());
        assert_eq!(dom.parent(div), None);
        // The node itself still exists, merely detached.
        assert_eq!(dom.tag(div), Some("div"));

        // Removing again is a no-op.
        let before = dom.ops();
        dom.remove_child(root, div);
        assert_eq!(dom.ops(), before);
    }

    #[test]
    fn test_properties() {
        let mut dom = MemoryDom::new();
        let div = dom.create_element("div");

        dom.set_property(div, "id", &PropValue::from("foo"));
        assert_eq!(dom.property(div, "id").and_then(|v| v.as_str()), Some("foo"));

        dom.clear_property(div, "id");
        assert_eq!(dom.property(div, "id"), None);
        // Clearing an absent property is not counted.
        let before = dom.ops();
        dom.clear_property(div, "id");
        assert_eq!(dom.ops(), before);
    }

    #[test]
    fn test_dispatch_invokes_listener() {
        let mut dom = MemoryDom::new();
        let button = dom.create_element("button");

        let clicks = Rc::new(Cell::new(0));
        let counter = clicks.clone();
        dom.add_event_listener(
            button,
            "click",
            Rc::new(move |event| {
                assert_eq!(event.name(), "click");
                counter.set(counter.get() + 1);
            }),
        );

        assert!(dom.dispatch(button, "click"));
        assert!(dom.dispatch(button, "click"));
        assert_eq!(clicks.get(), 2);
        // No listener for this event name.
        assert!(!dom.dispatch(button, "keydown"));

        dom.remove_event_listener(button, "click");
        assert!(!dom.dispatch(button, "click"));
        assert_eq!(clicks.get(), 2);
    }

    #[test]
    fn test_outer_html() {
        let mut dom = MemoryDom::new();
        let div = dom.create_element("div");
        let a = dom.create_element("a");
        let txt = dom.create_text("bar");

        dom.set_property(div, "id", &PropValue::from("foo"));
        dom.append_child(div, a);
        dom.append_child(a, txt);

        assert_eq!(dom.outer_html(div), r#"<div id="foo"><a>bar</a></div>"#);
    }

    #[test]
    fn test_ops_counting() {
        let mut dom = MemoryDom::new();
        let root = dom.create_container();
        let div = dom.create_element("div");

        dom.append_child(root, div);
        dom.set_property(div, "id", &PropValue::from("x"));
        dom.remove_child(root, div);

        let ops = dom.ops();
        assert_eq!(ops.appends, 1);
        assert_eq!(ops.property_writes, 1);
        assert_eq!(ops.removes, 1);

        dom.reset_ops();
        assert!(dom.ops().is_quiet());
    }

    #[test]
    fn test_stale_handles_are_noops() {
        let mut dom = MemoryDom::new();
        // The null key never names a live node.
        let stale = NodeId::default();
        let div = dom.create_element("div");

        dom.append_child(stale, div);
        dom.append_child(div, stale);
        dom.set_property(stale, "id", &PropValue::from("x"));

        assert!(dom.ops().is_quiet());
        assert!(dom.children(div).is_empty());
    }
}
