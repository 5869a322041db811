//! Element builder - immutable tree descriptions.
//!
//! An [`Element`] describes one node and its children as authored. Elements
//! are plain data: created fresh on every render call, consumed by the
//! reconciler, never mutated. The markup-to-call transform that produces
//! them is external; this module only offers the call-expression surface.

use std::fmt;

use crate::types::{PropValue, Props};

/// Reserved prop key holding a text element's content.
pub const NODE_VALUE: &str = "nodeValue";

// =============================================================================
// NodeKind
// =============================================================================

/// What kind of host node an element describes.
///
/// The typed rendering of the original `TEXT_ELEMENT` sentinel: either a
/// tag identifier or a text node. Tag names are passed through to the host
/// backend unvalidated - an unknown tag is the backend's problem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// An element node with the given tag name.
    Tag(String),
    /// A text node; content lives in the `nodeValue` prop.
    Text,
}

impl NodeKind {
    /// The tag name, if this is an element node.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Tag(t) => Some(t),
            Self::Text => None,
        }
    }

    /// Whether this is a text node.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text)
    }
}

// =============================================================================
// Element
// =============================================================================

/// Immutable description of one node and its children.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    /// Node kind: tag or text.
    pub kind: NodeKind,
    /// Named values plus the ordered child sequence.
    pub props: Props,
}

impl Element {
    /// Create an element node with the given tag, props, and children.
    pub fn new(tag: impl Into<String>, mut props: Props, children: Vec<Element>) -> Self {
        props.children = children;
        Self {
            kind: NodeKind::Tag(tag.into()),
            props,
        }
    }

    /// Create a text element from any displayable value.
    ///
    /// The stringified value lands in the `nodeValue` prop; text elements
    /// have no children.
    pub fn text(value: impl fmt::Display) -> Self {
        Self {
            kind: NodeKind::Text,
            props: Props::new().attr(NODE_VALUE, value.to_string()),
        }
    }

    /// The ordered child elements.
    pub fn children(&self) -> &[Element] {
        &self.props.children
    }

    /// A text element's content.
    pub fn node_value(&self) -> Option<&str> {
        self.props.get(NODE_VALUE).and_then(PropValue::as_str)
    }
}

/// Build an element node.
///
/// Children are anything convertible into an [`Element`]; primitive values
/// (`&str`, `String`, numbers, `bool`) convert into text elements holding
/// the stringified value.
///
/// # Example
///
/// ```
/// use fiberdom::{element, Props};
///
/// let tree = element(
///     "div",
///     Props::new().attr("id", "foo"),
///     [element("a", Props::new(), ["bar".into()])],
/// );
/// assert_eq!(tree.children().len(), 1);
/// ```
pub fn element(
    tag: impl Into<String>,
    props: Props,
    children: impl IntoIterator<Item = Element>,
) -> Element {
    Element::new(tag, props, children.into_iter().collect())
}

/// Build a text element.
pub fn text(value: impl fmt::Display) -> Element {
    Element::text(value)
}

impl From<&str> for Element {
    fn from(value: &str) -> Self {
        Element::text(value)
    }
}

impl From<String> for Element {
    fn from(value: String) -> Self {
        Element::text(value)
    }
}

impl From<f64> for Element {
    fn from(value: f64) -> Self {
        Element::text(value)
    }
}

impl From<i32> for Element {
    fn from(value: i32) -> Self {
        Element::text(value)
    }
}

impl From<u32> for Element {
    fn from(value: u32) -> Self {
        Element::text(value)
    }
}

impl From<bool> for Element {
    fn from(value: bool) -> Self {
        Element::text(value)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_basic() {
        let el = element("div", Props::new().attr("id", "foo"), []);
        assert_eq!(el.kind.tag(), Some("div"));
        assert_eq!(el.props.get("id").and_then(|v| v.as_str()), Some("foo"));
        assert!(el.children().is_empty());
    }

    #[test]
    fn test_text_element_shape() {
        let t = text("bar");
        assert!(t.kind.is_text());
        assert_eq!(t.node_value(), Some("bar"));
        assert!(t.children().is_empty());
    }

    #[test]
    fn test_primitive_children_become_text_elements() {
        let el = element("p", Props::new(), ["hello".into(), 42.into(), true.into()]);
        let kids = el.children();
        assert_eq!(kids.len(), 3);
        assert!(kids.iter().all(|k| k.kind.is_text()));
        assert_eq!(kids[0].node_value(), Some("hello"));
        assert_eq!(kids[1].node_value(), Some("42"));
        assert_eq!(kids[2].node_value(), Some("true"));
    }

    #[test]
    fn test_children_keep_order() {
        let el = element(
            "ul",
            Props::new(),
            [
                element("li", Props::new(), ["a".into()]),
                element("li", Props::new(), ["b".into()]),
            ],
        );
        let texts: Vec<_> = el
            .children()
            .iter()
            .map(|li| li.children()[0].node_value().unwrap().to_string())
            .collect();
        assert_eq!(texts, vec!["a", "b"]);
    }
}
