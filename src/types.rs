//! Core types for fiberdom.
//!
//! These types define the foundation that everything builds on: the variant
//! property value, the ordered property map carried by elements and fibers,
//! and the event-key conventions the committer uses to route listeners.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::element::Element;

// =============================================================================
// Events
// =============================================================================

/// A host event delivered to a listener.
///
/// The core does not interpret events; it only routes them. The payload is
/// therefore minimal: the host-side event name (`"click"`, `"input"`, ...).
#[derive(Debug, Clone)]
pub struct Event {
    name: String,
}

impl Event {
    /// Create an event with the given host-side name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The host-side event name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Event listener callback type (Rc for shared ownership in closures).
///
/// Using Rc<dyn Fn> instead of Box<dyn Fn> allows cloning callbacks into
/// closures and into the host backend without ownership issues.
pub type EventCallback = Rc<dyn Fn(&Event)>;

// =============================================================================
// Event-key convention
// =============================================================================

/// Prefix that marks a prop key as an event listener (`onclick`, `onClick`).
pub const EVENT_PREFIX: &str = "on";

/// Check whether a prop key names an event listener.
#[inline]
pub fn is_event(name: &str) -> bool {
    name.starts_with(EVENT_PREFIX)
}

/// Derive the host event name from an event prop key.
///
/// Strips the `on` prefix and lower-cases the rest: `onClick` -> `click`.
/// Caller must ensure `is_event(name)` holds.
pub fn event_name(name: &str) -> String {
    name[EVENT_PREFIX.len()..].to_lowercase()
}

// =============================================================================
// PropValue - Variant property value
// =============================================================================

/// A property value: string, number, boolean, or event handler.
///
/// Scalars compare by value. Handlers compare by identity (`Rc::ptr_eq`):
/// a freshly built closure is always "changed", a cloned handle is not.
/// This is what drives listener detach/attach decisions during prop sync.
#[derive(Clone)]
pub enum PropValue {
    /// String value.
    Str(String),
    /// Numeric value.
    Num(f64),
    /// Boolean value.
    Bool(bool),
    /// Event handler reference.
    Handler(EventCallback),
}

impl PropValue {
    /// Wrap a closure as a handler value.
    pub fn handler(f: impl Fn(&Event) + 'static) -> Self {
        Self::Handler(Rc::new(f))
    }

    /// Get the string value, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the numeric value, if this is one.
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Self::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the boolean value, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the handler, if this is one.
    pub fn as_handler(&self) -> Option<&EventCallback> {
        match self {
            Self::Handler(h) => Some(h),
            _ => None,
        }
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Num(a), Self::Num(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Handler(a), Self::Handler(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Self::Num(n) => f.debug_tuple("Num").field(n).finish(),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Num(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Handler(_) => f.write_str("[handler]"),
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Self::Num(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        Self::Num(value as f64)
    }
}

impl From<u32> for PropValue {
    fn from(value: u32) -> Self {
        Self::Num(value as f64)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<EventCallback> for PropValue {
    fn from(value: EventCallback) -> Self {
        Self::Handler(value)
    }
}

// =============================================================================
// Props - Ordered property map plus children
// =============================================================================

/// The property mapping of one element or fiber.
///
/// Named values live in an insertion-ordered map so that prop sync and
/// rendering are deterministic. The ordered child sequence the original
/// model keeps under a reserved `children` key is an explicit field here;
/// it never flows through property sync.
///
/// # Example
///
/// ```
/// use fiberdom::Props;
///
/// let props = Props::new()
///     .attr("id", "foo")
///     .attr("tabIndex", 2)
///     .on("click", |_event| {});
///
/// assert_eq!(props.get("id").and_then(|v| v.as_str()), Some("foo"));
/// assert!(props.get("onclick").is_some());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props {
    values: IndexMap<String, PropValue>,
    /// Ordered child elements.
    pub children: Vec<Element>,
}

impl Props {
    /// Create an empty property map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a named value (builder style).
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Attach an event handler under the `on`-prefixed key (builder style).
    ///
    /// `on("click", f)` stores the handler under the key `onclick`.
    pub fn on(mut self, event: &str, handler: impl Fn(&Event) + 'static) -> Self {
        self.values
            .insert(format!("{EVENT_PREFIX}{event}"), PropValue::handler(handler));
        self
    }

    /// Set a named value in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Look up a named value.
    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.values.get(name)
    }

    /// Iterate named values in insertion order. Children are not included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of named values (children excluded).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no named values (children excluded).
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_key_convention() {
        assert!(is_event("onclick"));
        assert!(is_event("onClick"));
        assert!(!is_event("id"));
        assert!(!is_event("class"));

        assert_eq!(event_name("onClick"), "click");
        assert_eq!(event_name("onclick"), "click");
        assert_eq!(event_name("onMouseDown"), "mousedown");
    }

    #[test]
    fn test_prop_value_scalar_equality() {
        assert_eq!(PropValue::from("a"), PropValue::from("a"));
        assert_ne!(PropValue::from("a"), PropValue::from("b"));
        assert_eq!(PropValue::from(2), PropValue::from(2.0));
        assert_ne!(PropValue::from(1), PropValue::from(true));
        assert_eq!(PropValue::from(false), PropValue::Bool(false));
    }

    #[test]
    fn test_prop_value_handler_identity() {
        let a = PropValue::handler(|_| {});
        let b = PropValue::handler(|_| {});
        // Two distinct closures never compare equal...
        assert_ne!(a, b);
        // ...but a cloned handle does.
        let c = a.clone();
        assert_eq!(a, c);
    }

    #[test]
    fn test_props_insertion_order() {
        let props = Props::new().attr("b", 1).attr("a", 2).attr("c", 3);
        let keys: Vec<&str> = props.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_props_on_prefixes_key() {
        let props = Props::new().on("click", |_| {});
        assert_eq!(props.len(), 1);
        let (key, value) = props.iter().next().unwrap();
        assert_eq!(key, "onclick");
        assert!(value.as_handler().is_some());
    }

    #[test]
    fn test_props_equality_ignores_order() {
        let a = Props::new().attr("x", 1).attr("y", 2);
        let b = Props::new().attr("y", 2).attr("x", 1);
        assert_eq!(a, b);
    }
}
