//! # fiberdom
//!
//! Cooperative fiber-scheduled virtual DOM reconciler.
//!
//! fiberdom builds an immutable element tree from declarative input,
//! incrementally reconciles it against the previous tree one fiber at a
//! time inside an interruptible work loop, and commits the tagged
//! differences (update / placement / deletion) to a host document in one
//! synchronous pass.
//!
//! ## Architecture
//!
//! ```text
//! Element tree → render() → work loop (reconcile fibers) → commit → HostDom
//! ```
//!
//! The work loop is the heart: it processes one fiber per unit of work,
//! consults an injected [`Deadline`] between units, and suspends when the
//! host's time budget runs out - resuming exactly where it left off on the
//! next slice, because all in-flight state lives on the [`Runtime`], not on
//! a call stack. Nothing becomes visible in the document until the whole
//! pass commits.
//!
//! The diff is positional and non-keyed: a same-kind node at the same index
//! updates in place, everything else replaces. Inserting or removing in the
//! middle of a child list replaces every subsequent position - a documented
//! limitation of this core, not a bug.
//!
//! ## Example
//!
//! ```
//! use fiberdom::{element, text, MemoryDom, Props, Runtime};
//!
//! let mut rt = Runtime::new(MemoryDom::new());
//! let container = rt.host_mut().create_container();
//!
//! let app = element(
//!     "div",
//!     Props::new().attr("id", "app"),
//!     [element("a", Props::new(), [text("hello")])],
//! );
//! rt.render(app, container);
//! rt.flush();
//!
//! assert_eq!(
//!     rt.host().outer_html(container),
//!     r#"<root><div id="app"><a>hello</a></div></root>"#
//! );
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Prop values, the ordered prop map, event-key conventions
//! - [`element`] - Immutable element tree descriptions
//! - [`fiber`] - Per-pass fiber nodes and their arena
//! - [`dom`] - The injected host-document capability and prop sync
//! - [`scheduler`] - Deadlines: the injected time-budget capability
//! - [`runtime`] - The render entry point, work loop, and committer

pub mod dom;
pub mod element;
pub mod fiber;
pub mod runtime;
pub mod scheduler;
pub mod types;

// Re-export commonly used items
pub use dom::memory::{DomOps, MemoryDom, NodeId};
pub use dom::{HostDom, sync_props};
pub use element::{Element, NODE_VALUE, NodeKind, element, text};
pub use fiber::{EffectTag, Fiber, FiberArena, FiberId};
pub use runtime::Runtime;
pub use scheduler::{
    CountedDeadline, DEFAULT_FRAME_BUDGET, Deadline, Exhausted, FrameDeadline, Unbounded,
    YIELD_THRESHOLD,
};
pub use types::{EVENT_PREFIX, Event, EventCallback, PropValue, Props, event_name, is_event};
