//! Runtime - render entry point and the cooperative work loop.
//!
//! A [`Runtime`] owns one render root: the injected host backend, the fiber
//! arena, and the whole render-generation state (`current_root`,
//! `wip_root`, `next_unit_of_work`, `deletions`). Nothing is process-wide;
//! independent runtimes coexist without collisions.
//!
//! # Data flow
//!
//! ```text
//! render() -> work loop (one fiber per unit, reconcile children)
//!          -> commit (deletions, then the new tree, one synchronous pass)
//!          -> committed tree becomes the baseline for the next render
//! ```
//!
//! The work loop is resumable: all in-flight state lives on the runtime,
//! never on a call stack, so a slice can yield mid-tree and a later slice
//! picks up exactly where it left off. See [`Runtime::tick`].

mod commit;
mod reconcile;

use std::time::Duration;

use smallvec::SmallVec;

use crate::dom::{self, HostDom};
use crate::element::{Element, NodeKind};
use crate::fiber::{Fiber, FiberArena, FiberId};
use crate::scheduler::{Deadline, FrameDeadline, Unbounded};
use crate::types::Props;

/// One render root: host backend plus all render-generation state.
pub struct Runtime<H: HostDom> {
    host: H,
    fibers: FiberArena<H::Node>,
    /// Tree reflected in the host document; `None` before the first commit.
    current_root: Option<FiberId>,
    /// Tree being built; `None` when no render is active.
    wip_root: Option<FiberId>,
    /// Next fiber to process; `None` once the pass is fully built.
    next_unit_of_work: Option<FiberId>,
    /// Old fibers with no place in the new child walk, still owed a commit.
    deletions: SmallVec<[FiberId; 8]>,
}

impl<H: HostDom> Runtime<H> {
    /// Create a runtime around a host backend.
    pub fn new(host: H) -> Self {
        Self {
            host,
            fibers: FiberArena::new(),
            current_root: None,
            wip_root: None,
            next_unit_of_work: None,
            deletions: SmallVec::new(),
        }
    }

    /// The host backend.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host backend, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Consume the runtime, returning the host backend.
    pub fn into_host(self) -> H {
        self.host
    }

    /// The fiber arena (committed tree plus any in-flight pass).
    pub fn fibers(&self) -> &FiberArena<H::Node> {
        &self.fibers
    }

    /// Root of the committed tree, once a render has completed.
    pub fn current_root(&self) -> Option<FiberId> {
        self.current_root
    }

    /// Whether the runtime is idle between renders.
    ///
    /// `wip_root` and `next_unit_of_work` are unset simultaneously exactly
    /// when this holds.
    pub fn is_idle(&self) -> bool {
        self.wip_root.is_none() && self.next_unit_of_work.is_none()
    }

    // =========================================================================
    // Render entry point
    // =========================================================================

    /// Start a render pass placing `element` inside `container`.
    ///
    /// Safe to call repeatedly. Calling while a pass is still in flight
    /// replaces it: the abandoned work-in-progress subtree is released and
    /// the fresh pass diffs against the last *committed* tree, so stale
    /// alternates from the abandoned pass never reach a commit.
    pub fn render(&mut self, element: Element, container: H::Node) {
        if let Some(stale) = self.wip_root.take() {
            let freed = self.fibers.free_subtree(stale);
            self.deletions.clear();
            log::debug!("render: replaced in-flight pass ({freed} fibers discarded)");
        }

        // Synthetic root fiber wrapping the container, with the rendered
        // element as its only child. Its kind is never consulted because
        // its host node already exists.
        let mut props = Props::new();
        props.children = vec![element];
        let mut root = Fiber::new(NodeKind::Tag("root".to_string()), props);
        root.dom = Some(container);
        root.alternate = self.current_root;

        let root_id = self.fibers.insert(root);
        self.wip_root = Some(root_id);
        self.next_unit_of_work = Some(root_id);
    }

    // =========================================================================
    // Work loop
    // =========================================================================

    /// Run one scheduling slice.
    ///
    /// Processes units of work until the pass is fully built or `deadline`
    /// asks for a yield (checked after each unit, so a slice always makes
    /// at least one unit of progress). When the pass is fully built, the
    /// commit runs inside the same slice, exactly once.
    ///
    /// Returns whether work remains - the host loop re-schedules while this
    /// is true.
    pub fn tick(&mut self, deadline: &impl Deadline) -> bool {
        while let Some(unit) = self.next_unit_of_work {
            self.next_unit_of_work = self.perform_unit_of_work(unit);
            if deadline.should_yield() {
                break;
            }
        }

        if self.next_unit_of_work.is_none() && self.wip_root.is_some() {
            self.commit_root();
        }

        !self.is_idle()
    }

    /// Drive the pending pass to completion, commit included.
    pub fn flush(&mut self) {
        while self.tick(&Unbounded) {}
    }

    /// Drive the pending pass to completion in wall-clock slices of the
    /// given budget. Blocking equivalent of re-scheduling [`tick`] from a
    /// host idle callback.
    ///
    /// [`tick`]: Runtime::tick
    pub fn run(&mut self, budget: Duration) {
        while self.tick(&FrameDeadline::new(budget)) {}
    }

    // =========================================================================
    // Unit of work
    // =========================================================================

    /// Process one fiber: materialize its host node if missing, reconcile
    /// its children, and return the next fiber in depth-first order.
    fn perform_unit_of_work(&mut self, id: FiberId) -> Option<FiberId> {
        let needs_dom = self.fibers.get(id)?.dom.is_none();
        if needs_dom {
            let node = self.create_dom(id);
            if let Some(fiber) = self.fibers.get_mut(id) {
                fiber.dom = node;
            }
        }

        let children = self.fibers.get(id)?.props.children.clone();
        self.reconcile_children(id, &children);

        self.fibers.next_dfs(id)
    }

    /// Create the host node for a fiber and apply its initial props through
    /// the same sync path updates take.
    fn create_dom(&mut self, id: FiberId) -> Option<H::Node> {
        let node = match &self.fibers.get(id)?.kind {
            NodeKind::Text => self.host.create_text(""),
            NodeKind::Tag(tag) => self.host.create_element(tag),
        };
        let empty = Props::new();
        let fiber = self.fibers.get(id)?;
        dom::sync_props(&mut self.host, node, &empty, &fiber.props);
        Some(node)
    }
}

// =============================================================================
// Tests
// =============================================================================
