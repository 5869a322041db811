//! Child reconciliation - positional diff with effect tagging.
//!
//! Compares the ordered new child elements of a fiber against the previous
//! render's child chain (reached through the fiber's alternate) and builds
//! the new child/sibling chain, tagging every produced fiber with the
//! mutation it needs at commit.
//!
//! The diff is positional and non-keyed on purpose: a same-kind node at the
//! same index is an update, anything else at that index is a replacement.
//! A non-trailing insertion or deletion therefore degrades to replacing
//! every subsequent position. Known limitation, kept by design.

use crate::dom::HostDom;
use crate::element::Element;
use crate::fiber::{EffectTag, Fiber, FiberId};

use super::Runtime;

impl<H: HostDom> Runtime<H> {
    /// Build (or rebuild) `wip`'s child chain from `elements`.
    ///
    /// Single simultaneous walk: the new elements by index, the old fibers
    /// by sibling link, continuing while either side has entries. Old
    /// fibers with no place in the new chain are tagged [`Deletion`] and
    /// collected on the runtime's deletions list - they are never linked
    /// into the new chain.
    ///
    /// [`Deletion`]: EffectTag::Deletion
    pub(super) fn reconcile_children(&mut self, wip: FiberId, elements: &[Element]) {
        let mut old = self
            .fibers
            .get(wip)
            .and_then(|f| f.alternate)
            .and_then(|alt| self.fibers.get(alt))
            .and_then(|alt| alt.child);
        let mut index = 0;
        let mut previous: Option<FiberId> = None;

        while index < elements.len() || old.is_some() {
            let element = elements.get(index);

            // Snapshot what the comparison needs before any arena mutation.
            let (same_kind, old_dom, old_sibling) = match old.and_then(|id| self.fibers.get(id)) {
                Some(old_fiber) => (
                    element.is_some_and(|e| e.kind == old_fiber.kind),
                    old_fiber.dom,
                    old_fiber.sibling,
                ),
                None => (false, None, None),
            };

            let produced = match (same_kind, element) {
                (true, Some(e)) => {
                    // Same kind at the same position: keep the host node,
                    // take the new props, remember the old fiber for the
                    // commit diff.
                    let mut fiber = Fiber::new(e.kind.clone(), e.props.clone());
                    fiber.dom = old_dom;
                    fiber.parent = Some(wip);
                    fiber.alternate = old;
                    fiber.effect = Some(EffectTag::Update);
                    Some(self.fibers.insert(fiber))
                }
                (false, Some(e)) => {
                    // Different kind (or nothing to reuse): fresh node.
                    let mut fiber = Fiber::new(e.kind.clone(), e.props.clone());
                    fiber.parent = Some(wip);
                    fiber.effect = Some(EffectTag::Placement);
                    Some(self.fibers.insert(fiber))
                }
                (_, None) => None,
            };

            if !same_kind {
                if let Some(old_id) = old {
                    if let Some(old_fiber) = self.fibers.get_mut(old_id) {
                        old_fiber.effect = Some(EffectTag::Deletion);
                        self.deletions.push(old_id);
                        log::trace!("reconcile: {old_id:?} has no place in the new chain");
                    }
                }
            }

            // Both cursors advance every iteration; a pure deletion leaves
            // its position unoccupied in the new chain.
            old = old_sibling;
            index += 1;

            if let Some(id) = produced {
                match previous {
                    None => {
                        if let Some(parent) = self.fibers.get_mut(wip) {
                            parent.child = Some(id);
                        }
                    }
                    Some(prev) => {
                        if let Some(prev_fiber) = self.fibers.get_mut(prev) {
                            prev_fiber.sibling = Some(id);
                        }
                    }
                }
                previous = Some(id);
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
