//! Commit - materialize tagged effects into the host document.
//!
//! Runs once per completed pass, synchronously: deletions first, then one
//! depth-first walk over the new tree applying placements and updates.
//! Afterwards the work-in-progress root becomes the committed root and the
//! superseded tree is released from the arena.

use crate::dom::{self, HostDom};
use crate::fiber::{EffectTag, FiberId};
use crate::types::Props;

use super::Runtime;

impl<H: HostDom> Runtime<H> {
    /// Commit the completed pass and promote it to `current_root`.
    pub(super) fn commit_root(&mut self) {
        let Some(wip) = self.wip_root.take() else {
            return;
        };

        // Deletions first: they reference the old tree and must not see a
        // document the new tree already mutated.
        let deletions = std::mem::take(&mut self.deletions);
        log::debug!("commit: {} deletion(s)", deletions.len());
        for id in deletions {
            let target = self.dom_parent_of(id);
            self.commit_deletion(id, target);
        }

        let first_child = self.fibers.get(wip).and_then(|f| f.child);
        self.commit_work(first_child);

        // The committed pass becomes the baseline; the tree it replaced is
        // released in one sweep. Alternate keys into it go stale and are
        // never followed again.
        if let Some(old_root) = self.current_root.replace(wip) {
            let freed = self.fibers.free_subtree(old_root);
            log::trace!("commit: released previous tree ({freed} fibers)");
        }
    }

    /// Depth-first effect application over the new tree: each fiber, then
    /// its child subtree, then its sibling.
    fn commit_work(&mut self, first: Option<FiberId>) {
        let mut stack = Vec::new();
        if let Some(id) = first {
            stack.push(id);
        }

        while let Some(id) = stack.pop() {
            let Some(fiber) = self.fibers.get(id) else {
                continue;
            };
            let effect = fiber.effect;
            let dom = fiber.dom;
            let alternate = fiber.alternate;
            let child = fiber.child;
            let sibling = fiber.sibling;

            // Deletions live only on the deletions list, never in the new
            // chain.
            debug_assert_ne!(effect, Some(EffectTag::Deletion));

            match effect {
                Some(EffectTag::Placement) => {
                    // A fiber with no attachment point is skipped, not a fault.
                    if let (Some(node), Some(target)) = (dom, self.dom_parent_of(id)) {
                        self.host.append_child(target, node);
                    }
                }
                Some(EffectTag::Update) => {
                    if let Some(node) = dom {
                        let empty = Props::new();
                        let prev = alternate
                            .and_then(|alt| self.fibers.get(alt))
                            .map_or(&empty, |alt| &alt.props);
                        let next = match self.fibers.get(id) {
                            Some(f) => &f.props,
                            None => continue,
                        };
                        dom::sync_props(&mut self.host, node, prev, next);
                    }
                }
                Some(EffectTag::Deletion) | None => {}
            }

            // Sibling below child on the stack: child subtree first.
            if let Some(s) = sibling {
                stack.push(s);
            }
            if let Some(c) = child {
                stack.push(c);
            }
        }
    }

    /// Detach a deleted fiber's host node from `target`.
    ///
    /// A deleted fiber that owns no node of its own cascades into its
    /// children (the whole child/sibling chain) until removable handles
    /// are found. No target means no attachment point: silent no-op.
    fn commit_deletion(&mut self, id: FiberId, target: Option<H::Node>) {
        let Some(target) = target else {
            return;
        };

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(fiber) = self.fibers.get(current) else {
                continue;
            };
            let dom = fiber.dom;
            let child = fiber.child;

            if let Some(node) = dom {
                self.host.remove_child(target, node);
            } else if let Some(first) = child {
                let mut cursor = Some(first);
                while let Some(c) = cursor {
                    stack.push(c);
                    cursor = self.fibers.get(c).and_then(|f| f.sibling);
                }
            }
        }
    }

    /// Nearest ancestor fiber owning a host node - the mutation target.
    fn dom_parent_of(&self, id: FiberId) -> Option<H::Node> {
        let mut cursor = self.fibers.get(id)?.parent;
        while let Some(ancestor) = cursor {
            let fiber = self.fibers.get(ancestor)?;
            if let Some(node) = fiber.dom {
                return Some(node);
            }
            cursor = fiber.parent;
        }
        None
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::MemoryDom;
    use crate::element::{element, text};
    use crate::types::Props;

    #[test]
    fn test_commit_attaches_depth_first() {
        let mut rt = Runtime::new(MemoryDom::new());
        let container = rt.host_mut().create_container();
        rt.render(
            element(
                "div",
                Props::new(),
                [
                    element("a", Props::new(), [text("x")]),
                    element("b", Props::new(), []),
                ],
            ),
            container,
        );
        rt.flush();
        assert_eq!(
            rt.host().outer_html(container),
            "<root><div><a>x</a><b></b></div></root>"
        );
    }

    #[test]
    fn test_deletions_apply_before_placements() {
        let mut rt = Runtime::new(MemoryDom::new());
        let container = rt.host_mut().create_container();
        rt.render(
            element("div", Props::new(), [element("a", Props::new(), [])]),
            container,
        );
        rt.flush();

        rt.render(
            element("div", Props::new(), [element("span", Props::new(), [])]),
            container,
        );
        rt.host_mut().reset_ops();
        rt.flush();

        let ops = rt.host().ops();
        assert_eq!(ops.removes, 1);
        assert_eq!(ops.appends, 1);
        let div = rt.host().child(container, 0).unwrap();
        assert_eq!(rt.host().children(div).len(), 1);
        let span = rt.host().child(div, 0).unwrap();
        assert_eq!(rt.host().tag(span), Some("span"));
    }

    #[test]
    fn test_update_syncs_against_alternate_props() {
        let mut rt = Runtime::new(MemoryDom::new());
        let container = rt.host_mut().create_container();
        rt.render(
            element("div", Props::new().attr("id", "old").attr("title", "t"), []),
            container,
        );
        rt.flush();

        rt.render(element("div", Props::new().attr("id", "new"), []), container);
        rt.host_mut().reset_ops();
        rt.flush();

        let div = rt.host().child(container, 0).unwrap();
        assert_eq!(rt.host().property(div, "id").and_then(|v| v.as_str()), Some("new"));
        assert_eq!(rt.host().property(div, "title"), None);

        let ops = rt.host().ops();
        assert_eq!(ops.property_writes, 1);
        assert_eq!(ops.property_clears, 1);
        assert_eq!(ops.appends, 0);
        assert_eq!(ops.removes, 0);
    }

    #[test]
    fn test_commit_exactly_once_per_pass() {
        let mut rt = Runtime::new(MemoryDom::new());
        let container = rt.host_mut().create_container();
        rt.render(element("div", Props::new(), []), container);
        rt.flush();

        let appends = rt.host().ops().appends;
        // Ticking an idle runtime must not re-commit.
        assert!(!rt.tick(&crate::scheduler::Unbounded));
        assert_eq!(rt.host().ops().appends, appends);
    }

    #[test]
    fn test_text_content_update_in_place() {
        let mut rt = Runtime::new(MemoryDom::new());
        let container = rt.host_mut().create_container();
        rt.render(element("p", Props::new(), [text("one")]), container);
        rt.flush();
        let p = rt.host().child(container, 0).unwrap();
        let t = rt.host().child(p, 0).unwrap();

        rt.render(element("p", Props::new(), [text("two")]), container);
        rt.flush();

        // Same text node, new content.
        assert_eq!(rt.host().child(p, 0), Some(t));
        assert_eq!(rt.host().text(t), Some("two"));
    }
}
