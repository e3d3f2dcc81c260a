// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display state: expand/collapse, the displayed frontier, and hit testing.

use smallvec::SmallVec;
use tracing::trace;

use crate::tree::Tree;
use crate::types::{Colour, NodeFlags, NodeId, TreeRect};

impl<D> Tree<D> {
    /// Whether `id` is part of the displayed frontier.
    ///
    /// A node is displayed when it is collapsed and either is a root or has an
    /// expanded parent.
    pub fn is_displayed(&self, id: NodeId) -> bool {
        let Some(node) = self.node_opt(id) else {
            return false;
        };
        if node.is_expanded() {
            return false;
        }
        node.parent.is_none_or(|p| self.node(p).is_expanded())
    }

    /// Displayed nodes below (or at) `id`, in depth-first children order.
    ///
    /// The walk does not descend into displayed nodes.
    pub fn displayed_nodes(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.is_alive(id) {
            return out;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if self.is_displayed(current) {
                out.push(current);
                continue;
            }
            // Reversed so that children are visited in order.
            stack.extend(self.node(current).children.iter().rev());
        }
        out
    }

    /// Rectangle and colour of every displayed node below (or at) `id`.
    pub fn rectangles(&self, id: NodeId) -> Vec<(TreeRect, Colour)> {
        self.displayed_nodes(id)
            .into_iter()
            .map(|n| {
                let node = self.node(n);
                (node.rect, node.colour)
            })
            .collect()
    }

    /// The displayed node below (or at) `id` whose rectangle contains `pos`.
    ///
    /// Edges are inclusive. When `pos` lies on an edge or corner shared by
    /// several rectangles, the one whose origin is left of and above all the
    /// others wins.
    ///
    /// Two cases are resolved differently from a plain dominance rule:
    ///
    /// - Where no origin dominates (a T-junction between cousins), the
    ///   leftmost and then topmost rectangle wins instead of nothing.
    /// - Rectangles with no area are never hit, not even at their own
    ///   origin, so a zero-weight placeholder cannot shadow the tile it sits
    ///   on.
    pub fn tree_at_position(&self, id: NodeId, pos: (i32, i32)) -> Option<NodeId> {
        let candidates: SmallVec<[NodeId; 4]> = self
            .displayed_nodes(id)
            .into_iter()
            .filter(|&n| {
                let rect = self.node(n).rect;
                !rect.is_empty() && rect.contains(pos)
            })
            .collect();
        debug_assert!(
            candidates.len() <= 4,
            "at most four tiles can share a point, found {}",
            candidates.len()
        );

        candidates.into_iter().min_by_key(|&n| {
            let rect = self.node(n).rect;
            (rect.x, rect.y)
        })
    }

    /// Expand `id` so that its children are displayed instead of it.
    ///
    /// Leaves cannot be expanded. Collapsed ancestors are expanded too, so an
    /// expanded node never sits below a collapsed one.
    pub fn expand(&mut self, id: NodeId) {
        if !self.node_opt(id).is_some_and(|n| !n.is_leaf()) {
            trace!(?id, "expand ignored");
            return;
        }
        let mut current = Some(id);
        while let Some(c) = current {
            let node = self.node_mut(c);
            if node.is_expanded() {
                break;
            }
            node.flags.insert(NodeFlags::EXPANDED);
            current = node.parent;
        }
    }

    /// Expand `id` and every internal node below it.
    pub fn expand_all(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        self.expand(id);
        let mut stack = self.node(id).children.clone();
        while let Some(current) = stack.pop() {
            let node = self.node_mut(current);
            if !node.is_leaf() {
                node.flags.insert(NodeFlags::EXPANDED);
                stack.extend_from_slice(&node.children);
            }
        }
    }

    /// Collapse the parent of `id` together with its whole subtree.
    ///
    /// This does not touch anything above the parent, and does nothing for a
    /// root.
    pub fn collapse(&mut self, id: NodeId) {
        let Some(parent) = self.parent_of(id) else {
            trace!(?id, "collapse ignored on root");
            return;
        };
        let mut stack = vec![parent];
        while let Some(current) = stack.pop() {
            let node = self.node_mut(current);
            node.flags.remove(NodeFlags::EXPANDED);
            stack.extend_from_slice(&node.children);
        }
    }

    /// [`Tree::collapse`] `id`, then each of its ancestors in turn.
    ///
    /// The whole tree containing `id` ends up collapsed.
    pub fn collapse_all(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(c) = current {
            self.collapse(c);
            current = self.parent_of(c);
        }
    }
}
