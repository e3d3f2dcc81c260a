// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Treemap layout: proportional slicing of a rectangle among children.

use smallvec::SmallVec;
use tracing::debug;

use crate::tree::Tree;
use crate::types::{NodeId, TreeRect};
use crate::util::divide_length;

impl<D> Tree<D> {
    /// Lay out `id` and its descendants inside `rect`.
    ///
    /// - A node of weight zero gets `(x, y, 0, 0)` at the origin of its
    ///   rectangle, and so does everything below it.
    /// - A leaf gets `rect` unchanged.
    /// - An internal node gets `rect` and slices it among its children in
    ///   order, along the width when `width > height` and along the height
    ///   otherwise (squares split along the height). See
    ///   [`Tree::insert`] for how weights are derived.
    ///
    /// Children exactly tile their parent: every slice but the last is
    /// `trunc(length * child_weight / weight)` and the last takes the rest.
    ///
    /// Layout covers the whole subtree regardless of expand/collapse state.
    pub fn update_rectangles(&mut self, id: NodeId, rect: impl Into<TreeRect>) {
        if !self.is_alive(id) {
            return;
        }
        let rect = rect.into();
        debug!(?id, ?rect, "layout pass");

        // Depth-first; each entry carries the rectangle its parent allotted.
        let mut stack = vec![(id, rect)];
        while let Some((id, rect)) = stack.pop() {
            let node = self.node_mut(id);
            if node.weight == 0 {
                let placeholder = TreeRect::new(rect.x, rect.y, 0, 0);
                node.rect = placeholder;
                stack.extend(node.children.iter().map(|&c| (c, placeholder)));
                continue;
            }
            node.rect = rect;
            if node.is_leaf() {
                continue;
            }

            let total = node.weight;
            let children: SmallVec<[NodeId; 8]> = node.children.iter().copied().collect();
            let weights: SmallVec<[u64; 8]> =
                children.iter().map(|&c| self.node(c).weight).collect();

            let along_width = rect.width > rect.height;
            let length = if along_width { rect.width } else { rect.height };
            let mut offset = if along_width { rect.x } else { rect.y };
            for (&child, slice) in children
                .iter()
                .zip(divide_length(length, total, &weights))
            {
                let sub = if along_width {
                    TreeRect::new(offset, rect.y, slice, rect.height)
                } else {
                    TreeRect::new(rect.x, offset, rect.width, slice)
                };
                stack.push((child, sub));
                offset = offset.saturating_add(slice);
            }
        }
    }
}
