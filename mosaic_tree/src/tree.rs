// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, weights, mutations, and path formatting.

use tracing::trace;

use crate::error::ConsistencyError;
use crate::types::{Colour, NewNode, NodeFlags, NodeId, NodeKind, TreeRect};

/// Arena of weighted, treemap-able nodes.
///
/// The arena may hold several independent root trees. Nodes are built
/// bottom-up: children are inserted first and then handed to their parent in
/// [`Tree::insert`], which derives the parent's weight from them.
///
/// `D` is a per-node payload (a file path, publication metadata, ...). It is
/// never inspected by layout or queries.
///
/// ## Example
///
/// ```rust
/// use mosaic_tree::{NewNode, Tree, TreeRect};
///
/// let mut tree = Tree::new();
/// let a = tree.insert(&[], NewNode::leaf("A", 10));
/// let b = tree.insert(&[], NewNode::leaf("B", 20));
/// let root = tree.insert(&[a, b], NewNode::internal("R"));
/// assert_eq!(tree.weight(root), Some(30));
///
/// tree.update_rectangles(root, (0, 0, 300, 100));
/// assert_eq!(tree.rect(a), Some(TreeRect::new(0, 0, 100, 100)));
/// assert_eq!(tree.rect(b), Some(TreeRect::new(100, 0, 200, 100)));
/// ```
pub struct Tree<D = ()> {
    /// slots
    nodes: Vec<Option<Node<D>>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    rng: fastrand::Rng,
}

impl<D> core::fmt::Debug for Tree<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .finish_non_exhaustive()
    }
}

impl<D> Default for Tree<D> {
    fn default() -> Self {
        Self::with_rng(fastrand::Rng::new())
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node<D> {
    generation: u32,
    pub(crate) name: Option<String>,
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) weight: u64,
    pub(crate) colour: Colour,
    pub(crate) rect: TreeRect,
    pub(crate) flags: NodeFlags,
    pub(crate) data: D,
}

impl<D> Node<D> {
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn is_expanded(&self) -> bool {
        self.flags.contains(NodeFlags::EXPANDED)
    }
}

impl Tree {
    /// Create an empty arena whose colours come from a randomly seeded generator.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D> Tree<D> {
    /// Create an empty arena drawing colours from `rng`.
    pub fn with_rng(rng: fastrand::Rng) -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            rng,
        }
    }

    /// Create an empty arena with deterministic colours.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(fastrand::Rng::with_seed(seed))
    }

    /// Insert a new node owning `children`.
    ///
    /// - With children, the node's weight is the sum of theirs and
    ///   `leaf_weight` is ignored.
    /// - Without children, the node is a leaf weighing `leaf_weight`.
    /// - Without a name, the node is the empty node: `children` is ignored and
    ///   the weight is zero.
    ///
    /// Only roots can be claimed: stale identifiers, repeated identifiers,
    /// empty nodes, and nodes that already have a parent are skipped and left
    /// where they are. Every claimed child has its parent link pointed at the
    /// new node. [`Tree::move_to`] is the way to reparent a node.
    pub fn insert(&mut self, children: &[NodeId], node: NewNode<D>) -> NodeId {
        let NewNode {
            name,
            kind,
            leaf_weight,
            data,
        } = node;

        let mut claimed: Vec<NodeId> = Vec::new();
        if name.is_some() {
            claimed.reserve(children.len());
            for &child in children {
                let usable = self.node_opt(child).is_some_and(|n| {
                    n.name.is_some() && n.parent.is_none() && !claimed.contains(&child)
                });
                if usable {
                    claimed.push(child);
                } else {
                    trace!(?child, "child not claimed");
                }
            }
        } else if !children.is_empty() {
            trace!(count = children.len(), "children of the empty node ignored");
        }

        let weight = if claimed.is_empty() {
            if name.is_some() { leaf_weight } else { 0 }
        } else {
            claimed
                .iter()
                .map(|&c| self.node(c).weight)
                .fold(0, u64::saturating_add)
        };

        let colour = Colour::random(&mut self.rng);
        let id = self.alloc(|generation| Node {
            generation,
            name,
            kind,
            parent: None,
            children: Vec::with_capacity(claimed.len()),
            weight,
            colour,
            rect: TreeRect::ZERO,
            flags: NodeFlags::empty(),
            data,
        });
        for child in claimed {
            self.link_parent(child, id);
        }
        id
    }

    /// Remove a node (and its subtree) from the arena.
    ///
    /// The former parent's weight is not recomputed.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        self.detach(id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes[current.idx()].take() {
                stack.extend(node.children);
                self.free_list.push(current.idx());
            }
        }
    }

    /// Move the leaf `id` to the end of `destination`'s children.
    ///
    /// Does nothing unless `id` is a named leaf and `destination` is a node
    /// with children. Weights of the old and new ancestors are left untouched;
    /// call [`Tree::update_data_sizes`] on the root to bring them up to date.
    pub fn move_to(&mut self, id: NodeId, destination: NodeId) {
        let movable = self
            .node_opt(id)
            .is_some_and(|n| n.is_leaf() && n.name.is_some());
        let accepts = self.node_opt(destination).is_some_and(|n| !n.is_leaf());
        if !movable || !accepts {
            trace!(?id, ?destination, "move ignored");
            return;
        }
        let old_parent = self.node(id).parent;
        if let Some(parent) = old_parent {
            self.unlink_parent(id, parent);
        }
        self.link_parent(id, destination);
        if let Some(parent) = old_parent {
            self.settle_childless(parent);
        }
    }

    /// Grow or shrink a leaf's weight by `factor`.
    ///
    /// A positive factor adds `ceil(weight * factor)`. Otherwise the weight
    /// becomes `weight + floor(weight * factor)`, but only if that is at least
    /// one. Internal nodes, the empty node, and non-finite factors are ignored.
    /// Ancestors are not updated.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Float to int casts saturate, and both operands are non-negative."
    )]
    pub fn change_size(&mut self, id: NodeId, factor: f64) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        if !node.is_leaf() || node.name.is_none() || !factor.is_finite() {
            trace!(?id, factor, "change_size ignored");
            return;
        }
        let delta = node.weight as f64 * factor;
        if factor > 0.0 {
            node.weight = node.weight.saturating_add(delta.ceil() as u64);
        } else if let Some(shrunk) = node.weight.checked_sub((-delta.floor()) as u64)
            && shrunk >= 1
        {
            node.weight = shrunk;
        }
    }

    /// Recompute the weights of `id` and its descendants from their leaves.
    ///
    /// Leaf weights are left alone. Returns the node's (possibly unchanged)
    /// weight, or zero for a stale identifier.
    pub fn update_data_sizes(&mut self, id: NodeId) -> u64 {
        let Some(node) = self.node_opt(id) else {
            return 0;
        };
        if node.is_leaf() {
            return node.weight;
        }
        let children = node.children.clone();
        let total = children
            .into_iter()
            .map(|child| self.update_data_sizes(child))
            .fold(0, u64::saturating_add);
        self.node_mut(id).weight = total;
        total
    }

    /// Render the path from the root to `id`, e.g. `workshop/prep/notes.txt (file)`.
    ///
    /// Each name is preceded by the separator of its own [`NodeKind`], and
    /// the suffix of `id`'s kind is appended. The empty node and stale
    /// identifiers format as the empty string.
    pub fn path_string(&self, id: NodeId) -> String {
        let Some(node) = self.node_opt(id) else {
            return String::new();
        };
        if node.name.is_none() {
            return String::new();
        }
        let mut lineage = vec![id];
        let mut current = node.parent;
        while let Some(parent) = current {
            lineage.push(parent);
            current = self.node(parent).parent;
        }

        let mut path = String::new();
        for (depth, &step) in lineage.iter().rev().enumerate() {
            let n = self.node(step);
            if depth > 0 {
                path.push_str(n.kind.separator());
            }
            path.push_str(n.name.as_deref().unwrap_or_default());
        }
        path.push_str(node.kind.suffix(node.is_leaf()));
        path
    }

    /// Check every invariant over the subtree rooted at `root`.
    ///
    /// This includes the weight sums, so it fails after a [`Tree::move_to`] or
    /// [`Tree::change_size`] until [`Tree::update_data_sizes`] has run.
    pub fn validate(&self, root: NodeId) -> Result<(), ConsistencyError> {
        if !self.is_alive(root) {
            return Err(ConsistencyError::Stale(root));
        }
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if node.name.is_none()
                && (!node.is_leaf() || node.parent.is_some() || node.weight != 0)
            {
                return Err(ConsistencyError::MalformedEmpty(id));
            }
            if node.is_expanded() {
                if node.is_leaf() {
                    return Err(ConsistencyError::ExpandedLeaf(id));
                }
                if node.parent.is_some_and(|p| !self.node(p).is_expanded()) {
                    return Err(ConsistencyError::ExpandedUnderCollapsed(id));
                }
            }

            let mut sum = 0_u64;
            for (pos, &child) in node.children.iter().enumerate() {
                let Some(c) = self.node_opt(child) else {
                    return Err(ConsistencyError::Stale(child));
                };
                if c.parent != Some(id) {
                    return Err(ConsistencyError::BrokenParentLink {
                        parent: id,
                        child,
                        actual: c.parent,
                    });
                }
                if node.children[..pos].contains(&child) {
                    return Err(ConsistencyError::DuplicateChild { parent: id, child });
                }
                sum = sum.saturating_add(c.weight);
                stack.push(child);
            }
            if !node.is_leaf() && sum != node.weight {
                return Err(ConsistencyError::WeightMismatch {
                    node: id,
                    weight: node.weight,
                    children: sum,
                });
            }
        }
        Ok(())
    }

    // --- accessors ---

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Whether the arena holds no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live nodes without a parent, in slot order.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().enumerate().filter_map(|(i, n)| match n {
            Some(n) if n.parent.is_none() =>
            {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "NodeId indices are 32-bit."
                )]
                Some(NodeId::new(i as u32, n.generation))
            }
            _ => None,
        })
    }

    /// Name of a live node; `None` for the empty node or stale identifiers.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.node_opt(id).and_then(|n| n.name.as_deref())
    }

    /// Kind of a live node.
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node_opt(id).map(|n| n.kind)
    }

    /// Cached weight of a live node.
    pub fn weight(&self, id: NodeId) -> Option<u64> {
        self.node_opt(id).map(|n| n.weight)
    }

    /// Colour assigned to a live node at construction.
    pub fn colour(&self, id: NodeId) -> Option<Colour> {
        self.node_opt(id).map(|n| n.colour)
    }

    /// Rectangle assigned by the last layout pass.
    pub fn rect(&self, id: NodeId) -> Option<TreeRect> {
        self.node_opt(id).map(|n| n.rect)
    }

    /// Display-state flags of a live node.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.node_opt(id).map(|n| n.flags)
    }

    /// Whether a live node is expanded.
    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some_and(Node::is_expanded)
    }

    /// Whether a live node has no children.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some_and(Node::is_leaf)
    }

    /// Whether a live node is the empty node.
    pub fn is_empty_node(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some_and(|n| n.name.is_none())
    }

    /// Returns the parent of a node if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Get the children of a node, or empty slice if node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// Payload of a live node.
    pub fn data(&self, id: NodeId) -> Option<&D> {
        self.node_opt(id).map(|n| &n.data)
    }

    /// Mutable payload of a live node.
    pub fn data_mut(&mut self, id: NodeId) -> Option<&mut D> {
        self.node_opt_mut(id).map(|n| &mut n.data)
    }

    // --- internals ---

    /// Access a node; panics if `id` is stale.
    pub(crate) fn node(&self, id: NodeId) -> &Node<D> {
        self.node_opt(id).expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<D> {
        self.node_opt_mut(id).expect("dangling NodeId")
    }

    pub(crate) fn node_opt(&self, id: NodeId) -> Option<&Node<D>> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    pub(crate) fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node<D>> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn alloc(&mut self, make: impl FnOnce(u32) -> Node<D>) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(make(generation));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(make(generation)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId indices are 32-bit."
        )]
        NodeId::new(idx as u32, generation)
    }

    /// Unlink `id` from its parent, if any.
    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
            self.settle_childless(parent);
        }
    }

    /// A node left without children is a leaf, and leaves are never expanded.
    fn settle_childless(&mut self, id: NodeId) {
        let node = self.node_mut(id);
        if node.is_leaf() {
            node.flags.remove(NodeFlags::EXPANDED);
        }
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        let parent_node = self.node_mut(parent);
        parent_node.children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        let p = self.node_mut(parent);
        p.children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(tree: &mut Tree, name: &str, weight: u64) -> NodeId {
        tree.insert(&[], NewNode::leaf(name, weight))
    }

    #[test]
    fn internal_weight_is_sum_of_children() {
        let mut tree = Tree::new();
        let a = leaf(&mut tree, "A", 10);
        let b = leaf(&mut tree, "B", 20);
        let root = tree.insert(
            &[a, b],
            NewNode {
                leaf_weight: 999,
                ..NewNode::internal("R")
            },
        );

        assert_eq!(tree.weight(root), Some(30), "leaf_weight must be ignored");
        assert_eq!(tree.parent_of(a), Some(root));
        assert_eq!(tree.parent_of(b), Some(root));
        assert_eq!(tree.children_of(root), &[a, b]);
        assert!(tree.validate(root).is_ok());
    }

    #[test]
    fn unnamed_node_is_canonical_empty() {
        let mut tree = Tree::new();
        let a = leaf(&mut tree, "A", 10);
        let empty = tree.insert(
            &[a],
            NewNode {
                leaf_weight: 7,
                ..NewNode::empty()
            },
        );

        assert!(tree.is_empty_node(empty));
        assert_eq!(tree.weight(empty), Some(0));
        assert!(tree.children_of(empty).is_empty());
        assert_eq!(tree.parent_of(empty), None);
        assert!(tree.is_alive(a), "ignored children stay in the arena");
        assert_eq!(tree.parent_of(a), None);
        assert!(tree.validate(empty).is_ok());
    }

    #[test]
    fn empty_node_leaves_other_trees_alone() {
        let mut tree = Tree::new();
        let a = leaf(&mut tree, "A", 10);
        let b = leaf(&mut tree, "B", 20);
        let root = tree.insert(&[a, b], NewNode::internal("R"));

        tree.insert(&[a], NewNode::empty());
        assert!(tree.is_alive(a), "still owned by R");
        assert_eq!(tree.children_of(root), &[a, b]);
        assert_eq!(tree.weight(root), Some(30));
        tree.validate(root).unwrap();
    }

    #[test]
    fn empty_nodes_are_not_claimed() {
        let mut tree = Tree::new();
        let empty = tree.insert(&[], NewNode::empty());
        let a = leaf(&mut tree, "A", 3);
        let root = tree.insert(&[a, empty, a], NewNode::internal("R"));

        assert_eq!(tree.children_of(root), &[a]);
        assert_eq!(tree.parent_of(empty), None);
        assert_eq!(tree.weight(root), Some(3));
    }

    #[test]
    fn parented_children_are_not_claimed() {
        let mut tree = Tree::new();
        let a = leaf(&mut tree, "A", 3);
        let b = leaf(&mut tree, "B", 4);
        let c = leaf(&mut tree, "C", 5);
        let first = tree.insert(&[a, b], NewNode::internal("first"));
        let second = tree.insert(&[b, c], NewNode::internal("second"));

        assert_eq!(tree.children_of(first), &[a, b]);
        assert_eq!(tree.parent_of(b), Some(first));
        assert_eq!(tree.children_of(second), &[c]);
        assert_eq!(tree.weight(second), Some(5));
        tree.validate(first).unwrap();
        tree.validate(second).unwrap();

        // Nothing claimable: the node is a leaf with its own weight.
        let third = tree.insert(&[a], NewNode::leaf("third", 9));
        assert!(tree.is_leaf(third), "a stays under first");
        assert_eq!(tree.weight(third), Some(9));
        tree.validate(first).unwrap();
    }

    #[test]
    fn remove_frees_subtree_and_reuses_slots() {
        let mut tree = Tree::new();
        let a = leaf(&mut tree, "A", 1);
        let b = leaf(&mut tree, "B", 2);
        let mid = tree.insert(&[a], NewNode::internal("mid"));
        let root = tree.insert(&[mid, b], NewNode::internal("root"));
        assert_eq!(tree.len(), 4);

        tree.remove(mid);
        assert!(!tree.is_alive(mid));
        assert!(!tree.is_alive(a));
        assert_eq!(tree.children_of(root), &[b]);
        assert_eq!(tree.len(), 2);

        let c = leaf(&mut tree, "C", 5);
        assert_ne!(c, a, "reused slots get a new generation");
        assert_ne!(c, mid, "reused slots get a new generation");
        assert_eq!(tree.name(a), None, "stale ids never alias new nodes");
    }

    #[test]
    fn move_leaves_weights_stale_until_update() {
        let mut tree = Tree::new();
        let x = leaf(&mut tree, "x", 5);
        let y = leaf(&mut tree, "y", 7);
        let z = leaf(&mut tree, "z", 11);
        let p1 = tree.insert(&[x, y], NewNode::internal("P1"));
        let p2 = tree.insert(&[z], NewNode::internal("P2"));
        let root = tree.insert(&[p1, p2], NewNode::internal("root"));

        tree.move_to(x, p2);
        assert_eq!(tree.children_of(p1), &[y]);
        assert_eq!(tree.children_of(p2), &[z, x]);
        assert_eq!(tree.parent_of(x), Some(p2));
        assert_eq!(tree.weight(p1), Some(12), "weights are not propagated");
        assert_eq!(tree.weight(p2), Some(11), "weights are not propagated");
        assert!(matches!(
            tree.validate(root),
            Err(ConsistencyError::WeightMismatch { .. })
        ));

        assert_eq!(tree.update_data_sizes(root), 23);
        assert_eq!(tree.weight(p1), Some(7));
        assert_eq!(tree.weight(p2), Some(16));
        assert!(tree.validate(root).is_ok());
    }

    #[test]
    fn invalid_moves_are_ignored() {
        let mut tree = Tree::new();
        let x = leaf(&mut tree, "x", 5);
        let y = leaf(&mut tree, "y", 7);
        let p1 = tree.insert(&[x], NewNode::internal("P1"));
        let p2 = tree.insert(&[y], NewNode::internal("P2"));
        let root = tree.insert(&[p1, p2], NewNode::internal("root"));

        // Internal node as the moved node.
        tree.move_to(p1, p2);
        // Leaf as the destination.
        tree.move_to(x, y);
        // Empty node as the moved node.
        let empty = tree.insert(&[], NewNode::empty());
        tree.move_to(empty, p2);

        assert_eq!(tree.children_of(root), &[p1, p2]);
        assert_eq!(tree.children_of(p1), &[x]);
        assert_eq!(tree.children_of(p2), &[y]);
        assert_eq!(tree.parent_of(empty), None);
    }

    #[test]
    fn move_to_current_parent_reorders() {
        let mut tree = Tree::new();
        let x = leaf(&mut tree, "x", 1);
        let y = leaf(&mut tree, "y", 2);
        let p = tree.insert(&[x, y], NewNode::internal("P"));
        tree.expand(p);

        tree.move_to(x, p);
        assert_eq!(tree.children_of(p), &[y, x]);
        assert!(tree.is_expanded(p));
        assert!(tree.validate(p).is_ok());
    }

    #[test]
    fn emptied_parent_becomes_collapsed_leaf() {
        let mut tree = Tree::new();
        let x = leaf(&mut tree, "x", 1);
        let y = leaf(&mut tree, "y", 2);
        let p1 = tree.insert(&[x], NewNode::internal("P1"));
        let p2 = tree.insert(&[y], NewNode::internal("P2"));
        let root = tree.insert(&[p1, p2], NewNode::internal("root"));
        tree.expand_all(root);

        tree.move_to(x, p2);
        assert!(tree.is_leaf(p1));
        assert!(!tree.is_expanded(p1));
        // P1 keeps its old weight, which is now authoritative.
        assert_eq!(tree.update_data_sizes(root), 4);
        assert!(tree.validate(root).is_ok());
    }

    #[test]
    fn change_size_grows_by_ceiling() {
        let mut tree = Tree::new();
        let a = leaf(&mut tree, "A", 10);
        tree.change_size(a, 0.01);
        assert_eq!(tree.weight(a), Some(11));
        tree.change_size(a, 1.0);
        assert_eq!(tree.weight(a), Some(22));
    }

    #[test]
    fn change_size_shrinks_by_floor() {
        let mut tree = Tree::new();
        let a = leaf(&mut tree, "A", 10);
        tree.change_size(a, -0.01);
        assert_eq!(tree.weight(a), Some(9), "10 + floor(-0.1) = 9");
        tree.change_size(a, -0.5);
        assert_eq!(tree.weight(a), Some(4), "9 + floor(-4.5) = 4");
    }

    #[test]
    fn change_size_never_shrinks_below_one() {
        let mut tree = Tree::new();
        let a = leaf(&mut tree, "A", 5);
        tree.change_size(a, -1.0);
        assert_eq!(tree.weight(a), Some(5));
        tree.change_size(a, -0.7);
        assert_eq!(tree.weight(a), Some(1), "5 + floor(-3.5) = 1");
        tree.change_size(a, -0.5);
        assert_eq!(tree.weight(a), Some(1));
    }

    #[test]
    fn change_size_ignores_internal_nodes_and_odd_factors() {
        let mut tree = Tree::new();
        let a = leaf(&mut tree, "A", 5);
        let root = tree.insert(&[a], NewNode::internal("R"));
        tree.change_size(root, 1.0);
        assert_eq!(tree.weight(root), Some(5));
        tree.change_size(a, f64::NAN);
        tree.change_size(a, f64::INFINITY);
        assert_eq!(tree.weight(a), Some(5));
    }

    #[test]
    fn change_size_does_not_propagate() {
        let mut tree = Tree::new();
        let a = leaf(&mut tree, "A", 5);
        let root = tree.insert(&[a], NewNode::internal("R"));
        tree.change_size(a, 1.0);
        assert_eq!(tree.weight(root), Some(5));
        assert_eq!(tree.update_data_sizes(root), 10);
    }

    #[test]
    fn update_data_sizes_on_leaf_returns_weight() {
        let mut tree = Tree::new();
        let a = leaf(&mut tree, "A", 42);
        assert_eq!(tree.update_data_sizes(a), 42);
    }

    #[test]
    fn path_string_uses_kind_separator_and_suffix() {
        let mut tree = Tree::new();
        let paper = tree.insert(&[], NewNode::leaf("Intro", 3).with_kind(NodeKind::Paper));
        let cat = tree.insert(&[paper], NewNode::internal("CS1").with_kind(NodeKind::Paper));
        let root = tree.insert(&[cat], NewNode::internal("papers").with_kind(NodeKind::Paper));

        assert_eq!(tree.path_string(paper), "papers/CS1/Intro (paper)");
        assert_eq!(tree.path_string(cat), "papers/CS1 (category)");
        assert_eq!(tree.path_string(root), "papers (category)");

        let empty = tree.insert(&[], NewNode::empty());
        assert_eq!(tree.path_string(empty), "");
    }

    #[test]
    fn validate_reports_expanded_under_collapsed() {
        let mut tree = Tree::new();
        let a = leaf(&mut tree, "A", 1);
        let mid = tree.insert(&[a], NewNode::internal("mid"));
        let root = tree.insert(&[mid], NewNode::internal("root"));
        tree.node_mut(mid).flags.insert(NodeFlags::EXPANDED);
        assert_eq!(
            tree.validate(root),
            Err(ConsistencyError::ExpandedUnderCollapsed(mid))
        );
    }

    #[test]
    fn validate_reports_broken_links() {
        let mut tree = Tree::new();
        let a = leaf(&mut tree, "A", 1);
        let b = leaf(&mut tree, "B", 1);
        let root = tree.insert(&[a, b], NewNode::internal("root"));
        tree.validate(root).unwrap();

        tree.node_mut(b).parent = None;
        assert_eq!(
            tree.validate(root),
            Err(ConsistencyError::BrokenParentLink {
                parent: root,
                child: b,
                actual: None,
            })
        );

        tree.node_mut(b).parent = Some(root);
        tree.node_mut(root).children.push(a);
        assert_eq!(
            tree.validate(root),
            Err(ConsistencyError::DuplicateChild { parent: root, child: a })
        );
    }

    #[test]
    fn validate_reports_bad_flags_and_stale_roots() {
        let mut tree = Tree::new();
        let a = leaf(&mut tree, "A", 1);
        tree.node_mut(a).flags.insert(NodeFlags::EXPANDED);
        assert_eq!(tree.validate(a), Err(ConsistencyError::ExpandedLeaf(a)));

        let empty = tree.insert(&[], NewNode::empty());
        tree.validate(empty).unwrap();
        tree.node_mut(empty).weight = 3;
        assert_eq!(tree.validate(empty), Err(ConsistencyError::MalformedEmpty(empty)));

        tree.remove(a);
        assert_eq!(tree.validate(a), Err(ConsistencyError::Stale(a)));
    }

    #[test]
    fn seeded_colours_are_reproducible() {
        let mut first: Tree = Tree::seeded(7);
        let mut second: Tree = Tree::seeded(7);
        let a = first.insert(&[], NewNode::leaf("A", 1));
        let b = second.insert(&[], NewNode::leaf("A", 1));
        assert_eq!(first.colour(a), second.colour(b));
    }

    #[test]
    fn roots_lists_parentless_nodes() {
        let mut tree = Tree::new();
        let a = leaf(&mut tree, "A", 1);
        let b = leaf(&mut tree, "B", 1);
        let r = tree.insert(&[a], NewNode::internal("R"));
        let roots: Vec<_> = tree.roots().collect();
        assert_eq!(roots, vec![b, r]);
    }
}
