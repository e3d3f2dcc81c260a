// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Consistency failures reported by [`crate::Tree::validate`].

use crate::types::NodeId;

/// A broken structural or display-state invariant.
///
/// None of the public operations produce these on their own; seeing one means
/// either an accounting bug or that ancestor weights were left stale after
/// [`crate::Tree::move_to`] or [`crate::Tree::change_size`] without a call to
/// [`crate::Tree::update_data_sizes`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConsistencyError {
    /// The identifier does not refer to a live node.
    #[error("{0:?} does not refer to a live node")]
    Stale(NodeId),
    /// An internal node's cached weight differs from the sum of its children.
    #[error("{node:?} has weight {weight} but its children sum to {children}")]
    WeightMismatch {
        /// The internal node.
        node: NodeId,
        /// Its cached weight.
        weight: u64,
        /// Sum of its children's weights.
        children: u64,
    },
    /// A child does not point back at the node listing it.
    #[error("{child:?} is listed under {parent:?} but links to {actual:?}")]
    BrokenParentLink {
        /// The node listing the child.
        parent: NodeId,
        /// The listed child.
        child: NodeId,
        /// The parent recorded on the child.
        actual: Option<NodeId>,
    },
    /// A child is listed more than once.
    #[error("{child:?} is listed more than once under {parent:?}")]
    DuplicateChild {
        /// The node listing the child.
        parent: NodeId,
        /// The repeated child.
        child: NodeId,
    },
    /// An unnamed node has children, a parent, or weight.
    #[error("empty node {0:?} has children, a parent, or a non-zero weight")]
    MalformedEmpty(NodeId),
    /// An expanded node sits below a collapsed parent.
    #[error("{0:?} is expanded but its parent is collapsed")]
    ExpandedUnderCollapsed(NodeId),
    /// A leaf carries the expanded flag.
    #[error("leaf {0:?} is marked expanded")]
    ExpandedLeaf(NodeId),
}
