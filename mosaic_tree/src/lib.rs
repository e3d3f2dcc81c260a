// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mosaic Tree: a weighted tree arena laid out as a slice-and-dice treemap.
//!
//! - Represents hierarchical data (folders and files, categories and papers) as
//!   nodes whose weight is either supplied (leaves) or summed from children.
//! - Lays a tree out inside a rectangle so every node's area is proportional to
//!   its weight.
//! - Tracks which nodes are expanded, yields the rectangles of the displayed
//!   frontier, and answers point queries against it.
//!
//! ## Building a tree
//!
//! Trees are built bottom-up. Insert the leaves, then hand their ids to the
//! parent in [`Tree::insert`]:
//!
//! ```rust
//! use mosaic_tree::{NewNode, NodeKind, Tree, TreeRect};
//!
//! let mut tree = Tree::new();
//! let notes = tree.insert(&[], NewNode::leaf("notes.txt", 40).with_kind(NodeKind::FileSystem));
//! let slides = tree.insert(&[], NewNode::leaf("slides.pdf", 60).with_kind(NodeKind::FileSystem));
//! let talk = tree.insert(&[notes, slides], NewNode::internal("talk").with_kind(NodeKind::FileSystem));
//!
//! tree.update_rectangles(talk, (0, 0, 100, 50));
//! tree.expand(talk);
//!
//! let tiles: Vec<TreeRect> = tree.rectangles(talk).into_iter().map(|(r, _)| r).collect();
//! assert_eq!(tiles, [TreeRect::new(0, 0, 40, 50), TreeRect::new(40, 0, 60, 50)]);
//! assert_eq!(tree.tree_at_position(talk, (70, 10)), Some(slides));
//! ```
//!
//! ## Stale weights
//!
//! [`Tree::move_to`] and [`Tree::change_size`] only touch the node they are
//! given. Ancestors keep their old weight until [`Tree::update_data_sizes`]
//! is called on the root; front ends usually do that right before the next
//! [`Tree::update_rectangles`].
//!
//! ## API overview
//!
//! - [`Tree`]: the arena; construction, layout, display state, queries.
//! - [`NewNode`]: description of a node to insert.
//! - [`NodeId`]: generational handle of a node.
//! - [`NodeKind`]: path formatting family (separator and suffix).
//! - [`NodeFlags`]: display-state flags.
//! - [`TreeRect`] and [`Colour`]: what a renderer needs per tile.
//! - [`ConsistencyError`]: invariant violations found by [`Tree::validate`].

mod display;
mod error;
mod layout;
mod tree;
mod types;
mod util;

pub use error::ConsistencyError;
pub use tree::Tree;
pub use types::{Colour, NewNode, NodeFlags, NodeId, NodeKind, TreeRect};
