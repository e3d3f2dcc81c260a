// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the treemap tree: node identifiers, flags, kinds, and geometry.

use std::path::MAIN_SEPARATOR_STR;

/// Identifier for a node in the tree (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Display-state flags of a node.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// The node's children are revealed instead of the node itself.
        const EXPANDED = 0b0000_0001;
    }
}

/// The family a node belongs to.
///
/// The kind only affects how [`crate::Tree::path_string`] renders a node;
/// layout and queries treat every kind the same way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A node with no particular data source.
    #[default]
    Generic,
    /// A folder or file on disk.
    FileSystem,
    /// A publication category or a single paper.
    Paper,
}

impl NodeKind {
    /// String placed between the names of consecutive nodes in a path.
    pub fn separator(self) -> &'static str {
        match self {
            Self::Generic | Self::Paper => "/",
            Self::FileSystem => MAIN_SEPARATOR_STR,
        }
    }

    /// String appended after the last name of a path.
    pub fn suffix(self, is_leaf: bool) -> &'static str {
        match (self, is_leaf) {
            (Self::Generic, true) => " (leaf)",
            (Self::Generic, false) => " (internal)",
            (Self::FileSystem, true) => " (file)",
            (Self::FileSystem, false) => " (folder)",
            (Self::Paper, true) => " (paper)",
            (Self::Paper, false) => " (category)",
        }
    }
}

/// An RGB colour used to tell rectangles apart when rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Colour {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Colour {
    /// Create a colour from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub(crate) fn random(rng: &mut fastrand::Rng) -> Self {
        Self::new(rng.u8(..), rng.u8(..), rng.u8(..))
    }
}

/// An integer rectangle given by its origin and size, in pixels.
///
/// Containment is inclusive on all four edges, so a point on an edge shared
/// by two neighbours belongs to both.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TreeRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

impl TreeRect {
    /// The empty rectangle at the origin.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Create a rectangle from origin and size.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the point lies inside the rectangle or on its boundary.
    pub fn contains(&self, (px, py): (i32, i32)) -> bool {
        let (x, y) = (i64::from(self.x), i64::from(self.y));
        let (px, py) = (i64::from(px), i64::from(py));
        x <= px
            && px <= x + i64::from(self.width)
            && y <= py
            && py <= y + i64::from(self.height)
    }

    /// Area covered by the rectangle; zero for degenerate rectangles.
    pub fn area(&self) -> i64 {
        if self.width <= 0 || self.height <= 0 {
            return 0;
        }
        i64::from(self.width) * i64::from(self.height)
    }

    /// Whether the rectangle covers no area.
    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }
}

impl From<TreeRect> for kurbo::Rect {
    fn from(r: TreeRect) -> Self {
        Self::from_origin_size(
            (f64::from(r.x), f64::from(r.y)),
            (f64::from(r.width), f64::from(r.height)),
        )
    }
}

impl From<(i32, i32, i32, i32)> for TreeRect {
    fn from((x, y, width, height): (i32, i32, i32, i32)) -> Self {
        Self::new(x, y, width, height)
    }
}

/// Description of a node to be inserted with [`crate::Tree::insert`].
#[derive(Clone, Debug, Default)]
pub struct NewNode<D> {
    /// Label of the node; `None` produces the empty node.
    pub name: Option<String>,
    /// Path formatting family.
    pub kind: NodeKind,
    /// Weight used when the node has no children.
    pub leaf_weight: u64,
    /// Caller payload.
    pub data: D,
}

impl<D: Default> NewNode<D> {
    /// A leaf with the given name and weight.
    pub fn leaf(name: impl Into<String>, weight: u64) -> Self {
        Self {
            name: Some(name.into()),
            leaf_weight: weight,
            ..Self::default()
        }
    }

    /// A named node whose weight will come from its children.
    pub fn internal(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// The empty node.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl<D> NewNode<D> {
    /// Set the node kind.
    #[must_use]
    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the payload.
    #[must_use]
    pub fn with_data(mut self, data: D) -> Self {
        self.data = data;
        self
    }
}
