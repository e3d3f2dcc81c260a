// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mosaic Sources: builders that fill a [`mosaic_tree::Tree`] from real data.
//!
//! - [`filesystem`]: walks a directory; folders become internal nodes and
//!   files become leaves weighted by their byte length.
//! - [`papers`]: reads a table of publications and files each paper under
//!   its (optionally year-prefixed) category path, weighted by citations.
//!
//! Both builders return the id of the root they inserted, so several sources
//! can share one arena as long as the payload type matches.
//!
//! ```rust,no_run
//! use mosaic_sources::filesystem::{scan, ScanOptions};
//! use mosaic_tree::Tree;
//!
//! let mut tree = Tree::default();
//! let root = scan(&mut tree, "/var/log", &ScanOptions::default())?;
//! tree.update_rectangles(root, (0, 0, 1024, 768));
//! tree.expand_all(root);
//! for (rect, colour) in tree.rectangles(root) {
//!     println!("{rect:?} {colour:?}");
//! }
//! # Ok::<(), mosaic_sources::SourceError>(())
//! ```

mod error;
pub mod filesystem;
pub mod papers;

pub use error::SourceError;
