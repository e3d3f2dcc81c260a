// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directory scanner: one node per file or folder, weighted by byte size.

use std::fs;
use std::path::{Path, PathBuf};

use mosaic_tree::{NewNode, NodeId, NodeKind, Tree};
use tracing::{debug, trace};

use crate::SourceError;

/// Payload attached to every node produced by [`scan`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileEntry {
    /// Full path of the file or folder as it was visited.
    pub path: PathBuf,
}

/// Options for [`scan`].
#[derive(Clone, Copy, Debug)]
pub struct ScanOptions {
    /// Visit directory entries in name order instead of the order the
    /// platform reports them.
    pub sort_entries: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self { sort_entries: true }
    }
}

/// Build the tree rooted at `path` and return its root.
///
/// Folders become internal nodes weighing the sum of their contents; files
/// become leaves weighing their byte length. An empty folder is a leaf of
/// weight zero. Symbolic links are not followed and are sized by their own
/// metadata.
///
/// On error, every node inserted by this call is removed again, leaving
/// `tree` as it was.
pub fn scan(
    tree: &mut Tree<FileEntry>,
    path: impl AsRef<Path>,
    options: &ScanOptions,
) -> Result<NodeId, SourceError> {
    let path = path.as_ref();
    let root = scan_entry(tree, path, options)?;
    debug!(
        path = %path.display(),
        nodes = tree.len(),
        bytes = tree.weight(root).unwrap_or_default(),
        "scanned directory tree"
    );
    Ok(root)
}

fn scan_entry(
    tree: &mut Tree<FileEntry>,
    path: &Path,
    options: &ScanOptions,
) -> Result<NodeId, SourceError> {
    let metadata = fs::symlink_metadata(path).map_err(|e| SourceError::io(path, e))?;
    let name = entry_name(path);

    let children = if metadata.is_dir() {
        let mut entries = fs::read_dir(path)
            .and_then(|dir| dir.map(|e| e.map(|e| e.path())).collect::<Result<Vec<_>, _>>())
            .map_err(|e| SourceError::io(path, e))?;
        if options.sort_entries {
            entries.sort_unstable_by(|a, b| a.file_name().cmp(&b.file_name()));
        }
        scan_children(tree, &entries, options)?
    } else {
        trace!(path = %path.display(), len = metadata.len(), "file");
        Vec::new()
    };

    Ok(tree.insert(
        &children,
        NewNode {
            name: Some(name),
            kind: NodeKind::FileSystem,
            leaf_weight: if metadata.is_dir() { 0 } else { metadata.len() },
            data: FileEntry {
                path: path.to_path_buf(),
            },
        },
    ))
}

/// Scan each of `entries`; on the first failure, remove the siblings already
/// inserted before reporting it.
fn scan_children(
    tree: &mut Tree<FileEntry>,
    entries: &[PathBuf],
    options: &ScanOptions,
) -> Result<Vec<NodeId>, SourceError> {
    let mut children = Vec::with_capacity(entries.len());
    for entry in entries {
        match scan_entry(tree, entry, options) {
            Ok(child) => children.push(child),
            Err(err) => {
                for child in children {
                    tree.remove(child);
                }
                return Err(err);
            }
        }
    }
    Ok(children)
}

/// Final component of `path`, or the whole path when there is none (`/`, `..`).
fn entry_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use mosaic_tree::TreeRect;

    use super::*;

    fn write(path: &Path, len: usize) {
        fs::write(path, vec![b'x'; len]).unwrap();
    }

    /// `workshop/` with three entries: a folder of three files, a lone file,
    /// and a folder of two files; 151 bytes in total.
    fn workshop() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("workshop");
        fs::create_dir_all(root.join("activities")).unwrap();
        fs::create_dir_all(root.join("prep")).unwrap();
        write(&root.join("activities").join("agenda.md"), 2);
        write(&root.join("activities").join("handout.tex"), 20);
        write(&root.join("activities").join("worksheet.tex"), 49);
        write(&root.join("draft.pptx"), 58);
        write(&root.join("prep").join("notes.txt"), 16);
        write(&root.join("prep").join("todo.txt"), 6);
        dir
    }

    #[test]
    fn single_file_is_a_leaf() {
        let dir = workshop();
        let path = dir.path().join("workshop").join("draft.pptx");
        let mut tree = Tree::seeded(1);
        let root = scan(&mut tree, &path, &ScanOptions::default()).unwrap();

        assert_eq!(tree.name(root), Some("draft.pptx"));
        assert_eq!(tree.weight(root), Some(58));
        assert!(tree.is_leaf(root), "a file has no children");
        assert_eq!(tree.parent_of(root), None);
        assert_eq!(tree.kind(root), Some(NodeKind::FileSystem));
        assert_eq!(tree.data(root).map(|e| e.path.as_path()), Some(path.as_path()));
    }

    #[test]
    fn directory_weights_sum_contents() {
        let dir = workshop();
        let mut tree = Tree::seeded(1);
        let root = scan(
            &mut tree,
            dir.path().join("workshop"),
            &ScanOptions::default(),
        )
        .unwrap();

        assert_eq!(tree.name(root), Some("workshop"));
        assert_eq!(tree.weight(root), Some(151));
        let names: Vec<_> = tree
            .children_of(root)
            .iter()
            .map(|&c| (tree.name(c).unwrap(), tree.weight(c).unwrap()))
            .collect();
        assert_eq!(
            names,
            [("activities", 71), ("draft.pptx", 58), ("prep", 22)]
        );
        for &child in tree.children_of(root) {
            assert_eq!(tree.parent_of(child), Some(root));
        }
        tree.validate(root).unwrap();
    }

    #[test]
    fn fully_expanded_layout() {
        let dir = workshop();
        let mut tree = Tree::seeded(1);
        let root = scan(
            &mut tree,
            dir.path().join("workshop"),
            &ScanOptions::default(),
        )
        .unwrap();

        tree.update_rectangles(root, (0, 0, 200, 100));
        tree.expand_all(root);
        let rects: Vec<_> = tree.rectangles(root).into_iter().map(|(r, _)| r).collect();
        assert_eq!(
            rects,
            [
                TreeRect::new(0, 0, 94, 2),
                TreeRect::new(0, 2, 94, 28),
                TreeRect::new(0, 30, 94, 70),
                TreeRect::new(94, 0, 76, 100),
                TreeRect::new(170, 0, 30, 72),
                TreeRect::new(170, 72, 30, 28),
            ]
        );
    }

    #[test]
    fn path_string_uses_platform_separator() {
        let dir = workshop();
        let mut tree = Tree::seeded(1);
        let root = scan(
            &mut tree,
            dir.path().join("workshop"),
            &ScanOptions::default(),
        )
        .unwrap();
        let prep = tree.children_of(root)[2];
        let todo = tree.children_of(prep)[1];

        let sep = std::path::MAIN_SEPARATOR;
        assert_eq!(tree.path_string(todo), format!("workshop{sep}prep{sep}todo.txt (file)"));
        assert_eq!(tree.path_string(prep), format!("workshop{sep}prep (folder)"));
    }

    #[test]
    fn empty_directory_is_zero_weight_leaf() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty");
        fs::create_dir(&empty).unwrap();

        let mut tree = Tree::seeded(1);
        let root = scan(&mut tree, &empty, &ScanOptions::default()).unwrap();
        assert!(tree.is_leaf(root), "nothing to hold");
        assert_eq!(tree.weight(root), Some(0));
        assert_eq!(tree.path_string(root), "empty (file)");
    }

    #[test]
    fn missing_path_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let mut tree = Tree::seeded(1);
        let err = scan(&mut tree, &missing, &ScanOptions::default()).unwrap_err();
        match err {
            SourceError::Io { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
        assert!(tree.is_empty(), "nothing inserted");
    }

    #[test]
    fn failed_scan_leaves_arena_untouched() {
        let dir = workshop();
        let root_path = dir.path().join("workshop");
        let mut tree = Tree::seeded(1);
        let earlier = tree.insert(&[], NewNode::leaf("earlier", 1));

        // A readable folder and a file, then an entry that vanished.
        let entries = [
            root_path.join("activities"),
            root_path.join("draft.pptx"),
            root_path.join("gone"),
        ];
        let err = scan_children(&mut tree, &entries, &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }), "{err}");
        assert_eq!(tree.len(), 1, "only the earlier node survives");
        assert_eq!(tree.roots().collect::<Vec<_>>(), [earlier]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_followed() {
        let dir = workshop();
        let root_path = dir.path().join("workshop");
        std::os::unix::fs::symlink(root_path.join("activities"), root_path.join("zz-link"))
            .unwrap();

        let mut tree = Tree::seeded(1);
        let root = scan(&mut tree, &root_path, &ScanOptions::default()).unwrap();
        let link = *tree.children_of(root).last().unwrap();
        assert_eq!(tree.name(link), Some("zz-link"));
        assert!(tree.is_leaf(link), "link is not descended into");
        let link_len = fs::symlink_metadata(root_path.join("zz-link")).unwrap().len();
        assert_eq!(tree.weight(link), Some(link_len));
    }

    #[test]
    fn name_falls_back_to_whole_path() {
        assert_eq!(entry_name(Path::new("a/b/c.txt")), "c.txt");
        assert_eq!(entry_name(Path::new("/")), "/");
    }
}
