// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Publication table loader.
//!
//! The table is comma-delimited with one header row and the columns
//! `authors, title, year, categories, doi, citations`. Categories are a
//! `": "`-separated path such as `CS1: Pedagogy: Pair programming`. Papers are
//! grouped into nested category nodes and weighted by citation count.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use hashbrown::HashMap;
use mosaic_tree::{NewNode, NodeId, NodeKind, Tree};
use tracing::{debug, trace};

use crate::SourceError;

const COLUMNS: usize = 6;
const CATEGORY_SEPARATOR: &str = ": ";

/// One row of the publication table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaperRecord {
    /// Author list as written in the table.
    pub authors: String,
    /// Paper title; becomes the leaf name.
    pub title: String,
    /// Publication year, kept verbatim as a grouping key.
    pub year: String,
    /// Category path, outermost first. Empty segments are dropped.
    pub categories: Vec<String>,
    /// Digital object identifier or URL.
    pub doi: String,
    /// Citation count; becomes the leaf weight.
    pub citations: u64,
}

/// Payload attached to nodes produced by [`build_paper_tree`].
///
/// Category nodes carry the default (empty) value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaperInfo {
    /// Author list.
    pub authors: String,
    /// Digital object identifier or URL.
    pub doi: String,
}

/// Options for [`build_paper_tree`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PaperOptions {
    /// Group by publication year before grouping by category.
    pub by_year: bool,
}

/// Parse a publication table.
///
/// The first row is a header and is skipped. Blank lines between rows are
/// ignored. Fields may be wrapped in double quotes, inside which `""` stands
/// for one quote and line breaks are kept. Columns past the sixth are
/// ignored. Errors report the line on which the offending row starts.
pub fn parse_papers(reader: impl BufRead) -> Result<Vec<PaperRecord>, SourceError> {
    let mut records = Vec::new();
    // Row text and its first line, while a quoted field is still open.
    let mut pending: Option<(usize, String)> = None;
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|e| SourceError::parse(line_no, e.to_string()))?;
        let (start, row) = match pending.take() {
            Some((start, mut row)) => {
                row.push('\n');
                row.push_str(&line);
                (start, row)
            }
            None if line_no == 1 || line.trim().is_empty() => continue,
            None => (line_no, line),
        };
        match split_fields(&row) {
            Some(fields) => {
                records.push(parse_record(fields).map_err(|m| SourceError::parse(start, m))?);
            }
            None => pending = Some((start, row)),
        }
    }
    if let Some((start, _)) = pending {
        return Err(SourceError::parse(start, "unterminated quoted field"));
    }
    debug!(records = records.len(), "parsed publication table");
    Ok(records)
}

/// Open `path` and parse it with [`parse_papers`].
pub fn read_papers(path: impl AsRef<Path>) -> Result<Vec<PaperRecord>, SourceError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| SourceError::io(path, e))?;
    parse_papers(BufReader::new(file))
}

fn parse_record(fields: Vec<String>) -> Result<PaperRecord, String> {
    if fields.len() < COLUMNS {
        return Err(format!(
            "expected {COLUMNS} fields, found {}",
            fields.len()
        ));
    }
    let mut fields = fields.into_iter();
    let mut next = || fields.next().unwrap_or_default();
    let authors = next();
    let title = next();
    let year = next();
    let categories = next()
        .split(CATEGORY_SEPARATOR)
        .filter(|c| !c.is_empty())
        .map(str::to_owned)
        .collect();
    let doi = next();
    let citations = next();
    let citations = citations
        .trim()
        .parse()
        .map_err(|e| format!("bad citation count {citations:?}: {e}"))?;
    Ok(PaperRecord {
        authors,
        title,
        year,
        categories,
        doi,
        citations,
    })
}

/// Split one row on commas, honouring double-quoted fields.
///
/// Returns `None` while a quoted field is still open.
fn split_fields(row: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = row.chars().peekable();
    let mut quoted = false;
    while let Some(c) = chars.next() {
        match (quoted, c) {
            (true, '"') if chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            (true, '"') => quoted = false,
            (false, '"') if field.is_empty() => quoted = true,
            (false, ',') => fields.push(std::mem::take(&mut field)),
            (_, c) => field.push(c),
        }
    }
    if quoted {
        return None;
    }
    fields.push(field);
    Some(fields)
}

/// Records grouped under one category (or year, or the root).
///
/// `order` remembers where the papers slot and each subcategory were first
/// seen.
#[derive(Debug, Default)]
struct Bucket<'a> {
    order: Vec<Slot>,
    papers: Vec<&'a PaperRecord>,
    categories: Vec<(&'a str, Bucket<'a>)>,
    index: HashMap<&'a str, usize>,
}

#[derive(Clone, Copy, Debug)]
enum Slot {
    Papers,
    Category(usize),
}

impl<'a> Bucket<'a> {
    fn category(&mut self, name: &'a str) -> &mut Self {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                let idx = self.categories.len();
                self.categories.push((name, Self::default()));
                self.index.insert(name, idx);
                self.order.push(Slot::Category(idx));
                idx
            }
        };
        &mut self.categories[idx].1
    }

    fn push_paper(&mut self, paper: &'a PaperRecord) {
        if self.papers.is_empty() {
            self.order.push(Slot::Papers);
        }
        self.papers.push(paper);
    }

    /// Insert this bucket's contents into `tree` and return the new nodes in
    /// display order.
    fn build(&self, tree: &mut Tree<PaperInfo>) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.order.len());
        for slot in &self.order {
            match *slot {
                Slot::Papers => {
                    for paper in &self.papers {
                        let leaf = NewNode {
                            name: Some(paper.title.clone()),
                            kind: NodeKind::Paper,
                            leaf_weight: paper.citations,
                            data: PaperInfo {
                                authors: paper.authors.clone(),
                                doi: paper.doi.clone(),
                            },
                        };
                        out.push(tree.insert(&[], leaf));
                    }
                }
                Slot::Category(idx) => {
                    let (name, bucket) = &self.categories[idx];
                    let children = bucket.build(tree);
                    out.push(tree.insert(&children, category_node(name)));
                }
            }
        }
        out
    }
}

fn category_node(name: &str) -> NewNode<PaperInfo> {
    NewNode::internal(name).with_kind(NodeKind::Paper)
}

/// Build the category tree for `records` under a root named `root_name`.
///
/// With [`PaperOptions::by_year`], the root's children are years and each
/// year holds its own category tree; otherwise years are ignored. At every
/// level, categories and the block of papers filed directly at that level
/// appear in the order they were first seen.
pub fn build_paper_tree(
    tree: &mut Tree<PaperInfo>,
    root_name: &str,
    records: &[PaperRecord],
    options: &PaperOptions,
) -> NodeId {
    let mut root = Bucket::default();
    for record in records {
        let mut bucket = &mut root;
        if options.by_year {
            bucket = bucket.category(&record.year);
        }
        for category in &record.categories {
            bucket = bucket.category(category);
        }
        trace!(title = %record.title, "filed paper");
        bucket.push_paper(record);
    }

    let children = root.build(tree);
    let id = tree.insert(&children, category_node(root_name));
    debug!(
        papers = records.len(),
        citations = tree.weight(id).unwrap_or_default(),
        by_year = options.by_year,
        "built paper tree"
    );
    id
}
