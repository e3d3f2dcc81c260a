// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text treemap: lay out a directory or a publication table and print tiles.
//!
//! This example shows how to combine:
//! - `mosaic_sources` to build a tree from a directory or a CSV table,
//! - `mosaic_tree` for layout, expand/collapse state, and hit testing,
//! - `kurbo` to measure the tiles a renderer would draw.
//!
//! Run:
//! - `cargo run -p mosaic_demos --example dump_treemap -- ~/Documents --expand-all`
//! - `cargo run -p mosaic_demos --example dump_treemap -- --papers cs1_papers.csv --by-year --at 120,40`

use std::env;
use std::path::PathBuf;

use clap::Parser;
use kurbo::Rect;
use mosaic_sources::SourceError;
use mosaic_sources::filesystem::{ScanOptions, scan};
use mosaic_sources::papers::{PaperOptions, build_paper_tree, read_papers};
use mosaic_tree::{NodeId, Tree};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(about = "Print the displayed tiles of a treemap")]
struct Cli {
    /// Directory (or file) to scan.
    #[arg(required_unless_present = "papers", conflicts_with = "papers")]
    path: Option<PathBuf>,
    /// Publication table to load instead of a directory.
    #[arg(long, value_name = "CSV")]
    papers: Option<PathBuf>,
    /// Width of the layout rectangle.
    #[arg(long, default_value_t = 1024)]
    width: i32,
    /// Height of the layout rectangle.
    #[arg(long, default_value_t = 738)]
    height: i32,
    /// Expand every node before printing.
    #[arg(long)]
    expand_all: bool,
    /// Group papers by year first.
    #[arg(long, requires = "papers")]
    by_year: bool,
    /// Report the displayed node under this point.
    #[arg(long, value_name = "X,Y", value_parser = parse_point)]
    at: Option<(i32, i32)>,
}

fn parse_point(s: &str) -> Result<(i32, i32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {s:?}"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y: {e}"))?;
    Ok((x, y))
}

fn main() -> Result<(), SourceError> {
    let cli = Cli::parse();

    let directives = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_owned());
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(EnvFilter::builder().parse_lossy(directives))
        .with_writer(std::io::stderr)
        .init();

    if let Some(csv) = &cli.papers {
        let records = read_papers(csv)?;
        let mut tree = Tree::default();
        let root = build_paper_tree(
            &mut tree,
            "CS1",
            &records,
            &PaperOptions {
                by_year: cli.by_year,
            },
        );
        report(&mut tree, root, &cli);
    } else if let Some(path) = &cli.path {
        let mut tree = Tree::default();
        let root = scan(&mut tree, path, &ScanOptions::default())?;
        report(&mut tree, root, &cli);
    }
    Ok(())
}

fn report<D>(tree: &mut Tree<D>, root: NodeId, cli: &Cli) {
    tree.update_rectangles(root, (0, 0, cli.width, cli.height));
    if cli.expand_all {
        tree.expand_all(root);
    } else {
        tree.expand(root);
    }

    let shown = tree.displayed_nodes(root);
    let mut covered = 0.0;
    for &id in &shown {
        let Some(rect) = tree.rect(id) else { continue };
        let colour = tree.colour(id).unwrap_or_default();
        covered += Rect::from(rect).area();
        println!(
            "{:>6} {:>6} {:>6} {:>6}  #{:02x}{:02x}{:02x}  {}",
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            colour.r,
            colour.g,
            colour.b,
            tree.path_string(id),
        );
    }
    info!(
        tiles = shown.len(),
        covered,
        total = f64::from(cli.width) * f64::from(cli.height),
        "layout done"
    );

    if let Some(pos) = cli.at {
        match tree.tree_at_position(root, pos) {
            Some(id) => println!("at {pos:?}: {}", tree.path_string(id)),
            None => println!("at {pos:?}: nothing"),
        }
    }
}
