//! Parent/child edge extraction.
//!
//! A block-division sheet encodes a tree by indentation: the column that holds a value on a
//! row is that row's depth, and the nearest non-empty column to its left is its parent.
//! Two rule families are applied to every row independently:
//!
//! - **primary child** ([`primary_child_edges`]): the rank-7 column is a leaf whose name is
//!   expanded with `P`/`C`/`S` suffixes taken from the numeric flag columns 8..=10;
//! - **level cascade** ([`level_edges`]): each level column 6..=2 is paired with its nearest
//!   non-empty ancestor column.
//!
//! Rows without a resolvable parent contribute nothing.

use serde::{Deserialize, Serialize};

use crate::label::{child_base, label};
use crate::layout::{self, CHILD_RANK, SUFFIX_RANKS};
use crate::DataWindow;

/// A single parent → child relationship.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub parent: String,
    pub child: String,
}

impl Edge {
    pub fn new(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            child: child.into(),
        }
    }
}

/// All edges of the window, in emission order, duplicates included.
///
/// Primary-child edges come first (row order), followed by the level cascade for ranks
/// 6, 5, 4, 3, 2 (row order within each rank).
pub fn extract_edges(window: &DataWindow) -> Vec<Edge> {
    let mut edges = primary_child_edges(window);
    let primary = edges.len();

    for rank in layout::cascade_child_ranks() {
        let before = edges.len();
        edges.extend(level_edges(window, rank));
        log::debug!("rank {rank}: {} level edges", edges.len() - before);
    }

    log::debug!(
        "extracted {} edges ({primary} primary, {} level) from {} rows",
        edges.len(),
        edges.len() - primary,
        window.rows()
    );
    edges
}

/// Edges for the primary child column, with suffix expansion.
pub fn primary_child_edges(window: &DataWindow) -> Vec<Edge> {
    let mut edges = Vec::new();
    for row in 0..window.rows() {
        let Some(base) = child_base(window.cell(row, CHILD_RANK)) else {
            continue;
        };
        let Some(parent) = resolve_parent(window, row, CHILD_RANK) else {
            continue;
        };

        let suffixes = row_suffixes(window, row);
        if suffixes.is_empty() {
            edges.push(Edge::new(parent, base));
        } else {
            edges.extend(
                suffixes
                    .into_iter()
                    .map(|suffix| Edge::new(parent.clone(), format!("{base}{suffix}"))),
            );
        }
    }
    edges
}

/// Edges pairing level column `rank` with its nearest non-empty ancestor column.
pub fn level_edges(window: &DataWindow, rank: usize) -> Vec<Edge> {
    (0..window.rows())
        .filter_map(|row| {
            let child = label(window.cell(row, rank))?;
            let parent = resolve_parent(window, row, rank)?;
            Some(Edge::new(parent, child))
        })
        .collect()
}

/// Label of the first non-empty cell left of `rank`, scanning nearest first.
///
/// Only the first non-empty cell is considered: when it cleans to an empty label the row
/// has no parent.
pub fn resolve_parent(window: &DataWindow, row: usize, rank: usize) -> Option<String> {
    layout::parent_ranks(rank)
        .find_map(|r| label(window.cell(row, r)))
        .filter(|parent| !parent.is_empty())
}

/// Suffix characters whose flag column holds a number on `row`, in `P`, `C`, `S` order.
pub fn row_suffixes(window: &DataWindow, row: usize) -> Vec<char> {
    SUFFIX_RANKS
        .iter()
        .filter(|(rank, _)| window.cell(row, *rank).as_number().is_some())
        .map(|(_, suffix)| *suffix)
        .collect()
}
