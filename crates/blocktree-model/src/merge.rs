//! Merged-cell normalization.
//!
//! Spreadsheet applications store a merged region's value only in its top-left (anchor)
//! cell; every other covered cell reads back as blank. The hierarchy rules need the value
//! on every row the region spans, so the normalizer copies the anchor value into the
//! covered cells of the [`DataWindow`].

use serde::{Deserialize, Serialize};

use crate::{DataWindow, Grid, MergeRect};

/// How a merged region's anchor value is written into covered cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergePolicy {
    /// Only fill covered cells that are currently empty. Explicit values are kept, and when
    /// rectangles overlap the first one processed wins.
    #[default]
    FillIfEmpty,
    /// Unconditionally replace every covered cell. When rectangles overlap the last one
    /// processed wins.
    Overwrite,
}

/// Counters describing one normalization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Rectangles that intersected the window and were applied.
    pub applied: usize,
    /// Rectangles that lay entirely in the header rows or outside the grid.
    pub outside: usize,
    /// Rectangles with zero or inverted coordinates.
    pub malformed: usize,
    /// Cells whose value was written.
    pub cells_written: usize,
}

/// Propagate merged-region anchor values into `window`.
///
/// `full` is the complete, unskipped worksheet grid the window was cut from: anchor values
/// are always read from it, since an anchor may sit in the header rows while the region
/// extends into the data. Rectangles are processed in the order given and are clipped to
/// the window's bounds.
pub fn normalize_merges(
    full: &Grid,
    window: &mut DataWindow,
    merges: &[MergeRect],
    policy: MergePolicy,
) -> MergeStats {
    let mut stats = MergeStats::default();
    let header_rows = window.header_rows();
    let (window_rows, window_cols) = (window.rows(), window.width());

    for rect in merges {
        if rect.is_degenerate() {
            log::warn!("skipping malformed merge rectangle {rect:?}");
            stats.malformed += 1;
            continue;
        }

        let (anchor_row, anchor_col) = rect.anchor();
        let Some(anchor) = full.checked_get(anchor_row, anchor_col) else {
            log::debug!("merge {rect} anchor lies outside the sheet");
            stats.outside += 1;
            continue;
        };

        // Worksheet rows (0-based) -> window rows, clipped to the window.
        let last_row = rect.max_row as usize - 1;
        let last_col = (rect.max_col as usize - 1).min(window_cols.saturating_sub(1));
        let first_row = anchor_row.max(header_rows);
        if last_row < header_rows
            || first_row - header_rows >= window_rows
            || anchor_col >= window_cols
        {
            stats.outside += 1;
            continue;
        }
        let first_row = first_row - header_rows;
        let last_row = (last_row - header_rows).min(window_rows - 1);

        let anchor = anchor.clone();
        let grid = window.grid_mut();
        for row in first_row..=last_row {
            for col in anchor_col..=last_col {
                let write = match policy {
                    MergePolicy::Overwrite => true,
                    MergePolicy::FillIfEmpty => grid.get(row, col).is_empty(),
                };
                if write {
                    grid.set(row, col, anchor.clone());
                    stats.cells_written += 1;
                }
            }
        }
        stats.applied += 1;
    }

    log::debug!(
        "merge normalization ({policy:?}): {} applied, {} outside window, {} malformed, {} cells written",
        stats.applied,
        stats.outside,
        stats.malformed,
        stats.cells_written
    );
    stats
}
