//! `blocktree-model` turns a block-division worksheet into a parent/child hierarchy.
//!
//! The sheet lays the hierarchy out by indentation across a fixed set of columns (see
//! [`layout`]), shares ancestors between rows by merging cells, and keeps free-text
//! remarks in a trailing annotation column. Extraction runs in four steps:
//!
//! 1. cut the [`DataWindow`] out of the full [`Grid`] and propagate merged-cell anchor
//!    values into it ([`normalize_merges`]);
//! 2. derive [`Edge`]s from the column structure ([`extract_edges`]);
//! 3. split the remark column into [`RemarkRecord`]s ([`split_remarks`]);
//! 4. deduplicate both tables ([`ExtractionResult::assemble`]).
//!
//! The crate does no I/O; `blocktree-io` loads grids from workbooks and writes results.

mod address;
mod assemble;
mod error;
mod grid;
pub mod hierarchy;
pub mod label;
pub mod layout;
mod merge;
pub mod remark;
mod value;

pub use address::{MergeRect, MergeRectParseError};
pub use assemble::{dedup_preserving_order, ExtractionResult};
pub use error::ExtractError;
pub use grid::{DataWindow, Grid};
pub use hierarchy::{extract_edges, Edge};
pub use label::{child_base, clean_label, label};
pub use merge::{normalize_merges, MergePolicy, MergeStats};
pub use remark::{split_remark_text, split_remarks, RemarkRecord};
pub use value::CellValue;

/// Knobs for one extraction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    pub merge_policy: MergePolicy,
    /// Worksheet rows above the data window.
    pub header_rows: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            merge_policy: MergePolicy::default(),
            header_rows: layout::HEADER_ROWS,
        }
    }
}

/// Cut the data window out of `full` and normalize merged cells into it.
///
/// Fails when the window is empty or too narrow to hold a single parent/child pair.
pub fn prepare_window(
    full: &Grid,
    merges: &[MergeRect],
    options: &ExtractOptions,
) -> Result<DataWindow, ExtractError> {
    let mut window = DataWindow::from_full(full, options.header_rows);
    if window.rows() == 0 {
        return Err(ExtractError::EmptyDataWindow {
            rows: full.rows(),
            header_rows: options.header_rows,
        });
    }
    if window.width() < layout::MIN_COLUMNS {
        return Err(ExtractError::TooFewColumns {
            found: window.width(),
            required: layout::MIN_COLUMNS,
        });
    }

    log::debug!(
        "data window: {} rows x {} columns after {} header rows",
        window.rows(),
        window.width(),
        options.header_rows
    );
    normalize_merges(full, &mut window, merges, options.merge_policy);
    Ok(window)
}

/// Run the full extraction over a loaded worksheet grid.
pub fn extract(
    full: &Grid,
    merges: &[MergeRect],
    options: &ExtractOptions,
) -> Result<ExtractionResult, ExtractError> {
    let window = prepare_window(full, merges, options)?;
    Ok(extract_from_window(&window))
}

/// Extraction over an already-normalized window. Never fails.
pub fn extract_from_window(window: &DataWindow) -> ExtractionResult {
    ExtractionResult::assemble(extract_edges(window), split_remarks(window))
}
