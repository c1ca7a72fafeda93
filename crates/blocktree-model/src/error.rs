use thiserror::Error;

/// Structural failures: the input does not look like a block-division sheet at all.
///
/// Per-row problems never surface here; they are skipped during extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("sheet has no data rows after the {header_rows} header rows (found {rows} rows)")]
    EmptyDataWindow { rows: usize, header_rows: usize },
    #[error("sheet has {found} columns, at least {required} are required")]
    TooFewColumns { found: usize, required: usize },
}
