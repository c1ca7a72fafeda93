use serde::{Deserialize, Serialize};

use crate::label::is_space;
use crate::layout::REMARK_RANK;
use crate::DataWindow;

/// One logical line of a remark annotation, keyed by the block it talks about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RemarkRecord {
    pub block_label: String,
    pub remark_text: String,
}

impl RemarkRecord {
    pub fn new(block_label: impl Into<String>, remark_text: impl Into<String>) -> Self {
        Self {
            block_label: block_label.into(),
            remark_text: remark_text.into(),
        }
    }
}

/// Split every non-empty cell of the remark column into records, in row order.
///
/// A window without a remark column yields no records.
pub fn split_remarks(window: &DataWindow) -> Vec<RemarkRecord> {
    if !window.has_rank(REMARK_RANK) {
        log::debug!(
            "window has {} columns; no remark column (rank {REMARK_RANK})",
            window.width()
        );
        return Vec::new();
    }

    let records: Vec<RemarkRecord> = (0..window.rows())
        .map(|row| window.cell(row, REMARK_RANK))
        .filter(|value| !value.is_empty())
        .flat_map(|value| split_remark_text(&value.to_text()))
        .collect();
    log::debug!("split {} remark records", records.len());
    records
}

/// Split one annotation cell.
///
/// Each non-blank line becomes `block: remark`, split on the first `:`. Both sides are
/// trimmed and parentheses are removed from the block side. A line without a colon is all
/// block label with an empty remark.
pub fn split_remark_text(text: &str) -> Vec<RemarkRecord> {
    text.split(is_line_break)
        .map(trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (key, remark) = line.split_once(':').unwrap_or((line, ""));
            let block_label: String = trim(key)
                .chars()
                .filter(|c| !matches!(c, '(' | ')'))
                .collect();
            RemarkRecord::new(block_label, trim(remark))
        })
        .collect()
}

fn trim(s: &str) -> &str {
    s.trim_matches(is_space)
}

/// Line boundaries recognised inside annotation cells.
///
/// `\r\n` splits into two boundaries with an empty line between them, which is dropped
/// like any other blank line.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\u{0b}'
            | '\u{0c}'
            | '\u{1c}'
            | '\u{1d}'
            | '\u{1e}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}
