//! The fixed column layout of a block-division sheet.
//!
//! Every positional assumption the extractors make lives here. Ranks are 1-based column
//! positions inside the [`DataWindow`](crate::DataWindow):
//!
//! | rank  | role                                              |
//! |-------|---------------------------------------------------|
//! | 1..=6 | hierarchy levels, outermost to innermost          |
//! | 7     | primary child column                              |
//! | 8     | `P` suffix flag (present when numeric)            |
//! | 9     | `C` suffix flag (present when numeric)            |
//! | 10    | `S` suffix flag (present when numeric)            |
//! | 11    | free-text remark annotations                      |

/// Worksheet rows above the data window (title block and column headers).
pub const HEADER_ROWS: usize = 4;

/// Index of the worksheet that holds the block division table (the second sheet).
pub const SHEET_INDEX: usize = 1;

/// Outermost hierarchy level.
pub const FIRST_LEVEL_RANK: usize = 1;

/// Innermost hierarchy level before the primary child column.
pub const LAST_LEVEL_RANK: usize = 6;

/// The primary child column (`G`).
pub const CHILD_RANK: usize = 7;

/// Suffix flag columns, in emission order.
pub const SUFFIX_RANKS: [(usize, char); 3] = [(8, 'P'), (9, 'C'), (10, 'S')];

/// The remark annotation column (`K`).
pub const REMARK_RANK: usize = 11;

/// A window narrower than this cannot yield a single parent/child pair.
pub const MIN_COLUMNS: usize = 2;

/// Maximum number of characters kept in a [`label`](crate::label).
pub const LABEL_MAX_CHARS: usize = 5;

/// Ranks to scan, nearest first, when looking for the parent of a value at `rank`.
pub fn parent_ranks(rank: usize) -> impl Iterator<Item = usize> {
    (FIRST_LEVEL_RANK..rank.min(CHILD_RANK)).rev()
}

/// Child ranks handled by the cascading level-pair pass, innermost first.
pub fn cascade_child_ranks() -> impl Iterator<Item = usize> {
    (FIRST_LEVEL_RANK + 1..=LAST_LEVEL_RANK).rev()
}
