use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A merged-cell rectangle in worksheet coordinates.
///
/// Coordinates are **1-based** and inclusive on all edges, matching how spreadsheet
/// applications report merges:
/// - `min_row = 1` is worksheet row `1`
/// - `min_col = 1` is worksheet column `A`
///
/// Rectangles coming from a loader are trusted to be well formed, but nothing downstream
/// relies on it: [`MergeRect::is_degenerate`] lets the normalizer skip bad geometry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MergeRect {
    pub min_row: u32,
    pub min_col: u32,
    pub max_row: u32,
    pub max_col: u32,
}

impl MergeRect {
    #[inline]
    pub const fn new(min_row: u32, min_col: u32, max_row: u32, max_col: u32) -> Self {
        Self {
            min_row,
            min_col,
            max_row,
            max_col,
        }
    }

    /// Build a rectangle from 0-based inclusive `(row, col)` corners.
    #[inline]
    pub const fn from_zero_based(start: (u32, u32), end: (u32, u32)) -> Self {
        Self::new(start.0 + 1, start.1 + 1, end.0 + 1, end.1 + 1)
    }

    /// True when a corner is zero or the corners are inverted.
    #[inline]
    pub const fn is_degenerate(&self) -> bool {
        self.min_row == 0
            || self.min_col == 0
            || self.min_row > self.max_row
            || self.min_col > self.max_col
    }

    /// 0-based `(row, col)` of the anchor (top-left) cell.
    #[inline]
    pub const fn anchor(&self) -> (usize, usize) {
        (
            self.min_row.saturating_sub(1) as usize,
            self.min_col.saturating_sub(1) as usize,
        )
    }

    /// Number of rows covered.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.max_row - self.min_row + 1
    }

    /// Number of columns covered.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.max_col - self.min_col + 1
    }

    /// Parse an A1-style range like `A5:B7` (a single cell like `C3` is a 1×1 merge).
    pub fn from_a1(a1: &str) -> Result<Self, MergeRectParseError> {
        let s = a1.trim();
        if s.is_empty() {
            return Err(MergeRectParseError::Empty);
        }

        let (a, b) = s.split_once(':').unwrap_or((s, s));
        let (r1, c1) = parse_cell(a)?;
        let (r2, c2) = parse_cell(b)?;
        Ok(Self::new(r1.min(r2), c1.min(c2), r1.max(r2), c1.max(c2)))
    }
}

impl fmt::Display for MergeRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}:{}{}",
            col_to_name(self.min_col),
            self.min_row,
            col_to_name(self.max_col),
            self.max_row
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeRectParseError {
    #[error("empty A1 range")]
    Empty,
    #[error("missing column in A1 reference `{0}`")]
    MissingColumn(String),
    #[error("missing row in A1 reference `{0}`")]
    MissingRow(String),
    #[error("invalid row in A1 reference `{0}`")]
    InvalidRow(String),
    #[error("invalid column in A1 reference `{0}`")]
    InvalidColumn(String),
}

/// Returns a 1-based `(row, col)`.
fn parse_cell(cell: &str) -> Result<(u32, u32), MergeRectParseError> {
    let s = cell.trim().replace('$', "");
    let split = s
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(s.len());
    let (letters, digits) = s.split_at(split);

    if letters.is_empty() {
        return Err(MergeRectParseError::MissingColumn(cell.to_string()));
    }
    if digits.is_empty() {
        return Err(MergeRectParseError::MissingRow(cell.to_string()));
    }

    let row: u32 = digits
        .parse()
        .map_err(|_| MergeRectParseError::InvalidRow(cell.to_string()))?;
    if row == 0 {
        return Err(MergeRectParseError::InvalidRow(cell.to_string()));
    }

    let mut col: u32 = 0;
    for b in letters.bytes() {
        let v = (b.to_ascii_uppercase() - b'A') as u32 + 1;
        col = col
            .checked_mul(26)
            .and_then(|c| c.checked_add(v))
            .ok_or_else(|| MergeRectParseError::InvalidColumn(cell.to_string()))?;
    }

    Ok((row, col))
}

fn col_to_name(col: u32) -> String {
    // 1-based: 1 => A, 27 => AA.
    let mut n = col;
    let mut out = Vec::<char>::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    out.iter().rev().collect()
}
