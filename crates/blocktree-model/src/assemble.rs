use std::collections::HashSet;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::{Edge, RemarkRecord};

/// The two output tables of one extraction run. Neither table contains duplicate rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub edges: Vec<Edge>,
    pub remarks: Vec<RemarkRecord>,
}

impl ExtractionResult {
    /// Deduplicate both tables, keeping the first occurrence of every row.
    pub fn assemble(edges: Vec<Edge>, remarks: Vec<RemarkRecord>) -> Self {
        let (raw_edges, raw_remarks) = (edges.len(), remarks.len());
        let result = Self {
            edges: dedup_preserving_order(edges),
            remarks: dedup_preserving_order(remarks),
        };
        log::debug!(
            "assembled {} edges (from {raw_edges}) and {} remarks (from {raw_remarks})",
            result.edges.len(),
            result.remarks.len()
        );
        result
    }

    /// Whether a remark table should be emitted at all.
    pub fn has_remarks(&self) -> bool {
        !self.remarks.is_empty()
    }
}

/// Exact-match deduplication that keeps first-occurrence order.
pub fn dedup_preserving_order<T>(items: Vec<T>) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        assert_eq!(
            dedup_preserving_order(vec![3, 1, 3, 2, 1]),
            vec![3, 1, 2]
        );
    }

    #[test]
    fn tables_are_deduplicated_independently() {
        let result = ExtractionResult::assemble(
            vec![
                Edge::new("A", "B"),
                Edge::new("A", "C"),
                Edge::new("A", "B"),
                Edge::new("B", "A"),
            ],
            Vec::new(),
        );

        assert_eq!(
            result.edges,
            vec![Edge::new("A", "B"), Edge::new("A", "C"), Edge::new("B", "A")]
        );
        assert!(!result.has_remarks());
    }
}
