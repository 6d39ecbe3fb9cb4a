// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use log::debug;
use serde::Serialize;

/// What the fetch component keeps of a database record. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeqSummary {
    pub accession: String,
    pub length: usize,
    pub description: String,
}

/// Inclusive `[min, max]` sequence length bounds. A range with `min > max` is legal and simply
/// matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthRange {
    pub min: usize,
    pub max: usize,
}

impl LengthRange {
    pub fn new(min: usize, max: usize) -> Self {
        LengthRange { min, max }
    }

    pub fn contains(&self, length: usize) -> bool {
        self.min <= length && length <= self.max
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }
}

/// Keeps the records whose length lies in `range`, preserving retrieval order.
pub fn filter_by_length(records: Vec<SeqSummary>, range: LengthRange) -> Vec<SeqSummary> {
    records
        .into_iter()
        .filter(|rec| {
            let keep = range.contains(rec.length);
            if !keep {
                debug!(
                    "Dropping {} (length {} outside [{}, {}])",
                    rec.accession, rec.length, range.min, range.max
                );
            }
            keep
        })
        .collect()
}

/// Longest first; records of equal length stay in retrieval order.
pub fn by_descending_length(records: &[SeqSummary]) -> Vec<&SeqSummary> {
    let mut sorted: Vec<&SeqSummary> = records.iter().collect();
    sorted.sort_by(|a, b| b.length.cmp(&a.length));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(acc: &str, length: usize) -> SeqSummary {
        SeqSummary {
            accession: acc.to_string(),
            length,
            description: format!("{} description", acc),
        }
    }

    #[test]
    fn bounds_are_inclusive() {
        let range = LengthRange::new(100, 200);
        assert!(range.contains(100));
        assert!(range.contains(200));
        assert!(!range.contains(99));
        assert!(!range.contains(201));
    }

    #[test]
    fn filter_keeps_order() {
        let records = vec![rec("A1", 50), rec("A2", 150), rec("A3", 300), rec("A4", 100)];
        let kept = filter_by_length(records, LengthRange::new(100, 300));
        let accs: Vec<&str> = kept.iter().map(|r| r.accession.as_str()).collect();
        assert_eq!(accs, vec!["A2", "A3", "A4"]);
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let range = LengthRange::new(500, 10);
        assert!(range.is_empty());
        assert!(filter_by_length(vec![rec("A1", 100)], range).is_empty());
    }

    #[test]
    fn descending_is_stable() {
        let records = vec![rec("A1", 10), rec("A2", 30), rec("A3", 10), rec("A4", 20)];
        let accs: Vec<&str> = by_descending_length(&records)
            .iter()
            .map(|r| r.accession.as_str())
            .collect();
        assert_eq!(accs, vec!["A2", "A4", "A1", "A3"]);
    }
}
