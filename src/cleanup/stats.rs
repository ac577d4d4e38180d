//! Cleaning statistics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::AddAssign;

/// Counters produced by one cleaning call.
///
/// Serializes to a map keyed by the field names; every key is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanStats {
    pub lines_removed: usize,
    pub duplicates_collapsed: usize,
    pub empty_lines_removed: usize,
    pub header_footer_removed: usize,
    pub punctuation_lines_removed: usize,
    pub dehyphenated_tokens: usize,
    pub repeating_headers_footers_removed: usize,
    pub merged_lines: usize,
}

impl CleanStats {
    /// Counter names with their values, in a stable order.
    pub fn as_map(&self) -> BTreeMap<&'static str, usize> {
        BTreeMap::from([
            ("lines_removed", self.lines_removed),
            ("duplicates_collapsed", self.duplicates_collapsed),
            ("empty_lines_removed", self.empty_lines_removed),
            ("header_footer_removed", self.header_footer_removed),
            ("punctuation_lines_removed", self.punctuation_lines_removed),
            ("dehyphenated_tokens", self.dehyphenated_tokens),
            (
                "repeating_headers_footers_removed",
                self.repeating_headers_footers_removed,
            ),
            ("merged_lines", self.merged_lines),
        ])
    }

    /// Sum of the per-category line removals.
    pub fn categorized_removals(&self) -> usize {
        self.empty_lines_removed
            + self.punctuation_lines_removed
            + self.header_footer_removed
            + self.repeating_headers_footers_removed
            + self.duplicates_collapsed
    }

    /// Returns true if the call changed nothing worth reporting.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl AddAssign for CleanStats {
    fn add_assign(&mut self, other: Self) {
        self.lines_removed += other.lines_removed;
        self.duplicates_collapsed += other.duplicates_collapsed;
        self.empty_lines_removed += other.empty_lines_removed;
        self.header_footer_removed += other.header_footer_removed;
        self.punctuation_lines_removed += other.punctuation_lines_removed;
        self.dehyphenated_tokens += other.dehyphenated_tokens;
        self.repeating_headers_footers_removed += other.repeating_headers_footers_removed;
        self.merged_lines += other.merged_lines;
    }
}

impl std::iter::Sum for CleanStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |mut total, stats| {
            total += stats;
            total
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_has_every_key() {
        let map = CleanStats::default().as_map();
        assert_eq!(map.len(), 8);
        assert!(map.values().all(|&v| v == 0));
        assert!(map.contains_key("repeating_headers_footers_removed"));
    }

    #[test]
    fn test_json_keys_match_map() {
        let stats = CleanStats {
            merged_lines: 3,
            ..Default::default()
        };
        let json = serde_json::to_value(stats).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 8);
        assert_eq!(object["merged_lines"], 3);
        for key in stats.as_map().keys() {
            assert!(object.contains_key(*key));
        }
    }

    #[test]
    fn test_sum() {
        let a = CleanStats {
            lines_removed: 2,
            empty_lines_removed: 2,
            ..Default::default()
        };
        let b = CleanStats {
            lines_removed: 1,
            duplicates_collapsed: 1,
            ..Default::default()
        };
        let total: CleanStats = [a, b].into_iter().sum();
        assert_eq!(total.lines_removed, 3);
        assert_eq!(total.categorized_removals(), 3);
        assert!(!total.is_empty());
    }
}
