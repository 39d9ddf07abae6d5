//! Derived statistics models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::all_numbers;

/// Ranked list a number belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Hot,
    Cold,
    Overdue,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Hot => write!(f, "HOT"),
            Category::Cold => write!(f, "COLD"),
            Category::Overdue => write!(f, "OVERDUE"),
        }
    }
}

/// Frequency statistics over a draw history.
///
/// Built once per load by [`crate::calculate::compute_stats`] and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Draws containing each number, keyed 1..=60
    pub frequency: BTreeMap<u8, u32>,

    /// Latest contest each number appeared in; `None` if never seen
    pub last_seen: BTreeMap<u8, Option<u32>>,

    /// Number of draws processed
    pub total_contests: usize,

    /// Reference contest for delays
    pub current_contest: u32,

    /// Most frequent numbers, most frequent first
    pub hot: Vec<u8>,

    /// Least frequent numbers, least frequent first
    pub cold: Vec<u8>,

    /// Numbers with the longest gap since last seen, longest first
    pub overdue: Vec<u8>,
}

/// One row of the per-number breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberStat {
    pub number: u8,
    pub frequency: u32,
    pub last_seen: Option<u32>,
    pub delay: u32,
}

impl StatsSnapshot {
    /// Contests since `number` was last drawn.
    pub fn delay(&self, number: u8) -> u32 {
        match self.last_seen.get(&number).copied().flatten() {
            Some(last) => self.current_contest.saturating_sub(last),
            None => self.current_contest,
        }
    }

    /// Every ranked list `number` appears in.
    pub fn categories(&self, number: u8) -> Vec<Category> {
        let mut found = Vec::new();
        if self.hot.contains(&number) {
            found.push(Category::Hot);
        }
        if self.cold.contains(&number) {
            found.push(Category::Cold);
        }
        if self.overdue.contains(&number) {
            found.push(Category::Overdue);
        }
        found
    }

    /// Per-number breakdown in numeric order.
    pub fn rows(&self) -> Vec<NumberStat> {
        all_numbers()
            .map(|number| NumberStat {
                number,
                frequency: self.frequency.get(&number).copied().unwrap_or(0),
                last_seen: self.last_seen.get(&number).copied().flatten(),
                delay: self.delay(number),
            })
            .collect()
    }

    /// Sum of all frequencies.
    pub fn total_occurrences(&self) -> u64 {
        self.frequency.values().map(|&c| c as u64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StatsSnapshot {
        let frequency = all_numbers().map(|n| (n, if n <= 6 { 1 } else { 0 })).collect();
        let last_seen = all_numbers()
            .map(|n| (n, if n <= 6 { Some(3) } else { None }))
            .collect();
        StatsSnapshot {
            frequency,
            last_seen,
            total_contests: 1,
            current_contest: 5,
            hot: (1..=10).collect(),
            cold: (51..=60).rev().collect(),
            overdue: (7..=16).collect(),
        }
    }

    #[test]
    fn test_delay_seen_and_unseen() {
        let snapshot = sample();
        assert_eq!(snapshot.delay(1), 2);
        assert_eq!(snapshot.delay(40), 5);
    }

    #[test]
    fn test_categories() {
        let snapshot = sample();
        assert_eq!(snapshot.categories(3), vec![Category::Hot]);
        assert_eq!(snapshot.categories(8), vec![Category::Hot, Category::Overdue]);
        assert_eq!(snapshot.categories(55), vec![Category::Cold]);
        assert!(snapshot.categories(30).is_empty());
    }

    #[test]
    fn test_rows_cover_all_numbers() {
        let rows = sample().rows();
        assert_eq!(rows.len(), 60);
        assert_eq!(rows[0].number, 1);
        assert_eq!(rows[0].last_seen, Some(3));
        assert_eq!(rows[59].number, 60);
        assert_eq!(rows[59].delay, 5);
    }

    #[test]
    fn test_total_occurrences() {
        assert_eq!(sample().total_occurrences(), 6);
    }

    #[test]
    fn test_category_display() {
        assert_eq!(Category::Overdue.to_string(), "OVERDUE");
    }

    #[test]
    fn test_snapshot_serializes_never_seen_as_null() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["last_seen"]["60"], serde_json::Value::Null);
        assert_eq!(json["last_seen"]["1"], 3);
        assert_eq!(json["frequency"]["1"], 1);
    }
}
