//! Statistics calculation engine.
//!
//! Turns a draw history into per-number statistics:
//! - Frequency of each number across all draws
//! - Latest contest each number was drawn in
//! - Hot, cold and overdue rankings
//!
//! The result does not depend on the order of the input draws.

use std::collections::BTreeMap;

use crate::models::{all_numbers, is_valid_number, DrawRecord, StatsSnapshot, RANKED_LIST_LEN};

/// Compute statistics over a draw history.
///
/// An empty history yields all-zero frequencies with `hot` and `overdue`
/// equal to 1..=10 and `cold` equal to 60 down to 51.
pub fn compute_stats(draws: &[DrawRecord]) -> StatsSnapshot {
    let mut frequency: BTreeMap<u8, u32> = all_numbers().map(|n| (n, 0)).collect();
    let mut last_seen: BTreeMap<u8, Option<u32>> = all_numbers().map(|n| (n, None)).collect();

    for draw in draws {
        let mut counted = 0u64;
        for &n in &draw.numbers {
            let bit = 1u64 << n.min(63);
            if !is_valid_number(n) || counted & bit != 0 {
                continue;
            }
            counted |= bit;

            if let Some(count) = frequency.get_mut(&n) {
                *count += 1;
            }
            if let (Some(contest), Some(seen)) = (draw.contest_id, last_seen.get_mut(&n)) {
                *seen = Some(seen.map_or(contest, |prev| prev.max(contest)));
            }
        }
    }

    let current_contest = current_contest(draws);

    let by_frequency = rank_by_frequency(&frequency);
    let hot = by_frequency.iter().take(RANKED_LIST_LEN).copied().collect();
    let cold = by_frequency
        .iter()
        .rev()
        .take(RANKED_LIST_LEN)
        .copied()
        .collect();

    let overdue = rank_by_delay(&last_seen, current_contest)
        .into_iter()
        .take(RANKED_LIST_LEN)
        .collect();

    StatsSnapshot {
        frequency,
        last_seen,
        total_contests: draws.len(),
        current_contest,
        hot,
        cold,
        overdue,
    }
}

/// Latest contest id in the history, or the draw count if none carry one.
pub fn current_contest(draws: &[DrawRecord]) -> u32 {
    draws
        .iter()
        .filter_map(|d| d.contest_id)
        .max()
        .unwrap_or_else(|| u32::try_from(draws.len()).unwrap_or(u32::MAX))
}

/// Contests elapsed since `last_seen`; unseen numbers count from zero.
pub fn calculate_delay(last_seen: Option<u32>, current_contest: u32) -> u32 {
    match last_seen {
        Some(last) => current_contest.saturating_sub(last),
        None => current_contest,
    }
}

/// All numbers ordered by frequency, most frequent first.
/// Ties keep ascending numeric order.
pub fn rank_by_frequency(frequency: &BTreeMap<u8, u32>) -> Vec<u8> {
    let mut ranked: Vec<(u8, u32)> = frequency.iter().map(|(&n, &c)| (n, c)).collect();
    // sort_by is stable, so equal counts stay in numeric order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().map(|(n, _)| n).collect()
}

/// All numbers ordered by delay, longest first.
/// Ties keep ascending numeric order.
pub fn rank_by_delay(last_seen: &BTreeMap<u8, Option<u32>>, current_contest: u32) -> Vec<u8> {
    let mut ranked: Vec<(u8, u32)> = last_seen
        .iter()
        .map(|(&n, &seen)| (n, calculate_delay(seen, current_contest)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().map(|(n, _)| n).collect()
}
