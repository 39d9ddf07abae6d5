//! Game generation.
//!
//! Two strategies produce a [`Selection`]:
//! - `random`: six numbers uniformly without replacement from 1..=60
//! - `smart`: three hot numbers, one overdue number, two free picks
//!
//! Every draw from a pool is a partial Fisher-Yates shuffle, so sampling is
//! unbiased and always terminates. Pools too small for the request are
//! reported as errors.

use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::{all_numbers, is_valid_number, Category, Selection, StatsSnapshot, PICK_COUNT};

/// Hot numbers in a smart game.
pub const SMART_HOT_PICKS: usize = 3;

/// Overdue numbers in a smart game.
pub const SMART_OVERDUE_PICKS: usize = 1;

/// Errors that can occur during generation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("Not enough distinct numbers in the {pool} list: need {needed}, have {available}")]
    InsufficientPool {
        pool: Category,
        needed: usize,
        available: usize,
    },
}

/// Generation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Weighted towards hot and overdue numbers
    #[default]
    Smart,
    /// Uniform over all games
    Random,
}

impl std::fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationMode::Smart => write!(f, "smart"),
            GenerationMode::Random => write!(f, "random"),
        }
    }
}

/// A selection together with the strategy that actually produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Generated {
    pub selection: Selection,
    pub mode: GenerationMode,
}

/// Seeded RNG when a seed is given, otherwise seeded from the thread RNG.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// Six numbers uniformly at random.
pub fn generate_random<R: Rng + ?Sized>(rng: &mut R) -> Selection {
    let mut pool: Vec<u8> = all_numbers().collect();
    let picked = sample_distinct(&mut pool, PICK_COUNT, rng);
    Selection::from_distinct(&picked)
}

/// Six numbers biased by the snapshot's rankings.
pub fn generate_smart<R: Rng + ?Sized>(
    snapshot: &StatsSnapshot,
    rng: &mut R,
) -> Result<Selection, GenerateError> {
    let mut picked: Vec<u8> = Vec::with_capacity(PICK_COUNT);

    let mut hot = distinct_pool(&snapshot.hot, &picked);
    if hot.len() < SMART_HOT_PICKS {
        return Err(GenerateError::InsufficientPool {
            pool: Category::Hot,
            needed: SMART_HOT_PICKS,
            available: hot.len(),
        });
    }
    picked.extend(sample_distinct(&mut hot, SMART_HOT_PICKS, rng));

    let mut overdue = distinct_pool(&snapshot.overdue, &picked);
    if overdue.len() < SMART_OVERDUE_PICKS {
        return Err(GenerateError::InsufficientPool {
            pool: Category::Overdue,
            needed: SMART_OVERDUE_PICKS,
            available: overdue.len(),
        });
    }
    picked.extend(sample_distinct(&mut overdue, SMART_OVERDUE_PICKS, rng));

    let mut rest: Vec<u8> = all_numbers().filter(|n| !picked.contains(n)).collect();
    let remaining = PICK_COUNT - picked.len();
    picked.extend(sample_distinct(&mut rest, remaining, rng));

    debug!(?picked, "smart selection");
    Ok(Selection::from_distinct(&picked))
}

/// Generate with the requested strategy.
///
/// `smart` falls back to `random` when there is no snapshot or the snapshot
/// has no hot numbers; the returned mode says which one ran.
pub fn generate<R: Rng + ?Sized>(
    mode: GenerationMode,
    snapshot: Option<&StatsSnapshot>,
    rng: &mut R,
) -> Result<Generated, GenerateError> {
    match (mode, snapshot) {
        (GenerationMode::Smart, Some(stats)) if !stats.hot.is_empty() => Ok(Generated {
            selection: generate_smart(stats, rng)?,
            mode: GenerationMode::Smart,
        }),
        _ => Ok(Generated {
            selection: generate_random(rng),
            mode: GenerationMode::Random,
        }),
    }
}

/// Move `count` uniformly chosen elements to the front of `pool` and return
/// them. `count` must not exceed `pool.len()`.
fn sample_distinct<R: Rng + ?Sized>(pool: &mut [u8], count: usize, rng: &mut R) -> Vec<u8> {
    debug_assert!(count <= pool.len());
    for i in 0..count {
        let j = rng.random_range(i..pool.len());
        pool.swap(i, j);
    }
    pool[..count].to_vec()
}

/// Valid, distinct entries of `list` that are not in `exclude`.
fn distinct_pool(list: &[u8], exclude: &[u8]) -> Vec<u8> {
    let mut pool = Vec::with_capacity(list.len());
    for &n in list {
        if is_valid_number(n) && !exclude.contains(&n) && !pool.contains(&n) {
            pool.push(n);
        }
    }
    pool
}
