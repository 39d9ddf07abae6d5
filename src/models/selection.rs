//! A generated game.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{format_number, is_valid_number, PICK_COUNT};

/// Reasons a set of numbers is not a valid game.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Expected {expected} numbers, got {got}")]
    WrongCount { expected: usize, got: usize },

    #[error("Number {0} out of range (1-60)")]
    OutOfRange(u8),

    #[error("Duplicate number: {0}")]
    Duplicate(u8),
}

/// Six distinct numbers in 1..=60, kept in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Selection([u8; PICK_COUNT]);

impl Selection {
    /// Validate and sort a candidate game.
    pub fn new(numbers: &[u8]) -> Result<Self, SelectionError> {
        if numbers.len() != PICK_COUNT {
            return Err(SelectionError::WrongCount {
                expected: PICK_COUNT,
                got: numbers.len(),
            });
        }

        let mut sorted = [0u8; PICK_COUNT];
        sorted.copy_from_slice(numbers);
        sorted.sort_unstable();

        for (i, &n) in sorted.iter().enumerate() {
            if !is_valid_number(n) {
                return Err(SelectionError::OutOfRange(n));
            }
            if i > 0 && sorted[i - 1] == n {
                return Err(SelectionError::Duplicate(n));
            }
        }

        Ok(Self(sorted))
    }

    /// Build from numbers already known to be six distinct values in range.
    pub(crate) fn from_distinct(numbers: &[u8]) -> Self {
        debug_assert!(Self::new(numbers).is_ok(), "invalid selection {:?}", numbers);
        let mut sorted = [0u8; PICK_COUNT];
        sorted.copy_from_slice(numbers);
        sorted.sort_unstable();
        Self(sorted)
    }

    pub fn numbers(&self) -> &[u8; PICK_COUNT] {
        &self.0
    }

    pub fn contains(&self, n: u8) -> bool {
        self.0.contains(&n)
    }

    /// Zero-padded tokens, e.g. `["04", "10", ...]`.
    pub fn tokens(&self) -> Vec<String> {
        self.0.iter().map(|&n| format_number(n)).collect()
    }
}

impl TryFrom<Vec<u8>> for Selection {
    type Error = SelectionError;

    fn try_from(numbers: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(&numbers)
    }
}

impl From<Selection> for Vec<u8> {
    fn from(selection: Selection) -> Self {
        selection.0.to_vec()
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens().join(" - "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_sorts() {
        let s = Selection::new(&[53, 4, 23, 10, 5, 60]).unwrap();
        assert_eq!(s.numbers(), &[4, 5, 10, 23, 53, 60]);
    }

    #[test]
    fn test_selection_wrong_count() {
        assert_eq!(
            Selection::new(&[1, 2, 3]),
            Err(SelectionError::WrongCount {
                expected: 6,
                got: 3
            })
        );
    }

    #[test]
    fn test_selection_out_of_range() {
        assert_eq!(
            Selection::new(&[0, 2, 3, 4, 5, 6]),
            Err(SelectionError::OutOfRange(0))
        );
        assert_eq!(
            Selection::new(&[1, 2, 3, 4, 5, 61]),
            Err(SelectionError::OutOfRange(61))
        );
    }

    #[test]
    fn test_selection_duplicate() {
        assert_eq!(
            Selection::new(&[7, 2, 3, 7, 5, 6]),
            Err(SelectionError::Duplicate(7))
        );
    }

    #[test]
    fn test_selection_display_padded() {
        let s = Selection::new(&[1, 9, 10, 33, 42, 60]).unwrap();
        assert_eq!(s.to_string(), "01 - 09 - 10 - 33 - 42 - 60");
        assert_eq!(s.tokens()[0], "01");
    }

    #[test]
    fn test_selection_serde() {
        let s = Selection::new(&[6, 5, 4, 3, 2, 1]).unwrap();
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "[1,2,3,4,5,6]");

        let parsed: Selection = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, s);
        assert!(serde_json::from_str::<Selection>("[1,1,2,3,4,5]").is_err());
    }
}
