//! Historical draw records and payload decoding.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Smallest number on the ticket.
pub const MIN_NUMBER: u8 = 1;

/// Largest number on the ticket.
pub const MAX_NUMBER: u8 = 60;

/// How many numbers make up one draw or one game.
pub const PICK_COUNT: usize = 6;

/// Length of each ranked list (hot, cold, overdue).
pub const RANKED_LIST_LEN: usize = 10;

/// Field names accepted for the contest identifier (case-insensitive).
const CONTEST_FIELDS: &[&str] = &["concurso", "contest", "contest_id", "contestid"];

/// Field names accepted for the drawn numbers (case-insensitive).
const NUMBER_FIELDS: &[&str] = &["dezenas", "numbers"];

pub fn is_valid_number(n: u8) -> bool {
    (MIN_NUMBER..=MAX_NUMBER).contains(&n)
}

/// All numbers on the ticket, ascending.
pub fn all_numbers() -> impl Iterator<Item = u8> {
    MIN_NUMBER..=MAX_NUMBER
}

/// One historical draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    /// Contest number, if the source provided a usable one
    pub contest_id: Option<u32>,

    /// Distinct drawn numbers, each in 1..=60
    pub numbers: Vec<u8>,
}

impl DrawRecord {
    /// Build a record, dropping out-of-range values and repeats.
    pub fn new(contest_id: Option<u32>, numbers: impl IntoIterator<Item = u8>) -> Self {
        let mut kept: Vec<u8> = Vec::with_capacity(PICK_COUNT);
        for n in numbers {
            if is_valid_number(n) && !kept.contains(&n) {
                kept.push(n);
            }
        }
        Self {
            contest_id,
            numbers: kept,
        }
    }

    /// Build a record from textual tokens such as `"04"`.
    /// Tokens that do not parse are skipped.
    pub fn from_tokens<'a>(
        contest_id: Option<u32>,
        tokens: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self::new(contest_id, tokens.into_iter().filter_map(parse_number_token))
    }
}

/// Parse a number token, accepting zero padding (`"07"` -> 7).
///
/// Returns `None` for anything that is not a plain decimal integer in 1..=60.
pub fn parse_number_token(token: &str) -> Option<u8> {
    let token = token.trim();
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: u8 = token.parse().ok()?;
    is_valid_number(n).then_some(n)
}

/// Two-digit display form (`7` -> `"07"`).
pub fn format_number(n: u8) -> String {
    format!("{:02}", n)
}

/// Decode a draw-history payload.
///
/// Two shapes are understood:
/// - an array of records, each with a contest field and a numbers field
///   (`[{"Concurso": 1, "Dezenas": ["04", "05", ...]}, ...]`)
/// - an object keyed by contest id (`{"1": ["04", "05", ...], ...}`)
///
/// Only a payload that is not JSON at all is an error. Tokens that cannot
/// be read are skipped. An entry that cannot be read still counts as a
/// contest, as an empty [`DrawRecord`], so `total_contests` matches the
/// length of the payload.
pub fn decode_draws(payload: &[u8]) -> Result<Vec<DrawRecord>, serde_json::Error> {
    let value: Value = serde_json::from_slice(payload)?;
    Ok(draws_from_value(&value))
}

/// Extract draw records from an already-parsed JSON document.
pub fn draws_from_value(value: &Value) -> Vec<DrawRecord> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item.as_object() {
                Some(obj) => record_from_object(obj, None),
                None => DrawRecord::new(None, []),
            })
            .collect(),
        Value::Object(map) => map
            .iter()
            .map(|(key, entry)| {
                let keyed_contest = parse_contest_str(key);
                match entry {
                    Value::Array(tokens) => DrawRecord::new(
                        keyed_contest,
                        tokens.iter().filter_map(parse_token_value),
                    ),
                    Value::Object(obj) => record_from_object(obj, keyed_contest),
                    _ => DrawRecord::new(keyed_contest, []),
                }
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn record_from_object(obj: &Map<String, Value>, fallback_contest: Option<u32>) -> DrawRecord {
    let contest_id = find_field(obj, CONTEST_FIELDS)
        .and_then(parse_contest_value)
        .or(fallback_contest);

    let numbers: Vec<u8> = match find_field(obj, NUMBER_FIELDS) {
        Some(Value::Array(tokens)) => tokens.iter().filter_map(parse_token_value).collect(),
        _ => Vec::new(),
    };

    DrawRecord::new(contest_id, numbers)
}

fn find_field<'a>(obj: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    obj.iter()
        .find(|(key, _)| names.iter().any(|name| key.eq_ignore_ascii_case(name)))
        .map(|(_, value)| value)
}

fn parse_contest_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|id| u32::try_from(id).ok())
            .filter(|&id| id > 0),
        Value::String(s) => parse_contest_str(s),
        _ => None,
    }
}

fn parse_contest_str(s: &str) -> Option<u32> {
    s.trim().parse::<u32>().ok().filter(|&id| id > 0)
}

fn parse_token_value(value: &Value) -> Option<u8> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .filter(|&n| is_valid_number(n)),
        Value::String(s) => parse_number_token(s),
        _ => None,
    }
}
