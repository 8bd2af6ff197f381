pub mod cohort;
pub mod customers;
pub mod menu;

use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// A counted category value with its share of the counted population.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Tally<K> {
    pub key: K,
    pub count: usize,
    pub percentage: u32,
}

/// `round(part / whole * 100)` with halves rounded up; zero when `whole` is zero.
pub fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let (part, whole) = (part as u64, whole as u64);
    ((part * 200 + whole) / (whole * 2)) as u32
}

pub fn decimal_percentage(part: Decimal, whole: Decimal) -> u32 {
    if whole.is_zero() {
        return 0;
    }
    round_half_up(part / whole * Decimal::ONE_HUNDRED, 0).to_u32().unwrap_or(0)
}

pub(crate) fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Counts occurrences, keeping keys in first-encountered order.
pub(crate) fn count_first_seen<'a>(
    values: impl IntoIterator<Item = &'a str>,
) -> Vec<(String, usize)> {
    let mut slots: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for value in values {
        match slots.get(value) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(value, counts.len());
                counts.push((value.to_string(), 1));
            }
        }
    }

    counts
}

/// Stable descending sort by count, truncated to `limit`. Ties keep input order.
pub(crate) fn rank_descending(
    mut counts: Vec<(String, usize)>,
    limit: usize,
) -> Vec<(String, usize)> {
    counts.sort_by(|left, right| right.1.cmp(&left.1));
    counts.truncate(limit);
    counts
}

pub(crate) fn tallies(counts: Vec<(String, usize)>, whole: usize) -> Vec<Tally<String>> {
    counts
        .into_iter()
        .map(|(key, count)| Tally { key, count, percentage: percentage(count, whole) })
        .collect()
}
