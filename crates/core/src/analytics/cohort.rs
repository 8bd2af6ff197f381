//! First-order-month cohorts with a simulated retention curve.
//!
//! Cohort membership and order frequency come from the records. The curve
//! itself is a display simulation drawn from the caller's random source, so
//! tests and replays can pin it with a seeded `StdRng`.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::analytics::round_half_up;
use crate::domain::customer::Customer;

pub const DEFAULT_COHORT_WINDOW: usize = 12;
pub const DEFAULT_COHORT_MAX_MONTHS: usize = 12;

const FIRST_MONTH_RETENTION: (f64, f64) = (50.0, 90.0);
const RETENTION_FLOOR: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CohortOptions {
    /// Most recent cohorts kept after sorting.
    pub window: usize,
    /// Upper bound on curve points per cohort.
    pub max_months: usize,
    pub min_cohort_size: usize,
}

impl Default for CohortOptions {
    fn default() -> Self {
        Self {
            window: DEFAULT_COHORT_WINDOW,
            max_months: DEFAULT_COHORT_MAX_MONTHS,
            min_cohort_size: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CohortPoint {
    pub month: u32,
    pub percentage: u32,
    pub retained: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CohortRow {
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub size: usize,
    pub months_elapsed: u32,
    pub avg_order_frequency: Decimal,
    pub retention: Vec<CohortPoint>,
}

pub fn cohort_analysis<R: Rng + ?Sized>(
    customers: &[&Customer],
    reference_date: NaiveDate,
    options: CohortOptions,
    rng: &mut R,
) -> Vec<CohortRow> {
    let mut groups: BTreeMap<(i32, u32), Vec<&Customer>> = BTreeMap::new();
    for customer in customers {
        let first = customer.first_order_date;
        groups.entry((first.year(), first.month())).or_default().push(*customer);
    }

    let kept = groups
        .into_iter()
        .filter(|(_, members)| members.len() >= options.min_cohort_size)
        .collect::<Vec<_>>();
    let skip = kept.len().saturating_sub(options.window);

    kept.into_iter()
        .skip(skip)
        .map(|((year, month), members)| {
            let months_elapsed = months_between(year, month, reference_date);
            let points = (months_elapsed as usize).min(options.max_months);
            CohortRow {
                label: cohort_label(year, month),
                year,
                month,
                size: members.len(),
                months_elapsed,
                avg_order_frequency: order_frequency(&members),
                retention: retention_curve(members.len(), points, rng),
            }
        })
        .collect()
}

/// Whole calendar months from the cohort month to the reference month.
fn months_between(year: i32, month: u32, reference: NaiveDate) -> u32 {
    let elapsed = (reference.year() - year) * 12 + reference.month() as i32 - month as i32;
    elapsed.max(0) as u32
}

fn cohort_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|start| start.format("%b %Y").to_string())
        .unwrap_or_else(|| format!("{year}-{month:02}"))
}

fn order_frequency(members: &[&Customer]) -> Decimal {
    if members.is_empty() {
        return Decimal::ZERO;
    }
    let orders: u64 = members.iter().map(|customer| u64::from(customer.total_orders)).sum();
    round_half_up(Decimal::from(orders) / Decimal::from(members.len()), 2)
}

/// Fractional drop applied when moving into `month` (2-based).
fn decay_envelope(month: u32) -> (f64, f64) {
    match month {
        0..=2 => (0.25, 0.40),
        3 => (0.15, 0.25),
        4..=6 => (0.08, 0.15),
        _ => (0.03, 0.08),
    }
}

fn retention_curve<R: Rng + ?Sized>(size: usize, points: usize, rng: &mut R) -> Vec<CohortPoint> {
    let mut curve = Vec::with_capacity(points);
    let mut rate = 0.0_f64;

    for month in (1..=points).map(|month| month as u32) {
        rate = if month == 1 {
            rng.gen_range(FIRST_MONTH_RETENTION.0..=FIRST_MONTH_RETENTION.1)
        } else {
            let (low, high) = decay_envelope(month);
            (rate * (1.0 - rng.gen_range(low..=high))).max(RETENTION_FLOOR)
        };

        let percentage = rate.round() as u32;
        curve.push(CohortPoint { month, percentage, retained: size * percentage as usize / 100 });
    }

    curve
}
