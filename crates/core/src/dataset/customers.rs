use chrono::{Datelike, Months, NaiveDate};
use rand::Rng;
use rust_decimal::Decimal;

use crate::domain::customer::{
    retention_months, Customer, CustomerId, CustomerType, PaymentMethod,
};
use crate::domain::platform::Platform;

pub const DEFAULT_CUSTOMER_COUNT: usize = 200;

pub const CITY_AREAS: &[(&str, &[&str])] = &[
    ("Dubai", &["Downtown", "Marina", "JBR", "Business Bay", "DIFC", "JVC"]),
    ("Abu Dhabi", &["Corniche", "Khalidiya", "Al Reem Island", "Yas Island"]),
    ("Sharjah", &["Al Nahda", "Al Khan", "Al Majaz", "Al Qasimia"]),
    ("Ajman", &["Al Nuaimiya", "Al Rashidiya", "Al Jurf"]),
    ("Al Ain", &["Al Towayya", "Al Jimi", "Al Muwaiji"]),
];

const FIRST_ORDER_WINDOW_MONTHS: u32 = 12;
const MAX_FAVORITES: usize = 4;
const DINE_IN_CASH_PROBABILITY: f64 = 0.7;
const DELIVERY_CASH_PROBABILITY: f64 = 0.3;
const PROMO_PROBABILITY: f64 = 0.4;

/// Builds synthetic customer records relative to a fixed reference date.
#[derive(Clone, Debug)]
pub struct CustomerGenerator<'a> {
    reference_date: NaiveDate,
    favorite_pool: Vec<&'a str>,
}

impl<'a> CustomerGenerator<'a> {
    pub fn new(reference_date: NaiveDate, favorite_pool: Vec<&'a str>) -> Self {
        Self { reference_date, favorite_pool }
    }

    pub fn generate<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Customer> {
        (0..count).map(|index| self.customer(index, rng)).collect()
    }

    fn customer<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> Customer {
        let platform = Platform::ALL[rng.gen_range(0..Platform::ALL.len())];
        let (city, areas) = CITY_AREAS[rng.gen_range(0..CITY_AREAS.len())];
        let area = areas[rng.gen_range(0..areas.len())];
        let favorite_items = self.favorites(rng);

        let cash_probability = if platform == Platform::DineIn {
            DINE_IN_CASH_PROBABILITY
        } else {
            DELIVERY_CASH_PROBABILITY
        };
        let payment_method = if rng.gen_bool(cash_probability) {
            PaymentMethod::Cash
        } else {
            PaymentMethod::Online
        };

        let total_orders = rng.gen_range(1..=20u32);
        let first_order_date = first_order_date(self.reference_date, rng);
        let retention_months = retention_months(first_order_date, self.reference_date);
        let customer_type = CustomerType::classify(total_orders, retention_months);

        let common_combinations = (total_orders > 3 && favorite_items.len() > 1)
            .then(|| vec![favorite_items[..2].to_vec()]);

        let user_id = match platform {
            Platform::DineIn => format!("walk-in-{}", 1000 + index),
            delivery => format!("{}-{}", delivery.as_str(), 100_000 + index),
        };

        Customer {
            id: CustomerId(format!("cust-{}", index + 1)),
            user_id,
            platform,
            city: city.to_string(),
            area: area.to_string(),
            payment_method,
            total_orders,
            avg_items_per_order: rng.gen_range(1..=4u32),
            total_spent: Decimal::from(rng.gen_range(200..1700u32)),
            avg_order_value: Decimal::from(rng.gen_range(30..130u32)),
            used_promo: rng.gen_bool(PROMO_PROBABILITY),
            customer_type,
            first_order_date,
            retention_months,
            favorite_items,
            common_combinations,
        }
    }

    fn favorites<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        if self.favorite_pool.is_empty() {
            return Vec::new();
        }
        let count = rng.gen_range(1..=MAX_FAVORITES);
        (0..count)
            .map(|_| self.favorite_pool[rng.gen_range(0..self.favorite_pool.len())].to_string())
            .collect()
    }
}

fn first_order_date<R: Rng + ?Sized>(reference: NaiveDate, rng: &mut R) -> NaiveDate {
    let months_back = rng.gen_range(0..FIRST_ORDER_WINDOW_MONTHS);
    let day = rng.gen_range(1..=28u32);

    // Days 1..=28 exist in every month.
    reference
        .with_day(1)
        .and_then(|month_start| month_start.checked_sub_months(Months::new(months_back)))
        .and_then(|month_start| month_start.with_day(day))
        .unwrap_or(reference)
}

pub fn areas_for_city(city: &str) -> &'static [&'static str] {
    CITY_AREAS.iter().find(|(name, _)| *name == city).map(|(_, areas)| *areas).unwrap_or(&[])
}
