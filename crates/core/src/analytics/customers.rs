//! Segmentation aggregates over a (possibly platform-filtered) customer set.
//!
//! Every function is total: an empty input yields zero counts and zero
//! percentages rather than an error.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::analytics::{
    count_first_seen, decimal_percentage, percentage, rank_descending, round_half_up, tallies,
    Tally,
};
use crate::domain::customer::{Customer, CustomerType, PaymentMethod};
use crate::domain::platform::{Platform, PlatformFilter};

pub const DEFAULT_TOP_LIMIT: usize = 5;
pub const DEFAULT_CITY_LIMIT: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionBucket {
    UnderOneMonth,
    OneToThreeMonths,
    ThreeToSixMonths,
    SixToTwelveMonths,
    OverTwelveMonths,
}

impl RetentionBucket {
    pub const ALL: [RetentionBucket; 5] = [
        Self::UnderOneMonth,
        Self::OneToThreeMonths,
        Self::ThreeToSixMonths,
        Self::SixToTwelveMonths,
        Self::OverTwelveMonths,
    ];

    /// Exclusive lower bound and inclusive upper bound, in months.
    pub fn bounds(self) -> (u32, Option<u32>) {
        match self {
            Self::UnderOneMonth => (0, Some(1)),
            Self::OneToThreeMonths => (1, Some(3)),
            Self::ThreeToSixMonths => (3, Some(6)),
            Self::SixToTwelveMonths => (6, Some(12)),
            Self::OverTwelveMonths => (12, None),
        }
    }

    pub fn contains(self, months: u32) -> bool {
        let (min, max) = self.bounds();
        months > min && max.map_or(true, |max| months <= max)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::UnderOneMonth => "< 1 month",
            Self::OneToThreeMonths => "1-3 months",
            Self::ThreeToSixMonths => "3-6 months",
            Self::SixToTwelveMonths => "6-12 months",
            Self::OverTwelveMonths => "> 12 months",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RetentionBucketCount {
    pub bucket: RetentionBucket,
    pub label: &'static str,
    pub count: usize,
    pub percentage: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PromoUsage {
    pub used: usize,
    pub not_used: usize,
    pub percentage: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CustomerOverview {
    pub total: usize,
    pub new: usize,
    pub repeat: usize,
    pub premium: usize,
    pub new_percentage: u32,
    pub repeat_percentage: u32,
    pub premium_percentage: u32,
    pub promo_percentage: u32,
    pub average_spent: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CityTypeBreakdown {
    pub city: String,
    pub total: usize,
    pub new: usize,
    pub repeat: usize,
    pub premium: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PaymentRevenue {
    pub method: PaymentMethod,
    pub customers: usize,
    pub revenue: Decimal,
    pub share_percentage: u32,
}

/// Profile search: substring match on user id, city or area plus exact filters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomerQuery {
    pub search: Option<String>,
    pub customer_type: Option<CustomerType>,
    pub payment_method: Option<PaymentMethod>,
}

pub fn filter_by_platform(customers: &[Customer], filter: PlatformFilter) -> Vec<&Customer> {
    customers.iter().filter(|customer| filter.matches(customer.platform)).collect()
}

fn tally_enumerated<K: Copy + PartialEq>(
    keys: &[K],
    customers: &[&Customer],
    key_of: impl Fn(&Customer) -> K,
) -> Vec<Tally<K>> {
    keys.iter()
        .map(|key| {
            let count = customers.iter().filter(|customer| key_of(**customer) == *key).count();
            Tally { key: *key, count, percentage: percentage(count, customers.len()) }
        })
        .collect()
}

pub fn customers_by_platform(customers: &[&Customer]) -> Vec<Tally<Platform>> {
    tally_enumerated(&Platform::ALL, customers, |customer| customer.platform)
}

pub fn customers_by_type(customers: &[&Customer]) -> Vec<Tally<CustomerType>> {
    tally_enumerated(&CustomerType::ALL, customers, |customer| customer.customer_type)
}

pub fn customers_by_payment_method(customers: &[&Customer]) -> Vec<Tally<PaymentMethod>> {
    tally_enumerated(&PaymentMethod::ALL, customers, |customer| customer.payment_method)
}

/// Counts per city in first-encountered order; callers sort as needed.
pub fn customers_by_city(customers: &[&Customer]) -> Vec<Tally<String>> {
    let counts = count_first_seen(customers.iter().map(|customer| customer.city.as_str()));
    tallies(counts, customers.len())
}

pub fn top_areas(customers: &[&Customer], limit: usize) -> Vec<Tally<String>> {
    let counts = count_first_seen(customers.iter().map(|customer| customer.area.as_str()));
    tallies(rank_descending(counts, limit), customers.len())
}

pub fn retention_distribution(customers: &[&Customer]) -> Vec<RetentionBucketCount> {
    RetentionBucket::ALL
        .into_iter()
        .map(|bucket| {
            let count = customers
                .iter()
                .filter(|customer| bucket.contains(customer.retention_months))
                .count();
            RetentionBucketCount {
                bucket,
                label: bucket.label(),
                count,
                percentage: percentage(count, customers.len()),
            }
        })
        .collect()
}

pub fn promo_usage(customers: &[&Customer]) -> PromoUsage {
    let used = customers.iter().filter(|customer| customer.used_promo).count();
    PromoUsage {
        used,
        not_used: customers.len() - used,
        percentage: percentage(used, customers.len()),
    }
}

/// Most frequent favorites; percentages are shares of all favorite mentions.
pub fn top_favorite_items(customers: &[&Customer], limit: usize) -> Vec<Tally<String>> {
    let mentions = customers
        .iter()
        .flat_map(|customer| customer.favorite_items.iter().map(String::as_str))
        .collect::<Vec<_>>();
    let total = mentions.len();
    tallies(rank_descending(count_first_seen(mentions), limit), total)
}

pub fn customer_overview(customers: &[&Customer]) -> CustomerOverview {
    let total = customers.len();
    let count_type =
        |kind: CustomerType| customers.iter().filter(|c| c.customer_type == kind).count();
    let (new, repeat, premium) = (
        count_type(CustomerType::New),
        count_type(CustomerType::Repeat),
        count_type(CustomerType::Premium),
    );
    let promo_users = customers.iter().filter(|customer| customer.used_promo).count();
    let total_spent: Decimal = customers.iter().map(|customer| customer.total_spent).sum();
    let average_spent = if total == 0 {
        Decimal::ZERO
    } else {
        round_half_up(total_spent / Decimal::from(total), 0)
    };

    CustomerOverview {
        total,
        new,
        repeat,
        premium,
        new_percentage: percentage(new, total),
        repeat_percentage: percentage(repeat, total),
        premium_percentage: percentage(premium, total),
        promo_percentage: percentage(promo_users, total),
        average_spent,
    }
}

pub fn average_items_per_order(customers: &[&Customer]) -> f64 {
    if customers.is_empty() {
        return 0.0;
    }
    let sum: u64 = customers.iter().map(|customer| u64::from(customer.avg_items_per_order)).sum();
    sum as f64 / customers.len() as f64
}

/// Type mix for the `limit` busiest cities, busiest first.
pub fn city_type_distribution(customers: &[&Customer], limit: usize) -> Vec<CityTypeBreakdown> {
    let counts = count_first_seen(customers.iter().map(|customer| customer.city.as_str()));

    rank_descending(counts, limit)
        .into_iter()
        .map(|(city, total)| {
            let in_city = customers.iter().filter(|customer| customer.city == city);
            let mut breakdown =
                CityTypeBreakdown { city: city.clone(), total, new: 0, repeat: 0, premium: 0 };
            for customer in in_city {
                match customer.customer_type {
                    CustomerType::New => breakdown.new += 1,
                    CustomerType::Repeat => breakdown.repeat += 1,
                    CustomerType::Premium => breakdown.premium += 1,
                }
            }
            breakdown
        })
        .collect()
}

/// Lifetime spend grouped by each customer's own payment method.
pub fn revenue_by_payment_method(customers: &[&Customer]) -> Vec<PaymentRevenue> {
    let total: Decimal = customers.iter().map(|customer| customer.total_spent).sum();

    PaymentMethod::ALL
        .into_iter()
        .map(|method| {
            let paying = customers.iter().filter(|customer| customer.payment_method == method);
            let (count, revenue) = paying.fold((0usize, Decimal::ZERO), |(count, revenue), c| {
                (count + 1, revenue + c.total_spent)
            });
            PaymentRevenue {
                method,
                customers: count,
                revenue,
                share_percentage: decimal_percentage(revenue, total),
            }
        })
        .collect()
}

pub fn search_customers<'a>(
    customers: &[&'a Customer],
    query: &CustomerQuery,
) -> Vec<&'a Customer> {
    let needle = query
        .search
        .as_deref()
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase);

    customers
        .iter()
        .copied()
        .filter(|customer| match &needle {
            Some(needle) => {
                customer.user_id.to_lowercase().contains(needle)
                    || customer.city.to_lowercase().contains(needle)
                    || customer.area.to_lowercase().contains(needle)
            }
            None => true,
        })
        .filter(|customer| query.customer_type.map_or(true, |kind| customer.customer_type == kind))
        .filter(|customer| {
            query.payment_method.map_or(true, |method| customer.payment_method == method)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::analytics::fixtures::{date, population, CustomerFixture};
    use crate::dataset::Dataset;

    fn sample() -> Vec<Customer> {
        population(vec![
            CustomerFixture {
                platform: Platform::Talabat,
                city: "Dubai",
                area: "Marina",
                total_orders: 12,
                total_spent: 1200,
                used_promo: true,
                favorite_items: &["Chicken Biryani", "Beef Burger"],
                ..CustomerFixture::default()
            },
            CustomerFixture {
                platform: Platform::DineIn,
                city: "Sharjah",
                area: "Al Nahda",
                payment_method: PaymentMethod::Cash,
                total_orders: 5,
                total_spent: 300,
                first_order_date: date(2026, 4, 10),
                favorite_items: &["Chicken Biryani"],
                ..CustomerFixture::default()
            },
            CustomerFixture {
                platform: Platform::Talabat,
                city: "Dubai",
                area: "JBR",
                total_orders: 1,
                total_spent: 201,
                first_order_date: date(2025, 11, 2),
                favorite_items: &["Garlic Bread"],
                ..CustomerFixture::default()
            },
            CustomerFixture {
                platform: Platform::Noon,
                city: "Dubai",
                area: "Marina",
                payment_method: PaymentMethod::Cash,
                total_orders: 2,
                total_spent: 400,
                used_promo: true,
                first_order_date: date(2026, 8, 25),
                favorite_items: &["Beef Burger", "Chicken Biryani", "Beef Burger"],
                ..CustomerFixture::default()
            },
        ])
    }

    fn refs(customers: &[Customer]) -> Vec<&Customer> {
        customers.iter().collect()
    }

    #[test]
    fn platform_filter_keeps_matching_records() {
        let customers = sample();
        assert_eq!(filter_by_platform(&customers, PlatformFilter::All).len(), 4);

        let talabat = filter_by_platform(&customers, PlatformFilter::Only(Platform::Talabat));
        assert_eq!(talabat.len(), 2);
        assert!(talabat.iter().all(|customer| customer.platform == Platform::Talabat));
    }

    #[test]
    fn enumerated_tallies_follow_fixed_order() {
        let customers = sample();
        let all = refs(&customers);

        let platforms = customers_by_platform(&all);
        assert_eq!(platforms.iter().map(|t| t.key).collect::<Vec<_>>(), Platform::ALL.to_vec());
        assert_eq!(platforms.iter().map(|t| t.count).collect::<Vec<_>>(), vec![2, 0, 1, 0, 1]);

        let types = customers_by_type(&all);
        assert_eq!(types.iter().map(|t| t.count).collect::<Vec<_>>(), vec![1, 1, 2]);
        assert_eq!(types.iter().map(|t| t.percentage).collect::<Vec<_>>(), vec![25, 25, 50]);

        let payments = customers_by_payment_method(&all);
        assert_eq!(payments[0].key, PaymentMethod::Cash);
        assert_eq!(payments[0].count, 2);
        assert_eq!(payments[1].count, 2);
    }

    #[test]
    fn city_counts_keep_first_seen_order() {
        let customers = sample();
        let cities = customers_by_city(&refs(&customers));
        assert_eq!(cities[0].key, "Dubai");
        assert_eq!(cities[0].count, 3);
        assert_eq!(cities[0].percentage, 75);
        assert_eq!(cities[1].key, "Sharjah");
    }

    #[test]
    fn top_areas_are_ranked_and_truncated() {
        let customers = sample();
        let areas = top_areas(&refs(&customers), 2);
        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].key, "Marina");
        assert_eq!(areas[0].count, 2);
        // Al Nahda and JBR tie; Al Nahda was seen first.
        assert_eq!(areas[1].key, "Al Nahda");
    }

    #[test]
    fn retention_buckets_use_exclusive_lower_bounds() {
        assert!(RetentionBucket::UnderOneMonth.contains(1));
        assert!(!RetentionBucket::OneToThreeMonths.contains(1));
        assert!(RetentionBucket::OneToThreeMonths.contains(3));
        assert!(RetentionBucket::SixToTwelveMonths.contains(12));
        assert!(RetentionBucket::OverTwelveMonths.contains(13));

        let customers = sample();
        let distribution = retention_distribution(&refs(&customers));
        let counts = distribution.iter().map(|bucket| bucket.count).collect::<Vec<_>>();
        // retention: 1, 6, 11, 1
        assert_eq!(counts, vec![2, 0, 1, 1, 0]);
        assert_eq!(distribution[0].label, "< 1 month");
    }

    #[test]
    fn promo_usage_and_overview_summarise_population() {
        let customers = sample();
        let all = refs(&customers);

        assert_eq!(promo_usage(&all), PromoUsage { used: 2, not_used: 2, percentage: 50 });

        let overview = customer_overview(&all);
        assert_eq!(overview.total, 4);
        assert_eq!(overview.new + overview.repeat + overview.premium, 4);
        assert_eq!(overview.premium, 2);
        // (1200 + 300 + 201 + 400) / 4 = 525.25
        assert_eq!(overview.average_spent, Decimal::from(525));
        assert_eq!(average_items_per_order(&all), 2.0);
    }

    #[test]
    fn favorites_count_every_mention() {
        let customers = sample();
        let favorites = top_favorite_items(&refs(&customers), 5);
        assert_eq!(favorites[0].key, "Chicken Biryani");
        assert_eq!(favorites[0].count, 3);
        assert_eq!(favorites[1].key, "Beef Burger");
        assert_eq!(favorites[1].count, 3);
        assert_eq!(favorites[2].key, "Garlic Bread");
        assert_eq!(favorites.iter().map(|f| f.count).sum::<usize>(), 7);
    }

    #[test]
    fn city_type_distribution_breaks_down_busiest_cities() {
        let customers = sample();
        let breakdown = city_type_distribution(&refs(&customers), 1);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(
            breakdown[0],
            CityTypeBreakdown { city: "Dubai".to_string(), total: 3, new: 1, repeat: 0, premium: 2 }
        );
    }

    #[test]
    fn payment_revenue_uses_each_customers_method() {
        let customers = sample();
        let revenue = revenue_by_payment_method(&refs(&customers));
        assert_eq!(revenue[0].method, PaymentMethod::Cash);
        assert_eq!(revenue[0].revenue, Decimal::from(700));
        assert_eq!(revenue[1].revenue, Decimal::from(1401));
        assert_eq!(revenue[0].share_percentage + revenue[1].share_percentage, 100);
    }

    #[test]
    fn search_matches_user_id_city_and_area_case_insensitively() {
        let customers = sample();
        let all = refs(&customers);

        let query =
            CustomerQuery { search: Some("marina".to_string()), ..CustomerQuery::default() };
        assert_eq!(search_customers(&all, &query).len(), 2);

        let query = CustomerQuery {
            search: Some("DUBAI".to_string()),
            payment_method: Some(PaymentMethod::Online),
            ..CustomerQuery::default()
        };
        assert_eq!(search_customers(&all, &query).len(), 2);

        let query = CustomerQuery {
            search: Some("dine-in".to_string()),
            customer_type: Some(CustomerType::Repeat),
            ..CustomerQuery::default()
        };
        assert_eq!(search_customers(&all, &query).len(), 1);

        assert_eq!(search_customers(&all, &CustomerQuery::default()).len(), 4);
    }

    #[test]
    fn search_term_is_matched_verbatim() {
        let customers = sample();
        let all = refs(&customers);

        let padded =
            CustomerQuery { search: Some(" marina".to_string()), ..CustomerQuery::default() };
        assert!(search_customers(&all, &padded).is_empty());

        let blank = CustomerQuery { search: Some(String::new()), ..CustomerQuery::default() };
        assert_eq!(search_customers(&all, &blank).len(), 4);
    }

    #[test]
    fn empty_input_yields_zeroes() {
        let empty: Vec<&Customer> = Vec::new();

        assert!(customers_by_type(&empty).iter().all(|t| t.count == 0 && t.percentage == 0));
        assert!(retention_distribution(&empty).iter().all(|bucket| bucket.count == 0));
        assert!(customers_by_city(&empty).is_empty());
        assert!(top_areas(&empty, 5).is_empty());
        assert_eq!(promo_usage(&empty).percentage, 0);
        assert_eq!(customer_overview(&empty).average_spent, Decimal::ZERO);
        assert_eq!(average_items_per_order(&empty), 0.0);
        assert!(revenue_by_payment_method(&empty).iter().all(|r| r.share_percentage == 0));
    }

    #[test]
    fn generated_population_satisfies_partition_properties() {
        let dataset = Dataset::with_seed(2024, date(2026, 10, 19), 200);

        for filter in [PlatformFilter::All, PlatformFilter::Only(Platform::DineIn)] {
            let customers = filter_by_platform(dataset.customers(), filter);

            let typed: usize = customers_by_type(&customers).iter().map(|t| t.count).sum();
            assert_eq!(typed, customers.len());

            let bucketed: usize =
                retention_distribution(&customers).iter().map(|bucket| bucket.count).sum();
            assert_eq!(bucketed, customers.len());

            let areas = top_areas(&customers, DEFAULT_TOP_LIMIT);
            assert!(areas.len() <= DEFAULT_TOP_LIMIT);
            assert!(areas.windows(2).all(|pair| pair[0].count >= pair[1].count));
        }
    }
}
