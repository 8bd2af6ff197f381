//! Serializable report views composed from the aggregators for one platform filter.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::analytics::cohort::{cohort_analysis, CohortOptions, CohortRow};
use crate::analytics::customers::{
    average_items_per_order, city_type_distribution, customer_overview, customers_by_city,
    customers_by_payment_method, customers_by_platform, customers_by_type, filter_by_platform,
    promo_usage, retention_distribution, revenue_by_payment_method, top_areas,
    top_favorite_items, CityTypeBreakdown, CustomerOverview, PaymentRevenue, PromoUsage,
    RetentionBucketCount,
};
use crate::analytics::menu::{
    area_top_items, category_summaries, menu_metrics, top_items, AreaTopItems, CategorySummary,
    MenuMetrics, RankedMenuItem, SalesOrder,
};
use crate::analytics::Tally;
use crate::config::ReportConfig;
use crate::dataset::Dataset;
use crate::domain::customer::{CustomerType, PaymentMethod};
use crate::domain::platform::{MenuPlatform, Platform, PlatformFilter};
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CustomerReport {
    pub platform: PlatformFilter,
    pub platform_name: &'static str,
    pub overview: CustomerOverview,
    pub average_items_per_order: f64,
    pub by_platform: Vec<Tally<Platform>>,
    pub by_type: Vec<Tally<CustomerType>>,
    pub by_payment_method: Vec<Tally<PaymentMethod>>,
    pub by_city: Vec<Tally<String>>,
    pub city_types: Vec<CityTypeBreakdown>,
    pub top_areas: Vec<Tally<String>>,
    pub retention: Vec<RetentionBucketCount>,
    pub promo: PromoUsage,
    pub favorite_items: Vec<Tally<String>>,
    pub revenue_by_payment_method: Vec<PaymentRevenue>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CohortReport {
    pub platform: PlatformFilter,
    pub platform_name: &'static str,
    pub customers: usize,
    pub cohorts: Vec<CohortRow>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MenuReport {
    pub platform: MenuPlatform,
    pub platform_name: &'static str,
    pub total_revenue: Decimal,
    pub metrics: MenuMetrics,
    pub top_items: Vec<RankedMenuItem>,
    pub bottom_items: Vec<RankedMenuItem>,
    pub categories: Vec<CategorySummary>,
    pub areas: Vec<AreaTopItems>,
}

pub fn customer_report(
    dataset: &Dataset,
    filter: PlatformFilter,
    config: &ReportConfig,
) -> CustomerReport {
    let customers = filter_by_platform(dataset.customers(), filter);

    debug!(
        event_name = "report.customers.built",
        platform = %filter,
        customers = customers.len(),
        "customer report composed"
    );

    CustomerReport {
        platform: filter,
        platform_name: filter.display_name(),
        overview: customer_overview(&customers),
        average_items_per_order: average_items_per_order(&customers),
        by_platform: customers_by_platform(&customers),
        by_type: customers_by_type(&customers),
        by_payment_method: customers_by_payment_method(&customers),
        by_city: customers_by_city(&customers),
        city_types: city_type_distribution(&customers, config.city_limit),
        top_areas: top_areas(&customers, config.top_limit),
        retention: retention_distribution(&customers),
        promo: promo_usage(&customers),
        favorite_items: top_favorite_items(&customers, config.top_limit),
        revenue_by_payment_method: revenue_by_payment_method(&customers),
    }
}

/// Cohort table drawn from the dataset's simulation stream, so a seeded
/// dataset always renders the same curves.
pub fn cohort_report(
    dataset: &Dataset,
    filter: PlatformFilter,
    config: &ReportConfig,
) -> CohortReport {
    let customers = filter_by_platform(dataset.customers(), filter);
    let options = CohortOptions {
        window: config.cohort_window,
        max_months: config.cohort_max_months,
        min_cohort_size: config.min_cohort_size,
    };
    let mut rng = dataset.simulation_rng();
    let cohorts = cohort_analysis(&customers, dataset.reference_date(), options, &mut rng);

    debug!(
        event_name = "report.cohorts.built",
        platform = %filter,
        customers = customers.len(),
        cohorts = cohorts.len(),
        "cohort report composed"
    );

    CohortReport {
        platform: filter,
        platform_name: filter.display_name(),
        customers: customers.len(),
        cohorts,
    }
}

pub fn menu_report(
    dataset: &Dataset,
    filter: PlatformFilter,
    config: &ReportConfig,
) -> Result<MenuReport, DomainError> {
    let platform = MenuPlatform::try_from(filter)?;
    let items = dataset.catalog().items();

    let total_revenue = items
        .iter()
        .filter(|item| item.is_active_on(platform))
        .map(|item| item.revenue_on(platform))
        .sum();

    debug!(
        event_name = "report.menu.built",
        platform = platform.display_name(),
        items = items.len(),
        "menu report composed"
    );

    Ok(MenuReport {
        platform,
        platform_name: platform.display_name(),
        total_revenue,
        metrics: menu_metrics(items, platform),
        top_items: top_items(items, platform, config.top_limit, SalesOrder::Top),
        bottom_items: top_items(items, platform, config.top_limit, SalesOrder::Bottom),
        categories: category_summaries(items, platform),
        areas: area_top_items(dataset.area_sales(), items),
    })
}
