use menulytics_core::analytics::customers::{filter_by_platform, search_customers, CustomerQuery};
use menulytics_core::domain::customer::{Customer, CustomerType, PaymentMethod};
use menulytics_core::domain::platform::PlatformFilter;
use serde::Serialize;

use crate::commands::{load_dataset, parse_input, parse_platform, CommandResult};
use crate::GlobalArgs;

#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileFilters<'a> {
    pub platform: Option<&'a str>,
    pub search: Option<&'a str>,
    pub customer_type: Option<&'a str>,
    pub payment: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ProfileListing<'a> {
    platform: PlatformFilter,
    matches: usize,
    customers: Vec<&'a Customer>,
}

pub fn run(global: &GlobalArgs, filters: ProfileFilters<'_>) -> CommandResult {
    let (filter, query) = match parse_filters(filters) {
        Ok(parsed) => parsed,
        Err(failure) => return failure,
    };
    let (_, dataset) = match load_dataset("profiles", global.load_options()) {
        Ok(loaded) => loaded,
        Err(failure) => return failure,
    };

    let scoped = filter_by_platform(dataset.customers(), filter);
    let customers = search_customers(&scoped, &query);
    let listing = ProfileListing { platform: filter, matches: customers.len(), customers };

    CommandResult::report(
        "profiles",
        format!("{} of {} profiles matched", listing.matches, scoped.len()),
        &listing,
    )
}

fn parse_filters(
    filters: ProfileFilters<'_>,
) -> Result<(PlatformFilter, CustomerQuery), CommandResult> {
    let platform = parse_platform("profiles", filters.platform)?;
    let query = CustomerQuery {
        search: filters.search.map(str::to_string),
        customer_type: parse_input::<CustomerType>("profiles", filters.customer_type)?,
        payment_method: parse_input::<PaymentMethod>("profiles", filters.payment)?,
    };
    Ok((platform, query))
}
