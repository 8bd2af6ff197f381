use menulytics_core::report::customer_report;

use crate::commands::{load_dataset, parse_platform, CommandResult};
use crate::GlobalArgs;

pub fn run(global: &GlobalArgs, platform: Option<&str>, limit: Option<usize>) -> CommandResult {
    let filter = match parse_platform("customers", platform) {
        Ok(filter) => filter,
        Err(failure) => return failure,
    };
    let (config, dataset) = match load_dataset("customers", global.limited_load_options(limit)) {
        Ok(loaded) => loaded,
        Err(failure) => return failure,
    };

    let report = customer_report(&dataset, filter, &config.report);
    CommandResult::report(
        "customers",
        format!(
            "{} customers on {} (seed {})",
            report.overview.total,
            filter.display_name(),
            dataset.seed()
        ),
        &report,
    )
}
