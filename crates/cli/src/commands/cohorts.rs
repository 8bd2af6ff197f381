use menulytics_core::report::cohort_report;

use crate::commands::{load_dataset, parse_platform, CommandResult};
use crate::GlobalArgs;

pub fn run(global: &GlobalArgs, platform: Option<&str>) -> CommandResult {
    let filter = match parse_platform("cohorts", platform) {
        Ok(filter) => filter,
        Err(failure) => return failure,
    };
    let (config, dataset) = match load_dataset("cohorts", global.load_options()) {
        Ok(loaded) => loaded,
        Err(failure) => return failure,
    };

    let report = cohort_report(&dataset, filter, &config.report);
    CommandResult::report(
        "cohorts",
        format!(
            "{} cohorts on {} as of {}",
            report.cohorts.len(),
            filter.display_name(),
            dataset.reference_date()
        ),
        &report,
    )
}
