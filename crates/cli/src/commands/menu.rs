use menulytics_core::errors::ApplicationError;
use menulytics_core::report::menu_report;

use crate::commands::{load_dataset, parse_platform, CommandResult};
use crate::GlobalArgs;

pub fn run(global: &GlobalArgs, platform: Option<&str>, limit: Option<usize>) -> CommandResult {
    let filter = match parse_platform("menu", platform) {
        Ok(filter) => filter,
        Err(failure) => return failure,
    };
    let (config, dataset) = match load_dataset("menu", global.limited_load_options(limit)) {
        Ok(loaded) => loaded,
        Err(failure) => return failure,
    };

    match menu_report(&dataset, filter, &config.report) {
        Ok(report) => CommandResult::report(
            "menu",
            format!("{} menu items on {}", report.metrics.active_items, report.platform_name),
            &report,
        ),
        Err(error) => CommandResult::from_error("menu", &ApplicationError::from(error)),
    }
}
