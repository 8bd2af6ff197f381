pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use menulytics_core::config::{ConfigOverrides, LoadOptions};

#[derive(Debug, Parser)]
#[command(
    name = "menulytics",
    about = "Menulytics analytics CLI",
    long_about = "Generate a synthetic customer population and print menu and customer-segmentation reports as JSON.",
    after_help = "Examples:\n  menulytics --seed 42 customers --platform talabat\n  menulytics cohorts\n  menulytics menu --platform all --limit 3\n  menulytics config"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub command: Command,
}

/// Flags shared by every subcommand; they sit on top of file and env configuration.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    #[arg(long, global = true, help = "Path to a menulytics.toml config file")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "Seed for a reproducible dataset")]
    pub seed: Option<u64>,
    #[arg(long, global = true, value_name = "YYYY-MM-DD", help = "Date treated as today")]
    pub reference_date: Option<NaiveDate>,
    #[arg(long, global = true, help = "Number of synthetic customers to generate")]
    pub customers: Option<usize>,
}

impl GlobalArgs {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                customer_count: self.customers,
                seed: self.seed,
                reference_date: self.reference_date,
                ..ConfigOverrides::default()
            },
        }
    }

    /// Load options for a report command whose `--limit` overrides `report.top_limit`.
    pub fn limited_load_options(&self, top_limit: Option<usize>) -> LoadOptions {
        let mut options = self.load_options();
        options.overrides.top_limit = top_limit;
        options
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "Customer segmentation report (types, cities, areas, retention, promo)")]
    Customers {
        #[arg(long, help = "all|talabat|careem|noon|deliveroo|dine-in")]
        platform: Option<String>,
        #[arg(long, help = "Rows kept in ranked tables")]
        limit: Option<usize>,
    },
    #[command(about = "Monthly cohort table with simulated retention curves")]
    Cohorts {
        #[arg(long, help = "all|talabat|careem|noon|deliveroo|dine-in")]
        platform: Option<String>,
    },
    #[command(about = "Search customer profiles by user id, city or area")]
    Profiles {
        #[arg(long, help = "all|talabat|careem|noon|deliveroo|dine-in")]
        platform: Option<String>,
        #[arg(long, help = "Case-insensitive text matched against user id, city and area")]
        search: Option<String>,
        #[arg(long = "type", help = "new|repeat|premium")]
        customer_type: Option<String>,
        #[arg(long, help = "cash|online")]
        payment: Option<String>,
    },
    #[command(about = "Menu performance report for one delivery platform or all of them")]
    Menu {
        #[arg(long, help = "all|talabat|careem|noon|deliveroo")]
        platform: Option<String>,
        #[arg(long, help = "Items listed in the top and bottom tables")]
        limit: Option<usize>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run(cli: Cli) -> ExitCode {
    let Cli { global, command } = cli;

    let result = match command {
        Command::Customers { platform, limit } => {
            commands::customers::run(&global, platform.as_deref(), limit)
        }
        Command::Cohorts { platform } => commands::cohorts::run(&global, platform.as_deref()),
        Command::Profiles { platform, search, customer_type, payment } => {
            commands::profiles::run(
                &global,
                commands::profiles::ProfileFilters {
                    platform: platform.as_deref(),
                    search: search.as_deref(),
                    customer_type: customer_type.as_deref(),
                    payment: payment.as_deref(),
                },
            )
        }
        Command::Menu { platform, limit } => {
            commands::menu::run(&global, platform.as_deref(), limit)
        }
        Command::Config => commands::config::run(&global),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
