pub mod analytics;
pub mod config;
pub mod dataset;
pub mod domain;
pub mod errors;
pub mod report;

pub use analytics::Tally;
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions};
pub use dataset::Dataset;
pub use domain::customer::{Customer, CustomerId, CustomerType, PaymentMethod};
pub use domain::menu::{AreaSales, MenuItem, MenuItemId};
pub use domain::platform::{MenuPlatform, Platform, PlatformFilter};
pub use errors::{ApplicationError, DomainError};
pub use report::{CohortReport, CustomerReport, MenuReport};
