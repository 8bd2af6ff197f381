pub mod catalog;
pub mod customers;

use chrono::{NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::config::DatasetConfig;
use crate::domain::customer::Customer;
use crate::domain::menu::AreaSales;

use self::catalog::{area_sales, Catalog};
use self::customers::CustomerGenerator;

// Separates the cohort simulation stream from the population stream.
const SIMULATION_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

/// Immutable in-memory data behind every report.
///
/// Built once per session and handed to the aggregators by reference.
#[derive(Clone, Debug)]
pub struct Dataset {
    seed: u64,
    reference_date: NaiveDate,
    customers: Vec<Customer>,
    catalog: Catalog,
    area_sales: Vec<AreaSales>,
}

impl Dataset {
    pub fn generate(config: &DatasetConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let reference_date = config.reference_date.unwrap_or_else(|| Utc::now().date_naive());
        Self::with_seed(seed, reference_date, config.customer_count)
    }

    pub fn with_seed(seed: u64, reference_date: NaiveDate, customer_count: usize) -> Self {
        let catalog = Catalog::standard();
        let mut rng = StdRng::seed_from_u64(seed);
        let customers = CustomerGenerator::new(reference_date, catalog.item_names())
            .generate(customer_count, &mut rng);

        info!(
            event_name = "dataset.generated",
            seed,
            customer_count = customers.len(),
            menu_items = catalog.items().len(),
            reference_date = %reference_date,
            "synthetic dataset generated"
        );

        Self { seed, reference_date, customers, catalog, area_sales: area_sales() }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn area_sales(&self) -> &[AreaSales] {
        &self.area_sales
    }

    /// Random source for display simulations, reproducible from the dataset seed.
    pub fn simulation_rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed ^ SIMULATION_STREAM)
    }
}
