use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::platform::Platform;
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Online,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 2] = [Self::Cash, Self::Online];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Online => "online",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "online" => Ok(Self::Online),
            other => Err(DomainError::UnknownPaymentMethod(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    New,
    Repeat,
    Premium,
}

impl CustomerType {
    pub const ALL: [CustomerType; 3] = [Self::New, Self::Repeat, Self::Premium];

    /// Tier rule: premium beats repeat, repeat beats new.
    pub fn classify(total_orders: u32, retention_months: u32) -> Self {
        if total_orders > 10 || retention_months > 6 {
            Self::Premium
        } else if total_orders > 3 {
            Self::Repeat
        } else {
            Self::New
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Repeat => "repeat",
            Self::Premium => "premium",
        }
    }
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerType {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(Self::New),
            "repeat" => Ok(Self::Repeat),
            "premium" => Ok(Self::Premium),
            other => Err(DomainError::UnknownCustomerType(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub user_id: String,
    pub platform: Platform,
    pub city: String,
    pub area: String,
    pub payment_method: PaymentMethod,
    pub total_orders: u32,
    pub avg_items_per_order: u32,
    pub total_spent: Decimal,
    pub avg_order_value: Decimal,
    pub used_promo: bool,
    pub customer_type: CustomerType,
    pub first_order_date: NaiveDate,
    pub retention_months: u32,
    pub favorite_items: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_combinations: Option<Vec<Vec<String>>>,
}

/// Whole 30-day months between the first order and `reference`, never below one.
pub fn retention_months(first_order_date: NaiveDate, reference: NaiveDate) -> u32 {
    let days = (reference - first_order_date).num_days();
    days.div_euclid(30).clamp(1, i64::from(u32::MAX)) as u32
}
