use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::platform::MenuPlatform;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MenuItemId(pub String);

/// One value per menu platform, including the `all` aggregate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformTable<T> {
    pub talabat: T,
    pub careem: T,
    pub noon: T,
    pub deliveroo: T,
    pub all: T,
}

impl<T: Copy> PlatformTable<T> {
    pub fn get(&self, platform: MenuPlatform) -> T {
        match platform {
            MenuPlatform::Talabat => self.talabat,
            MenuPlatform::Careem => self.careem,
            MenuPlatform::Noon => self.noon,
            MenuPlatform::Deliveroo => self.deliveroo,
            MenuPlatform::All => self.all,
        }
    }
}

impl PlatformTable<u32> {
    /// Sales table whose `all` entry is the sum of the four listed platforms.
    pub fn sales(talabat: u32, careem: u32, noon: u32, deliveroo: u32) -> Self {
        Self { talabat, careem, noon, deliveroo, all: talabat + careem + noon + deliveroo }
    }
}

impl PlatformTable<bool> {
    pub fn flags(talabat: bool, careem: bool, noon: bool, deliveroo: bool, all: bool) -> Self {
        Self { talabat, careem, noon, deliveroo, all }
    }

    pub fn everywhere(value: bool) -> Self {
        Self::flags(value, value, value, value, value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub cost: Decimal,
    pub sales_count: PlatformTable<u32>,
    pub has_photo: PlatformTable<bool>,
    pub has_description: PlatformTable<bool>,
    pub is_active: PlatformTable<bool>,
}

impl MenuItem {
    pub fn is_active_on(&self, platform: MenuPlatform) -> bool {
        self.is_active.get(platform)
    }

    pub fn sales_on(&self, platform: MenuPlatform) -> u32 {
        self.sales_count.get(platform)
    }

    pub fn revenue_on(&self, platform: MenuPlatform) -> Decimal {
        self.price * Decimal::from(self.sales_on(platform))
    }

    pub fn profit_on(&self, platform: MenuPlatform) -> Decimal {
        (self.price - self.cost) * Decimal::from(self.sales_on(platform))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaItemSales {
    pub item_id: MenuItemId,
    pub sales_count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaSales {
    pub area: String,
    pub top_items: Vec<AreaItemSales>,
}
