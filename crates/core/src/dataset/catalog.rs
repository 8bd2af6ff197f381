use rust_decimal::Decimal;

use crate::analytics::menu;
use crate::domain::menu::{AreaItemSales, AreaSales, MenuItem, MenuItemId, PlatformTable};

pub const UNKNOWN_ITEM_NAME: &str = "Unknown Item";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<MenuItem>,
}

impl Catalog {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    /// The hand-authored restaurant menu.
    pub fn standard() -> Self {
        Self::new(menu_catalog())
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn find(&self, item_id: &MenuItemId) -> Option<&MenuItem> {
        self.items.iter().find(|item| &item.id == item_id)
    }

    pub fn item_name(&self, item_id: &MenuItemId) -> &str {
        menu::item_name(&self.items, item_id)
    }

    pub fn item_names(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.name.as_str()).collect()
    }
}

struct Listing {
    photo: [bool; 5],
    description: [bool; 5],
}

fn flags(values: [bool; 5]) -> PlatformTable<bool> {
    let [talabat, careem, noon, deliveroo, all] = values;
    PlatformTable::flags(talabat, careem, noon, deliveroo, all)
}

fn item(
    id: &str,
    name: &str,
    category: &str,
    price: i64,
    cost: i64,
    sales: [u32; 4],
    listing: Listing,
) -> MenuItem {
    let [talabat, careem, noon, deliveroo] = sales;
    MenuItem {
        id: MenuItemId(id.to_string()),
        name: name.to_string(),
        category: category.to_string(),
        price: Decimal::from(price),
        cost: Decimal::from(cost),
        sales_count: PlatformTable::sales(talabat, careem, noon, deliveroo),
        has_photo: flags(listing.photo),
        has_description: flags(listing.description),
        is_active: PlatformTable::everywhere(true),
    }
}

// Flag order: talabat, careem, noon, deliveroo, all.
pub fn menu_catalog() -> Vec<MenuItem> {
    const T: bool = true;
    const F: bool = false;

    vec![
        item(
            "1",
            "Chicken Biryani",
            "Main Course",
            55,
            22,
            [420, 380, 210, 310],
            Listing { photo: [T, T, T, T, T], description: [T, T, T, T, T] },
        ),
        item(
            "2",
            "Beef Burger",
            "Burgers",
            45,
            18,
            [380, 340, 190, 290],
            Listing { photo: [T, T, T, F, T], description: [T, T, F, F, T] },
        ),
        item(
            "3",
            "Margherita Pizza",
            "Pizza",
            40,
            15,
            [350, 320, 180, 270],
            Listing { photo: [T, F, T, T, T], description: [T, F, T, T, T] },
        ),
        item(
            "4",
            "Pasta Alfredo",
            "Pasta",
            50,
            20,
            [320, 290, 160, 240],
            Listing { photo: [T, T, F, T, T], description: [T, T, F, T, T] },
        ),
        item(
            "5",
            "Grilled Salmon",
            "Seafood",
            75,
            35,
            [290, 260, 140, 220],
            Listing { photo: [T, T, T, T, T], description: [T, T, T, T, T] },
        ),
        item(
            "6",
            "Caesar Salad",
            "Salads",
            35,
            12,
            [130, 110, 60, 90],
            Listing { photo: [F, T, F, T, T], description: [T, T, F, F, T] },
        ),
        item(
            "7",
            "Garlic Bread",
            "Sides",
            15,
            5,
            [110, 100, 50, 80],
            Listing { photo: [F, F, F, F, F], description: [F, F, F, F, F] },
        ),
        item(
            "8",
            "Chocolate Cake",
            "Desserts",
            30,
            10,
            [100, 90, 45, 70],
            Listing { photo: [T, F, F, T, T], description: [T, F, F, T, T] },
        ),
        item(
            "9",
            "Fresh Orange Juice",
            "Beverages",
            20,
            8,
            [90, 80, 40, 65],
            Listing { photo: [F, F, F, F, F], description: [T, F, F, F, T] },
        ),
        item(
            "10",
            "Mozzarella Sticks",
            "Appetizers",
            25,
            10,
            [85, 75, 35, 60],
            Listing { photo: [F, F, F, F, F], description: [F, F, F, F, F] },
        ),
    ]
}

fn area(name: &str, top_items: &[(&str, u32)]) -> AreaSales {
    AreaSales {
        area: name.to_string(),
        top_items: top_items
            .iter()
            .map(|(item_id, sales_count)| AreaItemSales {
                item_id: MenuItemId((*item_id).to_string()),
                sales_count: *sales_count,
            })
            .collect(),
    }
}

pub fn area_sales() -> Vec<AreaSales> {
    vec![
        area("Downtown", &[("1", 320), ("2", 280), ("3", 250)]),
        area("Marina", &[("5", 210), ("3", 190), ("4", 180)]),
        area("Business Bay", &[("1", 270), ("4", 220), ("2", 200)]),
        area("JBR", &[("3", 230), ("5", 200), ("2", 190)]),
    ]
}
