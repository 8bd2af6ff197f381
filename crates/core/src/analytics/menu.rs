use rust_decimal::Decimal;
use serde::Serialize;

use crate::analytics::{percentage, round_half_up};
use crate::dataset::catalog::UNKNOWN_ITEM_NAME;
use crate::domain::menu::{AreaSales, MenuItem, MenuItemId};
use crate::domain::platform::MenuPlatform;

pub const DEFAULT_ITEM_COUNT: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesOrder {
    Top,
    Bottom,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RankedMenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub sales_count: u32,
    pub revenue: Decimal,
    pub profit: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MenuMetrics {
    pub active_items: usize,
    pub with_photo: usize,
    pub with_description: usize,
    pub conversion_rate: u32,
    pub photo_percentage: u32,
    pub description_percentage: u32,
    pub completeness: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryItemRow {
    pub name: String,
    pub price: Decimal,
    pub sales_count: u32,
    pub revenue: Decimal,
    pub has_photo: bool,
    pub has_description: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub item_count: usize,
    pub total_sales: u32,
    pub total_revenue: Decimal,
    pub average_price: Decimal,
    pub items: Vec<CategoryItemRow>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AreaTopItem {
    pub item_id: MenuItemId,
    pub name: String,
    pub sales_count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AreaTopItems {
    pub area: String,
    pub items: Vec<AreaTopItem>,
}

fn active_on(items: &[MenuItem], platform: MenuPlatform) -> impl Iterator<Item = &MenuItem> {
    items.iter().filter(move |item| item.is_active_on(platform))
}

/// Best or worst sellers on `platform`, annotated with revenue and profit.
///
/// Sorting is stable, so equal sales keep catalog order.
pub fn top_items(
    items: &[MenuItem],
    platform: MenuPlatform,
    count: usize,
    order: SalesOrder,
) -> Vec<RankedMenuItem> {
    let mut active = active_on(items, platform).collect::<Vec<_>>();
    match order {
        SalesOrder::Top => active.sort_by(|a, b| b.sales_on(platform).cmp(&a.sales_on(platform))),
        SalesOrder::Bottom => active.sort_by_key(|item| item.sales_on(platform)),
    }

    active
        .into_iter()
        .take(count)
        .map(|item| RankedMenuItem {
            id: item.id.clone(),
            name: item.name.clone(),
            category: item.category.clone(),
            price: item.price,
            sales_count: item.sales_on(platform),
            revenue: item.revenue_on(platform),
            profit: item.profit_on(platform),
        })
        .collect()
}

pub fn menu_metrics(items: &[MenuItem], platform: MenuPlatform) -> MenuMetrics {
    let active = active_on(items, platform).collect::<Vec<_>>();
    if active.is_empty() {
        return MenuMetrics::default();
    }

    let with_photo = active.iter().filter(|item| item.has_photo.get(platform)).count();
    let with_description = active.iter().filter(|item| item.has_description.get(platform)).count();
    let complete = active
        .iter()
        .filter(|item| item.has_photo.get(platform) && item.has_description.get(platform))
        .count();
    let count = active.len();

    MenuMetrics {
        active_items: count,
        with_photo,
        with_description,
        conversion_rate: percentage(complete, count),
        photo_percentage: percentage(with_photo, count),
        description_percentage: percentage(with_description, count),
        completeness: percentage(with_photo + with_description, count * 2),
    }
}

/// Distinct categories in first-seen catalog order.
pub fn categories(items: &[MenuItem]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for item in items {
        if !seen.contains(&item.category.as_str()) {
            seen.push(item.category.as_str());
        }
    }
    seen
}

pub fn category_summaries(items: &[MenuItem], platform: MenuPlatform) -> Vec<CategorySummary> {
    categories(items)
        .into_iter()
        .map(|category| {
            let rows = active_on(items, platform)
                .filter(|item| item.category == category)
                .map(|item| CategoryItemRow {
                    name: item.name.clone(),
                    price: item.price,
                    sales_count: item.sales_on(platform),
                    revenue: item.revenue_on(platform),
                    has_photo: item.has_photo.get(platform),
                    has_description: item.has_description.get(platform),
                })
                .collect::<Vec<_>>();

            let price_sum: Decimal = rows.iter().map(|row| row.price).sum();
            let average_price = if rows.is_empty() {
                Decimal::ZERO
            } else {
                round_half_up(price_sum / Decimal::from(rows.len()), 2)
            };

            CategorySummary {
                category: category.to_string(),
                item_count: rows.len(),
                total_sales: rows.iter().map(|row| row.sales_count).sum(),
                total_revenue: rows.iter().map(|row| row.revenue).sum(),
                average_price,
                items: rows,
            }
        })
        .collect()
}

pub fn item_name<'a>(items: &'a [MenuItem], item_id: &MenuItemId) -> &'a str {
    items
        .iter()
        .find(|item| &item.id == item_id)
        .map(|item| item.name.as_str())
        .unwrap_or(UNKNOWN_ITEM_NAME)
}

pub fn area_top_items(area_sales: &[AreaSales], items: &[MenuItem]) -> Vec<AreaTopItems> {
    area_sales
        .iter()
        .map(|area| AreaTopItems {
            area: area.area.clone(),
            items: area
                .top_items
                .iter()
                .map(|entry| AreaTopItem {
                    item_id: entry.item_id.clone(),
                    name: item_name(items, &entry.item_id).to_string(),
                    sales_count: entry.sales_count,
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rust_decimal::Decimal;

    use super::*;
    use crate::dataset::catalog::{area_sales, menu_catalog};
    use crate::domain::menu::PlatformTable;

    #[test]
    fn talabat_best_seller_is_biryani() {
        let items = menu_catalog();
        let top = top_items(&items, MenuPlatform::Talabat, DEFAULT_ITEM_COUNT, SalesOrder::Top);

        assert_eq!(top.len(), 5);
        assert_eq!(top[0].name, "Chicken Biryani");
        assert_eq!(top[0].sales_count, 420);
        assert_eq!(top[0].revenue, Decimal::from(23_100));
        assert_eq!(top[0].profit, Decimal::from(13_860));
        assert!(top.windows(2).all(|pair| pair[0].sales_count >= pair[1].sales_count));
    }

    #[test]
    fn top_and_bottom_five_are_disjoint() {
        let items = menu_catalog();
        for platform in MenuPlatform::LISTED.into_iter().chain([MenuPlatform::All]) {
            let top = top_items(&items, platform, 5, SalesOrder::Top);
            let bottom = top_items(&items, platform, 5, SalesOrder::Bottom);

            let top_ids = top.iter().map(|item| item.id.0.clone()).collect::<BTreeSet<_>>();
            assert!(bottom.iter().all(|item| !top_ids.contains(&item.id.0)));
            assert!(bottom.windows(2).all(|pair| pair[0].sales_count <= pair[1].sales_count));
        }

        let bottom = top_items(&items, MenuPlatform::Noon, 1, SalesOrder::Bottom);
        assert_eq!(bottom[0].name, "Mozzarella Sticks");
    }

    #[test]
    fn talabat_listing_metrics() {
        let metrics = menu_metrics(&menu_catalog(), MenuPlatform::Talabat);
        assert_eq!(
            metrics,
            MenuMetrics {
                active_items: 10,
                with_photo: 6,
                with_description: 8,
                conversion_rate: 60,
                photo_percentage: 60,
                description_percentage: 80,
                completeness: 70,
            }
        );
    }

    #[test]
    fn metrics_stay_within_percent_range() {
        let items = menu_catalog();
        for platform in MenuPlatform::LISTED.into_iter().chain([MenuPlatform::All]) {
            let metrics = menu_metrics(&items, platform);
            assert!(metrics.completeness <= 100);
            assert!(metrics.conversion_rate <= metrics.photo_percentage);
            assert!(metrics.conversion_rate <= metrics.description_percentage);
        }
    }

    #[test]
    fn inactive_items_are_excluded() {
        let mut items = menu_catalog();
        for item in &mut items {
            item.is_active = PlatformTable::flags(false, true, true, true, true);
        }

        assert!(top_items(&items, MenuPlatform::Talabat, 5, SalesOrder::Top).is_empty());
        assert_eq!(menu_metrics(&items, MenuPlatform::Talabat), MenuMetrics::default());

        let summaries = category_summaries(&items, MenuPlatform::Talabat);
        assert_eq!(summaries.len(), 10);
        assert!(summaries
            .iter()
            .all(|summary| summary.item_count == 0 && summary.average_price == Decimal::ZERO));
    }

    #[test]
    fn category_summaries_follow_catalog_order() {
        let items = menu_catalog();
        assert_eq!(categories(&items)[..3], ["Main Course", "Burgers", "Pizza"]);

        let summaries = category_summaries(&items, MenuPlatform::Careem);
        assert_eq!(summaries.len(), 10);

        let main = &summaries[0];
        assert_eq!(main.category, "Main Course");
        assert_eq!(main.item_count, 1);
        assert_eq!(main.total_sales, 380);
        assert_eq!(main.total_revenue, Decimal::from(20_900));
        assert_eq!(main.average_price, Decimal::from(55));
        assert_eq!(main.items[0].name, "Chicken Biryani");
    }

    #[test]
    fn area_items_resolve_names() {
        let items = menu_catalog();
        let areas = area_top_items(&area_sales(), &items);

        assert_eq!(areas.len(), 4);
        assert_eq!(areas[1].area, "Marina");
        assert_eq!(areas[1].items[0].name, "Grilled Salmon");
        assert_eq!(areas[1].items[0].sales_count, 210);

        assert_eq!(item_name(&items, &MenuItemId("42".to_string())), UNKNOWN_ITEM_NAME);
    }
}
