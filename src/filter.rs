//! Allow-set Filtering
//!
//! A row survives when its category is in the category allow-set AND its
//! city is in the city allow-set. An empty allow-set keeps nothing.

use crate::category::Category;
use crate::error::Result;
use crate::table::{RestaurantTable, CATEGORY, CITY};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Filter state chosen by the shell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub categories: BTreeSet<Category>,
    pub cities: BTreeSet<String>,
}

impl Selection {
    pub fn new<C, S>(categories: C, cities: S) -> Self
    where
        C: IntoIterator<Item = Category>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            categories: categories.into_iter().collect(),
            cities: cities.into_iter().map(Into::into).collect(),
        }
    }

    /// Everything present in `table` is allowed.
    pub fn all(table: &RestaurantTable) -> Result<Self> {
        Ok(Self::new(table.categories()?, table.cities()?))
    }

    pub fn apply(&self, table: &RestaurantTable) -> Result<RestaurantTable> {
        filter(table, &self.categories, &self.cities)
    }
}

/// Subset of `table` whose rows match both allow-sets. The input is untouched.
pub fn filter(
    table: &RestaurantTable,
    categories: &BTreeSet<Category>,
    cities: &BTreeSet<String>,
) -> Result<RestaurantTable> {
    let allowed_categories: HashSet<&str> = categories.iter().map(|c| c.as_str()).collect();

    let df = table.frame();
    let mask: BooleanChunked = df
        .column(CATEGORY)?
        .str()?
        .into_iter()
        .zip(df.column(CITY)?.str()?.into_iter())
        .map(|(category, city)| match (category, city) {
            (Some(category), Some(city)) => {
                allowed_categories.contains(category) && cities.contains(city)
            }
            _ => false,
        })
        .collect();

    let filtered = df.filter(&mask)?;
    debug!(
        "Filtered {} -> {} rows ({} categories, {} cities allowed)",
        df.height(),
        filtered.height(),
        categories.len(),
        cities.len()
    );
    Ok(RestaurantTable::from_frame(filtered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::transform;

    fn table() -> RestaurantTable {
        let df = df! [
            "سلسلة" => ["Herfy", "Al Baik", "Five Guys", "Al Baik"],
            "المدينة" => ["Riyadh", "Jeddah", "Riyadh", "Riyadh"],
            "عدد الفروع" => [500i64, 400, 20, 80],
            "الإيرادات (مليون ريال)" => [120.0, 300.0, 30.0, 90.0],
            "متوسط الإيرادات لكل فرع" => [0.24, 0.75, 1.5, 1.125],
            "نسبة النمو (%)" => [5.0, 8.0, 12.0, 6.0]
        ]
        .unwrap();
        transform(df).unwrap()
    }

    #[test]
    fn test_empty_allow_sets_exclude_everything() {
        let t = table();
        let out = filter(&t, &BTreeSet::new(), &BTreeSet::new()).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.column_names(), t.column_names());

        let only_cities = Selection::new(Vec::<Category>::new(), ["Riyadh", "Jeddah"]);
        assert!(only_cities.apply(&t).unwrap().is_empty());
    }

    #[test]
    fn test_full_allow_sets_are_identity() {
        let t = table();
        let out = Selection::all(&t).unwrap().apply(&t).unwrap();
        assert_eq!(out, t);
    }

    #[test]
    fn test_both_dimensions_must_match() {
        let t = table();
        let out = Selection::new([Category::Chicken], ["Riyadh"]).apply(&t).unwrap();
        let records = out.records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].restaurant, "Al Baik");
        assert_eq!(records[0].city, "Riyadh");
    }

    #[test]
    fn test_idempotent_and_non_mutating() {
        let t = table();
        let before = t.clone();
        let selection = Selection::new([Category::Chicken, Category::Burger], ["Riyadh"]);
        let once = selection.apply(&t).unwrap();
        let twice = selection.apply(&once).unwrap();
        assert_eq!(once, twice);
        assert_eq!(t, before);
    }

    #[test]
    fn test_unknown_city_yields_empty_table() {
        let t = table();
        let out = Selection::new(Category::ALL, ["Dammam"]).apply(&t).unwrap();
        assert!(out.is_empty());
    }
}
