//! Restaurant Table
//!
//! Immutable, validated view over the loaded frame. Every table handed out by
//! the loader or the filter carries the canonical columns with fixed dtypes:
//! strings for `Restaurant`, `City` and `Category`, `Int64` for `Branches`,
//! `Float64` for the three measures.

use crate::category::Category;
use crate::error::{DashboardError, Result};
use itertools::{izip, Itertools};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

pub const RESTAURANT: &str = "Restaurant";
pub const CITY: &str = "City";
pub const BRANCHES: &str = "Branches";
pub const REVENUE: &str = "Revenue";
pub const AVG_REVENUE_PER_BRANCH: &str = "Avg_Revenue_per_Branch";
pub const GROWTH: &str = "Growth";
pub const CATEGORY: &str = "Category";

/// One chain's observed metrics in one city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub restaurant: String,
    pub city: String,
    pub branches: i64,
    /// Million SAR
    pub revenue: f64,
    /// Stored as given by the source, not derived from revenue / branches
    pub avg_revenue_per_branch: f64,
    /// Percent
    pub growth: f64,
    pub category: Category,
}

#[derive(Debug, Clone)]
pub struct RestaurantTable {
    df: DataFrame,
}

impl RestaurantTable {
    /// Wrap a frame that already has the canonical columns and dtypes.
    pub(crate) fn from_frame(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df.get_column_names().iter().map(|s| s.to_string()).collect()
    }

    /// Distinct cities in order of first appearance
    pub fn cities(&self) -> Result<Vec<String>> {
        Ok(self
            .df
            .column(CITY)?
            .str()?
            .into_iter()
            .flatten()
            .unique()
            .map(String::from)
            .collect())
    }

    /// Distinct categories in order of first appearance
    pub fn categories(&self) -> Result<Vec<Category>> {
        self.df
            .column(CATEGORY)?
            .str()?
            .into_iter()
            .flatten()
            .unique()
            .map(|s| s.parse::<Category>().map_err(DashboardError::Polars))
            .collect()
    }

    pub fn total_revenue(&self) -> Result<f64> {
        Ok(self.df.column(REVENUE)?.f64()?.sum().unwrap_or(0.0))
    }

    /// Typed rows. Extra pass-through columns are not part of `Record`.
    pub fn records(&self) -> Result<Vec<Record>> {
        let restaurants = self.df.column(RESTAURANT)?.str()?;
        let cities = self.df.column(CITY)?.str()?;
        let branches = self.df.column(BRANCHES)?.i64()?;
        let revenues = self.df.column(REVENUE)?.f64()?;
        let averages = self.df.column(AVG_REVENUE_PER_BRANCH)?.f64()?;
        let growths = self.df.column(GROWTH)?.f64()?;
        let categories = self.df.column(CATEGORY)?.str()?;

        izip!(
            restaurants.into_iter(),
            cities.into_iter(),
            branches.into_iter(),
            revenues.into_iter(),
            averages.into_iter(),
            growths.into_iter(),
            categories.into_iter()
        )
        .enumerate()
        .map(|(idx, row)| match row {
            (
                Some(restaurant),
                Some(city),
                Some(branches),
                Some(revenue),
                Some(avg_revenue_per_branch),
                Some(growth),
                Some(category),
            ) => Ok(Record {
                restaurant: restaurant.to_string(),
                city: city.to_string(),
                branches,
                revenue,
                avg_revenue_per_branch,
                growth,
                category: category.parse().map_err(DashboardError::Polars)?,
            }),
            _ => Err(DashboardError::Polars(format!("Null value in row {}", idx))),
        })
        .collect()
    }
}

impl PartialEq for RestaurantTable {
    fn eq(&self, other: &Self) -> bool {
        self.df.equals(&other.df)
    }
}
