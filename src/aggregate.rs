//! Chart Aggregations
//!
//! Three independent reductions over a (filtered) restaurant table:
//! revenue per restaurant, mean stored per-branch revenue per restaurant, and
//! revenue per category. A restaurant present in several cities is grouped
//! into a single row. Empty input yields zero groups.

use crate::category::Category;
use crate::error::{DashboardError, Result};
use crate::table::{RestaurantTable, AVG_REVENUE_PER_BRANCH, CATEGORY, RESTAURANT, REVENUE};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantRevenue {
    pub restaurant: String,
    /// Million SAR
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantAverage {
    pub restaurant: String,
    /// Million SAR per branch
    pub avg_revenue_per_branch: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRevenue {
    pub category: Category,
    /// Million SAR
    pub revenue: f64,
}

#[derive(Debug, Clone, Copy)]
enum Reduction {
    Sum,
    Mean,
}

/// Group `df` by `key`, reduce `value`, and sort ascending by the reduced
/// value (ties broken by key).
fn reduce_by(
    df: &DataFrame,
    key: &str,
    value: &str,
    reduction: Reduction,
) -> Result<Vec<(String, f64)>> {
    let agg = match reduction {
        Reduction::Sum => col(value).sum(),
        Reduction::Mean => col(value).mean(),
    };

    let grouped = df
        .clone()
        .lazy()
        .group_by([col(key)])
        .agg([agg.alias(value)])
        .sort_by_exprs([col(value), col(key)], SortMultipleOptions::default())
        .collect()?;

    debug!(
        "Reduced {} rows to {} groups ({:?} of '{}' by '{}')",
        df.height(),
        grouped.height(),
        reduction,
        value,
        key
    );

    let keys = grouped.column(key)?.str()?;
    let values = grouped.column(value)?.f64()?;
    keys.into_iter()
        .zip(values.into_iter())
        .map(|pair| match pair {
            (Some(k), Some(v)) => Ok((k.to_string(), v)),
            (k, _) => Err(DashboardError::Polars(format!(
                "Null {} for group {:?}",
                value, k
            ))),
        })
        .collect()
}

/// Total revenue per restaurant, ascending by revenue.
pub fn aggregate_revenue_by_restaurant(
    table: &RestaurantTable,
) -> Result<Vec<RestaurantRevenue>> {
    Ok(reduce_by(table.frame(), RESTAURANT, REVENUE, Reduction::Sum)?
        .into_iter()
        .map(|(restaurant, revenue)| RestaurantRevenue { restaurant, revenue })
        .collect())
}

/// Mean of the stored per-branch revenue per restaurant, ascending.
pub fn aggregate_avg_revenue_by_restaurant(
    table: &RestaurantTable,
) -> Result<Vec<RestaurantAverage>> {
    Ok(reduce_by(table.frame(), RESTAURANT, AVG_REVENUE_PER_BRANCH, Reduction::Mean)?
        .into_iter()
        .map(|(restaurant, avg_revenue_per_branch)| RestaurantAverage {
            restaurant,
            avg_revenue_per_branch,
        })
        .collect())
}

/// Total revenue per category, in category declaration order.
pub fn aggregate_revenue_by_category(table: &RestaurantTable) -> Result<Vec<CategoryRevenue>> {
    let mut rows = reduce_by(table.frame(), CATEGORY, REVENUE, Reduction::Sum)?
        .into_iter()
        .map(|(category, revenue)| {
            Ok(CategoryRevenue {
                category: category.parse().map_err(DashboardError::Polars)?,
                revenue,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    rows.sort_by_key(|r| r.category);
    Ok(rows)
}
