//! Dashboard Pipeline
//!
//! Explicit filter → aggregate pipeline over a shared, immutable table. The
//! shell owns the selection state and calls [`Dashboard::view`] whenever it
//! changes; every call recomputes all three aggregations from scratch.

use crate::aggregate::{
    aggregate_avg_revenue_by_restaurant, aggregate_revenue_by_category,
    aggregate_revenue_by_restaurant, CategoryRevenue, RestaurantAverage, RestaurantRevenue,
};
use crate::category::Category;
use crate::error::Result;
use crate::filter::Selection;
use crate::table::RestaurantTable;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Values the shell offers as filter choices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub categories: Vec<Category>,
    pub cities: Vec<String>,
}

/// Everything needed to draw the three charts for one selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub selection: Selection,
    pub row_count: usize,
    pub total_revenue: f64,
    pub revenue_by_restaurant: Vec<RestaurantRevenue>,
    pub avg_revenue_by_restaurant: Vec<RestaurantAverage>,
    pub revenue_by_category: Vec<CategoryRevenue>,
}

impl DashboardView {
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}

pub struct Dashboard {
    table: Arc<RestaurantTable>,
}

impl Dashboard {
    pub fn new(table: Arc<RestaurantTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RestaurantTable {
        &self.table
    }

    pub fn options(&self) -> Result<FilterOptions> {
        Ok(FilterOptions {
            categories: self.table.categories()?,
            cities: self.table.cities()?,
        })
    }

    /// Selection with every option ticked
    pub fn default_selection(&self) -> Result<Selection> {
        Selection::all(&self.table)
    }

    pub fn view(&self, selection: &Selection) -> Result<DashboardView> {
        let filtered = selection.apply(&self.table)?;

        let view = DashboardView {
            selection: selection.clone(),
            row_count: filtered.len(),
            total_revenue: filtered.total_revenue()?,
            revenue_by_restaurant: aggregate_revenue_by_restaurant(&filtered)?,
            avg_revenue_by_restaurant: aggregate_avg_revenue_by_restaurant(&filtered)?,
            revenue_by_category: aggregate_revenue_by_category(&filtered)?,
        };

        info!(
            "View computed: {} of {} rows, {} restaurants, total revenue {:.2}",
            view.row_count,
            self.table.len(),
            view.revenue_by_restaurant.len(),
            view.total_revenue
        );
        Ok(view)
    }
}
