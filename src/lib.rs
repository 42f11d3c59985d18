pub mod aggregate;
pub mod category;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod loader;
pub mod render;
pub mod table;

pub use aggregate::{
    aggregate_avg_revenue_by_restaurant, aggregate_revenue_by_category,
    aggregate_revenue_by_restaurant, CategoryRevenue, RestaurantAverage, RestaurantRevenue,
};
pub use category::{classify, Category};
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, DashboardView, FilterOptions};
pub use error::{DashboardError, Result};
pub use filter::{filter, Selection};
pub use loader::{load_table, TableCache};
pub use table::{Record, RestaurantTable};
