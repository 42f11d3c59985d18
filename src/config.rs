//! Runtime configuration: defaults, then `.env` / process environment.
//! Command-line flags are applied on top by the binary.

use crate::error::{DashboardError, Result};
use std::path::PathBuf;

pub const DATA_PATH_VAR: &str = "DASHBOARD_DATA_PATH";
pub const BAR_WIDTH_VAR: &str = "DASHBOARD_BAR_WIDTH";

pub const DEFAULT_DATA_PATH: &str = "data/arab_burger_data.csv";
pub const DEFAULT_BAR_WIDTH: usize = 40;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    /// Longest bar drawn by the text renderer
    pub bar_width: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }
}

impl DashboardConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; unset variables keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(DATA_PATH_VAR).filter(|p| !p.trim().is_empty()) {
            config.data_path = PathBuf::from(path.trim());
        }

        if let Some(width) = lookup(BAR_WIDTH_VAR) {
            config.bar_width = width
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|w| *w > 0)
                .ok_or_else(|| {
                    DashboardError::Config(format!(
                        "{} must be a positive integer, got '{}'",
                        BAR_WIDTH_VAR, width
                    ))
                })?;
        }

        Ok(config)
    }
}
