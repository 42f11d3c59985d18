//! Dataset Loader
//!
//! Reads the chain dataset from a delimited file, renames the Arabic source
//! headers to canonical column names, normalizes dtypes and attaches the
//! derived `Category` column. Loads are memoized per path by [`TableCache`];
//! a cached table is reused until the file's modification time changes.

use crate::category::classify;
use crate::error::{DashboardError, Result};
use crate::table::{
    RestaurantTable, AVG_REVENUE_PER_BRANCH, BRANCHES, CATEGORY, CITY, GROWTH, RESTAURANT,
    REVENUE,
};
use csv::ReaderBuilder;
use polars::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::SystemTime;
use tracing::{debug, info, warn};

/// Source header → canonical column name
pub const RENAME_TABLE: [(&str, &str); 6] = [
    ("سلسلة", RESTAURANT),
    ("المدينة", CITY),
    ("عدد الفروع", BRANCHES),
    ("الإيرادات (مليون ريال)", REVENUE),
    ("متوسط الإيرادات لكل فرع", AVG_REVENUE_PER_BRANCH),
    ("نسبة النمو (%)", GROWTH),
];

const BOM: char = '\u{feff}';

fn canonical_name(source: &str) -> Option<&'static str> {
    let source = source.trim_start_matches(BOM);
    RENAME_TABLE
        .iter()
        .find(|(label, _)| *label == source)
        .map(|(_, canonical)| *canonical)
}

/// Load, rename, validate and classify. Always reads the file.
pub fn load_table(path: &Path) -> Result<RestaurantTable> {
    if !path.exists() {
        return Err(DashboardError::DataLoad(format!(
            "Data file does not exist: {}",
            path.display()
        )));
    }

    check_headers(path)?;

    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10000))
        .finish()
        .map_err(|e| {
            DashboardError::DataLoad(format!("Failed to scan CSV {}: {}", path.display(), e))
        })?
        .collect()
        .map_err(|e| {
            DashboardError::DataLoad(format!("Failed to read CSV {}: {}", path.display(), e))
        })?;

    let table = transform(df)?;
    info!(
        "Loaded {} rows from {} ({} columns)",
        table.len(),
        path.display(),
        table.column_names().len()
    );
    Ok(table)
}

/// Verify the header row carries every source label before building the frame.
fn check_headers(path: &Path) -> Result<()> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| {
            DashboardError::DataLoad(format!("Failed to open {}: {}", path.display(), e))
        })?;

    let headers = rdr
        .headers()
        .map_err(|e| DashboardError::DataLoad(format!("Failed to read CSV headers: {}", e)))?
        .iter()
        .map(|h| h.trim_start_matches(BOM).to_string())
        .collect::<Vec<_>>();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(DashboardError::DataLoad(format!(
            "Data file has no header row: {}",
            path.display()
        )));
    }

    let missing = RENAME_TABLE
        .iter()
        .filter(|(label, _)| !headers.iter().any(|h| h == label))
        .map(|(label, canonical)| format!("'{}' ({})", label, canonical))
        .collect::<Vec<_>>();

    if !missing.is_empty() {
        return Err(DashboardError::DataLoad(format!(
            "Missing expected columns: {}",
            missing.join(", ")
        )));
    }

    Ok(())
}

/// Turn a raw source frame into a canonical restaurant table.
pub fn transform(mut df: DataFrame) -> Result<RestaurantTable> {
    let renames = df
        .get_column_names()
        .iter()
        .filter_map(|name| canonical_name(name).map(|canonical| (name.to_string(), canonical)))
        .collect::<Vec<_>>();

    for (source, canonical) in &renames {
        df.rename(source, canonical).map_err(|e| {
            DashboardError::DataLoad(format!("Failed to rename '{}': {}", source, e))
        })?;
    }

    for (label, canonical) in RENAME_TABLE {
        if df.column(canonical).is_err() {
            return Err(DashboardError::DataLoad(format!(
                "Missing expected column '{}' ({})",
                label, canonical
            )));
        }
    }

    normalize_column(&mut df, RESTAURANT, DataType::String)?;
    normalize_column(&mut df, CITY, DataType::String)?;
    normalize_column(&mut df, BRANCHES, DataType::Int64)?;
    normalize_column(&mut df, REVENUE, DataType::Float64)?;
    normalize_column(&mut df, AVG_REVENUE_PER_BRANCH, DataType::Float64)?;
    normalize_column(&mut df, GROWTH, DataType::Float64)?;

    reject_negative_i64(&df, BRANCHES)?;
    reject_invalid_f64(&df, REVENUE, true)?;
    reject_invalid_f64(&df, AVG_REVENUE_PER_BRANCH, true)?;
    reject_invalid_f64(&df, GROWTH, false)?;

    if df.column(CATEGORY).is_ok() {
        warn!("Source already has a '{}' column; it will be replaced", CATEGORY);
    }
    let categories = df
        .column(RESTAURANT)?
        .str()?
        .into_iter()
        .map(|name| name.map(|n| classify(n).as_str()))
        .collect::<Vec<_>>();
    df.with_column(Series::new(CATEGORY, categories))?;

    Ok(RestaurantTable::from_frame(df))
}

/// Strict-cast a column and refuse missing values.
fn normalize_column(df: &mut DataFrame, name: &str, dtype: DataType) -> Result<()> {
    let series = df.column(name)?;

    let nulls = series.null_count();
    if nulls > 0 {
        return Err(DashboardError::DataLoad(format!(
            "Column '{}' has {} missing value(s)",
            name, nulls
        )));
    }

    if dtype.is_integer() && series.dtype().is_float() {
        let floats = series.cast(&DataType::Float64)?;
        let fractional = floats
            .f64()?
            .into_iter()
            .position(|v| v.map_or(false, |v| !v.is_finite() || v.fract() != 0.0));
        if let Some(idx) = fractional {
            return Err(DashboardError::DataLoad(format!(
                "Column '{}' has a non-integer value in row {}",
                name, idx
            )));
        }
    }

    if series.dtype() != &dtype {
        debug!("Casting column '{}' from {} to {}", name, series.dtype(), dtype);
        let cast = series.strict_cast(&dtype).map_err(|e| {
            DashboardError::DataLoad(format!(
                "Column '{}' cannot be read as {}: {}",
                name, dtype, e
            ))
        })?;
        df.with_column(cast)?;
    }

    Ok(())
}

fn reject_negative_i64(df: &DataFrame, name: &str) -> Result<()> {
    let negative = df
        .column(name)?
        .i64()?
        .into_iter()
        .position(|v| v.map_or(false, |v| v < 0));
    if let Some(idx) = negative {
        return Err(DashboardError::DataLoad(format!(
            "Column '{}' has a negative value in row {}",
            name, idx
        )));
    }
    Ok(())
}

/// NaN and infinities are never valid; negatives only where `non_negative` is set.
fn reject_invalid_f64(df: &DataFrame, name: &str, non_negative: bool) -> Result<()> {
    for (idx, value) in df.column(name)?.f64()?.into_iter().enumerate() {
        let Some(value) = value else { continue };
        if !value.is_finite() {
            return Err(DashboardError::DataLoad(format!(
                "Column '{}' has a non-finite value ({}) in row {}",
                name, value, idx
            )));
        }
        if non_negative && value < 0.0 {
            return Err(DashboardError::DataLoad(format!(
                "Column '{}' has a negative value in row {}",
                name, idx
            )));
        }
    }
    Ok(())
}

struct CacheEntry {
    modified: Option<SystemTime>,
    table: Arc<RestaurantTable>,
}

/// Loaded tables keyed by canonical path
#[derive(Default)]
pub struct TableCache {
    entries: RwLock<HashMap<PathBuf, CacheEntry>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `path`, reading the file only when it is
    /// not cached yet or has been modified since it was cached.
    pub fn load(&self, path: &Path) -> Result<Arc<RestaurantTable>> {
        let key = path.canonicalize().map_err(|e| {
            DashboardError::DataLoad(format!("Cannot access {}: {}", path.display(), e))
        })?;
        let modified = std::fs::metadata(&key).and_then(|m| m.modified()).ok();

        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = entries.get(&key) {
                if entry.modified.is_some() && entry.modified == modified {
                    debug!("Cache hit for {}", key.display());
                    return Ok(Arc::clone(&entry.table));
                }
            }
        }

        debug!("Cache miss for {}", key.display());
        let table = Arc::new(load_table(&key)?);

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key,
            CacheEntry {
                modified,
                table: Arc::clone(&table),
            },
        );
        Ok(table)
    }

    pub fn invalidate(&self, path: &Path) {
        if let Ok(key) = path.canonicalize() {
            self.entries
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&key);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;

    fn source_frame() -> DataFrame {
        df! [
            "سلسلة" => ["Herfy", "Al Baik"],
            "المدينة" => ["Riyadh", "Jeddah"],
            "عدد الفروع" => [500i64, 400],
            "الإيرادات (مليون ريال)" => [120i64, 300],
            "متوسط الإيرادات لكل فرع" => [0.24, 0.75],
            "نسبة النمو (%)" => [5i64, 8],
            "Notes" => ["flagship", "regional"]
        ]
        .unwrap()
    }

    #[test]
    fn test_transform_renames_and_classifies() {
        let table = transform(source_frame()).unwrap();
        let names = table.column_names();
        let expected = [
            RESTAURANT,
            CITY,
            BRANCHES,
            REVENUE,
            AVG_REVENUE_PER_BRANCH,
            GROWTH,
            CATEGORY,
        ];
        for canonical in expected {
            assert!(names.iter().any(|n| n == canonical), "missing {}", canonical);
        }
        assert!(names.iter().any(|n| n == "Notes"));

        let records = table.records().unwrap();
        assert_eq!(records[0].category, Category::Both);
        assert_eq!(records[1].category, Category::Chicken);
        assert_eq!(records[1].revenue, 300.0);
        assert_eq!(records[0].growth, 5.0);
    }

    #[test]
    fn test_transform_rejects_missing_column() {
        let df = source_frame().drop("المدينة").unwrap();
        let err = transform(df).unwrap_err();
        assert!(err.is_data_load());
        assert!(err.to_string().contains(CITY));
    }

    #[test]
    fn test_transform_rejects_non_numeric_revenue() {
        let df = source_frame()
            .with_column(Series::new("الإيرادات (مليون ريال)", ["120", "n/a"]))
            .unwrap()
            .clone();
        assert!(transform(df).unwrap_err().is_data_load());
    }

    #[test]
    fn test_transform_rejects_negative_branches() {
        let df = source_frame()
            .with_column(Series::new("عدد الفروع", [500i64, -1]))
            .unwrap()
            .clone();
        assert!(transform(df).unwrap_err().is_data_load());
    }

    #[test]
    fn test_transform_rejects_non_finite_revenue() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let df = source_frame()
                .with_column(Series::new("الإيرادات (مليون ريال)", [120.0, bad]))
                .unwrap()
                .clone();
            let err = transform(df).unwrap_err();
            assert!(err.is_data_load(), "{}", bad);
            assert!(err.to_string().contains(REVENUE));
        }
    }

    #[test]
    fn test_transform_rejects_non_finite_average_and_growth() {
        let df = source_frame()
            .with_column(Series::new("متوسط الإيرادات لكل فرع", [0.24, f64::NAN]))
            .unwrap()
            .clone();
        assert!(transform(df).unwrap_err().to_string().contains(AVG_REVENUE_PER_BRANCH));

        let df = source_frame()
            .with_column(Series::new("نسبة النمو (%)", [f64::INFINITY, 8.0]))
            .unwrap()
            .clone();
        assert!(transform(df).unwrap_err().to_string().contains(GROWTH));
    }

    #[test]
    fn test_transform_allows_negative_growth() {
        let df = source_frame()
            .with_column(Series::new("نسبة النمو (%)", [-3.5, 8.0]))
            .unwrap()
            .clone();
        assert_eq!(transform(df).unwrap().records().unwrap()[0].growth, -3.5);
    }

    #[test]
    fn test_transform_rejects_fractional_branches() {
        let df = source_frame()
            .with_column(Series::new("عدد الفروع", [500.7, 400.0]))
            .unwrap()
            .clone();
        let err = transform(df).unwrap_err();
        assert!(err.is_data_load());
        assert!(err.to_string().contains(BRANCHES));
    }

    #[test]
    fn test_transform_accepts_whole_float_branches() {
        let df = source_frame()
            .with_column(Series::new("عدد الفروع", [500.0, 400.0]))
            .unwrap()
            .clone();
        let records = transform(df).unwrap().records().unwrap();
        assert_eq!(records[0].branches, 500);
        assert_eq!(records[1].branches, 400);
    }

    #[test]
    fn test_canonical_name_ignores_bom() {
        assert_eq!(canonical_name("\u{feff}سلسلة"), Some(RESTAURANT));
        assert_eq!(canonical_name("Restaurant"), None);
    }
}
