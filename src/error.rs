use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// The source file is missing, unreadable or malformed. Fatal to the session.
    #[error("Data load error: {0}")]
    DataLoad(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Frame operation failed after a successful load.
    #[error("Polars error: {0}")]
    Polars(String),
}

impl From<polars::error::PolarsError> for DashboardError {
    fn from(err: polars::error::PolarsError) -> Self {
        DashboardError::Polars(err.to_string())
    }
}

impl DashboardError {
    pub fn is_data_load(&self) -> bool {
        matches!(self, DashboardError::DataLoad(_))
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
