use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Metadata about a loaded price table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTableMetadata {
    pub file_path: String,
    pub num_rows: usize,
    pub num_columns: usize,
    pub tickers: Vec<String>,
    pub datetime_column: Option<String>,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub price_range: (f64, f64), // (min, max) across all ticker columns
}
