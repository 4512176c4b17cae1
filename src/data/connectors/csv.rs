use crate::error::{QuantfolioError, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use std::path::Path;

use super::{types::PriceTableMetadata, validator::DataValidator};

pub struct CsvConnector;

impl CsvConnector {
    /// Load a CSV price table into a DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| QuantfolioError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Load and validate a price table for the given tickers
    pub fn load_and_validate<P: AsRef<Path>>(
        path: P,
        tickers: &[String],
        min_rows: Option<usize>,
    ) -> Result<DataFrame> {
        let df = Self::load(&path)?;

        DataValidator::validate_tickers(&df, tickers)?;

        // Two rows of prices produce one return observation, which is
        // still below the estimator's floor; default to something usable.
        let min_rows = min_rows.unwrap_or(3);
        DataValidator::validate_minimum_rows(&df, min_rows)?;

        // Warn about nulls but don't fail; gap rows are dropped later
        let null_report = DataValidator::check_nulls(&df)?;
        if !null_report.is_empty() {
            log::warn!("Null values detected: {:?}", null_report);
        }

        Ok(df)
    }

    /// Create metadata for a loaded price table
    pub fn create_metadata<P: AsRef<Path>>(
        path: P,
        df: &DataFrame,
        tickers: &[String],
    ) -> Result<PriceTableMetadata> {
        let datetime_column = Self::detect_datetime_column(df);
        let date_range = match &datetime_column {
            Some(col) => Self::parse_date_range(df, col)?,
            None => None,
        };

        let mut global_min = f64::INFINITY;
        let mut global_max = f64::NEG_INFINITY;
        for ticker in tickers {
            let prices = df.column(ticker)?.cast(&DataType::Float64)?;
            let prices = prices.f64()?;
            if let Some(min) = prices.min() {
                global_min = global_min.min(min);
            }
            if let Some(max) = prices.max() {
                global_max = global_max.max(max);
            }
        }
        let price_range = if global_min.is_finite() {
            (global_min, global_max)
        } else {
            (0.0, 0.0)
        };

        Ok(PriceTableMetadata {
            file_path: path.as_ref().to_string_lossy().to_string(),
            num_rows: df.height(),
            num_columns: df.width(),
            tickers: tickers.to_vec(),
            datetime_column,
            date_range,
            price_range,
        })
    }

    fn detect_datetime_column(df: &DataFrame) -> Option<String> {
        const CANDIDATES: [&str; 4] = ["date", "datetime", "timestamp", "time"];

        for col_name in df.get_column_names() {
            if CANDIDATES.contains(&col_name.to_lowercase().as_str()) {
                return Some(col_name.to_string());
            }
        }
        None
    }

    /// Parse first/last dates from a string date column. Unparseable
    /// values simply leave the range empty.
    fn parse_date_range(df: &DataFrame, col: &str) -> Result<Option<(NaiveDate, NaiveDate)>> {
        let series = df.column(col)?;
        let strings = match series.str() {
            Ok(s) => s,
            Err(_) => return Ok(None),
        };

        let mut first = None;
        let mut last = None;
        for i in 0..strings.len() {
            if let Some(raw) = strings.get(i) {
                if let Some(date) = Self::parse_date(raw) {
                    if first.is_none() {
                        first = Some(date);
                    }
                    last = Some(date);
                }
            }
        }

        Ok(first.zip(last))
    }

    fn parse_date(raw: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y/%m/%d"))
            .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_metadata_date_range_and_price_range() {
        let df = df! {
            "date" => &["2024-01-02", "2024-01-03", "2024-01-04"],
            "AAPL" => &[185.0, 186.2, 184.9],
            "MSFT" => &[370.1, 372.4, 371.0],
        }
        .unwrap();

        let tickers = vec!["AAPL".to_string(), "MSFT".to_string()];
        let meta = CsvConnector::create_metadata("prices.csv", &df, &tickers).unwrap();

        assert_eq!(meta.num_rows, 3);
        assert_eq!(meta.datetime_column.as_deref(), Some("date"));
        let (first, last) = meta.date_range.unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
        assert_eq!(meta.price_range, (184.9, 372.4));
    }

    #[test]
    fn test_metadata_without_date_column() {
        let df = df! {
            "AAPL" => &[185.0, 186.2],
        }
        .unwrap();

        let tickers = vec!["AAPL".to_string()];
        let meta = CsvConnector::create_metadata("prices.csv", &df, &tickers).unwrap();

        assert!(meta.datetime_column.is_none());
        assert!(meta.date_range.is_none());
    }
}
