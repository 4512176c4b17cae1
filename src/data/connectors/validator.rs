use crate::error::{QuantfolioError, Result};
use polars::prelude::*;

pub struct DataValidator;

impl DataValidator {
    /// Validate that the DataFrame carries a numeric price column for
    /// every requested ticker
    pub fn validate_tickers(df: &DataFrame, tickers: &[String]) -> Result<()> {
        let columns = df.get_column_names();

        for ticker in tickers {
            if !columns.iter().any(|col| col.as_str() == ticker.as_str()) {
                return Err(QuantfolioError::DataLoading(format!(
                    "Missing price column for ticker '{}'",
                    ticker
                )));
            }

            let series = df.column(ticker)?;
            if !matches!(
                series.dtype(),
                DataType::Float64
                    | DataType::Float32
                    | DataType::Int64
                    | DataType::Int32
                    | DataType::UInt64
                    | DataType::UInt32
            ) {
                return Err(QuantfolioError::DataLoading(format!(
                    "Column '{}' must be numeric, found {:?}",
                    ticker,
                    series.dtype()
                )));
            }
        }

        Self::validate_positive_prices(df, tickers)?;

        Ok(())
    }

    /// Non-positive prices make fractional changes meaningless
    fn validate_positive_prices(df: &DataFrame, tickers: &[String]) -> Result<()> {
        for ticker in tickers {
            let prices = df.column(ticker)?.cast(&DataType::Float64)?;
            let prices = prices.f64()?;

            for i in 0..df.height() {
                if let Some(p) = prices.get(i) {
                    if p <= 0.0 {
                        return Err(QuantfolioError::DataLoading(format!(
                            "Invalid price at row {} for '{}': {}",
                            i, ticker, p
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Check for minimum required rows
    pub fn validate_minimum_rows(df: &DataFrame, min_rows: usize) -> Result<()> {
        if df.height() < min_rows {
            return Err(QuantfolioError::DataLoading(format!(
                "Insufficient data: {} rows, minimum {} required",
                df.height(),
                min_rows
            )));
        }
        Ok(())
    }

    /// Check for null values across the table
    pub fn check_nulls(df: &DataFrame) -> Result<Vec<(String, usize)>> {
        let mut null_report = Vec::new();

        for col_name in df.get_column_names() {
            let series = df.column(col_name)?;
            let null_count = series.null_count();
            if null_count > 0 {
                null_report.push((col_name.to_string(), null_count));
            }
        }

        Ok(null_report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_validate_good_data() {
        let df = df! {
            "date" => &["2024-01-02", "2024-01-03", "2024-01-04"],
            "AAPL" => &[185.0, 186.2, 184.9],
            "MSFT" => &[370.1, 372.4, 371.0],
        }
        .unwrap();

        let tickers = vec!["AAPL".to_string(), "MSFT".to_string()];
        assert!(DataValidator::validate_tickers(&df, &tickers).is_ok());
    }

    #[test]
    fn test_validate_missing_ticker() {
        let df = df! {
            "AAPL" => &[185.0, 186.2],
        }
        .unwrap();

        let tickers = vec!["AAPL".to_string(), "MSFT".to_string()];
        assert!(DataValidator::validate_tickers(&df, &tickers).is_err());
    }

    #[test]
    fn test_validate_non_numeric_ticker() {
        let df = df! {
            "AAPL" => &["a", "b"],
        }
        .unwrap();

        let tickers = vec!["AAPL".to_string()];
        assert!(DataValidator::validate_tickers(&df, &tickers).is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_price() {
        let df = df! {
            "AAPL" => &[185.0, 0.0, 186.0],
        }
        .unwrap();

        let tickers = vec!["AAPL".to_string()];
        assert!(DataValidator::validate_tickers(&df, &tickers).is_err());
    }

    #[test]
    fn test_minimum_rows() {
        let df = df! {
            "AAPL" => &[185.0, 186.2],
        }
        .unwrap();

        assert!(DataValidator::validate_minimum_rows(&df, 2).is_ok());
        assert!(DataValidator::validate_minimum_rows(&df, 3).is_err());
    }

    #[test]
    fn test_null_report() {
        let df = df! {
            "AAPL" => &[Some(185.0), None, Some(186.0)],
        }
        .unwrap();

        let report = DataValidator::check_nulls(&df).unwrap();
        assert_eq!(report, vec![("AAPL".to_string(), 1)]);
    }
}
