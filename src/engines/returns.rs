use crate::config::DataConfig;
use crate::error::{QuantfolioError, Result};
use crate::types::ReturnsStatistics;
use polars::prelude::*;

/// Estimates annualized expected returns and covariance from a price
/// table. Deterministic: identical input produces bit-identical output.
pub struct ReturnsModel {
    periods_per_year: usize,
    min_observations: usize,
}

impl ReturnsModel {
    pub fn new(config: &DataConfig) -> Self {
        Self {
            periods_per_year: config.periods_per_year,
            min_observations: config.min_observations,
        }
    }

    /// Estimate statistics over the given ticker columns.
    ///
    /// A return row is usable only when every ticker has a finite
    /// fractional change for that period; rows touched by gaps are
    /// dropped wholesale so the covariance stays aligned.
    pub fn estimate(&self, prices: &DataFrame, tickers: &[String]) -> Result<ReturnsStatistics> {
        if tickers.is_empty() {
            return Err(QuantfolioError::InvalidInput(
                "At least one ticker is required".to_string(),
            ));
        }

        let columns = self.extract_columns(prices, tickers)?;
        let returns = Self::fractional_changes(&columns);

        if returns.len() < self.min_observations {
            return Err(QuantfolioError::InsufficientData(format!(
                "{} usable return observations, need at least {}",
                returns.len(),
                self.min_observations
            )));
        }

        let n = tickers.len();
        let m = returns.len();
        let factor = self.periods_per_year as f64;

        let mut means = vec![0.0; n];
        for row in &returns {
            for (i, r) in row.iter().enumerate() {
                means[i] += r;
            }
        }
        for mean in means.iter_mut() {
            *mean /= m as f64;
        }

        // Sample covariance (ddof = 1), computed once per unordered pair
        // so the matrix is symmetric by construction.
        let mut covariance = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in i..n {
                let mut acc = 0.0;
                for row in &returns {
                    acc += (row[i] - means[i]) * (row[j] - means[j]);
                }
                let cov = acc / (m - 1) as f64 * factor;
                covariance[i][j] = cov;
                covariance[j][i] = cov;
            }
        }

        let expected_returns = means.iter().map(|mean| mean * factor).collect();

        let stats = ReturnsStatistics {
            expected_returns,
            covariance,
        };
        stats.validate()?;

        log::debug!(
            "Estimated returns for {} assets over {} observations",
            n,
            m
        );

        Ok(stats)
    }

    fn extract_columns(&self, prices: &DataFrame, tickers: &[String]) -> Result<Vec<Vec<Option<f64>>>> {
        let mut columns = Vec::with_capacity(tickers.len());

        for ticker in tickers {
            let series = prices
                .column(ticker)
                .map_err(|_| {
                    QuantfolioError::DataLoading(format!(
                        "Missing price column for ticker '{}'",
                        ticker
                    ))
                })?
                .cast(&DataType::Float64)?;
            let values = series.f64()?;

            let mut column = Vec::with_capacity(prices.height());
            for i in 0..prices.height() {
                column.push(values.get(i));
            }
            columns.push(column);
        }

        Ok(columns)
    }

    /// Per-period fractional change rows; the first (undefined) row is
    /// never produced.
    fn fractional_changes(columns: &[Vec<Option<f64>>]) -> Vec<Vec<f64>> {
        let rows = columns.first().map(|c| c.len()).unwrap_or(0);
        let mut result = Vec::new();

        for t in 1..rows {
            let mut row = Vec::with_capacity(columns.len());
            let mut usable = true;

            for column in columns {
                match (column[t - 1], column[t]) {
                    (Some(prev), Some(cur)) if prev != 0.0 => {
                        let change = cur / prev - 1.0;
                        if change.is_finite() {
                            row.push(change);
                        } else {
                            usable = false;
                            break;
                        }
                    }
                    _ => {
                        usable = false;
                        break;
                    }
                }
            }

            if usable {
                result.push(row);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn model() -> ReturnsModel {
        ReturnsModel::new(&DataConfig {
            periods_per_year: 252,
            min_observations: 2,
        })
    }

    #[test]
    fn test_known_statistics() {
        let df = df! {
            "A" => &[100.0, 110.0, 99.0],
            "B" => &[50.0, 55.0, 49.5],
        }
        .unwrap();
        let tickers = vec!["A".to_string(), "B".to_string()];

        let stats = model().estimate(&df, &tickers).unwrap();

        // Both series move identically: +10%, -10%
        let daily_mean = (0.1 + (-0.1)) / 2.0;
        assert!((stats.expected_returns[0] - daily_mean * 252.0).abs() < 1e-12);
        assert!((stats.expected_returns[0] - stats.expected_returns[1]).abs() < 1e-12);

        // Sample variance of [0.1, -0.1] with ddof 1 is 0.02
        assert!((stats.covariance[0][0] - 0.02 * 252.0).abs() < 1e-12);
        assert_eq!(stats.covariance[0][1], stats.covariance[1][0]);
    }

    #[test]
    fn test_idempotent() {
        let df = df! {
            "A" => &[100.0, 103.0, 101.5, 104.0],
            "B" => &[20.0, 19.5, 21.0, 20.5],
        }
        .unwrap();
        let tickers = vec!["A".to_string(), "B".to_string()];

        let first = model().estimate(&df, &tickers).unwrap();
        let second = model().estimate(&df, &tickers).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_gap_rows_dropped() {
        let df = df! {
            "A" => &[Some(100.0), None, Some(102.0), Some(103.0), Some(104.0)],
            "B" => &[Some(50.0), Some(51.0), Some(52.0), Some(53.0), Some(54.0)],
        }
        .unwrap();
        let tickers = vec!["A".to_string(), "B".to_string()];

        // Rows 1 and 2 are unusable for A (gap on either side); rows 3
        // and 4 survive.
        let stats = model().estimate(&df, &tickers).unwrap();
        assert_eq!(stats.num_assets(), 2);
    }

    #[test]
    fn test_insufficient_data() {
        let df = df! {
            "A" => &[100.0, 101.0],
        }
        .unwrap();
        let tickers = vec!["A".to_string()];

        let result = model().estimate(&df, &tickers);
        assert!(matches!(
            result,
            Err(QuantfolioError::InsufficientData(_))
        ));
    }
}
