//! Statistics Calculator Module
//! Handles statistical computations including descriptive stats and
//! chi-square tests of independence.

use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Significance threshold for the chi-square test
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

impl Default for DescriptiveStats {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            p25: f64::NAN,
            median: f64::NAN,
            p75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Result of a chi-square test of independence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChiSquareTest {
    pub statistic: f64,
    pub dof: usize,
    pub p_value: f64,
    pub is_significant: bool,
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> DescriptiveStats {
        let n = values.len();
        if n == 0 {
            return DescriptiveStats::default();
        }

        let sorted = Self::sorted(values);

        let mean = values.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            f64::NAN
        };

        DescriptiveStats {
            count: n,
            mean,
            std: variance.sqrt(),
            min: sorted[0],
            p25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            p75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Median of unsorted values, `None` when empty.
    pub fn median(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(Self::percentile(&Self::sorted(values), 50.0))
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Pearson chi-square test on a contingency table of observed counts.
    ///
    /// Returns `None` when the table has fewer than two non-empty rows or
    /// columns, since the test is undefined there.
    pub fn chi_square_test(observed: &[Vec<usize>]) -> Option<ChiSquareTest> {
        let row_totals: Vec<f64> = observed
            .iter()
            .map(|row| row.iter().sum::<usize>() as f64)
            .filter(|&t| t > 0.0)
            .collect();
        let n_cols = observed.iter().map(Vec::len).max().unwrap_or(0);
        let col_totals: Vec<f64> = (0..n_cols)
            .map(|j| {
                observed
                    .iter()
                    .map(|row| row.get(j).copied().unwrap_or(0))
                    .sum::<usize>() as f64
            })
            .collect();
        let non_empty_cols = col_totals.iter().filter(|&&t| t > 0.0).count();

        if row_totals.len() < 2 || non_empty_cols < 2 {
            return None;
        }

        let total: f64 = row_totals.iter().sum();
        let mut statistic = 0.0;
        for row in observed {
            let row_total = row.iter().sum::<usize>() as f64;
            if row_total == 0.0 {
                continue;
            }
            for (j, &col_total) in col_totals.iter().enumerate() {
                if col_total == 0.0 {
                    continue;
                }
                let expected = row_total * col_total / total;
                let obs = row.get(j).copied().unwrap_or(0) as f64;
                statistic += (obs - expected).powi(2) / expected;
            }
        }

        let dof = (row_totals.len() - 1) * (non_empty_cols - 1);
        let dist = ChiSquared::new(dof as f64).ok()?;
        let p_value = 1.0 - dist.cdf(statistic);

        Some(ChiSquareTest {
            statistic,
            dof,
            p_value,
            is_significant: p_value <= SIGNIFICANCE_THRESHOLD,
        })
    }

    fn sorted(values: &[f64]) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptive_stats_basic() {
        let stats = StatsCalculator::compute_descriptive_stats(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(stats.count, 5);
        assert_eq!(stats.mean, 3.0);
        // sample std: sqrt(10 / 4)
        assert!((stats.std - 1.5811).abs() < 1e-4);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.p25, 2.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.p75, 4.0);
        assert_eq!(stats.max, 5.0);
    }

    #[test]
    fn test_descriptive_stats_empty() {
        let stats = StatsCalculator::compute_descriptive_stats(&[]);
        assert_eq!(stats.count, 0);
        assert!(stats.mean.is_nan());
    }

    #[test]
    fn test_single_value_has_undefined_std() {
        let stats = StatsCalculator::compute_descriptive_stats(&[7.0]);
        assert_eq!(stats.median, 7.0);
        assert!(stats.std.is_nan());
    }

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(StatsCalculator::percentile(&sorted, 50.0), 25.0);
        assert_eq!(StatsCalculator::percentile(&sorted, 25.0), 17.5);
        assert_eq!(StatsCalculator::percentile(&sorted, 100.0), 40.0);
    }

    #[test]
    fn test_median_unsorted() {
        assert_eq!(StatsCalculator::median(&[35.0, 22.0, 54.0, 2.0]), Some(28.5));
        assert_eq!(StatsCalculator::median(&[]), None);
    }

    #[test]
    fn test_chi_square_strong_association() {
        // rows: female, male; columns: died, survived
        let observed = vec![vec![81, 233], vec![468, 109]];
        let test = StatsCalculator::chi_square_test(&observed).unwrap();

        assert_eq!(test.dof, 1);
        assert!(test.statistic > 200.0);
        assert!(test.p_value < 1e-10);
        assert!(test.is_significant);
    }

    #[test]
    fn test_chi_square_independent() {
        let observed = vec![vec![50, 50], vec![50, 50]];
        let test = StatsCalculator::chi_square_test(&observed).unwrap();

        assert_eq!(test.statistic, 0.0);
        assert!((test.p_value - 1.0).abs() < 1e-9);
        assert!(!test.is_significant);
    }

    #[test]
    fn test_chi_square_degenerate_table() {
        assert!(StatsCalculator::chi_square_test(&[vec![10, 5]]).is_none());
        assert!(StatsCalculator::chi_square_test(&[vec![10, 0], vec![4, 0]]).is_none());
    }
}
