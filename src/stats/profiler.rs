//! Dataset Profiler Module
//! Read-only data quality pass over the loaded frame.

use crate::stats::calculator::{DescriptiveStats, StatsCalculator};
use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnType {
    pub column: String,
    pub dtype: String,
}

/// `describe()`-style summary of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    #[serde(flatten)]
    pub stats: DescriptiveStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingEntry {
    pub column: String,
    pub count: usize,
    pub percentage: f64,
}

/// Distinct values of a text column in order of first appearance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniqueValues {
    pub column: String,
    pub values: Vec<Option<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetProfile {
    pub rows: usize,
    pub columns: usize,
    pub dtypes: Vec<ColumnType>,
    #[serde(skip)]
    pub head: DataFrame,
    pub summary: Vec<ColumnSummary>,
    /// Only columns with at least one missing value.
    pub missing: Vec<MissingEntry>,
    pub duplicate_rows: usize,
    pub unique_values: Vec<UniqueValues>,
}

/// Builds a [`DatasetProfile`] from a frame.
pub struct DataProfiler;

impl DataProfiler {
    pub fn profile(df: &DataFrame, head_rows: usize) -> Result<DatasetProfile, ProfileError> {
        let dtypes = df
            .get_columns()
            .iter()
            .map(|col| ColumnType {
                column: col.name().to_string(),
                dtype: col.dtype().to_string(),
            })
            .collect();

        let mut summary = Vec::new();
        for col in df.get_columns().iter().filter(|c| is_numeric_dtype(c.dtype())) {
            let cast = col.cast(&DataType::Float64)?;
            let values: Vec<f64> = cast.f64()?.into_iter().flatten().collect();
            summary.push(ColumnSummary {
                column: col.name().to_string(),
                stats: StatsCalculator::compute_descriptive_stats(&values),
            });
        }

        let profile = DatasetProfile {
            rows: df.height(),
            columns: df.width(),
            dtypes,
            head: df.head(Some(head_rows)),
            summary,
            missing: Self::missing_values(df),
            duplicate_rows: Self::count_duplicate_rows(df)?,
            unique_values: Self::text_unique_values(df)?,
        };
        debug!(
            "Profiled {} rows, {} columns with missing values, {} duplicates",
            profile.rows,
            profile.missing.len(),
            profile.duplicate_rows
        );
        Ok(profile)
    }

    /// Missing count and percentage per column, skipping complete columns.
    pub fn missing_values(df: &DataFrame) -> Vec<MissingEntry> {
        let rows = df.height();
        df.get_columns()
            .iter()
            .filter(|col| col.null_count() > 0)
            .map(|col| {
                let count = col.null_count();
                MissingEntry {
                    column: col.name().to_string(),
                    count,
                    percentage: if rows == 0 {
                        0.0
                    } else {
                        count as f64 / rows as f64 * 100.0
                    },
                }
            })
            .collect()
    }

    /// Rows identical to an earlier row; the first occurrence is not counted.
    pub fn count_duplicate_rows(df: &DataFrame) -> Result<usize, ProfileError> {
        if df.width() == 0 {
            return Ok(0);
        }
        let distinct = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
        Ok(df.height() - distinct.height())
    }

    /// Unique values of every string column, nulls included.
    pub fn text_unique_values(df: &DataFrame) -> Result<Vec<UniqueValues>, ProfileError> {
        let mut result = Vec::new();
        for col in df
            .get_columns()
            .iter()
            .filter(|c| matches!(c.dtype(), DataType::String))
        {
            let unique = col.unique_stable()?;
            let values = unique
                .str()?
                .into_iter()
                .map(|v| v.map(str::to_string))
                .collect();
            result.push(UniqueValues {
                column: col.name().to_string(),
                values,
            });
        }
        Ok(result)
    }
}

fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> DataFrame {
        df!(
            "survived" => &[0i64, 1, 1, 0, 0],
            "sex" => &["male", "female", "female", "male", "male"],
            "age" => &[Some(22.0), Some(38.0), None, Some(35.0), Some(35.0)],
            "embarked" => &[Some("S"), Some("C"), Some("S"), None, None]
        )
        .unwrap()
    }

    #[test]
    fn test_profile_shape_and_dtypes() {
        let profile = DataProfiler::profile(&sample(), 3).unwrap();

        assert_eq!(profile.rows, 5);
        assert_eq!(profile.columns, 4);
        assert_eq!(profile.head.height(), 3);
        assert_eq!(profile.dtypes[1].column, "sex");
        assert_eq!(profile.dtypes[1].dtype, DataType::String.to_string());
    }

    #[test]
    fn test_summary_covers_numeric_columns_only() {
        let profile = DataProfiler::profile(&sample(), 5).unwrap();
        let columns: Vec<&str> = profile.summary.iter().map(|s| s.column.as_str()).collect();

        assert_eq!(columns, vec!["survived", "age"]);
        let age = &profile.summary[1].stats;
        assert_eq!(age.count, 4);
        assert_eq!(age.mean, 32.5);
        assert_eq!(age.max, 38.0);
    }

    #[test]
    fn test_missing_values_filters_complete_columns() {
        let missing = DataProfiler::missing_values(&sample());

        assert_eq!(
            missing,
            vec![
                MissingEntry {
                    column: "age".to_string(),
                    count: 1,
                    percentage: 20.0,
                },
                MissingEntry {
                    column: "embarked".to_string(),
                    count: 2,
                    percentage: 40.0,
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_rows_counts_repeats_only() {
        // rows 3 and 4 are identical
        assert_eq!(DataProfiler::count_duplicate_rows(&sample()).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_rows_with_nulls() {
        let df = df!(
            "age" => &[None, Some(4.0), None, None],
            "cabin" => &[None, Some("G6"), None, Some("B28")]
        )
        .unwrap();
        // row 2 repeats row 0, nulls compare equal
        assert_eq!(DataProfiler::count_duplicate_rows(&df).unwrap(), 1);
        assert_eq!(DataProfiler::count_duplicate_rows(&DataFrame::empty()).unwrap(), 0);
    }

    #[test]
    fn test_unique_values_in_order_of_appearance() {
        let unique = DataProfiler::text_unique_values(&sample()).unwrap();

        assert_eq!(unique.len(), 2);
        assert_eq!(
            unique[1].values,
            vec![Some("S".to_string()), Some("C".to_string()), None]
        );
    }
}
