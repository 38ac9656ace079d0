//! Data Cleaning Module
//! Imputes missing values and derives bucketed features.
//!
//! Every step takes the table by value and returns the new table, so each
//! stage can be run and tested on its own.

use crate::data::schema::{Nullable, PassengerTable, Pclass};
use crate::stats::StatsCalculator;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

/// `age_group`, `fare_group` and `family_size`.
const DERIVED_COLUMNS: usize = 3;

/// Default token for unknown cabin/deck values.
pub const DEFAULT_PLACEHOLDER: &str = "Unknown";

/// Age bucket. Bins are right-closed: (0,12], (12,18], (18,35], (35,60], (60,100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AgeGroup {
    Child,
    Teen,
    YoungAdult,
    Adult,
    Senior,
}

impl AgeGroup {
    pub fn from_age(age: f64) -> Option<Self> {
        if age.is_nan() || age <= 0.0 {
            None
        } else if age <= 12.0 {
            Some(AgeGroup::Child)
        } else if age <= 18.0 {
            Some(AgeGroup::Teen)
        } else if age <= 35.0 {
            Some(AgeGroup::YoungAdult)
        } else if age <= 60.0 {
            Some(AgeGroup::Adult)
        } else if age <= 100.0 {
            Some(AgeGroup::Senior)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Child => "Child",
            AgeGroup::Teen => "Teen",
            AgeGroup::YoungAdult => "Young Adult",
            AgeGroup::Adult => "Adult",
            AgeGroup::Senior => "Senior",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fare bucket. Bins are right-closed: (0,10], (10,30], (30,100], (100,1000].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FareGroup {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl FareGroup {
    pub fn from_fare(fare: f64) -> Option<Self> {
        if fare.is_nan() || fare <= 0.0 {
            None
        } else if fare <= 10.0 {
            Some(FareGroup::Low)
        } else if fare <= 30.0 {
            Some(FareGroup::Medium)
        } else if fare <= 100.0 {
            Some(FareGroup::High)
        } else if fare <= 1000.0 {
            Some(FareGroup::VeryHigh)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FareGroup::Low => "Low",
            FareGroup::Medium => "Medium",
            FareGroup::High => "High",
            FareGroup::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for FareGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cleaned table plus the derived columns. Derived columns only exist here,
/// so they are computed once from the cleaned base columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanTable {
    pub table: PassengerTable,
    pub age_group: Nullable<AgeGroup>,
    pub fare_group: Nullable<FareGroup>,
    pub family_size: Vec<u64>,
}

impl CleanTable {
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Columns of the loaded dataset plus the derived ones.
    pub fn column_count(&self) -> usize {
        self.table.source_columns + DERIVED_COLUMNS
    }
}

#[derive(Debug, Clone)]
pub struct CleaningOptions {
    pub placeholder: String,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

/// Median used for one (class, sex) group; `None` when the group had no ages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMedian {
    pub pclass: u8,
    pub sex: String,
    pub median: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeImputation {
    pub missing_before: usize,
    pub missing_after: usize,
    pub group_medians: Vec<GroupMedian>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbarkedImputation {
    pub missing_before: usize,
    pub missing_after: usize,
    /// Set only when the fill actually ran.
    pub mode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceholderFill {
    /// `None` when the column is not in the dataset.
    pub cabin_missing: Option<usize>,
    pub deck_missing: Option<usize>,
    pub placeholder: String,
}

/// Everything the cleaning pass did, for the console report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleaningReport {
    pub age: AgeImputation,
    pub embarked: EmbarkedImputation,
    pub placeholders: PlaceholderFill,
    pub rows: usize,
    pub columns: usize,
}

/// Handles data cleaning and feature derivation.
pub struct DataCleaner;

impl DataCleaner {
    /// Run every cleaning step in order and derive the bucketed features.
    pub fn clean(table: PassengerTable, options: &CleaningOptions) -> (CleanTable, CleaningReport) {
        let (table, age) = Self::impute_age(table);
        let (table, embarked) = Self::fill_embarked(table);
        let (table, placeholders) = Self::fill_placeholders(table, &options.placeholder);
        let clean = Self::derive_features(table);

        info!(
            "Data cleaning completed, final shape: ({}, {})",
            clean.len(),
            clean.column_count()
        );

        let report = CleaningReport {
            age,
            embarked,
            placeholders,
            rows: clean.len(),
            columns: clean.column_count(),
        };
        (clean, report)
    }

    /// Fill missing ages with the median age of the row's (class, sex) group.
    ///
    /// A group with no known ages keeps its nulls.
    pub fn impute_age(mut table: PassengerTable) -> (PassengerTable, AgeImputation) {
        let missing_before = count_missing(&table.age);

        let mut groups: BTreeMap<(Pclass, String), Vec<f64>> = BTreeMap::new();
        for i in 0..table.len() {
            let entry = groups
                .entry((table.pclass[i], table.sex[i].clone()))
                .or_default();
            if let Some(age) = table.age[i] {
                entry.push(age);
            }
        }

        let medians: BTreeMap<(Pclass, String), Option<f64>> = groups
            .into_iter()
            .map(|(key, ages)| (key, StatsCalculator::median(&ages)))
            .collect();

        for i in 0..table.len() {
            if table.age[i].is_none() {
                let key = (table.pclass[i], table.sex[i].clone());
                table.age[i] = medians.get(&key).copied().flatten();
            }
        }

        let group_medians = medians
            .into_iter()
            .map(|((pclass, sex), median)| {
                debug!("Median age for class {} / {}: {:?}", pclass, sex, median);
                GroupMedian {
                    pclass: pclass.number(),
                    sex,
                    median,
                }
            })
            .collect();

        let missing_after = count_missing(&table.age);
        info!(
            "Age missing values: {} before, {} after imputation",
            missing_before, missing_after
        );

        (
            table,
            AgeImputation {
                missing_before,
                missing_after,
                group_medians,
            },
        )
    }

    /// Fill missing embarkation ports with the most common port.
    ///
    /// Skipped when nothing is missing or when no port is known at all.
    pub fn fill_embarked(mut table: PassengerTable) -> (PassengerTable, EmbarkedImputation) {
        let missing_before = count_missing(&table.embarked);

        let mode = if missing_before > 0 {
            most_frequent(&table.embarked)
        } else {
            None
        };

        if let Some(port) = &mode {
            info!("Filling {} missing embarked values with '{}'", missing_before, port);
            for value in table.embarked.iter_mut().filter(|v| v.is_none()) {
                *value = Some(port.clone());
            }
        }

        let missing_after = count_missing(&table.embarked);
        (
            table,
            EmbarkedImputation {
                missing_before,
                missing_after,
                mode,
            },
        )
    }

    /// Replace missing cabin and deck values with `placeholder`, when those
    /// columns exist.
    pub fn fill_placeholders(
        mut table: PassengerTable,
        placeholder: &str,
    ) -> (PassengerTable, PlaceholderFill) {
        let cabin_missing = table
            .cabin
            .as_mut()
            .map(|cabin| fill_nulls(cabin, placeholder));
        let deck_missing = table
            .deck
            .as_mut()
            .map(|deck| fill_nulls(deck, placeholder));

        (
            table,
            PlaceholderFill {
                cabin_missing,
                deck_missing,
                placeholder: placeholder.to_string(),
            },
        )
    }

    /// Compute age group, fare group and family size from the cleaned table.
    pub fn derive_features(table: PassengerTable) -> CleanTable {
        let age_group = table
            .age
            .iter()
            .map(|age| age.and_then(AgeGroup::from_age))
            .collect();
        let fare_group = table
            .fare
            .iter()
            .map(|fare| fare.and_then(FareGroup::from_fare))
            .collect();
        let family_size = table
            .sibsp
            .iter()
            .zip(&table.parch)
            .map(|(&sibsp, &parch)| u64::from(sibsp) + u64::from(parch) + 1)
            .collect();

        CleanTable {
            table,
            age_group,
            fare_group,
            family_size,
        }
    }
}

fn count_missing<T>(values: &[Option<T>]) -> usize {
    values.iter().filter(|v| v.is_none()).count()
}

/// Returns how many nulls were replaced.
fn fill_nulls(values: &mut [Option<String>], placeholder: &str) -> usize {
    let mut filled = 0;
    for value in values.iter_mut().filter(|v| v.is_none()) {
        *value = Some(placeholder.to_string());
        filled += 1;
    }
    filled
}

/// Most frequent non-null value; ties go to the smallest value.
pub fn most_frequent(values: &[Option<String>]) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values.iter().flatten() {
        *counts.entry(value.as_str()).or_insert(0) += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value.to_string())
}
