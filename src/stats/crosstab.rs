//! Survival Cross-Tabulation Module
//! Row-normalized survival proportions per category.

use crate::stats::calculator::{ChiSquareTest, StatsCalculator};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;

/// Overall survival counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurvivalSummary {
    pub total: usize,
    pub survivors: usize,
    pub non_survivors: usize,
    pub survival_rate: f64,
}

impl SurvivalSummary {
    pub fn from_outcomes(survived: &[bool]) -> Self {
        let total = survived.len();
        let survivors = survived.iter().filter(|s| **s).count();
        Self {
            total,
            survivors,
            non_survivors: total - survivors,
            survival_rate: if total == 0 {
                f64::NAN
            } else {
                survivors as f64 / total as f64
            },
        }
    }

    /// Survival rate as a percentage, or `n/a` for an empty dataset.
    pub fn rate_label(&self) -> String {
        if self.total == 0 {
            "n/a".to_string()
        } else {
            format!("{:.1}%", self.survival_rate * 100.0)
        }
    }
}

/// One category of a cross-tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossTabRow {
    pub category: String,
    pub count: usize,
    pub died_count: usize,
    pub survived_count: usize,
    /// Proportions normalized by row; `died + survived == 1`.
    pub died: f64,
    pub survived: f64,
}

/// Survival against one categorical variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossTab {
    pub variable: String,
    pub rows: Vec<CrossTabRow>,
}

impl CrossTab {
    /// Cross-tabulate `keys` against survival outcomes.
    ///
    /// Rows follow the ordering of `K`; missing keys are dropped.
    pub fn survival_by<K, I>(variable: &str, keys: I, survived: &[bool]) -> Self
    where
        K: Ord + Display,
        I: IntoIterator<Item = Option<K>>,
    {
        let mut counts: BTreeMap<K, (usize, usize)> = BTreeMap::new();
        for (key, &outcome) in keys.into_iter().zip(survived) {
            let Some(key) = key else {
                continue;
            };
            let entry = counts.entry(key).or_insert((0, 0));
            if outcome {
                entry.1 += 1;
            } else {
                entry.0 += 1;
            }
        }

        let rows = counts
            .into_iter()
            .map(|(key, (died_count, survived_count))| {
                let count = died_count + survived_count;
                CrossTabRow {
                    category: key.to_string(),
                    count,
                    died_count,
                    survived_count,
                    died: died_count as f64 / count as f64,
                    survived: survived_count as f64 / count as f64,
                }
            })
            .collect();

        Self {
            variable: variable.to_string(),
            rows,
        }
    }

    /// Chi-square test of independence between the variable and survival.
    pub fn chi_square(&self) -> Option<ChiSquareTest> {
        let observed: Vec<Vec<usize>> = self
            .rows
            .iter()
            .map(|row| vec![row.died_count, row.survived_count])
            .collect();
        StatsCalculator::chi_square_test(&observed)
    }

    pub fn categories(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.category.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AgeGroup, Pclass};

    #[test]
    fn test_survival_summary() {
        let summary = SurvivalSummary::from_outcomes(&[true, false, false, true, false]);
        assert_eq!(summary.survivors, 2);
        assert_eq!(summary.non_survivors, 3);
        assert!((summary.survival_rate - 0.4).abs() < 1e-12);
        assert_eq!(summary.rate_label(), "40.0%");
    }

    #[test]
    fn test_empty_survival_summary_has_no_rate() {
        let summary = SurvivalSummary::from_outcomes(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.rate_label(), "n/a");
    }

    #[test]
    fn test_rows_sum_to_one() {
        let sex = ["male", "female", "female", "male", "male", "female"];
        let survived = [false, true, true, true, false, false];
        let tab = CrossTab::survival_by("sex", sex.iter().map(Some), &survived);

        assert_eq!(tab.categories(), vec!["female", "male"]);
        for row in &tab.rows {
            assert!((row.died + row.survived - 1.0).abs() < 1e-12);
        }
        assert_eq!(tab.rows[0].survived_count, 2);
        assert_eq!(tab.rows[1].count, 3);
    }

    #[test]
    fn test_enum_keys_keep_declared_order_and_drop_nulls() {
        let groups = [
            Some(AgeGroup::Senior),
            None,
            Some(AgeGroup::Child),
            Some(AgeGroup::YoungAdult),
        ];
        let tab = CrossTab::survival_by("age_group", groups, &[false, true, true, false]);

        assert_eq!(tab.categories(), vec!["Child", "Young Adult", "Senior"]);
        assert_eq!(tab.rows.iter().map(|r| r.count).sum::<usize>(), 3);
    }

    #[test]
    fn test_class_crosstab_chi_square() {
        let mut classes = Vec::new();
        let mut survived = Vec::new();
        for (class, died, lived) in [(Pclass::First, 80, 136), (Pclass::Third, 372, 119)] {
            classes.extend(std::iter::repeat(Some(class)).take(died + lived));
            survived.extend(std::iter::repeat(false).take(died));
            survived.extend(std::iter::repeat(true).take(lived));
        }

        let tab = CrossTab::survival_by("pclass", classes, &survived);
        assert_eq!(tab.categories(), vec!["1", "3"]);

        let test = tab.chi_square().unwrap();
        assert_eq!(test.dof, 1);
        assert!(test.is_significant);
    }
}
