//! Dashboard Data Module
//! Collects everything the survival overview figure displays.

use crate::data::CleanTable;
use crate::stats::{CrossTab, SurvivalSummary};
use plotters::style::RGBColor;
use serde::Serialize;

/// Bar and slice color for non-survivors.
pub const DIED_COLOR: RGBColor = RGBColor(0xff, 0x6b, 0x6b);
/// Bar and slice color for survivors.
pub const SURVIVED_COLOR: RGBColor = RGBColor(0x4e, 0xcd, 0xc4);

/// Data for the four panels of the overview figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurvivalDashboard {
    pub overall: SurvivalSummary,
    pub by_gender: CrossTab,
    pub by_class: CrossTab,
    pub by_age_group: CrossTab,
}

impl SurvivalDashboard {
    pub fn from_clean(clean: &CleanTable) -> Self {
        let t = &clean.table;
        Self {
            overall: SurvivalSummary::from_outcomes(&t.survived),
            by_gender: CrossTab::survival_by("sex", t.sex.iter().map(Some), &t.survived),
            by_class: CrossTab::survival_by(
                "pclass",
                t.pclass.iter().copied().map(Some),
                &t.survived,
            ),
            by_age_group: CrossTab::survival_by(
                "age_group",
                clean.age_group.iter().copied(),
                &t.survived,
            ),
        }
    }

    pub fn crosstabs(&self) -> [&CrossTab; 3] {
        [&self.by_gender, &self.by_class, &self.by_age_group]
    }
}
