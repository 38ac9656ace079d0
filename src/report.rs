//! Console report.
//!
//! This is the program's primary output, so it is written with `println!`
//! rather than through `tracing`, and is always visible regardless of the
//! log level.

use crate::charts::SurvivalDashboard;
use crate::data::{CleaningReport, LoadedDataset};
use crate::stats::{CrossTab, DatasetProfile, SIGNIFICANCE_THRESHOLD};
use std::path::Path;

const BANNER_WIDTH: usize = 50;

pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(BANNER_WIDTH));
    println!("{}", title);
    println!("{}", "=".repeat(BANNER_WIDTH));
}

pub fn print_load_summary(loaded: &LoadedDataset) {
    if loaded.is_fallback() {
        println!("Dataset not found at primary path, using reference dataset");
    }
    println!("Loaded dataset from: {}", loaded.source);
    println!("Dataset shape: {:?}", loaded.shape());
}

pub fn print_profile(profile: &DatasetProfile) {
    print_section("DATASET OVERVIEW");
    println!("\nDataset Shape: ({}, {})", profile.rows, profile.columns);
    println!("Number of rows: {}", profile.rows);
    println!("Number of columns: {}", profile.columns);

    println!("\nColumn Names and Data Types:");
    for ct in &profile.dtypes {
        println!("  {:<15} {}", ct.column, ct.dtype);
    }

    println!("\nFirst {} rows:", profile.head.height());
    println!("{}", profile.head);

    println!("\nBasic Statistical Summary:");
    println!(
        "  {:<15} {:>7} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9}",
        "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    );
    for summary in &profile.summary {
        let s = &summary.stats;
        println!(
            "  {:<15} {:>7} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>9.3}",
            summary.column, s.count, s.mean, s.std, s.min, s.p25, s.median, s.p75, s.max
        );
    }

    print_section("DATA QUALITY ASSESSMENT");
    println!("\nMissing Values Count:");
    if profile.missing.is_empty() {
        println!("  (none)");
    } else {
        println!("  {:<15} {:>13} {:>11}", "column", "Missing Count", "Percentage");
        for entry in &profile.missing {
            println!(
                "  {:<15} {:>13} {:>10.2}%",
                entry.column, entry.count, entry.percentage
            );
        }
    }

    println!("\nDuplicate rows: {}", profile.duplicate_rows);

    println!("\nUnique values in categorical columns:");
    for unique in &profile.unique_values {
        let shown: Vec<String> = unique
            .values
            .iter()
            .take(20)
            .map(|v| v.clone().unwrap_or_else(|| "null".to_string()))
            .collect();
        let more = unique.values.len().saturating_sub(shown.len());
        if more > 0 {
            println!("{}: [{}, ... {} more]", unique.column, shown.join(", "), more);
        } else {
            println!("{}: [{}]", unique.column, shown.join(", "));
        }
    }
}

pub fn print_cleaning(report: &CleaningReport) {
    print_section("DATA CLEANING");
    println!("Age missing values before cleaning: {}", report.age.missing_before);
    println!("Age missing values after cleaning: {}", report.age.missing_after);
    for group in report.age.group_medians.iter().filter(|g| g.median.is_none()) {
        println!(
            "  No known ages for class {} / {}; left missing",
            group.pclass, group.sex
        );
    }

    println!(
        "Embarked missing values before cleaning: {}",
        report.embarked.missing_before
    );
    if let Some(port) = &report.embarked.mode {
        println!("Most common embarked port: {}", port);
    }
    println!(
        "Embarked missing values after cleaning: {}",
        report.embarked.missing_after
    );

    if let Some(missing) = report.placeholders.cabin_missing {
        println!("Cabin missing values: {}", missing);
    }
    if let Some(missing) = report.placeholders.deck_missing {
        println!("Deck missing values: {}", missing);
    }

    println!("\nData cleaning completed!");
    println!("Final dataset shape: ({}, {})", report.rows, report.columns);
}

pub fn print_analysis(dashboard: &SurvivalDashboard) {
    print_section("EXPLORATORY DATA ANALYSIS");
    let overall = &dashboard.overall;
    println!("Overall Survival Rate: {}", overall.rate_label());
    println!("Survivors: {}", overall.survivors);
    println!("Non-survivors: {}", overall.non_survivors);

    for tab in dashboard.crosstabs() {
        print_crosstab(tab);
    }
}

fn print_crosstab(tab: &CrossTab) {
    println!("\nSurvival by {}:", tab.variable);
    println!("  {:<15} {:>7} {:>9} {:>9}", tab.variable, "n", "Died", "Survived");
    for row in &tab.rows {
        println!(
            "  {:<15} {:>7} {:>9.3} {:>9.3}",
            row.category, row.count, row.died, row.survived
        );
    }
    match tab.chi_square() {
        Some(test) => println!(
            "  chi2 = {:.2}, dof = {}, p = {:.4}{}",
            test.statistic,
            test.dof,
            test.p_value,
            if test.is_significant {
                format!(" (significant at {})", SIGNIFICANCE_THRESHOLD)
            } else {
                String::new()
            }
        ),
        None => println!("  chi2 test not applicable"),
    }
}

pub fn print_chart_location(path: &Path) {
    println!("\nSurvival overview chart saved to {}", path.display());
}
