//! Integration tests for the load → profile → clean → analyse stages.
//!
//! Fixtures are real rows from the Kaggle `train.csv` and the seaborn
//! reference copy of the Titanic dataset.

use pretty_assertions::assert_eq;
use std::path::PathBuf;
use titanic_eda::data::{DataSource, LoadedDataset};
use titanic_eda::{
    AgeGroup, CleaningOptions, DataCleaner, DataLoader, DataProfiler, EdaConfig, EdaPipeline,
    FallbackSource, FareGroup, OutputMode, PassengerTable, SurvivalDashboard,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn reference_fallback() -> FallbackSource {
    FallbackSource::Path {
        path: fixtures_path().join("seaborn_sample.csv"),
    }
}

fn load_train_sample() -> LoadedDataset {
    DataLoader::new(fixtures_path().join("train_sample.csv"), reference_fallback())
        .load()
        .expect("Failed to load train sample")
}

fn row_of(table: &PassengerTable, passenger_id: i64) -> usize {
    table
        .passenger_id
        .as_ref()
        .expect("passenger_id column")
        .iter()
        .position(|id| *id == Some(passenger_id))
        .expect("passenger present")
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_primary_dataset_is_used_when_present() {
    let loaded = load_train_sample();

    assert!(!loaded.is_fallback());
    assert_eq!(loaded.shape(), (25, 12));
    assert!(loaded.frame.column("passenger_id").is_ok());
}

#[test]
fn test_fallback_row_count_matches_reference() {
    let reference = DataLoader::new(
        fixtures_path().join("seaborn_sample.csv"),
        reference_fallback(),
    )
    .load()
    .unwrap();

    let loaded = DataLoader::new(fixtures_path().join("no_such_file.csv"), reference_fallback())
        .load()
        .unwrap();

    assert!(matches!(loaded.source, DataSource::Fallback(_)));
    assert_eq!(loaded.frame.height(), reference.frame.height());
    assert_eq!(loaded.frame.height(), 12);
}

// ============================================================================
// Profiling
// ============================================================================

#[test]
fn test_profile_of_train_sample() {
    let loaded = load_train_sample();
    let profile = DataProfiler::profile(&loaded.frame, 5).unwrap();

    assert_eq!(profile.head.height(), 5);
    assert_eq!(profile.duplicate_rows, 0);

    let missing: Vec<(&str, usize)> = profile
        .missing
        .iter()
        .map(|m| (m.column.as_str(), m.count))
        .collect();
    assert_eq!(missing, vec![("age", 3), ("cabin", 16), ("embarked", 2)]);
    assert!((profile.missing[1].percentage - 64.0).abs() < 1e-9);

    let embarked = profile
        .unique_values
        .iter()
        .find(|u| u.column == "embarked")
        .unwrap();
    assert_eq!(
        embarked.values,
        vec![
            Some("S".to_string()),
            Some("C".to_string()),
            Some("Q".to_string()),
            None
        ]
    );
}

// ============================================================================
// Cleaning
// ============================================================================

#[test]
fn test_cleaning_train_sample() {
    let loaded = load_train_sample();
    let table = PassengerTable::from_frame(&loaded.frame).unwrap();
    let (clean, report) = DataCleaner::clean(table, &CleaningOptions::default());
    let t = &clean.table;

    // (3, male) median of 2,2,20,22,35,36,39
    assert_eq!(t.age[row_of(t, 6)], Some(22.0));
    // (2, male) has one known age
    assert_eq!(t.age[row_of(t, 18)], Some(34.0));
    // (3, female) median of 4,14,26,27,31
    assert_eq!(t.age[row_of(t, 20)], Some(26.0));
    assert_eq!(report.age.missing_before, 3);
    assert_eq!(report.age.missing_after, 0);
    assert_eq!((report.rows, report.columns), (25, 15));

    assert_eq!(report.embarked.mode.as_deref(), Some("S"));
    assert!(t.embarked.iter().all(Option::is_some));

    assert_eq!(report.placeholders.cabin_missing, Some(16));
    assert_eq!(report.placeholders.deck_missing, None);
    assert_eq!(
        t.cabin.as_ref().unwrap()[row_of(t, 1)].as_deref(),
        Some("Unknown")
    );

    for i in 0..clean.len() {
        assert_eq!(
            clean.family_size[i],
            u64::from(t.sibsp[i]) + u64::from(t.parch[i]) + 1
        );
        assert!(clean.age_group[i].is_some());
    }
    assert_eq!(clean.family_size[row_of(t, 14)], 7);
    assert_eq!(clean.fare_group[row_of(t, 180)], None);
    assert_eq!(clean.fare_group[row_of(t, 16)], Some(FareGroup::Medium));
    assert_eq!(clean.age_group[row_of(t, 830)], Some(AgeGroup::Senior));
}

#[test]
fn test_cleaning_reference_schema() {
    let loaded = DataLoader::new(fixtures_path().join("no_such_file.csv"), reference_fallback())
        .load()
        .unwrap();
    let table = PassengerTable::from_frame(&loaded.frame).unwrap();

    assert!(table.passenger_id.is_none());
    assert!(table.cabin.is_none());
    assert!(table.deck.is_some());

    let (clean, report) = DataCleaner::clean(table, &CleaningOptions::default());

    assert_eq!(report.placeholders.deck_missing, Some(7));
    assert_eq!(report.placeholders.cabin_missing, None);
    assert_eq!(report.embarked.missing_before, 0);
    assert_eq!(report.embarked.mode, None);
    assert_eq!(report.age.missing_after, 0);
    // all 15 reference columns plus the three derived ones
    assert_eq!((report.rows, report.columns), (12, 18));
    assert!(clean
        .table
        .deck
        .as_ref()
        .unwrap()
        .iter()
        .all(Option::is_some));
}

// ============================================================================
// Analysis
// ============================================================================

#[test]
fn test_survival_crosstabs_train_sample() {
    let loaded = load_train_sample();
    let table = PassengerTable::from_frame(&loaded.frame).unwrap();
    let (clean, _) = DataCleaner::clean(table, &CleaningOptions::default());
    let dashboard = SurvivalDashboard::from_clean(&clean);

    assert_eq!(dashboard.overall.survivors, 14);
    assert_eq!(dashboard.overall.non_survivors, 11);

    let female = &dashboard.by_gender.rows[0];
    assert_eq!(female.category, "female");
    assert_eq!((female.count, female.survived_count), (13, 11));

    for tab in dashboard.crosstabs() {
        for row in &tab.rows {
            assert!(
                (row.died + row.survived - 1.0).abs() < 1e-9,
                "{} / {} does not sum to 1",
                tab.variable,
                row.category
            );
        }
    }
    assert_eq!(
        dashboard.by_age_group.rows.iter().map(|r| r.count).sum::<usize>(),
        25
    );
}

// ============================================================================
// Full run
// ============================================================================

#[test]
fn test_full_run_writes_chart() {
    let out = tempfile::tempdir().unwrap();
    let config = EdaConfig::builder()
        .input_path(fixtures_path().join("train_sample.csv"))
        .fallback(reference_fallback())
        .output_dir(out.path())
        .open_chart(false)
        .build()
        .unwrap();

    let outcome = EdaPipeline::new(config, OutputMode::Silent).run().unwrap();

    assert!(outcome.chart_path.exists());
    assert_eq!(outcome.profile.rows, 25);
    let json = serde_json::to_string(&outcome.report()).unwrap();
    assert!(json.contains("\"independence_tests\""));
}
