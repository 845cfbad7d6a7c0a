//! Integration tests for aja-tools
//!
//! These tests run the full pipeline: logfile on disk, recipe catalog on
//! disk, alignment, export.

use aja_tools::align::{align, align_selected, AlignConfig, AlignError, AlignmentResult, StepLabel};
use aja_tools::logfile::load_logfile;
use aja_tools::recipe::{Recipe, RecipeCatalog, Step, TargetRange};
use aja_tools::timeline::Timeline;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use std::fs;
use tempfile::tempdir;

const CATALOG: &str = r#"
[[recipe]]
name = "Au_thin"

[[recipe.step]]
name = "presputter"
min_samples = 3
targets = { "RF#2 W Fwd" = { min = 95.0, max = 105.0 }, "RF#2 Shutter" = { value = 0.0 } }

[[recipe.step]]
name = "deposit"
min_samples = 3
targets = { "RF#2 W Fwd" = { min = 95.0, max = 105.0 }, "RF#2 Shutter" = { value = 1.0 } }

[[recipe]]
name = "Ti_adhesion"

[[recipe.step]]
name = "deposit"
min_samples = 2
targets = { "DC#5 W" = { min = 180.0, max = 220.0 } }
"#;

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2017, 3, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

/// Write a logfile in the tool's format, one row per second
fn write_log(rows: &[(&str, f64, f64)]) -> String {
    let mut text = String::from("Date\tTime\tLayer #\tRF#2 Shutter\tRF#2 W Fwd\tDC#5 W\t\n");
    for (i, (shutter, rf, dc)) in rows.iter().enumerate() {
        let t = start() + TimeDelta::seconds(i as i64);
        text.push_str(&format!(
            "{}\t{}\t1\t{}\t{}\t{}\t\n",
            t.format("%-m/%-d/%Y"),
            t.format("%-I:%M:%S %p"),
            shutter,
            rf,
            dc
        ));
    }
    text
}

fn deposition_log() -> String {
    write_log(&[
        ("Closed", 0.0, 0.0),
        ("Closed", 100.0, 0.0),
        ("Closed", 101.0, 0.0),
        ("Closed", 99.0, 0.0),
        ("Open", 100.0, 0.0),
        ("Open", 100.0, 0.0),
        ("Open", 80.0, 0.0),
        ("Open", 100.0, 0.0),
        ("Closed", 0.0, 0.0),
        ("Closed", 0.0, 200.0),
        ("Closed", 0.0, 201.0),
        ("Closed", 0.0, 0.0),
    ])
}

fn labels(result: &AlignmentResult) -> Vec<(usize, usize, StepLabel)> {
    result
        .intervals
        .iter()
        .map(|i| (i.first_sample, i.last_sample, i.label.clone()))
        .collect()
}

/// Test the complete load-align-export cycle
#[test]
fn test_align_logfile_from_disk() {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("Metals_03012017_090000.dlg");
    let catalog_path = dir.path().join("recipes.toml");
    fs::write(&log_path, deposition_log()).unwrap();
    fs::write(&catalog_path, CATALOG).unwrap();

    let timeline = load_logfile(&log_path).unwrap();
    assert_eq!(timeline.len(), 12);
    let catalog = RecipeCatalog::from_file(&catalog_path).unwrap();

    let result = align(&timeline, &catalog, &AlignConfig::default()).unwrap();
    assert_eq!(
        labels(&result),
        vec![
            (0, 0, StepLabel::Unmatched),
            (1, 3, StepLabel::matched("Au_thin", 0)),
            (4, 7, StepLabel::matched("Au_thin", 1)),
            (8, 8, StepLabel::Unmatched),
            (9, 10, StepLabel::matched("Ti_adhesion", 0)),
            (11, 11, StepLabel::Unmatched),
        ]
    );
    assert_eq!(result.intervals[1].start, start() + TimeDelta::seconds(1));
    assert_eq!(result.recipe_scores[0].recipe, "Au_thin");
    assert_eq!(result.recipe_scores[0].score, 7);
    assert_eq!(result.recipe_scores[1].score, 2);

    let json_path = dir.path().join("alignment.json");
    result.write_json(fs::File::create(&json_path).unwrap()).unwrap();
    let reloaded: AlignmentResult = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(reloaded, result);
}

/// The dropout at sample 6 splits the deposit once nothing is bridged
#[test]
fn test_strict_tolerance_splits_dropout() {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("Metals_03012017_090000.dlg");
    fs::write(&log_path, deposition_log()).unwrap();
    let timeline = load_logfile(&log_path).unwrap();
    let catalog = RecipeCatalog::from_toml_str(CATALOG).unwrap();

    let config = AlignConfig::default().with_dropout_tolerance(0);
    let result = align(&timeline, &catalog, &config).unwrap();
    // Neither half of the deposit reaches three samples
    assert_eq!(result.recipe_intervals("Au_thin").count(), 1);
    assert_eq!(result.label_at(5), Some(&StepLabel::Unmatched));
}

#[test]
fn test_selected_recipes() {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("Metals_03012017_090000.dlg");
    fs::write(&log_path, deposition_log()).unwrap();
    let timeline = load_logfile(&log_path).unwrap();
    let catalog = RecipeCatalog::from_toml_str(CATALOG).unwrap();

    let result = align_selected(&timeline, &catalog, &["Ti_adhesion"], &AlignConfig::default()).unwrap();
    assert_eq!(result.recipe_intervals("Au_thin").count(), 0);
    assert_eq!(result.matched_sample_count(), 2);

    let missing = align_selected(&timeline, &catalog, &["Pt"], &AlignConfig::default());
    assert!(matches!(missing, Err(AlignError::RecipeNotFound(_))));
}

#[test]
fn test_idempotence() {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("Metals_03012017_090000.dlg");
    fs::write(&log_path, deposition_log()).unwrap();
    let catalog = RecipeCatalog::from_toml_str(CATALOG).unwrap();

    let first = align(&load_logfile(&log_path).unwrap(), &catalog, &AlignConfig::default()).unwrap();
    let second = align(&load_logfile(&log_path).unwrap(), &catalog, &AlignConfig::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_boundaries() {
    let empty = Timeline::with_channels(["power"]).unwrap();
    let catalog = RecipeCatalog::empty();
    assert!(matches!(
        align(&empty, &catalog, &AlignConfig::default()),
        Err(AlignError::EmptyInput)
    ));

    let mut timeline = Timeline::with_channels(["power"]).unwrap();
    for i in 0..4 {
        timeline
            .push_values(start() + TimeDelta::seconds(i), vec![Some(100.0)])
            .unwrap();
    }
    let result = align(&timeline, &catalog, &AlignConfig::default()).unwrap();
    assert_eq!(labels(&result), vec![(0, 3, StepLabel::Unmatched)]);
    assert_eq!(result.coverage(), 0.0);
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// Recipe built from `(samples, shares_previous)` pairs
    ///
    /// A step that shares with the previous one holds the same power level,
    /// otherwise it moves 100 W up. Every step is limited to its own span.
    fn recipe_and_timeline(steps: &[(usize, bool)]) -> (Recipe, Timeline) {
        let mut level = 0.0;
        let steps = steps
            .iter()
            .enumerate()
            .map(|(i, &(len, shares))| {
                if i == 0 || !shares {
                    level += 100.0;
                }
                Step::new()
                    .target("power", TargetRange::new(level - 10.0, level + 10.0))
                    .min_samples(len)
                    .max_seconds((len - 1) as f64)
            })
            .collect();
        let recipe = Recipe::new("Stack", steps).unwrap();

        let mut timeline = Timeline::with_channels(["power"]).unwrap();
        let mut t = start();
        for step in recipe.steps() {
            let level = step.targets["power"].midpoint();
            for _ in 0..step.duration.min_samples {
                timeline.push_values(t, vec![Some(level)]).unwrap();
                t += TimeDelta::seconds(1);
            }
        }
        (recipe, timeline)
    }

    proptest! {
        /// A noise-free timeline built from a recipe aligns completely
        #[test]
        fn test_recipe_round_trip(
            steps in prop::collection::vec((1usize..12, any::<bool>()), 1..6),
        ) {
            let (recipe, timeline) = recipe_and_timeline(&steps);
            let catalog = RecipeCatalog::new(vec![recipe]).unwrap();
            let result = align(&timeline, &catalog, &AlignConfig::default()).unwrap();

            prop_assert_eq!(result.coverage(), 1.0);
            prop_assert_eq!(result.unmatched().count(), 0);
            prop_assert_eq!(result.intervals.len(), steps.len());
            for (step, (interval, (len, _))) in result.intervals.iter().zip(&steps).enumerate() {
                prop_assert_eq!(&interval.label, &StepLabel::matched("Stack", step));
                prop_assert_eq!(interval.sample_count(), *len);
            }
            prop_assert_eq!(result.recipe_scores[0].score, timeline.len());
        }

        /// Intervals always tile the timeline without gaps or overlaps
        #[test]
        fn test_intervals_tile_timeline(
            values in prop::collection::vec(prop::option::of(0.0f64..200.0), 1..80),
            tolerance in 0usize..4,
        ) {
            let mut timeline = Timeline::with_channels(["power"]).unwrap();
            for (i, value) in values.iter().enumerate() {
                timeline.push_values(start() + TimeDelta::seconds(i as i64), vec![*value]).unwrap();
            }
            let catalog = RecipeCatalog::new(vec![
                Recipe::new("High", vec![Step::new().target("power", TargetRange::new(90.0, 200.0))]).unwrap(),
                Recipe::new("Low", vec![
                    Step::new().target("power", TargetRange::new(0.0, 50.0)).min_samples(2),
                    Step::new().target("power", TargetRange::new(40.0, 100.0)),
                ]).unwrap(),
            ]).unwrap();
            let config = AlignConfig::default().with_dropout_tolerance(tolerance);
            let result = align(&timeline, &catalog, &config).unwrap();

            prop_assert_eq!(result.intervals[0].first_sample, 0);
            prop_assert_eq!(result.intervals.last().unwrap().last_sample, values.len() - 1);
            for pair in result.intervals.windows(2) {
                prop_assert_eq!(pair[0].last_sample + 1, pair[1].first_sample);
                prop_assert_ne!(&pair[0].label, &pair[1].label);
            }
        }
    }
}
