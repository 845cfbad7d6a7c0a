use super::*;
use crate::timeline::Timeline;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::fs;

fn job_bytes(steps: &[&str]) -> Vec<u8> {
    let mut raw = b"\0AJA\x01\x00\x00\x02".to_vec();
    for (i, step) in steps.iter().enumerate() {
        raw.extend_from_slice(step.as_bytes());
        if i + 1 < steps.len() {
            raw.extend_from_slice(b"\0\x01\x00\x07");
        }
    }
    raw
}

fn t(secs: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2017, 3, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
        + Duration::seconds(secs)
}

#[test]
fn test_parse_job_steps() {
    let job = Job::from_bytes("AuTi", &job_bytes(&["Ti_adhesion", "Au_250nm", "cooldown"])).unwrap();
    assert_eq!(job.name, "AuTi");
    assert_eq!(job.steps, vec!["Start", "Ti_adhesion", "Au_250nm", "cooldown"]);
    assert_eq!(job.recipe_steps().len(), 3);
    assert_eq!(job.step_for_layer(2), Some("Au_250nm"));
    assert_eq!(job.step_for_layer(9), None);
}

#[test]
fn test_segments_keep_terminators() {
    let segments = parse_segments(&job_bytes(&["a1", "b2"])).unwrap();
    let kinds: Vec<_> = segments.iter().map(|s| s.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            SegmentKind::Preamble,
            SegmentKind::Step,
            SegmentKind::Terminator,
            SegmentKind::Step
        ]
    );
    assert_eq!(segments[1].offset, PREAMBLE_LEN);
    assert_eq!(segments[2].bytes.len(), TERMINATOR_LEN);
}

#[test]
fn test_terminated_final_step_and_empty_job() {
    let mut raw = job_bytes(&["only"]);
    raw.extend_from_slice(b"\0\x01\x00\x07");
    let job = Job::from_bytes("one", &raw).unwrap();
    assert_eq!(job.steps, vec!["Start", "only"]);

    let job = Job::from_bytes("empty", &job_bytes(&[])).unwrap();
    assert_eq!(job.steps, vec!["Start"]);
}

#[test]
fn test_short_job_is_invalid() {
    assert!(matches!(
        Job::from_bytes("short", b"\0AJA"),
        Err(JobError::InvalidFormat(_))
    ));
}

#[test]
fn test_from_file_checks_extension() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("job.txt");
    fs::write(&bad, job_bytes(&["x1"])).unwrap();
    assert!(matches!(Job::from_file(&bad), Err(JobError::UnknownFileType(_))));

    let good = dir.path().join("Metals_01.ajp");
    fs::write(&good, job_bytes(&["x1"])).unwrap();
    assert_eq!(Job::from_file(&good).unwrap().name, "Metals_01");
}

#[test]
fn test_job_catalog_skips_bad_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("old")).unwrap();
    fs::write(dir.path().join("A.ajp"), job_bytes(&["s1"])).unwrap();
    fs::write(dir.path().join("old/B.ajp"), job_bytes(&["s1", "s2"])).unwrap();
    fs::write(dir.path().join("broken.ajp"), b"\0").unwrap();

    let catalog = JobCatalog::from_dir(dir.path()).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.get("B").unwrap().recipe_steps(), ["s1", "s2"]);
    assert!(catalog.get("broken").is_none());
}

#[test]
fn test_find_recipe_names_prefers_longest() {
    let raw = "\0hdr\0Au_thick\0\x01Ti\0\x01Au\0";
    let known = ["Au", "Au_thick", "Ti", "thick"];
    let found: Vec<_> = find_recipe_names(raw, &known)
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(found, vec!["Au_thick", "Ti", "Au"]);
}

#[test]
fn test_find_recipe_names_sees_overlapping_occurrences() {
    let found = find_recipe_names("XABABA", &["XAB", "ABA"]);
    assert_eq!(
        found,
        vec![
            RecipeMatch {
                offset: 0,
                name: "XAB".to_string()
            },
            RecipeMatch {
                offset: 3,
                name: "ABA".to_string()
            },
        ]
    );

    let found = find_recipe_names("ABABA", &["ABA"]);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].offset, 0);
}

#[test]
fn test_recipe_steps_from_folder() {
    let dir = tempfile::tempdir().unwrap();
    let recipes = dir.path().join("recipes");
    fs::create_dir(&recipes).unwrap();
    for name in ["Ti_adhesion", "Au_250nm", "unused"] {
        fs::write(recipes.join(format!("{}.rcp", name)), "").unwrap();
    }
    fs::write(recipes.join("notes.txt"), "").unwrap();
    let job_path = dir.path().join("AuTi.ajp");
    fs::write(&job_path, job_bytes(&["Ti_adhesion", "Au_250nm"])).unwrap();

    assert_eq!(
        recipe_names_in_dir(&recipes).unwrap(),
        vec!["Au_250nm", "Ti_adhesion", "unused"]
    );
    assert_eq!(
        recipe_steps_from_folder(&job_path, &recipes).unwrap(),
        vec!["Ti_adhesion", "Au_250nm"]
    );
}

#[test]
fn test_annotate_layers() {
    let job = Job::from_bytes("AuTi", &job_bytes(&["Ti_adhesion", "Au_250nm"])).unwrap();
    let mut timeline = Timeline::with_channels(["layer #", "RF#2 W"]).unwrap();
    let layers = [Some(0.0), Some(1.0), Some(1.0), Some(2.0), None, Some(7.0)];
    for (i, layer) in layers.iter().enumerate() {
        timeline.push_values(t(i as i64), vec![*layer, Some(0.0)]).unwrap();
    }

    let spans = annotate_layers(&timeline, &job).unwrap();
    assert_eq!(spans.len(), 5);
    assert_eq!(spans[0].step.as_deref(), Some("Start"));
    assert_eq!(spans[1].step.as_deref(), Some("Ti_adhesion"));
    assert_eq!((spans[1].first_sample, spans[1].last_sample), (1, 2));
    assert_eq!(spans[1].end, t(2));
    assert_eq!(spans[2].step.as_deref(), Some("Au_250nm"));
    assert_eq!(spans[3].layer, None);
    assert_eq!(spans[4].layer, Some(7));
    assert_eq!(spans[4].step, None);
}

#[test]
fn test_annotate_layers_requires_layer_channel() {
    let job = Job::from_bytes("j", &job_bytes(&["s"])).unwrap();
    let mut timeline = Timeline::with_channels(["RF#2 W"]).unwrap();
    timeline.push_values(t(0), vec![Some(1.0)]).unwrap();
    assert!(matches!(
        annotate_layers(&timeline, &job),
        Err(JobError::TimelineError(_))
    ));
}
