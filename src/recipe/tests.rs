use super::*;

const SAMPLE_CATALOG: &str = r#"
[[recipe]]
name = "Au_250nm"

[[recipe.step]]
name = "presputter"
min_seconds = 60.0
targets = { "RF#2 W Fwd" = { min = 95.0, max = 105.0 }, "RF#2 Shutter" = { value = 0.0 } }

[[recipe.step]]
name = "deposit"
min_samples = 10
max_seconds = 1800.0
targets = { "RF#2 W Fwd" = { min = 95.0, max = 105.0 }, "RF#2 Shutter" = { value = 1.0 } }

[[recipe]]
name = "Ti_adhesion"

[[recipe.step]]
targets = { "DC#5C W" = { min = 180.0, max = 220.0 } }
"#;

fn step(channel: &str, min: f64, max: f64) -> Step {
    Step::new().target(channel, TargetRange::new(min, max))
}

#[test]
fn test_parse_catalog() {
    let catalog = RecipeCatalog::from_toml_str(SAMPLE_CATALOG).unwrap();
    assert_eq!(catalog.names(), vec!["Au_250nm", "Ti_adhesion"]);

    let au = catalog.get("Au_250nm").unwrap();
    assert_eq!(au.steps().len(), 2);
    assert_eq!(au.steps()[1].index, 1);
    assert_eq!(au.steps()[1].label(), "deposit");
    assert_eq!(au.steps()[1].duration.min_samples, 10);
    assert_eq!(au.steps()[1].duration.max_seconds, Some(1800.0));
    assert_eq!(au.steps()[0].duration.min_samples, 1);
    assert_eq!(au.steps()[0].targets["RF#2 Shutter"], TargetRange::exact(0.0));
    assert_eq!(au.channels(), vec!["RF#2 Shutter", "RF#2 W Fwd"]);

    let ti = catalog.get("Ti_adhesion").unwrap();
    assert_eq!(ti.steps()[0].label(), "step 0");
}

#[test]
fn test_recipe_not_found() {
    let catalog = RecipeCatalog::from_toml_str(SAMPLE_CATALOG).unwrap();
    assert!(matches!(
        catalog.get("Pd"),
        Err(RecipeError::RecipeNotFound(name)) if name == "Pd"
    ));
    assert!(matches!(
        catalog.select(&["Ti_adhesion", "Pd"]),
        Err(RecipeError::RecipeNotFound(_))
    ));

    let subset = catalog.select(&["Ti_adhesion"]).unwrap();
    assert_eq!(subset.names(), vec!["Ti_adhesion"]);

    let repeated = catalog.select(&["Ti_adhesion", "Au_250nm", "Ti_adhesion"]).unwrap();
    assert_eq!(repeated.names(), vec!["Ti_adhesion", "Au_250nm"]);
}

#[test]
fn test_duplicate_recipe_names() {
    let a = Recipe::new("Dep", vec![step("power", 90.0, 110.0)]).unwrap();
    let b = Recipe::new("Dep", vec![step("power", 0.0, 10.0)]).unwrap();
    assert!(matches!(
        RecipeCatalog::new(vec![a, b]),
        Err(RecipeError::DuplicateRecipe(_))
    ));
}

#[test]
fn test_invalid_steps() {
    assert!(matches!(
        Recipe::new("r", vec![Step::new()]),
        Err(RecipeError::InvalidStep { step: 0, .. })
    ));
    assert!(matches!(
        Recipe::new("r", vec![step("p", 1.0, 2.0), step("p", 5.0, 1.0)]),
        Err(RecipeError::InvalidStep { step: 1, .. })
    ));
    assert!(matches!(
        Recipe::new("r", vec![step("p", 1.0, 2.0).min_samples(0)]),
        Err(RecipeError::InvalidStep { .. })
    ));
    assert!(matches!(
        Recipe::new("r", vec![step("p", 1.0, 2.0).min_seconds(10.0).max_seconds(5.0)]),
        Err(RecipeError::InvalidStep { .. })
    ));
    assert!(matches!(
        Recipe::new("r", vec![step("p", f64::NAN, 2.0)]),
        Err(RecipeError::InvalidStep { .. })
    ));
    assert!(matches!(
        Recipe::new("r", vec![]),
        Err(RecipeError::InvalidRecipe { .. })
    ));
    assert!(matches!(
        Recipe::new(" ", vec![step("p", 1.0, 2.0)]),
        Err(RecipeError::InvalidRecipe { .. })
    ));
}

#[test]
fn test_bad_toml() {
    assert!(matches!(
        RecipeCatalog::from_toml_str("[[recipe]]\nname = 3\n"),
        Err(RecipeError::TomlError(_))
    ));
    assert!(matches!(
        RecipeCatalog::from_toml_str("[[recipe]]\nname = \"x\"\nbogus = 1\n"),
        Err(RecipeError::TomlError(_))
    ));
    assert!(RecipeCatalog::from_toml_str("").unwrap().is_empty());
}

#[test]
fn test_target_range() {
    let range = TargetRange::new(90.0, 110.0);
    assert!(range.contains(90.0));
    assert!(range.contains(110.0));
    assert!(!range.contains(110.5));
    assert_eq!(range.midpoint(), 100.0);

    let wide = range.widened(0.1);
    assert!((wide.min - 79.0).abs() < 1e-9);
    assert!((wide.max - 121.0).abs() < 1e-9);
    assert_eq!(TargetRange::exact(0.0).widened(0.5), TargetRange::exact(0.0));
}

#[test]
fn test_step_duration() {
    let duration = StepDuration {
        min_samples: 3,
        min_seconds: Some(2.0),
        max_seconds: Some(10.0),
    };
    assert!(duration.is_long_enough(3, 2.0));
    assert!(!duration.is_long_enough(2, 5.0));
    assert!(!duration.is_long_enough(5, 1.0));
    assert!(duration.is_short_enough(10.0));
    assert!(!duration.is_short_enough(10.5));
}
