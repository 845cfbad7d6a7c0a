use log::info;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use super::types::{Recipe, Step, StepDuration, TargetRange};
use super::RecipeError;

// On-disk layout of a catalog file. Kept separate from the public types so
// step indices come from position and every recipe passes `Recipe::new`.

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default, rename = "recipe")]
    recipes: Vec<RecipeDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecipeDef {
    name: String,
    #[serde(default, rename = "step")]
    steps: Vec<StepDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StepDef {
    name: Option<String>,
    #[serde(default = "default_min_samples")]
    min_samples: usize,
    min_seconds: Option<f64>,
    max_seconds: Option<f64>,
    #[serde(default)]
    targets: BTreeMap<String, TargetDef>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TargetDef {
    Exact { value: f64 },
    Range { min: f64, max: f64 },
}

fn default_min_samples() -> usize {
    1
}

impl From<TargetDef> for TargetRange {
    fn from(def: TargetDef) -> Self {
        match def {
            TargetDef::Exact { value } => TargetRange::exact(value),
            TargetDef::Range { min, max } => TargetRange::new(min, max),
        }
    }
}

impl From<StepDef> for Step {
    fn from(def: StepDef) -> Self {
        Step {
            index: 0,
            name: def.name,
            duration: StepDuration {
                min_samples: def.min_samples,
                min_seconds: def.min_seconds,
                max_seconds: def.max_seconds,
            },
            targets: def
                .targets
                .into_iter()
                .map(|(channel, target)| (channel, target.into()))
                .collect(),
        }
    }
}

/// Recipes with unique names, in definition order
///
/// Catalogs are plain values handed to the aligner; nothing is cached
/// between runs.
#[derive(Debug, Clone, Default)]
pub struct RecipeCatalog {
    recipes: Vec<Recipe>,
    index: HashMap<String, usize>,
}

impl RecipeCatalog {
    /// Build a catalog, rejecting duplicate names
    pub fn new(recipes: Vec<Recipe>) -> Result<Self, RecipeError> {
        let mut index = HashMap::with_capacity(recipes.len());
        for (i, recipe) in recipes.iter().enumerate() {
            if index.insert(recipe.name().to_string(), i).is_some() {
                return Err(RecipeError::DuplicateRecipe(recipe.name().to_string()));
            }
        }
        Ok(Self { recipes, index })
    }

    /// A catalog with no recipes
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a catalog from TOML text
    ///
    /// ```rust
    /// use aja_tools::recipe::RecipeCatalog;
    ///
    /// let catalog = RecipeCatalog::from_toml_str(r#"
    ///     [[recipe]]
    ///     name = "Dep"
    ///
    ///     [[recipe.step]]
    ///     min_samples = 2
    ///     targets = { power = { min = 90.0, max = 110.0 } }
    /// "#)?;
    /// assert_eq!(catalog.get("Dep")?.steps().len(), 1);
    /// # Ok::<(), aja_tools::recipe::RecipeError>(())
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self, RecipeError> {
        let file: CatalogFile = toml::from_str(text)?;
        let recipes = file
            .recipes
            .into_iter()
            .map(|def| Recipe::new(def.name, def.steps.into_iter().map(Step::from).collect()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(recipes)
    }

    /// Load a catalog from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RecipeError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_toml_str(&text)?;
        info!(
            "Loaded {} recipes from {}",
            catalog.len(),
            path.as_ref().display()
        );
        Ok(catalog)
    }

    /// Look up a recipe by name
    pub fn get(&self, name: &str) -> Result<&Recipe, RecipeError> {
        self.index
            .get(name)
            .map(|&i| &self.recipes[i])
            .ok_or_else(|| RecipeError::RecipeNotFound(name.to_string()))
    }

    /// A catalog holding only the named recipes, in the order given
    ///
    /// Repeated names are kept once.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self, RecipeError> {
        let mut selected = Self::empty();
        for name in names.iter().map(AsRef::as_ref) {
            if selected.index.contains_key(name) {
                continue;
            }
            let recipe = self.get(name)?.clone();
            selected.index.insert(recipe.name().to_string(), selected.recipes.len());
            selected.recipes.push(recipe);
        }
        Ok(selected)
    }

    /// Recipes in definition order
    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter()
    }

    /// Recipe names in definition order
    pub fn names(&self) -> Vec<&str> {
        self.recipes.iter().map(Recipe::name).collect()
    }

    /// Number of recipes
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// True when the catalog holds no recipes
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
