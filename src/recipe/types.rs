use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::RecipeError;

/// Closed interval a channel must stay within during a step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetRange {
    /// Lower bound (inclusive)
    pub min: f64,
    /// Upper bound (inclusive)
    pub max: f64,
}

impl TargetRange {
    /// Range between two bounds
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Range holding a single value
    pub fn exact(value: f64) -> Self {
        Self::new(value, value)
    }

    /// Whether `value` lies inside the range
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Range widened on both sides by `margin` times its largest magnitude
    pub fn widened(&self, margin: f64) -> Self {
        let slack = margin * self.min.abs().max(self.max.abs());
        Self::new(self.min - slack, self.max + slack)
    }

    /// Midpoint of the range
    pub fn midpoint(&self) -> f64 {
        self.min + (self.max - self.min) / 2.0
    }

    fn validate(&self) -> Result<(), String> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err("range bounds must be finite".to_string());
        }
        if self.min > self.max {
            return Err(format!("range min {} exceeds max {}", self.min, self.max));
        }
        Ok(())
    }
}

/// How long a step has to hold for an interval to count as that step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepDuration {
    /// Minimum number of samples
    pub min_samples: usize,
    /// Minimum time from first to last sample
    pub min_seconds: Option<f64>,
    /// Maximum time from first to last sample
    pub max_seconds: Option<f64>,
}

impl Default for StepDuration {
    fn default() -> Self {
        Self {
            min_samples: 1,
            min_seconds: None,
            max_seconds: None,
        }
    }
}

impl StepDuration {
    /// Whether an interval of `samples` samples spanning `seconds` is long enough
    pub fn is_long_enough(&self, samples: usize, seconds: f64) -> bool {
        samples >= self.min_samples && self.min_seconds.map_or(true, |min| seconds >= min)
    }

    /// Whether an interval spanning `seconds` is not too long
    pub fn is_short_enough(&self, seconds: f64) -> bool {
        self.max_seconds.map_or(true, |max| seconds <= max)
    }

    fn validate(&self) -> Result<(), String> {
        if self.min_samples == 0 {
            return Err("min_samples must be at least 1".to_string());
        }
        for bound in [self.min_seconds, self.max_seconds].into_iter().flatten() {
            if !bound.is_finite() || bound < 0.0 {
                return Err(format!("duration bound {} must be a non-negative number", bound));
            }
        }
        if let (Some(min), Some(max)) = (self.min_seconds, self.max_seconds) {
            if min > max {
                return Err(format!("min_seconds {} exceeds max_seconds {}", min, max));
            }
        }
        Ok(())
    }
}

/// One stage of a recipe
///
/// Built with chained setters; the index is assigned by [`Recipe::new`].
///
/// ```rust
/// use aja_tools::recipe::{Step, TargetRange};
///
/// let step = Step::new()
///     .named("deposit")
///     .target("RF#2 W Fwd", TargetRange::new(90.0, 110.0))
///     .min_samples(2);
/// assert_eq!(step.targets.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Position in the recipe, starting at 0
    pub index: usize,
    /// Optional display name
    pub name: Option<String>,
    /// Duration constraints
    pub duration: StepDuration,
    /// Channel name to required range
    pub targets: BTreeMap<String, TargetRange>,
}

impl Step {
    /// Create an empty step
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Require a channel to stay within a range
    pub fn target(mut self, channel: impl Into<String>, range: TargetRange) -> Self {
        self.targets.insert(channel.into(), range);
        self
    }

    /// Set the minimum number of samples
    pub fn min_samples(mut self, samples: usize) -> Self {
        self.duration.min_samples = samples;
        self
    }

    /// Set the minimum duration in seconds
    pub fn min_seconds(mut self, seconds: f64) -> Self {
        self.duration.min_seconds = Some(seconds);
        self
    }

    /// Set the maximum duration in seconds
    pub fn max_seconds(mut self, seconds: f64) -> Self {
        self.duration.max_seconds = Some(seconds);
        self
    }

    /// Display label: the name if set, otherwise `step <index>`
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("step {}", self.index))
    }

    fn validate(&self, recipe: &str) -> Result<(), RecipeError> {
        let invalid = |message: String| RecipeError::InvalidStep {
            recipe: recipe.to_string(),
            step: self.index,
            message,
        };
        if self.targets.is_empty() {
            return Err(invalid("step has no target channels".to_string()));
        }
        for (channel, range) in &self.targets {
            range
                .validate()
                .map_err(|m| invalid(format!("channel '{}': {}", channel, m)))?;
        }
        self.duration.validate().map_err(invalid)
    }
}

/// Named, ordered sequence of steps
///
/// Immutable once built; fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    name: String,
    steps: Vec<Step>,
}

impl Recipe {
    /// Build a recipe, numbering its steps in order and validating them
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Result<Self, RecipeError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(RecipeError::InvalidRecipe {
                recipe: name,
                message: "recipe name is empty".to_string(),
            });
        }
        if steps.is_empty() {
            return Err(RecipeError::InvalidRecipe {
                recipe: name,
                message: "recipe has no steps".to_string(),
            });
        }
        let steps: Vec<Step> = steps
            .into_iter()
            .enumerate()
            .map(|(index, step)| Step { index, ..step })
            .collect();
        for step in &steps {
            step.validate(&name)?;
        }
        Ok(Self { name, steps })
    }

    /// Recipe name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Steps in order
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Step at an index
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Every channel any step targets, deduplicated and sorted
    pub fn channels(&self) -> Vec<&str> {
        let mut channels: Vec<&str> = self
            .steps
            .iter()
            .flat_map(|s| s.targets.keys().map(String::as_str))
            .collect();
        channels.sort_unstable();
        channels.dedup();
        channels
    }
}
