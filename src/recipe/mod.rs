//! # Recipe Module
//!
//! Recipes describe what a deposition should look like in the logfile: an
//! ordered list of steps, each naming the channels it drives and the range
//! each must stay within, plus how long the step lasts.
//!
//! Catalogs are written in TOML:
//!
//! ```toml
//! [[recipe]]
//! name = "Au_250nm"
//!
//! [[recipe.step]]
//! name = "presputter"
//! min_seconds = 60.0
//! targets = { "RF#2 W Fwd" = { min = 95.0, max = 105.0 }, "RF#2 Shutter" = { value = 0.0 } }
//!
//! [[recipe.step]]
//! name = "deposit"
//! min_samples = 10
//! max_seconds = 1800.0
//! targets = { "RF#2 W Fwd" = { min = 95.0, max = 105.0 }, "RF#2 Shutter" = { value = 1.0 } }
//! ```
//!
//! A `value` target is shorthand for a range with equal bounds. Recipe names
//! are unique within a catalog.

mod catalog;
mod error;
mod types;

#[cfg(test)]
mod tests;

pub use catalog::RecipeCatalog;
pub use error::RecipeError;
pub use types::{Recipe, Step, StepDuration, TargetRange};
