/// Errors that can occur while building or loading a recipe catalog
#[derive(Debug, thiserror::Error)]
pub enum RecipeError {
    /// I/O error reading the catalog file
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The catalog file is not valid TOML or does not match the layout
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Two recipes share a name
    #[error("Duplicate recipe name: {0}")]
    DuplicateRecipe(String),

    /// A recipe is unusable as a whole
    #[error("Invalid recipe '{recipe}': {message}")]
    InvalidRecipe {
        /// Recipe name
        recipe: String,
        /// What was wrong
        message: String,
    },

    /// A single step of a recipe is unusable
    #[error("Invalid step {step} of recipe '{recipe}': {message}")]
    InvalidStep {
        /// Recipe name
        recipe: String,
        /// Step index
        step: usize,
        /// What was wrong
        message: String,
    },

    /// A recipe was requested that the catalog does not hold
    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),
}
