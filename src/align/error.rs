use crate::recipe::RecipeError;

/// Errors raised while aligning recipes against a timeline
#[derive(Debug, thiserror::Error)]
pub enum AlignError {
    /// The timeline holds no samples
    #[error("Timeline contains no samples")]
    EmptyInput,

    /// A recipe step targets a channel the timeline does not declare
    #[error("Recipe '{recipe}' step {step} targets unknown channel '{channel}'")]
    UnknownChannel {
        /// Recipe name
        recipe: String,
        /// Step index within the recipe
        step: usize,
        /// Channel name as written in the recipe
        channel: String,
    },

    /// A selected recipe name is not in the catalog
    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),

    /// Any other catalog error
    #[error(transparent)]
    Recipe(#[from] RecipeError),

    /// Alignment settings out of range
    #[error("Invalid alignment config: {0}")]
    InvalidConfig(String),

    /// I/O error while exporting a result
    #[error("Failed to write output: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON export error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// CSV export error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}
