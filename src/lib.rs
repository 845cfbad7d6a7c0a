//! # aja-tools - AJA Sputter Logfile Tools
//!
//! `aja_tools` loads the tab-separated logfiles written by AJA sputter
//! deposition systems and works out which recipe steps ran when.
//!
//! ## Key Features
//!
//! - **Logfile loading**: `.dlg` files become a [`Timeline`](timeline::Timeline)
//!   of strictly time-ordered samples, one value slot per channel.
//!
//! - **Recipe alignment**: match stretches of the timeline to the steps of
//!   recipes described in a TOML catalog, tolerating short dropouts.
//!
//! - **Job files**: read the step list of `.ajp` job files and map it onto the
//!   logfile's `Layer #` channel.
//!
//! - **Log index**: scan a folder of logs, newest first, with each log's job
//!   steps attached.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use aja_tools::align::{align, AlignConfig};
//! use aja_tools::logfile::load_logfile;
//! use aja_tools::recipe::RecipeCatalog;
//!
//! let timeline = load_logfile("Metals_03012017_090000.dlg")?;
//! let catalog = RecipeCatalog::from_file("recipes.toml")?;
//! let result = align(&timeline, &catalog, &AlignConfig::default())?;
//!
//! for interval in result.matched() {
//!     println!("{} .. {}: {}", interval.start, interval.end, interval.label);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`timeline`]: channels, samples and the in-memory timeline
//! - [`logfile`]: `.dlg` loader and the log index
//! - [`recipe`]: recipes, steps and the TOML catalog
//! - [`align`]: the recipe aligner and its result type
//! - [`job`]: `.ajp` job files and layer annotation

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod align;
pub mod job;
pub mod logfile;
pub mod recipe;
pub mod timeline;

mod files;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::align::{
        align, align_selected, AlignConfig, AlignError, AlignedInterval, AlignmentResult,
        RecipeScore, StepLabel,
    };
    pub use crate::job::{annotate_layers, Job, JobCatalog, JobError, LayerSpan};
    pub use crate::logfile::{load_logfile, LoadOptions, LogIndex, LogfileError, LogfileReader};
    pub use crate::recipe::{Recipe, RecipeCatalog, RecipeError, Step, StepDuration, TargetRange};
    pub use crate::timeline::{ChannelId, ChannelKind, ChannelSet, Sample, Timeline, TimelineError};
}
