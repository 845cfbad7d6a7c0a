//! # Logfile Module
//!
//! Loader for the tab-separated `.dlg` logfiles the AJA sputter tool writes
//! during a deposition. The first row names the columns; the first two
//! columns hold the date and the time of day and every further column is a
//! channel:
//!
//! ```text
//! Date        Time        Layer #  RF#2 Shutter  RF#2 W Fwd  Gas#1 Flow  C.M. Press.
//! 3/1/2017    9:00:00 AM  0        Closed        0           0           0.2
//! 3/1/2017    9:00:01 AM  1        Open          100.4       20.1        3.0
//! ```
//!
//! Valve and plasma states (`Open`/`Closed`, `ON`/`OFF`) load as 1.0/0.0 and
//! empty cells load as missing values, so every channel is numeric.
//!
//! ```rust,no_run
//! use aja_tools::logfile::{load_logfile, LogfileError};
//!
//! let timeline = load_logfile("Metals_03012017_090000.dlg")?;
//! println!("{} samples", timeline.len());
//! # Ok::<(), LogfileError>(())
//! ```

mod error;
mod index;
mod parse;
mod reader;


pub use error::LogfileError;
pub use index::{job_name_from_log, recipe_frequencies, LogEntry, LogIndex, LOGFILE_EXTENSION};
pub use reader::{load_logfile, read_start_time, DuplicateTimestamps, LoadOptions, LogfileReader};
