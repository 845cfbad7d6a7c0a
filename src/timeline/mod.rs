//! # Timeline Module
//!
//! In-memory representation of a loaded logfile: a [`ChannelSet`] naming the
//! columns and a strictly time-ordered list of [`Sample`]s. Missing readings
//! are explicit `None` slots so every sample has the same width.
//!
//! Channels are addressed through [`ChannelId`] handles obtained from the
//! channel set. Asking for a name the logfile never declared is an error
//! rather than a silent default.
//!
//! ```rust
//! use aja_tools::timeline::Timeline;
//! use chrono::NaiveDate;
//!
//! let t0 = NaiveDate::from_ymd_opt(2017, 3, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let mut timeline = Timeline::with_channels(["RF#2 W", "C.M. Press."])?;
//! timeline.push_values(t0, vec![Some(100.0), Some(3.0)])?;
//!
//! let power = timeline.channel("RF#2 W")?;
//! assert_eq!(timeline.samples()[0].value(power), Some(100.0));
//! # Ok::<(), aja_tools::timeline::TimelineError>(())
//! ```

mod channel;
mod error;
mod types;


pub use channel::{source_of, ChannelId, ChannelKind, ChannelSet};
pub use error::TimelineError;
pub use types::{Sample, Timeline};
