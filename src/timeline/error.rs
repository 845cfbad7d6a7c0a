use chrono::NaiveDateTime;

/// Errors raised while building or querying a [`Timeline`](super::Timeline)
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimelineError {
    /// A channel name was requested that the timeline does not declare
    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    /// The same channel name was declared twice
    #[error("Duplicate channel name: {0}")]
    DuplicateChannel(String),

    /// A channel name was empty after trimming
    #[error("Empty channel name at column {0}")]
    EmptyChannelName(usize),

    /// A sample did not carry exactly one slot per channel
    #[error("Sample has {found} values, timeline declares {expected} channels")]
    WidthMismatch {
        /// Number of declared channels
        expected: usize,
        /// Number of values in the offending sample
        found: usize,
    },

    /// A sample timestamp did not advance past the previous one
    #[error("Timestamp {found} at sample {index} does not follow {previous}")]
    NonIncreasingTimestamp {
        /// Index the sample would have taken
        index: usize,
        /// Timestamp of the last accepted sample
        previous: NaiveDateTime,
        /// Offending timestamp
        found: NaiveDateTime,
    },
}
