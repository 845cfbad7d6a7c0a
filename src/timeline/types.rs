use chrono::NaiveDateTime;

use super::channel::{ChannelId, ChannelSet};
use super::TimelineError;

/// One row of a logfile: a timestamp and one value slot per channel
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Wall-clock time the tool recorded for this row
    pub timestamp: NaiveDateTime,
    values: Vec<Option<f64>>,
}

impl Sample {
    /// Create a sample; `values` must follow the channel order of its timeline
    pub fn new(timestamp: NaiveDateTime, values: Vec<Option<f64>>) -> Self {
        Self { timestamp, values }
    }

    /// Value of a channel, `None` when the tool logged nothing
    pub fn value(&self, channel: ChannelId) -> Option<f64> {
        self.values.get(channel.0).copied().flatten()
    }

    /// All value slots in channel order
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }
}

/// Time-indexed table of channel samples
///
/// Timestamps are strictly increasing and every sample has exactly one slot
/// per declared channel. Both are enforced by [`Timeline::push`].
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    channels: ChannelSet,
    samples: Vec<Sample>,
}

impl Timeline {
    /// Create an empty timeline over a channel set
    pub fn new(channels: ChannelSet) -> Self {
        Self {
            channels,
            samples: Vec::new(),
        }
    }

    /// Create an empty timeline from channel names
    pub fn with_channels<I, S>(names: I) -> Result<Self, TimelineError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::new(ChannelSet::new(names)?))
    }

    /// Append a sample, checking width and timestamp order
    pub fn push(&mut self, sample: Sample) -> Result<(), TimelineError> {
        if sample.values.len() != self.channels.len() {
            return Err(TimelineError::WidthMismatch {
                expected: self.channels.len(),
                found: sample.values.len(),
            });
        }
        if let Some(last) = self.samples.last() {
            if sample.timestamp <= last.timestamp {
                return Err(TimelineError::NonIncreasingTimestamp {
                    index: self.samples.len(),
                    previous: last.timestamp,
                    found: sample.timestamp,
                });
            }
        }
        self.samples.push(sample);
        Ok(())
    }

    /// Append a sample built from a timestamp and values
    pub fn push_values(
        &mut self,
        timestamp: NaiveDateTime,
        values: Vec<Option<f64>>,
    ) -> Result<(), TimelineError> {
        self.push(Sample::new(timestamp, values))
    }

    /// Declared channels
    pub fn channels(&self) -> &ChannelSet {
        &self.channels
    }

    /// Look up a channel by name
    pub fn channel(&self, name: &str) -> Result<ChannelId, TimelineError> {
        self.channels.id(name)
    }

    /// All samples in time order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Sample at an index
    pub fn sample(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    /// Timestamp of the sample at `index`
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn timestamp(&self, index: usize) -> NaiveDateTime {
        self.samples[index].timestamp
    }

    /// Values of one channel over time
    pub fn channel_values(&self, channel: ChannelId) -> impl Iterator<Item = Option<f64>> + '_ {
        self.samples.iter().map(move |s| s.value(channel))
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the timeline holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// First and last timestamp, `None` for an empty timeline
    pub fn time_span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        Some((self.samples.first()?.timestamp, self.samples.last()?.timestamp))
    }

    /// Seconds elapsed between two sample indices
    ///
    /// Negative when `last` comes before `first`.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    pub fn seconds_between(&self, first: usize, last: usize) -> f64 {
        let delta = self.samples[last].timestamp - self.samples[first].timestamp;
        delta.num_milliseconds() as f64 / 1000.0
    }

    /// Channels that are non-zero in at least one sample
    ///
    /// Columns the tool logs but never drives (unused guns, empty gas lines)
    /// are all zero or empty and are left out.
    pub fn active_channels(&self) -> Vec<ChannelId> {
        self.channels
            .iter()
            .map(|(id, _)| id)
            .filter(|&id| self.channel_values(id).flatten().any(|v| v != 0.0))
            .collect()
    }
}
