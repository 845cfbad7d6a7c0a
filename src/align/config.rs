use serde::{Deserialize, Serialize};

use super::AlignError;

/// Default number of out-of-range samples bridged inside a match
pub const DEFAULT_DROPOUT_TOLERANCE: usize = 2;

/// Tolerances used by [`align`](super::align)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    /// Longest run of out-of-range samples bridged inside an interval
    pub dropout_tolerance: usize,
    /// Fraction of a range's largest bound added to both sides of the range
    pub range_margin: f64,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            dropout_tolerance: DEFAULT_DROPOUT_TOLERANCE,
            range_margin: 0.0,
        }
    }
}

impl AlignConfig {
    /// Set the dropout tolerance
    pub fn with_dropout_tolerance(mut self, samples: usize) -> Self {
        self.dropout_tolerance = samples;
        self
    }

    /// Set the range margin
    pub fn with_range_margin(mut self, margin: f64) -> Self {
        self.range_margin = margin;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), AlignError> {
        if !self.range_margin.is_finite() || self.range_margin < 0.0 {
            return Err(AlignError::InvalidConfig(format!(
                "range_margin must be a non-negative number, got {}",
                self.range_margin
            )));
        }
        Ok(())
    }
}
