//! Tolerance profiles for common logging conditions.
//!
//! Profiles set how forgiving the aligner is, without having to know the
//! individual tolerances.

use std::fmt;
use std::str::FromStr;

use aja_tools::align::AlignConfig;

/// Alignment tolerance profiles
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Profile {
    /// Every sample must be in range.
    ///
    /// - Dropout tolerance: 0 samples
    /// - Range margin: 0%
    Strict,

    /// Bridge short glitches (default).
    ///
    /// - Dropout tolerance: 2 samples
    /// - Range margin: 0%
    #[default]
    Balanced,

    /// Noisy sources or slow logging.
    ///
    /// - Dropout tolerance: 5 samples
    /// - Range margin: 2%
    Lenient,
}

impl Profile {
    /// Returns the number of out-of-range samples bridged inside a match.
    pub fn dropout_tolerance(&self) -> usize {
        match self {
            Profile::Strict => 0,
            Profile::Balanced => 2,
            Profile::Lenient => 5,
        }
    }

    /// Returns the fraction by which target ranges are widened.
    pub fn range_margin(&self) -> f64 {
        match self {
            Profile::Strict | Profile::Balanced => 0.0,
            Profile::Lenient => 0.02,
        }
    }

    /// Returns the aligner settings for this profile.
    pub fn align_config(&self) -> AlignConfig {
        AlignConfig {
            dropout_tolerance: self.dropout_tolerance(),
            range_margin: self.range_margin(),
        }
    }

    /// Returns all available profile names.
    pub fn variants() -> &'static [&'static str] {
        &["strict", "balanced", "lenient"]
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Strict => write!(f, "strict"),
            Profile::Balanced => write!(f, "balanced"),
            Profile::Lenient => write!(f, "lenient"),
        }
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(Profile::Strict),
            "balanced" | "default" => Ok(Profile::Balanced),
            "lenient" | "loose" => Ok(Profile::Lenient),
            _ => Err(format!(
                "Unknown profile '{}'. Valid options: {}",
                s,
                Profile::variants().join(", ")
            )),
        }
    }
}
