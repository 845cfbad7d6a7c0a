use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::TimelineError;

/// Index of a channel inside a [`ChannelSet`]
///
/// Only obtainable through [`ChannelSet::id`], so holding one means the name
/// was validated against the set it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(pub(crate) usize);

impl ChannelId {
    /// Position of the channel in the declared column order
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Ordered, duplicate-free set of channel names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelSet {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl ChannelSet {
    /// Build a channel set, rejecting empty and duplicate names
    pub fn new<I, S>(names: I) -> Result<Self, TimelineError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = ChannelSet::default();
        for (column, name) in names.into_iter().enumerate() {
            let name: String = name.into().trim().to_string();
            if name.is_empty() {
                return Err(TimelineError::EmptyChannelName(column));
            }
            if set.index.contains_key(&name) {
                return Err(TimelineError::DuplicateChannel(name));
            }
            set.index.insert(name.clone(), set.names.len());
            set.names.push(name);
        }
        Ok(set)
    }

    /// Look up a channel by exact name
    pub fn id(&self, name: &str) -> Result<ChannelId, TimelineError> {
        self.index
            .get(name)
            .map(|&i| ChannelId(i))
            .ok_or_else(|| TimelineError::UnknownChannel(name.to_string()))
    }

    /// Look up a channel ignoring ASCII case and surrounding whitespace
    pub fn find_ignore_case(&self, name: &str) -> Option<ChannelId> {
        let wanted = name.trim();
        self.names
            .iter()
            .position(|n| n.eq_ignore_ascii_case(wanted))
            .map(ChannelId)
    }

    /// Name of a channel
    ///
    /// # Panics
    /// Panics if `id` was resolved against a larger channel set.
    pub fn name(&self, id: ChannelId) -> &str {
        &self.names[id.0]
    }

    /// Whether a channel with this exact name exists
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Channel names in column order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Iterate over `(id, name)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (ChannelId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, n)| (ChannelId(i), n.as_str()))
    }

    /// Number of channels
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when no channels are declared
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// What an AJA logfile column measures, derived from its header text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Source shutter state (0 closed, 1 open)
    Shutter,
    /// Plasma on/off state
    Plasma,
    /// Source voltage
    Voltage,
    /// Source current
    Current,
    /// Source power
    Power,
    /// RF DC self-bias
    DcBias,
    /// Mass flow controller reading
    GasFlow,
    /// Chamber pressure
    Pressure,
    /// Substrate temperature
    SubstrateTemperature,
    /// Substrate rotation
    SubstrateRotation,
    /// The tool's layer counter
    Layer,
    /// Anything else
    Other,
}

impl ChannelKind {
    /// Classify a channel from its header text
    pub fn classify(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.starts_with("layer #") {
            return ChannelKind::Layer;
        }
        if name.contains("Shutter") {
            return ChannelKind::Shutter;
        }
        if name.contains("Plasma") {
            return ChannelKind::Plasma;
        }
        if name.contains("Gas") {
            return ChannelKind::GasFlow;
        }
        if name.contains("Press") {
            return ChannelKind::Pressure;
        }
        if name.contains("Sub. Temp") {
            return ChannelKind::SubstrateTemperature;
        }
        if name.contains("Sub. Rot") {
            return ChannelKind::SubstrateRotation;
        }
        if name.contains("DC Bias") {
            return ChannelKind::DcBias;
        }
        if source_of(name).is_some() {
            for token in name.split_whitespace().skip(1) {
                match token {
                    "V" => return ChannelKind::Voltage,
                    "mA" => return ChannelKind::Current,
                    "W" => return ChannelKind::Power,
                    _ => {}
                }
            }
        }
        ChannelKind::Other
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChannelKind::Shutter => "shutter",
            ChannelKind::Plasma => "plasma",
            ChannelKind::Voltage => "voltage",
            ChannelKind::Current => "current",
            ChannelKind::Power => "power",
            ChannelKind::DcBias => "dc bias",
            ChannelKind::GasFlow => "gas flow",
            ChannelKind::Pressure => "pressure",
            ChannelKind::SubstrateTemperature => "substrate temperature",
            ChannelKind::SubstrateRotation => "substrate rotation",
            ChannelKind::Layer => "layer",
            ChannelKind::Other => "other",
        };
        f.write_str(s)
    }
}

/// The sputter source or gas line a channel belongs to, e.g. `RF#2` or `Gas#1`
///
/// Returns `None` for chamber-wide channels such as pressure or rotation.
pub fn source_of(name: &str) -> Option<&str> {
    let first = name.split_whitespace().next()?;
    if ["RF#", "DC#", "Gas#"]
        .iter()
        .any(|p| first.strip_prefix(p).is_some_and(|rest| !rest.is_empty()))
    {
        Some(first)
    } else {
        None
    }
}
