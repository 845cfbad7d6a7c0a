use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::timeline::{Timeline, TimelineError};

use super::{Job, JobError};

/// Header of the channel holding the tool's layer counter
///
/// Older firmware writes it lowercase, so lookups ignore case.
pub const LAYER_CHANNEL: &str = "Layer #";

/// Contiguous samples logged while the tool reported one layer number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpan {
    /// Layer number, `None` where the counter was empty or not an integer
    pub layer: Option<usize>,
    /// Job step for this layer, `None` past the end of the job
    pub step: Option<String>,
    /// Index of the first sample in the span
    pub first_sample: usize,
    /// Index of the last sample in the span
    pub last_sample: usize,
    /// Timestamp of the first sample
    pub start: NaiveDateTime,
    /// Timestamp of the last sample
    pub end: NaiveDateTime,
}

fn layer_number(value: Option<f64>) -> Option<usize> {
    value
        .filter(|v| *v >= 0.0 && v.fract() == 0.0)
        .map(|v| v as usize)
}

/// Split a timeline into layers and name each one after its job step
pub fn annotate_layers(timeline: &Timeline, job: &Job) -> Result<Vec<LayerSpan>, JobError> {
    let channel = timeline
        .channels()
        .find_ignore_case(LAYER_CHANNEL)
        .ok_or_else(|| TimelineError::UnknownChannel(LAYER_CHANNEL.to_string()))?;

    let mut spans: Vec<LayerSpan> = Vec::new();
    for (index, sample) in timeline.samples().iter().enumerate() {
        let layer = layer_number(sample.value(channel));
        match spans.last_mut() {
            Some(span) if span.layer == layer => {
                span.last_sample = index;
                span.end = sample.timestamp;
            }
            _ => spans.push(LayerSpan {
                layer,
                step: layer.and_then(|l| job.step_for_layer(l)).map(str::to_string),
                first_sample: index,
                last_sample: index,
                start: sample.timestamp,
                end: sample.timestamp,
            }),
        }
    }
    Ok(spans)
}
