//! # Align Module
//!
//! Matches stretches of a [`Timeline`] to the steps of recipes in a
//! [`RecipeCatalog`].
//!
//! ## Algorithm
//!
//! 1. For every step, mark the samples where each target channel is present
//!    and inside its range (widened by [`AlignConfig::range_margin`]).
//! 2. Join marked samples into runs, bridging gaps of up to
//!    [`AlignConfig::dropout_tolerance`] samples, and keep the runs that
//!    meet the step's minimum duration.
//! 3. Within a recipe, runs claim samples longest first. A run overlapping
//!    claimed samples keeps only its unclaimed pieces, trimmed to in-range
//!    end points. A piece over the step's maximum keeps its longest prefix
//!    that fits, and pieces under the minimum are dropped.
//! 4. Each recipe is scored by its longest chain of consecutive steps, each
//!    starting within the dropout tolerance of the previous one.
//! 5. Recipes claim the timeline in score order with the same clipping rule.
//!    Whatever is left is [`StepLabel::Unmatched`].
//!
//! ```rust
//! use aja_tools::align::{align, AlignConfig, StepLabel};
//! use aja_tools::recipe::{Recipe, RecipeCatalog, Step, TargetRange};
//! use aja_tools::timeline::Timeline;
//! use chrono::{NaiveDate, TimeDelta};
//!
//! let t0 = NaiveDate::from_ymd_opt(2017, 3, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let mut timeline = Timeline::with_channels(["power"]).unwrap();
//! for (i, power) in [100.0, 100.0, 0.0].into_iter().enumerate() {
//!     timeline.push_values(t0 + TimeDelta::seconds(i as i64), vec![Some(power)]).unwrap();
//! }
//!
//! let step = Step::new().target("power", TargetRange::new(90.0, 110.0)).min_samples(2);
//! let catalog = RecipeCatalog::new(vec![Recipe::new("Dep", vec![step]).unwrap()]).unwrap();
//!
//! let result = align(&timeline, &catalog, &AlignConfig::default()).unwrap();
//! assert_eq!(result.intervals.len(), 2);
//! assert_eq!(result.intervals[0].label, StepLabel::matched("Dep", 0));
//! assert_eq!(result.intervals[1].label, StepLabel::Unmatched);
//! ```

mod config;
mod error;
mod result;
mod runs;


use log::{debug, info};
use std::cmp::Reverse;

use crate::recipe::{Recipe, RecipeCatalog, RecipeError};
use crate::timeline::Timeline;

pub use config::{AlignConfig, DEFAULT_DROPOUT_TOLERANCE};
pub use error::AlignError;
pub use result::{AlignedInterval, AlignmentResult, RecipeScore, StepLabel};

use runs::{Segment, StepMask};

/// A recipe's steps resolved against the timeline, with its matches
struct RecipeMatches<'a> {
    recipe: &'a Recipe,
    masks: Vec<StepMask>,
    segments: Vec<Segment>,
    score: usize,
}

impl<'a> RecipeMatches<'a> {
    fn build(timeline: &Timeline, recipe: &'a Recipe, config: &AlignConfig) -> Result<Self, AlignError> {
        let masks = recipe
            .steps()
            .iter()
            .map(|step| {
                let targets = step
                    .targets
                    .iter()
                    .map(|(channel, range)| {
                        let id = timeline.channel(channel).map_err(|_| AlignError::UnknownChannel {
                            recipe: recipe.name().to_string(),
                            step: step.index,
                            channel: channel.clone(),
                        })?;
                        Ok((id, range.widened(config.range_margin)))
                    })
                    .collect::<Result<Vec<_>, AlignError>>()?;
                Ok(StepMask::build(timeline, step.index, step.duration, &targets))
            })
            .collect::<Result<Vec<_>, AlignError>>()?;

        let mut candidates: Vec<Segment> = masks
            .iter()
            .flat_map(|mask| mask.candidates(timeline, config.dropout_tolerance))
            .collect();
        candidates.sort_by_key(|s| (Reverse(s.len()), s.first, s.step));

        let mut claimed = vec![false; timeline.len()];
        let mut segments = Vec::new();
        for candidate in &candidates {
            for piece in masks[candidate.step].clip(timeline, candidate, &claimed) {
                claimed[piece.first..=piece.last].fill(true);
                segments.push(piece);
            }
        }
        segments.sort_by_key(|s| s.first);

        let score = chain_span(&segments, config.dropout_tolerance);
        debug!(
            "Recipe {}: {} segments, score {}",
            recipe.name(),
            segments.len(),
            score
        );
        Ok(Self {
            recipe,
            masks,
            segments,
            score,
        })
    }

    fn matched_samples(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }
}

/// Span in samples of the longest chain of consecutive steps
///
/// `segments` must be sorted by first sample and must not overlap. A segment
/// extends a chain when its step follows the chain's last step and it starts
/// at most `tolerance` samples after that step ends.
fn chain_span(segments: &[Segment], tolerance: usize) -> usize {
    let mut chain_start = Vec::with_capacity(segments.len());
    let mut best = 0;
    for (i, segment) in segments.iter().enumerate() {
        let start = segments[..i]
            .iter()
            .zip(&chain_start)
            .filter(|(prev, _)| {
                prev.step + 1 == segment.step
                    && prev.last < segment.first
                    && segment.first - prev.last - 1 <= tolerance
            })
            .map(|(_, &start)| start)
            .fold(segment.first, usize::min);
        chain_start.push(start);
        best = best.max(segment.last - start + 1);
    }
    best
}

/// Align a timeline against every recipe of a catalog
///
/// An empty catalog yields one unmatched interval over the whole timeline.
pub fn align(
    timeline: &Timeline,
    catalog: &RecipeCatalog,
    config: &AlignConfig,
) -> Result<AlignmentResult, AlignError> {
    if timeline.is_empty() {
        return Err(AlignError::EmptyInput);
    }
    config.validate()?;

    let mut ranked = catalog
        .iter()
        .map(|recipe| RecipeMatches::build(timeline, recipe, config))
        .collect::<Result<Vec<_>, _>>()?;
    // Stable sort keeps catalog order for full ties
    ranked.sort_by_key(|m| Reverse((m.score, m.matched_samples())));

    let mut owner: Vec<Option<(usize, usize)>> = vec![None; timeline.len()];
    let mut claimed = vec![false; timeline.len()];
    for (rank, matches) in ranked.iter().enumerate() {
        for segment in &matches.segments {
            for piece in matches.masks[segment.step].clip(timeline, segment, &claimed) {
                claimed[piece.first..=piece.last].fill(true);
                owner[piece.first..=piece.last].fill(Some((rank, piece.step)));
            }
        }
    }

    let intervals = merge_labels(timeline, &owner, &ranked);
    let recipe_scores = ranked
        .iter()
        .map(|m| RecipeScore {
            recipe: m.recipe.name().to_string(),
            score: m.score,
            matched_samples: m.matched_samples(),
        })
        .collect();

    let result = AlignmentResult {
        intervals,
        recipe_scores,
    };
    info!(
        "Aligned {} samples against {} recipes: {} intervals, {:.1}% coverage",
        timeline.len(),
        catalog.len(),
        result.intervals.len(),
        result.coverage() * 100.0
    );
    Ok(result)
}

/// Align a timeline against the named recipes of a catalog only
pub fn align_selected<S: AsRef<str>>(
    timeline: &Timeline,
    catalog: &RecipeCatalog,
    names: &[S],
    config: &AlignConfig,
) -> Result<AlignmentResult, AlignError> {
    let selected = catalog.select(names).map_err(|e| match e {
        RecipeError::RecipeNotFound(name) => AlignError::RecipeNotFound(name),
        other => other.into(),
    })?;
    align(timeline, &selected, config)
}

/// Collapse per-sample owners into labelled intervals
fn merge_labels(
    timeline: &Timeline,
    owner: &[Option<(usize, usize)>],
    ranked: &[RecipeMatches<'_>],
) -> Vec<AlignedInterval> {
    let label = |o: Option<(usize, usize)>| match o {
        Some((rank, step)) => StepLabel::matched(ranked[rank].recipe.name(), step),
        None => StepLabel::Unmatched,
    };

    let mut intervals = Vec::new();
    let mut first = 0;
    for i in 1..=owner.len() {
        if i == owner.len() || owner[i] != owner[first] {
            intervals.push(AlignedInterval {
                start: timeline.timestamp(first),
                end: timeline.timestamp(i - 1),
                first_sample: first,
                last_sample: i - 1,
                label: label(owner[first]),
            });
            first = i;
        }
    }
    intervals
}
