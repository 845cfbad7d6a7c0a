//! Per-step sample masks and the runs found in them.

use crate::recipe::{StepDuration, TargetRange};
use crate::timeline::{ChannelId, Timeline};

/// Inclusive range of sample indices matched to one recipe step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Segment {
    pub step: usize,
    pub first: usize,
    pub last: usize,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }
}

/// A step resolved against a timeline: its in-range mask and duration limits
pub(crate) struct StepMask {
    pub step: usize,
    pub duration: StepDuration,
    pub in_range: Vec<bool>,
}

impl StepMask {
    /// Mark the samples where every target is present and inside its range
    pub fn build(
        timeline: &Timeline,
        step: usize,
        duration: StepDuration,
        targets: &[(ChannelId, TargetRange)],
    ) -> Self {
        let in_range = timeline
            .samples()
            .iter()
            .map(|sample| {
                targets
                    .iter()
                    .all(|(id, range)| sample.value(*id).is_some_and(|v| range.contains(v)))
            })
            .collect();
        Self {
            step,
            duration,
            in_range,
        }
    }

    /// Runs long enough for the step
    ///
    /// Runs longer than the step's maximum are kept whole here. Adjacent
    /// steps with the same targets share one run, and [`clip`](Self::clip)
    /// cuts it down once neighbouring steps have claimed their part.
    pub fn candidates(&self, timeline: &Timeline, tolerance: usize) -> Vec<Segment> {
        find_runs(&self.in_range, tolerance)
            .into_iter()
            .map(|(first, last)| Segment {
                step: self.step,
                first,
                last,
            })
            .filter(|s| self.fits(timeline, s))
            .collect()
    }

    fn fits(&self, timeline: &Timeline, segment: &Segment) -> bool {
        let seconds = timeline.seconds_between(segment.first, segment.last);
        self.duration.is_long_enough(segment.len(), seconds)
    }

    /// Longest prefix of `segment` within the maximum duration
    ///
    /// The prefix ends on an in-range sample; `segment.first` must be one.
    fn limit(&self, timeline: &Timeline, segment: Segment) -> Segment {
        let Some(max) = self.duration.max_seconds else {
            return segment;
        };
        let mut last = segment.first;
        for i in segment.first + 1..=segment.last {
            if timeline.seconds_between(segment.first, i) > max {
                break;
            }
            if self.in_range[i] {
                last = i;
            }
        }
        Segment { last, ..segment }
    }

    /// Pieces of `segment` not yet claimed, trimmed to in-range end points
    ///
    /// A piece longer than the maximum keeps its longest prefix that fits and
    /// leaves the rest unclaimed. Pieces below the minimum are dropped.
    pub fn clip(&self, timeline: &Timeline, segment: &Segment, claimed: &[bool]) -> Vec<Segment> {
        let mut pieces = Vec::new();
        let mut start = None;
        for i in segment.first..=segment.last + 1 {
            let free = i <= segment.last && !claimed[i];
            match (free, start) {
                (true, None) => start = Some(i),
                (false, Some(first)) => {
                    if let Some(piece) = self.trim(first, i - 1) {
                        let piece = self.limit(timeline, piece);
                        if self.fits(timeline, &piece) {
                            pieces.push(piece);
                        }
                    }
                    start = None;
                }
                _ => {}
            }
        }
        pieces
    }

    fn trim(&self, mut first: usize, mut last: usize) -> Option<Segment> {
        while first <= last && !self.in_range[first] {
            first += 1;
        }
        while last > first && !self.in_range[last] {
            last -= 1;
        }
        (first <= last && self.in_range[first]).then_some(Segment {
            step: self.step,
            first,
            last,
        })
    }
}

/// Maximal runs of `true` bridging gaps of at most `tolerance` samples
///
/// Every run starts and ends on a `true` sample.
pub(crate) fn find_runs(mask: &[bool], tolerance: usize) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut current: Option<(usize, usize)> = None;
    for (i, &hit) in mask.iter().enumerate() {
        if !hit {
            continue;
        }
        current = match current {
            Some((first, last)) if i - last - 1 <= tolerance => Some((first, i)),
            Some(run) => {
                runs.push(run);
                Some((i, i))
            }
            None => Some((i, i)),
        };
    }
    runs.extend(current);
    runs
}
