use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;

#[cfg(feature = "colorized_output")]
use console::style;

use super::AlignError;

/// What an interval of the timeline was matched to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepLabel {
    /// A step of a recipe
    Matched {
        /// Recipe name
        recipe: String,
        /// Step index within the recipe
        step: usize,
    },
    /// No recipe step claimed these samples
    Unmatched,
}

impl StepLabel {
    /// Label for a recipe step
    pub fn matched(recipe: impl Into<String>, step: usize) -> Self {
        StepLabel::Matched {
            recipe: recipe.into(),
            step,
        }
    }

    /// True for [`StepLabel::Matched`]
    pub fn is_matched(&self) -> bool {
        matches!(self, StepLabel::Matched { .. })
    }

    /// Recipe name of a matched label
    pub fn recipe(&self) -> Option<&str> {
        match self {
            StepLabel::Matched { recipe, .. } => Some(recipe),
            StepLabel::Unmatched => None,
        }
    }
}

impl fmt::Display for StepLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepLabel::Matched { recipe, step } => write!(f, "{} / step {}", recipe, step),
            StepLabel::Unmatched => write!(f, "unmatched"),
        }
    }
}

/// A contiguous stretch of samples sharing one label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedInterval {
    /// Timestamp of the first sample
    pub start: NaiveDateTime,
    /// Timestamp of the last sample
    pub end: NaiveDateTime,
    /// Index of the first sample
    pub first_sample: usize,
    /// Index of the last sample (inclusive)
    pub last_sample: usize,
    /// What the samples were matched to
    pub label: StepLabel,
}

impl AlignedInterval {
    /// Number of samples in the interval
    pub fn sample_count(&self) -> usize {
        self.last_sample - self.first_sample + 1
    }

    /// Seconds from the first to the last sample
    pub fn seconds(&self) -> f64 {
        (self.end - self.start).num_milliseconds() as f64 / 1000.0
    }

    /// Whether the interval holds sample `index`
    pub fn contains_sample(&self, index: usize) -> bool {
        index >= self.first_sample && index <= self.last_sample
    }
}

/// How well one recipe matched, and its rank among the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeScore {
    /// Recipe name
    pub recipe: String,
    /// Span in samples of the recipe's longest chain of consecutive steps
    pub score: usize,
    /// Samples matched to any step of the recipe before cross-recipe claiming
    pub matched_samples: usize,
}

/// Flat CSV row, one per interval
#[derive(Serialize)]
struct CsvRow<'a> {
    start: NaiveDateTime,
    end: NaiveDateTime,
    first_sample: usize,
    last_sample: usize,
    recipe: Option<&'a str>,
    step: Option<usize>,
    seconds: f64,
}

/// Outcome of aligning a timeline against a recipe catalog
///
/// Intervals are ordered, gap-free and non-overlapping, covering every
/// sample of the timeline. Scores are listed in the order recipes claimed
/// the timeline, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResult {
    /// Labelled intervals in time order
    pub intervals: Vec<AlignedInterval>,
    /// Per-recipe scores, best first
    pub recipe_scores: Vec<RecipeScore>,
}

impl AlignmentResult {
    /// Total number of samples covered
    pub fn sample_count(&self) -> usize {
        self.intervals.iter().map(AlignedInterval::sample_count).sum()
    }

    /// Number of samples matched to some step
    pub fn matched_sample_count(&self) -> usize {
        self.matched().map(AlignedInterval::sample_count).sum()
    }

    /// Fraction of samples matched to some step, 0.0 to 1.0
    pub fn coverage(&self) -> f64 {
        match self.sample_count() {
            0 => 0.0,
            total => self.matched_sample_count() as f64 / total as f64,
        }
    }

    /// Matched intervals
    pub fn matched(&self) -> impl Iterator<Item = &AlignedInterval> {
        self.intervals.iter().filter(|i| i.label.is_matched())
    }

    /// Unmatched intervals
    pub fn unmatched(&self) -> impl Iterator<Item = &AlignedInterval> {
        self.intervals.iter().filter(|i| !i.label.is_matched())
    }

    /// Intervals matched to steps of one recipe
    pub fn recipe_intervals<'a>(&'a self, recipe: &'a str) -> impl Iterator<Item = &'a AlignedInterval> {
        self.intervals
            .iter()
            .filter(move |i| i.label.recipe() == Some(recipe))
    }

    /// Label of the sample at `index`
    pub fn label_at(&self, index: usize) -> Option<&StepLabel> {
        let pos = self
            .intervals
            .partition_point(|i| i.last_sample < index);
        self.intervals
            .get(pos)
            .filter(|i| i.contains_sample(index))
            .map(|i| &i.label)
    }

    /// Write the result as pretty-printed JSON
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), AlignError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Write one CSV row per interval
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), AlignError> {
        let mut csv = csv::Writer::from_writer(writer);
        for interval in &self.intervals {
            let (recipe, step) = match &interval.label {
                StepLabel::Matched { recipe, step } => (Some(recipe.as_str()), Some(*step)),
                StepLabel::Unmatched => (None, None),
            };
            csv.serialize(CsvRow {
                start: interval.start,
                end: interval.end,
                first_sample: interval.first_sample,
                last_sample: interval.last_sample,
                recipe,
                step,
                seconds: interval.seconds(),
            })?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Format the result with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let mut output = String::new();

            output.push_str(&format!("{}\n", style("Alignment Report").bold().cyan()));
            output.push_str(&format!("{}\n", style("================").cyan()));

            for interval in &self.intervals {
                let label = match &interval.label {
                    StepLabel::Matched { .. } => style(interval.label.to_string()).green(),
                    StepLabel::Unmatched => style(interval.label.to_string()).dim(),
                };
                output.push_str(&format!(
                    "{} .. {}  [{:>6} samples]  {}\n",
                    interval.start, interval.end, interval.sample_count(), label
                ));
            }

            output.push('\n');
            output.push_str(&format!("{}\n", style("Recipes").bold()));
            for score in &self.recipe_scores {
                let name = if score.score > 0 {
                    style(score.recipe.as_str()).green()
                } else {
                    style(score.recipe.as_str()).red()
                };
                output.push_str(&format!(
                    "  {}: score {}, {} samples\n",
                    name, score.score, score.matched_samples
                ));
            }

            output.push('\n');
            output.push_str(&format!(
                "{}: {} intervals, {}% coverage\n",
                style("Summary").bold(),
                self.intervals.len(),
                style(format!("{:.1}", self.coverage() * 100.0)).yellow()
            ));
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for AlignmentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Alignment Report")?;
        writeln!(f, "================")?;
        for interval in &self.intervals {
            writeln!(
                f,
                "{} .. {}  [{:>6} samples]  {}",
                interval.start,
                interval.end,
                interval.sample_count(),
                interval.label
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Recipes")?;
        for score in &self.recipe_scores {
            writeln!(
                f,
                "  {}: score {}, {} samples",
                score.recipe, score.score, score.matched_samples
            )?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "Summary: {} intervals, {:.1}% coverage",
            self.intervals.len(),
            self.coverage() * 100.0
        )
    }
}
