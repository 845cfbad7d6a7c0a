//! # Job Module
//!
//! AJA job files (`.ajp`) list the recipe steps a deposition runs. The layout
//! is an 8-byte preamble followed by step names, each closed by a 4-byte
//! terminator whose first byte is NUL:
//!
//! ```text
//! [preamble: 8 bytes][name][\0 x x x][name][\0 x x x]...[name]
//! ```
//!
//! The final name may be unterminated. The tool counts layers from zero with
//! an implicit first layer, so parsed jobs get a `Start` step at index 0 and
//! step `n` lines up with layer `n` of the logfile (see [`annotate_layers`]).

mod error;
mod layers;

#[cfg(test)]
mod tests;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::files::{file_stem, find_files, has_extension};

pub use error::JobError;
pub use layers::{annotate_layers, LayerSpan, LAYER_CHANNEL};

/// Length of the header that precedes the first step name
pub const PREAMBLE_LEN: usize = 8;

/// Length of the terminator following each step name
pub const TERMINATOR_LEN: usize = 4;

/// Name of the implicit first step of every job
pub const START_STEP: &str = "Start";

/// What a slice of a raw job file holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// File header
    Preamble,
    /// A step name
    Step,
    /// Separator between step names
    Terminator,
}

/// One slice of a raw job file, kept for inspecting damaged files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSegment {
    /// Byte offset in the file
    pub offset: usize,
    /// Raw bytes of the slice
    pub bytes: Vec<u8>,
    /// Role of the slice
    pub kind: SegmentKind,
}

impl JobSegment {
    fn new(offset: usize, bytes: &[u8], kind: SegmentKind) -> Self {
        Self {
            offset,
            bytes: bytes.to_vec(),
            kind,
        }
    }

    /// Step name for step segments whose first byte is not NUL
    pub fn step_name(&self) -> Option<String> {
        match (&self.kind, self.bytes.first()) {
            (SegmentKind::Step, Some(&first)) if first != 0 => {
                let name = String::from_utf8_lossy(&self.bytes).trim().to_string();
                (!name.is_empty()).then_some(name)
            }
            _ => None,
        }
    }
}

/// Split a raw job file into preamble, step and terminator segments
pub fn parse_segments(raw: &[u8]) -> Result<Vec<JobSegment>, JobError> {
    if raw.len() < PREAMBLE_LEN {
        return Err(JobError::InvalidFormat(format!(
            "{} bytes is shorter than the {} byte preamble",
            raw.len(),
            PREAMBLE_LEN
        )));
    }

    let mut segments = vec![JobSegment::new(0, &raw[..PREAMBLE_LEN], SegmentKind::Preamble)];
    let mut start = PREAMBLE_LEN;
    while start < raw.len() {
        // A name is at least one byte long, so the search skips `start`
        let next = raw[start + 1..]
            .iter()
            .position(|&b| b == 0)
            .map(|p| p + start + 1);
        match next {
            Some(next) => {
                let end = (next + TERMINATOR_LEN).min(raw.len());
                segments.push(JobSegment::new(start, &raw[start..next], SegmentKind::Step));
                segments.push(JobSegment::new(next, &raw[next..end], SegmentKind::Terminator));
                start = end;
            }
            None if raw.len() - start > 1 => {
                segments.push(JobSegment::new(start, &raw[start..], SegmentKind::Step));
                break;
            }
            None => {
                warn!("Job file may be corrupt, missing final recipe step");
                break;
            }
        }
    }
    Ok(segments)
}

/// A parsed job: its name and the ordered recipe steps it calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Job name, the file stem of the `.ajp` file
    pub name: String,
    /// Step names with [`START_STEP`] at index 0
    pub steps: Vec<String>,
}

impl Job {
    /// Parse a job from raw bytes
    pub fn from_bytes(name: impl Into<String>, raw: &[u8]) -> Result<Self, JobError> {
        let name = name.into();
        let mut steps = vec![START_STEP.to_string()];
        steps.extend(parse_segments(raw)?.iter().filter_map(JobSegment::step_name));
        if steps.len() == 1 {
            warn!("Job file may be corrupt, no recipe steps found: {}", name);
        }
        debug!("Parsed job {} with {} steps", name, steps.len() - 1);
        Ok(Self { name, steps })
    }

    /// Read and parse an `.ajp` file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, JobError> {
        let path = path.as_ref();
        if !has_extension(path, "ajp") {
            return Err(JobError::UnknownFileType(path.to_path_buf()));
        }
        let raw = fs::read(path)?;
        Self::from_bytes(file_stem(path), &raw)
    }

    /// Recipe steps without the implicit `Start`
    pub fn recipe_steps(&self) -> &[String] {
        self.steps.get(1..).unwrap_or_default()
    }

    /// Step name for a layer number
    pub fn step_for_layer(&self, layer: usize) -> Option<&str> {
        self.steps.get(layer).map(String::as_str)
    }
}

/// Jobs keyed by name
#[derive(Debug, Clone, Default)]
pub struct JobCatalog {
    jobs: BTreeMap<String, Job>,
}

impl JobCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every `.ajp` file below `dir`
    ///
    /// Files that fail to parse are logged and skipped.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, JobError> {
        let mut catalog = Self::new();
        for path in find_files(dir.as_ref(), "ajp")? {
            match Job::from_file(&path) {
                Ok(job) => catalog.insert(job),
                Err(e) => warn!("Unable to parse {}: {}", path.display(), e),
            }
        }
        Ok(catalog)
    }

    /// Add a job, replacing any job of the same name
    pub fn insert(&mut self, job: Job) {
        if let Some(old) = self.jobs.insert(job.name.clone(), job) {
            warn!("Job {} defined more than once; keeping the last one", old.name);
        }
    }

    /// Look up a job by name
    pub fn get(&self, name: &str) -> Option<&Job> {
        self.jobs.get(name)
    }

    /// Iterate over jobs in name order
    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values()
    }

    /// Number of jobs
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// True when the catalog holds no jobs
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// A known recipe name found inside a raw job file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeMatch {
    /// Byte offset of the match
    pub offset: usize,
    /// Matched recipe name
    pub name: String,
}

/// Find known recipe names inside raw job text, in file order
///
/// Every occurrence of every name is a candidate, including occurrences that
/// overlap another occurrence of the same name. At each position the longest
/// known name wins, and candidates overlapping an earlier match are skipped,
/// so `Au_thick` is not also reported as `Au`.
pub fn find_recipe_names<S: AsRef<str>>(raw: &str, known: &[S]) -> Vec<RecipeMatch> {
    let mut candidates: Vec<(usize, &str)> = known
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| !name.is_empty())
        .flat_map(|name| occurrences(raw, name).map(move |offset| (offset, name)))
        .collect();
    candidates.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.len().cmp(&a.1.len())));

    let mut matches = Vec::new();
    let mut covered_to = 0;
    for (offset, name) in candidates {
        if offset < covered_to {
            continue;
        }
        covered_to = offset + name.len();
        matches.push(RecipeMatch {
            offset,
            name: name.to_string(),
        });
    }
    matches
}

/// Byte offsets of `name` in `raw`, overlapping ones included
fn occurrences<'a>(raw: &'a str, name: &'a str) -> impl Iterator<Item = usize> + 'a {
    let step = name.chars().next().map_or(1, char::len_utf8);
    let mut from = 0;
    std::iter::from_fn(move || {
        let offset = from + raw.get(from..)?.find(name)?;
        from = offset + step;
        Some(offset)
    })
}

/// Names of the `.rcp` recipe files directly inside `dir`, sorted
pub fn recipe_names_in_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<String>, JobError> {
    let mut names = Vec::new();
    for entry in dir.as_ref().read_dir()? {
        let path = entry?.path();
        if path.is_file() && has_extension(&path, "rcp") {
            names.push(file_stem(&path));
        }
    }
    names.sort();
    Ok(names)
}

/// Recipe steps of a job file, found by matching the recipe folder's names
///
/// Works on job files whose binary layout is damaged, since it only needs
/// the recipe names to appear somewhere in the file.
pub fn recipe_steps_from_folder<P: AsRef<Path>, Q: AsRef<Path>>(
    job_path: P,
    recipe_dir: Q,
) -> Result<Vec<String>, JobError> {
    let raw = fs::read(job_path.as_ref())?;
    let text = String::from_utf8_lossy(&raw);
    let known = recipe_names_in_dir(recipe_dir)?;
    Ok(find_recipe_names(&text, &known)
        .into_iter()
        .map(|m| m.name)
        .collect())
}
