use chrono::NaiveDateTime;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::files::{file_stem, find_files};
use crate::job::JobCatalog;

use super::{read_start_time, LogfileError};

/// Extension of AJA logfiles
pub const LOGFILE_EXTENSION: &str = "dlg";

/// Job name encoded in a logfile's name
///
/// The tool names logs `<job>_<date>_<time>.dlg`, so the last two
/// underscore-separated parts are dropped. Names with fewer parts are
/// returned whole.
pub fn job_name_from_log(path: &Path) -> String {
    let stem = file_stem(path);
    let parts: Vec<&str> = stem.split('_').collect();
    if parts.len() > 2 {
        parts[..parts.len() - 2].join("_")
    } else {
        stem
    }
}

/// One logfile found while indexing a directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Job that produced the log
    pub job: String,
    /// Timestamp of the first sample
    pub started: NaiveDateTime,
    /// Location of the logfile
    pub path: PathBuf,
    /// Steps of the job, when the job file was found
    pub recipe: Option<Vec<String>>,
}

/// Logfiles of a directory tree, newest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogIndex {
    /// Indexed logs, sorted by start time descending
    pub entries: Vec<LogEntry>,
}

impl LogIndex {
    /// Index every `.dlg` file below `dir`, attaching job steps from `jobs`
    ///
    /// Logs whose first sample cannot be read are logged and skipped.
    pub fn build<P: AsRef<Path>>(dir: P, jobs: &JobCatalog) -> Result<Self, LogfileError> {
        let paths = find_files(dir.as_ref(), LOGFILE_EXTENSION)?;
        info!("Indexing {} logfiles in {}", paths.len(), dir.as_ref().display());

        #[cfg(feature = "parallel")]
        let starts: Vec<(PathBuf, Result<NaiveDateTime, LogfileError>)> = paths
            .into_par_iter()
            .map(|p| {
                let started = read_start_time(&p);
                (p, started)
            })
            .collect();

        #[cfg(not(feature = "parallel"))]
        let starts: Vec<(PathBuf, Result<NaiveDateTime, LogfileError>)> = paths
            .into_iter()
            .map(|p| {
                let started = read_start_time(&p);
                (p, started)
            })
            .collect();

        let mut entries = Vec::with_capacity(starts.len());
        for (path, started) in starts {
            match started {
                Ok(started) => {
                    let job = job_name_from_log(&path);
                    let recipe = jobs.get(&job).map(|j| j.steps.clone());
                    entries.push(LogEntry {
                        job,
                        started,
                        path,
                        recipe,
                    });
                }
                Err(e) => warn!("Could not parse {}: {}", path.display(), e),
            }
        }

        entries.sort_by(|a, b| b.started.cmp(&a.started).then_with(|| a.path.cmp(&b.path)));
        Ok(Self { entries })
    }

    /// Number of indexed logs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no logs were indexed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// How often each recipe occurs across the logs' job steps
///
/// Sorted by count, most frequent first; equal counts keep the order of
/// `recipes`.
pub fn recipe_frequencies<S: AsRef<str>>(recipes: &[S], entries: &[LogEntry]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = recipes
        .iter()
        .map(|recipe| {
            let recipe = recipe.as_ref();
            let count = entries
                .iter()
                .filter_map(|e| e.recipe.as_ref())
                .map(|steps| steps.iter().filter(|s| s.as_str() == recipe).count())
                .sum();
            (recipe.to_string(), count)
        })
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
