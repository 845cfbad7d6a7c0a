use std::path::PathBuf;

use crate::timeline::TimelineError;

/// Errors that can occur while reading job files or annotating layers
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    /// I/O error reading a job file or recipe folder
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The path does not carry the `.ajp` extension
    #[error("Unknown filetype: {0:?}")]
    UnknownFileType(PathBuf),

    /// The job file is too short or otherwise unreadable
    #[error("Invalid job file: {0}")]
    InvalidFormat(String),

    /// The timeline lacks a channel the operation needs
    #[error("Timeline error: {0}")]
    TimelineError(#[from] TimelineError),
}
