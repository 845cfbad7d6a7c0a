/// Errors that can occur while loading an AJA logfile
#[derive(Debug, thiserror::Error)]
pub enum LogfileError {
    /// I/O error reading the logfile
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Low-level TSV error from the csv reader
    #[error("TSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// Structurally malformed logfile
    #[error("Parse error at line {line}: {message}")]
    ParseError {
        /// 1-based line number in the file (the header is line 1)
        line: u64,
        /// What was wrong
        message: String,
    },

    /// The logfile parsed but held no samples
    #[error("Logfile contains no samples")]
    EmptyInput,
}

impl LogfileError {
    pub(crate) fn parse(line: u64, message: impl Into<String>) -> Self {
        LogfileError::ParseError {
            line,
            message: message.into(),
        }
    }
}
