use chrono::NaiveDateTime;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::timeline::{ChannelSet, Timeline};

use super::parse::{parse_timestamp, parse_value};
use super::LogfileError;

/// Leading columns before the channels: date, then time of day
const TIMESTAMP_COLUMNS: usize = 2;

/// What to do when a row repeats the previous row's timestamp
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateTimestamps {
    /// Reject the file with a parse error
    #[default]
    Error,
    /// Keep the first row for a timestamp and drop the repeats
    KeepFirst,
}

/// Options controlling how logfiles are loaded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Handling of rows whose timestamp equals the previous row's
    pub duplicate_timestamps: DuplicateTimestamps,
}

/// Header layout of a logfile
struct Header {
    channels: ChannelSet,
}

impl Header {
    fn parse(record: &csv::StringRecord) -> Result<Self, LogfileError> {
        let mut cells: Vec<&str> = record.iter().collect();
        // Lines ending in a tab leave an empty last header cell
        if cells.last().is_some_and(|c| c.trim().is_empty()) {
            cells.pop();
        }
        if cells.len() <= TIMESTAMP_COLUMNS {
            return Err(LogfileError::parse(
                1,
                format!(
                    "header has {} columns; expected date, time and at least one channel",
                    cells.len()
                ),
            ));
        }
        let channels = ChannelSet::new(cells[TIMESTAMP_COLUMNS..].iter().copied())
            .map_err(|e| LogfileError::parse(1, e.to_string()))?;
        Ok(Self { channels })
    }

    fn width(&self) -> usize {
        TIMESTAMP_COLUMNS + self.channels.len()
    }

    /// Check a row's field count, allowing the trailing empty field
    fn check_row(&self, record: &csv::StringRecord, line: u64) -> Result<(), LogfileError> {
        let width = self.width();
        let trailing_ok = record.len() == width + 1
            && record.get(width).is_some_and(|c| c.trim().is_empty());
        if record.len() == width || trailing_ok {
            Ok(())
        } else {
            Err(LogfileError::parse(
                line,
                format!("expected {} fields, found {}", width, record.len()),
            ))
        }
    }
}

fn tsv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(reader)
}

fn record_line(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn record_timestamp(record: &csv::StringRecord, line: u64) -> Result<NaiveDateTime, LogfileError> {
    let date = record.get(0).unwrap_or_default();
    let time = record.get(1).unwrap_or_default();
    parse_timestamp(date, time).map_err(|m| LogfileError::parse(line, m))
}

/// Loads AJA `.dlg` logfiles into [`Timeline`]s
#[derive(Debug, Clone, Default)]
pub struct LogfileReader {
    options: LoadOptions,
}

impl LogfileReader {
    /// Create a reader with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader with the given options
    pub fn with_options(options: LoadOptions) -> Self {
        Self { options }
    }

    /// Load a logfile from disk
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Timeline, LogfileError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let timeline = self.read(BufReader::new(file))?;
        info!(
            "Loaded {} samples over {} channels from {}",
            timeline.len(),
            timeline.channels().len(),
            path.display()
        );
        Ok(timeline)
    }

    /// Load a logfile from any reader
    pub fn read<R: Read>(&self, reader: R) -> Result<Timeline, LogfileError> {
        let mut tsv = tsv_reader(reader);
        let header = Header::parse(tsv.headers()?)?;
        let mut timeline = Timeline::new(header.channels.clone());
        let width = header.channels.len();

        for record in tsv.records() {
            let record = record?;
            let line = record_line(&record);
            header.check_row(&record, line)?;

            let timestamp = record_timestamp(&record, line)?;
            if let Some(last) = timeline.samples().last() {
                if timestamp == last.timestamp
                    && self.options.duplicate_timestamps == DuplicateTimestamps::KeepFirst
                {
                    debug!("Dropping line {}: repeats timestamp {}", line, timestamp);
                    continue;
                }
            }

            let values = record
                .iter()
                .skip(TIMESTAMP_COLUMNS)
                .take(width)
                .map(|cell| parse_value(cell).map_err(|m| LogfileError::parse(line, m)))
                .collect::<Result<Vec<_>, _>>()?;

            timeline
                .push_values(timestamp, values)
                .map_err(|e| LogfileError::parse(line, e.to_string()))?;
        }

        if timeline.is_empty() {
            return Err(LogfileError::EmptyInput);
        }
        Ok(timeline)
    }
}

/// Load a logfile with default options
pub fn load_logfile<P: AsRef<Path>>(path: P) -> Result<Timeline, LogfileError> {
    LogfileReader::new().load(path)
}

/// Read only the timestamp of the first sample of a logfile
pub fn read_start_time<P: AsRef<Path>>(path: P) -> Result<NaiveDateTime, LogfileError> {
    let file = File::open(path.as_ref())?;
    read_start_time_from(BufReader::new(file))
}

pub(crate) fn read_start_time_from<R: Read>(reader: R) -> Result<NaiveDateTime, LogfileError> {
    let mut tsv = tsv_reader(reader);
    Header::parse(tsv.headers()?)?;
    match tsv.records().next() {
        Some(record) => {
            let record = record?;
            record_timestamp(&record, record_line(&record))
        }
        None => Err(LogfileError::EmptyInput),
    }
}
