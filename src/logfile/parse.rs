//! Cell-level parsing for AJA logfiles.

use chrono::NaiveDateTime;

/// Date/time layouts seen in AJA logfiles, tried in order.
///
/// `%.f` consumes an optional fractional part, so whole seconds match too.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%m/%d/%Y %I:%M:%S%.f %p",
    "%m/%d/%Y %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%d.%m.%Y %H:%M:%S%.f",
];

/// Parse the date and time columns of a row into one timestamp
pub(crate) fn parse_timestamp(date: &str, time: &str) -> Result<NaiveDateTime, String> {
    let joined = format!("{} {}", date.trim(), time.trim());
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&joined, fmt).ok())
        .ok_or_else(|| format!("unrecognised timestamp '{}'", joined))
}

/// Parse one channel cell
///
/// The tool writes valve and plasma states as words; they map onto 1.0/0.0
/// so every channel stays numeric.
pub(crate) fn parse_value(raw: &str) -> Result<Option<f64>, String> {
    let cell = raw.trim();
    if cell.is_empty() {
        return Ok(None);
    }
    if cell.eq_ignore_ascii_case("open") || cell.eq_ignore_ascii_case("on") {
        return Ok(Some(1.0));
    }
    if cell.eq_ignore_ascii_case("closed") || cell.eq_ignore_ascii_case("off") {
        return Ok(Some(0.0));
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_nan() => Ok(None),
        Ok(v) if v.is_finite() => Ok(Some(v)),
        Ok(_) => Err(format!("non-finite value '{}'", cell)),
        Err(_) => Err(format!("invalid value '{}'", cell)),
    }
}
