//! Tenure computation from profile dates.
//!
//! Profile exports write dates as `"15 Jan 2020"`. Anything else (ISO dates,
//! "Present", blanks) is common and not an error: it simply yields no
//! duration.

use chrono::NaiveDate;
use profile_loader::CellValue;

/// Date format used by profile exports: day, abbreviated month, 4-digit year.
pub const PROFILE_DATE_FORMAT: &str = "%d %b %Y";

const DAYS_PER_YEAR: f64 = 365.25;

/// Parse a profile date, trimming surrounding whitespace.
pub fn parse_profile_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, PROFILE_DATE_FORMAT).ok()
}

/// Parse a date cell; missing or unparseable cells give `None`.
pub fn parse_date_cell(cell: &CellValue) -> Option<NaiveDate> {
    cell.as_text().as_deref().and_then(parse_profile_date)
}

/// Years between two dates, rounded to one decimal.
pub fn years_between(start: NaiveDate, end: NaiveDate) -> f64 {
    let days = (end - start).num_days() as f64;
    round_one_decimal(days / DAYS_PER_YEAR)
}

/// Years in a role given its start and optional end cells.
///
/// A missing or blank end means the role is ongoing and runs to `as_of`.
/// An end that is present but unparseable gives `None`, as does any start
/// that does not parse.
pub fn role_tenure(start: &CellValue, end: &CellValue, as_of: NaiveDate) -> Option<f64> {
    let start = parse_date_cell(start)?;
    let end = match end.as_text() {
        Some(s) if !s.trim().is_empty() => parse_profile_date(&s)?,
        _ => as_of,
    };
    Some(years_between(start, end))
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
