//! Date range resolution and calendar window helpers
//!
//! All report filters funnel through here before any query runs: explicit
//! ISO timestamps, year/month shortcuts, and the implicit "now"-based
//! default windows (which always go through the [`Clock`] trait so tests can
//! pin today's date).

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::error::{Error, Result};

/// Plausible calendar year bounds for year/month shortcut filters
pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2200;

/// A half-open-by-convention date filter. `None` on either side means
/// unbounded; when both bounds are present, `from <= to` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

impl DateRange {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn new(from: NaiveDateTime, to: NaiveDateTime) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn is_fully_bounded(&self) -> bool {
        self.from.is_some() && self.to.is_some()
    }

    /// Render the lower bound as an ISO string, if present
    pub fn from_string(&self) -> Option<String> {
        self.from.map(fmt_timestamp)
    }

    /// Render the upper bound as an ISO string, if present
    pub fn to_string_opt(&self) -> Option<String> {
        self.to.map(fmt_timestamp)
    }
}

/// Wall-clock access for the reports that default to "now"-relative windows.
///
/// Production code uses [`SystemClock`]; tests pin a [`FixedClock`] so that
/// forecast and trailing-window reports are deterministic.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// The real UTC wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// A clock frozen at a specific date, for deterministic tests
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Parse an ISO-8601 UTC timestamp.
///
/// Accepts RFC 3339 (`2025-03-01T00:00:00Z`, with or without fractional
/// seconds or an offset), the same without a timezone suffix, and a bare
/// `YYYY-MM-DD` date, which resolves to midnight.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(d.and_time(NaiveTime::MIN));
    }
    Err(Error::validation(format!(
        "Invalid date format: {} (use ISO 8601, e.g. 2025-03-01T00:00:00.000Z)",
        raw
    )))
}

/// Render a timestamp in the canonical wire format (`%Y-%m-%dT%H:%M:%S.%3fZ`).
///
/// The record store keeps `occurred_at` in this exact format, so rendered
/// bounds compare lexicographically against stored values in SQL.
pub fn fmt_timestamp(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Resolve optional raw `from_date`/`to_date` strings into a [`DateRange`].
///
/// Absent bounds stay unbounded on that side; callers choose what the
/// default window means. Fails when a supplied value is malformed or when
/// `from > to`.
pub fn resolve(raw_from: Option<&str>, raw_to: Option<&str>) -> Result<DateRange> {
    let from = raw_from.map(parse_timestamp).transpose()?;
    let to = raw_to.map(parse_timestamp).transpose()?;

    if let (Some(f), Some(t)) = (from, to) {
        if f > t {
            return Err(Error::validation(
                "from_date cannot be later than to_date",
            ));
        }
    }

    Ok(DateRange { from, to })
}

/// Resolve a `year`/`month` shortcut into the range spanning the first to the
/// last instant of that calendar month.
pub fn resolve_year_month(year: i32, month: u32) -> Result<DateRange> {
    validate_year(year)?;
    if !(1..=12).contains(&month) {
        return Err(Error::validation("Invalid year or month"));
    }
    Ok(DateRange::new(month_start(year, month), month_end(year, month)))
}

/// Resolve a bare `year` into the range covering the whole calendar year.
pub fn resolve_year(year: i32) -> Result<DateRange> {
    validate_year(year)?;
    Ok(DateRange::new(month_start(year, 1), month_end(year, 12)))
}

fn validate_year(year: i32) -> Result<()> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(Error::validation("Invalid year or month"));
    }
    Ok(())
}

/// First instant of a calendar month
pub fn month_start(year: i32, month: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap()
        .and_time(NaiveTime::MIN)
}

/// Last instant (millisecond resolution) of a calendar month
pub fn month_end(year: i32, month: u32) -> NaiveDateTime {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1).unwrap()
    };
    first_of_next
        .pred_opt()
        .unwrap()
        .and_time(NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap())
}

/// The (year, month) pair `back` months before the given date's month
pub fn shift_month_back(date: NaiveDate, back: u32) -> (i32, u32) {
    let total = date.year() as i64 * 12 + date.month() as i64 - 1 - back as i64;
    ((total.div_euclid(12)) as i32, (total.rem_euclid(12) + 1) as u32)
}

/// Trailing window for the forecast: from the start of the month
/// `history_months` before the current month, through the last instant of the
/// previous month. The current partial month is deliberately excluded so it
/// never skews the averages.
pub fn forecast_window(today: NaiveDate, history_months: u32) -> DateRange {
    let (fy, fm) = shift_month_back(today, history_months);
    let (ty, tm) = shift_month_back(today, 1);
    DateRange::new(month_start(fy, fm), month_end(ty, tm))
}

/// Default window for the monthly-expenses report: the last 12 calendar
/// months including the current one.
pub fn trailing_twelve_months(today: NaiveDate) -> DateRange {
    let (fy, fm) = shift_month_back(today, 11);
    DateRange::new(
        month_start(fy, fm),
        today.and_time(NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap()),
    )
}
