//! date operator catalog
//!
//! timestamps are compared after truncation to a granularity: calendar day by
//! default, minute when the catalog is built with `with_time`. the `range`
//! operator takes a `[start, end]` pair with inclusive bounds where a missing
//! bound is open-ended.
//!
//! values that cannot be read as a timestamp are handed to the comparison
//! primitive as absent. it reports no ordering for them, so every ordered
//! operator fails and `neq` holds.

use std::cmp::Ordering;

use chrono::{
    DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Timelike, Utc,
};
use serde::{Deserialize, Serialize};

use super::operator::{Operator, OperatorFilter};
use super::widget::{DateInputOptions, Widget};

pub const EQUALS: &str = "eq";
pub const NOT_EQUALS: &str = "neq";
pub const GREATER_THAN: &str = "gt";
pub const GREATER_THAN_OR_EQUALS: &str = "gte";
pub const LOWER_THAN: &str = "lt";
pub const LOWER_THAN_OR_EQUALS: &str = "lte";
pub const RANGE: &str = "range";

/// precision at which two timestamps are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Day,
    Minute,
}

impl Granularity {
    pub fn for_time(with_time: bool) -> Self {
        if with_time {
            Granularity::Minute
        } else {
            Granularity::Day
        }
    }

    /// drop everything finer than this granularity
    pub fn truncate(self, ts: NaiveDateTime) -> NaiveDateTime {
        let truncated = match self {
            Granularity::Day => ts.date().and_hms_opt(0, 0, 0),
            Granularity::Minute => ts.date().and_hms_opt(ts.hour(), ts.minute(), 0),
        };
        truncated.unwrap_or(ts)
    }
}

/// filter value for the date catalog
///
/// scalar operators read `Single`, `range` reads `Range`. the initializer keeps
/// the shape in step with the active operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    Range(Option<NaiveDateTime>, Option<NaiveDateTime>),
    Single(Option<NaiveDateTime>),
}

/// which picker a date widget shows for a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateMode {
    Single,
    Range,
}

impl DateValue {
    pub fn is_range(&self) -> bool {
        matches!(self, DateValue::Range(..))
    }

    pub fn mode(&self) -> DateMode {
        if self.is_range() {
            DateMode::Range
        } else {
            DateMode::Single
        }
    }

    /// the scalar, or the first element of a range
    pub fn start(&self) -> Option<NaiveDateTime> {
        match self {
            DateValue::Single(v) => *v,
            DateValue::Range(start, _) => *start,
        }
    }

    /// `(start, end)` as the range operator reads them; a scalar is a one-point range
    pub fn bounds(&self) -> (Option<NaiveDateTime>, Option<NaiveDateTime>) {
        match self {
            DateValue::Range(start, end) => (*start, *end),
            DateValue::Single(v) => (*v, *v),
        }
    }
}

impl Default for DateValue {
    fn default() -> Self {
        DateValue::Single(None)
    }
}

/// anything a date column can hold
pub trait AsTimestamp {
    fn as_timestamp(&self) -> Option<NaiveDateTime>;
}

impl AsTimestamp for NaiveDateTime {
    fn as_timestamp(&self) -> Option<NaiveDateTime> {
        Some(*self)
    }
}

impl AsTimestamp for NaiveDate {
    fn as_timestamp(&self) -> Option<NaiveDateTime> {
        self.and_hms_opt(0, 0, 0)
    }
}

impl<Tz: TimeZone> AsTimestamp for DateTime<Tz> {
    fn as_timestamp(&self) -> Option<NaiveDateTime> {
        Some(self.naive_utc())
    }
}

impl AsTimestamp for str {
    fn as_timestamp(&self) -> Option<NaiveDateTime> {
        parse_timestamp(self)
    }
}

impl AsTimestamp for String {
    fn as_timestamp(&self) -> Option<NaiveDateTime> {
        parse_timestamp(self)
    }
}

impl<T: AsTimestamp + ?Sized> AsTimestamp for &T {
    fn as_timestamp(&self) -> Option<NaiveDateTime> {
        (**self).as_timestamp()
    }
}

impl<T: AsTimestamp> AsTimestamp for Option<T> {
    fn as_timestamp(&self) -> Option<NaiveDateTime> {
        self.as_ref().and_then(|v| v.as_timestamp())
    }
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// lenient timestamp parser
///
/// accepts RFC 3339 (normalized to UTC), ISO date-times without offset, and
/// plain `YYYY-MM-DD` dates (midnight)
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

// longer tokens first so `MM` wins over `M`
const FORMAT_TOKENS: [(&str, &str); 11] = [
    ("YYYY", "%Y"),
    ("YY", "%y"),
    ("MM", "%m"),
    ("M", "%-m"),
    ("DD", "%d"),
    ("D", "%-d"),
    ("HH", "%H"),
    ("H", "%-H"),
    ("mm", "%M"),
    ("m", "%-M"),
    ("ss", "%S"),
];

/// translate a display format like `DD/MM/YYYY HH:mm` into chrono syntax
pub fn to_chrono_format(format: &str) -> String {
    let mut out = String::with_capacity(format.len() * 2);
    let mut rest = format;

    while let Some(ch) = rest.chars().next() {
        if let Some((token, spec)) = FORMAT_TOKENS.iter().find(|(t, _)| rest.starts_with(t)) {
            out.push_str(spec);
            rest = &rest[token.len()..];
            continue;
        }
        if ch == '%' {
            out.push_str("%%");
        } else {
            out.push(ch);
        }
        rest = &rest[ch.len_utf8()..];
    }

    out
}

fn parse_date_only(s: &str, chrono_format: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(s, chrono_format)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// the date part of a display format: everything before the first hour token
fn date_part(format: &str) -> Option<&str> {
    let (date, _) = format.split_once('H')?;
    let date = date.trim_end();
    (!date.is_empty()).then_some(date)
}

/// parse text typed in the display format, falling back to [`parse_timestamp`]
///
/// a date alone is accepted under a format with time and reads as midnight
pub fn parse_with_format(s: &str, format: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    let chrono_format = to_chrono_format(format);

    NaiveDateTime::parse_from_str(s, &chrono_format)
        .ok()
        .or_else(|| parse_date_only(s, &chrono_format))
        .or_else(|| {
            date_part(format).and_then(|date| parse_date_only(s, &to_chrono_format(date)))
        })
        .or_else(|| parse_timestamp(s))
}

/// render a timestamp in a display format
pub fn format_date(ts: NaiveDateTime, format: &str) -> String {
    ts.format(&to_chrono_format(format)).to_string()
}

/// widget boundary: picker text to timestamp, empty or invalid text is `None`
pub fn parse_date(value: Option<&str>) -> Option<NaiveDateTime> {
    value.and_then(parse_timestamp)
}

/// widget boundary: timestamp to `2024-03-01T10:00:00.000Z`
pub fn to_iso_string(value: Option<NaiveDateTime>) -> Option<String> {
    value.map(|ts| {
        Utc.from_utc_datetime(&ts)
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    })
}

/// ordering of `row` against `filter` at `granularity`; `None` if either is absent
pub fn compare(
    row: Option<NaiveDateTime>,
    filter: Option<NaiveDateTime>,
    granularity: Granularity,
) -> Option<Ordering> {
    let (row, filter) = (row?, filter?);
    Some(granularity.truncate(row).cmp(&granularity.truncate(filter)))
}

/// inclusive range check; a missing bound is unbounded on that side
pub fn in_range(
    row: Option<NaiveDateTime>,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    granularity: Granularity,
) -> bool {
    let Some(row) = row else {
        return false;
    };
    let row = granularity.truncate(row);

    let after_start = start.map_or(true, |s| granularity.truncate(s) <= row);
    let before_end = end.map_or(true, |e| row <= granularity.truncate(e));
    after_start && before_end
}

/// set the hour and minute of `date` from `time`; either alone passes through
pub fn combine_time_and_date(
    time: Option<NaiveDateTime>,
    date: Option<NaiveDateTime>,
) -> Option<NaiveDateTime> {
    match (time, date) {
        (None, None) => None,
        (None, Some(date)) => Some(date),
        (Some(time), None) => Some(time),
        (Some(time), Some(date)) => Some(
            date.with_hour(time.hour())
                .and_then(|d| d.with_minute(time.minute()))
                .unwrap_or(date),
        ),
    }
}

fn scalar_operator<R, C>(
    code: &str,
    label: &str,
    options: &DateInputOptions,
    check: C,
) -> Operator<R, DateValue>
where
    R: AsTimestamp + 'static,
    C: Fn(Option<Ordering>) -> bool + Send + Sync + 'static,
{
    let granularity = Granularity::for_time(options.with_time);
    Operator::new(
        code,
        label,
        move |row: &R, value: &DateValue| {
            check(compare(row.as_timestamp(), value.start(), granularity))
        },
        Widget::Date(options.clone()),
    )
}

pub fn equals<R: AsTimestamp + 'static>(label: &str, options: &DateInputOptions) -> Operator<R, DateValue> {
    scalar_operator(EQUALS, label, options, |ord| ord == Some(Ordering::Equal))
}

pub fn not_equals<R: AsTimestamp + 'static>(
    label: &str,
    options: &DateInputOptions,
) -> Operator<R, DateValue> {
    scalar_operator(NOT_EQUALS, label, options, |ord| ord != Some(Ordering::Equal))
}

pub fn greater_than<R: AsTimestamp + 'static>(
    label: &str,
    options: &DateInputOptions,
) -> Operator<R, DateValue> {
    scalar_operator(GREATER_THAN, label, options, |ord| ord == Some(Ordering::Greater))
}

pub fn greater_than_or_equals<R: AsTimestamp + 'static>(
    label: &str,
    options: &DateInputOptions,
) -> Operator<R, DateValue> {
    scalar_operator(GREATER_THAN_OR_EQUALS, label, options, |ord| {
        matches!(ord, Some(Ordering::Greater | Ordering::Equal))
    })
}

pub fn lower_than<R: AsTimestamp + 'static>(
    label: &str,
    options: &DateInputOptions,
) -> Operator<R, DateValue> {
    scalar_operator(LOWER_THAN, label, options, |ord| ord == Some(Ordering::Less))
}

pub fn lower_than_or_equals<R: AsTimestamp + 'static>(
    label: &str,
    options: &DateInputOptions,
) -> Operator<R, DateValue> {
    scalar_operator(LOWER_THAN_OR_EQUALS, label, options, |ord| {
        matches!(ord, Some(Ordering::Less | Ordering::Equal))
    })
}

pub fn range<R: AsTimestamp + 'static>(label: &str, options: &DateInputOptions) -> Operator<R, DateValue> {
    let granularity = Granularity::for_time(options.with_time);
    Operator::new(
        RANGE,
        label,
        move |row: &R, value: &DateValue| {
            let (start, end) = value.bounds();
            in_range(row.as_timestamp(), start, end, granularity)
        },
        Widget::Date(options.clone()),
    )
}

/// the full catalog with default labels
pub fn date_operators<R: AsTimestamp + 'static>(options: &DateInputOptions) -> Vec<Operator<R, DateValue>> {
    vec![
        equals("equals", options),
        not_equals("not equals", options),
        greater_than("GreaterThan", options),
        greater_than_or_equals("GreaterThanOrEquals", options),
        lower_than("LowerThan", options),
        lower_than_or_equals("LowerThanOrEquals", options),
        range("Range", options),
    ]
}

/// reshape a value for a newly selected operator
///
/// entering `range` seeds the start from the previous scalar and leaves the end
/// open, or keeps an existing range. leaving `range` keeps only its start.
pub fn init_date_filter_value(op: &str, last: Option<&DateValue>) -> DateValue {
    if op == RANGE {
        match last {
            Some(DateValue::Range(start, end)) => DateValue::Range(*start, *end),
            Some(DateValue::Single(value)) => DateValue::Range(*value, None),
            None => DateValue::Range(None, None),
        }
    } else {
        DateValue::Single(last.and_then(|v| v.start()))
    }
}

pub fn date_filter<R: AsTimestamp + 'static>(options: &DateInputOptions) -> OperatorFilter<R, DateValue> {
    OperatorFilter::from_catalog(date_operators(options), init_date_filter_value)
}
