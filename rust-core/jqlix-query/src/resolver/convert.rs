// SPDX-License-Identifier: PMPL-1.0-or-later
//! Direct literal → index value converters.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::literal::QueryLiteral;
use crate::resolver::IndexValueConverter;

/// Passes text and numbers through unchanged, optionally lowercased.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimpleIndexValueConverter {
    lowercase: bool,
}

impl SimpleIndexValueConverter {
    pub fn new() -> Self {
        Self { lowercase: false }
    }

    pub fn lowercasing() -> Self {
        Self { lowercase: true }
    }
}

impl IndexValueConverter for SimpleIndexValueConverter {
    fn convert_to_index_value(&self, literal: &QueryLiteral) -> Option<String> {
        let text = literal.as_text()?;
        Some(if self.lowercase { text.to_lowercase() } else { text })
    }
}

/// Non-negative integers, zero padded so that term order is numeric order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumberIndexValueConverter;

impl NumberIndexValueConverter {
    pub const WIDTH: usize = 19;

    pub fn encode(value: i64) -> Option<String> {
        (value >= 0).then(|| format!("{value:0width$}", width = Self::WIDTH))
    }
}

impl IndexValueConverter for NumberIndexValueConverter {
    fn convert_to_index_value(&self, literal: &QueryLiteral) -> Option<String> {
        match literal {
            QueryLiteral::Number(n) => Self::encode(*n),
            QueryLiteral::Text(s) => s.trim().parse::<i64>().ok().and_then(Self::encode),
            QueryLiteral::Empty => None,
        }
    }
}

const MINUTES_PER_UNIT: [(char, i64); 4] = [('w', 7 * 24 * 60), ('d', 24 * 60), ('h', 60), ('m', 1)];

// About a century; keeps the resulting timestamp representable.
const MAX_RELATIVE_MINUTES: i64 = 100 * 366 * 24 * 60;

const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M", "%Y/%m/%d %H:%M"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Dates and times, indexed as `%Y%m%d%H%M%S` in UTC.
///
/// Accepts `yyyy-MM-dd` or `yyyy/MM/dd` with an optional ` HH:mm`, epoch
/// milliseconds, and offsets from now such as `-1w 2d` or `4h`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateIndexValueConverter {
    now: Option<DateTime<Utc>>,
}

impl DateIndexValueConverter {
    /// Relative offsets are taken from the clock at conversion time.
    pub fn new() -> Self {
        Self { now: None }
    }

    /// Relative offsets are taken from a fixed instant.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now: Some(now) }
    }

    pub fn encode(instant: &DateTime<Utc>) -> String {
        instant.format("%Y%m%d%H%M%S").to_string()
    }

    /// The instant a literal names; a bare date is its first second.
    pub fn parse(&self, literal: &QueryLiteral) -> Option<DateTime<Utc>> {
        self.parse_span(literal).map(|span| span.start())
    }

    /// The literal with its implied precision: a bare date covers the
    /// whole day, anything else is a single instant.
    pub fn parse_span(&self, literal: &QueryLiteral) -> Option<DateSpan> {
        match literal {
            QueryLiteral::Number(millis) => Utc.timestamp_millis_opt(*millis).single().map(DateSpan::Instant),
            QueryLiteral::Text(text) => self.parse_text(text.trim()),
            QueryLiteral::Empty => None,
        }
    }

    fn parse_text(&self, text: &str) -> Option<DateSpan> {
        if let Some(minutes) = parse_relative_minutes(text) {
            let now = self.now.unwrap_or_else(Utc::now);
            return now.checked_add_signed(Duration::minutes(minutes)).map(DateSpan::Instant);
        }
        for format in DATE_TIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
                return Some(DateSpan::Instant(Utc.from_utc_datetime(&naive)));
            }
        }
        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(text, format) {
                return DateSpan::day(date);
            }
        }
        None
    }
}

/// A date literal as the instants it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSpan {
    Instant(DateTime<Utc>),
    /// `[start, end)`, one calendar day in UTC.
    Day { start: DateTime<Utc>, end: DateTime<Utc> },
}

impl DateSpan {
    /// The span of `date`, or `None` at the end of the calendar.
    pub fn day(date: NaiveDate) -> Option<Self> {
        let start = date.and_hms_opt(0, 0, 0)?;
        let end = date.succ_opt()?.and_hms_opt(0, 0, 0)?;
        Some(DateSpan::Day {
            start: Utc.from_utc_datetime(&start),
            end: Utc.from_utc_datetime(&end),
        })
    }

    pub fn start(&self) -> DateTime<Utc> {
        match self {
            DateSpan::Instant(instant) => *instant,
            DateSpan::Day { start, .. } => *start,
        }
    }
}

impl IndexValueConverter for DateIndexValueConverter {
    fn convert_to_index_value(&self, literal: &QueryLiteral) -> Option<String> {
        self.parse(literal).map(|instant| Self::encode(&instant))
    }
}

/// `[-+]<n><unit> [<n><unit> ...]` with units w, d, h, m.
fn parse_relative_minutes(text: &str) -> Option<i64> {
    let (sign, body) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let mut total: i64 = 0;
    let mut digits = String::new();
    let mut saw_unit = false;
    for ch in body.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
        } else if ch.is_whitespace() {
            if !digits.is_empty() {
                return None;
            }
        } else {
            let unit = ch.to_ascii_lowercase();
            let (_, minutes) = MINUTES_PER_UNIT.iter().find(|(u, _)| *u == unit)?;
            let amount: i64 = digits.parse().ok()?;
            digits.clear();
            total = total.checked_add(amount.checked_mul(*minutes)?)?;
            saw_unit = true;
        }
    }
    if !digits.is_empty() || !saw_unit || total > MAX_RELATIVE_MINUTES {
        return None;
    }
    Some(sign * total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_converter() {
        let plain = SimpleIndexValueConverter::new();
        assert_eq!(plain.convert_to_index_value(&"AbC".into()).as_deref(), Some("AbC"));
        assert_eq!(plain.convert_to_index_value(&12i64.into()).as_deref(), Some("12"));
        assert_eq!(plain.convert_to_index_value(&QueryLiteral::Empty), None);
        let lower = SimpleIndexValueConverter::lowercasing();
        assert_eq!(lower.convert_to_index_value(&"AbC".into()).as_deref(), Some("abc"));
    }

    #[test]
    fn test_number_converter() {
        let conv = NumberIndexValueConverter;
        assert_eq!(conv.convert_to_index_value(&5i64.into()).as_deref(), Some("0000000000000000005"));
        assert_eq!(conv.convert_to_index_value(&" 42 ".into()).as_deref(), Some("0000000000000000042"));
        assert_eq!(conv.convert_to_index_value(&"4x".into()), None);
        assert_eq!(conv.convert_to_index_value(&(-1i64).into()), None);
        assert!(NumberIndexValueConverter::encode(9) < NumberIndexValueConverter::encode(10));
    }

    #[test]
    fn test_absolute_dates() {
        let conv = DateIndexValueConverter::new();
        assert_eq!(
            conv.convert_to_index_value(&"2024-03-05".into()).as_deref(),
            Some("20240305000000")
        );
        assert_eq!(
            conv.convert_to_index_value(&"2024/03/05 14:30".into()).as_deref(),
            Some("20240305143000")
        );
        assert_eq!(
            conv.convert_to_index_value(&QueryLiteral::Number(0)).as_deref(),
            Some("19700101000000")
        );
        assert_eq!(conv.convert_to_index_value(&"yesterday".into()), None);
        assert_eq!(conv.convert_to_index_value(&"2024-13-01".into()), None);
    }

    #[test]
    fn test_relative_dates() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let conv = DateIndexValueConverter::at(now);
        assert_eq!(conv.convert_to_index_value(&"-1w".into()).as_deref(), Some("20240308120000"));
        assert_eq!(conv.convert_to_index_value(&"-1w 2d".into()).as_deref(), Some("20240306120000"));
        assert_eq!(conv.convert_to_index_value(&"+4h".into()).as_deref(), Some("20240315160000"));
        assert_eq!(conv.convert_to_index_value(&"30m".into()).as_deref(), Some("20240315123000"));
    }

    #[test]
    fn test_bare_dates_span_a_day() {
        let conv = DateIndexValueConverter::new();
        let span = conv.parse_span(&"2024-02-28".into()).unwrap();
        assert_eq!(
            span,
            DateSpan::Day {
                start: Utc.with_ymd_and_hms(2024, 2, 28, 0, 0, 0).unwrap(),
                end: Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap(),
            }
        );
        assert_eq!(
            conv.parse_span(&"2024/02/28 10:15".into()),
            Some(DateSpan::Instant(Utc.with_ymd_and_hms(2024, 2, 28, 10, 15, 0).unwrap()))
        );
        assert!(matches!(conv.parse_span(&QueryLiteral::Number(0)), Some(DateSpan::Instant(_))));
        assert_eq!(conv.parse_span(&QueryLiteral::Empty), None);
    }

    #[test]
    fn test_relative_rejects_garbage() {
        assert_eq!(parse_relative_minutes("-1x"), None);
        assert_eq!(parse_relative_minutes("12"), None);
        assert_eq!(parse_relative_minutes("1 d"), None);
        assert_eq!(parse_relative_minutes("d"), None);
        assert_eq!(parse_relative_minutes("99999999999w"), None);
    }
}
