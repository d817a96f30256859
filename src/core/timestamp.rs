use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Layout of the time columns in the input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TimeFormat {
    Rfc3339,
    Rfc2822,
    /// A chrono strftime pattern such as `%m/%d/%Y %H:%M`.
    Pattern(String),
}

const RFC3339_NO_OFFSET: &str = "%Y-%m-%dT%H:%M:%S%.f";

impl TimeFormat {
    pub fn parse(&self, value: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
        let value = value.trim();
        match self {
            TimeFormat::Rfc3339 => DateTime::parse_from_rfc3339(value).or_else(|err| {
                NaiveDateTime::parse_from_str(value, RFC3339_NO_OFFSET)
                    .map(as_utc)
                    .map_err(|_| err)
            }),
            TimeFormat::Rfc2822 => DateTime::parse_from_rfc2822(value),
            TimeFormat::Pattern(pattern) => DateTime::parse_from_str(value, pattern)
                .or_else(|_| NaiveDateTime::parse_from_str(value, pattern).map(as_utc))
                .or_else(|err| {
                    NaiveDate::parse_from_str(value, pattern)
                        .map(|date| as_utc(date.and_time(chrono::NaiveTime::MIN)))
                        .map_err(|_| err)
                }),
        }
    }

    /// False for a pattern that could never match a timestamp, such as a
    /// layout written in neither strftime nor Go reference form.
    pub fn has_directives(&self) -> bool {
        match self {
            TimeFormat::Rfc3339 | TimeFormat::Rfc2822 => true,
            TimeFormat::Pattern(pattern) => pattern.contains('%'),
        }
    }
}

/// Go reference-layout tokens and their chrono equivalents, longest first so
/// that `2006` wins over `06` and `January` over `Jan`.
const GO_LAYOUT_TOKENS: &[(&str, &str)] = &[
    ("January", "%B"),
    ("Monday", "%A"),
    (".000000000", "%.9f"),
    (".999999999", "%.f"),
    (".000000", "%.6f"),
    (".999999", "%.f"),
    ("Z07:00", "%:z"),
    ("-07:00", "%:z"),
    (".000", "%.3f"),
    (".999", "%.f"),
    ("-0700", "%z"),
    ("2006", "%Y"),
    ("Jan", "%b"),
    ("Mon", "%a"),
    ("MST", "%Z"),
    ("01", "%m"),
    ("02", "%d"),
    ("03", "%I"),
    ("04", "%M"),
    ("05", "%S"),
    ("06", "%y"),
    ("15", "%H"),
    ("PM", "%p"),
];

/// Rewrites a Go layout such as `2006-01-02 15:04:05` as a strftime pattern.
fn go_layout_to_strftime(layout: &str) -> String {
    let mut pattern = String::with_capacity(layout.len() * 2);
    let mut rest = layout;

    'scan: while let Some(c) = rest.chars().next() {
        for (token, directive) in GO_LAYOUT_TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                pattern.push_str(directive);
                rest = tail;
                continue 'scan;
            }
        }
        if c == '%' {
            pattern.push_str("%%");
        } else {
            pattern.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }

    pattern
}

fn as_utc(naive: NaiveDateTime) -> DateTime<FixedOffset> {
    naive.and_utc().fixed_offset()
}

/// RFC3339 with the source offset kept, `Z` for UTC.
pub fn canonical(instant: &DateTime<FixedOffset>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl From<&str> for TimeFormat {
    fn from(value: &str) -> Self {
        match value.trim() {
            "RFC3339" | "rfc3339" | "2006-01-02T15:04:05Z07:00" => TimeFormat::Rfc3339,
            "RFC2822" | "rfc2822" | "RFC1123Z" => TimeFormat::Rfc2822,
            other if other.contains('%') => TimeFormat::Pattern(other.to_string()),
            other => TimeFormat::Pattern(go_layout_to_strftime(other)),
        }
    }
}

impl From<String> for TimeFormat {
    fn from(value: String) -> Self {
        TimeFormat::from(value.as_str())
    }
}

impl From<TimeFormat> for String {
    fn from(value: TimeFormat) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFormat::Rfc3339 => f.write_str("RFC3339"),
            TimeFormat::Rfc2822 => f.write_str("RFC2822"),
            TimeFormat::Pattern(pattern) => f.write_str(pattern),
        }
    }
}
