//! ISO 8601 / IXDTF text
//!
//! Printing uses the extended format (`2024-03-20T09:30:00`). Years outside
//! 0000-9999 use the six-digit signed form (`-000044-03-15`).
//!
//! Parsing accepts RFC 9557 internet extended date/time strings:
//!
//! ```text
//! 2024-03-20
//! 2024-03-20T09:30
//! 2024-03-20 09:30:15.25+01:00[Europe/Paris][u-ca=hebrew]
//! +002024-03-20T09:30Z[!u-ca=persian]
//! ```
//!
//! UTC offsets and time zone annotations are validated and then dropped.
//! The `u-ca` annotation is kept as the calendar hint.

use ixdtf::parsers::records::{Annotation, TimeRecord};
use ixdtf::parsers::IxdtfParser;
use ixdtf::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::date::{IsoDate, IsoDateTime, IsoTime};
use crate::error::CalendarError;

// ============================================================================
// TimePrecision
// ============================================================================

/// How much of a time of day to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimePrecision {
    Hour,
    Minute,
    /// Minute shown only when non-zero
    MinuteOptional,
    #[default]
    Second,
    SecondF1,
    SecondF2,
    SecondF3,
    SecondF4,
    SecondF5,
    SecondF6,
    SecondF7,
    SecondF8,
    SecondF9,
}

impl TimePrecision {
    /// Precision showing `digits` fractional second digits (0-9)
    pub fn from_subsecond_digits(digits: u8) -> Option<Self> {
        match digits {
            0 => Some(TimePrecision::Second),
            1 => Some(TimePrecision::SecondF1),
            2 => Some(TimePrecision::SecondF2),
            3 => Some(TimePrecision::SecondF3),
            4 => Some(TimePrecision::SecondF4),
            5 => Some(TimePrecision::SecondF5),
            6 => Some(TimePrecision::SecondF6),
            7 => Some(TimePrecision::SecondF7),
            8 => Some(TimePrecision::SecondF8),
            9 => Some(TimePrecision::SecondF9),
            _ => None,
        }
    }

    /// Fractional second digits, `None` when seconds are not shown
    pub fn subsecond_digits(self) -> Option<u8> {
        match self {
            TimePrecision::Hour | TimePrecision::Minute | TimePrecision::MinuteOptional => None,
            TimePrecision::Second => Some(0),
            TimePrecision::SecondF1 => Some(1),
            TimePrecision::SecondF2 => Some(2),
            TimePrecision::SecondF3 => Some(3),
            TimePrecision::SecondF4 => Some(4),
            TimePrecision::SecondF5 => Some(5),
            TimePrecision::SecondF6 => Some(6),
            TimePrecision::SecondF7 => Some(7),
            TimePrecision::SecondF8 => Some(8),
            TimePrecision::SecondF9 => Some(9),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TimePrecision::Hour => "hour",
            TimePrecision::Minute => "minute",
            TimePrecision::MinuteOptional => "minute-optional",
            TimePrecision::Second => "second",
            TimePrecision::SecondF1 => "second-f1",
            TimePrecision::SecondF2 => "second-f2",
            TimePrecision::SecondF3 => "second-f3",
            TimePrecision::SecondF4 => "second-f4",
            TimePrecision::SecondF5 => "second-f5",
            TimePrecision::SecondF6 => "second-f6",
            TimePrecision::SecondF7 => "second-f7",
            TimePrecision::SecondF8 => "second-f8",
            TimePrecision::SecondF9 => "second-f9",
        }
    }
}

impl FromStr for TimePrecision {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "hour" => Ok(TimePrecision::Hour),
            "minute" => Ok(TimePrecision::Minute),
            "minute-optional" => Ok(TimePrecision::MinuteOptional),
            "second" => Ok(TimePrecision::Second),
            other => other
                .strip_prefix("second-f")
                .and_then(|d| d.parse::<u8>().ok())
                .filter(|d| (1..=9).contains(d))
                .and_then(TimePrecision::from_subsecond_digits)
                .ok_or_else(|| CalendarError::parse(format!("unknown time precision '{}'", s))),
        }
    }
}

impl fmt::Display for TimePrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Printing
// ============================================================================

impl fmt::Display for IsoDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year = self.year();
        if (0..=9999).contains(&year) {
            write!(f, "{:04}", year)?;
        } else if year < 0 {
            write!(f, "-{:06}", -(year as i64))?;
        } else {
            write!(f, "+{:06}", year)?;
        }
        write!(f, "-{:02}-{:02}", self.month(), self.day_of_month())
    }
}

impl IsoTime {
    /// Render at the given precision, truncating rather than rounding
    pub fn format(&self, precision: TimePrecision) -> String {
        match precision {
            TimePrecision::Hour => format!("{:02}", self.hour()),
            TimePrecision::Minute => format!("{:02}:{:02}", self.hour(), self.minute()),
            TimePrecision::MinuteOptional if self.minute() == 0 => format!("{:02}", self.hour()),
            TimePrecision::MinuteOptional => format!("{:02}:{:02}", self.hour(), self.minute()),
            _ => {
                let mut out = format!("{:02}:{:02}:{:02}", self.hour(), self.minute(), self.second());
                let digits = precision.subsecond_digits().unwrap_or(0) as usize;
                if digits > 0 {
                    let nanos = format!("{:09}", self.nanosecond());
                    out.push('.');
                    out.push_str(&nanos[..digits]);
                }
                out
            }
        }
    }
}

impl fmt::Display for IsoTime {
    /// Seconds always, fraction only as long as needed
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour(), self.minute(), self.second())?;
        if self.nanosecond() != 0 {
            let nanos = format!("{:09}", self.nanosecond());
            write!(f, ".{}", nanos.trim_end_matches('0'))?;
        }
        Ok(())
    }
}

impl IsoDateTime {
    pub fn format(&self, precision: TimePrecision) -> String {
        format!("{}T{}", self.date(), self.time().format(precision))
    }
}

impl fmt::Display for IsoDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.date(), self.time())
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// The pieces of an IXDTF string Kalends cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IxdtfRecord {
    pub date: IsoDate,
    pub time: Option<IsoTime>,
    /// Value of the `u-ca` annotation, lowercased
    pub calendar: Option<String>,
}

impl IxdtfRecord {
    pub fn parse(s: &str) -> Result<Self, CalendarError> {
        let mut first_calendar: Option<Annotation<'_>> = None;
        let mut conflicting_calendar = false;
        let record = IxdtfParser::from_str(s)
            .parse_with_annotation_handler(|annotation| {
                if annotation.key != "u-ca".as_bytes() {
                    return Some(annotation);
                }
                // A repeated calendar is only tolerated when neither copy is critical
                match &first_calendar {
                    Some(first) => conflicting_calendar |= first.critical || annotation.critical,
                    None => first_calendar = Some(annotation),
                }
                None
            })
            .map_err(|e| parse_error(s, e))?;

        if conflicting_calendar {
            return Err(CalendarError::parse(format!(
                "conflicting calendar annotations in '{}'",
                s
            )));
        }

        let date = record
            .date
            .ok_or_else(|| CalendarError::parse(format!("missing date in '{}'", s)))?;
        let date = IsoDate::try_new(date.year, date.month, date.day)?;
        let time = record.time.map(iso_time).transpose()?;
        let calendar = first_calendar
            .map(|annotation| String::from_utf8_lossy(annotation.value).to_ascii_lowercase());

        Ok(Self {
            date,
            time,
            calendar,
        })
    }

    /// Date and time, failing when the string had no time part
    pub fn date_time(&self) -> Result<IsoDateTime, CalendarError> {
        let time = self
            .time
            .ok_or_else(|| CalendarError::parse("missing time (expected YYYY-MM-DDTHH:MM)"))?;
        Ok(IsoDateTime::new(self.date, time))
    }
}

impl FromStr for IsoDate {
    type Err = CalendarError;

    /// Any time part or calendar annotation is discarded
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(IxdtfRecord::parse(s)?.date)
    }
}

impl FromStr for IsoDateTime {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IxdtfRecord::parse(s)?.date_time()
    }
}

impl FromStr for IsoTime {
    type Err = CalendarError;

    /// `HH[:MM[:SS[.fraction]]]`, optionally prefixed with `T`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let record = IxdtfParser::from_str(s)
            .parse_time()
            .map_err(|e| parse_error(s, e))?;
        let time = record
            .time
            .ok_or_else(|| CalendarError::parse(format!("missing time in '{}'", s)))?;
        iso_time(time)
    }
}

fn iso_time(time: TimeRecord) -> Result<IsoTime, CalendarError> {
    let nanosecond = match time.fraction {
        Some(fraction) => fraction
            .to_nanoseconds()
            .ok_or_else(|| CalendarError::parse("more than 9 fractional digits"))?,
        None => 0,
    };
    // A leap second is read as the last second of the minute
    IsoTime::try_new(time.hour, time.minute, time.second.min(59), nanosecond)
}

fn parse_error(src: &str, err: ParseError) -> CalendarError {
    match err {
        ParseError::InvalidMonthRange => {
            CalendarError::invalid_field("month", src, "month must be 1-12")
        }
        ParseError::InvalidDayRange => {
            CalendarError::invalid_field("day", src, "day is past the end of the month")
        }
        _ => CalendarError::parse(format!("{} in '{}'", err, src)),
    }
}
