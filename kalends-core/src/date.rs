//! ISO-8601 date and time value types
//!
//! `IsoDate`, `IsoTime` and `IsoDateTime` are small immutable `Copy` values.
//! They can only be built through validated constructors or by decoding an
//! epoch count, so every instance satisfies the proleptic Gregorian rules.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::epoch::{self, EpochMinuteCodec, MAX_EPOCH_DAY, MIN_EPOCH_DAY};
use crate::error::CalendarError;

/// Smallest supported ISO year
pub const YEAR_MIN: i32 = -9999;
/// Largest supported ISO year
pub const YEAR_MAX: i32 = 9999;

// ============================================================================
// Weekday
// ============================================================================

/// Day of the week, numbered per ISO 8601 (Monday = 1 .. Sunday = 7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Weekday {
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
    Sunday = 7,
}

impl Weekday {
    /// Weekday of an epoch day. 1970-01-01 was a Thursday.
    pub fn from_epoch_days(days: i64) -> Self {
        match (days + 3).rem_euclid(7) {
            0 => Weekday::Monday,
            1 => Weekday::Tuesday,
            2 => Weekday::Wednesday,
            3 => Weekday::Thursday,
            4 => Weekday::Friday,
            5 => Weekday::Saturday,
            _ => Weekday::Sunday,
        }
    }

    /// Build from the ISO number (1-7)
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Weekday::Monday),
            2 => Some(Weekday::Tuesday),
            3 => Some(Weekday::Wednesday),
            4 => Some(Weekday::Thursday),
            5 => Some(Weekday::Friday),
            6 => Some(Weekday::Saturday),
            7 => Some(Weekday::Sunday),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// IsoDate
// ============================================================================

/// A date in the proleptic Gregorian calendar
///
/// Ordering follows the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "IsoDateFields")]
pub struct IsoDate {
    year: i32,
    month: u8,
    day: u8,
}

#[derive(Deserialize)]
struct IsoDateFields {
    year: i32,
    month: u8,
    day: u8,
}

impl TryFrom<IsoDateFields> for IsoDate {
    type Error = CalendarError;

    fn try_from(f: IsoDateFields) -> Result<Self, Self::Error> {
        IsoDate::try_new(f.year, f.month, f.day)
    }
}

impl IsoDate {
    /// Create a date, validating every field
    pub fn try_new(year: i32, month: u8, day: u8) -> Result<Self, CalendarError> {
        if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
            return Err(CalendarError::range(format!(
                "year {} is outside {}..={}",
                year, YEAR_MIN, YEAR_MAX
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(CalendarError::invalid_field("month", month, "must be 1-12"));
        }
        let max_day = epoch::days_in_month(year, month);
        if day < 1 || day > max_day {
            return Err(CalendarError::invalid_field(
                "day",
                day,
                format!("{:04}-{:02} has {} days", year, month, max_day),
            ));
        }
        Ok(Self { year, month, day })
    }

    /// Date for a count of days since 1970-01-01
    pub fn from_epoch_days(days: i64) -> Result<Self, CalendarError> {
        if !(MIN_EPOCH_DAY..=MAX_EPOCH_DAY).contains(&days) {
            return Err(CalendarError::range(format!(
                "epoch day {} is outside years {}..={}",
                days, YEAR_MIN, YEAR_MAX
            )));
        }
        let (year, month, day) = epoch::civil_from_days(days);
        Ok(Self {
            year: year as i32,
            month,
            day,
        })
    }

    /// Days since 1970-01-01
    pub fn to_epoch_days(&self) -> i64 {
        epoch::days_from_civil(self.year, self.month, self.day)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day_of_month(&self) -> u8 {
        self.day
    }

    pub fn day_of_week(&self) -> Weekday {
        Weekday::from_epoch_days(self.to_epoch_days())
    }

    /// Day of year (1-366)
    pub fn day_of_year(&self) -> u16 {
        let mut doy = self.day as u16;
        for m in 1..self.month {
            doy += epoch::days_in_month(self.year, m) as u16;
        }
        doy
    }

    pub fn months_in_year(&self) -> u8 {
        12
    }

    pub fn days_in_month(&self) -> u8 {
        epoch::days_in_month(self.year, self.month)
    }

    pub fn days_in_year(&self) -> u16 {
        epoch::days_in_year(self.year)
    }

    pub fn is_in_leap_year(&self) -> bool {
        epoch::is_leap_year(self.year)
    }

    /// ISO week date as (week-year, week number 1-53)
    ///
    /// Week 1 is the week holding the year's first Thursday, so the week-year
    /// differs from the calendar year around New Year.
    pub fn iso_week(&self) -> (i32, u8) {
        let days = self.to_epoch_days();
        let dow = self.day_of_week().number() as i64;
        // The Thursday of this week decides which year the week belongs to
        let thursday = days + (4 - dow);
        let (week_year, _, _) = epoch::civil_from_days(thursday);
        let jan1 = epoch::days_from_civil(week_year as i32, 1, 1);
        let week = (thursday - jan1) / 7 + 1;
        (week_year as i32, week as u8)
    }

    /// Add a signed number of days
    pub fn checked_add_days(&self, days: i64) -> Result<Self, CalendarError> {
        let target = self
            .to_epoch_days()
            .checked_add(days)
            .ok_or_else(|| CalendarError::range(format!("{} + {} days overflows", self, days)))?;
        Self::from_epoch_days(target)
    }

    /// Signed number of days from `self` to `other`
    pub fn days_until(&self, other: &IsoDate) -> i64 {
        other.to_epoch_days() - self.to_epoch_days()
    }
}

// ============================================================================
// IsoTime
// ============================================================================

/// A wall-clock time of day with nanosecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "IsoTimeFields")]
pub struct IsoTime {
    hour: u8,
    minute: u8,
    second: u8,
    nanosecond: u32,
}

#[derive(Deserialize)]
struct IsoTimeFields {
    hour: u8,
    minute: u8,
    #[serde(default)]
    second: u8,
    #[serde(default)]
    nanosecond: u32,
}

impl TryFrom<IsoTimeFields> for IsoTime {
    type Error = CalendarError;

    fn try_from(f: IsoTimeFields) -> Result<Self, Self::Error> {
        IsoTime::try_new(f.hour, f.minute, f.second, f.nanosecond)
    }
}

impl IsoTime {
    pub fn try_new(hour: u8, minute: u8, second: u8, nanosecond: u32) -> Result<Self, CalendarError> {
        if hour > 23 {
            return Err(CalendarError::invalid_field("hour", hour, "must be 0-23"));
        }
        if minute > 59 {
            return Err(CalendarError::invalid_field("minute", minute, "must be 0-59"));
        }
        if second > 59 {
            return Err(CalendarError::invalid_field("second", second, "must be 0-59"));
        }
        if nanosecond > 999_999_999 {
            return Err(CalendarError::invalid_field(
                "nanosecond",
                nanosecond,
                "must be 0-999999999",
            ));
        }
        Ok(Self {
            hour,
            minute,
            second,
            nanosecond,
        })
    }

    pub const fn midnight() -> Self {
        Self {
            hour: 0,
            minute: 0,
            second: 0,
            nanosecond: 0,
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    pub fn nanosecond(&self) -> u32 {
        self.nanosecond
    }
}

impl Default for IsoTime {
    fn default() -> Self {
        Self::midnight()
    }
}

// ============================================================================
// IsoDateTime
// ============================================================================

/// An ISO date paired with a time of day, with no time zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IsoDateTime {
    date: IsoDate,
    time: IsoTime,
}

impl IsoDateTime {
    /// Create from fields, validating each
    pub fn try_new(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        nanosecond: u32,
    ) -> Result<Self, CalendarError> {
        let date = IsoDate::try_new(year, month, day)?;
        let time = IsoTime::try_new(hour, minute, second, nanosecond)?;
        Ok(Self { date, time })
    }

    pub const fn new(date: IsoDate, time: IsoTime) -> Self {
        Self { date, time }
    }

    /// Decode a count of minutes since 1970-01-01T00:00 (local)
    pub fn from_minutes_since_local_unix_epoch(minutes: i32) -> Result<Self, CalendarError> {
        let (date, hour, minute) = EpochMinuteCodec::decode(minutes)?;
        let time = IsoTime::try_new(hour, minute, 0, 0)?;
        Ok(Self { date, time })
    }

    /// Minutes since 1970-01-01T00:00 (local), seconds truncated
    ///
    /// Fails with a range error outside roughly -2114..=6053.
    pub fn minutes_since_local_unix_epoch(&self) -> Result<i32, CalendarError> {
        let minutes = EpochMinuteCodec::encode(self.date, self.time.hour, self.time.minute)?;
        i32::try_from(minutes).map_err(|_| {
            CalendarError::range(format!("{} does not fit in 32-bit epoch minutes", self))
        })
    }

    pub fn date(&self) -> IsoDate {
        self.date
    }

    pub fn time(&self) -> IsoTime {
        self.time
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u8 {
        self.date.month()
    }

    pub fn day_of_month(&self) -> u8 {
        self.date.day_of_month()
    }

    pub fn day_of_week(&self) -> Weekday {
        self.date.day_of_week()
    }

    pub fn day_of_year(&self) -> u16 {
        self.date.day_of_year()
    }

    pub fn months_in_year(&self) -> u8 {
        self.date.months_in_year()
    }

    pub fn days_in_month(&self) -> u8 {
        self.date.days_in_month()
    }

    pub fn days_in_year(&self) -> u16 {
        self.date.days_in_year()
    }

    pub fn hour(&self) -> u8 {
        self.time.hour()
    }

    pub fn minute(&self) -> u8 {
        self.time.minute()
    }

    pub fn second(&self) -> u8 {
        self.time.second()
    }

    pub fn nanosecond(&self) -> u32 {
        self.time.nanosecond()
    }
}

impl From<IsoDate> for IsoDateTime {
    fn from(date: IsoDate) -> Self {
        Self::new(date, IsoTime::midnight())
    }
}

// ============================================================================
// Arbitrary (tests)
// ============================================================================

#[cfg(test)]
impl quickcheck::Arbitrary for IsoDate {
    fn arbitrary(g: &mut quickcheck::Gen) -> IsoDate {
        let span = MAX_EPOCH_DAY - MIN_EPOCH_DAY + 1;
        let days = MIN_EPOCH_DAY + i64::arbitrary(g).rem_euclid(span);
        let (year, month, day) = epoch::civil_from_days(days);
        IsoDate {
            year: year as i32,
            month,
            day,
        }
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for IsoTime {
    fn arbitrary(g: &mut quickcheck::Gen) -> IsoTime {
        IsoTime {
            hour: u8::arbitrary(g) % 24,
            minute: u8::arbitrary(g) % 60,
            second: u8::arbitrary(g) % 60,
            nanosecond: u32::arbitrary(g) % 1_000_000_000,
        }
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for IsoDateTime {
    fn arbitrary(g: &mut quickcheck::Gen) -> IsoDateTime {
        IsoDateTime::new(IsoDate::arbitrary(g), IsoTime::arbitrary(g))
    }
}
