//! Dates in a non-ISO calendar

use crate::{CalendarConverter, CalendarSystem, FieldQueryEngine, MonthCode};
use kalends_core::{CalendarError, IsoDate, IsoDateTime, IsoTime, Weekday};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;
use std::sync::Arc;

/// Shared handle to a calendar descriptor
pub type CalendarRef = Arc<dyn CalendarSystem>;

/// A date and time expressed in some calendar system
///
/// Only `CalendarConverter` builds these, so the fields always satisfy the
/// owning calendar's rules.
#[derive(Clone)]
pub struct CalendarDateTime {
    calendar: CalendarRef,
    era: &'static str,
    era_year: i32,
    extended_year: i32,
    month: u8,
    month_code: MonthCode,
    day: u8,
    time: IsoTime,
    epoch_days: i64,
}

impl CalendarDateTime {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        calendar: CalendarRef,
        era: &'static str,
        era_year: i32,
        extended_year: i32,
        month: u8,
        month_code: MonthCode,
        day: u8,
        time: IsoTime,
        epoch_days: i64,
    ) -> Self {
        Self {
            calendar,
            era,
            era_year,
            extended_year,
            month,
            month_code,
            day,
            time,
            epoch_days,
        }
    }

    pub fn calendar(&self) -> &CalendarRef {
        &self.calendar
    }

    pub fn calendar_id(&self) -> &'static str {
        self.calendar.meta().id
    }

    pub fn era(&self) -> &'static str {
        self.era
    }

    pub fn era_year(&self) -> i32 {
        self.era_year
    }

    /// Continuous year count, independent of eras
    pub fn extended_year(&self) -> i32 {
        self.extended_year
    }

    /// Ordinal month (1-based)
    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn month_code(&self) -> MonthCode {
        self.month_code
    }

    pub fn day_of_month(&self) -> u8 {
        self.day
    }

    pub fn time(&self) -> IsoTime {
        self.time
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

    /// Days since 1970-01-01 ISO
    pub fn epoch_days(&self) -> i64 {
        self.epoch_days
    }

    // ========== Derived fields ==========

    pub fn day_of_week(&self) -> Weekday {
        FieldQueryEngine::day_of_week(self)
    }

    pub fn day_of_year(&self) -> u16 {
        FieldQueryEngine::day_of_year(self)
    }

    pub fn days_in_month(&self) -> u8 {
        FieldQueryEngine::days_in_month(self)
    }

    pub fn days_in_year(&self) -> u16 {
        FieldQueryEngine::days_in_year(self)
    }

    pub fn months_in_year(&self) -> u8 {
        FieldQueryEngine::months_in_year(self)
    }

    pub fn is_in_leap_year(&self) -> bool {
        FieldQueryEngine::is_in_leap_year(self)
    }

    pub fn to_iso(&self) -> Result<IsoDateTime, CalendarError> {
        CalendarConverter::to_iso(self)
    }
}

impl PartialEq for CalendarDateTime {
    fn eq(&self, other: &Self) -> bool {
        self.calendar_id() == other.calendar_id()
            && self.era == other.era
            && self.era_year == other.era_year
            && self.extended_year == other.extended_year
            && self.month == other.month
            && self.month_code == other.month_code
            && self.day == other.day
            && self.time == other.time
            && self.epoch_days == other.epoch_days
    }
}

impl Eq for CalendarDateTime {}

impl fmt::Debug for CalendarDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarDateTime")
            .field("calendar", &self.calendar_id())
            .field("era", &self.era)
            .field("era_year", &self.era_year)
            .field("extended_year", &self.extended_year)
            .field("month", &self.month)
            .field("month_code", &self.month_code)
            .field("day", &self.day)
            .field("time", &self.time)
            .finish()
    }
}

impl fmt::Display for CalendarDateTime {
    /// ISO rendering with a calendar annotation, e.g. `2024-03-20T00:00:00[u-ca=hebrew]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = IsoDate::from_epoch_days(self.epoch_days).map_err(|_| fmt::Error)?;
        write!(
            f,
            "{}[u-ca={}]",
            IsoDateTime::new(date, self.time),
            self.calendar_id()
        )
    }
}

impl Serialize for CalendarDateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("CalendarDateTime", 11)?;
        s.serialize_field("calendar", self.calendar_id())?;
        s.serialize_field("era", self.era)?;
        s.serialize_field("era_year", &self.era_year)?;
        s.serialize_field("extended_year", &self.extended_year)?;
        s.serialize_field("month", &self.month)?;
        s.serialize_field("month_code", &self.month_code)?;
        s.serialize_field("day", &self.day)?;
        s.serialize_field("hour", &self.time.hour())?;
        s.serialize_field("minute", &self.time.minute())?;
        s.serialize_field("second", &self.time.second())?;
        s.serialize_field("nanosecond", &self.time.nanosecond())?;
        s.end()
    }
}
