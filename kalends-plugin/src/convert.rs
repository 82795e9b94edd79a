//! ISO <-> calendar conversion
//!
//! Every conversion goes through the epoch day. To find the calendar date of
//! a day, the year is estimated from the descriptor's mean year and then
//! corrected with `new_year` until it brackets the day; the month walk and
//! era lookup follow.

use crate::{CalendarDateTime, CalendarRef, CalendarSystem, EraDef, MonthCode};
use kalends_core::{CalendarError, IsoDate, IsoDateTime, IsoTime};
use tracing::{debug, warn};

/// Year corrections allowed after the mean-year estimate
const MAX_YEAR_STEPS: usize = 8;

/// Converts between `IsoDateTime` and `CalendarDateTime`
pub struct CalendarConverter;

impl CalendarConverter {
    /// Express an ISO date-time in `calendar`; the time of day is copied as is
    pub fn to_calendar(
        iso: &IsoDateTime,
        calendar: &CalendarRef,
    ) -> Result<CalendarDateTime, CalendarError> {
        let epoch_days = iso.date().to_epoch_days();
        let date = Self::from_epoch_days(epoch_days, iso.time(), calendar)?;
        debug!(
            iso = %iso,
            calendar = date.calendar_id(),
            year = date.extended_year(),
            month = date.month(),
            day = date.day_of_month(),
            "converted to calendar"
        );
        Ok(date)
    }

    /// ISO equivalent, recomputed from the calendar fields
    pub fn to_iso(date: &CalendarDateTime) -> Result<IsoDateTime, CalendarError> {
        let calendar = date.calendar();
        let start = validate_year(calendar.as_ref(), date.extended_year())?;
        let epoch_days = day_in_year(calendar.as_ref(), date.extended_year(), date.month(), date.day_of_month(), start);
        let iso = IsoDate::from_epoch_days(epoch_days)?;
        Ok(IsoDateTime::new(iso, date.time()))
    }

    /// Build a calendar date from calendar-native fields
    ///
    /// With an era, `year` is counted in that era; without one it is the
    /// extended year. The era reported by the result is the one the date
    /// actually falls in, so "heisei 32" comes back as "reiwa 2".
    pub fn from_fields(
        calendar: &CalendarRef,
        era: Option<&str>,
        year: i32,
        month: u8,
        day: u8,
        time: IsoTime,
    ) -> Result<CalendarDateTime, CalendarError> {
        let extended_year = resolve_year(calendar.as_ref(), era, year)?;
        Self::from_extended(calendar, extended_year, month, day, time)
    }

    /// Like `from_fields`, with the month named by its code
    pub fn from_codes(
        calendar: &CalendarRef,
        era: Option<&str>,
        year: i32,
        month_code: MonthCode,
        day: u8,
        time: IsoTime,
    ) -> Result<CalendarDateTime, CalendarError> {
        let extended_year = resolve_year(calendar.as_ref(), era, year)?;
        validate_year(calendar.as_ref(), extended_year)?;
        let month = calendar
            .month_for_code(extended_year, month_code)
            .ok_or_else(|| {
                CalendarError::invalid_field(
                    "month_code",
                    month_code,
                    format!("{} year {} has no such month", calendar.meta().id, extended_year),
                )
            })?;
        Self::from_extended(calendar, extended_year, month, day, time)
    }

    /// Re-express a calendar date in another calendar
    pub fn convert(
        date: &CalendarDateTime,
        target: &CalendarRef,
    ) -> Result<CalendarDateTime, CalendarError> {
        let iso = Self::to_iso(date)?;
        Self::to_calendar(&iso, target)
    }

    fn from_extended(
        calendar: &CalendarRef,
        extended_year: i32,
        month: u8,
        day: u8,
        time: IsoTime,
    ) -> Result<CalendarDateTime, CalendarError> {
        let system = calendar.as_ref();
        let start = validate_year(system, extended_year)?;
        let months = system.months_in_year(extended_year);
        if month < 1 || month > months {
            return Err(CalendarError::invalid_field(
                "month",
                month,
                format!("{} year {} has {} months", system.meta().id, extended_year, months),
            ));
        }
        let max_day = system.days_in_month(extended_year, month);
        if day < 1 || day > max_day {
            return Err(CalendarError::invalid_field(
                "day",
                day,
                format!("month {} has {} days", system.month_code(extended_year, month), max_day),
            ));
        }
        let epoch_days = day_in_year(system, extended_year, month, day, start);
        // Reject dates whose ISO equivalent leaves the supported range
        IsoDate::from_epoch_days(epoch_days)?;
        Self::from_epoch_days(epoch_days, time, calendar)
    }

    fn from_epoch_days(
        epoch_days: i64,
        time: IsoTime,
        calendar: &CalendarRef,
    ) -> Result<CalendarDateTime, CalendarError> {
        let system = calendar.as_ref();
        let meta = system.meta();
        let year = locate_year(system, epoch_days)?;
        let start = validate_year(system, year)?;
        let (month, day) = walk_months(system, year, epoch_days - start)?;
        let era = resolve_era(meta.eras, meta.id, year, month, day)?;
        Ok(CalendarDateTime::from_parts(
            calendar.clone(),
            era.code,
            era.era_year(year),
            year,
            month,
            system.month_code(year, month),
            day,
            time,
            epoch_days,
        ))
    }
}

// ============================================================================
// Descriptor checks and walks
// ============================================================================

/// Check that `year` is well formed and return its first epoch day
fn validate_year(system: &dyn CalendarSystem, year: i32) -> Result<i64, CalendarError> {
    let id = system.meta().id;
    let malformed = |detail: String| {
        warn!(calendar = id, year, "{}", detail);
        CalendarError::unsupported(format!("{}: {}", id, detail))
    };

    let months = system.months_in_year(year);
    if months == 0 || months > 13 {
        return Err(malformed(format!("year {} has {} months", year, months)));
    }
    let start = system.new_year(year);
    let next = year
        .checked_add(1)
        .map(|y| system.new_year(y))
        .ok_or_else(|| CalendarError::range(format!("year {} has no successor", year)))?;
    if next <= start {
        return Err(malformed(format!("year {} does not end after it starts", year)));
    }
    let mut total: i64 = 0;
    for month in 1..=months {
        let len = system.days_in_month(year, month);
        if len == 0 {
            return Err(malformed(format!("month {} of year {} has no days", month, year)));
        }
        total += len as i64;
    }
    if total != next - start {
        return Err(malformed(format!(
            "months of year {} add up to {} days, year boundaries give {}",
            year,
            total,
            next - start
        )));
    }
    Ok(start)
}

/// Year containing `epoch_days`
fn locate_year(system: &dyn CalendarSystem, epoch_days: i64) -> Result<i32, CalendarError> {
    let id = system.meta().id;
    let (days, years) = system.mean_year();
    if days <= 0 || years <= 0 {
        warn!(calendar = id, days, years, "mean year is not positive");
        return Err(CalendarError::unsupported(format!("{}: mean year is not positive", id)));
    }
    let offset = (epoch_days - system.new_year(1)) as i128;
    let estimate = 1 + (offset * years as i128).div_euclid(days as i128);
    let mut year = i32::try_from(estimate)
        .map_err(|_| CalendarError::range(format!("{} year estimate {} overflows", id, estimate)))?;

    for _ in 0..=MAX_YEAR_STEPS {
        if epoch_days < system.new_year(year) {
            year -= 1;
        } else if epoch_days >= system.new_year(year + 1) {
            year += 1;
        } else {
            return Ok(year);
        }
    }
    warn!(calendar = id, epoch_days, "year boundaries never bracket the day");
    Err(CalendarError::unsupported(format!(
        "{}: year boundaries do not bracket epoch day {}",
        id, epoch_days
    )))
}

/// (month, day) of the `offset`-th day (0-based) of `year`
fn walk_months(
    system: &dyn CalendarSystem,
    year: i32,
    mut offset: i64,
) -> Result<(u8, u8), CalendarError> {
    for month in 1..=system.months_in_year(year) {
        let len = system.days_in_month(year, month) as i64;
        if offset < len {
            return Ok((month, (offset + 1) as u8));
        }
        offset -= len;
    }
    Err(CalendarError::unsupported(format!(
        "{}: day falls past the last month of year {}",
        system.meta().id,
        year
    )))
}

/// Epoch day of (year, month, day); the fields must already be validated
fn day_in_year(system: &dyn CalendarSystem, year: i32, month: u8, day: u8, start: i64) -> i64 {
    let before: i64 = (1..month).map(|m| system.days_in_month(year, m) as i64).sum();
    start + before + day as i64 - 1
}

/// The forward era with the latest start on or before the date, else the
/// inverse era
fn resolve_era(
    eras: &'static [EraDef],
    id: &str,
    year: i32,
    month: u8,
    day: u8,
) -> Result<&'static EraDef, CalendarError> {
    let key = (year, month, day);
    eras.iter()
        .filter(|e| !e.inverse && e.start.map_or(true, |s| s <= key))
        .max_by_key(|e| e.start)
        .or_else(|| eras.iter().find(|e| e.inverse))
        .ok_or_else(|| {
            warn!(calendar = id, year, "no era covers the date");
            CalendarError::unsupported(format!("{}: no era covers year {}", id, year))
        })
}

/// Extended year for an (era, era year) pair
fn resolve_year(system: &dyn CalendarSystem, era: Option<&str>, year: i32) -> Result<i32, CalendarError> {
    let meta = system.meta();
    if meta.eras.is_empty() {
        warn!(calendar = meta.id, "descriptor has no eras");
        return Err(CalendarError::unsupported(format!("{}: descriptor has no eras", meta.id)));
    }
    let Some(code) = era else {
        return Ok(year);
    };
    let def = meta
        .eras
        .iter()
        .find(|e| e.code.eq_ignore_ascii_case(code))
        .ok_or_else(|| {
            let known: Vec<&str> = meta.eras.iter().map(|e| e.code).collect();
            CalendarError::invalid_field(
                "era",
                code,
                format!("{} eras are {}", meta.id, known.join(", ")),
            )
        })?;
    if year < 1 && !def.allows_any_year() {
        return Err(CalendarError::invalid_field("era_year", year, "must be at least 1"));
    }
    Ok(def.extended_year(year))
}
