//! Small calendars for exercising the converter

use crate::{CalendarMeta, CalendarRef, CalendarSystem, EraDef, MonthCode};
use kalends_core::epoch;
use std::sync::Arc;

/// Proleptic Gregorian with BCE/CE eras
pub struct Proleptic;

static PROLEPTIC_ERAS: [EraDef; 2] = [
    EraDef::inverse("bce", "Before Common Era", 1),
    EraDef::starting("ce", "Common Era", (1, 1, 1), 0),
];

impl CalendarSystem for Proleptic {
    fn meta(&self) -> CalendarMeta {
        CalendarMeta {
            id: "proleptic",
            name: "Proleptic",
            description: "Gregorian rules, for tests",
            aliases: &["pg"],
            eras: &PROLEPTIC_ERAS,
        }
    }

    fn new_year(&self, year: i32) -> i64 {
        epoch::days_from_civil(year, 1, 1)
    }

    fn is_leap_year(&self, year: i32) -> bool {
        epoch::is_leap_year(year)
    }

    fn days_in_month(&self, year: i32, month: u8) -> u8 {
        epoch::days_in_month(year, month)
    }
}

/// Thirteen months of 28 days, the last one stretched to fill the ISO year
pub struct Thirteen;

static THIRTEEN_ERAS: [EraDef; 1] = [EraDef::unbounded("te", "Thirteen Era", 0)];

impl CalendarSystem for Thirteen {
    fn meta(&self) -> CalendarMeta {
        CalendarMeta {
            id: "thirteen",
            name: "Thirteen",
            description: "13 x 28 days, for tests",
            aliases: &["positivist"],
            eras: &THIRTEEN_ERAS,
        }
    }

    fn new_year(&self, year: i32) -> i64 {
        epoch::days_from_civil(year, 1, 1)
    }

    fn is_leap_year(&self, year: i32) -> bool {
        epoch::is_leap_year(year)
    }

    fn months_in_year(&self, _year: i32) -> u8 {
        13
    }

    fn days_in_month(&self, year: i32, month: u8) -> u8 {
        match month {
            1..=12 => 28,
            13 if self.is_leap_year(year) => 30,
            13 => 29,
            _ => 0,
        }
    }
}

/// Every third year inserts a 30-day leap month after month 6
pub struct Lunisolar;

static LUNISOLAR_ERAS: [EraDef; 1] = [EraDef::unbounded("ls", "Lunisolar Era", 0)];

impl CalendarSystem for Lunisolar {
    fn meta(&self) -> CalendarMeta {
        CalendarMeta {
            id: "lunisolar",
            name: "Lunisolar",
            description: "354/384-day years, for tests",
            aliases: &[],
            eras: &LUNISOLAR_ERAS,
        }
    }

    fn new_year(&self, year: i32) -> i64 {
        let y = year as i64 - 1;
        354 * y + 30 * y.div_euclid(3)
    }

    fn is_leap_year(&self, year: i32) -> bool {
        year.rem_euclid(3) == 0
    }

    fn months_in_year(&self, year: i32) -> u8 {
        if self.is_leap_year(year) {
            13
        } else {
            12
        }
    }

    fn days_in_month(&self, year: i32, month: u8) -> u8 {
        let code = self.month_code(year, month);
        if code.is_leap() || code.number() % 2 == 1 {
            30
        } else {
            29
        }
    }

    fn month_code(&self, year: i32, month: u8) -> MonthCode {
        if !self.is_leap_year(year) || month <= 6 {
            MonthCode::new(month)
        } else if month == 7 {
            MonthCode::new_leap(6)
        } else {
            MonthCode::new(month - 1)
        }
    }

    fn mean_year(&self) -> (i64, i64) {
        (354 * 3 + 30, 3)
    }
}

/// Ways a descriptor can be malformed
#[derive(Debug, Clone, Copy)]
pub enum Flaw {
    ZeroLengthMonth,
    LengthMismatch,
    TooManyMonths,
    NoMonths,
    NoEras,
    Backwards,
}

pub struct Broken(pub Flaw);

static NO_ERAS: [EraDef; 0] = [];

impl CalendarSystem for Broken {
    fn meta(&self) -> CalendarMeta {
        CalendarMeta {
            id: "broken",
            name: "Broken",
            description: "Malformed on purpose",
            aliases: &[],
            eras: match self.0 {
                Flaw::NoEras => &NO_ERAS[..],
                _ => &PROLEPTIC_ERAS[..],
            },
        }
    }

    fn new_year(&self, year: i32) -> i64 {
        match self.0 {
            Flaw::Backwards => -(year as i64) * 365,
            _ => epoch::days_from_civil(year, 1, 1),
        }
    }

    fn is_leap_year(&self, year: i32) -> bool {
        epoch::is_leap_year(year)
    }

    fn months_in_year(&self, _year: i32) -> u8 {
        match self.0 {
            Flaw::TooManyMonths => 14,
            Flaw::NoMonths => 0,
            _ => 12,
        }
    }

    fn days_in_month(&self, year: i32, month: u8) -> u8 {
        match (self.0, month) {
            (Flaw::ZeroLengthMonth, 2) => 0,
            (Flaw::LengthMismatch, _) => 30,
            _ => epoch::days_in_month(year, month),
        }
    }
}

pub fn proleptic() -> CalendarRef {
    Arc::new(Proleptic)
}

pub fn thirteen() -> CalendarRef {
    Arc::new(Thirteen)
}

pub fn lunisolar() -> CalendarRef {
    Arc::new(Lunisolar)
}

pub fn broken(flaw: Flaw) -> CalendarRef {
    Arc::new(Broken(flaw))
}
