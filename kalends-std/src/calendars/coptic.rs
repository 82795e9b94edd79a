//! Coptic and Ethiopian calendars
//!
//! Twelve months of 30 days and a 13th month of 5 days (6 in leap years).
//! Leap years are those one short of a multiple of four. The Ethiopian
//! calendar is the Coptic one with a different epoch.

use kalends_plugin::prelude::*;

pub struct Coptic;
pub struct Ethiopian;
/// Ethiopian months with every year counted in the Amete Alem era
pub struct EthiopianAmeteAlem;

/// Epoch day of Coptic 0001-01-01 (Julian 284-08-29)
const COPTIC_EPOCH: i64 = -615_558;
/// Epoch day of Ethiopian 0001-01-01 AM (Julian 8-08-29)
const ETHIOPIAN_EPOCH: i64 = -716_367;
/// Amete Alem year of 1 Amete Mihret, minus one
const AMETE_ALEM_OFFSET: i32 = 5500;

static COPTIC_ERAS: [EraDef; 1] = [EraDef::unbounded("am", "Anno Martyrum", 0)];

static ETHIOPIAN_ERAS: [EraDef; 2] = [
    EraDef::unbounded("aa", "Amete Alem", -AMETE_ALEM_OFFSET),
    EraDef::starting("am", "Amete Mihret", (1, 1, 1), 0),
];

static AMETE_ALEM_ERAS: [EraDef; 1] = [EraDef::unbounded("aa", "Amete Alem", 0)];

fn new_year(epoch: i64, year: i32) -> i64 {
    let y = year as i64;
    epoch + 365 * (y - 1) + y.div_euclid(4)
}

fn is_leap(year: i32) -> bool {
    year.rem_euclid(4) == 3
}

fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1..=12 => 30,
        13 if is_leap(year) => 6,
        13 => 5,
        _ => 0,
    }
}

impl CalendarSystem for Coptic {
    fn meta(&self) -> CalendarMeta {
        CalendarMeta {
            id: "coptic",
            name: "Coptic",
            description: "Alexandrian calendar counted from 284 CE",
            aliases: &[],
            eras: &COPTIC_ERAS,
        }
    }

    fn new_year(&self, year: i32) -> i64 {
        new_year(COPTIC_EPOCH, year)
    }

    fn is_leap_year(&self, year: i32) -> bool {
        is_leap(year)
    }

    fn months_in_year(&self, _year: i32) -> u8 {
        13
    }

    fn days_in_month(&self, year: i32, month: u8) -> u8 {
        days_in_month(year, month)
    }

    fn mean_year(&self) -> (i64, i64) {
        (1461, 4)
    }
}

impl CalendarSystem for Ethiopian {
    fn meta(&self) -> CalendarMeta {
        CalendarMeta {
            id: "ethiopic",
            name: "Ethiopian",
            description: "Ethiopian calendar, Amete Mihret years with Amete Alem before them",
            aliases: &["ethiopian"],
            eras: &ETHIOPIAN_ERAS,
        }
    }

    fn new_year(&self, year: i32) -> i64 {
        new_year(ETHIOPIAN_EPOCH, year)
    }

    fn is_leap_year(&self, year: i32) -> bool {
        is_leap(year)
    }

    fn months_in_year(&self, _year: i32) -> u8 {
        13
    }

    fn days_in_month(&self, year: i32, month: u8) -> u8 {
        days_in_month(year, month)
    }

    fn mean_year(&self) -> (i64, i64) {
        (1461, 4)
    }
}

impl CalendarSystem for EthiopianAmeteAlem {
    fn meta(&self) -> CalendarMeta {
        CalendarMeta {
            id: "ethioaa",
            name: "Ethiopian (Amete Alem)",
            description: "Ethiopian calendar with all years in the Amete Alem era",
            aliases: &["ethiopic-amete-alem"],
            eras: &AMETE_ALEM_ERAS,
        }
    }

    fn new_year(&self, year: i32) -> i64 {
        new_year(ETHIOPIAN_EPOCH, year - AMETE_ALEM_OFFSET)
    }

    fn is_leap_year(&self, year: i32) -> bool {
        is_leap(year - AMETE_ALEM_OFFSET)
    }

    fn months_in_year(&self, _year: i32) -> u8 {
        13
    }

    fn days_in_month(&self, year: i32, month: u8) -> u8 {
        days_in_month(year - AMETE_ALEM_OFFSET, month)
    }

    fn mean_year(&self) -> (i64, i64) {
        (1461, 4)
    }
}
