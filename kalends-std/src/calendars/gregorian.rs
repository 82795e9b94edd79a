//! Calendars on Gregorian arithmetic that differ only in their eras
//!
//! The extended year of each is the ISO year.

use kalends_core::epoch;
use kalends_plugin::prelude::*;

pub struct Gregorian;
pub struct Buddhist;
pub struct Roc;
pub struct Japanese;

static GREGORIAN_ERAS: [EraDef; 2] = [
    EraDef::inverse("bce", "Before Common Era", 1),
    EraDef::starting("ce", "Common Era", (1, 1, 1), 0),
];

static BUDDHIST_ERAS: [EraDef; 1] = [EraDef::unbounded("be", "Buddhist Era", -543)];

static ROC_ERAS: [EraDef; 2] = [
    EraDef::inverse("broc", "Before Minguo", 1912),
    EraDef::starting("roc", "Minguo", (1912, 1, 1), 1911),
];

/// Modern Japanese eras, Common Era before Meiji
static JAPANESE_ERAS: [EraDef; 7] = [
    EraDef::inverse("bce", "Before Common Era", 1),
    EraDef::starting("ce", "Common Era", (1, 1, 1), 0),
    EraDef::starting("meiji", "Meiji", (1868, 10, 23), 1867),
    EraDef::starting("taisho", "Taishō", (1912, 7, 30), 1911),
    EraDef::starting("showa", "Shōwa", (1926, 12, 25), 1925),
    EraDef::starting("heisei", "Heisei", (1989, 1, 8), 1988),
    EraDef::starting("reiwa", "Reiwa", (2019, 5, 1), 2018),
];

impl CalendarSystem for Gregorian {
    fn meta(&self) -> CalendarMeta {
        CalendarMeta {
            id: "gregory",
            name: "Gregorian",
            description: "Proleptic Gregorian with BCE/CE eras",
            aliases: &["gregorian"],
            eras: &GREGORIAN_ERAS,
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

impl CalendarSystem for Buddhist {
    fn meta(&self) -> CalendarMeta {
        CalendarMeta {
            id: "buddhist",
            name: "Buddhist",
            description: "Thai solar calendar: Gregorian months, years counted from 543 BCE",
            aliases: &[],
            eras: &BUDDHIST_ERAS,
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

impl CalendarSystem for Roc {
    fn meta(&self) -> CalendarMeta {
        CalendarMeta {
            id: "roc",
            name: "Republic of China",
            description: "Minguo calendar: Gregorian months, year 1 is 1912",
            aliases: &["minguo"],
            eras: &ROC_ERAS,
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

impl CalendarSystem for Japanese {
    fn meta(&self) -> CalendarMeta {
        CalendarMeta {
            id: "japanese",
            name: "Japanese",
            description: "Gregorian months with imperial eras from Meiji onwards",
            aliases: &[],
            eras: &JAPANESE_ERAS,
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
