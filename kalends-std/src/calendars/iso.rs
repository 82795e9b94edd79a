//! ISO 8601

use kalends_core::epoch;
use kalends_plugin::prelude::*;

pub struct Iso;

static ISO_ERAS: [EraDef; 1] = [EraDef::unbounded("default", "ISO", 0)];

impl CalendarSystem for Iso {
    fn meta(&self) -> CalendarMeta {
        CalendarMeta {
            id: "iso",
            name: "ISO 8601",
            description: "Proleptic Gregorian with a single era and signed years",
            aliases: &["iso8601"],
            eras: &ISO_ERAS,
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
