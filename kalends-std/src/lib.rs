//! Kalends Standard Calendars

pub mod calendars;

use kalends_plugin::CalendarRegistry;

/// Load the standard calendars into a registry
pub fn load_standard_calendars(registry: CalendarRegistry) -> CalendarRegistry {
    registry
        .with_calendar(calendars::Iso)
        // Gregorian arithmetic, different eras
        .with_calendar(calendars::Gregorian)
        .with_calendar(calendars::Buddhist)
        .with_calendar(calendars::Roc)
        .with_calendar(calendars::Japanese)
        .with_calendar(calendars::Julian)
        // 13-month solar calendars
        .with_calendar(calendars::Coptic)
        .with_calendar(calendars::Ethiopian)
        .with_calendar(calendars::EthiopianAmeteAlem)
        .with_calendar(calendars::Indian)
        .with_calendar(calendars::Persian)
        // Lunar and lunisolar
        .with_calendar(calendars::HijriTabular)
        .with_calendar(calendars::Hebrew)
}

/// Create registry with the standard calendars
pub fn standard_registry() -> CalendarRegistry {
    load_standard_calendars(CalendarRegistry::new())
}
