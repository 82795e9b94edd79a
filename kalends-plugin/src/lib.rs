//! Kalends Plugin System
//!
//! Calendars plug into Kalends as `CalendarSystem` descriptors. This crate
//! holds the descriptor trait and everything that works generically over it:
//! - `CalendarRegistry`: lookup by id or alias, IXDTF parsing
//! - `CalendarConverter`: ISO <-> calendar conversion
//! - `FieldQueryEngine`: derived fields under the owning calendar's rules

mod traits;
mod registry;
mod datetime;
mod convert;
mod fields;

#[cfg(test)]
mod testing;

pub use traits::{CalendarMeta, CalendarSystem, EraDef, MonthCode};
pub use registry::CalendarRegistry;
pub use datetime::{CalendarDateTime, CalendarRef};
pub use convert::CalendarConverter;
pub use fields::FieldQueryEngine;

/// Re-export core types for calendar authors
pub mod prelude {
    pub use crate::{
        CalendarConverter, CalendarDateTime, CalendarMeta, CalendarRef, CalendarRegistry,
        CalendarSystem, EraDef, FieldQueryEngine, MonthCode,
    };
    pub use kalends_core::prelude::*;
}
