//! Server configuration, read from the environment

use kalends_core::TimePrecision;
use kalends_plugin::CalendarRegistry;
use tracing::warn;

/// Calendar used when neither the request nor the environment names one
pub const FALLBACK_CALENDAR: &str = "gregory";

/// Log filter directive: `KALENDS_LOG`, then `RUST_LOG`, then `info`
///
/// Separate from `ServerConfig` because the subscriber has to be installed
/// before the rest of the configuration can log its warnings.
pub fn log_filter<F>(lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup("KALENDS_LOG")
        .filter(|s| !s.trim().is_empty())
        .or_else(|| lookup("RUST_LOG"))
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "info".to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Log filter directive for the stderr subscriber
    pub log_filter: String,
    /// Canonical id of the calendar tools use when a request omits one
    pub default_calendar: String,
    /// Precision of rendered times
    pub time_precision: TimePrecision,
}

impl ServerConfig {
    /// Gather configuration from the process environment
    pub fn from_env(registry: &CalendarRegistry) -> Self {
        Self::from_lookup(registry, |key| std::env::var(key).ok())
    }

    /// Gather configuration through `lookup`
    ///
    /// Bad values never stop the server: they are logged and replaced by
    /// the defaults.
    pub fn from_lookup<F>(registry: &CalendarRegistry, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_filter = log_filter(&lookup);

        let default_calendar = match lookup("KALENDS_DEFAULT_CALENDAR") {
            Some(name) => match registry.canonical_id(name.trim()) {
                Some(id) => id.to_string(),
                None => {
                    warn!(calendar = %name, fallback = FALLBACK_CALENDAR, "unknown default calendar");
                    FALLBACK_CALENDAR.to_string()
                }
            },
            None => FALLBACK_CALENDAR.to_string(),
        };

        let time_precision = match lookup("KALENDS_TIME_PRECISION") {
            Some(raw) => raw.parse().unwrap_or_else(|err| {
                warn!(value = %raw, error = %err, "invalid time precision, using second");
                TimePrecision::default()
            }),
            None => TimePrecision::default(),
        };

        Self {
            log_filter,
            default_calendar,
            time_precision,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            default_calendar: FALLBACK_CALENDAR.to_string(),
            time_precision: TimePrecision::default(),
        }
    }
}
