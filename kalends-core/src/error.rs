//! Calendar errors and their structured form
//!
//! `CalendarError` is what every fallible operation in the engine returns.
//! `KalendsError` is the serializable shape handed to callers outside the
//! library (the MCP server), with a machine-readable code and a suggestion.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while constructing or converting dates
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    /// A field is out of range or the combination is impossible
    #[error("Invalid {field}: {value} ({reason})")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// Result would leave the supported range
    #[error("Out of range: {0}")]
    Range(String),

    /// Unknown calendar identifier or malformed descriptor
    #[error("Unsupported calendar: {0}")]
    UnsupportedCalendar(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Expected calendar {expected} but found calendar {found}")]
    MismatchedCalendar { expected: String, found: String },
}

impl CalendarError {
    pub fn invalid_field(
        field: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn range(details: impl Into<String>) -> Self {
        Self::Range(details.into())
    }

    pub fn unsupported(details: impl Into<String>) -> Self {
        Self::UnsupportedCalendar(details.into())
    }

    pub fn parse(details: impl Into<String>) -> Self {
        Self::Parse(details.into())
    }

    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidField { .. } => codes::INVALID_FIELD,
            Self::Range(_) => codes::RANGE_ERROR,
            Self::UnsupportedCalendar(_) => codes::UNSUPPORTED_CALENDAR,
            Self::Parse(_) => codes::PARSE_ERROR,
            Self::MismatchedCalendar { .. } => codes::MISMATCHED_CALENDAR,
        }
    }
}

/// Standard error codes (machine-readable)
pub mod codes {
    pub const INVALID_FIELD: &str = "INVALID_FIELD";
    pub const RANGE_ERROR: &str = "RANGE_ERROR";
    pub const UNSUPPORTED_CALENDAR: &str = "UNSUPPORTED_CALENDAR";
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const MISMATCHED_CALENDAR: &str = "MISMATCHED_CALENDAR";
    pub const ARG_MISSING: &str = "ARG_MISSING";
    pub const ARG_TYPE: &str = "ARG_TYPE";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Request failed
    Error,
    /// Server cannot continue
    Fatal,
}

/// Context about where an error occurred
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Tool that was running
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,

    /// Argument that was rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub argument: Option<String>,

    /// Calendar involved, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar: Option<String>,
}

/// Structured error for callers outside the library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KalendsError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,

    pub severity: Severity,
}

impl KalendsError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            context: None,
            severity: Severity::Error,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: set tool context
    pub fn in_tool(mut self, tool: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.tool = Some(tool.into());
        self
    }

    /// Builder: set argument context
    pub fn for_argument(mut self, argument: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.argument = Some(argument.into());
        self
    }

    /// Builder: set calendar context
    pub fn with_calendar(mut self, calendar: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.calendar = Some(calendar.into());
        self
    }

    // ========== Common Error Constructors ==========

    pub fn arg_missing(tool: &str, arg: &str) -> Self {
        Self::new(codes::ARG_MISSING, format!("{}: missing argument '{}'", tool, arg))
            .with_suggestion("Use tools/list to see the input schema")
            .in_tool(tool)
            .for_argument(arg)
    }

    pub fn arg_type(tool: &str, arg: &str, expected: &str) -> Self {
        Self::new(
            codes::ARG_TYPE,
            format!("{}: argument '{}' must be {}", tool, arg, expected),
        )
        .in_tool(tool)
        .for_argument(arg)
    }

    /// A failure in the server itself rather than in the request
    pub fn internal(details: impl Into<String>) -> Self {
        let mut err = Self::new(codes::INTERNAL, format!("Internal error: {}", details.into()))
            .with_suggestion("This is a bug, please report it");
        err.severity = Severity::Fatal;
        err
    }
}

impl std::fmt::Display for KalendsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for KalendsError {}

impl From<CalendarError> for KalendsError {
    fn from(err: CalendarError) -> Self {
        let suggestion = match &err {
            CalendarError::InvalidField { field, .. } => match *field {
                "hour" | "minute" | "second" | "nanosecond" => {
                    "Check time components (hour 0-23, minute 0-59, second 0-59)"
                }
                "era" => "Use list_calendars to see the eras of each calendar",
                _ => "Check date components against the calendar's month and day counts",
            },
            CalendarError::Range(_) => "Supported ISO years are -9999 through 9999",
            CalendarError::UnsupportedCalendar(_) => {
                "Use list_calendars for the available calendar identifiers"
            }
            CalendarError::Parse(_) => {
                "Use ISO 8601 (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS) with an optional [u-ca=...] annotation"
            }
            CalendarError::MismatchedCalendar { .. } => {
                "Drop the [u-ca=...] annotation or request the calendar it names"
            }
        };
        Self::new(err.code(), err.to_string()).with_suggestion(suggestion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_field_message() {
        let err = CalendarError::invalid_field("month", 13, "must be 1-12");
        assert_eq!(err.to_string(), "Invalid month: 13 (must be 1-12)");
        assert_eq!(err.code(), codes::INVALID_FIELD);
    }

    #[test]
    fn test_into_structured() {
        let err: KalendsError = CalendarError::range("year 10000").into();
        assert_eq!(err.code, codes::RANGE_ERROR);
        assert_eq!(err.message, "Out of range: year 10000");
        assert!(err.suggestion.is_some());
        assert_eq!(err.severity, Severity::Error);
    }

    #[test]
    fn test_time_field_suggestion() {
        let err: KalendsError = CalendarError::invalid_field("hour", 24, "must be 0-23").into();
        assert!(err.suggestion.unwrap().contains("hour 0-23"));
    }

    #[test]
    fn test_builder_context() {
        let err = KalendsError::arg_missing("to_calendar", "calendar").with_calendar("hebrew");
        let ctx = err.context.unwrap();
        assert_eq!(ctx.tool.as_deref(), Some("to_calendar"));
        assert_eq!(ctx.argument.as_deref(), Some("calendar"));
        assert_eq!(ctx.calendar.as_deref(), Some("hebrew"));
    }

    #[test]
    fn test_internal_is_fatal() {
        let err = KalendsError::internal("encoder failed");
        assert_eq!(err.code, codes::INTERNAL);
        assert_eq!(err.message, "Internal error: encoder failed");
        assert_eq!(err.severity, Severity::Fatal);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["severity"], "fatal");
    }

    #[test]
    fn test_serialize_skips_empty() {
        let err = KalendsError::new(codes::INTERNAL, "boom");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "INTERNAL");
        assert_eq!(json["severity"], "error");
        assert!(json.get("suggestion").is_none());
        assert!(json.get("context").is_none());
    }

    #[test]
    fn test_display() {
        let err = KalendsError::new("X", "msg").with_suggestion("fix it");
        assert_eq!(err.to_string(), "[X] msg (suggestion: fix it)");
    }
}
