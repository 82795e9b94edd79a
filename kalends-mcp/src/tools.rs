//! MCP tools
//!
//! Every tool takes its JSON arguments and answers with a result object.
//! Failures inside a tool are not protocol errors: they come back as a
//! `KalendsError` with `isError: true` so the client can show them.

use crate::config::ServerConfig;
use kalends_core::{IxdtfRecord, TimePrecision};
use kalends_plugin::prelude::*;
use serde_json::{json, Value as JsonValue};
use tracing::debug;

/// Names of the tools, in the order `tools/list` reports them
pub const TOOL_NAMES: [&str; 8] = [
    "iso_datetime",
    "to_calendar",
    "from_calendar",
    "fields",
    "epoch_minutes",
    "from_epoch_minutes",
    "parse",
    "list_calendars",
];

/// Registry plus configuration, shared by every tool call
pub struct Kalends {
    registry: CalendarRegistry,
    config: ServerConfig,
}

impl Kalends {
    pub fn new(registry: CalendarRegistry, config: ServerConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &CalendarRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Run a tool by name; `None` if there is no such tool
    pub fn call(&self, name: &str, args: &JsonValue) -> Option<JsonValue> {
        let result = match name {
            "iso_datetime" => self.iso_datetime(args),
            "to_calendar" => self.to_calendar(args),
            "from_calendar" => self.from_calendar(args),
            "fields" => self.fields(args),
            "epoch_minutes" => self.epoch_minutes(args),
            "from_epoch_minutes" => self.from_epoch_minutes(args),
            "parse" => self.parse(args),
            "list_calendars" => self.list_calendars(),
            _ => return None,
        };
        Some(match result {
            Ok(response) => response,
            Err(err) => {
                let err = err.in_tool(name);
                debug!(tool = name, code = %err.code, "tool failed");
                error_response(&err)
            }
        })
    }

    fn iso_datetime(&self, args: &JsonValue) -> Result<JsonValue, KalendsError> {
        const TOOL: &str = "iso_datetime";
        let date = IsoDate::try_new(
            year_arg(args, TOOL, "year")?,
            field_arg(args, TOOL, "month")?,
            field_arg(args, TOOL, "day")?,
        )?;
        let time = time_args(args, TOOL)?;
        let precision = self.precision(args, TOOL)?;
        let dt = IsoDateTime::new(date, time);
        let (week_year, week) = date.iso_week();
        let text = dt.format(precision);

        Ok(success(
            text.clone(),
            json!({
                "iso": text,
                "date": date,
                "time": time,
                "day_of_week": date.day_of_week().number(),
                "weekday": date.day_of_week(),
                "day_of_year": date.day_of_year(),
                "iso_week": { "year": week_year, "week": week },
                "days_in_month": date.days_in_month(),
                "days_in_year": date.days_in_year(),
                "months_in_year": date.months_in_year(),
                "is_in_leap_year": date.is_in_leap_year(),
                "epoch_days": date.to_epoch_days(),
            }),
        ))
    }

    fn to_calendar(&self, args: &JsonValue) -> Result<JsonValue, KalendsError> {
        const TOOL: &str = "to_calendar";
        let text = str_arg(args, TOOL, "datetime")?;
        let record = IxdtfRecord::parse(text).map_err(|e| KalendsError::from(e).for_argument("datetime"))?;
        let iso = IsoDateTime::new(record.date, record.time.unwrap_or_default());
        let calendar = self.calendar(args, TOOL)?;
        let date = CalendarConverter::to_calendar(&iso, &calendar)?;
        self.describe(&date, args, TOOL)
    }

    fn from_calendar(&self, args: &JsonValue) -> Result<JsonValue, KalendsError> {
        const TOOL: &str = "from_calendar";
        let calendar = self.calendar(args, TOOL)?;
        let era = opt_str_arg(args, TOOL, "era")?;
        let year = year_arg(args, TOOL, "year")?;
        let day = field_arg(args, TOOL, "day")?;
        let time = time_args(args, TOOL)?;

        let date = match opt_str_arg(args, TOOL, "month_code")? {
            Some(code) => {
                let code: MonthCode = code
                    .parse()
                    .map_err(|e| KalendsError::from(e).for_argument("month_code"))?;
                if opt_int_arg(args, TOOL, "month")?.is_some() {
                    return Err(KalendsError::new(
                        codes::ARG_TYPE,
                        format!("{}: give either 'month' or 'month_code', not both", TOOL),
                    )
                    .for_argument("month"));
                }
                CalendarConverter::from_codes(&calendar, era, year, code, day, time)?
            }
            None => {
                let month = field_arg(args, TOOL, "month")?;
                CalendarConverter::from_fields(&calendar, era, year, month, day, time)?
            }
        };
        self.describe(&date, args, TOOL)
    }

    fn fields(&self, args: &JsonValue) -> Result<JsonValue, KalendsError> {
        const TOOL: &str = "fields";
        let text = str_arg(args, TOOL, "datetime")?;
        let date = self.parse_text(text, args, TOOL)?;
        let summary = format!(
            "{} {} of {}: {}, day {} of {}",
            date.calendar_id(),
            date.month_code(),
            date.extended_year(),
            date.day_of_week(),
            FieldQueryEngine::day_of_year(&date),
            FieldQueryEngine::days_in_year(&date)
        );
        Ok(success(
            summary,
            json!({
                "date": date,
                "day_of_week": FieldQueryEngine::day_of_week(&date).number(),
                "weekday": FieldQueryEngine::day_of_week(&date),
                "day_of_year": FieldQueryEngine::day_of_year(&date),
                "days_in_month": FieldQueryEngine::days_in_month(&date),
                "days_in_year": FieldQueryEngine::days_in_year(&date),
                "months_in_year": FieldQueryEngine::months_in_year(&date),
                "is_in_leap_year": FieldQueryEngine::is_in_leap_year(&date),
            }),
        ))
    }

    fn epoch_minutes(&self, args: &JsonValue) -> Result<JsonValue, KalendsError> {
        const TOOL: &str = "epoch_minutes";
        let text = str_arg(args, TOOL, "datetime")?;
        let record = IxdtfRecord::parse(text).map_err(|e| KalendsError::from(e).for_argument("datetime"))?;
        let time = record.time.unwrap_or_default();
        let minutes = EpochMinuteCodec::encode(record.date, time.hour(), time.minute())?;
        let fits_32_bit = i32::try_from(minutes).is_ok();
        Ok(success(
            minutes.to_string(),
            json!({
                "minutes": minutes,
                "fits_32_bit": fits_32_bit,
            }),
        ))
    }

    fn from_epoch_minutes(&self, args: &JsonValue) -> Result<JsonValue, KalendsError> {
        const TOOL: &str = "from_epoch_minutes";
        let minutes = int_arg(args, TOOL, "minutes")?;
        let (date, hour, minute) = EpochMinuteCodec::decode_i64(minutes)?;
        let iso = IsoDateTime::new(date, IsoTime::try_new(hour, minute, 0, 0)?);
        match opt_str_arg(args, TOOL, "calendar")? {
            Some(name) => {
                let calendar = self.registry.get(name).map_err(|e| KalendsError::from(e).for_argument("calendar"))?;
                let date = CalendarConverter::to_calendar(&iso, &calendar)?;
                self.describe(&date, args, TOOL)
            }
            None => {
                let text = iso.format(TimePrecision::Minute);
                Ok(success(
                    text.clone(),
                    json!({
                        "iso": text,
                        "date": date,
                        "hour": hour,
                        "minute": minute,
                    }),
                ))
            }
        }
    }

    fn parse(&self, args: &JsonValue) -> Result<JsonValue, KalendsError> {
        const TOOL: &str = "parse";
        let text = str_arg(args, TOOL, "text")?;
        let date = self.parse_text(text, args, TOOL)?;
        self.describe(&date, args, TOOL)
    }

    fn list_calendars(&self) -> Result<JsonValue, KalendsError> {
        let metas = self.registry.list();
        let text = metas
            .iter()
            .map(|m| {
                let eras: Vec<&str> = m.eras.iter().map(|e| e.code).collect();
                format!("- {}: {} (eras: {})", m.id, m.name, eras.join(", "))
            })
            .collect::<Vec<_>>()
            .join("\n");
        Ok(success(
            text,
            json!({
                "calendars": metas,
                "default": self.config.default_calendar,
            }),
        ))
    }

    // ========== Shared helpers ==========

    /// `calendar` argument, or the configured default
    fn calendar(&self, args: &JsonValue, tool: &str) -> Result<CalendarRef, KalendsError> {
        let name = opt_str_arg(args, tool, "calendar")?.unwrap_or(self.config.default_calendar.as_str());
        self.registry
            .get(name)
            .map_err(|e| KalendsError::from(e).for_argument("calendar").with_calendar(name))
    }

    fn precision(&self, args: &JsonValue, tool: &str) -> Result<TimePrecision, KalendsError> {
        match opt_str_arg(args, tool, "precision")? {
            Some(p) => p.parse().map_err(|e| KalendsError::from(e).for_argument("precision")),
            None => Ok(self.config.time_precision),
        }
    }

    /// Read an IXDTF string in the calendar named by the `calendar`
    /// argument, its own `[u-ca=...]` annotation, or the default
    fn parse_text(&self, text: &str, args: &JsonValue, tool: &str) -> Result<CalendarDateTime, KalendsError> {
        let record = IxdtfRecord::parse(text).map_err(|e| KalendsError::from(e).for_argument(tool_text_arg(tool)))?;
        let expected = match opt_str_arg(args, tool, "calendar")? {
            Some(name) => Some(name),
            None if record.calendar.is_none() => Some(self.config.default_calendar.as_str()),
            None => None,
        };
        let date = self.registry.parse(text, expected)?;
        Ok(date)
    }

    /// Standard answer for a tool that produced a calendar date
    fn describe(&self, date: &CalendarDateTime, args: &JsonValue, tool: &str) -> Result<JsonValue, KalendsError> {
        let precision = self.precision(args, tool)?;
        let iso = date.to_iso()?;
        let display = format!("{}[u-ca={}]", iso.format(precision), date.calendar_id());
        let summary = format!(
            "{} {} {} {} ({})",
            date.day_of_month(),
            date.month_code(),
            date.era_year(),
            date.era(),
            display
        );
        Ok(success(
            summary,
            json!({
                "date": date,
                "iso": iso.format(precision),
                "display": display,
                "epoch_days": date.epoch_days(),
            }),
        ))
    }
}

fn tool_text_arg(tool: &str) -> &'static str {
    if tool == "parse" {
        "text"
    } else {
        "datetime"
    }
}

fn success(text: String, data: JsonValue) -> JsonValue {
    json!({
        "content": [{ "type": "text", "text": text }],
        "data": data,
        "isError": false
    })
}

fn error_response(err: &KalendsError) -> JsonValue {
    json!({
        "content": [{ "type": "text", "text": err.to_string() }],
        "error": err,
        "isError": true
    })
}

// ========== Argument extraction ==========

fn arg<'a>(args: &'a JsonValue, name: &str) -> Option<&'a JsonValue> {
    args.get(name).filter(|v| !v.is_null())
}

fn opt_str_arg<'a>(args: &'a JsonValue, tool: &str, name: &str) -> Result<Option<&'a str>, KalendsError> {
    match arg(args, name) {
        None => Ok(None),
        Some(v) => v
            .as_str()
            .map(Some)
            .ok_or_else(|| KalendsError::arg_type(tool, name, "a string")),
    }
}

fn str_arg<'a>(args: &'a JsonValue, tool: &str, name: &str) -> Result<&'a str, KalendsError> {
    opt_str_arg(args, tool, name)?.ok_or_else(|| KalendsError::arg_missing(tool, name))
}

fn opt_int_arg(args: &JsonValue, tool: &str, name: &str) -> Result<Option<i64>, KalendsError> {
    match arg(args, name) {
        None => Ok(None),
        Some(v) => v
            .as_i64()
            .map(Some)
            .ok_or_else(|| KalendsError::arg_type(tool, name, "an integer")),
    }
}

fn int_arg(args: &JsonValue, tool: &str, name: &str) -> Result<i64, KalendsError> {
    opt_int_arg(args, tool, name)?.ok_or_else(|| KalendsError::arg_missing(tool, name))
}

fn year_arg(args: &JsonValue, tool: &str, name: &'static str) -> Result<i32, KalendsError> {
    let year = int_arg(args, tool, name)?;
    i32::try_from(year).map_err(|_| CalendarError::range(format!("year {}", year)).into())
}

/// Small field (month, day, time of day); out-of-range values are reported
/// as invalid fields rather than argument type errors
fn small_field(name: &'static str, value: i64) -> Result<u8, KalendsError> {
    u8::try_from(value).map_err(|_| CalendarError::invalid_field(name, value, "out of range").into())
}

fn field_arg(args: &JsonValue, tool: &str, name: &'static str) -> Result<u8, KalendsError> {
    small_field(name, int_arg(args, tool, name)?)
}

fn opt_field_arg(args: &JsonValue, tool: &str, name: &'static str) -> Result<u8, KalendsError> {
    opt_int_arg(args, tool, name)?.map_or(Ok(0), |v| small_field(name, v))
}

fn time_args(args: &JsonValue, tool: &str) -> Result<IsoTime, KalendsError> {
    let nanosecond = match opt_int_arg(args, tool, "nanosecond")? {
        Some(ns) => u32::try_from(ns)
            .map_err(|_| KalendsError::from(CalendarError::invalid_field("nanosecond", ns, "out of range")))?,
        None => 0,
    };
    let time = IsoTime::try_new(
        opt_field_arg(args, tool, "hour")?,
        opt_field_arg(args, tool, "minute")?,
        opt_field_arg(args, tool, "second")?,
        nanosecond,
    )?;
    Ok(time)
}

/// Tool definitions for `tools/list`
pub fn tool_definitions() -> JsonValue {
    let time_properties = json!({
        "hour": { "type": "integer", "description": "Hour 0-23 (default 0)" },
        "minute": { "type": "integer", "description": "Minute 0-59 (default 0)" },
        "second": { "type": "integer", "description": "Second 0-59 (default 0)" },
        "nanosecond": { "type": "integer", "description": "Nanosecond 0-999999999 (default 0)" }
    });
    let calendar = json!({
        "type": "string",
        "description": "Calendar id or alias, e.g. hebrew, persian, japanese (default from server config)"
    });
    let precision = json!({
        "type": "string",
        "description": "Time rendering: hour, minute, minute-optional, second, second-f1 .. second-f9"
    });

    let with_time = |mut props: JsonValue| {
        if let (Some(target), Some(extra)) = (props.as_object_mut(), time_properties.as_object()) {
            for (k, v) in extra {
                target.insert(k.clone(), v.clone());
            }
        }
        props
    };

    json!({
        "tools": [
            {
                "name": "iso_datetime",
                "description": "Validate an ISO 8601 date and time and report its weekday, ISO week, day of year and month/year lengths.",
                "inputSchema": {
                    "type": "object",
                    "properties": with_time(json!({
                        "year": { "type": "integer", "description": "ISO year, -9999 to 9999" },
                        "month": { "type": "integer", "description": "Month 1-12" },
                        "day": { "type": "integer", "description": "Day of month" },
                        "precision": precision
                    })),
                    "required": ["year", "month", "day"]
                }
            },
            {
                "name": "to_calendar",
                "description": "Convert an ISO 8601 date/time into another calendar. Any [u-ca=...] annotation is ignored; use parse to honor it.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "datetime": { "type": "string", "description": "ISO 8601 date or date-time, e.g. 2024-03-20T12:00" },
                        "calendar": calendar,
                        "precision": precision
                    },
                    "required": ["datetime"]
                }
            },
            {
                "name": "from_calendar",
                "description": "Build a date from calendar-native fields (era, year, month or month code, day) and convert it to ISO 8601.",
                "inputSchema": {
                    "type": "object",
                    "properties": with_time(json!({
                        "calendar": calendar,
                        "era": { "type": "string", "description": "Era code (see list_calendars); without it, year is the extended year" },
                        "year": { "type": "integer", "description": "Year in the era, or extended year" },
                        "month": { "type": "integer", "description": "Month ordinal, 1-based" },
                        "month_code": { "type": "string", "description": "Month code such as M05L, instead of month" },
                        "day": { "type": "integer", "description": "Day of month" },
                        "precision": precision
                    })),
                    "required": ["year", "day"]
                }
            },
            {
                "name": "fields",
                "description": "Calendar-aware queries for a date: day of week, day of year, days in month and year, months in year, leap year.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "datetime": { "type": "string", "description": "ISO 8601 date/time, optionally with [u-ca=...]" },
                        "calendar": calendar
                    },
                    "required": ["datetime"]
                }
            },
            {
                "name": "epoch_minutes",
                "description": "Minutes since 1970-01-01T00:00 (local, no time zone) for an ISO 8601 date/time. Seconds are truncated.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "datetime": { "type": "string", "description": "ISO 8601 date or date-time" }
                    },
                    "required": ["datetime"]
                }
            },
            {
                "name": "from_epoch_minutes",
                "description": "Decode minutes since 1970-01-01T00:00 (local) into a date and time, optionally in another calendar.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "minutes": { "type": "integer", "description": "Signed minute count" },
                        "calendar": { "type": "string", "description": "Calendar to express the result in (ISO if omitted)" },
                        "precision": precision
                    },
                    "required": ["minutes"]
                }
            },
            {
                "name": "parse",
                "description": "Parse an ISO 8601 / IXDTF string such as 2024-03-20T10:00[u-ca=hebrew] into a calendar date.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "text": { "type": "string", "description": "Date string with optional [u-ca=...] annotation" },
                        "calendar": { "type": "string", "description": "Expected calendar; must agree with the annotation if both are present" },
                        "precision": precision
                    },
                    "required": ["text"]
                }
            },
            {
                "name": "list_calendars",
                "description": "List supported calendars with their aliases and eras.",
                "inputSchema": {
                    "type": "object",
                    "properties": {}
                }
            }
        ]
    })
}
