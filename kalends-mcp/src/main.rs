//! Kalends MCP Server
//!
//! Line-delimited JSON-RPC 2.0 over stdio. Logs go to stderr.
//!
//! Tools:
//! - iso_datetime: Validate an ISO date/time and query it
//! - to_calendar: Convert an ISO date/time into a calendar
//! - from_calendar: Build a date from calendar fields, convert to ISO
//! - fields: Calendar-aware field queries
//! - epoch_minutes / from_epoch_minutes: Local epoch-minute codec
//! - parse: Parse IXDTF text with a [u-ca=...] annotation
//! - list_calendars: Supported calendars and their eras

mod config;
mod tools;

use config::ServerConfig;
use kalends_core::KalendsError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::io::{self, BufRead, Write};
use tools::Kalends;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const PROTOCOL_VERSION: &str = "2025-11-25";
const SERVER_NAME: &str = "kalends";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

// MCP Protocol types
#[derive(Debug, Deserialize)]
struct McpRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
struct McpResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

#[derive(Debug, Serialize)]
struct McpError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl McpResponse {
    fn success(id: Option<JsonValue>, result: JsonValue) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Option<JsonValue>, error: McpError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

impl McpError {
    fn parse_error(message: impl Into<String>) -> Self {
        Self {
            code: -32700,
            message: message.into(),
            data: None,
        }
    }

    fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            code: -32600,
            message: message.into(),
            data: None,
        }
    }

    fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: -32602,
            message: message.into(),
            data: None,
        }
    }
}

/// Install the stderr subscriber; stdout carries the protocol
fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn main() {
    let registry = kalends_std::standard_registry();

    init_logging(&config::log_filter(&|key: &str| std::env::var(key).ok()));

    let config = ServerConfig::from_env(&registry);
    let kalends = Kalends::new(registry, config);

    info!(version = SERVER_VERSION, protocol = PROTOCOL_VERSION, "Kalends MCP server started");
    info!(
        calendars = kalends.registry().ids().len(),
        default_calendar = %kalends.config().default_calendar,
        precision = %kalends.config().time_precision,
        log_filter = %kalends.config().log_filter,
        "configuration loaded"
    );

    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                info!("client disconnected (EOF)");
                break;
            }
            Ok(_) => {
                let Some(response) = process_line(&kalends, &line) else {
                    continue;
                };
                let mut stdout = io::stdout().lock();
                if let Err(e) = writeln!(stdout, "{}", response).and_then(|_| stdout.flush()) {
                    error!(error = %e, "error writing response");
                    break;
                }
            }
            Err(e) => {
                error!(error = %e, "error reading input");
                break;
            }
        }
    }

    info!("server shutting down");
}

/// Handle one input line, returning the line to write back, if any
fn process_line(kalends: &Kalends, line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    debug!(bytes = line.len(), "received");

    let value: JsonValue = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "unparseable request");
            let error = McpError::parse_error(format!("Parse error: {}", e));
            let response = McpResponse::failure(None, error);
            return Some(encode_response(&response.id, &response));
        }
    };

    // Well-formed JSON that is not a request keeps whatever id it carried
    let id = value.get("id").cloned();
    let request = match McpRequest::deserialize(&value) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "invalid request");
            let error = McpError::invalid_request(format!("Invalid Request: {}", e));
            let response = McpResponse::failure(id, error);
            return Some(encode_response(&response.id, &response));
        }
    };

    debug!(method = %request.method, "processing");
    let response = handle_request(kalends, &request);
    // Notifications (no id) get no response
    if request.id.is_none() {
        debug!(method = %request.method, "notification processed");
        return None;
    }
    Some(encode_response(&response.id, &response))
}

/// Serialize a response, replacing it with a -32603 error for the same id
/// when that fails
fn encode_response<T: Serialize>(id: &Option<JsonValue>, response: &T) -> String {
    match serde_json::to_string(response) {
        Ok(json) => json,
        Err(e) => {
            error!(error = %e, "failed to serialize response");
            let err = KalendsError::internal(format!("response could not be serialized: {}", e));
            json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": {
                    "code": -32603,
                    "message": err.message,
                    "data": err,
                }
            })
            .to_string()
        }
    }
}

fn handle_request(kalends: &Kalends, request: &McpRequest) -> McpResponse {
    let result = match request.method.as_str() {
        // Lifecycle
        "initialize" => handle_initialize(&request.params),
        "initialized" | "notifications/initialized" => Ok(json!({})),
        "ping" => Ok(json!({})),

        // Tools
        "tools/list" => Ok(tools::tool_definitions()),
        "tools/call" => handle_tool_call(kalends, &request.params),

        _ => Err(McpError {
            code: -32601,
            message: format!("Method not found: {}", request.method),
            data: None,
        }),
    };

    match result {
        Ok(r) => McpResponse::success(request.id.clone(), r),
        Err(e) => McpResponse::failure(request.id.clone(), e),
    }
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params
        .as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Use client's protocol version for compatibility
    let client_protocol = params
        .as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client = client_info, protocol = client_protocol, "client connected");

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Calendar-normalized date and time conversions"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "Kalends converts dates between ISO 8601 and other calendars (Hebrew, Persian, Islamic, Japanese, Coptic, Ethiopic, Julian and more). Use list_calendars to see calendar ids and era codes."
    }))
}

fn handle_tool_call(kalends: &Kalends, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let params = params
        .as_ref()
        .ok_or_else(|| McpError::invalid_params("Missing params"))?;

    let name = params
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

    let args = params.get("arguments").cloned().unwrap_or(json!({}));

    kalends.call(name, &args).ok_or_else(|| McpError {
        code: -32602,
        message: format!("Unknown tool: {}", name),
        data: Some(json!({ "available": tools::TOOL_NAMES })),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kalends() -> Kalends {
        Kalends::new(kalends_std::standard_registry(), ServerConfig::default())
    }

    fn roundtrip(line: &str) -> JsonValue {
        let out = process_line(&kalends(), line).expect("response expected");
        serde_json::from_str(&out).unwrap()
    }

    #[test]
    fn test_initialize_echoes_protocol() {
        let resp = roundtrip(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","clientInfo":{"name":"test"}}}"#,
        );
        assert_eq!(resp["id"], 1);
        assert_eq!(resp["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(resp["result"]["serverInfo"]["name"], "kalends");
        assert!(resp.get("error").is_none());
    }

    #[test]
    fn test_notification_gets_no_response() {
        assert!(process_line(&kalends(), r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).is_none());
        assert!(process_line(&kalends(), "   \n").is_none());
    }

    #[test]
    fn test_parse_error() {
        let resp = roundtrip("{not json");
        assert_eq!(resp["error"]["code"], -32700);
        assert!(resp.get("id").is_none());
    }

    #[test]
    fn test_invalid_request() {
        let resp = roundtrip(r#"{"jsonrpc":"2.0","id":9}"#);
        assert_eq!(resp["error"]["code"], -32600);
        assert_eq!(resp["id"], 9);

        let resp = roundtrip("[1, 2, 3]");
        assert_eq!(resp["error"]["code"], -32600);
        assert!(resp.get("id").is_none());
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("refused"))
        }
    }

    #[test]
    fn test_unserializable_response_is_internal_error() {
        let out = encode_response(&Some(json!(7)), &Unserializable);
        let resp: JsonValue = serde_json::from_str(&out).unwrap();
        assert_eq!(resp["id"], 7);
        assert_eq!(resp["error"]["code"], -32603);
        assert_eq!(resp["error"]["data"]["code"], "INTERNAL");
        assert_eq!(resp["error"]["data"]["severity"], "fatal");
        assert!(resp["error"]["message"].as_str().unwrap().contains("refused"));
    }

    #[test]
    fn test_method_not_found() {
        let resp = roundtrip(r#"{"jsonrpc":"2.0","id":"a","method":"resources/list"}"#);
        assert_eq!(resp["id"], "a");
        assert_eq!(resp["error"]["code"], -32601);
    }

    #[test]
    fn test_tools_list() {
        let resp = roundtrip(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#);
        assert_eq!(resp["result"]["tools"].as_array().unwrap().len(), 8);
    }

    #[test]
    fn test_tool_call() {
        let resp = roundtrip(
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"parse","arguments":{"text":"2024-03-20[u-ca=persian]"}}}"#,
        );
        let result = &resp["result"];
        assert_eq!(result["isError"], false);
        assert_eq!(result["data"]["date"]["extended_year"], 1403);
        assert_eq!(result["data"]["date"]["month"], 1);
    }

    #[test]
    fn test_tool_error_is_result_not_protocol_error() {
        let resp = roundtrip(
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"iso_datetime","arguments":{"year":2023,"month":13,"day":1}}}"#,
        );
        assert!(resp.get("error").is_none());
        assert_eq!(resp["result"]["isError"], true);
        assert_eq!(resp["result"]["error"]["code"], "INVALID_FIELD");
        assert_eq!(resp["result"]["error"]["context"]["tool"], "iso_datetime");
    }

    #[test]
    fn test_unknown_tool_and_missing_params() {
        let resp = roundtrip(r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"eval"}}"#);
        assert_eq!(resp["error"]["code"], -32602);
        assert_eq!(resp["error"]["data"]["available"][0], "iso_datetime");

        let resp = roundtrip(r#"{"jsonrpc":"2.0","id":6,"method":"tools/call"}"#);
        assert_eq!(resp["error"]["message"], "Missing params");
    }
}
