//! output formatting utilities for scriptable CLI output
//!
//! uses JSON-RPC 2.0 format for machine-readable output:
//! - success: {"jsonrpc": "2.0", "result": {...}, "id": null}
//! - error: {"jsonrpc": "2.0", "error": {"code": N, "message": "...", "data": {...}}, "id": null}
//!
//! also provides format string templating for per-row output

use std::collections::BTreeMap;
use std::io::IsTerminal;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::filters::Highlighted;

use super::table::OperatorInfo;

const JSONRPC_VERSION: &str = "2.0";

/// output mode determines how results are formatted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// human-readable text output
    Text,
    /// machine-readable JSON-RPC 2.0 output
    Json,
    /// no output on success (errors still go to stderr)
    Quiet,
    /// custom format string with {column} placeholders, one line per row
    Format,
}

impl OutputMode {
    /// determine output mode from CLI flags and environment
    ///
    /// priority: quiet > format > json > no_json > auto-detect
    pub fn from_flags(json: bool, no_json: bool, quiet: bool, format: bool) -> Self {
        if quiet {
            return Self::Quiet;
        }
        if format {
            return Self::Format;
        }
        if json {
            return Self::Json;
        }
        if no_json {
            return Self::Text;
        }
        // JSON when stdout is piped
        if !std::io::stdout().is_terminal() {
            Self::Json
        } else {
            Self::Text
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self, Self::Quiet)
    }
}

/// JSON-RPC 2.0 success response
#[derive(Serialize)]
pub struct JsonRpcResponse<T: Serialize> {
    pub jsonrpc: &'static str,
    pub result: T,
    /// null for CLI responses (no request id)
    pub id: Option<String>,
}

impl<T: Serialize> JsonRpcResponse<T> {
    pub fn new(result: T) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            result,
            id: None,
        }
    }
}

/// JSON-RPC 2.0 error response
#[derive(Serialize)]
pub struct JsonRpcError {
    pub jsonrpc: &'static str,
    pub error: RpcError,
    pub id: Option<String>,
}

/// JSON-RPC 2.0 error object
#[derive(Serialize)]
pub struct RpcError {
    /// exit code offset into the -32000 application range
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ErrorData>,
}

#[derive(Serialize)]
pub struct ErrorData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl JsonRpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            error: RpcError {
                code: to_jsonrpc_code(code),
                message: message.into(),
                data: None,
            },
            id: None,
        }
    }

    pub fn with_suggestions(
        code: i32,
        message: impl Into<String>,
        suggestions: Vec<String>,
    ) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            error: RpcError {
                code: to_jsonrpc_code(code),
                message: message.into(),
                data: Some(ErrorData {
                    suggestions: if suggestions.is_empty() {
                        None
                    } else {
                        Some(suggestions)
                    },
                    details: None,
                }),
            },
            id: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        let details = Some(details.into());
        match self.error.data.as_mut() {
            Some(data) => data.details = details,
            None => {
                self.error.data = Some(ErrorData {
                    suggestions: None,
                    details,
                })
            }
        }
        self
    }
}

/// convert an exit code to a JSON-RPC error code
/// JSON-RPC reserves -32000 to -32099 for server/application errors
fn to_jsonrpc_code(exit_code: i32) -> i32 {
    -32000 - exit_code
}

// ============================================================================
// Result data structures for different commands
// ============================================================================

/// result data for `operators`
#[derive(Serialize)]
pub struct OperatorsData {
    pub kind: String,
    pub default: String,
    pub operators: Vec<OperatorInfo>,
}

/// one column filter as applied by `filter`
#[derive(Serialize, Clone)]
pub struct AppliedFilter {
    pub column: String,
    pub kind: String,
    pub op: String,
    pub value: JsonValue,
}

/// result data for `filter`
#[derive(Serialize)]
pub struct FilterData {
    pub total: usize,
    pub matched: usize,
    pub filters: Vec<AppliedFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub rows: Vec<JsonValue>,
    /// per matched row: column -> highlighted cell, only cells with matches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Vec<BTreeMap<String, Highlighted>>>,
}

/// filter state as it crosses the widget boundary
#[derive(Serialize, Clone)]
pub struct StateData {
    pub op: String,
    pub value: JsonValue,
    pub widget: String,
}

/// result data for `switch`
#[derive(Serialize)]
pub struct SwitchData {
    pub kind: String,
    pub from: StateData,
    pub to: StateData,
}

// ============================================================================
// Output functions
// ============================================================================

/// format a string template with {field} placeholders
///
/// # example
/// ```ignore
/// let row = json!({ "name": "Alice", "age": 30 });
/// assert_eq!(format_template("{name} ({age})", &row), "Alice (30)");
/// ```
pub fn format_template<T: Serialize>(template: &str, data: &T) -> String {
    let value = match serde_json::to_value(data) {
        Ok(v) => v,
        Err(_) => return template.to_string(),
    };

    let mut result = template.to_string();

    if let JsonValue::Object(map) = value {
        for (key, val) in map {
            let placeholder = format!("{{{}}}", key);
            let replacement = match val {
                JsonValue::String(s) => s,
                JsonValue::Null => String::new(),
                JsonValue::Bool(b) => b.to_string(),
                JsonValue::Number(n) => n.to_string(),
                JsonValue::Array(arr) => arr
                    .iter()
                    .map(|v| match v {
                        JsonValue::String(s) => s.clone(),
                        _ => v.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(", "),
                JsonValue::Object(_) => val.to_string(),
            };
            result = result.replace(&placeholder, &replacement);
        }
    }

    result
}

/// print JSON-RPC success response to stdout
pub fn print_json<T: Serialize>(data: &T) {
    let response = JsonRpcResponse::new(data);
    if let Ok(json) = serde_json::to_string(&response) {
        println!("{}", json);
    }
}

/// print JSON-RPC error with suggestions
pub fn print_json_error_with_suggestions(code: i32, message: &str, suggestions: Vec<String>) {
    let error = JsonRpcError::with_suggestions(code, message, suggestions);
    if let Ok(json) = serde_json::to_string(&error) {
        println!("{}", json);
    }
}

/// print JSON-RPC error carrying a detail list (e.g. config validation errors)
pub fn print_json_error_with_details(code: i32, message: &str, details: &[String]) {
    let error = JsonRpcError::new(code, message).with_details(details.join("\n"));
    if let Ok(json) = serde_json::to_string(&error) {
        println!("{}", json);
    }
}

/// pad cells into aligned columns
pub fn render_table(header: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let pad = widths[i].saturating_sub(cell.chars().count());
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = Vec::with_capacity(rows.len() + 1);
    out.push(line(header));
    for row in rows {
        out.push(line(row));
    }
    out.join("\n")
}
