//! JSON row table used by the CLI
//!
//! plays the grid engine's part: it owns the per-column filter state, converts
//! JSON cells into each filter's row type, and ANDs the column results.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::config::{self, ColumnConfig, Settings};
use crate::filters::{
    boolean, date, string, DateInputOptions, DateMode, DateValue, FilterError, FilterKind,
    FilterState, HighlightSource, OperatorFilter,
};

pub type Row = Map<String, JsonValue>;

/// rows loaded from a JSON array of objects
#[derive(Debug, Clone)]
pub struct Table {
    rows: Vec<Row>,
    columns: Vec<String>,
}

impl Table {
    pub fn from_json(content: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(content).context("rows are not valid JSON")?;

        let items = match value {
            JsonValue::Array(items) => items,
            other => return Err(anyhow!("expected a JSON array of objects, got {}", type_name(&other))),
        };

        let mut rows = Vec::with_capacity(items.len());
        let mut columns: Vec<String> = Vec::new();

        for (i, item) in items.into_iter().enumerate() {
            let row = match item {
                JsonValue::Object(map) => map,
                other => {
                    return Err(anyhow!(
                        "row {} is not an object (got {})",
                        i,
                        type_name(&other)
                    ))
                }
            };
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
            rows.push(row);
        }

        debug!(rows = rows.len(), columns = columns.len(), "loaded table");
        Ok(Self { rows, columns })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read rows file: {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("Invalid rows file: {}", path.display()))
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// resolve a column name case-insensitively
    pub fn find_column(&self, name: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }

    /// kind from config, otherwise inferred from the first non-null cell
    pub fn column_kind(&self, name: &str, column: Option<&ColumnConfig>) -> FilterKind {
        if let Some(column) = column {
            return column.kind;
        }

        self.rows
            .iter()
            .filter_map(|row| row.get(name))
            .find(|v| !v.is_null())
            .map(infer_kind)
            .unwrap_or(FilterKind::String)
    }
}

fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// guess a filter kind from a sample cell
pub fn infer_kind(value: &JsonValue) -> FilterKind {
    match value {
        JsonValue::Bool(_) => FilterKind::Boolean,
        JsonValue::String(s) if date::parse_timestamp(s).is_some() => FilterKind::Date,
        _ => FilterKind::String,
    }
}

/// plain text of a cell as a renderer would show it
pub fn cell_text(value: Option<&JsonValue>) -> String {
    match value {
        None | Some(JsonValue::Null) => String::new(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn date_cell(value: Option<&JsonValue>) -> String {
    match value {
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Number(n)) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn boolean_cell(value: Option<&JsonValue>) -> Option<bool> {
    match value {
        Some(JsonValue::Bool(b)) => Some(*b),
        Some(JsonValue::String(s)) if s == "true" || s == "false" => Some(boolean::to_state(s)),
        _ => None,
    }
}

/// operator summary for listings
#[derive(Debug, Clone, Serialize)]
pub struct OperatorInfo {
    pub code: String,
    pub label: String,
    pub widget: String,
}

fn describe<R, F>(filter: &OperatorFilter<R, F>) -> Vec<OperatorInfo> {
    filter
        .operators()
        .iter()
        .map(|op| OperatorInfo {
            code: op.code().to_string(),
            label: op.label().to_string(),
            widget: op.widget().to_string(),
        })
        .collect()
}

/// a column's filter unit
#[derive(Debug, Clone)]
pub enum ColumnFilter {
    String(OperatorFilter<String, String>),
    Date {
        filter: OperatorFilter<String, DateValue>,
        options: DateInputOptions,
    },
    Boolean(OperatorFilter<bool, bool>),
}

impl ColumnFilter {
    pub fn new(kind: FilterKind, column: Option<&ColumnConfig>, settings: &Settings) -> Self {
        match kind {
            FilterKind::String => ColumnFilter::String(string::string_filter()),
            FilterKind::Date => {
                let options = config::date_options(column, settings);
                ColumnFilter::Date {
                    filter: date::date_filter(&options),
                    options,
                }
            }
            FilterKind::Boolean => ColumnFilter::Boolean(boolean::boolean_filter(
                config::boolean_options(column, settings),
            )),
        }
    }

    pub fn operators(&self) -> Vec<OperatorInfo> {
        match self {
            ColumnFilter::String(filter) => describe(filter),
            ColumnFilter::Date { filter, .. } => describe(filter),
            ColumnFilter::Boolean(filter) => describe(filter),
        }
    }

    /// start from the initial state, switch to `op`, then type `raw` into the widget
    pub fn activate(&self, op: Option<&str>, raw: Option<&str>) -> Result<ActiveFilter, FilterError> {
        match self {
            ColumnFilter::String(filter) => {
                let mut state = switch_from_initial(filter, op)?;
                if let Some(raw) = raw {
                    state.value = raw.to_string();
                }
                Ok(ActiveFilter::String {
                    filter: filter.clone(),
                    state,
                })
            }
            ColumnFilter::Date { filter, options } => {
                let mut state = switch_from_initial(filter, op)?;
                if let Some(raw) = raw {
                    let mode = filter
                        .widget_for(&state.operator)?
                        .date_mode(&state.value)
                        .unwrap_or(DateMode::Single);
                    state.value = date_input(mode, raw, &options.format)?;
                }
                Ok(ActiveFilter::Date {
                    filter: filter.clone(),
                    state,
                })
            }
            ColumnFilter::Boolean(filter) => {
                let mut state = switch_from_initial(filter, op)?;
                if let Some(raw) = raw.filter(|r| !r.trim().is_empty()) {
                    state.value =
                        boolean::parse_state(raw).ok_or_else(|| FilterError::InvalidValue {
                            value: raw.to_string(),
                            expected: "true or false".to_string(),
                        })?;
                }
                Ok(ActiveFilter::Boolean {
                    filter: filter.clone(),
                    state,
                })
            }
        }
    }

    /// reshape a value entered under `from` for operator `to`
    pub fn transition(
        &self,
        from: &str,
        to: &str,
        raw: Option<&str>,
    ) -> Result<(JsonValue, JsonValue), FilterError> {
        let before = self.activate(Some(from), raw)?;
        let after = before.switch(to)?;
        Ok((before.value_json(), after.value_json()))
    }
}

fn switch_from_initial<R, F>(
    filter: &OperatorFilter<R, F>,
    op: Option<&str>,
) -> Result<FilterState<F>, FilterError> {
    let state = filter.initial_state();
    match op {
        Some(code) => filter.switch_operator(&state, code),
        None => Ok(state),
    }
}

/// empty text clears the value; anything else must parse
fn parse_input(raw: &str, format: &str) -> Result<Option<NaiveDateTime>, FilterError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    match date::parse_with_format(raw, format) {
        Some(ts) => Ok(Some(ts)),
        None => Err(FilterError::InvalidValue {
            value: raw.trim().to_string(),
            expected: format!("a date as {} or ISO 8601", format),
        }),
    }
}

/// what a date picker in `mode` reports for typed text; ranges use `start..end`
fn date_input(mode: DateMode, raw: &str, format: &str) -> Result<DateValue, FilterError> {
    Ok(match mode {
        DateMode::Single => DateValue::Single(parse_input(raw, format)?),
        DateMode::Range => {
            let (start, end) = raw.split_once("..").unwrap_or((raw, ""));
            DateValue::Range(parse_input(start, format)?, parse_input(end, format)?)
        }
    })
}

/// a column filter paired with its current state
#[derive(Debug, Clone)]
pub enum ActiveFilter {
    String {
        filter: OperatorFilter<String, String>,
        state: FilterState<String>,
    },
    Date {
        filter: OperatorFilter<String, DateValue>,
        state: FilterState<DateValue>,
    },
    Boolean {
        filter: OperatorFilter<bool, bool>,
        state: FilterState<bool>,
    },
}

impl ActiveFilter {
    pub fn operator(&self) -> &str {
        match self {
            ActiveFilter::String { state, .. } => &state.operator,
            ActiveFilter::Date { state, .. } => &state.operator,
            ActiveFilter::Boolean { state, .. } => &state.operator,
        }
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            ActiveFilter::String { .. } => FilterKind::String,
            ActiveFilter::Date { .. } => FilterKind::Date,
            ActiveFilter::Boolean { .. } => FilterKind::Boolean,
        }
    }

    /// evaluate one cell
    pub fn matches(&self, cell: Option<&JsonValue>) -> Result<bool, FilterError> {
        match self {
            ActiveFilter::String { filter, state } => filter.matches(state, &cell_text(cell)),
            ActiveFilter::Date { filter, state } => filter.matches(state, &date_cell(cell)),
            ActiveFilter::Boolean { filter, state } => match boolean_cell(cell) {
                Some(b) => filter.matches(state, &b),
                None => Ok(false),
            },
        }
    }

    /// same column, new operator, value reshaped by the filter's initializer
    pub fn switch(&self, code: &str) -> Result<ActiveFilter, FilterError> {
        Ok(match self {
            ActiveFilter::String { filter, state } => ActiveFilter::String {
                filter: filter.clone(),
                state: filter.switch_operator(state, code)?,
            },
            ActiveFilter::Date { filter, state } => ActiveFilter::Date {
                filter: filter.clone(),
                state: filter.switch_operator(state, code)?,
            },
            ActiveFilter::Boolean { filter, state } => ActiveFilter::Boolean {
                filter: filter.clone(),
                state: filter.switch_operator(state, code)?,
            },
        })
    }

    /// text this filter contributes to cell highlighting
    pub fn highlight_text(&self) -> Option<&str> {
        match self {
            ActiveFilter::String { state, .. } => state.value.highlight_text(),
            ActiveFilter::Date { state, .. } => state.value.highlight_text(),
            ActiveFilter::Boolean { state, .. } => state.value.highlight_text(),
        }
    }

    /// widget-boundary view of the value (ISO strings for dates)
    pub fn value_json(&self) -> JsonValue {
        match self {
            ActiveFilter::String { state, .. } => JsonValue::String(state.value.clone()),
            ActiveFilter::Boolean { state, .. } => JsonValue::String(boolean::to_value(state.value).to_string()),
            ActiveFilter::Date { state, .. } => match state.value {
                DateValue::Single(v) => iso_json(v),
                DateValue::Range(start, end) => JsonValue::Array(vec![iso_json(start), iso_json(end)]),
            },
        }
    }
}

fn iso_json(value: Option<NaiveDateTime>) -> JsonValue {
    date::to_iso_string(value)
        .map(JsonValue::String)
        .unwrap_or(JsonValue::Null)
}

/// `COLUMN:OP[:VALUE]` from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereClause {
    pub column: String,
    pub op: Option<String>,
    pub value: Option<String>,
}

impl WhereClause {
    pub fn parse(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, ':');
        let column = parts.next().unwrap_or_default().trim();
        if column.is_empty() {
            return Err(anyhow!("invalid filter '{}': expected COLUMN:OP[:VALUE]", s));
        }

        let op = parts
            .next()
            .map(str::trim)
            .filter(|op| !op.is_empty())
            .map(String::from);
        let value = parts.next().map(String::from);

        if op.is_none() && value.is_none() {
            return Err(anyhow!("invalid filter '{}': expected COLUMN:OP[:VALUE]", s));
        }

        Ok(Self {
            column: column.to_string(),
            op,
            value,
        })
    }
}

/// a filter bound to a table column
#[derive(Debug, Clone)]
pub struct ColumnBinding {
    pub column: String,
    pub filter: ActiveFilter,
}

/// global search: any cell containing `term`, case-insensitive
pub fn matches_search(row: &Row, term: &str) -> bool {
    let term = term.to_lowercase();
    row.values()
        .any(|v| cell_text(Some(v)).to_lowercase().contains(&term))
}

/// indices of rows passing every column filter and the global search
pub fn filter_rows(
    table: &Table,
    bindings: &[ColumnBinding],
    search: Option<&str>,
) -> Result<Vec<usize>, FilterError> {
    let search = search.filter(|s| !s.is_empty());
    let mut kept = Vec::new();

    'rows: for (i, row) in table.rows().iter().enumerate() {
        for binding in bindings {
            if !binding.filter.matches(row.get(&binding.column))? {
                continue 'rows;
            }
        }
        if let Some(term) = search {
            if !matches_search(row, term) {
                continue;
            }
        }
        kept.push(i);
    }

    debug!(kept = kept.len(), total = table.rows().len(), "filtered rows");
    Ok(kept)
}
