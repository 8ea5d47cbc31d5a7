//! operator-based column filters
//!
//! provides:
//! - a generic engine binding named operators to a value initializer
//! - operator catalogs for strings, dates and booleans
//! - widget descriptors telling the UI which input edits each operator's value
//! - highlight terms for rendered cells
//!
//! the table that consumes these filters owns the per-column `FilterState`,
//! combines column results, and renders widgets.

pub mod boolean;
pub mod date;
mod highlight;
mod operator;
pub mod string;
mod widget;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use date::{AsTimestamp, DateMode, DateValue, Granularity};
pub use highlight::{decorate, highlight_terms, segments, HighlightSource, Highlighted, Segment};
pub use operator::{
    FilterError, FilterState, Init, Operator, OperatorFilter, OperatorFilterBuilder, Predicate,
};
pub use widget::{
    BooleanInputOptions, BooleanVariant, DateInputOptions, Widget, DEFAULT_DATE_FORMAT,
    DEFAULT_LOCALE,
};

/// value domain of a column filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    String,
    Date,
    Boolean,
}

impl FilterKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "string" | "text" => Some(FilterKind::String),
            "date" => Some(FilterKind::Date),
            "boolean" | "bool" => Some(FilterKind::Boolean),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::String => "string",
            FilterKind::Date => "date",
            FilterKind::Boolean => "boolean",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

lazy_static::lazy_static! {
    /// default string filter over owned cell text
    pub static ref STRING_FILTER: OperatorFilter<String, String> = string::string_filter();

    /// default date filter: day granularity, `DD/MM/YYYY`
    pub static ref DATE_FILTER: OperatorFilter<String, DateValue> =
        date::date_filter(&DateInputOptions::default());

    /// default boolean filter: segmented control labelled true/false
    pub static ref BOOLEAN_FILTER: OperatorFilter<bool, bool> =
        boolean::boolean_filter(BooleanInputOptions::default());
}
