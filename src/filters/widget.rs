//! value-input widget descriptors
//!
//! each operator carries a `Widget` telling the consuming UI which input to
//! render for its value. the engine never renders anything itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::date::{DateMode, DateValue};

/// presentation variant for the boolean input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BooleanVariant {
    /// two-segment toggle
    #[default]
    Segmented,
    /// radio group
    Radio,
}

impl BooleanVariant {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "segmented" => Some(BooleanVariant::Segmented),
            "radio" => Some(BooleanVariant::Radio),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BooleanVariant::Segmented => "segmented",
            BooleanVariant::Radio => "radio",
        }
    }
}

impl fmt::Display for BooleanVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// options for the boolean input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanInputOptions {
    #[serde(default)]
    pub variant: BooleanVariant,
    #[serde(default = "default_true_label")]
    pub true_label: String,
    #[serde(default = "default_false_label")]
    pub false_label: String,
}

fn default_true_label() -> String {
    "true".to_string()
}

fn default_false_label() -> String {
    "false".to_string()
}

impl Default for BooleanInputOptions {
    fn default() -> Self {
        Self {
            variant: BooleanVariant::Segmented,
            true_label: default_true_label(),
            false_label: default_false_label(),
        }
    }
}

/// options for the date picker input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInputOptions {
    /// compare and edit at minute precision instead of calendar day
    #[serde(default)]
    pub with_time: bool,
    /// display format, dayjs-style tokens (DD, MM, YYYY, HH, mm, ss)
    #[serde(default = "default_date_format")]
    pub format: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default = "default_locale")]
    pub locale: String,
}

pub const DEFAULT_DATE_FORMAT: &str = "DD/MM/YYYY";
pub const DEFAULT_LOCALE: &str = "tr";

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

impl Default for DateInputOptions {
    fn default() -> Self {
        Self {
            with_time: false,
            format: default_date_format(),
            placeholder: String::new(),
            locale: default_locale(),
        }
    }
}

impl DateInputOptions {
    pub fn with_time(mut self, with_time: bool) -> Self {
        self.with_time = with_time;
        self
    }
}

/// the input an operator asks the UI to render for its value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    /// free text box
    Text,
    /// date picker; single or range mode follows the value's shape
    Date(DateInputOptions),
    /// true/false toggle communicating "true"/"false" strings
    Boolean(BooleanInputOptions),
}

impl Widget {
    /// short name of the widget kind
    pub fn kind(&self) -> &'static str {
        match self {
            Widget::Text => "text",
            Widget::Date(_) => "date",
            Widget::Boolean(_) => "boolean",
        }
    }

    /// (label, wire value) pairs a boolean control presents; empty otherwise
    pub fn choices(&self) -> Vec<(&str, &'static str)> {
        match self {
            Widget::Boolean(options) => vec![
                (options.true_label.as_str(), "true"),
                (options.false_label.as_str(), "false"),
            ],
            _ => Vec::new(),
        }
    }

    /// picker mode for `value`; `None` for non-date widgets
    pub fn date_mode(&self, value: &DateValue) -> Option<DateMode> {
        match self {
            Widget::Date(_) => Some(value.mode()),
            _ => None,
        }
    }

    pub fn date_options(&self) -> Option<&DateInputOptions> {
        match self {
            Widget::Date(options) => Some(options),
            _ => None,
        }
    }

    pub fn boolean_options(&self) -> Option<&BooleanInputOptions> {
        match self {
            Widget::Boolean(options) => Some(options),
            _ => None,
        }
    }
}

impl fmt::Display for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Widget::Text => write!(f, "text"),
            Widget::Date(options) if options.with_time => write!(f, "date({}, time)", options.format),
            Widget::Date(options) => write!(f, "date({})", options.format),
            Widget::Boolean(options) => write!(f, "boolean({})", options.variant),
        }
    }
}
