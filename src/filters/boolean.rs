//! boolean operator catalog

use super::operator::{Operator, OperatorFilter};
use super::widget::{BooleanInputOptions, Widget};

pub const EQUALS: &str = "eq";

/// widget boundary: stored boolean to the control's wire value
pub fn to_value(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// widget boundary: control's wire value back to a boolean
pub fn to_state(value: &str) -> bool {
    value == "true"
}

/// typed text to a boolean; only `true`/`false` in any case
pub fn parse_state(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

pub fn equals(label: &str, options: BooleanInputOptions) -> Operator<bool, bool> {
    Operator::new(
        EQUALS,
        label,
        |row: &bool, value: &bool| row == value,
        Widget::Boolean(options),
    )
}

/// always starts at `true`, whatever was selected before
pub fn init_boolean_filter_value(_op: &str, _last: Option<&bool>) -> bool {
    true
}

pub fn boolean_filter(options: BooleanInputOptions) -> OperatorFilter<bool, bool> {
    OperatorFilter::from_catalog(vec![equals("equals", options)], init_boolean_filter_value)
}
