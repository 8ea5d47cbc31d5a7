//! string operator catalog
//!
//! every comparison lower-cases both sides first, so all operators are
//! case-insensitive. the value shape is the same for every operator, so
//! switching operators keeps the entered text.

use super::operator::{Operator, OperatorFilter};
use super::widget::Widget;

pub const INCLUDES: &str = "in";
pub const NOT_INCLUDES: &str = "nin";
pub const EQUALS: &str = "eq";
pub const NOT_EQUALS: &str = "neq";
pub const STARTS_WITH: &str = "start";
pub const ENDS_WITH: &str = "end";

fn fold(s: &str) -> String {
    s.to_lowercase()
}

pub fn includes<R: AsRef<str> + 'static>(label: &str) -> Operator<R, String> {
    Operator::new(
        INCLUDES,
        label,
        |row: &R, value: &String| fold(row.as_ref()).contains(&fold(value)),
        Widget::Text,
    )
}

pub fn not_includes<R: AsRef<str> + 'static>(label: &str) -> Operator<R, String> {
    Operator::new(
        NOT_INCLUDES,
        label,
        |row: &R, value: &String| !fold(row.as_ref()).contains(&fold(value)),
        Widget::Text,
    )
}

pub fn equals<R: AsRef<str> + 'static>(label: &str) -> Operator<R, String> {
    Operator::new(
        EQUALS,
        label,
        |row: &R, value: &String| fold(row.as_ref()) == fold(value),
        Widget::Text,
    )
}

pub fn not_equals<R: AsRef<str> + 'static>(label: &str) -> Operator<R, String> {
    Operator::new(
        NOT_EQUALS,
        label,
        |row: &R, value: &String| fold(row.as_ref()) != fold(value),
        Widget::Text,
    )
}

pub fn starts_with<R: AsRef<str> + 'static>(label: &str) -> Operator<R, String> {
    Operator::new(
        STARTS_WITH,
        label,
        |row: &R, value: &String| fold(row.as_ref()).starts_with(&fold(value)),
        Widget::Text,
    )
}

pub fn ends_with<R: AsRef<str> + 'static>(label: &str) -> Operator<R, String> {
    Operator::new(
        ENDS_WITH,
        label,
        |row: &R, value: &String| fold(row.as_ref()).ends_with(&fold(value)),
        Widget::Text,
    )
}

/// the full catalog with default labels
pub fn string_operators<R: AsRef<str> + 'static>() -> Vec<Operator<R, String>> {
    vec![
        includes("includes"),
        not_includes("not includes"),
        equals("equals"),
        not_equals("not equals"),
        starts_with("starts with"),
        ends_with("ends with"),
    ]
}

/// empty on first activation, unchanged across operator switches
pub fn init_string_filter_value(_op: &str, last: Option<&String>) -> String {
    last.cloned().unwrap_or_default()
}

pub fn string_filter<R: AsRef<str> + 'static>() -> OperatorFilter<R, String> {
    OperatorFilter::from_catalog(string_operators(), init_string_filter_value)
}
