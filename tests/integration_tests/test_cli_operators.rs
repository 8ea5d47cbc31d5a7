// integration tests for the operators command

use crate::common::*;
use serde_json::json;

fn codes(result: &serde_json::Value) -> Vec<String> {
    result["operators"]
        .as_array()
        .expect("operators array")
        .iter()
        .map(|op| op["code"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_string_operators() {
    let fx = Fixture::new();
    let (output, json) = fx.run_json(&["operators", "string"]);
    assert!(output.status.success());

    let result = &json["result"];
    assert_eq!(result["kind"], "string");
    assert_eq!(result["default"], "in");
    assert_eq!(codes(result), vec!["in", "nin", "eq", "neq", "start", "end"]);
    assert_eq!(
        result["operators"][4],
        json!({ "code": "start", "label": "starts with", "widget": "text" })
    );
}

#[test]
fn test_date_operators() {
    let fx = Fixture::new();
    let (_, json) = fx.run_json(&["operators", "date"]);

    let result = &json["result"];
    assert_eq!(result["default"], "eq");
    assert_eq!(
        codes(result),
        vec!["eq", "neq", "gt", "gte", "lt", "lte", "range"]
    );
    assert_eq!(result["operators"][6]["label"], "Range");
    assert_eq!(result["operators"][0]["widget"], "date(DD/MM/YYYY)");
}

#[test]
fn test_boolean_operators_alias() {
    let fx = Fixture::new();
    let (_, json) = fx.run_json(&["operators", "bool"]);

    let result = &json["result"];
    assert_eq!(result["kind"], "boolean");
    assert_eq!(codes(result), vec!["eq"]);
    assert_eq!(result["operators"][0]["widget"], "boolean(segmented)");
}

#[test]
fn test_operators_follow_config_settings() {
    let fx = Fixture::new();
    fx.write_config(r#"{ settings: { with_time: true, date_format: "YYYY-MM-DD HH:mm" } }"#);

    let (_, json) = fx.run_json(&["operators", "date"]);
    assert_eq!(
        json["result"]["operators"][0]["widget"],
        "date(YYYY-MM-DD HH:mm, time)"
    );
}

#[test]
fn test_operators_text_marks_default() {
    let fx = Fixture::new();
    let output = fx.run_text(&["operators", "date"]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.lines().next().unwrap().starts_with("code"));
    assert!(out.contains("eq *"));
    assert!(out.contains("GreaterThanOrEquals"));
}

#[test]
fn test_operators_quiet() {
    let fx = Fixture::new();
    let output = fx.run(&["--quiet", "operators", "string"]);
    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_operators_unknown_kind() {
    let fx = Fixture::new();

    let output = fx.run_text(&["operators", "numbr"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("unknown filter kind 'numbr'"));

    let (output, json) = fx.run_json(&["operators", "dat"]);
    assert_eq!(output.status.code(), Some(4));
    assert_eq!(json["error"]["data"]["suggestions"][0], "date");
}
