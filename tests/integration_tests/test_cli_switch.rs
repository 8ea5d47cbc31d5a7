// integration tests for the switch command

use crate::common::*;
use serde_json::json;

#[test]
fn test_switch_date_into_range_keeps_start() {
    let fx = Fixture::new();
    let (output, json) = fx.run_json(&[
        "switch", "date", "--from", "eq", "--to", "range", "--value", "2024-05-10",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let result = &json["result"];
    assert_eq!(result["kind"], "date");
    assert_eq!(result["from"]["op"], "eq");
    assert_eq!(result["from"]["value"], "2024-05-10T00:00:00.000Z");
    assert_eq!(result["to"]["op"], "range");
    assert_eq!(result["to"]["value"], json!(["2024-05-10T00:00:00.000Z", null]));
    assert_eq!(result["to"]["widget"], "date(DD/MM/YYYY)");
}

#[test]
fn test_switch_date_out_of_range_keeps_start() {
    let fx = Fixture::new();
    let (_, json) = fx.run_json(&[
        "switch",
        "date",
        "--from",
        "range",
        "--to",
        "gt",
        "--value",
        "10/05/2024..20/05/2024",
    ]);

    let result = &json["result"];
    assert_eq!(
        result["from"]["value"],
        json!(["2024-05-10T00:00:00.000Z", "2024-05-20T00:00:00.000Z"])
    );
    assert_eq!(result["to"]["value"], "2024-05-10T00:00:00.000Z");
}

#[test]
fn test_switch_date_empty_value() {
    let fx = Fixture::new();
    let (_, json) = fx.run_json(&["switch", "date", "--from", "lt", "--to", "range"]);
    assert_eq!(json["result"]["from"]["value"], json!(null));
    assert_eq!(json["result"]["to"]["value"], json!([null, null]));
}

#[test]
fn test_switch_string_preserves_text() {
    let fx = Fixture::new();
    let (_, json) = fx.run_json(&[
        "switch", "string", "--from", "eq", "--to", "start", "--value", "Al",
    ]);
    assert_eq!(json["result"]["from"]["value"], "Al");
    assert_eq!(json["result"]["to"]["value"], "Al");
}

#[test]
fn test_switch_boolean_resets_to_true() {
    let fx = Fixture::new();
    let (_, json) = fx.run_json(&[
        "switch", "boolean", "--from", "eq", "--to", "eq", "--value", "false",
    ]);
    assert_eq!(json["result"]["from"]["value"], "false");
    assert_eq!(json["result"]["to"]["value"], "true");
}

#[test]
fn test_switch_text_output() {
    let fx = Fixture::new();
    let output = fx.run_text(&[
        "switch", "date", "--from", "eq", "--to", "range", "--value", "2024-05-10",
    ]);
    assert!(output.status.success());

    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("from"));
    assert!(lines[2].contains("[\"2024-05-10T00:00:00.000Z\",null]"));
}

#[test]
fn test_switch_unknown_operator() {
    let fx = Fixture::new();
    let (output, json) = fx.run_json(&["switch", "date", "--from", "eq", "--to", "between"]);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(json["error"]["code"], -32002);

    // nothing close: every code is offered
    let suggestions = json["error"]["data"]["suggestions"].as_array().unwrap();
    assert_eq!(suggestions.len(), 7);
    assert!(suggestions.contains(&json!("range")));
}
