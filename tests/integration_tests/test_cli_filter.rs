// integration tests for the filter command

use crate::common::*;
use serde_json::json;

fn names(result: &serde_json::Value) -> Vec<String> {
    result["rows"]
        .as_array()
        .expect("rows array")
        .iter()
        .map(|r| r["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn test_filter_string_starts_with() {
    let fx = Fixture::new();
    let rows = fx.write_rows(&sample_rows());

    let (output, json) = fx.run_json(&["filter", "--rows", rows.to_str().unwrap(), "-w", "name:start:Al"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let result = &json["result"];
    assert_eq!(result["total"], 4);
    assert_eq!(result["matched"], 2);
    assert_eq!(names(result), vec!["Alice", "alice"]);
    assert_eq!(
        result["filters"][0],
        json!({ "column": "name", "kind": "string", "op": "start", "value": "Al" })
    );
}

#[test]
fn test_filter_default_operator_when_omitted() {
    let fx = Fixture::new();
    let rows = fx.write_rows(&sample_rows());

    // "name::li" leaves the operator to the catalog default (includes)
    let (_, json) = fx.run_json(&["filter", "--rows", rows.to_str().unwrap(), "-w", "name::li"]);
    assert_eq!(json["result"]["filters"][0]["op"], "in");
    assert_eq!(names(&json["result"]), vec!["Alice", "alice", "Balice"]);
}

#[test]
fn test_filter_with_global_search() {
    let fx = Fixture::new();
    let rows = fx.write_rows(&sample_rows());

    let (_, json) = fx.run_json(&[
        "filter",
        "--rows",
        rows.to_str().unwrap(),
        "-w",
        "name:in:li",
        "--search",
        "BAL",
    ]);
    assert_eq!(names(&json["result"]), vec!["Balice"]);
    assert_eq!(json["result"]["search"], "BAL");
}

#[test]
fn test_filter_date_operators() {
    let fx = Fixture::new();
    let rows = fx.write_rows(&sample_rows());
    let rows = rows.to_str().unwrap();

    let (_, json) = fx.run_json(&["filter", "--rows", rows, "-w", "joined:gte:11/05/2024"]);
    assert_eq!(names(&json["result"]), vec!["alice", "Balice"]);

    // a missing date is never equal, so it passes "not equals"
    let (_, json) = fx.run_json(&["filter", "--rows", rows, "-w", "joined:neq:10/05/2024"]);
    assert_eq!(names(&json["result"]), vec!["alice", "Balice", "Bob"]);

    let (_, json) = fx.run_json(&["filter", "--rows", rows, "-w", "joined:eq:2024-05-10"]);
    assert_eq!(names(&json["result"]), vec!["Alice"]);
    assert_eq!(json["result"]["filters"][0]["value"], "2024-05-10T00:00:00.000Z");
}

#[test]
fn test_filter_date_range() {
    let fx = Fixture::new();
    let rows = fx.write_rows(&sample_rows());
    let rows = rows.to_str().unwrap();

    let (_, json) = fx.run_json(&[
        "filter",
        "--rows",
        rows,
        "-w",
        "joined:range:2024-05-10..2024-05-31",
    ]);
    assert_eq!(names(&json["result"]), vec!["Alice", "alice"]);
    assert_eq!(
        json["result"]["filters"][0]["value"],
        json!(["2024-05-10T00:00:00.000Z", "2024-05-31T00:00:00.000Z"])
    );

    // open end
    let (_, json) = fx.run_json(&["filter", "--rows", rows, "-w", "joined:range:11/05/2024.."]);
    assert_eq!(names(&json["result"]), vec!["alice", "Balice"]);
}

#[test]
fn test_filter_boolean() {
    let fx = Fixture::new();
    let rows = fx.write_rows(&sample_rows());
    let rows = rows.to_str().unwrap();

    // no value: boolean filters start at true
    let (_, json) = fx.run_json(&["filter", "--rows", rows, "-w", "active:eq"]);
    assert_eq!(names(&json["result"]), vec!["Alice", "Balice"]);
    assert_eq!(json["result"]["filters"][0]["value"], "true");

    let (_, json) = fx.run_json(&["filter", "--rows", rows, "-w", "active:eq:false"]);
    assert_eq!(names(&json["result"]), vec!["alice", "Bob"]);
}

#[test]
fn test_filters_are_combined() {
    let fx = Fixture::new();
    let rows = fx.write_rows(&sample_rows());
    let rows = rows.to_str().unwrap();

    let (_, json) = fx.run_json(&[
        "filter",
        "--rows",
        rows,
        "-w",
        "active:eq:true",
        "-w",
        "name:end:ice",
    ]);
    assert_eq!(names(&json["result"]), vec!["Alice", "Balice"]);

    let (_, json) = fx.run_json(&[
        "filter",
        "--rows",
        rows,
        "-w",
        "active:eq:true",
        "-w",
        "name:end:ice",
        "-w",
        "joined:lt:2024-06-01",
    ]);
    assert_eq!(names(&json["result"]), vec!["Alice"]);
}

#[test]
fn test_filter_highlights_in_json() {
    let fx = Fixture::new();
    let rows = fx.write_rows(&sample_rows());

    let (_, json) = fx.run_json(&[
        "filter",
        "--rows",
        rows.to_str().unwrap(),
        "-w",
        "name:in:li",
        "-s",
        "2024-05",
        "--highlight",
    ]);

    let result = &json["result"];
    assert_eq!(result["matched"], 2);
    let first = &result["highlights"][0];
    assert_eq!(first["name"]["terms"], json!(["li", "2024-05"]));
    assert_eq!(first["name"]["segments"][1], json!({ "text": "li", "highlighted": true }));
    assert_eq!(first["joined"]["terms"], json!(["2024-05"]));
    assert!(first.get("active").is_none());
}

#[test]
fn test_filter_text_output_with_highlight() {
    let fx = Fixture::new();
    let rows = fx.write_rows(&sample_rows());

    let output = fx.run_text(&[
        "filter",
        "--rows",
        rows.to_str().unwrap(),
        "-w",
        "name:in:li",
        "--highlight",
    ]);
    assert!(output.status.success());

    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("active"));
    assert!(out.contains("A[li]ce"));
    assert!(out.contains("a[li]ce"));
    assert!(out.contains("Ba[li]ce"));
}

#[test]
fn test_filter_count_and_format() {
    let fx = Fixture::new();
    let rows = fx.write_rows(&sample_rows());
    let rows = rows.to_str().unwrap();

    let output = fx.run_text(&["filter", "--rows", rows, "-w", "name:start:al", "--count"]);
    assert_eq!(stdout(&output).trim(), "2");

    let output = fx.run(&[
        "filter",
        "--rows",
        rows,
        "-w",
        "name:start:al",
        "--format",
        "{name}:{active}",
    ]);
    assert_eq!(stdout(&output), "Alice:true\nalice:false\n");
}

#[test]
fn test_filter_no_matches_text() {
    let fx = Fixture::new();
    let rows = fx.write_rows(&sample_rows());

    let output = fx.run_text(&["filter", "--rows", rows.to_str().unwrap(), "-s", "zzz"]);
    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("No matching rows (4 total)"));
}

#[test]
fn test_filter_unknown_operator() {
    let fx = Fixture::new();
    let rows = fx.write_rows(&sample_rows());

    let (output, json) =
        fx.run_json(&["filter", "--rows", rows.to_str().unwrap(), "-w", "name:strt:Al"]);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(json["error"]["code"], -32002);
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("unknown operator 'strt'"));
    assert_eq!(json["error"]["data"]["suggestions"], json!(["start"]));
}

#[test]
fn test_filter_unknown_operator_text() {
    let fx = Fixture::new();
    let rows = fx.write_rows(&sample_rows());

    let output = fx.run_text(&["filter", "--rows", rows.to_str().unwrap(), "-w", "active:gt:true"]);
    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("unknown operator 'gt' for column 'active'"));
    assert!(err.contains("Did you mean"));
}

#[test]
fn test_filter_unknown_column() {
    let fx = Fixture::new();
    let rows = fx.write_rows(&sample_rows());

    let (output, json) = fx.run_json(&["filter", "--rows", rows.to_str().unwrap(), "-w", "nme:in:x"]);
    assert_eq!(output.status.code(), Some(6));
    assert_eq!(json["error"]["data"]["suggestions"][0], "name");
}

#[test]
fn test_filter_invalid_clause() {
    let fx = Fixture::new();
    let rows = fx.write_rows(&sample_rows());

    let output = fx.run_text(&["filter", "--rows", rows.to_str().unwrap(), "-w", "name"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("COLUMN:OP[:VALUE]"));
}

#[test]
fn test_filter_bad_rows_file() {
    let fx = Fixture::new();

    let missing = fx.path().join("missing.json");
    let output = fx.run_text(&["filter", "--rows", missing.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(3));

    let rows = fx.write_rows(&json!({ "not": "an array" }));
    let output = fx.run_text(&["filter", "--rows", rows.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("expected a JSON array"));
}

#[test]
fn test_filter_uses_column_config() {
    let fx = Fixture::new();
    let rows = fx.write_rows(&sample_rows());
    fx.write_config(
        r#"{
            // custom display format and header
            columns: [
                { name: "joined", kind: "date", label: "Joined On", format: "YYYY/MM/DD" },
            ],
        }"#,
    );

    let (_, json) = fx.run_json(&["filter", "--rows", rows.to_str().unwrap(), "-w", "joined:eq:2024/05/11"]);
    assert_eq!(names(&json["result"]), vec!["alice"]);

    let output = fx.run_text(&["filter", "--rows", rows.to_str().unwrap(), "-s", "bob"]);
    assert!(stdout(&output).lines().next().unwrap().contains("Joined On"));
}

#[test]
fn test_filter_config_overrides_inferred_kind() {
    let fx = Fixture::new();
    let rows = fx.write_rows(&sample_rows());
    fx.write_config(r#"{ columns: [{ name: "joined", kind: "string" }] }"#);

    let (output, json) =
        fx.run_json(&["filter", "--rows", rows.to_str().unwrap(), "-w", "joined:in:-06-"]);
    assert!(output.status.success());
    assert_eq!(json["result"]["filters"][0]["kind"], "string");
    assert_eq!(names(&json["result"]), vec!["Balice"]);
}

#[test]
fn test_filter_invalid_config() {
    let fx = Fixture::new();
    let rows = fx.write_rows(&sample_rows());
    fx.write_config("{ columns: [");

    let output = fx.run_text(&["filter", "--rows", rows.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_filter_rejects_unparseable_date() {
    let fx = Fixture::new();
    let rows = fx.write_rows(&sample_rows());
    let rows = rows.to_str().unwrap();

    let (output, json) = fx.run_json(&[
        "filter",
        "--rows",
        rows,
        "-w",
        "joined:range:2024-13-45..yesterday",
    ]);
    assert_eq!(output.status.code(), Some(4));
    assert_eq!(json["error"]["code"], -32004);
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("invalid value '2024-13-45' for column 'joined'"));

    let output = fx.run_text(&["filter", "--rows", rows, "-w", "joined:neq:not-a-date"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("DD/MM/YYYY"));
}

#[test]
fn test_filter_rejects_unparseable_boolean() {
    let fx = Fixture::new();
    let rows = fx.write_rows(&sample_rows());
    let rows = rows.to_str().unwrap();

    let output = fx.run_text(&["filter", "--rows", rows, "-w", "active:eq:yes"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("expected true or false"));

    let (output, json) = fx.run_json(&["filter", "--rows", rows, "-w", "active:eq:FALSE"]);
    assert!(output.status.success());
    assert_eq!(names(&json["result"]), vec!["alice", "Bob"]);
}

#[test]
fn test_filter_date_alone_under_time_format() {
    let fx = Fixture::new();
    let rows = fx.write_rows(&sample_rows());
    fx.write_config(
        r#"{ columns: [{ name: "joined", kind: "date", with_time: true, format: "DD/MM/YYYY HH:mm" }] }"#,
    );

    let (output, json) =
        fx.run_json(&["filter", "--rows", rows.to_str().unwrap(), "-w", "joined:gte:11/05/2024"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(names(&json["result"]), vec!["alice", "Balice"]);
    assert_eq!(json["result"]["filters"][0]["value"], "2024-05-11T00:00:00.000Z");
}
