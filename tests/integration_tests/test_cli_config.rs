// integration tests for the config command

use crate::common::*;

#[test]
fn test_config_path_uses_override() {
    let fx = Fixture::new();
    let output = fx.run_text(&["config", "path"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), fx.config_path().to_str().unwrap());
}

#[test]
fn test_config_show_missing_file_gives_defaults() {
    let fx = Fixture::new();
    let (output, json) = fx.run_json(&["config", "show"]);
    assert!(output.status.success());
    assert_eq!(json["result"]["settings"]["date_format"], "DD/MM/YYYY");
    assert_eq!(json["result"]["settings"]["locale"], "tr");
    assert_eq!(json["result"]["columns"].as_array().unwrap().len(), 0);
}

#[test]
fn test_config_show_json5() {
    let fx = Fixture::new();
    fx.write_config(
        r#"{
            // trailing commas and comments are fine
            settings: { date_format: "YYYY-MM-DD", },
            columns: [{ name: "active", kind: "boolean", true_label: "Yes" }],
        }"#,
    );

    let output = fx.run_text(&["config", "show"]);
    assert!(output.status.success());
    let shown: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(shown["settings"]["date_format"], "YYYY-MM-DD");
    assert_eq!(shown["columns"][0]["true_label"], "Yes");
}

#[test]
fn test_config_default_is_valid() {
    let fx = Fixture::new();
    let (output, json) = fx.run_json(&["config", "default"]);
    assert!(output.status.success());
    assert_eq!(json["result"]["columns"].as_array().unwrap().len(), 3);

    // round-trip the default through verify
    let text = fx.run_text(&["config", "default"]);
    fx.write_config(&stdout(&text));
    let output = fx.run_text(&["config", "verify"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Configuration is valid"));
}

#[test]
fn test_config_verify_reports_errors() {
    let fx = Fixture::new();
    fx.write_config(
        r#"{ columns: [
            { name: "name", kind: "string" },
            { name: "NAME", kind: "string" },
            { name: "active", kind: "boolean", format: "DD" },
        ] }"#,
    );

    let output = fx.run_text(&["config", "verify"]);
    assert_eq!(output.status.code(), Some(5));
    let err = stderr(&output);
    assert!(err.contains("2 error(s)"));
    assert!(err.contains("duplicate column 'NAME'"));
    assert!(err.contains("has date options"));

    let (output, json) = fx.run_json(&["config", "verify"]);
    assert_eq!(output.status.code(), Some(5));
    assert_eq!(json["error"]["code"], -32005);
    assert!(json["error"]["data"]["details"]
        .as_str()
        .unwrap()
        .contains("duplicate column"));
}

#[test]
fn test_config_verify_missing_file() {
    let fx = Fixture::new();
    let output = fx.run_text(&["config", "verify"]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("config file not found"));
}

#[test]
fn test_config_env_var_location() {
    let fx = Fixture::new();
    let path = fx.path().join("from-env.json");

    let output = std::process::Command::new(gridfilter_binary_path())
        .args(["--no-json", "config", "path"])
        .env("GRIDFILTER_CONFIG", &path)
        .output()
        .expect("Failed to execute gridfilter");
    assert_eq!(stdout(&output).trim(), path.to_str().unwrap());
}
