// integration tests for shell completion output

use crate::common::*;

#[test]
fn test_completions_for_each_shell() {
    let fx = Fixture::new();
    for shell in ["bash", "zsh", "fish"] {
        let output = fx.run(&["completions", shell]);
        assert!(output.status.success(), "{} failed", shell);
        let script = stdout(&output);
        assert!(script.contains("gridfilter"), "{} script missing binary name", shell);
        assert!(script.contains("switch"), "{} script missing subcommands", shell);
    }
}

#[test]
fn test_completions_unknown_shell() {
    let fx = Fixture::new();
    let output = fx.run_text(&["completions", "tcsh"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("unsupported shell 'tcsh'"));
}
