// tests/cli_tests.rs
#![cfg(feature = "cli")]

use std::env;
use std::fs;

use qopt::cli::{
    self, CheckOptions, CliError, DocCategory, OutputFormat, execute_check, load_settings,
};
use qopt::{Dialect, QueryOptionKind, TokenizerSettings};

fn options(kind: QueryOptionKind, text: &str, format: OutputFormat) -> CheckOptions {
    CheckOptions {
        kind,
        text: text.to_string(),
        format,
        settings: TokenizerSettings::default(),
    }
}

// ============================================================================
// Tokenize Commands
// ============================================================================

#[test]
fn test_debug_output() {
    let output = execute_check(&options(
        QueryOptionKind::Filter,
        "Name eq 'Sam'",
        OutputFormat::Debug,
    ))
    .unwrap();
    assert!(output.starts_with("Filter("));
    assert!(output.contains("Equal"));
}

#[test]
fn test_pretty_json_output() {
    let output = execute_check(&options(
        QueryOptionKind::Select,
        "Name",
        OutputFormat::PrettyJson,
    ))
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["option"], "Select");
    assert_eq!(value["tokens"]["items"][0]["path"]["segments"][0], "Name");
    assert!(output.contains('\n'));
}

#[test]
fn test_trailing_newline_from_stdin_ignored() {
    let output = execute_check(&options(
        QueryOptionKind::OrderBy,
        "Name desc\n",
        OutputFormat::Json,
    ))
    .unwrap();
    assert!(output.contains("Descending"));
}

#[test]
fn test_parse_error_message() {
    let error = execute_check(&options(QueryOptionKind::Expand, "Orders()", OutputFormat::Json))
        .unwrap_err();
    assert!(matches!(error, CliError::Parse(_)));
    assert_eq!(
        error.to_string(),
        "Parse error: Empty option list at position 6"
    );
}

#[test]
fn test_settings_override() {
    let mut check = options(QueryOptionKind::Filter, "A EQ 1", OutputFormat::Json);
    assert!(execute_check(&check).is_err());
    check.settings.case_insensitive = true;
    assert!(execute_check(&check).is_ok());
}

// ============================================================================
// Settings File
// ============================================================================

#[test]
fn test_load_settings_file() {
    let path = env::temp_dir().join(format!("qopt-settings-{}.json", std::process::id()));
    fs::write(&path, r#"{"max_depth": 12, "allow_no_dollar_prefix": true}"#).unwrap();
    let settings = load_settings(Some(&path)).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(settings.max_depth, 12);
    assert!(settings.allow_no_dollar_prefix);
    assert!(!settings.case_insensitive);
}

#[test]
fn test_load_settings_errors() {
    let missing = env::temp_dir().join("qopt-settings-does-not-exist.json");
    assert!(matches!(
        load_settings(Some(&missing)),
        Err(CliError::Io(_))
    ));

    let path = env::temp_dir().join(format!("qopt-settings-bad-{}.json", std::process::id()));
    fs::write(&path, "{ not json").unwrap();
    let result = load_settings(Some(&path));
    fs::remove_file(&path).unwrap();
    assert!(matches!(result, Err(CliError::Json(_))));
}

// ============================================================================
// Tokens and Docs
// ============================================================================

#[test]
fn test_token_dump() {
    let output = cli::dump_tokens("Price gt 10", Dialect::Expression, false).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("Identifier"));
    assert!(lines[0].ends_with("Price"));
}

#[test]
fn test_token_dump_error() {
    assert!(matches!(
        cli::dump_tokens("'open", Dialect::Expression, true),
        Err(CliError::Parse(qopt::ParseError::UnterminatedString { position: 0 }))
    ));
}

#[test]
fn test_docs() {
    assert!(cli::get_docs_overview().contains("select-expand"));
    for name in ["literals", "filter", "search", "orderby", "compute", "select", "apply", "settings"] {
        assert!(DocCategory::from_name(name).is_some(), "Failed for {}", name);
        assert!(!cli::get_doc_category(name).unwrap().is_empty());
    }
    assert!(matches!(
        cli::get_doc_category("nope"),
        Err(CliError::UnknownCategory(_))
    ));
}
