//! Tokenize one query option and render the result

use std::fs;
use std::path::Path;

use super::CliError;
use crate::output::render;
use crate::{QueryOptionKind, QueryOptionParser, TokenizerSettings};

/// How a token tree is printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Rust `Debug` form, pretty-printed
    #[default]
    Debug,
    Json,
    PrettyJson,
}

/// Options for tokenizing one option
#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub kind: QueryOptionKind,
    /// Option text without the `$name=` prefix
    pub text: String,
    pub format: OutputFormat,
    pub settings: TokenizerSettings,
}

/// Read settings from a JSON file, or the defaults when no file is given
pub fn load_settings(path: Option<&Path>) -> Result<TokenizerSettings, CliError> {
    let Some(path) = path else {
        return Ok(TokenizerSettings::default());
    };
    log::debug!("loading settings from {}", path.display());
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Tokenize `options.text` and render the token tree
pub fn execute_check(options: &CheckOptions) -> Result<String, CliError> {
    let parser = QueryOptionParser::new(options.settings.clone());
    let parsed = parser.parse(options.kind, options.text.trim_end_matches(['\r', '\n']))?;
    let rendered = match options.format {
        OutputFormat::Debug => format!("{:#?}", parsed),
        OutputFormat::Json => render(&parsed, false)?,
        OutputFormat::PrettyJson => render(&parsed, true)?,
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(kind: QueryOptionKind, text: &str, format: OutputFormat) -> CheckOptions {
        CheckOptions {
            kind,
            text: text.to_string(),
            format,
            settings: TokenizerSettings::default(),
        }
    }

    #[test]
    fn test_json_output() {
        let output =
            execute_check(&options(QueryOptionKind::Search, "blue\n", OutputFormat::Json)).unwrap();
        assert_eq!(
            output,
            r#"{"option":"Search","tokens":{"type":"StringLiteral","text":"blue"}}"#
        );
    }

    #[test]
    fn test_parse_error_surfaces() {
        let result = execute_check(&options(QueryOptionKind::Filter, "a eq", OutputFormat::Debug));
        assert!(matches!(result, Err(CliError::Parse(_))));
    }

    #[test]
    fn test_default_settings() {
        assert_eq!(load_settings(None).unwrap(), TokenizerSettings::default());
    }
}
