//! Dump the raw lexer stream of an option string

use super::CliError;
use crate::lexer::{Dialect, Lexer};
use crate::output::render;

/// One line per token (`position kind text`), or a JSON array when `json`
pub fn dump_tokens(text: &str, dialect: Dialect, json: bool) -> Result<String, CliError> {
    let tokens = Lexer::tokenize_all(text.trim_end_matches(['\r', '\n']), dialect)?;
    if json {
        return Ok(render(&tokens, false)?);
    }
    let mut out = String::new();
    for token in &tokens {
        let kind = format!("{:?}", token.kind);
        out.push_str(&format!("{:>5}  {:<22} {}\n", token.position, kind, token.text));
    }
    Ok(out)
}
