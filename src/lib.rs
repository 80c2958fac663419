//! Lexer and syntactic tokenizers for URL query options.
//!
//! Turns the text of `$filter`, `$search`, `$orderby`, `$compute`,
//! `$select`, `$expand` and `$apply` into token trees (see [`ast`]) for a
//! later semantic binding stage. Nothing here consults a data model: names
//! are recorded as written.

pub mod ast;
pub mod context;
pub mod error;
pub mod lexer;
pub mod output;
pub mod parser;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{QueryToken, Token, TokenKind};
pub use context::{TokenizerContext, TokenizerSettings};
pub use error::{ParseError, ParseResult};
pub use lexer::{Dialect, Lexer};
pub use output::{to_json, to_json_pretty};
pub use parser::{
    ExpressionGrammar, ParsedQueryOption, QueryOptionKind, QueryOptionParser, tokenize_apply,
    tokenize_compute, tokenize_expand, tokenize_filter, tokenize_orderby, tokenize_search,
    tokenize_select,
};
