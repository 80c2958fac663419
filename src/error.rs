//! Tokenizer error types
//!
//! Every failure in the lexer or in one of the option tokenizers is reported
//! through [`ParseError`]. There is no recovery: the first error aborts the
//! whole tokenize call and is handed back to the caller.

use thiserror::Error;

/// Result type for lexer and tokenizer operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Lexical, syntactic and resource-limit errors.
///
/// Positions are absolute byte offsets into the outermost option string,
/// even when the error was raised while tokenizing a nested option value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    // Lexical
    /// A character that cannot start any token
    #[error("Invalid character '{character}' at position {position}")]
    InvalidCharacter { character: char, position: usize },

    /// String literal without its closing delimiter
    #[error("Unterminated string literal starting at position {position}")]
    UnterminatedString { position: usize },

    /// Backslash escape that is not allowed inside the literal
    #[error("Invalid escape sequence '{sequence}' at position {position}")]
    InvalidEscape { sequence: String, position: usize },

    /// Digit-led text that no numeric type can represent
    #[error("Invalid numeric string '{text}' at position {position}")]
    InvalidNumeric { text: String, position: usize },

    /// `.` or exponent marker not followed by a digit
    #[error("Digit expected at position {position}")]
    DigitExpected { position: usize },

    /// `null'...'` style literal
    #[error("Typed null literals are not supported (position {position})")]
    TypedNull { position: usize },

    // Syntactic
    /// A specific token was required
    #[error("Expected {expected} at position {position}, found '{found}'")]
    ExpectedToken {
        expected: String,
        found: String,
        position: usize,
    },

    /// A required keyword such as `as` was missing
    #[error("Keyword '{keyword}' expected at position {position}")]
    KeywordExpected { keyword: String, position: usize },

    /// Primary expression could not be formed from the current token
    #[error("Expression expected at position {position}")]
    ExpressionExpected { position: usize },

    /// Token that does not fit anywhere in the grammar
    #[error("Syntax error at position {position}: unexpected '{token}'")]
    UnexpectedToken { token: String, position: usize },

    /// Malformed select/expand path
    #[error("Invalid path at position {position}: {message}")]
    InvalidPath { message: String, position: usize },

    /// `()` after a select or expand item
    #[error("Empty option list at position {position}")]
    EmptyOptionList { position: usize },

    /// Nested option key that is not valid in this list
    #[error("Unknown query option '{name}' at position {position}")]
    UnknownOption { name: String, position: usize },

    /// Nested option key repeated within one list
    #[error("Query option '{name}' specified more than once (position {position})")]
    DuplicateOption { name: String, position: usize },

    /// Value of `$top`, `$skip`, `$count` or `$levels` does not parse
    #[error("Invalid value '{value}' for query option '{option}' at position {position}")]
    InvalidOptionValue {
        option: String,
        value: String,
        position: usize,
    },

    /// `$apply` transformation name that is not supported
    #[error("Unsupported transformation '{name}' at position {position}")]
    UnsupportedTransformation { name: String, position: usize },

    // Resource limits
    /// Nesting exceeded the configured maximum depth
    #[error("Expression too deep: recursion exceeded the maximum depth of {max_depth}")]
    RecursionDepthExceeded { max_depth: usize },

    /// `leave_recurse` without a matching `enter_recurse`
    #[error("Recursion depth accounting mismatch")]
    RecursionMismatch,

    /// Range variable declared while a variable of that name is in scope
    #[error("Range variable '{name}' is already declared")]
    DuplicateRangeVariable { name: String },
}

impl ParseError {
    /// Absolute position the error refers to, when it has one
    pub fn position(&self) -> Option<usize> {
        use ParseError::*;
        match self {
            InvalidCharacter { position, .. }
            | UnterminatedString { position }
            | InvalidEscape { position, .. }
            | InvalidNumeric { position, .. }
            | DigitExpected { position }
            | TypedNull { position }
            | ExpectedToken { position, .. }
            | KeywordExpected { position, .. }
            | ExpressionExpected { position }
            | UnexpectedToken { position, .. }
            | InvalidPath { position, .. }
            | EmptyOptionList { position }
            | UnknownOption { position, .. }
            | DuplicateOption { position, .. }
            | InvalidOptionValue { position, .. }
            | UnsupportedTransformation { position, .. } => Some(*position),
            RecursionDepthExceeded { .. } | RecursionMismatch | DuplicateRangeVariable { .. } => {
                None
            }
        }
    }
}
