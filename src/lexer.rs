//! Character-level lexer for query option text.
//!
//! The lexer is a single-pass scanner with one token of state. Ambiguous
//! digit-led text (dates, times, guids, numbers) is resolved by trial scans
//! that roll back to a [`Checkpoint`] when they fail; see [`literals`].

mod literals;

use unicode_xid::UnicodeXID;

use crate::ast::{Token, TokenKind};
use crate::error::{ParseError, ParseResult};

/// Token vocabulary the lexer recognizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dialect {
    /// Operators, paths, literals: `$filter`, `$orderby`, `$select`, ...
    #[default]
    Expression,
    /// Bare words, `"phrases"`, parentheses and `AND`/`OR`/`NOT`: `$search`
    Search,
}

/// Saved lexer state for trial scans and peeking.
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint<'a> {
    position: usize,
    token: Token<'a>,
}

pub struct Lexer<'a> {
    source: &'a str,
    /// Byte offset and character, so tokens can slice `source` directly
    chars: Vec<(usize, char)>,
    /// Index into `chars` of the next unread character
    position: usize,
    base_offset: usize,
    token: Token<'a>,
    dialect: Dialect,
    ignore_whitespace: bool,
}

pub fn is_identifier_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_xid_start()
}

pub fn is_identifier_continue(c: char) -> bool {
    c.is_xid_continue()
}

/// Identifiers, and vocabulary words such as `true`, `null` or `INF` when
/// they stand where a name is expected
fn is_name_token(token: &Token<'_>) -> bool {
    match token.kind {
        TokenKind::Identifier => true,
        TokenKind::BooleanLiteral
        | TokenKind::NullLiteral
        | TokenKind::SingleLiteral
        | TokenKind::DoubleLiteral => token.text.starts_with(is_identifier_start),
        _ => false,
    }
}

fn punctuation(c: char) -> Option<TokenKind> {
    let kind = match c {
        '(' => TokenKind::OpenParen,
        ')' => TokenKind::CloseParen,
        '[' => TokenKind::OpenBracket,
        ']' => TokenKind::CloseBracket,
        ',' => TokenKind::Comma,
        '.' => TokenKind::Dot,
        '/' => TokenKind::Slash,
        ':' => TokenKind::Colon,
        ';' => TokenKind::Semicolon,
        '&' => TokenKind::Ampersand,
        '%' => TokenKind::Percent,
        '?' => TokenKind::Question,
        '*' => TokenKind::Star,
        '=' => TokenKind::Equal,
        _ => return None,
    };
    Some(kind)
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer::with_offset(source, Dialect::Expression, 0)
    }

    pub fn with_dialect(source: &'a str, dialect: Dialect) -> Self {
        Lexer::with_offset(source, dialect, 0)
    }

    /// Lexer whose token positions are shifted by `base_offset`.
    ///
    /// Used for nested option values so that positions keep pointing into
    /// the outermost option string.
    pub fn with_offset(source: &'a str, dialect: Dialect, base_offset: usize) -> Self {
        Lexer {
            source,
            chars: source.char_indices().collect(),
            position: 0,
            base_offset,
            token: Token::unknown(base_offset),
            dialect,
            ignore_whitespace: true,
        }
    }

    /// Report whitespace runs as [`TokenKind::Whitespace`] tokens
    pub fn keep_whitespace(mut self) -> Self {
        self.ignore_whitespace = false;
        self
    }

    /// Collect every token of `source`, end-of-input excluded
    pub fn tokenize_all(source: &'a str, dialect: Dialect) -> ParseResult<Vec<Token<'a>>> {
        let mut lexer = Lexer::with_dialect(source, dialect);
        let mut tokens = Vec::new();
        while lexer.next_token()? {
            tokens.push(lexer.current_token());
        }
        Ok(tokens)
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Last token produced by [`Lexer::next_token`]
    pub fn current_token(&self) -> Token<'a> {
        self.token
    }

    /// Absolute offset of the next unread character
    pub fn position(&self) -> usize {
        self.absolute(self.position)
    }

    fn current_char(&self) -> Option<char> {
        self.chars.get(self.position).map(|&(_, c)| c)
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position + offset).map(|&(_, c)| c)
    }

    fn advance(&mut self) {
        if self.position < self.chars.len() {
            self.position += 1;
        }
    }

    /// Byte offset in `source` of the character at `index`
    fn byte_at(&self, index: usize) -> usize {
        self.chars
            .get(index)
            .map(|&(offset, _)| offset)
            .unwrap_or(self.source.len())
    }

    fn absolute(&self, index: usize) -> usize {
        self.base_offset + self.byte_at(index)
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.source[self.byte_at(start)..self.byte_at(end)]
    }

    fn set_token(&mut self, kind: TokenKind, start: usize) {
        self.token = Token::new(kind, self.slice(start, self.position), self.absolute(start));
    }

    pub fn checkpoint(&self) -> Checkpoint<'a> {
        Checkpoint {
            position: self.position,
            token: self.token,
        }
    }

    pub fn restore(&mut self, checkpoint: Checkpoint<'a>) {
        self.position = checkpoint.position;
        self.token = checkpoint.token;
    }

    /// Run a trial scan, rolling back when it yields `None`.
    fn try_scan<T>(&mut self, scan: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let saved = self.checkpoint();
        let result = scan(self);
        if result.is_none() {
            self.restore(saved);
        }
        result
    }

    /// Advance to the next token.
    ///
    /// Returns `Ok(false)` at end of input, where the current token becomes
    /// [`TokenKind::End`].
    pub fn next_token(&mut self) -> ParseResult<bool> {
        match self.dialect {
            Dialect::Expression => self.scan_expression_token()?,
            Dialect::Search => self.scan_search_token()?,
        }
        log::trace!(
            "token {:?} '{}' at {}",
            self.token.kind,
            self.token.text,
            self.token.position
        );
        Ok(self.token.kind != TokenKind::End)
    }

    /// Compute the following token without committing to it.
    ///
    /// Position, current character and current token are exactly as before
    /// the call, whatever the outcome.
    pub fn peek_next_token(&mut self) -> ParseResult<Option<Token<'a>>> {
        let saved = self.checkpoint();
        let produced = self.next_token();
        let token = self.token;
        self.restore(saved);
        Ok(produced?.then_some(token))
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn scan_expression_token(&mut self) -> ParseResult<()> {
        if self.ignore_whitespace {
            self.skip_whitespace();
        } else if self.current_char().is_some_and(char::is_whitespace) {
            let start = self.position;
            self.skip_whitespace();
            self.set_token(TokenKind::Whitespace, start);
            return Ok(());
        }

        let start = self.position;
        let Some(ch) = self.current_char() else {
            self.set_token(TokenKind::End, start);
            return Ok(());
        };

        if let Some(kind) = punctuation(ch) {
            self.advance();
            self.set_token(kind, start);
            return Ok(());
        }

        match ch {
            '-' => self.scan_minus(start),
            '\'' | '"' => {
                self.scan_string(ch)?;
                self.set_token(TokenKind::StringLiteral, start);
                Ok(())
            }
            '$' if !self.peek_char(1).is_some_and(is_identifier_continue) => {
                self.advance();
                self.set_token(TokenKind::Dollar, start);
                Ok(())
            }
            c if is_identifier_start(c) => self.scan_identifier_or_literal(start),
            c if c.is_ascii_digit() => {
                let kind = self.parse_from_digit(start)?;
                self.set_token(kind, start);
                Ok(())
            }
            '@' => self.scan_annotation(start),
            c => Err(ParseError::InvalidCharacter {
                character: c,
                position: self.absolute(start),
            }),
        }
    }

    /// `-` may start a negative number, `-INF`, or stand alone.
    fn scan_minus(&mut self, start: usize) -> ParseResult<()> {
        self.advance();
        match self.current_char() {
            Some(c) if c.is_ascii_digit() => {
                let kind = self.parse_from_digit(start)?;
                self.set_token(kind, start);
            }
            Some('I') => {
                let kind = self.try_scan(|lexer| {
                    let word_start = lexer.position;
                    lexer.scan_identifier_chars();
                    match lexer.slice(word_start, lexer.position) {
                        "INF" => Some(TokenKind::DoubleLiteral),
                        "INFF" | "INFf" => Some(TokenKind::SingleLiteral),
                        _ => None,
                    }
                });
                self.set_token(kind.unwrap_or(TokenKind::Minus), start);
            }
            _ => self.set_token(TokenKind::Minus, start),
        }
        Ok(())
    }

    /// Scan a quoted string starting at the current quote character.
    ///
    /// A doubled delimiter escapes it in both quote styles; inside `"`
    /// strings a backslash escape is also allowed.
    fn scan_string(&mut self, quote: char) -> ParseResult<()> {
        let start = self.position;
        self.advance();
        loop {
            match self.current_char() {
                None => {
                    return Err(ParseError::UnterminatedString {
                        position: self.absolute(start),
                    });
                }
                Some(c) if c == quote => {
                    self.advance();
                    if self.current_char() != Some(quote) {
                        return Ok(());
                    }
                    self.advance();
                }
                Some('\\') if quote == '"' => {
                    let escape_start = self.position;
                    self.advance();
                    match self.current_char() {
                        Some('"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't') => self.advance(),
                        Some('u') => {
                            self.advance();
                            for _ in 0..4 {
                                if !self.current_char().is_some_and(|c| c.is_ascii_hexdigit()) {
                                    return Err(self.invalid_escape(escape_start));
                                }
                                self.advance();
                            }
                        }
                        Some(_) => {
                            self.advance();
                            return Err(self.invalid_escape(escape_start));
                        }
                        None => {
                            return Err(ParseError::UnterminatedString {
                                position: self.absolute(start),
                            });
                        }
                    }
                }
                Some(_) => self.advance(),
            }
        }
    }

    fn invalid_escape(&self, escape_start: usize) -> ParseError {
        ParseError::InvalidEscape {
            sequence: self.slice(escape_start, self.position).to_string(),
            position: self.absolute(escape_start),
        }
    }

    fn scan_identifier_chars(&mut self) {
        while self.current_char().is_some_and(is_identifier_continue) {
            self.advance();
        }
    }

    fn scan_dotted_identifier_chars(&mut self) {
        loop {
            self.scan_identifier_chars();
            if self.current_char() == Some('.') && self.peek_char(1).is_some_and(is_identifier_start)
            {
                self.advance();
                self.advance();
            } else {
                break;
            }
        }
    }

    fn scan_identifier_or_literal(&mut self, start: usize) -> ParseResult<()> {
        self.advance();
        self.scan_identifier_chars();
        let word = self.slice(start, self.position);

        if self.current_char() == Some('\'') {
            let kind = literals::type_prefixed_kind(word).ok_or(ParseError::TypedNull {
                position: self.absolute(start),
            })?;
            self.scan_string('\'')?;
            self.set_token(kind, start);
            return Ok(());
        }

        if self.current_char() == Some('-')
            && word.chars().all(|c| c.is_ascii_hexdigit())
            && let Some(kind) = self.try_letter_guid(start)
        {
            self.set_token(kind, start);
            return Ok(());
        }

        self.set_token(literals::classify_word(word), start);
        Ok(())
    }

    fn scan_annotation(&mut self, start: usize) -> ParseResult<()> {
        self.advance();
        match self.current_char() {
            None => self.set_token(TokenKind::At, start),
            Some(c) if c.is_whitespace() => self.set_token(TokenKind::At, start),
            Some(c) if is_identifier_start(c) => {
                self.advance();
                self.scan_dotted_identifier_chars();
                self.set_token(TokenKind::AnnotationIdentifier, start);
            }
            Some(c) => {
                return Err(ParseError::InvalidCharacter {
                    character: c,
                    position: self.absolute(self.position),
                });
            }
        }
        Ok(())
    }

    fn scan_search_token(&mut self) -> ParseResult<()> {
        self.skip_whitespace();
        let start = self.position;
        match self.current_char() {
            None => self.set_token(TokenKind::End, start),
            Some('(') => {
                self.advance();
                self.set_token(TokenKind::OpenParen, start);
            }
            Some(')') => {
                self.advance();
                self.set_token(TokenKind::CloseParen, start);
            }
            Some('"') => {
                self.scan_phrase()?;
                self.set_token(TokenKind::StringLiteral, start);
            }
            Some(_) => {
                while self
                    .current_char()
                    .is_some_and(|c| !c.is_whitespace() && !matches!(c, '(' | ')' | '"'))
                {
                    self.advance();
                }
                let word = self.slice(start, self.position);
                let kind = if ["AND", "OR", "NOT"]
                    .iter()
                    .any(|keyword| word.eq_ignore_ascii_case(keyword))
                {
                    TokenKind::Identifier
                } else {
                    TokenKind::StringLiteral
                };
                self.set_token(kind, start);
            }
        }
        Ok(())
    }

    /// `"..."` search phrase; only `\"` and `\\` escapes are allowed
    fn scan_phrase(&mut self) -> ParseResult<()> {
        let start = self.position;
        self.advance();
        loop {
            match self.current_char() {
                None => {
                    return Err(ParseError::UnterminatedString {
                        position: self.absolute(start),
                    });
                }
                Some('"') => {
                    self.advance();
                    return Ok(());
                }
                Some('\\') => {
                    let escape_start = self.position;
                    self.advance();
                    match self.current_char() {
                        Some('"' | '\\') => self.advance(),
                        Some(_) => {
                            self.advance();
                            return Err(self.invalid_escape(escape_start));
                        }
                        None => {
                            return Err(ParseError::UnterminatedString {
                                position: self.absolute(start),
                            });
                        }
                    }
                }
                Some(_) => self.advance(),
            }
        }
    }

    /// Error for a current token that is not `description`
    pub fn expected(&self, description: &str) -> ParseError {
        ParseError::ExpectedToken {
            expected: description.to_string(),
            found: self.token.describe(),
            position: self.token.position,
        }
    }

    /// Require the current token to be `kind`, then advance past it.
    pub fn expect(&mut self, kind: TokenKind, description: &str) -> ParseResult<()> {
        if self.token.kind != kind {
            return Err(self.expected(description));
        }
        self.next_token()?;
        Ok(())
    }

    /// Read `Ident(.Ident)*` starting at the current token.
    ///
    /// With `accept_star`, a lone `*` or a trailing `.*` is accepted as well
    /// (`*`, `NS.*`). Leaves the lexer on the token after the identifier.
    pub fn read_dotted_identifier(&mut self, accept_star: bool) -> ParseResult<String> {
        let mut name = match self.token.kind {
            _ if is_name_token(&self.token) => self.token.text.to_string(),
            TokenKind::Star if accept_star => {
                self.next_token()?;
                return Ok("*".to_string());
            }
            _ => return Err(self.expected("identifier")),
        };
        self.next_token()?;

        while self.token.kind == TokenKind::Dot {
            self.next_token()?;
            match self.token.kind {
                _ if is_name_token(&self.token) => {
                    name.push('.');
                    name.push_str(self.token.text);
                }
                TokenKind::Star if accept_star => {
                    name.push_str(".*");
                    self.next_token()?;
                    break;
                }
                _ => return Err(self.expected("identifier")),
            }
            self.next_token()?;
        }
        Ok(name)
    }

    /// Raw text of a nested option value.
    ///
    /// Starts right after the current token (the `=`) and stops before the
    /// first `;` or `)` outside parentheses and quotes; that delimiter
    /// becomes the current token. Returns the text and its absolute offset.
    pub fn read_option_value(&mut self) -> ParseResult<(&'a str, usize)> {
        let start = self.position;
        let mut depth = 0usize;
        loop {
            match self.current_char() {
                None => {
                    return Err(ParseError::ExpectedToken {
                        expected: "')'".to_string(),
                        found: "end of input".to_string(),
                        position: self.absolute(self.position),
                    });
                }
                Some(quote @ ('\'' | '"')) => self.scan_string(quote)?,
                Some('(') => {
                    depth += 1;
                    self.advance();
                }
                Some(')') if depth == 0 => break,
                Some(')') => {
                    depth -= 1;
                    self.advance();
                }
                Some(';') if depth == 0 => break,
                Some(_) => self.advance(),
            }
        }
        let value = self.slice(start, self.position);
        let offset = self.absolute(start);
        self.next_token()?;
        Ok((value, offset))
    }
}
