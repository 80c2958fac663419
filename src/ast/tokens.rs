use serde::Serialize;

/// Classification of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// No token has been read yet
    Unknown,

    /// End of input
    End,

    /// Run of whitespace (only produced when whitespace is not ignored)
    Whitespace,

    // Structural punctuation
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `[`
    OpenBracket,
    /// `]`
    CloseBracket,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `/`
    Slash,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `&`
    Ampersand,
    /// `$` not followed by an identifier character
    Dollar,
    /// `%`
    Percent,
    /// `?`
    Question,
    /// `*`
    Star,
    /// `@` at end of input
    At,
    /// `=`
    Equal,
    /// `-` that does not start a numeric literal
    Minus,

    // Literals
    /// Integer that fits in 32 bits
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -2147483648
    /// ```
    IntegerLiteral,

    /// Integer that needs 64 bits, or carries an `L` suffix
    ///
    /// # Examples
    /// ```text
    /// 2147483647111
    /// 5L
    /// ```
    Int64Literal,

    /// Floating point value representable as `f32` without loss
    ///
    /// # Examples
    /// ```text
    /// 123.001
    /// 1.5f
    /// INFf
    /// ```
    SingleLiteral,

    /// Floating point value that needs `f64`
    ///
    /// # Examples
    /// ```text
    /// 1234567.001
    /// 2.5d
    /// NaN
    /// ```
    DoubleLiteral,

    /// Value only a decimal represents exactly
    ///
    /// # Examples
    /// ```text
    /// 3258.678765765489753678965390
    /// 1.5M
    /// ```
    DecimalLiteral,

    /// `true` or `false`
    BooleanLiteral,

    /// `null`
    NullLiteral,

    /// Quoted string, delimiters included in the token text
    ///
    /// # Examples
    /// ```text
    /// 'Sam'
    /// 'O''Neil'
    /// "say \"hi\""
    /// ```
    StringLiteral,

    /// 8-4-4-4-12 hexadecimal guid
    GuidLiteral,

    /// `2012-12-03`
    DateOnlyLiteral,

    /// `07:16:23.123`
    TimeOnlyLiteral,

    /// `2012-12-03T07:16:23Z`
    DateTimeOffsetLiteral,

    /// `duration'P1DT2H'`
    DurationLiteral,

    /// `binary'AQID'`, `X'0102'` or `0x0102`
    BinaryLiteral,

    /// `geography'POINT(10 20)'`
    GeographyLiteral,

    /// `geometry'POINT(10 20)'`
    GeometryLiteral,

    /// Identifier-prefixed quoted literal with an unrecognized prefix
    ///
    /// # Examples
    /// ```text
    /// Color'Red'
    /// ```
    QuotedLiteral,

    // Identifiers
    /// Property, function, keyword or `$`-prefixed system name
    ///
    /// # Examples
    /// ```text
    /// Name
    /// eq
    /// $it
    /// ```
    Identifier,

    /// `@` followed by a dotted identifier
    ///
    /// # Examples
    /// ```text
    /// @p1
    /// @NS.Term
    /// ```
    AnnotationIdentifier,
}

impl TokenKind {
    /// Whether this kind is one of the literal kinds
    pub fn is_literal(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            IntegerLiteral
                | Int64Literal
                | SingleLiteral
                | DoubleLiteral
                | DecimalLiteral
                | BooleanLiteral
                | NullLiteral
                | StringLiteral
                | GuidLiteral
                | DateOnlyLiteral
                | TimeOnlyLiteral
                | DateTimeOffsetLiteral
                | DurationLiteral
                | BinaryLiteral
                | GeographyLiteral
                | GeometryLiteral
                | QuotedLiteral
        )
    }
}

/// A classified, positioned slice of the input.
///
/// `text` borrows the input buffer, so a token never outlives it.
/// `position` is the absolute byte offset of the first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub position: usize,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str, position: usize) -> Self {
        Token {
            kind,
            text,
            position,
        }
    }

    /// Placeholder token held by a lexer before the first `next_token`
    pub fn unknown(position: usize) -> Self {
        Token::new(TokenKind::Unknown, "", position)
    }

    /// Identifier token spelling `keyword`.
    ///
    /// Matches exactly, or ignoring ASCII case when `case_insensitive` is set.
    pub fn is_keyword(&self, keyword: &str, case_insensitive: bool) -> bool {
        self.kind == TokenKind::Identifier
            && (self.text == keyword || (case_insensitive && self.text.eq_ignore_ascii_case(keyword)))
    }

    /// Text used when the token is quoted in an error message
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::End => "end of input".to_string(),
            _ => self.text.to_string(),
        }
    }
}
