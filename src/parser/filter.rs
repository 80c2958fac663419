use crate::ast::{
    BinaryOperatorKind, CollectionToken, FunctionCallToken, InToken, LambdaKind, LambdaToken,
    ParameterAliasToken, QueryToken, Token, TokenKind, UnaryOperatorKind,
};
use crate::context::TokenizerContext;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{Dialect, Lexer};
use crate::parser::{ExpressionGrammar, apply_prefixes, expect_end};

/// Tokenize a `$filter` expression.
pub fn tokenize_filter(text: &str, context: &mut TokenizerContext) -> ParseResult<QueryToken> {
    log::debug!("tokenizing $filter '{}'", text);
    tokenize_filter_at(text, 0, context)
}

pub(crate) fn tokenize_filter_at(
    text: &str,
    base_offset: usize,
    context: &mut TokenizerContext,
) -> ParseResult<QueryToken> {
    ExpressionParser::new(text, base_offset, context)?.parse_to_end()
}

/// Parser for the filter expression grammar.
///
/// ```text
/// comparison     := additive (("eq"|"ne"|"gt"|"ge"|"lt"|"le"|"has"|custom) additive
///                             | "in" collection)*
/// additive       := multiplicative (("add"|"sub") multiplicative)*
/// multiplicative := unary (("mul"|"div"|"divby"|"mod") unary)*
/// unary          := "-" unary | "not" unary | primary
/// primary        := "(" expression ")" | literal | "@alias" | member ("/" member)*
/// member         := dotted-identifier ["(" arguments ")"]
///                 | "any"|"all" "(" [variable ":" expression] ")"
/// ```
///
/// Also the expression engine behind `$orderby`, `$compute` and `$apply`,
/// which drive it item by item.
pub struct ExpressionParser<'a, 'c> {
    lexer: Lexer<'a>,
    context: &'c mut TokenizerContext,
}

impl<'a, 'c> ExpressionParser<'a, 'c> {
    /// Parser positioned on the first token of `text`
    pub fn new(
        text: &'a str,
        base_offset: usize,
        context: &'c mut TokenizerContext,
    ) -> ParseResult<Self> {
        let mut lexer = context.create_lexer(text, Dialect::Expression, base_offset);
        lexer.next_token()?;
        Ok(ExpressionParser { lexer, context })
    }

    pub(crate) fn current(&self) -> Token<'a> {
        self.lexer.current_token()
    }

    pub(crate) fn advance(&mut self) -> ParseResult<()> {
        self.lexer.next_token()?;
        Ok(())
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, description: &str) -> ParseResult<()> {
        self.lexer.expect(kind, description)
    }

    pub(crate) fn expect_end(&self) -> ParseResult<()> {
        expect_end(&self.lexer)
    }

    /// Consume `keyword` or fail with [`ParseError::KeywordExpected`]
    pub(crate) fn expect_keyword(&mut self, keyword: &str) -> ParseResult<()> {
        if !self.at_keyword(keyword) {
            return Err(ParseError::KeywordExpected {
                keyword: keyword.to_string(),
                position: self.current().position,
            });
        }
        self.advance()
    }

    /// Identifier following `as`
    pub(crate) fn parse_alias(&mut self) -> ParseResult<String> {
        let token = self.current();
        if token.kind != TokenKind::Identifier {
            return Err(self.lexer.expected("alias"));
        }
        self.advance()?;
        Ok(token.text.to_string())
    }

    pub(crate) fn read_dotted_identifier(&mut self) -> ParseResult<String> {
        self.lexer.read_dotted_identifier(false)
    }

    fn custom_operator(&self, text: &str) -> Option<BinaryOperatorKind> {
        self.context
            .settings()
            .custom_operators
            .iter()
            .find(|operator| self.context.keyword_matches(text, operator))
            .map(|operator| BinaryOperatorKind::Customized(operator.clone()))
    }

    fn comparison_operator(&self) -> Option<BinaryOperatorKind> {
        let token = self.current();
        if token.kind != TokenKind::Identifier {
            return None;
        }
        BinaryOperatorKind::comparison(token.text, self.context.case_insensitive())
            .or_else(|| self.custom_operator(token.text))
    }

    fn binary_operator(
        &self,
        lookup: fn(&str, bool) -> Option<BinaryOperatorKind>,
    ) -> Option<BinaryOperatorKind> {
        let token = self.current();
        if token.kind != TokenKind::Identifier {
            return None;
        }
        lookup(token.text, self.context.case_insensitive())
    }

    fn parse_comparison(&mut self) -> ParseResult<QueryToken> {
        self.recurse_chain(|parser, links| {
            let mut left = parser.parse_additive()?;
            loop {
                if parser.at_keyword("in") {
                    parser.link(links)?;
                    parser.advance()?;
                    let right = parser.parse_in_operand()?;
                    left = QueryToken::In(InToken {
                        left: Box::new(left),
                        right: Box::new(right),
                    });
                    continue;
                }
                let Some(kind) = parser.comparison_operator() else {
                    break;
                };
                parser.link(links)?;
                parser.advance()?;
                let right = parser.parse_additive()?;
                left = QueryToken::binary(kind, left, right);
            }
            Ok(left)
        })
    }

    fn parse_additive(&mut self) -> ParseResult<QueryToken> {
        self.recurse_chain(|parser, links| {
            let mut left = parser.parse_multiplicative()?;
            while let Some(kind) = parser.binary_operator(BinaryOperatorKind::additive) {
                parser.link(links)?;
                parser.advance()?;
                let right = parser.parse_multiplicative()?;
                left = QueryToken::binary(kind, left, right);
            }
            Ok(left)
        })
    }

    fn parse_multiplicative(&mut self) -> ParseResult<QueryToken> {
        self.recurse_chain(|parser, links| {
            let mut left = parser.parse_unary()?;
            while let Some(kind) = parser.binary_operator(BinaryOperatorKind::multiplicative) {
                parser.link(links)?;
                parser.advance()?;
                let right = parser.parse_unary()?;
                left = QueryToken::binary(kind, left, right);
            }
            Ok(left)
        })
    }

    /// Right side of `in`: a parenthesized list or a single operand
    fn parse_in_operand(&mut self) -> ParseResult<QueryToken> {
        if self.current().kind != TokenKind::OpenParen {
            return self.parse_primary();
        }
        self.recurse(|parser| {
            parser.advance()?;
            let mut items = vec![parser.parse_expression()?];
            while parser.current().kind == TokenKind::Comma {
                parser.advance()?;
                items.push(parser.parse_expression()?);
            }
            parser.expect(TokenKind::CloseParen, "')'")?;
            Ok(QueryToken::Collection(CollectionToken { items }))
        })
    }

    /// Member access path, possibly ending in a function call or lambda.
    pub(crate) fn parse_member_path(&mut self) -> ParseResult<QueryToken> {
        self.recurse_chain(|parser, links| {
            let mut token = parser.parse_segment(None)?;
            while parser.current().kind == TokenKind::Slash {
                parser.link(links)?;
                parser.advance()?;
                token = parser.parse_segment(Some(token.into_inner_path()))?;
            }
            Ok(token)
        })
    }

    fn parse_segment(&mut self, parent: Option<QueryToken>) -> ParseResult<QueryToken> {
        let identifier = self.read_dotted_identifier()?;

        if self.current().kind == TokenKind::OpenParen {
            return match (lambda_kind(&identifier), parent) {
                (Some(kind), Some(parent)) => self.parse_lambda(kind, parent),
                (_, source) => {
                    let arguments = self.parse_arguments()?;
                    Ok(QueryToken::FunctionCall(FunctionCallToken {
                        name: identifier,
                        arguments,
                        source: source.map(Box::new),
                    }))
                }
            };
        }

        if parent.is_none() && self.context.is_parameter(&identifier) {
            return Ok(QueryToken::range_variable(identifier));
        }
        Ok(QueryToken::end_path(identifier, parent))
    }

    fn parse_arguments(&mut self) -> ParseResult<Vec<QueryToken>> {
        self.recurse(|parser| {
            parser.expect(TokenKind::OpenParen, "'('")?;
            let mut arguments = Vec::new();
            if parser.current().kind == TokenKind::CloseParen {
                parser.advance()?;
                return Ok(arguments);
            }
            loop {
                arguments.push(parser.parse_expression()?);
                match parser.current().kind {
                    TokenKind::Comma => parser.advance()?,
                    TokenKind::CloseParen => {
                        parser.advance()?;
                        return Ok(arguments);
                    }
                    _ => return Err(parser.lexer.expected("',' or ')'")),
                }
            }
        })
    }

    /// `any(v:expr)`, `all(v:expr)` or the argument-less `any()`.
    ///
    /// The range variable is in scope only inside the lambda body.
    fn parse_lambda(&mut self, kind: LambdaKind, parent: QueryToken) -> ParseResult<QueryToken> {
        self.recurse(|parser| {
            parser.expect(TokenKind::OpenParen, "'('")?;

            if parser.current().kind == TokenKind::CloseParen && kind == LambdaKind::Any {
                parser.advance()?;
                return Ok(QueryToken::Lambda(LambdaToken {
                    kind,
                    parent: Box::new(parent),
                    variable: None,
                    expression: None,
                }));
            }

            let token = parser.current();
            if token.kind != TokenKind::Identifier {
                return Err(parser.lexer.expected("range variable"));
            }
            let variable = token.text.to_string();
            parser.advance()?;
            parser.expect(TokenKind::Colon, "':'")?;

            parser.context.declare_parameter(&variable)?;
            let body = parser.parse_expression();
            parser.context.remove_parameter(&variable);
            let body = body?;

            parser.expect(TokenKind::CloseParen, "')'")?;
            Ok(QueryToken::Lambda(LambdaToken {
                kind,
                parent: Box::new(parent),
                variable: Some(variable),
                expression: Some(Box::new(body)),
            }))
        })
    }
}

fn lambda_kind(identifier: &str) -> Option<LambdaKind> {
    match identifier {
        "any" => Some(LambdaKind::Any),
        "all" => Some(LambdaKind::All),
        _ => None,
    }
}

impl<'a, 'c> ExpressionGrammar<'a> for ExpressionParser<'a, 'c> {
    fn lexer(&mut self) -> &mut Lexer<'a> {
        &mut self.lexer
    }

    fn context(&mut self) -> &mut TokenizerContext {
        self.context
    }

    fn parse_and_operand(&mut self) -> ParseResult<QueryToken> {
        self.parse_comparison()
    }

    fn parse_unary(&mut self) -> ParseResult<QueryToken> {
        self.recurse_chain(|parser, links| {
            let mut prefixes = Vec::new();
            loop {
                let kind = if parser.current().kind == TokenKind::Minus {
                    UnaryOperatorKind::Negate
                } else if parser.at_keyword("not") {
                    UnaryOperatorKind::Not
                } else {
                    break;
                };
                parser.link(links)?;
                parser.advance()?;
                prefixes.push(kind);
            }
            let operand = parser.parse_primary()?;
            Ok(apply_prefixes(prefixes, operand))
        })
    }

    fn parse_primary(&mut self) -> ParseResult<QueryToken> {
        self.recurse(|parser| {
            let token = parser.current();
            match token.kind {
                TokenKind::OpenParen => {
                    parser.advance()?;
                    let expression = parser.parse_expression()?;
                    parser.expect(TokenKind::CloseParen, "')'")?;
                    Ok(expression)
                }
                kind if kind.is_literal() => {
                    parser.advance()?;
                    Ok(QueryToken::literal(kind, token.text))
                }
                TokenKind::AnnotationIdentifier => {
                    parser.advance()?;
                    Ok(QueryToken::ParameterAlias(ParameterAliasToken {
                        alias: token.text.to_string(),
                    }))
                }
                TokenKind::Identifier => parser.parse_member_path(),
                _ => Err(ParseError::ExpressionExpected {
                    position: token.position,
                }),
            }
        })
    }
}
