//! `$select` and `$expand`: slash-separated paths, each optionally followed
//! by a parenthesized, `;`-separated list of nested query options.
//!
//! Nested option values are cut out of the outer text and handed to the
//! matching option tokenizer on a fresh lexer that shares the context, so
//! recursion depth and range variables carry across levels and error
//! positions stay absolute.

use crate::ast::{
    ComputeToken, ExpandItemToken, ExpandToken, LevelsToken, OrderByToken, QueryToken,
    SegmentPath, SelectItemToken, SelectToken, Token, TokenKind,
};
use crate::context::TokenizerContext;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{Dialect, Lexer};
use crate::parser::compute::tokenize_compute_at;
use crate::parser::expect_end;
use crate::parser::filter::tokenize_filter_at;
use crate::parser::orderby::tokenize_orderby_at;
use crate::parser::search::tokenize_search_at;

const SELECT_OPTIONS: &[&str] = &[
    "$filter", "$orderby", "$top", "$skip", "$count", "$search", "$select", "$compute",
];

const EXPAND_OPTIONS: &[&str] = &[
    "$filter", "$orderby", "$top", "$skip", "$count", "$search", "$select", "$compute", "$expand",
    "$levels",
];

/// Depth charged for each nested `$select`/`$expand` list
const NESTED_LIST_LEVELS: usize = 8;

/// Tokenize a `$select` list.
pub fn tokenize_select(text: &str, context: &mut TokenizerContext) -> ParseResult<SelectToken> {
    log::debug!("tokenizing $select '{}'", text);
    tokenize_select_at(text, 0, context)
}

/// Tokenize an `$expand` list.
pub fn tokenize_expand(text: &str, context: &mut TokenizerContext) -> ParseResult<ExpandToken> {
    log::debug!("tokenizing $expand '{}'", text);
    tokenize_expand_at(text, 0, context)
}

fn tokenize_select_at(
    text: &str,
    base_offset: usize,
    context: &mut TokenizerContext,
) -> ParseResult<SelectToken> {
    let mut parser = TermParser::new(text, base_offset, context, TermKind::Select)?;
    let items = parser.parse_items(|path, options| {
        let mut item = SelectItemToken::new(path);
        item.filter = options.filter;
        item.order_by = options.order_by;
        item.top = options.top;
        item.skip = options.skip;
        item.count = options.count;
        item.search = options.search;
        item.select = options.select;
        item.compute = options.compute;
        item
    })?;
    Ok(SelectToken { items })
}

fn tokenize_expand_at(
    text: &str,
    base_offset: usize,
    context: &mut TokenizerContext,
) -> ParseResult<ExpandToken> {
    let mut parser = TermParser::new(text, base_offset, context, TermKind::Expand)?;
    let items = parser.parse_items(|path, options| ExpandItemToken {
        path,
        filter: options.filter,
        order_by: options.order_by,
        top: options.top,
        skip: options.skip,
        count: options.count,
        search: options.search,
        select: options.select,
        compute: options.compute,
        expand: options.expand,
        levels: options.levels,
    })?;
    Ok(ExpandToken { items })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TermKind {
    Select,
    Expand,
}

impl TermKind {
    fn allowed_options(self) -> &'static [&'static str] {
        match self {
            TermKind::Select => SELECT_OPTIONS,
            TermKind::Expand => EXPAND_OPTIONS,
        }
    }
}

/// Options collected from one `(...)` list
#[derive(Debug, Default)]
struct NestedOptions {
    filter: Option<QueryToken>,
    order_by: Option<Vec<OrderByToken>>,
    top: Option<u64>,
    skip: Option<u64>,
    count: Option<bool>,
    search: Option<QueryToken>,
    select: Option<SelectToken>,
    compute: Option<ComputeToken>,
    expand: Option<ExpandToken>,
    levels: Option<LevelsToken>,
}

struct TermParser<'a, 'c> {
    lexer: Lexer<'a>,
    context: &'c mut TokenizerContext,
    kind: TermKind,
}

impl<'a, 'c> TermParser<'a, 'c> {
    fn new(
        text: &'a str,
        base_offset: usize,
        context: &'c mut TokenizerContext,
        kind: TermKind,
    ) -> ParseResult<Self> {
        let mut lexer = context.create_lexer(text, Dialect::Expression, base_offset);
        lexer.next_token()?;
        Ok(TermParser {
            lexer,
            context,
            kind,
        })
    }

    fn current(&self) -> Token<'a> {
        self.lexer.current_token()
    }

    /// `item ("," item)*`; empty text yields no items
    fn parse_items<T>(
        &mut self,
        build: impl Fn(SegmentPath, NestedOptions) -> T,
    ) -> ParseResult<Vec<T>> {
        let mut items = Vec::new();
        if self.current().kind == TokenKind::End {
            return Ok(items);
        }
        loop {
            let path = self.parse_path()?;
            let options = if self.current().kind == TokenKind::OpenParen {
                self.parse_options()?
            } else {
                NestedOptions::default()
            };
            items.push(build(path, options));

            match self.current().kind {
                TokenKind::Comma => {
                    self.lexer.next_token()?;
                }
                _ => {
                    expect_end(&self.lexer)?;
                    return Ok(items);
                }
            }
        }
    }

    fn invalid_path(&self, message: impl Into<String>, position: usize) -> ParseError {
        ParseError::InvalidPath {
            message: message.into(),
            position,
        }
    }

    fn parse_path(&mut self) -> ParseResult<SegmentPath> {
        let mut segments: Vec<String> = Vec::new();
        loop {
            let position = self.current().position;
            let segment = self.parse_segment(&segments, position)?;
            segments.push(segment);
            if segments.len() > self.context.settings().max_path_length {
                return Err(self.invalid_path(
                    format!(
                        "path exceeds the maximum of {} segments",
                        self.context.settings().max_path_length
                    ),
                    position,
                ));
            }

            if self.current().kind != TokenKind::Slash {
                break;
            }
            let slash = self.current().position;
            match segments.last().map(String::as_str) {
                Some(terminal @ ("$ref" | "$count")) => {
                    return Err(
                        self.invalid_path(format!("'{terminal}' must be the last segment"), slash)
                    );
                }
                Some("*") if self.kind == TermKind::Select => {
                    return Err(self.invalid_path("'*' cannot be followed by '/'", slash));
                }
                _ => {}
            }
            self.lexer.next_token()?;
        }
        log::trace!("path {:?}", segments);
        Ok(SegmentPath::new(segments))
    }

    fn parse_segment(&mut self, previous: &[String], position: usize) -> ParseResult<String> {
        let token = self.current();
        let segment = if token.kind == TokenKind::Identifier && token.text.starts_with('$') {
            self.check_system_segment(token)?;
            self.lexer.next_token()?;
            token.text.to_string()
        } else {
            self.lexer.read_dotted_identifier(true)?
        };

        if self.kind == TermKind::Expand {
            if previous.last().is_some_and(|last| last == "*") && segment != "$ref" {
                return Err(self.invalid_path("'*' can only be followed by '$ref'", position));
            }
            if segment == "*" && !previous.is_empty() {
                return Err(self.invalid_path("'*' must be the first segment", position));
            }
            if segment.ends_with(".*") {
                return Err(self.invalid_path("namespace wildcards are not allowed", position));
            }
        }
        Ok(segment)
    }

    /// Only `$ref` and `$count` may appear as `$`-prefixed segments
    fn check_system_segment(&self, token: Token<'a>) -> ParseResult<()> {
        let allowed = match token.text {
            "$count" => true,
            "$ref" => {
                self.kind == TermKind::Expand || self.context.settings().enable_ref_in_select
            }
            _ => false,
        };
        if !allowed {
            return Err(self.invalid_path(
                format!("segment '{}' is not allowed here", token.text),
                token.position,
            ));
        }
        Ok(())
    }

    /// `"(" key "=" value (";" key "=" value)* ")"`
    fn parse_options(&mut self) -> ParseResult<NestedOptions> {
        let open = self.current().position;
        self.lexer.expect(TokenKind::OpenParen, "'('")?;
        if self.current().kind == TokenKind::CloseParen {
            return Err(ParseError::EmptyOptionList { position: open });
        }

        let mut options = NestedOptions::default();
        let mut seen: Vec<&'static str> = Vec::new();
        loop {
            let key = self.current();
            if key.kind != TokenKind::Identifier {
                return Err(self.lexer.expected("query option"));
            }
            let name = self.option_name(key)?;
            self.lexer.next_token()?;
            if self.current().kind != TokenKind::Equal {
                return Err(self.lexer.expected("'='"));
            }
            if seen.contains(&name) {
                return Err(ParseError::DuplicateOption {
                    name: name.to_string(),
                    position: key.position,
                });
            }
            seen.push(name);

            let (value, offset) = self.lexer.read_option_value()?;
            log::debug!("nested option {} '{}' at {}", name, value, offset);
            self.apply_option(&mut options, name, value, offset)?;

            let separator = self.current().kind;
            self.lexer.next_token()?;
            if separator == TokenKind::CloseParen {
                return Ok(options);
            }
        }
    }

    /// Canonical `$`-prefixed name of an option key
    fn option_name(&self, key: Token<'a>) -> ParseResult<&'static str> {
        let bare = match key.text.strip_prefix('$') {
            Some(bare) => Some(bare),
            None if self.context.allow_no_dollar_prefix() => Some(key.text),
            None => None,
        };
        bare.and_then(|bare| {
            self.kind
                .allowed_options()
                .iter()
                .copied()
                .find(|option| self.context.keyword_matches(bare, &option[1..]))
        })
        .ok_or_else(|| ParseError::UnknownOption {
            name: key.text.to_string(),
            position: key.position,
        })
    }

    fn apply_option(
        &mut self,
        options: &mut NestedOptions,
        name: &str,
        value: &str,
        offset: usize,
    ) -> ParseResult<()> {
        let context = &mut *self.context;
        match name {
            "$filter" => options.filter = Some(tokenize_filter_at(value, offset, context)?),
            "$orderby" => options.order_by = Some(tokenize_orderby_at(value, offset, context)?),
            "$top" => options.top = Some(parse_unsigned(name, value, offset)?),
            "$skip" => options.skip = Some(parse_unsigned(name, value, offset)?),
            "$count" => options.count = Some(parse_bool(name, value, offset)?),
            "$search" => options.search = Some(tokenize_search_at(value, offset, context)?),
            "$compute" => options.compute = Some(tokenize_compute_at(value, offset, context)?),
            "$select" => {
                let select = context.recurse_levels(NESTED_LIST_LEVELS, |ctx| {
                    tokenize_select_at(value, offset, ctx)
                })?;
                options.select = Some(select);
            }
            "$expand" => {
                let expand = context.recurse_levels(NESTED_LIST_LEVELS, |ctx| {
                    tokenize_expand_at(value, offset, ctx)
                })?;
                options.expand = Some(expand);
            }
            "$levels" => options.levels = Some(parse_levels(value, offset)?),
            _ => {
                return Err(ParseError::UnknownOption {
                    name: name.to_string(),
                    position: offset,
                });
            }
        }
        Ok(())
    }
}

fn invalid_value(option: &str, value: &str, position: usize) -> ParseError {
    ParseError::InvalidOptionValue {
        option: option.to_string(),
        value: value.to_string(),
        position,
    }
}

fn parse_unsigned(option: &str, value: &str, position: usize) -> ParseResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid_value(option, value, position))
}

fn parse_bool(option: &str, value: &str, position: usize) -> ParseResult<bool> {
    match value.trim() {
        v if v.eq_ignore_ascii_case("true") => Ok(true),
        v if v.eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(invalid_value(option, value, position)),
    }
}

fn parse_levels(value: &str, position: usize) -> ParseResult<LevelsToken> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("max") {
        return Ok(LevelsToken::Max);
    }
    trimmed
        .parse()
        .map(LevelsToken::Count)
        .map_err(|_| invalid_value("$levels", value, position))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_levels() {
        assert_eq!(parse_levels("max", 0), Ok(LevelsToken::Max));
        assert_eq!(parse_levels(" 3 ", 0), Ok(LevelsToken::Count(3)));
        assert!(matches!(
            parse_levels("-1", 4),
            Err(ParseError::InvalidOptionValue { position: 4, .. })
        ));
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("$count", "TRUE", 0), Ok(true));
        assert_eq!(parse_bool("$count", "false", 0), Ok(false));
        assert!(parse_bool("$count", "yes", 0).is_err());
    }

    #[test]
    fn test_empty_select() {
        let mut ctx = TokenizerContext::default();
        assert_eq!(tokenize_select("", &mut ctx).unwrap(), SelectToken::default());
    }
}
