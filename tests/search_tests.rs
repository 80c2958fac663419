// tests/search_tests.rs

use pretty_assertions::assert_eq;
use qopt::ast::{BinaryOperatorKind, QueryToken, UnaryOperatorKind};
use qopt::context::DEFAULT_MAX_DEPTH;
use qopt::{ParseError, QueryOptionParser, TokenizerContext, TokenizerSettings, tokenize_search};

fn search(text: &str) -> QueryToken {
    QueryOptionParser::default().parse_search(text).unwrap()
}

fn search_error(text: &str) -> ParseError {
    QueryOptionParser::default().parse_search(text).unwrap_err()
}

fn term(text: &str) -> QueryToken {
    QueryToken::string_literal(text)
}

fn and(left: QueryToken, right: QueryToken) -> QueryToken {
    QueryToken::binary(BinaryOperatorKind::And, left, right)
}

fn or(left: QueryToken, right: QueryToken) -> QueryToken {
    QueryToken::binary(BinaryOperatorKind::Or, left, right)
}

fn not(operand: QueryToken) -> QueryToken {
    QueryToken::unary(UnaryOperatorKind::Not, operand)
}

// ============================================================================
// Terms and Operators
// ============================================================================

#[test]
fn test_single_term() {
    assert_eq!(search("blue"), term("blue"));
}

#[test]
fn test_grouped_or_and() {
    assert_eq!(
        search("(A OR BC) AND DEF"),
        and(or(term("A"), term("BC")), term("DEF"))
    );
}

#[test]
fn test_implicit_and() {
    assert_eq!(
        search("A BC DEF"),
        and(and(term("A"), term("BC")), term("DEF"))
    );
}

#[test]
fn test_not() {
    assert_eq!(search("not foo"), not(term("foo")));
    assert_eq!(search("NOT NOT foo"), not(not(term("foo"))));
}

#[test]
fn test_implicit_and_before_not_and_group() {
    assert_eq!(
        search("A NOT B (C OR D)"),
        and(and(term("A"), not(term("B"))), or(term("C"), term("D")))
    );
}

#[test]
fn test_or_binds_loosest() {
    assert_eq!(
        search("A OR B C"),
        or(term("A"), and(term("B"), term("C")))
    );
}

#[test]
fn test_keywords_ignore_case() {
    assert_eq!(search("a and b"), and(term("a"), term("b")));
    assert_eq!(search("a Or b"), or(term("a"), term("b")));
}

// ============================================================================
// Phrases
// ============================================================================

#[test]
fn test_phrase() {
    assert_eq!(
        search(r#"blue "dark red""#),
        and(term("blue"), term("dark red"))
    );
}

#[test]
fn test_phrase_escapes_removed() {
    assert_eq!(search(r#""say \"hi\"""#), term(r#"say "hi""#));
    assert_eq!(search(r#""back\\slash""#), term(r"back\slash"));
}

#[test]
fn test_quoted_keyword_is_a_term() {
    assert_eq!(search(r#""AND""#), term("AND"));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_dangling_operator() {
    assert_eq!(search_error("A OR"), ParseError::ExpressionExpected { position: 4 });
    assert_eq!(search_error("AND A"), ParseError::ExpressionExpected { position: 0 });
}

#[test]
fn test_empty_search() {
    assert_eq!(search_error(""), ParseError::ExpressionExpected { position: 0 });
}

#[test]
fn test_unbalanced_parentheses() {
    assert!(matches!(
        search_error("(A OR B"),
        ParseError::ExpectedToken { position: 7, .. }
    ));
    assert_eq!(
        search_error("A)"),
        ParseError::UnexpectedToken {
            token: ")".to_string(),
            position: 1
        }
    );
}

#[test]
fn test_unterminated_phrase() {
    assert_eq!(
        search_error(r#"A "open"#),
        ParseError::UnterminatedString { position: 2 }
    );
}

#[test]
fn test_recursion_guard() {
    let text = format!("{}A{}", "(".repeat(100), ")".repeat(100));
    let mut ctx = TokenizerContext::new(TokenizerSettings {
        max_depth: 30,
        ..TokenizerSettings::default()
    });
    assert_eq!(
        tokenize_search(&text, &mut ctx),
        Err(ParseError::RecursionDepthExceeded { max_depth: 30 })
    );
    assert_eq!(ctx.depth(), 0);
}

#[test]
fn test_long_term_list_is_bounded() {
    let test_cases = vec![
        "blue ".repeat(100_000),
        "blue OR ".repeat(100_000) + "red",
        "NOT ".repeat(100_000) + "red",
    ];

    for text in test_cases {
        let mut ctx = TokenizerContext::default();
        assert_eq!(
            tokenize_search(&text, &mut ctx),
            Err(ParseError::RecursionDepthExceeded {
                max_depth: DEFAULT_MAX_DEPTH
            })
        );
        assert_eq!(ctx.depth(), 0);
    }
}

#[test]
fn test_search_is_idempotent() {
    let text = r#"(blue OR "dark red") NOT green"#;
    assert_eq!(search(text), search(text));
}
