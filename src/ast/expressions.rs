use serde::Serialize;

use crate::ast::{BinaryOperatorKind, TokenKind, UnaryOperatorKind};

/// Node of the token-level AST produced by the expression tokenizers.
///
/// Nodes own their text; nothing here borrows the option string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum QueryToken {
    /// Literal value exactly as written, classified by the lexer
    ///
    /// # Examples
    /// ```text
    /// 'Sam'
    /// 42
    /// 2012-12-03
    /// ```
    Literal(LiteralToken),

    /// Search term or phrase, quotes and escapes removed
    StringLiteral(StringLiteralToken),

    /// Last segment of a member access path
    ///
    /// # Examples
    /// ```text
    /// Name              // EndPath("Name")
    /// Address/City      // EndPath("City", parent: InnerPath("Address"))
    /// ```
    EndPath(EndPathToken),

    /// Non-terminal segment of a member access path
    InnerPath(InnerPathToken),

    /// Reference to a range variable in scope (`$it`, `$this`, lambda variables)
    RangeVariable(RangeVariableToken),

    /// Parameter alias (`@p1`)
    ParameterAlias(ParameterAliasToken),

    BinaryOperator(BinaryOperatorToken),

    UnaryOperator(UnaryOperatorToken),

    /// Membership test (`Name in ('a','b')`)
    In(InToken),

    /// Parenthesized list on the right of `in`
    Collection(CollectionToken),

    /// Function call, free or bound to a path
    ///
    /// # Examples
    /// ```text
    /// contains(Name,'a')
    /// Items/NS.Discount(Rate)
    /// ```
    FunctionCall(FunctionCallToken),

    /// `any`/`all` lambda over a collection path
    ///
    /// # Examples
    /// ```text
    /// Items/any(d:d/Price gt 5)
    /// Items/any()
    /// ```
    Lambda(LambdaToken),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiteralToken {
    pub kind: TokenKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringLiteralToken {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndPathToken {
    pub identifier: String,
    pub parent: Option<Box<QueryToken>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InnerPathToken {
    pub identifier: String,
    pub parent: Option<Box<QueryToken>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeVariableToken {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterAliasToken {
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryOperatorToken {
    pub kind: BinaryOperatorKind,
    pub left: Box<QueryToken>,
    pub right: Box<QueryToken>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnaryOperatorToken {
    pub kind: UnaryOperatorKind,
    pub operand: Box<QueryToken>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InToken {
    pub left: Box<QueryToken>,
    pub right: Box<QueryToken>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionToken {
    pub items: Vec<QueryToken>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCallToken {
    pub name: String,
    pub arguments: Vec<QueryToken>,
    /// Path the function is bound to, `None` for free functions
    pub source: Option<Box<QueryToken>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LambdaKind {
    Any,
    All,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LambdaToken {
    pub kind: LambdaKind,
    pub parent: Box<QueryToken>,
    pub variable: Option<String>,
    pub expression: Option<Box<QueryToken>>,
}

impl QueryToken {
    pub fn literal(kind: TokenKind, text: impl Into<String>) -> Self {
        QueryToken::Literal(LiteralToken {
            kind,
            text: text.into(),
        })
    }

    pub fn string_literal(text: impl Into<String>) -> Self {
        QueryToken::StringLiteral(StringLiteralToken { text: text.into() })
    }

    pub fn end_path(identifier: impl Into<String>, parent: Option<QueryToken>) -> Self {
        QueryToken::EndPath(EndPathToken {
            identifier: identifier.into(),
            parent: parent.map(Box::new),
        })
    }

    pub fn range_variable(name: impl Into<String>) -> Self {
        QueryToken::RangeVariable(RangeVariableToken { name: name.into() })
    }

    pub fn binary(kind: BinaryOperatorKind, left: QueryToken, right: QueryToken) -> Self {
        QueryToken::BinaryOperator(BinaryOperatorToken {
            kind,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn unary(kind: UnaryOperatorKind, operand: QueryToken) -> Self {
        QueryToken::UnaryOperator(UnaryOperatorToken {
            kind,
            operand: Box::new(operand),
        })
    }

    /// Turn a terminal path segment into a non-terminal one.
    ///
    /// Used when a `/` shows that the segment continues; other tokens are
    /// returned unchanged.
    pub fn into_inner_path(self) -> Self {
        match self {
            QueryToken::EndPath(EndPathToken { identifier, parent }) => {
                QueryToken::InnerPath(InnerPathToken { identifier, parent })
            }
            other => other,
        }
    }
}
