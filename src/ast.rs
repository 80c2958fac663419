//! # Query Option Tokens
//!
//! This module defines the lexical tokens and the token-level Abstract Syntax
//! Tree produced for URL query options such as `$filter`, `$orderby` and
//! `$expand`. The tree is the hand-off point to a semantic binder: it records
//! what was written, not what it means.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (literals, paths, operators, lambdas)
//! - **[operators]** - Binary and unary operator kinds
//! - **[options]** - `$orderby`, `$compute`, `$select` and `$expand` items
//! - **[apply]** - `$apply` transformations
//!
//! ## Quick Start
//!
//! ```text
//! $filter=Name eq 'Sam' and Price gt 10
//! ```
//!
//! tokenizes to
//!
//! ```text
//! And(
//!     Equal(EndPath(Name), Literal('Sam')),
//!     GreaterThan(EndPath(Price), Literal(10)),
//! )
//! ```
//!
//! ## Ownership
//!
//! Lexical [`Token`]s borrow the option string. Every AST node owns its
//! text, so a tokenized option can outlive the buffer it was read from.
//! Chains (then-by lists, select paths, group-by children) are plain vectors
//! in source order.
//!
//! ## Examples
//!
//! ### Ordering
//!
//! ```text
//! $orderby=Prop1,Prop2 asc,Prop3 desc
//! ```
//!
//! ### Nested Expand Options
//!
//! ```text
//! $expand=Orders($filter=Total gt 100;$select=Id,Total;$top=5)
//! ```
//!
//! ### Aggregation
//!
//! ```text
//! $apply=groupby((Category),aggregate(Amount with sum as Total))
//! ```
pub mod apply;
pub mod expressions;
pub mod operators;
pub mod options;
pub mod tokens;

pub use apply::{
    AggregateExpressionToken, AggregateToken, AggregationMethod, ApplyToken,
    ApplyTransformToken, GroupByToken,
};
pub use expressions::{
    BinaryOperatorToken, CollectionToken, EndPathToken, FunctionCallToken, InToken,
    InnerPathToken, LambdaKind, LambdaToken, LiteralToken, ParameterAliasToken, QueryToken,
    RangeVariableToken, StringLiteralToken, UnaryOperatorToken,
};
pub use operators::{BinaryOperatorKind, UnaryOperatorKind};
pub use options::{
    ComputeItemToken, ComputeToken, ExpandItemToken, ExpandToken, LevelsToken, OrderByDirection,
    OrderByToken, SegmentPath, SelectItemToken, SelectToken,
};
pub use tokens::{Token, TokenKind};
