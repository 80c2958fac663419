use serde::Serialize;

/// Binary operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BinaryOperatorKind {
    // Logical
    /// Logical OR (`or`)
    Or,
    /// Logical AND (`and`)
    And,

    // Comparison
    /// Equal (`eq`)
    Equal,
    /// Not equal (`ne`)
    NotEqual,
    /// Greater than (`gt`)
    GreaterThan,
    /// Greater than or equal (`ge`)
    GreaterThanOrEqual,
    /// Less than (`lt`)
    LessThan,
    /// Less than or equal (`le`)
    LessThanOrEqual,

    // Arithmetic
    /// Addition (`add`)
    Add,
    /// Subtraction (`sub`)
    Subtract,
    /// Multiplication (`mul`)
    Multiply,
    /// Division (`div`, `divby`)
    Divide,
    /// Modulo (`mod`)
    Modulo,

    /// Enum flag test (`has`)
    Has,

    /// Operator keyword registered through the tokenizer settings
    Customized(String),
}

impl BinaryOperatorKind {
    /// Operator spelled by a comparison-level keyword
    pub fn comparison(keyword: &str, case_insensitive: bool) -> Option<Self> {
        lookup(
            &[
                ("eq", Self::Equal),
                ("ne", Self::NotEqual),
                ("gt", Self::GreaterThan),
                ("ge", Self::GreaterThanOrEqual),
                ("lt", Self::LessThan),
                ("le", Self::LessThanOrEqual),
                ("has", Self::Has),
            ],
            keyword,
            case_insensitive,
        )
    }

    /// Operator spelled by an additive keyword
    pub fn additive(keyword: &str, case_insensitive: bool) -> Option<Self> {
        lookup(
            &[("add", Self::Add), ("sub", Self::Subtract)],
            keyword,
            case_insensitive,
        )
    }

    /// Operator spelled by a multiplicative keyword
    pub fn multiplicative(keyword: &str, case_insensitive: bool) -> Option<Self> {
        lookup(
            &[
                ("mul", Self::Multiply),
                ("div", Self::Divide),
                ("divby", Self::Divide),
                ("mod", Self::Modulo),
            ],
            keyword,
            case_insensitive,
        )
    }
}

fn lookup(
    table: &[(&str, BinaryOperatorKind)],
    keyword: &str,
    case_insensitive: bool,
) -> Option<BinaryOperatorKind> {
    table
        .iter()
        .find(|(spelling, _)| {
            *spelling == keyword || (case_insensitive && spelling.eq_ignore_ascii_case(keyword))
        })
        .map(|(_, kind)| kind.clone())
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOperatorKind {
    /// Arithmetic negation (`-`)
    Negate,
    /// Logical negation (`not`)
    Not,
}
