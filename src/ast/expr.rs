use std::fmt;

/// An expression, kept opaque apart from the two forms constant propagation cares
/// about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// A literal constant, stored in its source spelling.
    Literal(String),
    /// A read of a variable.
    Name(String),
    /// Any other expression, stored as source text.
    Opaque(String),
}

impl Expr {
    /// A literal with the given source spelling.
    pub fn literal(text: impl Into<String>) -> Self {
        Expr::Literal(text.into())
    }

    /// A variable read.
    pub fn name(name: impl Into<String>) -> Self {
        Expr::Name(name.into())
    }

    /// An uninterpreted expression.
    pub fn opaque(text: impl Into<String>) -> Self {
        Expr::Opaque(text.into())
    }

    /// Returns the variable name if this is a plain variable read.
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Expr::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Returns `true` for literals.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self, Expr::Literal(_))
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::Literal(value.to_string())
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Expr::Literal(value.to_string())
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Expr::Literal(value.to_string())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(text) | Expr::Name(text) | Expr::Opaque(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expr_forms() {
        assert!(Expr::from(3).is_literal());
        assert_eq!(Expr::from(true).to_string(), "true");
        assert_eq!(Expr::name("x").as_name(), Some("x"));
        assert_eq!(Expr::opaque("a + b").as_name(), None);
        assert_eq!(Expr::opaque("a + b").to_string(), "a + b");
    }
}
