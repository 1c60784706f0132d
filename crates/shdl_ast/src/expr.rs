//! Generator substitution expressions, templated names, and index/slice specs.

use serde::{Deserialize, Serialize};
use shdl_common::Ident;
use shdl_source::Span;

/// An arithmetic operator available inside a generator `{expr}` template.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/` (truncating integer division)
    Div,
}

/// An arithmetic expression evaluated against a generator's substitution
/// environment: integer literals, loop variables, and the four operators.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ArithExpr {
    /// A literal integer.
    Number(i64),
    /// A reference to a generator loop variable.
    Var(Ident),
    /// A binary operation over two sub-expressions.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<ArithExpr>,
        /// Right operand.
        rhs: Box<ArithExpr>,
        /// Source location, for diagnostics (e.g. division by zero).
        span: Span,
    },
}

impl ArithExpr {
    /// Shorthand for constructing a binary expression.
    pub fn binary(op: BinaryOp, lhs: ArithExpr, rhs: ArithExpr, span: Span) -> Self {
        ArithExpr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            span,
        }
    }
}

/// One segment of a templated name: either a literal piece of text or an
/// `{expr}` template hole to be substituted during generator expansion.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum NameSegment {
    /// Literal text, copied verbatim.
    Literal(String),
    /// A `{expr}` template hole; substituted with the expression's decimal value.
    Template(ArithExpr),
}

/// A name that may contain `{expr}` generator template holes.
///
/// Instance names, signal owner names, and signal names are all
/// `TemplatedName`s in the Expanded form. After generator expansion every
/// `TemplatedName` in the tree is reduced to a single `Literal` segment.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct TemplatedName(pub Vec<NameSegment>);

impl TemplatedName {
    /// Creates a templated name consisting of a single literal segment.
    pub fn literal(s: impl Into<String>) -> Self {
        TemplatedName(vec![NameSegment::Literal(s.into())])
    }

    /// Returns the literal string if this name contains no template holes.
    pub fn as_literal(&self) -> Option<&str> {
        match self.0.as_slice() {
            [NameSegment::Literal(s)] => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns `true` if every segment is a literal (no `{expr}` holes remain).
    pub fn is_fully_literal(&self) -> bool {
        self.0.iter().all(|seg| matches!(seg, NameSegment::Literal(_)))
    }
}

/// An index or slice specifier attached to a signal reference.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum IndexSpec {
    /// No index: a bare scalar or full-width vector reference.
    None,
    /// A single bit index, e.g. `[3]` or `[{i}]`.
    Single(ArithExpr),
    /// A slice `[a:b]`. Either bound may be omitted (`[:b]`, `[a:]`), binding
    /// to the referenced port's natural bounds.
    Slice {
        /// Lower bound, inclusive, 1-based. `None` means "from bit 1".
        low: Option<ArithExpr>,
        /// Upper bound, inclusive, 1-based. `None` means "to the port width".
        high: Option<ArithExpr>,
    },
}

/// A closed integer range specification for a generator, `[N]` or `[a:b]`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum RangeSpec {
    /// `[N]`, expanding to the closed interval `1..=N`.
    Simple(ArithExpr),
    /// `[a:b]`, expanding to the closed interval `a..=b`.
    StartEnd(ArithExpr, ArithExpr),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_name_roundtrip() {
        let n = TemplatedName::literal("not1");
        assert_eq!(n.as_literal(), Some("not1"));
        assert!(n.is_fully_literal());
    }

    #[test]
    fn templated_name_not_literal() {
        let n = TemplatedName(vec![
            NameSegment::Literal("not".to_string()),
            NameSegment::Template(ArithExpr::Var(Ident::from_raw(0))),
        ]);
        assert_eq!(n.as_literal(), None);
        assert!(!n.is_fully_literal());
    }
}
