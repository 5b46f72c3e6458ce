//! Expression tree

use std::fmt;

use serde_json::Value;
use swatch_core::CacheCost;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    NotIn,
    Contains,
    StartsWith,
    EndsWith,
}

impl CompareOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::In => "in",
            CompareOp::NotIn => "not in",
            CompareOp::Contains => "contains",
            CompareOp::StartsWith => "startsWith",
            CompareOp::EndsWith => "endsWith",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed condition expression
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// String, number, boolean or null
    Literal(Value),
    /// Dotted lookup into the evaluation data (`user.role`)
    Path(Vec<String>),
    /// `[a, b, c]`
    List(Vec<Expr>),
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Compare {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    /// Logical nesting depth; a single comparison or operand has depth 1
    pub fn depth(&self) -> usize {
        match self {
            Expr::Not(inner) => 1 + inner.depth(),
            Expr::And(items) | Expr::Or(items) => {
                1 + items.iter().map(Expr::depth).max().unwrap_or(0)
            }
            Expr::Compare { left, right, .. } => left.depth().max(right.depth()),
            Expr::List(items) => items.iter().map(Expr::depth).max().unwrap_or(1),
            Expr::Literal(_) | Expr::Path(_) => 1,
        }
    }

    /// Number of leaf conditions (comparisons and bare operands)
    pub fn condition_count(&self) -> usize {
        match self {
            Expr::Not(inner) => inner.condition_count(),
            Expr::And(items) | Expr::Or(items) => items.iter().map(Expr::condition_count).sum(),
            _ => 1,
        }
    }
}

/// Compiled expressions are cached with a fixed cost each
impl CacheCost for Expr {
    fn cache_cost(&self) -> usize {
        1
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, items: &[Expr], sep: &str) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(sep)?;
                }
                write!(f, "{item}")?;
            }
            Ok(())
        }

        match self {
            Expr::Literal(value) => write!(f, "{value}"),
            Expr::Path(segments) => f.write_str(&segments.join(".")),
            Expr::List(items) => {
                f.write_str("[")?;
                join(f, items, ", ")?;
                f.write_str("]")
            }
            Expr::Not(inner) => write!(f, "!({inner})"),
            Expr::And(items) => {
                f.write_str("(")?;
                join(f, items, " && ")?;
                f.write_str(")")
            }
            Expr::Or(items) => {
                f.write_str("(")?;
                join(f, items, " || ")?;
                f.write_str(")")
            }
            Expr::Compare { op, left, right } => write!(f, "{left} {op} {right}"),
        }
    }
}
