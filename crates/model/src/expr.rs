//! Symbolic carrier for the GitHub `${{ … }}` expression mini-language.
//!
//! Expressions are a small algebraic term type closed under composition.
//! Nothing outside [`Expr::render`] builds or inspects the bracketed text;
//! string inspection anywhere else is a design bug.

use std::fmt;

/// Comparison operators available in the runner's expression language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CompareOp {
    const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// A GitHub Actions expression term.
///
/// A [`Expr::Lit`] renders as its raw text with no brackets; every other
/// variant renders wrapped in `${{ … }}`. Values built by the importer from
/// existing YAML are kept as literals so that re-emission is byte-exact.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A raw literal value, rendered verbatim.
    Lit(String),
    /// A context access chain, e.g. `github.sha`.
    Context(Vec<String>),
    /// Unary negation: `!term`.
    Not(Box<Expr>),
    /// Logical conjunction: `lhs && rhs`.
    And(Box<Expr>, Box<Expr>),
    /// Logical disjunction: `lhs || rhs`.
    Or(Box<Expr>, Box<Expr>),
    /// A binary comparison.
    Compare {
        /// Comparison operator.
        op: CompareOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// A function call, e.g. `contains(github.ref, 'release')`.
    Call {
        /// Function name.
        name: String,
        /// Call arguments in order.
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Create a raw literal expression.
    pub fn lit(value: impl Into<String>) -> Self {
        Self::Lit(value.into())
    }

    /// Create a context access from a dotted path like `"github.sha"`.
    pub fn context(path: impl AsRef<str>) -> Self {
        Self::Context(path.as_ref().split('.').map(str::to_string).collect())
    }

    /// Create a function call expression.
    pub fn call(name: impl Into<String>, args: impl IntoIterator<Item = Expr>) -> Self {
        Self::Call {
            name: name.into(),
            args: args.into_iter().collect(),
        }
    }

    /// Negate this expression.
    #[must_use]
    pub fn not(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Conjoin with another expression.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    /// Disjoin with another expression.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    /// Compare for equality.
    #[must_use]
    pub fn eq(self, other: Self) -> Self {
        self.compare(CompareOp::Eq, other)
    }

    /// Compare for inequality.
    #[must_use]
    pub fn ne(self, other: Self) -> Self {
        self.compare(CompareOp::Ne, other)
    }

    /// Compare with an explicit operator.
    #[must_use]
    pub fn compare(self, op: CompareOp, other: Self) -> Self {
        Self::Compare {
            op,
            lhs: Box::new(self),
            rhs: Box::new(other),
        }
    }

    /// Whether this is a raw literal (rendered without brackets).
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Lit(_))
    }

    /// Render the exact text this expression contributes to YAML output.
    ///
    /// Literals render verbatim; composite terms render wrapped in
    /// `${{ … }}`.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Lit(text) => text.clone(),
            other => format!("${{{{ {} }}}}", other.render_term(false)),
        }
    }

    /// Render this term for use inside an enclosing expression.
    ///
    /// `grouped` forces parentheses around `&&`/`||` so operator nesting
    /// survives re-rendering.
    fn render_term(&self, grouped: bool) -> String {
        match self {
            // A literal inside an expression is an operand: numbers and
            // booleans stay bare, everything else is single-quoted.
            Self::Lit(text) => {
                if text.parse::<f64>().is_ok() || text == "true" || text == "false" {
                    text.clone()
                } else {
                    format!("'{}'", text.replace('\'', "''"))
                }
            }
            Self::Context(segments) => segments.join("."),
            Self::Not(inner) => format!("!{}", inner.render_term(true)),
            Self::And(lhs, rhs) => {
                let body = format!("{} && {}", lhs.render_term(true), rhs.render_term(true));
                if grouped { format!("({body})") } else { body }
            }
            Self::Or(lhs, rhs) => {
                let body = format!("{} || {}", lhs.render_term(true), rhs.render_term(true));
                if grouped { format!("({body})") } else { body }
            }
            Self::Compare { op, lhs, rhs } => {
                let body = format!(
                    "{} {} {}",
                    lhs.render_term(true),
                    op.symbol(),
                    rhs.render_term(true)
                );
                if grouped { format!("({body})") } else { body }
            }
            Self::Call { name, args } => {
                let rendered: Vec<String> = args.iter().map(|a| a.render_term(false)).collect();
                format!("{}({})", name, rendered.join(", "))
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Self::Lit(value.to_string())
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Self::Lit(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_renders_verbatim() {
        assert_eq!(Expr::lit("ubuntu-latest").render(), "ubuntu-latest");
        assert_eq!(Expr::lit("${{ github.sha }}").render(), "${{ github.sha }}");
    }

    #[test]
    fn test_context_render() {
        assert_eq!(Expr::context("github.sha").render(), "${{ github.sha }}");
    }

    #[test]
    fn test_composite_render() {
        let expr = Expr::context("github.event_name")
            .eq(Expr::lit("push"))
            .and(Expr::context("github.ref").eq(Expr::lit("refs/heads/main")));
        assert_eq!(
            expr.render(),
            "${{ (github.event_name == 'push') && (github.ref == 'refs/heads/main') }}"
        );
    }

    #[test]
    fn test_call_render() {
        let expr = Expr::call(
            "contains",
            [Expr::context("github.ref"), Expr::lit("release")],
        );
        assert_eq!(expr.render(), "${{ contains(github.ref, 'release') }}");
    }

    #[test]
    fn test_not_render() {
        assert_eq!(
            Expr::call("cancelled", []).not().render(),
            "${{ !cancelled() }}"
        );
    }

    #[test]
    fn test_numeric_operand_stays_bare() {
        let expr = Expr::context("matrix.go").eq(Expr::lit("1.22"));
        // "1.22" parses as a number, so it renders unquoted.
        assert_eq!(expr.render(), "${{ matrix.go == 1.22 }}");
    }
}
