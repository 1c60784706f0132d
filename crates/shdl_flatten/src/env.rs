//! The generator substitution environment: a stack of `variable -> integer`
//! bindings, plus evaluation of `{expr}` templates against it.
//!
//! Generator bodies are expanded by deep-copying, per the design decision
//! recorded for the open question on substitution strategy: simplicity over
//! the linear-memory environment-threading alternative.

use shdl_common::Ident;
use shdl_diagnostics::DiagnosticSink;
use shdl_source::Span;

use crate::errors;
use shdl_ast::{ArithExpr, BinaryOp};

/// A stack of generator-variable bindings, innermost last.
#[derive(Clone, Debug, Default)]
pub struct Env(Vec<(Ident, i64)>);

impl Env {
    /// An empty environment (outside any generator).
    pub fn new() -> Self {
        Env(Vec::new())
    }

    /// Returns a new environment with `var` bound to `value`, shadowing any
    /// existing binding of the same variable.
    pub fn bind(&self, var: Ident, value: i64) -> Self {
        let mut next = self.0.clone();
        next.push((var, value));
        Env(next)
    }

    /// Looks up the innermost binding of `var`.
    pub fn lookup(&self, var: Ident) -> Option<i64> {
        self.0.iter().rev().find(|(v, _)| *v == var).map(|(_, n)| *n)
    }

    /// `true` if `var` is already bound somewhere in this environment.
    pub fn is_bound(&self, var: Ident) -> bool {
        self.0.iter().any(|(v, _)| *v == var)
    }
}

/// Evaluates an arithmetic expression against an environment.
///
/// Returns `None` (after emitting a diagnostic) on an unbound variable or
/// division by zero; an unbound variable should never occur for
/// well-formed input since every `Var` in a generator body names that
/// generator's own loop variable or an enclosing one.
pub fn eval_arith(expr: &ArithExpr, env: &Env, sink: &DiagnosticSink) -> Option<i64> {
    match expr {
        ArithExpr::Number(n) => Some(*n),
        ArithExpr::Var(var) => env.lookup(*var),
        ArithExpr::Binary { op, lhs, rhs, span } => {
            let l = eval_arith(lhs, env, sink)?;
            let r = eval_arith(rhs, env, sink)?;
            match op {
                BinaryOp::Add => Some(l + r),
                BinaryOp::Sub => Some(l - r),
                BinaryOp::Mul => Some(l * r),
                BinaryOp::Div => {
                    if r == 0 {
                        sink.emit(errors::error_division_by_zero(*span));
                        None
                    } else {
                        Some(l / r)
                    }
                }
            }
        }
    }
}

/// Evaluates a two-sided closed range (`[N]` or `[a:b]`) to `(low, high)`.
pub fn eval_range(range: &shdl_ast::RangeSpec, env: &Env, sink: &DiagnosticSink) -> Option<(i64, i64)> {
    match range {
        shdl_ast::RangeSpec::Simple(n) => {
            let high = eval_arith(n, env, sink)?;
            Some((1, high))
        }
        shdl_ast::RangeSpec::StartEnd(a, b) => {
            let lo = eval_arith(a, env, sink)?;
            let hi = eval_arith(b, env, sink)?;
            Some((lo, hi))
        }
    }
}

/// Substitutes every `{expr}` template hole in a [`TemplatedName`] against
/// `env`, returning the resulting literal string.
pub fn substitute_name(
    name: &shdl_ast::TemplatedName,
    env: &Env,
    sink: &DiagnosticSink,
) -> Option<String> {
    let mut out = String::new();
    for segment in &name.0 {
        match segment {
            shdl_ast::NameSegment::Literal(text) => out.push_str(text),
            shdl_ast::NameSegment::Template(expr) => {
                out.push_str(&eval_arith(expr, env, sink)?.to_string());
            }
        }
    }
    Some(out)
}

/// Substitutes an [`IndexSpec`] against `env`, reducing every `ArithExpr`
/// it contains to a concrete `ArithExpr::Number`. `span` is used only if a
/// placeholder is needed for a freshly-built `Number` node.
pub fn substitute_index(
    index: &shdl_ast::IndexSpec,
    env: &Env,
    sink: &DiagnosticSink,
) -> Option<shdl_ast::IndexSpec> {
    use shdl_ast::IndexSpec;
    Some(match index {
        IndexSpec::None => IndexSpec::None,
        IndexSpec::Single(e) => IndexSpec::Single(ArithExpr::Number(eval_arith(e, env, sink)?)),
        IndexSpec::Slice { low, high } => IndexSpec::Slice {
            low: match low {
                Some(e) => Some(ArithExpr::Number(eval_arith(e, env, sink)?)),
                None => None,
            },
            high: match high {
                Some(e) => Some(ArithExpr::Number(eval_arith(e, env, sink)?)),
                None => None,
            },
        },
    })
}

/// Evaluates an already-substituted [`IndexSpec`] (only `Number` literals
/// remain) against a port's width, returning the inclusive `(low, high)`
/// bit range it denotes.
pub fn index_to_range(index: &shdl_ast::IndexSpec, width: u32, span: Span) -> (i64, i64) {
    use shdl_ast::IndexSpec;
    match index {
        IndexSpec::None => (1, width as i64),
        IndexSpec::Single(ArithExpr::Number(n)) => (*n, *n),
        IndexSpec::Slice { low, high } => {
            let lo = match low {
                Some(ArithExpr::Number(n)) => *n,
                _ => 1,
            };
            let hi = match high {
                Some(ArithExpr::Number(n)) => *n,
                _ => width as i64,
            };
            (lo, hi)
        }
        IndexSpec::Single(_) => {
            debug_assert!(false, "index_to_range called before substitution at {span:?}");
            (1, width as i64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shdl_diagnostics::DiagnosticSink;

    #[test]
    fn eval_number() {
        let sink = DiagnosticSink::new();
        let env = Env::new();
        assert_eq!(eval_arith(&ArithExpr::Number(42), &env, &sink), Some(42));
    }

    #[test]
    fn eval_var_binding() {
        let sink = DiagnosticSink::new();
        let var = Ident::from_raw(0);
        let env = Env::new().bind(var, 7);
        assert_eq!(eval_arith(&ArithExpr::Var(var), &env, &sink), Some(7));
    }

    #[test]
    fn eval_truncating_division() {
        let sink = DiagnosticSink::new();
        let env = Env::new();
        let expr = ArithExpr::binary(
            BinaryOp::Div,
            ArithExpr::Number(7),
            ArithExpr::Number(2),
            Span::DUMMY,
        );
        assert_eq!(eval_arith(&expr, &env, &sink), Some(3));
    }

    #[test]
    fn eval_division_by_zero_reports_error() {
        let sink = DiagnosticSink::new();
        let env = Env::new();
        let expr = ArithExpr::binary(
            BinaryOp::Div,
            ArithExpr::Number(7),
            ArithExpr::Number(0),
            Span::DUMMY,
        );
        assert_eq!(eval_arith(&expr, &env, &sink), None);
        assert!(sink.has_errors());
    }

    #[test]
    fn substitute_templated_name() {
        let sink = DiagnosticSink::new();
        let var = Ident::from_raw(1);
        let env = Env::new().bind(var, 3);
        let name = shdl_ast::TemplatedName(vec![
            shdl_ast::NameSegment::Literal("not".to_string()),
            shdl_ast::NameSegment::Template(ArithExpr::Var(var)),
        ]);
        assert_eq!(substitute_name(&name, &env, &sink), Some("not3".to_string()));
    }

    #[test]
    fn shadowing_detected() {
        let var = Ident::from_raw(2);
        let env = Env::new().bind(var, 1);
        assert!(env.is_bound(var));
    }
}
