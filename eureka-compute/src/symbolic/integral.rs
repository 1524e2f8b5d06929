//! Symbolic antiderivatives of the forms that occur in physics derivations.

use eureka_error::Error;
use std::collections::BTreeSet;
use tracing::debug;
use super::{
    derivative::WithRespectTo,
    expr::{Primary, SymExpr},
    simplify::simplify,
};

/// Returns the symbols that the integrand treats as functions of `var`: every symbol whose
/// derivative with respect to `var` appears in the expression.
fn dependents_of(expr: &SymExpr, var: &str) -> BTreeSet<String> {
    expr.post_order_iter()
        .filter_map(|node| match node {
            SymExpr::Derivative(inner, inner_var, _) if inner_var == var => {
                inner.as_symbol().map(str::to_string)
            },
            _ => None,
        })
        .collect()
}

/// `∫ u^n du = u^(n + 1) / (n + 1)`, or `ln(u)` when `n = -1`
fn power_antiderivative(u: &SymExpr, n: &SymExpr) -> SymExpr {
    if n.as_small_integer() == Some(-1) {
        return SymExpr::call("ln", vec![u.clone()]);
    }

    let raised = simplify(&(n.clone() + SymExpr::number(1)));
    u.clone().pow(raised.clone()) / raised
}

/// If `expr` is `u^n` for some `n` that does not depend on the variable, returns `n`.
fn power_of(expr: &SymExpr, u: &SymExpr, wrt: &WithRespectTo) -> Option<SymExpr> {
    if expr == u {
        return Some(SymExpr::number(1));
    }
    if expr.is_one() {
        return Some(SymExpr::number(0));
    }
    match expr {
        SymExpr::Exp(base, n) if **base == *u && !wrt.depends_on(n) => Some((**n).clone()),
        _ => None,
    }
}

/// `∫ u^n u' dx`, where the factors contain exactly one first derivative `u'` of a dependent
/// symbol.
fn chain_antiderivative(factors: &[SymExpr], wrt: &WithRespectTo) -> Option<SymExpr> {
    let (index, u) = factors.iter().enumerate().find_map(|(i, factor)| match factor {
        SymExpr::Derivative(u, var, 1) if var == wrt.var => Some((i, u)),
        _ => None,
    })?;

    let rest = factors.iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, factor)| factor.clone())
        .collect::<Vec<_>>();
    let n = power_of(&SymExpr::Mul(rest).downgrade(), u, wrt)?;
    Some(power_antiderivative(u, &n))
}

/// Computes an (unsimplified) antiderivative of the given simplified expression.
fn antiderivative(f: &SymExpr, wrt: &WithRespectTo) -> Result<SymExpr, Error> {
    let var = || SymExpr::symbol(wrt.var);

    if !wrt.depends_on(f) {
        return Ok(f.clone() * var());
    }

    match f {
        SymExpr::Add(terms) => {
            let terms = terms.iter()
                .map(|term| antiderivative(term, wrt))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(SymExpr::Add(terms))
        },
        SymExpr::Mul(factors) => {
            let (constant, dependent): (Vec<_>, Vec<_>) = factors
                .iter()
                .cloned()
                .partition(|factor| !wrt.depends_on(factor));
            if !constant.is_empty() {
                let inner = antiderivative(&SymExpr::Mul(dependent).downgrade(), wrt)?;
                return Ok(SymExpr::Mul(constant) * inner);
            }

            chain_antiderivative(factors, wrt).ok_or_else(|| wrt.unsupported("integrate", f))
        },
        SymExpr::Primary(Primary::Symbol(symbol)) if symbol == wrt.var => {
            Ok(power_antiderivative(&var(), &SymExpr::number(1)))
        },
        SymExpr::Exp(base, n) if base.as_symbol() == Some(wrt.var) && !wrt.depends_on(n) => {
            Ok(power_antiderivative(base, n))
        },
        SymExpr::Derivative(inner, inner_var, order) if inner_var == wrt.var => {
            Ok((**inner).clone().derivative(inner_var.clone(), order - 1))
        },
        SymExpr::Primary(Primary::Call(name, args)) if args.len() == 1 && args[0].as_symbol() == Some(wrt.var) => {
            match name.as_str() {
                "sin" => Ok(-SymExpr::call("cos", vec![var()])),
                "cos" => Ok(SymExpr::call("sin", vec![var()])),
                "exp" => Ok(f.clone()),
                _ => Err(wrt.unsupported("integrate", f)),
            }
        },
        _ => Err(wrt.unsupported("integrate", f)),
    }
}

/// Computes a simplified antiderivative of the given expression with respect to `var`, without a
/// constant of integration.
///
/// Symbols whose derivative with respect to `var` appears in the integrand are treated as
/// functions of `var`, so that `∫ m v diff(v, x) dx = m v^2 / 2`.
///
/// ```
/// use eureka_compute::{integrate, parse};
///
/// let work = integrate(&parse("m v diff(v, x)").unwrap(), "x").unwrap();
/// assert_eq!(work.to_string(), "1/2 * m * v^2");
/// ```
pub fn integrate(expr: &SymExpr, var: &str) -> Result<SymExpr, Error> {
    let integrand = simplify(expr);
    let dependents = dependents_of(&integrand, var);
    let wrt = WithRespectTo { var, dependents: &dependents };

    let raw = antiderivative(&integrand, &wrt)?;
    let result = simplify(&raw);
    debug!(target: "integral", %expr, var, %result, "integrated");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::{error::UnsupportedOperation, parse};
    use super::*;

    fn integrated(source: &str, var: &str) -> String {
        integrate(&parse(source).unwrap(), var).unwrap().to_string()
    }

    #[test]
    fn polynomial() {
        assert_eq!(integrated("x^2", "x"), "1/3 * x^3");
        assert_eq!(integrated("3x^2 + 2", "x"), "x^3 + 2 * x");
    }

    #[test]
    fn reciprocal() {
        assert_eq!(integrated("1/x", "x"), "ln(x)");
    }

    #[test]
    fn constant() {
        assert_eq!(integrated("k", "x"), "k * x");
    }

    #[test]
    fn trigonometric() {
        assert_eq!(integrated("cos(x)", "x"), "sin(x)");
        assert_eq!(integrated("sin(x)", "x"), "-cos(x)");
    }

    #[test]
    fn work_energy() {
        assert_eq!(integrated("m v diff(v, x)", "x"), "1/2 * m * v^2");
    }

    #[test]
    fn lowers_derivative_order() {
        assert_eq!(integrated("diff(x, t, 2)", "t"), "diff(x, t)");
        assert_eq!(integrated("diff(x, t)", "t"), "x");
    }

    #[test]
    fn unsupported() {
        let err = integrate(&parse("tan(x)").unwrap(), "x").unwrap_err();
        assert!(err.is::<UnsupportedOperation>());
        let err = integrate(&parse("x sin(x)").unwrap(), "x").unwrap_err();
        assert!(err.is::<UnsupportedOperation>());
    }
}
