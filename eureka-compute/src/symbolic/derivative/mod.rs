//! Symbolic differentiation.

mod function;

use eureka_error::Error;
use std::collections::BTreeSet;
use tracing::debug;
use crate::error::UnsupportedOperation;
use super::{expr::{Primary, SymExpr}, simplify::simplify};

/// The variable of differentiation or integration, along with the symbols that are functions of
/// it (such as `v` in `dv/dx`).
pub(crate) struct WithRespectTo<'a> {
    pub var: &'a str,
    pub dependents: &'a BTreeSet<String>,
}

impl<'a> WithRespectTo<'a> {
    /// Returns true if the expression can vary with the variable.
    pub fn depends_on(&self, expr: &SymExpr) -> bool {
        expr.post_order_iter().any(|node| match node {
            SymExpr::Primary(Primary::Symbol(symbol)) => {
                symbol == self.var || self.dependents.contains(symbol)
            },
            SymExpr::Derivative(_, var, _) | SymExpr::Integral(_, var) => var == self.var,
            _ => false,
        })
    }

    /// Builds the error returned when the expression cannot be handled.
    pub fn unsupported(&self, action: &str, expr: &SymExpr) -> Error {
        Error::new(Vec::new(), UnsupportedOperation {
            operation: format!("{} `{}` with respect to `{}`", action, expr, self.var),
        })
    }
}

/// Returns `true` if the given [`SymExpr`] is "clearly" zero. This is intended to clean up
/// intermediate results and is not mathematically rigorous.
fn is_trivially_zero(e: &SymExpr) -> bool {
    match e {
        SymExpr::Primary(_) => e.is_zero(),
        SymExpr::Add(sum) => sum.iter().all(is_trivially_zero),
        SymExpr::Mul(mul) => mul.iter().any(is_trivially_zero),
        _ => false,
    }
}

/// Helper struct to build a product of expressions while applying basic simplification rules. If
/// any of the expressions are zero, the product is reduced to zero.
#[derive(Default)]
pub(crate) struct MultBuilder(Vec<SymExpr>);

impl From<MultBuilder> for SymExpr {
    fn from(value: MultBuilder) -> Self {
        SymExpr::Mul(value.0).downgrade()
    }
}

impl MultBuilder {
    pub fn mult(&mut self, e: SymExpr) {
        if is_trivially_zero(&e) || self.0.first().is_some_and(is_trivially_zero) {
            self.0 = vec![SymExpr::number(0)];
            return;
        }

        if !e.is_one() {
            self.0.push(e)
        }
    }
}

/// Helper struct to build a summation of expressions. Only non-zero expressions are added to the
/// sum.
#[derive(Default)]
pub(crate) struct SumBuilder(Vec<SymExpr>);

impl From<SumBuilder> for SymExpr {
    fn from(value: SumBuilder) -> Self {
        SymExpr::Add(value.0).downgrade()
    }
}

impl SumBuilder {
    pub fn add(&mut self, e: SymExpr) {
        if !is_trivially_zero(&e) {
            self.0.push(e)
        }
    }
}

/// `(f + g)' = f' + g'`
fn sum_rule(terms: &[SymExpr], wrt: &WithRespectTo) -> Result<SymExpr, Error> {
    let mut sum = SumBuilder::default();
    for term in terms {
        sum.add(derivative(term, wrt)?);
    }
    Ok(sum.into())
}

/// `(f * g * h)' = f' * g * h + f * g' * h + f * g * h'`
fn product_rule(product: &[SymExpr], wrt: &WithRespectTo) -> Result<SymExpr, Error> {
    let mut outer_sum = SumBuilder::default();

    for derivative_index in 0..product.len() {
        // constant factors contribute a zero term
        if !wrt.depends_on(&product[derivative_index]) {
            continue;
        }

        let mut inner_mult = MultBuilder::default();
        for (term_index, term) in product.iter().enumerate() {
            if derivative_index == term_index {
                inner_mult.mult(derivative(term, wrt)?);
            } else {
                inner_mult.mult(term.clone());
            }
        }

        outer_sum.add(inner_mult.into());
    }

    Ok(outer_sum.into())
}

/// `(f^g)' = f^g * (g' ln(f) + g f' / f)`, with the usual special cases when either side is
/// constant.
fn power_rule(base: &SymExpr, exp: &SymExpr, wrt: &WithRespectTo) -> Result<SymExpr, Error> {
    let mut mult_group = MultBuilder::default();
    let ln_base = || SymExpr::call("ln", vec![base.clone()]);

    match (wrt.depends_on(base), wrt.depends_on(exp)) {
        // `(f^n)' = n f^(n - 1) f'`
        (_, false) => {
            mult_group.mult(exp.clone());
            mult_group.mult(base.clone().pow(exp.clone() - SymExpr::number(1)));
            mult_group.mult(derivative(base, wrt)?);
        },
        // `(a^g)' = a^g ln(a) g'`
        (false, true) => {
            mult_group.mult(base.clone().pow(exp.clone()));
            mult_group.mult(ln_base());
            mult_group.mult(derivative(exp, wrt)?);
        },
        (true, true) => {
            let mut sum = SumBuilder::default();
            sum.add(derivative(exp, wrt)? * ln_base());
            sum.add(exp.clone() * derivative(base, wrt)? * base.clone().recip());

            mult_group.mult(base.clone().pow(exp.clone()));
            mult_group.mult(sum.into());
        },
    }

    Ok(mult_group.into())
}

/// Computes the (unsimplified) derivative of the given expression.
pub(crate) fn derivative(f: &SymExpr, wrt: &WithRespectTo) -> Result<SymExpr, Error> {
    if !wrt.depends_on(f) {
        return Ok(SymExpr::number(0));
    }

    match f {
        SymExpr::Primary(Primary::Symbol(symbol)) => {
            if symbol == wrt.var {
                Ok(SymExpr::number(1))
            } else {
                Ok(f.clone().derivative(wrt.var, 1))
            }
        },
        SymExpr::Primary(Primary::Call(name, args)) => function::function_derivative(f, name, args, wrt),
        SymExpr::Primary(_) => Ok(SymExpr::number(0)),
        SymExpr::Add(terms) => sum_rule(terms, wrt),
        SymExpr::Mul(factors) => product_rule(factors, wrt),
        SymExpr::Exp(base, exp) => power_rule(base, exp, wrt),
        SymExpr::Derivative(inner, var, order) if var == wrt.var => {
            Ok((**inner).clone().derivative(var.clone(), order + 1))
        },
        // fundamental theorem of calculus
        SymExpr::Integral(inner, var) if var == wrt.var => Ok((**inner).clone()),
        _ => Err(wrt.unsupported("differentiate", f)),
    }
}

/// Computes the simplified derivative of the given expression with respect to `var`. Every other
/// symbol is treated as a constant.
pub fn differentiate(expr: &SymExpr, var: &str) -> Result<SymExpr, Error> {
    differentiate_with(expr, var, &BTreeSet::new())
}

/// Computes the simplified derivative of the given expression with respect to `var`, treating the
/// symbols in `dependents` as functions of `var`.
///
/// The derivative of a dependent symbol `v` is kept as `diff(v, var)`. Calls to unknown functions
/// of `var` itself, such as `f(t)`, are kept the same way; calls to unknown functions of any other
/// expression cannot be differentiated.
///
/// ```
/// use eureka_compute::{parse, symbolic::differentiate_with};
/// use std::collections::BTreeSet;
///
/// let kinetic = parse("m v^2 / 2").unwrap();
/// let dependents = BTreeSet::from(["v".to_string()]);
/// let power = differentiate_with(&kinetic, "x", &dependents).unwrap();
/// assert_eq!(power.to_string(), "m * v * diff(v, x)");
/// ```
pub fn differentiate_with(
    expr: &SymExpr,
    var: &str,
    dependents: &BTreeSet<String>,
) -> Result<SymExpr, Error> {
    let wrt = WithRespectTo { var, dependents };
    let raw = derivative(expr, &wrt)?;
    let result = simplify(&raw);
    debug!(target: "derivative", %expr, var, %result, "differentiated");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::{
        error::UnsupportedOperation,
        numerical::{evaluate, Ctxt},
        parse,
        primitive::float,
    };
    use super::*;

    /// Boilerplate helper function for evaluating an expression and substituting in "x"
    fn eval_x(e: &SymExpr, x: f64) -> f64 {
        let mut context = Ctxt::new();
        context.add_var("x", float(x));
        evaluate(e, &context).unwrap().to_f64()
    }

    // Performs finite difference to approximate the derivative of the provided expression
    fn finite_difference(e: &SymExpr, x: f64) -> f64 {
        const DX: f64 = 0.00001;
        (eval_x(e, x + DX) - eval_x(e, x)) / DX
    }

    fn test_for_function(function: &'static str, points: impl IntoIterator<Item = f64>) {
        const TOL: f64 = 0.001;

        let expr = parse(function).unwrap();
        let symbolic = differentiate(&expr, "x")
            .unwrap_or_else(|_| panic!("Derivative for \"{function}\" was unable to be computed symbolically"));

        for point in points.into_iter() {
            let symbolically_computed = eval_x(&symbolic, point);
            let numerically_computed = finite_difference(&expr, point);

            assert!(
                (symbolically_computed - numerically_computed).abs() < TOL,
                "For \"{function}\" at x={point}, symbolically computed derivative was {symbolically_computed} but numerically computed derivative was {numerically_computed}, which was out of tolerance {TOL}",
            );
        }
    }

    #[test]
    fn power_rule() {
        test_for_function("x^2 + x + 1", [0., 1., 2., 5., 8.]);
    }

    #[test]
    fn trigonometric() {
        test_for_function("sin(x) cos(x)", [0., 0.5, 1., 2.]);
        test_for_function("tan(x)", [0., 0.5, 1.]);
    }

    #[test]
    fn exponential_and_logarithm() {
        test_for_function("exp(2x)", [0., 0.5, 1.]);
        test_for_function("ln(x^2 + 1)", [0., 1., 3.]);
    }

    #[test]
    fn roots_and_variable_exponents() {
        test_for_function("sqrt(x)", [0.5, 1., 4.]);
        test_for_function("x^x", [0.5, 1., 2.]);
        test_for_function("2^x", [0., 1., 3.]);
    }

    #[test]
    fn quotient() {
        test_for_function("1 / (1 + x^2)", [0., 1., 2.]);
    }

    #[test]
    fn oscillator() {
        let position = parse("A cos(w t)").unwrap();
        let velocity = differentiate(&position, "t").unwrap();
        assert_eq!(velocity.to_string(), "-A * w * sin(t * w)");
        let acceleration = differentiate(&velocity, "t").unwrap();
        assert_eq!(acceleration.to_string(), "-A * cos(t * w) * w^2");
    }

    #[test]
    fn dependent_symbols() {
        let dependents = BTreeSet::from(["x".to_string()]);
        let expr = parse("diff(x, t)").unwrap();
        let result = differentiate_with(&expr, "t", &dependents).unwrap();
        assert_eq!(result.to_string(), "diff(x, t, 2)");
    }

    #[test]
    fn unknown_function_of_variable() {
        let result = differentiate(&parse("f(t)").unwrap(), "t").unwrap();
        assert_eq!(result.to_string(), "diff(f(t), t)");
    }

    #[test]
    fn unsupported() {
        let err = differentiate(&parse("f(t^2)").unwrap(), "t").unwrap_err();
        assert!(err.is::<UnsupportedOperation>());
        let err = differentiate(&parse("abs(t)").unwrap(), "t").unwrap_err();
        assert!(err.is::<UnsupportedOperation>());
    }

    #[test]
    fn constant() {
        assert_eq!(differentiate(&parse("m g").unwrap(), "t").unwrap(), SymExpr::number(0));
    }
}
