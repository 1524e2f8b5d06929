use eureka_error::Error;
use rug::{ops::Pow, Float};
use crate::{
    error::{InvalidCallArity, UnboundSymbol, UnknownFunction, UnsupportedOperation},
    primitive::float,
    symbolic::expr::{Primary, SymExpr},
};
use super::{ctxt::Ctxt, func::{eval_builtin, is_builtin}};

/// Evaluates the expression to a number, using the values bound in the context.
///
/// Measured values evaluate to their central value. Operations outside the real numbers, such as
/// `ln(-1)`, evaluate to `NaN` rather than failing. Derivatives and integrals cannot be evaluated
/// numerically.
pub fn evaluate(expr: &SymExpr, ctxt: &Ctxt) -> Result<Float, Error> {
    match expr {
        SymExpr::Primary(Primary::Number(n)) => Ok(float(n)),
        SymExpr::Primary(Primary::Float(n)) => Ok(n.clone()),
        SymExpr::Primary(Primary::Measured { value, .. }) => Ok(value.clone()),
        SymExpr::Primary(Primary::Symbol(name)) => ctxt.get_var(name)
            .ok_or_else(|| Error::new(Vec::new(), UnboundSymbol { name: name.clone() })),
        SymExpr::Primary(Primary::Call(name, args)) => {
            if !is_builtin(name) {
                return Err(Error::new(Vec::new(), UnknownFunction {
                    name: name.clone(),
                    suggestions: ctxt.get_similar_funcs(name),
                }));
            }

            let [arg] = args.as_slice() else {
                return Err(Error::new(Vec::new(), InvalidCallArity {
                    name: name.clone(),
                    expected: "1",
                    given: args.len(),
                }));
            };

            let value = evaluate(arg, ctxt)?;
            eval_builtin(name, value).ok_or_else(|| Error::new(Vec::new(), UnknownFunction {
                name: name.clone(),
                suggestions: Vec::new(),
            }))
        },
        SymExpr::Add(terms) => terms
            .iter()
            .try_fold(float(0), |acc, term| Ok(acc + evaluate(term, ctxt)?)),
        SymExpr::Mul(factors) => factors
            .iter()
            .try_fold(float(1), |acc, factor| Ok(acc * evaluate(factor, ctxt)?)),
        SymExpr::Exp(lhs, rhs) => {
            let base = evaluate(lhs, ctxt)?;
            let exp = evaluate(rhs, ctxt)?;
            Ok(base.pow(&exp))
        },
        SymExpr::Derivative(_, _, _) | SymExpr::Integral(_, _) => {
            Err(Error::new(Vec::new(), UnsupportedOperation {
                operation: format!("evaluate `{}` numerically", expr),
            }))
        },
    }
}
