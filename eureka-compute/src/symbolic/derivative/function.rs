//! Symbolic derivatives of the builtin functions.

use eureka_error::Error;
use crate::{numerical::is_builtin, symbolic::expr::SymExpr};
use super::{derivative, MultBuilder, WithRespectTo};

/// Computes the derivative of a function call and performs the chain rule.
pub(super) fn function_derivative(
    call: &SymExpr,
    func: &str,
    args: &[SymExpr],
    wrt: &WithRespectTo,
) -> Result<SymExpr, Error> {
    let [arg] = args else {
        return Err(wrt.unsupported("differentiate", call));
    };

    if !is_builtin(func) {
        // an unknown function of the variable itself, such as `x(t)`
        if arg.as_symbol() == Some(wrt.var) {
            return Ok(call.clone().derivative(wrt.var, 1));
        }
        return Err(wrt.unsupported("differentiate", call));
    }

    let outer = match func {
        "sin" => SymExpr::call("cos", vec![arg.clone()]),
        "cos" => -SymExpr::call("sin", vec![arg.clone()]),
        "tan" => SymExpr::call("cos", vec![arg.clone()]).pow(SymExpr::number(-2)),
        "exp" => call.clone(),
        "ln" => arg.clone().recip(),
        "sqrt" => SymExpr::fraction(1, 2) * arg.clone().pow(SymExpr::fraction(-1, 2)),
        _ => return Err(wrt.unsupported("differentiate", call)),
    };

    let mut mult_group = MultBuilder::default();
    mult_group.mult(outer);
    mult_group.mult(derivative(arg, wrt)?);
    Ok(mult_group.into())
}
