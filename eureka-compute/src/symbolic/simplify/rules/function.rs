//! Simplification rules for the builtin functions.

use crate::{
    numerical::func::eval_builtin,
    symbolic::{
        expr::{Primary, SymExpr},
        simplify::{num::is_negative, step::Step},
        step_collector::StepCollector,
    },
};
use super::do_call;

/// `sin(-x)` = `-sin(x)`, `tan(-x)` = `-tan(x)`, `cos(-x)` = `cos(x)`
pub fn parity(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let odd = |name: &'static str| {
        move |arg: &SymExpr| {
            if is_negative(arg) {
                Some(-SymExpr::call(name, vec![-arg.clone()]))
            } else {
                None
            }
        }
    };
    let even = |arg: &SymExpr| {
        if is_negative(arg) {
            Some(SymExpr::call("cos", vec![-arg.clone()]))
        } else {
            None
        }
    };

    let opt = do_call(expr, "sin", odd("sin"))
        .or_else(|| do_call(expr, "tan", odd("tan")))
        .or_else(|| do_call(expr, "cos", even))?;

    step_collector.push(Step::FunctionParity);
    Some(opt)
}

/// `sin(0)` = `0`, `cos(0)` = `1`, `tan(0)` = `0`, `exp(0)` = `1`, `ln(1)` = `0`
pub fn constant(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let at_zero = |value: i32| {
        move |arg: &SymExpr| {
            if arg.is_zero() {
                Some(SymExpr::number(value))
            } else {
                None
            }
        }
    };

    let opt = do_call(expr, "sin", at_zero(0))
        .or_else(|| do_call(expr, "cos", at_zero(1)))
        .or_else(|| do_call(expr, "tan", at_zero(0)))
        .or_else(|| do_call(expr, "exp", at_zero(1)))
        .or_else(|| do_call(expr, "abs", at_zero(0)))
        .or_else(|| do_call(expr, "ln", |arg| {
            if arg.is_one() {
                Some(SymExpr::number(0))
            } else {
                None
            }
        }))?;

    step_collector.push(Step::FunctionConstant);
    Some(opt)
}

/// `exp(ln(x))` = `x`, `ln(exp(x))` = `x`
pub fn inverse(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_call(expr, "exp", |arg| do_call(arg, "ln", |inner| Some(inner.clone())))
        .or_else(|| do_call(expr, "ln", |arg| do_call(arg, "exp", |inner| Some(inner.clone()))))?;

    step_collector.push(Step::InverseFunction);
    Some(opt)
}

/// `sin(0.5)` = `0.479...`, `abs(-2)` = `2`
///
/// Builtin functions of approximate numbers are evaluated. Exact numbers are only evaluated by
/// `abs`, whose result is exact.
pub fn evaluate(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let SymExpr::Primary(Primary::Call(name, args)) = expr else {
        return None;
    };

    let opt = match args.as_slice() {
        [SymExpr::Primary(Primary::Number(n))] if name == "abs" && *n < 0 => {
            Some(SymExpr::number(n.clone().abs()))
        },
        [SymExpr::Primary(Primary::Float(x))] => eval_builtin(name, x.clone())
            .filter(|value| value.is_finite())
            .map(SymExpr::float),
        _ => None,
    }?;

    step_collector.push(Step::EvaluateFunction);
    Some(opt)
}

/// Applies all function rules.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    parity(expr, step_collector)
        .or_else(|| constant(expr, step_collector))
        .or_else(|| inverse(expr, step_collector))
        .or_else(|| evaluate(expr, step_collector))
}
