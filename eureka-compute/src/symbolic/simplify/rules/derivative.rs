//! Simplification rules for unevaluated derivatives.
//!
//! These rules only use facts that hold for any symbol: constants have zero derivative, and
//! differentiation is linear. Actual differentiation is done by
//! [`differentiate`](crate::symbolic::derivative::differentiate).

use crate::symbolic::{
    expr::{Primary, SymExpr},
    simplify::{num::{split_coefficient, Num}, step::Step},
    step_collector::StepCollector,
};
use super::do_derivative;

/// `diff(x, t, 0)` = `x`
pub fn order_zero(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_derivative(expr, |inner, _, order| {
        if order == 0 {
            Some(inner.clone())
        } else {
            None
        }
    })?;

    step_collector.push(Step::DerivativeOrderZero);
    Some(opt)
}

/// `diff(diff(x, t), t)` = `diff(x, t, 2)`
pub fn merge(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_derivative(expr, |inner, var, order| match inner {
        SymExpr::Derivative(inner, inner_var, inner_order) if inner_var == var => {
            Some((**inner).clone().derivative(var, order + inner_order))
        },
        _ => None,
    })?;

    step_collector.push(Step::MergeDerivatives);
    Some(opt)
}

/// `diff(2, t)` = `0`
pub fn of_constant(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_derivative(expr, |inner, _, _| match inner {
        SymExpr::Primary(Primary::Number(_) | Primary::Float(_) | Primary::Measured { .. }) => {
            Some(SymExpr::number(0))
        },
        _ => None,
    })?;

    step_collector.push(Step::DerivativeOfConstant);
    Some(opt)
}

/// `diff(t, t)` = `1`, `diff(t, t, 2)` = `0`
pub fn of_variable(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_derivative(expr, |inner, var, order| {
        if inner.as_symbol() != Some(var) {
            return None;
        }
        Some(SymExpr::number(if order == 1 { 1 } else { 0 }))
    })?;

    step_collector.push(Step::DerivativeOfVariable);
    Some(opt)
}

/// `diff(a + b, t)` = `diff(a, t) + diff(b, t)`
pub fn of_sum(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_derivative(expr, |inner, var, order| {
        let SymExpr::Add(terms) = inner else {
            return None;
        };
        Some(SymExpr::Add(
            terms.iter().map(|term| term.clone().derivative(var, order)).collect(),
        ))
    })?;

    step_collector.push(Step::DerivativeOfSum);
    Some(opt)
}

/// `diff(2x, t)` = `2 diff(x, t)`
pub fn coefficient(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_derivative(expr, |inner, var, order| {
        if !matches!(inner, SymExpr::Mul(_)) {
            return None;
        }
        let (coefficient, rest) = split_coefficient(inner);
        if coefficient.is_one() && matches!(coefficient, Num::Exact(_)) {
            return None;
        }
        Some(SymExpr::Mul(vec![coefficient.into_expr(), rest.derivative(var, order)]))
    })?;

    step_collector.push(Step::DerivativeCoefficient);
    Some(opt)
}

/// Applies all derivative rules.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    order_zero(expr, step_collector)
        .or_else(|| merge(expr, step_collector))
        .or_else(|| of_constant(expr, step_collector))
        .or_else(|| of_variable(expr, step_collector))
        .or_else(|| of_sum(expr, step_collector))
        .or_else(|| coefficient(expr, step_collector))
}
