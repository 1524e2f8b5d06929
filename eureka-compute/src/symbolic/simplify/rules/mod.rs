//! Implementation of the simplification rules.
//!
//! Each rule in this module is a function that takes the expression to simplify as an argument,
//! and returns `Some(expr)` with the rewritten expression if the rule applies, or `None` if the
//! rule does not apply. A rule never returns an expression equal to its input.

pub mod add;
pub mod derivative;
pub mod distribute;
pub mod function;
pub mod multiply;
pub mod power;

use crate::symbolic::{expr::{Primary, SymExpr}, step_collector::StepCollector};
use super::step::Step;

/// If the expression is a function call with the given function name and a single argument,
/// calls the given transformation function with the argument.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_call(
    expr: &SymExpr,
    name: &str,
    f: impl Fn(&SymExpr) -> Option<SymExpr>,
) -> Option<SymExpr> {
    match expr {
        SymExpr::Primary(Primary::Call(target_name, args)) if target_name == name && args.len() == 1 => {
            f(&args[0])
        },
        _ => None,
    }
}

/// If the expression is an add expression, calls the given transformation function with the terms.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_add(expr: &SymExpr, f: impl Fn(&[SymExpr]) -> Option<SymExpr>) -> Option<SymExpr> {
    if let SymExpr::Add(terms) = expr {
        f(terms)
    } else {
        None
    }
}

/// If the expression is a multiplication expression, calls the given transformation function with
/// the factors.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_multiply(expr: &SymExpr, f: impl Fn(&[SymExpr]) -> Option<SymExpr>) -> Option<SymExpr> {
    if let SymExpr::Mul(factors) = expr {
        f(factors)
    } else {
        None
    }
}

/// If the expression is a power expression, calls the given transformation function with the left
/// and right-hand-side of the power.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_power(expr: &SymExpr, f: impl Fn(&SymExpr, &SymExpr) -> Option<SymExpr>) -> Option<SymExpr> {
    if let SymExpr::Exp(lhs, rhs) = expr {
        f(lhs, rhs)
    } else {
        None
    }
}

/// If the expression is a derivative, calls the given transformation function with the operand,
/// variable and order.
pub(crate) fn do_derivative(
    expr: &SymExpr,
    f: impl Fn(&SymExpr, &str, u32) -> Option<SymExpr>,
) -> Option<SymExpr> {
    if let SymExpr::Derivative(inner, var, order) = expr {
        f(inner, var, *order)
    } else {
        None
    }
}

/// Returns true if the expression is a sum or product whose children are exactly `children`, in
/// the same order.
pub(crate) fn same_children(expr: &SymExpr, children: &[SymExpr]) -> bool {
    match expr {
        SymExpr::Add(old) | SymExpr::Mul(old) => {
            old.len() == children.len() && old.iter().zip(children).all(|(a, b)| a == b)
        },
        _ => false,
    }
}

/// Applies all rules.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    add::all(expr, step_collector)
        .or_else(|| multiply::all(expr, step_collector))
        .or_else(|| power::all(expr, step_collector))
        .or_else(|| function::all(expr, step_collector))
        .or_else(|| derivative::all(expr, step_collector))
}
