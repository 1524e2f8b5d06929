//! Simplification rules for powers.

use rug::{ops::Pow, Integer, Rational};
use crate::{
    primitive::float,
    symbolic::{
        expr::SymExpr,
        simplify::{num::Num, step::Step},
        step_collector::StepCollector,
    },
};
use super::do_power;

/// The largest integer exponent that is evaluated exactly.
const MAX_EXACT_EXPONENT: i32 = 64;

/// The largest power of a sum that is expanded into a product.
const MAX_EXPANDED_POWER: i32 = 6;

/// The largest root that is taken exactly, such as `8^(1/3)`.
const MAX_EXACT_ROOT: u32 = 8;

/// `a^0` = `1`
pub fn power_zero(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |_, rhs| {
        if rhs.is_zero() {
            Some(SymExpr::number(1))
        } else {
            None
        }
    })?;

    step_collector.push(Step::PowerZero);
    Some(opt)
}

/// `a^1` = `a`
pub fn power_one(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        if rhs.is_one() {
            Some(lhs.clone())
        } else {
            None
        }
    })?;

    step_collector.push(Step::PowerOne);
    Some(opt)
}

/// `1^a` = `1`
pub fn power_of_one(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, _| {
        if lhs.is_one() {
            Some(SymExpr::number(1))
        } else {
            None
        }
    })?;

    step_collector.push(Step::PowerOfOne);
    Some(opt)
}

/// `0^a` = `0`, for positive numbers `a`
pub fn power_of_zero(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        let exp = Num::from_expr(rhs)?;
        if lhs.is_zero() && !exp.is_zero() && !exp.is_negative() {
            Some(SymExpr::number(0))
        } else {
            None
        }
    })?;

    step_collector.push(Step::PowerOfZero);
    Some(opt)
}

/// Returns the exact `n`-th root of a non-negative integer, if there is one.
fn exact_integer_root(value: &Integer, n: u32) -> Option<Integer> {
    let root = Integer::from(value.root_ref(n));
    if Integer::from(root.clone().pow(n)) == *value {
        Some(root)
    } else {
        None
    }
}

/// Returns the exact `n`-th root of a non-negative rational, if there is one.
fn exact_root(value: &Rational, n: u32) -> Option<Rational> {
    if *value < 0 {
        return None;
    }
    let numer = exact_integer_root(value.numer(), n)?;
    let denom = exact_integer_root(value.denom(), n)?;
    Some(Rational::from((numer, denom)))
}

/// Raises an exact number to an exact power, if the result is exact and reasonably small.
fn exact_power(base: &Rational, exp: &Rational) -> Option<Rational> {
    // `b^(p/q)` = `(b^(1/q))^p`
    let root = if *exp.denom() == 1 {
        base.clone()
    } else {
        let q = exp.denom().to_u32().filter(|q| *q <= MAX_EXACT_ROOT)?;
        exact_root(base, q)?
    };

    let p = exp.numer().to_i32().filter(|p| p.abs() <= MAX_EXACT_EXPONENT)?;
    if root == 0 && p < 0 {
        return None;
    }
    Some(root.pow(p))
}

/// `2^3` = `8`, `4^(1/2)` = `2`, `2.0^0.5` = `1.414...`
///
/// Approximate numbers are raised to any power, as long as the result is a finite real number.
pub fn evaluate_power(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        match (Num::from_expr(lhs)?, Num::from_expr(rhs)?) {
            (Num::Exact(base), Num::Exact(exp)) => exact_power(&base, &exp).map(SymExpr::number),
            (base, exp) => {
                let to_float = |n: Num| match n {
                    Num::Exact(n) => float(&n),
                    Num::Approx(n) => n,
                };
                let result = to_float(base).pow(&to_float(exp));
                if result.is_finite() {
                    Some(SymExpr::float(result))
                } else {
                    None
                }
            },
        }
    })?;

    step_collector.push(Step::EvaluatePower);
    Some(opt)
}

/// `i^2` = `-1`, `i^3` = `-i`, `i^4` = `1`
pub fn imaginary_power(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        if lhs.as_symbol() != Some("i") {
            return None;
        }
        let exp = rhs.as_number().filter(|n| *n.denom() == 1)?;
        Some(match exp.numer().mod_u(4) {
            0 => SymExpr::number(1),
            1 => SymExpr::symbol("i"),
            2 => SymExpr::number(-1),
            _ => SymExpr::Mul(vec![SymExpr::number(-1), SymExpr::symbol("i")]),
        })
    })?;

    step_collector.push(Step::ImaginaryPower);
    Some(opt)
}

/// `(a^b)^n` = `a^(bn)`, for integer `n`
pub fn power_of_power(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        let SymExpr::Exp(base, inner_exp) = lhs else {
            return None;
        };
        rhs.as_number().filter(|n| *n.denom() == 1)?;
        Some((**base).clone().pow((**inner_exp).clone() * rhs.clone()))
    })?;

    step_collector.push(Step::PowerOfPower);
    Some(opt)
}

/// `(ab)^n` = `a^n b^n`, for integer `n`
pub fn power_of_product(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        let SymExpr::Mul(factors) = lhs else {
            return None;
        };
        rhs.as_number().filter(|n| *n.denom() == 1)?;
        Some(SymExpr::Mul(
            factors.iter().map(|factor| factor.clone().pow(rhs.clone())).collect(),
        ))
    })?;

    step_collector.push(Step::PowerOfProduct);
    Some(opt)
}

/// `(a + b)^2` = `(a + b)(a + b)`, for small positive integer powers
pub fn expand_power(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        if !matches!(lhs, SymExpr::Add(_)) {
            return None;
        }
        let n = rhs.as_small_integer().filter(|n| (2..=MAX_EXPANDED_POWER).contains(n))?;
        Some(SymExpr::Mul(vec![lhs.clone(); n as usize]))
    })?;

    step_collector.push(Step::ExpandPower);
    Some(opt)
}

/// Applies all power rules.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    power_zero(expr, step_collector)
        .or_else(|| power_one(expr, step_collector))
        .or_else(|| power_of_one(expr, step_collector))
        .or_else(|| power_of_zero(expr, step_collector))
        .or_else(|| evaluate_power(expr, step_collector))
        .or_else(|| imaginary_power(expr, step_collector))
        .or_else(|| power_of_power(expr, step_collector))
        .or_else(|| power_of_product(expr, step_collector))
        .or_else(|| expand_power(expr, step_collector))
}
