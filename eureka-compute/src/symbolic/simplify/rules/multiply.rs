//! Simplification rules for products.

use std::collections::{hash_map::Entry, HashMap};
use crate::symbolic::{
    expr::SymExpr,
    simplify::{num::Num, step::Step},
    step_collector::StepCollector,
};
use super::{distribute::distribute, do_multiply, same_children};

/// `a * (b * c)` = `a * b * c`
pub fn flatten(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        if !factors.iter().any(|factor| matches!(factor, SymExpr::Mul(_))) {
            return None;
        }

        Some(SymExpr::Mul(
            factors.iter().cloned().flat_map(SymExpr::into_factors).collect(),
        ))
    })?;

    step_collector.push(Step::FlattenMul);
    Some(opt)
}

/// `0 * a` = `0`
pub fn multiply_zero(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        factors.iter().find(|factor| factor.is_zero()).cloned()
    })?;

    step_collector.push(Step::MultiplyZero);
    Some(opt)
}

/// `x * x^2` = `x^3`, `2 * 3` = `6`
///
/// Numeric factors are folded into a single coefficient, and factors with the same base are
/// combined by adding their exponents.
pub fn combine_like_factors(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        let mut coefficient = Num::one();
        let mut order = Vec::new();
        let mut exponents: HashMap<SymExpr, Vec<SymExpr>> = HashMap::new();

        for factor in factors {
            if let Some(n) = Num::from_expr(factor) {
                coefficient = coefficient * n;
                continue;
            }

            let (base, exp) = match factor {
                SymExpr::Exp(base, exp) => ((**base).clone(), (**exp).clone()),
                factor => (factor.clone(), SymExpr::number(1)),
            };
            match exponents.entry(base) {
                Entry::Occupied(mut entry) => entry.get_mut().push(exp),
                Entry::Vacant(entry) => {
                    order.push(entry.key().clone());
                    entry.insert(vec![exp]);
                },
            }
        }

        let mut new_factors = Vec::with_capacity(order.len() + 1);
        if !coefficient.is_one() {
            new_factors.push(coefficient.into_expr());
        }
        for base in order {
            let Some(mut exps) = exponents.remove(&base) else {
                continue;
            };
            let exp = if exps.len() == 1 {
                exps.remove(0)
            } else {
                SymExpr::Add(exps)
            };
            if exp.is_one() {
                new_factors.push(base);
            } else {
                new_factors.push(base.pow(exp));
            }
        }
        new_factors.sort();

        if factors.len() > 1 && same_children(expr, &new_factors) {
            None
        } else {
            Some(SymExpr::Mul(new_factors).downgrade())
        }
    })?;

    step_collector.push(Step::CombineLikeFactors);
    Some(opt)
}

/// Applies all multiplication rules. Sums are distributed over before like factors are combined.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    flatten(expr, step_collector)
        .or_else(|| multiply_zero(expr, step_collector))
        .or_else(|| distribute(expr, step_collector))
        .or_else(|| combine_like_factors(expr, step_collector))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::parse;
    use super::*;

    #[test]
    fn zero_absorbs() {
        let expr = parse("0 * x * y").unwrap();
        assert_eq!(multiply_zero(&expr, &mut ()), Some(SymExpr::number(0)));
    }

    #[test]
    fn fold_coefficients() {
        let expr = parse("2 * x * 3").unwrap();
        let result = combine_like_factors(&expr, &mut ()).unwrap();
        assert_eq!(result, SymExpr::Mul(vec![SymExpr::number(6), SymExpr::symbol("x")]));
    }
}
