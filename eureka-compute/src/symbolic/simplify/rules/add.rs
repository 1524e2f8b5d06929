//! Simplification rules for sums.

use std::collections::{hash_map::Entry, HashMap};
use crate::symbolic::{
    expr::SymExpr,
    simplify::{num::{make_term, split_coefficient, Num}, step::Step},
    step_collector::StepCollector,
};
use super::{do_add, same_children};

/// `a + (b + c)` = `a + b + c`
pub fn flatten(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_add(expr, |terms| {
        if !terms.iter().any(|term| matches!(term, SymExpr::Add(_))) {
            return None;
        }

        Some(SymExpr::Add(
            terms.iter().cloned().flat_map(SymExpr::into_terms).collect(),
        ))
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::FlattenAdd);
    Some(opt)
}

/// `2x + 3x` = `5x`
///
/// Numbers are folded into a single constant term, and terms that cancel to zero are removed.
pub fn combine_like_terms(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_add(expr, |terms| {
        let mut constant = Num::zero();
        let mut order = Vec::new();
        let mut coefficients: HashMap<SymExpr, Num> = HashMap::new();

        for term in terms {
            if let Some(n) = Num::from_expr(term) {
                constant = constant + n;
                continue;
            }

            let (coefficient, rest) = split_coefficient(term);
            match coefficients.entry(rest) {
                Entry::Occupied(mut entry) => {
                    let sum = entry.get().clone() + coefficient;
                    entry.insert(sum);
                },
                Entry::Vacant(entry) => {
                    order.push(entry.key().clone());
                    entry.insert(coefficient);
                },
            }
        }

        let mut new_terms = Vec::with_capacity(order.len() + 1);
        if !constant.is_zero() {
            new_terms.push(constant.into_expr());
        }
        for rest in order {
            let Some(coefficient) = coefficients.remove(&rest) else {
                continue;
            };
            if !coefficient.is_zero() {
                new_terms.push(make_term(coefficient, rest));
            }
        }
        new_terms.sort();

        if terms.len() > 1 && same_children(expr, &new_terms) {
            None
        } else {
            Some(SymExpr::Add(new_terms).downgrade())
        }
    })?;

    step_collector.push(Step::CombineLikeTerms);
    Some(opt)
}

/// Applies all addition rules.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    flatten(expr, step_collector)
        .or_else(|| combine_like_terms(expr, step_collector))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::parse;
    use super::*;

    #[test]
    fn cancel_to_zero() {
        let expr = parse("x - x").unwrap();
        assert_eq!(combine_like_terms(&expr, &mut ()), Some(SymExpr::number(0)));
    }

    #[test]
    fn already_combined() {
        let expr = parse("y + 2x").unwrap();
        assert_eq!(combine_like_terms(&expr, &mut ()), None);
    }
}
