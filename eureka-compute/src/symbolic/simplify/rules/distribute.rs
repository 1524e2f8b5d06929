//! Distribution of products over sums.

use crate::symbolic::{
    expr::SymExpr,
    simplify::step::Step,
    step_collector::StepCollector,
};
use super::do_multiply;

/// `a(b + c)` = `ab + ac`
///
/// Only the first sum among the factors is distributed over; the result is simplified again, which
/// distributes over the remaining sums.
pub fn distribute(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        let index = factors.iter().position(|factor| matches!(factor, SymExpr::Add(_)))?;
        let SymExpr::Add(terms) = &factors[index] else {
            return None;
        };

        let others = factors.iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, factor)| factor.clone())
            .collect::<Vec<_>>();
        Some(SymExpr::Add(terms.iter().map(|term| {
            let mut product = others.clone();
            product.push(term.clone());
            SymExpr::Mul(product)
        }).collect()))
    })?;

    step_collector.push(Step::Distribute);
    Some(opt)
}
