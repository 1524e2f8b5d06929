//! The canonical form of equations in the working set.

use eureka_compute::{
    symbolic::{simplify_with, SimplifyCache},
    Equation,
    SymExpr,
};

/// Rebuilds one side of an equation from its terms.
fn from_terms(mut terms: Vec<SymExpr>) -> SymExpr {
    match terms.len() {
        0 => SymExpr::number(0),
        1 => terms.remove(0),
        _ => SymExpr::Add(terms),
    }
}

/// Simplifies both sides of the equation, then removes terms that appear identically on both
/// sides, so `a + b = a + c` becomes `b = c`.
pub fn normalize(equation: &Equation, cache: &mut SimplifyCache) -> Equation {
    let lhs = simplify_with(&equation.lhs, cache, &mut ());
    let rhs = simplify_with(&equation.rhs, cache, &mut ());

    let mut lhs_terms = lhs.clone().into_terms();
    let mut rhs_terms = rhs.clone().into_terms();
    let mut cancelled = false;
    lhs_terms.retain(|term| match rhs_terms.iter().position(|other| other == term) {
        Some(index) => {
            rhs_terms.remove(index);
            cancelled = true;
            false
        },
        None => true,
    });

    if !cancelled {
        return Equation::new(lhs, rhs);
    }

    Equation::new(
        simplify_with(&from_terms(lhs_terms), cache, &mut ()),
        simplify_with(&from_terms(rhs_terms), cache, &mut ()),
    )
}

/// Returns the equation with its sides in a fixed order, so that `a = b` and `b = a` have the same
/// key.
pub fn orientation_key(equation: &Equation) -> Equation {
    if equation.lhs <= equation.rhs {
        equation.clone()
    } else {
        equation.reflect()
    }
}

#[cfg(test)]
mod tests {
    use eureka_compute::parse_equation;
    use pretty_assertions::assert_eq;
    use super::*;

    fn normalized(source: &str) -> String {
        normalize(&parse_equation(source).unwrap(), &mut SimplifyCache::new()).to_string()
    }

    #[test]
    fn cancel_common_terms() {
        assert_eq!(normalized("a + b = a + c"), "b = c");
        assert_eq!(normalized("x + y = y"), "x = 0");
    }

    #[test]
    fn simplify_sides() {
        assert_eq!(normalized("K = 2 m v^2 / 4"), "K = 1/2 * m * v^2");
    }

    #[test]
    fn either_orientation() {
        let a = parse_equation("E = m c^2").unwrap();
        assert_eq!(orientation_key(&a), orientation_key(&a.reflect()));
    }
}
