//! Simplification of expressions to a canonical form.
//!
//! Simplification works bottom-up: the children of a node are simplified first, then the rules
//! in [`rules`] are applied to the node until none of them match. Every rule returns a new
//! expression whose children are simplified again before the next rule is tried. The whole
//! process repeats on the root until the expression stops changing.
//!
//! The result is deterministic for structurally equal inputs (including inputs whose sums and
//! products list their children in a different order), which is what allows the reasoning layers
//! to compare simplified expressions structurally.
//!
//! Symbols are assumed to stand for non-zero positive reals, the usual domain of physical
//! quantities. Under that assumption simplification never changes the value of an expression,
//! but some rewrites are not valid outside it: `x / x` becomes `1` (undefined at `x = 0`), and
//! `sqrt(x) sqrt(x)` and `(x^(1/2))^2` become `x` (undefined for `x < 0`).

pub(crate) mod num;
pub mod rules;
mod step;

pub use step::Step;

use std::collections::HashMap;
use tracing::trace;
use super::{expr::SymExpr, step_collector::StepCollector};

/// The maximum number of rewrites applied to a single node.
const MAX_REWRITES: usize = 64;

/// The maximum number of passes over the whole expression.
const MAX_PASSES: usize = 16;

/// Memoized simplification results, keyed by the expression before simplification.
///
/// Cached results are returned without recording steps, so step collection should use a fresh
/// cache.
#[derive(Debug, Clone, Default)]
pub struct SimplifyCache {
    entries: HashMap<SymExpr, SymExpr>,
}

impl SimplifyCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of cached expressions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every cached expression.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Simplifies the given expression, treating every symbol as a non-zero positive real.
pub fn simplify(expr: &SymExpr) -> SymExpr {
    simplify_with(expr, &mut SimplifyCache::new(), &mut ())
}

/// Simplifies the given expression, returning the simplified form along with the steps taken.
pub fn simplify_with_steps(expr: &SymExpr) -> (SymExpr, Vec<Step>) {
    let mut steps = Vec::new();
    let simplified = simplify_with(expr, &mut SimplifyCache::new(), &mut steps);
    (simplified, steps)
}

/// Simplifies the given expression, reusing and extending the given cache.
pub fn simplify_with(
    expr: &SymExpr,
    cache: &mut SimplifyCache,
    step_collector: &mut dyn StepCollector<Step>,
) -> SymExpr {
    let mut current = expr.clone();
    for pass in 0..MAX_PASSES {
        let next = simplify_node(&current, cache, step_collector);
        if next == current {
            break;
        }
        trace!(target: "simplify", pass, %next, "pass changed the expression");
        current = next;
    }

    trace!(target: "simplify", input = %expr, output = %current, "simplified");
    current
}

/// Returns true if the two expressions have the same canonical form.
///
/// No numeric tolerance is applied: `0.5 * x` and `1/2 * x` are different expressions.
pub fn structurally_equal(a: &SymExpr, b: &SymExpr) -> bool {
    let mut cache = SimplifyCache::new();
    simplify_with(a, &mut cache, &mut ()) == simplify_with(b, &mut cache, &mut ())
}

/// Simplifies a single node of the expression tree after simplifying its children.
fn simplify_node(
    expr: &SymExpr,
    cache: &mut SimplifyCache,
    step_collector: &mut dyn StepCollector<Step>,
) -> SymExpr {
    if let Some(cached) = cache.entries.get(expr) {
        return cached.clone();
    }

    let mut current = expr.map_children(|child| simplify_node(child, cache, step_collector));
    for _ in 0..MAX_REWRITES {
        let Some(next) = rules::all(&current, step_collector) else {
            break;
        };
        trace!(target: "simplify", from = %current, to = %next, "rewrite");
        current = next.map_children(|child| simplify_node(child, cache, step_collector));
    }

    cache.entries.insert(expr.clone(), current.clone());
    current
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::{parse, symbolic::SymExpr};
    use super::*;

    fn simplified(source: &str) -> String {
        simplify(&parse(source).unwrap()).to_string()
    }

    #[test]
    fn structural_equality() {
        let a = parse("m a + F").unwrap();
        let b = parse("F + a m").unwrap();
        assert!(structurally_equal(&a, &b));
        assert!(structurally_equal(&parse("(x + 1)^2").unwrap(), &parse("x^2 + 2x + 1").unwrap()));
        assert!(!structurally_equal(&parse("0.5 x").unwrap(), &parse("x / 2").unwrap()));
    }

    #[test]
    fn like_terms() {
        assert_eq!(simplified("x + x + x"), "3 * x");
        assert_eq!(simplified("2x - 2x"), "0");
        assert_eq!(simplified("a + b - a"), "b");
    }

    #[test]
    fn like_factors() {
        assert_eq!(simplified("x * x^2"), "x^3");
        assert_eq!(simplified("x / x"), "1");
        assert_eq!(simplified("m v / v"), "m");
        assert_eq!(simplified("sqrt(x) sqrt(x)"), "x");
    }

    #[test]
    fn positive_domain() {
        // valid for non-zero positive `x` only
        assert_eq!(simplified("x / x"), "1");
        assert_eq!(simplified("sqrt(x) sqrt(x)"), "x");
        assert_eq!(simplified("(x^(1/2))^2"), "x");
    }

    #[test]
    fn numbers() {
        assert_eq!(simplified("1/2 + 1/3"), "5/6");
        assert_eq!(simplified("2^10"), "1024");
        assert_eq!(simplified("2^-1"), "1/2");
        assert_eq!(simplified("sqrt(16)"), "4");
        assert_eq!(simplified("0.5 + 0.25"), "0.75");
    }

    #[test]
    fn distribute() {
        assert_eq!(simplified("2(x + 1)"), "2 + 2 * x");
        assert_eq!(simplified("(a + b)(a - b)"), "a^2 - b^2");
        assert_eq!(simplified("(x + 1)^2"), "1 + x^2 + 2 * x");
    }

    #[test]
    fn powers() {
        assert_eq!(simplified("x^0"), "1");
        assert_eq!(simplified("(x^2)^3"), "x^6");
        assert_eq!(simplified("(2 x)^2"), "4 * x^2");
        assert_eq!(simplified("i^2"), "-1");
        assert_eq!(simplified("i^3"), "-i");
    }

    #[test]
    fn functions() {
        assert_eq!(simplified("sin(-x)"), "-sin(x)");
        assert_eq!(simplified("cos(-w t)"), "cos(t * w)");
        assert_eq!(simplified("exp(ln(x)) + cos(0)"), "1 + x");
    }

    #[test]
    fn derivatives() {
        assert_eq!(simplified("diff(diff(x, t), t)"), "diff(x, t, 2)");
        assert_eq!(simplified("diff(3x + 2, t)"), "3 * diff(x, t)");
        assert_eq!(simplified("diff(t, t)"), "1");
    }

    #[test]
    fn measured_stays_opaque() {
        let expr = simplify(&parse("(2 ± 0.1) + 1").unwrap());
        assert!(matches!(expr, SymExpr::Add(ref terms) if terms.len() == 2));
    }

    #[test]
    fn order_independent() {
        let a = simplify(&parse("m v^2 / 2 + m g h").unwrap());
        let b = simplify(&parse("g h m + v^2 m / 2").unwrap());
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn idempotent() {
        let once = simplify(&parse("(a + b)^2 - 2 a b").unwrap());
        assert_eq!(simplify(&once), once);
        assert_eq!(once.to_string(), "a^2 + b^2");
    }

    #[test]
    fn records_steps() {
        let (result, steps) = simplify_with_steps(&parse("x + x").unwrap());
        assert_eq!(result.to_string(), "2 * x");
        assert_eq!(steps, vec![Step::CombineLikeTerms]);
    }

    #[test]
    fn cache_reuse() {
        let mut cache = SimplifyCache::new();
        let expr = parse("x + x").unwrap();
        let first = simplify_with(&expr, &mut cache, &mut ());
        assert!(!cache.is_empty());
        let second = simplify_with(&expr, &mut cache, &mut ());
        assert_eq!(first, second);
    }
}
