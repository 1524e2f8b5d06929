//! The catalogue of transformation rules used by the derivation engine.
//!
//! Each rule takes one or two known equations and returns `Some(equation)` with the derived
//! equation, or `None` if the rule does not apply. Results are not normalized; the engine does
//! that before adding them to the working set.

use eureka_compute::{
    integrate,
    numerical::is_builtin,
    simplify,
    symbolic::differentiate_with,
    Equation,
    Primary,
    SymExpr,
};
use rug::Rational;
use std::{collections::{BTreeSet, HashMap}, fmt};
use tracing::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A transformation rule, listed in the order the engine applies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rule {
    /// Replaces the left side of one equation with its right side, wherever it appears in another.
    Substitute,

    /// Replaces occurrences of the right side of one equation `s = expr` with the symbol `s`,
    /// including sub-products and sub-sums of `expr` up to a numeric factor.
    Fold,

    /// Replaces a variable with its negation, where the variable only appears inside the arguments
    /// of builtin functions.
    Reflect,

    /// Adds two equations side by side.
    Add,

    /// Subtracts one equation from another side by side.
    Subtract,

    /// Differentiates both sides of an equation.
    Differentiate,

    /// Evaluates the integrals in an equation.
    Integrate,

    /// Solves an equation for the unknown of the target, if it appears linearly.
    Isolate,
}

impl Rule {
    /// Every rule, in catalogue order.
    pub const ALL: [Rule; 8] = [
        Rule::Substitute,
        Rule::Fold,
        Rule::Reflect,
        Rule::Add,
        Rule::Subtract,
        Rule::Differentiate,
        Rule::Integrate,
        Rule::Isolate,
    ];

    /// Returns true if the rule combines two equations.
    pub fn is_binary(&self) -> bool {
        matches!(self, Rule::Substitute | Rule::Fold | Rule::Add | Rule::Subtract)
    }

    /// Returns true if the order of the two premises matters in a binary rule.
    pub(crate) fn is_ordered(&self) -> bool {
        matches!(self, Rule::Substitute | Rule::Fold)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rule::Substitute => "substitute",
            Rule::Fold => "fold",
            Rule::Reflect => "reflect",
            Rule::Add => "add",
            Rule::Subtract => "subtract",
            Rule::Differentiate => "differentiate",
            Rule::Integrate => "integrate",
            Rule::Isolate => "isolate",
        };
        write!(f, "{}", name)
    }
}

/// Facts about the target that some rules need.
#[derive(Debug, Clone)]
pub(crate) struct Goal {
    /// The variables of the derivatives in the target.
    pub derivative_vars: BTreeSet<String>,

    /// For each variable in `derivative_vars`, the symbols that are differentiated with respect
    /// to it somewhere in the target or the axioms.
    pub dependents: HashMap<String, BTreeSet<String>>,

    /// The expression that [`Rule::Isolate`] solves for.
    pub unknown: Option<SymExpr>,
}

impl Goal {
    pub fn new<'a>(target: &Equation, axioms: impl IntoIterator<Item = &'a Equation>) -> Self {
        let mut derivative_vars = BTreeSet::new();
        for side in [&target.lhs, &target.rhs] {
            for node in side.post_order_iter() {
                if let SymExpr::Derivative(_, var, _) = node {
                    derivative_vars.insert(var.clone());
                }
            }
        }

        let mut dependents: HashMap<String, BTreeSet<String>> = derivative_vars
            .iter()
            .map(|var| (var.clone(), BTreeSet::new()))
            .collect();
        let sides = axioms
            .into_iter()
            .chain(std::iter::once(target))
            .flat_map(|equation| [&equation.lhs, &equation.rhs]);
        for side in sides {
            for node in side.post_order_iter() {
                let SymExpr::Derivative(inner, var, _) = node else {
                    continue;
                };
                if let (Some(symbol), Some(set)) = (inner.as_symbol(), dependents.get_mut(var)) {
                    set.insert(symbol.to_string());
                }
            }
        }

        Self {
            derivative_vars,
            dependents,
            unknown: unknown_of(target),
        }
    }
}

/// The expression that the target equation gives the value of: its left side, or its right side
/// if only the right side is a symbol.
fn unknown_of(target: &Equation) -> Option<SymExpr> {
    match &target.lhs {
        SymExpr::Primary(Primary::Number(_) | Primary::Float(_) | Primary::Measured { .. })
        | SymExpr::Add(_)
        | SymExpr::Mul(_) => target.rhs.as_symbol().map(|_| target.rhs.clone()),
        lhs => Some(lhs.clone()),
    }
}

/// Returns true if the expression could be replaced as a whole by [`Rule::Substitute`].
fn is_atomic(expr: &SymExpr) -> bool {
    matches!(
        expr,
        SymExpr::Primary(Primary::Symbol(_) | Primary::Call(_, _)) | SymExpr::Derivative(_, _, _)
    )
}

/// Returns true if `needle` occurs in `expr`, as a node or, for symbols, as the variable of a
/// derivative or integral.
fn occurs(expr: &SymExpr, needle: &SymExpr) -> bool {
    match needle.as_symbol() {
        Some(symbol) => expr.contains_symbol(symbol),
        None => expr.post_order_iter().any(|node| node == needle),
    }
}

/// Replaces every node equal to `pattern` with `replacement`.
fn replace(expr: &SymExpr, pattern: &SymExpr, replacement: &SymExpr) -> SymExpr {
    if expr == pattern {
        replacement.clone()
    } else {
        expr.map_children(|child| replace(child, pattern, replacement))
    }
}

/// `a = expr`, `f(a) = b` -> `f(expr) = b`
pub(crate) fn substitute_into(premise: &Equation, into: &Equation) -> Option<Equation> {
    let (pattern, replacement) = if is_atomic(&premise.lhs) {
        (&premise.lhs, &premise.rhs)
    } else if is_atomic(&premise.rhs) {
        (&premise.rhs, &premise.lhs)
    } else {
        return None;
    };
    if occurs(replacement, pattern) || !(occurs(&into.lhs, pattern) || occurs(&into.rhs, pattern)) {
        return None;
    }

    let result = match pattern.as_symbol() {
        Some(symbol) => {
            let bindings = HashMap::from([(symbol.to_string(), replacement.clone())]);
            into.substitute(&bindings)
        },
        None => into.map(|side| replace(side, pattern, replacement)),
    };
    (result != *into).then_some(result)
}

/// Splits a term into its exact coefficient and the remaining factors.
fn split_term(term: &SymExpr) -> (Rational, Vec<SymExpr>) {
    let mut coefficient = Rational::from(1);
    let mut rest = Vec::new();
    for factor in term.clone().into_factors() {
        match factor.as_number() {
            Some(n) => coefficient *= n,
            None => rest.push(factor),
        }
    }
    (coefficient, rest)
}

/// Removes the elements of `part` from `whole`, if `part` is a sub-multiset of `whole`.
fn remove_all(whole: &[SymExpr], part: &[SymExpr]) -> Option<Vec<SymExpr>> {
    let mut remaining = whole.to_vec();
    for item in part {
        let index = remaining.iter().position(|other| other == item)?;
        remaining.remove(index);
    }
    Some(remaining)
}

/// Folds a product pattern `c * p_1 * ... * p_n` in a product node.
fn fold_product(factors: &[SymExpr], pattern: &[SymExpr], replacement: &SymExpr) -> Option<SymExpr> {
    let (coefficient, rest) = split_term(&SymExpr::Mul(factors.to_vec()));
    let (pattern_coefficient, pattern_rest) = split_term(&SymExpr::Mul(pattern.to_vec()));
    if pattern_rest.is_empty() || pattern_coefficient == 0 {
        return None;
    }

    let remaining = remove_all(&rest, &pattern_rest)?;
    let mut folded = vec![SymExpr::number(coefficient / pattern_coefficient), replacement.clone()];
    folded.extend(remaining);
    Some(SymExpr::Mul(folded))
}

/// Folds a sum pattern in a sum node. The terms of the pattern may appear scaled by a common
/// exact factor.
fn fold_sum(terms: &[SymExpr], pattern: &[SymExpr], replacement: &SymExpr) -> Option<SymExpr> {
    let split = terms.iter().map(split_term).collect::<Vec<_>>();
    let pattern = pattern.iter().map(split_term).collect::<Vec<_>>();
    let (first_coefficient, first_rest) = pattern.first()?;
    if pattern.len() < 2 || *first_coefficient == 0 {
        return None;
    }

    // every term with the same factors as the first pattern term gives a candidate scale
    for (coefficient, rest) in &split {
        if rest != first_rest {
            continue;
        }
        let scale = Rational::from(coefficient / first_coefficient);

        let mut remaining = split.clone();
        let complete = pattern.iter().all(|(pattern_coefficient, pattern_rest)| {
            let wanted = Rational::from(pattern_coefficient * &scale);
            match remaining.iter().position(|(c, r)| *c == wanted && r == pattern_rest) {
                Some(index) => {
                    remaining.remove(index);
                    true
                },
                None => false,
            }
        });
        if !complete {
            continue;
        }

        let mut folded = vec![SymExpr::Mul(vec![SymExpr::number(scale), replacement.clone()])];
        folded.extend(remaining.into_iter().map(|(coefficient, mut rest)| {
            rest.insert(0, SymExpr::number(coefficient));
            SymExpr::Mul(rest).downgrade()
        }));
        return Some(SymExpr::Add(folded));
    }
    None
}

/// Replaces occurrences of `pattern` in `expr` with `replacement`.
fn fold(expr: &SymExpr, pattern: &SymExpr, replacement: &SymExpr) -> SymExpr {
    if expr == pattern {
        return replacement.clone();
    }

    let folded = match (expr, pattern) {
        (SymExpr::Mul(factors), SymExpr::Mul(pattern)) => fold_product(factors, pattern, replacement),
        (SymExpr::Add(terms), SymExpr::Add(pattern)) => fold_sum(terms, pattern, replacement),
        _ => None,
    };
    folded.unwrap_or_else(|| expr.map_children(|child| fold(child, pattern, replacement)))
}

/// `s = a b`, `x = 2 a b c` -> `x = 2 s c`
pub(crate) fn fold_into(premise: &Equation, into: &Equation) -> Option<Equation> {
    let symbol = premise.lhs.as_symbol()?;
    if matches!(premise.rhs, SymExpr::Primary(Primary::Symbol(_) | Primary::Number(_)))
        || premise.rhs.contains_symbol(symbol)
    {
        return None;
    }

    let result = into.map(|side| fold(side, &premise.rhs, &premise.lhs));
    (result != *into).then_some(result)
}

/// Collects the symbols that appear inside the arguments of builtin functions, and the symbols that
/// appear anywhere else.
fn collect_occurrences(
    expr: &SymExpr,
    in_builtin: bool,
    inside: &mut BTreeSet<String>,
    outside: &mut BTreeSet<String>,
) {
    match expr {
        SymExpr::Primary(Primary::Symbol(symbol)) => {
            if in_builtin {
                inside.insert(symbol.clone());
            } else {
                outside.insert(symbol.clone());
            }
        },
        SymExpr::Primary(Primary::Call(name, args)) => {
            let in_builtin = in_builtin || is_builtin(name);
            for arg in args {
                collect_occurrences(arg, in_builtin, inside, outside);
            }
        },
        SymExpr::Derivative(inner, var, _) | SymExpr::Integral(inner, var) => {
            outside.insert(var.clone());
            collect_occurrences(inner, in_builtin, inside, outside);
        },
        expr => {
            for child in expr.children() {
                collect_occurrences(child, in_builtin, inside, outside);
            }
        },
    }
}

/// `exp(i x) = cos(x) + i sin(x)` -> `exp(-i x) = cos(-x) + i sin(-x)`
pub(crate) fn reflect(equation: &Equation) -> Vec<Equation> {
    let mut inside = BTreeSet::new();
    let mut outside = BTreeSet::new();
    for side in [&equation.lhs, &equation.rhs] {
        collect_occurrences(side, false, &mut inside, &mut outside);
    }

    inside
        .difference(&outside)
        .map(|symbol| {
            let bindings = HashMap::from([(symbol.clone(), -SymExpr::symbol(symbol.clone()))]);
            equation.substitute(&bindings)
        })
        .collect()
}

/// `a = b`, `c = d` -> `a + c = b + d`
pub(crate) fn add(p: &Equation, q: &Equation) -> Equation {
    Equation::new(p.lhs.clone() + q.lhs.clone(), p.rhs.clone() + q.rhs.clone())
}

/// `a = b`, `c = d` -> `a - c = b - d`
pub(crate) fn subtract(p: &Equation, q: &Equation) -> Equation {
    Equation::new(p.lhs.clone() - q.lhs.clone(), p.rhs.clone() - q.rhs.clone())
}

/// `x = A cos(w t)` -> `diff(x, t) = -A w sin(t w)`
pub(crate) fn differentiate(equation: &Equation, goal: &Goal) -> Vec<Equation> {
    let empty = BTreeSet::new();
    goal.derivative_vars
        .iter()
        .filter_map(|var| {
            let dependents = goal.dependents.get(var).unwrap_or(&empty);
            match equation.try_map(|side| differentiate_with(side, var, dependents)) {
                Ok(result) => Some(result),
                Err(err) => {
                    trace!(target: "derive", %equation, var = %var, error = %err, "cannot differentiate");
                    None
                },
            }
        })
        .collect()
}

/// Replaces each integral in the expression with its antiderivative. Integrals whose integrand
/// does not mention the variable are kept.
fn integrate_nodes(expr: &SymExpr) -> Result<SymExpr, eureka_error::Error> {
    let mut failure = None;
    let mapped = expr.map_children(|child| match integrate_nodes(child) {
        Ok(child) => child,
        Err(err) => {
            failure.get_or_insert(err);
            child.clone()
        },
    });
    if let Some(err) = failure {
        return Err(err);
    }

    match &mapped {
        SymExpr::Integral(integrand, var) if integrand.contains_symbol(var) => integrate(integrand, var),
        _ => Ok(mapped),
    }
}

/// `K = integral(m v diff(v, x), x)` -> `K = 1/2 m v^2`
pub(crate) fn integrate_integrals(equation: &Equation) -> Option<Equation> {
    match equation.try_map(integrate_nodes) {
        Ok(result) => (result != *equation).then_some(result),
        Err(err) => {
            trace!(target: "derive", %equation, error = %err, "cannot integrate");
            None
        },
    }
}

/// `a x + b = c` -> `x = (c - b) / a`, for the unknown `x` of the goal
pub(crate) fn isolate(equation: &Equation, goal: &Goal) -> Option<Equation> {
    let unknown = goal.unknown.as_ref()?;
    let difference = simplify(&(equation.lhs.clone() - equation.rhs.clone()));

    let mut coefficients = Vec::new();
    let mut rest = Vec::new();
    for term in difference.into_terms() {
        if term == *unknown {
            coefficients.push(SymExpr::number(1));
            continue;
        }
        if !occurs(&term, unknown) {
            rest.push(term);
            continue;
        }

        // the unknown must appear exactly once, as a factor
        let mut factors = term.into_factors();
        let index = factors.iter().position(|factor| factor == unknown)?;
        factors.remove(index);
        if factors.iter().any(|factor| occurs(factor, unknown)) {
            return None;
        }
        coefficients.push(SymExpr::Mul(factors).downgrade());
    }

    let coefficient = simplify(&SymExpr::Add(coefficients).downgrade());
    if coefficient.is_zero() {
        return None;
    }

    let rest = SymExpr::Add(rest).downgrade();
    let value = simplify(&(-rest * coefficient.recip()));
    Some(Equation::new(unknown.clone(), value))
}

#[cfg(test)]
mod tests {
    use eureka_compute::{parse, parse_equation};
    use pretty_assertions::assert_eq;
    use super::*;

    fn equation(source: &str) -> Equation {
        let equation = parse_equation(source).unwrap();
        equation.map(simplify)
    }

    fn goal(target: &str) -> Goal {
        Goal::new(&equation(target), [])
    }

    #[test]
    fn substitute_symbol() {
        let result = substitute_into(&equation("F = m a"), &equation("W = integral(F, x)")).unwrap();
        assert_eq!(result.to_string(), "W = integral(a * m, x)");
    }

    #[test]
    fn substitute_call() {
        let euler = equation("exp(i x) = cos(x) + i sin(x)");
        let into = equation("y = 2 exp(i x)");
        let result = substitute_into(&euler, &into).unwrap();
        assert_eq!(simplify(&result.rhs), simplify(&parse("2 cos(x) + 2 i sin(x)").unwrap()));
    }

    #[test]
    fn substitute_needs_occurrence() {
        assert_eq!(substitute_into(&equation("F = m a"), &equation("E = m c^2")), None);
        // recursive definitions are never substituted
        assert_eq!(substitute_into(&equation("x = x + 1"), &equation("y = x")), None);
    }

    #[test]
    fn fold_sub_product() {
        let premise = equation("k_e = 1 / (4 pi epsilon_0)");
        let into = equation("alpha = e^2 / (4 pi epsilon_0 hbar c)");
        let result = fold_into(&premise, &into).unwrap().map(simplify);
        assert_eq!(result, equation("alpha = k_e e^2 / (hbar c)"));
    }

    #[test]
    fn fold_with_coefficient() {
        let premise = equation("x = A cos(w t)");
        let into = equation("a = -A w^2 cos(w t)");
        let result = fold_into(&premise, &into).unwrap().map(simplify);
        assert_eq!(result, equation("a = -w^2 x"));
    }

    #[test]
    fn fold_scaled_sum() {
        let premise = equation("s = a + b");
        let into = equation("y = 2a + 2b + c");
        let result = fold_into(&premise, &into).unwrap().map(simplify);
        assert_eq!(result, equation("y = 2 s + c"));
    }

    #[test]
    fn reflect_inner_variables() {
        let results = reflect(&equation("exp(i x) = cos(x) + i sin(x)"));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].map(simplify), equation("exp(-i x) = cos(x) - i sin(x)"));
    }

    #[test]
    fn reflect_skips_outer_variables() {
        assert!(reflect(&equation("y = x sin(x)")).is_empty());
    }

    #[test]
    fn differentiate_dependent() {
        let goal = goal("diff(x, t, 2) = -w^2 x");
        let results = differentiate(&equation("x = A cos(w t)"), &goal);
        assert_eq!(results, vec![equation("diff(x, t) = -A w sin(w t)")]);
    }

    #[test]
    fn integrate_work() {
        let result = integrate_integrals(&equation("K = integral(m v diff(v, x), x)")).unwrap();
        assert_eq!(result, equation("K = m v^2 / 2"));
    }

    #[test]
    fn integrate_keeps_constant_integrands() {
        assert_eq!(integrate_integrals(&equation("W = integral(F, x)")), None);
    }

    #[test]
    fn isolate_linear() {
        let goal = goal("cos(x) = (exp(i x) + exp(-i x)) / 2");
        let result = isolate(&equation("exp(i x) + exp(-i x) = 2 cos(x)"), &goal).unwrap();
        assert_eq!(result, equation("cos(x) = (exp(i x) + exp(-i x)) / 2"));
    }

    #[test]
    fn isolate_nonlinear() {
        let goal = goal("x = y");
        assert_eq!(isolate(&equation("x^2 = y"), &goal), None);
        assert_eq!(isolate(&equation("a = y"), &goal), None);
    }
}
