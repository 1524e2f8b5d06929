//! Detection of structural analogies between equations.
//!
//! Two equations are **analogous** if renaming the variables and functions of one turns it into
//! the other. The mass on a spring, `m x''(t) + k x(t) = 0`, is analogous to the LC circuit,
//! `L q''(t) + q(t) / C = 0`, under the renaming `m -> L`, `k -> 1/C`, `x -> q`.
//!
//! Both equations are first brought into a canonical form: every term is moved to one side,
//! decimal numbers are replaced by the exact rationals they hold, the terms are sorted by
//! descending derivative order, and the whole equation is scaled so the leading term has a
//! coefficient of one. The variables of each equation are collected along with
//! the power they consistently appear with, so that a variable that only appears as `1/C` can
//! be renamed to one that appears linearly. Every bijection between the variables (and between
//! the unknown functions) is then tried in lexicographic order, and the first one that makes the
//! canonical forms structurally equal is returned.

mod permutation;

use eureka_compute::{
    numerical::is_builtin,
    symbolic::{rename_functions, simplify_with, SimplifyCache},
    substitute,
    Equation,
    Primary,
    SymExpr,
};
use rug::Rational;
use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet, HashMap},
    fmt,
};
use tracing::{debug, trace, warn};
use permutation::permutations;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options bounding the analogy search.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnalogyOptions {
    /// The maximum number of variables and functions in each equation. Equations with more are
    /// not matched, since the number of bijections grows factorially.
    pub max_atoms: usize,
}

impl Default for AnalogyOptions {
    fn default() -> Self {
        Self { max_atoms: 6 }
    }
}

/// A variable or unknown function of an equation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Atom {
    /// A variable, along with the power it appears with in every occurrence (or `1` if it appears
    /// with different powers).
    Symbol {
        name: String,
        power: Rational,
    },

    /// A function that is not a builtin, such as `x` in `x(t)`.
    Function(String),
}

impl Atom {
    /// Returns the name of the variable or function.
    pub fn name(&self) -> &str {
        match self {
            Atom::Symbol { name, .. } | Atom::Function(name) => name,
        }
    }

    /// Returns true if the atom is a function.
    pub fn is_function(&self) -> bool {
        matches!(self, Atom::Function(_))
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Symbol { name, power } if *power == 1 => write!(f, "{}", name),
            Atom::Symbol { name, power } => {
                let expr = SymExpr::symbol(name.clone()).pow(SymExpr::number(power.clone()));
                write!(f, "{}", expr)
            },
            Atom::Function(name) => write!(f, "{}", name),
        }
    }
}

/// A renaming that turns one equation into another.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnalogyMapping {
    /// Each atom of the first equation, paired with the atom of the second equation it maps to.
    /// Variables are listed before functions, each in order of name.
    pub pairs: Vec<(Atom, Atom)>,

    /// The fraction of terms that matched, which is always `1.0` for an accepted mapping.
    pub score: f64,
}

impl AnalogyMapping {
    /// Returns the atom that the variable or function with the given name maps to.
    pub fn get(&self, name: &str) -> Option<&Atom> {
        self.pairs
            .iter()
            .find(|(from, _)| from.name() == name)
            .map(|(_, to)| to)
    }
}

impl fmt::Display for AnalogyMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (from, to)) in self.pairs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} -> {}", from, to)?;
        }
        Ok(())
    }
}

/// The result of [`find_analogy`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AnalogyResult {
    /// The equations are analogous under the mapping.
    Matched(AnalogyMapping),

    /// No mapping was found. Holds the best fraction of terms that matched under any attempted
    /// mapping, or the fraction of terms that have the same shape if no mapping was attempted.
    NoMatch(f64),
}

impl AnalogyResult {
    /// Returns the mapping, if the equations matched.
    pub fn mapping(&self) -> Option<&AnalogyMapping> {
        match self {
            AnalogyResult::Matched(mapping) => Some(mapping),
            AnalogyResult::NoMatch(_) => None,
        }
    }
}

/// The term with its numeric factors removed, so that `2 k x` and `k x` have the same key.
fn without_coefficient(term: &SymExpr) -> SymExpr {
    match term {
        SymExpr::Primary(Primary::Number(_)) => SymExpr::number(1),
        SymExpr::Mul(factors) => {
            let mut rest = factors
                .iter()
                .filter(|factor| factor.as_number().is_none())
                .cloned()
                .collect::<Vec<_>>();
            match rest.len() {
                0 => SymExpr::number(1),
                1 => rest.remove(0),
                _ => SymExpr::Mul(rest),
            }
        },
        term => term.clone(),
    }
}

/// Orders terms by descending derivative order, then by their text without the coefficient.
///
/// The coefficient is left out of the key so that scaling an equation never changes which term
/// leads it.
fn term_order(a: &SymExpr, b: &SymExpr) -> Ordering {
    b.derivative_order()
        .cmp(&a.derivative_order())
        .then_with(|| without_coefficient(a).to_string().cmp(&without_coefficient(b).to_string()))
}

/// The exact coefficient of a term.
fn coefficient(term: &SymExpr) -> Rational {
    match term {
        SymExpr::Mul(factors) => factors
            .iter()
            .filter_map(SymExpr::as_number)
            .fold(Rational::from(1), |acc, n| acc * n),
        term => term.as_number().cloned().unwrap_or_else(|| Rational::from(1)),
    }
}

/// Replaces decimal numbers with the exact rational they hold, so that decimal coefficients are
/// normalized like exact ones. `0.5` becomes `1/2`; a decimal with no finite binary expansion,
/// such as `0.1`, becomes a rational with a large denominator and only matches itself.
fn exact_numbers(expr: &SymExpr) -> SymExpr {
    match expr {
        SymExpr::Primary(Primary::Float(value)) => match value.to_rational() {
            Some(exact) => SymExpr::number(exact),
            None => expr.clone(),
        },
        expr => expr.map_children(exact_numbers),
    }
}

/// Brings an expression that is implicitly equal to zero into canonical form, returning its
/// terms in order. Canonicalizing the sum of the returned terms returns the same terms.
fn canonical_terms(expr: &SymExpr, cache: &mut SimplifyCache) -> Vec<SymExpr> {
    let mut terms = simplify_with(&exact_numbers(expr), cache, &mut ()).into_terms();
    terms.sort_by(term_order);

    let leading = terms.first().map(coefficient).unwrap_or_else(|| Rational::from(1));
    if leading != 1 && leading != 0 {
        let scaled = SymExpr::Mul(vec![SymExpr::number(leading.recip()), SymExpr::Add(terms)]);
        terms = simplify_with(&scaled, cache, &mut ()).into_terms();
        terms.sort_by(term_order);
    }
    terms
}

/// Moves every term of the equation to the left side and brings the result into canonical form.
fn canonicalize(equation: &Equation, cache: &mut SimplifyCache) -> Vec<SymExpr> {
    canonical_terms(&(equation.lhs.clone() - equation.rhs.clone()), cache)
}

/// Records the powers each symbol appears with.
fn collect_powers(expr: &SymExpr, powers: &mut BTreeMap<String, Vec<Rational>>) {
    match expr {
        SymExpr::Primary(Primary::Symbol(name)) => {
            powers.entry(name.clone()).or_default().push(Rational::from(1));
        },
        SymExpr::Exp(base, exp) => match (base.as_symbol(), exp.as_number()) {
            (Some(name), Some(power)) => {
                powers.entry(name.to_string()).or_default().push(power.clone());
            },
            _ => {
                collect_powers(base, powers);
                collect_powers(exp, powers);
            },
        },
        SymExpr::Derivative(inner, var, _) | SymExpr::Integral(inner, var) => {
            powers.entry(var.clone()).or_default().push(Rational::from(1));
            collect_powers(inner, powers);
        },
        expr => {
            for child in expr.children() {
                collect_powers(child, powers);
            }
        },
    }
}

/// The variables and unknown functions of a canonical equation, each sorted by name.
#[derive(Debug, Clone)]
struct Atoms {
    symbols: Vec<Atom>,
    functions: Vec<Atom>,
}

impl Atoms {
    fn collect(terms: &[SymExpr]) -> Self {
        let mut powers = BTreeMap::new();
        let mut functions = BTreeSet::new();
        for term in terms {
            collect_powers(term, &mut powers);
            functions.extend(term.functions().into_iter().filter(|name| !is_builtin(name)));
        }

        let symbols = powers
            .into_iter()
            .map(|(name, powers)| {
                let power = match powers.split_first() {
                    Some((first, rest)) if rest.iter().all(|power| power == first) && *first != 0 => {
                        first.clone()
                    },
                    _ => Rational::from(1),
                };
                Atom::Symbol { name, power }
            })
            .collect();
        Self {
            symbols,
            functions: functions.into_iter().map(Atom::Function).collect(),
        }
    }

    fn len(&self) -> usize {
        self.symbols.len() + self.functions.len()
    }
}

/// Anonymizes the variables and functions of an expression, keeping only its shape.
fn shape(expr: &SymExpr) -> SymExpr {
    match expr {
        SymExpr::Primary(Primary::Symbol(_)) => SymExpr::symbol("_"),
        SymExpr::Primary(Primary::Call(name, args)) if !is_builtin(name) => {
            SymExpr::call("_f", args.iter().map(shape).collect())
        },
        SymExpr::Derivative(inner, _, order) => shape(inner).derivative("_", *order),
        SymExpr::Integral(inner, _) => shape(inner).integral("_"),
        expr => expr.map_children(shape),
    }
}

/// The number of elements the two lists have in common, counted as multisets.
fn common_count(a: &[SymExpr], b: &[SymExpr]) -> usize {
    let mut remaining = b.to_vec();
    a.iter()
        .filter(|term| match remaining.iter().position(|other| other == *term) {
            Some(index) => {
                remaining.remove(index);
                true
            },
            None => false,
        })
        .count()
}

/// The fraction of terms the two lists have in common.
fn fraction_matched(a: &[SymExpr], b: &[SymExpr]) -> f64 {
    let total = a.len().max(b.len());
    if total == 0 {
        return 0.0;
    }
    common_count(a, b) as f64 / total as f64
}

/// The fraction of terms with the same shape, ignoring names.
fn shape_score(a: &[SymExpr], b: &[SymExpr]) -> f64 {
    let a = a.iter().map(shape).collect::<Vec<_>>();
    let b = b.iter().map(shape).collect::<Vec<_>>();
    fraction_matched(&a, &b)
}

/// Builds the substitution for one bijection between the variables: `a^p` maps to `b^q` by
/// binding `a` to `b^(q/p)`.
fn bindings(from: &[Atom], to: &[Atom], permutation: &[usize]) -> HashMap<String, SymExpr> {
    from.iter()
        .zip(permutation)
        .filter_map(|(from, &index)| match (from, &to[index]) {
            (Atom::Symbol { name, power: p }, Atom::Symbol { name: target, power: q }) => {
                let exponent = Rational::from(q / p);
                let symbol = SymExpr::symbol(target.clone());
                let value = if exponent == 1 {
                    symbol
                } else {
                    symbol.pow(SymExpr::number(exponent))
                };
                Some((name.clone(), value))
            },
            _ => None,
        })
        .collect()
}

/// Builds the renaming for one bijection between the functions.
fn renames(from: &[Atom], to: &[Atom], permutation: &[usize]) -> HashMap<String, String> {
    from.iter()
        .zip(permutation)
        .map(|(from, &index)| (from.name().to_string(), to[index].name().to_string()))
        .collect()
}

/// Looks for a renaming of the variables and functions of `a` that turns it into `b`, using the
/// default options.
///
/// See [`find_analogy_with`].
pub fn find_analogy(a: &Equation, b: &Equation) -> AnalogyResult {
    find_analogy_with(a, b, &AnalogyOptions::default())
}

/// Looks for a renaming of the variables and functions of `a` that turns it into `b`.
///
/// If the equations have different numbers of variables or functions, or more than
/// [`AnalogyOptions::max_atoms`] of them, no renaming is attempted and the result holds the
/// fraction of terms that have the same shape. Otherwise, the result is the first bijection in
/// lexicographic order under which the canonical forms are structurally equal, or the best
/// fraction of matching terms over every bijection.
///
/// ```
/// use eureka_compute::parse_equation;
/// use eureka_reason::analogy::find_analogy;
///
/// let spring = parse_equation("m x''(t) + k x(t) = 0").unwrap();
/// let circuit = parse_equation("L q''(t) + q(t) / C = 0").unwrap();
/// let mapping = find_analogy(&spring, &circuit).mapping().cloned().unwrap();
/// assert_eq!(mapping.to_string(), "k -> C^-1, m -> L, t -> t, x -> q");
/// ```
pub fn find_analogy_with(a: &Equation, b: &Equation, options: &AnalogyOptions) -> AnalogyResult {
    let mut cache = SimplifyCache::new();
    let a_terms = canonicalize(a, &mut cache);
    let b_terms = canonicalize(b, &mut cache);
    let a_atoms = Atoms::collect(&a_terms);
    let b_atoms = Atoms::collect(&b_terms);
    debug!(
        target: "analogy",
        a = %SymExpr::Add(a_terms.clone()).downgrade(),
        b = %SymExpr::Add(b_terms.clone()).downgrade(),
        symbols = a_atoms.symbols.len(),
        functions = a_atoms.functions.len(),
        "canonicalized"
    );

    if a_atoms.symbols.len() != b_atoms.symbols.len()
        || a_atoms.functions.len() != b_atoms.functions.len()
    {
        let score = shape_score(&a_terms, &b_terms);
        debug!(target: "analogy", score, "different numbers of variables");
        return AnalogyResult::NoMatch(score);
    }
    if a_atoms.len() > options.max_atoms {
        let score = shape_score(&a_terms, &b_terms);
        warn!(
            target: "analogy",
            atoms = a_atoms.len(),
            max_atoms = options.max_atoms,
            "too many variables to match"
        );
        return AnalogyResult::NoMatch(score);
    }

    let a_expr = SymExpr::Add(a_terms);
    let mut best = 0.0f64;
    for function_permutation in permutations(a_atoms.functions.len()) {
        let function_renames = renames(&a_atoms.functions, &b_atoms.functions, &function_permutation);
        let renamed = rename_functions(&a_expr, &function_renames);

        for symbol_permutation in permutations(a_atoms.symbols.len()) {
            let symbol_bindings = bindings(&a_atoms.symbols, &b_atoms.symbols, &symbol_permutation);
            let mapped = canonical_terms(&substitute(&renamed, &symbol_bindings), &mut cache);
            let score = fraction_matched(&mapped, &b_terms);
            trace!(target: "analogy", mapped = %SymExpr::Add(mapped.clone()), score, "bijection tried");

            if SymExpr::Add(mapped) == SymExpr::Add(b_terms.clone()) {
                let pairs = a_atoms.symbols
                    .iter()
                    .zip(&symbol_permutation)
                    .map(|(from, &index)| (from.clone(), b_atoms.symbols[index].clone()))
                    .chain(
                        a_atoms.functions
                            .iter()
                            .zip(&function_permutation)
                            .map(|(from, &index)| (from.clone(), b_atoms.functions[index].clone())),
                    )
                    .collect();
                let mapping = AnalogyMapping { pairs, score: 1.0 };
                debug!(target: "analogy", %mapping, "matched");
                return AnalogyResult::Matched(mapping);
            }
            best = best.max(score);
        }
    }

    debug!(target: "analogy", best, "no bijection matched");
    AnalogyResult::NoMatch(best)
}

#[cfg(test)]
mod tests {
    use eureka_compute::parse_equation;
    use pretty_assertions::assert_eq;
    use super::*;

    fn equation(source: &str) -> Equation {
        parse_equation(source).unwrap()
    }

    fn symbol(name: &str, power: i32) -> Atom {
        Atom::Symbol { name: name.to_string(), power: Rational::from(power) }
    }

    #[test]
    fn spring_and_circuit() {
        let spring = equation("m x''(t) + k x(t) = 0");
        let circuit = equation("L q''(t) + q(t) / C = 0");
        let AnalogyResult::Matched(mapping) = find_analogy(&spring, &circuit) else {
            panic!("no analogy found");
        };
        assert_eq!(mapping.get("x"), Some(&Atom::Function("q".to_string())));
        assert_eq!(mapping.get("m"), Some(&symbol("L", 1)));
        assert_eq!(mapping.get("k"), Some(&symbol("C", -1)));
        assert_eq!(mapping.score, 1.0);
    }

    #[test]
    fn identical_equations() {
        let spring = equation("m x''(t) = -k x(t)");
        let AnalogyResult::Matched(mapping) = find_analogy(&spring, &spring) else {
            panic!("no analogy found");
        };
        assert!(mapping.pairs.iter().all(|(from, to)| from == to));
    }

    #[test]
    fn canonical_scale_and_sides() {
        let mut cache = SimplifyCache::new();
        let a = canonicalize(&equation("2 m x''(t) + 2 k x(t) = 0"), &mut cache);
        let b = canonicalize(&equation("m x''(t) = -k x(t)"), &mut cache);
        assert_eq!(SymExpr::Add(a), SymExpr::Add(b));
    }

    #[test]
    fn different_cardinality() {
        let spring = equation("m x''(t) + k x(t) = 0");
        let damped = equation("L q''(t) + R q'(t) + q(t) / C = 0");
        let AnalogyResult::NoMatch(score) = find_analogy(&spring, &damped) else {
            panic!("unexpected analogy");
        };
        assert!((score - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn partial_match() {
        let spring = equation("m x''(t) + k x(t) = 0");
        let other = equation("L q''(t) + q'(t) / C = 0");
        assert_eq!(find_analogy(&spring, &other), AnalogyResult::NoMatch(0.5));
    }

    #[test]
    fn too_many_atoms() {
        let spring = equation("m x''(t) + k x(t) = 0");
        let circuit = equation("L q''(t) + q(t) / C = 0");
        let options = AnalogyOptions { max_atoms: 2 };
        assert!(matches!(find_analogy_with(&spring, &circuit, &options), AnalogyResult::NoMatch(_)));
    }

    #[test]
    fn consistent_powers() {
        let terms = canonicalize(&equation("q(t) / C + V = 0"), &mut SimplifyCache::new());
        let atoms = Atoms::collect(&terms);
        assert_eq!(atoms.symbols, vec![symbol("C", -1), symbol("V", 1), symbol("t", 1)]);
        assert_eq!(atoms.functions, vec![Atom::Function("q".to_string())]);
    }

    #[test]
    fn canonical_form_is_stable() {
        let mut cache = SimplifyCache::new();
        for source in ["m a = 2 F", "m x(t) + 2 k x(t) = 0", "3 b + 6 a = c"] {
            let once = canonicalize(&equation(source), &mut cache);
            let twice = canonical_terms(&SymExpr::Add(once.clone()), &mut cache);
            assert_eq!(twice, once, "{}", source);
        }
    }

    #[test]
    fn leading_term_ignores_coefficient() {
        let terms = canonicalize(&equation("m a = 2 F"), &mut SimplifyCache::new());
        assert_eq!(terms[0], SymExpr::symbol("F"));
        assert_eq!(coefficient(&terms[1]), Rational::from((-1, 2)));
    }

    #[test]
    fn equal_order_terms_match_themselves() {
        for source in ["m a = 2 F", "m x(t) + 2 k x(t) = 0"] {
            let eq = equation(source);
            let AnalogyResult::Matched(mapping) = find_analogy(&eq, &eq) else {
                panic!("{} does not match itself", source);
            };
            assert!(mapping.pairs.iter().all(|(from, to)| from == to));
        }
    }

    #[test]
    fn equal_order_terms_match_renaming() {
        let a = equation("m x(t) + 2 k x(t) = 0");
        let b = equation("L q(t) + 2 R q(t) = 0");
        let AnalogyResult::Matched(mapping) = find_analogy(&a, &b) else {
            panic!("no analogy found");
        };
        assert_eq!(mapping.get("k"), Some(&symbol("R", 1)));
        assert_eq!(mapping.get("m"), Some(&symbol("L", 1)));
        assert_eq!(mapping.get("x"), Some(&Atom::Function("q".to_string())));
    }

    #[test]
    fn decimal_coefficients() {
        let a = equation("0.5 m x''(t) + k x(t) = 0");
        let b = equation("m x''(t) + 2 k x(t) = 0");
        assert!(matches!(find_analogy(&a, &b), AnalogyResult::Matched(_)));
    }
}
