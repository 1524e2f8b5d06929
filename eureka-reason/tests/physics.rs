use assert_float_eq::{afe_is_relative_eq, afe_relative_error_msg, assert_float_relative_eq};
use eureka_compute::{parse, parse_equation, primitive::float, simplify, Equation};
use eureka_reason::{
    derive,
    find_analogy,
    search,
    verify_decomposition,
    AnalogyResult,
    Atom,
    Axiom,
    Constant,
    ConstantTable,
    DerivationResult,
    DerivationTrace,
    FailureReason,
    Rule,
};
use pretty_assertions::assert_eq;
use rug::{ops::Pow, Float, Rational};

/// Prints the engine's logs when a test fails.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn axioms(sources: &[(&str, &str)]) -> Vec<Axiom> {
    sources
        .iter()
        .map(|(name, source)| Axiom::parse(*name, source).unwrap())
        .collect()
}

fn equation(source: &str) -> Equation {
    parse_equation(source).unwrap()
}

fn verified(result: DerivationResult) -> DerivationTrace {
    match result {
        DerivationResult::Verified(trace) => trace,
        DerivationResult::Failed(reason) => panic!("not derived: {:?}", reason),
    }
}

#[test]
fn cosine_from_euler_formula() {
    init_logging();
    let axioms = axioms(&[("euler", "exp(i x) = cos(x) + i sin(x)")]);
    let target = equation("cos(x) = (exp(i x) + exp(-i x)) / 2");

    let trace = verified(derive(&axioms, &target, 5));
    assert!(!trace.is_empty());
    assert_eq!(trace.rules(), vec![Rule::Reflect, Rule::Add, Rule::Isolate]);

    let last = trace.iter().last().unwrap();
    let expected = equation("cos(x) = exp(i x) / 2 + exp(-i x) / 2").map(simplify);
    assert!(last.result.matches(&expected));
}

#[test]
fn work_energy_theorem() {
    init_logging();
    let axioms = axioms(&[
        ("newton", "F = m a"),
        ("chain rule", "a = v diff(v, x)"),
        ("work", "W = integral(F, x)"),
        ("work-energy", "K = W"),
    ]);
    let target = equation("K = m v^2 / 2");

    let trace = verified(derive(&axioms, &target, 5));
    let rules = trace.rules();
    assert_eq!(rules.last(), Some(&Rule::Integrate));
    assert!(rules.contains(&Rule::Substitute));

    // every premise of a step is an axiom or the result of an earlier step
    for (i, step) in trace.iter().enumerate() {
        for premise in &step.premises {
            let from_axiom = axioms.iter().any(|axiom| {
                let axiom = axiom.equation.map(simplify);
                axiom.matches(premise)
            });
            let from_step = trace.steps[..i].iter().any(|earlier| earlier.result == *premise);
            assert!(from_axiom || from_step, "unexplained premise {}", premise);
        }
    }
}

#[test]
fn simple_harmonic_motion() {
    init_logging();
    let axioms = axioms(&[("position", "x = A cos(w t)")]);
    let target = equation("diff(x, t, 2) = -w^2 x");

    let trace = verified(derive(&axioms, &target, 5));
    assert_eq!(trace.rules(), vec![Rule::Differentiate, Rule::Differentiate, Rule::Fold]);
}

#[test]
fn coulomb_constant_fold() {
    let axioms = axioms(&[
        ("fine structure", "alpha = e^2 / (4 pi epsilon_0 hbar c)"),
        ("coulomb constant", "k_e = 1 / (4 pi epsilon_0)"),
    ]);
    let target = equation("alpha = k_e e^2 / (hbar c)");

    let trace = verified(derive(&axioms, &target, 5));
    assert_eq!(trace.rules(), vec![Rule::Fold]);
}

#[test]
fn zero_step_budget() {
    let axioms = axioms(&[("euler", "exp(i x) = cos(x) + i sin(x)")]);
    let target = equation("cos(x) = (exp(i x) + exp(-i x)) / 2");
    assert_eq!(derive(&axioms, &target, 0), DerivationResult::Failed(FailureReason::StepBudgetExhausted));

    // unless the target is already known
    let target = equation("cos(x) + i sin(x) = exp(i x)");
    assert_eq!(derive(&axioms, &target, 0), DerivationResult::Verified(DerivationTrace::default()));
}

#[test]
fn derivations_are_reproducible() {
    let axioms = axioms(&[("euler", "exp(i x) = cos(x) + i sin(x)")]);
    let target = equation("cos(x) = (exp(i x) + exp(-i x)) / 2");
    let first = derive(&axioms, &target, 5);
    for _ in 0..3 {
        assert_eq!(derive(&axioms, &target, 5), first);
    }
}

#[test]
fn spring_and_lc_circuit() {
    init_logging();
    let spring = equation("m x''(t) + k x(t) = 0");
    let circuit = equation("L q''(t) + (1/C) q(t) = 0");

    let AnalogyResult::Matched(mapping) = find_analogy(&spring, &circuit) else {
        panic!("no analogy found");
    };
    assert_eq!(mapping.get("x"), Some(&Atom::Function("q".to_string())));
    assert_eq!(mapping.get("m"), Some(&Atom::Symbol { name: "L".to_string(), power: Rational::from(1) }));
    assert_eq!(mapping.get("k"), Some(&Atom::Symbol { name: "C".to_string(), power: Rational::from(-1) }));
}

#[test]
fn analogy_needs_equal_cardinality() {
    let spring = equation("m x''(t) + k x(t) = 0");
    let driven = equation("L q''(t) + q(t) / C = V");
    assert!(matches!(find_analogy(&spring, &driven), AnalogyResult::NoMatch(_)));
}

fn codata() -> ConstantTable {
    ConstantTable::try_from_constants([
        Constant::exact("e", parse_float("1.602176634e-19")),
        Constant::exact("hbar", parse_float("1.054571817e-34")),
        Constant::exact("c", 299792458),
        Constant::new("epsilon_0", parse_float("8.8541878128e-12"), parse_float("1.3e-21")),
    ]).unwrap()
}

fn parse_float(source: &str) -> Float {
    float(Float::parse(source).unwrap())
}

#[test]
fn fine_structure_decomposition() {
    init_logging();
    let alpha = Constant::new("alpha", parse_float("7.2973525693e-3"), parse_float("1.1e-12"));
    let formula = parse("e^2 / (4 pi epsilon_0 hbar c)").unwrap();

    let result = verify_decomposition(&alpha, &formula, &codata(), 1e-6).unwrap();
    assert!(result.is_confirmed());
    let fit = result.fit();
    assert!(fit.relative_error < 1e-8);

    // only the permittivity is uncertain, and alpha is inversely proportional to it
    let uncertainty = fit.uncertainty.as_ref().unwrap().to_f64();
    let expected = fit.value.to_f64() * 1.3e-21 / 8.8541878128e-12;
    assert_float_relative_eq!(uncertainty, expected, 1e-6);
}

#[test]
fn wrong_decomposition_is_rejected() {
    let alpha = Constant::exact("alpha", parse_float("7.2973525693e-3"));
    let formula = parse("e^2 / (2 pi epsilon_0 hbar c)").unwrap();

    let result = verify_decomposition(&alpha, &formula, &codata(), 1e-6).unwrap();
    assert!(!result.is_confirmed());
    assert_float_relative_eq!(result.fit().relative_error, 1.0, 1e-6);
}

#[test]
fn planted_square() {
    init_logging();
    let constants = [
        Constant::exact("C1", 1.5),
        Constant::exact("C2", 2.7),
        Constant::exact("C3", 3.1),
    ];
    let target = float(3.1).pow(2);

    let candidates = search(&constants, &target, 1e-12, 5).unwrap();
    let best = &candidates[0];
    assert_eq!(best.expr, parse("C3^2").unwrap());
    assert_eq!(best.complexity, 3);
    assert!(best.relative_error <= 1e-12);
}
