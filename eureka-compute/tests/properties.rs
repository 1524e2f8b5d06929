use eureka_compute::{
    numerical::{evaluate, Ctxt},
    primitive::float,
    simplify,
    substitute,
    SymExpr,
};
use proptest::prelude::*;
use rug::Float;
use std::collections::HashMap;

const SYMBOLS: [&str; 3] = ["a", "b", "c"];

/// Expressions over small integers and the symbols `a`, `b`, `c`, using sums, products,
/// small non-negative integer powers, `sin`, and `cos`.
fn arb_expr() -> impl Strategy<Value = SymExpr> {
    let leaf = prop_oneof![
        (-3i32..=3).prop_map(|n| SymExpr::number(n)),
        prop::sample::select(SYMBOLS.to_vec()).prop_map(|name| SymExpr::symbol(name)),
    ];
    leaf.prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 2..=3).prop_map(SymExpr::Add),
            prop::collection::vec(inner.clone(), 2..=3).prop_map(SymExpr::Mul),
            (inner.clone(), 0i32..=3).prop_map(|(base, exp)| base.pow(SymExpr::number(exp))),
            inner.clone().prop_map(|arg| SymExpr::call("sin", vec![arg])),
            inner.prop_map(|arg| SymExpr::call("cos", vec![arg])),
        ]
    })
}

fn arb_values() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(-5i32..=5, SYMBOLS.len())
}

fn context(values: &[i32]) -> Ctxt {
    SYMBOLS.iter().zip(values).map(|(name, value)| (*name, float(*value))).collect()
}

fn same_value(a: &Float, b: &Float) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn simplify_is_idempotent(expr in arb_expr()) {
        let once = simplify(&expr);
        let twice = simplify(&once);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn substitute_then_evaluate(expr in arb_expr(), values in arb_values()) {
        let bindings = SYMBOLS.iter()
            .zip(&values)
            .map(|(name, value)| (name.to_string(), SymExpr::number(*value)))
            .collect::<HashMap<_, _>>();

        let substituted = evaluate(&substitute(&expr, &bindings), &Ctxt::new()).unwrap();
        let bound = evaluate(&expr, &context(&values)).unwrap();
        prop_assert!(same_value(&substituted, &bound), "{} != {}", substituted, bound);
    }

    #[test]
    fn simplify_preserves_value(expr in arb_expr(), values in arb_values()) {
        let ctxt = context(&values);
        let before = evaluate(&expr, &ctxt).unwrap().to_f64();
        let after = evaluate(&simplify(&expr), &ctxt).unwrap().to_f64();
        let tolerance = 1e-9 * before.abs().max(1.0);
        prop_assert!((before - after).abs() <= tolerance, "{} simplified to a different value", expr);
    }
}
