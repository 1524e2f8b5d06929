//! Replacement of symbols and function names.

use std::collections::HashMap;
use super::expr::{Primary, SymExpr};

/// Replaces every occurrence of the bound symbols with their bound expressions, simultaneously.
/// The result is not simplified.
///
/// The variable of a derivative or integral is renamed if it is bound to a symbol. If it is bound
/// to any other expression, the variable and its occurrences inside the operand are left alone.
///
/// ```
/// use eureka_compute::{parse, substitute};
/// use std::collections::HashMap;
///
/// let expr = parse("x + y").unwrap();
/// let bindings = HashMap::from([
///     ("x".to_string(), parse("y").unwrap()),
///     ("y".to_string(), parse("x").unwrap()),
/// ]);
/// assert_eq!(substitute(&expr, &bindings).to_string(), "y + x");
/// ```
pub fn substitute(expr: &SymExpr, bindings: &HashMap<String, SymExpr>) -> SymExpr {
    if bindings.is_empty() {
        return expr.clone();
    }

    match expr {
        SymExpr::Primary(Primary::Symbol(name)) => match bindings.get(name) {
            Some(replacement) => replacement.clone(),
            None => expr.clone(),
        },
        SymExpr::Derivative(inner, var, order) => {
            let (inner, var) = substitute_bound(inner, var, bindings);
            SymExpr::Derivative(Box::new(inner), var, *order)
        },
        SymExpr::Integral(inner, var) => {
            let (inner, var) = substitute_bound(inner, var, bindings);
            SymExpr::Integral(Box::new(inner), var)
        },
        expr => expr.map_children(|child| substitute(child, bindings)),
    }
}

/// Substitutes into the operand of a derivative or integral with respect to `var`.
fn substitute_bound(
    inner: &SymExpr,
    var: &str,
    bindings: &HashMap<String, SymExpr>,
) -> (SymExpr, String) {
    match bindings.get(var) {
        None => (substitute(inner, bindings), var.to_string()),
        Some(replacement) => match replacement.as_symbol() {
            Some(renamed) => (substitute(inner, bindings), renamed.to_string()),
            None => {
                let mut free = bindings.clone();
                free.remove(var);
                (substitute(inner, &free), var.to_string())
            },
        },
    }
}

/// Renames function calls according to the given map. The arguments are renamed recursively.
pub fn rename_functions(expr: &SymExpr, renames: &HashMap<String, String>) -> SymExpr {
    match expr {
        SymExpr::Primary(Primary::Call(name, args)) => SymExpr::call(
            renames.get(name).unwrap_or(name).clone(),
            args.iter().map(|arg| rename_functions(arg, renames)).collect(),
        ),
        expr => expr.map_children(|child| rename_functions(child, renames)),
    }
}
