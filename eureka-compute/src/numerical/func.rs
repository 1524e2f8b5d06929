//! The builtin functions understood by evaluation and simplification.

use rug::Float;

/// The names of the builtin functions, in alphabetical order. Each takes a single argument.
pub const BUILTINS: &[&str] = &["abs", "cos", "exp", "ln", "sin", "sqrt", "tan"];

/// Returns true if the name refers to a builtin function.
pub fn is_builtin(name: &str) -> bool {
    BUILTINS.binary_search(&name).is_ok()
}

/// Applies the builtin function with the given name to the argument. Returns [`None`] if there is
/// no such builtin.
///
/// Trigonometric functions work in radians. Arguments outside a function's domain produce `NaN`.
pub fn eval_builtin(name: &str, arg: Float) -> Option<Float> {
    Some(match name {
        "abs" => arg.abs(),
        "cos" => arg.cos(),
        "exp" => arg.exp(),
        "ln" => arg.ln(),
        "sin" => arg.sin(),
        "sqrt" => arg.sqrt(),
        "tan" => arg.tan(),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use assert_float_eq::{assert_float_absolute_eq, afe_is_absolute_eq, afe_absolute_error_msg, afe_abs};
    use crate::{consts::PI, primitive::float};
    use super::*;

    #[test]
    fn builtin_lookup() {
        assert!(is_builtin("sin"));
        assert!(is_builtin("sqrt"));
        assert!(!is_builtin("sinh"));
    }

    #[test]
    fn trigonometry() {
        let half_pi = float(&*PI) / 2;
        assert_float_absolute_eq!(eval_builtin("sin", half_pi).unwrap().to_f64(), 1.0);
        assert_float_absolute_eq!(eval_builtin("cos", float(0)).unwrap().to_f64(), 1.0);
    }

    #[test]
    fn outside_domain() {
        assert!(eval_builtin("ln", float(-1)).unwrap().is_nan());
        assert!(eval_builtin("gamma", float(1)).is_none());
    }
}
