//! Verification of proposed decompositions of composite constants.
//!
//! A decomposition is a formula for a constant in terms of other, more fundamental constants,
//! such as the fine-structure constant in terms of the elementary charge, the reduced Planck
//! constant, the speed of light and the vacuum permittivity. The formula is evaluated with the
//! values of the constants and compared against the known value of the composite.
//!
//! Measured literals in the formula (`9.81 ± 0.02`) take part in uncertainty propagation the
//! same way as uncertain constants in the table.

use eureka_compute::{
    numerical::evaluate,
    primitive::{float, PRECISION},
    symbolic::differentiate,
    Primary,
    SymExpr,
};
use eureka_error::Error;
use rug::Float;
use tracing::debug;
use crate::constant::{check_tolerance, relative_error, Constant, ConstantTable};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How well a formula reproduces the value of a constant.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fit {
    /// `|value - target| / |target|`.
    pub relative_error: f64,

    /// The value of the formula.
    pub value: Float,

    /// The uncertainty of the value, propagated to first order from the uncertainties of the
    /// constants in the formula. [`None`] if the formula could not be differentiated.
    pub uncertainty: Option<Float>,
}

/// The result of [`verify_decomposition`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DecompositionResult {
    /// The formula matches the target within the tolerance.
    Confirmed(Fit),

    /// The formula does not match the target within the tolerance.
    Rejected(Fit),
}

impl DecompositionResult {
    /// Returns true if the decomposition was confirmed.
    pub fn is_confirmed(&self) -> bool {
        matches!(self, DecompositionResult::Confirmed(_))
    }

    /// Returns the fit, whether or not the decomposition was confirmed.
    pub fn fit(&self) -> &Fit {
        match self {
            DecompositionResult::Confirmed(fit) | DecompositionResult::Rejected(fit) => fit,
        }
    }
}

/// Replaces every measured literal in the expression with a fresh symbol, recording it as a
/// constant. The symbols contain a `#`, so they cannot clash with parsed symbols.
fn lift_measured(expr: &SymExpr, lifted: &mut Vec<Constant>) -> SymExpr {
    match expr {
        SymExpr::Primary(Primary::Measured { value, uncertainty }) => {
            let symbol = format!("measured#{}", lifted.len());
            lifted.push(Constant {
                symbol: symbol.clone(),
                value: value.clone(),
                uncertainty: uncertainty.clone(),
            });
            SymExpr::symbol(symbol)
        },
        _ => expr.map_children(|child| lift_measured(child, lifted)),
    }
}

/// First-order propagation of uncertainty: `sqrt(sum((df/dx_i * u_i)^2))` over every uncertain
/// constant `x_i` the formula depends on.
fn propagate_uncertainty(formula: &SymExpr, table: &ConstantTable) -> Result<Float, Error> {
    let ctxt = table.ctxt();
    let mut variance = float(0);
    for symbol in formula.symbols() {
        let Some(constant) = table.get(&symbol) else {
            continue;
        };
        if constant.uncertainty.is_zero() {
            continue;
        }

        let slope = evaluate(&differentiate(formula, &symbol)?, &ctxt)?;
        variance += Float::with_val(PRECISION, &slope * &constant.uncertainty).square();
    }
    Ok(variance.sqrt())
}

/// Checks a proposed formula for the `target` constant against its known value.
///
/// The formula is evaluated with the values in `table`, along with the default mathematical
/// constants (`pi`, `tau`, `phi`). The decomposition is confirmed if the relative error of the
/// result is at most `tolerance`.
///
/// Fails if the tolerance is negative, or if the formula cannot be evaluated, such as when it
/// uses a symbol that is not in the table.
pub fn verify_decomposition(
    target: &Constant,
    formula: &SymExpr,
    table: &ConstantTable,
    tolerance: f64,
) -> Result<DecompositionResult, Error> {
    check_tolerance(tolerance)?;

    let mut lifted = Vec::new();
    let formula = lift_measured(formula, &mut lifted);
    let mut table = table.clone();
    for constant in lifted {
        table.insert(constant);
    }

    let value = evaluate(&formula, &table.ctxt())?;
    let relative_error = relative_error(&value, &target.value);
    let uncertainty = match propagate_uncertainty(&formula, &table) {
        Ok(uncertainty) => Some(uncertainty),
        Err(err) => {
            debug!(target: "decompose", %formula, error = %err, "cannot propagate uncertainty");
            None
        },
    };

    let fit = Fit { relative_error, value, uncertainty };
    debug!(
        target: "decompose",
        constant = %target.symbol,
        %formula,
        relative_error,
        tolerance,
        "decomposition checked"
    );
    if relative_error <= tolerance {
        Ok(DecompositionResult::Confirmed(fit))
    } else {
        Ok(DecompositionResult::Rejected(fit))
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::{
        afe_abs,
        afe_absolute_error_msg,
        afe_is_absolute_eq,
        afe_is_relative_eq,
        afe_relative_error_msg,
        assert_float_absolute_eq,
        assert_float_relative_eq,
    };
    use eureka_compute::{error::UnboundSymbol, parse};
    use crate::error::InvalidTolerance;
    use super::*;

    fn gravity() -> ConstantTable {
        ConstantTable::from_iter([Constant::new("g", 9.81, 0.02), Constant::exact("h", 2)])
    }

    #[test]
    fn confirmed_within_tolerance() {
        let target = Constant::exact("w", 19.62);
        let result = verify_decomposition(&target, &parse("g h").unwrap(), &gravity(), 1e-12).unwrap();
        assert!(result.is_confirmed());
        assert_float_absolute_eq!(result.fit().relative_error, 0.0, 1e-12);

        // d(g h)/dg = h
        let uncertainty = result.fit().uncertainty.as_ref().unwrap().to_f64();
        assert_float_relative_eq!(uncertainty, 0.04, 1e-9);
    }

    #[test]
    fn rejected_outside_tolerance() {
        let target = Constant::exact("w", 19.62);
        let result = verify_decomposition(&target, &parse("g + h").unwrap(), &gravity(), 1e-6).unwrap();
        assert!(!result.is_confirmed());
        assert!(result.fit().relative_error > 0.3);
    }

    #[test]
    fn measured_literals_propagate() {
        let target = Constant::exact("two_g", 19.6);
        let formula = parse("2 (9.8 ± 0.1)").unwrap();
        let result = verify_decomposition(&target, &formula, &ConstantTable::new(), 1e-9).unwrap();
        assert!(result.is_confirmed());
        let uncertainty = result.fit().uncertainty.as_ref().unwrap().to_f64();
        assert_float_absolute_eq!(uncertainty, 0.2, 1e-12);
    }

    #[test]
    fn unbound_symbol() {
        let target = Constant::exact("w", 1);
        let err = verify_decomposition(&target, &parse("g m").unwrap(), &gravity(), 1e-6).unwrap_err();
        assert!(err.is::<UnboundSymbol>());
    }

    #[test]
    fn invalid_tolerance() {
        let target = Constant::exact("w", 1);
        let err = verify_decomposition(&target, &parse("g").unwrap(), &gravity(), -1.0).unwrap_err();
        assert!(err.is::<InvalidTolerance>());
    }
}
