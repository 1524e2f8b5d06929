//! Named physical constants and tables of them.

use eureka_compute::{numerical::Ctxt, primitive::{float, PRECISION}};
use eureka_error::Error;
use rug::{Assign, Float};
use std::collections::{btree_map, BTreeMap};
use crate::error::{DuplicateConstant, InvalidTolerance};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named constant with a known value and an absolute uncertainty.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Constant {
    /// The symbol used for the constant in formulae.
    pub symbol: String,

    /// The value of the constant.
    pub value: Float,

    /// The absolute standard uncertainty of the value. Exact constants have an uncertainty of
    /// zero.
    pub uncertainty: Float,
}

impl Constant {
    /// Creates a constant with the given value and absolute uncertainty.
    pub fn new<V, U>(symbol: impl Into<String>, value: V, uncertainty: U) -> Self
    where
        Float: Assign<V> + Assign<U>,
    {
        Self {
            symbol: symbol.into(),
            value: float(value),
            uncertainty: float(uncertainty),
        }
    }

    /// Creates a constant whose value is exact, such as the speed of light in SI units.
    pub fn exact<V>(symbol: impl Into<String>, value: V) -> Self
    where
        Float: Assign<V>,
    {
        Self::new(symbol, value, 0)
    }

    /// Returns the uncertainty relative to the magnitude of the value.
    pub fn relative_uncertainty(&self) -> f64 {
        if self.value.is_zero() {
            return self.uncertainty.to_f64();
        }
        Float::with_val(PRECISION, &self.uncertainty / &self.value).abs().to_f64()
    }
}

/// A table of constants, keyed by symbol.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConstantTable {
    constants: BTreeMap<String, Constant>,
}

impl ConstantTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table from the given constants, failing if two of them share a symbol.
    pub fn try_from_constants(constants: impl IntoIterator<Item = Constant>) -> Result<Self, Error> {
        let mut table = Self::new();
        for constant in constants {
            let symbol = constant.symbol.clone();
            if table.insert(constant).is_some() {
                return Err(Error::new(Vec::new(), DuplicateConstant { symbol }));
            }
        }
        Ok(table)
    }

    /// Adds a constant to the table, returning the constant previously stored under the same
    /// symbol.
    pub fn insert(&mut self, constant: Constant) -> Option<Constant> {
        self.constants.insert(constant.symbol.clone(), constant)
    }

    /// Returns the constant with the given symbol.
    pub fn get(&self, symbol: &str) -> Option<&Constant> {
        self.constants.get(symbol)
    }

    /// Returns the number of constants in the table.
    pub fn len(&self) -> usize {
        self.constants.len()
    }

    /// Returns true if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    /// Iterates over the constants in order of their symbols.
    pub fn iter(&self) -> btree_map::Values<'_, String, Constant> {
        self.constants.values()
    }

    /// Returns an evaluation context binding every constant in the table, on top of the default
    /// mathematical constants.
    pub fn ctxt(&self) -> Ctxt {
        let mut ctxt = Ctxt::default();
        for constant in self.iter() {
            ctxt.add_var(&constant.symbol, constant.value.clone());
        }
        ctxt
    }
}

impl FromIterator<Constant> for ConstantTable {
    /// Collects constants into a table. Later constants replace earlier ones with the same symbol.
    fn from_iter<I: IntoIterator<Item = Constant>>(iter: I) -> Self {
        let mut table = Self::new();
        for constant in iter {
            table.insert(constant);
        }
        table
    }
}

impl<'a> IntoIterator for &'a ConstantTable {
    type Item = &'a Constant;
    type IntoIter = btree_map::Values<'a, String, Constant>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Returns `|value - target| / |target|`, or `|value|` if the target is zero.
pub(crate) fn relative_error(value: &Float, target: &Float) -> f64 {
    let difference = Float::with_val(PRECISION, value - target).abs();
    if target.is_zero() {
        difference.to_f64()
    } else {
        (difference / target.clone().abs()).to_f64()
    }
}

/// Checks that a tolerance is a non-negative number.
pub(crate) fn check_tolerance(tolerance: f64) -> Result<(), Error> {
    if tolerance.is_nan() || tolerance < 0.0 {
        return Err(Error::new(Vec::new(), InvalidTolerance { given: tolerance }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_float_eq::{afe_is_relative_eq, afe_relative_error_msg, assert_float_relative_eq};
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn relative_uncertainty() {
        let g = Constant::new("g", 9.81, 0.0981);
        assert_float_relative_eq!(g.relative_uncertainty(), 0.01, 1e-9);
        assert_eq!(Constant::exact("c", 299792458).relative_uncertainty(), 0.0);
    }

    #[test]
    fn duplicate_symbols() {
        let err = ConstantTable::try_from_constants([
            Constant::exact("c", 299792458),
            Constant::exact("c", 3),
        ]).unwrap_err();
        assert_eq!(
            err.downcast_kind::<DuplicateConstant>(),
            Some(&DuplicateConstant { symbol: "c".to_string() }),
        );
    }

    #[test]
    fn context_binds_constants() {
        let table = ConstantTable::from_iter([Constant::exact("c", 299792458)]);
        let ctxt = table.ctxt();
        assert_eq!(ctxt.get_var("c"), Some(float(299792458)));
        assert!(ctxt.get_var("pi").is_some());
    }

    #[test]
    fn relative_error_of_zero_target() {
        assert_eq!(relative_error(&float(0.5), &float(0)), 0.5);
        assert_eq!(relative_error(&float(3), &float(4)), 0.25);
    }

    #[test]
    fn negative_tolerance() {
        assert!(check_tolerance(0.0).is_ok());
        assert!(check_tolerance(-1e-3).unwrap_err().is::<InvalidTolerance>());
        assert!(check_tolerance(f64::NAN).is_err());
    }
}
