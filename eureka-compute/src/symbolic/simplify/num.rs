//! Arithmetic on the numeric leaves of an expression.

use rug::{Float, Rational};
use std::ops::{Add, Mul};
use crate::{primitive::float, symbolic::expr::{Primary, SymExpr}};

/// A number that is either exact or approximate. Combining an exact number with an approximate
/// one produces an approximate number.
#[derive(Debug, Clone)]
pub(crate) enum Num {
    Exact(Rational),
    Approx(Float),
}

impl Num {
    /// The number `0`.
    pub fn zero() -> Self {
        Num::Exact(Rational::new())
    }

    /// The number `1`.
    pub fn one() -> Self {
        Num::Exact(Rational::from(1))
    }

    /// Extracts the number from an [`Primary::Number`] or [`Primary::Float`] expression.
    pub fn from_expr(expr: &SymExpr) -> Option<Self> {
        match expr {
            SymExpr::Primary(Primary::Number(n)) => Some(Num::Exact(n.clone())),
            SymExpr::Primary(Primary::Float(n)) => Some(Num::Approx(n.clone())),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Num::Exact(n) => *n == 0,
            Num::Approx(n) => n.is_zero(),
        }
    }

    pub fn is_one(&self) -> bool {
        match self {
            Num::Exact(n) => *n == 1,
            Num::Approx(n) => *n == 1,
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Num::Exact(n) => *n < 0,
            Num::Approx(n) => *n < 0,
        }
    }

    fn to_float(&self) -> Float {
        match self {
            Num::Exact(n) => float(n),
            Num::Approx(n) => n.clone(),
        }
    }

    pub fn into_expr(self) -> SymExpr {
        match self {
            Num::Exact(n) => SymExpr::number(n),
            Num::Approx(n) => SymExpr::float(n),
        }
    }
}

impl Add for Num {
    type Output = Num;

    fn add(self, rhs: Num) -> Num {
        match (self, rhs) {
            (Num::Exact(a), Num::Exact(b)) => Num::Exact(a + b),
            (a, b) => Num::Approx(a.to_float() + b.to_float()),
        }
    }
}

impl Mul for Num {
    type Output = Num;

    fn mul(self, rhs: Num) -> Num {
        match (self, rhs) {
            (Num::Exact(a), Num::Exact(b)) => Num::Exact(a * b),
            (a, b) => Num::Approx(a.to_float() * b.to_float()),
        }
    }
}

/// Returns true if the expression would be written with a leading minus sign: a negative number,
/// a product with a negative coefficient, or a sum whose terms are all negative.
pub(crate) fn is_negative(expr: &SymExpr) -> bool {
    match expr {
        SymExpr::Mul(factors) => factors
            .iter()
            .find_map(Num::from_expr)
            .map_or(false, |n| n.is_negative()),
        SymExpr::Add(terms) => !terms.is_empty() && terms.iter().all(is_negative),
        expr => Num::from_expr(expr).map_or(false, |n| n.is_negative()),
    }
}

/// Splits a term into its numeric coefficient and the remaining factors.
pub(crate) fn split_coefficient(term: &SymExpr) -> (Num, SymExpr) {
    match term {
        SymExpr::Mul(factors) => {
            let mut coefficient = Num::one();
            let mut rest = Vec::with_capacity(factors.len());
            for factor in factors {
                match Num::from_expr(factor) {
                    Some(n) => coefficient = coefficient * n,
                    None => rest.push(factor.clone()),
                }
            }
            (coefficient, SymExpr::Mul(rest).downgrade())
        },
        term => (Num::one(), term.clone()),
    }
}

/// Builds the term `coefficient * rest`, omitting a coefficient of one.
pub(crate) fn make_term(coefficient: Num, rest: SymExpr) -> SymExpr {
    if coefficient.is_one() {
        return rest;
    }

    let mut factors = vec![coefficient.into_expr()];
    factors.extend(rest.into_factors());
    factors.sort();
    SymExpr::Mul(factors)
}
