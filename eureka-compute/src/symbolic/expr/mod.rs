//! The [`SymExpr`] type and its structural operations.
//!
//! [`SymExpr`] is a **normalized** expression tree. Compared to the parser's
//! [`eureka_parser::parser::ast::Expr`], it differs in a few ways:
//!
//! - sums and products are flattened into a single [`SymExpr::Add`] or [`SymExpr::Mul`] node,
//! - `a - b` is stored as `a + (-1)b`, and `a / b` as `a b^-1`,
//! - span information is discarded.
//!
//! # Equality
//!
//! The [`PartialEq`], [`Eq`], [`Ord`] and [`Hash`] implementations are **structural**, with one
//! relaxation: the children of [`SymExpr::Add`] and [`SymExpr::Mul`] are compared as multisets,
//! so `x + y` equals `y + x`. No algebraic reasoning is done; `2x` and `x + x` are different
//! expressions until they are [simplified](crate::symbolic::simplify()).
//!
//! The [`Ord`] implementation is also the canonical order of terms and factors: numbers first,
//! then symbols, calls, powers, products, sums, derivatives, and integrals.

mod convert;
mod iter;

pub use iter::ExprIter;

use rug::{Float, Rational};
use std::{
    cmp::Ordering,
    collections::{hash_map::DefaultHasher, BTreeSet},
    fmt,
    hash::{Hash, Hasher},
    ops::{Add, Div, Mul, Neg, Sub},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single term or factor, such as a number, symbol, or function call.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Primary {
    /// An exact rational number, such as `2`, `-3` or `1/2`.
    Number(Rational),

    /// An approximate number, such as `3.14`.
    Float(Float),

    /// A measured value with an uncertainty, such as `9.81 ± 0.01`.
    ///
    /// Measured values are opaque to simplification; they are not folded with other numbers.
    Measured {
        value: Float,
        uncertainty: Float,
    },

    /// A symbol, such as `x` or `hbar`.
    Symbol(String),

    /// A function call, such as `sin(x)` or `f(t)`.
    Call(String, Vec<SymExpr>),
}

impl Primary {
    /// The position of this kind of primary in the canonical order.
    fn rank(&self) -> u8 {
        match self {
            Primary::Number(_) => 0,
            Primary::Float(_) => 1,
            Primary::Measured { .. } => 2,
            Primary::Symbol(_) => 3,
            Primary::Call(_, _) => 4,
        }
    }
}

/// Compares two floats, ordering `NaN` after every other value.
fn cmp_float(a: &Float, b: &Float) -> Ordering {
    a.partial_cmp(b).unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

/// Hashes a float consistently with [`cmp_float`].
fn hash_float<H: Hasher>(value: &Float, state: &mut H) {
    if value.is_nan() {
        u64::MAX.hash(state);
    } else if value.is_zero() {
        0u64.hash(state);
    } else {
        value.to_f64().to_bits().hash(state);
    }
}

impl PartialEq for Primary {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Primary {}

impl PartialOrd for Primary {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Primary {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Primary::Number(a), Primary::Number(b)) => a.cmp(b),
            (Primary::Float(a), Primary::Float(b)) => cmp_float(a, b),
            (
                Primary::Measured { value: a, uncertainty: da },
                Primary::Measured { value: b, uncertainty: db },
            ) => cmp_float(a, b).then_with(|| cmp_float(da, db)),
            (Primary::Symbol(a), Primary::Symbol(b)) => a.cmp(b),
            (Primary::Call(a, a_args), Primary::Call(b, b_args)) => {
                a.cmp(b).then_with(|| a_args.cmp(b_args))
            },
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for Primary {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Primary::Number(n) => n.hash(state),
            Primary::Float(f) => hash_float(f, state),
            Primary::Measured { value, uncertainty } => {
                hash_float(value, state);
                hash_float(uncertainty, state);
            },
            Primary::Symbol(name) => name.hash(state),
            Primary::Call(name, args) => {
                name.hash(state);
                args.hash(state);
            },
        }
    }
}

impl fmt::Display for Primary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primary::Number(n) => write!(f, "{}", n),
            Primary::Float(n) => write!(f, "{}", n.to_f64()),
            Primary::Measured { value, uncertainty } => {
                write!(f, "{} ± {}", value.to_f64(), uncertainty.to_f64())
            },
            Primary::Symbol(name) => write!(f, "{}", name),
            Primary::Call(name, args) => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            },
        }
    }
}

/// A mathematical expression with information about its terms and factors.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SymExpr {
    /// A single term or factor.
    Primary(Primary),

    /// Multiple terms added together.
    Add(Vec<SymExpr>),

    /// Multiple factors multiplied together.
    Mul(Vec<SymExpr>),

    /// An expression raised to a power.
    Exp(Box<SymExpr>, Box<SymExpr>),

    /// The `n`-th derivative of an expression with respect to a variable.
    Derivative(Box<SymExpr>, String, u32),

    /// The indefinite integral of an expression with respect to a variable.
    Integral(Box<SymExpr>, String),
}

impl SymExpr {
    /// Creates an exact number.
    pub fn number<T>(n: T) -> Self
    where
        Rational: From<T>,
    {
        SymExpr::Primary(Primary::Number(Rational::from(n)))
    }

    /// Creates the exact fraction `numer / denom`. `denom` must not be zero.
    pub fn fraction(numer: i64, denom: i64) -> Self {
        SymExpr::Primary(Primary::Number(Rational::from((numer, denom))))
    }

    /// Creates an approximate number.
    pub fn float(value: Float) -> Self {
        SymExpr::Primary(Primary::Float(value))
    }

    /// Creates a symbol.
    pub fn symbol(name: impl Into<String>) -> Self {
        SymExpr::Primary(Primary::Symbol(name.into()))
    }

    /// Creates a function call.
    pub fn call(name: impl Into<String>, args: Vec<SymExpr>) -> Self {
        SymExpr::Primary(Primary::Call(name.into(), args))
    }

    /// Raises this expression to the given power.
    pub fn pow(self, exp: SymExpr) -> Self {
        SymExpr::Exp(Box::new(self), Box::new(exp))
    }

    /// Creates the `order`-th derivative of this expression with respect to `var`.
    pub fn derivative(self, var: impl Into<String>, order: u32) -> Self {
        SymExpr::Derivative(Box::new(self), var.into(), order)
    }

    /// Creates the integral of this expression with respect to `var`.
    pub fn integral(self, var: impl Into<String>) -> Self {
        SymExpr::Integral(Box::new(self), var.into())
    }

    /// The position of this kind of expression in the canonical order.
    fn rank(&self) -> u8 {
        match self {
            SymExpr::Primary(primary) => primary.rank(),
            SymExpr::Exp(_, _) => 5,
            SymExpr::Mul(_) => 6,
            SymExpr::Add(_) => 7,
            SymExpr::Derivative(_, _, _) => 8,
            SymExpr::Integral(_, _) => 9,
        }
    }

    /// If the expression is a [`Primary::Number`], returns a reference to the contained number.
    pub fn as_number(&self) -> Option<&Rational> {
        match self {
            SymExpr::Primary(Primary::Number(n)) => Some(n),
            _ => None,
        }
    }

    /// If the expression is a [`Primary::Float`], returns a reference to the contained float.
    pub fn as_float(&self) -> Option<&Float> {
        match self {
            SymExpr::Primary(Primary::Float(n)) => Some(n),
            _ => None,
        }
    }

    /// If the expression is an exact integer that fits in an [`i32`], returns it.
    pub fn as_small_integer(&self) -> Option<i32> {
        self.as_number()
            .filter(|n| *n.denom() == 1)
            .and_then(|n| n.numer().to_i32())
    }

    /// If the expression is a [`Primary::Symbol`], returns its name.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            SymExpr::Primary(Primary::Symbol(name)) => Some(name),
            _ => None,
        }
    }

    /// If the expression is a [`Primary::Call`], returns the function name and its arguments.
    pub fn as_call(&self) -> Option<(&str, &[SymExpr])> {
        match self {
            SymExpr::Primary(Primary::Call(name, args)) => Some((name, args)),
            _ => None,
        }
    }

    /// Returns true if the expression is a number (exact or approximate) equal to zero.
    pub fn is_zero(&self) -> bool {
        match self {
            SymExpr::Primary(Primary::Number(n)) => *n == 0,
            SymExpr::Primary(Primary::Float(n)) => n.is_zero(),
            _ => false,
        }
    }

    /// Returns true if the expression is a number (exact or approximate) equal to one.
    pub fn is_one(&self) -> bool {
        match self {
            SymExpr::Primary(Primary::Number(n)) => *n == 1,
            SymExpr::Primary(Primary::Float(n)) => *n == 1,
            _ => false,
        }
    }

    /// Returns the direct children of this expression, in order. Function arguments and the
    /// operands of derivatives and integrals count as children.
    pub fn children(&self) -> Vec<&SymExpr> {
        match self {
            SymExpr::Primary(Primary::Call(_, args)) => args.iter().collect(),
            SymExpr::Primary(_) => Vec::new(),
            SymExpr::Add(children) | SymExpr::Mul(children) => children.iter().collect(),
            SymExpr::Exp(lhs, rhs) => vec![&**lhs, &**rhs],
            SymExpr::Derivative(inner, _, _) | SymExpr::Integral(inner, _) => vec![&**inner],
        }
    }

    /// Rebuilds this expression with `f` applied to each direct child.
    pub fn map_children(&self, mut f: impl FnMut(&SymExpr) -> SymExpr) -> SymExpr {
        match self {
            SymExpr::Primary(Primary::Call(name, args)) => {
                SymExpr::call(name.clone(), args.iter().map(f).collect())
            },
            SymExpr::Primary(_) => self.clone(),
            SymExpr::Add(terms) => SymExpr::Add(terms.iter().map(f).collect()),
            SymExpr::Mul(factors) => SymExpr::Mul(factors.iter().map(f).collect()),
            SymExpr::Exp(lhs, rhs) => {
                let lhs = f(lhs);
                SymExpr::Exp(Box::new(lhs), Box::new(f(rhs)))
            },
            SymExpr::Derivative(inner, var, order) => {
                SymExpr::Derivative(Box::new(f(inner)), var.clone(), *order)
            },
            SymExpr::Integral(inner, var) => SymExpr::Integral(Box::new(f(inner)), var.clone()),
        }
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }

    /// Returns the number of nodes in the expression tree. The variable of a derivative or
    /// integral counts as a node.
    pub fn node_count(&self) -> usize {
        self.post_order_iter()
            .map(|expr| match expr {
                SymExpr::Derivative(_, _, _) | SymExpr::Integral(_, _) => 2,
                _ => 1,
            })
            .sum()
    }

    /// Returns true if the symbol appears anywhere in the expression, including as the variable
    /// of a derivative or integral.
    pub fn contains_symbol(&self, name: &str) -> bool {
        self.post_order_iter().any(|expr| match expr {
            SymExpr::Primary(Primary::Symbol(symbol)) => symbol == name,
            SymExpr::Derivative(_, var, _) | SymExpr::Integral(_, var) => var == name,
            _ => false,
        })
    }

    /// Returns the names of every symbol in the expression, including the variables of
    /// derivatives and integrals.
    pub fn symbols(&self) -> BTreeSet<String> {
        self.post_order_iter()
            .filter_map(|expr| match expr {
                SymExpr::Primary(Primary::Symbol(symbol)) => Some(symbol.clone()),
                SymExpr::Derivative(_, var, _) | SymExpr::Integral(_, var) => Some(var.clone()),
                _ => None,
            })
            .collect()
    }

    /// Returns the names of every function called in the expression.
    pub fn functions(&self) -> BTreeSet<String> {
        self.post_order_iter()
            .filter_map(|expr| expr.as_call().map(|(name, _)| name.to_string()))
            .collect()
    }

    /// Returns the highest derivative order that appears in the expression, or `0` if there are
    /// no derivatives.
    pub fn derivative_order(&self) -> u32 {
        self.post_order_iter()
            .filter_map(|expr| match expr {
                SymExpr::Derivative(_, _, order) => Some(*order),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// If the expression is an [`SymExpr::Add`] or [`SymExpr::Mul`] with zero or one child,
    /// returns the equivalent simpler expression. Empty sums are `0` and empty products are `1`.
    pub fn downgrade(self) -> Self {
        match self {
            SymExpr::Add(mut terms) if terms.len() <= 1 => {
                terms.pop().unwrap_or_else(|| SymExpr::number(0))
            },
            SymExpr::Mul(mut factors) if factors.len() <= 1 => {
                factors.pop().unwrap_or_else(|| SymExpr::number(1))
            },
            expr => expr,
        }
    }

    /// Returns the terms of this expression: the children of an [`SymExpr::Add`], or the
    /// expression itself.
    pub fn into_terms(self) -> Vec<SymExpr> {
        match self {
            SymExpr::Add(terms) => terms,
            expr => vec![expr],
        }
    }

    /// Returns the factors of this expression: the children of an [`SymExpr::Mul`], or the
    /// expression itself.
    pub fn into_factors(self) -> Vec<SymExpr> {
        match self {
            SymExpr::Mul(factors) => factors,
            expr => vec![expr],
        }
    }

    /// Returns the reciprocal of this expression.
    pub fn recip(self) -> Self {
        match self {
            SymExpr::Primary(Primary::Number(n)) if n != 0 => SymExpr::number(n.recip()),
            expr => expr.pow(SymExpr::number(-1)),
        }
    }

    /// The precedence used when displaying the expression. Higher values bind tighter.
    fn display_precedence(&self) -> u8 {
        match self {
            SymExpr::Primary(Primary::Measured { .. }) | SymExpr::Add(_) => 1,
            SymExpr::Primary(Primary::Number(n)) if *n < 0 => 3,
            SymExpr::Primary(Primary::Number(n)) if *n.denom() != 1 => 2,
            SymExpr::Primary(Primary::Float(n)) if n.is_sign_negative() => 3,
            SymExpr::Mul(_) => 2,
            SymExpr::Exp(_, _) => 4,
            _ => 5,
        }
    }

    /// If this term would be written with a leading minus sign, returns the term without it.
    fn without_sign(&self) -> Option<SymExpr> {
        match self {
            SymExpr::Primary(Primary::Number(n)) if *n < 0 => Some(SymExpr::number(-n.clone())),
            SymExpr::Primary(Primary::Float(n)) if n.is_sign_negative() && !n.is_zero() => {
                Some(SymExpr::float(-n.clone()))
            },
            SymExpr::Mul(factors) => {
                let (first, rest) = factors.split_first()?;
                let coefficient = first.as_number().filter(|n| **n < 0)?;
                let mut factors = Vec::with_capacity(factors.len());
                if *coefficient != -1 {
                    factors.push(SymExpr::number(-coefficient.clone()));
                }
                factors.extend(rest.iter().cloned());
                Some(SymExpr::Mul(factors).downgrade())
            },
            _ => None,
        }
    }
}

/// Writes the expression, wrapped in parentheses if its precedence is below `min`.
fn write_operand(f: &mut fmt::Formatter<'_>, expr: &SymExpr, min: u8) -> fmt::Result {
    if expr.display_precedence() < min {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

impl fmt::Display for SymExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymExpr::Primary(primary) => write!(f, "{}", primary),
            SymExpr::Add(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    match (i, term.without_sign()) {
                        (0, Some(positive)) => {
                            write!(f, "-")?;
                            write_operand(f, &positive, 2)?;
                        },
                        (0, None) => write_operand(f, term, 2)?,
                        (_, Some(positive)) => {
                            write!(f, " - ")?;
                            write_operand(f, &positive, 2)?;
                        },
                        (_, None) => {
                            write!(f, " + ")?;
                            write_operand(f, term, 2)?;
                        },
                    }
                }
                Ok(())
            },
            SymExpr::Mul(factors) => {
                let factors = match factors.split_first() {
                    Some((first, rest)) if first.as_number().map_or(false, |n| *n == -1) && !rest.is_empty() => {
                        write!(f, "-")?;
                        rest
                    },
                    _ => factors.as_slice(),
                };
                for (i, factor) in factors.iter().enumerate() {
                    if i > 0 {
                        write!(f, " * ")?;
                    }
                    write_operand(f, factor, 2)?;
                }
                Ok(())
            },
            SymExpr::Exp(lhs, rhs) => {
                write_operand(f, lhs, 5)?;
                write!(f, "^")?;
                write_operand(f, rhs, 3)
            },
            SymExpr::Derivative(inner, var, 1) => write!(f, "diff({}, {})", inner, var),
            SymExpr::Derivative(inner, var, order) => write!(f, "diff({}, {}, {})", inner, var, order),
            SymExpr::Integral(inner, var) => write!(f, "integral({}, {})", inner, var),
        }
    }
}

/// Sorts references to the given expressions into canonical order.
fn sorted(exprs: &[SymExpr]) -> Vec<&SymExpr> {
    let mut refs = exprs.iter().collect::<Vec<_>>();
    refs.sort();
    refs
}

impl PartialEq for SymExpr {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SymExpr {}

impl PartialOrd for SymExpr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SymExpr {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SymExpr::Primary(a), SymExpr::Primary(b)) => a.cmp(b),
            (SymExpr::Add(a), SymExpr::Add(b)) | (SymExpr::Mul(a), SymExpr::Mul(b)) => {
                sorted(a).cmp(&sorted(b))
            },
            (SymExpr::Exp(a_base, a_exp), SymExpr::Exp(b_base, b_exp)) => {
                a_base.cmp(b_base).then_with(|| a_exp.cmp(b_exp))
            },
            (SymExpr::Derivative(a, a_var, a_order), SymExpr::Derivative(b, b_var, b_order)) => {
                a.cmp(b)
                    .then_with(|| a_var.cmp(b_var))
                    .then_with(|| a_order.cmp(b_order))
            },
            (SymExpr::Integral(a, a_var), SymExpr::Integral(b, b_var)) => {
                a.cmp(b).then_with(|| a_var.cmp(b_var))
            },
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Combines the hashes of the children without depending on their order.
fn hash_unordered<H: Hasher>(children: &[SymExpr], state: &mut H) {
    let combined = children.iter().fold(0u64, |acc, child| {
        let mut hasher = DefaultHasher::new();
        child.hash(&mut hasher);
        acc.wrapping_add(hasher.finish())
    });
    children.len().hash(state);
    combined.hash(state);
}

impl Hash for SymExpr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            SymExpr::Primary(primary) => primary.hash(state),
            SymExpr::Add(children) | SymExpr::Mul(children) => hash_unordered(children, state),
            SymExpr::Exp(lhs, rhs) => {
                lhs.hash(state);
                rhs.hash(state);
            },
            SymExpr::Derivative(inner, var, order) => {
                inner.hash(state);
                var.hash(state);
                order.hash(state);
            },
            SymExpr::Integral(inner, var) => {
                inner.hash(state);
                var.hash(state);
            },
        }
    }
}

impl From<Primary> for SymExpr {
    fn from(primary: Primary) -> Self {
        SymExpr::Primary(primary)
    }
}

/// Adds two expressions, flattening nested sums. No simplification is done.
impl Add for SymExpr {
    type Output = SymExpr;

    fn add(self, rhs: Self) -> Self::Output {
        let mut terms = self.into_terms();
        terms.extend(rhs.into_terms());
        SymExpr::Add(terms)
    }
}

/// Multiplies two expressions, flattening nested products. No simplification is done.
impl Mul for SymExpr {
    type Output = SymExpr;

    fn mul(self, rhs: Self) -> Self::Output {
        let mut factors = self.into_factors();
        factors.extend(rhs.into_factors());
        SymExpr::Mul(factors)
    }
}

impl Neg for SymExpr {
    type Output = SymExpr;

    fn neg(self) -> Self::Output {
        match self {
            SymExpr::Primary(Primary::Number(n)) => SymExpr::number(-n),
            SymExpr::Primary(Primary::Float(n)) => SymExpr::float(-n),
            expr => SymExpr::number(-1) * expr,
        }
    }
}

impl Sub for SymExpr {
    type Output = SymExpr;

    fn sub(self, rhs: Self) -> Self::Output {
        self + -rhs
    }
}

impl Div for SymExpr {
    type Output = SymExpr;

    fn div(self, rhs: Self) -> Self::Output {
        if let (Some(a), Some(b)) = (self.as_number(), rhs.as_number()) {
            if *b != 0 {
                return SymExpr::number(Rational::from(a / b));
            }
        }
        self * rhs.recip()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::parse;
    use super::*;

    fn hash_of(expr: &SymExpr) -> u64 {
        let mut hasher = DefaultHasher::new();
        expr.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn order_insensitive_sum() {
        let a = parse("x + y + 2").unwrap();
        let b = parse("2 + y + x").unwrap();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn order_sensitive_power() {
        let a = parse("x^y").unwrap();
        let b = parse("y^x").unwrap();
        assert!(a != b);
    }

    #[test]
    fn no_algebraic_equality() {
        let a = parse("x + x").unwrap();
        let b = parse("2x").unwrap();
        assert!(a != b);
    }

    #[test]
    fn canonical_order() {
        let mut factors = vec![
            SymExpr::symbol("x").pow(SymExpr::number(2)),
            SymExpr::symbol("m"),
            SymExpr::number(3),
            SymExpr::call("cos", vec![SymExpr::symbol("t")]),
        ];
        factors.sort();
        assert_eq!(SymExpr::Mul(factors).to_string(), "3 * m * cos(t) * x^2");
    }

    #[test]
    fn display_subtraction() {
        let expr = parse("a - b - 2c").unwrap();
        assert_eq!(expr.to_string(), "a - b - 2 * c");
    }

    #[test]
    fn display_negation() {
        let expr = parse("-(a + b)").unwrap();
        assert_eq!(expr.to_string(), "-(a + b)");
    }

    #[test]
    fn display_powers() {
        assert_eq!(parse("(a b)^2").unwrap().to_string(), "(a * b)^2");
        assert_eq!(parse("x^(1/2)").unwrap().to_string(), "x^(1/2)");
        assert_eq!(SymExpr::symbol("x").pow(SymExpr::fraction(1, 2)).to_string(), "x^(1/2)");
        assert_eq!(SymExpr::symbol("x").pow(SymExpr::number(-1)).to_string(), "x^-1");
        assert_eq!(SymExpr::number(-2).pow(SymExpr::symbol("n")).to_string(), "(-2)^n");
    }

    #[test]
    fn display_calculus() {
        let expr = SymExpr::symbol("x").derivative("t", 2);
        assert_eq!(expr.to_string(), "diff(x, t, 2)");
        let expr = SymExpr::symbol("F").integral("x");
        assert_eq!(expr.to_string(), "integral(F, x)");
    }

    #[test]
    fn symbols_and_functions() {
        let expr = parse("A cos(w t) + diff(x, t)").unwrap();
        let symbols = expr.symbols().into_iter().collect::<Vec<_>>();
        assert_eq!(symbols, vec!["A", "t", "w", "x"]);
        assert_eq!(expr.functions().into_iter().collect::<Vec<_>>(), vec!["cos"]);
    }

    #[test]
    fn count_nodes() {
        // Add, Mul, 2, x, y
        assert_eq!(parse("2x + y").unwrap().node_count(), 5);
        // Derivative, variable, x
        assert_eq!(parse("diff(x, t)").unwrap().node_count(), 3);
    }

    #[test]
    fn downgrade_trivial() {
        assert_eq!(SymExpr::Add(vec![]).downgrade(), SymExpr::number(0));
        assert_eq!(SymExpr::Mul(vec![]).downgrade(), SymExpr::number(1));
        assert_eq!(SymExpr::Mul(vec![SymExpr::symbol("x")]).downgrade(), SymExpr::symbol("x"));
    }

    #[test]
    fn float_equality() {
        let a = SymExpr::float(crate::primitive::float(0.5));
        let b = SymExpr::float(crate::primitive::float(0.5));
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert!(a != SymExpr::fraction(1, 2));
    }
}
