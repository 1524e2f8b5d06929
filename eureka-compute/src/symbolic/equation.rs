use eureka_error::Error;
use eureka_parser::parser::ast;
use std::{collections::{BTreeSet, HashMap}, fmt};
use super::{expr::SymExpr, substitute::substitute};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An equation between two expressions, such as `F = m*a`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Equation {
    /// The left-hand side of the equation.
    pub lhs: SymExpr,

    /// The right-hand side of the equation.
    pub rhs: SymExpr,
}

impl Equation {
    /// Creates a new equation.
    pub fn new(lhs: SymExpr, rhs: SymExpr) -> Self {
        Self { lhs, rhs }
    }

    /// Returns the same equation with its sides swapped.
    pub fn reflect(&self) -> Self {
        Self::new(self.rhs.clone(), self.lhs.clone())
    }

    /// Applies the given transformation to both sides of the equation.
    pub fn map(&self, mut f: impl FnMut(&SymExpr) -> SymExpr) -> Self {
        Self::new(f(&self.lhs), f(&self.rhs))
    }

    /// Like [`Equation::map`], for fallible transformations.
    pub fn try_map(&self, mut f: impl FnMut(&SymExpr) -> Result<SymExpr, Error>) -> Result<Self, Error> {
        Ok(Self::new(f(&self.lhs)?, f(&self.rhs)?))
    }

    /// Substitutes the bindings into both sides of the equation.
    pub fn substitute(&self, bindings: &HashMap<String, SymExpr>) -> Self {
        self.map(|side| substitute(side, bindings))
    }

    /// Returns true if the two equations are structurally equal in either orientation.
    pub fn matches(&self, other: &Equation) -> bool {
        (self.lhs == other.lhs && self.rhs == other.rhs)
            || (self.lhs == other.rhs && self.rhs == other.lhs)
    }

    /// Returns true if both sides are structurally equal.
    pub fn is_tautology(&self) -> bool {
        self.lhs == self.rhs
    }

    /// Returns the names of every symbol on either side of the equation.
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut symbols = self.lhs.symbols();
        symbols.extend(self.rhs.symbols());
        symbols
    }

    /// Returns the number of top-level terms on both sides of the equation.
    pub fn term_count(&self) -> usize {
        let count = |expr: &SymExpr| match expr {
            SymExpr::Add(terms) => terms.len(),
            _ => 1,
        };
        count(&self.lhs) + count(&self.rhs)
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}

impl TryFrom<ast::Equation> for Equation {
    type Error = Error;

    fn try_from(equation: ast::Equation) -> Result<Self, Self::Error> {
        Ok(Self::new(
            SymExpr::try_from(equation.lhs)?,
            SymExpr::try_from(equation.rhs)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::parse_equation;

    #[test]
    fn parse_and_display() {
        let equation = parse_equation("F = m*a").unwrap();
        assert_eq!(equation.to_string(), "F = m * a");
        assert_eq!(equation.reflect().to_string(), "m * a = F");
    }

    #[test]
    fn matches_either_orientation() {
        let a = parse_equation("E = m c^2").unwrap();
        let b = parse_equation("c^2 m = E").unwrap();
        assert!(a.matches(&b));
        assert!(!a.matches(&parse_equation("E = m c").unwrap()));
    }

    #[test]
    fn term_count() {
        let equation = parse_equation("a + b = c").unwrap();
        assert_eq!(equation.term_count(), 3);
    }
}
