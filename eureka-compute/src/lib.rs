//! Symbolic expression model for physics formulae.
//!
//! Formulae are parsed with [`eureka_parser`] and lowered into [`SymExpr`], a normalized
//! tree where sums and products are flattened and subtraction and division are expressed with
//! negative coefficients and exponents. The [`symbolic`] module contains the rewriting system
//! built on top of it ([`simplify`], [`substitute`], [`differentiate`], [`integrate`]), and the
//! [`numerical`] module evaluates expressions to arbitrary-precision [`rug::Float`]s.
//!
//! ```
//! use eureka_compute::{numerical::{evaluate, Ctxt}, parse, primitive::float, simplify};
//!
//! let expr = simplify(&parse("m*a + 2 m a").unwrap());
//! assert_eq!(expr.to_string(), "3 * a * m");
//!
//! let mut ctxt = Ctxt::new();
//! ctxt.add_var("m", float(2));
//! ctxt.add_var("a", float(0.5));
//! assert_eq!(evaluate(&expr, &ctxt).unwrap(), 3.0);
//! ```

pub mod consts;
pub mod error;
pub mod numerical;
pub mod primitive;
pub mod symbolic;

use eureka_error::Error;
use eureka_parser::parser::{ast, Parser};

pub use symbolic::{
    differentiate,
    integrate,
    simplify,
    structurally_equal,
    substitute,
    Equation,
    Primary,
    SymExpr,
};

/// Parses the source text of a single expression into a [`SymExpr`].
pub fn parse(source: &str) -> Result<SymExpr, Error> {
    let expr = Parser::new(source).try_parse_full::<ast::Expr>()?;
    SymExpr::try_from(expr)
}

/// Parses the source text of an equation, such as `F = m*a`, into an [`Equation`].
pub fn parse_equation(source: &str) -> Result<Equation, Error> {
    let equation = Parser::new(source).try_parse_full::<ast::Equation>()?;
    Equation::try_from(equation)
}
