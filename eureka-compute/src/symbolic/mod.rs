//! Algebraic manipulation of expressions.
//!
//! # Expression representation
//!
//! Formulae are represented as a tree of [`SymExpr`] nodes. Sums and products are **flattened**,
//! so `x + (y + z)` is a single [`SymExpr::Add`] node with three children. This makes rewriting
//! rules such as combining like terms (`x + x = 2x`) easy to express, since the terms in question
//! are always at the same level in the tree.
//!
//! Parsed expressions are lowered into [`SymExpr`] with [`TryFrom`]; lowering drops span
//! information and fails only for malformed calls to `diff`, `integral`, and `sqrt`.
//!
//! ```
//! use eureka_compute::{parse, symbolic::SymExpr};
//!
//! assert_eq!(parse("x + (y + z)").unwrap(), SymExpr::Add(vec![
//!     SymExpr::symbol("x"),
//!     SymExpr::symbol("y"),
//!     SymExpr::symbol("z"),
//! ]));
//! ```
//!
//! # Simplification
//!
//! [`simplify()`] rewrites an expression to a canonical form by repeatedly applying the rules in
//! [`simplify::rules`] until none apply. Two expressions that simplify to structurally equal
//! trees are treated as equal by the reasoning layers built on this crate.
//!
//! ```
//! use eureka_compute::{parse, simplify, symbolic::SymExpr};
//!
//! // `x + x + x = 3x`
//! let simplified = simplify(&parse("x + x + x").unwrap());
//! assert_eq!(simplified, SymExpr::Mul(vec![SymExpr::number(3), SymExpr::symbol("x")]));
//! ```
//!
//! # Calculus
//!
//! [`differentiate()`] and [`integrate()`] compute symbolic derivatives and antiderivatives.
//! Symbols that depend on the variable of differentiation (such as `v` in `dv/dx`) can be named
//! with [`differentiate_with`]; their derivatives are kept as [`SymExpr::Derivative`] nodes.

pub mod derivative;
pub mod equation;
pub mod expr;
pub mod integral;
pub mod simplify;
pub mod step_collector;
pub mod substitute;

pub use derivative::{differentiate, differentiate_with};
pub use equation::Equation;
pub use expr::{Primary, SymExpr};
pub use integral::integrate;
pub use simplify::{simplify, simplify_with, simplify_with_steps, structurally_equal, SimplifyCache};
pub use step_collector::StepCollector;
pub use substitute::{rename_functions, substitute};
