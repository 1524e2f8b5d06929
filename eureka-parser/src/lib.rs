//! Tokenizer and parser for the textual formula syntax.
//!
//! The parser produces a spanned abstract syntax tree ([`parser::ast::Expr`] and
//! [`parser::ast::Equation`]), which `eureka-compute` lowers into symbolic expressions. Errors
//! carry the spans they originated from, so they can be rendered with [`ariadne`].

pub mod parser;
pub mod tokenizer;
