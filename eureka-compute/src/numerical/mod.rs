//! Numerical evaluation of expressions to arbitrary-precision floats.

pub mod ctxt;
pub mod eval;
pub mod func;

pub use ctxt::Ctxt;
pub use eval::evaluate;
pub use func::{is_builtin, BUILTINS};
