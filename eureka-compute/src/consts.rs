//! Mathematical constants as [`Float`]s at [`PRECISION`](crate::primitive::PRECISION).
//!
//! Only the constants listed in [`BOUND_BY_DEFAULT`] are bound in [`Ctxt::default`]. Euler's
//! number is available here but never bound to a symbol, since physics formulae use `e` for the
//! elementary charge; write `exp(1)` instead.
//!
//! [`Ctxt::default`]: crate::numerical::Ctxt

use once_cell::sync::Lazy;
use rug::Float;
use super::primitive::float;

/// Euler's number.
pub static E: Lazy<Float> = Lazy::new(|| float(1).exp());

/// The golden ratio.
pub static PHI: Lazy<Float> = Lazy::new(|| (float(1) + float(5).sqrt()) / float(2));

pub static PI: Lazy<Float> = Lazy::new(|| float(-1).acos());

pub static TAU: Lazy<Float> = Lazy::new(|| float(2) * &*PI);

/// The symbols bound in the default evaluation context, and their values.
pub static BOUND_BY_DEFAULT: [(&str, &Lazy<Float>); 3] = [
    ("phi", &PHI),
    ("pi", &PI),
    ("tau", &TAU),
];
