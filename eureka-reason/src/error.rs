use ariadne::Fmt;
use eureka_attrs::ErrorKind;
use eureka_error::EXPR;

/// A tolerance was negative or not a number.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid tolerance `{}`", self.given),
    help = format!("the tolerance is a relative error and must be at least {}", "0".fg(EXPR)),
)]
pub struct InvalidTolerance {
    /// The tolerance that was given.
    pub given: f64,
}

/// The same symbol was given for two different constants.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the constant `{}` is defined more than once", self.symbol),
    help = "give each constant a distinct symbol",
)]
pub struct DuplicateConstant {
    /// The repeated symbol.
    pub symbol: String,
}
