use ariadne::Fmt;
use eureka_attrs::ErrorKind;
use eureka_error::EXPR;

/// A symbol was evaluated without a value bound to it.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` has no value", self.name),
    labels = ["this symbol"],
    help = format!("bind a value to it before evaluating, e.g. {} = {}", (&self.name).fg(EXPR), "<number>".fg(EXPR)),
)]
pub struct UnboundSymbol {
    /// The name of the symbol.
    pub name: String,
}

/// The function is not one of the builtin functions.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the `{}` function does not exist", self.name),
    labels = ["this function"],
    help = if self.suggestions.is_empty() {
        "see the documentation for a list of available functions".to_string()
    } else if self.suggestions.len() == 1 {
        format!("did you mean the `{}` function?", (&*self.suggestions[0]).fg(EXPR))
    } else {
        format!(
            "did you mean one of these functions? {}",
            self.suggestions
                .iter()
                .map(|s| format!("`{}`", s.fg(EXPR)))
                .collect::<Vec<_>>()
                .join(", ")
        )
    },
)]
pub struct UnknownFunction {
    /// The name of the function.
    pub name: String,

    /// Builtin functions with a similar name.
    pub suggestions: Vec<String>,
}

/// The operation has no symbolic or numerical rule for the given expression.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot {}", self.operation),
    labels = ["this expression"],
)]
pub struct UnsupportedOperation {
    /// Description of the operation that failed, such as "integrate `tan(x)` with respect to `x`".
    pub operation: String,
}

/// A function was called with the wrong number of arguments.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the `{}` function takes {} argument(s), but {} were given", self.name, self.expected, self.given),
    labels = ["this function call"],
)]
pub struct InvalidCallArity {
    /// The name of the function.
    pub name: String,

    /// Human-readable description of the accepted argument counts, such as `2 or 3`.
    pub expected: &'static str,

    /// The number of arguments given.
    pub given: usize,
}

/// The order of a `diff` call was not a positive integer literal.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "invalid derivative order",
    labels = ["this order"],
    help = format!("the order must be a positive integer, such as {}", "diff(x, t, 2)".fg(EXPR)),
)]
pub struct InvalidDerivativeOrder;

/// An argument that must name a variable was some other expression.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the `{}` function expects a variable here", self.name),
    labels = ["this argument"],
)]
pub struct ExpectedVariable {
    /// The name of the function.
    pub name: String,
}

/// Prime notation was applied to a call that does not have exactly one variable argument.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot differentiate `{}` with prime notation", self.name),
    labels = ["this call"],
    help = format!("prime notation needs exactly one variable argument, e.g. {}", format!("{}'(t)", self.name).fg(EXPR)),
)]
pub struct InvalidPrimeNotation {
    /// The name of the function.
    pub name: String,
}
