//! Lowering of parsed [`ast::Expr`]s into [`SymExpr`]s.

use eureka_error::Error;
use eureka_parser::parser::{
    ast::{self, Call, Literal, LitNum},
    token::op::{BinOpKind, UnaryOpKind},
};
use rug::Float;
use crate::{
    error::{ExpectedVariable, InvalidCallArity, InvalidDerivativeOrder, InvalidPrimeNotation},
    primitive::{float, float_from_str, rational_from_str},
};
use super::{Primary, SymExpr};

/// Returns the float value of a number literal.
fn lower_float(num: &LitNum) -> Float {
    float_from_str(&num.lexeme).unwrap_or_else(|| float(f64::NAN))
}

/// Integer literals are exact; decimal literals are approximate.
fn lower_number(num: &LitNum) -> SymExpr {
    if !num.decimal {
        if let Some(n) = rational_from_str(&num.lexeme) {
            return SymExpr::number(n);
        }
    }
    SymExpr::float(lower_float(num))
}

fn lower_literal(literal: Literal) -> SymExpr {
    match literal {
        Literal::Number(num) => lower_number(&num),
        Literal::Measured(measured) => SymExpr::Primary(Primary::Measured {
            value: lower_float(&measured.value),
            uncertainty: lower_float(&measured.uncertainty),
        }),
        Literal::Symbol(sym) => SymExpr::symbol(sym.name),
    }
}

/// If the expression is a (possibly parenthesized) symbol, returns its name.
fn as_variable(expr: &ast::Expr) -> Option<&str> {
    match expr.innermost() {
        ast::Expr::Literal(Literal::Symbol(sym)) => Some(&sym.name),
        _ => None,
    }
}

/// Returns the variable named by the argument, or an [`ExpectedVariable`] error pointing at it.
fn expect_variable(name: &str, arg: &ast::Expr) -> Result<String, Error> {
    as_variable(arg)
        .map(str::to_string)
        .ok_or_else(|| Error::new(vec![arg.span()], ExpectedVariable { name: name.to_string() }))
}

/// Checks that the call has an accepted number of arguments.
fn expect_arity(call: &Call, accepted: std::ops::RangeInclusive<usize>, expected: &'static str) -> Result<(), Error> {
    if accepted.contains(&call.args.len()) {
        Ok(())
    } else {
        Err(Error::new(call.outer_span().to_vec(), InvalidCallArity {
            name: call.name.name.clone(),
            expected,
            given: call.args.len(),
        }))
    }
}

/// Parses the optional order argument of `diff`.
fn derivative_order(arg: Option<&ast::Expr>) -> Result<u32, Error> {
    let Some(arg) = arg else {
        return Ok(1);
    };

    let order = match arg.innermost() {
        ast::Expr::Literal(Literal::Number(num)) if !num.decimal => num.lexeme
            .parse::<u32>()
            .ok()
            .filter(|order| *order > 0),
        _ => None,
    };
    order.ok_or_else(|| Error::new(vec![arg.span()], InvalidDerivativeOrder))
}

fn lower_call(call: Call) -> Result<SymExpr, Error> {
    let name = call.name.name.clone();

    // prime notation, such as `x''(t)`
    if call.derivatives > 0 {
        return match call.args.as_slice() {
            [arg] => match as_variable(arg) {
                Some(var) => Ok(SymExpr::call(name, vec![SymExpr::symbol(var)])
                    .derivative(var, u32::from(call.derivatives))),
                None => Err(Error::new(vec![call.span.clone()], InvalidPrimeNotation { name })),
            },
            _ => Err(Error::new(vec![call.span.clone()], InvalidPrimeNotation { name })),
        };
    }

    match name.as_str() {
        "diff" => {
            expect_arity(&call, 2..=3, "2 or 3")?;
            let var = expect_variable(&name, &call.args[1])?;
            let order = derivative_order(call.args.get(2))?;
            let mut args = call.args;
            let inner = SymExpr::try_from(args.swap_remove(0))?;
            Ok(inner.derivative(var, order))
        },
        "integral" => {
            expect_arity(&call, 2..=2, "2")?;
            let var = expect_variable(&name, &call.args[1])?;
            let mut args = call.args;
            let inner = SymExpr::try_from(args.swap_remove(0))?;
            Ok(inner.integral(var))
        },
        "sqrt" => {
            expect_arity(&call, 1..=1, "1")?;
            let mut args = call.args;
            let inner = SymExpr::try_from(args.swap_remove(0))?;
            Ok(inner.pow(SymExpr::fraction(1, 2)))
        },
        _ => {
            let args = call.args
                .into_iter()
                .map(SymExpr::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(SymExpr::call(name, args))
        },
    }
}

/// Lowers a parsed expression. The only failures are malformed calls to `diff`, `integral`,
/// `sqrt`, and prime notation.
impl TryFrom<ast::Expr> for SymExpr {
    type Error = Error;

    fn try_from(expr: ast::Expr) -> Result<Self, Self::Error> {
        match expr {
            ast::Expr::Literal(literal) => Ok(lower_literal(literal)),
            ast::Expr::Paren(paren) => SymExpr::try_from(paren.into_innermost()),
            ast::Expr::Call(call) => lower_call(call),
            ast::Expr::Unary(unary) => {
                let operand = SymExpr::try_from(*unary.operand)?;
                match unary.op.kind {
                    UnaryOpKind::Neg => Ok(-operand),
                }
            },
            ast::Expr::Binary(binary) => {
                let lhs = SymExpr::try_from(*binary.lhs)?;
                let rhs = SymExpr::try_from(*binary.rhs)?;
                Ok(match binary.op.kind {
                    BinOpKind::Exp => lhs.pow(rhs),
                    BinOpKind::Mul => lhs * rhs,
                    BinOpKind::Div => lhs / rhs,
                    BinOpKind::Add => lhs + rhs,
                    BinOpKind::Sub => lhs - rhs,
                })
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::{error::*, parse, primitive::float};
    use super::*;

    #[test]
    fn subtraction_and_division() {
        let expr = parse("a - b/c").unwrap();
        assert_eq!(expr, SymExpr::Add(vec![
            SymExpr::symbol("a"),
            SymExpr::Mul(vec![
                SymExpr::number(-1),
                SymExpr::symbol("b"),
                SymExpr::symbol("c").pow(SymExpr::number(-1)),
            ]),
        ]));
    }

    #[test]
    fn flatten_nested() {
        let expr = parse("x + (y + z)").unwrap();
        assert_eq!(expr, SymExpr::Add(vec![
            SymExpr::symbol("x"),
            SymExpr::symbol("y"),
            SymExpr::symbol("z"),
        ]));
    }

    #[test]
    fn number_kinds() {
        assert_eq!(parse("144").unwrap(), SymExpr::number(144));
        assert_eq!(parse("0.5").unwrap(), SymExpr::float(float(0.5)));
        assert_eq!(parse("-3").unwrap(), SymExpr::number(-3));
        assert_eq!(parse("1/4").unwrap(), SymExpr::fraction(1, 4));
    }

    #[test]
    fn measured() {
        let expr = parse("9.81 ± 0.5").unwrap();
        assert_eq!(expr, SymExpr::Primary(Primary::Measured {
            value: float_from_str("9.81").unwrap(),
            uncertainty: float(0.5),
        }));
    }

    #[test]
    fn derivative_call() {
        let expr = parse("diff(x, t, 2)").unwrap();
        assert_eq!(expr, SymExpr::symbol("x").derivative("t", 2));

        let expr = parse("diff(v, x)").unwrap();
        assert_eq!(expr, SymExpr::symbol("v").derivative("x", 1));
    }

    #[test]
    fn prime_notation() {
        let expr = parse("f''(t)").unwrap();
        assert_eq!(
            expr,
            SymExpr::call("f", vec![SymExpr::symbol("t")]).derivative("t", 2),
        );
    }

    #[test]
    fn integral_and_sqrt() {
        assert_eq!(parse("integral(F, x)").unwrap(), SymExpr::symbol("F").integral("x"));
        assert_eq!(
            parse("sqrt(k/m)").unwrap(),
            SymExpr::Mul(vec![
                SymExpr::symbol("k"),
                SymExpr::symbol("m").pow(SymExpr::number(-1)),
            ]).pow(SymExpr::fraction(1, 2)),
        );
    }

    #[test]
    fn diff_arity() {
        let err = parse("diff(x)").unwrap_err();
        assert_eq!(err.downcast_kind::<InvalidCallArity>(), Some(&InvalidCallArity {
            name: "diff".to_string(),
            expected: "2 or 3",
            given: 1,
        }));
    }

    #[test]
    fn diff_invalid_order() {
        assert!(parse("diff(x, t, 0)").unwrap_err().is::<InvalidDerivativeOrder>());
        assert!(parse("diff(x, t, 1.5)").unwrap_err().is::<InvalidDerivativeOrder>());
        assert!(parse("diff(x, t, n)").unwrap_err().is::<InvalidDerivativeOrder>());
    }

    #[test]
    fn diff_expects_variable() {
        let err = parse("diff(x, 2)").unwrap_err();
        assert!(err.is::<ExpectedVariable>());
        assert_eq!(err.spans, vec![8..9]);
    }

    #[test]
    fn prime_on_expression() {
        assert!(parse("f'(2t)").unwrap_err().is::<InvalidPrimeNotation>());
        assert!(parse("f'(x, y)").unwrap_err().is::<InvalidPrimeNotation>());
    }
}
