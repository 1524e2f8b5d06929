use crate::parser::{
    ast::{expr::Expr, unary::Unary},
    token::op::{Associativity, BinOp, BinOpKind, Precedence},
    Parser,
};
use eureka_error::Error;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A binary operator, including the implicit multiplication inserted between juxtaposed
/// operands.
#[derive(Debug, Clone, PartialEq)]
enum BinOpExt {
    /// A binary operator, such as `+` or `*`.
    Op(BinOp),

    /// Implicit multiplication, such as `2x` or `4 pi epsilon_0`.
    ///
    /// This is not a real operator, but it is treated as one for the purposes of parsing.
    ImplicitMultiplication,
}

impl BinOpExt {
    /// Returns the precedence of the binary operator.
    fn precedence(&self) -> Precedence {
        match self {
            BinOpExt::Op(op) => op.precedence(),
            BinOpExt::ImplicitMultiplication => Precedence::Factor,
        }
    }
}

/// Returns true if the next token could begin the right operand of an implicit multiplication.
fn implicit_operand_ahead(input: &Parser) -> bool {
    input.peek_kind().map_or(false, |kind| kind.starts_implicit_operand())
}

/// A binary expression, such as `1 + 2`. Binary expressions can include nested expressions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Binary {
    /// The left-hand side of the binary expression.
    pub lhs: Box<Expr>,

    /// The operator of the binary expression.
    pub op: BinOp,

    /// The right-hand side of the binary expression.
    pub rhs: Box<Expr>,

    /// The region of the source code that this binary expression was parsed from.
    pub span: Range<usize>,
}

impl Binary {
    /// Returns the span of the binary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// After parsing the left-hand-side, the operator, and the right-hand-side of a potential
    /// binary expression, parse ahead to see if the right-hand-side is incomplete.
    ///
    /// In `1 + 2 * 3`, the operator after `2` binds tighter than `+`, so the expression starting
    /// with `2` is parsed first and `2 * 3` becomes the right-hand side. In `3 * 2 + 1`, it does
    /// not, so `3 * 2` is built and [`Self::parse_expr`] picks up the `+ 1` afterwards.
    ///
    /// When there is no operator after the right-hand side but another operand follows, an
    /// implicit multiplication is assumed. [`Self::parse_expr`] reports whether it consumed
    /// anything; if it did not, there is nothing more to multiply and the loop stops.
    fn complete_rhs(
        input: &mut Parser,
        lhs: Expr,
        op: BinOpExt,
        mut rhs: Expr,
    ) -> Result<Expr, Error> {
        let precedence = op.precedence();

        loop {
            // clone the input stream to emulate peeking
            let mut input_ahead = input.clone();
            if let Ok(next_op) = input_ahead.try_parse::<BinOp>() {
                if next_op.precedence() > precedence || next_op.associativity() == Associativity::Right {
                    rhs = Self::parse_expr(input, rhs, next_op.precedence())?.0;
                } else {
                    // lower precedence, or equal precedence and left-associativity: let `lhs op
                    // rhs` be built first, and the outer loop parses this operator
                    break;
                }
            } else {
                // no operator; an operand here could be implicit multiplication, but only if the
                // previous operator does not already bind at least as tightly
                if precedence >= Precedence::Factor || !implicit_operand_ahead(input) {
                    break;
                }

                let (expr, changed) = Self::parse_expr(input, rhs, Precedence::Factor)?;
                rhs = expr;

                if !changed {
                    break;
                }
            }
        }

        let (start_span, end_span) = (lhs.span().start, rhs.span().end);
        let op = match op {
            BinOpExt::Op(op) => op,
            BinOpExt::ImplicitMultiplication => BinOp {
                kind: BinOpKind::Mul,
                implicit: true,
                span: lhs.span().end..rhs.span().start,
            },
        };

        Ok(Expr::Binary(Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
            span: start_span..end_span,
        }))
    }

    /// After parsing the left-hand-side of a potential binary expression, parse ahead to see if
    /// there is a binary operator and a right-hand-side, as long as the operator binds at least
    /// as tightly as `precedence`.
    ///
    /// Returns the parsed expression, and whether anything was consumed after `lhs`.
    pub fn parse_expr(
        input: &mut Parser,
        mut lhs: Expr,
        precedence: Precedence,
    ) -> Result<(Expr, bool), Error> {
        let mut changed = false;
        loop {
            let mut input_ahead = input.clone();
            if let Ok(op) = input_ahead.try_parse::<BinOp>() {
                if op.precedence() < precedence {
                    break;
                }

                input.set_cursor(&input_ahead);
                let rhs = Unary::parse_or_lower(input)?;
                lhs = Self::complete_rhs(input, lhs, BinOpExt::Op(op), rhs)?;
            } else if Precedence::Factor >= precedence && implicit_operand_ahead(input) {
                let rhs = Unary::parse_or_lower(input)?;
                lhs = Self::complete_rhs(input, lhs, BinOpExt::ImplicitMultiplication, rhs)?;
            } else {
                break;
            }

            changed = true;
        }

        Ok((lhs, changed))
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.lhs.fmt(f)?;
        self.op.fmt(f)?;
        self.rhs.fmt(f)
    }
}
