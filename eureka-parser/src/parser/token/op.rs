//! Operators of the formula grammar, with their precedence and associativity.

use crate::{
    parser::{error::UnexpectedToken, Parse, Parser},
    tokenizer::TokenKind,
};
use eureka_error::Error;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a chain of operators with the same precedence groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    /// `a - b - c` is `(a - b) - c`.
    Left,

    /// `a ^ b ^ c` is `a ^ (b ^ c)`. Prefix operators are also right-associative.
    Right,
}

/// Binding strength of an operator, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Binds nothing; the starting precedence of a full expression.
    Any,

    /// `+` and `-` between terms.
    Term,

    /// `*`, `/` and implicit multiplication between factors.
    Factor,

    /// Prefix `-`.
    Neg,

    /// `^` and `**`.
    Exp,
}

/// The unary operation that is being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnaryOpKind {
    Neg,
}

/// A prefix operator, such as the `-` in `-x^2`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnaryOp {
    pub kind: UnaryOpKind,

    /// The region of the source code that this operator was parsed from.
    pub span: Range<usize>,
}

impl UnaryOp {
    /// Returns the precedence of the operand this operator applies to. `-x^2` is `-(x^2)`, but
    /// `-a b` is `(-a) b`.
    pub fn precedence(&self) -> Precedence {
        match self.kind {
            UnaryOpKind::Neg => Precedence::Neg,
        }
    }
}

impl Parse for UnaryOp {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        match token.kind {
            TokenKind::Sub => Ok(Self { kind: UnaryOpKind::Neg, span: token.span }),
            found => Err(Error::new(vec![token.span], UnexpectedToken {
                expected: &[TokenKind::Sub],
                found,
            })),
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            UnaryOpKind::Neg => write!(f, "-"),
        }
    }
}

/// The binary operation that is being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinOpKind {
    Exp,
    Mul,
    Div,
    Add,
    Sub,
}

/// Tokens that can begin an explicit binary operator, and the operation each one stands for.
const BINARY_TOKENS: [(TokenKind, BinOpKind); 6] = [
    (TokenKind::Exp, BinOpKind::Exp),
    (TokenKind::Pow, BinOpKind::Exp),
    (TokenKind::Mul, BinOpKind::Mul),
    (TokenKind::Div, BinOpKind::Div),
    (TokenKind::Add, BinOpKind::Add),
    (TokenKind::Sub, BinOpKind::Sub),
];

impl BinOpKind {
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Exp => Precedence::Exp,
            Self::Mul | Self::Div => Precedence::Factor,
            Self::Add | Self::Sub => Precedence::Term,
        }
    }

    pub fn associativity(&self) -> Associativity {
        match self {
            Self::Exp => Associativity::Right,
            _ => Associativity::Left,
        }
    }

    /// The operator as written between two operands, with its surrounding spaces.
    fn symbol(&self) -> &'static str {
        match self {
            Self::Exp => "^",
            Self::Mul => " * ",
            Self::Div => " / ",
            Self::Add => " + ",
            Self::Sub => " - ",
        }
    }
}

/// An infix operator, either written out or implied by juxtaposition (`2 x`).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinOp {
    pub kind: BinOpKind,

    /// Whether this operator was inserted by the parser for implicit multiplication.
    pub implicit: bool,

    /// The region of the source code that this operator was parsed from.
    pub span: Range<usize>,
}

impl BinOp {
    pub fn precedence(&self) -> Precedence {
        self.kind.precedence()
    }

    pub fn associativity(&self) -> Associativity {
        self.kind.associativity()
    }
}

impl Parse for BinOp {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        let kind = BINARY_TOKENS
            .iter()
            .find(|(kind, _)| *kind == token.kind)
            .map(|(_, op)| *op);
        match kind {
            Some(kind) => Ok(Self { kind, implicit: false, span: token.span }),
            None => Err(Error::new(vec![token.span], UnexpectedToken {
                expected: &[
                    TokenKind::Exp,
                    TokenKind::Pow,
                    TokenKind::Mul,
                    TokenKind::Div,
                    TokenKind::Add,
                    TokenKind::Sub,
                ],
                found: token.kind,
            })),
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.implicit {
            write!(f, " ")
        } else {
            write!(f, "{}", self.kind.symbol())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_order() {
        assert!(Precedence::Exp > Precedence::Neg);
        assert!(Precedence::Neg > Precedence::Factor);
        assert!(Precedence::Factor > Precedence::Term);
        assert!(Precedence::Term > Precedence::Any);
    }
}
