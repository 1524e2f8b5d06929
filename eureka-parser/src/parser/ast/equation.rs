use crate::{
    parser::{
        ast::expr::Expr,
        error::ExpectedEquation,
        token::Assign,
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use eureka_error::Error;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An equation between two expressions, such as `F = m a`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Equation {
    /// The left-hand side of the equation.
    pub lhs: Expr,

    /// The right-hand side of the equation.
    pub rhs: Expr,

    /// The region of the source code that this equation was parsed from.
    pub span: Range<usize>,
}

impl Equation {
    /// Returns the span of the equation.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl Parse for Equation {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let lhs = input.try_parse::<Expr>()?;

        let next = input.peek_token().map(|token| (token.kind, token.span.clone()));
        match next {
            Some((TokenKind::Assign, _)) => (),
            Some((_, span)) => return Err(Error::new(vec![span], ExpectedEquation)),
            None => return Err(Error::new(vec![input.eof_span()], ExpectedEquation)),
        }
        input.try_parse::<Assign>()?;

        let rhs = input.try_parse::<Expr>()?;
        let span = lhs.span().start..rhs.span().end;
        Ok(Self { lhs, rhs, span })
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}
