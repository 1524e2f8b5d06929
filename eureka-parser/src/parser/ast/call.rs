use crate::{
    parser::{
        ast::{expr::Expr, literal::LitSym},
        error::{UnclosedParenthesis, UnexpectedToken},
        token::{CloseParen, Comma, OpenParen, Quote},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use eureka_error::Error;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A function call, such as `cos(w*t)`, `diff(x, t, 2)` or `x''(t)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Call {
    /// The name of the function to call.
    pub name: LitSym,

    /// The number of prime marks after the name, each denoting one derivative of the function
    /// with respect to its (single) argument.
    pub derivatives: u8,

    /// The arguments to the function.
    pub args: Vec<Expr>,

    /// The region of the source code that this function call was parsed from.
    pub span: Range<usize>,

    /// The span of the parentheses that surround the arguments.
    pub paren_span: Range<usize>,
}

impl Call {
    /// Returns the span of the function call.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns a set of two spans, where the first is the span of the function name (with the
    /// opening parenthesis) and the second is the span of the closing parenthesis.
    pub fn outer_span(&self) -> [Range<usize>; 2] {
        [
            self.name.span.start..self.paren_span.start + 1,
            self.paren_span.end - 1..self.paren_span.end,
        ]
    }

    /// Returns true if the tokens at the cursor form the start of a call: a name, any number of
    /// prime marks, then an opening parenthesis with no whitespace in between.
    pub(crate) fn starts_here(input: &Parser) -> bool {
        let mut ahead = input.clone();
        if ahead.try_parse::<LitSym>().is_err() {
            return false;
        }

        while ahead.current_token().map(|token| token.kind) == Some(TokenKind::Quote) {
            if ahead.try_parse::<Quote>().is_err() {
                return false;
            }
        }

        ahead.current_token().map(|token| token.kind) == Some(TokenKind::OpenParen)
    }
}

impl Parse for Call {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let name = input.try_parse::<LitSym>()?;

        let mut derivatives = 0u8;
        while input.current_token().map(|token| token.kind) == Some(TokenKind::Quote) {
            input.try_parse::<Quote>()?;
            derivatives = derivatives.saturating_add(1);
        }

        let open_paren = input.try_parse::<OpenParen>()?;
        let mut args = Vec::new();
        if input.peek_kind() != Some(TokenKind::CloseParen) {
            loop {
                args.push(input.try_parse::<Expr>()?);
                let next = input.peek_token().map(|token| (token.kind, token.span.clone()));
                match next {
                    Some((TokenKind::Comma, _)) => {
                        input.try_parse::<Comma>()?;
                    },
                    Some((TokenKind::CloseParen, _)) => break,
                    Some((found, span)) => return Err(Error::new(vec![span], UnexpectedToken {
                        expected: &[TokenKind::Comma, TokenKind::CloseParen],
                        found,
                    })),
                    None => return Err(Error::new(
                        vec![open_paren.span],
                        UnclosedParenthesis { opening: true },
                    )),
                }
            }
        }

        let close_paren = input.try_parse::<CloseParen>()?;
        Ok(Self {
            span: name.span.start..close_paren.span.end,
            name,
            derivatives,
            args,
            paren_span: open_paren.span.start..close_paren.span.end,
        })
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for _ in 0..self.derivatives {
            write!(f, "'")?;
        }
        write!(f, "(")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            arg.fmt(f)?;
        }
        write!(f, ")")
    }
}
