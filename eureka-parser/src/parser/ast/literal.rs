use crate::{
    parser::{
        error::UnexpectedToken,
        token::{Name, PlusMinus},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use eureka_error::Error;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A number literal, such as `12` or `3.14`. The digits are kept as written so that the
/// consumer can decide how to represent the value (integers are exact, decimals are not).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitNum {
    /// The digits of the number literal, as written.
    pub lexeme: String,

    /// Whether the literal contains a decimal point.
    pub decimal: bool,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitNum {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        let decimal = match token.kind {
            TokenKind::Int => false,
            TokenKind::Float => true,
            _ => return Err(Error::new(vec![token.span], UnexpectedToken {
                expected: &[TokenKind::Int, TokenKind::Float],
                found: token.kind,
            })),
        };

        Ok(Self {
            lexeme: token.lexeme.to_owned(),
            decimal,
            span: token.span,
        })
    }
}

impl fmt::Display for LitNum {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.lexeme)
    }
}

/// A measured value with an absolute uncertainty, such as `9.81 ± 0.02`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitMeasured {
    /// The central value.
    pub value: LitNum,

    /// The absolute uncertainty of the value.
    pub uncertainty: LitNum,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl fmt::Display for LitMeasured {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ± {}", self.value, self.uncertainty)
    }
}

/// A symbol / identifier literal. Symbols are used to represent quantities and functions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitSym {
    /// The name of the symbol.
    pub name: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitSym {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.try_parse::<Name>()?;
        Ok(Self {
            name: token.lexeme,
            span: token.span,
        })
    }
}

impl fmt::Display for LitSym {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Represents a literal value written directly into a formula.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Literal {
    /// A number literal.
    Number(LitNum),

    /// A number literal with an uncertainty.
    Measured(LitMeasured),

    /// A symbol / identifier literal.
    Symbol(LitSym),
}

impl Literal {
    /// Returns the span of the literal.
    pub fn span(&self) -> Range<usize> {
        match self {
            Literal::Number(num) => num.span.clone(),
            Literal::Measured(measured) => measured.span.clone(),
            Literal::Symbol(name) => name.span.clone(),
        }
    }
}

impl Parse for Literal {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        if input.peek_kind() == Some(TokenKind::Name) {
            return input.try_parse::<LitSym>().map(Literal::Symbol);
        }

        let value = input.try_parse::<LitNum>()?;
        if input.peek_kind() != Some(TokenKind::PlusMinus) {
            return Ok(Literal::Number(value));
        }

        input.try_parse::<PlusMinus>()?;
        let uncertainty = LitNum::parse(input)?;
        let span = value.span.start..uncertainty.span.end;
        Ok(Literal::Measured(LitMeasured { value, uncertainty, span }))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Number(num) => num.fmt(f),
            Literal::Measured(measured) => measured.fmt(f),
            Literal::Symbol(sym) => sym.fmt(f),
        }
    }
}
