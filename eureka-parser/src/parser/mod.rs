pub mod ast;
pub mod error;
pub mod token;

use crate::tokenizer::{tokenize_complete, Token, TokenKind};
use eureka_error::{Error, ErrorKind};
use std::ops::Range;

/// A high-level parser for formulae. This is the type to use to parse an arbitrary formula into
/// an abstract syntax tree.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
        }
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the span of the current token, or the end of the source code if the cursor is at
    /// the end of the stream.
    pub fn span(&self) -> Range<usize> {
        self.tokens
            .get(self.cursor)
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Returns the current token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the end of the stream.
    pub fn current_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor)
    }

    /// Returns the next non-whitespace token without moving the cursor.
    pub fn peek_token(&self) -> Option<&Token<'source>> {
        self.tokens[self.cursor.min(self.tokens.len())..]
            .iter()
            .find(|token| !token.is_whitespace())
    }

    /// Returns the kind of the next non-whitespace token without moving the cursor.
    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.peek_token().map(|token| token.kind)
    }

    /// Returns the next token to be parsed, then advances the cursor. Whitespace tokens are
    /// skipped.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        while self.cursor < self.tokens.len() {
            let token = &self.tokens[self.cursor];
            self.cursor += 1;
            if token.is_whitespace() {
                continue;
            } else {
                // cloning is cheap: only Range<_> is cloned
                return Ok(token.clone());
            }
        }

        Err(self.error(error::UnexpectedEof))
    }

    /// Moves this parser's cursor to the cursor of `other`, a clone of this parser that was used
    /// to look ahead.
    pub(crate) fn set_cursor(&mut self, other: &Parser) {
        self.cursor = other.cursor;
    }

    /// Advances the cursor past any whitespace tokens.
    pub fn skip_whitespace(&mut self) {
        while self.current_token().map_or(false, Token::is_whitespace) {
            self.cursor += 1;
        }
    }

    /// Speculatively parses a value from the given stream of tokens. This function can be used
    /// in the [`Parse::parse`] implementation of a type with the given [`Parser`], as it will
    /// automatically backtrack the cursor position if parsing fails.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse<T: Parse>(&mut self) -> Result<T, Error> {
        self.try_parse_with_fn(T::parse)
    }

    /// Speculatively parses a value from the given stream of tokens, using a custom parsing
    /// function to parse the value.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse_with_fn<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Parser) -> Result<T, Error>,
    {
        let start = self.cursor;
        match f(self) {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Attempts to parse a value from the given stream of tokens. All the tokens must be consumed
    /// by the parser (trailing whitespace is allowed); if not, an error is returned.
    pub fn try_parse_full<T: Parse>(&mut self) -> Result<T, Error> {
        let value = T::parse(self)?;
        self.skip_whitespace();
        if self.cursor == self.tokens.len() {
            Ok(value)
        } else {
            Err(Error::new(vec![self.span().start..self.eof_span().end], error::ExpectedEof))
        }
    }
}

/// Any type that can be parsed from a source of tokens.
pub trait Parse: Sized {
    /// Parses a value from the given stream of tokens, advancing the stream past the consumed
    /// tokens if parsing is successful.
    ///
    /// This function should be used by consumers of the library.
    fn parse(input: &mut Parser) -> Result<Self, Error>;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use ast::{
        binary::Binary,
        call::Call,
        equation::Equation,
        expr::Expr,
        literal::{Literal, LitMeasured, LitNum, LitSym},
        paren::Paren,
        unary::Unary,
    };
    use token::op::{BinOp, BinOpKind, UnaryOp, UnaryOpKind};

    fn sym(name: &str, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Symbol(LitSym { name: name.to_string(), span }))
    }

    fn int(lexeme: &str, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Number(LitNum { lexeme: lexeme.to_string(), decimal: false, span }))
    }

    fn binary(lhs: Expr, kind: BinOpKind, op_span: Range<usize>, rhs: Expr) -> Expr {
        let span = lhs.span().start..rhs.span().end;
        Expr::Binary(Binary {
            lhs: Box::new(lhs),
            op: BinOp { kind, implicit: false, span: op_span },
            rhs: Box::new(rhs),
            span,
        })
    }

    fn implicit(lhs: Expr, rhs: Expr) -> Expr {
        let span = lhs.span().start..rhs.span().end;
        let op_span = lhs.span().end..rhs.span().start;
        Expr::Binary(Binary {
            lhs: Box::new(lhs),
            op: BinOp { kind: BinOpKind::Mul, implicit: true, span: op_span },
            rhs: Box::new(rhs),
            span,
        })
    }

    fn parse_err(source: &str) -> Error {
        Parser::new(source).try_parse_full::<Expr>().unwrap_err()
    }

    #[test]
    fn literal_int() {
        let mut parser = Parser::new("16");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, int("16", 0..2));
    }

    #[test]
    fn literal_float() {
        let mut parser = Parser::new("3.14");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, Expr::Literal(Literal::Number(LitNum {
            lexeme: "3.14".to_string(),
            decimal: true,
            span: 0..4,
        })));
    }

    #[test]
    fn literal_measured() {
        let mut parser = Parser::new("9.81 ± 0.02");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        // `±` is two bytes long
        assert_eq!(expr, Expr::Literal(Literal::Measured(LitMeasured {
            value: LitNum { lexeme: "9.81".to_string(), decimal: true, span: 0..4 },
            uncertainty: LitNum { lexeme: "0.02".to_string(), decimal: true, span: 8..12 },
            span: 0..12,
        })));
    }

    #[test]
    fn binary_left_associativity() {
        let mut parser = Parser::new("3 - 2 - 1");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, binary(
            binary(int("3", 0..1), BinOpKind::Sub, 2..3, int("2", 4..5)),
            BinOpKind::Sub,
            6..7,
            int("1", 8..9),
        ));
    }

    #[test]
    fn binary_right_associativity() {
        let mut parser = Parser::new("a^b^c");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, binary(
            sym("a", 0..1),
            BinOpKind::Exp,
            1..2,
            binary(sym("b", 2..3), BinOpKind::Exp, 3..4, sym("c", 4..5)),
        ));
    }

    #[test]
    fn binary_mix_precedence() {
        let mut parser = Parser::new("F + m*a");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, binary(
            sym("F", 0..1),
            BinOpKind::Add,
            2..3,
            binary(sym("m", 4..5), BinOpKind::Mul, 5..6, sym("a", 6..7)),
        ));
    }

    #[test]
    fn double_star_power() {
        let mut parser = Parser::new("C3**2");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, binary(sym("C3", 0..2), BinOpKind::Exp, 2..4, int("2", 4..5)));
    }

    #[test]
    fn unary_binds_looser_than_power() {
        let mut parser = Parser::new("-x^2");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, Expr::Unary(Unary {
            operand: Box::new(binary(sym("x", 1..2), BinOpKind::Exp, 2..3, int("2", 3..4))),
            op: UnaryOp { kind: UnaryOpKind::Neg, span: 0..1 },
            span: 0..4,
        }));
    }

    #[test]
    fn negative_exponent() {
        let mut parser = Parser::new("C^-1");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, binary(
            sym("C", 0..1),
            BinOpKind::Exp,
            1..2,
            Expr::Unary(Unary {
                operand: Box::new(int("1", 3..4)),
                op: UnaryOp { kind: UnaryOpKind::Neg, span: 2..3 },
                span: 2..4,
            }),
        ));
    }

    #[test]
    fn implicit_multiplication() {
        let mut parser = Parser::new("2x^2");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, implicit(
            int("2", 0..1),
            binary(sym("x", 1..2), BinOpKind::Exp, 2..3, int("2", 3..4)),
        ));
    }

    #[test]
    fn implicit_multiplication_chain() {
        let mut parser = Parser::new("1 + 4 pi c");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, binary(
            int("1", 0..1),
            BinOpKind::Add,
            2..3,
            implicit(implicit(int("4", 4..5), sym("pi", 6..8)), sym("c", 9..10)),
        ));
    }

    #[test]
    fn implicit_multiplication_with_paren() {
        let mut parser = Parser::new("m (v + 1)");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, implicit(
            sym("m", 0..1),
            Expr::Paren(Paren {
                expr: Box::new(binary(sym("v", 3..4), BinOpKind::Add, 5..6, int("1", 7..8))),
                span: 2..9,
            }),
        ));
    }

    #[test]
    fn function_call() {
        let mut parser = Parser::new("cos(w*t)");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, Expr::Call(Call {
            name: LitSym { name: "cos".to_string(), span: 0..3 },
            derivatives: 0,
            args: vec![binary(sym("w", 4..5), BinOpKind::Mul, 5..6, sym("t", 6..7))],
            span: 0..8,
            paren_span: 3..8,
        }));
    }

    #[test]
    fn function_call_many_args() {
        let mut parser = Parser::new("diff(x, t, 2)");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, Expr::Call(Call {
            name: LitSym { name: "diff".to_string(), span: 0..4 },
            derivatives: 0,
            args: vec![sym("x", 5..6), sym("t", 8..9), int("2", 11..12)],
            span: 0..13,
            paren_span: 4..13,
        }));
    }

    #[test]
    fn prime_call() {
        let mut parser = Parser::new("x''(t)");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, Expr::Call(Call {
            name: LitSym { name: "x".to_string(), span: 0..1 },
            derivatives: 2,
            args: vec![sym("t", 4..5)],
            span: 0..6,
            paren_span: 3..6,
        }));
    }

    #[test]
    fn paren_innermost() {
        let mut parser = Parser::new("((x))");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        match expr {
            Expr::Paren(paren) => assert_eq!(paren.innermost(), &sym("x", 2..3)),
            other => panic!("expected a parenthesized expression, got {:?}", other),
        }
    }

    #[test]
    fn equation() {
        let mut parser = Parser::new("F = m a");
        let equation = parser.try_parse_full::<Equation>().unwrap();
        assert_eq!(equation, Equation {
            lhs: sym("F", 0..1),
            rhs: implicit(sym("m", 4..5), sym("a", 6..7)),
            span: 0..7,
        });
    }

    #[test]
    fn display_round_trip_text() {
        let mut parser = Parser::new("m*diff(x, t, 2) + k x = -(1/2)");
        let equation = parser.try_parse_full::<Equation>().unwrap();
        assert_eq!(equation.to_string(), "m * diff(x, t, 2) + k x = -(1 / 2)");
    }

    #[test]
    fn error_unexpected_eof() {
        let err = parse_err("1 +");
        assert!(err.is::<error::UnexpectedEof>());
    }

    #[test]
    fn error_expected_eof() {
        let err = parse_err("x )");
        assert!(err.is::<error::ExpectedEof>());
        assert_eq!(err.spans, vec![2..3]);
    }

    #[test]
    fn error_unclosed_paren() {
        let err = parse_err("(x + 1");
        assert_eq!(
            err.downcast_kind::<error::UnclosedParenthesis>(),
            Some(&error::UnclosedParenthesis { opening: true }),
        );
        assert_eq!(err.spans, vec![0..1]);
    }

    #[test]
    fn error_leading_close_paren() {
        let err = parse_err(") + x");
        assert_eq!(
            err.downcast_kind::<error::UnclosedParenthesis>(),
            Some(&error::UnclosedParenthesis { opening: false }),
        );
    }

    #[test]
    fn error_empty_paren() {
        let err = parse_err("2 * ()");
        assert!(err.is::<error::EmptyParenthesis>());
        assert_eq!(err.spans, vec![4..6]);
    }

    #[test]
    fn error_unexpected_token() {
        let err = parse_err("x * $");
        assert_eq!(
            err.downcast_kind::<error::UnexpectedToken>().map(|kind| kind.found),
            Some(TokenKind::Symbol),
        );
    }

    #[test]
    fn error_missing_equals() {
        let err = Parser::new("F m a").try_parse_full::<Equation>().unwrap_err();
        assert!(err.is::<error::ExpectedEquation>());
    }
}
