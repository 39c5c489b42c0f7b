//! Recursive-descent parser for the boolean expression grammar:
//!
//! ```text
//! expression := or_expr
//! or_expr    := and_expr ( OR and_expr )*
//! and_expr   := not_expr ( AND not_expr )*
//! not_expr   := NOT not_expr | primary
//! primary    := TERM | LPAREN expression RPAREN
//! ```

use logfilter_core::errors::parse_error::{ParseError, ParseErrorKind};

use super::ast::AstNode;
use super::token::{Token, TokenKind};
use super::tokenizer::tokenize;

/// Parse `source` into an AST. `case_sensitive` decides whether each term
/// is attached with case-folding comparison; it is uniform across the
/// whole expression rather than a per-term flag.
pub fn parse(source: &str, case_sensitive: bool) -> Result<AstNode, ParseError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        case_fold: !case_sensitive,
    };
    let node = parser.expression()?;
    parser.expect_eof()?;
    Ok(node)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    case_fold: bool,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> &Token {
        let tok = &self.tokens[self.pos];
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect_eof(&self) -> Result<(), ParseError> {
        let tok = self.peek();
        if tok.kind == TokenKind::Eof {
            Ok(())
        } else {
            Err(ParseError::with_expected(
                ParseErrorKind::UnexpectedToken,
                tok.position,
                "end of expression",
            ))
        }
    }

    fn expression(&mut self) -> Result<AstNode, ParseError> {
        self.or_expr()
    }

    fn or_expr(&mut self) -> Result<AstNode, ParseError> {
        let mut left = self.and_expr()?;
        while self.peek().kind == TokenKind::Or {
            self.advance();
            let right = self.and_expr()?;
            left = AstNode::or(left, right);
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<AstNode, ParseError> {
        let mut left = self.not_expr()?;
        while self.peek().kind == TokenKind::And {
            self.advance();
            let right = self.not_expr()?;
            left = AstNode::and(left, right);
        }
        Ok(left)
    }

    fn not_expr(&mut self) -> Result<AstNode, ParseError> {
        if self.peek().kind == TokenKind::Not {
            self.advance();
            let child = self.not_expr()?;
            return Ok(AstNode::not(child));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<AstNode, ParseError> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::Term => {
                self.advance();
                Ok(AstNode::term(tok.lexeme, self.case_fold))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.expression()?;
                if self.peek().kind != TokenKind::RParen {
                    return Err(ParseError::with_expected(
                        ParseErrorKind::UnbalancedParen,
                        self.peek().position,
                        ")",
                    ));
                }
                self.advance();
                Ok(inner)
            }
            TokenKind::RParen => Err(ParseError::with_expected(
                ParseErrorKind::UnbalancedParen,
                tok.position,
                "term or (",
            )),
            _ => Err(ParseError::with_expected(
                ParseErrorKind::UnexpectedToken,
                tok.position,
                "term, NOT, or (",
            )),
        }
    }
}
