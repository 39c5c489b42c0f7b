//! Lexer for the boolean search expression language.
//!
//! Deterministic, O(n) in input length, allocates only the token vector
//! (plus per-term lexeme strings).

use logfilter_core::errors::parse_error::{ParseError, ParseErrorKind};

use super::token::{Token, TokenKind};

/// Tokenize `source` into a token stream terminated by `Eof`.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    if source.trim().is_empty() {
        return Err(ParseError::new(ParseErrorKind::EmptyExpression, 0));
    }

    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(i, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        match c {
            '(' => {
                tokens.push(Token::new(TokenKind::LParen, "(", i));
                chars.next();
            }
            ')' => {
                tokens.push(Token::new(TokenKind::RParen, ")", i));
                chars.next();
            }
            '"' => {
                let (lexeme, consumed) = read_quoted(&source[i..])
                    .ok_or(ParseError::new(ParseErrorKind::UnterminatedString, i))?;
                tokens.push(Token::new(TokenKind::Term, lexeme, i));
                let end = i + consumed;
                while matches!(chars.peek(), Some(&(j, _)) if j < end) {
                    chars.next();
                }
            }
            _ => {
                let start = i;
                let mut end = i;
                while let Some(&(j, ch)) = chars.peek() {
                    if ch.is_whitespace() || ch == '(' || ch == ')' {
                        break;
                    }
                    end = j + ch.len_utf8();
                    chars.next();
                }
                let word = &source[start..end];
                tokens.push(bare_word_token(word, start));
            }
        }
    }

    tokens.push(Token::new(TokenKind::Eof, "", source.len()));
    Ok(tokens)
}

/// Classify a maximal non-whitespace, non-paren run as an operator or a term.
fn bare_word_token(word: &str, position: usize) -> Token {
    let kind = match word.to_ascii_uppercase().as_str() {
        "AND" => TokenKind::And,
        "OR" => TokenKind::Or,
        "NOT" => TokenKind::Not,
        _ => TokenKind::Term,
    };
    Token::new(kind, word, position)
}

/// Parse a `"..."` span starting at `input[0] == '"'`. Returns the unescaped
/// lexeme and the number of source bytes consumed (including both quotes).
fn read_quoted(input: &str) -> Option<(String, usize)> {
    let mut chars = input.char_indices();
    let (_, opening) = chars.next()?;
    debug_assert_eq!(opening, '"');

    let mut out = String::new();
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '"' => {
                let consumed = idx + ch.len_utf8();
                return Some((out, consumed));
            }
            '\\' => match chars.next() {
                Some((_, '"')) => out.push('"'),
                Some((_, '\\')) => out.push('\\'),
                Some((_, other)) => {
                    out.push('\\');
                    out.push(other);
                }
                None => return None,
            },
            other => out.push(other),
        }
    }
    None
}
