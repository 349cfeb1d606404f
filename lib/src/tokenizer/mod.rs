/*! Implements the pattern tokenizer.

Tokenization is the first step in the compilation process. The tokenizer
takes the bytes of a pattern and produces a sequence of tokens that is
later processed by the parser. Each token is represented by a variant of
the [`Token`] type.

The input is a byte slice, not a `&str`. Patterns are byte-oriented and
don't need to be valid UTF-8; any byte that is not one of the
meta-characters is a literal.
*/

use logos::Logos;

use crate::errors::ParseError;

mod tokens;

pub use tokens::Token;

#[cfg(test)]
mod tests;

/// Takes a pattern and produces a sequence of tokens.
///
/// Escape sequences are resolved by the tokenizer itself: `\(`, `\)`,
/// `\[`, `\]`, `\+`, `\-`, `\*`, `\?` and `\^` produce the corresponding
/// literal [`Token::Char`], `\n` produces a literal newline, and any
/// other escaped byte produces [`Token::Special`]. A backslash at the
/// very end of the pattern is an error.
///
/// The tokenizer supports pushing a token back with [`Tokenizer::unget`].
/// A pushed-back token is returned by the next call to
/// [`Tokenizer::next_token`] before any further input is consumed. The
/// parser's character class routine relies on one token of pushback.
///
/// Once the end of the pattern is reached, [`Token::Eof`] is returned
/// and every subsequent call keeps returning [`Token::Eof`].
pub struct Tokenizer<'src> {
    lexer: logos::Lexer<'src, RawToken>,
    pushback: Vec<Token>,
}

impl<'src> Tokenizer<'src> {
    /// Creates a new [`Tokenizer`] for the given pattern.
    pub fn new(pattern: &'src [u8]) -> Self {
        Self { lexer: RawToken::lexer(pattern), pushback: Vec::new() }
    }

    /// Returns the next token.
    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        if let Some(token) = self.pushback.pop() {
            return Ok(token);
        }
        let token = match self.lexer.next() {
            // eof never ceases to be eof
            None => Token::Eof,
            Some(Ok(raw)) => convert_token(raw)?,
            // The catch-all pattern in RawToken accepts any byte.
            Some(Err(())) => unreachable!(),
        };
        log::trace!("next_token: {:?}", token);
        Ok(token)
    }

    /// Pushes a token back into the tokenizer.
    ///
    /// Pushed-back tokens are returned in LIFO order before any new
    /// token is read from the pattern.
    pub fn unget(&mut self, token: Token) {
        self.pushback.push(token);
    }
}

/// Tokens as recognized by the underlying [`logos`] lexer.
///
/// `RawToken` is as close to the raw input as possible. The mapping to
/// the public [`Token`] type, including the resolution of escape
/// sequences, happens in [`convert_token`].
#[derive(Logos, Debug, PartialEq)]
#[logos(source = [u8])]
enum RawToken {
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("?")]
    Question,

    #[token("^")]
    Caret,

    #[token("|")]
    Pipe,

    #[token(".")]
    Dot,

    // A backslash followed by any byte. The escaped byte is the payload.
    #[regex(r"\\[\x00-\xff]", |lex| lex.slice()[1])]
    Escape(u8),

    // Any byte that didn't match one of the tokens above. This includes a
    // backslash at the very end of the input, which `Escape` can't match.
    #[regex(r"[\x00-\xff]", |lex| lex.slice()[0], priority = 0)]
    Byte(u8),
}

fn convert_token(raw: RawToken) -> Result<Token, ParseError> {
    match raw {
        RawToken::LParen => Ok(Token::LParen),
        RawToken::RParen => Ok(Token::RParen),
        RawToken::LBracket => Ok(Token::LBracket),
        RawToken::RBracket => Ok(Token::RBracket),
        RawToken::Plus => Ok(Token::Plus),
        RawToken::Minus => Ok(Token::Minus),
        RawToken::Star => Ok(Token::Star),
        RawToken::Question => Ok(Token::Question),
        RawToken::Caret => Ok(Token::Caret),
        RawToken::Pipe => Ok(Token::Pipe),
        RawToken::Dot => Ok(Token::Dot),
        RawToken::Escape(b) => Ok(escape(b)),
        RawToken::Byte(b'\\') => Err(ParseError::TrailingEscape),
        RawToken::Byte(b) => Ok(Token::Char(b)),
    }
}

/// Resolves the byte following a backslash into a token.
fn escape(byte: u8) -> Token {
    match byte {
        b'(' | b')' | b'[' | b']' | b'+' | b'-' | b'*' | b'?' | b'^' => {
            Token::Char(byte)
        }
        b'n' => Token::Char(b'\n'),
        _ => Token::Special(byte),
    }
}
