use pretty_assertions::assert_eq;

use super::{Token, Tokenizer};
use crate::errors::ParseError;

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(pattern.as_bytes());
    let mut tokens = Vec::new();
    loop {
        let token = tokenizer.next_token().unwrap();
        tokens.push(token);
        if token == Token::Eof {
            return tokens;
        }
    }
}

#[test]
fn literals_and_meta_characters() {
    assert_eq!(
        tokenize("a+b*"),
        vec![
            Token::Char(b'a'),
            Token::Plus,
            Token::Char(b'b'),
            Token::Star,
            Token::Eof,
        ]
    );

    assert_eq!(
        tokenize("(x|y)?"),
        vec![
            Token::LParen,
            Token::Char(b'x'),
            Token::Pipe,
            Token::Char(b'y'),
            Token::RParen,
            Token::Question,
            Token::Eof,
        ]
    );

    assert_eq!(
        tokenize("[^a-z]."),
        vec![
            Token::LBracket,
            Token::Caret,
            Token::Char(b'a'),
            Token::Minus,
            Token::Char(b'z'),
            Token::RBracket,
            Token::Dot,
            Token::Eof,
        ]
    );
}

#[test]
fn escape_sequences() {
    assert_eq!(
        tokenize(r"\(\)\[\]\+\-\*\?\^"),
        vec![
            Token::Char(b'('),
            Token::Char(b')'),
            Token::Char(b'['),
            Token::Char(b']'),
            Token::Char(b'+'),
            Token::Char(b'-'),
            Token::Char(b'*'),
            Token::Char(b'?'),
            Token::Char(b'^'),
            Token::Eof,
        ]
    );

    assert_eq!(tokenize(r"\n"), vec![Token::Char(b'\n'), Token::Eof]);

    // Escapes without a literal meaning are reported as `Special`, the
    // code generator decides what to do with them.
    assert_eq!(
        tokenize(r"\w\d"),
        vec![
            Token::Special(b'w'),
            Token::Special(b'd'),
            Token::Eof,
        ]
    );
}

#[test]
fn trailing_backslash() {
    let mut tokenizer = Tokenizer::new(br"ab\");
    assert_eq!(tokenizer.next_token(), Ok(Token::Char(b'a')));
    assert_eq!(tokenizer.next_token(), Ok(Token::Char(b'b')));
    assert_eq!(tokenizer.next_token(), Err(ParseError::TrailingEscape));
}

#[test]
fn eof_is_sticky() {
    let mut tokenizer = Tokenizer::new(b"a");
    assert_eq!(tokenizer.next_token(), Ok(Token::Char(b'a')));
    assert_eq!(tokenizer.next_token(), Ok(Token::Eof));
    assert_eq!(tokenizer.next_token(), Ok(Token::Eof));
    assert_eq!(tokenizer.next_token(), Ok(Token::Eof));
}

#[test]
fn unget() {
    let mut tokenizer = Tokenizer::new(b"ab");
    assert_eq!(tokenizer.next_token(), Ok(Token::Char(b'a')));
    tokenizer.unget(Token::Minus);
    assert_eq!(tokenizer.next_token(), Ok(Token::Minus));
    assert_eq!(tokenizer.next_token(), Ok(Token::Char(b'b')));
    assert_eq!(tokenizer.next_token(), Ok(Token::Eof));
}

#[test]
fn arbitrary_bytes_are_literals() {
    assert_eq!(
        tokenize("é"),
        vec![Token::Char(0xc3), Token::Char(0xa9), Token::Eof]
    );
}
