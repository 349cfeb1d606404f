use pretty_assertions::assert_eq;

use super::{NonTerminal, ParseTree, Parser};
use crate::errors::ParseError;
use crate::tokenizer::Token;

use NonTerminal::*;

fn parse(pattern: &str) -> ParseTree {
    Parser::new(pattern.as_bytes()).unwrap().parse().unwrap()
}

fn parse_err(pattern: &str) -> ParseError {
    Parser::new(pattern.as_bytes())
        .and_then(|parser| parser.parse())
        .expect_err("pattern should not parse")
}

fn node(kind: NonTerminal, children: Vec<ParseTree>) -> ParseTree {
    ParseTree::Node { kind, children }
}

fn leaf(token: Token) -> ParseTree {
    ParseTree::Leaf(token)
}

#[test]
fn single_literal() {
    assert_eq!(
        parse("a"),
        node(
            Regex,
            vec![node(
                Sub,
                vec![node(
                    Expr,
                    vec![node(Term, vec![leaf(Token::Char(b'a'))])]
                )]
            )]
        )
    );
}

#[test]
fn literal_meta_characters() {
    // '-', '^' and '.' reaching TERM are literal terms.
    for pattern in ["-", "^", "."] {
        let tree = parse(pattern);
        let term = tree.child(0).child(0).child(0);
        assert_eq!(term.nchildren(), 1);
        assert!(term.child(0).token().is_some());
    }
}

#[test]
fn concatenation_is_right_linear() {
    // SUB { EXPR, SUB { EXPR, SUB { EXPR } } }, no empty SUB leaf at
    // the end of the chain.
    let tree = parse("abc");
    let mut sub = tree.child(0);
    assert_eq!(sub.nchildren(), 2);
    sub = sub.child(1);
    assert_eq!(sub.nchildren(), 2);
    sub = sub.child(1);
    assert_eq!(sub.nchildren(), 1);
}

#[test]
fn quantifiers() {
    // Greedy quantifiers produce a 2-child EXPR.
    for pattern in ["a+", "a*", "a?"] {
        let tree = parse(pattern);
        let expr = tree.child(0).child(0);
        assert_eq!(expr.nchildren(), 2);
    }
    // The non-greedy variants add a trailing Question leaf.
    for pattern in ["a+?", "a*?", "a??"] {
        let tree = parse(pattern);
        let expr = tree.child(0).child(0);
        assert_eq!(expr.nchildren(), 3);
        assert_eq!(expr.child(2).token(), Some(Token::Question));
    }
}

#[test]
fn alternation() {
    let tree = parse("a|b|c");
    assert_eq!(tree.nchildren(), 3);
    assert_eq!(tree.child(1).token(), Some(Token::Pipe));
    // The remainder is itself a REGEX, right-associated.
    let rest = tree.child(2);
    assert_eq!(rest.nchildren(), 3);
    assert_eq!(rest.child(2).nchildren(), 1);
}

#[test]
fn group() {
    let tree = parse("(a)");
    let term = tree.child(0).child(0).child(0);
    assert_eq!(term.nchildren(), 3);
    assert_eq!(term.child(0).token(), Some(Token::LParen));
    assert_eq!(term.child(2).token(), Some(Token::RParen));
    // The middle child is the nested REGEX.
    assert!(matches!(
        term.child(1),
        ParseTree::Node { kind: Regex, .. }
    ));
}

#[test]
fn class_shapes() {
    // A positive class is a 3-child TERM whose first child is the
    // opening bracket. This makes it distinguishable from a group.
    let tree = parse("[a-c]");
    let term = tree.child(0).child(0).child(0);
    assert_eq!(term.nchildren(), 3);
    assert_eq!(term.child(0).token(), Some(Token::LBracket));
    assert_eq!(
        term.child(1),
        &node(
            Class,
            vec![
                leaf(Token::Char(b'a')),
                leaf(Token::Minus),
                leaf(Token::Char(b'c')),
            ]
        )
    );

    // A negated class has 4 children.
    let tree = parse("[^a-c]");
    let term = tree.child(0).child(0).child(0);
    assert_eq!(term.nchildren(), 4);
    assert_eq!(term.child(1).token(), Some(Token::Caret));

    // Ranges and single characters chain right-linearly.
    let tree = parse("[a-cx]");
    let term = tree.child(0).child(0).child(0);
    assert_eq!(
        term.child(1),
        &node(
            Class,
            vec![
                leaf(Token::Char(b'a')),
                leaf(Token::Minus),
                leaf(Token::Char(b'c')),
                node(Class, vec![leaf(Token::Char(b'x'))]),
            ]
        )
    );
}

#[test]
fn class_trailing_minus() {
    // The '-' before ']' is not a range, the parser pushes it back and
    // re-reads it as a literal.
    let tree = parse("[a-]");
    let term = tree.child(0).child(0).child(0);
    assert_eq!(
        term.child(1),
        &node(
            Class,
            vec![
                leaf(Token::Char(b'a')),
                node(Class, vec![leaf(Token::Minus)]),
            ]
        )
    );

    // A lone '-' is a class of its own.
    let tree = parse("[-]");
    let term = tree.child(0).child(0).child(0);
    assert_eq!(term.child(1), &node(Class, vec![leaf(Token::Minus)]));
}

#[test]
fn class_reinterprets_meta_characters() {
    // CCHAR: '.', '(', ')', '+', '*', '?' and '|' are literals inside a
    // class.
    let tree = parse("[.()+*?|]");
    let term = tree.child(0).child(0).child(0);
    let mut class = term.child(1);
    let mut chars = Vec::new();
    loop {
        match class.nchildren() {
            1 => {
                chars.push(class.child(0).token().unwrap());
                break;
            }
            2 => {
                chars.push(class.child(0).token().unwrap());
                class = class.child(1);
            }
            n => panic!("unexpected class shape with {} children", n),
        }
    }
    assert_eq!(
        chars,
        vec![
            Token::Char(b'.'),
            Token::Char(b'('),
            Token::Char(b')'),
            Token::Char(b'+'),
            Token::Char(b'*'),
            Token::Char(b'?'),
            Token::Char(b'|'),
        ]
    );
}

#[test]
fn errors() {
    assert_eq!(
        parse_err("(a"),
        ParseError::UnexpectedToken { expected: "`)`", found: "end of pattern" }
    );
    assert_eq!(
        parse_err("[ab"),
        ParseError::UnexpectedToken { expected: "`]`", found: "end of pattern" }
    );
    assert_eq!(
        parse_err("*a"),
        ParseError::UnexpectedTerm { found: "`*`" }
    );
    assert_eq!(
        parse_err("a|"),
        ParseError::UnexpectedTerm { found: "end of pattern" }
    );
    assert_eq!(parse_err(""), ParseError::UnexpectedTerm {
        found: "end of pattern"
    });
    assert_eq!(parse_err("a\\"), ParseError::TrailingEscape);
    assert_eq!(
        parse_err("[]"),
        ParseError::UnexpectedToken {
            expected: "class character",
            found: "`]`"
        }
    );
    // A quantifier can not be quantified.
    assert_eq!(
        parse_err("a**"),
        ParseError::UnexpectedTerm { found: "`*`" }
    );
}
