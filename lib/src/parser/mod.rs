/*! A handwritten recursive-descent parser for patterns.

The parser receives tokens produced by the [`Tokenizer`] and builds a
[`ParseTree`] for this grammar:

```text
REGEX → SUB | SUB '|' REGEX
SUB   → EXPR | EXPR SUB
EXPR  → TERM | TERM '+' '?'? | TERM '*' '?'? | TERM '?' '?'?
TERM  → char | '.' | '-' | '^' | special
      | '(' REGEX ')'
      | '[' CLASS ']'
      | '[' '^' CLASS ']'
CLASS → CCHAR '-' CCHAR CLASS | CCHAR '-' CCHAR
      | CCHAR CLASS | CCHAR | '-'
CCHAR → char | '.' | '(' | ')' | '+' | '*' | '?' | '|'
```

The tree deliberately mirrors the grammar instead of abstracting over it:
every non-terminal becomes a [`ParseTree::Node`] whose child count
records which production was taken. The code generator dispatches on
those shapes.
*/

use crate::errors::ParseError;
use crate::tokenizer::{Token, Tokenizer};

#[cfg(test)]
mod tests;

/// The non-terminal symbols of the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonTerminal {
    Term,
    Expr,
    Regex,
    Sub,
    Class,
}

/// A node in the parse tree.
///
/// Leaves hold the terminal's token. Nodes hold a non-terminal kind and
/// its children, at most four of them. The child count identifies the
/// production:
///
/// * `TERM` with 1 child is a literal, 3 children starting with `(` is a
///   group, 3 children starting with `[` is a character class, 4
///   children is a negated character class.
/// * `EXPR` with 1 child is a bare term, 2 children is a greedy
///   quantifier, 3 children is a non-greedy quantifier.
/// * `SUB` and `CLASS` are right-linear chains; a node with a trailing
///   child of the same kind continues the chain.
/// * `REGEX` with 1 child is a plain subexpression, 3 children is an
///   alternation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseTree {
    Leaf(Token),
    Node { kind: NonTerminal, children: Vec<ParseTree> },
}

impl ParseTree {
    /// Returns the number of children, 0 for leaves.
    pub fn nchildren(&self) -> usize {
        match self {
            ParseTree::Leaf(_) => 0,
            ParseTree::Node { children, .. } => children.len(),
        }
    }

    /// Returns the i-th child.
    ///
    /// # Panics
    ///
    /// If the node is a leaf or the index is out of bounds.
    pub fn child(&self, i: usize) -> &ParseTree {
        match self {
            ParseTree::Leaf(_) => panic!("leaf nodes have no children"),
            ParseTree::Node { children, .. } => &children[i],
        }
    }

    /// Returns the token of a leaf node, `None` for non-terminal nodes.
    pub fn token(&self) -> Option<Token> {
        match self {
            ParseTree::Leaf(token) => Some(*token),
            ParseTree::Node { .. } => None,
        }
    }

    fn node(kind: NonTerminal, children: Vec<ParseTree>) -> Self {
        debug_assert!(!children.is_empty() && children.len() <= 4);
        ParseTree::Node { kind, children }
    }
}

/// Parses a pattern into a [`ParseTree`].
pub struct Parser<'src> {
    tokens: Tokenizer<'src>,
    tok: Token,
}

impl<'src> Parser<'src> {
    /// Creates a new parser for the given pattern.
    pub fn new(pattern: &'src [u8]) -> Result<Self, ParseError> {
        let mut tokens = Tokenizer::new(pattern);
        let tok = tokens.next_token()?;
        Ok(Self { tokens, tok })
    }

    /// Consumes the parser and returns the parse tree for the whole
    /// pattern.
    pub fn parse(mut self) -> Result<ParseTree, ParseError> {
        let tree = self.regex()?;
        self.expect(Token::Eof)?;
        Ok(tree)
    }
}

// Parser private API.
impl<'src> Parser<'src> {
    /// Consumes the current token and returns it, advancing to the next
    /// one.
    fn advance(&mut self) -> Result<Token, ParseError> {
        let tok = self.tok;
        self.tok = self.tokens.next_token()?;
        Ok(tok)
    }

    /// Consumes the current token if it has the same kind as `expected`,
    /// failing otherwise.
    fn expect(&mut self, expected: Token) -> Result<Token, ParseError> {
        if std::mem::discriminant(&self.tok) == std::mem::discriminant(&expected)
        {
            self.advance()
        } else {
            Err(ParseError::UnexpectedToken {
                expected: expected.description(),
                found: self.tok.description(),
            })
        }
    }
}

// Grammar rules.
//
// Each method parses the non-terminal it is named after and returns its
// parse tree node. The current token is the parser's one-token lookahead;
// a method is called with the lookahead at the first token of its
// production and returns with the lookahead at the first token after it.
impl<'src> Parser<'src> {
    /// Parses a full regular expression.
    ///
    /// ```text
    /// REGEX → SUB | SUB '|' REGEX
    /// ```
    fn regex(&mut self) -> Result<ParseTree, ParseError> {
        let sub = self.sub()?;
        if self.tok == Token::Pipe {
            let pipe = ParseTree::Leaf(self.advance()?);
            let rest = self.regex()?;
            Ok(ParseTree::node(NonTerminal::Regex, vec![sub, pipe, rest]))
        } else {
            Ok(ParseTree::node(NonTerminal::Regex, vec![sub]))
        }
    }

    /// Parses a concatenation of expressions.
    ///
    /// ```text
    /// SUB → EXPR | EXPR SUB
    /// ```
    ///
    /// The chain ends when the lookahead can not start another EXPR,
    /// which happens at the end of the pattern, at `)` and at `|`. The
    /// resulting chain is right-linear and never contains an empty SUB.
    fn sub(&mut self) -> Result<ParseTree, ParseError> {
        let expr = self.expr()?;
        if matches!(self.tok, Token::Eof | Token::RParen | Token::Pipe) {
            Ok(ParseTree::node(NonTerminal::Sub, vec![expr]))
        } else {
            let rest = self.sub()?;
            Ok(ParseTree::node(NonTerminal::Sub, vec![expr, rest]))
        }
    }

    /// Parses a term with an optional quantifier.
    ///
    /// ```text
    /// EXPR → TERM | TERM '+' '?'? | TERM '*' '?'? | TERM '?' '?'?
    /// ```
    ///
    /// A trailing `?` after the quantifier makes it non-greedy and adds
    /// a third child to the node.
    fn expr(&mut self) -> Result<ParseTree, ParseError> {
        let term = self.term()?;
        let mut children = vec![term];
        if matches!(self.tok, Token::Plus | Token::Star | Token::Question) {
            children.push(ParseTree::Leaf(self.advance()?));
            if self.tok == Token::Question {
                children.push(ParseTree::Leaf(self.advance()?));
            }
        }
        Ok(ParseTree::node(NonTerminal::Expr, children))
    }

    /// Parses a single term.
    ///
    /// ```text
    /// TERM → char | '.' | '-' | '^' | special
    ///      | '(' REGEX ')'
    ///      | '[' CLASS ']'
    ///      | '[' '^' CLASS ']'
    /// ```
    ///
    /// `-` and `^` reaching this rule are ordinary literals; `.` keeps
    /// its any-character meaning, the code generator handles it.
    fn term(&mut self) -> Result<ParseTree, ParseError> {
        match self.tok {
            Token::Char(_)
            | Token::Special(_)
            | Token::Dot
            | Token::Minus
            | Token::Caret => {
                let leaf = ParseTree::Leaf(self.advance()?);
                Ok(ParseTree::node(NonTerminal::Term, vec![leaf]))
            }
            Token::LParen => {
                let lparen = ParseTree::Leaf(self.advance()?);
                let regex = self.regex()?;
                let rparen = ParseTree::Leaf(self.expect(Token::RParen)?);
                Ok(ParseTree::node(
                    NonTerminal::Term,
                    vec![lparen, regex, rparen],
                ))
            }
            Token::LBracket => {
                let lbracket = ParseTree::Leaf(self.advance()?);
                if self.tok == Token::Caret {
                    let caret = ParseTree::Leaf(self.advance()?);
                    let class = self.class()?;
                    let rbracket =
                        ParseTree::Leaf(self.expect(Token::RBracket)?);
                    Ok(ParseTree::node(
                        NonTerminal::Term,
                        vec![lbracket, caret, class, rbracket],
                    ))
                } else {
                    let class = self.class()?;
                    let rbracket =
                        ParseTree::Leaf(self.expect(Token::RBracket)?);
                    Ok(ParseTree::node(
                        NonTerminal::Term,
                        vec![lbracket, class, rbracket],
                    ))
                }
            }
            found => {
                Err(ParseError::UnexpectedTerm { found: found.description() })
            }
        }
    }

    /// Parses the body of a character class.
    ///
    /// ```text
    /// CLASS → CCHAR '-' CCHAR CLASS | CCHAR '-' CCHAR
    ///       | CCHAR CLASS | CCHAR | '-'
    /// ```
    ///
    /// Meta-characters other than `]`, `^` and `-` are reinterpreted as
    /// literals here (the CCHAR rule); their leaves are normalized to
    /// plain character tokens. A `-` that is not between two class
    /// characters requires one token of pushback: after consuming it the
    /// parser may find that no class character follows, in which case the
    /// lookahead goes back to the tokenizer and the `-` becomes the
    /// current token again.
    fn class(&mut self) -> Result<ParseTree, ParseError> {
        if let Some(c1) = self.tok.class_literal() {
            self.advance()?;
            let lo = ParseTree::Leaf(Token::Char(c1));
            if self.tok == Token::Minus {
                let minus = self.advance()?;
                if let Some(c2) = self.tok.class_literal() {
                    // CCHAR '-' CCHAR, a range.
                    self.advance()?;
                    let mut children = vec![
                        lo,
                        ParseTree::Leaf(Token::Minus),
                        ParseTree::Leaf(Token::Char(c2)),
                    ];
                    if self.class_continues() {
                        children.push(self.class()?);
                    }
                    return Ok(ParseTree::node(NonTerminal::Class, children));
                }
                // The '-' did not start a range. Put the lookahead back
                // and let the next round see the '-' again.
                self.tokens.unget(self.tok);
                self.tok = minus;
            }
            // A single class character.
            let mut children = vec![lo];
            if self.class_continues() {
                children.push(self.class()?);
            }
            Ok(ParseTree::node(NonTerminal::Class, children))
        } else if self.tok == Token::Minus {
            // A lone '-' is a literal and always ends the class body.
            self.advance()?;
            Ok(ParseTree::node(
                NonTerminal::Class,
                vec![ParseTree::Leaf(Token::Minus)],
            ))
        } else {
            Err(ParseError::UnexpectedToken {
                expected: "class character",
                found: self.tok.description(),
            })
        }
    }

    /// Returns true if the lookahead can start another CLASS item.
    fn class_continues(&self) -> bool {
        self.tok.class_literal().is_some() || self.tok == Token::Minus
    }
}
