//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure:
//! the error type, cursor helpers, the rule dispatcher and the two bounded
//! scans every recognizer is built from.
//!
//! # Parser Architecture
//!
//! The parser is shape directed. [`Parser::select_rule`] looks at the head
//! token plus at most one token of lookahead and picks exactly one [`Rule`];
//! [`Parser::step`] runs the recognizer for that rule and appends whatever it
//! produced to the caller's accumulator.
//!
//! Constructs are then assembled from two bounded scans:
//! - [`Parser::greedy_until`] steps until the target symbol reaches the head,
//!   then consumes it and includes it in the result;
//! - [`Parser::non_greedy_until`] stops with the target still at the head so
//!   the caller can branch on it.
//!
//! A step that meets `(`, `[` or an opening construct keyword resolves the
//! whole bracketed group into child nodes before returning, so the only
//! closer a scan ever sees at its head is its own.
//!
//! Recognizers live in sibling modules as `impl Parser` blocks:
//! - `declarations`: class, class var dec, subroutine dec, var dec
//! - `statements`: let, if, while, do, return
//! - `expressions`: terms, expression wrapping, expression lists

use crate::parser::ast::{Element, ElementKind, Node};
use crate::parser::lexer::{Keyword, LexError, Token, TokenValue};
use log::{debug, info};
use thiserror::Error;

/// Parser error type
///
/// Every variant is fatal: parsing stops at the first error and no partial
/// tree is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("Parse error: unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("Parse error at line {line}: expected {expected}, found {found}")]
    Unexpected {
        expected: String,
        found: String,
        line: usize,
    },

    #[error("Parse error at line {line}: no grammar rule starts with {found}")]
    NoRule { found: String, line: usize },

    #[error("Parse error at line {line}: found {found} while looking for {expected}")]
    MismatchedCloser {
        expected: String,
        found: String,
        line: usize,
    },

    #[error("Parse error at line {line}: unexpected {found} after the class body")]
    TrailingInput { found: String, line: usize },
}

/// Grammar rule selected from the shape of the stream head
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rule {
    Class,
    ClassVarDec,
    SubroutineDec,
    VarDec,
    Let,
    If,
    While,
    Do,
    Return,
    /// Bare `(` in term position
    ParenthesizedTerm,
    /// `name(` or `name.`
    CallTerm,
    /// `name[`
    SubscriptTerm,
    /// Bare `[`
    Subscript,
    /// `,` is folded into the accumulator as is
    Separator,
    /// `}`, `;`, `)` or `]`: ends the current scan
    Closer,
    Terminal,
}

/// Outcome of a single [`Parser::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Continue,
    Halt,
}

/// Recursive descent parser for Jack
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parse the compilation unit and require that nothing but comments
    /// follows the class.
    pub fn parse_program(&mut self) -> Result<Element, ParseError> {
        let class = self.parse_class()?;

        if let Some(token) = self.peek() {
            return Err(ParseError::TrailingInput {
                found: token.to_string(),
                line: token.line,
            });
        }

        info!(
            "parsed class with {} top-level children from {} tokens",
            class.children().len(),
            self.tokens.len()
        );
        Ok(class)
    }

    /// Tokens not yet consumed.
    pub fn remaining(&self) -> &[Token] {
        &self.tokens[self.position..]
    }

    // ===== Dispatch =====

    /// Pick the rule for the current head. Returns `None` at end of input.
    pub(crate) fn select_rule(&self) -> Result<Option<Rule>, ParseError> {
        let Some(head) = self.peek() else {
            return Ok(None);
        };
        let next = self.peek_significant(1);

        let rule = match &head.value {
            TokenValue::Keyword(Keyword::Class) => Rule::Class,
            TokenValue::Keyword(Keyword::Static | Keyword::Field) => Rule::ClassVarDec,
            TokenValue::Keyword(Keyword::Constructor | Keyword::Function | Keyword::Method) => {
                Rule::SubroutineDec
            }
            TokenValue::Keyword(Keyword::Var) => Rule::VarDec,
            TokenValue::Keyword(Keyword::Let) => Rule::Let,
            TokenValue::Keyword(Keyword::If) => Rule::If,
            TokenValue::Keyword(Keyword::While) => Rule::While,
            TokenValue::Keyword(Keyword::Do) => Rule::Do,
            TokenValue::Keyword(Keyword::Return) => Rule::Return,
            TokenValue::Symbol('(') => Rule::ParenthesizedTerm,
            TokenValue::Symbol('[') => Rule::Subscript,
            TokenValue::Symbol('}' | ';' | ')' | ']') => Rule::Closer,
            TokenValue::Symbol(',') => Rule::Separator,
            TokenValue::Symbol('{') => {
                return Err(ParseError::NoRule {
                    found: head.to_string(),
                    line: head.line,
                })
            }
            TokenValue::Identifier(_) if next.is_some_and(|t| t.is_symbol('(') || t.is_symbol('.')) => {
                Rule::CallTerm
            }
            TokenValue::Identifier(_) if next.is_some_and(|t| t.is_symbol('[')) => Rule::SubscriptTerm,
            _ => Rule::Terminal,
        };

        Ok(Some(rule))
    }

    /// Run one recognizer and append its output to `acc`.
    ///
    /// Returns [`Step::Halt`] without consuming anything when the head is a
    /// closing delimiter.
    pub(crate) fn step(&mut self, acc: &mut Vec<Node>) -> Result<Step, ParseError> {
        let Some(rule) = self.select_rule()? else {
            return Err(self.eof("a construct"));
        };

        if rule != Rule::Terminal && rule != Rule::Separator {
            debug!("line {}: dispatching {:?}", self.current_line(), rule);
        }

        match rule {
            Rule::Class => acc.push(Element::new(ElementKind::Class, self.class_children()?).into()),
            Rule::ClassVarDec => acc.push(self.parse_class_var_dec()?.into()),
            Rule::SubroutineDec => acc.push(self.parse_subroutine_dec()?.into()),
            Rule::VarDec => acc.push(self.parse_var_dec()?.into()),
            Rule::Let => acc.push(self.parse_let_statement()?.into()),
            Rule::If => acc.push(self.parse_if_statement()?.into()),
            Rule::While => acc.push(self.parse_while_statement()?.into()),
            Rule::Do => acc.push(self.parse_do_statement()?.into()),
            Rule::Return => acc.push(self.parse_return_statement()?.into()),
            Rule::ParenthesizedTerm => acc.push(self.parse_parenthesized_term()?.into()),
            Rule::CallTerm => acc.push(self.parse_call_term()?.into()),
            Rule::SubscriptTerm => acc.push(self.parse_subscript_term()?.into()),
            Rule::Subscript => acc.extend(self.parse_subscript()?),
            Rule::Closer => return Ok(Step::Halt),
            Rule::Separator | Rule::Terminal => acc.push(self.advance_node()?),
        }

        Ok(Step::Continue)
    }

    // ===== Bounded scans =====

    /// Step until `target` is at the head, then consume it as the last item.
    pub(crate) fn greedy_until(&mut self, target: char) -> Result<Vec<Node>, ParseError> {
        let mut acc = self.non_greedy_until(target)?;
        acc.push(self.expect_symbol(target)?);
        Ok(acc)
    }

    /// Step until `target` is at the head and leave it there.
    pub(crate) fn non_greedy_until(&mut self, target: char) -> Result<Vec<Node>, ParseError> {
        let mut acc = Vec::new();

        loop {
            match self.peek() {
                None => return Err(self.eof(&format!("'{}'", target))),
                Some(head) if head.is_symbol(target) => return Ok(acc),
                Some(_) => {}
            }

            if self.step(&mut acc)? == Step::Halt {
                let head = self.peek_token()?;
                return Err(ParseError::MismatchedCloser {
                    expected: format!("'{}'", target),
                    found: head.to_string(),
                    line: head.line,
                });
            }
        }
    }

    // ===== Helper methods =====

    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// First non-comment token at or after `n` places past the head.
    pub(crate) fn peek_significant(&self, n: usize) -> Option<&Token> {
        self.tokens
            .get(self.position + n..)?
            .iter()
            .find(|t| !t.is_comment())
    }

    pub(crate) fn peek_token(&self) -> Result<Token, ParseError> {
        self.peek().cloned().ok_or_else(|| self.eof("a token"))
    }

    /// Whether the next non-comment token is the symbol `c`.
    pub(crate) fn check_symbol(&self, c: char) -> bool {
        self.peek_significant(0).is_some_and(|t| t.is_symbol(c))
    }

    /// Whether the next non-comment token is the keyword `kw`.
    pub(crate) fn check_keyword(&self, kw: Keyword) -> bool {
        self.peek_significant(0).is_some_and(|t| t.is_keyword(kw))
    }

    pub(crate) fn advance(&mut self) -> Result<Token, ParseError> {
        let token = self.peek_token()?;
        self.position += 1;
        Ok(token)
    }

    pub(crate) fn advance_node(&mut self) -> Result<Node, ParseError> {
        self.advance().map(Node::Token)
    }

    pub(crate) fn current_line(&self) -> usize {
        self.peek()
            .or_else(|| self.tokens.last())
            .map_or(0, |t| t.line)
    }

    /// Consume leading comment tokens.
    pub(crate) fn take_comments(&mut self) -> Vec<Node> {
        let mut comments = Vec::new();
        while self.peek().is_some_and(Token::is_comment) {
            comments.push(Node::Token(self.tokens[self.position].clone()));
            self.position += 1;
        }
        comments
    }

    /// Fold any comments at the head into `children`, then consume `c`.
    pub(crate) fn push_symbol(
        &mut self,
        children: &mut Vec<Node>,
        c: char,
    ) -> Result<(), ParseError> {
        children.extend(self.take_comments());
        children.push(self.expect_symbol(c)?);
        Ok(())
    }

    /// Fold any comments at the head into `children`, then consume a name.
    pub(crate) fn push_identifier(&mut self, children: &mut Vec<Node>) -> Result<(), ParseError> {
        children.extend(self.take_comments());
        children.push(self.expect_identifier()?);
        Ok(())
    }

    pub(crate) fn expect_symbol(&mut self, c: char) -> Result<Node, ParseError> {
        self.expect(&format!("'{}'", c), |t| t.is_symbol(c))
    }

    pub(crate) fn expect_keyword(&mut self, kw: Keyword) -> Result<Node, ParseError> {
        self.expect(&format!("'{}'", kw), |t| t.is_keyword(kw))
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<Node, ParseError> {
        self.expect("an identifier", Token::is_identifier)
    }

    /// Consume the head if it satisfies `accept`.
    pub(crate) fn expect(
        &mut self,
        expected: &str,
        accept: impl Fn(&Token) -> bool,
    ) -> Result<Node, ParseError> {
        let head = self.peek().ok_or_else(|| self.eof(expected))?;
        if accept(head) {
            self.advance_node()
        } else {
            Err(ParseError::Unexpected {
                expected: expected.to_string(),
                found: head.to_string(),
                line: head.line,
            })
        }
    }

    pub(crate) fn eof(&self, expected: &str) -> ParseError {
        ParseError::UnexpectedEof {
            expected: expected.to_string(),
        }
    }
}

/// Parse a complete token stream into its root `class` element.
pub fn parse(tokens: Vec<Token>) -> Result<Element, ParseError> {
    Parser::new(tokens).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::{tokenize, SourceLine};

    fn tokens(source: &str) -> Vec<Token> {
        let lines: Vec<SourceLine> = source
            .lines()
            .map(|l| SourceLine::Code(l.to_string()))
            .collect();
        tokenize(&lines).unwrap()
    }

    fn parser(source: &str) -> Parser {
        Parser::new(tokens(source))
    }

    #[test]
    fn test_select_rule_by_head_shape() {
        let cases = [
            ("class", Rule::Class),
            ("field", Rule::ClassVarDec),
            ("method", Rule::SubroutineDec),
            ("var", Rule::VarDec),
            ("while", Rule::While),
            ("( x", Rule::ParenthesizedTerm),
            ("f (", Rule::CallTerm),
            ("Math . abs", Rule::CallTerm),
            ("a [", Rule::SubscriptTerm),
            ("a +", Rule::Terminal),
            (",", Rule::Separator),
            ("]", Rule::Closer),
            ("else", Rule::Terminal),
        ];

        for (source, expected) in cases {
            assert_eq!(
                parser(source).select_rule().unwrap(),
                Some(expected),
                "head shape of {:?}",
                source
            );
        }
    }

    #[test]
    fn test_lookahead_skips_comments() {
        let lines = [
            SourceLine::CodeWithComment {
                code: "f".into(),
                comment: "// callee".into(),
            },
            SourceLine::Comment("// args follow".into()),
            SourceLine::Code("(x) else".into()),
        ];
        let p = Parser::new(tokenize(&lines).unwrap());
        assert_eq!(p.select_rule().unwrap(), Some(Rule::CallTerm));

        let mut p = Parser::new(tokenize(&lines[1..]).unwrap());
        assert!(p.check_symbol('('));
        assert!(p.peek().unwrap().is_comment());

        let mut children = Vec::new();
        p.push_symbol(&mut children, '(').unwrap();
        assert!(children[0].is_comment());
        assert!(children[1].is_symbol('('));
    }

    #[test]
    fn test_select_rule_at_end() {
        assert_eq!(parser("").select_rule().unwrap(), None);
    }

    #[test]
    fn test_bare_brace_has_no_rule() {
        let err = parser("{").select_rule().unwrap_err();
        assert!(matches!(err, ParseError::NoRule { line: 1, .. }));
    }

    #[test]
    fn test_greedy_consumes_terminator() {
        let mut p = parser("int x, y; z");
        let items = p.greedy_until(';').unwrap();

        assert_eq!(items.len(), 5);
        assert!(items[4].is_symbol(';'));
        assert!(p.peek().unwrap().is_identifier());
    }

    #[test]
    fn test_non_greedy_leaves_terminator() {
        let mut p = parser("x + 1 ) {");
        let items = p.non_greedy_until(')').unwrap();

        assert_eq!(items.len(), 3);
        assert!(p.check_symbol(')'));
    }

    #[test]
    fn test_nested_closer_does_not_end_scan() {
        let mut p = parser("(a + (b)) * c ;");
        let items = p.non_greedy_until(';').unwrap();

        // term, '*', c
        assert_eq!(items.len(), 3);
        assert!(items[0].is_kind(ElementKind::Term));
        assert!(p.check_symbol(';'));
    }

    #[test]
    fn test_scan_without_terminator() {
        let err = parser("x + 1").non_greedy_until(';').unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedEof {
                expected: "';'".into()
            }
        );
    }

    #[test]
    fn test_scan_hits_foreign_closer() {
        let err = parser("x + 1 ) ;").greedy_until(';').unwrap_err();
        assert!(matches!(err, ParseError::MismatchedCloser { line: 1, .. }));
    }

    #[test]
    fn test_remaining_after_class() {
        let mut p = parser("class A { } class B { }");
        let class = p.parse_class().unwrap();

        assert_eq!(class.kind(), ElementKind::Class);
        assert_eq!(p.remaining().len(), 4);
    }

    #[test]
    fn test_trailing_input_is_fatal() {
        let err = parser("class A { } x").parse_program().unwrap_err();
        assert!(matches!(err, ParseError::TrailingInput { line: 1, .. }));
    }
}
