//! Statement parsing implementation
//!
//! This module handles parsing of all Jack statement types:
//!
//! - Assignment: `let x = e;` / `let a[i] = e;`
//! - Control flow: `if`, `while`
//! - Calls: `do f(args);` / `do obj.f(args);`
//! - `return;` / `return e;`
//!
//! # Grammar
//!
//! ```text
//! statements       ::= statement*
//! let_statement    ::= "let" name ("[" expression "]")? "=" expression ";"
//! if_statement     ::= "if" "(" expression ")" "{" statements "}"
//!                      ("else" "{" statements "}")?
//! while_statement  ::= "while" "(" expression ")" "{" statements "}"
//! do_statement     ::= "do" subroutine_call ";"
//! return_statement ::= "return" expression? ";"
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::{Element, ElementKind, Node};
use crate::parser::lexer::Keyword;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse `{ statements }` onto `children`, folding in any comments
    /// before the opening brace.
    pub(crate) fn push_block(&mut self, children: &mut Vec<Node>) -> Result<(), ParseError> {
        self.push_symbol(children, '{')?;
        let statements = self.non_greedy_until('}')?;
        children.push(Element::new(ElementKind::Statements, statements).into());
        self.push_symbol(children, '}')
    }

    /// Parse `( expression )` as it appears after `if` and `while`.
    fn push_condition(&mut self, children: &mut Vec<Node>) -> Result<(), ParseError> {
        self.push_symbol(children, '(')?;
        children.push(self.parse_expression_until(')')?.into());
        self.push_symbol(children, ')')
    }

    pub(crate) fn parse_let_statement(&mut self) -> Result<Element, ParseError> {
        let mut children = vec![self.expect_keyword(Keyword::Let)?];
        self.push_identifier(&mut children)?;

        if self.check_symbol('[') {
            children.extend(self.take_comments());
            children.extend(self.parse_subscript()?);
        }

        self.push_symbol(&mut children, '=')?;
        children.push(self.parse_expression_until(';')?.into());
        self.push_symbol(&mut children, ';')?;

        Ok(Element::new(ElementKind::LetStatement, children))
    }

    pub(crate) fn parse_if_statement(&mut self) -> Result<Element, ParseError> {
        let mut children = vec![self.expect_keyword(Keyword::If)?];
        self.push_condition(&mut children)?;
        self.push_block(&mut children)?;

        // Comments between `}` and `else` belong to this statement; without
        // an `else` they are left for the enclosing scan.
        if self.check_keyword(Keyword::Else) {
            children.extend(self.take_comments());
            children.push(self.advance_node()?);
            self.push_block(&mut children)?;
        }

        Ok(Element::new(ElementKind::IfStatement, children))
    }

    pub(crate) fn parse_while_statement(&mut self) -> Result<Element, ParseError> {
        let mut children = vec![self.expect_keyword(Keyword::While)?];
        self.push_condition(&mut children)?;
        self.push_block(&mut children)?;

        Ok(Element::new(ElementKind::WhileStatement, children))
    }

    /// Parse `do call;`. The call's pieces sit directly under the statement.
    pub(crate) fn parse_do_statement(&mut self) -> Result<Element, ParseError> {
        let mut children = vec![self.expect_keyword(Keyword::Do)?];
        children.extend(self.take_comments());
        children.extend(self.parse_subroutine_call()?);
        self.push_symbol(&mut children, ';')?;

        Ok(Element::new(ElementKind::DoStatement, children))
    }

    /// Parse `return expression? ;`.
    ///
    /// A value made only of comments is not an expression; those comments
    /// stay as direct children.
    pub(crate) fn parse_return_statement(&mut self) -> Result<Element, ParseError> {
        let mut children = vec![self.expect_keyword(Keyword::Return)?];

        let value = self.non_greedy_until(';')?;
        if Self::has_content(&value) {
            children.push(Self::wrap_expression(value).into());
        } else {
            children.extend(value);
        }
        children.push(self.expect_symbol(';')?);

        Ok(Element::new(ElementKind::ReturnStatement, children))
    }
}
