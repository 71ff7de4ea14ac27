//! Declaration parsing implementation
//!
//! This module handles the class level of a Jack program:
//!
//! - Class: `class Name { members }`
//! - Class variables: `static int a, b;` / `field Foo f;`
//! - Subroutines: `constructor|function|method type name(params) { body }`
//! - Local variables: `var int i, j;`
//!
//! # Grammar
//!
//! ```text
//! class          ::= "class" name "{" class_var_dec* subroutine_dec* "}"
//! class_var_dec  ::= ("static" | "field") type name ("," name)* ";"
//! subroutine_dec ::= ("constructor" | "function" | "method") ("void" | type) name
//!                    "(" parameter_list ")" subroutine_body
//! subroutine_body ::= "{" var_dec* statements "}"
//! var_dec        ::= "var" type name ("," name)* ";"
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::{Element, ElementKind, Node};
use crate::parser::lexer::Keyword;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse the class, folding comments before and after it into the root.
    pub fn parse_class(&mut self) -> Result<Element, ParseError> {
        let mut children = self.take_comments();
        children.extend(self.class_children()?);
        children.extend(self.take_comments());

        Ok(Element::new(ElementKind::Class, children))
    }

    /// `class Name {` followed by members through the closing brace.
    pub(crate) fn class_children(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut children = vec![self.expect_keyword(Keyword::Class)?];
        self.push_identifier(&mut children)?;
        self.push_symbol(&mut children, '{')?;
        children.extend(self.greedy_until('}')?);
        Ok(children)
    }

    /// Parse `static|field type name (, name)* ;`
    pub(crate) fn parse_class_var_dec(&mut self) -> Result<Element, ParseError> {
        let mut children = vec![self.advance_node()?];
        children.extend(self.greedy_until(';')?);
        Ok(Element::new(ElementKind::ClassVarDec, children))
    }

    /// Parse `var type name (, name)* ;`
    pub(crate) fn parse_var_dec(&mut self) -> Result<Element, ParseError> {
        let mut children = vec![self.advance_node()?];
        children.extend(self.greedy_until(';')?);
        Ok(Element::new(ElementKind::VarDec, children))
    }

    /// Parse a subroutine header and its body.
    pub(crate) fn parse_subroutine_dec(&mut self) -> Result<Element, ParseError> {
        let mut children = vec![self.advance_node()?];
        children.extend(self.take_comments());
        children.push(self.expect("a return type", |t| {
            t.keyword().is_some() || t.is_identifier()
        })?);
        self.push_identifier(&mut children)?;
        self.push_symbol(&mut children, '(')?;

        let params = self.non_greedy_until(')')?;
        children.push(Element::new(ElementKind::ParameterList, params).into());
        children.push(self.expect_symbol(')')?);
        // Comments between the header and its body stay in the declaration.
        children.extend(self.take_comments());
        children.push(self.parse_subroutine_body()?.into());

        Ok(Element::new(ElementKind::SubroutineDec, children))
    }

    /// Parse `{ var_dec* statements }`.
    ///
    /// The leading run of var decs (and comments between them) stays in the
    /// body; everything from the first other item on forms `statements`.
    fn parse_subroutine_body(&mut self) -> Result<Element, ParseError> {
        let open = self.expect_symbol('{')?;
        let mut items = self.non_greedy_until('}')?;
        let close = self.expect_symbol('}')?;

        let split = items
            .iter()
            .position(|item| !item.is_kind(ElementKind::VarDec) && !item.is_comment())
            .unwrap_or(items.len());
        let statements = items.split_off(split);

        let mut children = vec![open];
        children.extend(items);
        children.push(Element::new(ElementKind::Statements, statements).into());
        children.push(close);

        Ok(Element::new(ElementKind::SubroutineBody, children))
    }
}
