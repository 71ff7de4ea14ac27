//! Expression parsing implementation
//!
//! Expressions are kept flat: an `expression` node holds its terms and
//! operators as siblings in source order. Operator precedence, including
//! unary operators, is left to a later stage.
//!
//! # Terms
//!
//! Bracketed groups are resolved into nodes as soon as the dispatcher sees
//! them, so a scan never mistakes an inner closer for its own:
//!
//! - `( expression )` becomes a `term`
//! - `name[ expression ]` becomes a `term`
//! - `name(args)` and `name.name(args)` become a `term` holding an
//!   `expression_list`
//!
//! Any other terminal is wrapped into a single-child `term` when the
//! surrounding run is turned into an expression.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::{Element, ElementKind, Node};
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Collect items up to `target` (left unconsumed) as one expression.
    pub(crate) fn parse_expression_until(&mut self, target: char) -> Result<Element, ParseError> {
        let items = self.non_greedy_until(target)?;
        Ok(Self::wrap_expression(items))
    }

    /// Turn a collected run into an `expression` node.
    ///
    /// Symbols, comments and elements stay as they are; every other terminal
    /// becomes a singleton `term`.
    pub(crate) fn wrap_expression(items: Vec<Node>) -> Element {
        let children = items
            .into_iter()
            .map(|item| match item {
                Node::Token(token) if token.symbol().is_none() && !token.is_comment() => {
                    Element::new(ElementKind::Term, vec![Node::Token(token)]).into()
                }
                other => other,
            })
            .collect();

        Element::new(ElementKind::Expression, children)
    }

    /// Whether a run holds anything besides comments.
    pub(crate) fn has_content(items: &[Node]) -> bool {
        items.iter().any(|item| !item.is_comment())
    }

    /// Split a run on its commas and wrap each chunk as an expression.
    ///
    /// Commas nested in calls or brackets are already inside child elements,
    /// so every comma token seen here separates arguments. An argument list
    /// holding only comments keeps them as bare children.
    pub(crate) fn expression_list(items: Vec<Node>) -> Result<Element, ParseError> {
        let mut children = Vec::new();
        let mut chunk = Vec::new();

        for item in items {
            if item.is_symbol(',') {
                if !Self::has_content(&chunk) {
                    return Err(Self::missing_argument(&item));
                }
                children.push(Self::wrap_expression(std::mem::take(&mut chunk)).into());
                children.push(item);
            } else {
                chunk.push(item);
            }
        }

        if Self::has_content(&chunk) {
            children.push(Self::wrap_expression(chunk).into());
        } else if let Some(comma) = children.last() {
            return Err(Self::missing_argument(comma));
        } else {
            children.extend(chunk);
        }

        Ok(Element::new(ElementKind::ExpressionList, children))
    }

    fn missing_argument(comma: &Node) -> ParseError {
        let line = comma.as_token().map_or(0, |t| t.line);
        ParseError::Unexpected {
            expected: "an expression".to_string(),
            found: "','".to_string(),
            line,
        }
    }

    /// Parse `( expression )` in term position.
    pub(crate) fn parse_parenthesized_term(&mut self) -> Result<Element, ParseError> {
        let open = self.expect_symbol('(')?;
        let inner = self.parse_expression_until(')')?;
        let close = self.expect_symbol(')')?;

        Ok(Element::new(ElementKind::Term, vec![open, inner.into(), close]))
    }

    /// Parse `[ expression ]`, returning the three pieces unwrapped.
    pub(crate) fn parse_subscript(&mut self) -> Result<Vec<Node>, ParseError> {
        let open = self.expect_symbol('[')?;
        let index = self.parse_expression_until(']')?;
        let close = self.expect_symbol(']')?;

        Ok(vec![open, index.into(), close])
    }

    /// Parse `name[ expression ]` as a term.
    pub(crate) fn parse_subscript_term(&mut self) -> Result<Element, ParseError> {
        let mut children = vec![self.expect_identifier()?];
        children.extend(self.take_comments());
        children.extend(self.parse_subscript()?);
        Ok(Element::new(ElementKind::Term, children))
    }

    /// Parse `name(args)` or `name.name(args)` without a wrapping node.
    pub(crate) fn parse_subroutine_call(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut children = vec![self.expect_identifier()?];

        if self.check_symbol('.') {
            self.push_symbol(&mut children, '.')?;
            self.push_identifier(&mut children)?;
        }

        self.push_symbol(&mut children, '(')?;
        let args = self.non_greedy_until(')')?;
        children.push(Self::expression_list(args)?.into());
        children.push(self.expect_symbol(')')?);

        Ok(children)
    }

    /// Parse a subroutine call in term position.
    pub(crate) fn parse_call_term(&mut self) -> Result<Element, ParseError> {
        Ok(Element::new(ElementKind::Term, self.parse_subroutine_call()?))
    }
}
