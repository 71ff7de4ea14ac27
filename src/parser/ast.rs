// Parse tree definitions for the Jack front end

use crate::parser::lexer::Token;
use serde::Serialize;
use std::fmt;

/// Grammar nonterminals a tree node can stand for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Class,
    ClassVarDec,
    SubroutineDec,
    ParameterList,
    SubroutineBody,
    VarDec,
    Statements,
    IfStatement,
    WhileStatement,
    LetStatement,
    DoStatement,
    ReturnStatement,
    Expression,
    Term,
    ExpressionList,
}

impl ElementKind {
    pub const ALL: [ElementKind; 15] = [
        ElementKind::Class,
        ElementKind::ClassVarDec,
        ElementKind::SubroutineDec,
        ElementKind::ParameterList,
        ElementKind::SubroutineBody,
        ElementKind::VarDec,
        ElementKind::Statements,
        ElementKind::IfStatement,
        ElementKind::WhileStatement,
        ElementKind::LetStatement,
        ElementKind::DoStatement,
        ElementKind::ReturnStatement,
        ElementKind::Expression,
        ElementKind::Term,
        ElementKind::ExpressionList,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Class => "class",
            ElementKind::ClassVarDec => "class_var_dec",
            ElementKind::SubroutineDec => "subroutine_dec",
            ElementKind::ParameterList => "parameter_list",
            ElementKind::SubroutineBody => "subroutine_body",
            ElementKind::VarDec => "var_dec",
            ElementKind::Statements => "statements",
            ElementKind::IfStatement => "if_statement",
            ElementKind::WhileStatement => "while_statement",
            ElementKind::LetStatement => "let_statement",
            ElementKind::DoStatement => "do_statement",
            ElementKind::ReturnStatement => "return_statement",
            ElementKind::Expression => "expression",
            ElementKind::Term => "term",
            ElementKind::ExpressionList => "expression_list",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A child of a tree node: either a terminal or a nested nonterminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Token(Token),
    Element(Element),
}

impl Node {
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Node::Token(token) => Some(token),
            Node::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Token(_) => None,
        }
    }

    pub fn is_symbol(&self, c: char) -> bool {
        self.as_token().is_some_and(|t| t.is_symbol(c))
    }

    pub fn is_comment(&self) -> bool {
        self.as_token().is_some_and(Token::is_comment)
    }

    /// Whether this node is an element of the given kind.
    pub fn is_kind(&self, kind: ElementKind) -> bool {
        self.as_element().is_some_and(|e| e.kind() == kind)
    }
}

impl From<Token> for Node {
    fn from(token: Token) -> Self {
        Node::Token(token)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// A parse tree node for one grammar nonterminal.
///
/// Children are owned and kept in source order. There is no mutable access
/// once an element has been built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    kind: ElementKind,
    children: Vec<Node>,
}

impl Element {
    pub(crate) fn new(kind: ElementKind, children: Vec<Node>) -> Self {
        Self { kind, children }
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child elements only, skipping terminals.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Every terminal under this element, in source order.
    pub fn tokens(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        self.collect_tokens(&mut out);
        out
    }

    fn collect_tokens<'a>(&'a self, out: &mut Vec<&'a Token>) {
        for child in &self.children {
            match child {
                Node::Token(token) => out.push(token),
                Node::Element(element) => element.collect_tokens(out),
            }
        }
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(f, "{:indent$}{}", "", self.kind, indent = depth * 2)?;
        for child in &self.children {
            match child {
                Node::Token(token) => writeln!(
                    f,
                    "{:indent$}{} {}",
                    "",
                    token.kind(),
                    token.text(),
                    indent = (depth + 1) * 2
                )?,
                Node::Element(element) => element.write_indented(f, depth + 1)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::TokenValue;

    #[test]
    fn test_kind_names_match_serialized_tags() {
        for kind in ElementKind::ALL {
            assert_eq!(
                serde_json::to_value(kind).unwrap(),
                serde_json::Value::String(kind.as_str().into()),
                "{:?}",
                kind
            );
        }
    }

    #[test]
    fn test_display_indents_children() {
        let name = Token {
            value: TokenValue::Identifier("x".into()),
            line: 1,
        };
        let term = Element::new(ElementKind::Term, vec![name.into()]);
        let expr = Element::new(ElementKind::Expression, vec![term.into()]);

        assert_eq!(expr.to_string(), "expression\n  term\n    identifier x\n");
    }
}
