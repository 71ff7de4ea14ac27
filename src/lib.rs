//! # Introduction
//!
//! jackfront is the front end of a compiler for Jack, a small Java-like
//! teaching language. It turns source lines into a flat token stream and
//! then into a parse tree that follows the language grammar exactly.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Line classifier → Tokenizer → Parser → class tree
//! ```
//!
//! 1. [`parser::lines`] — tags each physical line as comment or code.
//! 2. [`parser::lexer`] — splits code into [`parser::lexer::Token`]s.
//! 3. [`parser::parse`] — builds one [`parser::ast::Element`] of kind
//!    `class` from the tokens.
//! 4. [`frontend`] — runs the stages with [`frontend::FrontendOptions`].
//!
//! Symbol tables, type checking and code generation are not part of this
//! crate; they consume the tree produced here.

pub mod frontend;
pub mod parser;

pub use frontend::{Frontend, FrontendOptions};
pub use parser::ast::{Element, ElementKind, Node};
pub use parser::lexer::{Keyword, LexError, SourceLine, Token, TokenKind, TokenValue};
pub use parser::parse::{parse, ParseError, Parser};
