//! Jack source code parser
//!
//! This module turns classified source lines into a parse tree:
//! - [`lines`]: Line classification (raw text → comment/code records)
//! - [`lexer`]: Tokenization (records → tokens)
//! - [`parse`]: Parsing (tokens → tree)
//! - [`ast`]: Tree node definitions
//!
//! # Output Shape
//!
//! The tree mirrors the grammar's nonterminals: one root `class` element
//! whose descendants are declarations, statements, expressions and terms.
//! Expressions are flat runs of terms and operators; no precedence is
//! applied here.
//!
//! # Parser Implementation
//!
//! Hand-written, shape-directed recursive descent built from two bounded
//! scans. Comments travel through the parser as ordinary terminals.
//! No external parser generator dependencies.

pub mod ast;
pub mod lexer;
pub mod lines;
pub mod parse;

mod declarations;
mod expressions;
mod statements;
