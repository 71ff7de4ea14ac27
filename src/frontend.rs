//! Pipeline glue: raw text → lines → tokens → tree
//!
//! [`Frontend`] runs the stages in order and applies [`FrontendOptions`]
//! between them.

use crate::parser::ast::Element;
use crate::parser::lexer::{self, Token};
use crate::parser::lines::classify_lines;
use crate::parser::parse::{ParseError, Parser};
use log::info;

/// Front end settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontendOptions {
    /// Keep comment tokens in the stream and the tree. When false they are
    /// dropped after tokenizing.
    pub keep_comments: bool,
}

impl Default for FrontendOptions {
    fn default() -> Self {
        Self {
            keep_comments: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Frontend {
    options: FrontendOptions,
}

impl Frontend {
    pub fn new(options: FrontendOptions) -> Self {
        Self { options }
    }

    /// Classify and tokenize raw source text.
    pub fn tokenize_text(&self, text: &str) -> Result<Vec<Token>, ParseError> {
        let lines = classify_lines(text)?;
        let mut tokens = lexer::tokenize(&lines)?;

        if !self.options.keep_comments {
            tokens.retain(|t| !t.is_comment());
        }

        info!("tokenized {} lines into {} tokens", lines.len(), tokens.len());
        Ok(tokens)
    }

    /// Parse an already tokenized compilation unit.
    pub fn parse_tokens(&self, mut tokens: Vec<Token>) -> Result<Element, ParseError> {
        if !self.options.keep_comments {
            tokens.retain(|t| !t.is_comment());
        }
        Parser::new(tokens).parse_program()
    }

    /// Run the whole pipeline on raw source text.
    pub fn parse_text(&self, text: &str) -> Result<Element, ParseError> {
        let tokens = self.tokenize_text(text)?;
        self.parse_tokens(tokens)
    }
}
