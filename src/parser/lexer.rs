//! Tokenizer for Jack source lines
//!
//! Converts classified source lines (see [`SourceLine`]) into a flat [`Token`]
//! stream consumed by the parser. Comments are not discarded here: a comment
//! line, or the trailing comment of a code line, becomes a
//! [`TokenValue::Comment`] token at its position in the stream.
//!
//! A code line is segmented in two passes:
//! 1. double-quoted string literals are cut out first so they stay atomic;
//! 2. the remaining text is split into word runs and single non-word
//!    characters, and whitespace is dropped.
//!
//! Every segment is then classified by [`classify`], which is total.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Shortest double-quoted run on a line.
static STRING_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r#""[^"]*""#).unwrap());

/// A run of word characters, or any single non-space character.
static SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+|\S").unwrap());

static KEYWORDS: Lazy<FxHashMap<&'static str, Keyword>> =
    Lazy::new(|| Keyword::ALL.iter().map(|kw| (kw.as_str(), *kw)).collect());

/// Every single-character symbol of the language.
pub const SYMBOLS: &str = "{}()[].,;+-*/&|<>=~";

/// The language's reserved words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Keyword {
    Class,
    Constructor,
    Function,
    Method,
    Field,
    Static,
    Var,
    Int,
    Char,
    Boolean,
    Void,
    True,
    False,
    Null,
    This,
    Let,
    Do,
    If,
    Else,
    While,
    Return,
}

impl Keyword {
    pub const ALL: [Keyword; 21] = [
        Keyword::Class,
        Keyword::Constructor,
        Keyword::Function,
        Keyword::Method,
        Keyword::Field,
        Keyword::Static,
        Keyword::Var,
        Keyword::Int,
        Keyword::Char,
        Keyword::Boolean,
        Keyword::Void,
        Keyword::True,
        Keyword::False,
        Keyword::Null,
        Keyword::This,
        Keyword::Let,
        Keyword::Do,
        Keyword::If,
        Keyword::Else,
        Keyword::While,
        Keyword::Return,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Class => "class",
            Keyword::Constructor => "constructor",
            Keyword::Function => "function",
            Keyword::Method => "method",
            Keyword::Field => "field",
            Keyword::Static => "static",
            Keyword::Var => "var",
            Keyword::Int => "int",
            Keyword::Char => "char",
            Keyword::Boolean => "boolean",
            Keyword::Void => "void",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Null => "null",
            Keyword::This => "this",
            Keyword::Let => "let",
            Keyword::Do => "do",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::Return => "return",
        }
    }

    /// Look up a reserved word by its source spelling.
    pub fn from_word(word: &str) -> Option<Keyword> {
        KEYWORDS.get(word).copied()
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Keyword,
    Symbol,
    Identifier,
    IntegerConstant,
    StringConstant,
    Comment,
}

impl TokenKind {
    pub const ALL: [TokenKind; 6] = [
        TokenKind::Keyword,
        TokenKind::Symbol,
        TokenKind::Identifier,
        TokenKind::IntegerConstant,
        TokenKind::StringConstant,
        TokenKind::Comment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Symbol => "symbol",
            TokenKind::Identifier => "identifier",
            TokenKind::IntegerConstant => "integer_constant",
            TokenKind::StringConstant => "string_constant",
            TokenKind::Comment => "comment",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific payload of a token.
///
/// The variant doubles as the token's kind, so a keyword can never carry
/// identifier text and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TokenValue {
    Keyword(Keyword),
    Symbol(char),
    Identifier(String),
    IntegerConstant(u64),
    /// Literal text with the delimiting quotes removed.
    StringConstant(String),
    Comment(String),
}

/// A classified lexical segment and the 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    #[serde(flatten)]
    pub value: TokenValue,
    pub line: usize,
}

impl Token {
    pub fn new(value: TokenValue, line: usize) -> Self {
        Self { value, line }
    }

    pub fn kind(&self) -> TokenKind {
        match self.value {
            TokenValue::Keyword(_) => TokenKind::Keyword,
            TokenValue::Symbol(_) => TokenKind::Symbol,
            TokenValue::Identifier(_) => TokenKind::Identifier,
            TokenValue::IntegerConstant(_) => TokenKind::IntegerConstant,
            TokenValue::StringConstant(_) => TokenKind::StringConstant,
            TokenValue::Comment(_) => TokenKind::Comment,
        }
    }

    pub fn keyword(&self) -> Option<Keyword> {
        match self.value {
            TokenValue::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    pub fn symbol(&self) -> Option<char> {
        match self.value {
            TokenValue::Symbol(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_keyword(&self, kw: Keyword) -> bool {
        self.keyword() == Some(kw)
    }

    pub fn is_symbol(&self, c: char) -> bool {
        self.symbol() == Some(c)
    }

    pub fn is_identifier(&self) -> bool {
        matches!(self.value, TokenValue::Identifier(_))
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.value, TokenValue::Comment(_))
    }

    /// The token's value as plain text, without quoting.
    pub fn text(&self) -> String {
        match &self.value {
            TokenValue::Keyword(kw) => kw.as_str().to_string(),
            TokenValue::Symbol(c) => c.to_string(),
            TokenValue::IntegerConstant(n) => n.to_string(),
            TokenValue::Identifier(s) | TokenValue::StringConstant(s) | TokenValue::Comment(s) => {
                s.clone()
            }
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            TokenValue::Keyword(kw) => write!(f, "keyword '{}'", kw),
            TokenValue::Symbol(c) => write!(f, "symbol '{}'", c),
            TokenValue::Identifier(s) => write!(f, "identifier '{}'", s),
            TokenValue::IntegerConstant(n) => write!(f, "integer constant {}", n),
            TokenValue::StringConstant(s) => write!(f, "string constant \"{}\"", s),
            TokenValue::Comment(s) => write!(f, "comment '{}'", s),
        }
    }
}

/// One physical source line, as tagged by the line classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLine {
    /// A line holding nothing but comment text.
    Comment(String),
    /// A line of code without a comment.
    Code(String),
    /// A line of code followed by an inline comment.
    CodeWithComment { code: String, comment: String },
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Lexer error at line {line}: unterminated string literal")]
    UnterminatedString { line: usize },

    #[error("Lexer error at line {line}: unterminated block comment")]
    UnterminatedComment { line: usize },
}

/// Classify one lexical segment. Never fails: anything that is not a
/// keyword, symbol, string or number is an identifier.
pub fn classify(segment: &str, line: usize) -> Token {
    let value = if let Some(kw) = Keyword::from_word(segment) {
        TokenValue::Keyword(kw)
    } else if let Some(c) = single_symbol(segment) {
        TokenValue::Symbol(c)
    } else if let Some(body) = segment.strip_prefix('"') {
        TokenValue::StringConstant(body.strip_suffix('"').unwrap_or(body).to_string())
    } else if let Ok(n) = segment.parse::<u64>() {
        TokenValue::IntegerConstant(n)
    } else {
        TokenValue::Identifier(segment.to_string())
    };
    Token::new(value, line)
}

fn single_symbol(segment: &str) -> Option<char> {
    let mut chars = segment.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if SYMBOLS.contains(c) => Some(c),
        _ => None,
    }
}

/// Tokenizer over a sequence of classified lines
pub struct Lexer<'a> {
    lines: &'a [SourceLine],
}

impl<'a> Lexer<'a> {
    pub fn new(lines: &'a [SourceLine]) -> Self {
        Self { lines }
    }

    /// Tokenize every line, numbering lines from 1 by position.
    pub fn tokenize(&self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        for (index, source_line) in self.lines.iter().enumerate() {
            self.tokenize_line(source_line, index + 1, &mut tokens)?;
        }

        debug!("tokenized {} lines into {} tokens", self.lines.len(), tokens.len());
        Ok(tokens)
    }

    fn tokenize_line(
        &self,
        source_line: &SourceLine,
        line: usize,
        out: &mut Vec<Token>,
    ) -> Result<(), LexError> {
        match source_line {
            SourceLine::Comment(text) => {
                out.push(Token::new(TokenValue::Comment(text.clone()), line));
            }
            SourceLine::Code(code) => self.tokenize_code(code, line, out)?,
            SourceLine::CodeWithComment { code, comment } => {
                self.tokenize_code(code, line, out)?;
                out.push(Token::new(TokenValue::Comment(comment.clone()), line));
            }
        }
        Ok(())
    }

    fn tokenize_code(&self, code: &str, line: usize, out: &mut Vec<Token>) -> Result<(), LexError> {
        let mut cursor = 0;

        for literal in STRING_LITERAL.find_iter(code) {
            self.tokenize_plain(&code[cursor..literal.start()], line, out)?;
            out.push(classify(literal.as_str(), line));
            cursor = literal.end();
        }

        self.tokenize_plain(&code[cursor..], line, out)
    }

    /// Split text that holds no complete string literal.
    fn tokenize_plain(&self, text: &str, line: usize, out: &mut Vec<Token>) -> Result<(), LexError> {
        if text.contains('"') {
            return Err(LexError::UnterminatedString { line });
        }

        out.extend(SEGMENT.find_iter(text).map(|segment| classify(segment.as_str(), line)));
        Ok(())
    }
}

/// Tokenize a slice of classified lines.
pub fn tokenize(lines: &[SourceLine]) -> Result<Vec<Token>, LexError> {
    Lexer::new(lines).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(text: &str) -> Vec<Token> {
        tokenize(&[SourceLine::Code(text.to_string())]).unwrap()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = code("let x = y + 1;");

        assert!(tokens[0].is_keyword(Keyword::Let));
        assert_eq!(tokens[1].value, TokenValue::Identifier("x".into()));
        assert!(tokens[2].is_symbol('='));
        assert_eq!(tokens[3].value, TokenValue::Identifier("y".into()));
        assert!(tokens[4].is_symbol('+'));
        assert_eq!(tokens[5].value, TokenValue::IntegerConstant(1));
        assert!(tokens[6].is_symbol(';'));
        assert_eq!(tokens.len(), 7);
    }

    #[test]
    fn test_adjacent_symbols_split() {
        let tokens = code("a[i]=-~b;");
        let texts: Vec<String> = tokens.iter().map(Token::text).collect();
        assert_eq!(texts, ["a", "[", "i", "]", "=", "-", "~", "b", ";"]);
    }

    #[test]
    fn test_string_literal_stays_atomic() {
        let tokens = code(r#"do Output.printString("a, b; (c)");"#);

        assert_eq!(
            tokens[5].value,
            TokenValue::StringConstant("a, b; (c)".into())
        );
        assert!(tokens[6].is_symbol(')'));
        assert!(tokens[7].is_symbol(';'));
    }

    #[test]
    fn test_two_strings_on_one_line() {
        let tokens = code(r#"let s = "x" + "y";"#);
        assert_eq!(tokens[3].value, TokenValue::StringConstant("x".into()));
        assert_eq!(tokens[5].value, TokenValue::StringConstant("y".into()));
    }

    #[test]
    fn test_empty_string_literal() {
        let tokens = code(r#"let s = "";"#);
        assert_eq!(tokens[3].value, TokenValue::StringConstant(String::new()));
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize(&[
            SourceLine::Code("let a = 1;".into()),
            SourceLine::Code(r#"let s = "oops;"#.into()),
        ])
        .unwrap_err();

        assert_eq!(err, LexError::UnterminatedString { line: 2 });
    }

    #[test]
    fn test_whitespace_only_line() {
        assert!(code("   \t ").is_empty());
    }

    #[test]
    fn test_unknown_character_is_identifier() {
        let tokens = code("#");
        assert_eq!(tokens[0].kind(), TokenKind::Identifier);
    }

    #[test]
    fn test_keyword_lookup() {
        for kw in Keyword::ALL {
            assert_eq!(Keyword::from_word(kw.as_str()), Some(kw));
        }
        assert_eq!(Keyword::from_word("Class"), None);
    }

    #[test]
    fn test_names_match_serialized_tags() {
        for kw in Keyword::ALL {
            assert_eq!(
                serde_json::to_value(kw).unwrap(),
                serde_json::Value::String(kw.as_str().into())
            );
        }
        for kind in TokenKind::ALL {
            assert_eq!(
                serde_json::to_value(kind).unwrap(),
                serde_json::Value::String(kind.as_str().into())
            );
        }
    }
}
