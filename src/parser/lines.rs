//! Line classifier
//!
//! Splits raw source text into [`SourceLine`] records, one per physical
//! line, separating comment text from code so the tokenizer never has to
//! recognise comment syntax. Blank lines are kept as empty code lines so
//! that a record's position is always its line number.
//!
//! Handles `// ...` line comments, `/* ... */` and `/** ... */` block
//! comments (possibly spanning lines). Comment openers inside a string
//! literal are ignored.

use crate::parser::lexer::{LexError, SourceLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Opener {
    Line,
    Block,
}

/// Classify every line of `text`.
pub fn classify_lines(text: &str) -> Result<Vec<SourceLine>, LexError> {
    let mut lines = Vec::new();
    // Line where the currently open block comment started
    let mut open_block: Option<usize> = None;

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;

        if open_block.is_some() {
            match raw.find("*/") {
                None => lines.push(SourceLine::Comment(raw.trim().to_string())),
                Some(end) => {
                    open_block = None;
                    let comment = raw[..end + 2].trim().to_string();
                    let rest = &raw[end + 2..];
                    lines.push(code_line(rest, comment, &mut open_block, line));
                }
            }
            continue;
        }

        lines.push(code_line(raw, String::new(), &mut open_block, line));
    }

    match open_block {
        Some(line) => Err(LexError::UnterminatedComment { line }),
        None => Ok(lines),
    }
}

/// Classify a line that starts outside any comment. `comment` holds text
/// already known to be comment on this line.
fn code_line(raw: &str, comment: String, open_block: &mut Option<usize>, line: usize) -> SourceLine {
    let mut code = String::new();
    let mut comments = vec![comment];
    let mut rest = raw;

    while let Some((start, opener)) = find_opener(rest) {
        code.push_str(&rest[..start]);

        match opener {
            Opener::Line => {
                comments.push(rest[start..].trim_end().to_string());
                rest = "";
                break;
            }
            Opener::Block => match rest[start + 2..].find("*/") {
                Some(offset) => {
                    let end = start + 2 + offset + 2;
                    comments.push(rest[start..end].to_string());
                    code.push(' ');
                    rest = &rest[end..];
                }
                None => {
                    comments.push(rest[start..].trim_end().to_string());
                    *open_block = Some(line);
                    rest = "";
                    break;
                }
            },
        }
    }
    code.push_str(rest);

    let comment = comments
        .into_iter()
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    match (code.trim().is_empty(), comment.is_empty()) {
        (true, false) => SourceLine::Comment(comment),
        (false, false) => SourceLine::CodeWithComment {
            code: code.trim_end().to_string(),
            comment,
        },
        _ => SourceLine::Code(code.trim_end().to_string()),
    }
}

/// Byte offset of the first comment opener outside a string literal.
fn find_opener(text: &str) -> Option<(usize, Opener)> {
    let bytes = text.as_bytes();
    let mut in_string = false;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'"' => in_string = !in_string,
            b'/' if !in_string => match bytes.get(i + 1) {
                Some(b'/') => return Some((i, Opener::Line)),
                Some(b'*') => return Some((i, Opener::Block)),
                _ => {}
            },
            _ => {}
        }
    }
    None
}
