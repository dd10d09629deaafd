#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;

extern crate regex;

pub use parser::parser::parse;

/// Byte offset into a named source.
#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Finds the line containing byte offset `position`.
///
/// Returns the 1-based line number, the line's text and the offset within
/// the line. An offset equal to the source length points just past the end
/// of the last line, which is where end-of-input errors are reported.
pub fn get_line_at_position(content: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if pos > content.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;
    let mut last = (1, String::new(), 0);

    for line in content.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return Some((line_number, line.to_string(), pos - start));
        }

        last = (line_number, line.to_string(), pos - start);
        start = end;
        line_number += 1;
    }

    // pos == content.len()
    if last.1.ends_with('\n') {
        return Some((line_number, String::new(), 0));
    }
    Some(last)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::{
        errors::errors::{Error, ErrorImpl},
        lexer::tokens::TokenKind,
        Position,
    };

    const SOURCE: &str = "Hello, world!\nlet x 5;\n\nTesting { }";

    #[test]
    fn test_get_line_at_position() {
        let (line_number, line, line_pos) = super::get_line_at_position(SOURCE, 10).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!\n");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = super::get_line_at_position(SOURCE, 32).unwrap();
        assert_eq!(line_number, 4);
        assert_eq!(line, "Testing { }");
        assert_eq!(line_pos, 8);
    }

    #[test]
    fn test_get_line_at_end_of_input() {
        let (line_number, line, line_pos) =
            super::get_line_at_position(SOURCE, SOURCE.len() as u32).unwrap();
        assert_eq!(line_number, 4);
        assert_eq!(line, "Testing { }");
        assert_eq!(line_pos, 11);

        assert_eq!(super::get_line_at_position("", 0), Some((1, String::new(), 0)));
        assert_eq!(super::get_line_at_position("x", 5), None);
    }

    #[test]
    fn test_render_error_points_at_token() {
        let error = Error::new(
            ErrorImpl::UnexpectedToken {
                expected: TokenKind::Assignment,
                found: TokenKind::Int,
            },
            Position(20, Rc::new("test.nb".to_string())),
        );

        let rendered = super::render_error(&error, SOURCE, "test.nb");
        let lines = rendered.lines().collect::<Vec<&str>>();

        assert_eq!(lines[0], "Error: expected next token to be =, got INT instead (Expected `=` here but found `INT`)");
        assert_eq!(lines[1], "-> test.nb");
        assert_eq!(lines[3], "2 | let x 5;");
        assert_eq!(lines[4], "  | ------^");
    }

    #[test]
    fn test_render_error_counts_characters_before_caret() {
        let source = "let é = @;";
        let error = Error::new(
            ErrorImpl::IllegalCharacter {
                token: "@".to_string(),
            },
            Position(9, Rc::new("test.nb".to_string())),
        );

        let rendered = super::render_error(&error, source, "test.nb");
        let lines = rendered.lines().collect::<Vec<&str>>();

        assert_eq!(lines[0], "Error: illegal character \"@\"");
        assert_eq!(lines[3], "1 | let é = @;");
        assert_eq!(lines[4], "  | --------^");
    }
}

/// Formats an error as a caret diagnostic against its source text.
///
/// ```text
/// Error: message (tip)
/// -> main.nb
///   |
/// 2 | let x 5;
///   | ------^
/// ```
pub fn render_error(error: &Error, source: &str, file: &str) -> String {
    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("Error: {}\n", error));
    } else {
        out.push_str(&format!("Error: {} ({})\n", error, error.get_tip()));
    }
    out.push_str(&format!("-> {}\n", file));

    let Some((line, line_text, line_pos)) = get_line_at_position(source, error.get_position().0)
    else {
        return out;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    // Caret columns count characters, not bytes
    let column = line_text
        .get(..line_pos)
        .map_or(line_pos, |prefix| prefix.chars().count());
    let arrows = column.saturating_sub(removed_whitespace) + 1;
    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));

    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
