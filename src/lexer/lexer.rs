use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{lookup_identifier, Token, TokenKind};

/// Handler invoked with the text a pattern matched at the cursor.
///
/// Returning `None` means the match was skipped (whitespace) and scanning
/// continues from the new cursor.
pub type RegexHandler = fn(&mut Lexer, &str) -> Option<Token>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("lexer patterns are valid regular expressions")
}

// Two-character operators come before their one-character prefixes.
lazy_static! {
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: compile(r"^[ \t\n\r]+"), handler: skip_handler },
        RegexPattern { regex: compile(r"^[a-zA-Z_][a-zA-Z0-9_]*"), handler: symbol_handler },
        RegexPattern { regex: compile(r"^[0-9]+"), handler: number_handler },
        RegexPattern { regex: compile(r"^=="), handler: MK_DEFAULT_HANDLER!(TokenKind::Equals, "==") },
        RegexPattern { regex: compile(r"^!="), handler: MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=") },
        RegexPattern { regex: compile(r"^="), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=") },
        RegexPattern { regex: compile(r"^!"), handler: MK_DEFAULT_HANDLER!(TokenKind::Not, "!") },
        RegexPattern { regex: compile(r"^\+"), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+") },
        RegexPattern { regex: compile(r"^-"), handler: MK_DEFAULT_HANDLER!(TokenKind::Dash, "-") },
        RegexPattern { regex: compile(r"^\*"), handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*") },
        RegexPattern { regex: compile(r"^/"), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash, "/") },
        RegexPattern { regex: compile(r"^<"), handler: MK_DEFAULT_HANDLER!(TokenKind::Less, "<") },
        RegexPattern { regex: compile(r"^>"), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater, ">") },
        RegexPattern { regex: compile(r"^,"), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",") },
        RegexPattern { regex: compile(r"^;"), handler: MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";") },
        RegexPattern { regex: compile(r"^\("), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(") },
        RegexPattern { regex: compile(r"^\)"), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")") },
        RegexPattern { regex: compile(r"^\{"), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{") },
        RegexPattern { regex: compile(r"^\}"), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}") },
    ];
}

/// Pull-based scanner over a single source buffer.
///
/// Each call to [`Lexer::next_token`] consumes exactly the characters of the
/// returned token. Once the input is exhausted every further call yields an
/// EOF token at the end offset.
#[derive(Clone, Debug)]
pub struct Lexer {
    source: String,
    pos: usize,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            source,
            pos: 0,
            file: file_name,
        }
    }

    pub fn file(&self) -> Rc<String> {
        Rc::clone(&self.file)
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    fn span_of(&self, len: usize) -> Span {
        Span {
            start: Position(self.pos as u32, Rc::clone(&self.file)),
            end: Position((self.pos + len) as u32, Rc::clone(&self.file)),
        }
    }

    /// Builds a token starting at the cursor and moves past its literal.
    pub fn emit(&mut self, kind: TokenKind, value: String) -> Token {
        let span = self.span_of(value.len());
        self.advance_n(value.len());
        MK_TOKEN!(kind, value, span)
    }

    pub fn next_token(&mut self) -> Token {
        'scan: while !self.at_eof() {
            for pattern in PATTERNS.iter() {
                let Some(found) = pattern.regex.find(self.remainder()) else {
                    continue;
                };
                let matched = found.as_str().to_string();

                match (pattern.handler)(self, &matched) {
                    Some(token) => return token,
                    None => continue 'scan,
                }
            }

            return illegal_handler(self);
        }

        MK_TOKEN!(TokenKind::EOF, String::new(), self.span_of(0))
    }
}

impl Iterator for Lexer {
    type Item = Token;

    /// Yields tokens up to, but not including, the end of input.
    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        if token.kind == TokenKind::EOF {
            None
        } else {
            Some(token)
        }
    }
}

fn skip_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    lexer.advance_n(matched.len());
    None
}

fn number_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    Some(lexer.emit(TokenKind::Int, matched.to_string()))
}

fn symbol_handler(lexer: &mut Lexer, matched: &str) -> Option<Token> {
    let kind = lookup_identifier(matched);
    Some(lexer.emit(kind, matched.to_string()))
}

fn illegal_handler(lexer: &mut Lexer) -> Token {
    match lexer.remainder().chars().next() {
        Some(ch) => lexer.emit(TokenKind::Illegal, ch.to_string()),
        None => MK_TOKEN!(TokenKind::EOF, String::new(), lexer.span_of(0)),
    }
}

/// Scans the whole source eagerly, including the terminal EOF token.
pub fn tokenize(source: String, file: Option<String>) -> Vec<Token> {
    let mut lex = Lexer::new(source, file);
    let mut tokens = vec![];

    loop {
        let token = lex.next_token();
        let done = token.kind == TokenKind::EOF;
        tokens.push(token);

        if done {
            return tokens;
        }
    }
}
