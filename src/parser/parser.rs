//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the program loop.
//! The parser pulls tokens from the lexer one at a time, keeping the
//! current token plus a single token of lookahead, and never looks back.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//! - Binding powers for operator precedence

use std::{collections::HashMap, mem, rc::Rc};

use tracing::{debug, trace};

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::Lexer,
        tokens::{Token, TokenKind},
    },
    Position,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_stmt,
};

/// Deepest expression or block nesting accepted before parsing bails out.
///
/// Every level costs several stack frames, so unbounded input like a long
/// run of `(` would otherwise overflow the stack.
pub const MAX_NESTING_DEPTH: usize = 64;

/// The main parser structure that maintains parsing state.
///
/// Syntax errors never stop the parser. They are accumulated and the
/// statement loop resumes after the offending token.
pub struct Parser {
    /// Source of tokens, pulled on demand
    lexer: Lexer,
    /// The token being parsed
    current: Token,
    /// One token of lookahead
    peek: Token,
    /// The name of the source being parsed
    file: Rc<String>,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for infix binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// Errors recorded so far, in the order they were found
    errors: Vec<Error>,
    /// Current expression/block nesting depth
    nesting_depth: usize,
}

impl Parser {
    /// Creates a new Parser over `lexer` with all lookup tables populated.
    ///
    /// The first two tokens are read immediately to fill the current and
    /// lookahead slots.
    pub fn new(mut lexer: Lexer) -> Self {
        let current = lexer.next_token();
        let peek = lexer.next_token();
        let file = lexer.file();

        let mut parser = Parser {
            lexer,
            current,
            peek,
            file,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            errors: vec![],
            nesting_depth: 0,
        };
        create_token_lookups(&mut parser);

        parser
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.current
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current.kind
    }

    /// Returns the kind of the lookahead token.
    pub fn peek_token_kind(&self) -> TokenKind {
        self.peek.kind
    }

    /// Moves the lookahead into the current slot and pulls a new lookahead.
    pub fn advance(&mut self) {
        let next = self.lexer.next_token();
        self.current = mem::replace(&mut self.peek, next);
    }

    /// Advances only if the lookahead is of the expected kind.
    ///
    /// # Returns
    ///
    /// The new current token, or an unexpected-token error naming the
    /// expected kind and the kind actually found. On error nothing is
    /// consumed.
    pub fn expect_peek(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        if self.peek.kind != expected_kind {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    expected: expected_kind,
                    found: self.peek.kind,
                },
                self.peek.span.start.clone(),
            ));
        }

        self.advance();
        Ok(self.current.clone())
    }

    /// Consumes a trailing `;` if one follows. Statements never require it.
    pub fn skip_optional_semicolon(&mut self) {
        if self.peek.kind == TokenKind::Semicolon {
            self.advance();
        }
    }

    pub fn peek_binding_power(&self) -> BindingPower {
        *self
            .binding_power_lookup
            .get(&self.peek.kind)
            .unwrap_or(&BindingPower::Default)
    }

    pub fn current_binding_power(&self) -> BindingPower {
        *self
            .binding_power_lookup
            .get(&self.current.kind)
            .unwrap_or(&BindingPower::Default)
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `binding_power` - The precedence/binding power for this operator
    /// * `led_fn` - The handler function for this infix operator
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a keyword token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Returns the position of the current token.
    pub fn get_position(&self) -> Position {
        self.current.span.start.clone()
    }

    /// Increments the nesting depth, failing once it exceeds
    /// [`MAX_NESTING_DEPTH`]. Pair every `Ok` with [`Parser::leave_nesting`].
    pub fn enter_nesting(&mut self) -> Result<(), Error> {
        if self.nesting_depth >= MAX_NESTING_DEPTH {
            return Err(Error::new(
                ErrorImpl::NestingTooDeep {
                    max: MAX_NESTING_DEPTH,
                },
                self.get_position(),
            ));
        }

        self.nesting_depth += 1;
        Ok(())
    }

    pub fn leave_nesting(&mut self) {
        debug_assert!(
            self.nesting_depth > 0,
            "leave_nesting called without matching enter_nesting"
        );
        self.nesting_depth = self.nesting_depth.saturating_sub(1);
    }

    pub fn record_error(&mut self, error: Error) {
        debug!(
            file = %self.file,
            offset = error.get_position().0,
            kind = error.get_error_name(),
            "{}",
            error
        );
        self.errors.push(error);
    }

    /// Steps over a `;` that directly follows the token a statement failed
    /// on, so the terminator is not re-read as a statement of its own.
    pub fn synchronize(&mut self) {
        if self.peek.kind == TokenKind::Semicolon {
            self.advance();
        }
    }

    /// Error messages recorded so far, in order.
    pub fn errors(&self) -> Vec<String> {
        self.errors.iter().map(|error| error.to_string()).collect()
    }

    /// The recorded errors with their positions.
    pub fn diagnostics(&self) -> &[Error] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<Error> {
        self.errors
    }

    /// Parses statements until the end of input.
    ///
    /// A failed statement is recorded and dropped, and the loop moves on
    /// by at least one token, so the error count is bounded by the input.
    pub fn parse_program(&mut self) -> Program {
        trace!(file = %self.file, "parsing program");
        let mut program = Program::default();

        while self.current.kind != TokenKind::EOF {
            match parse_stmt(self) {
                Ok(stmt) => program.statements.push(stmt),
                Err(error) => {
                    self.record_error(error);
                    self.synchronize();
                }
            }
            self.advance();
        }

        trace!(
            statements = program.len(),
            errors = self.errors.len(),
            "parsed program"
        );
        program
    }
}

/// Parses source text into a Program plus every syntax error found.
///
/// The Program is returned even when errors were recorded; it then holds
/// only the statements that parsed cleanly.
pub fn parse(source: &str, file: Option<String>) -> (Program, Vec<Error>) {
    let mut parser = Parser::new(Lexer::new(source.to_string(), file));
    let program = parser.parse_program();

    (program, parser.into_errors())
}
