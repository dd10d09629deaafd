//! Lexical analysis module.
//!
//! This module contains the lexer that converts source text into tokens
//! for the parser. It handles:
//!
//! - On-demand tokenization driven by a shared regex pattern table
//! - Recognition of keywords, identifiers, integers, and operators
//! - Illegal-character tokens for anything the language does not define
//! - Token spans for error reporting

pub mod lexer;
pub mod tokens;
