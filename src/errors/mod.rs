//! Error types for the front end.
//!
//! This module defines the syntax errors the parser accumulates. It includes:
//!
//! - Error structures with source position information
//! - One variant per failure the parser can recover from
//! - Suggestions used when rendering diagnostics

pub mod errors;
