//! Error reporting shared by the SPL lexer, parser and code generator.
//!
//! A [`Diagnostic`] pairs an [`ErrorCode`] with a message and labelled
//! spans; [`emitter::TerminalEmitter`] renders it against the source.

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod span_utils;

pub use diagnostic::{
    expected_expression, expected_identifier, unclosed_delimiter, unexpected_token, Diagnostic,
    Label,
};
pub use error_code::ErrorCode;
