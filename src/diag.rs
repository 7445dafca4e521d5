//! Static diagnostics raised while scanning and parsing.

use thiserror::Error;

/// Line number (starting at one).
pub type Position = u32;

/// A static error together with the line it was detected on.
#[derive(Debug, PartialEq, Error)]
#[error("parse error: {pos}: {error}")]
pub struct FullParseError {
    pub pos: Position,
    pub error: ParseError,
}

impl FullParseError {
    pub fn new(pos: Position, error: ParseError) -> FullParseError {
        FullParseError { pos, error }
    }
}

#[derive(Debug, PartialEq, Error)]
pub enum ParseError {
    #[error("unexpected character: {0}")]
    UnexpectedChar(char),
    #[error("unexpected token '{found}', expected '{expected}'")]
    UnexpectedToken { found: String, expected: String },
    #[error("expected identifier, found '{0}'")]
    ExpectedIdentifier(String),
    #[error("expected primary expression, found '{0}'")]
    ExpectedPrimary(String),
    #[error("function parameters must be plain identifiers")]
    ExpectedParameterName,
    #[error("expected property name, found '{0}'")]
    ExpectedPropertyName(String),
    #[error("constant '{0}' must be initialized")]
    MissingConstInitializer(String),
    #[error("cannot parse number literal: {0}")]
    BadNumberLiteral(String),
}
