use thiserror::Error;

use super::locations::Location;
use super::tokenizer::{Token, TokenType};

/// No token pattern matched the input at `location`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid symbol at {location}: {remainder}")]
pub struct LexicalError {
    /// The input that was left unconsumed.
    pub remainder: String,
    pub location: Location,
}

impl LexicalError {
    pub(super) fn new(remainder: &str, location: Location) -> Self {
        Self {
            remainder: remainder.to_string(),
            location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntaxError {
    #[error("Expected {expected}, found {found} at {}", .found.span.start)]
    Expected { expected: TokenType, found: Token },
    #[error("Unexpected token {found} at {}", .found.span.start)]
    UnexpectedToken { found: Token },
    #[error("Unexpected trailing token {found} at {}", .found.span.start)]
    TrailingTokens { found: Token },
    #[error("Integer literal {found} at {} is too large", .found.span.start)]
    IntegerTooLarge { found: Token },
    #[error("Token {found} at {} nests deeper than {limit} levels", .found.span.start)]
    TooDeeplyNested { found: Token, limit: usize },
}

impl SyntaxError {
    /// The token the parser stopped at.
    pub fn found(&self) -> &Token {
        match self {
            Self::Expected { found, .. }
            | Self::UnexpectedToken { found }
            | Self::TrailingTokens { found }
            | Self::IntegerTooLarge { found }
            | Self::TooDeeplyNested { found, .. } => found,
        }
    }
}
