use thiserror::Error;

use crate::interpreter::EvaluationError;
use crate::parser::{LexicalError, SyntaxError};

/// Any failure of the scan → parse → evaluate pipeline. Every kind is fatal
/// for the run it occurred in.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("Lexical error: {0}")]
    Lexical(#[from] LexicalError),
    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),
}

impl Error {
    /// Short classification used for logging.
    pub fn category(&self) -> &'static str {
        match self {
            Error::Lexical(_) => "lexical",
            Error::Syntax(_) => "syntax",
            Error::Evaluation(_) => "evaluation",
        }
    }
}
