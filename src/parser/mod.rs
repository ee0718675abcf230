mod ast;
mod error;
mod grammar;
mod locations;
pub mod tokenizer;

pub use ast::*;
pub use error::{LexicalError, SyntaxError};
pub use grammar::{parse, Parser, MAX_NESTING_DEPTH};
pub use locations::{Location, Span};
pub use tokenizer::{scan, Token, TokenType};
