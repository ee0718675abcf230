//! A small expression language: integer literals, variables, the four
//! arithmetic operators, parentheses and assignment.
//!
//! Source text goes through three stages, each usable on its own:
//! [`scan`] turns it into tokens, [`parse`] builds an [`Expression`] tree and
//! [`evaluate`] walks the tree against an [`Environment`].

mod error;
pub use error::Error;

mod parser;
pub use parser::tokenizer::Tokenizer;
pub use parser::{
    parse, scan, Expression, LexicalError, Location, Operator, Parser, Span, SyntaxError, Token,
    TokenType, MAX_NESTING_DEPTH,
};

mod interpreter;
pub use interpreter::{evaluate, evaluate_fresh, Environment, EvaluationError, Value};

/// Scans, parses and evaluates `source` against `env`.
pub fn run(source: &str, env: &mut Environment) -> Result<Value, Error> {
    let tokens = scan(source)?;
    let tree = parse(&tokens)?;
    Ok(evaluate(&tree, env)?)
}
