// # ========================= START OF THE GRAMMAR =========================
//
// # Upper case names (NUMBER) denote token types from the tokenizer.
// # Alternatives are chosen by one token of lookahead, operators at the same
// # level fold to the left.
//
// start: expression ENDMARKER
// expression: term (('+' | '-') term)*
// term: factor (('*' | '/') factor)*
// factor:
//     | NUMBER
//     | IDENTIFIER ['=' expression]
//     | '(' expression ')'

use tracing::debug;

use super::ast::*;
use super::error::SyntaxError;
use super::locations::Span;
use super::tokenizer::{Token, TokenType as TT};

/// Default limit on nested parentheses and assignments. Each level costs a
/// few stack frames in the parser and again in the evaluator.
pub const MAX_NESTING_DEPTH: usize = 128;

pub struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
    end: Token,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self::with_max_depth(tokens, MAX_NESTING_DEPTH)
    }

    /// Like [`Parser::new`], but rejects input nested deeper than `max_depth`
    /// instead of [`MAX_NESTING_DEPTH`]. Large limits can overflow the stack.
    pub fn with_max_depth(tokens: &'a [Token], max_depth: usize) -> Self {
        let span = tokens.last().map(|t| Span::at(t.span.end)).unwrap_or_default();
        Self {
            tokens,
            position: 0,
            end: Token::end_marker(span),
            depth: 0,
            max_depth,
        }
    }

    pub fn parse(mut self) -> Result<Expression, SyntaxError> {
        let tree = self.start()?;
        debug!(%tree, "parsed expression");
        Ok(tree)
    }

    /// The next token, or an `ENDMARKER` once the input is exhausted.
    fn peek(&self) -> &Token {
        self.tokens.get(self.position).unwrap_or(&self.end)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    fn eat(&mut self, expected: TT) -> Result<Token, SyntaxError> {
        if self.peek().typ == expected {
            Ok(self.advance())
        } else {
            Err(SyntaxError::Expected {
                expected,
                found: self.peek().clone(),
            })
        }
    }

    /// Opens one nesting level at `token` (a `(` or an `=`).
    fn enter(&mut self, token: Token) -> Result<(), SyntaxError> {
        if self.depth >= self.max_depth {
            return Err(SyntaxError::TooDeeplyNested {
                found: token,
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // start: expression ENDMARKER
    fn start(&mut self) -> Result<Expression, SyntaxError> {
        let tree = self.expression()?;
        match self.peek().typ {
            TT::ENDMARKER => Ok(tree),
            _ => Err(SyntaxError::TrailingTokens {
                found: self.peek().clone(),
            }),
        }
    }

    // expression: term (('+' | '-') term)*
    fn expression(&mut self) -> Result<Expression, SyntaxError> {
        let mut node = self.term()?;
        while matches!(self.peek().typ, TT::PLUS | TT::MINUS) {
            let op = self.operator();
            node = Expression::binary(op, node, self.term()?);
        }
        Ok(node)
    }

    // term: factor (('*' | '/') factor)*
    fn term(&mut self) -> Result<Expression, SyntaxError> {
        let mut node = self.factor()?;
        while matches!(self.peek().typ, TT::STAR | TT::SLASH) {
            let op = self.operator();
            node = Expression::binary(op, node, self.factor()?);
        }
        Ok(node)
    }

    fn operator(&mut self) -> Operator {
        match Operator::from_token(self.advance().typ) {
            Some(op) => op,
            None => unreachable!(),
        }
    }

    // factor: NUMBER | IDENTIFIER ['=' expression] | '(' expression ')'
    fn factor(&mut self) -> Result<Expression, SyntaxError> {
        match self.peek().typ {
            TT::NUMBER => {
                let token = self.eat(TT::NUMBER)?;
                match token.lexeme.parse::<i64>() {
                    Ok(value) => Ok(Expression::NumberLiteral(value)),
                    Err(_) => Err(SyntaxError::IntegerTooLarge { found: token }),
                }
            }
            TT::IDENTIFIER => {
                let name = self.eat(TT::IDENTIFIER)?.lexeme;
                if self.peek().typ == TT::ASSIGN {
                    let assign = self.eat(TT::ASSIGN)?;
                    self.enter(assign)?;
                    let value = self.expression()?;
                    self.leave();
                    return Ok(Expression::assignment(name, value));
                }
                Ok(Expression::VariableReference(name))
            }
            TT::LPAREN => {
                let open = self.eat(TT::LPAREN)?;
                self.enter(open)?;
                let node = self.expression()?;
                self.eat(TT::RPAREN)?;
                self.leave();
                Ok(node)
            }
            _ => Err(SyntaxError::UnexpectedToken {
                found: self.peek().clone(),
            }),
        }
    }
}

/// Parses a complete token sequence into a single expression tree.
pub fn parse(tokens: &[Token]) -> Result<Expression, SyntaxError> {
    Parser::new(tokens).parse()
}
