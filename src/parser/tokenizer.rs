use const_format::concatcp;
use derivative::Derivative;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use super::error::LexicalError;
use super::locations::{Location, Span};

#[derive(Clone, Debug, Derivative)]
#[derivative(PartialEq)]
pub struct Token {
    pub typ: TokenType,
    pub lexeme: String,
    #[derivative(PartialEq = "ignore")]
    pub span: Span,
}

impl Token {
    pub(super) fn end_marker(span: Span) -> Self {
        Self {
            typ: TokenType::ENDMARKER,
            lexeme: String::new(),
            span,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}('{}')", self.typ, self.lexeme)
    }
}

#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenType {
    NUMBER,
    IDENTIFIER,
    PLUS,
    MINUS,
    STAR,
    SLASH,
    ASSIGN,
    LPAREN,
    RPAREN,
    ENDMARKER,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

const S_NUMBER: &str = r"[0-9]+";
const S_IDENTIFIER: &str = r"[a-zA-Z_]\w*";
const S_PLUS: &str = r"\+";
const S_MINUS: &str = r"-";
const S_STAR: &str = r"\*";
const S_SLASH: &str = r"/";
const S_ASSIGN: &str = r"=";
const S_LPAREN: &str = r"\(";
const S_RPAREN: &str = r"\)";
const S_WHITESPACE: &str = r"\s+";

macro_rules! anchored {
    ($pattern:expr) => {
        Regex::new(concatcp!("^", $pattern)).expect("Error compiling regex.")
    };
}

/// Token patterns in priority order. The first pattern matching at the cursor
/// wins, so an identifier like `x1` is never split into `x` and `1`.
/// Matches of a `None` pattern are skipped.
static TOKEN_PATTERNS: Lazy<Vec<(Option<TokenType>, Regex)>> = Lazy::new(|| {
    vec![
        (Some(TokenType::NUMBER), anchored!(S_NUMBER)),
        (Some(TokenType::IDENTIFIER), anchored!(S_IDENTIFIER)),
        (Some(TokenType::PLUS), anchored!(S_PLUS)),
        (Some(TokenType::MINUS), anchored!(S_MINUS)),
        (Some(TokenType::STAR), anchored!(S_STAR)),
        (Some(TokenType::SLASH), anchored!(S_SLASH)),
        (Some(TokenType::ASSIGN), anchored!(S_ASSIGN)),
        (Some(TokenType::LPAREN), anchored!(S_LPAREN)),
        (Some(TokenType::RPAREN), anchored!(S_RPAREN)),
        (None, anchored!(S_WHITESPACE)),
    ]
});

pub struct Tokenizer<'a> {
    source: &'a str,
    start: usize,
    location: Location,
    tokens: Vec<Token>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            start: 0,
            location: Location::default(),
            tokens: vec![],
        }
    }

    /// Scans the whole source, stopping at the first character no pattern
    /// accepts.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexicalError> {
        while self.start < self.source.len() {
            self.next_token()?;
        }
        Ok(self.finalize())
    }

    fn finalize(mut self) -> Vec<Token> {
        self.tokens.push(Token::end_marker(Span::at(self.location)));
        debug!(tokens = self.tokens.len(), "scanned source");
        self.tokens
    }

    fn next_token(&mut self) -> Result<(), LexicalError> {
        let rest = &self.source[self.start..];
        for (typ, regex) in TOKEN_PATTERNS.iter() {
            if let Some(m) = regex.find(rest) {
                let start = self.location;
                self.location.advance(m.as_str());
                self.start += m.end();
                if let Some(typ) = *typ {
                    let token = Token {
                        typ,
                        lexeme: m.as_str().to_string(),
                        span: Span::new(start, self.location),
                    };
                    trace!(token = %token, span = %token.span, "token");
                    self.tokens.push(token);
                }
                return Ok(());
            }
        }
        Err(LexicalError::new(rest, self.location))
    }
}

/// Converts `source` into tokens terminated by an `ENDMARKER`.
pub fn scan(source: &str) -> Result<Vec<Token>, LexicalError> {
    Tokenizer::new(source).tokenize()
}
