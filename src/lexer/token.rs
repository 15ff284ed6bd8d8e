use serde::{Deserialize, Serialize};

/// A single token from the source code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The type of token
    pub kind: TokenKind,
    /// Original text of the token
    pub lexeme: String,
    /// Line number where token appears (1-indexed)
    pub line: usize,
    /// Column number where token starts (1-indexed)
    pub column: usize,
}

impl Token {
    /// Creates a new token with the given properties
    pub fn new(kind: TokenKind, lexeme: String, line: usize, column: usize) -> Self {
        Token {
            kind,
            lexeme,
            line,
            column,
        }
    }

    /// Creates a token that did not come from source text (used by the expander)
    pub fn synthetic(kind: TokenKind, line: usize, column: usize) -> Self {
        let lexeme = kind.to_string();
        Token::new(kind, lexeme, line, column)
    }
}

/// All possible token types
///
/// Atoms stay raw text here. Deciding whether `42`, `true` or `foo` is a
/// number, boolean or symbol is the parser's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenKind {
    // Delimiters
    /// Left parenthesis (
    LeftParen,
    /// Right parenthesis )
    RightParen,
    /// Quote shorthand (')
    Quote,

    // Literals
    /// String literal (contents with escapes decoded)
    String(String),
    /// Any other run of non-delimiter characters
    Atom(String),

    // Trivia, dropped by the expander
    /// `;` comment running to end of line (text without the `;`)
    Comment(String),
    /// Run of whitespace
    Whitespace,

    // Special
    /// End of input marker
    Eof,
}

impl TokenKind {
    /// True for tokens that carry no meaning for the parser
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Comment(_) | TokenKind::Whitespace)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TokenKind::LeftParen => write!(f, "("),
            TokenKind::RightParen => write!(f, ")"),
            TokenKind::Quote => write!(f, "'"),
            TokenKind::String(s) => write!(f, "\"{}\"", s),
            TokenKind::Atom(text) => write!(f, "{}", text),
            TokenKind::Comment(text) => write!(f, ";{}", text),
            TokenKind::Whitespace => write!(f, " "),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}
