use super::ast::{Node, Program};
use crate::error::{Error, Result};
use crate::lexer::{Token, TokenKind};
use crate::MAX_PARSE_DEPTH;

/// S-expression parser
///
/// Consumes an expanded token stream (no trivia, no shorthand) and builds the
/// tree of top-level forms. Atom text is classified here. Groups nested more
/// than [`MAX_PARSE_DEPTH`] deep are rejected.
pub struct SExprParser {
    tokens: Vec<Token>,
    current: usize,
}

impl SExprParser {
    /// Creates a new S-expression parser
    pub fn new(tokens: Vec<Token>) -> Self {
        SExprParser { tokens, current: 0 }
    }

    /// Parses the tokens into a program
    pub fn parse(&mut self) -> Result<Program> {
        let mut forms = Vec::new();

        while !self.is_at_end() {
            forms.push(self.parse_node(0)?);
        }

        Ok(Program { forms })
    }

    /// Parses one node; `depth` counts the groups already open around it
    fn parse_node(&mut self, depth: usize) -> Result<Node> {
        let token = self.advance();

        match token.kind {
            TokenKind::LeftParen if depth >= MAX_PARSE_DEPTH => Err(Error::SyntaxError {
                line: token.line,
                col: token.column,
                message: format!("too deeply nested (max depth: {})", MAX_PARSE_DEPTH),
            }),
            TokenKind::LeftParen => self.parse_list(&token, depth + 1),
            TokenKind::RightParen => Err(Self::unbalanced(&token, "unexpected `)`")),
            TokenKind::String(s) => Ok(Node::String(s)),
            TokenKind::Atom(text) => Ok(Self::classify_atom(text)),
            // The expander removes these; seeing one means it was skipped
            TokenKind::Quote => Err(Error::MalformedSyntax {
                line: token.line,
                col: token.column,
                message: "unexpanded quote shorthand".to_string(),
            }),
            TokenKind::Comment(_) | TokenKind::Whitespace => self.parse_node(depth),
            TokenKind::Eof => Err(Self::unbalanced(&token, "unexpected end of input")),
        }
    }

    /// Parse a group after its opening parenthesis
    fn parse_list(&mut self, open: &Token, depth: usize) -> Result<Node> {
        let mut items = Vec::new();

        loop {
            if matches!(self.peek().kind, TokenKind::RightParen) {
                self.advance();
                return Ok(Node::List(items));
            }
            if self.is_at_end() {
                return Err(Self::unbalanced(open, "`(` is never closed"));
            }
            items.push(self.parse_node(depth)?);
        }
    }

    /// Number, boolean or symbol
    fn classify_atom(text: String) -> Node {
        if let Some(n) = parse_number(&text) {
            return Node::Number(n);
        }
        match text.as_str() {
            "true" => Node::Boolean(true),
            "false" => Node::Boolean(false),
            _ => Node::Symbol(text),
        }
    }

    fn unbalanced(token: &Token, detail: &str) -> Error {
        Error::SyntaxError {
            line: token.line,
            col: token.column,
            message: format!("unbalanced parentheses: {}", detail),
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn peek(&self) -> &Token {
        static EOF: Token = Token {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            line: 1,
            column: 1,
        };
        self.tokens.get(self.current).unwrap_or(&EOF)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.current < self.tokens.len() {
            self.current += 1;
        }
        token
    }
}

/// Accepts what `f64` parses, as long as the text looks numeric.
///
/// `f64::from_str` also takes `inf`, `NaN` and `infinity`; those stay symbols.
pub fn parse_number(text: &str) -> Option<f64> {
    let mut chars = text.chars();
    let first = chars.next()?;
    let looks_numeric = first.is_ascii_digit()
        || (matches!(first, '+' | '-' | '.')
            && text[1..]
                .trim_start_matches('.')
                .starts_with(|c: char| c.is_ascii_digit()));
    if !looks_numeric {
        return None;
    }
    text.parse().ok()
}
