use super::token::{Token, TokenKind};
use crate::error::{Error, Result};
use crate::MAX_PARSE_DEPTH;

/// Rewrites reader shorthand into canonical long form
///
/// - comment and whitespace tokens are dropped
/// - `'datum` becomes `(quote datum)`, nesting as needed (`''a`)
///
/// The output keeps the trailing `Eof` token. Quoted data nested more than
/// [`MAX_PARSE_DEPTH`] deep is rejected.
pub struct Expander {
    tokens: Vec<Token>,
    current: usize,
}

impl Expander {
    /// Creates an expander over a scanned token stream
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens: Vec<Token> = tokens
            .into_iter()
            .filter(|t| !t.kind.is_trivia())
            .collect();
        if tokens.last().map(|t| &t.kind) != Some(&TokenKind::Eof) {
            let (line, column) = tokens.last().map_or((1, 1), |t| (t.line, t.column));
            tokens.push(Token::synthetic(TokenKind::Eof, line, column));
        }
        Expander { tokens, current: 0 }
    }

    /// Expands the whole stream
    pub fn expand(&mut self) -> Result<Vec<Token>> {
        let mut out = Vec::with_capacity(self.tokens.len());

        while !self.is_at_end() {
            match self.peek().kind.clone() {
                TokenKind::Quote => self.expand_quote(&mut out, 0)?,
                _ => out.push(self.advance()),
            }
        }

        out.push(self.peek().clone());
        Ok(out)
    }

    /// Expands one `'datum` occurrence starting at the quote token
    ///
    /// `depth` counts the quoted groups and quotes already open around it.
    fn expand_quote(&mut self, out: &mut Vec<Token>, depth: usize) -> Result<()> {
        let quote = self.advance();
        let (line, column) = (quote.line, quote.column);

        out.push(Token::synthetic(TokenKind::LeftParen, line, column));
        out.push(Token::synthetic(
            TokenKind::Atom("quote".to_string()),
            line,
            column,
        ));
        self.expand_datum(out, &quote, depth + 1)?;
        out.push(Token::synthetic(TokenKind::RightParen, line, column));

        Ok(())
    }

    /// Copies exactly one datum (atom, string, group or nested quote)
    fn expand_datum(&mut self, out: &mut Vec<Token>, quote: &Token, depth: usize) -> Result<()> {
        if depth > MAX_PARSE_DEPTH {
            let token = self.peek();
            return Err(Error::MalformedSyntax {
                line: token.line,
                col: token.column,
                message: format!("too deeply nested (max depth: {})", MAX_PARSE_DEPTH),
            });
        }

        match self.peek().kind.clone() {
            TokenKind::Atom(_) | TokenKind::String(_) => {
                out.push(self.advance());
                Ok(())
            }
            TokenKind::Quote => self.expand_quote(out, depth),
            TokenKind::LeftParen => {
                out.push(self.advance());
                loop {
                    match self.peek().kind.clone() {
                        TokenKind::RightParen => {
                            out.push(self.advance());
                            return Ok(());
                        }
                        TokenKind::Eof => {
                            return Err(Self::malformed(
                                quote,
                                "quoted group is never closed",
                            ))
                        }
                        _ => self.expand_datum(out, quote, depth + 1)?,
                    }
                }
            }
            TokenKind::RightParen | TokenKind::Eof => Err(Self::malformed(
                quote,
                "quote must be followed by an atom or a group",
            )),
            TokenKind::Comment(_) | TokenKind::Whitespace => {
                self.advance();
                self.expand_datum(out, quote, depth)
            }
        }
    }

    fn malformed(quote: &Token, message: &str) -> Error {
        Error::MalformedSyntax {
            line: quote.line,
            col: quote.column,
            message: message.to_string(),
        }
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn peek(&self) -> &Token {
        // `new` guarantees a trailing Eof, which is never consumed
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.current += 1;
        }
        token
    }
}
