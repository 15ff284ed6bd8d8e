use super::token::{Token, TokenKind};
use crate::error::{Error, Result};

/// Scanner for S-expression source text
///
/// Produces a flat token stream. Grouping is not checked here; an unbalanced
/// line scans fine and is rejected by the parser.
pub struct SExprScanner {
    /// Source code as character vector
    source: Vec<char>,
    /// Accumulated tokens
    tokens: Vec<Token>,
    /// Start position of current token
    start: usize,
    /// Current position in source
    current: usize,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column number (1-indexed)
    column: usize,
    /// Line where the current token started
    start_line: usize,
    /// Column where the current token started
    start_column: usize,
}

impl SExprScanner {
    /// Creates a new S-expression scanner from source code
    pub fn new(source: &str) -> Self {
        SExprScanner {
            source: source.chars().collect(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            start_line: 1,
            start_column: 1,
        }
    }

    /// Scans all tokens from source code and returns them as a vector
    pub fn scan_tokens(&mut self) -> Result<Vec<Token>> {
        while !self.is_at_end() {
            self.start = self.current;
            self.start_line = self.line;
            self.start_column = self.column;
            self.scan_token()?;
        }

        self.tokens.push(Token::new(
            TokenKind::Eof,
            String::new(),
            self.line,
            self.column,
        ));

        Ok(std::mem::take(&mut self.tokens))
    }

    fn scan_token(&mut self) -> Result<()> {
        let c = self.advance();

        match c {
            c if c.is_whitespace() => {
                while self.peek().is_some_and(char::is_whitespace) {
                    self.advance();
                }
                self.add_token(TokenKind::Whitespace);
            }

            ';' => {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                let text: String = self.source[self.start + 1..self.current].iter().collect();
                self.add_token(TokenKind::Comment(text));
            }

            '(' => self.add_token(TokenKind::LeftParen),
            ')' => self.add_token(TokenKind::RightParen),
            '\'' => self.add_token(TokenKind::Quote),

            '"' => self.scan_string()?,

            _ => self.scan_atom(),
        }

        Ok(())
    }

    fn scan_string(&mut self) -> Result<()> {
        let mut value = String::new();

        loop {
            let Some(c) = self.peek() else {
                return Err(Error::SyntaxError {
                    line: self.start_line,
                    col: self.start_column,
                    message: "Unterminated string literal".to_string(),
                });
            };

            match c {
                '"' => break,
                '\\' => {
                    self.advance();
                    let escaped = self.peek().map(|_| self.advance());
                    match escaped {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('r') => value.push('\r'),
                        Some('\\') => value.push('\\'),
                        Some('"') => value.push('"'),
                        Some(other) => {
                            return Err(Error::SyntaxError {
                                line: self.line,
                                col: self.column,
                                message: format!("Invalid escape sequence \\{}", other),
                            });
                        }
                        None => {
                            return Err(Error::SyntaxError {
                                line: self.start_line,
                                col: self.start_column,
                                message: "Unterminated string literal".to_string(),
                            });
                        }
                    }
                }
                _ => value.push(self.advance()),
            }
        }

        self.advance(); // Closing "

        self.add_token(TokenKind::String(value));
        Ok(())
    }

    fn scan_atom(&mut self) {
        while self.peek().is_some_and(|c| !Self::is_delimiter(c)) {
            self.advance();
        }

        let text: String = self.source[self.start..self.current].iter().collect();
        self.add_token(TokenKind::Atom(text));
    }

    fn is_delimiter(c: char) -> bool {
        c.is_whitespace() || matches!(c, '(' | ')' | '\'' | '"' | ';')
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.current).copied()
    }

    fn add_token(&mut self, kind: TokenKind) {
        let lexeme: String = self.source[self.start..self.current].iter().collect();
        self.tokens.push(Token::new(
            kind,
            lexeme,
            self.start_line,
            self.start_column,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut scanner = SExprScanner::new(source);
        scanner
            .scan_tokens()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn test_simple_sexpr() {
        let source = "(+ 1 2)";
        let mut scanner = SExprScanner::new(source);
        let tokens = scanner.scan_tokens().unwrap();

        // ( + ws 1 ws 2 ) EOF
        assert_eq!(tokens.len(), 8);
        assert_eq!(tokens[0].kind, TokenKind::LeftParen);
        assert_eq!(tokens[1].kind, TokenKind::Atom("+".to_string()));
        assert_eq!(tokens[2].kind, TokenKind::Whitespace);
        assert_eq!(tokens[3].kind, TokenKind::Atom("1".to_string()));
        assert_eq!(tokens[5].kind, TokenKind::Atom("2".to_string()));
        assert_eq!(tokens[6].kind, TokenKind::RightParen);
        assert_eq!(tokens[7].kind, TokenKind::Eof);
    }

    #[test]
    fn test_atoms_split_on_parens_and_quotes() {
        assert_eq!(
            kinds("(set! x'y)"),
            vec![
                TokenKind::LeftParen,
                TokenKind::Atom("set!".to_string()),
                TokenKind::Atom("x".to_string()),
                TokenKind::Quote,
                TokenKind::Atom("y".to_string()),
                TokenKind::RightParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_literal_keeps_delimiters_verbatim() {
        assert_eq!(
            kinds(r#"(display "a (b) ; 'c'")"#),
            vec![
                TokenKind::LeftParen,
                TokenKind::Atom("display".to_string()),
                TokenKind::String("a (b) ; 'c'".to_string()),
                TokenKind::RightParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            kinds(r#""line\n\"quoted\"""#)[0],
            TokenKind::String("line\n\"quoted\"".to_string())
        );
    }

    #[test]
    fn test_unterminated_string() {
        let mut scanner = SExprScanner::new("(display \"oops)");
        let err = scanner.scan_tokens().unwrap_err();
        assert!(matches!(err, Error::SyntaxError { line: 1, col: 10, .. }));
    }

    #[test]
    fn test_invalid_escape() {
        let mut scanner = SExprScanner::new(r#""\q""#);
        assert!(scanner.scan_tokens().is_err());
    }

    #[test]
    fn test_comment_token() {
        let mut scanner = SExprScanner::new("; note\n(+ 1 2)");
        let tokens = scanner.scan_tokens().unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Comment(" note".to_string()));
        assert_eq!(tokens[1].kind, TokenKind::Whitespace);
        assert_eq!(tokens[2].kind, TokenKind::LeftParen);
        assert_eq!(tokens[2].line, 2);
        assert_eq!(tokens[2].column, 1);
    }

    #[test]
    fn test_unbalanced_input_still_scans() {
        assert!(SExprScanner::new("((( ))))").scan_tokens().is_ok());
    }
}
