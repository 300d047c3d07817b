//! Cursor over a token sequence for the parser
//!
//! There is no end-of-file token; running off the end is reported through
//! `None` and [`TokenStream::is_at_end`].

use crate::tokens::token::{Token, TokenKind};

#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    position: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        crate::log_debug!("Token stream created", "tokens" => tokens.len());
        Self {
            tokens,
            position: 0,
        }
    }

    // === NAVIGATION ===

    pub fn current(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// Consume the current token and return it
    pub fn advance(&mut self) -> Option<&Token> {
        if self.position < self.tokens.len() {
            self.position += 1;
            self.tokens.get(self.position - 1)
        } else {
            None
        }
    }

    /// The most recently consumed token
    pub fn previous(&self) -> Option<&Token> {
        self.position.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    pub fn first(&self) -> Option<&Token> {
        self.tokens.first()
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Current token has the given kind
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current().is_some_and(|t| t.kind == kind)
    }

    /// Consume the current token if it has the given kind
    pub fn match_kind(&mut self, kind: TokenKind) -> Option<&Token> {
        if self.check(kind) {
            self.advance()
        } else {
            None
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize;

    fn stream(source: &str) -> TokenStream {
        TokenStream::new(tokenize(source))
    }

    #[test]
    fn test_navigation() {
        let mut s = stream("let x = 1;");

        assert_eq!(s.len(), 5);
        assert!(s.previous().is_none());
        assert!(s.check(TokenKind::Let));
        assert_eq!(s.first().map(|t| t.text.as_str()), Some("let"));

        assert_eq!(s.advance().map(|t| t.kind), Some(TokenKind::Let));
        assert_eq!(s.previous().map(|t| t.kind), Some(TokenKind::Let));
        assert_eq!(s.position(), 1);

        assert!(s.match_kind(TokenKind::Number).is_none());
        assert!(s.match_kind(TokenKind::Identifier).is_some());
        assert_eq!(s.position(), 2);
    }

    #[test]
    fn test_advance_past_end() {
        let mut s = stream(";");

        assert!(s.advance().is_some());
        assert!(s.is_at_end());
        assert!(s.advance().is_none());
        assert!(s.current().is_none());
        assert_eq!(s.previous().map(|t| t.kind), Some(TokenKind::Semicolon));
    }

    #[test]
    fn test_empty_stream() {
        let s = TokenStream::new(Vec::new());
        assert!(s.is_empty());
        assert!(s.is_at_end());
        assert!(s.first().is_none());
    }
}
