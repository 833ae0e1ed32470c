//! Forward cursor over a token slice
//!
//! Comment tokens are skipped so that every pass sees the same significant
//! sequence whether or not comments were kept by the tokenizer.

use crate::tokens::token::{Token, TokenKind};

#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    tokens: &'a [Token],
    /// Indices into `tokens` of non-comment tokens
    significant_indices: Vec<usize>,
    position: usize,
}

impl<'a> TokenStream<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        let significant_indices = tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| token.kind != TokenKind::Comment)
            .map(|(i, _)| i)
            .collect();

        Self {
            tokens,
            significant_indices,
            position: 0,
        }
    }

    pub fn current(&self) -> Option<&'a Token> {
        self.peek_ahead(0)
    }

    pub fn peek(&self) -> Option<&'a Token> {
        self.peek_ahead(1)
    }

    pub fn peek_ahead(&self, n: usize) -> Option<&'a Token> {
        let tokens = self.tokens;
        self.significant_indices
            .get(self.position + n)
            .and_then(|&index| tokens.get(index))
    }

    pub fn current_kind(&self) -> TokenKind {
        self.current()
            .map(|token| token.kind)
            .unwrap_or(TokenKind::EndOfCode)
    }

    /// Consume the current token and return it
    pub fn advance(&mut self) -> Option<&'a Token> {
        let token = self.current();
        if self.position < self.significant_indices.len() {
            self.position += 1;
        }
        token
    }

    /// True at EndOfCode or past the last token
    pub fn is_at_end(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::EndOfCode | TokenKind::EndOfStream
        )
    }

    /// Line of the current token, or of the last token at the end
    pub fn line(&self) -> u32 {
        self.current()
            .or_else(|| self.tokens.last())
            .map(|token| token.line)
            .unwrap_or(1)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Consume the current token when `pred` accepts it
    pub fn advance_if(&mut self, pred: impl Fn(&Token) -> bool) -> Option<&'a Token> {
        match self.current() {
            Some(token) if pred(token) => self.advance(),
            _ => None,
        }
    }

    /// Skip blank statements: newlines and stray `;`
    pub fn skip_separators(&mut self) {
        while self
            .advance_if(|t| t.kind == TokenKind::Newline || t.is_operator(";"))
            .is_some()
        {}
    }

    pub fn len(&self) -> usize {
        self.significant_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.significant_indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> Vec<Token> {
        vec![
            Token::new(TokenKind::Identifier, "x", 0, 1, 1),
            Token::new(TokenKind::Comment, "// note", 2, 9, 1),
            Token::new(TokenKind::Newline, "\n", 9, 10, 1),
            Token::new(TokenKind::Operator, ";", 10, 11, 2),
            Token::new(TokenKind::EndOfCode, "", 11, 11, 2),
        ]
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = tokens();
        let mut stream = TokenStream::new(&tokens);

        assert_eq!(stream.len(), 4);
        assert_eq!(stream.advance().map(|t| t.text.as_str()), Some("x"));
        assert_eq!(stream.current_kind(), TokenKind::Newline);
    }

    #[test]
    fn test_skip_separators_and_end() {
        let tokens = tokens();
        let mut stream = TokenStream::new(&tokens);
        stream.advance();
        stream.skip_separators();

        assert!(stream.is_at_end());
        assert_eq!(stream.line(), 2);
        stream.advance();
        stream.advance();
        assert_eq!(stream.current_kind(), TokenKind::EndOfCode);
        assert!(stream.current().is_none());
    }

    #[test]
    fn test_peek_does_not_advance() {
        let tokens = tokens();
        let stream = TokenStream::new(&tokens);

        assert_eq!(stream.peek().map(|t| t.kind), Some(TokenKind::Newline));
        assert_eq!(stream.position(), 0);
    }
}
