//! Classified, positioned slices of source text
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Keyword,
    Number,
    /// Comparison operators: `==`, `!=`, `<=`, `>=`, `<`, `>`
    RelOp,
    Operator,
    String,
    Identifier,
    Newline,
    Comment,
    Dedent,
    /// One of `( ) [ ] { }`
    Bracket,
    Indent,
    EndOfStream,
    Unknown,
    /// Always the last token of a tokenized source
    EndOfCode,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Number => "NUMBER",
            TokenKind::RelOp => "RELOP",
            TokenKind::Operator => "OPERATOR",
            TokenKind::String => "STRING",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Comment => "COMMENT",
            TokenKind::Dedent => "DEDENT",
            TokenKind::Bracket => "BRACKET",
            TokenKind::Indent => "INDENT",
            TokenKind::EndOfStream => "EOS",
            TokenKind::Unknown => "UNKNOWN",
            TokenKind::EndOfCode => "EOC",
        }
    }

    /// Tokens produced by the indentation handler rather than scanned text
    pub fn is_layout(&self) -> bool {
        matches!(
            self,
            TokenKind::Indent | TokenKind::Dedent | TokenKind::Newline
        )
    }

    /// Operand tokens inside an expression
    pub fn is_operand(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier | TokenKind::Number | TokenKind::String
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token never changes after the tokenizer creates it.
///
/// `text` is the exact source slice `start..end`; Indent, Dedent and
/// EndOfCode are zero-width and carry empty text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub line: u32,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, start: usize, end: usize, line: u32) -> Self {
        Self {
            kind,
            text: text.into(),
            start,
            end,
            line,
        }
    }

    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.is(TokenKind::Keyword, word)
    }

    pub fn is_operator(&self, symbol: &str) -> bool {
        self.is(TokenKind::Operator, symbol)
    }

    pub fn is_bracket(&self, bracket: &str) -> bool {
        self.is(TokenKind::Bracket, bracket)
    }

    /// Newline, `;` and `:` end an expression
    pub fn is_expression_terminator(&self) -> bool {
        match self.kind {
            TokenKind::Newline
            | TokenKind::Indent
            | TokenKind::Dedent
            | TokenKind::EndOfCode
            | TokenKind::EndOfStream => true,
            TokenKind::Operator => self.text == ";" || self.text == ":",
            _ => false,
        }
    }

    /// Human-readable form for diagnostics
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Newline => "end of line".to_string(),
            TokenKind::Indent => "indent".to_string(),
            TokenKind::Dedent => "dedent".to_string(),
            TokenKind::EndOfCode | TokenKind::EndOfStream => "end of input".to_string(),
            _ => format!("'{}'", self.text),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Newline => write!(f, "{}(\\n)@{}", self.kind, self.line),
            _ => write!(f, "{}({})@{}", self.kind, self.text, self.line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminators() {
        assert!(Token::new(TokenKind::Operator, ";", 0, 1, 1).is_expression_terminator());
        assert!(Token::new(TokenKind::Operator, ":", 0, 1, 1).is_expression_terminator());
        assert!(Token::new(TokenKind::Newline, "\n", 0, 1, 1).is_expression_terminator());
        assert!(!Token::new(TokenKind::Operator, "+", 0, 1, 1).is_expression_terminator());
        assert!(!Token::new(TokenKind::RelOp, "<", 0, 1, 1).is_expression_terminator());
    }

    #[test]
    fn test_display_and_describe() {
        let token = Token::new(TokenKind::Keyword, "while", 11, 16, 2);
        assert_eq!(token.to_string(), "KEYWORD(while)@2");
        assert_eq!(token.describe(), "'while'");
        assert!(token.is_keyword("while"));
        assert!(!token.is_keyword("for"));

        let newline = Token::new(TokenKind::Newline, "\n", 10, 11, 1);
        assert_eq!(newline.to_string(), "NEWLINE(\\n)@1");
    }

    #[test]
    fn test_token_serializes_kind_by_name() {
        let token = Token::new(TokenKind::RelOp, "<=", 3, 5, 1);
        let json = serde_json::to_string(&token).unwrap();
        assert!(json.contains("\"kind\":\"RelOp\""));
        assert!(json.contains("\"text\":\"<=\""));
    }
}
