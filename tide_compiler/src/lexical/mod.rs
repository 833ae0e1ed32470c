//! Lexical analysis: keyword trie, indentation stack and tokenizer
//!
//! [`tokenize`] is the one-call entry point. [`LexicalAnalyzer`] keeps a
//! keyword set and runtime preferences across several sources.

pub mod analyzer;
pub mod error;
pub mod indent;
pub mod tokenizer;
pub mod trie;

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::tokens::Token;

pub use analyzer::{LexicalAnalyzer, LexicalMetrics};
pub use error::LexerError;
pub use indent::{IndentChange, IndentMismatch, IndentStack};
pub use tokenizer::Tokenizer;
pub use trie::{KeywordTrie, DEFAULT_KEYWORDS};

/// Tokenize `source` against `keywords` with default preferences
pub fn tokenize(source: &str, keywords: &KeywordTrie) -> Result<Vec<Token>, LexerError> {
    Tokenizer::new(source, keywords).tokenize()
}

pub fn tokenize_with_preferences(
    source: &str,
    keywords: KeywordTrie,
    preferences: LexicalPreferences,
) -> Result<(Vec<Token>, LexicalMetrics), LexerError> {
    let mut analyzer = LexicalAnalyzer::with_preferences(keywords, preferences);
    let tokens = analyzer.tokenize(source)?;
    Ok((tokens, analyzer.metrics().clone()))
}

const LEXICAL_CODES: [crate::logging::Code; 11] = [
    codes::structural::INCONSISTENT_INDENTATION,
    codes::structural::TAB_INDENTATION,
    codes::structural::INDENT_TOO_DEEP,
    codes::lexical::INVALID_CHARACTER,
    codes::lexical::UNTERMINATED_STRING,
    codes::lexical::INVALID_NUMBER,
    codes::lexical::IDENTIFIER_TOO_LONG,
    codes::lexical::STRING_TOO_LARGE,
    codes::lexical::UNTERMINATED_COMMENT,
    codes::lexical::COMMENT_TOO_LONG,
    codes::lexical::TOO_MANY_TOKENS,
];

/// Check that every code the tokenizer can raise is registered and the
/// compile-time limits are usable.
pub fn validate_tokenization() -> Result<(), String> {
    for code in &LEXICAL_CODES {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Lexical error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    if MAX_IDENTIFIER_LENGTH == 0 {
        return Err("MAX_IDENTIFIER_LENGTH cannot be zero".to_string());
    }
    if MAX_TOKEN_COUNT == 0 {
        return Err("MAX_TOKEN_COUNT cannot be zero".to_string());
    }
    if MAX_INDENT_DEPTH == 0 {
        return Err("MAX_INDENT_DEPTH cannot be zero".to_string());
    }

    crate::log_debug!("Lexical limits",
        "max_string_size" => MAX_STRING_SIZE,
        "max_identifier_length" => MAX_IDENTIFIER_LENGTH,
        "max_comment_length" => MAX_COMMENT_LENGTH,
        "max_token_count" => MAX_TOKEN_COUNT,
        "max_indent_depth" => MAX_INDENT_DEPTH
    );

    Ok(())
}

/// Compile-time lexical limits, for reporting
#[derive(Debug, Clone)]
pub struct LexicalLimits {
    pub max_string_size: usize,
    pub max_identifier_length: usize,
    pub max_comment_length: usize,
    pub max_token_count: usize,
    pub max_indent_depth: usize,
}

pub fn get_lexical_limits() -> LexicalLimits {
    LexicalLimits {
        max_string_size: MAX_STRING_SIZE,
        max_identifier_length: MAX_IDENTIFIER_LENGTH,
        max_comment_length: MAX_COMMENT_LENGTH,
        max_token_count: MAX_TOKEN_COUNT,
        max_indent_depth: MAX_INDENT_DEPTH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenKind;

    #[test]
    fn test_validate_tokenization() {
        assert!(validate_tokenization().is_ok());
    }

    #[test]
    fn test_limits() {
        let limits = get_lexical_limits();
        assert!(limits.max_identifier_length > 0);
        assert!(limits.max_indent_depth > 0);
    }

    #[test]
    fn test_tokenize_entry_points() {
        let keywords = KeywordTrie::with_default_keywords();
        let tokens = tokenize("print(1)", &keywords).unwrap();
        assert_eq!(tokens.first().map(|t| t.kind), Some(TokenKind::Keyword));

        let preferences = LexicalPreferences {
            keep_comments: true,
            ..Default::default()
        };
        let (tokens, metrics) =
            tokenize_with_preferences("x // c", keywords, preferences).unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(metrics.comment_count, 1);
    }
}
