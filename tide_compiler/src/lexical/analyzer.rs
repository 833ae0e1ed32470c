use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::lexical::error::LexerError;
use crate::lexical::tokenizer::Tokenizer;
use crate::lexical::trie::KeywordTrie;
use crate::logging::codes;
use crate::tokens::{Token, TokenKind};
use crate::{log_debug, log_error, log_success};
use std::collections::HashMap;

/// Per-pass token statistics
#[derive(Debug, Default, Clone)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub keyword_tokens: usize,
    pub identifier_tokens: usize,
    pub number_tokens: usize,
    pub string_tokens: usize,
    pub operator_tokens: usize,
    pub bracket_tokens: usize,
    pub newline_tokens: usize,
    pub indent_tokens: usize,
    pub dedent_tokens: usize,
    pub comment_count: usize,
    pub max_indent_depth: usize,
    pub max_string_length: usize,
    pub max_comment_length: usize,

    /// Filled only when `collect_detailed_metrics` is set
    pub operator_usage: HashMap<String, usize>,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: &Token) {
        self.total_tokens += 1;

        match token.kind {
            TokenKind::Keyword => self.keyword_tokens += 1,
            TokenKind::Identifier => self.identifier_tokens += 1,
            TokenKind::Number => self.number_tokens += 1,
            TokenKind::String => self.string_tokens += 1,
            TokenKind::Operator | TokenKind::RelOp => self.operator_tokens += 1,
            TokenKind::Bracket => self.bracket_tokens += 1,
            TokenKind::Newline => self.newline_tokens += 1,
            TokenKind::Indent => self.indent_tokens += 1,
            TokenKind::Dedent => self.dedent_tokens += 1,
            TokenKind::Comment => self.comment_count += 1,
            _ => {}
        }
    }

    pub(crate) fn record_indent_depth(&mut self, depth: usize) {
        self.max_indent_depth = self.max_indent_depth.max(depth);
    }

    pub(crate) fn record_string_length(&mut self, length: usize) {
        self.max_string_length = self.max_string_length.max(length);
    }

    pub(crate) fn record_comment_length(&mut self, length: usize) {
        self.max_comment_length = self.max_comment_length.max(length);
    }

    fn record_operator_usage(&mut self, tokens: &[Token]) {
        for token in tokens
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::Operator | TokenKind::RelOp))
        {
            *self.operator_usage.entry(token.text.clone()).or_insert(0) += 1;
        }
    }

    /// Indent and Dedent counts always match on success
    pub fn is_balanced(&self) -> bool {
        self.indent_tokens == self.dedent_tokens
    }
}

/// Owns the keyword set and runs tokenizer passes with logging
pub struct LexicalAnalyzer {
    keywords: KeywordTrie,
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl LexicalAnalyzer {
    pub fn new(keywords: KeywordTrie) -> Self {
        Self::with_preferences(keywords, LexicalPreferences::default())
    }

    pub fn with_preferences(keywords: KeywordTrie, preferences: LexicalPreferences) -> Self {
        Self {
            keywords,
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    pub fn tokenize(&mut self, source: &str) -> Result<Vec<Token>, LexerError> {
        self.metrics = LexicalMetrics::default();

        log_debug!("Starting lexical analysis",
            "bytes" => source.len(),
            "keywords" => self.keywords.len(),
            "max_tokens_allowed" => MAX_TOKEN_COUNT
        );

        let result = Tokenizer::new(source, &self.keywords)
            .keep_comments(self.preferences.keep_comments)
            .tokenize_with_metrics();

        let (tokens, mut metrics) = match result {
            Ok(output) => output,
            Err(error) => {
                log_error!(error.error_code(), &error.to_string(),
                    "line" => error.line(),
                    "category" => if error.is_structural() { "structural" } else { "lexical" }
                );
                return Err(error);
            }
        };

        if self.preferences.collect_detailed_metrics {
            metrics.record_operator_usage(&tokens);
            log_debug!("Operator usage",
                "distinct_operators" => metrics.operator_usage.len(),
                "max_string_length" => metrics.max_string_length,
                "max_comment_length" => metrics.max_comment_length
            );
        }

        log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
            "tokens" => tokens.len(),
            "keywords" => metrics.keyword_tokens,
            "identifiers" => metrics.identifier_tokens,
            "max_indent_depth" => metrics.max_indent_depth
        );

        self.metrics = metrics;
        Ok(tokens)
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    pub fn keywords(&self) -> &KeywordTrie {
        &self.keywords
    }
}
