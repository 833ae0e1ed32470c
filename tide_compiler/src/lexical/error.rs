use crate::config::compile_time::lexical::*;
use crate::logging::codes::{self, Severity};
use crate::logging::Code;

/// Tokenization failures. Every variant aborts the pass.
///
/// Indentation problems are the structural category, everything else is
/// lexical; see [`LexerError::is_structural`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexerError {
    #[error("Inconsistent indentation at line {line}: width {width} has no matching indentation level (nearest is {expected})")]
    InconsistentIndentation {
        line: u32,
        width: usize,
        expected: usize,
    },

    #[error("Tab character in indentation at line {line}")]
    TabIndentation { line: u32 },

    #[error("Indentation nested {depth} levels deep at line {line} (max {MAX_INDENT_DEPTH})")]
    IndentTooDeep { line: u32, depth: usize },

    #[error("Unexpected character '{character}' at line {line}, column {column}")]
    InvalidCharacter {
        character: char,
        line: u32,
        column: usize,
    },

    #[error("Unterminated string literal starting at line {line}")]
    UnterminatedString { line: u32 },

    #[error("Invalid number format '{text}' at line {line}")]
    InvalidNumber { text: String, line: u32 },

    #[error("Identifier too long at line {line}: {length} characters (max {MAX_IDENTIFIER_LENGTH})")]
    IdentifierTooLong { length: usize, line: u32 },

    #[error("String too large at line {line}: {size} bytes (max {MAX_STRING_SIZE})")]
    StringTooLarge { size: usize, line: u32 },

    #[error("Unterminated block comment starting at line {line}")]
    UnterminatedComment { line: u32 },

    #[error("Comment too long at line {line}: {length} characters (max {MAX_COMMENT_LENGTH})")]
    CommentTooLong { length: usize, line: u32 },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize, line: u32 },
}

impl LexerError {
    pub fn error_code(&self) -> Code {
        match self {
            LexerError::InconsistentIndentation { .. } => {
                codes::structural::INCONSISTENT_INDENTATION
            }
            LexerError::TabIndentation { .. } => codes::structural::TAB_INDENTATION,
            LexerError::IndentTooDeep { .. } => codes::structural::INDENT_TOO_DEEP,
            LexerError::InvalidCharacter { .. } => codes::lexical::INVALID_CHARACTER,
            LexerError::UnterminatedString { .. } => codes::lexical::UNTERMINATED_STRING,
            LexerError::InvalidNumber { .. } => codes::lexical::INVALID_NUMBER,
            LexerError::IdentifierTooLong { .. } => codes::lexical::IDENTIFIER_TOO_LONG,
            LexerError::StringTooLarge { .. } => codes::lexical::STRING_TOO_LARGE,
            LexerError::UnterminatedComment { .. } => codes::lexical::UNTERMINATED_COMMENT,
            LexerError::CommentTooLong { .. } => codes::lexical::COMMENT_TOO_LONG,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            LexerError::InconsistentIndentation { line, .. }
            | LexerError::TabIndentation { line }
            | LexerError::IndentTooDeep { line, .. }
            | LexerError::InvalidCharacter { line, .. }
            | LexerError::UnterminatedString { line }
            | LexerError::InvalidNumber { line, .. }
            | LexerError::IdentifierTooLong { line, .. }
            | LexerError::StringTooLarge { line, .. }
            | LexerError::UnterminatedComment { line }
            | LexerError::CommentTooLong { line, .. }
            | LexerError::TooManyTokens { line, .. } => *line,
        }
    }

    /// Off-side rule violations
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            LexerError::InconsistentIndentation { .. }
                | LexerError::TabIndentation { .. }
                | LexerError::IndentTooDeep { .. }
        )
    }

    pub fn is_lexical(&self) -> bool {
        !self.is_structural()
    }

    pub fn severity(&self) -> Severity {
        codes::get_severity(self.error_code().as_str())
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let structural = LexerError::InconsistentIndentation {
            line: 4,
            width: 2,
            expected: 0,
        };
        assert!(structural.is_structural());
        assert_eq!(structural.error_code(), codes::structural::INCONSISTENT_INDENTATION);
        assert_eq!(structural.line(), 4);

        let lexical = LexerError::InvalidNumber {
            text: "1.2.".to_string(),
            line: 1,
        };
        assert!(lexical.is_lexical());
        assert!(lexical.requires_halt());
        assert!(lexical.to_string().contains("'1.2.'"));
    }
}
