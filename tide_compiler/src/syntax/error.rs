//! Grammar validation errors with error code mapping

use crate::config::compile_time::syntax::MAX_BRACKET_DEPTH;
use crate::logging::codes::{self, Severity};
use crate::logging::Code;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error("Unbalanced bracket '{bracket}' at line {line}")]
    UnbalancedBracket { bracket: String, line: u32 },

    #[error("Mismatched brackets at line {line}: '{open}' closed by '{close}'")]
    MismatchedBracket {
        open: String,
        close: String,
        line: u32,
    },

    #[error("Brackets nested deeper than {MAX_BRACKET_DEPTH} at line {line}")]
    BracketDepthExceeded { line: u32 },

    #[error("Missing ':' after '{keyword}' header at line {line}")]
    MissingColon { keyword: String, line: u32 },

    #[error("Expected an indented block after '{keyword}' at line {line}")]
    ExpectedBlock { keyword: String, line: u32 },

    #[error("Unexpected indentation at line {line}")]
    UnexpectedIndent { line: u32 },

    #[error("Malformed function header at line {line}: unexpected {found}")]
    MalformedFunctionHeader { found: String, line: u32 },

    #[error("Malformed for header at line {line}: expected 'for <name> in range(...)', found {found}")]
    MalformedForHeader { found: String, line: u32 },

    #[error("'{keyword}' without a preceding 'if' at line {line}")]
    DanglingElse { keyword: String, line: u32 },
}

impl SyntaxError {
    pub fn error_code(&self) -> Code {
        match self {
            SyntaxError::UnbalancedBracket { .. } => codes::syntax::UNBALANCED_BRACKET,
            SyntaxError::MismatchedBracket { .. } => codes::syntax::MISMATCHED_BRACKET,
            SyntaxError::BracketDepthExceeded { .. } => codes::syntax::BRACKET_DEPTH_EXCEEDED,
            SyntaxError::MissingColon { .. } => codes::syntax::MISSING_COLON,
            SyntaxError::ExpectedBlock { .. } => codes::syntax::EXPECTED_BLOCK,
            SyntaxError::UnexpectedIndent { .. } => codes::syntax::UNEXPECTED_INDENT,
            SyntaxError::MalformedFunctionHeader { .. } => {
                codes::syntax::MALFORMED_FUNCTION_HEADER
            }
            SyntaxError::MalformedForHeader { .. } => codes::syntax::MALFORMED_FOR_HEADER,
            SyntaxError::DanglingElse { .. } => codes::syntax::DANGLING_ELSE,
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            SyntaxError::UnbalancedBracket { line, .. }
            | SyntaxError::MismatchedBracket { line, .. }
            | SyntaxError::BracketDepthExceeded { line }
            | SyntaxError::MissingColon { line, .. }
            | SyntaxError::ExpectedBlock { line, .. }
            | SyntaxError::UnexpectedIndent { line }
            | SyntaxError::MalformedFunctionHeader { line, .. }
            | SyntaxError::MalformedForHeader { line, .. }
            | SyntaxError::DanglingElse { line, .. } => *line,
        }
    }

    pub fn severity(&self) -> Severity {
        codes::get_severity(self.error_code().as_str())
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }
}
