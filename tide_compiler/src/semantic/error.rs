use crate::config::compile_time::semantic::*;
use crate::logging::codes::{self, Severity};
use crate::logging::Code;

pub type SemanticResult<T> = Result<T, SemanticError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SemanticError {
    #[error("Undeclared variable '{name}' at line {line}")]
    UndeclaredVariable { name: String, line: u32 },

    #[error("'{name}' is already declared in this scope (line {line})")]
    Redeclaration { name: String, line: u32 },

    #[error("Keyword '{keyword}' used as a name at line {line}")]
    KeywordAsName { keyword: String, line: u32 },

    #[error("Cannot assign to function '{name}' at line {line}")]
    AssignmentToFunction { name: String, line: u32 },

    #[error("Type mismatch for '{name}' at line {line}: declared {declared}, initialized with a {found} literal")]
    TypeMismatch {
        name: String,
        declared: String,
        found: &'static str,
        line: u32,
    },

    #[error("Scopes nested {depth} deep at line {line} (max {MAX_SCOPE_DEPTH})")]
    ScopeTooDeep { depth: usize, line: u32 },

    #[error("More than {MAX_SYMBOLS_PER_SCOPE} symbols in one scope at line {line}")]
    TooManySymbols { line: u32 },
}

impl SemanticError {
    pub fn error_code(&self) -> Code {
        match self {
            SemanticError::UndeclaredVariable { .. } => codes::semantic::UNDECLARED_VARIABLE,
            SemanticError::Redeclaration { .. } => codes::semantic::REDECLARATION,
            SemanticError::KeywordAsName { .. } => codes::semantic::KEYWORD_AS_NAME,
            SemanticError::AssignmentToFunction { .. } => codes::semantic::ASSIGNMENT_TO_FUNCTION,
            SemanticError::TypeMismatch { .. } => codes::semantic::TYPE_MISMATCH,
            SemanticError::ScopeTooDeep { .. } => codes::semantic::SCOPE_TOO_DEEP,
            SemanticError::TooManySymbols { .. } => codes::semantic::TOO_MANY_SYMBOLS,
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            SemanticError::UndeclaredVariable { line, .. }
            | SemanticError::Redeclaration { line, .. }
            | SemanticError::KeywordAsName { line, .. }
            | SemanticError::AssignmentToFunction { line, .. }
            | SemanticError::TypeMismatch { line, .. }
            | SemanticError::ScopeTooDeep { line, .. }
            | SemanticError::TooManySymbols { line } => *line,
        }
    }

    pub fn severity(&self) -> Severity {
        codes::get_severity(self.error_code().as_str())
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }
}
