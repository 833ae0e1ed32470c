//! Name resolution and literal type checks
//!
//! Runs on the token sequence after syntax validation. Checks are
//! advisory relative to the IR builder: a program that passes here can
//! still fail lowering (a call placed before its definition, for one).

mod checker;
mod error;
mod scope;

pub use checker::{CheckSummary, ScopeChecker, TokenChecker};
pub use error::{SemanticError, SemanticResult};
pub use scope::{DeclareError, ScopeStack, Symbol, SymbolKind};

use crate::logging::codes;
use crate::tokens::Token;
use crate::{log_debug, log_error, log_success};

/// Run the scope checker over `tokens`, logging the outcome
pub fn check_tokens(tokens: &[Token], check_literal_types: bool) -> SemanticResult<CheckSummary> {
    check_with(&ScopeChecker::new(check_literal_types), tokens)
}

pub fn check_with(checker: &dyn TokenChecker, tokens: &[Token]) -> SemanticResult<CheckSummary> {
    log_debug!("Starting semantic analysis",
        "checker" => checker.name(),
        "tokens" => tokens.len()
    );

    match checker.check(tokens) {
        Ok(summary) => {
            log_success!(
                codes::success::SEMANTIC_ANALYSIS_COMPLETE,
                "Semantic analysis completed",
                "checker" => checker.name(),
                "symbols" => summary.symbols_declared,
                "functions" => summary.functions.len(),
                "max_scope_depth" => summary.max_scope_depth
            );
            Ok(summary)
        }
        Err(error) => {
            log_error!(error.error_code(), &error.to_string(),
                "line" => error.line(),
                "checker" => checker.name()
            );
            Err(error)
        }
    }
}

/// Check every semantic error code is registered
pub fn validate_semantic_codes() -> Result<(), String> {
    let semantic_codes = [
        codes::semantic::UNDECLARED_VARIABLE,
        codes::semantic::REDECLARATION,
        codes::semantic::KEYWORD_AS_NAME,
        codes::semantic::ASSIGNMENT_TO_FUNCTION,
        codes::semantic::TYPE_MISMATCH,
        codes::semantic::SCOPE_TOO_DEEP,
        codes::semantic::TOO_MANY_SYMBOLS,
    ];
    for code in &semantic_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!("Semantic error code {} not found in metadata registry", code));
        }
    }
    Ok(())
}
