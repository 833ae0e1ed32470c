//! Grammar validation over the token sequence
//!
//! The validator only accepts or rejects; it never transforms tokens, and
//! the IR builder does its own structural checks on the same input.

mod error;
mod validator;

pub use error::{SyntaxError, SyntaxResult};
pub use validator::{GrammarValidator, TokenValidator};

use crate::logging::codes;
use crate::tokens::Token;
use crate::{log_debug, log_error, log_success};

/// Validate `tokens` with the grammar validator, logging the outcome
pub fn validate_tokens(tokens: &[Token]) -> SyntaxResult<()> {
    validate_with(&GrammarValidator, tokens)
}

pub fn validate_with(validator: &dyn TokenValidator, tokens: &[Token]) -> SyntaxResult<()> {
    log_debug!("Starting syntax validation",
        "validator" => validator.name(),
        "tokens" => tokens.len()
    );

    match validator.validate(tokens) {
        Ok(()) => {
            log_success!(
                codes::success::SYNTAX_VALIDATION_PASSED,
                "Syntax validation passed",
                "validator" => validator.name()
            );
            Ok(())
        }
        Err(error) => {
            log_error!(error.error_code(), &error.to_string(),
                "line" => error.line(),
                "validator" => validator.name()
            );
            Err(error)
        }
    }
}

/// Check every syntax error code is registered
pub fn validate_syntax_codes() -> Result<(), String> {
    let syntax_codes = [
        codes::syntax::UNBALANCED_BRACKET,
        codes::syntax::MISMATCHED_BRACKET,
        codes::syntax::MISSING_COLON,
        codes::syntax::EXPECTED_BLOCK,
        codes::syntax::UNEXPECTED_INDENT,
        codes::syntax::MALFORMED_FUNCTION_HEADER,
        codes::syntax::MALFORMED_FOR_HEADER,
        codes::syntax::DANGLING_ELSE,
        codes::syntax::BRACKET_DEPTH_EXCEEDED,
    ];
    for code in &syntax_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!("Syntax error code {} not found in metadata registry", code));
        }
    }
    Ok(())
}
