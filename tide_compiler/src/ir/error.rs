use crate::config::compile_time::ir::*;
use crate::logging::codes::{self, Severity};
use crate::logging::Code;

/// IR construction failures. The build stops at the first one and no
/// partial program is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IrError {
    #[error("Empty expression at line {line}")]
    EmptyExpression { line: u32 },

    #[error("Malformed expression at line {line}: unexpected '{text}'")]
    MalformedExpression { text: String, line: u32 },

    #[error("Expression at line {line} has more than {MAX_EXPRESSION_TOKENS} tokens")]
    ExpressionTooLong { line: u32 },

    #[error("Unexpected keyword '{keyword}' at line {line}")]
    UnexpectedKeyword { keyword: String, line: u32 },

    #[error("Malformed {construct} header at line {line}: expected {expected}, found {found}")]
    MalformedHeader {
        construct: &'static str,
        expected: &'static str,
        found: String,
        line: u32,
    },

    #[error("Call to '{name}' at line {line} before its definition")]
    UnresolvedCall { name: String, line: u32 },

    #[error("Function '{name}' at line {line} is already defined")]
    DuplicateFunction { name: String, line: u32 },

    #[error("'return' outside a function at line {line}")]
    ReturnOutsideFunction { line: u32 },

    #[error("Unexpected {found} at line {line}")]
    UnexpectedToken { found: String, line: u32 },

    #[error("Instruction limit of {MAX_INSTRUCTIONS} exceeded at line {line}")]
    InstructionLimit { line: u32 },

    #[error("Blocks nested {depth} deep at line {line} (max {MAX_BLOCK_DEPTH})")]
    BlockTooDeep { depth: usize, line: u32 },

    #[error("Jump target '{label}' is never bound")]
    UnresolvedLabel { label: String },
}

impl IrError {
    pub fn error_code(&self) -> Code {
        match self {
            IrError::EmptyExpression { .. } => codes::ir::EMPTY_EXPRESSION,
            IrError::MalformedExpression { .. } | IrError::ExpressionTooLong { .. } => {
                codes::ir::MALFORMED_EXPRESSION
            }
            IrError::UnexpectedKeyword { .. } => codes::ir::UNEXPECTED_KEYWORD,
            IrError::MalformedHeader { .. } => codes::ir::MALFORMED_HEADER,
            IrError::UnresolvedCall { .. } => codes::ir::UNRESOLVED_CALL,
            IrError::DuplicateFunction { .. } => codes::ir::DUPLICATE_FUNCTION,
            IrError::ReturnOutsideFunction { .. } => codes::ir::RETURN_OUTSIDE_FUNCTION,
            IrError::UnexpectedToken { .. } => codes::ir::UNEXPECTED_TOKEN,
            IrError::InstructionLimit { .. } => codes::ir::INSTRUCTION_LIMIT,
            IrError::BlockTooDeep { .. } => codes::ir::BLOCK_TOO_DEEP,
            IrError::UnresolvedLabel { .. } => codes::ir::UNRESOLVED_LABEL,
        }
    }

    pub fn line(&self) -> Option<u32> {
        match self {
            IrError::EmptyExpression { line }
            | IrError::MalformedExpression { line, .. }
            | IrError::ExpressionTooLong { line }
            | IrError::UnexpectedKeyword { line, .. }
            | IrError::MalformedHeader { line, .. }
            | IrError::UnresolvedCall { line, .. }
            | IrError::DuplicateFunction { line, .. }
            | IrError::ReturnOutsideFunction { line }
            | IrError::UnexpectedToken { line, .. }
            | IrError::InstructionLimit { line }
            | IrError::BlockTooDeep { line, .. } => Some(*line),
            IrError::UnresolvedLabel { .. } => None,
        }
    }

    pub fn severity(&self) -> Severity {
        codes::get_severity(self.error_code().as_str())
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }
}
