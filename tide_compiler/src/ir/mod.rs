//! Intermediate representation: flat instruction list plus label table
//!
//! [`IrBuilder`] lowers a token sequence in one forward pass. Jumps carry
//! label names; whoever executes the program resolves them through
//! [`LabelTable::resolve`].

pub mod builder;
pub mod error;
pub mod expression;
pub mod instruction;
pub mod labels;

use crate::config::compile_time::ir::*;
use crate::config::runtime::IrPreferences;
use crate::logging::codes;
use crate::tokens::Token;
use crate::{log_debug, log_error, log_success};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use builder::{IrBuilder, StatementKind, TYPE_KEYWORDS};
pub use error::IrError;
pub use expression::{precedence, ExpressionCompiler, ExpressionMode};
pub use instruction::{Instruction, InstructionKind};
pub use labels::{LabelGenerator, LabelTable};

/// Typed declaration such as `int x = 1;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    pub type_name: String,
    /// Postfix form of the initializer
    pub initializer: Option<String>,
    pub line: u32,
}

/// Builder output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrProgram {
    pub instructions: Vec<Instruction>,
    pub labels: LabelTable,
    pub declarations: Vec<Declaration>,
}

impl IrProgram {
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Target index of the jump at `index`
    pub fn jump_target(&self, index: usize) -> Option<usize> {
        self.instructions
            .get(index)
            .and_then(|instruction| self.labels.resolve(instruction))
    }

    pub fn unresolved_labels(&self) -> Vec<String> {
        self.labels.unresolved(&self.instructions)
    }

    /// Every jump target must be bound
    pub fn verify(&self) -> Result<(), IrError> {
        match self.unresolved_labels().into_iter().next() {
            Some(label) => Err(IrError::UnresolvedLabel { label }),
            None => Ok(()),
        }
    }

    pub fn count_by_kind(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for instruction in &self.instructions {
            *counts.entry(instruction.kind.display_name()).or_insert(0) += 1;
        }
        counts
    }

    /// One instruction per line, `index: Kind payload`
    pub fn listing(&self) -> String {
        self.instructions
            .iter()
            .enumerate()
            .map(|(index, instruction)| format!("{index:4}: {instruction}\n"))
            .collect()
    }
}

/// Build with default preferences
pub fn build_ir(tokens: &[Token]) -> Result<IrProgram, IrError> {
    build_ir_with_preferences(tokens, &IrPreferences::default())
}

pub fn build_ir_with_preferences(
    tokens: &[Token],
    preferences: &IrPreferences,
) -> Result<IrProgram, IrError> {
    log_debug!("Starting IR build",
        "tokens" => tokens.len(),
        "max_instructions" => MAX_INSTRUCTIONS
    );

    let program = IrBuilder::new(tokens)
        .build()
        .and_then(|program| {
            if preferences.verify_labels {
                program.verify()?;
            }
            Ok(program)
        })
        .map_err(|error| {
            match error.line() {
                Some(line) => log_error!(error.error_code(), &error.to_string(), "line" => line),
                None => log_error!(error.error_code(), &error.to_string()),
            }
            error
        })?;

    if preferences.log_instruction_summary {
        for (kind, count) in program.count_by_kind() {
            log_debug!("Instruction count", "kind" => kind, "count" => count);
        }
    }

    log_success!(codes::success::IR_BUILD_COMPLETE, "IR build completed",
        "instructions" => program.len(),
        "labels" => program.labels.len(),
        "declarations" => program.declarations.len()
    );

    Ok(program)
}

/// Check every IR error code is registered
pub fn validate_ir() -> Result<(), String> {
    let ir_codes = [
        codes::ir::EMPTY_EXPRESSION,
        codes::ir::MALFORMED_EXPRESSION,
        codes::ir::UNEXPECTED_KEYWORD,
        codes::ir::MALFORMED_HEADER,
        codes::ir::UNRESOLVED_CALL,
        codes::ir::DUPLICATE_FUNCTION,
        codes::ir::RETURN_OUTSIDE_FUNCTION,
        codes::ir::UNEXPECTED_TOKEN,
        codes::ir::INSTRUCTION_LIMIT,
        codes::ir::BLOCK_TOO_DEEP,
        codes::ir::UNRESOLVED_LABEL,
    ];
    for code in &ir_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!("IR error code {} not found in metadata registry", code));
        }
    }
    if MAX_BLOCK_DEPTH == 0 || MAX_EXPRESSION_TOKENS == 0 {
        return Err("IR limits cannot be zero".to_string());
    }
    Ok(())
}
