use serde::{Deserialize, Serialize};
use std::fmt;

/// IR cell kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstructionKind {
    GoTo,
    Return,
    CallSite,
    ConditionalJump,
    Label,
    Expression,
    VariableRef,
    FunctionEntry,
}

impl InstructionKind {
    /// Name used in listings
    pub fn display_name(&self) -> &'static str {
        match self {
            InstructionKind::GoTo => "GoTo",
            InstructionKind::Return => "Return",
            InstructionKind::CallSite => "Call",
            InstructionKind::ConditionalJump => "ConditionalJump",
            InstructionKind::Label => "Label",
            InstructionKind::Expression => "Math",
            InstructionKind::VariableRef => "Var",
            InstructionKind::FunctionEntry => "Function",
        }
    }

    /// Kinds whose payload names a jump target
    pub fn is_jump(&self) -> bool {
        matches!(self, InstructionKind::GoTo | InstructionKind::ConditionalJump)
    }

    pub const ALL: [InstructionKind; 8] = [
        InstructionKind::GoTo,
        InstructionKind::Return,
        InstructionKind::CallSite,
        InstructionKind::ConditionalJump,
        InstructionKind::Label,
        InstructionKind::Expression,
        InstructionKind::VariableRef,
        InstructionKind::FunctionEntry,
    ];
}

impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One IR cell.
///
/// Jump payloads are label names, never indices; see
/// [`LabelTable::resolve`](crate::ir::LabelTable::resolve).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub kind: InstructionKind,
    pub payload: String,
}

impl Instruction {
    pub fn new(kind: InstructionKind, payload: impl Into<String>) -> Self {
        Self {
            kind,
            payload: payload.into(),
        }
    }

    pub fn goto(label: impl Into<String>) -> Self {
        Self::new(InstructionKind::GoTo, label)
    }

    pub fn conditional_jump(label: impl Into<String>) -> Self {
        Self::new(InstructionKind::ConditionalJump, label)
    }

    pub fn label(name: impl Into<String>) -> Self {
        Self::new(InstructionKind::Label, name)
    }

    pub fn ret() -> Self {
        Self::new(InstructionKind::Return, "")
    }

    pub fn call_site(name: impl Into<String>) -> Self {
        Self::new(InstructionKind::CallSite, name)
    }

    pub fn expression(postfix: impl Into<String>) -> Self {
        Self::new(InstructionKind::Expression, postfix)
    }

    pub fn variable_ref(name: impl Into<String>) -> Self {
        Self::new(InstructionKind::VariableRef, name)
    }

    pub fn function_entry(name: impl Into<String>) -> Self {
        Self::new(InstructionKind::FunctionEntry, name)
    }

    pub fn is(&self, kind: InstructionKind, payload: &str) -> bool {
        self.kind == kind && self.payload == payload
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.payload.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} {}", self.kind, self.payload)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Instruction::expression("[a][b]+").to_string(), "Math [a][b]+");
        assert_eq!(Instruction::call_site("f").to_string(), "Call f");
        assert_eq!(Instruction::ret().to_string(), "Return");
    }

    #[test]
    fn test_jump_kinds() {
        let jumps: Vec<InstructionKind> = InstructionKind::ALL
            .iter()
            .copied()
            .filter(InstructionKind::is_jump)
            .collect();
        assert_eq!(
            jumps,
            vec![InstructionKind::GoTo, InstructionKind::ConditionalJump]
        );
    }
}
