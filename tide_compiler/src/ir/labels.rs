use crate::ir::instruction::Instruction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label name to instruction index.
///
/// An entry is added when its Label cell (or FunctionEntry cell) is
/// emitted, and its value is that cell's index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelTable {
    entries: BTreeMap<String, usize>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous index if the name was already bound
    pub fn insert(&mut self, name: impl Into<String>, index: usize) -> Option<usize> {
        self.entries.insert(name.into(), index)
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Target index of a GoTo or ConditionalJump; `None` for other kinds
    /// and for names not bound yet.
    pub fn resolve(&self, instruction: &Instruction) -> Option<usize> {
        if instruction.kind.is_jump() {
            self.get(&instruction.payload)
        } else {
            None
        }
    }

    /// Jump targets in `instructions` with no entry, in first-use order
    pub fn unresolved(&self, instructions: &[Instruction]) -> Vec<String> {
        let mut missing: Vec<String> = Vec::new();
        for instruction in instructions.iter().filter(|i| i.kind.is_jump()) {
            if !self.contains(&instruction.payload) && !missing.contains(&instruction.payload) {
                missing.push(instruction.payload.clone());
            }
        }
        missing
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(name, &index)| (name.as_str(), index))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Hands out per-construct ids so sibling and nested constructs never share
/// a label name.
#[derive(Debug, Clone, Default)]
pub struct LabelGenerator {
    next: usize,
}

impl LabelGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> usize {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn name(base: &str, id: usize) -> String {
        format!("{base}#{id}")
    }
}
