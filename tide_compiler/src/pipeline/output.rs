use crate::ir::{Declaration, Instruction, LabelTable};
use crate::pipeline::PipelineResult;
use crate::tokens::Token;
use serde::{Deserialize, Serialize};

/// JSON shape printed by `tidec --json`
#[derive(Debug, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tokens: Option<Vec<Token>>,
    pub instructions: Vec<Instruction>,
    pub labels: LabelTable,
    pub declarations: Vec<Declaration>,
}

impl PipelineOutput {
    pub fn new(source: &str, result: &PipelineResult, include_tokens: bool) -> Self {
        Self {
            source: source.to_string(),
            tokens: include_tokens.then(|| result.tokens.clone()),
            instructions: result.program.instructions.clone(),
            labels: result.program.labels.clone(),
            declarations: result.program.declarations.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
