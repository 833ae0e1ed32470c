use crate::file_processor::FileMetadata;
use crate::ir::IrProgram;
use crate::lexical::LexicalMetrics;
use crate::logging::codes;
use crate::semantic::CheckSummary;
use crate::tokens::Token;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Wall time spent in each stage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageTimings {
    pub tokenize: Duration,
    pub syntax: Duration,
    pub semantic: Duration,
    pub ir: Duration,
}

impl StageTimings {
    pub fn total(&self) -> Duration {
        self.tokenize + self.syntax + self.semantic + self.ir
    }
}

/// Everything the pipeline produced for one program
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub tokens: Vec<Token>,
    pub program: IrProgram,
    pub lexical_metrics: LexicalMetrics,
    /// `None` when the scope checker is disabled
    pub check_summary: Option<CheckSummary>,
    /// Set when the source came from a file
    pub file_metadata: Option<FileMetadata>,
    pub timings: StageTimings,
}

impl PipelineResult {
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn log_success(&self, source_name: &str) {
        let total = self.timings.total();
        crate::log_success!(
            codes::success::PIPELINE_COMPLETE,
            "Compilation pipeline succeeded",
            "source" => source_name,
            "tokens" => self.token_count(),
            "instructions" => self.program.len(),
            "labels" => self.program.labels.len(),
            "duration_ms" => format!("{:.2}", total.as_secs_f64() * 1000.0)
        );
    }
}
