use crate::config::compile_time::{file_processing, ir, lexical};
use crate::file_processor::SOURCE_EXTENSION;

/// Information about pipeline capabilities
#[derive(Debug, Clone)]
pub struct PipelineInfo {
    pub stages: Vec<&'static str>,
    pub max_file_size: u64,
    pub max_tokens: usize,
    pub max_instructions: usize,
    pub source_extension: &'static str,
    pub default_source: &'static str,
    pub default_keywords: &'static str,
}

impl PipelineInfo {
    pub fn report(&self) -> String {
        format!(
            "Tide Compilation Pipeline:\n\
             - Stages: {}\n\
             - Max File Size: {} MB\n\
             - Max Tokens: {}\n\
             - Max Instructions: {}\n\
             - Source Extension: .{}\n\
             - Default Inputs: {} {}",
            self.stages.join(" -> "),
            self.max_file_size / (1024 * 1024),
            self.max_tokens,
            self.max_instructions,
            self.source_extension,
            self.default_source,
            self.default_keywords
        )
    }
}

pub fn get_pipeline_info() -> PipelineInfo {
    PipelineInfo {
        stages: vec!["file", "tokenize", "syntax", "semantic", "ir"],
        max_file_size: file_processing::MAX_FILE_SIZE,
        max_tokens: lexical::MAX_TOKEN_COUNT,
        max_instructions: ir::MAX_INSTRUCTIONS,
        source_extension: SOURCE_EXTENSION,
        default_source: super::DEFAULT_SOURCE_PATH,
        default_keywords: super::DEFAULT_KEYWORD_PATH,
    }
}
