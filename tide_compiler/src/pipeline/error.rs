use crate::config::runtime::ConfigError;
use crate::file_processor::FileProcessorError;
use crate::ir::IrError;
use crate::lexical::LexerError;
use crate::logging::{codes, Code};
use crate::semantic::SemanticError;
use crate::syntax::SyntaxError;
use crate::utils::SourceMap;

/// Pipeline processing errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Lexical analysis failed: {0}")]
    LexicalAnalysis(#[from] LexerError),

    #[error("Syntax validation failed: {0}")]
    SyntaxValidation(#[from] SyntaxError),

    #[error("Semantic analysis failed: {0}")]
    SemanticAnalysis(#[from] SemanticError),

    #[error("IR build failed: {0}")]
    IrBuild(#[from] IrError),

    #[error("Configuration failed: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Pipeline error: {message}")]
    Pipeline { message: String },
}

impl PipelineError {
    pub fn pipeline_error(message: &str) -> Self {
        Self::Pipeline {
            message: message.to_string(),
        }
    }

    /// Process exit status for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Pipeline { .. } | PipelineError::Configuration(_) => 1,
            PipelineError::LexicalAnalysis(_) => 2,
            PipelineError::SyntaxValidation(_) => 3,
            PipelineError::SemanticAnalysis(_) => 4,
            PipelineError::IrBuild(_) => 5,
            PipelineError::FileProcessing(_) => 6,
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            PipelineError::FileProcessing(e) => e.error_code(),
            PipelineError::LexicalAnalysis(e) => e.error_code(),
            PipelineError::SyntaxValidation(e) => e.error_code(),
            PipelineError::SemanticAnalysis(e) => e.error_code(),
            PipelineError::IrBuild(e) => e.error_code(),
            PipelineError::Configuration(_) => codes::system::CONFIGURATION_ERROR,
            PipelineError::Pipeline { .. } => codes::system::INTERNAL_ERROR,
        }
    }

    /// Source line the failure points at, if the stage reports one
    pub fn line(&self) -> Option<u32> {
        match self {
            PipelineError::LexicalAnalysis(e) => Some(e.line()),
            PipelineError::SyntaxValidation(e) => Some(e.line()),
            PipelineError::SemanticAnalysis(e) => Some(e.line()),
            PipelineError::IrBuild(e) => e.line(),
            _ => None,
        }
    }

    /// The failing line of `source` with a caret underline
    pub fn render(&self, source: &str) -> Option<String> {
        let line = self.line()?;
        let map = SourceMap::new(source.to_string());
        let span = map.line_span(line)?;
        Some(map.format_error(&span, &self.to_string()))
    }

    /// Human name of the stage that failed
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::FileProcessing(_) => "file processing",
            PipelineError::LexicalAnalysis(e) if e.is_structural() => "indentation",
            PipelineError::LexicalAnalysis(_) => "lexical analysis",
            PipelineError::SyntaxValidation(_) => "syntax validation",
            PipelineError::SemanticAnalysis(_) => "semantic analysis",
            PipelineError::IrBuild(_) => "IR build",
            PipelineError::Configuration(_) => "configuration",
            PipelineError::Pipeline { .. } => "pipeline",
        }
    }
}
