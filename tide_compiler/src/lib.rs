// Internal modules
pub mod config;
pub mod file_processor;
pub mod ir;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod semantic;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use ir::{Instruction, InstructionKind, IrError, IrProgram, LabelTable};
pub use lexical::{KeywordTrie, LexerError};
pub use pipeline::{PipelineError, PipelineResult};
pub use tokens::{Token, TokenKind};

pub use pipeline::output::PipelineOutput;
