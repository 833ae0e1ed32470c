//! End-to-end compilation: tokenize, validate, check, build IR
//!
//! Every stage is a pure function of the previous stage's output. The
//! first failure stops the run and comes back as a [`PipelineError`].

mod error;
mod info;
pub mod output;
mod result;
mod validation;

pub use error::PipelineError;
pub use info::{get_pipeline_info, PipelineInfo};
pub use output::PipelineOutput;
pub use result::{PipelineResult, StageTimings};
pub use validation::validate_pipeline;

use crate::config::runtime::RuntimeConfig;
use crate::file_processor::FileProcessor;
use crate::lexical::KeywordTrie;
use crate::logging;
use std::path::PathBuf;
use std::time::Instant;

/// Source file read when none is named
pub const DEFAULT_SOURCE_PATH: &str = "code.us";

/// Keyword file read when none is named
pub const DEFAULT_KEYWORD_PATH: &str = "workword";

/// Compile in-memory source with default preferences
pub fn process_source(source: &str, keywords: KeywordTrie) -> Result<PipelineResult, PipelineError> {
    process_source_with_config(source, keywords, &RuntimeConfig::default())
}

pub fn process_source_with_config(
    source: &str,
    keywords: KeywordTrie,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    let mut timings = StageTimings::default();

    let start = Instant::now();
    let (tokens, lexical_metrics) =
        crate::lexical::tokenize_with_preferences(source, keywords, config.lexical.clone())?;
    timings.tokenize = start.elapsed();

    if config.checks.run_grammar_validator {
        let start = Instant::now();
        crate::syntax::validate_tokens(&tokens)?;
        timings.syntax = start.elapsed();
    }

    let check_summary = if config.checks.run_scope_checker {
        let start = Instant::now();
        let summary = crate::semantic::check_tokens(&tokens, config.checks.check_literal_types)?;
        timings.semantic = start.elapsed();
        Some(summary)
    } else {
        None
    };

    let start = Instant::now();
    let program = crate::ir::build_ir_with_preferences(&tokens, &config.ir)?;
    timings.ir = start.elapsed();

    Ok(PipelineResult {
        tokens,
        program,
        lexical_metrics,
        check_summary,
        file_metadata: None,
        timings,
    })
}

/// Compile a source file; `keyword_path` of `None` uses the built-in keywords
pub fn process_file(
    source_path: &str,
    keyword_path: Option<&str>,
) -> Result<PipelineResult, PipelineError> {
    process_file_with_config(source_path, keyword_path, &RuntimeConfig::default())
}

pub fn process_file_with_config(
    source_path: &str,
    keyword_path: Option<&str>,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    logging::with_file_context(PathBuf::from(source_path), 0, || {
        crate::log_info!("Starting compilation pipeline",
            "file" => source_path,
            "keywords" => keyword_path.unwrap_or("built-in")
        );

        let processor = FileProcessor::from_preferences(&config.file_processor);
        let keywords = match keyword_path {
            Some(path) => KeywordTrie::from_words(processor.load_keywords(path)?.iter()),
            None => KeywordTrie::with_default_keywords(),
        };
        let file_result = processor.process_file(source_path)?;

        let mut result = process_source_with_config(&file_result.source, keywords, config)?;
        result.file_metadata = Some(file_result.metadata);
        result.log_success(source_path);
        Ok(result)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Instruction;
    use crate::tokens::TokenKind;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    const WHILE_PROGRAM: &str = "int x = 1;\nwhile (x < 3):\n    print(x);\n    x = x + 1;\n";

    fn run(source: &str) -> Result<PipelineResult, PipelineError> {
        process_source(source, KeywordTrie::with_default_keywords())
    }

    #[test]
    fn test_validate_pipeline() {
        let _ = crate::logging::init_global_logging();
        assert!(validate_pipeline().is_ok());
    }

    #[test]
    fn test_end_to_end_while() {
        let result = run(WHILE_PROGRAM).unwrap();

        let indents = result.tokens.iter().filter(|t| t.kind == TokenKind::Indent).count();
        let dedents = result.tokens.iter().filter(|t| t.kind == TokenKind::Dedent).count();
        assert_eq!((indents, dedents), (1, 1));

        let program = &result.program;
        let count = |needle: &Instruction| program.instructions.iter().filter(|i| *i == needle).count();
        assert_eq!(count(&Instruction::label("while_start#0")), 1);
        assert_eq!(count(&Instruction::label("while_false#0")), 1);
        assert_eq!(count(&Instruction::conditional_jump("while_false#0")), 1);
        assert_eq!(count(&Instruction::goto("while_start#0")), 1);
        assert_eq!(program.labels.get("while_start#0"), Some(0));

        let summary = result.check_summary.unwrap();
        assert_eq!(summary.symbols_declared, 1);
    }

    #[test]
    fn test_sample_program_compiles() {
        let result = run(include_str!("../../../code.us")).unwrap();
        let program = &result.program;

        assert_eq!(program.labels.get("square"), Some(0));
        assert!(program.labels.contains("fact"));
        assert!(program.unresolved_labels().is_empty());
        assert_eq!(program.declarations.len(), 2);
        assert!(program
            .instructions
            .iter()
            .any(|i| i.payload == "[n][n][1]-fact(1)*"));
    }

    #[test]
    fn test_stage_exit_codes() {
        let lexical = run("x = 1 $ 2\n").unwrap_err();
        assert_matches!(lexical, PipelineError::LexicalAnalysis(_));
        assert_eq!(lexical.exit_code(), 2);

        let structural = run("if x:\n        y = 1\n    z = 2\n").unwrap_err();
        assert_eq!(structural.stage(), "indentation");
        assert_eq!(structural.exit_code(), 2);

        let syntax = run("x = (1 + 2\n").unwrap_err();
        assert_matches!(syntax, PipelineError::SyntaxValidation(_));
        assert_eq!(syntax.exit_code(), 3);

        let semantic = run("print(y)\n").unwrap_err();
        assert_matches!(semantic, PipelineError::SemanticAnalysis(_));
        assert_eq!(semantic.exit_code(), 4);

        let ir = run("g()\ndef g():\n    pass\n").unwrap_err();
        assert_matches!(ir, PipelineError::IrBuild(crate::ir::IrError::UnresolvedCall { .. }));
        assert_eq!(ir.exit_code(), 5);
    }

    #[test]
    fn test_error_renders_failing_line() {
        let source = "int x = 1\nif x:\n    print(y)\n";
        let error = run(source).unwrap_err();
        assert_eq!(error.line(), Some(3));

        let rendered = error.render(source).unwrap();
        assert!(rendered.contains("--> 3:5"));
        assert!(rendered.contains("3 |     print(y)\n"));
        assert!(rendered.contains(" |     ^^^^^^^^\n"));

        let missing = process_file("no_such_program.us", None).unwrap_err();
        assert!(missing.render(source).is_none());
    }

    #[test]
    fn test_disabled_checks_reach_ir() {
        let mut config = RuntimeConfig::default();
        config.checks.run_scope_checker = false;

        let result = process_source_with_config(
            "print(y)\n",
            KeywordTrie::with_default_keywords(),
            &config,
        )
        .unwrap();
        assert!(result.check_summary.is_none());
        assert_eq!(result.program.len(), 2);
    }

    #[test]
    fn test_process_file_with_keyword_file() {
        let dir = tempdir().unwrap();
        let source_path = dir.path().join("code.us");
        let keyword_path = dir.path().join("workword");
        fs::write(&source_path, WHILE_PROGRAM).unwrap();
        fs::write(&keyword_path, crate::lexical::DEFAULT_KEYWORDS.join("\n")).unwrap();

        let result = process_file(
            source_path.to_str().unwrap(),
            Some(keyword_path.to_str().unwrap()),
        )
        .unwrap();
        assert!(result.file_metadata.is_some());
        assert_eq!(result.program.labels.get("while_start#0"), Some(0));
    }

    #[test]
    fn test_process_missing_file() {
        let error = process_file("no_such_program.us", None).unwrap_err();
        assert_matches!(error, PipelineError::FileProcessing(_));
        assert_eq!(error.exit_code(), 6);
    }

    #[test]
    fn test_json_output() {
        let result = run(WHILE_PROGRAM).unwrap();
        let json = PipelineOutput::new("inline", &result, false).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["labels"]["while_start#0"], 0);
        assert_eq!(value["declarations"][0]["name"], "x");
        assert!(value.get("tokens").is_none());
    }
}
