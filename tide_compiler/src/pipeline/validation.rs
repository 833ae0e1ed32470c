/// Validate that every stage's codes are registered
pub fn validate_pipeline() -> Result<(), String> {
    crate::log_debug!("Validating pipeline configuration");

    crate::file_processor::init_file_processor_logging()?;
    crate::lexical::validate_tokenization()?;
    crate::syntax::validate_syntax_codes()?;
    crate::semantic::validate_semantic_codes()?;
    crate::ir::validate_ir()?;

    crate::log_success!(
        crate::logging::codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Pipeline validation succeeded",
        "stages_validated" => 5
    );

    Ok(())
}
