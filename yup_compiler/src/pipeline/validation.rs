/// Startup check that every stage is wired to the code registry
pub fn validate_pipeline() -> Result<(), String> {
    crate::log_debug!("Validating pipeline configuration");

    crate::file_processor::init_file_processor_logging()?;
    crate::lexical::init_lexical_analysis_logging()?;
    crate::lexical::validate_tokenization()?;
    crate::syntax::init_syntax_logging()?;

    for code in [
        crate::logging::codes::pipeline::REQUEST_DROPPED,
        crate::logging::codes::pipeline::LARGE_INPUT,
    ] {
        if crate::logging::codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Pipeline code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    crate::log_success!(
        crate::logging::codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Pipeline validation succeeded",
        "stages_validated" => 3
    );

    Ok(())
}
