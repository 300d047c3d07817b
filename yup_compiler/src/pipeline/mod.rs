//! Source text to report: lex, parse, collect diagnostics
//!
//! Syntax diagnostics are part of a successful [`PipelineResult`]. Only
//! file-processing failures and internal parser faults surface as
//! [`PipelineError`].

mod error;
mod gate;
pub mod output;
mod result;
mod validation;

pub use error::PipelineError;
pub use gate::{GateGuard, ProcessingGate};
pub use output::{format_error_report, format_report, PipelineOutput};
pub use result::PipelineResult;
pub use validation::validate_pipeline;

use crate::config::compile_time::file_processing::LARGE_FILE_THRESHOLD;
use crate::config::runtime::RuntimeConfig;
use crate::lexical::LexicalAnalyzer;
use crate::logging::{self, codes};
use crate::{log_debug, log_info, log_warning};
use std::path::PathBuf;
use std::time::Instant;

/// Name used in logs for in-memory input
const INLINE_SOURCE: &str = "<input>";

/// Process in-memory text with default preferences
pub fn process_source(source: &str) -> Result<PipelineResult, PipelineError> {
    process_source_with_config(source, &RuntimeConfig::default())
}

pub fn process_source_with_config(
    source: &str,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    run(source, INLINE_SOURCE, config)
}

/// Process a file with default preferences
pub fn process_file(file_path: &str) -> Result<PipelineResult, PipelineError> {
    process_file_with_config(file_path, &RuntimeConfig::default())
}

/// Read the file, then run it through the pipeline with the file set as
/// logging context
pub fn process_file_with_config(
    file_path: &str,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    logging::with_file_context(PathBuf::from(file_path), 0, || {
        log_info!("Processing file", "file" => file_path);

        let processor = crate::file_processor::create_processor_from_preferences(&config.file_processor);
        let file_result = processor.process_file(file_path)?;

        let mut result = run(&file_result.source, file_path, config)?;
        result.file_metadata = Some(file_result.metadata);
        Ok(result)
    })
}

fn run(source: &str, source_name: &str, config: &RuntimeConfig) -> Result<PipelineResult, PipelineError> {
    let start = Instant::now();

    if source.is_empty() {
        log_debug!("Empty input; nothing to process", "source" => source_name);
        return Ok(PipelineResult::empty(source, start.elapsed()));
    }

    if source.len() as u64 > LARGE_FILE_THRESHOLD {
        log_warning!(code = codes::pipeline::LARGE_INPUT, "Input is above the large-file threshold",
            "source" => source_name,
            "bytes" => source.len(),
            "threshold" => LARGE_FILE_THRESHOLD
        );
    }

    let mut analyzer = LexicalAnalyzer::with_preferences(config.lexical.clone());
    let tokens = analyzer.tokenize(source);
    let lexical_metrics = analyzer.metrics().clone();

    let mut result = PipelineResult::empty(source, start.elapsed());
    result.lexical_metrics = lexical_metrics;

    if !tokens.is_empty() {
        let outcome = crate::syntax::parse_program(tokens.clone(), &config.syntax);
        if let Some(error) = outcome.failure {
            return Err(error.into());
        }
        result.tree = outcome.tree;
        result.diagnostics = outcome.diagnostics;
    }

    result.tokens = tokens;
    result.processing_duration = start.elapsed();
    result.log_success(source_name);

    Ok(result)
}
