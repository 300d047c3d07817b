use crate::file_processor::FileProcessorError;
use crate::logging::{codes, Code};
use crate::syntax::SyntaxError;

/// Failures that stop a run before a report can be produced. Syntax
/// diagnostics are not errors; they travel in `PipelineResult`.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Syntax analysis failed: {0}")]
    SyntaxAnalysis(#[from] SyntaxError),

    #[error("Pipeline error: {message}")]
    Pipeline { message: String },
}

impl PipelineError {
    pub fn pipeline_error(message: &str) -> Self {
        Self::Pipeline {
            message: message.to_string(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::FileProcessing(e) => e.error_code(),
            Self::SyntaxAnalysis(e) => e.error_code(),
            Self::Pipeline { .. } => codes::system::INTERNAL_ERROR,
        }
    }

    /// Stage name for summaries
    pub fn stage(&self) -> &'static str {
        match self {
            Self::FileProcessing(_) => "file processing",
            Self::SyntaxAnalysis(_) => "syntax analysis",
            Self::Pipeline { .. } => "pipeline",
        }
    }

    /// The single message shown to the user in place of diagnostics
    pub fn user_message(&self) -> String {
        format!("Error during processing: {}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_from_conversions_keep_codes() {
        let file: PipelineError = FileProcessorError::FileNotFound {
            path: "prog.yup".to_string(),
        }
        .into();
        assert_matches!(file, PipelineError::FileProcessing(_));
        assert_eq!(file.error_code().as_str(), "E005");
        assert_eq!(file.stage(), "file processing");

        let syntax: PipelineError = SyntaxError::invariant_violation("stuck").into();
        assert_eq!(syntax.error_code().as_str(), "E086");
    }

    #[test]
    fn test_user_message() {
        let error = PipelineError::pipeline_error("busy");
        assert_eq!(
            error.user_message(),
            "Error during processing: Pipeline error: busy"
        );
        assert_eq!(error.error_code().as_str(), "ERR001");
    }
}
