//! Front-end renderings of a run: the text report and the JSON document

use super::{PipelineError, PipelineResult};
use crate::grammar::AstNode;
use serde::{Deserialize, Serialize};

pub const SUCCESS_MESSAGE: &str = "No errors - code is valid";
pub const ERROR_HEADER: &str = "Parsing Errors:";

/// Machine-readable summary of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub success: bool,
    pub diagnostics: Vec<String>,
    /// Withheld when diagnostics exist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<AstNode>,
    pub token_count: usize,
    pub processing_time_ms: f64,
}

impl PipelineOutput {
    pub fn from_result(result: &PipelineResult) -> Self {
        let success = result.is_valid();
        Self {
            success,
            diagnostics: result.messages(),
            tree: if success { result.tree.clone() } else { None },
            token_count: result.token_count(),
            processing_time_ms: result.processing_time_ms(),
        }
    }

    pub fn from_error(error: &PipelineError) -> Self {
        Self {
            success: false,
            diagnostics: vec![error.user_message()],
            tree: None,
            token_count: 0,
            processing_time_ms: 0.0,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// `Parsing Errors:` header, blank line, then one bullet per message.
/// Empty when there is nothing to report.
pub fn format_error_report(messages: &[String]) -> String {
    if messages.is_empty() {
        return String::new();
    }

    let mut report = format!("{}\n\n", ERROR_HEADER);
    for message in messages {
        report.push_str("• ");
        report.push_str(message);
        report.push('\n');
    }
    report
}

/// Success line plus tree, or the error report. The tree is never shown
/// alongside diagnostics.
pub fn format_report(result: &PipelineResult, include_tree: bool) -> String {
    if !result.is_valid() {
        return format_error_report(&result.messages());
    }

    let mut report = format!("{}\n", SUCCESS_MESSAGE);
    if include_tree {
        if let Some(tree) = result.tree_text() {
            report.push('\n');
            report.push_str(&tree);
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::process_source;

    #[test]
    fn test_success_report_has_tree() {
        let result = process_source("let x = 5;").unwrap();

        assert_eq!(
            format_report(&result, true),
            "No errors - code is valid\n\nProgram\n  Declaration\n    Identifier (x)\n    Number (5)\n"
        );
        assert_eq!(format_report(&result, false), "No errors - code is valid\n");
    }

    #[test]
    fn test_error_report_bullets() {
        let result = process_source("foo bar").unwrap();

        assert_eq!(
            format_report(&result, true),
            "Parsing Errors:\n\n\
             • Line 0, Column 2: Expected '=' in assignment\n\
             • Line 2, Column 6: Expected '=' in assignment\n"
        );
    }

    #[test]
    fn test_report_lists_every_diagnostic() {
        let count = 2_000;
        let result = process_source(&"} ".repeat(count)).unwrap();
        let report = format_report(&result, true);

        assert_eq!(report.matches("• ").count(), count);
        assert!(report.ends_with(&format!(
            "• Line {}, Column {}: Unexpected token: }}\n",
            count - 1,
            2 * (count - 1)
        )));
    }

    #[test]
    fn test_empty_error_report() {
        assert_eq!(format_error_report(&[]), "");
    }

    #[test]
    fn test_json_withholds_tree_on_errors() {
        let bad = PipelineOutput::from_result(&process_source("let x = 5").unwrap());
        let json: serde_json::Value = serde_json::from_str(&bad.to_json().unwrap()).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(
            json["diagnostics"][0],
            "Line 4, Column 8: Expected ';' after declaration"
        );
        assert!(json.get("tree").is_none());
        assert_eq!(json["token_count"], 4);

        let good = PipelineOutput::from_result(&process_source("print(1);").unwrap());
        assert!(good.success);
        assert_eq!(good.tree.map(|t| t.children.len()), Some(1));
    }

    #[test]
    fn test_output_from_error() {
        let output = PipelineOutput::from_error(&PipelineError::pipeline_error("boom"));
        assert!(!output.success);
        assert_eq!(
            output.diagnostics,
            vec!["Error during processing: Pipeline error: boom"]
        );
    }
}
