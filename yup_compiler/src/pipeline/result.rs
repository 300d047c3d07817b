use crate::file_processor::FileMetadata;
use crate::grammar::{print_tree, AstNode};
use crate::lexical::LexicalMetrics;
use crate::syntax::Diagnostic;
use crate::tokens::{format_token_list, Token};
use crate::utils::SourceMap;
use std::time::Duration;

/// Everything one run produced
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub source: String,
    pub tokens: Vec<Token>,
    /// Absent when the input held no tokens
    pub tree: Option<AstNode>,
    pub diagnostics: Vec<Diagnostic>,
    pub lexical_metrics: LexicalMetrics,
    /// Present for file input
    pub file_metadata: Option<FileMetadata>,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub(crate) fn empty(source: &str, processing_duration: Duration) -> Self {
        Self {
            source: source.to_string(),
            tokens: Vec::new(),
            tree: None,
            diagnostics: Vec::new(),
            lexical_metrics: LexicalMetrics::default(),
            file_metadata: None,
            processing_duration,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Diagnostics as user-facing strings, in parse order
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics.iter().map(|d| d.to_string()).collect()
    }

    pub fn tree_text(&self) -> Option<String> {
        self.tree.as_ref().map(|tree| print_tree(tree, 0))
    }

    pub fn token_dump(&self) -> String {
        format_token_list(&self.tokens)
    }

    /// Each diagnostic with a caret excerpt of its source line
    pub fn explain(&self) -> String {
        let source_map = SourceMap::new(self.source.clone());
        self.diagnostics
            .iter()
            .map(|d| source_map.format_error(&d.span, &d.message))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn processing_time_ms(&self) -> f64 {
        self.processing_duration.as_secs_f64() * 1000.0
    }

    pub fn log_success(&self, source_name: &str) {
        let seconds = self.processing_duration.as_secs_f64();
        let tokens_per_sec = if seconds > 0.0 {
            self.token_count() as f64 / seconds
        } else {
            0.0
        };

        crate::log_performance!(
            crate::logging::codes::success::PIPELINE_COMPLETE,
            "Pipeline complete",
            duration = self.processing_duration,
            "source" => source_name,
            "tokens" => self.token_count(),
            "diagnostics" => self.diagnostics.len(),
            "tokens_per_sec" => format!("{:.0}", tokens_per_sec)
        );
    }
}
