//! Syntax analysis: token sequence to AST plus diagnostics
//!
//! [`parse_program`] is the total entry point used by the pipeline. It never
//! fails: an internal fault of the parse engine is carried in the outcome
//! and surfaces as a single `Error during processing: ...` message.

mod error;
mod parser;

pub use error::{Diagnostic, PositionMode, SyntaxError, SyntaxResult};
pub use parser::{ParseOutput, YupParser};

use crate::config::runtime::SyntaxPreferences;
use crate::grammar::AstNode;
use crate::logging::codes;
use crate::tokens::Token;
use crate::{log_debug, log_error};

/// Everything a parse run produced
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    /// `None` only when the parse engine failed internally
    pub tree: Option<AstNode>,
    pub diagnostics: Vec<Diagnostic>,
    pub failure: Option<SyntaxError>,
}

impl ParseOutcome {
    fn from_output(output: ParseOutput) -> Self {
        Self {
            tree: Some(output.tree),
            diagnostics: output.diagnostics,
            failure: None,
        }
    }

    fn from_failure(error: SyntaxError) -> Self {
        Self {
            tree: None,
            diagnostics: Vec::new(),
            failure: Some(error),
        }
    }

    /// No diagnostics and no internal failure
    pub fn is_valid(&self) -> bool {
        self.failure.is_none() && self.diagnostics.is_empty()
    }

    /// User-facing message list, in parse order
    pub fn messages(&self) -> Vec<String> {
        match &self.failure {
            Some(error) => vec![format!("Error during processing: {}", error)],
            None => self.diagnostics.iter().map(|d| d.to_string()).collect(),
        }
    }
}

/// Parse with default preferences
pub fn parse_tokens(tokens: Vec<Token>) -> SyntaxResult<ParseOutput> {
    YupParser::new(tokens).parse()
}

/// Total parse entry point
pub fn parse_program(tokens: Vec<Token>, preferences: &SyntaxPreferences) -> ParseOutcome {
    if tokens.is_empty() {
        let note = SyntaxError::EmptyTokenStream;
        log_debug!("Nothing to parse", "code" => note.error_code());
        return ParseOutcome::from_output(ParseOutput {
            tree: AstNode::program(),
            diagnostics: Vec::new(),
        });
    }

    log_debug!("Starting syntax analysis",
        "tokens" => tokens.len(),
        "legacy_positions" => preferences.legacy_positions
    );

    match YupParser::with_preferences(tokens, preferences).parse() {
        Ok(output) => ParseOutcome::from_output(output),
        Err(error) => {
            log_error!(error.error_code(), "Syntax analysis failed internally",
                "error" => &error,
                "action" => error.recommended_action()
            );
            ParseOutcome::from_failure(error)
        }
    }
}

/// Check that every syntax code is registered (system startup)
pub fn init_syntax_logging() -> Result<(), String> {
    let syntax_codes = [
        codes::syntax::EMPTY_TOKEN_STREAM,
        codes::syntax::UNCLOSED_DELIMITER,
        codes::syntax::MISSING_TOKEN,
        codes::syntax::INVALID_FACTOR,
        codes::syntax::MISSING_RELATIONAL_OPERATOR,
        codes::syntax::UNEXPECTED_TOKEN,
        codes::syntax::UNEXPECTED_END_OF_INPUT,
        codes::syntax::INTERNAL_PARSER_ERROR,
        codes::syntax::MAX_RECURSION_DEPTH,
    ];

    for code in &syntax_codes {
        if crate::logging::codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Syntax error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    Ok(())
}
