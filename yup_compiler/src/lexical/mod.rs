//! Lexical analysis for Yup++ source text
//!
//! Wraps [`LexicalAnalyzer`] with one-shot tokenization and start-up
//! validation of the lexical warning codes and thresholds. Lexing is total:
//! every input produces a token sequence.

pub mod analyzer;

use crate::config::compile_time::lexical::*;
use crate::tokens::Token;

pub use analyzer::{LexicalAnalyzer, LexicalMetrics};

// ============================================================================
// MODULE API
// ============================================================================

/// Tokenize with default preferences
pub fn tokenize(source: &str) -> Vec<Token> {
    LexicalAnalyzer::new().tokenize(source)
}

// ============================================================================
// MODULE INITIALIZATION AND VALIDATION
// ============================================================================

const LEXICAL_CODES: [crate::logging::Code; 2] = [
    crate::logging::codes::lexical::LONG_RUN,
    crate::logging::codes::lexical::MANY_TOKENS,
];

/// Check that every lexical warning code is registered (system startup)
pub fn init_lexical_analysis_logging() -> Result<(), String> {
    for code in &LEXICAL_CODES {
        if crate::logging::codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Lexical code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    crate::log_debug!("Lexical thresholds initialized",
        "many_tokens_threshold" => MANY_TOKENS_THRESHOLD,
        "long_run_threshold" => LONG_RUN_THRESHOLD
    );

    Ok(())
}

/// Validate thresholds and token ordering on a known sample
pub fn validate_tokenization() -> Result<(), String> {
    for code in &LEXICAL_CODES {
        if crate::logging::codes::get_description(code.as_str()) == "Unknown error" {
            return Err(format!("Lexical code {} has no description", code.as_str()));
        }
    }

    if MANY_TOKENS_THRESHOLD == 0 {
        return Err("MANY_TOKENS_THRESHOLD cannot be zero".to_string());
    }
    if LONG_RUN_THRESHOLD == 0 {
        return Err("LONG_RUN_THRESHOLD cannot be zero".to_string());
    }

    validate_token_order(&tokenize("while (i <= 10) { i = i + 1; }"))
}

/// Offsets must satisfy `start <= end` per token and never move backwards
pub fn validate_token_order(tokens: &[Token]) -> Result<(), String> {
    for token in tokens {
        if token.start_offset > token.end_offset {
            return Err(format!(
                "Token {} has start offset {} after end offset {}",
                token, token.start_offset, token.end_offset
            ));
        }
    }

    for pair in tokens.windows(2) {
        if pair[1].start_offset <= pair[0].end_offset {
            return Err(format!(
                "Token {} at {} overlaps {} ending at {}",
                pair[1], pair[1].start_offset, pair[0], pair[0].end_offset
            ));
        }
    }

    Ok(())
}
