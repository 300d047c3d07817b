//! Syntax diagnostics and internal parser errors
//!
//! A [`Diagnostic`] is data: the parser records one per failing rule and
//! keeps going. A [`SyntaxError`] is an internal fault of the parse engine
//! itself and ends the parse.

use crate::logging::{codes, Code};
use crate::tokens::Token;
use crate::utils::Span;
use std::fmt;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

/// Internal parse-engine faults
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("Empty token stream - no tokens to parse")]
    EmptyTokenStream,

    #[error("Maximum recursion depth {depth} exceeded at {span}")]
    MaxRecursionDepth { depth: usize, span: Span },

    #[error("Parser invariant violated: {message}")]
    InvariantViolation { message: String },
}

impl SyntaxError {
    pub fn max_recursion_depth(depth: usize, span: Span) -> Self {
        Self::MaxRecursionDepth { depth, span }
    }

    pub fn invariant_violation(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::EmptyTokenStream => codes::syntax::EMPTY_TOKEN_STREAM,
            Self::MaxRecursionDepth { .. } => codes::syntax::MAX_RECURSION_DEPTH,
            Self::InvariantViolation { .. } => codes::syntax::INTERNAL_PARSER_ERROR,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::MaxRecursionDepth { span, .. } => Some(*span),
            Self::EmptyTokenStream | Self::InvariantViolation { .. } => None,
        }
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.error_code().as_str())
    }
}

/// How a diagnostic's line and column are derived from its anchor token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionMode {
    /// `line = start_offset / 2`, `column = end_offset`. Byte-for-byte
    /// compatible with the historical tool output.
    #[default]
    Legacy,
    /// True 1-based line and column of the anchor token
    Source,
}

impl PositionMode {
    pub fn from_legacy_flag(legacy_positions: bool) -> Self {
        if legacy_positions {
            Self::Legacy
        } else {
            Self::Source
        }
    }

    /// Line and column reported for `token`
    pub fn locate(&self, token: &Token) -> (usize, usize) {
        match self {
            Self::Legacy => (token.start_offset / 2, token.end_offset),
            Self::Source => (
                token.span.start.line as usize,
                token.span.start.column as usize,
            ),
        }
    }
}

/// One user-facing syntax diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub code: Code,
    /// Span of the anchor token
    pub span: Span,
}

impl Diagnostic {
    pub fn at_token(token: &Token, message: impl Into<String>, code: Code, mode: PositionMode) -> Self {
        let (line, column) = mode.locate(token);
        Self {
            line,
            column,
            message: message.into(),
            code,
            span: token.span,
        }
    }
}

/// `Line {line}, Column {column}: {message}`
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Line {}, Column {}: {}",
            self.line, self.column, self.message
        )
    }
}
