//! Error and success codes with their classification metadata
//!
//! Every code emitted by the compiler is declared here and registered with
//! its severity, category and recommended action.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Critical" => Some(Severity::Critical),
            "High" => Some(Severity::High),
            "Medium" => Some(Severity::Medium),
            "Low" => Some(Severity::Low),
            _ => None,
        }
    }
}

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
    pub const TOO_MANY_LINES: Code = Code::new("E013");
}

/// Size warnings; lexing itself never fails.
pub mod lexical {
    use super::Code;

    pub const LONG_RUN: Code = Code::new("W020");
    pub const MANY_TOKENS: Code = Code::new("W021");
}

pub mod syntax {
    use super::Code;

    pub const EMPTY_TOKEN_STREAM: Code = Code::new("E041");
    pub const UNCLOSED_DELIMITER: Code = Code::new("E042");
    pub const MISSING_TOKEN: Code = Code::new("E043");
    pub const INVALID_FACTOR: Code = Code::new("E044");
    pub const MISSING_RELATIONAL_OPERATOR: Code = Code::new("E045");
    pub const UNEXPECTED_TOKEN: Code = Code::new("E050");
    pub const UNEXPECTED_END_OF_INPUT: Code = Code::new("E051");
    pub const INTERNAL_PARSER_ERROR: Code = Code::new("E086");
    pub const MAX_RECURSION_DEPTH: Code = Code::new("E087");
}

pub mod pipeline {
    use super::Code;

    pub const REQUEST_DROPPED: Code = Code::new("W010");
    pub const LARGE_INPUT: Code = Code::new("W011");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const AST_CONSTRUCTION_COMPLETE: Code = Code::new("I040");
    pub const SYNTAX_VALIDATION_PASSED: Code = Code::new("I041");
    pub const PIPELINE_COMPLETE: Code = Code::new("I090");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

const REGISTERED: &[ErrorMetadata] = &[
    // System
    ErrorMetadata::new(
        "ERR001",
        "System",
        Severity::Critical,
        false,
        true,
        "Internal compiler error",
        "File a bug report with the input that triggered it",
    ),
    ErrorMetadata::new(
        "ERR002",
        "System",
        Severity::Critical,
        false,
        true,
        "Logging or configuration initialization failure",
        "Check YUP_* environment variables and the build profile",
    ),
    // File processing
    ErrorMetadata::new(
        "E005",
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "File not found at specified path",
        "Check file path and ensure file exists",
    ),
    ErrorMetadata::new(
        "E006",
        "FileProcessing",
        Severity::Low,
        true,
        false,
        "File does not have .yup extension",
        "Rename the file or disable YUP_REQUIRE_YUP_EXTENSION",
    ),
    ErrorMetadata::new(
        "E007",
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "File exceeds maximum size limit",
        "Split the program or build with a larger max_file_size",
    ),
    ErrorMetadata::new(
        "E009",
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "Permission denied accessing file",
        "Check file permissions and user access rights",
    ),
    ErrorMetadata::new(
        "E010",
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "File is not valid UTF-8",
        "Re-save the file as UTF-8",
    ),
    ErrorMetadata::new(
        "E011",
        "FileProcessing",
        Severity::High,
        false,
        true,
        "I/O error while reading file",
        "Check the file system and retry",
    ),
    ErrorMetadata::new(
        "E012",
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "Path is not a regular file",
        "Pass a path to a source file",
    ),
    ErrorMetadata::new(
        "E013",
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "File exceeds maximum line count",
        "Split the program or build with a larger max_line_count",
    ),
    // Lexical warnings
    ErrorMetadata::new(
        "W020",
        "Lexical",
        Severity::Low,
        true,
        false,
        "Identifier or number run is above the run-length warning threshold",
        "Consider a shorter identifier or literal",
    ),
    ErrorMetadata::new(
        "W021",
        "Lexical",
        Severity::Low,
        true,
        false,
        "Token count is above the warning threshold",
        "Expect slower parsing; consider splitting the program",
    ),
    // Syntax diagnostics
    ErrorMetadata::new(
        "E041",
        "Syntax",
        Severity::Low,
        true,
        false,
        "No tokens to parse",
        "Nothing to do; empty input is a valid empty program",
    ),
    ErrorMetadata::new(
        "E042",
        "Syntax",
        Severity::Medium,
        true,
        false,
        "Block or parenthesis left open",
        "Add the missing closing delimiter",
    ),
    ErrorMetadata::new(
        "E043",
        "Syntax",
        Severity::Medium,
        true,
        false,
        "Mandatory token missing from statement",
        "Add the token named in the diagnostic",
    ),
    ErrorMetadata::new(
        "E044",
        "Syntax",
        Severity::Medium,
        true,
        false,
        "Token cannot start an operand",
        "Use a number, identifier or parenthesized expression",
    ),
    ErrorMetadata::new(
        "E045",
        "Syntax",
        Severity::Medium,
        true,
        false,
        "Condition lacks a relational operator",
        "Compare two expressions with == != < > <= or >=",
    ),
    ErrorMetadata::new(
        "E050",
        "Syntax",
        Severity::Medium,
        true,
        false,
        "Token cannot start a statement",
        "Start statements with let, if, while, print or an identifier",
    ),
    ErrorMetadata::new(
        "E051",
        "Syntax",
        Severity::Medium,
        true,
        false,
        "Input ended inside an expression",
        "Complete the expression",
    ),
    ErrorMetadata::new(
        "E086",
        "Syntax",
        Severity::Critical,
        false,
        true,
        "Internal parser error",
        "File a bug report with the input that triggered it",
    ),
    ErrorMetadata::new(
        "E087",
        "Syntax",
        Severity::High,
        true,
        false,
        "Maximum nesting depth exceeded",
        "Reduce nesting of blocks or parentheses",
    ),
    // Pipeline warnings
    ErrorMetadata::new(
        "W010",
        "Pipeline",
        Severity::Low,
        true,
        false,
        "Processing request dropped while another run was active",
        "Resubmit after the active run completes",
    ),
    ErrorMetadata::new(
        "W011",
        "Pipeline",
        Severity::Low,
        true,
        false,
        "Input is above the large-file threshold",
        "Expect slower processing",
    ),
];

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        REGISTERED
            .iter()
            .map(|meta| (meta.code, meta.clone()))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Defaults to Medium for unregistered codes
pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|meta| meta.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|meta| meta.recoverable)
        .unwrap_or(true)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_metadata(code)
        .map(|meta| meta.requires_halt)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|meta| meta.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|meta| meta.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|meta| meta.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_error_code_is_registered() {
        let codes = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            file_processing::FILE_NOT_FOUND,
            file_processing::INVALID_EXTENSION,
            file_processing::FILE_TOO_LARGE,
            file_processing::PERMISSION_DENIED,
            file_processing::INVALID_ENCODING,
            file_processing::IO_ERROR,
            file_processing::INVALID_PATH,
            file_processing::TOO_MANY_LINES,
            lexical::LONG_RUN,
            lexical::MANY_TOKENS,
            syntax::EMPTY_TOKEN_STREAM,
            syntax::UNCLOSED_DELIMITER,
            syntax::MISSING_TOKEN,
            syntax::INVALID_FACTOR,
            syntax::MISSING_RELATIONAL_OPERATOR,
            syntax::UNEXPECTED_TOKEN,
            syntax::UNEXPECTED_END_OF_INPUT,
            syntax::INTERNAL_PARSER_ERROR,
            syntax::MAX_RECURSION_DEPTH,
            pipeline::REQUEST_DROPPED,
            pipeline::LARGE_INPUT,
        ];

        for code in codes {
            assert!(
                get_error_metadata(code.as_str()).is_some(),
                "missing metadata for {}",
                code
            );
        }
    }

    #[test]
    fn test_registry_has_no_duplicate_codes() {
        assert_eq!(get_error_registry().len(), REGISTERED.len());
    }

    #[test]
    fn test_syntax_diagnostics_are_recoverable() {
        assert!(is_recoverable(syntax::UNEXPECTED_TOKEN.as_str()));
        assert!(!requires_halt(syntax::MISSING_TOKEN.as_str()));
        assert!(requires_halt(syntax::INTERNAL_PARSER_ERROR.as_str()));
        assert_eq!(get_category(syntax::INVALID_FACTOR.as_str()), "Syntax");
    }

    #[test]
    fn test_lexical_codes_never_halt() {
        for code in [lexical::LONG_RUN, lexical::MANY_TOKENS] {
            assert!(is_recoverable(code.as_str()));
            assert!(!requires_halt(code.as_str()));
        }
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_severity("X999"), Severity::Medium);
        assert!(is_recoverable("X999"));
        assert_eq!(get_description("X999"), "Unknown error");
        assert_eq!(get_action("X999"), "No specific action available");
    }

    #[test]
    fn test_severity_round_trip_names() {
        for severity in [Severity::Critical, Severity::High, Severity::Medium, Severity::Low] {
            assert_eq!(Severity::from_str(severity.as_str()), Some(severity));
        }
    }
}
