//! Global logging for the Yup++ compiler
//!
//! A process-wide `LoggingService` behind a `OnceLock`, a thread-local file
//! context attached to every event, and the macros in [`macros`]. All entry
//! points are safe to call before initialization; events are then dropped
//! (errors fall back to stderr through [`safe_log_error`]).

#[macro_use]
pub mod macros;
pub mod codes;
pub mod config;
pub mod events;
pub mod service;

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

/// The file currently being processed on this thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileProcessingContext {
    pub file_path: PathBuf,
    pub file_id: usize,
}

impl FileProcessingContext {
    pub fn new(file_path: PathBuf, file_id: usize) -> Self {
        Self { file_path, file_id }
    }
}

thread_local! {
    static FILE_CONTEXT: RefCell<Option<FileProcessingContext>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Validate logging limits and install the configured service
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let logging_service = Arc::new(service::create_configured_service());

    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| "Global logger already initialized".to_string())?;

    for code in [
        codes::system::INTERNAL_ERROR,
        codes::file_processing::FILE_NOT_FOUND,
        codes::lexical::LONG_RUN,
        codes::syntax::UNEXPECTED_TOKEN,
    ] {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!("Missing metadata for error code: {}", code));
        }
    }

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Install a specific service (tests and embedders)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

/// True when debug events would reach the global logger
pub fn debug_enabled() -> bool {
    try_get_global_logger()
        .map(|logger| logger.should_log(LogLevel::Debug))
        .unwrap_or(false)
}

// ============================================================================
// FILE CONTEXT MANAGEMENT
// ============================================================================

pub fn set_file_context(file_path: PathBuf, file_id: usize) {
    FILE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(FileProcessingContext::new(file_path, file_id));
    });
}

/// Run `f` with the file context set, restoring the previous context after
pub fn with_file_context<F, R>(file_path: PathBuf, file_id: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = get_current_file_context();
    set_file_context(file_path, file_id);
    let result = f();
    FILE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = previous;
    });
    result
}

pub fn get_current_file_context() -> Option<FileProcessingContext> {
    FILE_CONTEXT.with(|ctx| ctx.borrow().clone())
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

fn decorate(mut event: LogEvent, context: Vec<(&str, String)>) -> LogEvent {
    event.message = config::truncate_message(&event.message).to_string();

    for (key, value) in context {
        event = event.with_context(key, &value);
    }

    if config::include_file_context() {
        if let Some(file_ctx) = get_current_file_context() {
            event = event
                .with_context("file", &file_ctx.file_path.display().to_string())
                .with_context("file_id", &file_ctx.file_id.to_string());
        }
    }

    event
}

fn dispatch(event: LogEvent) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<crate::utils::Span>,
    context: Vec<(&str, String)>,
) {
    let mut event = LogEvent::error(code, message);
    if let Some(s) = span {
        event = event.with_span(s);
    }
    dispatch(decorate(event, context));
}

pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, String)>) {
    dispatch(decorate(LogEvent::success(code, message), context));
}

pub fn log_info_with_context(message: &str, context: Vec<(&str, String)>) {
    dispatch(decorate(LogEvent::info(message), context));
}

pub fn log_warning_with_context(code: Option<Code>, message: &str, context: Vec<(&str, String)>) {
    let event = match code {
        Some(code) => LogEvent::warning_with_code(code, message),
        None => LogEvent::warning(message),
    };
    dispatch(decorate(event, context));
}

pub fn log_debug_with_context(message: &str, context: Vec<(&str, String)>) {
    dispatch(decorate(LogEvent::debug(message), context));
}

// ============================================================================
// SAFE FALLBACK LOGGING
// ============================================================================

/// Log through the global logger, or straight to stderr if there is none
pub fn safe_log_error(code: Code, message: &str) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(LogEvent::error(code, message));
    } else {
        eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_context_management() {
        let file_path = PathBuf::from("test.yup");

        assert!(get_current_file_context().is_none());

        set_file_context(file_path.clone(), 1);
        assert_eq!(
            get_current_file_context().map(|c| c.file_path),
            Some(file_path)
        );
    }

    #[test]
    fn test_with_file_context_restores_previous() {
        let outer = PathBuf::from("outer.yup");
        let inner = PathBuf::from("inner.yup");

        let result = with_file_context(outer.clone(), 1, || {
            with_file_context(inner.clone(), 2, || {
                assert_eq!(get_current_file_context().map(|c| c.file_id), Some(2));
            });
            get_current_file_context().map(|c| c.file_path)
        });

        assert_eq!(result, Some(outer));
        assert!(get_current_file_context().is_none());
    }

    #[test]
    fn test_decorate_adds_file_context() {
        let event = with_file_context(PathBuf::from("prog.yup"), 7, || {
            decorate(LogEvent::info("hello"), vec![("tokens", "3".to_string())])
        });

        assert_eq!(event.context.get("tokens").map(String::as_str), Some("3"));
        if config::include_file_context() {
            assert_eq!(event.context.get("file_id").map(String::as_str), Some("7"));
        }
    }

    #[test]
    fn test_safe_logging_without_global_logger() {
        safe_log_error(codes::system::INTERNAL_ERROR, "Test error");
    }
}
