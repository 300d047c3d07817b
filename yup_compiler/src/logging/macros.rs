//! Logging macros. Context values accept anything implementing Display.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_context {
    ($($key:expr => $value:expr),*) => {
        vec![$(($key, format!("{}", $value))),*]
    };
}

/// `log_error!(code, msg)`, optionally with `span = s` and `"key" => value` pairs
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr) => {
        $crate::logging::log_error_with_context($code, $message, None, vec![])
    };

    ($code:expr, $message:expr, span = $span:expr) => {
        $crate::logging::log_error_with_context($code, $message, Some($span), vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {
        $crate::logging::log_error_with_context(
            $code, $message, None, $crate::__log_context!($($key => $value),+)
        )
    };

    ($code:expr, $message:expr, span = $span:expr, $($key:expr => $value:expr),+) => {
        $crate::logging::log_error_with_context(
            $code, $message, Some($span), $crate::__log_context!($($key => $value),+)
        )
    };
}

#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr) => {
        $crate::logging::log_success_with_context($code, $message, vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {
        $crate::logging::log_success_with_context(
            $code, $message, $crate::__log_context!($($key => $value),+)
        )
    };
}

#[macro_export]
macro_rules! log_info {
    ($message:expr) => {
        $crate::logging::log_info_with_context($message, vec![])
    };

    ($message:expr, $($key:expr => $value:expr),+) => {
        $crate::logging::log_info_with_context($message, $crate::__log_context!($($key => $value),+))
    };
}

/// `log_warning!(msg, ...)` or `log_warning!(code = c, msg, ...)`
#[macro_export]
macro_rules! log_warning {
    (code = $code:expr, $message:expr) => {
        $crate::logging::log_warning_with_context(Some($code), $message, vec![])
    };

    (code = $code:expr, $message:expr, $($key:expr => $value:expr),+) => {
        $crate::logging::log_warning_with_context(
            Some($code), $message, $crate::__log_context!($($key => $value),+)
        )
    };

    ($message:expr) => {
        $crate::logging::log_warning_with_context(None, $message, vec![])
    };

    ($message:expr, $($key:expr => $value:expr),+) => {
        $crate::logging::log_warning_with_context(
            None, $message, $crate::__log_context!($($key => $value),+)
        )
    };
}

/// Skips building the event entirely unless debug level is enabled
#[macro_export]
macro_rules! log_debug {
    ($message:expr) => {
        if $crate::logging::debug_enabled() {
            $crate::logging::log_debug_with_context($message, vec![])
        }
    };

    ($message:expr, $($key:expr => $value:expr),+) => {
        if $crate::logging::debug_enabled() {
            $crate::logging::log_debug_with_context(
                $message, $crate::__log_context!($($key => $value),+)
            )
        }
    };
}

/// Success event with a `duration_ms` context entry
#[macro_export]
macro_rules! log_performance {
    ($code:expr, $message:expr, duration = $duration:expr) => {
        $crate::log_success!($code, $message,
            "duration_ms" => format!("{:.3}", $duration.as_secs_f64() * 1000.0)
        )
    };

    ($code:expr, $message:expr, duration = $duration:expr, $($key:expr => $value:expr),+) => {
        $crate::log_success!($code, $message,
            "duration_ms" => format!("{:.3}", $duration.as_secs_f64() * 1000.0),
            $($key => $value),+
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::logging::codes;
    use crate::utils::{Position, Span};

    #[test]
    fn test_context_builder_formats_display_values() {
        let context: Vec<(&str, String)> = __log_context!("tokens" => 42, "ok" => true);
        assert_eq!(context, vec![("tokens", "42".to_string()), ("ok", "true".to_string())]);
    }

    #[test]
    fn test_macros_are_safe_without_global_logger() {
        let span = Span::covering(Position::start(), "let");
        let duration = std::time::Duration::from_millis(3);

        log_error!(codes::syntax::MISSING_TOKEN, "Expected ';' after declaration", span = span);
        log_error!(codes::file_processing::FILE_TOO_LARGE, "Too large", "size" => 11, "limit" => 10);
        log_success!(codes::success::TOKENIZATION_COMPLETE, "done", "tokens" => 3);
        log_info!("Processing", "bytes" => 12);
        log_warning!(code = codes::pipeline::REQUEST_DROPPED, "busy");
        log_warning!("plain warning");
        log_debug!("debug", "depth" => 2);
        log_performance!(codes::success::PIPELINE_COMPLETE, "done", duration = duration, "lines" => 1);
    }
}
