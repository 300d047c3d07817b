//! Configuration for the Yup++ compiler
//!
//! `compile_time` holds limits generated by build.rs from `config/<profile>.toml`.
//! `runtime` holds per-run preferences.

include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

pub use runtime::{LogLevel, RuntimeConfig};

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("YUP_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("YUP_CONFIG_DIR").unwrap_or("config")
    }

    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::compile_time;

    #[test]
    fn test_generated_limits_are_consistent() {
        assert!(compile_time::lexical::LONG_RUN_THRESHOLD > 0);
        assert!(compile_time::syntax::MAX_PARSE_DEPTH > 0);
        assert!(
            compile_time::file_processing::LARGE_FILE_THRESHOLD
                <= compile_time::file_processing::MAX_FILE_SIZE
        );
        assert!(
            compile_time::logging::MAX_LOG_EVENTS_PER_FILE
                <= compile_time::logging::LOG_BUFFER_SIZE
        );
    }

    #[test]
    fn test_source_info_names_profile() {
        assert!(super::build_info::source_info().contains(super::build_info::profile()));
    }
}
