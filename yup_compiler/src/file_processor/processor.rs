//! Source file loading with compile-time limits

use crate::config::compile_time::file_processing::{
    LARGE_FILE_THRESHOLD, MAX_FILE_SIZE, MAX_LINE_COUNT,
};
use crate::config::runtime::FileProcessorPreferences;
use crate::logging::codes;
use crate::{log_debug, log_error, log_performance, log_success};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

/// Extension of Yup++ source files
pub const YUP_EXTENSION: &str = "yup";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file extension: expected .yup, found {extension:?}")]
    InvalidExtension { extension: Option<String> },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid UTF-8 encoding in file: {path}")]
    InvalidEncoding { path: String },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },

    #[error("File exceeds maximum line count: {lines} (max: {max_lines})")]
    TooManyLines { lines: usize, max_lines: usize },
}

impl FileProcessorError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            Self::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            Self::InvalidExtension { .. } => codes::file_processing::INVALID_EXTENSION,
            Self::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            Self::PermissionDenied { .. } => codes::file_processing::PERMISSION_DENIED,
            Self::InvalidEncoding { .. } => codes::file_processing::INVALID_ENCODING,
            Self::IoError { .. } => codes::file_processing::IO_ERROR,
            Self::InvalidPath { .. } => codes::file_processing::INVALID_PATH,
            Self::TooManyLines { .. } => codes::file_processing::TOO_MANY_LINES,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    fn from_io(error: &std::io::Error, path: &Path, action: &str) -> Self {
        match error.kind() {
            ErrorKind::NotFound => Self::FileNotFound {
                path: path.display().to_string(),
            },
            ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.display().to_string(),
            },
            ErrorKind::InvalidData => Self::InvalidEncoding {
                path: path.display().to_string(),
            },
            _ => Self::IoError {
                message: format!("Failed to {} '{}': {}", action, path.display(), error),
            },
        }
    }
}

/// What we learned about a source file while loading it
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Canonical path
    pub path: PathBuf,
    pub size: u64,
    /// Lowercased extension, if any
    pub extension: Option<String>,
    pub line_count: usize,
    pub is_yup_file: bool,
    pub modified: Option<SystemTime>,
}

impl FileMetadata {
    pub fn human_readable_size(&self) -> String {
        human_size(self.size)
    }

    pub fn is_large_file(&self) -> bool {
        self.size > LARGE_FILE_THRESHOLD
    }

    pub fn is_within_line_limit(&self) -> bool {
        self.line_count <= MAX_LINE_COUNT
    }
}

fn human_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;

    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit])
    }
}

#[derive(Debug, Clone)]
pub struct FileProcessingResult {
    pub source: String,
    pub metadata: FileMetadata,
    pub processing_duration: Duration,
}

impl FileProcessingResult {
    pub fn char_count(&self) -> usize {
        self.source.chars().count()
    }

}

/// Loads Yup++ source files. Size and line limits are compile-time; the
/// extension check and timing logs are runtime preferences.
#[derive(Debug, Clone)]
pub struct FileProcessor {
    pub require_yup_extension: bool,
    pub enable_performance_logging: bool,
}

impl FileProcessor {
    pub fn new() -> Self {
        Self {
            require_yup_extension: false,
            enable_performance_logging: true,
        }
    }

    pub fn from_preferences(prefs: &FileProcessorPreferences) -> Self {
        Self {
            require_yup_extension: prefs.require_yup_extension,
            enable_performance_logging: prefs.enable_performance_logging,
        }
    }

    /// Read a source file, enforcing every limit before handing back text
    pub fn process_file(&self, file_path: &str) -> Result<FileProcessingResult, FileProcessorError> {
        let start = Instant::now();
        log_debug!("Starting file processing", "file" => file_path);

        let path = self.validate_path(file_path)?;
        let mut metadata = self.collect_metadata(&path)?;
        self.validate_metadata(&metadata, file_path)?;

        let source = self.read_source(&path, file_path)?;

        metadata.line_count = source.lines().count();
        if !metadata.is_within_line_limit() {
            let error = FileProcessorError::TooManyLines {
                lines: metadata.line_count,
                max_lines: MAX_LINE_COUNT,
            };
            log_error!(error.error_code(), "File exceeds maximum line count",
                "file" => file_path,
                "lines" => metadata.line_count,
                "max_lines" => MAX_LINE_COUNT
            );
            return Err(error);
        }

        let result = FileProcessingResult {
            source,
            metadata,
            processing_duration: start.elapsed(),
        };
        self.log_success(&result, file_path);

        Ok(result)
    }

    fn log_success(&self, result: &FileProcessingResult, file_path: &str) {
        if self.enable_performance_logging {
            log_performance!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "File read",
                duration = result.processing_duration,
                "file" => file_path,
                "size" => result.metadata.human_readable_size(),
                "lines" => result.metadata.line_count,
                "chars" => result.char_count(),
                "large_file" => result.metadata.is_large_file()
            );
        } else {
            log_success!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "File read",
                "file" => file_path,
                "lines" => result.metadata.line_count
            );
        }
    }

    fn validate_path(&self, file_path: &str) -> Result<PathBuf, FileProcessorError> {
        if file_path.trim().is_empty() {
            let error = FileProcessorError::InvalidPath {
                path: file_path.to_string(),
            };
            log_error!(error.error_code(), "Empty file path provided");
            return Err(error);
        }

        let path = Path::new(file_path);

        if !path.exists() {
            let error = FileProcessorError::FileNotFound {
                path: file_path.to_string(),
            };
            log_error!(error.error_code(), "File not found", "path" => file_path);
            return Err(error);
        }

        if !path.is_file() {
            let error = FileProcessorError::InvalidPath {
                path: file_path.to_string(),
            };
            log_error!(error.error_code(), "Path is not a regular file", "path" => file_path);
            return Err(error);
        }

        path.canonicalize().map_err(|e| {
            let error = FileProcessorError::from_io(&e, path, "resolve path");
            log_error!(error.error_code(), "Failed to canonicalize path",
                "path" => file_path,
                "io_error" => e
            );
            error
        })
    }

    fn collect_metadata(&self, path: &Path) -> Result<FileMetadata, FileProcessorError> {
        let meta = fs::metadata(path).map_err(|e| {
            let error = FileProcessorError::from_io(&e, path, "read metadata for");
            log_error!(error.error_code(), "Failed to read file metadata",
                "path" => path.display(),
                "io_error" => e
            );
            error
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);
        let is_yup_file = extension.as_deref() == Some(YUP_EXTENSION);

        let metadata = FileMetadata {
            path: path.to_path_buf(),
            size: meta.len(),
            extension,
            line_count: 0,
            is_yup_file,
            modified: meta.modified().ok(),
        };

        log_debug!("File metadata collected",
            "size" => metadata.human_readable_size(),
            "extension" => metadata.extension.as_deref().unwrap_or("none"),
            "is_yup" => is_yup_file
        );

        Ok(metadata)
    }

    fn validate_metadata(&self, metadata: &FileMetadata, file_path: &str) -> Result<(), FileProcessorError> {
        if metadata.size > MAX_FILE_SIZE {
            let error = FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_FILE_SIZE,
            };
            log_error!(error.error_code(), "File exceeds maximum size",
                "file" => file_path,
                "size" => metadata.human_readable_size(),
                "limit" => human_size(MAX_FILE_SIZE)
            );
            return Err(error);
        }

        if self.require_yup_extension && !metadata.is_yup_file {
            let error = FileProcessorError::InvalidExtension {
                extension: metadata.extension.clone(),
            };
            log_error!(error.error_code(), "File does not have required .yup extension",
                "file" => file_path,
                "extension" => metadata.extension.as_deref().unwrap_or("none")
            );
            return Err(error);
        }

        Ok(())
    }

    fn read_source(&self, path: &Path, file_path: &str) -> Result<String, FileProcessorError> {
        let source = fs::read_to_string(path).map_err(|e| {
            let error = FileProcessorError::from_io(&e, path, "read file");
            log_error!(error.error_code(), "Failed to read file",
                "file" => file_path,
                "io_error" => e
            );
            error
        })?;

        log_debug!("File content read",
            "file" => file_path,
            "bytes" => source.len(),
            "chars" => source.chars().count()
        );

        Ok(source)
    }
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    fn write(dir: &tempfile::TempDir, name: &str, content: &[u8]) -> String {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_process_valid_file() {
        let dir = tempdir().unwrap();
        let content = "let x = 5;\nprint(x);\n";
        let path = write(&dir, "prog.yup", content.as_bytes());

        let result = FileProcessor::new().process_file(&path).unwrap();

        assert_eq!(result.source, content);
        assert_eq!(result.metadata.line_count, 2);
        assert!(result.metadata.is_yup_file);
        assert_eq!(result.metadata.extension.as_deref(), Some("yup"));
        assert_eq!(result.char_count(), content.chars().count());
    }

    #[test]
    fn test_empty_file_is_accepted() {
        let dir = tempdir().unwrap();
        let path = write(&dir, "empty.yup", b"");

        let result = FileProcessor::new().process_file(&path).unwrap();
        assert!(result.source.is_empty());
        assert_eq!(result.metadata.line_count, 0);
    }

    #[test]
    fn test_file_not_found() {
        let result = FileProcessor::new().process_file("definitely_missing.yup");
        assert_matches!(result, Err(FileProcessorError::FileNotFound { .. }));
    }

    #[test]
    fn test_empty_path_is_invalid() {
        let result = FileProcessor::new().process_file("");
        assert_matches!(result, Err(FileProcessorError::InvalidPath { .. }));
    }

    #[test]
    fn test_directory_is_invalid_path() {
        let dir = tempdir().unwrap();
        let result = FileProcessor::new().process_file(dir.path().to_str().unwrap());
        assert_matches!(result, Err(FileProcessorError::InvalidPath { .. }));
    }

    #[test]
    fn test_extension_requirement() {
        let dir = tempdir().unwrap();
        let path = write(&dir, "prog.txt", b"let x = 1;");

        let strict = FileProcessor {
            require_yup_extension: true,
            ..FileProcessor::new()
        };
        assert_matches!(
            strict.process_file(&path),
            Err(FileProcessorError::InvalidExtension { extension: Some(ref ext) }) if ext == "txt"
        );

        assert!(FileProcessor::new().process_file(&path).is_ok());
    }

    #[test]
    fn test_uppercase_extension_counts_as_yup() {
        let dir = tempdir().unwrap();
        let path = write(&dir, "PROG.YUP", b"x = 1;");

        let strict = FileProcessor {
            require_yup_extension: true,
            ..FileProcessor::new()
        };
        assert!(strict.process_file(&path).is_ok());
    }

    #[test]
    fn test_invalid_utf8() {
        let dir = tempdir().unwrap();
        let path = write(&dir, "bad.yup", &[b'l', b'e', b't', b' ', 0xff, 0xfe]);

        let result = FileProcessor::new().process_file(&path);
        assert_matches!(result, Err(FileProcessorError::InvalidEncoding { .. }));
    }

    #[test]
    fn test_file_too_large() {
        let dir = tempdir().unwrap();
        let content = vec![b' '; (MAX_FILE_SIZE + 1) as usize];
        let path = write(&dir, "large.yup", &content);

        assert_matches!(
            FileProcessor::new().process_file(&path),
            Err(FileProcessorError::FileTooLarge { size, max_size })
                if size == MAX_FILE_SIZE + 1 && max_size == MAX_FILE_SIZE
        );
    }

    #[test]
    fn test_too_many_lines() {
        let lines = MAX_LINE_COUNT + 1;
        if (lines as u64) * 2 > MAX_FILE_SIZE {
            // Size limit trips first under this build profile
            return;
        }
        let dir = tempdir().unwrap();
        let path = write(&dir, "tall.yup", ";\n".repeat(lines).as_bytes());

        assert_matches!(
            FileProcessor::new().process_file(&path),
            Err(FileProcessorError::TooManyLines { lines: found, max_lines })
                if found == lines && max_lines == MAX_LINE_COUNT
        );
    }

    #[test]
    fn test_error_code_mapping() {
        let cases = [
            (FileProcessorError::FileNotFound { path: "a".into() }, "E005"),
            (FileProcessorError::InvalidExtension { extension: None }, "E006"),
            (FileProcessorError::FileTooLarge { size: 2, max_size: 1 }, "E007"),
            (FileProcessorError::PermissionDenied { path: "a".into() }, "E009"),
            (FileProcessorError::InvalidEncoding { path: "a".into() }, "E010"),
            (FileProcessorError::IoError { message: "a".into() }, "E011"),
            (FileProcessorError::InvalidPath { path: "a".into() }, "E012"),
            (FileProcessorError::TooManyLines { lines: 2, max_lines: 1 }, "E013"),
        ];

        for (error, code) in cases {
            assert_eq!(error.error_code().as_str(), code, "{}", error);
        }
    }

    #[test]
    fn test_error_properties() {
        let error = FileProcessorError::FileNotFound {
            path: "prog.yup".to_string(),
        };

        assert_eq!(error.category(), "FileProcessing");
        assert!(error.requires_halt());
        assert!(!error.is_recoverable());
        assert_eq!(error.to_string(), "File not found: prog.yup");
    }

    #[test]
    fn test_human_readable_size() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.00 KB");
        assert_eq!(human_size(3 * 1024 * 1024), "3.00 MB");
    }

    #[test]
    fn test_from_preferences() {
        let prefs = FileProcessorPreferences {
            require_yup_extension: true,
            enable_performance_logging: false,
        };

        let processor = FileProcessor::from_preferences(&prefs);
        assert!(processor.require_yup_extension);
        assert!(!processor.enable_performance_logging);
    }
}
