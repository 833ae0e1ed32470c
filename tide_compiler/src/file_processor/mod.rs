//! Loading of program sources and keyword lists
//!
//! The compiler stages never touch the filesystem; everything they read
//! comes through here.

mod processor;

use crate::config::compile_time::file_processing::{MAX_FILE_SIZE, MAX_LINE_COUNT};
use crate::config::runtime::FileProcessorPreferences;
use crate::log_debug;
use crate::logging::codes;
pub use processor::{
    parse_keywords, FileMetadata, FileProcessingResult, FileProcessor, FileProcessorError,
    SOURCE_EXTENSION,
};

/// Read a source file with default settings
pub fn process_file(file_path: &str) -> Result<FileProcessingResult, FileProcessorError> {
    FileProcessor::new().process_file(file_path)
}

/// Read a whitespace-separated keyword list
pub fn load_keywords(file_path: &str) -> Result<Vec<String>, FileProcessorError> {
    FileProcessor::new().load_keywords(file_path)
}

pub fn create_processor_from_preferences(prefs: &FileProcessorPreferences) -> FileProcessor {
    FileProcessor::from_preferences(prefs)
}

/// Check the file processing codes are registered (for system startup)
pub fn init_file_processor_logging() -> Result<(), String> {
    let file_codes = [
        codes::file_processing::FILE_NOT_FOUND,
        codes::file_processing::INVALID_EXTENSION,
        codes::file_processing::FILE_TOO_LARGE,
        codes::file_processing::EMPTY_FILE,
        codes::file_processing::PERMISSION_DENIED,
        codes::file_processing::INVALID_ENCODING,
        codes::file_processing::IO_ERROR,
        codes::file_processing::INVALID_PATH,
        codes::file_processing::TOO_MANY_LINES,
        codes::file_processing::INVALID_KEYWORD_FILE,
    ];

    for code in &file_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "File processor error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    log_debug!("File processor limits loaded",
        "max_file_size" => MAX_FILE_SIZE,
        "max_line_count" => MAX_LINE_COUNT
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_module_api() {
        let dir = tempdir().unwrap();
        let source_path = dir.path().join("code.us");
        let keyword_path = dir.path().join("workword");
        fs::write(&source_path, "pass\n").unwrap();
        fs::write(&keyword_path, "pass if").unwrap();

        assert!(process_file(source_path.to_str().unwrap()).is_ok());
        assert_eq!(load_keywords(keyword_path.to_str().unwrap()).unwrap().len(), 2);
    }

    #[test]
    fn test_codes_registered() {
        assert!(init_file_processor_logging().is_ok());
    }
}
