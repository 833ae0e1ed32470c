//! Configuration for the Tide compiler
//!
//! Hard limits are generated at build time from `config/<profile>.toml`;
//! user-facing preferences live in [`runtime`] and come from the environment
//! or an optional preferences file.

// Generated by build.rs from the selected TOML profile
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

/// Build information and configuration metadata
pub mod build_info {
    use super::compile_time;

    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("TIDE_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("TIDE_CONFIG_DIR").unwrap_or("config")
    }

    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }

    /// One-line summary of the limits that shape tokenizing and IR building
    pub fn limits_summary() -> String {
        format!(
            "tokens<={}, identifier<={}, indent depth<={}, instructions<={}, block depth<={}",
            compile_time::lexical::MAX_TOKEN_COUNT,
            compile_time::lexical::MAX_IDENTIFIER_LENGTH,
            compile_time::lexical::MAX_INDENT_DEPTH,
            compile_time::ir::MAX_INSTRUCTIONS,
            compile_time::ir::MAX_BLOCK_DEPTH,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_limits_are_usable() {
        assert!(compile_time::lexical::MAX_INDENT_DEPTH > 0);
        assert!(compile_time::ir::MAX_EXPRESSION_TOKENS > 0);
        assert!(compile_time::file_processing::LARGE_FILE_THRESHOLD
            <= compile_time::file_processing::MAX_FILE_SIZE);
    }

    #[test]
    fn test_build_info_mentions_profile() {
        assert!(build_info::source_info().contains(build_info::profile()));
        assert!(build_info::limits_summary().contains("instructions<="));
    }
}
