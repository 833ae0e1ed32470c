// build.rs - TOML-driven compile-time limit generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    file_processing: FileProcessingLimits,
    lexical: LexicalLimits,
    ir: IrLimits,
    syntax: SyntaxLimits,
    semantic: SemanticLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct FileProcessingLimits {
    max_file_size: u64,
    large_file_threshold: u64,
    max_line_count: usize,
    max_keyword_count: usize,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    max_string_size: usize,
    max_identifier_length: usize,
    max_comment_length: usize,
    max_token_count: usize,
    max_indent_depth: usize,
}

#[derive(serde::Deserialize)]
struct IrLimits {
    max_instructions: usize,
    max_expression_tokens: usize,
    max_block_depth: usize,
}

#[derive(serde::Deserialize)]
struct SyntaxLimits {
    max_bracket_depth: usize,
}

#[derive(serde::Deserialize)]
struct SemanticLimits {
    max_scope_depth: usize,
    max_symbols_per_scope: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    max_error_collection: usize,
    log_buffer_size: usize,
    max_log_message_length: usize,
    max_log_events_per_file: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=TIDE_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=TIDE_CONFIG_DIR");

    let profile = env::var("TIDE_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("TIDE_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Workspace root is the parent of the crate directory
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_FILE_SIZE: u64 = 1_000_000_000;
    const ABSOLUTE_MAX_TOKENS: usize = 50_000_000;

    if config.file_processing.max_file_size > ABSOLUTE_MAX_FILE_SIZE {
        panic!("LIMITS: max_file_size exceeds absolute maximum");
    }

    if config.lexical.max_token_count > ABSOLUTE_MAX_TOKENS {
        panic!("LIMITS: max_token_count exceeds absolute maximum");
    }

    if config.lexical.max_indent_depth == 0 || config.ir.max_block_depth == 0 {
        panic!("LIMITS: indentation and block depth must allow at least one level");
    }

    if config.ir.max_expression_tokens == 0 {
        panic!("LIMITS: max_expression_tokens must be positive");
    }

    if profile == "production" && config.file_processing.max_file_size > 50_000_000 {
        panic!("PRODUCTION: max_file_size too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod file_processing {{
        pub const MAX_FILE_SIZE: u64 = {};
        pub const LARGE_FILE_THRESHOLD: u64 = {};
        pub const MAX_LINE_COUNT: usize = {};
        pub const MAX_KEYWORD_COUNT: usize = {};
    }}

    pub mod lexical {{
        pub const MAX_STRING_SIZE: usize = {};
        pub const MAX_IDENTIFIER_LENGTH: usize = {};
        pub const MAX_COMMENT_LENGTH: usize = {};
        pub const MAX_TOKEN_COUNT: usize = {};
        pub const MAX_INDENT_DEPTH: usize = {};
    }}

    pub mod ir {{
        pub const MAX_INSTRUCTIONS: usize = {};
        pub const MAX_EXPRESSION_TOKENS: usize = {};
        pub const MAX_BLOCK_DEPTH: usize = {};
    }}

    pub mod syntax {{
        pub const MAX_BRACKET_DEPTH: usize = {};
    }}

    pub mod semantic {{
        pub const MAX_SCOPE_DEPTH: usize = {};
        pub const MAX_SYMBOLS_PER_SCOPE: usize = {};
    }}

    pub mod logging {{
        pub const MAX_ERROR_COLLECTION: usize = {};
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
        pub const MAX_LOG_EVENTS_PER_FILE: usize = {};
    }}
}}
"#,
        profile,
        config.file_processing.max_file_size,
        config.file_processing.large_file_threshold,
        config.file_processing.max_line_count,
        config.file_processing.max_keyword_count,
        config.lexical.max_string_size,
        config.lexical.max_identifier_length,
        config.lexical.max_comment_length,
        config.lexical.max_token_count,
        config.lexical.max_indent_depth,
        config.ir.max_instructions,
        config.ir.max_expression_tokens,
        config.ir.max_block_depth,
        config.syntax.max_bracket_depth,
        config.semantic.max_scope_depth,
        config.semantic.max_symbols_per_scope,
        config.logging.max_error_collection,
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
        config.logging.max_log_events_per_file,
    );

    fs::write(output_path, constants_code).unwrap();
}
