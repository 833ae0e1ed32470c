//! Error and success codes with their classification metadata
//!
//! Every code a stage can emit is declared here once, together with the
//! category, severity and recommended action reported alongside it.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Code wrapper shared by error, warning and success events
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
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
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
    pub const CONFIGURATION_ERROR: Code = Code::new("ERR003");
}

pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
    pub const TOO_MANY_LINES: Code = Code::new("E013");
    pub const INVALID_KEYWORD_FILE: Code = Code::new("E014");
}

/// Indentation (off-side rule) failures raised by the tokenizer
pub mod structural {
    use super::Code;

    pub const INCONSISTENT_INDENTATION: Code = Code::new("E016");
    pub const TAB_INDENTATION: Code = Code::new("E017");
    pub const INDENT_TOO_DEEP: Code = Code::new("E018");
}

pub mod lexical {
    use super::Code;

    pub const INVALID_CHARACTER: Code = Code::new("E020");
    pub const UNTERMINATED_STRING: Code = Code::new("E021");
    pub const INVALID_NUMBER: Code = Code::new("E022");
    pub const IDENTIFIER_TOO_LONG: Code = Code::new("E023");
    pub const STRING_TOO_LARGE: Code = Code::new("E024");
    pub const UNTERMINATED_COMMENT: Code = Code::new("E025");
    pub const COMMENT_TOO_LONG: Code = Code::new("E026");
    pub const TOO_MANY_TOKENS: Code = Code::new("E027");
}

pub mod syntax {
    use super::Code;

    pub const UNBALANCED_BRACKET: Code = Code::new("E040");
    pub const MISMATCHED_BRACKET: Code = Code::new("E041");
    pub const MISSING_COLON: Code = Code::new("E042");
    pub const EXPECTED_BLOCK: Code = Code::new("E043");
    pub const UNEXPECTED_INDENT: Code = Code::new("E044");
    pub const MALFORMED_FUNCTION_HEADER: Code = Code::new("E045");
    pub const MALFORMED_FOR_HEADER: Code = Code::new("E046");
    pub const DANGLING_ELSE: Code = Code::new("E047");
    pub const BRACKET_DEPTH_EXCEEDED: Code = Code::new("E048");
}

pub mod semantic {
    use super::Code;

    pub const UNDECLARED_VARIABLE: Code = Code::new("E070");
    pub const REDECLARATION: Code = Code::new("E071");
    pub const KEYWORD_AS_NAME: Code = Code::new("E072");
    pub const ASSIGNMENT_TO_FUNCTION: Code = Code::new("E073");
    pub const TYPE_MISMATCH: Code = Code::new("E074");
    pub const SCOPE_TOO_DEEP: Code = Code::new("E075");
    pub const TOO_MANY_SYMBOLS: Code = Code::new("E076");
}

pub mod ir {
    use super::Code;

    pub const DUPLICATE_FUNCTION: Code = Code::new("E089");

    pub const EMPTY_EXPRESSION: Code = Code::new("E090");
    pub const MALFORMED_EXPRESSION: Code = Code::new("E091");
    pub const UNEXPECTED_KEYWORD: Code = Code::new("E092");
    pub const MALFORMED_HEADER: Code = Code::new("E093");
    pub const UNRESOLVED_CALL: Code = Code::new("E094");
    pub const RETURN_OUTSIDE_FUNCTION: Code = Code::new("E095");
    pub const UNEXPECTED_TOKEN: Code = Code::new("E096");
    pub const INSTRUCTION_LIMIT: Code = Code::new("E097");
    pub const BLOCK_TOO_DEEP: Code = Code::new("E098");
    pub const UNRESOLVED_LABEL: Code = Code::new("E099");
}

pub mod success {
    use super::Code;

    pub const OPERATION_COMPLETED_SUCCESSFULLY: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const KEYWORDS_LOADED: Code = Code::new("I007");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const SYNTAX_VALIDATION_PASSED: Code = Code::new("I041");
    pub const SEMANTIC_ANALYSIS_COMPLETE: Code = Code::new("I070");
    pub const IR_BUILD_COMPLETE: Code = Code::new("I090");
    pub const PIPELINE_COMPLETE: Code = Code::new("I099");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        use Severity::*;

        let mut registry = HashMap::new();
        let mut add = |code: Code,
                       category: &'static str,
                       severity: Severity,
                       requires_halt: bool,
                       description: &'static str,
                       action: &'static str| {
            registry.insert(
                code.as_str(),
                ErrorMetadata::new(
                    code.as_str(),
                    category,
                    severity,
                    requires_halt,
                    description,
                    action,
                ),
            );
        };

        // System
        add(system::INTERNAL_ERROR, "System", Critical, true,
            "Critical internal compiler error",
            "File a bug report with the input that triggered it");
        add(system::INITIALIZATION_FAILURE, "System", Critical, true,
            "Compiler initialization failure",
            "Check logging and configuration setup");
        add(system::CONFIGURATION_ERROR, "System", High, true,
            "Invalid runtime configuration",
            "Fix the preferences file or TIDE_* environment variables");

        // File processing
        add(file_processing::FILE_NOT_FOUND, "FileProcessing", Medium, true,
            "Source or keyword file not found",
            "Verify the path passed on the command line");
        add(file_processing::INVALID_EXTENSION, "FileProcessing", Low, true,
            "Source file does not have the .us extension",
            "Rename the file or disable TIDE_REQUIRE_SOURCE_EXTENSION");
        add(file_processing::FILE_TOO_LARGE, "FileProcessing", High, true,
            "File exceeds the configured size limit",
            "Split the program or raise max_file_size in the build profile");
        add(file_processing::EMPTY_FILE, "FileProcessing", Low, true,
            "File is empty",
            "Provide a non-empty file");
        add(file_processing::PERMISSION_DENIED, "FileProcessing", Medium, true,
            "Permission denied while reading file",
            "Check file permissions");
        add(file_processing::INVALID_ENCODING, "FileProcessing", Medium, true,
            "File is not valid UTF-8",
            "Re-encode the file as UTF-8");
        add(file_processing::IO_ERROR, "FileProcessing", High, true,
            "I/O error while reading file",
            "Check the filesystem and retry");
        add(file_processing::INVALID_PATH, "FileProcessing", Medium, true,
            "Path does not name a regular file",
            "Pass a file path rather than a directory");
        add(file_processing::TOO_MANY_LINES, "FileProcessing", High, true,
            "File exceeds the configured line limit",
            "Split the program or raise max_line_count in the build profile");
        add(file_processing::INVALID_KEYWORD_FILE, "FileProcessing", Medium, true,
            "Keyword file is empty or exceeds the keyword limit",
            "List reserved words separated by whitespace");

        // Structural
        add(structural::INCONSISTENT_INDENTATION, "Structural", High, true,
            "Dedent to a width with no matching indentation level",
            "Use the same indentation width for every line of a block");
        add(structural::TAB_INDENTATION, "Structural", High, true,
            "Tab character used for indentation",
            "Indent with spaces only");
        add(structural::INDENT_TOO_DEEP, "Structural", High, true,
            "Indentation nesting exceeds the configured depth",
            "Flatten nested blocks");

        // Lexical
        add(lexical::INVALID_CHARACTER, "Lexical", High, true,
            "Character is not valid in source text",
            "Remove or quote the character");
        add(lexical::UNTERMINATED_STRING, "Lexical", High, true,
            "String literal is missing its closing quote",
            "Close the string on the same line");
        add(lexical::INVALID_NUMBER, "Lexical", High, true,
            "Malformed numeric literal",
            "Use at most one decimal point followed by digits");
        add(lexical::IDENTIFIER_TOO_LONG, "Lexical", Medium, true,
            "Identifier exceeds the configured length",
            "Shorten the identifier");
        add(lexical::STRING_TOO_LARGE, "Lexical", Medium, true,
            "String literal exceeds the configured size",
            "Shorten the string literal");
        add(lexical::UNTERMINATED_COMMENT, "Lexical", High, true,
            "Block comment is missing its closing */",
            "Close the block comment");
        add(lexical::COMMENT_TOO_LONG, "Lexical", Medium, true,
            "Comment exceeds the configured length",
            "Shorten the comment");
        add(lexical::TOO_MANY_TOKENS, "Lexical", High, true,
            "Token count exceeds the configured limit",
            "Split the program into smaller files");

        // Syntax
        add(syntax::UNBALANCED_BRACKET, "Syntax", High, true,
            "Bracket is never closed or closes nothing",
            "Balance every bracket on the statement");
        add(syntax::MISMATCHED_BRACKET, "Syntax", High, true,
            "Closing bracket does not match the opening bracket",
            "Use the matching closing bracket");
        add(syntax::MISSING_COLON, "Syntax", High, true,
            "Block header does not end with ':'",
            "Terminate the header with ':'");
        add(syntax::EXPECTED_BLOCK, "Syntax", High, true,
            "Block header is not followed by an indented block",
            "Indent the block body on the next line");
        add(syntax::UNEXPECTED_INDENT, "Syntax", High, true,
            "Indentation increases without a block header",
            "Remove the extra indentation");
        add(syntax::MALFORMED_FUNCTION_HEADER, "Syntax", High, true,
            "Function header is not 'def name(params):'",
            "Fix the function header");
        add(syntax::MALFORMED_FOR_HEADER, "Syntax", High, true,
            "Loop header is not 'for name in range(...):'",
            "Fix the loop header");
        add(syntax::DANGLING_ELSE, "Syntax", High, true,
            "'elif' or 'else' without a preceding 'if' block",
            "Attach the branch to an if statement");
        add(syntax::BRACKET_DEPTH_EXCEEDED, "Syntax", Medium, true,
            "Bracket nesting exceeds the configured depth",
            "Simplify the expression");

        // Semantic
        add(semantic::UNDECLARED_VARIABLE, "Semantic", High, true,
            "Variable used before declaration",
            "Declare the variable with a type before using it");
        add(semantic::REDECLARATION, "Semantic", High, true,
            "Variable declared twice in the same scope",
            "Rename one declaration or drop the type to assign");
        add(semantic::KEYWORD_AS_NAME, "Semantic", High, true,
            "Reserved word used as a name",
            "Choose a name that is not a keyword");
        add(semantic::ASSIGNMENT_TO_FUNCTION, "Semantic", High, true,
            "Assignment targets a function name",
            "Assign to a variable instead");
        add(semantic::TYPE_MISMATCH, "Semantic", High, true,
            "Literal initializer does not match the declared type",
            "Change the declared type or the initializer");
        add(semantic::SCOPE_TOO_DEEP, "Semantic", Medium, true,
            "Scope nesting exceeds the configured depth",
            "Flatten nested blocks");
        add(semantic::TOO_MANY_SYMBOLS, "Semantic", Medium, true,
            "Scope declares more symbols than the configured limit",
            "Split the scope");

        // IR
        add(ir::DUPLICATE_FUNCTION, "IR", High, true,
            "Function name defined more than once",
            "Rename one of the definitions");
        add(ir::EMPTY_EXPRESSION, "IR", High, true,
            "Expression has no operands or operators",
            "Supply an expression");
        add(ir::MALFORMED_EXPRESSION, "IR", High, true,
            "Expression cannot be converted to postfix form",
            "Separate operands with operators");
        add(ir::UNEXPECTED_KEYWORD, "IR", High, true,
            "Keyword cannot start a statement",
            "Move the keyword into a valid statement");
        add(ir::MALFORMED_HEADER, "IR", High, true,
            "Control-flow header cannot be lowered",
            "Check the header against 'if/while/for/def' forms");
        add(ir::UNRESOLVED_CALL, "IR", High, true,
            "Call to a function that has not been defined yet",
            "Define the function above its first call");
        add(ir::RETURN_OUTSIDE_FUNCTION, "IR", High, true,
            "'return' outside a function body",
            "Move the return into a function");
        add(ir::UNEXPECTED_TOKEN, "IR", High, true,
            "Token cannot start or continue a statement",
            "Check the statement form");
        add(ir::INSTRUCTION_LIMIT, "IR", High, true,
            "Instruction count exceeds the configured limit",
            "Split the program");
        add(ir::BLOCK_TOO_DEEP, "IR", Medium, true,
            "Block nesting exceeds the configured depth",
            "Flatten nested blocks");
        add(ir::UNRESOLVED_LABEL, "IR", Critical, true,
            "Jump names a label that was never emitted",
            "File a bug report with the input that triggered it");

        // Success
        add(success::OPERATION_COMPLETED_SUCCESSFULLY, "Success", Low, false,
            "Operation completed successfully", "None");
        add(success::SYSTEM_INITIALIZATION_COMPLETED, "Success", Low, false,
            "Logging and configuration initialized", "None");
        add(success::FILE_PROCESSING_SUCCESS, "Success", Low, false,
            "Source file read and validated", "None");
        add(success::KEYWORDS_LOADED, "Success", Low, false,
            "Keyword list loaded", "None");
        add(success::TOKENIZATION_COMPLETE, "Success", Low, false,
            "Tokenization completed", "None");
        add(success::SYNTAX_VALIDATION_PASSED, "Success", Low, false,
            "Grammar validation passed", "None");
        add(success::SEMANTIC_ANALYSIS_COMPLETE, "Success", Low, false,
            "Scope checking passed", "None");
        add(success::IR_BUILD_COMPLETE, "Success", Low, false,
            "Instruction list built", "None");
        add(success::PIPELINE_COMPLETE, "Success", Low, false,
            "All pipeline stages completed", "None");

        registry
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_stage_code_is_registered() {
        let codes = [
            system::INTERNAL_ERROR,
            file_processing::INVALID_KEYWORD_FILE,
            structural::INCONSISTENT_INDENTATION,
            lexical::UNTERMINATED_STRING,
            syntax::MISSING_COLON,
            semantic::UNDECLARED_VARIABLE,
            ir::UNRESOLVED_CALL,
            success::IR_BUILD_COMPLETE,
        ];
        for code in codes {
            assert!(get_error_metadata(code.as_str()).is_some(), "{}", code);
        }
    }

    #[test]
    fn test_errors_halt_and_successes_do_not() {
        for (code, metadata) in get_error_registry() {
            assert_eq!(metadata.requires_halt, code.starts_with('E'), "{}", code);
        }
        assert!(requires_halt(ir::DUPLICATE_FUNCTION.as_str()));
        assert!(!requires_halt(success::PIPELINE_COMPLETE.as_str()));
    }

    #[test]
    fn test_unknown_code_fallbacks() {
        assert_eq!(get_description("E999"), "Unknown error");
        assert_eq!(get_category("E999"), "Unknown");
        assert_eq!(get_severity("E999"), Severity::Medium);
        assert!(!requires_halt("E999"));
    }

    #[test]
    fn test_categories() {
        assert_eq!(get_category("E016"), "Structural");
        assert_eq!(get_category("E020"), "Lexical");
        assert_eq!(get_category("E090"), "IR");
        assert!(requires_halt(ir::EMPTY_EXPRESSION.as_str()));
        assert!(!requires_halt(success::TOKENIZATION_COMPLETE.as_str()));
    }
}
