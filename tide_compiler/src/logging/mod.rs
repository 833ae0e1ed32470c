//! Global logging for the Tide compiler
//!
//! A process-wide logging service and error collector, a thread-local
//! "current file" context that tags events, and the macros in [`macros`].

pub mod codes;
pub mod collector;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use crate::log_success;

pub use codes::Code;
pub use collector::{ErrorCollector, FileProcessingContext, ProcessingSummary};
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();
static GLOBAL_ERROR_COLLECTOR: OnceLock<Arc<ErrorCollector>> = OnceLock::new();

thread_local! {
    static FILE_CONTEXT: RefCell<Option<FileProcessingContext>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize the global logger from runtime preferences
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;
    init_global_logging_with_service(Arc::new(service::create_configured_service()))?;

    let probe = [
        codes::system::INTERNAL_ERROR,
        codes::structural::INCONSISTENT_INDENTATION,
        codes::lexical::INVALID_CHARACTER,
        codes::ir::EMPTY_EXPRESSION,
    ];
    for code in probe {
        if codes::get_description(code.as_str()) == "Unknown error" {
            return Err(format!("Missing metadata for error code: {}", code));
        }
    }

    log_success!(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
        "profile" => crate::config::build_info::profile()
    );

    Ok(())
}

/// Initialize with a caller-supplied service (tests, embedding)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())?;

    // A collector may already exist from a previous partial init
    let _ = GLOBAL_ERROR_COLLECTOR.set(Arc::new(ErrorCollector::new()));

    Ok(())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some() && GLOBAL_ERROR_COLLECTOR.get().is_some()
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

pub fn try_get_global_error_collector() -> Option<&'static ErrorCollector> {
    GLOBAL_ERROR_COLLECTOR
        .get()
        .map(|collector| collector.as_ref())
}

// ============================================================================
// FILE CONTEXT MANAGEMENT
// ============================================================================

pub fn set_file_context(file_path: PathBuf, file_id: usize) {
    FILE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(FileProcessingContext::new(file_path, file_id));
    });
}

pub fn clear_file_context() {
    FILE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Run `f` with every event on this thread tagged with `file_path`
pub fn with_file_context<F, R>(file_path: PathBuf, file_id: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    set_file_context(file_path, file_id);
    let result = f();
    clear_file_context();
    result
}

pub fn get_current_file_context() -> Option<FileProcessingContext> {
    FILE_CONTEXT.with(|ctx| ctx.borrow().clone())
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

fn truncate_message(message: &str) -> &str {
    let max = config::get_max_log_message_length();
    if message.len() <= max {
        return message;
    }
    let mut end = max;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    &message[..end]
}

/// Attach context and file information, then dispatch (used by the macros)
pub fn log_event_with_context(mut event: LogEvent, context: Vec<(&str, &str)>) {
    event.message = truncate_message(&event.message).to_string();

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    let file_ctx = get_current_file_context();
    if let Some(ctx) = &file_ctx {
        event = event.with_context("file", &ctx.file_path.display().to_string());
        event = event.with_context("file_id", &ctx.file_id.to_string());
    }

    let collect = event.is_error() || event.is_warning();

    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event.clone());
    }

    if let (true, Some(ctx), Some(collector)) = (collect, file_ctx, try_get_global_error_collector())
    {
        collector.record_event(&ctx.file_path, event);
    }
}

/// Error logging entry point for `log_error!`
pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<crate::utils::Span>,
    context: Vec<(&str, &str)>,
) {
    let mut event = LogEvent::error(code, message);
    if let Some(s) = span {
        event = event.with_span(s);
    }
    log_event_with_context(event, context);
}

// ============================================================================
// REPORTING
// ============================================================================

pub fn get_processing_summary() -> ProcessingSummary {
    try_get_global_error_collector()
        .map(|collector| collector.get_summary())
        .unwrap_or_default()
}

/// Cargo-style report of everything collected so far, if anything was
pub fn cargo_style_summary() -> Option<String> {
    let collector = try_get_global_error_collector()?;
    if collector.total_event_count() == 0 {
        return None;
    }
    Some(collector::format_cargo_style_errors(collector))
}

pub fn print_cargo_style_summary() {
    if !config::use_cargo_style_output() {
        return;
    }
    if let Some(report) = cargo_style_summary() {
        eprint!("{}", report);
    }
}

pub fn get_system_diagnostics() -> String {
    let mut diagnostics = String::from("=== Logging System Diagnostics ===\n");
    diagnostics.push_str(&format!("Initialized: {}\n", is_initialized()));

    if let Some(collector) = try_get_global_error_collector() {
        let (current, max, percentage) = collector.get_capacity_info();
        diagnostics.push_str(&format!(
            "Capacity: {}/{} ({:.1}%)\n",
            current,
            max,
            percentage * 100.0
        ));
        let summary = collector.get_summary();
        diagnostics.push_str(&format!("Files with events: {}\n", summary.total_files));
        diagnostics.push_str(&format!("Total errors: {}\n", summary.total_errors));
    }

    diagnostics.push('\n');
    diagnostics.push_str(&config::get_config_summary());
    diagnostics
}

/// Log through the global service, or straight to stderr before initialization
pub fn safe_log_error(code: Code, message: &str) {
    match try_get_global_logger() {
        Some(logger) => logger.log_error(code, message),
        None => eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_file_context() {
        let file_path = PathBuf::from("code.us");

        let result = with_file_context(file_path.clone(), 2, || {
            let context = get_current_file_context();
            assert_eq!(context.map(|c| c.file_path), Some(file_path.clone()));
            42
        });

        assert_eq!(result, 42);
        assert!(get_current_file_context().is_none());
    }

    #[test]
    fn test_truncate_message_respects_char_boundary() {
        let long = "é".repeat(config::get_max_log_message_length());
        let truncated = truncate_message(&long);
        assert!(truncated.len() <= config::get_max_log_message_length());
        assert!(truncated.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_safe_logging_without_init() {
        safe_log_error(codes::system::INTERNAL_ERROR, "Test error");
    }

    #[test]
    fn test_diagnostics() {
        let diagnostics = get_system_diagnostics();
        assert!(diagnostics.contains("Logging System Diagnostics"));
        assert!(diagnostics.contains("Logging Configuration"));
    }
}
