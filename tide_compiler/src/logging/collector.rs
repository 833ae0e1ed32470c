//! Per-file event collection and cargo-style reporting

use super::events::LogEvent;
use crate::config::compile_time::logging::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct FileProcessingContext {
    pub file_path: PathBuf,
    pub file_id: usize,
    pub start_time: Instant,
}

impl FileProcessingContext {
    pub fn new(file_path: PathBuf, file_id: usize) -> Self {
        Self {
            file_path,
            file_id,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProcessingSummary {
    pub total_files: usize,
    pub failed_files: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
}

impl ProcessingSummary {
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }
}

/// Thread-safe collector of error and warning events keyed by file
pub struct ErrorCollector {
    file_events: Mutex<BTreeMap<PathBuf, Vec<LogEvent>>>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self {
            file_events: Mutex::new(BTreeMap::new()),
        }
    }

    /// Record an event; past the per-file limit a single overflow warning is kept
    pub fn record_event(&self, file_path: &Path, event: LogEvent) {
        let Ok(mut events) = self.file_events.lock() else {
            return;
        };

        let file_events = events.entry(file_path.to_path_buf()).or_default();

        if file_events.len() < MAX_LOG_EVENTS_PER_FILE {
            file_events.push(event);
        } else if file_events.len() == MAX_LOG_EVENTS_PER_FILE {
            file_events.push(LogEvent::warning(&format!(
                "Too many events for file (limit: {})",
                MAX_LOG_EVENTS_PER_FILE
            )));
        }
    }

    pub fn get_file_errors(&self, file_path: &Path) -> Vec<LogEvent> {
        self.file_events
            .lock()
            .ok()
            .and_then(|events| {
                events
                    .get(file_path)
                    .map(|events| events.iter().filter(|e| e.is_error()).cloned().collect())
            })
            .unwrap_or_default()
    }

    pub fn get_all_file_events(&self) -> BTreeMap<PathBuf, Vec<LogEvent>> {
        self.file_events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn get_summary(&self) -> ProcessingSummary {
        let events = self.get_all_file_events();
        let mut summary = ProcessingSummary {
            total_files: events.len(),
            ..Default::default()
        };

        for file_events in events.values() {
            if file_events.iter().any(|e| e.is_error()) {
                summary.failed_files += 1;
            }
            summary.total_errors += file_events.iter().filter(|e| e.is_error()).count();
            summary.total_warnings += file_events.iter().filter(|e| e.is_warning()).count();
        }

        summary
    }

    pub fn total_event_count(&self) -> usize {
        self.file_events
            .lock()
            .map(|events| events.values().map(|v| v.len()).sum())
            .unwrap_or(0)
    }

    /// (current, max, fraction) against the global log buffer size
    pub fn get_capacity_info(&self) -> (usize, usize, f64) {
        let current = self.total_event_count();
        let max = LOG_BUFFER_SIZE;
        let percentage = if max > 0 {
            current as f64 / max as f64
        } else {
            0.0
        };
        (current, max, percentage)
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.file_events.lock() {
            events.clear();
        }
    }
}

impl Default for ErrorCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn location(file_path: &Path, event: &LogEvent) -> String {
    match (event.span, event.line()) {
        (Some(span), _) => format!(
            " --> {}:{}:{}",
            file_path.display(),
            span.start.line,
            span.start.column
        ),
        (None, Some(line)) => format!(" --> {}:{}", file_path.display(), line),
        (None, None) => String::new(),
    }
}

/// Errors and warnings grouped by file, in the style of rustc diagnostics
pub fn format_cargo_style_errors(collector: &ErrorCollector) -> String {
    let mut output = String::new();

    for (file_path, events) in &collector.get_all_file_events() {
        let reportable: Vec<_> = events
            .iter()
            .filter(|e| e.is_error() || e.is_warning())
            .collect();
        if reportable.is_empty() {
            continue;
        }

        output.push_str(&format!("Checking {}...\n", file_path.display()));

        for event in reportable {
            let kind = if event.is_error() { "error" } else { "warning" };
            output.push_str(&format!(
                "{}[{}]: {}{}\n",
                kind,
                event.code.as_str(),
                event.message,
                location(file_path, event)
            ));

            for (key, value) in &event.context {
                if key != "file" && key != "file_id" && key != "line" {
                    output.push_str(&format!("  = {}: {}\n", key, value));
                }
            }

            let action = event.recommended_action();
            if event.is_error() && action != "No specific action available" {
                output.push_str(&format!("  = help: {}\n", action));
            }
        }

        output.push('\n');
    }

    let summary = collector.get_summary();
    if summary.has_errors() {
        output.push_str(&format!(
            "error: could not compile {} file(s) due to {} error(s)\n",
            summary.failed_files, summary.total_errors
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_record_and_summarize() {
        let collector = ErrorCollector::new();
        let path = PathBuf::from("code.us");

        collector.record_event(
            &path,
            LogEvent::error(codes::lexical::INVALID_CHARACTER, "Unexpected '$'")
                .with_context("line", "3"),
        );
        collector.record_event(&path, LogEvent::warning("Suspicious"));

        let summary = collector.get_summary();
        assert_eq!(summary.total_files, 1);
        assert_eq!(summary.failed_files, 1);
        assert_eq!(summary.total_errors, 1);
        assert_eq!(summary.total_warnings, 1);
        assert_eq!(collector.get_file_errors(&path).len(), 1);
    }

    #[test]
    fn test_per_file_limit() {
        let collector = ErrorCollector::new();
        let path = PathBuf::from("big.us");

        for _ in 0..MAX_LOG_EVENTS_PER_FILE + 10 {
            collector.record_event(&path, LogEvent::error(codes::ir::EMPTY_EXPRESSION, "x"));
        }

        assert_eq!(collector.total_event_count(), MAX_LOG_EVENTS_PER_FILE + 1);
    }

    #[test]
    fn test_cargo_style_output() {
        let collector = ErrorCollector::new();
        let path = PathBuf::from("code.us");
        collector.record_event(
            &path,
            LogEvent::error(codes::structural::INCONSISTENT_INDENTATION, "Bad dedent")
                .with_context("line", "7")
                .with_context("width", "3"),
        );

        let output = format_cargo_style_errors(&collector);
        assert!(output.contains("error[E016]: Bad dedent --> code.us:7"));
        assert!(output.contains("  = width: 3"));
        assert!(output.contains("  = help: "));
        assert!(output.contains("could not compile 1 file(s) due to 1 error(s)"));
    }
}
