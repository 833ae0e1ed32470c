//! Shared source-location helpers used by log events and error reports.

pub mod span;

pub use span::{Position, SourceMap, Span};
