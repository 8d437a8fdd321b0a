//! Side channel for recoverable problems.
//!
//! A failed cell never aborts its row; it becomes a [`Diagnostic`] handed to
//! whatever [`DiagnosticSink`] the caller passed in.

use std::fmt;

use crate::error::CoercionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A cell value did not fit its field.
    Coercion,
    /// Text in a date field did not match the date format.
    DateParse,
    /// Releasing the underlying file failed after the result was produced.
    Release,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Zero-based sheet row.
    pub row: Option<u32>,
    /// Zero-based sheet column.
    pub col: Option<u32>,
    pub field: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn from_coercion(row: u32, col: u32, field: &str, err: &CoercionError) -> Self {
        let kind = if err.is_date_parse() {
            DiagnosticKind::DateParse
        } else {
            DiagnosticKind::Coercion
        };
        Self {
            kind,
            row: Some(row),
            col: Some(col),
            field: Some(field.to_string()),
            message: err.to_string(),
        }
    }

    pub fn release(message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::Release,
            row: None,
            col: None,
            field: None,
            message: message.into(),
        }
    }

    pub fn severity(&self) -> Severity {
        match self.kind {
            DiagnosticKind::DateParse => Severity::Debug,
            DiagnosticKind::Coercion => Severity::Warning,
            DiagnosticKind::Release => Severity::Error,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.row, self.col) {
            (Some(r), Some(c)) => write!(f, "row {r}, col {c}")?,
            (Some(r), None) => write!(f, "row {r}")?,
            _ => f.write_str("sheet")?,
        }
        if let Some(field) = &self.field {
            write!(f, " ({field})")?;
        }
        write!(f, ": {}", self.message)
    }
}

pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Adapts a closure into a sink.
pub struct FnSink<F>(pub F);

impl<F: FnMut(Diagnostic)> DiagnosticSink for FnSink<F> {
    fn report(&mut self, diagnostic: Diagnostic) {
        (self.0)(diagnostic)
    }
}

/// Emits every diagnostic as a `tracing` event at its severity.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        let field = diagnostic.field.as_deref().unwrap_or("");
        match diagnostic.severity() {
            Severity::Debug => tracing::debug!(
                row = diagnostic.row,
                col = diagnostic.col,
                field,
                "{}",
                diagnostic.message
            ),
            Severity::Warning => tracing::warn!(
                row = diagnostic.row,
                col = diagnostic.col,
                field,
                "{}",
                diagnostic.message
            ),
            Severity::Error => tracing::error!(
                row = diagnostic.row,
                col = diagnostic.col,
                field,
                "{}",
                diagnostic.message
            ),
        }
    }
}

/// Forwards to `tracing` and keeps a copy.
#[derive(Debug, Default)]
pub struct Collector {
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink for Collector {
    fn report(&mut self, diagnostic: Diagnostic) {
        TracingSink.report(diagnostic.clone());
        self.diagnostics.push(diagnostic);
    }
}
