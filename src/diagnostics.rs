//! diagnostics — explicit progress/warning sink shared by every stage.
//!
//! Purpose
//! -------
//! Give pipeline stages a place to report what they did (skipped steps,
//! fallbacks, estimated shifts) without reaching for a global logger. Every
//! component that reports progress receives a `&mut dyn DiagnosticSink`.
//!
//! Key behaviors
//! -------------
//! - [`LogSink`] forwards each [`Diagnostic`] to the `log` facade so that a
//!   host application can route messages through whatever logger it installs.
//! - [`CollectingSink`] stores diagnostics in order, which is what tests and
//!   callers that want structured warnings use.
//!
//! Conventions
//! -----------
//! - Recoverable conditions (e.g. trial length without trial count, lag bank
//!   requested without `lag_max`) are always reported at
//!   [`Severity::Warning`]; purely informational messages use
//!   [`Severity::Info`].
//! - Fatal conditions are never reported here; they are returned as errors.

use std::fmt;

/// Log target used by [`LogSink`].
pub const LOG_TARGET: &str = "cvr_regressors";

/// Severity of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Debug => write!(f, "DEBUG"),
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
        }
    }
}

/// A single structured message emitted by a pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic { severity, message: message.into() }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Receiver for diagnostics emitted by the signal and regressor stages.
///
/// Only [`DiagnosticSink::emit`] must be implemented; the severity helpers
/// are conveniences that keep call sites short.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);

    fn debug(&mut self, message: String) {
        self.emit(Diagnostic::new(Severity::Debug, message));
    }

    fn info(&mut self, message: String) {
        self.emit(Diagnostic::new(Severity::Info, message));
    }

    fn warn(&mut self, message: String) {
        self.emit(Diagnostic::new(Severity::Warning, message));
    }
}

/// Forwards diagnostics to the `log` facade under [`LOG_TARGET`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Debug => log::debug!(target: LOG_TARGET, "{}", diagnostic.message),
            Severity::Info => log::info!(target: LOG_TARGET, "{}", diagnostic.message),
            Severity::Warning => log::warn!(target: LOG_TARGET, "{}", diagnostic.message),
        }
    }
}

/// Records every diagnostic in emission order.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        CollectingSink::default()
    }

    /// Messages emitted at [`Severity::Warning`].
    pub fn warnings(&self) -> Vec<&str> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .map(|d| d.message.as_str())
            .collect()
    }

    /// `true` when any message at any severity contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.diagnostics.iter().any(|d| d.message.contains(needle))
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Verify that the severity helpers route messages with the right
    // severity and that `warnings()` filters on it.
    //
    // Given
    // -----
    // - A `CollectingSink` receiving one info and one warning message.
    //
    // Expect
    // ------
    // - Both diagnostics are stored in order; only the warning is
    //   returned by `warnings()`.
    fn collecting_sink_keeps_order_and_filters_warnings() {
        // Arrange
        let mut sink = CollectingSink::new();

        // Act
        sink.info("skipping convolution".to_string());
        sink.warn("lag_max missing".to_string());

        // Assert
        assert_eq!(sink.diagnostics.len(), 2);
        assert_eq!(sink.diagnostics[0].severity, Severity::Info);
        assert_eq!(sink.warnings(), vec!["lag_max missing"]);
        assert!(sink.contains("convolution"));
    }

    #[test]
    fn diagnostic_display_prefixes_severity() {
        let diagnostic = Diagnostic::new(Severity::Warning, "careful");
        assert_eq!(diagnostic.to_string(), "WARNING: careful");
    }
}
