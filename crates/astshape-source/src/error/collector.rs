//! Accumulates diagnostics so one pass reports every problem it finds.

use crate::error::{Diagnostic, SourceError};

#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Fails with every diagnostic if any of them is an error, otherwise
    /// hands back the warnings.
    pub fn finish(self) -> Result<Vec<Diagnostic>, SourceError> {
        let failed = self
            .diagnostics
            .iter()
            .any(|diagnostic| diagnostic.severity().is_error());
        if failed {
            Err(SourceError::new(self.diagnostics))
        } else {
            Ok(self.diagnostics)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collector_succeeds() {
        assert!(DiagnosticCollector::new().finish().unwrap().is_empty());
    }

    #[test]
    fn test_one_error_fails_with_everything() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("warning 1"));
        collector.emit(Diagnostic::error("error 1"));

        let err = collector.finish().unwrap_err();
        assert_eq!(err.diagnostics().len(), 2);
        assert_eq!(err.errors().count(), 1);
    }

    #[test]
    fn test_warnings_only_are_returned() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("warning 1"));
        collector.emit(Diagnostic::warning("warning 2"));

        assert_eq!(collector.finish().unwrap().len(), 2);
    }
}
