//! Error collection for a compiler run

use crate::di::traits::ErrorReporter;
use std::sync::Mutex;
use tracing::error;

/// Collects reported errors and logs each one as it arrives
#[derive(Debug, Default)]
pub struct LoggingErrorReporter {
    errors: Mutex<Vec<String>>,
}

impl LoggingErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ErrorReporter for LoggingErrorReporter {
    fn report_error(&self, message: String) {
        error!("{}", message);
        self.errors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(message);
    }

    fn errors(&self) -> Vec<String> {
        self.errors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_collects_in_order() {
        let reporter = LoggingErrorReporter::new();
        assert!(!reporter.has_errors());

        reporter.report_error("first".to_string());
        reporter.report_error("second".to_string());

        assert!(reporter.has_errors());
        assert_eq!(reporter.error_count(), 2);
        assert_eq!(reporter.errors(), vec!["first", "second"]);
    }
}
