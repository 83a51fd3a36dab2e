//! Error reporting observers
//!
//! The publisher hands every error it returns to an [`ErrorReporter`] first.
//! Reporters see the error by reference and cannot change what the caller
//! receives.

use crate::error::NotificationError;
use std::sync::Arc;
use tracing::{error, warn};

/// Receives a copy of every error produced by the publisher
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &NotificationError);
}

/// Logs errors through `tracing`
///
/// Validation failures are logged at `warn`, everything else at `error`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, err: &NotificationError) {
        if err.is_invalid_argument() {
            warn!(
                code = err.code().as_i32(),
                error_type = err.error_type_label(),
                error = %err,
                "Notification rejected"
            );
        } else {
            error!(
                code = err.code().as_i32(),
                error_type = err.error_type_label(),
                error = %err,
                "Notification SDK error"
            );
        }
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ErrorReporter for NoopReporter {
    fn report(&self, _error: &NotificationError) {}
}

impl<R: ErrorReporter + ?Sized> ErrorReporter for Arc<R> {
    fn report(&self, error: &NotificationError) {
        (**self).report(error)
    }
}

/// Default reporter used by the `connect*` constructors
pub fn default_reporter() -> Arc<dyn ErrorReporter> {
    Arc::new(TracingReporter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collecting(Mutex<Vec<String>>);

    impl ErrorReporter for Collecting {
        fn report(&self, error: &NotificationError) {
            self.0.lock().unwrap().push(error.to_string());
        }
    }

    #[test]
    fn test_arc_forwards_to_inner_reporter() {
        let inner = Arc::new(Collecting::default());
        let shared: Arc<dyn ErrorReporter> = inner.clone();
        shared.report(&NotificationError::MissingNotification);
        assert_eq!(*inner.0.lock().unwrap(), vec!["notification cannot be nil"]);
    }

    #[test]
    fn test_builtin_reporters_do_not_panic() {
        let err = NotificationError::EmptyField { field: "source" };
        TracingReporter.report(&err);
        NoopReporter.report(&err);
        default_reporter().report(&NotificationError::Closed);
    }
}
