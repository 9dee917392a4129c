//! Failure isolation.
//!
//! Every fetch result a pipeline consumes passes through [`isolate`]. A
//! failure is logged, turned into a notification, and replaced by `None` so
//! the caller can continue with its fallback instead of tearing down the
//! stream.

use catalog_core::FetchResult;
use catalog_streams::Notifier;

/// Unwrap a fetch result, diverting a failure into `notifier`.
///
/// `source` names the pipeline for the log line only; the notification text
/// is the normalized [`catalog_core::FetchError`] message.
pub fn isolate<T>(result: FetchResult<T>, notifier: &Notifier, source: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            let message = err.to_string();
            tracing::error!(
                source,
                transport = err.is_transport(),
                status = ?err.status(),
                "{}",
                message
            );
            notifier.notify(message);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use catalog_core::FetchError;

    use super::*;

    #[test]
    fn success_passes_through_silently() {
        let notifier = Notifier::new();
        let mut session = notifier.subscribe();

        assert_eq!(isolate(Ok(3), &notifier, "test"), Some(3));
        assert!(session.try_recv().is_none());
    }

    #[test]
    fn failure_becomes_one_notification() {
        let notifier = Notifier::new();
        let mut session = notifier.subscribe();

        let result: FetchResult<Vec<u8>> = Err(FetchError::backend(500, "Internal Server Error"));
        assert_eq!(isolate(result, &notifier, "test"), None);

        let notification = session.try_recv().unwrap();
        assert_eq!(notification.message, "Backend returned code 500: Internal Server Error");
        assert!(session.try_recv().is_none());
    }
}
