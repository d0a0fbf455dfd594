use crate::retry::RetryReport;

/// Receives the final result of a retry run.
///
/// Registered on the [`RetryController`](crate::RetryController) as an
/// optional collaborator; with none registered the run simply ends.
pub trait Notifier: Send + Sync {
    fn booking_finished(&self, report: &RetryReport);
}
