//! Output handler traits and types
//!
//! This module defines the notifier interface and the errors of the output
//! side of a run.

use crate::output::notification::Notification;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Delivers the notification of a run's reported bulletins
///
/// Mail delivery lives outside this crate; implementations adapt a
/// [`Notification`] to whatever channel the deployment uses.
pub trait Notifier {
    /// Delivers one notification
    ///
    /// # Arguments
    ///
    /// * `notification` - Subject, body and the reported contents
    fn notify(&mut self, notification: &Notification) -> OutputResult<()>;
}
