//! Notification payload for reported bulletins

use crate::output::traits::{Notifier, OutputResult};
use crate::record::Content;

/// What a notifier receives after a run with a non-empty delta
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    /// One `<title> (<item count>)` line per reported content, CRLF terminated
    pub body: String,
    pub contents: Vec<Content>,
}

/// Builds the notification for `contents`
///
/// Returns `None` when there is nothing to report.
pub fn build_notification(subject: &str, contents: &[Content]) -> Option<Notification> {
    if contents.is_empty() {
        return None;
    }

    let body = contents
        .iter()
        .map(|content| format!("{} ({})\r\n", content.title, content.items.len()))
        .collect();

    Some(Notification {
        subject: subject.to_string(),
        body,
        contents: contents.to_vec(),
    })
}

/// Notifier that writes the notification to the log
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notification: &Notification) -> OutputResult<()> {
        tracing::info!(
            "Notification '{}' with {} contents",
            notification.subject,
            notification.contents.len()
        );
        for line in notification.body.lines() {
            tracing::info!("  {}", line);
        }
        Ok(())
    }
}
