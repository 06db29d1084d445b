//! Output module for reporting a run's results
//!
//! This module handles:
//! - Building the notification payload of reported bulletins
//! - Delivering it through a [`Notifier`]
//! - Writing the optional markdown report
//! - Counting and printing run statistics

mod markdown;
mod notification;
pub mod stats;
mod traits;

pub use markdown::{format_markdown_report, generate_markdown_report};
pub use notification::{build_notification, LogNotifier, Notification};
pub use stats::{print_statistics, RunStats};
pub use traits::{Notifier, OutputError, OutputResult};

use crate::config::NotificationConfig;
use crate::crawler::CollectReport;

/// Sends the notification and writes the report for a run's delta
///
/// Does nothing when notifications are disabled or nothing was reported.
///
/// # Returns
///
/// * `Ok(true)` - A notification was delivered
/// * `Ok(false)` - Nothing to deliver
/// * `Err(OutputError)` - Delivery or report writing failed with an I/O error
pub fn announce<N: Notifier + ?Sized>(
    config: &NotificationConfig,
    report: &CollectReport,
    notifier: &mut N,
) -> OutputResult<bool> {
    if !config.enabled {
        tracing::debug!("Notifications disabled");
        return Ok(false);
    }

    let Some(notification) = build_notification(&config.subject, &report.reported) else {
        tracing::info!("Nothing new to report");
        return Ok(false);
    };

    if let Some(path) = &config.report_path {
        generate_markdown_report(&report.reported, &report.stats, path)?;
        tracing::info!("Report written to {}", path.display());
    }

    notifier.notify(&notification)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;
    use crate::record::{Content, Item};

    #[derive(Default)]
    struct Capture(Vec<Notification>);

    impl Notifier for Capture {
        fn notify(&mut self, notification: &Notification) -> OutputResult<()> {
            self.0.push(notification.clone());
            Ok(())
        }
    }

    fn report() -> CollectReport {
        CollectReport {
            reported: vec![Content {
                channel: Channel::ImportElectronicGame,
                id: "t1".to_string(),
                title: "2024年1月进口电子游戏审批信息".to_string(),
                url: "jkdzyxspxx/202401/t1.html".to_string(),
                date: "2024-01-10".to_string(),
                items: vec![Item::default(), Item::default()],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_announce_delivers_and_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = NotificationConfig {
            report_path: Some(dir.path().join("report.md")),
            ..Default::default()
        };
        let mut capture = Capture::default();

        assert!(announce(&config, &report(), &mut capture).unwrap());
        assert_eq!(capture.0.len(), 1);
        assert_eq!(capture.0[0].body, "2024年1月进口电子游戏审批信息 (2)\r\n");
        assert!(dir.path().join("report.md").exists());
    }

    #[test]
    fn test_announce_skips_empty_delta() {
        let mut capture = Capture::default();
        let sent = announce(
            &NotificationConfig::default(),
            &CollectReport::default(),
            &mut capture,
        )
        .unwrap();
        assert!(!sent);
        assert!(capture.0.is_empty());
    }

    #[test]
    fn test_announce_disabled() {
        let config = NotificationConfig {
            enabled: false,
            ..Default::default()
        };
        let mut capture = Capture::default();
        assert!(!announce(&config, &report(), &mut capture).unwrap());
        assert!(capture.0.is_empty());
    }
}
